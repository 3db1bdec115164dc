pub mod event_repository;

pub use event_repository::{EventRepository, PgEventRepository};

#[cfg(test)]
pub use event_repository::MockEventRepository;
