pub mod user_repository;

pub use user_repository::{PgUserRepository, UserRepository};

#[cfg(test)]
pub use user_repository::MockUserRepository;
