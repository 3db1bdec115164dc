pub mod venue_repository;

pub use venue_repository::{PgVenueRepository, VenueRepository};

#[cfg(test)]
pub use venue_repository::MockVenueRepository;
