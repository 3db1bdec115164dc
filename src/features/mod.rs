pub mod auth;
pub mod categories;
pub mod events;
pub mod venues;
