pub mod venue;

pub use venue::{Venue, VenueInput};
