pub mod venue_handler;

pub use venue_handler::*;
