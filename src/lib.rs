//! PulseCity: a city-events marketplace.
//!
//! The server side lives in [`core`] and [`features`]; [`client`] is the typed
//! API client with its business-logic controllers.

pub mod client;
pub mod core;
pub mod features;
pub mod shared;
