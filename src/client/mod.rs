//! Typed client for the PulseCity API.
//!
//! `services` speak HTTP and translate wire payloads into canonical types,
//! `controllers` add validation and wrap every result in an [`controllers::Outcome`].

pub mod api_client;
pub mod controllers;
pub mod credentials;
pub mod error;
pub mod models;
pub mod normalize;
pub mod services;
pub mod views;

pub use api_client::ApiClient;
pub use credentials::{CredentialProvider, MemoryCredentials};
pub use error::{ClientError, ClientResult};
