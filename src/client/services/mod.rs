pub mod auth_service;
pub mod category_service;
pub mod event_service;
pub mod venue_service;

pub use auth_service::*;
pub use category_service::*;
pub use event_service::*;
pub use venue_service::*;

use crate::client::error::{ClientError, ClientResult};
use crate::shared::types::ApiResponse;

/// Result of a write: the resource plus the server's message, if any
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub data: T,
    pub message: Option<String>,
}

/// Unwrap `data` from a successful envelope.
///
/// A 2xx response without data is a contract violation on the server side.
pub(crate) fn require_data<T>(response: ApiResponse<T>) -> ClientResult<Reply<T>> {
    match response.data {
        Some(data) => Ok(Reply {
            data,
            message: response.message,
        }),
        None => Err(ClientError::Unexpected {
            status: 200,
            message: response
                .message
                .unwrap_or_else(|| "Response did not include data".to_string()),
        }),
    }
}
