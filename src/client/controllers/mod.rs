//! Client business logic: validation, orchestration and the uniform
//! `{success, data, message}` envelope handed to the presentation layer.

pub mod admin_controller;
pub mod auth_controller;
pub mod event_controller;

pub use admin_controller::*;
pub use auth_controller::*;
pub use event_controller::*;

use serde::Serialize;

use crate::client::error::ClientError;

/// What every controller operation returns. Errors never escape a controller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T> Outcome<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: message.into(),
        }
    }

    /// Failure carrying the error's message, or `fallback` when it has none
    pub fn from_error(error: &ClientError, fallback: &str) -> Self {
        let message = error.to_string();
        if message.trim().is_empty() {
            Self::fail(fallback)
        } else {
            Self::fail(message)
        }
    }
}

/// Server message if it sent one, otherwise the controller's default
pub(crate) fn message_or(message: Option<String>, default: &str) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error_falls_back_on_blank_message() {
        let outcome: Outcome<()> =
            Outcome::from_error(&ClientError::NotFound(String::new()), "Failed to load event");
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Failed to load event");

        let outcome: Outcome<()> = Outcome::from_error(
            &ClientError::Forbidden("Unauthorized to update this event".into()),
            "Failed to update event",
        );
        assert_eq!(outcome.message, "Unauthorized to update this event");
    }

    #[test]
    fn test_message_or() {
        assert_eq!(message_or(Some("  ".into()), "Saved"), "Saved");
        assert_eq!(message_or(Some("Done".into()), "Saved"), "Done");
    }
}
