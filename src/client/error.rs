use thiserror::Error;

/// Failures surfaced by the HTTP client layer.
///
/// Status-derived variants carry the server's message; `Validation` also keeps
/// the per-field messages.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message}")]
    Validation { message: String, errors: Vec<String> },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response (HTTP {status}): {message}")]
    Unexpected { status: u16, message: String },
}

impl ClientError {
    /// Map a non-success status and the server's message to a variant
    pub fn from_status(status: u16, message: String, errors: Vec<String>) -> Self {
        match status {
            400 | 422 => ClientError::Validation { message, errors },
            401 => ClientError::Unauthorized(message),
            403 => ClientError::Forbidden(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            _ => ClientError::Unexpected { status, message },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Unexpected {
                status: err.status().map(|s| s.as_u16()).unwrap_or(200),
                message: format!("Malformed response body: {}", err),
            }
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ClientError::from_status(400, "bad".into(), vec!["name: required".into()]),
            ClientError::Validation { ref errors, .. } if errors.len() == 1
        ));
        assert!(matches!(
            ClientError::from_status(401, "x".into(), vec![]),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ClientError::from_status(403, "x".into(), vec![]),
            ClientError::Forbidden(_)
        ));
        assert!(matches!(
            ClientError::from_status(404, "x".into(), vec![]),
            ClientError::NotFound(_)
        ));
        assert!(matches!(
            ClientError::from_status(502, "x".into(), vec![]),
            ClientError::Unexpected { status: 502, .. }
        ));
    }

    #[test]
    fn test_display_uses_server_message() {
        let err = ClientError::from_status(403, "Admin access required".into(), vec![]);
        assert_eq!(err.to_string(), "Admin access required");
    }
}
