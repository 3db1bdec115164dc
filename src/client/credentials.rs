use std::sync::RwLock;

/// Where the client keeps its bearer token between requests
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<String>;

    fn store(&self, token: String);

    fn clear(&self);
}

/// Process-local token store
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    token: RwLock<Option<String>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialProvider for MemoryCredentials {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store(&self, token: String) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token);
    }

    fn clear(&self) {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_clear() {
        let credentials = MemoryCredentials::new();
        assert_eq!(credentials.token(), None);

        credentials.store("abc".to_string());
        assert_eq!(credentials.token().as_deref(), Some("abc"));

        credentials.clear();
        assert_eq!(credentials.token(), None);
    }
}
