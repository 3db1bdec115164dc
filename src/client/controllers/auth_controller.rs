use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::client::controllers::{message_or, Outcome};
use crate::client::credentials::CredentialProvider;
use crate::client::models::{LoginCredentials, ProfileUpdate, Registration, Session, User};
use crate::client::services::AuthGateway;

lazy_static! {
    /// Loose address check: something@something.tld, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Account flows. Keeps the credential provider in step with the server:
/// a successful login, registration or refresh stores the new token and
/// logout clears it.
pub struct AuthController {
    auth: Arc<dyn AuthGateway>,
    credentials: Arc<dyn CredentialProvider>,
}

impl AuthController {
    pub fn new(auth: Arc<dyn AuthGateway>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self { auth, credentials }
    }

    pub async fn login(&self, credentials: LoginCredentials) -> Outcome<Session> {
        if let Err(message) = validate_login(&credentials) {
            return Outcome::fail(message);
        }

        match self.auth.login(credentials).await {
            Ok(reply) => {
                self.credentials.store(reply.data.token.clone());
                Outcome::ok(reply.data, message_or(reply.message, "Login successful"))
            }
            Err(e) => Outcome::from_error(&e, "Login failed"),
        }
    }

    pub async fn register(&self, registration: Registration) -> Outcome<Session> {
        if let Err(message) = validate_registration(&registration) {
            return Outcome::fail(message);
        }

        match self.auth.register(registration).await {
            Ok(reply) => {
                self.credentials.store(reply.data.token.clone());
                Outcome::ok(
                    reply.data,
                    message_or(reply.message, "Registration successful"),
                )
            }
            Err(e) => Outcome::from_error(&e, "Registration failed"),
        }
    }

    /// The local token is dropped even if the server call fails
    pub async fn logout(&self) -> Outcome<()> {
        let result = self.auth.logout().await;
        self.credentials.clear();

        match result {
            Ok(message) => Outcome::ok((), message_or(message, "Logged out successfully")),
            Err(e) => Outcome::from_error(&e, "Logout failed"),
        }
    }

    pub async fn current_user(&self) -> Outcome<User> {
        match self.auth.current_user().await {
            Ok(user) => Outcome::ok(user, "User retrieved successfully"),
            Err(e) => Outcome::from_error(&e, "Failed to get current user"),
        }
    }

    pub async fn update_profile(&self, update: ProfileUpdate) -> Outcome<User> {
        if let Err(message) = validate_profile(&update) {
            return Outcome::fail(message);
        }

        match self.auth.update_profile(update).await {
            Ok(reply) => Outcome::ok(
                reply.data,
                message_or(reply.message, "Profile updated successfully"),
            ),
            Err(e) => Outcome::from_error(&e, "Profile update failed"),
        }
    }

    pub async fn refresh(&self) -> Outcome<Session> {
        match self.auth.refresh().await {
            Ok(reply) => {
                self.credentials.store(reply.data.token.clone());
                Outcome::ok(reply.data, "Token refreshed successfully")
            }
            Err(e) => Outcome::from_error(&e, "Token refresh failed"),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.token().is_some()
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// At least one uppercase letter, one lowercase letter and one digit
pub fn is_strong_password(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub fn validate_login(credentials: &LoginCredentials) -> Result<(), String> {
    if !is_valid_email(&credentials.email) {
        return Err("Valid email address is required".to_string());
    }
    Ok(())
}

pub fn validate_registration(registration: &Registration) -> Result<(), String> {
    if registration.name.trim().chars().count() < 2 {
        return Err("Name must be at least 2 characters long".to_string());
    }
    if !is_valid_email(&registration.email) {
        return Err("Valid email address is required".to_string());
    }

    let password = &registration.password;
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }
    if password.chars().count() > 128 {
        return Err("Password must be less than 128 characters".to_string());
    }
    if registration.password_confirmation.is_empty() {
        return Err("Password confirmation is required".to_string());
    }
    if *password != registration.password_confirmation {
        return Err("Password confirmation does not match".to_string());
    }
    if !is_strong_password(password) {
        return Err(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                .to_string(),
        );
    }

    Ok(())
}

/// Only the fields being changed are checked
pub fn validate_profile(update: &ProfileUpdate) -> Result<(), String> {
    if update
        .name
        .as_deref()
        .is_some_and(|n| n.trim().chars().count() < 2)
    {
        return Err("Name must be at least 2 characters long".to_string());
    }
    if update.email.as_deref().is_some_and(|e| !is_valid_email(e)) {
        return Err("Valid email address is required".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::credentials::MemoryCredentials;
    use crate::client::error::ClientError;
    use crate::client::services::{MockAuthGateway, Reply};
    use crate::features::auth::model::UserRole;
    use chrono::{Duration, Utc};

    fn session(token: &str) -> Session {
        Session {
            user: User {
                id: "1".to_string(),
                name: "Ola".to_string(),
                email: "ola@example.com".to_string(),
                role: UserRole::Organizer,
                created_at: None,
            },
            token: token.to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    fn registration() -> Registration {
        Registration {
            name: "Ola".to_string(),
            email: "ola@example.com".to_string(),
            password: "Secret123".to_string(),
            password_confirmation: "Secret123".to_string(),
            role: Some(UserRole::Organizer),
        }
    }

    #[test]
    fn test_registration_rules_in_order() {
        assert!(validate_registration(&registration()).is_ok());

        let cases = [
            (
                Registration {
                    email: "not-an-email".to_string(),
                    ..registration()
                },
                "Valid email address is required",
            ),
            (
                Registration {
                    password: "Short1".to_string(),
                    password_confirmation: "Short1".to_string(),
                    ..registration()
                },
                "Password must be at least 8 characters long",
            ),
            (
                Registration {
                    password_confirmation: String::new(),
                    ..registration()
                },
                "Password confirmation is required",
            ),
            (
                Registration {
                    password_confirmation: "Secret124".to_string(),
                    ..registration()
                },
                "Password confirmation does not match",
            ),
            (
                Registration {
                    password: "alllowercase1".to_string(),
                    password_confirmation: "alllowercase1".to_string(),
                    ..registration()
                },
                "Password must contain at least one uppercase letter, one lowercase letter, and one number",
            ),
        ];

        for (input, expected) in cases {
            assert_eq!(validate_registration(&input).unwrap_err(), expected);
        }
    }

    #[test]
    fn test_profile_checks_only_present_fields() {
        assert!(validate_profile(&ProfileUpdate::default()).is_ok());
        assert!(validate_profile(&ProfileUpdate {
            email: Some("bad@".to_string()),
            ..Default::default()
        })
        .is_err());
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let mut auth = MockAuthGateway::new();
        auth.expect_login().returning(|_| {
            Ok(Reply {
                data: session("tok-1"),
                message: Some("Login successful".to_string()),
            })
        });
        let credentials = Arc::new(MemoryCredentials::new());

        let controller = AuthController::new(Arc::new(auth), credentials.clone());
        let outcome = controller
            .login(LoginCredentials {
                email: "ola@example.com".to_string(),
                password: "Secret123".to_string(),
            })
            .await;

        assert!(outcome.success);
        assert_eq!(credentials.token().as_deref(), Some("tok-1"));
        assert!(controller.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_no_token() {
        let mut auth = MockAuthGateway::new();
        auth.expect_login()
            .returning(|_| Err(ClientError::Unauthorized("Invalid credentials".to_string())));
        let credentials = Arc::new(MemoryCredentials::new());

        let controller = AuthController::new(Arc::new(auth), credentials.clone());
        let outcome = controller
            .login(LoginCredentials {
                email: "ola@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Invalid credentials");
        assert!(credentials.token().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_token_even_on_error() {
        let mut auth = MockAuthGateway::new();
        auth.expect_logout()
            .returning(|| Err(ClientError::Network("timed out".to_string())));
        let credentials = Arc::new(MemoryCredentials::with_token("tok-1"));

        let controller = AuthController::new(Arc::new(auth), credentials.clone());
        let outcome = controller.logout().await;

        assert!(!outcome.success);
        assert!(credentials.token().is_none());
    }

    #[tokio::test]
    async fn test_refresh_replaces_token() {
        let mut auth = MockAuthGateway::new();
        auth.expect_refresh().returning(|| {
            Ok(Reply {
                data: session("tok-2"),
                message: None,
            })
        });
        let credentials = Arc::new(MemoryCredentials::with_token("tok-1"));

        let controller = AuthController::new(Arc::new(auth), credentials.clone());
        let outcome = controller.refresh().await;

        assert!(outcome.success);
        assert_eq!(outcome.message, "Token refreshed successfully");
        assert_eq!(credentials.token().as_deref(), Some("tok-2"));
    }
}
