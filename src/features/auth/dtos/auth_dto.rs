use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::{AuthenticatedUser, User, UserRole};

/// Roles a visitor may pick at sign-up. Admins are provisioned out of band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegisterRole {
    Organizer,
    #[default]
    Public,
}

impl From<RegisterRole> for UserRole {
    fn from(role: RegisterRole) -> Self {
        match role {
            RegisterRole::Organizer => UserRole::Organizer,
            RegisterRole::Public => UserRole::Public,
        }
    }
}

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Password confirmation does not match"))]
    pub password_confirmation: String,

    #[serde(default)]
    pub role: RegisterRole,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for profile updates. Omitted fields keep their value.
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: Some(user.created_at),
        }
    }
}

impl From<AuthenticatedUser> for UserDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: None,
        }
    }
}

/// Response DTO for login, register and refresh
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub user: UserDto,
    /// Bearer token for the `Authorization` header
    pub token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_dto() -> RegisterRequestDto {
        RegisterRequestDto {
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            password: "Secret123".to_string(),
            password_confirmation: "Secret123".to_string(),
            role: RegisterRole::Organizer,
        }
    }

    #[test]
    fn test_register_dto_valid() {
        assert!(register_dto().validate().is_ok());
    }

    #[test]
    fn test_register_dto_password_mismatch() {
        let mut dto = register_dto();
        dto.password_confirmation = "Different1".to_string();
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirmation"));
    }

    #[test]
    fn test_register_role_defaults_to_public() {
        let dto: RegisterRequestDto = serde_json::from_value(serde_json::json!({
            "name": "Sam",
            "email": "sam@example.com",
            "password": "Secret123",
            "password_confirmation": "Secret123"
        }))
        .unwrap();
        assert_eq!(dto.role, RegisterRole::Public);
    }

    #[test]
    fn test_register_role_rejects_admin() {
        let result: Result<RegisterRequestDto, _> = serde_json::from_value(serde_json::json!({
            "name": "Eve",
            "email": "eve@example.com",
            "password": "Secret123",
            "password_confirmation": "Secret123",
            "role": "admin"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_profile_allows_partial() {
        let dto = UpdateProfileDto {
            name: Some("New Name".to_string()),
            email: None,
        };
        assert!(dto.validate().is_ok());

        let bad = UpdateProfileDto {
            name: None,
            email: Some("not-an-email".to_string()),
        };
        assert!(bad.validate().is_err());
    }
}
