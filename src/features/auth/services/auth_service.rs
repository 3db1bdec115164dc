use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, RegisterRequestDto, UpdateProfileDto, UserDto,
};
use crate::features::auth::model::{AuthenticatedUser, NewUser, User};
use crate::features::auth::repositories::UserRepository;
use crate::features::auth::services::token_service::TokenService;
use crate::shared::validation::required_text;

/// Service for account operations (register, login, logout, profile)
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Create an account and sign the new user in
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let name = required_text("name", &dto.name, NAME_REQUIRED)?;
        let email = normalize_email(&dto.email);

        if self.users.email_taken(&email, None).await? {
            return Err(AppError::Conflict(
                "The email has already been taken.".to_string(),
            ));
        }

        let user = self
            .users
            .create(NewUser {
                name,
                email,
                password_hash: hash_password(&dto.password)?,
                role: dto.role.into(),
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User registered");

        self.respond_with_token(user)
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .users
            .find_by_email(&normalize_email(&dto.email))
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&dto.password, &user.password_hash)? {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(invalid());
        }

        self.respond_with_token(user)
    }

    /// Revoke the token used for this request
    pub async fn logout(&self, user: &AuthenticatedUser) -> Result<()> {
        self.tokens.revoke(user).await?;
        tracing::info!(user_id = user.id, "User logged out");
        Ok(())
    }

    pub async fn current_user(&self, user: &AuthenticatedUser) -> Result<UserDto> {
        self.users
            .find_by_id(user.id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))
    }

    pub async fn update_profile(
        &self,
        user: &AuthenticatedUser,
        dto: UpdateProfileDto,
    ) -> Result<UserDto> {
        let current = self
            .users
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.id)))?;

        let name = match dto.name {
            Some(name) => required_text("name", &name, NAME_REQUIRED)?,
            None => current.name,
        };
        let email = dto
            .email
            .map(|e| normalize_email(&e))
            .unwrap_or(current.email);

        if self.users.email_taken(&email, Some(user.id)).await? {
            return Err(AppError::Conflict(
                "The email has already been taken.".to_string(),
            ));
        }

        let updated = self.users.update_profile(user.id, name, email).await?;
        Ok(updated.into())
    }

    /// Rotate the bearer token: issue a new one, then revoke the presented one
    pub async fn refresh(&self, user: &AuthenticatedUser) -> Result<AuthResponseDto> {
        let stored = self
            .users
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        let response = self.respond_with_token(stored)?;
        self.tokens.revoke(user).await?;
        Ok(response)
    }

    fn respond_with_token(&self, user: User) -> Result<AuthResponseDto> {
        let issued = self.tokens.issue(&user)?;
        Ok(AuthResponseDto {
            user: user.into(),
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_at: issued.expires_at,
        })
    }
}

const NAME_REQUIRED: &str = "The name field is required.";

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::dtos::RegisterRole;
    use crate::features::auth::model::UserRole;
    use crate::features::auth::repositories::MockUserRepository;
    use crate::features::auth::services::token_service::tests::{test_config, test_user};
    use mockall::predicate::{always, eq};

    fn service(repo: MockUserRepository) -> AuthService {
        let repo: Arc<dyn UserRepository> = Arc::new(repo);
        let tokens = Arc::new(TokenService::new(test_config(), repo.clone()));
        AuthService::new(repo, tokens)
    }

    fn session(user: &User) -> AuthenticatedUser {
        AuthenticatedUser {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            token_id: uuid::Uuid::new_v4(),
            token_expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("Secret123").unwrap();
        assert!(verify_password("Secret123", &hash).unwrap());
        assert!(!verify_password("secret123", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_register_creates_user_with_chosen_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_taken()
            .with(eq("dana@example.com"), eq(None))
            .returning(|_, _| Ok(false));
        repo.expect_create().returning(|new_user| {
            assert_eq!(new_user.role, UserRole::Organizer);
            assert_ne!(new_user.password_hash, "Secret123");
            let mut user = test_user(11, new_user.role);
            user.email = new_user.email;
            Ok(user)
        });

        let response = service(repo)
            .register(RegisterRequestDto {
                name: " Dana ".to_string(),
                email: "Dana@Example.com".to_string(),
                password: "Secret123".to_string(),
                password_confirmation: "Secret123".to_string(),
                role: RegisterRole::Organizer,
            })
            .await
            .unwrap();

        assert_eq!(response.user.id, 11);
        assert_eq!(response.token_type, "Bearer");
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut repo = MockUserRepository::new();
        repo.expect_email_taken().returning(|_, _| Ok(true));
        repo.expect_create().never();

        let err = service(repo)
            .register(RegisterRequestDto {
                name: "Dana".to_string(),
                email: "dana@example.com".to_string(),
                password: "Secret123".to_string(),
                password_confirmation: "Secret123".to_string(),
                role: RegisterRole::Public,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let mut stored = test_user(3, UserRole::Public);
        stored.password_hash = hash_password("Correct123").unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(stored.clone())));

        let svc = service(repo);

        let err = svc
            .login(LoginRequestDto {
                email: "dana@example.com".to_string(),
                password: "Wrong123".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let ok = svc
            .login(LoginRequestDto {
                email: "dana@example.com".to_string(),
                password: "Correct123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(ok.user.id, 3);
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_unauthorized() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let err = service(repo)
            .login(LoginRequestDto {
                email: "nobody@example.com".to_string(),
                password: "Whatever1".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_logout_revokes_presented_token() {
        let user = session(&test_user(5, UserRole::Public));
        let jti = user.token_id;

        let mut repo = MockUserRepository::new();
        repo.expect_revoke_token()
            .with(eq(jti), always())
            .times(1)
            .returning(|_, _| Ok(()));

        service(repo).logout(&user).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_issues_new_token_and_revokes_old() {
        let stored = test_user(8, UserRole::Organizer);
        let user = session(&stored);
        let old_jti = user.token_id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(8))
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_revoke_token()
            .with(eq(old_jti), always())
            .times(1)
            .returning(|_, _| Ok(()));

        let response = service(repo).refresh(&user).await.unwrap();
        assert_eq!(response.user.id, 8);
    }

    #[tokio::test]
    async fn test_update_profile_keeps_omitted_fields() {
        let stored = test_user(4, UserRole::Public);
        let user = session(&stored);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_email_taken()
            .with(eq("dana@example.com"), eq(Some(4)))
            .returning(|_, _| Ok(false));
        repo.expect_update_profile()
            .with(eq(4), eq("Renamed".to_string()), eq("dana@example.com".to_string()))
            .returning(|id, name, email| {
                let mut user = test_user(id, UserRole::Public);
                user.name = name;
                user.email = email;
                Ok(user)
            });

        let updated = service(repo)
            .update_profile(
                &user,
                UpdateProfileDto {
                    name: Some("Renamed".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_on_register_and_profile() {
        let stored = test_user(4, UserRole::Public);
        let user = session(&stored);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_email_taken().never();
        repo.expect_create().never();
        repo.expect_update_profile().never();
        let svc = service(repo);

        let err = svc
            .register(RegisterRequestDto {
                name: "   ".to_string(),
                email: "dana@example.com".to_string(),
                password: "Secret123".to_string(),
                password_confirmation: "Secret123".to_string(),
                role: RegisterRole::Public,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));

        let err = svc
            .update_profile(
                &user,
                UpdateProfileDto {
                    name: Some("  ".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidFields(_)));
    }

    #[tokio::test]
    async fn test_update_profile_email_taken_conflicts() {
        let stored = test_user(4, UserRole::Public);
        let user = session(&stored);

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_email_taken().returning(|_, _| Ok(true));
        repo.expect_update_profile().never();

        let err = service(repo)
            .update_profile(
                &user,
                UpdateProfileDto {
                    name: None,
                    email: Some("taken@example.com".to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
