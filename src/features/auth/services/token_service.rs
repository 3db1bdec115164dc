use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims, User};
use crate::features::auth::repositories::UserRepository;

/// A freshly signed bearer token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Issues, validates and revokes HS256 bearer tokens
pub struct TokenService {
    config: AuthConfig,
    users: Arc<dyn UserRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(config: AuthConfig, users: Arc<dyn UserRepository>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            config,
            users,
            encoding_key,
            decoding_key,
        }
    }

    /// Sign a new token for the user
    pub fn issue(&self, user: &User) -> Result<IssuedToken> {
        let now = Utc::now();
        let ttl = Duration::from_std(self.config.token_ttl)
            .map_err(|e| AppError::Internal(format!("Invalid token TTL: {}", e)))?;
        let expires_at = now + ttl;
        let jti = Uuid::new_v4();

        let claims = Claims {
            sub: user.id.to_string(),
            jti: jti.to_string(),
            role: user.role,
            iss: self.config.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("Failed to sign token: {:?}", e);
                AppError::Internal("Failed to sign token".to_string())
            })?;

        Ok(IssuedToken {
            token,
            jti,
            expires_at,
        })
    }

    /// Decode and verify signature, issuer and expiry
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.leeway = self.config.jwt_leeway.as_secs();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    _ => AppError::Unauthorized("Invalid token".to_string()),
                }
            })
    }

    /// Resolve a bearer token into the caller it was issued to.
    ///
    /// The user is reloaded so role changes and deletions apply immediately.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser> {
        let claims = self.decode(token)?;

        let jti = Uuid::parse_str(&claims.jti)
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

        if self.users.is_token_revoked(jti).await? {
            return Err(AppError::Unauthorized("Token has been revoked".to_string()));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

        let token_expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

        Ok(AuthenticatedUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token_id: jti,
            token_expires_at,
        })
    }

    pub async fn revoke(&self, user: &AuthenticatedUser) -> Result<()> {
        self.users
            .revoke_token(user.token_id, user.token_expires_at)
            .await
    }
}
