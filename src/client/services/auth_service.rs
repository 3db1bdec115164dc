use std::sync::Arc;

use async_trait::async_trait;

use crate::client::api_client::ApiClient;
use crate::client::error::ClientResult;
use crate::client::models::{
    LoginCredentials, ProfileUpdate, Registration, Session, User, WireAuth, WireUser,
};
use crate::client::normalize::{normalize_session, normalize_user};
use crate::client::services::{require_data, Reply};

/// Account endpoints. Token storage is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: LoginCredentials) -> ClientResult<Reply<Session>>;
    async fn register(&self, registration: Registration) -> ClientResult<Reply<Session>>;
    async fn logout(&self) -> ClientResult<Option<String>>;
    async fn current_user(&self) -> ClientResult<User>;
    async fn update_profile(&self, update: ProfileUpdate) -> ClientResult<Reply<User>>;
    async fn refresh(&self) -> ClientResult<Reply<Session>>;
}

pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

fn session(reply: Reply<WireAuth>) -> Reply<Session> {
    Reply {
        data: normalize_session(reply.data),
        message: reply.message,
    }
}

#[async_trait]
impl AuthGateway for AuthService {
    async fn login(&self, credentials: LoginCredentials) -> ClientResult<Reply<Session>> {
        let response = self
            .api
            .post::<_, WireAuth>("/login", Some(&credentials))
            .await?;
        require_data(response).map(session)
    }

    async fn register(&self, registration: Registration) -> ClientResult<Reply<Session>> {
        let response = self
            .api
            .post::<_, WireAuth>("/register", Some(&registration))
            .await?;
        require_data(response).map(session)
    }

    async fn logout(&self) -> ClientResult<Option<String>> {
        let response = self
            .api
            .post::<(), serde_json::Value>("/logout", None)
            .await?;
        Ok(response.message)
    }

    async fn current_user(&self) -> ClientResult<User> {
        let response = self.api.get::<WireUser>("/user", &[]).await?;
        Ok(normalize_user(require_data(response)?.data))
    }

    async fn update_profile(&self, update: ProfileUpdate) -> ClientResult<Reply<User>> {
        let response = self.api.put::<_, WireUser>("/profile", &update).await?;
        let reply = require_data(response)?;
        Ok(Reply {
            data: normalize_user(reply.data),
            message: reply.message,
        })
    }

    async fn refresh(&self) -> ClientResult<Reply<Session>> {
        let response = self
            .api
            .post::<(), WireAuth>("/refresh", None)
            .await?;
        require_data(response).map(session)
    }
}
