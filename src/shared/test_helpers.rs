#[cfg(test)]
use crate::features::auth::model::{AuthenticatedUser, UserRole};

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub fn test_user(id: i64, role: UserRole) -> AuthenticatedUser {
    AuthenticatedUser {
        id,
        name: format!("Test {} {}", role, id),
        email: format!("{}{}@example.com", role, id),
        role,
        token_id: uuid::Uuid::new_v4(),
        token_expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
    }
}

#[cfg(test)]
pub fn admin_user(id: i64) -> AuthenticatedUser {
    test_user(id, UserRole::Admin)
}

#[cfg(test)]
pub fn organizer_user(id: i64) -> AuthenticatedUser {
    test_user(id, UserRole::Organizer)
}

#[cfg(test)]
pub fn public_user(id: i64) -> AuthenticatedUser {
    test_user(id, UserRole::Public)
}

/// Wrap a router so every request carries `user`, standing in for
/// `auth_middleware` with a valid token.
#[cfg(test)]
pub fn with_user(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}
