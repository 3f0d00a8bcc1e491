use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::services::AuthService;
use crate::domain::{UserId, UserRole};
use crate::presentation::error::ApiError;

/// Verified identity attached to the request after token validation. `role`
/// comes from the token claim, not a store read.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

/// Validates the bearer token and attaches `CurrentUser` to the request
/// extensions.
pub async fn auth_middleware(
    State(auth): State<Arc<AuthService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(ApiError::unauthorized("Missing bearer token"));
    };

    let claims = auth
        .verify_token(token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    let id = UserId::parse(&claims.sub)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    req.extensions_mut().insert(CurrentUser {
        id,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Gate for admin-only routes. Runs after `auth_middleware`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<CurrentUser>() {
        Some(user) if user.role == UserRole::Admin => Ok(next.run(req).await),
        Some(_) => Err(ApiError::forbidden("Administrator role required")),
        None => Err(ApiError::unauthorized("Missing bearer token")),
    }
}
