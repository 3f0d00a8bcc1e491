use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::ports::LlmClient;
use crate::domain::{User, UserRole};
use crate::presentation::error::ApiError;
use crate::presentation::middleware::CurrentUser;
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub profile: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserBody,
}

/// Wire shape of a user document. The key is called `uid` on the wire.
#[derive(Serialize)]
pub struct UserBody {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub profile: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            uid: user.id.to_string(),
            email: user.email,
            name: user.name,
            role: user.role,
            profile: user.profile,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn register_handler<L>(
    State(state): State<AppState<L>>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError>
where
    L: LlmClient + 'static,
{
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(ApiError::bad_request("A valid email is required"));
    }
    if request.password.is_empty() {
        return Err(ApiError::bad_request("Password is required"));
    }
    if request.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }

    let (token, user) = state
        .auth_service
        .register(request.email.trim(), &request.password, request.name.trim())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

#[tracing::instrument(skip(state, request))]
pub async fn login_handler<L>(
    State(state): State<AppState<L>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError>
where
    L: LlmClient + 'static,
{
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }

    let (token, user) = state
        .auth_service
        .login(request.email.trim(), &request.password)
        .await?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[tracing::instrument(skip(state, current))]
pub async fn get_profile_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<UserBody>, ApiError>
where
    L: LlmClient + 'static,
{
    let user = state
        .auth_service
        .profile(current.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user.into()))
}

#[tracing::instrument(skip(state, current, request))]
pub async fn update_profile_handler<L>(
    State(state): State<AppState<L>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserBody>, ApiError>
where
    L: LlmClient + 'static,
{
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(ApiError::bad_request("Name cannot be empty"));
        }
    }

    let user = state
        .auth_service
        .update_profile(current.id, request.name, request.profile)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user.into()))
}
