use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::application::ports::{RepositoryError, UserRepository};
use crate::domain::{User, UserId, UserRole};

/// Bearer-token claims. `role` rides inside the token so admin routes can be
/// gated without a store read.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self {
            users,
            jwt_secret,
            token_ttl_hours,
        }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(String, User), AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        let user = User::new(email.to_string(), name.to_string(), password_hash);

        // The unique index still backstops the pre-check under a race.
        match self.users.create(&user).await {
            Ok(()) => {}
            Err(RepositoryError::ConstraintViolation(_)) => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        }

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok((token, user))
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AuthError> {
        let Some(mut user) = self.users.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        self.users.record_login(user.id, now).await?;
        user.last_login_at = Some(now);

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok((token, user))
    }

    pub async fn profile(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn update_profile(
        &self,
        id: UserId,
        name: Option<String>,
        profile: Option<serde_json::Value>,
    ) -> Result<Option<User>, AuthError> {
        Ok(self.users.update_profile(id, name, profile).await?)
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_ttl_hours);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| AuthError::Token(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token encoding failed: {0}")]
    Token(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
