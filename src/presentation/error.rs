use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::application::ports::RepositoryError;
use crate::application::services::{AuthError, CoachError, InterviewError, QuestionServiceError};

/// Single error surface for the HTTP boundary. Every service failure maps
/// onto the coarse taxonomy: 400 validation, 401/403 auth, 404 missing
/// document, 500 downstream failure with the upstream message relayed,
/// 503 store unreachable.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "Request failed");
        } else {
            tracing::debug!(status = %self.status, message = %self.message, "Request rejected");
        }

        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Unavailable(msg) => {
                Self::unavailable(format!("Store unavailable: {}", msg))
            }
            RepositoryError::NotFound(msg) => Self::not_found(msg),
            RepositoryError::ConstraintViolation(msg) => Self::bad_request(msg),
            RepositoryError::QueryFailed(msg) => {
                Self::internal(format!("Store query failed: {}", msg))
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::EmailTaken => Self::bad_request("Email already registered"),
            AuthError::InvalidCredentials => Self::unauthorized("Invalid email or password"),
            AuthError::InvalidToken => Self::unauthorized("Invalid or expired token"),
            AuthError::Hashing(msg) | AuthError::Token(msg) => Self::internal(msg),
            AuthError::Repository(e) => e.into(),
        }
    }
}

impl From<QuestionServiceError> for ApiError {
    fn from(e: QuestionServiceError) -> Self {
        match e {
            QuestionServiceError::NotFound => Self::not_found("Question not found"),
            QuestionServiceError::Completion(e) => {
                Self::internal(format!("AI request failed: {}", e))
            }
            QuestionServiceError::Malformed(e) => {
                Self::internal(format!("Failed to parse AI response: {}", e))
            }
            QuestionServiceError::Parse(msg) => {
                Self::internal(format!("Failed to parse AI response: {}", msg))
            }
            QuestionServiceError::Repository(e) => e.into(),
        }
    }
}

impl From<InterviewError> for ApiError {
    fn from(e: InterviewError) -> Self {
        match e {
            InterviewError::NotFound => Self::not_found("Session not found"),
            InterviewError::QuestionNotFound => Self::not_found("Question not found"),
            InterviewError::AlreadyCompleted => Self::bad_request("Session already completed"),
            InterviewError::Completion(e) => Self::internal(format!("AI request failed: {}", e)),
            InterviewError::Malformed(e) => {
                Self::internal(format!("Failed to parse AI response: {}", e))
            }
            InterviewError::Parse(msg) => {
                Self::internal(format!("Failed to parse AI response: {}", msg))
            }
            InterviewError::Repository(e) => e.into(),
        }
    }
}

impl From<CoachError> for ApiError {
    fn from(e: CoachError) -> Self {
        match e {
            CoachError::ProfileNotFound => Self::not_found("Coach profile not found"),
            CoachError::Completion(e) => Self::internal(format!("AI request failed: {}", e)),
            CoachError::Malformed(e) => {
                Self::internal(format!("Failed to parse AI response: {}", e))
            }
            CoachError::Parse(msg) => {
                Self::internal(format!("Failed to parse AI response: {}", msg))
            }
            CoachError::Repository(e) => e.into(),
        }
    }
}
