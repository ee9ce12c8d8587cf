use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::responses::ErrorMessage;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),
    #[error("Access denied. You are not a member of this group.")]
    AccessDenied,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("Invalid token")]
    JWTError(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    JsonRejection(#[from] JsonRejection),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn custom_internal(message: &str) -> Self {
        Self::Internal(message.to_owned())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) | Self::JWTError(_) => StatusCode::UNAUTHORIZED,
            Self::AccessDenied | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) | Self::JsonRejection(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Storage details stay in the logs.
            Self::Internal(_) => "Internal server error".to_owned(),
            other => other.to_string(),
        };
        (status, Json(ErrorMessage::new(message))).into_response()
    }
}

#[macro_export]
macro_rules! log_and_wrap_custom_internal {
    ($e:expr) => {{
        tracing::error!(error = ?$e);
        $crate::errors::AppError::custom_internal(&$e.to_string())
    }};
}
