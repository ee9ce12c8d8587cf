use axum::{
    extract::FromRequest,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};

use crate::errors::AppError;

pub type AppResult<T> = std::result::Result<Json<T>, AppError>;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl<T> IntoResponse for AppJson<T>
where
    axum::Json<T>: IntoResponse,
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize, ToResponse, ToSchema)]
pub struct ErrorMessage {
    #[schema(example = "Access denied. You are not a member of this group.")]
    pub error: String,
}

impl ErrorMessage {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}
