use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;

use crate::editor::EditorError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("Not found")]
    NotFound,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            AppError::Editor(e) if e.is_validation() => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            // The cause was logged when the editor saw it; users get the
            // generic message only.
            AppError::Editor(EditorError::SubmissionFailed) => (
                StatusCode::BAD_GATEWAY,
                EditorError::SubmissionFailed.to_string(),
            ),
            AppError::Editor(e) => (StatusCode::CONFLICT, e.to_string()),
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: error_message,
        });

        (status, body).into_response()
    }
}
