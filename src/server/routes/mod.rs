mod auth;
mod quiz;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::htmx::navigate;
use crate::quiz::QuizError;

pub use auth::auth_router;
pub use quiz::quiz_router;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),

    #[error(transparent)]
    Quiz(#[from] QuizError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // the quiz is gone (restarted elsewhere, or never started): reload the page
            AppError::Quiz(QuizError::NoQuiz) => navigate(true, "/quiz"),
            AppError::Quiz(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
            AppError::Render(err) => {
                tracing::error!("Template error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
            }
        }
    }
}

pub type ApiResponse<T> = Result<T, AppError>;
