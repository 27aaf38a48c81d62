use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use crate::pages;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("draw not found")]
    NotFound,

    #[error("invalid username or password")]
    AuthFailure,

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidInput(message) => {
                (StatusCode::BAD_REQUEST, Html(pages::error_page(&message))).into_response()
            }
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Html(pages::not_found_page())).into_response()
            }
            AppError::AuthFailure => (
                StatusCode::UNAUTHORIZED,
                Html(pages::login_page(Some("Invalid username or password"))),
            )
                .into_response(),
            AppError::Storage(error) => {
                warn!("storage failure: {error}");
                server_failure()
            }
            AppError::Internal(error) => {
                warn!("internal error: {error}");
                server_failure()
            }
        }
    }
}

fn server_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(pages::error_page("Something went wrong, please try again")),
    )
        .into_response()
}
