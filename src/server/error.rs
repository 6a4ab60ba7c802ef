use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::item::ItemError;

/// Maps a domain error to its HTTP status and a stable machine-readable code.
pub trait ToErrorCode {
    fn status_and_code(&self) -> (StatusCode, &'static str);
}

impl ToErrorCode for ItemError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NameRequired => (StatusCode::BAD_REQUEST, "NAME_REQUIRED"),
            Self::NameTooLong { .. } => (StatusCode::BAD_REQUEST, "NAME_TOO_LONG"),
            Self::DuplicateName => (StatusCode::BAD_REQUEST, "DUPLICATE_NAME"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND"),
            Self::AlreadyVoted(_) => (StatusCode::BAD_REQUEST, "ALREADY_VOTED"),
            Self::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
        }
    }
}

/// Error returned from a handler, rendered as `{ok: false, error, code}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Item(#[from] ItemError),

    /// The path segment was not an item id at all.
    #[error("Item not found: {0}")]
    InvalidId(String),
}

impl ToErrorCode for ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Item(err) => err.status_and_code(),
            Self::InvalidId(_) => (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND"),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status.is_server_error() {
            error!(code, "Request failed: {self}");
            "Internal storage error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorBody {
            ok: false,
            error: message,
            code,
        };
        (status, Json(body)).into_response()
    }
}
