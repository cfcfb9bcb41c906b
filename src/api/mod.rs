//! REST API module.
//!
//! Thin handlers over the stores. Every endpoint answers with the same
//! envelope: `{success: true, data}` or the error envelope from `errors`.

mod config;
mod data;
mod git;
mod media;
mod posts;

pub use config::*;
pub use data::*;
pub use git::*;
pub use media::*;
pub use posts::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::CollectionKind;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Resolve the `:type` path segment of the data endpoints.
fn collection_kind(name: &str) -> Result<CollectionKind, AppError> {
    CollectionKind::parse(name).ok_or_else(|| {
        AppError::Validation(format!(
            "Unknown collection type \"{}\" (expected projects, skills or timeline)",
            name
        ))
    })
}
