//! HTTP route handlers

pub mod alerts;
pub mod health;
pub mod locations;
pub mod readings;
pub mod stats;

use axum::http::{Method, Uri};

use crate::api::error::ApiError;

/// Fallback for unknown paths
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}

/// Fallback for known paths requested with an unsupported method
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed(format!("{method} not allowed for {}", uri.path()))
}
