//! Envelope helpers for handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use contara_core::engine::EngineError;
use contara_shared::envelope::ApiResponse;
use contara_shared::types::PageResponse;

/// Wraps an engine result into the uniform envelope with the given
/// success status. Server-side failures are logged here so handlers do
/// not repeat it.
pub fn respond<T: Serialize>(success: StatusCode, result: Result<T, EngineError>) -> Response {
    match result {
        Ok(data) => (success, Json(ApiResponse::ok(data))).into_response(),
        Err(err) => error_response(&err),
    }
}

/// Shorthand for `respond(StatusCode::OK, ...)`.
pub fn respond_ok<T: Serialize>(result: Result<T, EngineError>) -> Response {
    respond(StatusCode::OK, result)
}

/// Wraps a paginated engine result.
pub fn respond_paginated<T: Serialize>(
    result: Result<PageResponse<T>, EngineError>,
) -> Response {
    match result {
        Ok(PageResponse { data, meta }) => (
            StatusCode::OK,
            Json(ApiResponse::ok_paginated(data, meta.into())),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// Maps an engine error into the envelope with its HTTP status.
pub fn error_response(err: &EngineError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = %err, "Engine operation failed");
    }
    let body: ApiResponse<serde_json::Value> = ApiResponse::error(err.error_code(), err.to_string());
    (status, Json(body)).into_response()
}
