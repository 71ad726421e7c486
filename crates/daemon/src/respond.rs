// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps `AimError` onto the HTTP status codes spec.md §7 assigns it. Kept
//! as a thin newtype rather than an `IntoResponse` impl on `AimError`
//! itself, since `aim-core` has no axum dependency.

use aim_core::AimError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::wire::ErrorResponse;

pub struct ApiError(pub AimError);

impl From<AimError> for ApiError {
    fn from(error: AimError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match status {
            StatusCode::INTERNAL_SERVER_ERROR => tracing::error!(error = %self.0, "request failed"),
            _ => tracing::warn!(error = %self.0, "request rejected"),
        }
        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}
