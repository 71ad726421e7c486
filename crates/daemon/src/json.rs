// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A `Json` extractor that reports malformed or incomplete request bodies
//! as `AimError::BadConfiguration` (HTTP 400) instead of axum's default
//! `JsonRejection` (422).

use aim_core::AimError;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::respond::ApiError;

pub struct ValidatedJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError(AimError::BadConfiguration(rejection.body_text())))?;
        Ok(Self(value))
    }
}
