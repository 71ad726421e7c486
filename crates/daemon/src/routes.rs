// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP dispatcher: three routes over `LifecycleContext`, each
//! validating its path params eagerly and tracing a span per request.

use aim_core::{ProjectId, ServiceId, VersionId};
use aim_engine::LifecycleContext;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use crate::json::ValidatedJson;
use crate::respond::ApiError;
use crate::wire::StartRequest;

pub fn router(context: LifecycleContext) -> Router {
    Router::new()
        .route("/projects/:project_id", post(start))
        .route("/projects/:project_id", delete(stop_all))
        .route("/projects/:project_id/:port", delete(stop_one))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

async fn start(
    State(context): State<LifecycleContext>,
    Path(project_id): Path<String>,
    ValidatedJson(body): ValidatedJson<StartRequest>,
) -> Result<StatusCode, ApiError> {
    let project_id = ProjectId::parse(project_id).map_err(ApiError::from)?;
    let span = tracing::info_span!("start", project_id = project_id.as_str(), port = body.app_port);
    context
        .start(
            project_id,
            ServiceId::new(body.service_id),
            VersionId::new(body.version_id),
            body.app_port,
            body.env_vars,
        )
        .instrument(span)
        .await
        .map_err(ApiError::from)?;
    Ok(StatusCode::OK)
}

async fn stop_all(
    State(context): State<LifecycleContext>,
    Path(project_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let project_id = ProjectId::parse(project_id).map_err(ApiError::from)?;
    let span = tracing::info_span!("stop_all", project_id = project_id.as_str());
    context.stop_all(project_id).instrument(span).await.map_err(ApiError::from)?;
    Ok(StatusCode::OK)
}

async fn stop_one(
    State(context): State<LifecycleContext>,
    Path((project_id, port)): Path<(String, u16)>,
) -> Result<StatusCode, ApiError> {
    let project_id = ProjectId::parse(project_id).map_err(ApiError::from)?;
    let span = tracing::info_span!("stop_one", project_id = project_id.as_str(), port);
    context.stop_one(project_id, port).instrument(span).await.map_err(ApiError::from)?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
