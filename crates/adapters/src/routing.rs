// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for the cluster routing controller.

use aim_core::ProjectId;
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingControllerError {
    #[error("routing controller request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("routing controller returned unexpected status {0}")]
    UnexpectedStatus(u16),

    #[error("routing controller returned unrecognized status string {0:?}")]
    UnrecognizedStatus(String),
}

/// Outcome of a single `register` call. `NotReady` is a first-class
/// result, not an error — the caller (`InstanceLifecycle`) retries it
/// indefinitely rather than treating it as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingResult {
    Ok,
    NotReady,
}

/// The cluster component that maps project traffic to `(host, port)` pairs.
#[async_trait]
pub trait RoutingController: Send + Sync {
    async fn register(
        &self,
        project_id: &ProjectId,
        ip: &str,
        port: u16,
    ) -> Result<RoutingResult, RoutingControllerError>;
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    status: String,
}

pub struct RoutingHttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl RoutingHttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), client: reqwest::Client::new() }
    }
}

#[async_trait]
impl RoutingController for RoutingHttpClient {
    async fn register(
        &self,
        project_id: &ProjectId,
        ip: &str,
        port: u16,
    ) -> Result<RoutingResult, RoutingControllerError> {
        let url = format!("{}/routing", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "project_id": project_id.as_str(),
                "ip": ip,
                "port": port,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RoutingControllerError::UnexpectedStatus(response.status().as_u16()));
        }

        let body: RegisterResponse = response.json().await?;
        match body.status.as_str() {
            "OK" => Ok(RoutingResult::Ok),
            "NOT_READY" => Ok(RoutingResult::NotReady),
            other => Err(RoutingControllerError::UnrecognizedStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;
