// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded HTTP polling for a freshly started instance.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;

/// Wait ~180s by default (`START_APP_TIMEOUT` in the original AppManager).
pub const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_secs(180);
/// Default backoff between probes (`BACKOFF_TIME`).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Injectable sleep so `HealthProbe` tests never wait on real wall-clock
/// time for the full 180s budget.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Lets a type-erased `Arc<dyn Sleeper>` stand in anywhere a concrete
/// `Sleeper` is expected — `LifecycleContext` shares one sleeper between
/// `HealthProbe` and its own background reaper/routing-retry loops without
/// becoming generic itself.
#[async_trait]
impl Sleeper for std::sync::Arc<dyn Sleeper> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

/// Polls `http://host:port/path` until a 2xx/3xx response or the timeout
/// elapses. Redirects are never followed — a 3xx response itself is
/// evidence the server is alive, following it would just chase the
/// location, not check liveness.
pub struct HealthProbe<S: Sleeper = TokioSleeper> {
    client: reqwest::Client,
    sleeper: S,
}

impl HealthProbe<TokioSleeper> {
    pub fn new() -> Self {
        Self::with_sleeper(TokioSleeper)
    }
}

impl Default for HealthProbe<TokioSleeper> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Sleeper> HealthProbe<S> {
    pub fn with_sleeper(sleeper: S) -> Self {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, sleeper }
    }

    /// Returns `true` on the first 2xx/3xx response seen within
    /// `total_timeout`, sleeping `interval` between attempts; never raises.
    pub async fn wait(&self, host: &str, port: u16, path: &str, total_timeout: Duration, interval: Duration) -> bool {
        let url = format!("http://{host}:{port}{path}");
        let deadline = tokio::time::Instant::now() + total_timeout;

        loop {
            match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() || response.status().is_redirection() => {
                    return true;
                }
                Ok(response) => {
                    tracing::debug!(%url, status = %response.status(), "health probe not yet ready");
                }
                Err(error) => {
                    tracing::debug!(%url, %error, "health probe request failed");
                }
            }

            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(%url, "health probe exhausted its timeout budget");
                return false;
            }
            self.sleeper.sleep(interval).await;
        }
    }
}

#[cfg(test)]
#[path = "health_probe_tests.rs"]
mod tests;
