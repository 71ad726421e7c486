// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Clone, Copy, Default)]
struct ImmediateSleeper;

#[async_trait]
impl Sleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

fn host_and_port(uri: &str) -> (String, u16) {
    let without_scheme = uri.trim_start_matches("http://");
    let (host, port) = without_scheme.split_once(':').unwrap();
    (host.to_string(), port.trim_end_matches('/').parse().unwrap())
}

#[tokio::test]
async fn wait_returns_true_on_first_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/_ah/health_check"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let (host, port) = host_and_port(&server.uri());

    let probe = HealthProbe::with_sleeper(ImmediateSleeper);
    let ok = probe
        .wait(&host, port, "/_ah/health_check", Duration::from_millis(50), Duration::from_millis(1))
        .await;
    assert!(ok);
}

#[tokio::test]
async fn wait_treats_3xx_as_alive_without_following_redirect() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/elsewhere"))
        .mount(&server)
        .await;
    let (host, port) = host_and_port(&server.uri());

    let probe = HealthProbe::with_sleeper(ImmediateSleeper);
    let ok = probe.wait(&host, port, "/_ah/health_check", Duration::from_millis(50), Duration::from_millis(1)).await;
    assert!(ok);
}

#[tokio::test]
async fn wait_returns_false_after_exhausting_timeout() {
    // No mock registered: every request errors, which must count down the
    // budget rather than panic or hang.
    let probe = HealthProbe::with_sleeper(ImmediateSleeper);
    let ok = probe
        .wait("127.0.0.1", 1, "/_ah/health_check", Duration::from_millis(20), Duration::from_millis(1))
        .await;
    assert!(!ok);
}
