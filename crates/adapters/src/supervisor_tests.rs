// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aim_core::ProjectId;
use std::collections::BTreeMap;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn entry() -> EntryName {
    EntryName::new(ProjectId::parse("myapp").unwrap(), 8080)
}

#[tokio::test]
async fn unmonitor_returns_stopped_on_2xx() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/app___myapp-8080"))
        .and(query_param("action", "unmonitor"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = SupervisorHttpClient::new(server.uri());
    let outcome = client.unmonitor("app___myapp-8080").await.unwrap();
    assert_eq!(outcome, UnmonitorOutcome::Stopped);
}

#[tokio::test]
async fn unmonitor_returns_already_stopped_on_404() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = SupervisorHttpClient::new(server.uri());
    let outcome = client.unmonitor("app___myapp-8080").await.unwrap();
    assert_eq!(outcome, UnmonitorOutcome::AlreadyStopped);
}

#[tokio::test]
async fn unmonitor_retries_503_then_succeeds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(4)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = SupervisorHttpClient::new(server.uri());
    let outcome = client.unmonitor("app___myapp-8080").await.unwrap();
    assert_eq!(outcome, UnmonitorOutcome::Stopped);
}

#[tokio::test]
async fn unmonitor_promotes_to_failure_after_exhausting_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = SupervisorHttpClient::new(server.uri());
    let result = client.unmonitor("app___myapp-8080").await;
    assert!(matches!(result, Err(SupervisorError::TransientExhausted)));
}

#[test]
fn config_writer_creates_and_removes_single_entry() {
    let dir = tempfile::tempdir().unwrap();
    let pid_dir = tempfile::tempdir().unwrap();
    let writer = SupervisorConfigWriter::new(dir.path(), pid_dir.path());
    let entry = entry();
    let mut env = BTreeMap::new();
    env.insert("APPNAME".to_string(), "myapp".to_string());

    writer.create(&entry, "/usr/bin/python2 dev_appserver.py", 8080, &env, 300, "10.0.0.1", true).unwrap();
    assert!(writer.config_path(&entry).exists());

    writer.remove(&entry);
    assert!(!writer.config_path(&entry).exists());
}

#[test]
fn config_writer_removes_whole_group() {
    let dir = tempfile::tempdir().unwrap();
    let pid_dir = tempfile::tempdir().unwrap();
    let writer = SupervisorConfigWriter::new(dir.path(), pid_dir.path());
    let project = ProjectId::parse("myapp").unwrap();
    let env = BTreeMap::new();

    for port in [8080, 8081] {
        let entry = EntryName::new(project.clone(), port);
        writer.create(&entry, "cmd", port, &env, 300, "10.0.0.1", true).unwrap();
    }
    // An unrelated config file must survive the group removal.
    std::fs::write(dir.path().join("appscale-app___other-9090.cfg"), "x").unwrap();

    let removed = writer.remove_group(&project);
    assert_eq!(removed.len(), 2);
    assert!(dir.path().join("appscale-app___other-9090.cfg").exists());
}

#[test]
fn render_is_deterministic_and_includes_env_and_memory() {
    let entry = entry();
    let mut env = BTreeMap::new();
    env.insert("APPNAME".to_string(), "myapp".to_string());
    let rendered = SupervisorConfigWriter::render(
        &entry,
        "/usr/bin/python2 dev_appserver.py --port 8080",
        std::path::Path::new("/var/run/appscale/app___myapp-8080.pid"),
        8080,
        &env,
        300,
        "10.0.0.1",
        true,
    );
    assert!(rendered.contains("check process app___myapp-8080"));
    assert!(rendered.contains("limit memory 300MB"));
    assert!(rendered.contains("env APPNAME=myapp"));
    assert!(rendered.contains("group app___myapp"));
    assert!(rendered.contains("if failed port 8080 then restart"));
}

#[test]
fn read_pid_parses_integer_contents() {
    let dir = tempfile::tempdir().unwrap();
    let pid_dir = tempfile::tempdir().unwrap();
    let writer = SupervisorConfigWriter::new(dir.path(), pid_dir.path());
    let entry = entry();
    std::fs::write(writer.pid_path(&entry), "1234\n").unwrap();
    assert_eq!(writer.read_pid(&entry).unwrap(), 1234);
}
