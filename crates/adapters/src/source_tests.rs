// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aim_core::{ProjectId, ServiceId, VersionId};
use std::collections::HashSet;
use std::io::Write;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn revision_key(revision: u64) -> RevisionKey {
    RevisionKey::new(
        &ProjectId::parse("myapp").unwrap(),
        &ServiceId::new("default"),
        &VersionId::new("v1"),
        revision,
    )
}

/// Builds a small in-memory zip archive with one nested file, for tests
/// that exercise real extraction without a fixture file on disk.
fn build_fixture_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    writer.add_directory("static", options).unwrap();
    writer.start_file("main.py", options).unwrap();
    writer.write_all(b"print('hello')").unwrap();
    writer.start_file("static/style.css", options).unwrap();
    writer.write_all(b"body {}").unwrap();
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn ensure_is_idempotent_when_app_dir_already_exists() {
    let unpack_root = tempfile::tempdir().unwrap();
    let key = revision_key(1);
    let app_dir = unpack_root.path().join(key.as_str()).join("app");
    std::fs::create_dir_all(&app_dir).unwrap();
    std::fs::write(app_dir.join("marker"), "present").unwrap();

    let client = SourceManagerHttpClient::new(unpack_root.path());
    let resolved = client.ensure(&key, "http://unused.invalid/app.zip", Runtime::Python27).await.unwrap();

    assert_eq!(resolved, app_dir);
    assert!(app_dir.join("marker").exists(), "pre-existing unpack must not be touched");
}

#[tokio::test]
async fn ensure_downloads_and_extracts_a_real_archive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(build_fixture_zip()))
        .mount(&server)
        .await;

    let unpack_root = tempfile::tempdir().unwrap();
    let key = revision_key(1);
    let client = SourceManagerHttpClient::new(unpack_root.path());

    let app_dir = client.ensure(&key, &format!("{}/app.zip", server.uri()), Runtime::Python27).await.unwrap();

    assert_eq!(std::fs::read_to_string(app_dir.join("main.py")).unwrap(), "print('hello')");
    assert_eq!(std::fs::read_to_string(app_dir.join("static/style.css")).unwrap(), "body {}");
}

#[test]
fn is_active_matches_exact_and_prefixed_hints() {
    let mut active = HashSet::new();
    active.insert("myapp".to_string());
    active.insert("other-default-v1-3".to_string());

    assert!(is_active("myapp-default-v1-1", &active));
    assert!(is_active("other-default-v1-3", &active));
    assert!(!is_active("unrelated-default-v1-1", &active));
    assert!(!is_active("myappbutnotreally-default-v1-1", &active));
}

#[tokio::test]
async fn clean_old_revisions_removes_only_inactive_trees() {
    let unpack_root = tempfile::tempdir().unwrap();
    let keep = revision_key(1);
    let drop = revision_key(2);
    std::fs::create_dir_all(unpack_root.path().join(keep.as_str()).join("app")).unwrap();
    std::fs::create_dir_all(unpack_root.path().join(drop.as_str()).join("app")).unwrap();

    let client = SourceManagerHttpClient::new(unpack_root.path());
    let mut active = HashSet::new();
    active.insert(keep.as_str().to_string());
    client.clean_old_revisions(&active).await.unwrap();

    assert!(unpack_root.path().join(keep.as_str()).exists());
    assert!(!unpack_root.path().join(drop.as_str()).exists());
}

#[tokio::test]
async fn clean_old_revisions_tolerates_missing_unpack_root() {
    let client = SourceManagerHttpClient::new("/nonexistent/unpack/root");
    client.clean_old_revisions(&HashSet::new()).await.unwrap();
}
