// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn write_snapshot(path: &std::path::Path) {
    std::fs::write(
        path,
        serde_json::json!({
            "myapp": {
                "default": {
                    "v1": {
                        "runtime": "python27",
                        "revision": 3,
                        "deployment": {"zip": {"sourceUrl": "https://example.invalid/app.zip"}},
                    }
                }
            }
        })
        .to_string(),
    )
    .unwrap();
}

#[tokio::test]
async fn version_details_returns_unknown_version_before_first_refresh() {
    let file = tempfile::NamedTempFile::new().unwrap();
    write_snapshot(file.path());
    let manager = PollingProjectsManager::new(file.path());

    let result = manager
        .version_details(
            &ProjectId::parse("myapp").unwrap(),
            &ServiceId::new("default"),
            &VersionId::new("v1"),
        )
        .await;
    assert!(matches!(result, Err(ProjectsManagerError::UnknownVersion { .. })));
}

#[tokio::test]
async fn refresh_populates_cache_and_version_details_succeeds() {
    let file = tempfile::NamedTempFile::new().unwrap();
    write_snapshot(file.path());
    let manager = PollingProjectsManager::new(file.path());
    manager.refresh().unwrap();

    let details = manager
        .version_details(
            &ProjectId::parse("myapp").unwrap(),
            &ServiceId::new("default"),
            &VersionId::new("v1"),
        )
        .await
        .unwrap();
    assert_eq!(details.revision, 3);
    assert_eq!(details.source_url(), "https://example.invalid/app.zip");
}

#[tokio::test]
async fn snapshot_reflects_whole_tree() {
    let file = tempfile::NamedTempFile::new().unwrap();
    write_snapshot(file.path());
    let manager = PollingProjectsManager::new(file.path());
    manager.refresh().unwrap();

    let snapshot = manager.snapshot().await.unwrap();
    assert!(snapshot.contains_key("myapp"));
    assert!(snapshot["myapp"].contains_key("default"));
    assert!(snapshot["myapp"]["default"].contains_key("v1"));
}
