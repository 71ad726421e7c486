// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn deserializes_from_projects_manager_shaped_json() {
    let json = r#"{
        "runtime": "python27",
        "revision": 3,
        "deployment": {"zip": {"sourceUrl": "gs://bucket/app.zip"}},
        "instanceClass": "F2"
    }"#;
    let details: VersionDetails = serde_json::from_str(json).unwrap();
    assert_eq!(details.runtime, Runtime::Python27);
    assert_eq!(details.revision, 3);
    assert_eq!(details.source_url(), "gs://bucket/app.zip");
    assert_eq!(details.instance_class.as_deref(), Some("F2"));
}

#[test]
fn instance_class_is_optional() {
    let json = r#"{
        "runtime": "go",
        "revision": 1,
        "deployment": {"zip": {"sourceUrl": "gs://bucket/app.zip"}}
    }"#;
    let details: VersionDetails = serde_json::from_str(json).unwrap();
    assert!(details.instance_class.is_none());
}
