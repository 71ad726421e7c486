// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn dashboard_gets_larger_log_budget() {
    assert_eq!(log_size_for(&ProjectId::parse("appscaledashboard").unwrap()), DASHBOARD_LOG_SIZE_BYTES);
    assert_eq!(log_size_for(&ProjectId::parse("myapp").unwrap()), APP_LOG_SIZE_BYTES);
}

#[test]
fn render_matches_expected_rotation_rule() {
    let rendered = LogRotationWriter::render("app___myapp", APP_LOG_SIZE_BYTES);
    assert!(rendered.starts_with("/var/log/appscale/app___myapp*.log {"));
    assert!(rendered.contains("  size 10485760\n"));
    assert!(rendered.contains("  rotate 7\n"));
    assert!(rendered.contains("  copytruncate\n"));
}

#[test]
fn install_then_remove_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let writer = LogRotationWriter::new(dir.path());
    let project = ProjectId::parse("myapp").unwrap();

    writer.install(&project, "app___myapp", APP_LOG_SIZE_BYTES).unwrap();
    assert!(writer.config_path(&project).exists());

    writer.remove(&project);
    assert!(!writer.config_path(&project).exists());
}

#[test]
fn remove_is_best_effort_when_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let writer = LogRotationWriter::new(dir.path());
    writer.remove(&ProjectId::parse("myapp").unwrap());
}
