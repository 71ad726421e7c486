// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_supervisor_records_start_and_stop_calls() {
    let supervisor = FakeSupervisor::new();
    supervisor.start("app___myapp-8080", false).await.unwrap();
    supervisor.stop_group("app___myapp").await.unwrap();

    assert_eq!(supervisor.started(), vec![("app___myapp-8080".to_string(), false)]);
    assert_eq!(supervisor.stopped_groups(), vec!["app___myapp".to_string()]);
}

#[tokio::test]
async fn fake_supervisor_can_be_configured_to_fail_unmonitor_once() {
    let supervisor = FakeSupervisor::new();
    supervisor.fail_unmonitor_transient();
    let first = supervisor.unmonitor("app___myapp-8080").await;
    assert!(matches!(first, Err(SupervisorError::TransientExhausted)));

    let second = supervisor.unmonitor("app___myapp-8080").await.unwrap();
    assert_eq!(second, UnmonitorOutcome::Stopped);
}

#[tokio::test]
async fn fake_routing_controller_defaults_to_ok_and_records_calls() {
    let routing = FakeRoutingController::new();
    let project = ProjectId::parse("myapp").unwrap();
    let result = routing.register(&project, "10.0.0.1", 8080).await.unwrap();

    assert_eq!(result, RoutingResult::Ok);
    assert_eq!(routing.calls(), vec![("myapp".to_string(), "10.0.0.1".to_string(), 8080)]);
}

#[tokio::test]
async fn fake_routing_controller_honors_per_port_override() {
    let routing = FakeRoutingController::new();
    routing.set_result_for("myapp", 8080, RoutingResult::NotReady);
    let project = ProjectId::parse("myapp").unwrap();

    let result = routing.register(&project, "10.0.0.1", 8080).await.unwrap();
    assert_eq!(result, RoutingResult::NotReady);
}

#[tokio::test]
async fn fake_source_manager_records_ensure_and_clean_calls() {
    let source = FakeSourceManager::new();
    let key = RevisionKey::new(
        &ProjectId::parse("myapp").unwrap(),
        &ServiceId::new("default"),
        &VersionId::new("v1"),
        1,
    );
    source.ensure(&key, "https://example.invalid/app.zip", Runtime::Python27).await.unwrap();
    source.clean_old_revisions(&HashSet::from(["myapp-default-v1-1".to_string()])).await.unwrap();

    assert_eq!(source.ensure_calls(), vec!["myapp-default-v1-1".to_string()]);
    assert_eq!(source.clean_calls().len(), 1);
}

#[tokio::test]
async fn fake_projects_manager_round_trips_inserted_versions() {
    let projects = FakeProjectsManager::new();
    let details = VersionDetails {
        runtime: Runtime::Python27,
        revision: 1,
        deployment: aim_core::Deployment {
            zip: aim_core::DeploymentZip { source_url: "https://example.invalid/app.zip".to_string() },
        },
        instance_class: None,
    };
    projects.insert("myapp", "default", "v1", details.clone());

    let fetched = projects
        .version_details(&ProjectId::parse("myapp").unwrap(), &ServiceId::new("default"), &VersionId::new("v1"))
        .await
        .unwrap();
    assert_eq!(fetched, details);
}

#[test]
fn fake_deployment_config_defaults_match_standard_table() {
    let config = FakeDeploymentConfig::new();
    assert_eq!(config.default_max_memory(), aim_core::DEFAULT_MAX_MEMORY_MB);
    assert_eq!(config.instance_classes().max_memory(Some("F1"), 999), 128);
}
