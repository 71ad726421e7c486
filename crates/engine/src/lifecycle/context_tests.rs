// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use aim_core::ProjectId;

#[test]
fn clone_is_a_cheap_pointer_copy() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _fakes, _rx) = test_support::build(dir.path());
    let cloned = ctx.clone();
    assert!(Arc::ptr_eq(&ctx.0, &cloned.0));
}

#[tokio::test]
async fn emit_without_a_sink_is_a_silent_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let deps_dir = dir.path();
    let supervisor = aim_adapters::fakes::FakeSupervisor::new();
    let routing = aim_adapters::fakes::FakeRoutingController::new();
    let source = aim_adapters::fakes::FakeSourceManager::new();
    let projects = aim_adapters::fakes::FakeProjectsManager::new();
    let deployment_config = aim_adapters::fakes::FakeDeploymentConfig::new();

    let deps = LifecycleDeps::new(
        Arc::new(supervisor),
        Arc::new(routing),
        Arc::new(source),
        Arc::new(projects),
        Arc::new(deployment_config),
        SupervisorConfigWriter::new(deps_dir.join("conf"), deps_dir.join("pid")),
        LogRotationWriter::new(deps_dir.join("logrotate")),
        aim_core::BootstrapOptions {
            private_ip: "127.0.0.1".to_string(),
            login_ip: "appscale.example".to_string(),
            syslog_server: "127.0.0.1".to_string(),
            db_proxy: "127.0.0.1".to_string(),
            tq_proxy: "127.0.0.1".to_string(),
            uaserver_port: 4343,
            db_server_port: 8888,
            num_cpus: 2,
        },
        deps_dir.join("unpack"),
    );
    let ctx = LifecycleContext::new(deps);

    ctx.emit(LifecycleEvent::Registered { project_id: ProjectId::parse("myapp").unwrap(), port: 8080 });
}

#[tokio::test]
async fn emit_with_a_sink_delivers_the_event() {
    let dir = tempfile::tempdir().unwrap();
    let (ctx, _fakes, mut rx) = test_support::build(dir.path());

    let project_id = ProjectId::parse("myapp").unwrap();
    ctx.emit(LifecycleEvent::Registered { project_id: project_id.clone(), port: 8080 });

    let event = rx.recv().await.unwrap();
    assert_eq!(event, LifecycleEvent::Registered { project_id, port: 8080 });
}
