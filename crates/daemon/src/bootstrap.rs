// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires concrete, reqwest/file-backed collaborators into a
//! `LifecycleContext`. The only place in this crate that knows about
//! concrete adapter types — everything downstream depends on traits.

use std::sync::Arc;
use std::time::Duration;

use aim_adapters::{
    FileDeploymentConfig, PollingProjectsManager, RoutingHttpClient, SourceManagerHttpClient,
    SupervisorConfigWriter, SupervisorHttpClient,
};
use aim_core::BootstrapOptions;
use aim_engine::{LifecycleContext, LifecycleDeps};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to load deployment config: {0}")]
    DeploymentConfig(#[from] aim_adapters::DeploymentConfigError),
}

pub fn build(config: &Config) -> Result<LifecycleContext, BootstrapError> {
    let options = BootstrapOptions {
        private_ip: config.private_ip.clone(),
        login_ip: config.login_ip.clone(),
        syslog_server: config.syslog_server.clone(),
        db_proxy: config.db_proxy.clone(),
        tq_proxy: config.tq_proxy.clone(),
        uaserver_port: config.uaserver_port,
        db_server_port: config.db_server_port,
        num_cpus: config.num_cpus.unwrap_or_else(num_cpus_available),
    };

    let supervisor = Arc::new(SupervisorHttpClient::new(config.supervisor_url.clone()));
    let routing = Arc::new(RoutingHttpClient::new(config.routing_url.clone()));
    let source = Arc::new(SourceManagerHttpClient::new(config.unpack_root.clone()));

    let projects = Arc::new(PollingProjectsManager::new(config.projects_file.clone()));
    projects.clone().spawn_refresh_loop(Duration::from_secs(config.projects_refresh_secs));

    let deployment_config = Arc::new(FileDeploymentConfig::load(config.deployment_config.clone())?);

    let config_writer = SupervisorConfigWriter::new(config.supervisor_conf_dir.clone(), config.pid_dir.clone());
    let logrotate = aim_engine::LogRotationWriter::new(config.logrotate_dir.clone());

    let deps = LifecycleDeps::new(
        supervisor,
        routing,
        source,
        projects,
        deployment_config,
        config_writer,
        logrotate,
        options,
        config.unpack_root.clone(),
    );

    Ok(LifecycleContext::new(deps))
}

fn num_cpus_available() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
