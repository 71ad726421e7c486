// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI/environment configuration. Every flag can also be set via the
//! matching `AIM_*` environment variable (`clap`'s `env` feature), since
//! this daemon is started by the node's init system, not typed by hand.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "aimd", about = "Application Instance Manager daemon")]
pub struct Config {
    /// Port the HTTP dispatcher binds to (`APP_MANAGER_PORT`).
    #[arg(long, env = "AIM_PORT", default_value_t = 17447)]
    pub port: u16,

    /// This node's private IP.
    #[arg(long, env = "AIM_PRIVATE_IP")]
    pub private_ip: String,

    /// The deployment's public/login IP.
    #[arg(long, env = "AIM_LOGIN_IP")]
    pub login_ip: String,

    /// Syslog target for supervisor config files.
    #[arg(long, env = "AIM_SYSLOG_SERVER")]
    pub syslog_server: String,

    /// `host:port` of the datastore/UserAppServer proxy.
    #[arg(long, env = "AIM_DB_PROXY")]
    pub db_proxy: String,

    /// `host:port` of the taskqueue proxy (Java only).
    #[arg(long, env = "AIM_TQ_PROXY")]
    pub tq_proxy: String,

    #[arg(long, env = "AIM_UASERVER_PORT", default_value_t = 4343)]
    pub uaserver_port: u16,

    #[arg(long, env = "AIM_DB_SERVER_PORT", default_value_t = 8888)]
    pub db_server_port: u16,

    /// Defaults to the machine's available parallelism.
    #[arg(long, env = "AIM_NUM_CPUS")]
    pub num_cpus: Option<usize>,

    /// Base URL of the Monit-compatible supervisor HTTP API.
    #[arg(long, env = "AIM_SUPERVISOR_URL")]
    pub supervisor_url: String,

    #[arg(long, env = "AIM_SUPERVISOR_CONF_DIR")]
    pub supervisor_conf_dir: PathBuf,

    #[arg(long, env = "AIM_PID_DIR")]
    pub pid_dir: PathBuf,

    #[arg(long, env = "AIM_LOGROTATE_DIR")]
    pub logrotate_dir: PathBuf,

    #[arg(long, env = "AIM_UNPACK_ROOT")]
    pub unpack_root: PathBuf,

    /// Base URL of the routing controller.
    #[arg(long, env = "AIM_ROUTING_URL")]
    pub routing_url: String,

    /// JSON file polled for the `projectId -> serviceId -> versionId`
    /// mapping (stands in for the coordination-service watch).
    #[arg(long, env = "AIM_PROJECTS_FILE")]
    pub projects_file: PathBuf,

    /// How often the projects snapshot is refreshed from disk.
    #[arg(long, env = "AIM_PROJECTS_REFRESH_SECS", default_value_t = 10)]
    pub projects_refresh_secs: u64,

    /// TOML file with the instance-class memory table and GCS settings.
    #[arg(long, env = "AIM_DEPLOYMENT_CONFIG")]
    pub deployment_config: PathBuf,

    /// Optional directory for rotating file logs, in addition to stdout.
    #[arg(long, env = "AIM_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}
