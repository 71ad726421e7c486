// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure mapping from `(runtime, project, version details, ports, paths)` to
//! the argv and environment of the child app-server process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use aim_core::{AimError, BootstrapOptions, ProjectId, Runtime};

/// Apps allowed to access any project's data (`TRUSTED_APPS` in the
/// original AppManager).
const TRUSTED_APPS: &[&str] = &["appscaledashboard"];
const TRUSTED_FLAG: &str = "--trusted";

const PHP_CGI_LOCATION: &str = "/usr/bin/php-cgi";
const GO_SDK: &str = "/opt/go_appengine";
const APPSCALE_HOME: &str = "/root/appscale";

/// A built start command: argv (already joined the way the original shells
/// it out) and the environment map to run it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartCommand {
    pub argv: String,
    pub env: BTreeMap<String, String>,
}

/// Inputs needed to build a start command, independent of where
/// `VersionDetails`/ports/paths come from.
pub struct CommandInputs<'a> {
    pub project_id: &'a ProjectId,
    pub runtime: Runtime,
    pub port: u16,
    pub pidfile: &'a Path,
    pub unpack_root: &'a Path,
    pub revision_key: &'a str,
    pub max_memory_mb: u32,
    pub options: &'a BootstrapOptions,
    /// Pre-resolved `GCS_HOST` (`<scheme>://<host>:<port>`), or `None` when
    /// deployment config has no GCS host configured. Resolving this from
    /// `DeploymentConfigView` is the caller's job so this module stays a
    /// pure function of its inputs.
    pub gcs_host: Option<String>,
}

/// Builds the argv/env for a start command, dispatching per runtime.
/// Unknown runtimes can't reach this point (`Runtime` is a closed enum),
/// so the only failure mode left is Java's pre-launch heap check.
pub fn build(inputs: &CommandInputs<'_>) -> Result<StartCommand, AimError> {
    match inputs.runtime {
        Runtime::Python27 | Runtime::Go | Runtime::Php => Ok(build_shared_launcher(inputs)),
        Runtime::Java => build_java(inputs),
    }
}

fn source_directory(unpack_root: &Path, revision_key: &str) -> PathBuf {
    unpack_root.join(revision_key).join("app")
}

fn build_shared_launcher(inputs: &CommandInputs<'_>) -> StartCommand {
    let source_directory = source_directory(inputs.unpack_root, inputs.revision_key);
    let options = inputs.options;

    let mut argv = vec![
        "/usr/bin/python2".to_string(),
        format!("{APPSCALE_HOME}/AppServer/dev_appserver.py"),
        format!("--port {}", inputs.port),
        format!("--admin_port {}", inputs.port + 10000),
        format!("--login_server {}", options.login_ip),
        "--skip_sdk_update_check".to_string(),
        format!("--nginx_host {}", options.login_ip),
        "--require_indexes".to_string(),
        "--enable_sendmail".to_string(),
        format!("--xmpp_path {}", options.login_ip),
        format!("--php_executable_path={PHP_CGI_LOCATION}"),
        format!("--uaserver_path {}:{}", options.db_proxy, options.uaserver_port),
        format!("--datastore_path {}:{}", options.db_proxy, options.db_server_port),
        source_directory.display().to_string(),
        format!("--host {}", options.private_ip),
        format!("--admin_host {}", options.private_ip),
        "--automatic_restart".to_string(),
        "no".to_string(),
        "--pidfile".to_string(),
        inputs.pidfile.display().to_string(),
    ];

    if TRUSTED_APPS.contains(&inputs.project_id.as_str()) {
        argv.push(TRUSTED_FLAG.to_string());
    }

    let mut env = BTreeMap::new();
    env.insert("MY_IP_ADDRESS".to_string(), options.login_ip.clone());
    env.insert("APPNAME".to_string(), inputs.project_id.as_str().to_string());
    env.insert("GOMAXPROCS".to_string(), options.num_cpus.to_string());
    env.insert("APPSCALE_HOME".to_string(), APPSCALE_HOME.to_string());
    env.insert("PYTHON_LIB".to_string(), format!("{APPSCALE_HOME}/AppServer/"));

    if inputs.runtime == Runtime::Go {
        env.insert(
            "GOPATH".to_string(),
            inputs.unpack_root.join(inputs.revision_key).join("gopath").display().to_string(),
        );
        env.insert("GOROOT".to_string(), format!("{GO_SDK}/goroot"));
    }

    StartCommand { argv: argv.join(" "), env }
}

fn build_java(inputs: &CommandInputs<'_>) -> Result<StartCommand, AimError> {
    let max_heap = inputs.max_memory_mb as i64 - aim_core::JAVA_OVERHEAD_MB as i64;
    if max_heap <= 0 {
        return Err(AimError::BadConfiguration(
            "Memory for Java applications must be greater than 250MB".to_string(),
        ));
    }

    let revision_base = inputs.unpack_root.join(inputs.revision_key);
    let web_inf = find_web_inf(&revision_base)
        .ok_or_else(|| AimError::BadConfiguration(format!("no WEB-INF directory under {}", revision_base.display())))?;
    let app_root = web_inf
        .parent()
        .ok_or_else(|| AimError::BadConfiguration("WEB-INF has no parent directory".to_string()))?;

    let options = inputs.options;
    let java_start_script = format!("{APPSCALE_HOME}/AppServer_Java/appengine-java-sdk-repacked/bin/dev_appserver.sh");

    let argv = vec![
        java_start_script,
        format!("--port={}", inputs.port),
        "--jvm_flag=-Dsocket.permit_connect=true".to_string(),
        format!("--jvm_flag=-Xmx{max_heap}m"),
        "--jvm_flag=-Djava.security.egd=file:/dev/./urandom".to_string(),
        "--disable_update_check".to_string(),
        format!("--address={}", options.private_ip),
        format!("--datastore_path={}", options.db_proxy),
        format!("--login_server={}", options.login_ip),
        "--appscale_version=1".to_string(),
        format!("--APP_NAME={}", inputs.project_id),
        format!("--NGINX_ADDRESS={}", options.login_ip),
        format!("--TQ_PROXY={}", options.tq_proxy),
        format!("--pidfile={}", inputs.pidfile.display()),
        app_root.display().to_string(),
    ]
    .join(" ");

    let mut env = BTreeMap::new();
    env.insert("APPSCALE_HOME".to_string(), APPSCALE_HOME.to_string());
    for (key, value) in extract_env_vars_from_xml(&web_inf.join("appengine-web.xml"))? {
        env.insert(key, value);
    }
    if let Some(gcs_host) = &inputs.gcs_host {
        env.insert("GCS_HOST".to_string(), gcs_host.clone());
    }

    Ok(StartCommand { argv, env })
}

/// Walks `root` for directories literally named `WEB-INF`, returning the
/// shortest absolute path (alphabetical tie-break). `None` if there is none.
pub fn find_web_inf(root: &Path) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    walk_for_dir_name(root, "WEB-INF", &mut candidates);
    select_shortest(candidates)
}

/// Same shortest-path-wins selection rule, applied to
/// `.../WEB-INF/appengine-web.xml` candidates directly.
pub fn find_appengine_web_xml(root: &Path) -> Option<PathBuf> {
    find_web_inf(root).map(|web_inf| web_inf.join("appengine-web.xml")).filter(|path| path.exists())
}

fn walk_for_dir_name(dir: &Path, name: &str, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else { continue };
        if !file_type.is_dir() {
            continue;
        }
        let path = entry.path();
        if entry.file_name() == name {
            out.push(path.clone());
        }
        walk_for_dir_name(&path, name, out);
    }
}

fn select_shortest(mut candidates: Vec<PathBuf>) -> Option<PathBuf> {
    candidates.sort();
    candidates.into_iter().min_by_key(|path| path.as_os_str().len())
}

/// Extracts `<env-variables><env-var name="K" value="V"/></env-variables>`
/// entries from an `appengine-web.xml` document.
fn extract_env_vars_from_xml(path: &Path) -> Result<BTreeMap<String, String>, AimError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|error| AimError::BadConfiguration(format!("unable to read {}: {error}", path.display())))?;
    let document = roxmltree::Document::parse(&contents)
        .map_err(|error| AimError::BadConfiguration(format!("invalid XML in {}: {error}", path.display())))?;

    let mut env_vars = BTreeMap::new();
    for env_variables in document.descendants().filter(|node| node.has_tag_name("env-variables")) {
        for env_var in env_variables.children().filter(|node| node.has_tag_name("env-var")) {
            if let (Some(name), Some(value)) = (env_var.attribute("name"), env_var.attribute("value")) {
                env_vars.insert(name.to_string(), value.to_string());
            }
        }
    }
    Ok(env_vars)
}

#[cfg(test)]
#[path = "command_builder_tests.rs"]
mod tests;
