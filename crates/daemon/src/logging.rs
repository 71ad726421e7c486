// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging setup: structured logs to stdout always, plus an optional
//! non-blocking rotating file writer when `--log-dir` is set.

use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Guards the file appender's background flush thread; must be held for
/// the life of the process once returned `Some`.
pub type LogGuard = Option<tracing_appender::non_blocking::WorkerGuard>;

pub fn init(log_dir: Option<&Path>) -> std::io::Result<LogGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, "aimd.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
            Ok(None)
        }
    }
}
