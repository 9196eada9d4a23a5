// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Console and run-log subscribers.
//!
//! ```text
//! init_logging(&LogConfig)
//!   registry
//!     console  stderr, ANSI, console_level
//!     run log  truncated file, non_blocking, file_level (>= debug),
//!              span close events carry stage timings
//!   --> LogGuard (flushes the run log on drop)
//! ```
//!
//! The console writes to stderr so `--json` output on stdout stays clean.

mod level;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::Context;
use bon::Builder;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::Result;

pub use level::LogLevel;

/// Where and how loudly to log.
#[derive(Debug, Clone, Builder)]
pub struct LogConfig {
    #[builder(setters(name = with_console_level), default)]
    console_level: LogLevel,
    #[builder(setters(name = with_file_level), default = LogLevel::Debug)]
    file_level: LogLevel,
    #[builder(setters(name = with_log_file), into)]
    log_file: Option<PathBuf>,
    #[builder(setters(name = with_show_timestamps), default = true)]
    show_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl LogConfig {
    #[must_use]
    pub const fn console_level(&self) -> LogLevel {
        self.console_level
    }

    /// Run-log level, raised to `Debug` so every invocation is on record.
    #[must_use]
    pub fn file_level(&self) -> LogLevel {
        self.file_level.max(LogLevel::Debug)
    }

    #[must_use]
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    #[must_use]
    pub const fn show_timestamps(&self) -> bool {
        self.show_timestamps
    }
}

/// Keeps the run-log writer thread alive; drop it last.
pub struct LogGuard {
    _run_log: Option<WorkerGuard>,
}

/// Creates (truncating) the run log and its directory.
fn open_run_log(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    File::create(path).with_context(|| format!("failed to create log file {}", path.display()))
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Fails when the run log cannot be created or a subscriber is already set.
///
/// # Example
///
/// ```no_run
/// use gitauto_rs::logging::{init_logging, LogConfig, LogLevel};
///
/// let config = LogConfig::builder()
///     .with_console_level(LogLevel::Info)
///     .with_log_file("gitauto.log")
///     .build();
///
/// let _guard = init_logging(&config).expect("Failed to initialize logging");
/// tracing::info!("Logging initialized");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogGuard> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);
    let console = if config.show_timestamps() {
        console.boxed()
    } else {
        console.without_time().boxed()
    }
    .with_filter(EnvFilter::new(config.console_level().directives()));

    let (run_log, guard) = match config.log_file() {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(open_run_log(path)?);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(EnvFilter::new(config.file_level().directives()));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(run_log)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(LogGuard { _run_log: guard })
}
