// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config-dir DIR     ← task directory (env GIT_AUTOMATION_CONFIG_DIR)
//! --verbose            ← console debug, raw command output in events
//! --log-level LEVEL    ← console verbosity (0-6 or name, overrides --verbose)
//! --file-log-level     ← run log verbosity (never below debug)
//! --log-file FILE      ← run log path (default <config-dir>/gitauto.log)
//! --json               ← final event as one JSON line on stdout
//! ```

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::paths;
use crate::logging::LogLevel;

/// Global options available for all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    /// Directory holding the task files.
    #[arg(
        long = "config-dir",
        value_name = "DIR",
        env = "GIT_AUTOMATION_CONFIG_DIR",
        global = true
    )]
    pub config_dir: Option<PathBuf>,

    /// Logs every command and attaches raw command output to stage events.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace, 6=dump).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    /// Run log level. The run log always records at least debug.
    #[arg(long = "file-log-level", value_name = "LEVEL", global = true)]
    pub file_log_level: Option<LogLevel>,

    /// Path to the run log, truncated on every invocation.
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Prints the final event as one JSON line on stdout.
    #[arg(long, global = true)]
    pub json: bool,
}

impl GlobalOptions {
    /// Task directory after flag, environment and platform fallback.
    #[must_use]
    pub fn resolved_config_dir(&self) -> PathBuf {
        paths::config_dir(self.config_dir.as_deref())
    }

    /// Console level: `--log-level`, else debug with `--verbose`, else info.
    #[must_use]
    pub fn console_level(&self) -> LogLevel {
        self.log_level.unwrap_or(if self.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        })
    }

    /// Run log path: `--log-file`, else `gitauto.log` in `config_dir`.
    #[must_use]
    pub fn run_log_path(&self, config_dir: &Path) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| config_dir.join(paths::RUN_LOG_NAME))
    }
}
