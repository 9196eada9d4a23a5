// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Where task files live.
//!
//! ```text
//! --config-dir DIR
//!   > $GIT_AUTOMATION_CONFIG_DIR
//!   > <platform config dir>/git_automation_configs
//!
//! task id "notes"   ──> ./notes (existing file, .toml or .json)
//!                   ──> DIR/notes.toml
//!                   ──> DIR/notes.json   (legacy)
//! ```

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const CONFIG_DIR_ENV: &str = "GIT_AUTOMATION_CONFIG_DIR";
pub const CONFIG_DIR_NAME: &str = "git_automation_configs";

/// Run log file name inside the configuration directory.
pub const RUN_LOG_NAME: &str = "gitauto.log";

/// Extensions recognised as task files, preferred first.
pub const TASK_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Platform default configuration directory.
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// `explicit` (flag or environment, as parsed by the CLI) or the platform default.
#[must_use]
pub fn config_dir(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(default_config_dir, Path::to_path_buf)
}

/// Whether `path` has a task file extension.
#[must_use]
pub fn is_task_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TASK_EXTENSIONS.contains(&ext))
}

/// Resolves a task identifier to an existing file.
///
/// # Errors
///
/// `NotFound` listing the candidates that were tried.
pub fn locate_task(id: &str, dir: &Path) -> Result<PathBuf, ConfigError> {
    let direct = Path::new(id);
    if is_task_file(direct) && direct.is_file() {
        return Ok(direct.to_path_buf());
    }

    let candidates: Vec<PathBuf> = TASK_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{id}.{ext}")))
        .collect();
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| {
            let tried = candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            ConfigError::NotFound(format!("'{id}' (tried {tried})"))
        })
}

/// Path a new task file for `id` is written to.
#[must_use]
pub fn new_task_path(id: &str, dir: &Path) -> PathBuf {
    dir.join(format!("{id}.toml"))
}

/// Task name implied by a file path.
#[must_use]
pub fn task_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
