// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task configuration for gitauto.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. TaskFile defaults
//! 2. task file (<dir>/<task>.toml, legacy <dir>/<task>.json, or --file)
//! 3. GITAUTO_* env vars
//! 4. CLI overrides (--branch, --origin, --folder, --no-pull, --no-push)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITAUTO_BRANCH=dev                  → branch = "dev"
//! GITAUTO_PUSH_AFTER_COMMAND=false    → push_after_command = false
//! GITAUTO_COMMAND_TIMEOUT_SECS=900    → command_timeout_secs = 900
//! ```

pub mod loader;
pub mod paths;
pub mod types;


use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};

pub use loader::ConfigLoader;
pub use types::TaskFile;

/// Environment variable prefix for task overrides.
pub const ENV_PREFIX: &str = "GITAUTO";

impl TaskFile {
    /// Create a new loader.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitauto_rs::config::TaskFile;
    ///
    /// let task = TaskFile::builder()
    ///     .add_task_file("notes.toml")
    ///     .with_env_prefix("GITAUTO")
    ///     .set("branch", "dev")?
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load a task from a single file, TOML or legacy JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not describe a task.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_task_file(path).build()
    }

    /// Load a task from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not describe a task.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Renders the file as written by `create`.
    ///
    /// # Errors
    ///
    /// Serialization failures.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Writes the task to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` when `path` exists and `overwrite` is false, and any
    /// I/O failure.
    pub fn write_to(&self, path: &Path, overwrite: bool) -> Result<()> {
        if path.exists() && !overwrite {
            return Err(ConfigError::AlreadyExists(path.display().to_string()).into());
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create '{}'", parent.display()))?;
        }
        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("failed to write task file '{}'", path.display()))?;
        debug!(path = %path.display(), "wrote task file");
        Ok(())
    }
}

/// One valid task file found by [`list_tasks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Every valid task under `dir`, sorted by name.
///
/// Files that fail to parse are skipped with a warning. A missing directory
/// yields an empty list.
///
/// # Errors
///
/// The directory exists but cannot be read.
pub fn list_tasks(dir: &Path) -> Result<Vec<TaskEntry>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::ReadError {
        path: dir.display().to_string(),
        source,
    })?;

    let mut tasks = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() || !paths::is_task_file(&path) {
            continue;
        }
        match TaskFile::from_file(&path) {
            Ok(task) if !task.repo_path.trim().is_empty() => tasks.push(TaskEntry {
                name: task.display_name(&paths::task_stem(&path)).to_string(),
                path,
            }),
            Ok(_) => warn!(file = %path.display(), "skipping task file without repo_path"),
            Err(e) => warn!(file = %path.display(), "skipping malformed task file: {e}"),
        }
    }
    tasks.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
    Ok(tasks)
}
