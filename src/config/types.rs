// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! On-disk task definition.
//!
//! ```toml
//! name = "notes"
//! repo_path = "~/notes"          # legacy: git_repo_path
//! branch = "main"
//! origin = "origin"              # remote name, URL, or path
//! pre_command = "make export"    # legacy: command_line
//! post_command = ""
//! commit_message = "Backup"      # legacy: git_commit_message
//! timestamp_format = "%Y-%m-%d %H:%M"
//! pull_before_command = true
//! push_after_command = true
//! command_timeout_secs = 600
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::task::TaskContext;
use crate::task::message::validate_timestamp_format;

const DEFAULT_BRANCH: &str = "main";
const DEFAULT_ORIGIN: &str = "origin";

/// A task file as written by users. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskFile {
    pub name: String,
    #[serde(alias = "git_repo_path")]
    pub repo_path: String,
    pub branch: String,
    pub origin: String,
    #[serde(alias = "command_line")]
    pub pre_command: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub post_command: String,
    /// Empty means `Automated update for <name>`.
    #[serde(alias = "git_commit_message")]
    pub commit_message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub timestamp_format: String,
    pub pull_before_command: bool,
    pub push_after_command: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,
}

impl Default for TaskFile {
    fn default() -> Self {
        Self {
            name: String::new(),
            repo_path: String::new(),
            branch: DEFAULT_BRANCH.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            pre_command: String::new(),
            post_command: String::new(),
            commit_message: String::new(),
            timestamp_format: String::new(),
            pull_before_command: true,
            push_after_command: true,
            command_timeout_secs: None,
        }
    }
}

impl TaskFile {
    /// Task name, falling back to `hint` (usually the file stem).
    #[must_use]
    pub fn display_name<'a>(&'a self, hint: &'a str) -> &'a str {
        if self.name.trim().is_empty() {
            hint
        } else {
            self.name.trim()
        }
    }

    /// Validates the file and produces the run-time context.
    ///
    /// Relative repository paths are made absolute against the current
    /// directory. The directory must exist unless `initialize` is set.
    ///
    /// # Errors
    ///
    /// `MissingKey` for an empty `repo_path`; `InvalidValue` for a missing
    /// directory, a bad timestamp format, or a zero timeout.
    pub fn resolve(&self, name_hint: &str, initialize: bool) -> Result<TaskContext, ConfigError> {
        let name = self.display_name(name_hint).to_string();
        let invalid = |key: &str, message: String| ConfigError::InvalidValue {
            task: name.clone(),
            key: key.to_string(),
            message,
        };

        if self.repo_path.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                task: name,
                key: "repo_path".to_string(),
            });
        }
        let repo_path = absolute(&expand_home(self.repo_path.trim()))
            .map_err(|e| invalid("repo_path", e.to_string()))?;
        if !initialize && !repo_path.is_dir() {
            return Err(invalid(
                "repo_path",
                format!("'{}' is not a directory", repo_path.display()),
            ));
        }

        validate_timestamp_format(&self.timestamp_format)
            .map_err(|message| invalid("timestamp_format", message))?;

        let command_timeout = match self.command_timeout_secs {
            Some(0) => {
                return Err(invalid(
                    "command_timeout_secs",
                    "must be greater than zero".to_string(),
                ));
            }
            secs => secs.map(Duration::from_secs),
        };

        let commit_message = if self.commit_message.trim().is_empty() {
            format!("Automated update for {name}")
        } else {
            self.commit_message.clone()
        };

        Ok(TaskContext::builder()
            .branch(non_empty(&self.branch, DEFAULT_BRANCH))
            .origin(non_empty(&self.origin, DEFAULT_ORIGIN))
            .pre_command(self.pre_command.trim())
            .post_command(self.post_command.trim())
            .commit_message_template(commit_message)
            .timestamp_format(self.timestamp_format.as_str())
            .pull_before_command(self.pull_before_command)
            .push_after_command(self.push_after_command)
            .maybe_command_timeout(command_timeout)
            .name(name)
            .repo_path(repo_path)
            .build())
    }
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() { fallback } else { value }
}

/// Expands a leading `~/`.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        std::path::absolute(path)
    }
}
