// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task context: the resolved, read-only description of one maintenance task.
//!
//! ```text
//! TaskFile (config) + CLI overrides
//!         |
//!         v   TaskFile::resolve
//!    TaskContext ──────────────> workflow::Engine
//!    name, repo_path, branch,    (read-only for the run)
//!    origin, pre/post command,
//!    commit template, timestamp,
//!    pull/push toggles, timeout
//! ```
//!
//! Run-scoped mutable facts (stash created, last commit, warnings) live in
//! `workflow::RunState`, never here.

pub mod message;

use std::path::{Path, PathBuf};
use std::time::Duration;

use bon::Builder;

pub use message::{Clock, FixedClock, SystemClock, compose_message};

/// Read-only task configuration for one invocation.
#[derive(Debug, Clone, Builder)]
pub struct TaskContext {
    #[builder(into)]
    name: String,
    #[builder(into)]
    repo_path: PathBuf,
    #[builder(into, default = "main".to_string())]
    branch: String,
    #[builder(into, default = "origin".to_string())]
    origin: String,
    #[builder(into, default)]
    pre_command: String,
    #[builder(into, default)]
    post_command: String,
    #[builder(into, default = "Automated update".to_string())]
    commit_message_template: String,
    #[builder(into, default)]
    timestamp_format: String,
    #[builder(default = true)]
    pull_before_command: bool,
    #[builder(default = true)]
    push_after_command: bool,
    command_timeout: Option<Duration>,
}

impl TaskContext {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    #[must_use]
    pub fn branch(&self) -> &str {
        &self.branch
    }

    /// Remote name or location used for pull and push.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Shell command run before change detection; empty means skip.
    #[must_use]
    pub fn pre_command(&self) -> &str {
        &self.pre_command
    }

    /// Shell command run after the push; empty means skip.
    #[must_use]
    pub fn post_command(&self) -> &str {
        &self.post_command
    }

    #[must_use]
    pub fn commit_message_template(&self) -> &str {
        &self.commit_message_template
    }

    /// strftime format appended to the commit message; empty means none.
    #[must_use]
    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    #[must_use]
    pub const fn pull_before_command(&self) -> bool {
        self.pull_before_command
    }

    #[must_use]
    pub const fn push_after_command(&self) -> bool {
        self.push_after_command
    }

    /// Upper bound for every external command of the run.
    #[must_use]
    pub const fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout
    }

    /// Commit message for a commit made now.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the timestamp format is invalid.
    pub fn commit_message(&self, clock: &dyn Clock) -> Result<String, String> {
        compose_message(&self.commit_message_template, &self.timestamp_format, clock)
    }
}
