// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task file management arguments.

use std::path::PathBuf;

use clap::Args;

use crate::config::TaskFile;

/// Arguments for the `create` command.
#[derive(Debug, Clone, Default, Args)]
pub struct CreateArgs {
    /// Name of the new task.
    #[arg(value_name = "TASK")]
    pub task: String,

    /// Repository directory.
    #[arg(long, value_name = "PATH")]
    pub folder: PathBuf,

    /// Branch to work on [default: main].
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Remote name or URL [default: origin].
    #[arg(long, value_name = "ORIGIN")]
    pub origin: Option<String>,

    /// Shell command run before committing.
    #[arg(long = "pre-command", value_name = "CMD")]
    pub pre_command: Option<String>,

    /// Shell command run after pushing.
    #[arg(long = "post-command", value_name = "CMD")]
    pub post_command: Option<String>,

    /// Commit message template [default: Automated update for <task>].
    #[arg(long = "message", value_name = "TEMPLATE")]
    pub message: Option<String>,

    /// strftime format appended to the commit message.
    #[arg(long = "timestamp-format", value_name = "FORMAT")]
    pub timestamp_format: Option<String>,

    /// Writes the task file to FILE instead of the configuration directory.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Replaces an existing task file.
    #[arg(long)]
    pub overwrite: bool,
}

impl CreateArgs {
    /// The task file these arguments describe.
    #[must_use]
    pub fn to_task_file(&self) -> TaskFile {
        let defaults = TaskFile::default();
        TaskFile {
            name: self.task.clone(),
            repo_path: self.folder.display().to_string(),
            branch: self.branch.clone().unwrap_or(defaults.branch),
            origin: self.origin.clone().unwrap_or(defaults.origin),
            pre_command: self.pre_command.clone().unwrap_or_default(),
            post_command: self.post_command.clone().unwrap_or_default(),
            commit_message: self
                .message
                .clone()
                .unwrap_or_else(|| format!("Automated update for {}", self.task)),
            timestamp_format: self.timestamp_format.clone().unwrap_or_default(),
            ..defaults
        }
    }
}

/// Arguments for the `edit` command.
#[derive(Debug, Clone, Default, Args)]
pub struct EditArgs {
    /// Task name or path to a task file.
    #[arg(value_name = "TASK")]
    pub task: String,
}
