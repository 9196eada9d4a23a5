// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments shared by the workflow commands.
//!
//! # Override Mapping
//!
//! ```text
//! --file FILE   task file used instead of <config-dir>/<task>.toml
//! --branch B    → branch
//! --origin O    → origin
//! --folder P    → repo_path
//! --no-pull     → pull_before_command = false
//! --no-push     → push_after_command = false
//! ```

use std::path::PathBuf;

use clap::Args;

use crate::config::ConfigLoader;
use crate::error::Result;
use crate::git::inspector::DEFAULT_COMMIT_LIMIT;

/// Task selection and per-invocation overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct TaskArgs {
    /// Task name or path to a task file.
    #[arg(value_name = "TASK")]
    pub task: String,

    #[command(flatten)]
    pub overrides: TaskOverrides,
}

/// Values that win over the task file and `GITAUTO_*` variables.
#[derive(Debug, Clone, Default, Args)]
pub struct TaskOverrides {
    /// Reads the task from FILE instead of the configuration directory.
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Branch to work on.
    #[arg(long, value_name = "BRANCH")]
    pub branch: Option<String>,

    /// Remote name or URL.
    #[arg(long, value_name = "ORIGIN")]
    pub origin: Option<String>,

    /// Repository directory.
    #[arg(long, value_name = "PATH")]
    pub folder: Option<PathBuf>,

    /// Skips pulling before and after the commands.
    #[arg(long = "no-pull")]
    pub no_pull: bool,

    /// Commits without pushing.
    #[arg(long = "no-push")]
    pub no_push: bool,
}

impl TaskOverrides {
    /// Applies the overrides on top of `loader`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be stored as a configuration override.
    pub fn apply(&self, loader: ConfigLoader) -> Result<ConfigLoader> {
        let mut loader = loader
            .set_opt("branch", self.branch.clone())?
            .set_opt("origin", self.origin.clone())?
            .set_opt(
                "repo_path",
                self.folder.as_ref().map(|p| p.display().to_string()),
            )?;
        if self.no_pull {
            loader = loader.set("pull_before_command", false)?;
        }
        if self.no_push {
            loader = loader.set("push_after_command", false)?;
        }
        Ok(loader)
    }
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TaskArgs,

    /// Creates the directory and repository, and sets up the remote, when missing.
    #[arg(long)]
    pub initialize: bool,
}

/// Arguments for the `show-commits` command.
#[derive(Debug, Clone, Args)]
pub struct ShowCommitsArgs {
    #[command(flatten)]
    pub target: TaskArgs,

    /// Number of commits to list.
    #[arg(
        short = 'n',
        long = "count",
        value_name = "N",
        default_value_t = DEFAULT_COMMIT_LIMIT,
        value_parser = parse_count
    )]
    pub count: usize,
}

fn parse_count(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
