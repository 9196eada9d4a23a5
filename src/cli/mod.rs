// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command-line surface.
//!
//! # Command Structure
//!
//! ```text
//! gitauto [global options] <command>
//! run <task> [overrides] [--initialize]
//! update <task> [overrides]
//! show-commits <task> [overrides] [-n N]
//! cherry-pick <task> [overrides]
//! create <task> --folder P [...]
//! list
//! edit <task>
//! ```

pub mod global;
pub mod manage;
pub mod task;


use crate::cli::global::GlobalOptions;
use crate::cli::manage::{CreateArgs, EditArgs};
use crate::cli::task::{RunArgs, ShowCommitsArgs, TaskArgs};
use clap::{Parser, Subcommand};

/// Git Task Automation
///
/// Runs repeatable git workflows described by task files.
#[derive(Debug, Parser)]
#[command(
    name = "gitauto",
    author,
    version,
    about = "Git Task Automation",
    long_about = "gitauto-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Runs repeatable git workflows described by task files.\n\n\
                  `gitauto run notes` pulls, runs the task's pre-command, commits,\n\
                  pushes, runs the post-command and pulls again. See\n\
                  `gitauto <command> --help` for more information about a command.",
    after_help = "TASK FILES:\n\n\
                  A task is one file per task in the configuration directory, by\n\
                  default <config dir>/git_automation_configs. The directory can be\n\
                  changed with --config-dir or GIT_AUTOMATION_CONFIG_DIR. A task\n\
                  identifier names <dir>/<task>.toml, a legacy <dir>/<task>.json, or\n\
                  a file path given directly. GITAUTO_* environment variables\n\
                  override task file keys, and command-line overrides win over both."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Runs the standard workflow: pull, pre-command, commit, push,
    /// post-command, final pull.
    Run(RunArgs),

    /// Stashes local changes, pulls, restores them, then commits and pushes.
    Update(TaskArgs),

    /// Lists the most recent commits of the remote branch.
    #[command(name = "show-commits")]
    ShowCommits(ShowCommitsArgs),

    /// Interactively cherry-picks recent remote commits.
    #[command(name = "cherry-pick")]
    CherryPick(TaskArgs),

    /// Creates a new task file.
    Create(CreateArgs),

    /// Lists the tasks in the configuration directory.
    List,

    /// Opens a task file in an editor.
    Edit(EditArgs),
}

/// Parses `std::env::args`, exiting with usage on error.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
