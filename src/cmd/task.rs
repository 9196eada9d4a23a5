// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Task file management: `create`, `list`, `edit`.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::cli::manage::{CreateArgs, EditArgs};
use crate::config::{list_tasks, paths};
use crate::core::process::builder::ProcessBuilder;
use crate::error::{ProcessError, Result};

/// Openers tried, in order, when neither `$VISUAL` nor `$EDITOR` is set.
#[cfg(target_os = "macos")]
const OPENERS: &[&str] = &["open"];
#[cfg(windows)]
const OPENERS: &[&str] = &["notepad"];
#[cfg(not(any(target_os = "macos", windows)))]
const OPENERS: &[&str] = &["xdg-open", "nano", "vi"];

/// Writes a new task file and returns its path.
///
/// # Errors
///
/// Returns an error if the file exists and `--overwrite` was not given, or
/// the file cannot be written.
pub fn run_create_command(args: &CreateArgs, config_dir: &Path) -> Result<PathBuf> {
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| paths::new_task_path(&args.task, config_dir));
    let task = args.to_task_file();
    task.write_to(&path, args.overwrite)?;
    info!(task = %args.task, file = %path.display(), "task created");
    println!("Created task '{}' in {}", args.task, path.display());
    Ok(path)
}

/// Main handler for list command.
///
/// # Errors
///
/// Returns an error if the configuration directory cannot be read.
pub fn run_list_command(config_dir: &Path) -> Result<()> {
    let tasks = list_tasks(config_dir)?;
    if tasks.is_empty() {
        println!("No tasks found in {}", config_dir.display());
    } else {
        for task in &tasks {
            println!("{} (File: {})", task.name, task.path.display());
        }
    }
    Ok(())
}

/// Opens the task file in the user's editor and waits for it to exit.
///
/// # Errors
///
/// Returns an error if the task cannot be found, no editor is available, or
/// the editor fails.
pub async fn run_edit_command(args: &EditArgs, config_dir: &Path) -> Result<()> {
    let path = paths::locate_task(&args.task, config_dir)?;
    let editor = editor_command(&path)?;
    debug!(cmd = %editor.command_line(), "opening editor");
    editor
        .inherit_stdio()
        .run()
        .await
        .with_context(|| format!("failed to edit '{}'", path.display()))?;
    Ok(())
}

fn editor_command(path: &Path) -> std::result::Result<ProcessBuilder, ProcessError> {
    let configured = ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.trim().is_empty());
    if let Some(editor) = configured {
        // May carry arguments, e.g. "code --wait".
        return Ok(ProcessBuilder::raw(format!(
            "{editor} {}",
            shell_quote(&path.display().to_string())
        )));
    }

    OPENERS
        .iter()
        .find_map(|opener| ProcessBuilder::find(opener))
        .map(|program| ProcessBuilder::new(program).arg(path))
        .ok_or_else(|| ProcessError::ExecutableNotFound {
            name: format!("$VISUAL, $EDITOR or one of {}", OPENERS.join(", ")),
        })
}

/// Single-quotes `s` for `sh -c`.
pub(crate) fn shell_quote(s: &str) -> String {
    if cfg!(windows) {
        format!("\"{s}\"")
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

