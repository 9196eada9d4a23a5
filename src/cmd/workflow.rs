// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workflow command implementation for gitauto-rs.
//!
//! ```text
//! TaskArgs ──> locate ──> ConfigLoader(file, GITAUTO_*, overrides) ──> resolve
//!                                                                        |
//!   Ctrl+C ──> CancellationToken ──┐                                     v
//!   ShellExecutor ─────────────────┼──────────────────────────> Engine::run(kind)
//!   ConsoleOperator (cherry-pick) ─┤                                     |
//!   ConsoleSink ───────────────────┘                                     v
//!                                                                 exit code 0 / 1
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cli::global::GlobalOptions;
use crate::cli::task::TaskArgs;
use crate::cmd::operator::ConsoleOperator;
use crate::cmd::report::ConsoleSink;
use crate::config::{ConfigLoader, ENV_PREFIX, paths};
use crate::error::Result;
use crate::git::executor::ShellExecutor;
use crate::task::TaskContext;
use crate::workflow::{Engine, EngineOptions, EventSink, Operator, WorkflowKind};

/// Task file backing `target`: `--file`, else the identifier looked up in `config_dir`.
///
/// # Errors
///
/// `ConfigError::NotFound` when no candidate exists.
pub fn task_path(target: &TaskArgs, config_dir: &Path) -> Result<PathBuf> {
    match &target.overrides.file {
        Some(file) => Ok(file.clone()),
        None => Ok(paths::locate_task(&target.task, config_dir)?),
    }
}

/// Loads and validates the task for one invocation.
///
/// Layers are the task file, `GITAUTO_*` variables, then the command-line
/// overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be found or parsed, or the task is invalid.
pub fn load_task(target: &TaskArgs, config_dir: &Path, initialize: bool) -> Result<TaskContext> {
    let path = task_path(target, config_dir)?;
    debug!(file = %path.display(), "loading task");

    let loader = ConfigLoader::new()
        .add_task_file(&path)
        .with_env_prefix(ENV_PREFIX);
    let task = target.overrides.apply(loader)?.build()?;

    let hint = paths::task_stem(&path);
    Ok(task.resolve(&hint, initialize)?)
}

/// Main handler for the workflow commands.
///
/// Configuration problems are errors; everything that happens once the
/// engine runs is reported through the final report and its exit code.
///
/// # Errors
///
/// Returns an error if the task cannot be loaded.
pub async fn run_workflow_command(
    kind: WorkflowKind,
    target: &TaskArgs,
    options: EngineOptions,
    global: &GlobalOptions,
) -> Result<u8> {
    let config_dir = global.resolved_config_dir();
    let context = load_task(target, &config_dir, options.initialize)?;

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping at the next safe point");
                cancel.cancel();
            }
        }
    });

    let executor = ShellExecutor::new(global.verbose).with_cancellation(cancel.clone());
    let operator = (kind == WorkflowKind::CherryPick)
        .then(|| Arc::new(ConsoleOperator::new()) as Arc<dyn Operator>);
    let sink: Arc<dyn EventSink> = Arc::new(ConsoleSink::new(global.json));

    let engine = Engine::builder()
        .executor(Arc::new(executor))
        .context(context)
        .options(options)
        .cancel(cancel)
        .maybe_operator(operator)
        .sinks(vec![sink])
        .build();

    let report = engine.run(kind).await;
    interrupt.abort();
    Ok(report.exit_code())
}
