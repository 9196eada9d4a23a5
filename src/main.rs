// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging (console + run log) --> Command Dispatch
//!   Run | Update | ShowCommits | CherryPick | Create | List | Edit
//! ```

use std::path::Path;
use std::process::ExitCode;

use gitauto_rs::cli::global::GlobalOptions;
use gitauto_rs::cli::{self, Command};
use gitauto_rs::cmd::task::{run_create_command, run_edit_command, run_list_command};
use gitauto_rs::cmd::workflow::run_workflow_command;
use gitauto_rs::logging::{LogConfig, init_logging};
use gitauto_rs::workflow::{EngineOptions, WorkflowKind};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();
    let config_dir = cli.global.resolved_config_dir();

    let log_config = build_log_config(&cli.global, &config_dir);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config_dir).await
}

fn build_log_config(global: &GlobalOptions, config_dir: &Path) -> LogConfig {
    LogConfig::builder()
        .with_console_level(global.console_level())
        .maybe_with_file_level(global.file_log_level)
        .with_log_file(global.run_log_path(config_dir))
        .with_show_timestamps(false)
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config_dir: &Path) -> ExitCode {
    let global = &cli.global;
    let options = |initialize: bool| {
        EngineOptions::builder()
            .initialize(initialize)
            .verbose(global.verbose)
            .build()
    };

    let result = match &cli.command {
        Command::Run(args) => {
            run_workflow_command(
                WorkflowKind::Standard,
                &args.target,
                options(args.initialize),
                global,
            )
            .await
        }
        Command::Update(target) => {
            run_workflow_command(WorkflowKind::Update, target, options(false), global).await
        }
        Command::ShowCommits(args) => {
            let options = EngineOptions::builder()
                .verbose(global.verbose)
                .commit_limit(args.count)
                .build();
            run_workflow_command(WorkflowKind::ShowCommits, &args.target, options, global).await
        }
        Command::CherryPick(target) => {
            run_workflow_command(WorkflowKind::CherryPick, target, options(false), global).await
        }
        Command::Create(args) => run_create_command(args, config_dir).map(|_| 0),
        Command::List => run_list_command(config_dir).map(|()| 0),
        Command::Edit(args) => run_edit_command(args, config_dir).await.map(|()| 0),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
