// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Spawning and exit-code checks.
//!
//! ```text
//! run_with_cancellation(token)
//!   token already fired + TERMINATE_ON_INTERRUPT --> interrupted, never spawned
//!   tokio::process::Command (stdin null unless inherited, kill_on_drop,
//!                            own process group when DETACHED)
//!   run_child
//!   exit != 0 and not ALLOW_FAILURE and not interrupted --> NonZeroExit
//! ```

use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamMode};
use crate::error::ProcessError;

type ProcessResult<T> = std::result::Result<T, ProcessError>;

impl ProcessBuilder {
    /// Short name for trace output: the label, else the program stem.
    pub(super) fn display_name(&self) -> String {
        self.label().map_or_else(
            || {
                self.program()
                    .file_stem()
                    .map_or_else(|| "process".to_string(), |s| s.to_string_lossy().into_owned())
            },
            str::to_string,
        )
    }

    /// Program and arguments on one line, arguments with spaces in double quotes.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program().display().to_string())
            .chain(self.args_slice().iter().map(|arg| {
                if arg.contains(' ') {
                    format!("\"{arg}\"")
                } else {
                    arg.clone()
                }
            }))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs to completion without a cancellation source.
    ///
    /// # Errors
    ///
    /// See [`ProcessBuilder::run_with_cancellation`].
    pub async fn run(self) -> ProcessResult<ProcessOutput> {
        self.run_with_cancellation(CancellationToken::new()).await
    }

    /// Runs the child, killing it when `token` fires if `TERMINATE_ON_INTERRUPT`
    /// is set. Without the flag the token is ignored.
    ///
    /// # Errors
    ///
    /// - `SpawnFailed` when the program cannot be started.
    /// - `NonZeroExit` when it exits non-zero without `ALLOW_FAILURE`. An
    ///   interrupted child never produces this.
    /// - `OutputError` when waiting on or killing the child fails.
    pub async fn run_with_cancellation(
        self,
        token: CancellationToken,
    ) -> ProcessResult<ProcessOutput> {
        let flags = self.process_flags();
        let terminable = flags.contains(ProcessFlags::TERMINATE_ON_INTERRUPT);
        if terminable && token.is_cancelled() {
            return Ok(ProcessOutput::interrupted_before_start());
        }

        let name = self.display_name();
        let line = self.command_line();
        if let Some(cwd) = self.working_dir() {
            trace!(cwd = %cwd.display(), "cd");
        }
        trace!(cmd = %line, "exec");

        let mut child = self
            .build_command()
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: line,
                source,
            })?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self
            .run_child(&name, &mut child, terminable.then_some(token))
            .await?;

        if !output.success()
            && !output.is_interrupted()
            && !flags.contains(ProcessFlags::ALLOW_FAILURE)
        {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: name,
                code: output.exit_code(),
            });
        }

        debug!(
            process = %name,
            exit_code = output.exit_code(),
            interrupted = output.is_interrupted(),
            timed_out = output.is_timed_out(),
            "completed"
        );
        Ok(output)
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command
            .args(self.args_slice())
            .envs(self.extra_env())
            .stdin(match self.stdout_mode() {
                StreamMode::Inherit => Stdio::inherit(),
                _ => Stdio::null(),
            })
            .stdout(stdio(self.stdout_mode()))
            .stderr(stdio(self.stderr_mode()))
            .kill_on_drop(true);
        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }
        #[cfg(unix)]
        if self.process_flags().contains(ProcessFlags::DETACHED)
            && self.stdout_mode() != StreamMode::Inherit
        {
            command.process_group(0);
        }
        command
    }
}

fn stdio(mode: StreamMode) -> Stdio {
    match mode {
        StreamMode::Log | StreamMode::Capture => Stdio::piped(),
        StreamMode::Inherit => Stdio::inherit(),
    }
}
