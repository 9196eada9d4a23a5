// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command executor: one external operation in, one [`CommandResult`] out.
//!
//! ```text
//! Invocation { program: Git | Shell, argv, cwd, timeout }
//!        |
//!        v
//!   Executor::run ──> ShellExecutor ──> ProcessBuilder (ALLOW_FAILURE, captured)
//!        |                  git: GIT_TERMINAL_PROMPT=0, GCM_INTERACTIVE=never
//!        |                  sh:  TERMINATE_ON_INTERRUPT
//!        v
//!   Ok(CommandResult { exit_code, stdout, stderr, duration_ms })
//!   Err(ExecutionError)   only when the program could not be launched
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::{ExecutionError, ProcessError};

/// What an invocation launches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// The `git` executable.
    Git,
    /// The platform shell, running one user-supplied command string.
    Shell,
}

/// One external operation, fully described before it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: Program,
    argv: Vec<String>,
    cwd: PathBuf,
    timeout: Option<Duration>,
}

impl Invocation {
    /// A git subcommand run in `cwd`.
    pub fn git<I, S>(cwd: &Path, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: Program::Git,
            argv: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
            timeout: None,
        }
    }

    /// A user shell command run in `cwd`.
    pub fn shell(cwd: &Path, command: impl Into<String>) -> Self {
        Self {
            program: Program::Shell,
            argv: vec![command.into()],
            cwd: cwd.to_path_buf(),
            timeout: None,
        }
    }

    /// Bounds the execution time.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn program(&self) -> Program {
        self.program
    }

    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// First git argument after global `-c key=value` options.
    #[must_use]
    pub fn subcommand(&self) -> Option<&str> {
        let mut args = self.argv.iter();
        while let Some(arg) = args.next() {
            if arg == "-c" {
                args.next();
                continue;
            }
            return Some(arg.as_str());
        }
        None
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.program {
            Program::Git => write!(f, "git {}", self.argv.join(" ")),
            Program::Shell => write!(f, "sh -c {}", self.argv.join(" ")),
        }
    }
}

/// Captured outcome of a launched process.
///
/// A non-zero exit code is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
    duration_ms: u64,
}

impl CommandResult {
    pub fn new(
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration_ms,
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr, for classifiers that must look at both.
    #[must_use]
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
            (false, true) => self.stdout.clone(),
            _ => self.stderr.clone(),
        }
    }
}

/// Runs invocations. The only way the engine touches the outside world.
pub trait Executor: Send + Sync {
    /// Runs one invocation to completion.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutionError`] only when the program cannot be launched.
    fn run<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, Result<CommandResult, ExecutionError>>;
}

/// [`Executor`] backed by real subprocesses.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    verbose: bool,
    cancel: CancellationToken,
}

impl ShellExecutor {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            cancel: CancellationToken::new(),
        }
    }

    /// Shell commands are terminated when this token fires. Git commands are
    /// neither killed nor reached by the terminal's Ctrl+C.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    fn builder(invocation: &Invocation) -> ProcessBuilder {
        let builder = match invocation.program() {
            Program::Git => ProcessBuilder::new("git")
                .args(invocation.argv())
                .env("GIT_TERMINAL_PROMPT", "0")
                .env("GCM_INTERACTIVE", "never")
                .env("GIT_EDITOR", "true")
                .env("LC_ALL", "C")
                .flag(ProcessFlags::DETACHED),
            Program::Shell => ProcessBuilder::raw(invocation.argv().join(" "))
                .flag(ProcessFlags::TERMINATE_ON_INTERRUPT),
        };
        builder
            .cwd(invocation.cwd())
            .flag(ProcessFlags::ALLOW_FAILURE)
            .capture_output()
            .maybe_timeout(invocation.timeout())
    }

    async fn execute(&self, invocation: &Invocation) -> Result<CommandResult, ExecutionError> {
        let started = Instant::now();
        debug!(cwd = %invocation.cwd().display(), command = %invocation, "run");

        let output = Self::builder(invocation)
            .run_with_cancellation(self.cancel.clone())
            .await
            .map_err(|e| launch_error(invocation, &e))?;

        let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let exit_code = output.exit_code();
        let (stdout, stderr) = output.into_streams();
        let result = CommandResult::new(exit_code, stdout, stderr, elapsed);

        debug!(
            command = %invocation,
            exit_code = result.exit_code(),
            duration_ms = result.duration_ms(),
            stdout = %result.stdout(),
            stderr = %result.stderr(),
            "result"
        );
        if self.verbose {
            info!(command = %invocation, exit_code = result.exit_code(), "{}", result.combined());
        }
        Ok(result)
    }
}

impl Executor for ShellExecutor {
    fn run<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, Result<CommandResult, ExecutionError>> {
        Box::pin(self.execute(invocation))
    }
}

fn launch_error(invocation: &Invocation, err: &ProcessError) -> ExecutionError {
    let program = match invocation.program() {
        Program::Git => "git".to_string(),
        Program::Shell => "sh".to_string(),
    };
    let message = match err {
        ProcessError::SpawnFailed { source, .. } => source.to_string(),
        other => other.to_string(),
    };
    ExecutionError { program, message }
}
