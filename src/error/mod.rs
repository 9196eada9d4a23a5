// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error types.
//!
//! ```text
//! anyhow::Result at the command layer, typed errors below it:
//!
//! Workflow  WorkflowError { kind: ErrorKind, message, result? }
//! Config    ReadError, ParseError, MissingKey, InvalidValue, NotFound, AlreadyExists
//! Process   ExecutableNotFound, SpawnFailed, NonZeroExit, OutputError
//!
//! ErrorKind is the stable, scriptable name of a workflow failure:
//!   ExecutionError NotAGitRepository RemoteUnreachable MergeConflict
//!   PreCommandFailed PostCommandFailed PushRejected StashConflict
//!   InvalidSelection Interrupted
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::git::executor::CommandResult;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

// --- Workflow Errors ---

/// Classification of a workflow failure.
///
/// The string form is part of the final event and must stay stable for
/// scripting consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// A subprocess could not be launched, or failed in an unclassified way.
    ExecutionError,
    /// The task path holds no repository and initialization was not requested.
    NotAGitRepository,
    /// The remote or the remote branch could not be resolved.
    RemoteUnreachable,
    /// A pull produced merge conflicts.
    MergeConflict,
    /// The pre-command exited non-zero.
    PreCommandFailed,
    /// The post-command exited non-zero.
    PostCommandFailed,
    /// The remote refused a non-fast-forward push.
    PushRejected,
    /// Re-applying the stash produced conflicts; the stash is kept.
    StashConflict,
    /// Operator selection could not be parsed (recoverable by re-prompting).
    InvalidSelection,
    /// The operator interrupted the run.
    Interrupted,
}

impl ErrorKind {
    /// Stable name used in final events and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExecutionError => "ExecutionError",
            Self::NotAGitRepository => "NotAGitRepository",
            Self::RemoteUnreachable => "RemoteUnreachable",
            Self::MergeConflict => "MergeConflict",
            Self::PreCommandFailed => "PreCommandFailed",
            Self::PostCommandFailed => "PostCommandFailed",
            Self::PushRejected => "PushRejected",
            Self::StashConflict => "StashConflict",
            Self::InvalidSelection => "InvalidSelection",
            Self::Interrupted => "Interrupted",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure that ends a workflow stage.
///
/// Unexpected subprocess failures are normalized to
/// [`ErrorKind::ExecutionError`] with the raw result attached.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct WorkflowError {
    kind: ErrorKind,
    message: String,
    result: Option<CommandResult>,
}

impl WorkflowError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            result: None,
        }
    }

    /// Attaches the command result that triggered this error.
    #[must_use]
    pub fn with_result(mut self, result: CommandResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Normalizes an unexpected command outcome.
    pub fn unexpected(what: impl Into<String>, result: CommandResult) -> Self {
        let what = what.into();
        let message = match result.stderr().lines().next() {
            Some(line) if !line.is_empty() => {
                format!("{what} exited with code {}: {line}", result.exit_code())
            }
            _ => format!("{what} exited with code {}", result.exit_code()),
        };
        Self::new(ErrorKind::ExecutionError, message).with_result(result)
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Raw command result, if one caused the failure.
    #[must_use]
    pub const fn result(&self) -> Option<&CommandResult> {
        self.result.as_ref()
    }
}

/// The target program could not be launched at all.
///
/// A launched program exiting non-zero is never an `ExecutionError`; it is
/// reported as data in [`CommandResult`].
#[derive(Debug, Clone, Error)]
#[error("failed to launch '{program}': {message}")]
pub struct ExecutionError {
    pub program: String,
    pub message: String,
}

impl From<ExecutionError> for WorkflowError {
    fn from(err: ExecutionError) -> Self {
        Self::new(ErrorKind::ExecutionError, err.to_string())
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required key '{key}' in task '{task}'")]
    MissingKey { task: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in task '{task}': {message}")]
    InvalidValue {
        task: String,
        key: String,
        message: String,
    },

    /// Configuration file not found.
    #[error("task file not found: {0}")]
    NotFound(String),

    /// Refusing to replace an existing task file.
    #[error("task file already exists: {0} (use --overwrite to replace it)")]
    AlreadyExists(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Failed while waiting on or talking to the process.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}
