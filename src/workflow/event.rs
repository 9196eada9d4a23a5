// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Structured events emitted by the engine.
//!
//! ```text
//! per stage   StageEvent { stage, outcome: ok|skipped|failed, detail, result? }
//! once        RunReport  { task, workflow, outcome, error_kind?, stage?, ... }
//! ```

use serde::Serialize;

use super::stage::{Stage, WorkflowKind};
use crate::error::ErrorKind;
use crate::git::executor::CommandResult;
use crate::git::records::RemoteCommit;

/// How a single stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageOutcome {
    Ok,
    Skipped,
    Failed,
}

/// Outcome of one stage. `result` is only populated in verbose mode.
#[derive(Debug, Clone, Serialize)]
pub struct StageEvent {
    pub stage: Stage,
    pub outcome: StageOutcome,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandResult>,
}

/// Overall result of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunOutcome {
    /// Changes were committed and pushed.
    Pushed,
    /// Changes were committed; pushing was disabled.
    Committed,
    /// Nothing to commit. A success.
    NoChanges,
    /// A listing or cherry-pick session finished.
    Completed,
    Failed,
    Interrupted,
}

impl RunOutcome {
    #[must_use]
    pub const fn is_success(self) -> bool {
        !matches!(self, Self::Failed | Self::Interrupted)
    }
}

/// Terminal event of a run, emitted exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub task: String,
    pub workflow: WorkflowKind,
    pub outcome: RunOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Stage that failed or was interrupted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub commits_created: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit: Option<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commits: Vec<RemoteCommit>,
}

impl RunReport {
    /// Process exit code: 0 on success (including no changes), 1 otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        if self.outcome.is_success() { 0 } else { 1 }
    }
}

/// Receives engine events as they happen.
pub trait EventSink: Send + Sync {
    fn stage(&self, event: &StageEvent);
    fn finish(&self, report: &RunReport);
}
