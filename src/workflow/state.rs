// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Run-scoped mutable state, owned by the engine for one invocation.

use serde::Serialize;

use super::stage::Stage;
use crate::error::{ErrorKind, WorkflowError};
use crate::git::executor::CommandResult;
use crate::git::records::{RemoteCommit, StashEntry};

/// A failure recorded against the stage that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandResult>,
}

/// Mutable facts accumulated while a workflow runs.
#[derive(Debug, Clone)]
pub struct RunState {
    current_stage: Stage,
    stash_created: bool,
    pending_stash: Option<StashEntry>,
    changes_detected: bool,
    last_commit_hash: Option<String>,
    commits_created: usize,
    pushed: bool,
    errors: Vec<ErrorRecord>,
    warnings: Vec<String>,
    remote_commits: Vec<RemoteCommit>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            current_stage: Stage::Init,
            stash_created: false,
            pending_stash: None,
            changes_detected: false,
            last_commit_hash: None,
            commits_created: 0,
            pushed: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            remote_commits: Vec::new(),
        }
    }
}

impl RunState {
    #[must_use]
    pub const fn current_stage(&self) -> Stage {
        self.current_stage
    }

    pub(crate) const fn enter(&mut self, stage: Stage) {
        self.current_stage = stage;
    }

    #[must_use]
    pub const fn stash_created(&self) -> bool {
        self.stash_created
    }

    /// Stash created by this run and not yet popped.
    #[must_use]
    pub const fn pending_stash(&self) -> Option<&StashEntry> {
        self.pending_stash.as_ref()
    }

    pub(crate) fn record_stash(&mut self, entry: StashEntry) {
        self.stash_created = true;
        self.pending_stash = Some(entry);
    }

    pub(crate) fn clear_stash(&mut self) {
        self.pending_stash = None;
    }

    #[must_use]
    pub const fn changes_detected(&self) -> bool {
        self.changes_detected
    }

    pub(crate) const fn set_changes_detected(&mut self, changed: bool) {
        self.changes_detected = changed;
    }

    #[must_use]
    pub fn last_commit_hash(&self) -> Option<&str> {
        self.last_commit_hash.as_deref()
    }

    #[must_use]
    pub const fn commits_created(&self) -> usize {
        self.commits_created
    }

    pub(crate) fn record_commit(&mut self, hash: String) {
        self.commits_created += 1;
        self.last_commit_hash = Some(hash);
    }

    /// Counts commits made outside `StageAndCommit` (cherry-picks).
    pub(crate) fn record_commits(&mut self, count: usize, head: Option<String>) {
        self.commits_created += count;
        if head.is_some() {
            self.last_commit_hash = head;
        }
    }

    #[must_use]
    pub const fn pushed(&self) -> bool {
        self.pushed
    }

    pub(crate) const fn mark_pushed(&mut self) {
        self.pushed = true;
    }

    #[must_use]
    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub(crate) fn record_error(&mut self, stage: Stage, err: &WorkflowError) {
        self.errors.push(ErrorRecord {
            stage,
            kind: err.kind(),
            message: err.message().to_string(),
            result: err.result().cloned(),
        });
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    #[must_use]
    pub fn remote_commits(&self) -> &[RemoteCommit] {
        &self.remote_commits
    }

    pub(crate) fn set_remote_commits(&mut self, commits: Vec<RemoteCommit>) {
        self.remote_commits = commits;
    }
}
