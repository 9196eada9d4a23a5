// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stages, workflow kinds, and the pure transition table.
//!
//! None of this touches git; the engine asks [`successor`] where to go and
//! [`skip_reason`] whether to bypass a stage.

use std::fmt;

use serde::Serialize;

use super::state::RunState;
use crate::task::TaskContext;

/// One named step of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    Init,
    RepoCheck,
    StashIfDirty,
    Pull,
    PopStash,
    PreCommand,
    DetectChanges,
    StageAndCommit,
    Push,
    PostCommand,
    FinalPull,
    ListCommits,
    CherryPick,
    Done,
    Failed,
}

impl Stage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::RepoCheck => "RepoCheck",
            Self::StashIfDirty => "StashIfDirty",
            Self::Pull => "Pull",
            Self::PopStash => "PopStash",
            Self::PreCommand => "PreCommand",
            Self::DetectChanges => "DetectChanges",
            Self::StageAndCommit => "StageAndCommit",
            Self::Push => "Push",
            Self::PostCommand => "PostCommand",
            Self::FinalPull => "FinalPull",
            Self::ListCommits => "ListCommits",
            Self::CherryPick => "CherryPick",
            Self::Done => "Done",
            Self::Failed => "Failed",
        }
    }

    /// `Done` and `Failed` end a run.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry workflow selected by the invocation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowKind {
    /// Pull, pre-command, commit, push, post-command, final pull.
    Standard,
    /// Stash-safe sync; hooks never run.
    Update,
    /// List recent remote commits.
    ShowCommits,
    /// Interactive selection and cherry-pick of remote commits.
    CherryPick,
}

impl WorkflowKind {
    /// Ordered stage set, `Init` first and `Done` last.
    #[must_use]
    pub const fn stages(self) -> &'static [Stage] {
        use Stage::{
            CherryPick, DetectChanges, Done, FinalPull, Init, ListCommits, PopStash, PostCommand,
            PreCommand, Pull, Push, RepoCheck, StageAndCommit, StashIfDirty,
        };
        match self {
            Self::Standard => &[
                Init,
                RepoCheck,
                Pull,
                PreCommand,
                DetectChanges,
                StageAndCommit,
                Push,
                PostCommand,
                FinalPull,
                Done,
            ],
            Self::Update => &[
                Init,
                RepoCheck,
                StashIfDirty,
                Pull,
                PopStash,
                DetectChanges,
                StageAndCommit,
                Push,
                Done,
            ],
            Self::ShowCommits => &[Init, RepoCheck, ListCommits, Done],
            Self::CherryPick => &[Init, RepoCheck, CherryPick, Done],
        }
    }

    /// Whether `RepoCheck` may initialize a missing repository.
    #[must_use]
    pub const fn may_initialize(self) -> bool {
        matches!(self, Self::Standard | Self::Update)
    }

    /// Whether `RepoCheck` moves HEAD onto the configured branch.
    #[must_use]
    pub const fn switches_branch(self) -> bool {
        !matches!(self, Self::ShowCommits)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Update => "update",
            Self::ShowCommits => "show-commits",
            Self::CherryPick => "cherry-pick",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage that follows `stage` in `kind`. Terminal stages map to themselves,
/// as does any stage outside the workflow's set.
#[must_use]
pub fn successor(kind: WorkflowKind, stage: Stage) -> Stage {
    if stage.is_terminal() {
        return stage;
    }
    let stages = kind.stages();
    stages
        .iter()
        .position(|s| *s == stage)
        .and_then(|i| stages.get(i + 1))
        .copied()
        .unwrap_or(Stage::Failed)
}

/// Why `stage` is bypassed for this task and run, if it is.
#[must_use]
pub fn skip_reason(
    kind: WorkflowKind,
    stage: Stage,
    ctx: &TaskContext,
    state: &RunState,
) -> Option<&'static str> {
    match stage {
        Stage::Pull if kind == WorkflowKind::Standard && !ctx.pull_before_command() => {
            Some("pull disabled for this task")
        }
        Stage::FinalPull if !ctx.pull_before_command() => Some("pull disabled for this task"),
        Stage::PreCommand | Stage::PostCommand if kind == WorkflowKind::Update => {
            Some("hooks never run in the update workflow")
        }
        Stage::PreCommand if ctx.pre_command().trim().is_empty() => Some("no pre-command"),
        Stage::StageAndCommit if !state.changes_detected() => Some("no changes"),
        Stage::Push if !state.changes_detected() => Some("no changes"),
        Stage::Push if !ctx.push_after_command() => Some("push disabled for this task"),
        Stage::PostCommand if ctx.post_command().trim().is_empty() => Some("no post-command"),
        Stage::PostCommand if !state.changes_detected() => Some("no changes"),
        Stage::PopStash if state.pending_stash().is_none() => Some("nothing was stashed"),
        _ => None,
    }
}
