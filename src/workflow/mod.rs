// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Staged git workflows.
//!
//! ```text
//!   TaskContext ─┐
//!   Executor ────┼──> Engine::run(kind) ──> StageEvent* ──> RunReport
//!   Operator ────┘          |
//!                           +── stage::{successor, skip_reason}   pure table
//!                           +── state::RunState                   per run
//!                           '── pick::PickSession                 cherry-pick
//! ```
//!
//! | Workflow     | Stages                                                                                    |
//! |--------------|-------------------------------------------------------------------------------------------|
//! | standard     | Init, RepoCheck, Pull, PreCommand, DetectChanges, StageAndCommit, Push, PostCommand, FinalPull, Done |
//! | update       | Init, RepoCheck, StashIfDirty, Pull, PopStash, DetectChanges, StageAndCommit, Push, Done  |
//! | show-commits | Init, RepoCheck, ListCommits, Done                                                        |
//! | cherry-pick  | Init, RepoCheck, CherryPick, Done                                                         |

pub mod engine;
pub mod event;
pub mod pick;
pub mod stage;
pub mod state;

pub use engine::{Engine, EngineOptions};
pub use event::{EventSink, RunOutcome, RunReport, StageEvent, StageOutcome};
pub use pick::{Operator, PickSession, PickState, PickSummary, Prompt};
pub use stage::{Stage, WorkflowKind};
pub use state::RunState;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;
