// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tagged outcomes for git subcommands whose exit codes mix errors and facts.
//!
//! ```text
//! CommandResult ──> classify_* ──> Ok(Outcome)         known fact
//!                              └─> Err(WorkflowError)  ExecutionError + raw result
//!
//! diff-index       0 Clean      1 Changed
//! pull             UpToDate | Updated | Conflict | Unreachable | Failed
//! push             Pushed | Rejected | Unreachable | Failed
//! commit           Committed | NothingToCommit
//! stash pop        Popped | Conflict
//! cherry-pick      Applied | Conflict | Empty
//! ```
//!
//! Messages are matched against the C locale, which the executor forces.

use std::sync::OnceLock;

use regex::RegexSet;

use super::executor::CommandResult;
use crate::error::WorkflowError;

/// Compiles a pattern set once and tests `text` against it.
fn matches(cell: &'static OnceLock<Option<RegexSet>>, patterns: &[&str], text: &str) -> bool {
    cell.get_or_init(|| RegexSet::new(patterns).ok())
        .as_ref()
        .is_some_and(|set| set.is_match(text))
}

fn is_unreachable(text: &str) -> bool {
    static SET: OnceLock<Option<RegexSet>> = OnceLock::new();
    matches(
        &SET,
        &[
            r"couldn't find remote ref",
            r"(?i)could not read from remote repository",
            r"does not appear to be a git repository",
            r"(?i)unable to access",
            r"(?i)could not resolve host",
            r"(?i)connection (refused|timed out)",
            r"(?i)repository .* not found",
        ],
        text,
    )
}

fn is_merge_conflict(text: &str) -> bool {
    static SET: OnceLock<Option<RegexSet>> = OnceLock::new();
    matches(
        &SET,
        &[
            r"(?m)^CONFLICT \(",
            r"(?m)^Automatic merge failed",
            r"(?m)^(error|fatal): .*(unmerged files|unresolved conflict)",
            r"(?m)^(error|fatal): .*you need to resolve your current index first",
        ],
        text,
    )
}

/// Result of `git diff-index --quiet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutcome {
    Clean,
    Changed,
}

/// # Errors
///
/// Any exit code other than 0 or 1 is unexpected.
pub fn classify_diff(result: CommandResult) -> Result<DiffOutcome, WorkflowError> {
    match result.exit_code() {
        0 => Ok(DiffOutcome::Clean),
        1 => Ok(DiffOutcome::Changed),
        _ => Err(WorkflowError::unexpected("git diff-index", result)),
    }
}

/// Result of `git pull`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    UpToDate,
    Updated,
    Conflict,
    Unreachable,
    /// Any other failure; the caller normalizes it with the raw result.
    Failed,
}

#[must_use]
pub fn classify_pull(result: &CommandResult) -> PullOutcome {
    let text = result.combined();
    if result.success() {
        if text.contains("Already up to date") || text.contains("Already up-to-date") {
            PullOutcome::UpToDate
        } else {
            PullOutcome::Updated
        }
    } else if is_merge_conflict(&text) {
        PullOutcome::Conflict
    } else if is_unreachable(&text) {
        PullOutcome::Unreachable
    } else {
        PullOutcome::Failed
    }
}

/// Result of `git push`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    Rejected,
    Unreachable,
    Failed,
}

#[must_use]
pub fn classify_push(result: &CommandResult) -> PushOutcome {
    static REJECTED: OnceLock<Option<RegexSet>> = OnceLock::new();
    if result.success() {
        return PushOutcome::Pushed;
    }
    let text = result.combined();
    if matches(
        &REJECTED,
        &[
            r"\[rejected\]",
            r"non-fast-forward",
            r"\(fetch first\)",
            r"Updates were rejected",
        ],
        &text,
    ) {
        PushOutcome::Rejected
    } else if is_unreachable(&text) {
        PushOutcome::Unreachable
    } else {
        PushOutcome::Failed
    }
}

/// Result of `git commit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    NothingToCommit,
}

/// # Errors
///
/// A failed commit that is not the "nothing to commit" condition.
pub fn classify_commit(result: CommandResult) -> Result<CommitOutcome, WorkflowError> {
    static NOTHING: OnceLock<Option<RegexSet>> = OnceLock::new();
    if result.success() {
        return Ok(CommitOutcome::Committed);
    }
    if matches(
        &NOTHING,
        &[
            r"nothing to commit",
            r"nothing added to commit",
            r"no changes added to commit",
        ],
        &result.combined(),
    ) {
        Ok(CommitOutcome::NothingToCommit)
    } else {
        Err(WorkflowError::unexpected("git commit", result))
    }
}

/// Result of `git stash pop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StashPopOutcome {
    Popped,
    /// Git keeps the entry when it cannot apply cleanly.
    Conflict,
}

/// A zero exit is always a clean pop, whatever the printed status lists.
///
/// # Errors
///
/// A failed pop that does not look like a conflict.
pub fn classify_stash_pop(result: CommandResult) -> Result<StashPopOutcome, WorkflowError> {
    static KEPT: OnceLock<Option<RegexSet>> = OnceLock::new();
    if result.success() {
        return Ok(StashPopOutcome::Popped);
    }
    if matches(
        &KEPT,
        &[
            r"(?m)^CONFLICT \(",
            r"(?m)stash entry is kept",
            r"(?im)^(error: )?could not restore untracked files",
            r"already exists, no checkout",
            r"(?m)^error: .*would be overwritten by merge",
        ],
        &result.combined(),
    ) {
        Ok(StashPopOutcome::Conflict)
    } else {
        Err(WorkflowError::unexpected("git stash pop", result))
    }
}

/// Result of `git cherry-pick` or `git cherry-pick --continue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CherryPickOutcome {
    Applied,
    Conflict,
    /// The change is already on the branch; git left an empty pick pending.
    Empty,
}

/// Conflicts are checked first: git echoes the commit subject in its
/// conflict report, so only git's own line prefixes are matched.
///
/// # Errors
///
/// A failed pick that is neither a conflict nor an empty pick.
pub fn classify_cherry_pick(result: CommandResult) -> Result<CherryPickOutcome, WorkflowError> {
    static CONFLICT: OnceLock<Option<RegexSet>> = OnceLock::new();
    static EMPTY: OnceLock<Option<RegexSet>> = OnceLock::new();
    if result.success() {
        return Ok(CherryPickOutcome::Applied);
    }
    let text = result.combined();
    if is_merge_conflict(&text)
        || matches(
            &CONFLICT,
            &[
                r"(?m)^error: could not apply ",
                r"(?m)^hint: (?i:after resolving the conflicts)",
            ],
            &text,
        )
    {
        Ok(CherryPickOutcome::Conflict)
    } else if matches(&EMPTY, &[r"(?m)^The previous cherry-pick is now empty"], &text) {
        Ok(CherryPickOutcome::Empty)
    } else {
        Err(WorkflowError::unexpected("git cherry-pick", result))
    }
}

/// True when `git fetch`/`ls-remote` failed because the remote or ref is missing.
#[must_use]
pub fn is_remote_unreachable(result: &CommandResult) -> bool {
    !result.success() && is_unreachable(&result.combined())
}
