// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive selection and cherry-pick of remote commits.
//!
//! ```text
//!  AwaitingSelection ──"3,1"──> Applying(0) ──Applied/Empty──> Applying(i+1) ──end──> Finished
//!     ^        |                    |
//!     └─invalid┘                 Conflict
//!                                   v
//!                    AwaitingResolution(i, files)
//!                      "continue" ──> --continue ──> Applying(i+1)   (or re-prompt)
//!                      "abort"    ──> --abort    ──> Finished (rest not attempted)
//! ```
//!
//! The two awaiting states are the only places the session suspends on the
//! operator. An interrupt while suspended, or closed input, ends the session
//! with `Interrupted`; an in-progress cherry-pick is reported and left alone.

use std::path::Path;

use futures_util::future::BoxFuture;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{ErrorKind, WorkflowError};
use crate::git::classify::CherryPickOutcome;
use crate::git::inspector::Inspector;
use crate::git::records::RemoteCommit;

/// What the operator is being asked.
#[derive(Debug, Clone, Copy)]
pub enum Prompt<'a> {
    /// Choose commits by number (1 = newest).
    Selection {
        commits: &'a [RemoteCommit],
        error: Option<&'a str>,
    },
    /// Resolve the conflicts of `commit`, then continue or abort.
    Resolution {
        commit: &'a RemoteCommit,
        files: &'a [String],
        error: Option<&'a str>,
    },
}

/// Source of operator replies. `None` means no more input.
pub trait Operator: Send + Sync {
    fn ask<'a>(&'a self, prompt: Prompt<'a>) -> BoxFuture<'a, Option<String>>;
}

/// Parses `"3, 1"` into 1-based commit numbers in typed order.
///
/// Tokens are separated by commas or whitespace; repeats are dropped.
///
/// # Errors
///
/// `InvalidSelection` for an empty selection, a non-numeric token, or a
/// number outside `1..=count`.
pub fn parse_selection(input: &str, count: usize) -> Result<Vec<usize>, WorkflowError> {
    let mut picked = Vec::new();
    for token in input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let number: usize = token.parse().map_err(|_| {
            WorkflowError::new(
                ErrorKind::InvalidSelection,
                format!("'{token}' is not a commit number"),
            )
        })?;
        if number == 0 || number > count {
            return Err(WorkflowError::new(
                ErrorKind::InvalidSelection,
                format!("{number} is out of range 1-{count}"),
            ));
        }
        if !picked.contains(&number) {
            picked.push(number);
        }
    }
    if picked.is_empty() {
        return Err(WorkflowError::new(
            ErrorKind::InvalidSelection,
            "no commits selected",
        ));
    }
    Ok(picked)
}

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickState {
    AwaitingSelection {
        error: Option<String>,
    },
    Applying {
        index: usize,
    },
    AwaitingResolution {
        index: usize,
        files: Vec<String>,
        error: Option<String>,
    },
    Finished,
}

/// What a finished session did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PickSummary {
    /// Short hashes applied, in order.
    pub applied: Vec<String>,
    /// Short hashes skipped because the change was already present.
    pub skipped: Vec<String>,
    /// Short hash whose pick was rolled back by the operator.
    pub aborted: Option<String>,
    /// Selected short hashes never attempted because of the abort.
    pub not_attempted: Vec<String>,
}

/// One cherry-pick session over a window of remote commits.
#[derive(Debug)]
pub struct PickSession {
    commits: Vec<RemoteCommit>,
    queue: Vec<RemoteCommit>,
    state: PickState,
    summary: PickSummary,
}

impl PickSession {
    #[must_use]
    pub const fn new(commits: Vec<RemoteCommit>) -> Self {
        Self {
            commits,
            queue: Vec::new(),
            state: PickState::AwaitingSelection { error: None },
            summary: PickSummary {
                applied: Vec::new(),
                skipped: Vec::new(),
                aborted: None,
                not_attempted: Vec::new(),
            },
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PickState {
        &self.state
    }

    /// Applies an operator selection while awaiting one.
    ///
    /// An invalid selection keeps the session awaiting, with the error attached
    /// for the next prompt.
    ///
    /// # Errors
    ///
    /// `InvalidSelection` when the input cannot be parsed.
    pub fn select(&mut self, input: &str) -> Result<(), WorkflowError> {
        match parse_selection(input, self.commits.len()) {
            Ok(numbers) => {
                self.queue = numbers
                    .into_iter()
                    .filter_map(|n| self.commits.get(n - 1).cloned())
                    .collect();
                self.state = PickState::Applying { index: 0 };
                Ok(())
            }
            Err(err) => {
                self.state = PickState::AwaitingSelection {
                    error: Some(err.message().to_string()),
                };
                Err(err)
            }
        }
    }

    /// Drives the session until it finishes.
    ///
    /// # Errors
    ///
    /// `Interrupted` on cancellation or closed input, and any unclassified git
    /// failure.
    pub async fn run(
        mut self,
        inspector: &Inspector,
        path: &Path,
        operator: &dyn Operator,
        cancel: &CancellationToken,
    ) -> Result<PickSummary, WorkflowError> {
        loop {
            match std::mem::replace(&mut self.state, PickState::Finished) {
                PickState::AwaitingSelection { error } => {
                    let prompt = Prompt::Selection {
                        commits: &self.commits,
                        error: error.as_deref(),
                    };
                    let reply = ask(operator, prompt, cancel, || {
                        "interrupted while awaiting a selection; nothing was applied".to_string()
                    })
                    .await?;
                    if let Err(err) = self.select(&reply) {
                        warn!(kind = %err.kind(), "{}", err.message());
                    }
                }
                PickState::Applying { index } => {
                    let Some(commit) = self.queue.get(index).cloned() else {
                        return Ok(self.summary);
                    };
                    if cancel.is_cancelled() {
                        return Err(WorkflowError::new(
                            ErrorKind::Interrupted,
                            format!(
                                "interrupted before applying {}; {} applied",
                                commit.short_hash,
                                self.summary.applied.len()
                            ),
                        ));
                    }
                    info!(commit = %commit.short_hash, subject = %commit.subject, "cherry-picking");
                    let outcome = inspector.cherry_pick(path, &commit.hash).await?;
                    self.state = self
                        .after_pick(inspector, path, index, &commit, outcome, false)
                        .await?;
                }
                PickState::AwaitingResolution {
                    index,
                    files,
                    error,
                } => {
                    let Some(commit) = self.queue.get(index).cloned() else {
                        return Ok(self.summary);
                    };
                    let prompt = Prompt::Resolution {
                        commit: &commit,
                        files: &files,
                        error: error.as_deref(),
                    };
                    let reply = ask(operator, prompt, cancel, || {
                        format!(
                            "cherry-pick of {} is still in progress; resolve it and run \
                             'git cherry-pick --continue', or 'git cherry-pick --abort'",
                            commit.short_hash
                        )
                    })
                    .await?;

                    match reply.trim().to_ascii_lowercase().as_str() {
                        "c" | "continue" => {
                            let outcome = inspector.cherry_pick_continue(path).await?;
                            self.state = self
                                .after_pick(inspector, path, index, &commit, outcome, true)
                                .await?;
                        }
                        "a" | "abort" => {
                            inspector.cherry_pick_abort(path).await?;
                            warn!(commit = %commit.short_hash, "cherry-pick aborted by operator");
                            self.summary.aborted = Some(commit.short_hash.clone());
                            self.summary.not_attempted = self.queue[index + 1..]
                                .iter()
                                .map(|c| c.short_hash.clone())
                                .collect();
                            return Ok(self.summary);
                        }
                        other => {
                            self.state = PickState::AwaitingResolution {
                                index,
                                files,
                                error: Some(format!(
                                    "unknown reply '{other}'; type 'continue' or 'abort'"
                                )),
                            };
                        }
                    }
                }
                PickState::Finished => return Ok(self.summary),
            }
        }
    }

    /// Next state after `git cherry-pick` or `--continue` reported `outcome`.
    async fn after_pick(
        &mut self,
        inspector: &Inspector,
        path: &Path,
        index: usize,
        commit: &RemoteCommit,
        outcome: CherryPickOutcome,
        resumed: bool,
    ) -> Result<PickState, WorkflowError> {
        match outcome {
            CherryPickOutcome::Applied => {
                info!(commit = %commit.short_hash, "applied");
                self.summary.applied.push(commit.short_hash.clone());
                Ok(PickState::Applying { index: index + 1 })
            }
            CherryPickOutcome::Empty => {
                inspector.cherry_pick_skip(path).await?;
                warn!(commit = %commit.short_hash, "already applied, skipped");
                self.summary.skipped.push(commit.short_hash.clone());
                Ok(PickState::Applying { index: index + 1 })
            }
            CherryPickOutcome::Conflict => {
                let files = inspector.conflicted_files(path).await?;
                let error = resumed.then(|| format!("conflicts remain in {} file(s)", files.len()));
                warn!(commit = %commit.short_hash, files = files.len(), "cherry-pick conflict");
                Ok(PickState::AwaitingResolution {
                    index,
                    files,
                    error,
                })
            }
        }
    }
}

/// Waits for a reply, giving up on cancellation or closed input.
async fn ask(
    operator: &dyn Operator,
    prompt: Prompt<'_>,
    cancel: &CancellationToken,
    in_progress: impl FnOnce() -> String,
) -> Result<String, WorkflowError> {
    let reply = tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        reply = operator.ask(prompt) => reply,
    };
    reply.ok_or_else(|| WorkflowError::new(ErrorKind::Interrupted, in_progress()))
}
