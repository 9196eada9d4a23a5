// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The workflow engine: walks a [`WorkflowKind`]'s stages for one task.
//!
//! ```text
//! Engine::run(kind)
//!   loop stage in kind.stages():
//!     cancelled?       -> Failed(Interrupted @ stage)
//!     skip_reason()?   -> StageEvent::skipped
//!     execute(stage)   -> StageEvent::ok | skipped
//!                      -> Err(WorkflowError) -> StageEvent::failed -> Failed
//!   RunReport (exactly once)
//! ```

use std::sync::Arc;

use bon::Builder;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span, warn};

use super::event::{EventSink, RunOutcome, RunReport, StageEvent, StageOutcome};
use super::pick::{Operator, PickSession};
use super::stage::{Stage, WorkflowKind, skip_reason, successor};
use super::state::RunState;
use crate::error::{ErrorKind, WorkflowError};
use crate::git::classify::{CommitOutcome, PullOutcome, PushOutcome, StashPopOutcome};
use crate::git::executor::{CommandResult, Executor, Invocation};
use crate::git::inspector::{DEFAULT_COMMIT_LIMIT, Inspector};
use crate::task::{Clock, SystemClock, TaskContext};

/// Invocation flags that shape a run.
#[derive(Debug, Clone, Copy, Builder)]
pub struct EngineOptions {
    /// Create the repository when `repo_path` holds none.
    #[builder(default)]
    pub initialize: bool,
    /// Attach raw command results to stage events.
    #[builder(default)]
    pub verbose: bool,
    /// Remote commits listed or offered for selection.
    #[builder(default = DEFAULT_COMMIT_LIMIT)]
    pub commit_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// How a stage that ran ended.
struct Step {
    outcome: StageOutcome,
    detail: String,
    result: Option<CommandResult>,
}

impl Step {
    fn ok(detail: impl Into<String>) -> Self {
        Self {
            outcome: StageOutcome::Ok,
            detail: detail.into(),
            result: None,
        }
    }

    fn skipped(detail: impl Into<String>) -> Self {
        Self {
            outcome: StageOutcome::Skipped,
            detail: detail.into(),
            result: None,
        }
    }

    fn with_result(mut self, result: CommandResult) -> Self {
        self.result = Some(result);
        self
    }
}

type StepResult = Result<Step, WorkflowError>;

/// Drives one task through one workflow.
#[derive(Builder)]
pub struct Engine {
    executor: Arc<dyn Executor>,
    context: TaskContext,
    #[builder(default)]
    options: EngineOptions,
    #[builder(default)]
    cancel: CancellationToken,
    #[builder(default = Arc::new(SystemClock) as Arc<dyn Clock>)]
    clock: Arc<dyn Clock>,
    operator: Option<Arc<dyn Operator>>,
    #[builder(default)]
    sinks: Vec<Arc<dyn EventSink>>,
}

impl Engine {
    fn inspector(&self) -> Inspector {
        Inspector::new(self.executor.clone(), self.context.command_timeout())
    }

    /// Runs `kind` to a terminal stage and returns the final report.
    ///
    /// Never fails: every failure is classified into the report, which is
    /// also delivered to the sinks exactly once.
    pub async fn run(&self, kind: WorkflowKind) -> RunReport {
        let span = info_span!("task", name = %self.context.name(), workflow = %kind);
        async {
            let mut state = RunState::default();
            let failure = self.walk(kind, &mut state).await;
            let report = self.report(kind, &state, failure);
            self.finish(&report);
            report
        }
        .instrument(span)
        .await
    }

    async fn walk(
        &self,
        kind: WorkflowKind,
        state: &mut RunState,
    ) -> Option<(Stage, WorkflowError)> {
        let inspector = self.inspector();
        let mut stage = Stage::Init;

        while !stage.is_terminal() {
            state.enter(stage);

            if self.cancel.is_cancelled() {
                let err = WorkflowError::new(
                    ErrorKind::Interrupted,
                    format!("interrupted before {stage}"),
                );
                return Some(self.fail(state, stage, err));
            }

            if let Some(reason) = skip_reason(kind, stage, &self.context, state) {
                self.emit(stage, Step::skipped(reason));
                stage = successor(kind, stage);
                continue;
            }

            match self.execute(kind, stage, &inspector, state).await {
                Ok(step) => self.emit(stage, step),
                Err(err) => return Some(self.fail(state, stage, err)),
            }
            stage = successor(kind, stage);
        }

        state.enter(stage);
        None
    }

    async fn execute(
        &self,
        kind: WorkflowKind,
        stage: Stage,
        inspector: &Inspector,
        state: &mut RunState,
    ) -> StepResult {
        match stage {
            Stage::Init => Ok(Step::ok(format!(
                "{} at {} ({} on {})",
                self.context.name(),
                self.context.repo_path().display(),
                self.context.branch(),
                self.context.origin()
            ))),
            Stage::RepoCheck => self.repo_check(kind, inspector, state).await,
            Stage::StashIfDirty => self.stash_if_dirty(inspector, state).await,
            Stage::Pull | Stage::FinalPull => self.pull(kind, inspector, state).await,
            Stage::PopStash => self.pop_stash(inspector, state).await,
            Stage::PreCommand => {
                self.hook(self.context.pre_command(), ErrorKind::PreCommandFailed, "pre-command")
                    .await
            }
            Stage::PostCommand => {
                self.hook(self.context.post_command(), ErrorKind::PostCommandFailed, "post-command")
                    .await
            }
            Stage::DetectChanges => {
                let changed = inspector
                    .has_uncommitted_changes(self.context.repo_path())
                    .await?;
                state.set_changes_detected(changed);
                Ok(Step::ok(if changed { "changes detected" } else { "no changes" }))
            }
            Stage::StageAndCommit => self.stage_and_commit(inspector, state).await,
            Stage::Push => self.push(inspector, state).await,
            Stage::ListCommits => {
                let commits: Vec<_> = inspector
                    .list_remote_commits(
                        self.context.repo_path(),
                        self.context.origin(),
                        self.context.branch(),
                        self.options.commit_limit,
                    )
                    .await?
                    .collect();
                let detail = format!("{} remote commit(s)", commits.len());
                state.set_remote_commits(commits);
                Ok(Step::ok(detail))
            }
            Stage::CherryPick => self.cherry_pick(inspector, state).await,
            Stage::Done | Stage::Failed => Ok(Step::ok("")),
        }
    }

    async fn repo_check(
        &self,
        kind: WorkflowKind,
        inspector: &Inspector,
        state: &mut RunState,
    ) -> StepResult {
        let path = self.context.repo_path();
        let mut notes = Vec::new();

        if !inspector.is_repository(path) {
            if !(self.options.initialize && kind.may_initialize()) {
                return Err(WorkflowError::new(
                    ErrorKind::NotAGitRepository,
                    format!("'{}' is not a git repository", path.display()),
                ));
            }
            inspector.init(path).await?;
            inspector.setup_remote(path, self.context.origin()).await?;
            info!(path = %path.display(), "initialized repository");
            notes.push("initialized repository".to_string());
        }

        if kind.switches_branch() {
            let branch = self.context.branch();
            if inspector.branch_exists(path, branch).await? {
                let current = inspector.current_branch(path).await?;
                if current.as_deref() != Some(branch) {
                    inspector.checkout(path, branch).await?;
                    notes.push(format!("checked out '{branch}'"));
                }
            } else {
                let warning = inspector
                    .create_and_track_branch(path, branch, self.context.origin())
                    .await?;
                notes.push(format!("created branch '{branch}'"));
                if let Some(warning) = warning {
                    warn!("{warning}");
                    state.warn(warning);
                }
            }
        }

        if notes.is_empty() {
            Ok(Step::ok("repository ok"))
        } else {
            Ok(Step::ok(notes.join("; ")))
        }
    }

    async fn stash_if_dirty(&self, inspector: &Inspector, state: &mut RunState) -> StepResult {
        let path = self.context.repo_path();
        if !inspector.has_uncommitted_changes(path).await? {
            return Ok(Step::skipped("working tree clean"));
        }

        let label = format!(
            "gitauto:{}:{}",
            self.context.name(),
            self.clock.now().format("%Y%m%dT%H%M%S")
        );
        match inspector.create_stash(path, &label).await? {
            Some(entry) => {
                let detail = format!("stashed local changes as {}", entry.reference());
                state.record_stash(entry);
                Ok(Step::ok(detail))
            }
            None => Ok(Step::skipped("nothing to stash")),
        }
    }

    async fn pull(
        &self,
        kind: WorkflowKind,
        inspector: &Inspector,
        state: &mut RunState,
    ) -> StepResult {
        let path = self.context.repo_path();
        let (origin, branch) = (self.context.origin(), self.context.branch());
        let (outcome, result) = inspector.pull(path, origin, branch).await?;

        match outcome {
            PullOutcome::UpToDate => Ok(Step::ok("already up to date").with_result(result)),
            PullOutcome::Updated => {
                Ok(Step::ok(format!("merged {origin}/{branch}")).with_result(result))
            }
            PullOutcome::Conflict => {
                let files = inspector.conflicted_files(path).await.unwrap_or_default();
                let mut message = format!("pulling '{branch}' from '{origin}' produced conflicts");
                if !files.is_empty() {
                    message.push_str(": ");
                    message.push_str(&files.join(", "));
                }
                Err(WorkflowError::new(ErrorKind::MergeConflict, message).with_result(result))
            }
            PullOutcome::Unreachable => {
                if kind == WorkflowKind::Update
                    && let Some(entry) = state.pending_stash().cloned()
                {
                    // The pull touched nothing, so the stash goes back onto the same tree.
                    match inspector.pop_stash(path, &entry).await {
                        Ok(StashPopOutcome::Popped) => {
                            state.clear_stash();
                            state.warn(format!("restored {} after failed pull", entry.reference()));
                        }
                        Ok(StashPopOutcome::Conflict) | Err(_) => state.warn(format!(
                            "local changes remain stashed as '{}'",
                            entry.description
                        )),
                    }
                }
                Err(WorkflowError::new(
                    ErrorKind::RemoteUnreachable,
                    format!("cannot pull '{branch}' from '{origin}'"),
                )
                .with_result(result))
            }
            PullOutcome::Failed => Err(WorkflowError::unexpected("git pull", result)),
        }
    }

    async fn pop_stash(&self, inspector: &Inspector, state: &mut RunState) -> StepResult {
        let Some(entry) = state.pending_stash().cloned() else {
            return Ok(Step::skipped("nothing was stashed"));
        };
        match inspector.pop_stash(self.context.repo_path(), &entry).await? {
            StashPopOutcome::Popped => {
                state.clear_stash();
                Ok(Step::ok("restored local changes"))
            }
            StashPopOutcome::Conflict => Err(WorkflowError::new(
                ErrorKind::StashConflict,
                format!(
                    "restoring '{}' conflicts with the pulled changes; \
                     resolve manually, the stash entry is kept",
                    entry.description
                ),
            )),
        }
    }

    async fn hook(&self, command: &str, failure: ErrorKind, what: &str) -> StepResult {
        let invocation = Invocation::shell(self.context.repo_path(), command)
            .with_timeout(self.context.command_timeout());
        let result = self.executor.run(&invocation).await?;

        if result.success() {
            return Ok(Step::ok(format!("{what} succeeded")).with_result(result));
        }
        if self.cancel.is_cancelled() {
            return Err(WorkflowError::new(
                ErrorKind::Interrupted,
                format!("{what} interrupted"),
            )
            .with_result(result));
        }
        let mut message = format!("{what} exited with code {}", result.exit_code());
        if let Some(line) = result.stderr().lines().find(|l| !l.trim().is_empty()) {
            message.push_str(": ");
            message.push_str(line.trim());
        }
        Err(WorkflowError::new(failure, message).with_result(result))
    }

    async fn stage_and_commit(&self, inspector: &Inspector, state: &mut RunState) -> StepResult {
        let path = self.context.repo_path();
        let message = self
            .context
            .commit_message(self.clock.as_ref())
            .map_err(|e| WorkflowError::new(ErrorKind::ExecutionError, e))?;

        inspector.stage_all(path).await?;
        match inspector.commit(path, &message).await? {
            CommitOutcome::Committed => {
                let hash = inspector.head_hash(path).await?;
                let detail = format!("committed {}: {message}", short(&hash));
                state.record_commit(hash);
                Ok(Step::ok(detail))
            }
            CommitOutcome::NothingToCommit => {
                state.set_changes_detected(false);
                Ok(Step::skipped("nothing to commit"))
            }
        }
    }

    async fn push(&self, inspector: &Inspector, state: &mut RunState) -> StepResult {
        let (origin, branch) = (self.context.origin(), self.context.branch());
        let (outcome, result) = inspector
            .push(self.context.repo_path(), origin, branch)
            .await?;
        match outcome {
            PushOutcome::Pushed => {
                state.mark_pushed();
                Ok(Step::ok(format!("pushed to {origin}/{branch}")).with_result(result))
            }
            PushOutcome::Rejected => Err(WorkflowError::new(
                ErrorKind::PushRejected,
                format!("'{origin}' rejected the push of '{branch}' (non-fast-forward)"),
            )
            .with_result(result)),
            PushOutcome::Unreachable => Err(WorkflowError::new(
                ErrorKind::RemoteUnreachable,
                format!("cannot push '{branch}' to '{origin}'"),
            )
            .with_result(result)),
            PushOutcome::Failed => Err(WorkflowError::unexpected("git push", result)),
        }
    }

    async fn cherry_pick(&self, inspector: &Inspector, state: &mut RunState) -> StepResult {
        let path = self.context.repo_path();
        let Some(operator) = self.operator.as_deref() else {
            return Err(WorkflowError::new(
                ErrorKind::ExecutionError,
                "interactive cherry-pick needs an operator",
            ));
        };

        let commits: Vec<_> = inspector
            .list_remote_commits(
                path,
                self.context.origin(),
                self.context.branch(),
                self.options.commit_limit,
            )
            .await?
            .collect();
        if commits.is_empty() {
            return Ok(Step::skipped("no remote commits to pick"));
        }
        state.set_remote_commits(commits.clone());

        let summary = PickSession::new(commits)
            .run(inspector, path, operator, &self.cancel)
            .await?;

        let head = if summary.applied.is_empty() {
            None
        } else {
            Some(inspector.head_hash(path).await?)
        };
        state.record_commits(summary.applied.len(), head);
        for skipped in &summary.skipped {
            state.warn(format!("{skipped} is already on the branch, skipped"));
        }

        let mut detail = format!("applied {}", summary.applied.len());
        if let Some(aborted) = &summary.aborted {
            use std::fmt::Write as _;
            let _ = write!(
                detail,
                "; aborted at {aborted}, {} not attempted",
                summary.not_attempted.len()
            );
            state.warn(format!("cherry-pick of {aborted} aborted by operator"));
        }
        Ok(Step::ok(detail))
    }

    fn emit(&self, stage: Stage, step: Step) {
        let event = StageEvent {
            stage,
            outcome: step.outcome,
            detail: step.detail,
            result: if self.options.verbose { step.result } else { None },
        };
        match event.outcome {
            StageOutcome::Ok => info!(stage = %stage, "{}", event.detail),
            StageOutcome::Skipped => info!(stage = %stage, "skipped: {}", event.detail),
            StageOutcome::Failed => error!(stage = %stage, "{}", event.detail),
        }
        for sink in &self.sinks {
            sink.stage(&event);
        }
    }

    fn fail(
        &self,
        state: &mut RunState,
        stage: Stage,
        err: WorkflowError,
    ) -> (Stage, WorkflowError) {
        state.record_error(stage, &err);
        let step = Step {
            outcome: StageOutcome::Failed,
            detail: err.to_string(),
            result: err.result().cloned(),
        };
        self.emit(stage, step);
        state.enter(Stage::Failed);
        (stage, err)
    }

    fn report(
        &self,
        kind: WorkflowKind,
        state: &RunState,
        failure: Option<(Stage, WorkflowError)>,
    ) -> RunReport {
        let outcome = match (&failure, kind) {
            (Some((_, err)), _) if err.kind() == ErrorKind::Interrupted => RunOutcome::Interrupted,
            (Some(_), _) => RunOutcome::Failed,
            (None, WorkflowKind::ShowCommits | WorkflowKind::CherryPick) => RunOutcome::Completed,
            (None, _) if state.pushed() => RunOutcome::Pushed,
            (None, _) if state.commits_created() > 0 => RunOutcome::Committed,
            (None, _) => RunOutcome::NoChanges,
        };
        let (stage, error_kind, message) = failure.map_or((None, None, None), |(stage, err)| {
            (Some(stage), Some(err.kind()), Some(err.message().to_string()))
        });

        RunReport {
            task: self.context.name().to_string(),
            workflow: kind,
            outcome,
            error_kind,
            stage,
            message,
            commits_created: state.commits_created(),
            last_commit: state.last_commit_hash().map(String::from),
            warnings: state.warnings().to_vec(),
            commits: state.remote_commits().to_vec(),
        }
    }

    fn finish(&self, report: &RunReport) {
        match report.error_kind {
            Some(kind) => error!(
                outcome = ?report.outcome,
                error_kind = %kind,
                stage = ?report.stage,
                "task failed"
            ),
            None => info!(
                outcome = ?report.outcome,
                commits = report.commits_created,
                "task finished"
            ),
        }
        for sink in &self.sinks {
            sink.finish(report);
        }
    }
}

fn short(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}
