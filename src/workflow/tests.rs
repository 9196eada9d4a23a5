// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::engine::{Engine, EngineOptions};
use super::event::{EventSink, RunOutcome, RunReport, StageOutcome};
use super::pick::{Operator, parse_selection};
use super::stage::{Stage, WorkflowKind, skip_reason, successor};
use super::state::RunState;
use super::testing::{InterruptAtResolution, RecordingSink, ScriptedOperator};
use crate::error::ErrorKind;
use crate::git::executor::CommandResult;
use crate::git::testing::{SpyExecutor, exit, ok, plain_dir, repo_dir};
use crate::task::{FixedClock, TaskContext};

const DIFF_INDEX: &[&str] = &["diff-index", "--quiet", "HEAD", "--"];
const CURRENT_BRANCH: &[&str] = &["symbolic-ref", "--short", "-q", "HEAD"];
const STASH_LIST: &[&str] = &["stash", "list"];

fn context(path: &Path) -> TaskContext {
    TaskContext::builder()
        .name("notes")
        .repo_path(path)
        .commit_message_template("Backup")
        .build()
}

/// Spy whose repository sits on `main` with a clean tree.
fn on_main() -> Arc<SpyExecutor> {
    let spy = Arc::new(SpyExecutor::new());
    spy.git_always(CURRENT_BRANCH, ok("main\n"));
    spy.git_always(&["rev-parse", "HEAD"], ok("0123456789abcdef0123456789abcdef01234567\n"));
    spy
}

struct Harness {
    spy: Arc<SpyExecutor>,
    sink: Arc<RecordingSink>,
}

impl Harness {
    fn new(spy: Arc<SpyExecutor>) -> Self {
        Self {
            spy,
            sink: Arc::new(RecordingSink::new()),
        }
    }

    async fn run(&self, ctx: TaskContext, kind: WorkflowKind) -> RunReport {
        self.run_with(ctx, kind, EngineOptions::default(), None, CancellationToken::new())
            .await
    }

    async fn run_with(
        &self,
        ctx: TaskContext,
        kind: WorkflowKind,
        options: EngineOptions,
        operator: Option<Arc<dyn Operator>>,
        cancel: CancellationToken,
    ) -> RunReport {
        let engine = Engine::builder()
            .executor(self.spy.clone())
            .context(ctx)
            .options(options)
            .cancel(cancel)
            .clock(Arc::new(FixedClock::at_date(2026, 3, 14)))
            .maybe_operator(operator)
            .sinks(vec![self.sink.clone() as Arc<dyn EventSink>])
            .build();
        engine.run(kind).await
    }

    /// One `Stage outcome` line per emitted stage event.
    fn trace(&self) -> String {
        self.sink
            .stages()
            .iter()
            .map(|event| format!("{} {:?}", event.stage, event.outcome))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// --- transition table ---

#[test]
fn test_successor_walks_each_workflow() {
    for kind in [
        WorkflowKind::Standard,
        WorkflowKind::Update,
        WorkflowKind::ShowCommits,
        WorkflowKind::CherryPick,
    ] {
        let mut stage = Stage::Init;
        let mut walked = vec![stage];
        while !stage.is_terminal() {
            stage = successor(kind, stage);
            walked.push(stage);
        }
        assert_eq!(walked, kind.stages(), "{kind}");
    }
    assert_eq!(successor(WorkflowKind::Standard, Stage::Done), Stage::Done);
    assert_eq!(successor(WorkflowKind::Standard, Stage::Failed), Stage::Failed);
    assert_eq!(
        successor(WorkflowKind::ShowCommits, Stage::Push),
        Stage::Failed
    );
}

#[test]
fn test_skip_table() {
    let dir = plain_dir();
    let ctx = TaskContext::builder()
        .name("notes")
        .repo_path(dir.path())
        .pull_before_command(false)
        .push_after_command(false)
        .pre_command("make")
        .build();
    let state = RunState::default();

    assert!(skip_reason(WorkflowKind::Standard, Stage::Pull, &ctx, &state).is_some());
    assert!(skip_reason(WorkflowKind::Standard, Stage::FinalPull, &ctx, &state).is_some());
    // Update always pulls.
    assert!(skip_reason(WorkflowKind::Update, Stage::Pull, &ctx, &state).is_none());
    assert!(skip_reason(WorkflowKind::Standard, Stage::PreCommand, &ctx, &state).is_none());
    assert_eq!(
        skip_reason(WorkflowKind::Update, Stage::PreCommand, &ctx, &state),
        Some("hooks never run in the update workflow")
    );
    assert_eq!(
        skip_reason(WorkflowKind::Standard, Stage::StageAndCommit, &ctx, &state),
        Some("no changes")
    );
    assert_eq!(
        skip_reason(WorkflowKind::Standard, Stage::PostCommand, &ctx, &state),
        Some("no post-command")
    );
    assert_eq!(
        skip_reason(WorkflowKind::Update, Stage::PopStash, &ctx, &state),
        Some("nothing was stashed")
    );

    let mut changed = RunState::default();
    changed.set_changes_detected(true);
    assert!(skip_reason(WorkflowKind::Standard, Stage::StageAndCommit, &ctx, &changed).is_none());
    assert_eq!(
        skip_reason(WorkflowKind::Standard, Stage::Push, &ctx, &changed),
        Some("push disabled for this task")
    );
}

// --- selection ---

#[test]
fn test_parse_selection_keeps_typed_order() {
    assert_eq!(parse_selection("3,1", 3).ok(), Some(vec![3, 1]));
    assert_eq!(parse_selection(" 2  3 , 2 ", 3).ok(), Some(vec![2, 3]));

    let err = parse_selection("9", 3).expect_err("out of range");
    assert_eq!(err.kind(), ErrorKind::InvalidSelection);
    insta::assert_snapshot!(err.message(), @"9 is out of range 1-3");

    let err = parse_selection("two", 3).expect_err("not a number");
    insta::assert_snapshot!(err.message(), @"'two' is not a commit number");

    let err = parse_selection(" , ", 3).expect_err("empty");
    insta::assert_snapshot!(err.message(), @"no commits selected");
}

// --- standard workflow ---

#[tokio::test]
async fn test_clean_tree_skips_commit_and_push() {
    let dir = repo_dir();
    let h = Harness::new(on_main());

    let report = h.run(context(dir.path()), WorkflowKind::Standard).await;

    assert_eq!(report.outcome, RunOutcome::NoChanges);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(h.spy.count(&["commit"]), 0);
    assert_eq!(h.spy.count(&["push"]), 0);
    insta::assert_snapshot!(h.trace(), @r"
    Init Ok
    RepoCheck Ok
    Pull Ok
    PreCommand Skipped
    DetectChanges Ok
    StageAndCommit Skipped
    Push Skipped
    PostCommand Skipped
    FinalPull Ok
    ");
}

#[tokio::test]
async fn test_changes_are_committed_and_pushed() {
    let dir = repo_dir();
    let spy = on_main();
    spy.git_always(DIFF_INDEX, exit(1, ""));
    let h = Harness::new(spy);

    let ctx = TaskContext::builder()
        .name("notes")
        .repo_path(dir.path())
        .commit_message_template("Backup")
        .timestamp_format("%Y%m%d")
        .build();
    let report = h.run(ctx, WorkflowKind::Standard).await;

    assert_eq!(report.outcome, RunOutcome::Pushed);
    assert_eq!(report.commits_created, 1);
    assert_eq!(
        report.last_commit.as_deref(),
        Some("0123456789abcdef0123456789abcdef01234567")
    );
    let commits: Vec<_> = h
        .spy
        .rendered()
        .into_iter()
        .filter(|call| call.starts_with("git commit") || call.starts_with("git push"))
        .collect();
    insta::assert_snapshot!(commits.join("\n"), @r"
    git commit -m Backup 20260314
    git push origin main
    ");
}

#[tokio::test]
async fn test_pull_disabled_never_pulls() {
    let dir = repo_dir();
    let h = Harness::new(on_main());
    let ctx = TaskContext::builder()
        .name("notes")
        .repo_path(dir.path())
        .pull_before_command(false)
        .build();

    let report = h.run(ctx, WorkflowKind::Standard).await;

    assert_eq!(report.outcome, RunOutcome::NoChanges);
    assert_eq!(h.spy.count(&["pull"]), 0);
}

#[tokio::test]
async fn test_push_disabled_reports_committed() {
    let dir = repo_dir();
    let spy = on_main();
    spy.git_always(DIFF_INDEX, exit(1, ""));
    let h = Harness::new(spy);
    let ctx = TaskContext::builder()
        .name("notes")
        .repo_path(dir.path())
        .push_after_command(false)
        .build();

    let report = h.run(ctx, WorkflowKind::Standard).await;

    assert_eq!(report.outcome, RunOutcome::Committed);
    assert_eq!(h.spy.count(&["push"]), 0);
}

#[tokio::test]
async fn test_pre_command_failure_stops_before_commit() {
    let dir = repo_dir();
    let spy = on_main();
    spy.git_always(DIFF_INDEX, exit(1, ""));
    spy.shell_always("make build", exit(2, "make: *** [build] Error 2\n"));
    let h = Harness::new(spy);
    let ctx = TaskContext::builder()
        .name("notes")
        .repo_path(dir.path())
        .pre_command("make build")
        .build();

    let report = h
        .run_with(
            ctx,
            WorkflowKind::Standard,
            EngineOptions::builder().verbose(true).build(),
            None,
            CancellationToken::new(),
        )
        .await;

    assert_eq!(report.outcome, RunOutcome::Failed);
    assert_eq!(report.error_kind, Some(ErrorKind::PreCommandFailed));
    assert_eq!(report.stage, Some(Stage::PreCommand));
    insta::assert_snapshot!(report.message.unwrap_or_default(), @"pre-command exited with code 2: make: *** [build] Error 2");
    assert_eq!(h.spy.count(&["commit"]), 0);

    let failed = h.sink.stages().pop().expect("failed stage event");
    assert_eq!(failed.outcome, StageOutcome::Failed);
    assert_eq!(failed.result.map(|r| r.exit_code()), Some(2));
}

#[tokio::test]
async fn test_pull_conflict_lists_files() {
    let dir = repo_dir();
    let spy = on_main();
    spy.git_always(
        &["pull"],
        CommandResult::new(
            1,
            "CONFLICT (content): Merge conflict in notes.md\nAutomatic merge failed; fix conflicts and then commit the result.\n",
            "",
            0,
        ),
    );
    spy.git_always(&["diff", "--name-only"], ok("notes.md\n"));
    let h = Harness::new(spy);

    let report = h.run(context(dir.path()), WorkflowKind::Standard).await;

    assert_eq!(report.error_kind, Some(ErrorKind::MergeConflict));
    assert_eq!(report.stage, Some(Stage::Pull));
    insta::assert_snapshot!(report.message.unwrap_or_default(), @"pulling 'main' from 'origin' produced conflicts: notes.md");
}

#[tokio::test]
async fn test_rejected_push_fails_the_run() {
    let dir = repo_dir();
    let spy = on_main();
    spy.git_always(DIFF_INDEX, exit(1, ""));
    spy.git_always(
        &["push"],
        exit(1, " ! [rejected]        main -> main (fetch first)\nerror: failed to push some refs\n"),
    );
    let h = Harness::new(spy);

    let report = h.run(context(dir.path()), WorkflowKind::Standard).await;

    assert_eq!(report.error_kind, Some(ErrorKind::PushRejected));
    assert_eq!(report.stage, Some(Stage::Push));
    assert_eq!(report.commits_created, 1);
    assert_eq!(h.spy.count(&["pull"]), 1);
}

#[tokio::test]
async fn test_post_command_failure_skips_final_pull() {
    let dir = repo_dir();
    let spy = on_main();
    spy.git_always(DIFF_INDEX, exit(1, ""));
    spy.shell_always("./notify.sh", exit(1, "notify.sh: endpoint down\n"));
    let h = Harness::new(spy);
    let ctx = TaskContext::builder()
        .name("notes")
        .repo_path(dir.path())
        .post_command("./notify.sh")
        .build();

    let report = h.run(ctx, WorkflowKind::Standard).await;

    assert_eq!(report.error_kind, Some(ErrorKind::PostCommandFailed));
    assert_eq!(report.stage, Some(Stage::PostCommand));
    assert_eq!(report.commits_created, 1);
    insta::assert_snapshot!(report.message.unwrap_or_default(), @"post-command exited with code 1: notify.sh: endpoint down");
    // Only the first pull ran.
    assert_eq!(h.spy.count(&["pull"]), 1);
}

#[tokio::test]
async fn test_final_pull_conflict_fails_after_push() {
    let dir = repo_dir();
    let spy = on_main();
    spy.git_always(DIFF_INDEX, exit(1, ""));
    spy.git_once(&["pull"], ok("Already up to date.\n"));
    spy.git_once(
        &["pull"],
        CommandResult::new(
            1,
            "Auto-merging notes.md\nCONFLICT (content): Merge conflict in notes.md\nAutomatic merge failed; fix conflicts and then commit the result.\n",
            "",
            0,
        ),
    );
    spy.git_always(&["diff", "--name-only"], ok("notes.md\n"));
    let h = Harness::new(spy);

    let report = h.run(context(dir.path()), WorkflowKind::Standard).await;

    assert_eq!(report.outcome, RunOutcome::Failed);
    assert_eq!(report.error_kind, Some(ErrorKind::MergeConflict));
    assert_eq!(report.stage, Some(Stage::FinalPull));
    assert_eq!(h.spy.count(&["push"]), 1);
    assert_eq!(h.spy.count(&["pull"]), 2);
}

// --- repository check ---

#[tokio::test]
async fn test_missing_repository_fails_without_git_calls() {
    let dir = plain_dir();
    let h = Harness::new(on_main());

    let report = h.run(context(dir.path()), WorkflowKind::Standard).await;

    assert_eq!(report.outcome, RunOutcome::Failed);
    assert_eq!(report.error_kind, Some(ErrorKind::NotAGitRepository));
    assert_eq!(report.stage, Some(Stage::RepoCheck));
    assert!(h.spy.calls().is_empty());
}

#[tokio::test]
async fn test_initialize_creates_repository() {
    let dir = plain_dir();
    let h = Harness::new(on_main());

    let report = h
        .run_with(
            context(dir.path()),
            WorkflowKind::Standard,
            EngineOptions::builder().initialize(true).build(),
            None,
            CancellationToken::new(),
        )
        .await;

    assert!(report.outcome.is_success());
    assert_eq!(h.spy.subcommands().first().map(String::as_str), Some("init"));
}

#[tokio::test]
async fn test_show_commits_never_initializes() {
    let dir = plain_dir();
    let h = Harness::new(on_main());

    let report = h
        .run_with(
            context(dir.path()),
            WorkflowKind::ShowCommits,
            EngineOptions::builder().initialize(true).build(),
            None,
            CancellationToken::new(),
        )
        .await;

    assert_eq!(report.error_kind, Some(ErrorKind::NotAGitRepository));
    assert!(h.spy.calls().is_empty());
}

#[tokio::test]
async fn test_other_branch_is_checked_out() {
    let dir = repo_dir();
    let spy = Arc::new(SpyExecutor::new());
    spy.git_always(CURRENT_BRANCH, ok("feature\n"));
    let h = Harness::new(spy);

    h.run(context(dir.path()), WorkflowKind::Standard).await;

    assert_eq!(h.spy.count(&["checkout", "-q", "main"]), 1);
}

// --- update workflow ---

fn dirty_with_stash() -> Arc<SpyExecutor> {
    let spy = on_main();
    spy.git_always(DIFF_INDEX, exit(1, ""));
    spy.git_always(
        &["stash", "push"],
        ok("Saved working directory and index state On main: gitauto:notes:20260314T000000\n"),
    );
    spy.git_always(
        STASH_LIST,
        ok("stash@{0}\u{1f}On main: gitauto:notes:20260314T000000\n"),
    );
    spy
}

#[tokio::test]
async fn test_update_stashes_and_restores() {
    let dir = repo_dir();
    let h = Harness::new(dirty_with_stash());

    let report = h.run(context(dir.path()), WorkflowKind::Update).await;

    assert_eq!(report.outcome, RunOutcome::Pushed);
    let sync: Vec<_> = h
        .spy
        .subcommands()
        .into_iter()
        .filter(|s| matches!(s.as_str(), "stash" | "pull" | "commit" | "push"))
        .collect();
    assert_eq!(
        sync,
        ["stash", "stash", "pull", "stash", "stash", "commit", "push"]
    );
    assert_eq!(h.spy.count(&["stash", "pop", "stash@{0}"]), 1);
    insta::assert_snapshot!(h.trace(), @r"
    Init Ok
    RepoCheck Ok
    StashIfDirty Ok
    Pull Ok
    PopStash Ok
    DetectChanges Ok
    StageAndCommit Ok
    Push Ok
    ");
}

#[tokio::test]
async fn test_update_pop_conflict_keeps_stash() {
    let dir = repo_dir();
    let spy = dirty_with_stash();
    spy.git_always(
        &["stash", "pop"],
        exit(
            1,
            "CONFLICT (content): Merge conflict in notes.md\nThe stash entry is kept in case you need it again.\n",
        ),
    );
    let h = Harness::new(spy);

    let report = h.run(context(dir.path()), WorkflowKind::Update).await;

    assert_eq!(report.error_kind, Some(ErrorKind::StashConflict));
    assert_eq!(report.stage, Some(Stage::PopStash));
    assert_eq!(h.spy.count(&["stash", "drop"]), 0);
    assert_eq!(h.spy.count(&["commit"]), 0);
}

#[tokio::test]
async fn test_update_clean_tree_does_not_stash() {
    let dir = repo_dir();
    let h = Harness::new(on_main());

    let report = h.run(context(dir.path()), WorkflowKind::Update).await;

    assert_eq!(report.outcome, RunOutcome::NoChanges);
    assert_eq!(h.spy.count(&["stash"]), 0);
    assert_eq!(h.spy.count(&["pull"]), 1);
}

#[tokio::test]
async fn test_update_unreachable_pull_restores_stash() {
    let dir = repo_dir();
    let spy = dirty_with_stash();
    spy.git_always(&["pull"], exit(1, "fatal: couldn't find remote ref main\n"));
    let h = Harness::new(spy);

    let report = h.run(context(dir.path()), WorkflowKind::Update).await;

    assert_eq!(report.error_kind, Some(ErrorKind::RemoteUnreachable));
    assert_eq!(report.stage, Some(Stage::Pull));
    assert_eq!(h.spy.count(&["stash", "pop", "stash@{0}"]), 1);
    assert_eq!(h.spy.count(&["commit"]), 0);
    insta::assert_snapshot!(report.warnings.join("\n"), @"restored stash@{0} after failed pull");
}

// --- remote commits ---

const LOG: &str = "ccccccc\u{1f}cccccccccccccccccccccccccccccccccccccccc\u{1f}Ada\u{1f}2026-03-14\u{1f}third\n\
                   bbbbbbb\u{1f}bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb\u{1f}Ada\u{1f}2026-03-13\u{1f}second\n\
                   aaaaaaa\u{1f}aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\u{1f}Ada\u{1f}2026-03-12\u{1f}first\n";

fn with_remote_log() -> Arc<SpyExecutor> {
    let spy = on_main();
    spy.git_always(&["log"], ok(LOG));
    spy
}

#[tokio::test]
async fn test_show_commits_lists_newest_first() {
    let dir = repo_dir();
    let h = Harness::new(with_remote_log());

    let report = h.run(context(dir.path()), WorkflowKind::ShowCommits).await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    let subjects: Vec<_> = report.commits.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, ["third", "second", "first"]);
    assert_eq!(h.spy.count(&["checkout"]), 0);
}

#[tokio::test]
async fn test_cherry_pick_applies_in_selected_order() {
    let dir = repo_dir();
    let h = Harness::new(with_remote_log());
    let operator = Arc::new(ScriptedOperator::new(["3,1"]));

    let report = h
        .run_with(
            context(dir.path()),
            WorkflowKind::CherryPick,
            EngineOptions::default(),
            Some(operator.clone() as Arc<dyn Operator>),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.commits_created, 2);
    let picks: Vec<_> = h
        .spy
        .rendered()
        .into_iter()
        .filter(|call| call.starts_with("git cherry-pick"))
        .collect();
    insta::assert_snapshot!(picks.join("\n"), @r"
    git cherry-pick aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa
    git cherry-pick cccccccccccccccccccccccccccccccccccccccc
    ");
    assert_eq!(operator.asked(), ["selection"]);
    assert_eq!(h.spy.count(&["push"]), 0);
}

#[tokio::test]
async fn test_cherry_pick_invalid_selection_picks_nothing() {
    let dir = repo_dir();
    let h = Harness::new(with_remote_log());
    let operator = Arc::new(ScriptedOperator::new(["9"]));

    let report = h
        .run_with(
            context(dir.path()),
            WorkflowKind::CherryPick,
            EngineOptions::default(),
            Some(operator.clone() as Arc<dyn Operator>),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(h.spy.count(&["cherry-pick"]), 0);
    assert_eq!(
        operator.asked(),
        ["selection", "selection:9 is out of range 1-3"]
    );
    // Input ran out at the second prompt.
    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(report.commits_created, 0);
}

const CONTINUE: &[&str] = &["-c", "core.editor=true", "cherry-pick", "--continue"];

fn with_conflicting_third() -> Arc<SpyExecutor> {
    let spy = with_remote_log();
    spy.git_always(
        &["cherry-pick", "cccccccccccccccccccccccccccccccccccccccc"],
        exit(1, "error: could not apply ccccccc... third\nCONFLICT (content): Merge conflict in notes.md\n"),
    );
    spy.git_always(&["diff", "--name-only"], ok("notes.md\n"));
    spy
}

#[tokio::test]
async fn test_cherry_pick_conflict_then_abort() {
    let dir = repo_dir();
    let h = Harness::new(with_conflicting_third());
    let operator = Arc::new(ScriptedOperator::new(["1 3", "maybe", "abort"]));

    let report = h
        .run_with(
            context(dir.path()),
            WorkflowKind::CherryPick,
            EngineOptions::default(),
            Some(operator.clone() as Arc<dyn Operator>),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.commits_created, 0);
    assert_eq!(h.spy.count(&["cherry-pick", "--abort"]), 1);
    assert_eq!(
        h.spy.count(&["cherry-pick", "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"]),
        0
    );
    insta::assert_snapshot!(operator.asked().join("\n"), @r"
    selection
    resolution ccccccc
    resolution ccccccc:unknown reply 'maybe'; type 'continue' or 'abort'
    ");
    insta::assert_snapshot!(report.warnings.join("\n"), @"cherry-pick of ccccccc aborted by operator");
}

#[tokio::test]
async fn test_cherry_pick_continue_reprompts_until_resolved() {
    let dir = repo_dir();
    let spy = with_conflicting_third();
    spy.git_once(
        CONTINUE,
        exit(
            1,
            "error: Committing is not possible because you have unmerged files.\n\
             fatal: Exiting because of an unresolved conflict.\n",
        ),
    );
    let h = Harness::new(spy);
    let operator = Arc::new(ScriptedOperator::new(["1 3", "continue", "c"]));

    let report = h
        .run_with(
            context(dir.path()),
            WorkflowKind::CherryPick,
            EngineOptions::default(),
            Some(operator.clone() as Arc<dyn Operator>),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.commits_created, 2);
    assert_eq!(h.spy.count(CONTINUE), 2);
    assert_eq!(h.spy.count(&["cherry-pick", "--abort"]), 0);
    insta::assert_snapshot!(operator.asked().join("\n"), @r"
    selection
    resolution ccccccc
    resolution ccccccc:conflicts remain in 1 file(s)
    ");
    let picks: Vec<_> = h
        .spy
        .rendered()
        .into_iter()
        .filter(|call| call.contains("cherry-pick"))
        .collect();
    insta::assert_snapshot!(picks.join("\n"), @r"
    git cherry-pick cccccccccccccccccccccccccccccccccccccccc
    git -c core.editor=true cherry-pick --continue
    git -c core.editor=true cherry-pick --continue
    git cherry-pick aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa
    ");
}

#[tokio::test]
async fn test_cherry_pick_empty_is_skipped_and_batch_continues() {
    let dir = repo_dir();
    let spy = with_remote_log();
    spy.git_always(
        &["cherry-pick", "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"],
        CommandResult::new(
            1,
            "On branch main\nYou are currently cherry-picking commit bbbbbbb.\n\nnothing to commit, working tree clean",
            "The previous cherry-pick is now empty, possibly due to conflict resolution.\n\
             If you wish to commit it anyway, use:\n\n    git commit --allow-empty\n\n\
             Otherwise, please use 'git cherry-pick --skip'",
            0,
        ),
    );
    let h = Harness::new(spy);
    let operator = Arc::new(ScriptedOperator::new(["2,1"]));

    let report = h
        .run_with(
            context(dir.path()),
            WorkflowKind::CherryPick,
            EngineOptions::default(),
            Some(operator as Arc<dyn Operator>),
            CancellationToken::new(),
        )
        .await;

    assert_eq!(report.outcome, RunOutcome::Completed);
    assert_eq!(report.commits_created, 1);
    let picks: Vec<_> = h
        .spy
        .rendered()
        .into_iter()
        .filter(|call| call.starts_with("git cherry-pick"))
        .collect();
    insta::assert_snapshot!(picks.join("\n"), @r"
    git cherry-pick bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb
    git cherry-pick --skip
    git cherry-pick cccccccccccccccccccccccccccccccccccccccc
    ");
    insta::assert_snapshot!(report.warnings.join("\n"), @"bbbbbbb is already on the branch, skipped");
}

#[tokio::test]
async fn test_interrupt_at_resolution_leaves_pick_in_progress() {
    let dir = repo_dir();
    let h = Harness::new(with_conflicting_third());
    let cancel = CancellationToken::new();
    let operator = Arc::new(InterruptAtResolution::new("1", cancel.clone()));

    let report = h
        .run_with(
            context(dir.path()),
            WorkflowKind::CherryPick,
            EngineOptions::default(),
            Some(operator as Arc<dyn Operator>),
            cancel,
        )
        .await;

    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(report.error_kind, Some(ErrorKind::Interrupted));
    assert_eq!(report.stage, Some(Stage::CherryPick));
    assert_eq!(h.spy.count(&["cherry-pick", "--abort"]), 0);
    assert_eq!(h.spy.count(CONTINUE), 0);
    insta::assert_snapshot!(report.message.unwrap_or_default(), @"cherry-pick of ccccccc is still in progress; resolve it and run 'git cherry-pick --continue', or 'git cherry-pick --abort'");
}

#[tokio::test]
async fn test_cherry_pick_without_operator() {
    let dir = repo_dir();
    let h = Harness::new(with_remote_log());

    let report = h.run(context(dir.path()), WorkflowKind::CherryPick).await;

    assert_eq!(report.error_kind, Some(ErrorKind::ExecutionError));
    assert_eq!(report.stage, Some(Stage::CherryPick));
}

// --- reporting ---

#[tokio::test]
async fn test_interrupt_before_start() {
    let dir = repo_dir();
    let h = Harness::new(on_main());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = h
        .run_with(
            context(dir.path()),
            WorkflowKind::Standard,
            EngineOptions::default(),
            None,
            cancel,
        )
        .await;

    assert_eq!(report.outcome, RunOutcome::Interrupted);
    assert_eq!(report.error_kind, Some(ErrorKind::Interrupted));
    assert_eq!(report.stage, Some(Stage::Init));
    assert_eq!(report.exit_code(), 1);
    assert!(h.spy.calls().is_empty());
}

#[tokio::test]
async fn test_final_report_is_emitted_once() {
    for spy in [on_main(), dirty_with_stash()] {
        let dir = repo_dir();
        let h = Harness::new(spy);
        h.spy.git_always(&["stash", "pop"], exit(1, "CONFLICT (content): x"));

        let report = h.run(context(dir.path()), WorkflowKind::Update).await;

        let reports = h.sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, report.outcome);
    }
}

#[tokio::test]
async fn test_report_serializes_for_json_output() {
    let dir = plain_dir();
    let h = Harness::new(on_main());

    let report = h.run(context(dir.path()), WorkflowKind::Standard).await;

    insta::assert_json_snapshot!(report, { ".message" => "[message]" }, @r#"
    {
      "task": "notes",
      "workflow": "standard",
      "outcome": "failed",
      "error_kind": "NotAGitRepository",
      "stage": "RepoCheck",
      "message": "[message]",
      "commits_created": 0,
      "warnings": []
    }
    "#);
}

