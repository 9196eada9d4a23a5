// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::PathBuf;

use crate::cli::manage::CreateArgs;
use crate::cli::task::{TaskArgs, TaskOverrides};
use crate::cmd::operator::render_prompt;
use crate::cmd::report::render_summary;
use crate::cmd::task::{run_create_command, shell_quote};
use crate::cmd::workflow::load_task;
use crate::config::list_tasks;
use crate::error::{ConfigError, ErrorKind};
use crate::git::records::RemoteCommit;
use crate::workflow::{Prompt, RunOutcome, RunReport, Stage, WorkflowKind};

fn commit(short: &str, subject: &str) -> RemoteCommit {
    RemoteCommit {
        short_hash: short.to_string(),
        hash: format!("{short}{}", "0".repeat(33)),
        author_name: "Ada".to_string(),
        author_date: "2026-03-14".to_string(),
        subject: subject.to_string(),
    }
}

fn report(outcome: RunOutcome) -> RunReport {
    RunReport {
        task: "notes".to_string(),
        workflow: WorkflowKind::Standard,
        outcome,
        error_kind: None,
        stage: None,
        message: None,
        commits_created: 0,
        last_commit: None,
        warnings: Vec::new(),
        commits: Vec::new(),
    }
}

#[test]
fn test_summary_for_success() {
    let pushed = RunReport {
        commits_created: 1,
        last_commit: Some("3f2a9c1d0e".to_string()),
        ..report(RunOutcome::Pushed)
    };
    insta::assert_snapshot!(render_summary(&pushed), @"notes: committed and pushed 1 commit (last 3f2a9c1)");

    insta::assert_snapshot!(render_summary(&report(RunOutcome::NoChanges)), @"notes: no changes to commit");
}

#[test]
fn test_summary_for_failure_lists_warnings() {
    let failed = RunReport {
        error_kind: Some(ErrorKind::PushRejected),
        stage: Some(Stage::Push),
        message: Some("'origin' rejected the push of 'main' (non-fast-forward)".to_string()),
        warnings: vec!["initial push of 'main' failed".to_string()],
        ..report(RunOutcome::Failed)
    };
    insta::assert_snapshot!(render_summary(&failed), @r"
    notes: failed at Push [PushRejected]: 'origin' rejected the push of 'main' (non-fast-forward)
    warning: initial push of 'main' failed
    ");
}

#[test]
fn test_summary_lists_remote_commits() {
    let listed = RunReport {
        workflow: WorkflowKind::ShowCommits,
        commits: vec![commit("bbbb222", "Second"), commit("aaaa111", "First")],
        ..report(RunOutcome::Completed)
    };
    insta::assert_snapshot!(render_summary(&listed), @r"
    notes: recent remote commits (newest first)
       1. bbbb222  2026-03-14  Ada  Second
       2. aaaa111  2026-03-14  Ada  First
    ");
}

#[test]
fn test_selection_prompt() {
    let commits = [commit("bbbb222", "Second"), commit("aaaa111", "First")];
    let prompt = Prompt::Selection {
        commits: &commits,
        error: Some("9 is out of range 1-2"),
    };
    insta::assert_snapshot!(render_prompt(&prompt), @r"
    Recent remote commits (1 = newest):
       1. bbbb222 Second (Ada, 2026-03-14)
       2. aaaa111 First (Ada, 2026-03-14)
    Invalid selection: 9 is out of range 1-2
    Commits to cherry-pick, in the order to apply (e.g. 3,1):
    ");
}

#[test]
fn test_resolution_prompt() {
    let picked = commit("aaaa111", "First");
    let files = ["notes.md".to_string()];
    let prompt = Prompt::Resolution {
        commit: &picked,
        files: &files,
        error: None,
    };
    insta::assert_snapshot!(render_prompt(&prompt), @r"
    Cherry-pick of aaaa111 (First) stopped on conflicts:
      notes.md
    Resolve and stage the files, then type 'continue' or 'abort':
    ");
}

#[test]
fn test_load_task_applies_overrides() {
    let config_dir = tempfile::tempdir().expect("tempdir");
    let repo = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        config_dir.path().join("notes.toml"),
        "repo_path = \"/does/not/exist\"\nbranch = \"main\"\npre_command = \"make\"\n",
    )
    .expect("write task");

    let target = TaskArgs {
        task: "notes".to_string(),
        overrides: TaskOverrides {
            branch: Some("dev".to_string()),
            folder: Some(repo.path().to_path_buf()),
            no_push: true,
            ..TaskOverrides::default()
        },
    };
    let ctx = load_task(&target, config_dir.path(), false).expect("task loads");
    assert_eq!(ctx.name(), "notes");
    assert_eq!(ctx.branch(), "dev");
    assert_eq!(ctx.repo_path(), repo.path());
    assert_eq!(ctx.pre_command(), "make");
    assert!(ctx.pull_before_command());
    assert!(!ctx.push_after_command());
}

#[test]
fn test_load_task_from_explicit_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join("legacy.json");
    std::fs::write(
        &file,
        format!(r#"{{"git_repo_path": {:?}}}"#, dir.path().display().to_string()),
    )
    .expect("write task");

    let target = TaskArgs {
        task: "ignored".to_string(),
        overrides: TaskOverrides {
            file: Some(file),
            ..TaskOverrides::default()
        },
    };
    let ctx = load_task(&target, &PathBuf::from("/nonexistent"), false).expect("task loads");
    assert_eq!(ctx.name(), "legacy");
}

#[test]
fn test_load_task_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = TaskArgs {
        task: "missing".to_string(),
        ..TaskArgs::default()
    };
    let err = load_task(&target, dir.path(), false).expect_err("no task file");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::NotFound(_))
    ));
}

#[test]
fn test_create_then_list() {
    let dir = tempfile::tempdir().expect("tempdir");
    let args = CreateArgs {
        task: "notes".to_string(),
        folder: PathBuf::from("/srv/notes"),
        ..CreateArgs::default()
    };

    let path = run_create_command(&args, dir.path()).expect("created");
    assert_eq!(path, dir.path().join("notes.toml"));
    assert!(run_create_command(&args, dir.path()).is_err());

    let tasks = list_tasks(dir.path()).expect("listable");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "notes");
}

#[cfg(not(windows))]
#[test]
fn test_shell_quote() {
    insta::assert_snapshot!(shell_quote("/tmp/my notes/it's.toml"), @r"'/tmp/my notes/it'\''s.toml'");
}
