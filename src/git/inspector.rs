// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository inspector: typed git queries and mutations over an [`Executor`].
//!
//! ```text
//!                 Inspector
//!                     |
//!     +---------------+----------------+
//!     |               |                |
//!  queries        stash ops        branch/remote
//!  is_repository  list_stashes     current_branch
//!  has_uncommit.  create_stash     branch_exists
//!  conflicted     pop_stash        create_and_track_branch
//!  remote log                      setup_remote
//!     |               |                |
//!     +-------> classify_* <-----------+
//!                     |
//!            Executor::run(Invocation::git)
//! ```
//!
//! `is_repository` is the only check that does not go through the executor:
//! it opens the metadata with `gix` and spawns nothing.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::classify::{
    self, CherryPickOutcome, CommitOutcome, DiffOutcome, PullOutcome, PushOutcome,
    StashPopOutcome,
};
use super::executor::{CommandResult, Executor, Invocation};
use super::records::{self, RemoteCommit, StashEntry};
use crate::error::{ErrorKind, WorkflowError};

type GitResult<T> = Result<T, WorkflowError>;

/// Default number of remote commits offered for selection.
pub const DEFAULT_COMMIT_LIMIT: usize = 5;

/// Typed view over a working tree, driven through an [`Executor`].
#[derive(Clone)]
pub struct Inspector {
    executor: Arc<dyn Executor>,
    timeout: Option<Duration>,
}

impl std::fmt::Debug for Inspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inspector")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Returns true when `origin` is a location (URL or path) rather than a remote name.
#[must_use]
pub fn is_remote_location(origin: &str) -> bool {
    !origin
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

impl Inspector {
    pub fn new(executor: Arc<dyn Executor>, timeout: Option<Duration>) -> Self {
        Self { executor, timeout }
    }

    /// Runs a git subcommand and returns its raw result.
    ///
    /// # Errors
    ///
    /// `ExecutionError` when git cannot be launched.
    pub async fn git<I, S>(&self, path: &Path, args: I) -> GitResult<CommandResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation::git(path, args).with_timeout(self.timeout);
        Ok(self.executor.run(&invocation).await?)
    }

    /// Runs a git subcommand that must succeed.
    async fn git_ok<I, S>(&self, path: &Path, what: &str, args: I) -> GitResult<CommandResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let result = self.git(path, args).await?;
        if result.success() {
            Ok(result)
        } else {
            Err(WorkflowError::unexpected(what, result))
        }
    }

    // --- Queries ---

    /// Checks for repository metadata at `path` without spawning git.
    #[must_use]
    pub fn is_repository(&self, path: &Path) -> bool {
        gix::open(path).is_ok_and(|repo| repo.workdir().is_some())
    }

    /// Staged, unstaged, or untracked changes present.
    ///
    /// Tracked modifications and untracked files are checked independently
    /// and OR-ed together.
    ///
    /// # Errors
    ///
    /// Launch failures and unexpected exit codes.
    pub async fn has_uncommitted_changes(&self, path: &Path) -> GitResult<bool> {
        let tracked = if self.has_head(path).await? {
            // Refresh stat info so touched-but-identical files do not count.
            self.git(path, ["update-index", "-q", "--refresh"]).await?;
            let diff = self
                .git(path, ["diff-index", "--quiet", "HEAD", "--"])
                .await?;
            classify::classify_diff(diff)? == DiffOutcome::Changed
        } else {
            let cached = self
                .git_ok(path, "git ls-files", ["ls-files", "--cached"])
                .await?;
            !cached.stdout().trim().is_empty()
        };

        let untracked = self
            .git_ok(
                path,
                "git ls-files",
                ["ls-files", "--others", "--exclude-standard"],
            )
            .await?;
        let untracked = !untracked.stdout().trim().is_empty();

        debug!(path = %path.display(), tracked, untracked, "working tree state");
        Ok(tracked || untracked)
    }

    /// HEAD points at a commit (false on an unborn branch).
    async fn has_head(&self, path: &Path) -> GitResult<bool> {
        let result = self
            .git(path, ["rev-parse", "--verify", "--quiet", "HEAD"])
            .await?;
        Ok(result.success())
    }

    /// Full hash of HEAD.
    ///
    /// # Errors
    ///
    /// Fails on an unborn branch.
    pub async fn head_hash(&self, path: &Path) -> GitResult<String> {
        let result = self
            .git_ok(path, "git rev-parse", ["rev-parse", "HEAD"])
            .await?;
        Ok(result.stdout().trim().to_string())
    }

    /// Branch HEAD points at, `None` when detached.
    ///
    /// # Errors
    ///
    /// Launch failures and unexpected exit codes.
    pub async fn current_branch(&self, path: &Path) -> GitResult<Option<String>> {
        let result = self
            .git(path, ["symbolic-ref", "--short", "-q", "HEAD"])
            .await?;
        match result.exit_code() {
            0 => Ok(Some(result.stdout().trim().to_string())),
            1 => Ok(None),
            _ => Err(WorkflowError::unexpected("git symbolic-ref", result)),
        }
    }

    /// Local branch `branch` exists.
    ///
    /// # Errors
    ///
    /// Launch failures and unexpected exit codes.
    pub async fn branch_exists(&self, path: &Path, branch: &str) -> GitResult<bool> {
        let result = self
            .git(
                path,
                [
                    "rev-parse".to_string(),
                    "--verify".to_string(),
                    "--quiet".to_string(),
                    format!("refs/heads/{branch}"),
                ],
            )
            .await?;
        match result.exit_code() {
            0 => Ok(true),
            1 => Ok(false),
            _ => Err(WorkflowError::unexpected("git rev-parse", result)),
        }
    }

    /// The remote advertises `branch`. An unreachable remote counts as absent.
    ///
    /// # Errors
    ///
    /// Launch failures and unclassified `ls-remote` failures.
    pub async fn remote_branch_exists(
        &self,
        path: &Path,
        remote: &str,
        branch: &str,
    ) -> GitResult<bool> {
        let result = self
            .git(
                path,
                [
                    "ls-remote".to_string(),
                    "--heads".to_string(),
                    remote.to_string(),
                    format!("refs/heads/{branch}"),
                ],
            )
            .await?;
        if result.success() {
            return Ok(!result.stdout().trim().is_empty());
        }
        if classify::is_remote_unreachable(&result) {
            warn!(remote, branch, "remote unreachable while looking up branch");
            return Ok(false);
        }
        Err(WorkflowError::unexpected("git ls-remote", result))
    }

    /// Files left unmerged by a conflicted operation.
    ///
    /// # Errors
    ///
    /// Launch failures and unexpected exit codes.
    pub async fn conflicted_files(&self, path: &Path) -> GitResult<Vec<String>> {
        let result = self
            .git_ok(
                path,
                "git diff",
                ["diff", "--name-only", "--diff-filter=U"],
            )
            .await?;
        Ok(result
            .stdout()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Up to `limit` commits of `remote`/`branch`, newest first.
    ///
    /// # Errors
    ///
    /// `RemoteUnreachable` when the remote or the branch cannot be fetched.
    pub async fn list_remote_commits(
        &self,
        path: &Path,
        remote: &str,
        branch: &str,
        limit: usize,
    ) -> GitResult<RemoteCommits> {
        let fetch = self.git(path, ["fetch", "--quiet", remote, branch]).await?;
        if !fetch.success() {
            return Err(WorkflowError::new(
                ErrorKind::RemoteUnreachable,
                format!("cannot fetch '{branch}' from '{remote}'"),
            )
            .with_result(fetch));
        }

        let log = self
            .git_ok(
                path,
                "git log",
                [
                    "log".to_string(),
                    "-n".to_string(),
                    limit.to_string(),
                    records::LOG_FORMAT.to_string(),
                    "--date=short".to_string(),
                    "FETCH_HEAD".to_string(),
                ],
            )
            .await?;
        Ok(RemoteCommits::new(log.stdout().to_string()))
    }

    // --- Stash ---

    /// Current stash entries, most recent first.
    ///
    /// # Errors
    ///
    /// Launch failures and unexpected exit codes.
    pub async fn list_stashes(&self, path: &Path) -> GitResult<Vec<StashEntry>> {
        let result = self
            .git_ok(
                path,
                "git stash list",
                ["stash", "list", records::STASH_FORMAT],
            )
            .await?;
        Ok(records::parse_stash_list(result.stdout()))
    }

    /// Stashes everything, untracked files included. `None` when there was nothing to stash.
    ///
    /// # Errors
    ///
    /// Launch failures, a failed push, or an entry that cannot be found afterwards.
    pub async fn create_stash(&self, path: &Path, label: &str) -> GitResult<Option<StashEntry>> {
        let result = self
            .git_ok(
                path,
                "git stash push",
                ["stash", "push", "--include-untracked", "-m", label],
            )
            .await?;
        if result.combined().contains("No local changes to save") {
            return Ok(None);
        }

        let entry = self
            .list_stashes(path)
            .await?
            .into_iter()
            .find(|entry| entry.has_label(label));
        match entry {
            Some(entry) => Ok(Some(entry)),
            None => Err(WorkflowError::new(
                ErrorKind::ExecutionError,
                format!("stash '{label}' was created but is missing from the stash list"),
            )
            .with_result(result)),
        }
    }

    /// Pops `entry` after re-locating it by description.
    ///
    /// The index is never trusted: other stash operations may have shifted it.
    ///
    /// # Errors
    ///
    /// The entry no longer exists, or the pop failed without a conflict.
    pub async fn pop_stash(&self, path: &Path, entry: &StashEntry) -> GitResult<StashPopOutcome> {
        let current = self
            .list_stashes(path)
            .await?
            .into_iter()
            .find(|candidate| candidate.description == entry.description)
            .ok_or_else(|| {
                WorkflowError::new(
                    ErrorKind::ExecutionError,
                    format!("stash entry '{}' no longer exists", entry.description),
                )
            })?;
        if current.index != entry.index {
            debug!(
                label = %entry.description,
                was = entry.index,
                now = current.index,
                "stash entry moved"
            );
        }

        let result = self
            .git(path, ["stash".to_string(), "pop".to_string(), current.reference()])
            .await?;
        classify::classify_stash_pop(result)
    }

    // --- Sync ---

    /// `git pull` with a merge (never a rebase) and no editor.
    ///
    /// # Errors
    ///
    /// Launch failures only; outcomes are classified.
    pub async fn pull(
        &self,
        path: &Path,
        remote: &str,
        branch: &str,
    ) -> GitResult<(PullOutcome, CommandResult)> {
        let result = self
            .git(path, ["pull", "--no-rebase", "--no-edit", remote, branch])
            .await?;
        Ok((classify::classify_pull(&result), result))
    }

    /// `git push <remote> <branch>`.
    ///
    /// # Errors
    ///
    /// Launch failures only; outcomes are classified.
    pub async fn push(
        &self,
        path: &Path,
        remote: &str,
        branch: &str,
    ) -> GitResult<(PushOutcome, CommandResult)> {
        let result = self.git(path, ["push", remote, branch]).await?;
        Ok((classify::classify_push(&result), result))
    }

    /// Stages every change under the working tree.
    ///
    /// # Errors
    ///
    /// Launch failures and a failed `git add`.
    pub async fn stage_all(&self, path: &Path) -> GitResult<()> {
        self.git_ok(path, "git add", ["add", "."]).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Launch failures and failures other than "nothing to commit".
    pub async fn commit(&self, path: &Path, message: &str) -> GitResult<CommitOutcome> {
        let result = self.git(path, ["commit", "-m", message]).await?;
        classify::classify_commit(result)
    }

    // --- Cherry-pick ---

    /// # Errors
    ///
    /// Launch failures and failures that are neither a conflict nor an empty pick.
    pub async fn cherry_pick(&self, path: &Path, hash: &str) -> GitResult<CherryPickOutcome> {
        let result = self.git(path, ["cherry-pick", hash]).await?;
        classify::classify_cherry_pick(result)
    }

    /// Commits a resolved pick, keeping the original message.
    ///
    /// # Errors
    ///
    /// Same as [`Inspector::cherry_pick`].
    pub async fn cherry_pick_continue(&self, path: &Path) -> GitResult<CherryPickOutcome> {
        let result = self
            .git(path, ["-c", "core.editor=true", "cherry-pick", "--continue"])
            .await?;
        classify::classify_cherry_pick(result)
    }

    /// Rolls back the in-progress pick only.
    ///
    /// # Errors
    ///
    /// Launch failures and a failed abort.
    pub async fn cherry_pick_abort(&self, path: &Path) -> GitResult<()> {
        self.git_ok(path, "git cherry-pick --abort", ["cherry-pick", "--abort"])
            .await?;
        Ok(())
    }

    /// Drops a pending empty pick.
    ///
    /// # Errors
    ///
    /// Launch failures and a failed skip.
    pub async fn cherry_pick_skip(&self, path: &Path) -> GitResult<()> {
        self.git_ok(path, "git cherry-pick --skip", ["cherry-pick", "--skip"])
            .await?;
        Ok(())
    }

    // --- Setup ---

    /// Creates the directory if needed and runs `git init`.
    ///
    /// # Errors
    ///
    /// The directory cannot be created or `git init` fails.
    pub async fn init(&self, path: &Path) -> GitResult<()> {
        std::fs::create_dir_all(path).map_err(|e| {
            WorkflowError::new(
                ErrorKind::ExecutionError,
                format!("cannot create '{}': {e}", path.display()),
            )
        })?;
        self.git_ok(path, "git init", ["init", "--quiet"]).await?;
        Ok(())
    }

    /// Points remote `origin` at `location` when a URL or path is configured.
    ///
    /// # Errors
    ///
    /// Launch failures and failed `git remote` calls.
    pub async fn setup_remote(&self, path: &Path, location: &str) -> GitResult<()> {
        if !is_remote_location(location) {
            return Ok(());
        }
        let remotes = self.git_ok(path, "git remote", ["remote"]).await?;
        let exists = remotes.stdout().lines().any(|name| name.trim() == "origin");
        let action = if exists { "set-url" } else { "add" };
        self.git_ok(path, "git remote", ["remote", action, "origin", location])
            .await?;
        debug!(action, location, "configured remote origin");
        Ok(())
    }

    /// Checks out an existing local branch.
    ///
    /// # Errors
    ///
    /// Launch failures and a failed checkout.
    pub async fn checkout(&self, path: &Path, branch: &str) -> GitResult<()> {
        self.git_ok(path, "git checkout", ["checkout", "-q", branch])
            .await?;
        Ok(())
    }

    /// Creates `branch` and ties it to `remote`.
    ///
    /// ```text
    /// remote has branch? ── yes ──> fetch, checkout -b FETCH_HEAD, set upstream
    ///        │
    ///        no ──> checkout -b (empty initial commit on unborn HEAD), push -u
    /// ```
    ///
    /// Returns a warning when the initial push fails.
    ///
    /// # Errors
    ///
    /// Launch failures, an unreachable remote for an advertised branch, or a
    /// failed checkout/commit.
    pub async fn create_and_track_branch(
        &self,
        path: &Path,
        branch: &str,
        remote: &str,
    ) -> GitResult<Option<String>> {
        if self.remote_branch_exists(path, remote, branch).await? {
            let fetch = self.git(path, ["fetch", "--quiet", remote, branch]).await?;
            if !fetch.success() {
                return Err(WorkflowError::new(
                    ErrorKind::RemoteUnreachable,
                    format!("cannot fetch '{branch}' from '{remote}'"),
                )
                .with_result(fetch));
            }
            self.git_ok(
                path,
                "git checkout",
                ["checkout", "-q", "-b", branch, "FETCH_HEAD"],
            )
            .await?;
            if !is_remote_location(remote) {
                let upstream = self
                    .git(
                        path,
                        [
                            "branch".to_string(),
                            format!("--set-upstream-to={remote}/{branch}"),
                            branch.to_string(),
                        ],
                    )
                    .await?;
                if !upstream.success() {
                    return Ok(Some(format!(
                        "could not set upstream of '{branch}' to '{remote}/{branch}'"
                    )));
                }
            }
            return Ok(None);
        }

        if self.has_head(path).await? {
            self.git_ok(path, "git checkout", ["checkout", "-q", "-b", branch])
                .await?;
        } else {
            self.git_ok(
                path,
                "git symbolic-ref",
                [
                    "symbolic-ref".to_string(),
                    "HEAD".to_string(),
                    format!("refs/heads/{branch}"),
                ],
            )
            .await?;
            self.git_ok(
                path,
                "git commit",
                ["commit", "--allow-empty", "-q", "-m", "Initial commit"],
            )
            .await?;
        }

        let push = self.git(path, ["push", "-u", remote, branch]).await?;
        if push.success() {
            Ok(None)
        } else {
            let reason = push.stderr().lines().next().unwrap_or("unknown error");
            Ok(Some(format!(
                "initial push of '{branch}' to '{remote}' failed: {reason}"
            )))
        }
    }
}

/// Lazily parsed `git log` output, newest first.
#[derive(Debug, Clone)]
pub struct RemoteCommits {
    output: String,
    offset: usize,
}

impl RemoteCommits {
    #[must_use]
    pub const fn new(output: String) -> Self {
        Self { output, offset: 0 }
    }
}

impl Iterator for RemoteCommits {
    type Item = RemoteCommit;

    fn next(&mut self) -> Option<Self::Item> {
        while self.offset < self.output.len() {
            let rest = &self.output[self.offset..];
            let (line, advance) = rest
                .find('\n')
                .map_or((rest, rest.len()), |end| (&rest[..end], end + 1));
            self.offset += advance;
            if let Some(commit) = RemoteCommit::parse(line) {
                return Some(commit);
            }
        }
        None
    }
}
