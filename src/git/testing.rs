// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Spy executor for unit tests: records every invocation and replays scripted results.

use std::collections::VecDeque;
use std::sync::Mutex;

use futures_util::future::BoxFuture;

use super::executor::{CommandResult, Executor, Invocation, Program};
use crate::error::ExecutionError;

#[derive(Debug, Clone)]
enum Response {
    Result(CommandResult),
    LaunchFailure,
}

#[derive(Debug)]
struct Rule {
    program: Program,
    prefix: Vec<String>,
    responses: VecDeque<Response>,
    sticky: bool,
}

impl Rule {
    fn matches(&self, invocation: &Invocation) -> bool {
        self.program == invocation.program()
            && invocation.argv().len() >= self.prefix.len()
            && self
                .prefix
                .iter()
                .zip(invocation.argv())
                .all(|(expected, actual)| expected == actual)
    }
}

/// Records invocations; unmatched ones succeed with empty output.
#[derive(Debug, Default)]
pub(crate) struct SpyExecutor {
    calls: Mutex<Vec<Invocation>>,
    rules: Mutex<Vec<Rule>>,
}

pub(crate) fn ok(stdout: &str) -> CommandResult {
    CommandResult::new(0, stdout, "", 0)
}

pub(crate) fn exit(code: i32, stderr: &str) -> CommandResult {
    CommandResult::new(code, "", stderr, 0)
}

impl SpyExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, program: Program, prefix: &[&str], response: Response, sticky: bool) {
        let mut rules = self.rules.lock().expect("rules lock");
        if !sticky
            && let Some(rule) = rules.iter_mut().find(|rule| {
                !rule.sticky
                    && rule.program == program
                    && rule.prefix.iter().map(String::as_str).eq(prefix.iter().copied())
            })
        {
            rule.responses.push_back(response);
            return;
        }
        rules.push(Rule {
            program,
            prefix: prefix.iter().map(ToString::to_string).collect(),
            responses: VecDeque::from([response]),
            sticky,
        });
    }

    /// Next matching git invocation returns `result` (queued per prefix).
    pub(crate) fn git_once(&self, prefix: &[&str], result: CommandResult) -> &Self {
        self.push(Program::Git, prefix, Response::Result(result), false);
        self
    }

    /// Every matching git invocation returns `result` once queued responses run out.
    pub(crate) fn git_always(&self, prefix: &[&str], result: CommandResult) -> &Self {
        self.push(Program::Git, prefix, Response::Result(result), true);
        self
    }

    /// The shell command `command` returns `result`.
    pub(crate) fn shell_always(&self, command: &str, result: CommandResult) -> &Self {
        self.push(Program::Shell, &[command], Response::Result(result), true);
        self
    }

    /// Matching git invocations cannot be launched.
    pub(crate) fn git_launch_failure(&self, prefix: &[&str]) -> &Self {
        self.push(Program::Git, prefix, Response::LaunchFailure, true);
        self
    }

    fn respond(&self, invocation: &Invocation) -> Response {
        let mut rules = self.rules.lock().expect("rules lock");
        let queued = rules
            .iter_mut()
            .filter(|rule| !rule.sticky && !rule.responses.is_empty() && rule.matches(invocation))
            .max_by_key(|rule| rule.prefix.len())
            .and_then(|rule| rule.responses.pop_front());
        if let Some(response) = queued {
            return response;
        }
        rules
            .iter()
            .filter(|rule| rule.sticky && rule.matches(invocation))
            .max_by_key(|rule| rule.prefix.len())
            .and_then(|rule| rule.responses.front().cloned())
            .unwrap_or_else(|| Response::Result(ok("")))
    }

    /// Every invocation so far, in order.
    pub(crate) fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Invocations rendered as `git <argv>` / `sh -c <cmd>`.
    pub(crate) fn rendered(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }

    /// Git subcommands invoked, in order.
    pub(crate) fn subcommands(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter_map(|call| call.subcommand().map(String::from))
            .collect()
    }

    /// Number of invocations whose argv starts with `prefix`.
    pub(crate) fn count(&self, prefix: &[&str]) -> usize {
        self.calls()
            .iter()
            .filter(|call| {
                call.program() == Program::Git
                    && call.argv().len() >= prefix.len()
                    && prefix.iter().zip(call.argv()).all(|(p, a)| p == a)
            })
            .count()
    }
}

impl Executor for SpyExecutor {
    fn run<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, Result<CommandResult, ExecutionError>> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(invocation.clone());
        let response = self.respond(invocation);
        Box::pin(async move {
            match response {
                Response::Result(result) => Ok(result),
                Response::LaunchFailure => Err(ExecutionError {
                    program: "git".to_string(),
                    message: "No such file or directory (os error 2)".to_string(),
                }),
            }
        })
    }
}

/// Temporary directory holding an initialized (empty) repository.
pub(crate) fn repo_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    gix::init(dir.path()).expect("failed to init repository");
    dir
}

/// Temporary directory without repository metadata.
pub(crate) fn plain_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}
