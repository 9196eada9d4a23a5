// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Terminal operator for interactive cherry-pick.
//!
//! Prompts go to stderr so `--json` output on stdout stays machine-readable.

use std::fmt::Write as _;
use std::io::Write as _;

use futures_util::future::BoxFuture;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::workflow::{Operator, Prompt};

/// Reads operator replies line by line from stdin.
pub struct ConsoleOperator {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl ConsoleOperator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for ConsoleOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for ConsoleOperator {
    fn ask<'a>(&'a self, prompt: Prompt<'a>) -> BoxFuture<'a, Option<String>> {
        let text = render_prompt(&prompt);
        Box::pin(async move {
            show(&text);
            // EOF and read errors both end the session.
            self.lines.lock().await.next_line().await.ok().flatten()
        })
    }
}

fn show(text: &str) {
    let mut stderr = std::io::stderr().lock();
    let _ = stderr.write_all(text.as_bytes());
    let _ = stderr.flush();
}

/// Text shown for `prompt`, ending where the reply is typed.
#[must_use]
pub fn render_prompt(prompt: &Prompt<'_>) -> String {
    let mut out = String::new();
    match prompt {
        Prompt::Selection { commits, error } => {
            out.push_str("Recent remote commits (1 = newest):\n");
            for (i, commit) in commits.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {:>2}. {} {} ({}, {})",
                    i + 1,
                    commit.short_hash,
                    commit.subject,
                    commit.author_name,
                    commit.author_date
                );
            }
            if let Some(error) = error {
                let _ = writeln!(out, "Invalid selection: {error}");
            }
            out.push_str("Commits to cherry-pick, in the order to apply (e.g. 3,1): ");
        }
        Prompt::Resolution {
            commit,
            files,
            error,
        } => {
            let _ = writeln!(
                out,
                "Cherry-pick of {} ({}) stopped on conflicts:",
                commit.short_hash, commit.subject
            );
            for file in *files {
                let _ = writeln!(out, "  {file}");
            }
            if let Some(error) = error {
                let _ = writeln!(out, "{error}");
            }
            out.push_str("Resolve and stage the files, then type 'continue' or 'abort': ");
        }
    }
    out
}
