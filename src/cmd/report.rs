// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Final report rendering on stdout.

use std::fmt::Write as _;

use tracing::error;

use crate::workflow::{EventSink, RunOutcome, RunReport, StageEvent};

/// Prints the final report: a summary, or one JSON line with `json`.
///
/// Stage events are already logged by the engine, so only the report is printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    json: bool,
}

impl ConsoleSink {
    #[must_use]
    pub const fn new(json: bool) -> Self {
        Self { json }
    }
}

impl EventSink for ConsoleSink {
    fn stage(&self, _event: &StageEvent) {}

    fn finish(&self, report: &RunReport) {
        if self.json {
            match serde_json::to_string(report) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("failed to serialize report: {e}"),
            }
        } else {
            print!("{}", render_summary(report));
        }
    }
}

/// Human-readable summary of `report`.
#[must_use]
pub fn render_summary(report: &RunReport) -> String {
    let mut out = String::new();
    let task = &report.task;
    match report.outcome {
        RunOutcome::Pushed | RunOutcome::Committed => {
            let verb = if report.outcome == RunOutcome::Pushed {
                "committed and pushed"
            } else {
                "committed"
            };
            let _ = write!(out, "{task}: {verb} {}", plural(report.commits_created));
            if let Some(hash) = &report.last_commit {
                let _ = write!(out, " (last {})", hash.get(..7).unwrap_or(hash));
            }
            out.push('\n');
        }
        RunOutcome::NoChanges => {
            let _ = writeln!(out, "{task}: no changes to commit");
        }
        RunOutcome::Completed if report.commits.is_empty() && report.commits_created == 0 => {
            let _ = writeln!(out, "{task}: {} finished, nothing to show", report.workflow);
        }
        RunOutcome::Completed => {
            if report.commits_created > 0 {
                let _ = writeln!(
                    out,
                    "{task}: cherry-picked {}",
                    plural(report.commits_created)
                );
            }
            if !report.commits.is_empty() {
                let _ = writeln!(out, "{task}: recent remote commits (newest first)");
                for (i, commit) in report.commits.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "  {:>2}. {}  {}  {}  {}",
                        i + 1,
                        commit.short_hash,
                        commit.author_date,
                        commit.author_name,
                        commit.subject
                    );
                }
            }
        }
        RunOutcome::Failed | RunOutcome::Interrupted => {
            let state = if report.outcome == RunOutcome::Failed {
                "failed"
            } else {
                "interrupted"
            };
            let _ = write!(out, "{task}: {state}");
            if let Some(stage) = report.stage {
                let _ = write!(out, " at {stage}");
            }
            if let Some(kind) = report.error_kind {
                let _ = write!(out, " [{kind}]");
            }
            if let Some(message) = &report.message {
                let _ = write!(out, ": {message}");
            }
            out.push('\n');
        }
    }
    for warning in &report.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    out
}

fn plural(commits: usize) -> String {
    if commits == 1 {
        "1 commit".to_string()
    } else {
        format!("{commits} commits")
    }
}
