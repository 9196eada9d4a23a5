// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Scripted operator and recording sink for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::event::{EventSink, RunReport, StageEvent};
use super::pick::{Operator, Prompt};

/// Replays canned replies and records what was asked.
#[derive(Debug, Default)]
pub(crate) struct ScriptedOperator {
    replies: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedOperator {
    pub(crate) fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            asked: Mutex::new(Vec::new()),
        }
    }

    /// One line per prompt: `selection[:error]` or `resolution <hash>[:error]`.
    #[must_use]
    pub(crate) fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Operator for ScriptedOperator {
    fn ask<'a>(&'a self, prompt: Prompt<'a>) -> BoxFuture<'a, Option<String>> {
        let summary = match prompt {
            Prompt::Selection { error, .. } => {
                error.map_or_else(|| "selection".to_string(), |e| format!("selection:{e}"))
            }
            Prompt::Resolution { commit, error, .. } => error.map_or_else(
                || format!("resolution {}", commit.short_hash),
                |e| format!("resolution {}:{e}", commit.short_hash),
            ),
        };
        self.asked
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(summary);
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();
        Box::pin(async move { reply })
    }
}

/// Answers the selection prompt, then fires `cancel` and leaves the
/// resolution prompt unanswered, like Ctrl+C at the terminal.
pub(crate) struct InterruptAtResolution {
    selection: String,
    cancel: CancellationToken,
}

impl InterruptAtResolution {
    pub(crate) fn new(selection: &str, cancel: CancellationToken) -> Self {
        Self {
            selection: selection.to_string(),
            cancel,
        }
    }
}

impl Operator for InterruptAtResolution {
    fn ask<'a>(&'a self, prompt: Prompt<'a>) -> BoxFuture<'a, Option<String>> {
        match prompt {
            Prompt::Selection { .. } => Box::pin(async move { Some(self.selection.clone()) }),
            Prompt::Resolution { .. } => Box::pin(async move {
                self.cancel.cancel();
                std::future::pending().await
            }),
        }
    }
}

/// Keeps every event for later rendering.
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    stages: Mutex<Vec<StageEvent>>,
    reports: Mutex<Vec<RunReport>>,
}

impl RecordingSink {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub(crate) fn stages(&self) -> Vec<StageEvent> {
        self.stages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Final events received; a well-behaved engine sends exactly one.
    #[must_use]
    pub(crate) fn reports(&self) -> Vec<RunReport> {
        self.reports
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn stage(&self, event: &StageEvent) {
        self.stages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.clone());
    }

    fn finish(&self, report: &RunReport) {
        self.reports
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(report.clone());
    }
}
