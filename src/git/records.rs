// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Value records parsed from git's machine-oriented output.
//!
//! Fields are separated by the ASCII unit separator (`%x1f`) so subjects and
//! stash messages may contain any printable text.

use serde::Serialize;

/// Field separator used in every `--format` string below.
pub(crate) const FIELD_SEP: char = '\u{1f}';

/// `git log` format producing one [`RemoteCommit`] per line.
pub(crate) const LOG_FORMAT: &str = "--format=%h%x1f%H%x1f%an%x1f%ad%x1f%s";

/// `git stash list` format producing one [`StashEntry`] per line.
pub(crate) const STASH_FORMAT: &str = "--format=%gd%x1f%gs";

/// A commit on the remote branch. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteCommit {
    pub short_hash: String,
    pub hash: String,
    pub author_name: String,
    pub author_date: String,
    pub subject: String,
}

impl RemoteCommit {
    /// Parses one line of [`LOG_FORMAT`] output.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.splitn(5, FIELD_SEP);
        let short_hash = fields.next()?.trim();
        let hash = fields.next()?.trim();
        if short_hash.is_empty() || hash.is_empty() {
            return None;
        }
        Some(Self {
            short_hash: short_hash.to_string(),
            hash: hash.to_string(),
            author_name: fields.next()?.to_string(),
            author_date: fields.next()?.to_string(),
            subject: fields.next().unwrap_or_default().to_string(),
        })
    }
}

/// One entry of the stash list, 0 being the most recent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StashEntry {
    pub index: usize,
    pub description: String,
}

impl StashEntry {
    /// Parses one line of [`STASH_FORMAT`] output (`stash@{N}<US>message`).
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let (reference, description) = line.split_once(FIELD_SEP)?;
        let index = reference
            .strip_prefix("stash@{")?
            .strip_suffix('}')?
            .parse()
            .ok()?;
        Some(Self {
            index,
            description: description.to_string(),
        })
    }

    /// Reference usable on the command line.
    #[must_use]
    pub fn reference(&self) -> String {
        format!("stash@{{{}}}", self.index)
    }

    /// True when the stash message carries `label`.
    ///
    /// `git stash push -m <label>` records `On <branch>: <label>`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.description == label
            || self
                .description
                .split_once(": ")
                .is_some_and(|(_, message)| message == label)
    }
}

/// Parses a whole stash list, skipping lines that do not fit the format.
#[must_use]
pub fn parse_stash_list(stdout: &str) -> Vec<StashEntry> {
    stdout.lines().filter_map(StashEntry::parse).collect()
}
