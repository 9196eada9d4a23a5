// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git plumbing for the workflow engine.
//!
//! ```text
//!          workflow engine
//!                |
//!                v
//!   ,------------------------,
//!   |       Inspector        |  typed queries and mutations
//!   '---+----------------+---'
//!       |                |
//!       v                v
//!   classify         records
//!   (outcomes)  (RemoteCommit, StashEntry)
//!       |
//!       v
//!   Executor (trait) ──> ShellExecutor ──> core::process
//! ```
//!
//! **`gix`** opens repository metadata for `is_repository`.
//! **`git` CLI** performs every operation with side effects.

pub mod classify;
pub mod executor;
pub mod inspector;
pub mod records;

#[cfg(test)]
pub(crate) mod testing;
