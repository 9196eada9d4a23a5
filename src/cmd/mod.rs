// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   workflow   run, update, show-commits, cherry-pick
//!   task       create, list, edit
//! ```

pub mod operator;
pub mod report;
pub mod task;
pub mod workflow;

#[cfg(test)]
mod tests;
