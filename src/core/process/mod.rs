// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Child processes for git, hooks and the editor.
//!
//! ```text
//! ProcessBuilder::new("git").args(..).cwd(repo).capture_output()
//!   .run_with_cancellation(token)
//!       --> ProcessOutput { exit_code, stdout, stderr, interrupted, timed_out }
//! ```

pub mod builder;
mod io;
mod runner;
