// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |         workflow / task / operator
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  task files, loader, dir  |
//!              '-------------+-------------'
//!                            v
//!              ,---------------------------,
//!              |         workflow          |
//!              |  stages, engine, events,  |
//!              |  interactive cherry-pick  |
//!              '------+-------------+------'
//!                     |             |
//!                     v             v
//!                   task           git
//!               context, msg   inspector, executor
//!
//!   +-----------------------------------------+
//!   |  core   process (tokio)                 |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod task;
pub mod workflow;
