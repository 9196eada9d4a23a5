// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Child process description.
//!
//! ```text
//! ProcessBuilder::new(program) | ::raw(shell line)
//!   arg/args  cwd  env  flag  maybe_timeout
//!   capture_output | inherit_stdio             (StreamMode per stream)
//!
//! ProcessFlags: ALLOW_FAILURE, TERMINATE_ON_INTERRUPT, DETACHED
//! ```

use bitflags::bitflags;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

/// PATH lookups already resolved in this process.
static RESOLVED: OnceLock<RwLock<BTreeMap<String, PathBuf>>> = OnceLock::new();

bitflags! {
    /// Execution behavior switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProcessFlags: u32 {
        /// A non-zero exit is returned as output instead of an error
        const ALLOW_FAILURE = 0x01;
        /// The child is killed when the cancellation token fires
        const TERMINATE_ON_INTERRUPT = 0x02;
        /// The child gets its own process group so terminal signals skip it (unix)
        const DETACHED = 0x04;
    }
}

/// Where one output stream of the child goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamMode {
    /// Each line is traced and then dropped.
    #[default]
    Log,
    /// Lines are traced and joined into the returned output.
    Capture,
    /// Shares the parent's terminal.
    Inherit,
}

impl StreamMode {
    pub(super) const fn is_read(self) -> bool {
        matches!(self, Self::Log | Self::Capture)
    }

    pub(super) const fn keeps_lines(self) -> bool {
        matches!(self, Self::Capture)
    }
}

/// Result of a finished child.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: String,
    stderr: String,
    interrupted: bool,
    timed_out: bool,
}

impl ProcessOutput {
    pub(super) const fn new(
        exit_code: i32,
        stdout: String,
        stderr: String,
        interrupted: bool,
        timed_out: bool,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            interrupted,
            timed_out,
        }
    }

    /// Output of a child that was never started because cancellation came first.
    pub(super) const fn interrupted_before_start() -> Self {
        Self::new(-1, String::new(), String::new(), true, false)
    }

    /// Exit code, `-1` when the child was killed.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Captured stdout, empty unless the stream was in [`StreamMode::Capture`].
    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Captured stderr.
    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    #[must_use]
    pub const fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    #[must_use]
    pub const fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Splits into `(stdout, stderr)`.
    #[must_use]
    pub fn into_streams(self) -> (String, String) {
        (self.stdout, self.stderr)
    }
}

/// A child process to spawn, configured by chained calls.
#[derive(Debug)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    /// Added on top of the inherited environment
    env: BTreeMap<String, String>,
    flags: ProcessFlags,
    stdout: StreamMode,
    stderr: StreamMode,
    /// Name used in trace output instead of the program stem
    label: Option<&'static str>,
    timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// Starts a description for `program`, looked up on PATH at spawn time
    /// when it is a bare name.
    pub fn new(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            cwd: None,
            env: BTreeMap::new(),
            flags: ProcessFlags::empty(),
            stdout: StreamMode::default(),
            stderr: StreamMode::default(),
            label: None,
            timeout: None,
        }
    }

    /// Runs `line` through the platform shell (`/bin/sh -c`, or `cmd /C` on
    /// Windows).
    pub fn raw(line: impl Into<String>) -> Self {
        #[cfg(windows)]
        let (shell, switch) = ("cmd", "/C");
        #[cfg(not(windows))]
        let (shell, switch) = ("/bin/sh", "-c");

        let mut builder = Self::new(shell);
        builder.args = vec![switch.to_string(), line.into()];
        builder.label = Some("shell");
        builder
    }

    /// Full path of `program` on PATH. Hits are remembered for the rest of
    /// the process.
    #[must_use]
    pub fn find(program: &str) -> Option<PathBuf> {
        let resolved = RESOLVED.get_or_init(|| RwLock::new(BTreeMap::new()));
        if let Some(path) = resolved
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(program)
        {
            return Some(path.clone());
        }

        let path = which::which(program).ok()?;
        resolved
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(program.to_string(), path.clone());
        Some(path)
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
        self
    }

    #[must_use]
    pub fn cwd(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn flag(mut self, flag: ProcessFlags) -> Self {
        self.flags |= flag;
        self
    }

    /// Keeps both streams in the returned [`ProcessOutput`].
    #[must_use]
    pub const fn capture_output(self) -> Self {
        self.streams(StreamMode::Capture)
    }

    /// Hands the terminal to the child, as an editor needs.
    #[must_use]
    pub const fn inherit_stdio(self) -> Self {
        self.streams(StreamMode::Inherit)
    }

    const fn streams(mut self, mode: StreamMode) -> Self {
        self.stdout = mode;
        self.stderr = mode;
        self
    }

    /// Kills the child once `duration` has passed, if one is given.
    #[must_use]
    pub const fn maybe_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout = duration;
        self
    }

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    pub(super) fn args_slice(&self) -> &[String] {
        &self.args
    }

    pub(super) const fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(super) const fn extra_env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub(super) const fn process_flags(&self) -> ProcessFlags {
        self.flags
    }

    pub(super) const fn stdout_mode(&self) -> StreamMode {
        self.stdout
    }

    pub(super) const fn stderr_mode(&self) -> StreamMode {
        self.stderr
    }

    pub(super) const fn label(&self) -> Option<&'static str> {
        self.label
    }

    pub(super) const fn timeout_duration(&self) -> Option<Duration> {
        self.timeout
    }
}
