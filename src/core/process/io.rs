// gitauto-rs: Git Task Automation
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Stream draining and the wait race.
//!
//! ```text
//! stdout reader ─┐
//! stderr reader ─┼─> line channels ──> ProcessOutput
//! wait | timeout (kill) | token (kill)
//! ```

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamMode};
use crate::error::ProcessError;

enum Ending {
    Exited,
    TimedOut,
    Interrupted,
}

/// Reader task and the receiving end of its line channel.
struct Drain {
    handle: Option<JoinHandle<()>>,
    lines: mpsc::UnboundedReceiver<String>,
    mode: StreamMode,
}

impl Drain {
    fn start<R>(stream: Option<R>, mode: StreamMode, process: &str, label: &'static str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, lines) = mpsc::unbounded_channel();
        let handle = stream.filter(|_| mode.is_read()).map(|stream| {
            let process = process.to_string();
            tokio::spawn(async move {
                let mut reader = BufReader::new(stream).lines();
                loop {
                    match reader.next_line().await {
                        Ok(Some(line)) => {
                            trace!(process = %process, stream = label, line = %line, "output");
                            if mode.keeps_lines() {
                                let _ = tx.send(line);
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            warn!(
                                process = %process,
                                stream = label,
                                error = %e,
                                "stream read failed"
                            );
                            break;
                        }
                    }
                }
            })
        });
        Self { handle, lines, mode }
    }

    async fn finish(mut self) -> String {
        if let Some(handle) = self.handle {
            let _ = handle.await;
        }
        if !self.mode.keeps_lines() {
            return String::new();
        }
        let mut collected = Vec::new();
        while let Ok(line) = self.lines.try_recv() {
            collected.push(line);
        }
        collected.join("\n")
    }
}

async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

async fn expired(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

impl ProcessBuilder {
    /// Drains the child's streams while waiting for it to exit, be timed out,
    /// or be cancelled through `token`.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: Option<CancellationToken>,
    ) -> Result<ProcessOutput, ProcessError> {
        let stdout = Drain::start(child.stdout.take(), self.stdout_mode(), name, "stdout");
        let stderr = Drain::start(child.stderr.take(), self.stderr_mode(), name, "stderr");

        let io_failure = |e: std::io::Error| ProcessError::OutputError {
            command: name.to_string(),
            message: e.to_string(),
        };

        let (status, ending) = tokio::select! {
            status = child.wait() => (status.map_err(io_failure)?, Ending::Exited),
            () = expired(self.timeout_duration()) => {
                warn!(process = %name, timeout = ?self.timeout_duration(), "timed out, killing");
                child.kill().await.map_err(io_failure)?;
                (child.wait().await.map_err(io_failure)?, Ending::TimedOut)
            }
            () = cancelled(token.as_ref()) => {
                warn!(process = %name, "interrupted, killing");
                child.kill().await.map_err(io_failure)?;
                (child.wait().await.map_err(io_failure)?, Ending::Interrupted)
            }
        };

        let exit_code = match ending {
            Ending::Exited => status.code().unwrap_or(-1),
            Ending::TimedOut | Ending::Interrupted => -1,
        };

        Ok(ProcessOutput::new(
            exit_code,
            stdout.finish().await,
            stderr.finish().await,
            matches!(ending, Ending::Interrupted),
            matches!(ending, Ending::TimedOut),
        ))
    }
}
