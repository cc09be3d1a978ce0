//! External process execution
//!
//! Everything the crate learns about the outside world arrives through one
//! narrow seam: run a command, capture its line-buffered output, report its
//! exit. [`CommandRunner`] has two modes:
//!
//! - `run`: one-shot capture, used by discovery and launch. Exit 0 resolves
//!   with a [`CommandOutput`]; anything else rejects with the same captured
//!   shape, so callers distinguish success from failure by the `Result` alone.
//! - `feed`: piped-stdin mode, used by streaming. The full input is written
//!   as one chunk and the write side closed; the helper's own output and exit
//!   status are logged for diagnostics only.
//!
//! The trait keeps discovery and streaming logic testable without spawning
//! real OS processes.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;

use crate::error::{MarklaunchError, Result};

/// Exit code reported when the spawn call itself fails
const SPAWN_FAILURE_CODE: i32 = 128;

/// Captured result of a single process invocation
///
/// Lines are whitespace-trimmed and kept in arrival order within each
/// stream; there is no ordering guarantee between stdout and stderr.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CommandOutput {
    /// Synthetic output for a spawn that failed before producing anything
    pub fn spawn_failure(err: &std::io::Error) -> Self {
        Self {
            exit_code: SPAWN_FAILURE_CODE,
            stdout: Vec::new(),
            stderr: vec![err.to_string()],
        }
    }

    /// The captured text most useful in an error message: stderr when
    /// present, stdout otherwise.
    pub fn error_message(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.join("\n")
        } else {
            self.stderr.join("\n")
        }
    }
}

/// Narrow process-execution interface
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, capturing line-buffered stdout/stderr
    async fn run(&self, command: &Path, args: &[String]) -> Result<CommandOutput>;

    /// Spawn a command with piped stdin, write `input` as one chunk, and
    /// close the write side. Output and exit are logged, not returned.
    async fn feed(&self, command: &Path, args: &[String], input: &str) -> Result<()>;
}

/// [`CommandRunner`] backed by real OS processes
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, command: &Path, args: &[String]) -> Result<CommandOutput> {
        let mut child = match Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return Err(MarklaunchError::CommandFailed(CommandOutput::spawn_failure(
                    &e,
                )))
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (stdout_lines, stderr_lines, status) = tokio::join!(
            collect_lines(stdout),
            collect_lines(stderr),
            child.wait()
        );
        let status = status?;

        let output = CommandOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout: stdout_lines,
            stderr: stderr_lines,
        };

        if status.success() {
            Ok(output)
        } else {
            Err(MarklaunchError::CommandFailed(output))
        }
    }

    async fn feed(&self, command: &Path, args: &[String], input: &str) -> Result<()> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                MarklaunchError::stream_write(format!(
                    "failed to spawn {}: {e}",
                    command.display()
                ))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MarklaunchError::stream_write("no stdin handle on helper"))?;

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(log_lines(stdout, "helper stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(log_lines(stderr, "helper stderr"));
        }

        stdin
            .write_all(input.as_bytes())
            .await
            .map_err(|e| MarklaunchError::stream_write(e.to_string()))?;
        stdin
            .shutdown()
            .await
            .map_err(|e| MarklaunchError::stream_write(e.to_string()))?;
        drop(stdin);

        // One helper per snapshot; reap it off to the side.
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    tracing::warn!("helper exit: {status}");
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("helper wait error: {e}"),
            }
        });

        Ok(())
    }
}

async fn collect_lines<R>(reader: Option<R>) -> Vec<String>
where
    R: AsyncRead + Unpin,
{
    let mut collected = Vec::new();
    let Some(reader) = reader else {
        return collected;
    };

    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        collected.push(line.trim().to_string());
    }
    collected
}

async fn log_lines<R>(reader: R, label: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::debug!("{label}: {}", line.trim());
    }
}
