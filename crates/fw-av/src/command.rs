//! Builder for executing external tool commands with timeout and
//! cancellation support.
//!
//! ffmpeg rewrites its progress line in place with `\r`, so the diagnostic
//! stream is read in `\r`-delimited chunks while the process runs rather
//! than buffered until exit.

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use fw_core::Error;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Default command timeout: 5 minutes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Upper bound on the standard error kept in [`ToolOutput::stderr`].
const STDERR_TAIL_LIMIT: usize = 64 * 1024;

/// Record of one finished tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Tool name (file name of the program).
    pub tool: String,
    /// Rendered command line, arguments quoted.
    pub command_line: String,
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Tail of standard error (lossy UTF-8), at most 64 KiB.
    pub stderr: String,
    /// Last non-blank `\r`-delimited chunk of standard error.
    pub last_line: String,
    /// Wall time from spawn to exit.
    pub elapsed: Duration,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.status.code()
    }

    /// The tool's own error text from the last diagnostic line.
    ///
    /// Takes what follows the last `"<tool>:"` prefix (or the whole chunk
    /// when there is none), then its last non-blank line. Falls back to the
    /// exit status so the message is never empty.
    pub fn failure_message(&self) -> String {
        let marker = format!("{}:", self.tool);
        let tail = self.last_line.rsplit(marker.as_str()).next().unwrap_or("");
        tail.lines()
            .map(str::trim)
            .rfind(|l| !l.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} exited with {}", self.tool, self.status))
    }
}

enum Outcome {
    Exited(io::Result<ExitStatus>),
    TimedOut,
    Cancelled,
}

/// A builder for constructing and executing external tool invocations.
///
/// # Example
///
/// ```no_run
/// use fw_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # async fn example() -> fw_core::Result<()> {
/// let mut cmd = ToolCommand::new(PathBuf::from("ffmpeg"));
/// cmd.args(["-y", "-i", "/path/to/in.avi", "/path/to/out.mp4"]);
/// let output = cmd
///     .execute_streaming(|line| println!("ffmpeg: {line}"), None)
///     .await?;
/// println!("exit {:?} after {:?}", output.exit_code(), output.elapsed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// File name of the program, used as the tool name in errors.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Render the command as a shell-style line. Option names stay bare;
    /// values and paths are single-quoted.
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string_lossy().to_string();
        for arg in &self.args {
            line.push(' ');
            if is_option_name(arg) {
                line.push_str(arg);
            } else {
                line.push_str(&shell_quote(arg));
            }
        }
        line
    }

    /// Execute the command, failing with [`Error::Tool`] on a non-zero exit.
    ///
    /// # Errors
    ///
    /// - [`Error::Tool`] if spawning fails or the exit status is non-zero
    ///   (message includes the stderr tail).
    /// - [`Error::TimedOut`] if the process outlives the timeout.
    pub async fn execute(&self) -> fw_core::Result<ToolOutput> {
        let output = self.execute_streaming(|_| {}, None).await?;
        if !output.success() {
            return Err(Error::tool(
                output.tool.clone(),
                format!("exited with status {}: {}", output.status, output.stderr.trim()),
            ));
        }
        Ok(output)
    }

    /// Run the command, handing each `\r`-delimited chunk of stderr to
    /// `on_line` as it arrives.
    ///
    /// The returned [`ToolOutput`] is produced for every exit status; the
    /// caller decides what a non-zero exit means.
    ///
    /// # Errors
    ///
    /// - [`Error::Tool`] if the process cannot be spawned.
    /// - [`Error::TimedOut`] / [`Error::Cancelled`] after the child has been
    ///   killed.
    /// - [`Error::Io`] if reading the stream or waiting fails.
    pub async fn execute_streaming<F>(
        &self,
        mut on_line: F,
        cancel: Option<&CancellationToken>,
    ) -> fw_core::Result<ToolOutput>
    where
        F: FnMut(&str),
    {
        let tool = self.program_name();
        let command_line = self.command_line();
        tracing::debug!("run: {command_line}");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                Error::tool(&tool, format!("{tool} not found; is it installed and in PATH?"))
            } else {
                Error::tool(&tool, format!("failed to spawn: {e}"))
            }
        })?;

        // Drain stdout alongside stderr so neither pipe can fill up.
        let stdout_task = child.stdout.take().map(|mut stdout| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                if let Err(e) = stdout.read_to_end(&mut buf).await {
                    tracing::debug!("stdout read failed after {} bytes: {e}", buf.len());
                }
                buf
            })
        });
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::tool(&tool, "stderr was not captured"))?;

        let mut captured = String::new();
        let mut last_line = String::new();

        let outcome = {
            let drive = async {
                let mut reader = BufReader::new(stderr);
                let mut chunk = Vec::new();
                loop {
                    chunk.clear();
                    if reader.read_until(b'\r', &mut chunk).await? == 0 {
                        break;
                    }
                    let text = String::from_utf8_lossy(&chunk);
                    push_tail(&mut captured, &text, STDERR_TAIL_LIMIT);
                    let line = text.trim_end_matches('\r');
                    if line.trim().is_empty() {
                        continue;
                    }
                    on_line(line);
                    last_line.clear();
                    last_line.push_str(line);
                }
                let status = child.wait().await?;
                Ok::<ExitStatus, io::Error>(status)
            };

            tokio::select! {
                res = tokio::time::timeout(self.timeout, drive) => match res {
                    Ok(status) => Outcome::Exited(status),
                    Err(_elapsed) => Outcome::TimedOut,
                },
                _ = cancelled(cancel) => Outcome::Cancelled,
            }
        };

        let interrupted = match outcome {
            Outcome::Exited(status) => Ok(status?),
            Outcome::TimedOut => Err(Error::TimedOut {
                command: command_line.clone(),
                timeout: self.timeout,
            }),
            Outcome::Cancelled => Err(Error::Cancelled {
                command: command_line.clone(),
            }),
        };
        let status = match interrupted {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!("{err}; killing {tool}");
                if let Err(e) = child.kill().await {
                    tracing::warn!("failed to kill {tool}: {e}");
                }
                if let Some(task) = stdout_task {
                    task.abort();
                }
                return Err(err);
            }
        };

        let stdout = match stdout_task {
            Some(task) => task.await.unwrap_or_default(),
            None => Vec::new(),
        };

        let output = ToolOutput {
            tool,
            command_line,
            status,
            stdout: String::from_utf8_lossy(&stdout).to_string(),
            stderr: captured,
            last_line,
            elapsed: started.elapsed(),
        };
        tracing::debug!(
            "{} exited with {} after {:.2}s",
            output.tool,
            output.status,
            output.elapsed.as_secs_f64()
        );
        Ok(output)
    }
}

async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending::<()>().await,
    }
}

/// Append `text` to `buf`, then drop whole characters from the front until
/// `buf` fits in `limit` bytes.
fn push_tail(buf: &mut String, text: &str, limit: usize) {
    buf.push_str(text);
    if buf.len() <= limit {
        return;
    }
    let mut cut = buf.len() - limit;
    while !buf.is_char_boundary(cut) {
        cut += 1;
    }
    buf.drain(..cut);
}

/// `-y`, `-i`, `-vcodec`, `-c:v` and the like.
fn is_option_name(arg: &str) -> bool {
    let mut chars = arg.chars();
    chars.next() == Some('-')
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && arg[1..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}
