//! Builder for executing external tool commands with an optional bounded wait.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::{Error, Result};

/// Output captured from a tool execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured standard output, undecoded.
    pub stdout: Vec<u8>,
    /// Captured standard error, undecoded.
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Lossy text of stderr, falling back to stdout when stderr is empty.
    ///
    /// mkvmerge reports most errors on stdout, so both are worth checking.
    pub fn diagnostics(&self) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr);
        let text = if stderr.trim().is_empty() {
            String::from_utf8_lossy(&self.stdout)
        } else {
            stderr
        };
        text.trim().to_string()
    }
}

/// A builder for constructing and executing external tool invocations.
///
/// Unlike [`std::process::Command::output`], a non-zero exit status is not an
/// error here: callers inspect [`ToolOutput::exit_code`] and decide.
///
/// # Example
///
/// ```no_run
/// use mkvstrip_av::ToolCommand;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// # async fn example() -> mkvstrip_av::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("mkvmerge"))
///     .arg("--identify-verbose")
///     .arg("/path/to/video.mkv")
///     .timeout(Some(Duration::from_secs(60)))
///     .execute()
///     .await?;
/// println!("exit: {:?}", output.exit_code);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ToolCommand {
    /// Create a new command for the given program path. No timeout is set.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: None,
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

    /// Bound the execution time. `None` waits indefinitely.
    pub fn timeout(&mut self, d: Option<Duration>) -> &mut Self {
        self.timeout = d;
        self
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// - [`Error::ToolNotFound`] if the program does not exist.
    /// - [`Error::ToolFailed`] if spawning or waiting on the process fails.
    /// - [`Error::Timeout`] if a timeout is set and expires; the child is
    ///   killed.
    pub async fn execute(&self) -> Result<ToolOutput> {
        let program_name = self.program_name();

        tracing::debug!(
            tool = %program_name,
            args = ?self.args,
            "running external tool"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::tool_not_found(&program_name)
            } else {
                Error::tool_failed(&program_name, format!("failed to spawn: {e}"))
            }
        })?;

        let output = match self.timeout {
            // Dropping the future on expiry drops the child, which kills it.
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_elapsed| Error::Timeout {
                    tool: program_name.clone(),
                    after: limit,
                })?,
            None => child.wait_with_output().await,
        }
        .map_err(|e| {
            Error::tool_failed(&program_name, format!("I/O error waiting for process: {e}"))
        })?;

        Ok(ToolOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
