//! Remux collaborator and its result checking.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;

use crate::command::{ToolCommand, ToolOutput};
use crate::{Error, Result};

/// mkvmerge exit status for "completed, but with warnings".
const EXIT_WARNINGS: i32 = 1;

/// Something that can run a remux given the full argument list.
#[async_trait]
pub trait Remuxer: Send + Sync {
    /// Run the remux tool with `args` and return its raw output.
    async fn remux(&self, args: &[String]) -> Result<ToolOutput>;

    /// Whether the exit status of `output` counts as success.
    fn succeeded(&self, output: &ToolOutput) -> bool {
        output.success()
    }
}

#[async_trait]
impl<T: Remuxer + ?Sized> Remuxer for &T {
    async fn remux(&self, args: &[String]) -> Result<ToolOutput> {
        (**self).remux(args).await
    }

    fn succeeded(&self, output: &ToolOutput) -> bool {
        (**self).succeeded(output)
    }
}

/// [`Remuxer`] backed by the mkvmerge binary.
#[derive(Debug, Clone)]
pub struct MkvmergeRemuxer {
    program: PathBuf,
    timeout: Option<Duration>,
    accept_warnings: bool,
}

impl MkvmergeRemuxer {
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            timeout: None,
            accept_warnings: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Treat exit status 1 (warnings) as success.
    pub fn accept_warnings(mut self, accept: bool) -> Self {
        self.accept_warnings = accept;
        self
    }
}

#[async_trait]
impl Remuxer for MkvmergeRemuxer {
    async fn remux(&self, args: &[String]) -> Result<ToolOutput> {
        ToolCommand::new(self.program.clone())
            .args(args.iter().cloned())
            .timeout(self.timeout)
            .execute()
            .await
    }

    fn succeeded(&self, output: &ToolOutput) -> bool {
        output.success() || (self.accept_warnings && output.exit_code == Some(EXIT_WARNINGS))
    }
}

/// Run `remuxer` and make sure it produced `output_path`.
///
/// On any failure the partial output is removed; the source file is never
/// touched here.
///
/// # Errors
///
/// Returns [`Error::RemuxFailure`] for a failing exit status or a missing
/// output file, and passes through spawn and [`Error::Timeout`] errors.
pub async fn run_remux<R: Remuxer + ?Sized>(
    remuxer: &R,
    args: &[String],
    output_path: &Path,
    file: &str,
) -> Result<()> {
    let result = match remuxer.remux(args).await {
        Ok(output) if remuxer.succeeded(&output) => {
            if output.exit_code != Some(0) {
                tracing::warn!(file, "mkvmerge finished with warnings: {}", output.diagnostics());
            }
            if output_path.exists() {
                Ok(())
            } else {
                Err(Error::remux_failure(
                    file,
                    output.exit_code,
                    format!("no output written to {}", output_path.display()),
                ))
            }
        }
        Ok(output) => Err(Error::remux_failure(
            file,
            output.exit_code,
            output.diagnostics(),
        )),
        Err(e) => Err(e),
    };

    if result.is_err() {
        discard_partial(output_path, file);
    }
    result
}

fn discard_partial(path: &Path, file: &str) {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(file, path = %path.display(), "removed partial output"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            file,
            path = %path.display(),
            "could not remove partial output: {e}"
        ),
    }
}
