//! External tool detection.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the Matroska muxer binary used for both identification and remux.
pub const MKVMERGE: &str = "mkvmerge";

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// # Example
///
/// ```no_run
/// use mkvstrip_av::check_tool;
///
/// let info = check_tool("mkvmerge");
/// if info.available {
///     println!("mkvmerge version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(program: impl AsRef<Path>) -> ToolInfo {
    let program = program.as_ref();
    let name = program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.to_string_lossy().to_string());

    match Command::new(program).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .map(|s| s.to_string());

            ToolInfo {
                name,
                available: true,
                version,
                path: which::which(program).ok(),
            }
        }
        _ => ToolInfo {
            name,
            available: false,
            version: None,
            path: None,
        },
    }
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
///
/// A configured path that does not exist is logged and ignored.
///
/// # Errors
///
/// Returns [`Error::ToolNotFound`] if neither the configured path nor `PATH`
/// yields the tool.
pub fn resolve_tool(name: &str, configured: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = configured {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        tracing::warn!(
            tool = name,
            path = %path.display(),
            "configured tool path does not exist, falling back to PATH"
        );
    }

    which::which(name).map_err(|_| Error::tool_not_found(name))
}
