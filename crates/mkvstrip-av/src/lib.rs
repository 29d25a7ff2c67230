//! # mkvstrip-av
//!
//! Track identification and language-based stripping for Matroska files.
//!
//! This crate provides:
//!
//! - **Identification** ([`identify`]) -- run `mkvmerge --identify-verbose`
//!   (or `-J`) and parse the audio and subtitle tracks it reports.
//! - **Selection** ([`select`]) -- pick the single track of a kind matching a
//!   requested language, refusing to guess between duplicates.
//! - **Argument building** ([`args`]) -- `--audio-tracks` /
//!   `--subtitle-tracks` and `--default-track` fragments for mkvmerge.
//! - **Remux** ([`remux`]) -- run mkvmerge and verify its output.
//! - **Commit** ([`commit`]) -- swap the remuxed file into place while
//!   keeping the original as a backup.
//!
//! ## Example
//!
//! ```
//! use mkvstrip_av::{identify::parse_verbose, FileJob, LanguageRequest};
//! use std::path::{Path, PathBuf};
//!
//! let inventory = parse_verbose(
//!     "Track ID 1: audio (AC-3) [language:eng]\n\
//!      Track ID 2: audio (AAC) [language:jpn]\n",
//! );
//! let request = LanguageRequest {
//!     audio: Some("jpn".parse()?),
//!     subtitle: None,
//! };
//! let job = FileJob::plan(PathBuf::from("show.mkv"), inventory, &request);
//! assert_eq!(
//!     job.remux_args(Path::new("show.mkv.temp")),
//!     ["-o", "show.mkv.temp", "--audio-tracks", "2", "--default-track", "2:1", "show.mkv"]
//! );
//! # Ok::<(), mkvstrip_av::Error>(())
//! ```

pub mod args;
pub mod command;
pub mod commit;
mod error;
pub mod identify;
pub mod job;
pub mod remux;
pub mod select;
pub mod tools;
pub mod tracks;

// Re-exports
pub use command::{ToolCommand, ToolOutput};
pub use commit::{commit, CommitNames, Committed};
pub use error::{Error, FailureKind, Result};
pub use identify::{identify_tracks, IdentifyFormat, Identifier, MkvmergeIdentifier};
pub use job::{FileJob, LanguageRequest};
pub use remux::{run_remux, MkvmergeRemuxer, Remuxer};
pub use select::{KeepSet, SelectionOutcome, TrackDecision};
pub use tools::{check_tool, resolve_tool, ToolInfo, MKVMERGE};
pub use tracks::{LanguageCode, TrackId, TrackInventory, TrackKind, TrackRecord};
