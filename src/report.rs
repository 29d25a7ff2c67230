//! Batch results and their console rendering.

use mkvstrip_av::{FailureKind, FileJob, SelectionOutcome, TrackDecision, TrackKind, TrackRecord};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// What happened to one file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Remuxed and committed; the original now lives at `backup`.
    Remuxed { backup: PathBuf },
    /// Dry run: the remux that would have run.
    Planned { args: Vec<String> },
    /// Nothing to strip.
    NoWork,
    /// A per-file failure; the original is untouched unless `kind` is
    /// `commit`, in which case the message says where things are.
    Failed { kind: FailureKind, message: String },
}

/// Per-file entry of a [`BatchReport`].
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    /// Present once identification succeeded.
    pub job: Option<FileJob>,
    pub outcome: FileOutcome,
}

/// Counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub remuxed: usize,
    pub planned: usize,
    pub no_work: usize,
    /// Left alone because a requested language had no match or several.
    pub skipped: usize,
    pub failed: usize,
}

/// Aggregated result of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub input_directory: PathBuf,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn new(input_directory: PathBuf) -> Self {
        Self {
            input_directory,
            files: Vec::new(),
        }
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            total: self.files.len(),
            ..Summary::default()
        };
        for file in &self.files {
            match file.outcome {
                FileOutcome::Remuxed { .. } => summary.remuxed += 1,
                FileOutcome::Planned { .. } => summary.planned += 1,
                FileOutcome::NoWork if file.job.as_ref().is_some_and(selection_skipped) => {
                    summary.skipped += 1
                }
                FileOutcome::NoWork => summary.no_work += 1,
                FileOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }

    pub fn has_failures(&self) -> bool {
        self.files
            .iter()
            .any(|f| matches!(f.outcome, FileOutcome::Failed { .. }))
    }

    /// Find a file's entry by name.
    pub fn file(&self, name: &str) -> Option<&FileReport> {
        self.files.iter().find(|f| f.file == name)
    }

    /// Print every identified inventory, before any selection is applied.
    pub fn write_track_listing(&self, out: &mut impl Write) -> io::Result<()> {
        for file in &self.files {
            writeln!(out, "{}", file.file)?;
            match &file.job {
                Some(job) => {
                    write_tracks(out, "Audio tracks", &job.inventory.audio)?;
                    write_tracks(out, "Subtitle tracks", &job.inventory.subtitle)?;
                }
                None => writeln!(out, " (identification failed)")?,
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Print one line per file and a closing tally.
    pub fn write_summary(&self, out: &mut impl Write) -> io::Result<()> {
        for file in &self.files {
            let status = match &file.outcome {
                FileOutcome::Remuxed { backup } => {
                    let backup = backup
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    format!("remuxed (original kept as {backup})")
                }
                FileOutcome::Planned { args } => format!("would run: mkvmerge {}", args.join(" ")),
                FileOutcome::NoWork => "no work to be done".to_string(),
                FileOutcome::Failed { message, .. } => format!("FAILED: {message}"),
            };
            writeln!(out, "{}: {}", file.file, status)?;

            if let Some(job) = &file.job {
                for kind in TrackKind::ALL {
                    if let Some(note) = describe_decision(kind, job.decision(kind)) {
                        writeln!(out, "    {note}")?;
                    }
                }
            }
        }

        let s = self.summary();
        writeln!(
            out,
            "\n{} files: {} remuxed, {} planned, {} no work, {} skipped, {} failed",
            s.total, s.remuxed, s.planned, s.no_work, s.skipped, s.failed
        )
    }
}

fn write_tracks(out: &mut impl Write, heading: &str, tracks: &[TrackRecord]) -> io::Result<()> {
    writeln!(out, " {heading}")?;
    for track in tracks {
        writeln!(out, "  {} is {}", track.id, track.language)?;
    }
    Ok(())
}

fn selection_skipped(job: &FileJob) -> bool {
    TrackKind::ALL.into_iter().any(|kind| {
        matches!(
            job.decision(kind),
            TrackDecision::Evaluated {
                outcome: SelectionOutcome::NoMatch | SelectionOutcome::Ambiguous { .. }
            }
        )
    })
}

/// One-line explanation of a decision worth mentioning.
fn describe_decision(kind: TrackKind, decision: &TrackDecision) -> Option<String> {
    match decision {
        TrackDecision::NotRequested => None,
        TrackDecision::Ineligible { track_count } => Some(format!(
            "{kind}: skipped, only {track_count} track(s) present"
        )),
        TrackDecision::Evaluated { outcome } => Some(match outcome {
            SelectionOutcome::NoMatch => format!("{kind}: skipped, no track in requested language"),
            SelectionOutcome::Ambiguous { candidates } => format!(
                "{kind}: skipped, ambiguous between tracks {}",
                join_ids(candidates)
            ),
            SelectionOutcome::Selected { keep } => {
                format!("{kind}: keeping track {}", join_ids(keep.ids()))
            }
        }),
    }
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
