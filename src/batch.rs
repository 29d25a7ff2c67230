//! Sequential batch over a directory: identify, select, remux, commit.
//!
//! Files are processed one at a time. A failure on one file is recorded in
//! the report and the batch moves on; only an unreadable input directory
//! aborts the run.

use crate::listing::list_media_files;
use crate::report::{BatchReport, FileOutcome, FileReport};
use mkvstrip_av::{
    commit, identify_tracks, run_remux, CommitNames, Error, FileJob, Identifier,
    LanguageRequest, Remuxer, Result, SelectionOutcome, TrackDecision, TrackKind,
};
use std::path::{Path, PathBuf};

/// Everything a batch run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_directory: PathBuf,
    pub request: LanguageRequest,
    pub extension: String,
    pub names: CommitNames,
    pub dry_run: bool,
}

impl BatchOptions {
    pub fn new(input_directory: impl Into<PathBuf>, request: LanguageRequest) -> Self {
        Self {
            input_directory: input_directory.into(),
            request,
            extension: "mkv".to_string(),
            names: CommitNames::default(),
            dry_run: false,
        }
    }
}

/// Runs the per-file pipeline over every file in a directory.
pub struct Batch<I, R> {
    identifier: I,
    remuxer: R,
    options: BatchOptions,
}

impl<I: Identifier, R: Remuxer> Batch<I, R> {
    pub fn new(identifier: I, remuxer: R, options: BatchOptions) -> Self {
        Self {
            identifier,
            remuxer,
            options,
        }
    }

    /// Process every file and return the aggregated report.
    ///
    /// # Errors
    ///
    /// Only [`Error::ListingFailure`]; every other failure is per-file and
    /// ends up in the report.
    pub async fn run(&self) -> Result<BatchReport> {
        let files = list_media_files(&self.options.input_directory, &self.options.extension)?;
        let mut report = BatchReport::new(self.options.input_directory.clone());

        if !self.options.request.any() {
            tracing::info!("No languages requested; tracks will only be identified");
        }

        for path in files {
            let entry = self.process(&path).await;
            report.files.push(entry);
        }

        let s = report.summary();
        tracing::info!(
            total = s.total,
            remuxed = s.remuxed,
            planned = s.planned,
            no_work = s.no_work,
            skipped = s.skipped,
            failed = s.failed,
            "batch finished"
        );
        Ok(report)
    }

    async fn process(&self, path: &Path) -> FileReport {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // Tool arguments are strings; a lossy name would point mkvmerge at
        // a different file.
        if path.to_str().is_none() {
            let e = Error::NonUtf8Path {
                path: path.to_path_buf(),
            };
            tracing::error!(file = %file, "{e}");
            return FileReport {
                file,
                job: None,
                outcome: failed(&e),
            };
        }

        let inventory = match identify_tracks(&self.identifier, path, &file).await {
            Ok(inventory) => inventory,
            Err(e) => {
                tracing::error!(file = %file, "{e}");
                return FileReport {
                    file,
                    job: None,
                    outcome: failed(&e),
                };
            }
        };

        let job = FileJob::plan(path.to_path_buf(), inventory, &self.options.request);
        for kind in TrackKind::ALL {
            log_decision(&file, kind, job.decision(kind), &self.options.request);
        }

        let outcome = self.apply(&job, &file).await;
        FileReport {
            file,
            job: Some(job),
            outcome,
        }
    }

    async fn apply(&self, job: &FileJob, file: &str) -> FileOutcome {
        if !job.has_work() {
            if self.options.request.any() {
                tracing::info!(file, "No work to be done");
            }
            return FileOutcome::NoWork;
        }

        let temp = self.options.names.temp_path(&job.path);
        let args = job.remux_args(&temp);

        if self.options.dry_run {
            tracing::info!(file, "[DRY RUN] Would run mkvmerge {}", args.join(" "));
            return FileOutcome::Planned { args };
        }

        tracing::info!(file, "Processing ...");
        if let Err(e) = run_remux(&self.remuxer, &args, &temp, file).await {
            tracing::error!(file, "{e}");
            return failed(&e);
        }

        match commit(&job.path, &temp, &self.options.names) {
            Ok(committed) => FileOutcome::Remuxed {
                backup: committed.backup,
            },
            Err(e) => {
                tracing::error!(file, "{e}");
                failed(&e)
            }
        }
    }
}

fn failed(e: &Error) -> FileOutcome {
    FileOutcome::Failed {
        kind: e.kind(),
        message: e.to_string(),
    }
}

fn log_decision(file: &str, kind: TrackKind, decision: &TrackDecision, request: &LanguageRequest) {
    let Some(lang) = request.get(kind) else {
        return;
    };

    match decision {
        TrackDecision::NotRequested => {}
        TrackDecision::Ineligible { track_count } => tracing::warn!(
            file,
            "At least 2 {kind} tracks required, found {track_count}; leaving {kind} tracks alone"
        ),
        TrackDecision::Evaluated { outcome } => match outcome {
            SelectionOutcome::NoMatch => {
                tracing::warn!(file, "No {kind} tracks with language {lang}")
            }
            SelectionOutcome::Ambiguous { candidates } => tracing::warn!(
                file,
                ?candidates,
                "More than one {kind} track matching {lang}. Skipping"
            ),
            SelectionOutcome::Selected { keep } => tracing::info!(
                file,
                ids = ?keep.ids(),
                "Keeping {kind} track(s) in {lang}"
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mkvstrip_av::{LanguageCode, ToolOutput};

    struct NoTracks;

    #[async_trait]
    impl Identifier for NoTracks {
        async fn identify(&self, _path: &Path) -> Result<ToolOutput> {
            Ok(ToolOutput {
                exit_code: Some(0),
                ..Default::default()
            })
        }
    }

    struct NeverCalled;

    #[async_trait]
    impl Remuxer for NeverCalled {
        async fn remux(&self, _args: &[String]) -> Result<ToolOutput> {
            panic!("remux must not run");
        }
    }

    #[tokio::test]
    async fn empty_inventory_is_no_work() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mkv"), b"x").unwrap();

        let request = LanguageRequest {
            audio: Some(LanguageCode::new("eng").unwrap()),
            subtitle: None,
        };
        let batch = Batch::new(NoTracks, NeverCalled, BatchOptions::new(dir.path(), request));
        let report = batch.run().await.unwrap();

        assert_eq!(report.files.len(), 1);
        assert!(matches!(report.files[0].outcome, FileOutcome::NoWork));
    }

    #[tokio::test]
    async fn unreadable_directory_aborts() {
        let batch = Batch::new(
            NoTracks,
            NeverCalled,
            BatchOptions::new("/nonexistent/dir/12345", LanguageRequest::default()),
        );
        assert!(matches!(
            batch.run().await,
            Err(Error::ListingFailure { .. })
        ));
    }
}
