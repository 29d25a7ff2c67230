//! Per-file job: inventory, per-kind decisions and the resulting arguments.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::args::{remux_args, track_args};
use crate::select::{decide, TrackDecision};
use crate::tracks::{LanguageCode, TrackInventory, TrackKind};

/// Languages to keep, per track kind. `None` leaves that kind alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageRequest {
    pub audio: Option<LanguageCode>,
    pub subtitle: Option<LanguageCode>,
}

impl LanguageRequest {
    pub fn get(&self, kind: TrackKind) -> Option<&LanguageCode> {
        match kind {
            TrackKind::Audio => self.audio.as_ref(),
            TrackKind::Subtitle => self.subtitle.as_ref(),
        }
    }

    /// Whether any kind has a requested language.
    pub fn any(&self) -> bool {
        self.audio.is_some() || self.subtitle.is_some()
    }
}

/// One source file after identification and selection.
///
/// Keep-args are `Some` only for kinds whose selection produced a keep-set.
#[derive(Debug, Clone, Serialize)]
pub struct FileJob {
    pub path: PathBuf,
    pub inventory: TrackInventory,
    pub audio: TrackDecision,
    pub subtitle: TrackDecision,
    pub audio_args: Option<Vec<String>>,
    pub subtitle_args: Option<Vec<String>>,
}

impl FileJob {
    /// Run selection for both kinds and build their argument fragments.
    pub fn plan(path: PathBuf, inventory: TrackInventory, request: &LanguageRequest) -> Self {
        let audio = decide(&inventory, TrackKind::Audio, request.get(TrackKind::Audio));
        let subtitle = decide(&inventory, TrackKind::Subtitle, request.get(TrackKind::Subtitle));

        let audio_args = audio
            .keep_set()
            .map(|keep| track_args(TrackKind::Audio, Some(keep)));
        let subtitle_args = subtitle
            .keep_set()
            .map(|keep| track_args(TrackKind::Subtitle, Some(keep)));

        Self {
            path,
            inventory,
            audio,
            subtitle,
            audio_args,
            subtitle_args,
        }
    }

    pub fn decision(&self, kind: TrackKind) -> &TrackDecision {
        match kind {
            TrackKind::Audio => &self.audio,
            TrackKind::Subtitle => &self.subtitle,
        }
    }

    /// Whether a remux would change anything.
    pub fn has_work(&self) -> bool {
        self.audio_args.is_some() || self.subtitle_args.is_some()
    }

    /// mkvmerge arguments writing the stripped copy to `output`.
    pub fn remux_args(&self, output: &Path) -> Vec<String> {
        remux_args(
            output,
            self.audio_args.as_deref().unwrap_or_default(),
            self.subtitle_args.as_deref().unwrap_or_default(),
            &self.path,
        )
    }
}
