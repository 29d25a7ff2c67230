//! Track selection: deciding which tracks of a kind survive the remux.
//!
//! Selection never guesses. A requested language must match exactly one
//! track of the kind; zero matches and duplicate matches both leave that kind
//! untouched for the file.

use serde::Serialize;

use crate::tracks::{LanguageCode, TrackId, TrackInventory, TrackKind};

/// A file needs at least this many tracks of a kind before stripping that
/// kind means anything.
pub const MIN_TRACKS_TO_STRIP: usize = 2;

/// Ordered, non-empty set of track ids to keep for one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeepSet(Vec<TrackId>);

impl KeepSet {
    /// Build a keep-set, or `None` if `ids` is empty.
    pub fn new(ids: Vec<TrackId>) -> Option<Self> {
        if ids.is_empty() {
            None
        } else {
            Some(Self(ids))
        }
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.0
    }

    /// `(id, priority)` pairs: the first id is the default track (1), every
    /// later id is not (0).
    pub fn default_markers(&self) -> impl Iterator<Item = (TrackId, u8)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, if i == 0 { 1 } else { 0 }))
    }
}

/// Result of matching a requested language against one kind of track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// No track has the requested language.
    NoMatch,
    /// More than one track has the requested language.
    Ambiguous { candidates: Vec<TrackId> },
    /// Exactly these tracks are kept.
    Selected { keep: KeepSet },
}

/// Everything that can happen to one kind of track for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum TrackDecision {
    /// No language was requested for this kind; its tracks pass through.
    NotRequested,
    /// Too few tracks of this kind to strip anything.
    Ineligible { track_count: usize },
    /// Selection ran.
    Evaluated {
        #[serde(flatten)]
        outcome: SelectionOutcome,
    },
}

impl TrackDecision {
    /// The tracks to keep, if selection succeeded.
    pub fn keep_set(&self) -> Option<&KeepSet> {
        match self {
            TrackDecision::Evaluated {
                outcome: SelectionOutcome::Selected { keep },
            } => Some(keep),
            _ => None,
        }
    }
}

/// Match `requested` against the tracks of `kind`.
pub fn select(
    inventory: &TrackInventory,
    kind: TrackKind,
    requested: &LanguageCode,
) -> SelectionOutcome {
    let matching: Vec<TrackId> = inventory
        .tracks(kind)
        .iter()
        .filter(|t| &t.language == requested)
        .map(|t| t.id)
        .collect();

    match matching.len() {
        0 => SelectionOutcome::NoMatch,
        1 => SelectionOutcome::Selected {
            keep: KeepSet(matching),
        },
        _ => SelectionOutcome::Ambiguous {
            candidates: matching,
        },
    }
}

/// Decide what happens to `kind` for one file, applying the request and
/// eligibility rules before [`select`].
pub fn decide(
    inventory: &TrackInventory,
    kind: TrackKind,
    requested: Option<&LanguageCode>,
) -> TrackDecision {
    let Some(requested) = requested else {
        return TrackDecision::NotRequested;
    };

    let track_count = inventory.tracks(kind).len();
    if track_count < MIN_TRACKS_TO_STRIP {
        return TrackDecision::Ineligible { track_count };
    }

    TrackDecision::Evaluated {
        outcome: select(inventory, kind, requested),
    }
}
