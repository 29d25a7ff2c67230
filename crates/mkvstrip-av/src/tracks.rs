//! Track inventory types.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// mkvmerge track id.
pub type TrackId = u32;

/// The two track types that can be narrowed to a single language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Audio,
    Subtitle,
}

impl TrackKind {
    /// Both kinds, in the order their arguments are passed to mkvmerge.
    pub const ALL: [TrackKind; 2] = [TrackKind::Audio, TrackKind::Subtitle];

    /// Lowercase name used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Subtitle => "subtitle",
        }
    }

    /// The mkvmerge option restricting which tracks of this kind are copied.
    pub fn selector_flag(&self) -> &'static str {
        match self {
            TrackKind::Audio => "--audio-tracks",
            TrackKind::Subtitle => "--subtitle-tracks",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A three-letter lowercase language code such as `eng` or `jpn`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse a code, normalising ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLanguage`] unless the input is exactly three
    /// ASCII letters.
    pub fn new(code: &str) -> Result<Self> {
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_lowercase()))
        } else {
            Err(Error::InvalidLanguage(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for LanguageCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for LanguageCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// One audio or subtitle track found by identification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: TrackId,
    pub language: LanguageCode,
}

impl TrackRecord {
    pub fn new(id: TrackId, language: LanguageCode) -> Self {
        Self { id, language }
    }
}

/// Audio and subtitle tracks of one file, in identification order.
///
/// Order matters: the first kept track of a kind becomes the default track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInventory {
    pub audio: Vec<TrackRecord>,
    pub subtitle: Vec<TrackRecord>,
}

impl TrackInventory {
    /// Tracks of the given kind.
    pub fn tracks(&self, kind: TrackKind) -> &[TrackRecord] {
        match kind {
            TrackKind::Audio => &self.audio,
            TrackKind::Subtitle => &self.subtitle,
        }
    }

    /// Append a track, keeping only the first record for a repeated id.
    pub(crate) fn push(&mut self, kind: TrackKind, record: TrackRecord) {
        let list = match kind {
            TrackKind::Audio => &mut self.audio,
            TrackKind::Subtitle => &mut self.subtitle,
        };
        if list.iter().any(|t| t.id == record.id) {
            tracing::debug!(id = record.id, kind = %kind, "ignoring duplicate track id");
            return;
        }
        list.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty() && self.subtitle.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_code_normalizes_case() {
        let code: LanguageCode = "ENG".parse().unwrap();
        assert_eq!(code.as_str(), "eng");
        assert!(code == *"eng");
    }

    #[test]
    fn language_code_rejects_bad_input() {
        for bad in ["", "en", "engl", "e1g", "en-"] {
            assert!(LanguageCode::new(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn language_code_deserialize_validates() {
        let ok: LanguageCode = serde_json::from_str("\"fre\"").unwrap();
        assert_eq!(ok.to_string(), "fre");
        assert!(serde_json::from_str::<LanguageCode>("\"french\"").is_err());
    }

    #[test]
    fn selector_flags() {
        assert_eq!(TrackKind::Audio.selector_flag(), "--audio-tracks");
        assert_eq!(TrackKind::Subtitle.selector_flag(), "--subtitle-tracks");
    }

    #[test]
    fn push_keeps_first_of_duplicate_ids() {
        let mut inv = TrackInventory::default();
        inv.push(TrackKind::Audio, TrackRecord::new(1, LanguageCode::new("eng").unwrap()));
        inv.push(TrackKind::Audio, TrackRecord::new(1, LanguageCode::new("jpn").unwrap()));
        inv.push(TrackKind::Subtitle, TrackRecord::new(1, LanguageCode::new("fre").unwrap()));

        assert_eq!(inv.audio.len(), 1);
        assert_eq!(inv.audio[0].language.as_str(), "eng");
        assert_eq!(inv.tracks(TrackKind::Subtitle).len(), 1);
    }
}
