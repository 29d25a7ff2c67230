//! Track identification: running mkvmerge and parsing what it reports.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::command::{ToolCommand, ToolOutput};
use crate::tracks::{LanguageCode, TrackInventory, TrackKind, TrackRecord};
use crate::{Error, Result};

static AUDIO_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Track ID (\d+): audio .*language:([a-z]{3})").expect("audio pattern is valid")
});

static SUBTITLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Track ID (\d+): subtitles .*language:([a-z]{3})")
        .expect("subtitle pattern is valid")
});

/// Output format requested from the identification tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifyFormat {
    /// `mkvmerge --identify-verbose` text, one `Track ID n: ...` line per track.
    #[default]
    Verbose,
    /// `mkvmerge -J` JSON document.
    Json,
}

/// Something that can report the tracks of a media file.
#[async_trait]
pub trait Identifier: Send + Sync {
    /// Run identification on `path` and return the raw tool output.
    async fn identify(&self, path: &Path) -> Result<ToolOutput>;

    /// The format [`Identifier::identify`] produces.
    fn format(&self) -> IdentifyFormat {
        IdentifyFormat::Verbose
    }
}

/// [`Identifier`] backed by the mkvmerge binary.
#[derive(Debug, Clone)]
pub struct MkvmergeIdentifier {
    program: PathBuf,
    format: IdentifyFormat,
    timeout: Option<Duration>,
}

impl MkvmergeIdentifier {
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            format: IdentifyFormat::default(),
            timeout: None,
        }
    }

    pub fn with_format(mut self, format: IdentifyFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Identifier for MkvmergeIdentifier {
    async fn identify(&self, path: &Path) -> Result<ToolOutput> {
        let mut cmd = ToolCommand::new(self.program.clone());
        match self.format {
            IdentifyFormat::Verbose => cmd.arg("--identify-verbose"),
            IdentifyFormat::Json => cmd.arg("-J"),
        };
        cmd.arg(path.to_string_lossy().as_ref());
        cmd.timeout(self.timeout);
        cmd.execute().await
    }

    fn format(&self) -> IdentifyFormat {
        self.format
    }
}

/// Identify `path` and parse the result into a [`TrackInventory`].
///
/// `file` is only used to attribute errors.
pub async fn identify_tracks<I: Identifier + ?Sized>(
    identifier: &I,
    path: &Path,
    file: &str,
) -> Result<TrackInventory> {
    tracing::info!(file, "identifying");
    let output = identifier.identify(path).await?;
    let inventory = parse_identify_output(&output, identifier.format(), file)?;
    tracing::info!(
        file,
        audio = inventory.audio.len(),
        subtitle = inventory.subtitle.len(),
        "found {} audio and {} subtitle tracks",
        inventory.audio.len(),
        inventory.subtitle.len()
    );
    Ok(inventory)
}

/// Turn raw identification output into an inventory.
///
/// # Errors
///
/// Returns [`Error::ParseFailure`] if the tool exited non-zero, its stdout is
/// not UTF-8, or (for JSON) the document is malformed. A file without any
/// matching tracks is not an error.
pub fn parse_identify_output(
    output: &ToolOutput,
    format: IdentifyFormat,
    file: &str,
) -> Result<TrackInventory> {
    if !output.success() {
        let status = output
            .exit_code
            .map(|c| format!("exit code {c}"))
            .unwrap_or_else(|| "termination by signal".to_string());
        return Err(Error::parse_failure(
            file,
            format!("mkvmerge reported {status}: {}", output.diagnostics()),
        ));
    }

    let text = std::str::from_utf8(&output.stdout)
        .map_err(|e| Error::parse_failure(file, format!("output is not valid UTF-8: {e}")))?;

    match format {
        IdentifyFormat::Verbose => Ok(parse_verbose(text)),
        IdentifyFormat::Json => parse_json(text)
            .map_err(|e| Error::parse_failure(file, format!("malformed JSON identification: {e}"))),
    }
}

/// Parse `--identify-verbose` text. Lines that are not audio or subtitle
/// track lines are ignored.
pub fn parse_verbose(text: &str) -> TrackInventory {
    let mut inventory = TrackInventory::default();

    for line in text.lines() {
        let (kind, caps) = if let Some(caps) = AUDIO_LINE.captures(line) {
            (TrackKind::Audio, caps)
        } else if let Some(caps) = SUBTITLE_LINE.captures(line) {
            (TrackKind::Subtitle, caps)
        } else {
            continue;
        };

        // An id too large for u32 cannot be a real track; treat as noise.
        let Ok(id) = caps[1].parse() else {
            continue;
        };
        if let Ok(language) = LanguageCode::new(&caps[2]) {
            inventory.push(kind, TrackRecord::new(id, language));
        }
    }

    inventory
}

#[derive(Deserialize)]
struct JsonIdentification {
    #[serde(default)]
    tracks: Vec<JsonTrack>,
}

#[derive(Deserialize)]
struct JsonTrack {
    id: u32,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    properties: JsonTrackProperties,
}

#[derive(Deserialize, Default)]
struct JsonTrackProperties {
    language: Option<String>,
}

/// Parse `mkvmerge -J` output.
pub fn parse_json(text: &str) -> Result<TrackInventory> {
    let doc: JsonIdentification = serde_json::from_str(text)?;
    let mut inventory = TrackInventory::default();

    for track in doc.tracks {
        let kind = match track.kind.as_str() {
            "audio" => TrackKind::Audio,
            "subtitles" => TrackKind::Subtitle,
            _ => continue,
        };
        // Same acceptance rule as the text pattern: three lowercase letters.
        let Some(lang) = track
            .properties
            .language
            .filter(|l| l.len() == 3 && l.bytes().all(|b| b.is_ascii_lowercase()))
        else {
            continue;
        };
        if let Ok(language) = LanguageCode::new(&lang) {
            inventory.push(kind, TrackRecord::new(track.id, language));
        }
    }

    Ok(inventory)
}
