//! Shared fixtures for batch integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mkvstrip_av::{Identifier, Remuxer, Result, ToolOutput};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Identification text for a file with two audio and two subtitle tracks.
pub const ENG_JPN_ENG_FRE: &str = "\
File 'show.mkv': container: Matroska [duration:1420000000000]
Track ID 0: video (MPEG-H/HEVC/H.265) [language:und pixel_dimensions:1920x1080]
Track ID 1: audio (AC-3) [codec_id:A_AC3 language:eng default_track:1]
Track ID 2: audio (AAC) [codec_id:A_AAC language:jpn default_track:0]
Track ID 3: subtitles (SubRip/SRT) [codec_id:S_TEXT/UTF8 language:eng]
Track ID 4: subtitles (SubRip/SRT) [codec_id:S_TEXT/UTF8 language:fre]
";

/// Identification text with two English audio tracks.
pub const ENG_ENG: &str = "\
Track ID 0: video (AVC) [language:und]
Track ID 1: audio (AC-3) [language:eng]
Track ID 2: audio (DTS) [language:eng]
";

/// Identification text with a single audio track and two subtitles.
pub const SINGLE_AUDIO: &str = "\
Track ID 0: video (AVC) [language:und]
Track ID 1: audio (AAC) [language:eng]
Track ID 2: subtitles (SubRip/SRT) [language:eng]
Track ID 3: subtitles (SubRip/SRT) [language:spa]
";

/// Identifier answering from a table keyed by file name; unknown files fail
/// like mkvmerge does on unreadable input.
#[derive(Default)]
pub struct FakeIdentifier {
    outputs: HashMap<String, String>,
}

impl FakeIdentifier {
    pub fn with(mut self, file: &str, text: &str) -> Self {
        self.outputs.insert(file.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl Identifier for FakeIdentifier {
    async fn identify(&self, path: &Path) -> Result<ToolOutput> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        Ok(match self.outputs.get(&name) {
            Some(text) => ToolOutput {
                exit_code: Some(0),
                stdout: text.as_bytes().to_vec(),
                stderr: Vec::new(),
            },
            None => ToolOutput {
                exit_code: Some(2),
                stdout: format!("Error: The file '{name}' could not be opened").into_bytes(),
                stderr: Vec::new(),
            },
        })
    }
}

/// Remuxer that records every argument list and writes `remuxed` to the
/// `-o` path, failing for inputs whose name is in `fail_for`.
#[derive(Default)]
pub struct FakeRemuxer {
    pub calls: Mutex<Vec<Vec<String>>>,
    fail_for: Vec<String>,
}

impl FakeRemuxer {
    pub fn failing_for(file: &str) -> Self {
        Self {
            fail_for: vec![file.to_string()],
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Remuxer for FakeRemuxer {
    async fn remux(&self, args: &[String]) -> Result<ToolOutput> {
        self.calls.lock().unwrap().push(args.to_vec());

        let input = args.last().unwrap();
        if self.fail_for.iter().any(|f| input.ends_with(f.as_str())) {
            fs::write(&args[1], b"partial")?;
            return Ok(ToolOutput {
                exit_code: Some(2),
                stdout: b"Error: simulated mux failure".to_vec(),
                stderr: Vec::new(),
            });
        }

        fs::write(&args[1], b"remuxed")?;
        Ok(ToolOutput {
            exit_code: Some(0),
            ..Default::default()
        })
    }
}

/// Temporary media directory with the given files, each containing
/// `original`.
pub fn media_dir(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in files {
        fs::write(dir.path().join(name), b"original").unwrap();
    }
    dir
}

pub fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

pub fn path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}
