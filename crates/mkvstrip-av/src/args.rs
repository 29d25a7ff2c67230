//! mkvmerge argument construction.

use std::path::Path;

use crate::select::KeepSet;
use crate::tracks::TrackKind;

/// mkvmerge option marking a track as default (`id:1`) or not (`id:0`).
pub const DEFAULT_TRACK_FLAG: &str = "--default-track";

/// Arguments restricting `kind` to the tracks in `keep`.
///
/// Produces `[<selector>, "<id>,<id>...", "--default-track", "<id>:<p>", ...]`
/// with one default-track marker per kept id. With no keep-set the result is
/// empty and mkvmerge copies every track of that kind unchanged.
pub fn track_args(kind: TrackKind, keep: Option<&KeepSet>) -> Vec<String> {
    let Some(keep) = keep else {
        return Vec::new();
    };

    let ids = keep
        .ids()
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    let mut args = vec![kind.selector_flag().to_string(), ids];
    for (id, priority) in keep.default_markers() {
        args.push(DEFAULT_TRACK_FLAG.to_string());
        args.push(format!("{id}:{priority}"));
    }
    args
}

/// Full mkvmerge argument list: output first, then the audio and subtitle
/// fragments, then the input file.
pub fn remux_args(
    output: &Path,
    audio_args: &[String],
    subtitle_args: &[String],
    input: &Path,
) -> Vec<String> {
    let mut args = Vec::with_capacity(3 + audio_args.len() + subtitle_args.len());
    args.push("-o".to_string());
    args.push(output.to_string_lossy().into_owned());
    args.extend_from_slice(audio_args);
    args.extend_from_slice(subtitle_args);
    args.push(input.to_string_lossy().into_owned());
    args
}
