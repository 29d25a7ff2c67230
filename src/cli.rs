use clap::Parser;
use mkvstrip_av::LanguageCode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mkvstrip")]
#[command(author, version, about = "Strip MKV files to a single language")]
pub struct Cli {
    /// Directory with source MKV files to be processed
    #[arg(long, value_name = "PATH")]
    pub input_directory: PathBuf,

    /// Audio language to keep. All other audio languages will be stripped
    #[arg(long, value_name = "CODE")]
    pub audio_language: Option<LanguageCode>,

    /// Subtitle language to keep. All other subtitle languages will be stripped
    #[arg(long, value_name = "CODE")]
    pub subtitle_language: Option<LanguageCode>,

    /// List tracks in the files in the input directory
    #[arg(long)]
    pub list_tracks: bool,

    /// Show what would be done without remuxing or renaming anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the batch report as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
