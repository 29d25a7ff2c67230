mod cli;

use mkvstrip::{
    batch::{Batch, BatchOptions},
    config,
};
use mkvstrip_av::{
    check_tool, resolve_tool, LanguageRequest, MkvmergeIdentifier, MkvmergeRemuxer, MKVMERGE,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use std::io::Write;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mkvstrip=trace,mkvstrip_av=trace".to_string()
        } else {
            "mkvstrip=info,mkvstrip_av=info".to_string()
        }
    });

    // Logs go to stderr so stdout carries only the listing and report.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config_or_default(cli.config.as_deref())?;

    let mkvmerge = resolve_tool(MKVMERGE, config.tools.mkvmerge_path.as_deref())?;
    let info = check_tool(&mkvmerge);
    tracing::debug!(
        "Using {} ({})",
        mkvmerge.display(),
        info.version.as_deref().unwrap_or("unknown version")
    );

    let timeout = config.tools.timeout();
    let identifier = MkvmergeIdentifier::new(mkvmerge.clone())
        .with_format(config.tools.identify_format)
        .with_timeout(timeout);
    let remuxer = MkvmergeRemuxer::new(mkvmerge)
        .with_timeout(timeout)
        .accept_warnings(config.tools.accept_warnings);

    let request = LanguageRequest {
        audio: cli.audio_language,
        subtitle: cli.subtitle_language,
    };
    let options = BatchOptions {
        extension: config.batch.extension.clone(),
        names: config.batch.commit_names(),
        dry_run: cli.dry_run,
        ..BatchOptions::new(&cli.input_directory, request)
    };

    // One file at a time; a single-threaded runtime is all the batch needs.
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let report = rt.block_on(Batch::new(identifier, remuxer, options).run())?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        if cli.list_tracks {
            report.write_track_listing(&mut out)?;
        }
        report.write_summary(&mut out)?;
    }

    Ok(if report.has_failures() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
