//! Batch integration tests with in-process identification and remux fakes.

mod common;

use assert_matches::assert_matches;
use common::{
    media_dir, path, read, FakeIdentifier, FakeRemuxer, ENG_ENG, ENG_JPN_ENG_FRE, SINGLE_AUDIO,
};
use mkvstrip::batch::{Batch, BatchOptions};
use mkvstrip::report::FileOutcome;
use mkvstrip_av::{FailureKind, LanguageCode, LanguageRequest, SelectionOutcome, TrackDecision};

fn lang(code: &str) -> Option<LanguageCode> {
    Some(LanguageCode::new(code).unwrap())
}

fn request(audio: Option<&str>, subtitle: Option<&str>) -> LanguageRequest {
    LanguageRequest {
        audio: audio.and_then(lang),
        subtitle: subtitle.and_then(lang),
    }
}

#[tokio::test]
async fn strips_to_requested_languages_and_keeps_backup() {
    let dir = media_dir(&["show.mkv"]);
    let identifier = FakeIdentifier::default().with("show.mkv", ENG_JPN_ENG_FRE);
    let remuxer = FakeRemuxer::default();
    let options = BatchOptions::new(dir.path(), request(Some("eng"), Some("fre")));

    let batch = Batch::new(identifier, &remuxer, options);
    let report = batch.run().await.unwrap();

    let show = path(dir.path(), "show.mkv");
    let temp = path(dir.path(), "show.mkv.temp");
    assert_eq!(
        remuxer.calls(),
        vec![vec![
            "-o".to_string(),
            temp.to_string_lossy().into_owned(),
            "--audio-tracks".into(),
            "1".into(),
            "--default-track".into(),
            "1:1".into(),
            "--subtitle-tracks".into(),
            "4".into(),
            "--default-track".into(),
            "4:1".into(),
            show.to_string_lossy().into_owned(),
        ]]
    );

    assert_matches!(
        &report.file("show.mkv").unwrap().outcome,
        FileOutcome::Remuxed { backup } if *backup == path(dir.path(), "oldshow.mkv")
    );
    assert_eq!(read(dir.path(), "show.mkv"), "remuxed");
    assert_eq!(read(dir.path(), "oldshow.mkv"), "original");
    assert!(!temp.exists());
    assert!(!report.has_failures());
}

#[tokio::test]
async fn ambiguous_audio_is_reported_and_file_untouched() {
    let dir = media_dir(&["dup.mkv"]);
    let identifier = FakeIdentifier::default().with("dup.mkv", ENG_ENG);
    let remuxer = FakeRemuxer::default();
    let options = BatchOptions::new(dir.path(), request(Some("eng"), None));

    let report = Batch::new(identifier, &remuxer, options).run().await.unwrap();

    assert!(remuxer.calls().is_empty());
    let entry = report.file("dup.mkv").unwrap();
    assert_matches!(entry.outcome, FileOutcome::NoWork);
    assert_eq!(
        entry.job.as_ref().unwrap().audio,
        TrackDecision::Evaluated {
            outcome: SelectionOutcome::Ambiguous {
                candidates: vec![1, 2]
            }
        }
    );
    assert_eq!(read(dir.path(), "dup.mkv"), "original");
    assert!(!path(dir.path(), "olddup.mkv").exists());
    assert_eq!(report.summary().skipped, 1);
    assert_eq!(report.summary().no_work, 0);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn single_audio_track_without_subtitle_request_is_skipped() {
    let dir = media_dir(&["one.mkv"]);
    let identifier = FakeIdentifier::default().with("one.mkv", SINGLE_AUDIO);
    let remuxer = FakeRemuxer::default();
    let options = BatchOptions::new(dir.path(), request(Some("eng"), None));

    let report = Batch::new(identifier, &remuxer, options).run().await.unwrap();

    assert!(remuxer.calls().is_empty());
    let entry = report.file("one.mkv").unwrap();
    assert_matches!(entry.outcome, FileOutcome::NoWork);
    assert_eq!(
        entry.job.as_ref().unwrap().audio,
        TrackDecision::Ineligible { track_count: 1 }
    );
}

#[tokio::test]
async fn single_audio_track_still_strips_subtitles() {
    let dir = media_dir(&["one.mkv"]);
    let identifier = FakeIdentifier::default().with("one.mkv", SINGLE_AUDIO);
    let remuxer = FakeRemuxer::default();
    let options = BatchOptions::new(dir.path(), request(Some("eng"), Some("spa")));

    let report = Batch::new(identifier, &remuxer, options).run().await.unwrap();

    let calls = remuxer.calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].contains(&"--audio-tracks".to_string()));
    assert!(calls[0].windows(2).any(|w| w == ["--subtitle-tracks", "3"]));
    assert_matches!(
        report.file("one.mkv").unwrap().outcome,
        FileOutcome::Remuxed { .. }
    );
}

#[tokio::test]
async fn failures_do_not_stop_the_batch() {
    let dir = media_dir(&["a.mkv", "broken.mkv", "c.mkv"]);
    // broken.mkv is unknown to the identifier and fails identification;
    // c.mkv fails in the remux step.
    let identifier = FakeIdentifier::default()
        .with("a.mkv", ENG_JPN_ENG_FRE)
        .with("c.mkv", ENG_JPN_ENG_FRE);
    let remuxer = FakeRemuxer::failing_for("c.mkv");
    let options = BatchOptions::new(dir.path(), request(Some("jpn"), None));

    let report = Batch::new(identifier, &remuxer, options).run().await.unwrap();

    let names: Vec<_> = report.files.iter().map(|f| f.file.as_str()).collect();
    assert_eq!(names, vec!["a.mkv", "broken.mkv", "c.mkv"]);

    assert_matches!(
        report.file("a.mkv").unwrap().outcome,
        FileOutcome::Remuxed { .. }
    );
    assert_matches!(
        &report.file("broken.mkv").unwrap().outcome,
        FileOutcome::Failed { kind: FailureKind::Parse, message } if message.contains("broken.mkv")
    );
    assert_matches!(
        report.file("c.mkv").unwrap().outcome,
        FileOutcome::Failed {
            kind: FailureKind::Remux,
            ..
        }
    );

    // Remux failure leaves the original alone and cleans up the temp output.
    assert_eq!(read(dir.path(), "c.mkv"), "original");
    assert!(!path(dir.path(), "c.mkv.temp").exists());
    assert!(!path(dir.path(), "oldc.mkv").exists());

    assert_eq!(report.summary().failed, 2);
    assert!(report.has_failures());
}

#[tokio::test]
async fn no_match_for_one_kind_still_processes_the_other() {
    let dir = media_dir(&["show.mkv"]);
    let identifier = FakeIdentifier::default().with("show.mkv", ENG_JPN_ENG_FRE);
    let remuxer = FakeRemuxer::default();
    let options = BatchOptions::new(dir.path(), request(Some("ger"), Some("eng")));

    let report = Batch::new(identifier, &remuxer, options).run().await.unwrap();

    let entry = report.file("show.mkv").unwrap();
    let job = entry.job.as_ref().unwrap();
    assert_eq!(
        job.audio,
        TrackDecision::Evaluated {
            outcome: SelectionOutcome::NoMatch
        }
    );
    assert!(job.audio_args.is_none());
    assert_matches!(entry.outcome, FileOutcome::Remuxed { .. });
    assert!(!remuxer.calls()[0].contains(&"--audio-tracks".to_string()));
}

#[tokio::test]
async fn dry_run_plans_without_touching_files() {
    let dir = media_dir(&["show.mkv"]);
    let identifier = FakeIdentifier::default().with("show.mkv", ENG_JPN_ENG_FRE);
    let remuxer = FakeRemuxer::default();
    let options = BatchOptions {
        dry_run: true,
        ..BatchOptions::new(dir.path(), request(Some("jpn"), None))
    };

    let report = Batch::new(identifier, &remuxer, options).run().await.unwrap();

    assert!(remuxer.calls().is_empty());
    assert_matches!(
        &report.file("show.mkv").unwrap().outcome,
        FileOutcome::Planned { args } if args[2..6] == ["--audio-tracks", "2", "--default-track", "2:1"]
    );
    assert_eq!(read(dir.path(), "show.mkv"), "original");
    assert_eq!(report.summary().planned, 1);
}

#[tokio::test]
async fn existing_backup_is_a_commit_failure() {
    let dir = media_dir(&["show.mkv", "oldshow.mkv"]);
    let identifier = FakeIdentifier::default().with("show.mkv", ENG_JPN_ENG_FRE);
    let remuxer = FakeRemuxer::default();
    let options = BatchOptions {
        extension: "mkv".into(),
        ..BatchOptions::new(dir.path(), request(Some("eng"), None))
    };

    let report = Batch::new(identifier, &remuxer, options).run().await.unwrap();

    assert_matches!(
        report.file("show.mkv").unwrap().outcome,
        FileOutcome::Failed {
            kind: FailureKind::Commit,
            ..
        }
    );
    assert_eq!(read(dir.path(), "show.mkv"), "original");
    assert_eq!(read(dir.path(), "oldshow.mkv"), "original");
    assert!(!path(dir.path(), "show.mkv.temp").exists());
}

#[tokio::test]
async fn listing_only_identifies() {
    let dir = media_dir(&["a.mkv", "b.mkv", "notes.txt"]);
    let identifier = FakeIdentifier::default()
        .with("a.mkv", ENG_JPN_ENG_FRE)
        .with("b.mkv", SINGLE_AUDIO);
    let remuxer = FakeRemuxer::default();
    let options = BatchOptions::new(dir.path(), LanguageRequest::default());

    let report = Batch::new(identifier, &remuxer, options).run().await.unwrap();

    assert!(remuxer.calls().is_empty());
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.summary().no_work, 2);

    let mut out = Vec::new();
    report.write_track_listing(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(
        "a.mkv\n Audio tracks\n  1 is eng\n  2 is jpn\n Subtitle tracks\n  3 is eng\n  4 is fre\n"
    ));
    assert!(text.contains("b.mkv\n Audio tracks\n  1 is eng\n"));
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn non_utf8_file_name_fails_before_any_tool_runs() {
    use std::ffi::{OsStr, OsString};
    use std::os::unix::ffi::OsStrExt;

    let dir = media_dir(&["show.mkv"]);
    let odd = OsStr::from_bytes(b"caf\xe9.mkv");
    std::fs::write(dir.path().join(odd), b"original").unwrap();
    let identifier = FakeIdentifier::default().with("show.mkv", ENG_JPN_ENG_FRE);
    let remuxer = FakeRemuxer::default();
    let options = BatchOptions::new(dir.path(), request(Some("jpn"), None));

    let report = Batch::new(identifier, &remuxer, options).run().await.unwrap();

    assert_eq!(remuxer.calls().len(), 1);
    assert_matches!(
        report.file("caf\u{FFFD}.mkv").unwrap().outcome,
        FileOutcome::Failed {
            kind: FailureKind::InvalidInput,
            ..
        }
    );
    assert_matches!(
        report.file("show.mkv").unwrap().outcome,
        FileOutcome::Remuxed { .. }
    );

    let mut names: Vec<OsString> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            odd.to_os_string(),
            OsString::from("oldshow.mkv"),
            OsString::from("show.mkv"),
        ]
    );
    assert_eq!(std::fs::read(dir.path().join(odd)).unwrap(), b"original");
}
