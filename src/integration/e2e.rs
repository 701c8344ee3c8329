//! End-to-end scenarios over the in-memory library

use std::io::Cursor;
use std::path::PathBuf;

use crate::commands::{modify_metadata, BatchReport};
use crate::guesser::TitleGuesserPipeline;
use crate::language::LanguageCatalog;
use crate::media::{ContainerFormat, MetadataDiff};
use crate::plan::Policy;
use crate::resolve::ConsolePrompter;

use super::fixtures::{video_file, MemoryLibrary};

const CARROYAGE: &str = "/films/1976 - carroyage.avi";

fn policy(languages: bool, title: bool, guessers: &[&str]) -> Policy {
    Policy {
        fix_undefined_audio_languages: languages,
        fix_title: title,
        guessers: TitleGuesserPipeline::from_specs(guessers).unwrap(),
    }
}

/// Run `modify-metadata` over `files` with scripted answers
fn run(library: &MemoryLibrary, policy: &Policy, files: &[&str], answers: &str) -> (BatchReport, String) {
    let catalog = LanguageCatalog::builtin();
    let paths: Vec<PathBuf> = files.iter().map(PathBuf::from).collect();
    let mut prompter = ConsolePrompter::new(Cursor::new(answers.to_string()), Vec::new());
    let mut writer = library;
    let report = modify_metadata(&paths, &catalog, policy, library, &mut prompter, &mut writer).unwrap();
    let output = String::from_utf8(prompter.into_output()).unwrap();
    (report, output)
}

#[test]
fn test_carroyage_scenario() {
    let catalog = LanguageCatalog::builtin();
    let library = MemoryLibrary::with_files(vec![video_file(CARROYAGE, ContainerFormat::Avi, &["und"], None)]);
    let policy = policy(true, true, &["filename_re:^(?P<year>[0-9]+) - (?P<title>[^.]+)"]);

    let (report, output) = run(&library, &policy, &[CARROYAGE], "fra\n\n");

    let expected = "/films/1976 - carroyage.avi :\n\
        Current track languages : [und]\n\
        Choose a language for the undefined audiotrack #0 : \
        setting audio track languages to [fra]\n\
        Choose a title (old title : '') [carroyage] : \
        changing title from '' to 'carroyage'\n";
    assert_eq!(output, expected);

    let writes = library.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0],
        (
            PathBuf::from(CARROYAGE),
            MetadataDiff {
                title: Some("carroyage".to_string()),
                languages: Some(vec![catalog.normalize("fra").unwrap()]),
            }
        )
    );
    assert_eq!(report.processed, 1);
    assert_eq!(report.written, 1);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_second_run_is_idempotent() {
    let library = MemoryLibrary::with_files(vec![video_file(CARROYAGE, ContainerFormat::Avi, &["und"], None)]);
    let policy = policy(true, true, &["filename_re"]);

    let (first, _) = run(&library, &policy, &[CARROYAGE], "fra\n\n");
    assert_eq!(first.written, 1);

    // languages are defined now, only the title is asked again
    let (second, output) = run(&library, &policy, &[CARROYAGE], "\n");
    assert_eq!(second.written, 0);
    assert_eq!(library.writes().len(), 1);
    assert!(output.contains("Choose a title (old title : 'carroyage') [carroyage] : "));
    assert!(!output.contains("changing title"));
}

#[test]
fn test_disabled_title_fix_stages_no_title() {
    let library = MemoryLibrary::with_files(vec![video_file(CARROYAGE, ContainerFormat::Avi, &["und"], None)]);
    let policy = policy(true, false, &["filename_re"]);

    let (report, output) = run(&library, &policy, &[CARROYAGE], "spa\n");
    assert_eq!(report.written, 1);
    assert!(!output.contains("Choose a title"));
    assert_eq!(library.writes()[0].1.title, None);
}

#[test]
fn test_failures_are_isolated_per_file() {
    let library = MemoryLibrary::with_files(vec![
        video_file("/films/a.mkv", ContainerFormat::Matroska, &["und"], None),
        video_file("/films/c.mkv", ContainerFormat::Matroska, &["und"], None),
        video_file("/films/d.mp4", ContainerFormat::Mp4, &["und"], None),
    ]);
    library.fail_writes_to("/films/c.mkv");
    let policy = policy(true, false, &[]);

    let (report, output) = run(
        &library,
        &policy,
        &["/films/a.mkv", "/films/b.mkv", "/films/c.mkv", "/films/d.mp4"],
        "eng\njpn\nkor\n",
    );

    assert_eq!(report.processed, 3);
    assert_eq!(report.written, 2);
    let failed: Vec<PathBuf> = report.failures.iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(failed, vec![PathBuf::from("/films/b.mkv"), PathBuf::from("/films/c.mkv")]);
    assert_eq!(report.exit_code(), 1);
    assert!(output.contains("failed to process /films/b.mkv : failed to probe /films/b.mkv"));

    let written: Vec<PathBuf> = library.writes().into_iter().map(|(p, _)| p).collect();
    assert_eq!(written, vec![PathBuf::from("/films/a.mkv"), PathBuf::from("/films/d.mp4")]);
}

#[test]
fn test_end_of_input_aborts_without_commit() {
    let library = MemoryLibrary::with_files(vec![
        video_file("/films/a.mkv", ContainerFormat::Matroska, &["und", "und"], None),
        video_file("/films/b.mkv", ContainerFormat::Matroska, &["und"], None),
    ]);
    let policy = policy(true, false, &[]);

    let (report, output) = run(&library, &policy, &["/films/a.mkv", "/films/b.mkv"], "eng\n");

    assert!(report.aborted);
    assert_eq!(report.exit_code(), 1);
    assert!(library.writes().is_empty());
    assert!(!output.contains("/films/b.mkv"));
}

#[test]
fn test_no_flags_means_no_prompts() {
    let library = MemoryLibrary::with_files(vec![video_file(CARROYAGE, ContainerFormat::Avi, &["und"], None)]);
    let policy = policy(false, false, &[]);

    let (report, output) = run(&library, &policy, &[CARROYAGE], "");
    assert_eq!(output, "/films/1976 - carroyage.avi :\n");
    assert_eq!(report.written, 0);
    assert_eq!(report.exit_code(), 0);
}
