//! videfix
//!
//! Repairs the metadata of video files: assigns languages to audio tracks
//! tagged as undefined and sets container titles, asking the user and
//! suggesting titles guessed from file names. Files are rewritten with an
//! FFmpeg stream copy, never re-encoded.

#![allow(dead_code)]

mod commands;
mod config;
mod config_file;
mod error;
mod ffmpeg;
mod guesser;
mod index;
#[cfg(test)]
mod integration;
mod language;
mod media;
mod mux;
mod plan;
mod resolve;

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::BatchReport;
use crate::config::{AppConfig, LogFormat};
use crate::config_file::ConfigFile;
use crate::error::Result;
use crate::guesser::TitleGuesserPipeline;
use crate::index::FfmpegProbe;
use crate::language::LanguageCatalog;
use crate::mux::FfmpegWriter;
use crate::plan::Policy;
use crate::resolve::ConsolePrompter;

/// Application name
const APP_NAME: &str = "videfix";

/// Configuration file picked up from the working directory
const DEFAULT_CONFIG_FILE: &str = "videfix.toml";

#[derive(Debug, Parser)]
#[command(name = APP_NAME, version, about = "Fix audio track languages and titles of video files")]
struct Cli {
    /// Configuration file (default: videfix.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `videfix=trace` (RUST_LOG takes precedence)
    #[arg(long, global = true, value_name = "FILTER")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the audio track languages of the given video files
    ShowAudioLanguages {
        /// One JSON object per file
        #[arg(long)]
        json: bool,

        #[arg(required = true)]
        movie_file_path: Vec<PathBuf>,
    },

    /// Set the audio track languages of the given video file
    SetAudioLanguage {
        /// One code per audio track, in track order
        #[arg(long, required = true, num_args = 1..)]
        languages: Vec<String>,

        #[arg(long)]
        movie_file_path: PathBuf,
    },

    /// Interactively modify metadata
    ModifyMetadata {
        /// Define the undefined language of audio tracks
        #[arg(short = 'l', long)]
        fix_undefined_audio_languages: bool,

        /// Define the title
        #[arg(short = 't', long)]
        fix_title: bool,

        /// Add a title guesser (`<kind>[:<pattern>]`), tried in the given order
        #[arg(short = 'g', long = "add-title-guesser", value_name = "RULE")]
        title_guessers: Vec<String>,

        #[arg(short = 'm', long, required = true, num_args = 1..)]
        movie_file_path: Vec<PathBuf>,
    },

    /// Write the default configuration file
    WriteDefaultConfig { path: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", APP_NAME, e);
            return ExitCode::from(2);
        }
    };

    init_logging(
        cli.log_level.as_deref().unwrap_or(&config.log_level),
        config.log_format,
    );
    crate::ffmpeg::set_log_level(tracing::enabled!(tracing::Level::DEBUG));
    tracing::debug!("Configuration loaded: {:?}", config);

    match run(cli.command, &config) {
        Ok(report) => {
            if !report.failures.is_empty() {
                tracing::warn!("{} file(s) failed", report.failures.len());
            }
            ExitCode::from(report.exit_code() as u8)
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}: {}", APP_NAME, e);
            ExitCode::from(2)
        }
    }
}

/// Load the explicit config file, else `videfix.toml` if present, else defaults
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => Ok(ConfigFile::from_file(path)?.into_app_config()),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Ok(ConfigFile::from_file(DEFAULT_CONFIG_FILE)?.into_app_config())
        }
        None => Ok(AppConfig::default()),
    }
}

fn run(command: Command, config: &AppConfig) -> Result<BatchReport> {
    let catalog = LanguageCatalog::builtin();
    let probe = FfmpegProbe::new(catalog.clone());

    match command {
        Command::ShowAudioLanguages {
            json,
            movie_file_path,
        } => commands::show_audio_languages(&movie_file_path, &probe, json, &mut io::stdout().lock()),

        Command::SetAudioLanguage {
            languages,
            movie_file_path,
        } => {
            let mut writer = FfmpegWriter::new(catalog.clone(), config.backup_mode, config.verify.clone());
            commands::set_audio_languages(
                &movie_file_path,
                &languages,
                &catalog,
                &probe,
                &mut writer,
                &mut io::stdout().lock(),
            )
        }

        Command::ModifyMetadata {
            fix_undefined_audio_languages,
            fix_title,
            title_guessers,
            movie_file_path,
        } => {
            let specs = if title_guessers.is_empty() {
                &config.guessers
            } else {
                &title_guessers
            };
            let policy = Policy {
                fix_undefined_audio_languages,
                fix_title,
                guessers: TitleGuesserPipeline::from_specs(specs.as_slice())?,
            };
            let mut writer = FfmpegWriter::new(catalog.clone(), config.backup_mode, config.verify.clone());
            let mut prompter = ConsolePrompter::stdio();
            commands::modify_metadata(
                &movie_file_path,
                &catalog,
                &policy,
                &probe,
                &mut prompter,
                &mut writer,
            )
        }

        Command::WriteDefaultConfig { path } => {
            config_file::generate_default_config(&path)?;
            println!("wrote default configuration to {}", path.display());
            Ok(BatchReport::default())
        }
    }
}

/// Initialize logging with tracing. Logs go to stderr, prompts to stdout.
fn init_logging(level: &str, format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
}
