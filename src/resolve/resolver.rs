//! Per-file resolution state machine
//!
//! `Idle -> ResolvingLanguages -> ResolvingTitle -> Committing -> Done`.
//! Each call to [`FileResolver::step`] performs one transition or consumes
//! exactly one answer, so a scripted input sequence fully determines the run.

use crate::error::{MetadataError, Result};
use crate::guesser::Evidence;
use crate::language::catalog::format_languages;
use crate::language::{LanguageCatalog, LanguageCode};
use crate::media::{MetadataDiff, VideoFile};
use crate::mux::MetadataWriter;
use crate::plan::{plan, Policy, ResolutionPlan};

use super::prompt::Prompter;

/// Resolution progress for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverState {
    Idle,
    /// Waiting for a valid language for `plan.undefined_tracks[position]`
    ResolvingLanguages { position: usize },
    ResolvingTitle,
    Committing,
    Done,
}

/// Result of resolving one file
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub diff: MetadataDiff,
    /// Whether the writer was called
    pub written: bool,
}

/// Resolution of a single file
pub struct FileResolver<'a> {
    catalog: &'a LanguageCatalog,
    policy: &'a Policy,
    file: &'a VideoFile,
    plan: ResolutionPlan,
    state: ResolverState,
    languages: Vec<LanguageCode>,
    /// Position whose context line was already shown
    shown: Option<usize>,
    diff: MetadataDiff,
}

impl<'a> FileResolver<'a> {
    pub fn new(catalog: &'a LanguageCatalog, policy: &'a Policy, file: &'a VideoFile) -> Self {
        Self {
            catalog,
            policy,
            file,
            plan: plan(file, policy),
            state: ResolverState::Idle,
            languages: file.languages(),
            shown: None,
            diff: MetadataDiff::new(),
        }
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    pub fn plan(&self) -> &ResolutionPlan {
        &self.plan
    }

    /// Changes staged so far
    pub fn diff(&self) -> &MetadataDiff {
        &self.diff
    }

    /// Advance the state machine by one transition.
    ///
    /// `Committing` and `Done` are left unchanged; committing needs a writer,
    /// see [`commit`](Self::commit).
    pub fn step(&mut self, prompter: &mut dyn Prompter) -> Result<&ResolverState> {
        let next = match self.state {
            ResolverState::Idle => self.start(prompter)?,
            ResolverState::ResolvingLanguages { position } => {
                self.resolve_language(position, prompter)?
            }
            ResolverState::ResolvingTitle => self.resolve_title(prompter)?,
            ResolverState::Committing => ResolverState::Committing,
            ResolverState::Done => ResolverState::Done,
        };
        self.state = next;
        Ok(&self.state)
    }

    /// Hand the staged diff to `writer`, unless it is empty.
    ///
    /// Returns whether a write happened.
    pub fn commit(&mut self, writer: &mut dyn MetadataWriter) -> Result<bool> {
        if self.state != ResolverState::Committing {
            return Ok(false);
        }
        let written = if self.diff.is_empty() {
            tracing::debug!("Nothing to write for {:?}", self.file.path);
            false
        } else {
            writer.write(self.file, &self.diff)?;
            true
        };
        self.state = ResolverState::Done;
        Ok(written)
    }

    fn start(&mut self, prompter: &mut dyn Prompter) -> Result<ResolverState> {
        if self.plan.is_empty() {
            return Ok(ResolverState::Done);
        }
        if self.plan.undefined_tracks.is_empty() {
            return Ok(self.after_languages());
        }
        Ok(ResolverState::ResolvingLanguages { position: 0 })
    }

    fn resolve_language(
        &mut self,
        position: usize,
        prompter: &mut dyn Prompter,
    ) -> Result<ResolverState> {
        let track = self.plan.undefined_tracks[position];
        if self.shown != Some(position) {
            prompter.say(&format!(
                "Current track languages : {}",
                format_languages(&self.languages)
            ))?;
            self.shown = Some(position);
        }
        let answer = prompter.ask(&format!(
            "Choose a language for the undefined audiotrack #{} : ",
            track
        ))?;

        let code = match self.catalog.normalize(&answer) {
            Ok(code) => code,
            Err(rejection @ MetadataError::InvalidLanguage { .. }) => {
                tracing::debug!("Rejected language {:?} for track {}", answer, track);
                prompter.say(&rejection.to_string())?;
                return Ok(ResolverState::ResolvingLanguages { position });
            }
            Err(e) => return Err(e),
        };

        self.languages[track] = code;
        if position + 1 < self.plan.undefined_tracks.len() {
            return Ok(ResolverState::ResolvingLanguages {
                position: position + 1,
            });
        }

        if self.languages != self.file.languages() {
            prompter.say(&format!(
                "setting audio track languages to {}",
                format_languages(&self.languages)
            ))?;
            self.diff.languages = Some(self.languages.clone());
        }
        Ok(self.after_languages())
    }

    fn after_languages(&self) -> ResolverState {
        if self.plan.resolve_title {
            ResolverState::ResolvingTitle
        } else {
            ResolverState::Committing
        }
    }

    fn resolve_title(&mut self, prompter: &mut dyn Prompter) -> Result<ResolverState> {
        let current = self.file.current_title();
        let suggestion = self
            .policy
            .guessers
            .propose(&Evidence::from_path(&self.file.path));
        let default = match &suggestion {
            Some(candidate) => {
                tracing::debug!(
                    "Guessed title {:?} for {:?} using {}",
                    candidate.title,
                    self.file.path,
                    candidate.rule
                );
                candidate.title.as_str()
            }
            None => "",
        };

        let answer = prompter.ask(&format!(
            "Choose a title (old title : '{}') [{}] : ",
            current, default
        ))?;
        let chosen = if answer.is_empty() {
            default.to_string()
        } else {
            answer
        };

        if chosen != current {
            prompter.say(&format!(
                "changing title from '{}' to '{}'",
                current, chosen
            ))?;
            self.diff.title = Some(chosen);
        }
        Ok(ResolverState::Committing)
    }
}

/// Runs [`FileResolver`] to completion for each file of a batch
pub struct InteractiveResolver<'a> {
    catalog: &'a LanguageCatalog,
    policy: &'a Policy,
}

impl<'a> InteractiveResolver<'a> {
    pub fn new(catalog: &'a LanguageCatalog, policy: &'a Policy) -> Self {
        Self { catalog, policy }
    }

    pub fn resolve(
        &self,
        file: &VideoFile,
        prompter: &mut dyn Prompter,
        writer: &mut dyn MetadataWriter,
    ) -> Result<Resolution> {
        let mut resolver = FileResolver::new(self.catalog, self.policy, file);
        let mut written = false;
        loop {
            match resolver.state().clone() {
                ResolverState::Done => break,
                ResolverState::Committing => written = resolver.commit(writer)?,
                _ => {
                    resolver.step(prompter)?;
                }
            }
        }
        Ok(Resolution {
            diff: resolver.diff,
            written,
        })
    }
}
