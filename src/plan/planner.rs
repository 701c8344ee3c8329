//! Metadata diff planner - determines which fields need resolving

use crate::guesser::TitleGuesserPipeline;
use crate::media::VideoFile;

/// Fix behaviours enabled for a run
#[derive(Debug, Clone, Default)]
pub struct Policy {
    /// Ask for a language for every `und` audio track
    pub fix_undefined_audio_languages: bool,
    /// Ask for a title, suggesting one from the guessers
    pub fix_title: bool,
    pub guessers: TitleGuesserPipeline,
}

impl Policy {
    pub fn is_noop(&self) -> bool {
        !self.fix_undefined_audio_languages && !self.fix_title
    }
}

/// Fields of one file that need a decision
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// Indices of tracks whose language must be chosen, ascending
    pub undefined_tracks: Vec<usize>,
    /// Whether the title must be chosen
    pub resolve_title: bool,
}

impl ResolutionPlan {
    pub fn is_empty(&self) -> bool {
        self.undefined_tracks.is_empty() && !self.resolve_title
    }
}

/// Plan the resolutions needed for `file` under `policy`.
///
/// Only lists what must be decided; replacement values come from the
/// resolver.
pub fn plan(file: &VideoFile, policy: &Policy) -> ResolutionPlan {
    let undefined_tracks = if policy.fix_undefined_audio_languages {
        file.audio_tracks
            .iter()
            .filter(|t| t.language.is_undefined())
            .map(|t| t.index)
            .collect()
    } else {
        Vec::new()
    };

    let plan = ResolutionPlan {
        undefined_tracks,
        resolve_title: policy.fix_title,
    };

    tracing::debug!(
        "Planned {:?}: undefined tracks {:?}, title={}",
        file.path,
        plan.undefined_tracks,
        plan.resolve_title
    );

    plan
}
