//! Title guessing
//!
//! Guessers propose a title for a file from contextual evidence such as its
//! file name. Rules are registered from `<kind>[:<argument>]` specs and tried
//! in registration order; the first non-empty candidate wins.

pub mod pipeline;
pub mod rule;

pub use pipeline::{Evidence, TitleCandidate, TitleGuesserPipeline};
pub use rule::{GuesserKind, GuesserRule};
