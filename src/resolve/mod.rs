//! Interactive resolution module
//!
//! Drives one file from planned requirements to an approved diff:
//! - Prompts for undefined audio track languages, re-prompting on bad input
//! - Prompts for the title, defaulting to the guessed one
//! - Hands a non-empty diff to the writer

pub mod prompt;
pub mod resolver;

pub use prompt::{ConsolePrompter, Prompter};
pub use resolver::{FileResolver, InteractiveResolver, Resolution, ResolverState};
