//! Metadata planning module
//!
//! Decides, per file, which fields need resolution under the run's policy:
//! - Undefined (`und`) audio track languages
//! - The container title

pub mod planner;

pub use planner::{plan, Policy, ResolutionPlan};
