//! Test-only support: in-memory collaborators and end-to-end scenarios

pub mod e2e;
pub mod fixtures;
