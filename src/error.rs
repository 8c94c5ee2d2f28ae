//! Error types for configuration and skill assignment.
//!
//! Gameplay itself never fails: degenerate geometry is skipped and missing
//! sinks are detached. Only user-supplied configuration can be rejected.

use std::io;

use crate::sim::Skill;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Skill assigned to more than one slot: {0}")]
    DuplicateSkill(Skill),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Tuning parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
