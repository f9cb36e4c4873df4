//! Scenario files
//!
//! A scenario is a line-oriented text description of one simulation run:
//!
//! ```text
//! # two devices, one link
//! LENGTH 100
//! DEVICE 1
//! DEVICE 2
//! PROPAGATE 1 2 3
//! ALERT 1 fire 0
//! CANCEL 1 fire 1
//! ```
//!
//! Blank lines and `#` comments are skipped, tokens are whitespace separated,
//! and trailing tokens beyond the ones a directive needs are ignored.

mod parser;

pub use parser::{load_scenario, parse_scenario};

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or parsing a scenario
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Scenario file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: unknown directive '{directive}'")]
    UnknownDirective { line: usize, directive: String },

    #[error("Line {line}: {directive} is missing its {field}")]
    MissingField {
        line: usize,
        directive: &'static str,
        field: &'static str,
    },

    #[error("Line {line}: {field} must be an integer, got '{value}'")]
    InvalidInteger {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Scenario has no LENGTH directive")]
    MissingHorizon,

    #[error("LENGTH must be >= 0, got {0}")]
    NegativeHorizon(i64),

    #[error("Line {line}: PROPAGATE delay must be >= 0, got {delay}")]
    NegativeDelay { line: usize, delay: i64 },
}

impl ScenarioError {
    /// Whether the scenario file itself could not be located
    pub fn is_not_found(&self) -> bool {
        matches!(self, ScenarioError::NotFound(_))
    }
}
