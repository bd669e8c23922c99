//! Error type for phase-a.
//!
//! The analysis itself is total; only configuration can be rejected.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type Result<T> = std::result::Result<T, PhaseAError>;

#[derive(Debug, Error)]
pub enum PhaseAError {
    /// Configuration value out of range or unparsable.
    #[error("invalid phase-a config: {0}")]
    Config(String),
}
