//! Phase A of the review pipeline: structural analysis of a pull-request diff.
//!
//! Three stages, executed per job:
//!
//! 1) **Diff normalization** (`parser`)
//!    - Unified diff text → `FileDiff[]` with per-hunk added/removed lines
//!    - Change type per file (added / modified / deleted / renamed)
//!
//! 2) **Symbol extraction** (`lang`)
//!    - Fetch the *current* content of each changed file via a `ContentProvider`
//!    - Pattern-based declarations per extension (registry of strategies)
//!
//! 3) **Risk signals** (`risk`)
//!    - Large changes, breaking-change candidates, missing tests
//!
//! Everything except the content fetch is a pure, total function: malformed
//! input degrades to a partial result and a failed fetch only empties that
//! file's symbol list.

pub mod config;
pub mod content;
pub mod errors;
pub mod lang;
pub mod orchestrator;
pub mod parser;
pub mod risk;
pub mod types;

pub use config::PhaseAConfig;
pub use content::{ContentProvider, FetchOutcome, InMemoryContent};
pub use errors::PhaseAError;
pub use lang::{ExtractionStrategy, SymbolRegistry, extract_symbols};
pub use orchestrator::PhaseAOrchestrator;
pub use parser::normalize_diff;
pub use risk::{RiskThresholds, compute_risk_signals};
pub use types::{
    ChangeType, ContentStatus, FileDiff, FileHunk, PhaseAResult, RiskSummary, Symbol, SymbolKind,
    SymbolsMap,
};

/// Runs Phase A with default configuration and the default symbol registry.
pub async fn run_phase_a<P>(diff: &str, provider: &P) -> PhaseAResult
where
    P: ContentProvider + Sync,
{
    PhaseAOrchestrator::default().run(diff, provider).await
}
