//! Heuristic risk signals over a normalized change set.
//!
//! Rules:
//! - a file with more than `high_risk_changed_lines` added + removed lines is high risk;
//! - in a Python file with any removal, every extracted symbol is a breaking-change
//!   candidate (coarse: removals are not correlated with symbol ranges);
//! - tests are missing when no changed path contains `test` (case-insensitive).

use tracing::debug;

use crate::types::{FileDiff, RiskSummary, SymbolsMap};

/// Thresholds for [`compute_risk_signals_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskThresholds {
    /// Strictly greater than this many changed lines marks a file as high risk.
    pub high_risk_changed_lines: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high_risk_changed_lines: 100,
        }
    }
}

/// Computes risk signals with the default thresholds.
pub fn compute_risk_signals(
    file_diffs: &[FileDiff],
    symbols_map: &SymbolsMap,
) -> RiskSummary {
    compute_risk_signals_with(file_diffs, symbols_map, RiskThresholds::default())
}

pub fn compute_risk_signals_with(
    file_diffs: &[FileDiff],
    symbols_map: &SymbolsMap,
    thresholds: RiskThresholds,
) -> RiskSummary {
    let mut summary = RiskSummary::default();

    for fd in file_diffs {
        let added = fd.added_count();
        let removed = fd.removed_count();

        if added + removed > thresholds.high_risk_changed_lines {
            debug!(path = %fd.path, added, removed, "high risk file");
            summary.high_risk_files.push(fd.path.clone());
        }

        if removed > 0 && fd.path.ends_with(".py") {
            if let Some(symbols) = symbols_map.get(&fd.path) {
                summary
                    .breaking_change_candidates
                    .extend(symbols.iter().map(|s| s.name.clone()));
            }
        }
    }

    // An empty change set has nothing to be missing tests for.
    summary.tests_missing_for_changes =
        !file_diffs.is_empty() && !file_diffs.iter().any(|fd| looks_like_test(&fd.path));

    summary
}

fn looks_like_test(path: &str) -> bool {
    path.to_lowercase().contains("test")
}
