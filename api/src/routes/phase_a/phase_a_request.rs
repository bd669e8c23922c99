use std::collections::BTreeMap;

use serde::Deserialize;

/// Request body for running Phase A on a diff the caller already holds.
#[derive(Debug, Deserialize)]
pub struct PhaseARequest {
    /// Unified diff text (`diff --git` blocks).
    pub diff: String,
    /// Current content of changed files, keyed by repository-relative path.
    /// Paths missing here are reported as `not_found`.
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}
