//! Data model shared by every Phase A stage.
//!
//! All values are created fresh per run from the raw diff text and the
//! content provider; nothing here is mutated after the run that produced it.

use indexmap::IndexMap;

use serde::{Deserialize, Serialize};

/// Kind of change a file block describes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    #[default]
    Modified,
    Deleted,
    Renamed,
}

/// One `@@` block of a file diff.
///
/// `added` and `removed` keep the order the lines had inside the hunk.
/// Context lines are not stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileHunk {
    /// 1-based line in the new file where the hunk begins (0 if the header had none).
    pub start_line: u32,
    /// Added line contents, `+` marker stripped.
    pub added: Vec<String>,
    /// Removed line contents, `-` marker stripped.
    pub removed: Vec<String>,
}

impl FileHunk {
    pub fn new(start_line: u32) -> Self {
        Self {
            start_line,
            ..Self::default()
        }
    }
}

/// File-level change and its hunks, in diff order.
///
/// Zero hunks means a rename, mode change or binary block without `@@` markers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDiff {
    /// New-file path (old path for deletions).
    pub path: String,
    pub change_type: ChangeType,
    /// Previous path for renames and deletions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    #[serde(default)]
    pub is_binary: bool,
    pub hunks: Vec<FileHunk>,
}

impl FileDiff {
    /// Total number of added lines across all hunks.
    pub fn added_count(&self) -> usize {
        self.hunks.iter().map(|h| h.added.len()).sum()
    }

    /// Total number of removed lines across all hunks.
    pub fn removed_count(&self) -> usize {
        self.hunks.iter().map(|h| h.removed.len()).sum()
    }
}

/// Coarse declaration kind recognised by the heuristic extractors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Class,
}

/// A declaration found in the current content of a changed file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    /// 1-based line of the declaration in the fetched content.
    pub start_line: u32,
}

/// Heuristic risk signals for the whole change set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskSummary {
    /// Paths of large changes, first-seen order.
    pub high_risk_files: Vec<String>,
    /// Symbol names possibly affected by removals; duplicates allowed.
    pub breaking_change_candidates: Vec<String>,
    pub tests_missing_for_changes: bool,
}

/// How the content of one changed file was obtained.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Fetched,
    NotFound,
    Failed,
    /// Deleted and binary files are never fetched.
    Skipped,
}

/// Per-file symbols, keyed in `file_diffs` order.
pub type SymbolsMap = IndexMap<String, Vec<Symbol>>;

/// Output of one Phase A run. Both maps follow the order of `file_diffs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseAResult {
    pub file_diffs: Vec<FileDiff>,
    pub symbols_map: SymbolsMap,
    pub risk_summary: RiskSummary,
    #[serde(default)]
    pub content_status: IndexMap<String, ContentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_serializes_kind_as_type() {
        let s = Symbol {
            name: "foo".into(),
            kind: SymbolKind::Function,
            start_line: 1,
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["type"], "function");
        assert_eq!(v["start_line"], 1);
    }

    #[test]
    fn file_diff_json_omits_missing_old_path() {
        let fd = FileDiff {
            path: "a.py".into(),
            change_type: ChangeType::Modified,
            old_path: None,
            is_binary: false,
            hunks: vec![FileHunk::new(3)],
        };
        let v = serde_json::to_value(&fd).unwrap();
        assert_eq!(v["change_type"], "modified");
        assert!(v.get("old_path").is_none());
        assert_eq!(v["hunks"][0]["start_line"], 3);
    }
}
