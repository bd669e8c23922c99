//! Unified-diff normalizer.
//!
//! Turns a GitHub/`git diff` text blob into per-file, per-hunk records.
//!
//! Features:
//! - A file block starts at `diff --git`; text outside blocks is ignored.
//! - Change type is tracked per block: `new file mode` / `--- /dev/null` (added),
//!   `deleted file mode` / `+++ /dev/null` (deleted), `rename from/to` (renamed).
//! - Hunk line counters from `@@ -a,b +c,d @@` drive line classification, so
//!   content lines that themselves start with `++`/`--` are kept intact.
//! - Never fails: malformed fragments are skipped and the partial model returned.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::types::{ChangeType, FileDiff, FileHunk};

static HUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").expect("valid hunk header regex")
});

static FIRST_NEW_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+(\d+)").expect("valid start line regex"));

/// Parses unified diff text into file diffs, preserving file and hunk order.
pub fn normalize_diff(diff: &str) -> Vec<FileDiff> {
    let mut files: Vec<FileDiff> = Vec::new();
    let mut current: Option<FileBlock> = None;
    let mut cursor = HunkCursor::Header;

    for line in diff.lines() {
        if line.starts_with("diff --git") {
            if let Some(block) = current.take() {
                block.flush_into(&mut files);
            }
            current = Some(FileBlock::from_git_header(line));
            cursor = HunkCursor::Header;
            continue;
        }

        // Prelude before the first block (mail headers, stats, ...).
        let Some(block) = current.as_mut() else {
            continue;
        };

        if line.starts_with("@@") {
            let (start_line, counts) = parse_hunk_header(line);
            block.hunks.push(FileHunk::new(start_line));
            cursor = match counts {
                Some((old, new)) if old > 0 || new > 0 => HunkCursor::Counted { old, new },
                _ => HunkCursor::Lenient,
            };
            continue;
        }

        cursor = match cursor {
            HunkCursor::Header => {
                block.apply_header_line(line);
                HunkCursor::Header
            }
            HunkCursor::Counted { old, new } => block.push_counted(line, old, new),
            HunkCursor::Lenient => {
                block.push_lenient(line);
                HunkCursor::Lenient
            }
        };
    }

    if let Some(block) = current {
        block.flush_into(&mut files);
    }

    files
}

/// Where the parser is inside the current file block.
#[derive(Debug, Clone, Copy)]
enum HunkCursor {
    /// Before the first `@@` of the block.
    Header,
    /// Inside a hunk with remaining old/new line budgets.
    Counted { old: u32, new: u32 },
    /// Counters unknown or consumed: only `+`/`-` lines (not `+++`/`---`) count.
    Lenient,
}

/// In-progress file block.
#[derive(Debug, Default)]
struct FileBlock {
    path: Option<String>,
    minus_path: Option<String>,
    old_path: Option<String>,
    change_type: ChangeType,
    is_binary: bool,
    hunks: Vec<FileHunk>,
}

impl FileBlock {
    /// Seeds the block path from `diff --git a/<old> b/<new>`.
    fn from_git_header(line: &str) -> Self {
        let path = line
            .strip_prefix("diff --git ")
            .and_then(|rest| rest.rfind(" b/").map(|i| &rest[i + 3..]))
            .map(|p| p.trim_end_matches('"').to_string())
            .filter(|p| !p.is_empty());
        Self {
            path,
            ..Self::default()
        }
    }

    fn apply_header_line(&mut self, line: &str) {
        if line.starts_with("new file mode") {
            self.change_type = ChangeType::Added;
        } else if line.starts_with("deleted file mode") {
            self.change_type = ChangeType::Deleted;
        } else if let Some(from) = line.strip_prefix("rename from ") {
            self.change_type = ChangeType::Renamed;
            self.old_path = Some(from.to_string());
        } else if let Some(to) = line.strip_prefix("rename to ") {
            self.change_type = ChangeType::Renamed;
            self.path = Some(to.to_string());
        } else if line == "--- /dev/null" {
            self.change_type = ChangeType::Added;
        } else if let Some(old) = line.strip_prefix("--- a/") {
            self.minus_path = Some(old.to_string());
        } else if line == "+++ /dev/null" {
            self.change_type = ChangeType::Deleted;
        } else if let Some(new) = line.strip_prefix("+++ b/") {
            self.path = Some(new.to_string());
        } else if line.starts_with("Binary files ") || line.starts_with("GIT binary patch") {
            self.is_binary = true;
        }
    }

    /// Classifies a hunk line while the header counters are not yet consumed.
    fn push_counted(&mut self, line: &str, old: u32, new: u32) -> HunkCursor {
        let (old, new) = match line.as_bytes().first() {
            Some(b'+') => {
                self.push_added(&line[1..]);
                (old, new.saturating_sub(1))
            }
            Some(b'-') => {
                self.push_removed(&line[1..]);
                (old.saturating_sub(1), new)
            }
            None | Some(b' ') => (old.saturating_sub(1), new.saturating_sub(1)),
            Some(b'\\') => (old, new),
            Some(_) => {
                debug!(line, "unexpected line inside hunk, switching to lenient mode");
                return HunkCursor::Lenient;
            }
        };
        if old == 0 && new == 0 {
            HunkCursor::Lenient
        } else {
            HunkCursor::Counted { old, new }
        }
    }

    fn push_lenient(&mut self, line: &str) {
        if line.starts_with('+') && !line.starts_with("+++") {
            self.push_added(&line[1..]);
        } else if line.starts_with('-') && !line.starts_with("---") {
            self.push_removed(&line[1..]);
        }
    }

    fn push_added(&mut self, content: &str) {
        if let Some(h) = self.hunks.last_mut() {
            h.added.push(content.to_string());
        }
    }

    fn push_removed(&mut self, content: &str) {
        if let Some(h) = self.hunks.last_mut() {
            h.removed.push(content.to_string());
        }
    }

    fn flush_into(self, out: &mut Vec<FileDiff>) {
        let (path, old_path) = match self.change_type {
            ChangeType::Deleted => {
                let old = self.minus_path.or(self.path);
                (old.clone(), old)
            }
            _ => (self.path, self.old_path),
        };

        let Some(path) = path else {
            debug!(
                hunks = self.hunks.len(),
                "skipping diff block without a usable path"
            );
            return;
        };

        out.push(FileDiff {
            path,
            change_type: self.change_type,
            old_path,
            is_binary: self.is_binary,
            hunks: self.hunks,
        });
    }
}

/// Returns the new-file start line and, when the header is well formed,
/// the `(old, new)` line counts. An omitted count means 1.
fn parse_hunk_header(line: &str) -> (u32, Option<(u32, u32)>) {
    if let Some(caps) = HUNK_HEADER.captures(line) {
        let num = |i: usize, default: u32| caps.get(i).map_or(default, |m| saturating_u32(m.as_str()));
        return (num(3, 0), Some((num(2, 1), num(4, 1))));
    }

    debug!(line, "malformed hunk header");
    let start = FIRST_NEW_START
        .captures(line)
        .and_then(|c| c.get(1))
        .map_or(0, |m| saturating_u32(m.as_str()));
    (start, None)
}

/// Parses an all-digit capture, clamping values past `u32::MAX`.
fn saturating_u32(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}
