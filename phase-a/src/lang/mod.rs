//! Pattern-based symbol extraction for changed files.
//!
//! Symbols come from the *current* content of a file (at the diff's target
//! revision), not from the diff itself. Each file extension maps to an
//! [`ExtractionStrategy`] through a [`SymbolRegistry`]; adding a language means
//! registering a strategy, not editing the extractor.
//!
//! This tier is intentionally heuristic: no AST, just anchored regexes.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;

use crate::types::{Symbol, SymbolKind};

static PY_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^def\s+([a-zA-Z_][a-zA-Z0-9_]*)").expect("valid python def regex")
});

static PY_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^class\s+([a-zA-Z_][a-zA-Z0-9_]*)").expect("valid python class regex")
});

static FUNCTION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"function\s+([a-zA-Z_][a-zA-Z0-9_]*)").expect("valid function regex")
});

/// Extraction capability attached to a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// `def <ident>` then `class <ident>`, each at the start of a line.
    PythonDecls,
    /// `function <ident>` anywhere in a line. Arrow functions, methods and
    /// exported consts are not recognised.
    FunctionKeyword,
}

impl ExtractionStrategy {
    fn extract(self, content: &str) -> Vec<Symbol> {
        let lines = LineIndex::new(content);
        match self {
            // All functions first, then all classes.
            Self::PythonDecls => {
                let mut out = scan(&PY_DEF, SymbolKind::Function, content, &lines);
                out.extend(scan(&PY_CLASS, SymbolKind::Class, content, &lines));
                out
            }
            Self::FunctionKeyword => scan(&FUNCTION_KEYWORD, SymbolKind::Function, content, &lines),
        }
    }
}

/// Runs one pattern over `content`; capture group 1 is the symbol name.
fn scan(re: &Regex, kind: SymbolKind, content: &str, lines: &LineIndex) -> Vec<Symbol> {
    re.captures_iter(content)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            Some(Symbol {
                name: cap.get(1)?.as_str().to_string(),
                kind,
                start_line: lines.line_of(whole.start()),
            })
        })
        .collect()
}

/// Extension → strategy table.
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    by_ext: BTreeMap<String, ExtractionStrategy>,
}

impl Default for SymbolRegistry {
    /// Python, TypeScript and JavaScript.
    fn default() -> Self {
        let mut reg = Self::empty();
        reg.register("py", ExtractionStrategy::PythonDecls);
        reg.register("ts", ExtractionStrategy::FunctionKeyword);
        reg.register("js", ExtractionStrategy::FunctionKeyword);
        reg
    }
}

impl SymbolRegistry {
    pub fn empty() -> Self {
        Self {
            by_ext: BTreeMap::new(),
        }
    }

    /// Adds or replaces the strategy for an extension (without the dot).
    pub fn register(&mut self, ext: impl Into<String>, strategy: ExtractionStrategy) -> &mut Self {
        let ext = ext.into();
        self.by_ext
            .insert(ext.trim_start_matches('.').to_string(), strategy);
        self
    }

    /// Strategy for a path, keyed by the text after its last `.` (case-sensitive).
    pub fn strategy_for(&self, path: &str) -> Option<ExtractionStrategy> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file_name.rsplit_once('.')?;
        self.by_ext.get(ext).copied()
    }

    /// Extracts symbols from `content`. Unsupported extensions yield `[]`.
    pub fn extract_symbols(&self, path: &str, content: &str) -> Vec<Symbol> {
        match self.strategy_for(path) {
            Some(strategy) => strategy.extract(content),
            None => Vec::new(),
        }
    }
}

/// Extracts symbols with the default registry.
pub fn extract_symbols(path: &str, content: &str) -> Vec<Symbol> {
    static DEFAULT: LazyLock<SymbolRegistry> = LazyLock::new(SymbolRegistry::default);
    DEFAULT.extract_symbols(path, content)
}

/// Byte offsets of every `\n`, for offset → 1-based line lookups.
struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    fn new(content: &str) -> Self {
        Self {
            newlines: content
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// 1 + number of newlines strictly before `offset`.
    fn line_of(&self, offset: usize) -> u32 {
        let before = self.newlines.partition_point(|&nl| nl < offset);
        u32::try_from(before + 1).unwrap_or(u32::MAX)
    }
}
