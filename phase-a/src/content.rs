//! Content-provider seam.
//!
//! The orchestrator never performs I/O itself; it asks a provider for the
//! current content of each changed file. Providers report a result value
//! instead of an error so that "file is gone" and "fetch broke" can be told
//! apart without unwinding the run.

use std::{collections::BTreeMap, future::Future};

/// Outcome of fetching one file at the target revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(String),
    /// Deleted or unreadable at the target revision.
    NotFound,
    /// Transport, auth or decoding failure.
    Failed(String),
}

/// Supplies file contents scoped to one target revision.
///
/// Implementations own any timeout/caching policy.
pub trait ContentProvider {
    fn fetch_content(&self, path: &str) -> impl Future<Output = FetchOutcome> + Send;
}

/// Provider backed by contents the caller already holds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContent {
    files: BTreeMap<String, String>,
}

impl InMemoryContent {
    pub fn new(files: BTreeMap<String, String>) -> Self {
        Self { files }
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

impl FromIterator<(String, String)> for InMemoryContent {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ContentProvider for InMemoryContent {
    async fn fetch_content(&self, path: &str) -> FetchOutcome {
        match self.files.get(path) {
            Some(content) => FetchOutcome::Found(content.clone()),
            None => FetchOutcome::NotFound,
        }
    }
}
