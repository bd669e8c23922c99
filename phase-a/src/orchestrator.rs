//! Phase A orchestration: normalize → fetch + extract symbols → risk signals.
//!
//! The orchestrator owns every intermediate value for the duration of one run
//! and shares nothing between runs, so concurrent jobs need no locking.
//! Per-file fetches run through a bounded `buffered` stream, which yields in
//! input order; the assembled result is therefore identical to a sequential run.

use std::time::Instant;

use futures::{StreamExt, stream};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::{
    config::PhaseAConfig,
    content::{ContentProvider, FetchOutcome},
    lang::SymbolRegistry,
    parser::normalize_diff,
    risk::compute_risk_signals_with,
    types::{ChangeType, ContentStatus, PhaseAResult, Symbol, SymbolsMap},
};

/// Runs the Phase A pipeline for one diff.
#[derive(Debug, Clone, Default)]
pub struct PhaseAOrchestrator {
    registry: SymbolRegistry,
    config: PhaseAConfig,
}

impl PhaseAOrchestrator {
    pub fn new(config: PhaseAConfig) -> Self {
        Self {
            registry: SymbolRegistry::default(),
            config,
        }
    }

    /// Replaces the extension → strategy table.
    pub fn with_registry(mut self, registry: SymbolRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &PhaseAConfig {
        &self.config
    }

    /// Always returns a result; fetch failures only empty that file's symbols.
    pub async fn run<P>(&self, diff: &str, provider: &P) -> PhaseAResult
    where
        P: ContentProvider + Sync,
    {
        let t0 = Instant::now();

        let file_diffs = normalize_diff(diff);
        debug!(files = file_diffs.len(), "phase_a: diff normalized");

        let jobs: Vec<(String, ChangeType, bool)> = file_diffs
            .iter()
            .map(|fd| (fd.path.clone(), fd.change_type, fd.is_binary))
            .collect();

        let per_file: Vec<(String, ContentStatus, Vec<Symbol>)> = stream::iter(jobs)
            .map(|(path, change_type, is_binary)| async move {
                let (status, symbols) = self
                    .symbols_for(&path, change_type, is_binary, provider)
                    .await;
                (path, status, symbols)
            })
            .buffered(self.config.fetch_concurrency.max(1))
            .collect()
            .await;

        let mut symbols_map = SymbolsMap::new();
        let mut content_status = IndexMap::new();
        for (path, status, symbols) in per_file {
            content_status.insert(path.clone(), status);
            symbols_map.insert(path, symbols);
        }

        let risk_summary =
            compute_risk_signals_with(&file_diffs, &symbols_map, self.config.thresholds);

        info!(
            files = file_diffs.len(),
            symbols = symbols_map.values().map(Vec::len).sum::<usize>(),
            high_risk = risk_summary.high_risk_files.len(),
            breaking_candidates = risk_summary.breaking_change_candidates.len(),
            tests_missing = risk_summary.tests_missing_for_changes,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "phase_a: done"
        );

        PhaseAResult {
            file_diffs,
            symbols_map,
            risk_summary,
            content_status,
        }
    }

    async fn symbols_for<P>(
        &self,
        path: &str,
        change_type: ChangeType,
        is_binary: bool,
        provider: &P,
    ) -> (ContentStatus, Vec<Symbol>)
    where
        P: ContentProvider + Sync,
    {
        if change_type == ChangeType::Deleted || is_binary {
            debug!(path, ?change_type, is_binary, "phase_a: fetch skipped");
            return (ContentStatus::Skipped, Vec::new());
        }

        match provider.fetch_content(path).await {
            FetchOutcome::Found(content) => {
                let symbols = self.registry.extract_symbols(path, &content);
                debug!(path, symbols = symbols.len(), "phase_a: symbols extracted");
                (ContentStatus::Fetched, symbols)
            }
            FetchOutcome::NotFound => {
                debug!(path, "phase_a: content not found");
                (ContentStatus::NotFound, Vec::new())
            }
            FetchOutcome::Failed(reason) => {
                warn!(path, %reason, "phase_a: content fetch failed");
                (ContentStatus::Failed, Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::{content::InMemoryContent, lang::ExtractionStrategy, types::SymbolKind};

    const APP_AND_TEST: &str = "\
diff --git a/src/app.py b/src/app.py
--- a/src/app.py
+++ b/src/app.py
@@ -1,3 +1,7 @@
 import os
+import json
+
+def handler(event):
+    return json.dumps(event)

 print(os)
diff --git a/tests/test_app.py b/tests/test_app.py
--- a/tests/test_app.py
+++ b/tests/test_app.py
@@ -1,1 +1,3 @@
 from app import handler
+def test_handler():
+    assert handler({})
";

    fn app_contents() -> InMemoryContent {
        let mut c = InMemoryContent::default();
        c.insert(
            "src/app.py",
            "import os\nimport json\n\ndef handler(event):\n    return json.dumps(event)\n\nprint(os)\n",
        );
        c.insert(
            "tests/test_app.py",
            "from app import handler\ndef test_handler():\n    assert handler({})\n",
        );
        c
    }

    #[tokio::test]
    async fn end_to_end_small_change_with_tests() {
        let result = PhaseAOrchestrator::default()
            .run(APP_AND_TEST, &app_contents())
            .await;

        assert_eq!(result.file_diffs.len(), 2);
        assert_eq!(result.file_diffs[0].hunks[0].added.len(), 4);
        assert!(result.file_diffs[0].hunks[0].removed.is_empty());
        assert_eq!(result.file_diffs[1].hunks[0].added.len(), 2);

        assert!(result.risk_summary.high_risk_files.is_empty());
        assert!(result.risk_summary.breaking_change_candidates.is_empty());
        assert!(!result.risk_summary.tests_missing_for_changes);

        let app = &result.symbols_map["src/app.py"];
        assert_eq!(app.len(), 1);
        assert_eq!(app[0].name, "handler");
        assert_eq!(app[0].start_line, 4);
        assert_eq!(result.symbols_map["tests/test_app.py"][0].name, "test_handler");
        assert_eq!(result.content_status["src/app.py"], ContentStatus::Fetched);
    }

    #[tokio::test]
    async fn missing_content_degrades_to_empty_symbols() {
        let result = PhaseAOrchestrator::default()
            .run(APP_AND_TEST, &InMemoryContent::default())
            .await;

        assert_eq!(result.symbols_map.len(), 2);
        assert!(result.symbols_map.values().all(Vec::is_empty));
        assert!(
            result
                .content_status
                .values()
                .all(|s| *s == ContentStatus::NotFound)
        );
        assert!(!result.risk_summary.tests_missing_for_changes);
    }

    /// Fails for one path, counts every call.
    struct Flaky {
        inner: InMemoryContent,
        failing: &'static str,
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl ContentProvider for Flaky {
        async fn fetch_content(&self, path: &str) -> FetchOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(path.to_string());
            }
            if path == self.failing {
                return FetchOutcome::Failed("boom".into());
            }
            self.inner.fetch_content(path).await
        }
    }

    #[tokio::test]
    async fn one_failing_file_does_not_abort_the_others() {
        let diff = "\
diff --git a/a.py b/a.py
--- a/a.py
+++ b/a.py
@@ -1,2 +1,1 @@
-def old():
-    pass
+def kept(): pass
diff --git a/b.py b/b.py
--- a/b.py
+++ b/b.py
@@ -1,1 +1,1 @@
-x = 0
+x = 1
diff --git a/gone.py b/gone.py
deleted file mode 100644
--- a/gone.py
+++ /dev/null
@@ -1,1 +0,0 @@
-def bye(): pass
";
        let mut inner = InMemoryContent::default();
        inner.insert("a.py", "def kept(): pass\nclass Box:\n    pass\n");
        inner.insert("b.py", "def b_fn():\n    x = 1\n");
        let provider = Flaky {
            inner,
            failing: "b.py",
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        };

        let cfg = PhaseAConfig {
            fetch_concurrency: 2,
            ..PhaseAConfig::default()
        };
        let result = PhaseAOrchestrator::new(cfg).run(diff, &provider).await;

        // Deleted file never hits the provider.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert!(!provider.seen.lock().unwrap().contains(&"gone.py".to_string()));

        assert_eq!(result.content_status["a.py"], ContentStatus::Fetched);
        assert_eq!(result.content_status["b.py"], ContentStatus::Failed);
        assert_eq!(result.content_status["gone.py"], ContentStatus::Skipped);
        assert!(result.symbols_map["b.py"].is_empty());

        assert_eq!(
            result.risk_summary.breaking_change_candidates,
            vec!["kept", "Box"]
        );
        assert!(result.risk_summary.tests_missing_for_changes);
    }

    #[tokio::test]
    async fn custom_registry_is_used() {
        let diff = "diff --git a/x.mjs b/x.mjs\n--- a/x.mjs\n+++ b/x.mjs\n@@ -1 +1 @@\n-a\n+function go() {}\n";
        let mut contents = InMemoryContent::default();
        contents.insert("x.mjs", "function go() {}\n");

        let plain = PhaseAOrchestrator::default().run(diff, &contents).await;
        assert!(plain.symbols_map["x.mjs"].is_empty());

        let mut registry = SymbolRegistry::default();
        registry.register("mjs", ExtractionStrategy::FunctionKeyword);
        let extended = PhaseAOrchestrator::default()
            .with_registry(registry)
            .run(diff, &contents)
            .await;
        assert_eq!(extended.symbols_map["x.mjs"][0].kind, SymbolKind::Function);
    }

    #[tokio::test]
    async fn empty_diff_yields_empty_result() {
        let result = PhaseAOrchestrator::default()
            .run("", &InMemoryContent::default())
            .await;
        assert!(result.file_diffs.is_empty());
        assert!(result.symbols_map.is_empty());
        assert!(!result.risk_summary.tests_missing_for_changes);
    }

    #[tokio::test]
    async fn result_serializes_with_ordered_sequences() {
        let result = PhaseAOrchestrator::default()
            .run(APP_AND_TEST, &app_contents())
            .await;
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["file_diffs"][0]["path"], "src/app.py");
        assert_eq!(json["file_diffs"][1]["path"], "tests/test_app.py");
        assert_eq!(json["file_diffs"][0]["hunks"][0]["added"][2], "def handler(event):");
        assert_eq!(json["symbols_map"]["src/app.py"][0]["type"], "function");
        assert_eq!(json["risk_summary"]["tests_missing_for_changes"], false);
        assert_eq!(json["content_status"]["src/app.py"], "fetched");

        let back: PhaseAResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[tokio::test]
    async fn maps_follow_diff_order() {
        let diff = "\
diff --git a/zeta.py b/zeta.py
--- a/zeta.py
+++ b/zeta.py
@@ -1,0 +1,1 @@
+def z(): pass
diff --git a/alpha.py b/alpha.py
--- a/alpha.py
+++ b/alpha.py
@@ -1,0 +1,1 @@
+def a(): pass
";
        let content: InMemoryContent = [("zeta.py", "def z(): pass\n"), ("alpha.py", "def a(): pass\n")]
            .into_iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect();
        let result = PhaseAOrchestrator::default().run(diff, &content).await;

        let keys: Vec<_> = result.symbols_map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta.py", "alpha.py"]);
        let keys: Vec<_> = result.content_status.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta.py", "alpha.py"]);

        let json = serde_json::to_string(&result.symbols_map).unwrap();
        assert!(json.find("zeta.py") < json.find("alpha.py"));
    }
}
