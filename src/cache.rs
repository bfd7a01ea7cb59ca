//! Caching of completed analyses.
//!
//! An interactive host re-runs the query on every edit, and most edits do
//! not touch the fault tree at all. The cache keys a finished report by the
//! tree fingerprint, the start node and the limit parameters, so an
//! unchanged snapshot answers from memory while any structural edit or
//! limit change misses.
//!
//! Only complete reports are cached: aborted and cancelled runs depend on
//! when the caller pulled the flag, not just on the inputs.

use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use xxhash_rust::xxh64::Xxh64;

use crate::analysis::{AnalysisReport, CutSetAnalyzer};
use crate::limits::CancellationFlag;
use crate::model::FaultTree;

/// Configuration for the analysis cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of retained reports.
    pub max_entries: usize,
    /// Whether caching is enabled at all.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 128, enabled: true }
    }
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from the cache.
    pub hits: u64,
    /// Requests that ran the analysis.
    pub misses: u64,
}

/// Cache key derived from everything that affects the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AnalysisCacheKey(u64);

impl AnalysisCacheKey {
    fn compute(tree: &FaultTree, start: Option<&str>, limits_hash: &str) -> Self {
        let mut hasher = Xxh64::new(0);
        hasher.update(tree.fingerprint().as_bytes());
        hasher.update(start.unwrap_or("").as_bytes());
        hasher.update(&[start.is_some() as u8]);
        hasher.update(limits_hash.as_bytes());
        Self(hasher.digest())
    }
}

/// Thread-safe LRU cache of completed analysis reports.
pub struct AnalysisCache {
    cache: Option<Mutex<LruCache<AnalysisCacheKey, Arc<AnalysisReport>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AnalysisCache {
    /// Create a cache with the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        let cache = if config.enabled {
            let size = NonZeroUsize::new(config.max_entries)
                .unwrap_or_else(|| NonZeroUsize::new(1).expect("1 is non-zero"));
            Some(Mutex::new(LruCache::new(size)))
        } else {
            None
        };
        Self { cache, hits: AtomicU64::new(0), misses: AtomicU64::new(0) }
    }

    /// Analyze through the cache.
    ///
    /// Returns the cached report when the same tree, start node and limits
    /// were analyzed before; otherwise runs the analyzer and retains the
    /// report if it completed.
    pub fn analyze(
        &self,
        analyzer: &CutSetAnalyzer,
        tree: &FaultTree,
        start: Option<&str>,
        cancel: &CancellationFlag,
    ) -> Arc<AnalysisReport> {
        let Some(cache) = &self.cache else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Arc::new(analyzer.determine_with_cancel(tree, start, cancel));
        };

        let key = AnalysisCacheKey::compute(tree, start, &analyzer.limits().params_hash());
        if let Some(report) = cache.lock().get(&key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(fingerprint = %report.fingerprint, "analysis cache hit");
            return report;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let report = Arc::new(analyzer.determine_with_cancel(tree, start, cancel));
        if report.status.is_complete() {
            cache.lock().put(key, Arc::clone(&report));
        }
        report
    }

    /// Current hit/miss counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drop every retained report.
    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::AnalysisLimits;
    use crate::model::{FaultTree, FaultTreeBuilder};

    fn sample_tree(gate: &str) -> FaultTree {
        let mut builder = FaultTreeBuilder::default();
        builder.component("A").component("B");
        match gate {
            "and" => builder.and_gate("G", ["A", "B"]),
            _ => builder.or_gate("G", ["A", "B"]),
        };
        builder.top_event("Hazard", "G");
        builder.build().unwrap()
    }

    #[test]
    fn test_repeat_request_hits() {
        let cache = AnalysisCache::default();
        let analyzer = CutSetAnalyzer::default();
        let tree = sample_tree("or");
        let cancel = CancellationFlag::new();

        let first = cache.analyze(&analyzer, &tree, None, &cancel);
        let second = cache.analyze(&analyzer, &tree, None, &cancel);

        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(first.fingerprint, second.fingerprint);
    }

    #[test]
    fn test_structural_edit_misses() {
        let cache = AnalysisCache::default();
        let analyzer = CutSetAnalyzer::default();
        let cancel = CancellationFlag::new();

        cache.analyze(&analyzer, &sample_tree("or"), None, &cancel);
        cache.analyze(&analyzer, &sample_tree("and"), None, &cancel);
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 2 });
    }

    #[test]
    fn test_start_node_is_part_of_the_key() {
        let cache = AnalysisCache::default();
        let analyzer = CutSetAnalyzer::default();
        let tree = sample_tree("or");
        let cancel = CancellationFlag::new();

        cache.analyze(&analyzer, &tree, None, &cancel);
        cache.analyze(&analyzer, &tree, Some("G"), &cancel);
        // Same resolved node, but a different request key.
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 2 });
    }

    #[test]
    fn test_limit_change_misses() {
        let cache = AnalysisCache::default();
        let tree = sample_tree("or");
        let cancel = CancellationFlag::new();

        cache.analyze(&CutSetAnalyzer::default(), &tree, None, &cancel);
        cache.analyze(
            &CutSetAnalyzer::new(AnalysisLimits::new(10, 10)),
            &tree,
            None,
            &cancel,
        );
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 2 });
    }

    #[test]
    fn test_cancelled_runs_are_not_retained() {
        let cache = AnalysisCache::default();
        let analyzer = CutSetAnalyzer::default();
        let tree = sample_tree("or");

        let cancelled = CancellationFlag::new();
        cancelled.cancel();
        let aborted = cache.analyze(&analyzer, &tree, None, &cancelled);
        assert!(!aborted.status.is_complete());

        // The next uncancelled request must not see the cancelled report.
        let fresh = cache.analyze(&analyzer, &tree, None, &CancellationFlag::new());
        assert!(fresh.status.is_complete());
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let cache = AnalysisCache::new(CacheConfig { max_entries: 16, enabled: false });
        let analyzer = CutSetAnalyzer::default();
        let tree = sample_tree("or");
        let cancel = CancellationFlag::new();

        cache.analyze(&analyzer, &tree, None, &cancel);
        cache.analyze(&analyzer, &tree, None, &cancel);
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 2 });
    }
}
