//! Profile & Diagnostics (`spec.md` §4.12, `SPEC_FULL.md` §F). Optional
//! metrics collected during a solve when `SolverConfig::collect_stats` is
//! set. Grounded on the teacher's `mccfr::profile::Profile` running-stats
//! accumulator, same "cheap counters threaded through the hot loop, only
//! read at the end" shape.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct SolveProfile {
    /// Histogram of `h(state)` values observed at pop time, bucketed to
    /// the nearest power of two for a compact distribution summary.
    pub heuristic_value_buckets: BTreeMap<u32, u64>,
    pub frontier_inserted: usize,
    pub frontier_removed: usize,
    pub frontier_bucket_count: usize,
    pub expanded_nodes: usize,
    pub enqueued_nodes: usize,
    /// Count of distinct `BucketKey`s that ever held more than one
    /// surviving frontier point — a rough signal of bucket granularity.
    pub buckets_with_competition: usize,
}

impl SolveProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_heuristic(&mut self, h: f64) {
        let bucket = if h <= 0.0 { 0 } else { h.log2().floor().max(0.0) as u32 };
        *self.heuristic_value_buckets.entry(bucket).or_insert(0) += 1;
    }
}
