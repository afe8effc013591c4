//! `SolverConfig` (`SPEC_FULL.md` §D): override surface for the module
//! consts in `crate::lib`, resolving `spec.md` §9's open question on
//! `CONSUME_BUFFER_TICKS` being "a pure heuristic; a quality implementation
//! may expose it as config." Grounded on the teacher's split between
//! `src/lib.rs` module consts (documented defaults) and per-run overrides
//! threaded through `Blueprint`/`Tree` constructors.

use crate::Ticks;

#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub max_expanded_nodes: usize,
    pub max_queue_size: usize,
    pub consume_buffer_ticks: Ticks,
    pub max_segments: usize,
    pub max_prereq_depth: usize,
    pub max_ensure_exec_depth: usize,
    pub max_replans: usize,
    pub max_total_ticks: Ticks,
    /// When set, `solve()` returns a populated `SolveProfile` alongside the
    /// plan (`spec.md` §6: "collect_stats?").
    pub collect_stats: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_expanded_nodes: crate::DEFAULT_MAX_EXPANDED_NODES,
            max_queue_size: crate::DEFAULT_MAX_QUEUE_SIZE,
            consume_buffer_ticks: crate::CONSUME_BUFFER_TICKS,
            max_segments: crate::MAX_SEGMENTS,
            max_prereq_depth: crate::MAX_PREREQ_DEPTH,
            max_ensure_exec_depth: crate::MAX_ENSURE_EXEC_DEPTH,
            max_replans: 50,
            max_total_ticks: Ticks::MAX / 2,
            collect_stats: false,
        }
    }
}
