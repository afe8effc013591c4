pub mod advance;
pub mod config;
pub mod consume_until;
pub mod decision_delta;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod frontier;
pub mod macro_expander;
pub mod node;
pub mod prerequisite;
pub mod rate_cache;
pub mod replan;
pub mod segment;
pub mod toy;
pub mod traits;
pub mod types;

/// dimensional analysis types
pub type Ticks = u64;
pub type Gold = i64;
pub type Xp = u64;
pub type Probability = f32;
pub type Progress = i64;

// bucketing / dominance tunables
pub const GOLD_BUCKET: Gold = 50;
pub const HP_BUCKET: i32 = 10;
pub const INVENTORY_BUCKET: u32 = 10;
pub const INVENTORY_EXACT_UNDER: u32 = 100;
pub const MASTERY_BUCKET: u32 = 10;
pub const INPUT_MIX_BITS: usize = 30;

// search limits
pub const DEFAULT_MAX_EXPANDED_NODES: usize = 200_000;
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 500_000;

// macro / prerequisite resolution
pub const MAX_PREREQ_DEPTH: usize = 20;
pub const MAX_ENSURE_EXEC_DEPTH: usize = 8;

// consume-until executor
pub const CONSUME_BUFFER_TICKS: Ticks = 3000;

// segment loop
pub const MAX_SEGMENTS: usize = 100;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize logging. binaries behind the `cli` feature call this; the
/// library itself never initializes a logger, it only emits through `log`.
#[cfg(feature = "cli")]
pub fn init_logging() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term]).expect("initialize logger");
}
