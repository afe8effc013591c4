use crate::types::{ActionId, ItemId, SkillId};
use crate::Progress;

/// Goal-scoped equivalence class of states used for dominance pruning
/// (`spec.md` §3). Deliberately coarser than the A* driver's state-key
/// (§4.8's note): it excludes bucketed effective credits so that states
/// differing only in banked gold still compete on the same frontier.
///
/// A structured key rather than the reference design's concatenated
/// string — §9's design note permits this as long as equality matches
/// the string equality it replaces, so every field here is exactly the
/// thing the string would have encoded, quantized identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    pub activity: Option<ActionId>,
    /// Sorted ascending by `SkillId`, goal-relevant skills only.
    pub skill_levels: Vec<(SkillId, u32)>,
    pub axe_level: u32,
    pub rod_level: u32,
    pub pick_level: u32,
    pub hp_bucket: Option<i32>,
    pub mastery_level: Option<u32>,
    /// Sorted ascending by `ItemId`, after quantization.
    pub inventory_bucket: Vec<(ItemId, u64)>,
    pub input_item_mix: u32,
}

impl BucketKey {
    pub fn quantize_inventory(count: u64) -> u64 {
        if count < crate::INVENTORY_EXACT_UNDER as u64 {
            count
        } else {
            (count / crate::INVENTORY_BUCKET as u64) * crate::INVENTORY_BUCKET as u64
        }
    }

    pub fn quantize_hp(hp: i32) -> i32 {
        hp.div_euclid(crate::HP_BUCKET)
    }

    pub fn quantize_mastery(level: u32) -> u32 {
        (level / crate::MASTERY_BUCKET) * crate::MASTERY_BUCKET
    }
}

/// A `(ticks, progress)` pair retained as non-dominated in its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierPoint {
    pub ticks: crate::Ticks,
    pub progress: Progress,
}

impl FrontierPoint {
    pub fn new(ticks: crate::Ticks, progress: Progress) -> Self {
        Self { ticks, progress }
    }

    /// `true` if `self` dominates `other`: no worse on ticks, no worse on
    /// progress, strictly better on at least one.
    pub fn dominates(&self, other: &FrontierPoint) -> bool {
        let not_worse = self.ticks <= other.ticks && self.progress >= other.progress;
        let strictly_better = self.ticks < other.ticks || self.progress > other.progress;
        not_worse && strictly_better
    }
}
