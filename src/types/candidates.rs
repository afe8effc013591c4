use crate::types::{ActionId, ItemId, MacroCandidate, PurchaseId, SellPolicy};

/// Events that, were they to occur, could change the optimal decision.
/// Membership here never implies an action should be taken (`spec.md`
/// invariant 1) — it only bounds the length of a wait edge.
#[derive(Debug, Clone, Default)]
pub struct WatchSet {
    pub upgrade_affordability: Vec<PurchaseId>,
    pub skill_unlocks: Vec<ActionId>,
    pub input_depletion: Vec<ItemId>,
    pub goal_crossing: bool,
}

/// Output of the candidate enumerator: a deliberately small branch set
/// for the current state.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    pub switch_to_activities: Vec<ActionId>,
    pub buy_upgrades: Vec<PurchaseId>,
    pub macros: Vec<MacroCandidate>,
    pub should_emit_sell_candidate: bool,
    pub sell_policy: SellPolicy,
    pub watch_set: WatchSet,
}
