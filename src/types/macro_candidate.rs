use crate::traits::GameState;
use crate::traits::Registries;
use crate::types::{ActionId, ItemId, SkillId, WaitFor};
use crate::{Ticks, Xp};

/// A single stop condition a macro's expansion should watch for. Kept as
/// a closed sum (rather than a trait object) the same way `Edge`/`Turn`
/// are in the teacher — there's a fixed, small set of stop shapes.
#[derive(Debug, Clone)]
pub enum MacroStopRule {
    AtSkillLevel { skill: SkillId, level: u32 },
    AtSkillXp { skill: SkillId, target_xp: Xp },
    AtInventory { item_id: ItemId, count: u64 },
    InputsDepleted { action_id: ActionId },
}

impl MacroStopRule {
    pub fn to_wait_for<S: GameState>(&self, state: &S, registries: &dyn Registries) -> WaitFor {
        match self {
            MacroStopRule::AtSkillLevel { skill, level } => WaitFor::SkillXp {
                skill: *skill,
                target_xp: state.xp_required_for_level(*skill, *level),
            },
            MacroStopRule::AtSkillXp { skill, target_xp } => WaitFor::SkillXp {
                skill: *skill,
                target_xp: *target_xp,
            },
            MacroStopRule::AtInventory { item_id, count } => WaitFor::InventoryAtLeast {
                item_id: *item_id,
                count: *count,
            },
            MacroStopRule::InputsDepleted { action_id } => {
                let _ = registries;
                WaitFor::InputsDepleted { action_id: *action_id }
            }
        }
    }
}

/// A high-level candidate the A* driver's macro edges expand through the
/// Macro Expander (§4.7). Distinct from `Interaction`: macros consume
/// time, interactions never do.
#[derive(Debug, Clone)]
pub enum MacroCandidate {
    TrainSkillUntil {
        skill: SkillId,
        primary_stop: MacroStopRule,
        watched_stops: Vec<MacroStopRule>,
    },
    TrainConsumingSkillUntil {
        skill: SkillId,
        primary_stop: MacroStopRule,
        watched_stops: Vec<MacroStopRule>,
    },
    AcquireItem {
        item_id: ItemId,
        quantity: u64,
    },
    EnsureStock {
        item_id: ItemId,
        min_total: u64,
    },
    ProduceItem {
        item_id: ItemId,
        action_id: ActionId,
        estimated_ticks: Ticks,
    },
}

impl MacroCandidate {
    pub fn composite_wait_for<S: GameState>(&self, state: &S, registries: &dyn Registries) -> WaitFor {
        match self {
            MacroCandidate::TrainSkillUntil { primary_stop, watched_stops, .. }
            | MacroCandidate::TrainConsumingSkillUntil { primary_stop, watched_stops, .. } => {
                let mut all = vec![primary_stop.to_wait_for(state, registries)];
                all.extend(watched_stops.iter().map(|s| s.to_wait_for(state, registries)));
                WaitFor::AnyOf(all)
            }
            MacroCandidate::AcquireItem { item_id, quantity } => WaitFor::InventoryAtLeast {
                item_id: *item_id,
                count: *quantity,
            },
            MacroCandidate::EnsureStock { item_id, min_total } => WaitFor::InventoryAtLeast {
                item_id: *item_id,
                count: *min_total,
            },
            MacroCandidate::ProduceItem { item_id, .. } => WaitFor::InventoryAtLeast {
                item_id: *item_id,
                count: state.inventory_count(*item_id) + 1,
            },
        }
    }

    pub fn skill(&self) -> Option<SkillId> {
        match self {
            MacroCandidate::TrainSkillUntil { skill, .. }
            | MacroCandidate::TrainConsumingSkillUntil { skill, .. } => Some(*skill),
            _ => None,
        }
    }
}
