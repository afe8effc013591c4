use crate::traits::GameState;
use crate::types::{ActionId, Goal, ItemId};
use crate::{Gold, Progress, Ticks, Xp};

/// A stop condition for a wait or macro edge. `AnyOf` composes several —
/// used by the Macro Expander (§4.7) to build a single `WaitFor` out of a
/// macro's primary stop plus its watched stops.
#[derive(Debug, Clone)]
pub enum WaitFor {
    SkillXp { skill: crate::types::SkillId, target_xp: Xp },
    InventoryValue { target: Gold },
    InventoryAtLeast { item_id: ItemId, count: u64 },
    InputsDepleted { action_id: ActionId },
    /// Delegates to an embedded goal's own satisfaction check — used by
    /// the Segment loop, whose `SegmentGoal::is_satisfied` is really
    /// `watch_set.detect_boundary`, and by macro composite stop rules that
    /// want "stop if the outer goal finishes early".
    Goal(Box<Goal>),
    AnyOf(Vec<WaitFor>),
}

impl WaitFor {
    /// `effective_credits` is the caller's `ValueModel::effective_credits(state)`
    /// — needed here only because `Goal`/`InventoryValue` compare against
    /// currency plus sellable inventory value, not bare `state.currency()`.
    pub fn is_satisfied<S: GameState>(&self, state: &S, effective_credits: Gold) -> bool {
        match self {
            WaitFor::SkillXp { skill, target_xp } => state.skill_xp(*skill) >= *target_xp,
            WaitFor::InventoryValue { target } => effective_credits >= *target,
            WaitFor::InventoryAtLeast { item_id, count } => {
                state.inventory_count(*item_id) >= *count
            }
            WaitFor::InputsDepleted { action_id } => state.active_action() != Some(*action_id),
            WaitFor::Goal(goal) => goal.is_satisfied(state, effective_credits),
            WaitFor::AnyOf(conditions) => {
                conditions.iter().any(|c| c.is_satisfied(state, effective_credits))
            }
        }
    }

    pub fn progress<S: GameState>(&self, state: &S, effective_credits: Gold) -> Progress {
        match self {
            WaitFor::SkillXp { skill, .. } => state.skill_xp(*skill) as Progress,
            WaitFor::InventoryValue { .. } => effective_credits as Progress,
            WaitFor::InventoryAtLeast { item_id, .. } => state.inventory_count(*item_id) as Progress,
            WaitFor::InputsDepleted { .. } => 0,
            WaitFor::Goal(goal) => goal.progress(state, effective_credits),
            WaitFor::AnyOf(conditions) => conditions
                .iter()
                .map(|c| c.progress(state, effective_credits))
                .max()
                .unwrap_or(0),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            WaitFor::SkillXp { skill, target_xp } => format!("xp({skill}) >= {target_xp}"),
            WaitFor::InventoryValue { target } => format!("value >= {target}"),
            WaitFor::InventoryAtLeast { item_id, count } => format!("count({item_id}) >= {count}"),
            WaitFor::InputsDepleted { action_id } => format!("inputs depleted for {action_id}"),
            WaitFor::Goal(goal) => goal.describe(),
            WaitFor::AnyOf(conditions) => {
                let parts: Vec<_> = conditions.iter().map(WaitFor::describe).collect();
                format!("any({})", parts.join(" | "))
            }
        }
    }

    /// Rough horizon hint — never load-bearing for correctness, only used
    /// by macro stop rules that want to bound expected-value projection.
    pub fn rough_horizon_hint(&self) -> Option<Ticks> {
        None
    }
}

impl std::fmt::Display for WaitFor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}
