use crate::toy::{ToyRegistries, ToyState};
use crate::traits::{GameState, Registries, ValueModel};
use crate::Gold;
use std::sync::Arc;

/// Gold-equivalent value of the active action's output stream, priced at
/// `ItemDef::sell_price` — what the driver's tie-break and the decision
/// delta's upgrade-affordability projection (§4.6) both need.
pub struct ToyValueModel {
    registries: Arc<ToyRegistries>,
}

impl ToyValueModel {
    pub fn new(registries: Arc<ToyRegistries>) -> Self {
        ToyValueModel { registries }
    }
}

impl ValueModel<ToyState> for ToyValueModel {
    fn value_per_tick(&self, state: &ToyState) -> f64 {
        let Some(action) = state.active_action() else { return 0.0 };
        let Some(def) = self.registries.action_by_id(action) else { return 0.0 };
        let duration = def.mean_duration_ticks.max(1) as f64;
        let stun_penalty = def.stun_ticks as f64 * (1.0 - def.success_probability as f64);
        let per_action = def.success_probability as f64 / (duration + stun_penalty).max(1.0);
        let gained: f64 = def
            .outputs
            .iter()
            .map(|(item, qty)| {
                self.registries.item_by_id(*item).map(|i| i.sell_price as f64).unwrap_or(0.0)
                    * qty
                    * per_action
            })
            .sum();
        let spent: f64 = def
            .inputs
            .iter()
            .map(|(item, qty)| {
                self.registries.item_by_id(*item).map(|i| i.sell_price as f64).unwrap_or(0.0)
                    * *qty as f64
                    * per_action
            })
            .sum();
        (gained - spent).max(0.0)
    }

    /// Currency plus every held item's sell value — deliberately not
    /// filtered by any goal's sell policy (the trait has no goal in
    /// scope), which only ever makes this an overestimate of what's
    /// convertible, never an underestimate. That keeps `Goal::remaining`
    /// safe for A* admissibility: it can only make remaining ticks look
    /// smaller than reality, never larger.
    fn effective_credits(&self, state: &ToyState) -> Gold {
        let inventory_value: Gold = state
            .inventory()
            .into_iter()
            .map(|(item, qty)| {
                self.registries.item_by_id(item).map(|i| i.sell_price).unwrap_or(0) * qty as Gold
            })
            .sum();
        state.currency() + inventory_value
    }
}
