use crate::toy::{ToyRegistries, WOODCUTTING};
use crate::traits::registries::ActionDef;
use crate::traits::{Estimator, GameState, Registries};
use crate::types::{ActionId, Rates, Tool};
use std::sync::Arc;

/// Converts a toy action into per-tick flows. Axe tier discounts
/// woodcutting's duration; mastery nudges yield up — a small, deliberately
/// linear model, enough to give the Rate Cache and macro expander
/// something nontrivial to optimize over.
pub struct ToyEstimator {
    registries: Arc<ToyRegistries>,
}

impl ToyEstimator {
    pub fn new(registries: Arc<ToyRegistries>) -> Self {
        ToyEstimator { registries }
    }

    fn effective_duration(&self, def: &ActionDef, tool_tier: u32) -> f64 {
        let discount = if def.skill == WOODCUTTING { 0.25 * tool_tier as f64 } else { 0.0 };
        (def.mean_duration_ticks as f64 / (1.0 + discount)).max(1.0)
    }
}

impl Estimator<crate::toy::ToyState> for ToyEstimator {
    fn estimate_rates(&self, state: &crate::toy::ToyState) -> Rates {
        match state.active_action {
            Some(action) => self.estimate_rates_for_action(state, action),
            None => Rates::default(),
        }
    }

    fn estimate_rates_for_action(&self, state: &crate::toy::ToyState, action: ActionId) -> Rates {
        let Some(def) = self.registries.action_by_id(action) else {
            return Rates::default();
        };

        let duration = self.effective_duration(def, state.tool_tier(Tool::Axe));
        let mastery_bonus = 1.0 + 0.05 * state.mastery_level(action) as f64;
        // Stun on failure stretches the effective cycle time; success
        // probability then discounts how much of that cycle actually
        // pays out (`spec.md` §4.1's success-probability/stun correction).
        let stun_penalty = def.stun_ticks as f64 * (1.0 - def.success_probability as f64);
        let per_action = def.success_probability as f64 / (duration + stun_penalty).max(1.0);

        let mut rates = Rates { action: Some(action), ..Rates::default() };
        rates.xp_per_tick.insert(def.skill, def.xp_per_action as f64 * per_action);
        rates.mastery_xp_per_tick = def.xp_per_action as f64 * per_action * 0.1;

        for (item, qty) in &def.outputs {
            rates.item_flows_per_tick.insert(*item, qty * per_action * mastery_bonus);
        }
        for (item, qty) in &def.inputs {
            rates.items_consumed_per_tick.insert(*item, *qty as f64 * per_action);
        }

        if def.has_death_risk() {
            rates.ticks_until_death = Some(duration / def.death_probability as f64);
        }
        rates.success_probability = def.success_probability;

        rates
    }
}
