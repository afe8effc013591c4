use crate::toy::{ToyRegistries, ToyState, ToyValueModel, AXE_UPGRADE, WOODCUTTING};
use crate::traits::registries::ActionDef;
use crate::traits::{GameSim, GameState, Registries, ValueModel};
use crate::traits::sim::StopReason;
use crate::types::{ActionId, Interaction, Rates, WaitFor};
use crate::{Probability, Ticks};
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Arc;

/// The toy game's own tick loop. Grounded on the teacher's
/// `gameplay::game::Game::apply`: every method returns a new state,
/// nothing here ever mutates its argument in place.
pub struct ToySim {
    registries: Arc<ToyRegistries>,
    value_model: ToyValueModel,
}

impl ToySim {
    pub fn new(registries: Arc<ToyRegistries>) -> Self {
        let value_model = ToyValueModel::new(registries.clone());
        ToySim { registries, value_model }
    }

    /// Runs whole actions one at a time against `state.active_action`
    /// until `max_ticks` is spent or `stop` holds, used by both
    /// `consume_ticks_until` (stop = the caller's `WaitFor`) and
    /// `advance_full_simulation` (stop = never, just the tick budget).
    fn run_ticks(
        &self,
        state: &ToyState,
        max_ticks: Ticks,
        rng: &mut dyn RngCore,
        mut stop: impl FnMut(&ToyState) -> bool,
    ) -> (ToyState, Ticks, StopReason) {
        let mut current = state.clone();
        let mut elapsed: Ticks = 0;

        if stop(&current) {
            return (current, 0, StopReason::Satisfied);
        }

        loop {
            let Some(action_id) = current.active_action else {
                return (current, elapsed, StopReason::TickBudgetExhausted);
            };
            let Some(def) = self.registries.action_by_id(action_id) else {
                return (current, elapsed, StopReason::TickBudgetExhausted);
            };

            if def.is_consuming()
                && def.inputs.iter().any(|(item, needed)| current.inventory_count(*item) < *needed)
            {
                return (current, elapsed, StopReason::InputsDepleted { action_id });
            }

            if max_ticks.saturating_sub(elapsed) < def.mean_duration_ticks {
                return (current, elapsed, StopReason::TickBudgetExhausted);
            }

            elapsed += def.mean_duration_ticks;
            current = self.resolve_action(&current, def, rng);

            if current.hp <= 0 {
                return (current, elapsed, StopReason::Died);
            }
            if stop(&current) {
                return (current, elapsed, StopReason::Satisfied);
            }
        }
    }

    fn resolve_action(&self, state: &ToyState, def: &ActionDef, rng: &mut dyn RngCore) -> ToyState {
        let mut next = state.clone();

        let succeeded = def.success_probability >= 1.0 || rng.random::<f32>() < def.success_probability;
        if !succeeded {
            if def.has_death_risk() && rng.random::<f32>() < def.death_probability {
                next.hp = 0;
            }
            return next;
        }

        *next.skill_xp.entry(def.skill).or_insert(0) += def.xp_per_action;
        *next.mastery_xp.entry(def.id).or_insert(0) += def.xp_per_action / 10;

        for (item, needed) in &def.inputs {
            let entry = next.inventory.entry(*item).or_insert(0);
            *entry = entry.saturating_sub(*needed);
        }
        for (item, qty) in &def.outputs {
            *next.inventory.entry(*item).or_insert(0) += qty.round() as u64;
        }

        next
    }
}

impl GameSim<ToyState> for ToySim {
    fn apply_interaction(&self, state: &ToyState, interaction: &Interaction, rng: &mut dyn RngCore) -> ToyState {
        let _ = rng;
        self.apply_interaction_deterministic(state, interaction)
    }

    fn apply_interaction_deterministic(&self, state: &ToyState, interaction: &Interaction) -> ToyState {
        let mut next = state.clone();
        match interaction {
            Interaction::SwitchActivity { action_id } => {
                next.active_action = Some(*action_id);
            }
            Interaction::BuyShopItem { purchase_id } => {
                if let Some(purchase) = self.registries.shop_by_id(*purchase_id) {
                    if next.currency >= purchase.cost {
                        next.currency -= purchase.cost;
                        *next.shop_counts.entry(*purchase_id).or_insert(0) += 1;
                        if *purchase_id == AXE_UPGRADE {
                            if let Some(skill) = purchase.affects_skill {
                                if skill == WOODCUTTING {
                                    *next.tool_tiers.entry(crate::types::Tool::Axe).or_insert(0) += 1;
                                }
                            }
                        }
                    }
                }
            }
            Interaction::SellItems { policy } => {
                let items: Vec<_> = next.inventory.keys().copied().collect();
                for item in items {
                    if !policy.sells(item) {
                        continue;
                    }
                    let qty = next.inventory.remove(&item).unwrap_or(0);
                    if qty == 0 {
                        continue;
                    }
                    let price = self.registries.item_by_id(item).map(|i| i.sell_price).unwrap_or(0);
                    next.currency += price * qty as i64;
                }
            }
        }
        next
    }

    fn start_action(&self, state: &ToyState, action: ActionId) -> ToyState {
        let mut next = state.clone();
        next.active_action = Some(action);
        next
    }

    fn is_rate_modelable(&self, _state: &ToyState) -> bool {
        true
    }

    fn advance_expected_value(&self, state: &ToyState, rates: &Rates, delta_ticks: Ticks) -> ToyState {
        let mut next = state.clone();
        let dt = delta_ticks as f64;

        for (skill, rate) in &rates.xp_per_tick {
            *next.skill_xp.entry(*skill).or_insert(0) += (rate * dt).round() as crate::Xp;
        }
        if let Some(action) = rates.action {
            *next.mastery_xp.entry(action).or_insert(0) += (rates.mastery_xp_per_tick * dt).round() as crate::Xp;
        }
        for (item, rate) in &rates.item_flows_per_tick {
            *next.inventory.entry(*item).or_insert(0) += (rate * dt).round() as u64;
        }
        for (item, rate) in &rates.items_consumed_per_tick {
            let entry = next.inventory.entry(*item).or_insert(0);
            *entry = entry.saturating_sub((rate * dt).round() as u64);
        }

        next
    }

    fn advance_full_simulation(&self, state: &ToyState, delta_ticks: Ticks, seed: u64) -> ToyState {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
        let (next, _, _) = self.run_ticks(state, delta_ticks, &mut rng, |_| false);
        next
    }

    fn consume_ticks_until(
        &self,
        state: &ToyState,
        wait_for: &WaitFor,
        max_ticks: Ticks,
        rng: &mut dyn RngCore,
    ) -> (ToyState, Ticks, StopReason) {
        self.run_ticks(state, max_ticks, rng, |s| {
            wait_for.is_satisfied(s, self.value_model.effective_credits(s))
        })
    }

    fn success_probability(&self, _state: &ToyState, action: ActionId) -> Probability {
        self.registries.action_by_id(action).map(|a| a.success_probability).unwrap_or(1.0)
    }
}
