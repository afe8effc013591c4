//! Next-Decision-Delta (`spec.md` §4.6): the minimum positive number of
//! ticks until any watched event could change the optimal decision.
//! Grounded on the teacher's regret-matching step size selection in
//! `mccfr::solver` — same shape of "compute the smallest step that could
//! possibly invalidate the current choice," generalized from a CFR
//! iteration count to simulated ticks.

use crate::rate_cache::{RateCache, DEATH_RESTART_OVERHEAD_TICKS};
use crate::traits::{Estimator, GameState, Registries, ValueModel};
use crate::types::{ActionId, Candidates, Goal, WaitFor};
use crate::Ticks;

#[derive(Debug, Clone)]
pub struct DecisionDelta {
    pub delta_ticks: Ticks,
    pub wait_for: WaitFor,
    pub intended_action: Option<ActionId>,
    pub is_dead_end: bool,
}

#[derive(Debug, Clone, Copy)]
enum Source {
    GoalCrossing,
    Upgrade(crate::types::PurchaseId),
    SkillUnlock(ActionId),
    InputDepletion,
}

pub fn compute<S, E, R, V>(
    state: &S,
    goal: &Goal,
    candidates: &Candidates,
    rate_cache: &mut RateCache,
    estimator: &E,
    registries: &R,
    value_model: &V,
) -> DecisionDelta
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
    V: ValueModel<S>,
{
    let raw_rates = estimator.estimate_rates(state);
    let rates = if raw_rates.has_death_risk() {
        raw_rates.cycle_adjusted(DEATH_RESTART_OVERHEAD_TICKS)
    } else {
        raw_rates
    };

    let mut candidates_ticks: Vec<(f64, Source)> = Vec::new();

    if candidates.watch_set.goal_crossing {
        let (best_rate, _) = rate_cache.best_unlocked_rate(state, goal, estimator, registries);
        if best_rate > 0.0 {
            let remaining = goal.remaining(state, value_model.effective_credits(state)) as f64;
            if remaining > 0.0 {
                candidates_ticks.push((remaining / best_rate, Source::GoalCrossing));
            }
        }
    }

    for purchase_id in &candidates.watch_set.upgrade_affordability {
        if let Some(purchase) = registries.shop_by_id(*purchase_id) {
            let credits = value_model.effective_credits(state);
            if credits < purchase.cost {
                let credit_rate = value_model.value_per_tick(state);
                if credit_rate > 0.0 {
                    let ticks = (purchase.cost - credits) as f64 / credit_rate;
                    candidates_ticks.push((ticks, Source::Upgrade(*purchase_id)));
                }
            }
        }
    }

    for action_id in &candidates.watch_set.skill_unlocks {
        if let Some(action) = registries.action_by_id(*action_id) {
            let level = state.skill_level(action.skill);
            if level < action.unlock_level {
                let target_xp = state.xp_required_for_level(action.skill, action.unlock_level);
                let remaining_xp = target_xp.saturating_sub(state.skill_xp(action.skill));
                let xp_rate = *rates.xp_per_tick.get(&action.skill).unwrap_or(&0.0);
                if xp_rate > 0.0 && remaining_xp > 0 {
                    candidates_ticks.push((remaining_xp as f64 / xp_rate, Source::SkillUnlock(*action_id)));
                }
            }
        }
    }

    if let Some(active) = state.active_action() {
        if !candidates.watch_set.input_depletion.is_empty() {
            if let Some(action_def) = registries.action_by_id(active) {
                for (item, _needed) in &action_def.inputs {
                    if !candidates.watch_set.input_depletion.contains(item) {
                        continue;
                    }
                    let consumption_rate = *rates.items_consumed_per_tick.get(item).unwrap_or(&0.0);
                    if consumption_rate > 0.0 {
                        let on_hand = state.inventory_count(*item) as f64;
                        candidates_ticks.push((on_hand / consumption_rate, Source::InputDepletion));
                    }
                }
            }
        }
    }

    let has_interaction_candidate = !candidates.switch_to_activities.is_empty()
        || !candidates.buy_upgrades.is_empty()
        || !candidates.macros.is_empty()
        || candidates.should_emit_sell_candidate;

    let Some((min_ticks, source)) = candidates_ticks
        .into_iter()
        .min_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    else {
        return DecisionDelta {
            delta_ticks: 0,
            wait_for: WaitFor::Goal(Box::new(goal.clone())),
            intended_action: state.active_action(),
            is_dead_end: !has_interaction_candidate,
        };
    };

    let delta_ticks = min_ticks.ceil().max(0.0) as Ticks;
    let wait_for = match source {
        Source::GoalCrossing => WaitFor::Goal(Box::new(goal.clone())),
        Source::Upgrade(purchase_id) => {
            let target = registries.shop_by_id(purchase_id).map(|p| p.cost).unwrap_or(0);
            WaitFor::InventoryValue { target }
        }
        Source::SkillUnlock(action_id) => {
            let action = registries.action_by_id(action_id);
            match action {
                Some(action) => WaitFor::SkillXp {
                    skill: action.skill,
                    target_xp: state.xp_required_for_level(action.skill, action.unlock_level),
                },
                None => WaitFor::Goal(Box::new(goal.clone())),
            }
        }
        Source::InputDepletion => WaitFor::InputsDepleted {
            action_id: state.active_action().unwrap_or(ActionId(0)),
        },
    };

    log::trace!("decision_delta: {delta_ticks} ticks, source={source:?}, wait_for={wait_for}");

    DecisionDelta {
        delta_ticks,
        wait_for,
        intended_action: state.active_action(),
        is_dead_end: false,
    }
}
