//! Consume-Until (`spec.md` §4.5): the goal-aware executor. Drives a wait
//! edge to completion against the real (stochastic) tick engine, handling
//! death/restart and producer-switching on input depletion. Grounded on
//! the teacher's `mccfr::solver::Solver::train` retry-on-recoverable-
//! condition loop, generalized from "regret update failed, retry" to
//! "action died/depleted, restart/reswitch."

use crate::config::SolverConfig;
use crate::error::ReplanBoundary;
use crate::traits::{Estimator, GameSim, GameState, Registries, ValueModel};
use crate::types::WaitFor;
use crate::Ticks;
use rand::RngCore;

#[derive(Debug, Clone)]
pub struct ConsumeResult<S> {
    pub state: S,
    pub ticks_elapsed: Ticks,
    pub death_count: u32,
    pub boundary: ReplanBoundary,
}

#[allow(clippy::too_many_arguments)]
pub fn consume_until<S, G, R, E, V>(
    state: &S,
    wait_for: &WaitFor,
    registries: &R,
    estimator: &E,
    sim: &G,
    value_model: &V,
    config: &SolverConfig,
    max_ticks: Ticks,
    rng: &mut dyn RngCore,
) -> ConsumeResult<S>
where
    S: GameState,
    G: GameSim<S>,
    R: Registries,
    E: Estimator<S>,
    V: ValueModel<S>,
{
    if wait_for.is_satisfied(state, value_model.effective_credits(state)) {
        return ConsumeResult {
            state: state.clone(),
            ticks_elapsed: 0,
            death_count: 0,
            boundary: ReplanBoundary::WaitConditionSatisfied,
        };
    }

    let original_action = state.active_action();
    let mut current = state.clone();
    let mut ticks_elapsed: Ticks = 0;
    let mut death_count = 0u32;

    loop {
        let progress_before = wait_for.progress(&current, value_model.effective_credits(&current));
        let remaining_budget = max_ticks.saturating_sub(ticks_elapsed);
        let (next_state, ticks, stop_reason) =
            sim.consume_ticks_until(&current, wait_for, remaining_budget, rng);
        current = next_state;
        ticks_elapsed = ticks_elapsed.saturating_add(ticks);

        if ticks_elapsed >= max_ticks
            && wait_for.progress(&current, value_model.effective_credits(&current)) <= progress_before
        {
            return ConsumeResult {
                state: current,
                ticks_elapsed,
                death_count,
                boundary: ReplanBoundary::NoProgressPossible {
                    reason: format!("hit maxTicks with no progress on {wait_for}"),
                },
            };
        }

        if wait_for.is_satisfied(&current, value_model.effective_credits(&current)) {
            return ConsumeResult {
                state: current,
                ticks_elapsed,
                death_count,
                boundary: ReplanBoundary::WaitConditionSatisfied,
            };
        }

        match stop_reason {
            crate::traits::sim::StopReason::Satisfied => {
                return ConsumeResult {
                    state: current,
                    ticks_elapsed,
                    death_count,
                    boundary: ReplanBoundary::WaitConditionSatisfied,
                };
            }
            crate::traits::sim::StopReason::Died => {
                death_count += 1;
                log::warn!("consume_until: death #{death_count} while waiting for {wait_for}");
                match original_action {
                    Some(action) => {
                        current = sim.start_action(&current, action);
                        continue;
                    }
                    None => {
                        return ConsumeResult { state: current, ticks_elapsed, death_count, boundary: ReplanBoundary::Death };
                    }
                }
            }
            crate::traits::sim::StopReason::InputsDepleted { action_id } => {
                let is_skill_xp_wait = matches!(wait_for, WaitFor::SkillXp { .. });
                let action_def = registries.action_by_id(action_id).filter(|a| a.is_consuming());
                if is_skill_xp_wait {
                    if let Some(action_def) = action_def {
                        match restock_input(&current, action_def, registries, estimator, sim, value_model, config, max_ticks.saturating_sub(ticks_elapsed), rng) {
                            Ok((restocked, restock_ticks)) => {
                                current = restocked;
                                ticks_elapsed = ticks_elapsed.saturating_add(restock_ticks);
                                current = sim.start_action(&current, action_id);
                                continue;
                            }
                            Err(boundary) => {
                                return ConsumeResult { state: current, ticks_elapsed, death_count, boundary };
                            }
                        }
                    }
                }
                return ConsumeResult {
                    state: current,
                    ticks_elapsed,
                    death_count,
                    boundary: ReplanBoundary::InputsDepleted { action_id, missing_item: None },
                };
            }
            crate::traits::sim::StopReason::TickBudgetExhausted => {
                return ConsumeResult {
                    state: current,
                    ticks_elapsed,
                    death_count,
                    boundary: ReplanBoundary::NoProgressPossible {
                        reason: format!("tick budget exhausted waiting for {wait_for}"),
                    },
                };
            }
        }
    }
}

/// Locate a producer for the depleted input, switch to it, and wait for a
/// buffer of `CONSUME_BUFFER_TICKS` worth of supply before handing control
/// back (`spec.md` §4.5 step 5, "Inputs depleted").
#[allow(clippy::too_many_arguments)]
fn restock_input<S, G, R, E, V>(
    state: &S,
    action_def: &crate::traits::registries::ActionDef,
    registries: &R,
    estimator: &E,
    sim: &G,
    value_model: &V,
    config: &SolverConfig,
    remaining_ticks: Ticks,
    rng: &mut dyn RngCore,
) -> Result<(S, Ticks), ReplanBoundary>
where
    S: GameState,
    G: GameSim<S>,
    R: Registries,
    E: Estimator<S>,
    V: ValueModel<S>,
{
    let missing = action_def
        .inputs
        .iter()
        .find(|(item, needed)| state.inventory_count(*item) < *needed)
        .or_else(|| action_def.inputs.first())
        .ok_or(ReplanBoundary::InputsDepleted { action_id: action_def.id, missing_item: None })?;
    let (item_id, needed_per_action) = *missing;

    let mut best_producer = None;
    let mut best_rate = 0.0f64;
    for producer in registries.producers_of(item_id) {
        if state.skill_level(producer.skill) < producer.unlock_level {
            continue;
        }
        let rate = *estimator
            .estimate_rates_for_action(state, producer.id)
            .item_flows_per_tick
            .get(&item_id)
            .unwrap_or(&0.0);
        if rate > best_rate {
            best_rate = rate;
            best_producer = Some(producer.id);
        }
    }

    let Some(producer_id) = best_producer else {
        return Err(ReplanBoundary::InputsDepleted { action_id: action_def.id, missing_item: Some(item_id) });
    };

    let switched = sim.start_action(state, producer_id);
    let ticks_per_unit = if needed_per_action > 0 {
        action_def.mean_duration_ticks as f64 / needed_per_action as f64
    } else {
        action_def.mean_duration_ticks as f64
    };
    let buffer_count = if ticks_per_unit > 0.0 {
        (config.consume_buffer_ticks as f64 / ticks_per_unit).ceil() as u64
    } else {
        needed_per_action
    };
    let target = state.inventory_count(item_id) + buffer_count.max(needed_per_action);

    let restock_wait = WaitFor::InventoryAtLeast { item_id, count: target };
    let result = consume_until(&switched, &restock_wait, registries, estimator, sim, value_model, config, remaining_ticks, rng);
    match result.boundary {
        ReplanBoundary::WaitConditionSatisfied => Ok((result.state, result.ticks_elapsed)),
        other => Err(other),
    }
}
