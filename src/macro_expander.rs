//! Macro Expander (`spec.md` §4.7): resolves prerequisites and projects a
//! macro candidate into a future state plus a composite stop condition.
//! Grounded on the teacher's `mccfr::solver::Solver::train` outer loop
//! shape — iterate, handle a recoverable condition, retry, bounded by a
//! depth cap — generalized from CFR iteration to prerequisite depth.

use crate::advance::{self, AdvanceResult};
use crate::config::SolverConfig;
use crate::error::MacroOutcome;
use crate::prerequisite::{self, ExecStatus};
use crate::rate_cache::DEATH_RESTART_OVERHEAD_TICKS;
use crate::rate_cache::RateCache;
use crate::traits::{Estimator, GameSim, GameState, Registries, ValueModel};
use crate::types::{ActionId, Goal, MacroCandidate, Rates, WaitFor};
use crate::Ticks;

#[derive(Debug, Clone)]
pub struct ExpandResult<S> {
    pub state: S,
    pub ticks_elapsed: Ticks,
    pub wait_for: WaitFor,
    pub deaths: f64,
    pub triggering_condition: WaitFor,
    pub macro_candidate: MacroCandidate,
}

enum ActionSearch {
    Found(ActionId),
    Prereq(MacroCandidate),
    Dead(String),
}

#[allow(clippy::too_many_arguments)]
pub fn expand<S, E, R, G, V>(
    state: &S,
    macro_candidate: MacroCandidate,
    goal: &Goal,
    registries: &R,
    estimator: &E,
    sim: &G,
    value_model: &V,
    rate_cache: &mut RateCache,
    config: &SolverConfig,
    seed: u64,
) -> MacroOutcome<S>
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
    G: GameSim<S>,
    V: ValueModel<S>,
{
    let _ = rate_cache;
    let mut current_state = state.clone();
    let mut current_macro = macro_candidate;

    for depth in 0..config.max_prereq_depth {
        let wait_for = current_macro.composite_wait_for(&current_state, registries);
        let credits = value_model.effective_credits(&current_state);
        if wait_for.is_satisfied(&current_state, credits) {
            return MacroOutcome::AlreadySatisfied { reason: format!("{wait_for} already true") };
        }

        match resolve_action(&current_state, &current_macro, goal, estimator, registries, config) {
            ActionSearch::Found(action_id) => {
                return expand_with_action(
                    &current_state,
                    current_macro,
                    action_id,
                    wait_for,
                    estimator,
                    sim,
                    value_model,
                    seed,
                );
            }
            ActionSearch::Prereq(prereq) => {
                log::debug!("macro_expander: depth {depth} swapping to prerequisite {prereq:?}");
                current_macro = prereq;
                continue;
            }
            ActionSearch::Dead(reason) => {
                return MacroOutcome::CannotExpand { reason };
            }
        }
    }

    MacroOutcome::CannotExpand { reason: "max prerequisite depth exceeded".into() }
}

fn expand_with_action<S, E, G, V>(
    state: &S,
    macro_candidate: MacroCandidate,
    action_id: ActionId,
    wait_for: WaitFor,
    estimator: &E,
    sim: &G,
    value_model: &V,
    seed: u64,
) -> MacroOutcome<S>
where
    S: GameState,
    E: Estimator<S>,
    G: GameSim<S>,
    V: ValueModel<S>,
{
    let started = if state.active_action() == Some(action_id) {
        state.clone()
    } else {
        sim.start_action(state, action_id)
    };

    let raw_rates = estimator.estimate_rates(&started);
    let rates = if raw_rates.has_death_risk() {
        raw_rates.cycle_adjusted(DEATH_RESTART_OVERHEAD_TICKS)
    } else {
        raw_rates
    };

    let credits = value_model.effective_credits(&started);
    let Some(ticks) = estimate_ticks_to_satisfy(&wait_for, &started, &rates, credits) else {
        return MacroOutcome::CannotExpand { reason: format!("no rate data to project {wait_for}") };
    };

    let delta_ticks = ticks.ceil().max(0.0) as Ticks;
    let AdvanceResult { state: advanced, expected_deaths } =
        advance::advance(&started, delta_ticks, estimator, sim, seed);

    MacroOutcome::Expanded(ExpandResult {
        state: advanced,
        ticks_elapsed: delta_ticks,
        wait_for: wait_for.clone(),
        deaths: expected_deaths,
        triggering_condition: wait_for,
        macro_candidate,
    })
}

fn resolve_action<S, E, R>(
    state: &S,
    macro_candidate: &MacroCandidate,
    goal: &Goal,
    estimator: &E,
    registries: &R,
    config: &SolverConfig,
) -> ActionSearch
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
{
    match macro_candidate {
        MacroCandidate::TrainSkillUntil { skill, .. } | MacroCandidate::TrainConsumingSkillUntil { skill, .. } => {
            find_best_action_for_skill(state, *skill, goal, estimator, registries, config)
        }
        MacroCandidate::AcquireItem { item_id, .. } | MacroCandidate::EnsureStock { item_id, .. } => {
            find_best_producer(state, *item_id, estimator, registries, config)
        }
        MacroCandidate::ProduceItem { action_id, .. } => {
            match prerequisite::ensure_executable(state, *action_id, registries, config.max_ensure_exec_depth) {
                Ok(ExecStatus::Ready) => ActionSearch::Found(*action_id),
                Ok(ExecStatus::NeedsPrerequisite(prereq)) => ActionSearch::Prereq(prereq),
                Err(e) => ActionSearch::Dead(e.to_string()),
            }
        }
    }
}

/// `spec.md` §9's open question: use goal-weighted rate when `skill` is
/// goal-relevant, raw xp-rate otherwise — preserves the reference's
/// distinction between training the goal skill and training a
/// prerequisite skill along the way.
fn find_best_action_for_skill<S, E, R>(
    state: &S,
    skill: crate::types::SkillId,
    goal: &Goal,
    estimator: &E,
    registries: &R,
    config: &SolverConfig,
) -> ActionSearch
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
{
    let mut best: Option<(ActionId, f64)> = None;
    let mut prereq: Option<MacroCandidate> = None;
    let mut dead_reason = format!("no action trains {skill}");

    for action in registries.actions_for_skill(skill) {
        if state.skill_level(skill) < action.unlock_level {
            continue;
        }
        match prerequisite::ensure_executable(state, action.id, registries, config.max_ensure_exec_depth) {
            Ok(ExecStatus::Ready) => {
                let raw = estimator.estimate_rates_for_action(state, action.id);
                let raw = if raw.has_death_risk() { raw.cycle_adjusted(DEATH_RESTART_OVERHEAD_TICKS) } else { raw };
                let xp_rate = *raw.xp_per_tick.get(&skill).unwrap_or(&0.0);
                let gold_rate = RateCache::gold_rate(&raw, registries);
                let rate = if goal.is_skill_relevant(skill) {
                    goal.activity_rate(skill, gold_rate, xp_rate)
                } else {
                    xp_rate
                };
                if rate > best.map(|(_, r)| r).unwrap_or(0.0) {
                    best = Some((action.id, rate));
                }
            }
            Ok(ExecStatus::NeedsPrerequisite(candidate)) => {
                if prereq.is_none() {
                    prereq = Some(candidate);
                }
            }
            Err(e) => {
                dead_reason = e.to_string();
            }
        }
    }

    match (best, prereq) {
        (Some((id, rate)), _) if rate > 0.0 => ActionSearch::Found(id),
        (_, Some(p)) => ActionSearch::Prereq(p),
        _ => ActionSearch::Dead(dead_reason),
    }
}

fn find_best_producer<S, E, R>(
    state: &S,
    item_id: crate::types::ItemId,
    estimator: &E,
    registries: &R,
    config: &SolverConfig,
) -> ActionSearch
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
{
    let mut best: Option<(ActionId, f64)> = None;
    let mut prereq: Option<MacroCandidate> = None;

    for producer in registries.producers_of(item_id) {
        if state.skill_level(producer.skill) < producer.unlock_level {
            if prereq.is_none() {
                prereq = Some(MacroCandidate::TrainSkillUntil {
                    skill: producer.skill,
                    primary_stop: crate::types::MacroStopRule::AtSkillLevel {
                        skill: producer.skill,
                        level: producer.unlock_level,
                    },
                    watched_stops: vec![],
                });
            }
            continue;
        }
        if let Ok(ExecStatus::Ready) = prerequisite::ensure_executable(state, producer.id, registries, config.max_ensure_exec_depth) {
            let raw = estimator.estimate_rates_for_action(state, producer.id);
            let rate = *raw.item_flows_per_tick.get(&item_id).unwrap_or(&0.0);
            if rate > best.map(|(_, r)| r).unwrap_or(0.0) {
                best = Some((producer.id, rate));
            }
        }
    }

    match (best, prereq) {
        (Some((id, rate)), _) if rate > 0.0 => ActionSearch::Found(id),
        (_, Some(p)) => ActionSearch::Prereq(p),
        _ => ActionSearch::Dead(format!("no producer for {item_id}")),
    }
}

fn estimate_ticks_to_satisfy<S: GameState>(
    wait_for: &WaitFor,
    state: &S,
    rates: &Rates,
    effective_credits: crate::Gold,
) -> Option<f64> {
    match wait_for {
        WaitFor::SkillXp { skill, target_xp } => {
            let remaining = target_xp.saturating_sub(state.skill_xp(*skill)) as f64;
            if remaining <= 0.0 {
                return Some(0.0);
            }
            let rate = *rates.xp_per_tick.get(skill).unwrap_or(&0.0);
            (rate > 0.0).then(|| remaining / rate)
        }
        WaitFor::InventoryValue { .. } => Some(0.0),
        WaitFor::InventoryAtLeast { item_id, count } => {
            let have = state.inventory_count(*item_id) as f64;
            let need = (*count as f64 - have).max(0.0);
            if need <= 0.0 {
                return Some(0.0);
            }
            let rate = *rates.item_flows_per_tick.get(item_id).unwrap_or(&0.0);
            (rate > 0.0).then(|| need / rate)
        }
        WaitFor::InputsDepleted { action_id } => {
            let _ = action_id;
            rates
                .items_consumed_per_tick
                .iter()
                .filter(|(_, rate)| **rate > 0.0)
                .map(|(item, rate)| state.inventory_count(*item) as f64 / rate)
                .fold(None, |acc, t| Some(acc.map_or(t, |a: f64| a.min(t))))
        }
        WaitFor::Goal(goal) => {
            // Only reachable for segment-boundary macros; fall back to the
            // goal's own combined progress rate.
            let rate = goal.progress_per_tick(rates);
            let remaining = goal.remaining(state, effective_credits) as f64;
            if remaining <= 0.0 {
                Some(0.0)
            } else {
                (rate > 0.0).then(|| remaining / rate)
            }
        }
        WaitFor::AnyOf(conditions) => conditions
            .iter()
            .filter_map(|c| estimate_ticks_to_satisfy(c, state, rates, effective_credits))
            .fold(None, |acc, t| Some(acc.map_or(t, |a: f64| a.min(t)))),
    }
}
