//! State Advance (`spec.md` §4.4): deterministic expected-value
//! fast-forward, with a full-simulation fallback for activities the
//! estimator cannot rate-model. Grounded on the teacher's
//! `gameplay::game::Game::apply`, generalized from "apply one edge" to
//! "apply `delta_ticks` of simulated time."

use crate::rate_cache::DEATH_RESTART_OVERHEAD_TICKS;
use crate::traits::{Estimator, GameSim, GameState};
use crate::types::ActionId;
use crate::Ticks;

#[derive(Debug, Clone)]
pub struct AdvanceResult<S> {
    pub state: S,
    pub expected_deaths: f64,
}

/// Advance `state` by `delta_ticks`, using the expected-value path when
/// the active action can be rate-modeled and falling back to full
/// simulation otherwise. `seed` is only consulted by the fallback path
/// (`spec.md` §5: "a single fixed seed used only by the full-simulation
/// advance fallback for combat states").
pub fn advance<S, E, G>(state: &S, delta_ticks: Ticks, estimator: &E, sim: &G, seed: u64) -> AdvanceResult<S>
where
    S: GameState,
    E: Estimator<S>,
    G: GameSim<S>,
{
    if delta_ticks == 0 {
        return AdvanceResult { state: state.clone(), expected_deaths: 0.0 };
    }

    if !sim.is_rate_modelable(state) {
        log::debug!("advance: falling back to full simulation for {delta_ticks} ticks");
        return AdvanceResult {
            state: sim.advance_full_simulation(state, delta_ticks, seed),
            expected_deaths: 0.0,
        };
    }

    let raw_rates = estimator.estimate_rates(state);
    let (rates, expected_deaths) = if raw_rates.has_death_risk() {
        let adjusted = raw_rates.cycle_adjusted(DEATH_RESTART_OVERHEAD_TICKS);
        let deaths = raw_rates
            .ticks_until_death
            .map(|t| if t > 0.0 { delta_ticks as f64 / t } else { 0.0 })
            .unwrap_or(0.0);
        (adjusted, deaths)
    } else {
        (raw_rates, 0.0)
    };

    log::trace!("advance: {delta_ticks} ticks via expected value, expected_deaths={expected_deaths}");
    let next_state = sim.advance_expected_value(state, &rates, delta_ticks);
    AdvanceResult { state: next_state, expected_deaths }
}

/// Convenience used by macro expansion (§4.7), which advances under a
/// hypothetical action rather than the state's currently-active one.
pub fn advance_under_action<S, E, G>(
    state: &S,
    action: ActionId,
    delta_ticks: Ticks,
    estimator: &E,
    sim: &G,
    seed: u64,
) -> AdvanceResult<S>
where
    S: GameState,
    E: Estimator<S>,
    G: GameSim<S>,
{
    let started = if state.active_action() == Some(action) {
        state.clone()
    } else {
        sim.start_action(state, action)
    };
    advance(&started, delta_ticks, estimator, sim, seed)
}
