use crate::traits::GameState;
use crate::types::{ActionId, Interaction};
use crate::{Probability, Ticks};
use rand::RngCore;

/// Why a `consume_ticks_until` run stopped. Mirrors the stop-rule menu in
/// `WaitFor`/`MacroStopRule`, plus the two outcomes unique to simulation:
/// dying mid-run, and running out of simulated ticks before any stop rule
/// fired (the caller's horizon estimate was too short).
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    Satisfied,
    Died,
    InputsDepleted { action_id: ActionId },
    TickBudgetExhausted,
}

/// The only trait whose methods actually step simulated time (`spec.md`
/// §4.4/§4.5/§4.10). Every other collaborator trait is a pure read of a
/// `GameState`; `GameSim` is where the stochastic game itself lives, in
/// the same way the teacher's `Game::apply` is the one place tree edges
/// turn into concrete next states.
pub trait GameSim<S: GameState> {
    /// Apply a single interaction (zero-time by construction, `spec.md`
    /// invariant 1) and return the resulting state. Must never consume
    /// ticks, even for interactions with a non-deterministic outcome
    /// (shop purchases, recipe selection) — those resolve their
    /// randomness at the moment of application, not across ticks.
    fn apply_interaction(&self, state: &S, interaction: &Interaction, rng: &mut dyn RngCore) -> S;

    /// Deterministic, no-RNG variant used by the A* driver during search
    /// (it reasons in expectation, never by sampling) — the executor uses
    /// `apply_interaction` instead, once actually playing a plan out.
    fn apply_interaction_deterministic(&self, state: &S, interaction: &Interaction) -> S;

    /// Start (or switch to) an action without advancing time.
    fn start_action(&self, state: &S, action: ActionId) -> S;

    /// `true` if `state`'s active action can be advanced in O(1) via
    /// expected-value rates (`spec.md` §4.4) rather than needing a full
    /// tick-by-tick simulation (combat, ad-hoc activities).
    fn is_rate_modelable(&self, state: &S) -> bool;

    /// Apply `rates` (already cycle-adjusted by the caller if the action
    /// has death risk) over `delta_ticks` of simulated time in one shot:
    /// xp/mastery gains, inventory additions/removals, currency gain.
    /// This is the only place the core turns a `Rates` into a concrete
    /// next `S` — the collaborator owns how `S` is actually constructed.
    fn advance_expected_value(&self, state: &S, rates: &crate::types::Rates, delta_ticks: Ticks) -> S;

    /// Full-simulation fallback (`spec.md` §4.4): invokes the game's own
    /// tick loop with a deterministic seed for `delta_ticks` ticks.
    fn advance_full_simulation(&self, state: &S, delta_ticks: Ticks, seed: u64) -> S;

    /// Advance `state` tick-by-tick, stochastically, until `wait_for` is
    /// satisfied or `max_ticks` elapses, whichever comes first. This is
    /// the one place death/restart and input depletion are actually
    /// resolved rather than estimated — the Consume-Until executor's core
    /// primitive (§4.5).
    fn consume_ticks_until(
        &self,
        state: &S,
        wait_for: &crate::types::WaitFor,
        max_ticks: Ticks,
        rng: &mut dyn RngCore,
    ) -> (S, Ticks, StopReason);

    /// Probability `action` succeeds on a single attempt (thieving-like
    /// actions only; 1.0 for ordinary skilling actions).
    fn success_probability(&self, state: &S, action: ActionId) -> Probability;
}
