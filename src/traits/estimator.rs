use crate::traits::GameState;
use crate::types::{ActionId, Rates};

/// Converts a state's currently-active (or hypothetically active) action
/// into per-tick flows. Out of scope per `spec.md` §1 — the combat/loot
/// model lives in the game collaborator — the core only consumes `Rates`.
pub trait Estimator<S: GameState> {
    /// Rates for whatever action `state` currently has active. Empty
    /// `Rates::default()` if nothing is active.
    fn estimate_rates(&self, state: &S) -> Rates;

    /// Rates for `action`, as if it were active in `state`, without
    /// requiring it to actually be running. Used by the Rate Cache to
    /// score every unlocked action, not just the current one.
    fn estimate_rates_for_action(&self, state: &S, action: ActionId) -> Rates;
}
