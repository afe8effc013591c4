use crate::traits::GameState;
use crate::Gold;

/// Converts a state into a scalar the A* driver can use to break ties or
/// weigh off-goal side effects (banked gold left over after a skill goal,
/// say). Out of scope for the admissible heuristic itself (§4.3 only ever
/// uses `Rates`) — `ValueModel` is consulted by the driver's tie-break and
/// by the Segment loop when picking among equally-satisfying boundaries.
pub trait ValueModel<S: GameState> {
    /// Scalar value-per-tick of continuing in `state` doing nothing
    /// goal-directed — used to rank otherwise-tied plans.
    fn value_per_tick(&self, state: &S) -> f64;

    /// Gold-equivalent credit a state carries toward goals that care about
    /// currency, net of the cost already sunk into shop purchases.
    fn effective_credits(&self, state: &S) -> Gold;
}
