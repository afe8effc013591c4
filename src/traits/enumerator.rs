use crate::traits::GameState;
use crate::types::Candidates;

/// Enumerates the legal next moves from a state: zero-time interactions,
/// plus the macro candidates worth considering from here. Grounded on the
/// teacher's `TreeInfo`/legal-actions enumeration (`mccfr::infoset`) —
/// same shape, "given this node, what can be tried next", generalized
/// from a fixed small action set to a goal- and registry-driven one.
pub trait CandidateEnumerator<S: GameState> {
    /// Every candidate reachable from `state` without advancing time:
    /// zero-time interactions (shop purchases, recipe switches, sells)
    /// plus the macro candidates whose prerequisites are already met or
    /// resolvable (`spec.md` §4.6/§4.7).
    fn enumerate(&self, state: &S, goal: &crate::types::Goal) -> Candidates;
}
