//! Toy collaborator (`SPEC_FULL.md` §G): a minimal concrete implementation
//! of every collaborator trait, used by the crate's own tests, benches,
//! and CLI binaries. Not part of the planning core itself — grounded on
//! the teacher's `src/gameplay` module, which plays the same role for
//! `mccfr` (a small concrete game the abstract solver can be exercised
//! against without pulling in a real client).
//!
//! Three skills: Woodcutting (non-consuming, produces logs), Firemaking
//! (consuming: burns logs for xp), Thieving (death/stun risk). One shop
//! upgrade (an axe tier that speeds up woodcutting).

pub mod enumerator;
pub mod estimator;
pub mod registries;
pub mod sim;
pub mod state;
pub mod value;

pub use enumerator::ToyEnumerator;
pub use estimator::ToyEstimator;
pub use registries::ToyRegistries;
pub use sim::ToySim;
pub use state::ToyState;
pub use value::ToyValueModel;

use crate::types::{ActionId, ItemId, PurchaseId, SkillId};

pub const WOODCUTTING: SkillId = SkillId(0);
pub const FIREMAKING: SkillId = SkillId(1);
pub const THIEVING: SkillId = SkillId(2);

pub const LOGS: ItemId = ItemId(0);
pub const STOLEN_GOODS: ItemId = ItemId(1);

pub const CHOP_WOOD: ActionId = ActionId(0);
pub const BURN_LOGS: ActionId = ActionId(1);
pub const STEAL: ActionId = ActionId(2);

pub const AXE_UPGRADE: PurchaseId = PurchaseId(0);

/// xp needed to go from level `n` to `n+1`, flat per `SPEC_FULL.md` §G —
/// the toy world doesn't model the original's escalating curve, just
/// enough nonlinearity (via `mastery`) to exercise the planner.
pub const XP_PER_LEVEL: crate::Xp = 100;

pub fn level_for_xp(xp: crate::Xp) -> u32 {
    (xp / XP_PER_LEVEL) as u32 + 1
}

pub fn xp_for_level(level: u32) -> crate::Xp {
    if level <= 1 {
        0
    } else {
        (level as u64 - 1) * XP_PER_LEVEL
    }
}

/// Bundles one of every collaborator the toy world needs, sharing a
/// single `ToyRegistries` handle the way `spec.md` §5 requires.
pub struct ToyWorld {
    pub registries: std::sync::Arc<ToyRegistries>,
    pub estimator: ToyEstimator,
    pub sim: ToySim,
    pub value_model: ToyValueModel,
    pub enumerator: ToyEnumerator,
}

impl ToyWorld {
    pub fn new() -> Self {
        let registries = std::sync::Arc::new(ToyRegistries::new());
        Self {
            estimator: ToyEstimator::new(registries.clone()),
            sim: ToySim::new(registries.clone()),
            value_model: ToyValueModel::new(registries.clone()),
            enumerator: ToyEnumerator::new(registries.clone()),
            registries,
        }
    }

    pub fn initial_state(&self) -> ToyState {
        ToyState::new()
    }
}

impl Default for ToyWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::driver::{self, SolveOutcome};
    use crate::replan::{self, ReplanOutcome};
    use crate::segment;
    use crate::types::Goal;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn already_satisfied_returns_empty_plan() {
        let world = ToyWorld::new();
        let state = world.initial_state();
        let goal = Goal::ReachSkillLevel { skill: WOODCUTTING, target_level: 1 };
        let config = SolverConfig::default();
        match driver::solve(
            &state,
            &goal,
            world.registries.as_ref(),
            &world.estimator,
            &world.sim,
            &world.value_model,
            &world.enumerator,
            &config,
            1,
        ) {
            SolveOutcome::Success { plan, .. } => assert!(plan.steps.is_empty()),
            SolveOutcome::Failed { failure, .. } => panic!("expected success, got {failure}"),
        }
    }

    #[test]
    fn single_skill_woodcutting_goal_solves() {
        let world = ToyWorld::new();
        let state = world.initial_state();
        let goal = Goal::ReachSkillLevel { skill: WOODCUTTING, target_level: 3 };
        let config = SolverConfig::default();
        match driver::solve(
            &state,
            &goal,
            world.registries.as_ref(),
            &world.estimator,
            &world.sim,
            &world.value_model,
            &world.enumerator,
            &config,
            1,
        ) {
            SolveOutcome::Success { terminal_state, .. } => {
                assert!(terminal_state.skill_level(WOODCUTTING) >= 3);
            }
            SolveOutcome::Failed { failure, .. } => panic!("expected success, got {failure}"),
        }
    }

    #[test]
    fn currency_goal_requiring_upgrade_uses_segment_loop() {
        let world = ToyWorld::new();
        let state = world.initial_state();
        let goal = Goal::ReachCurrency { target: 150 };
        let config = SolverConfig::default();
        let segments = segment::solve_to_goal(
            &state,
            &goal,
            world.registries.as_ref(),
            &world.estimator,
            &world.sim,
            &world.value_model,
            &world.enumerator,
            &config,
            1,
        )
        .expect("segment loop should succeed");
        let last = segments.last().expect("at least one segment");
        assert!(last.terminal_state.currency() >= 150);
    }

    #[test]
    fn multi_skill_conjunction_solves() {
        let world = ToyWorld::new();
        let state = world.initial_state();
        let goal = Goal::MultiSkill { subgoals: vec![(WOODCUTTING, 2), (FIREMAKING, 2)] };
        let config = SolverConfig::default();
        match driver::solve(
            &state,
            &goal,
            world.registries.as_ref(),
            &world.estimator,
            &world.sim,
            &world.value_model,
            &world.enumerator,
            &config,
            1,
        ) {
            SolveOutcome::Success { terminal_state, .. } => {
                assert!(terminal_state.skill_level(WOODCUTTING) >= 2);
                assert!(terminal_state.skill_level(FIREMAKING) >= 2);
            }
            SolveOutcome::Failed { failure, .. } => panic!("expected success, got {failure}"),
        }
    }

    #[test]
    fn consuming_skill_auto_gathers_logs() {
        let world = ToyWorld::new();
        let state = world.initial_state();
        let goal = Goal::ReachSkillLevel { skill: FIREMAKING, target_level: 2 };
        let config = SolverConfig::default();
        match driver::solve(
            &state,
            &goal,
            world.registries.as_ref(),
            &world.estimator,
            &world.sim,
            &world.value_model,
            &world.enumerator,
            &config,
            1,
        ) {
            SolveOutcome::Success { terminal_state, plan, .. } => {
                assert!(terminal_state.skill_level(FIREMAKING) >= 2);
                assert!(plan.total_ticks > 0);
            }
            SolveOutcome::Failed { failure, .. } => panic!("expected success, got {failure}"),
        }
    }

    #[test]
    fn death_risk_thieving_goal_replans_through_deaths() {
        let world = ToyWorld::new();
        let state = world.initial_state();
        let goal = Goal::ReachSkillLevel { skill: THIEVING, target_level: 3 };
        let mut config = SolverConfig::default();
        config.max_replans = 20;
        let mut rng = SmallRng::seed_from_u64(7);
        match replan::solve_with_replanning(
            &state,
            &goal,
            world.registries.as_ref(),
            &world.estimator,
            &world.sim,
            &world.value_model,
            &world.enumerator,
            &config,
            1,
            &mut rng,
        ) {
            ReplanOutcome::Done { state, .. } => assert!(state.skill_level(THIEVING) >= 3),
            ReplanOutcome::Terminated { boundary, .. } => {
                panic!("expected goal to be reached, terminated on {boundary}")
            }
        }
    }
}
