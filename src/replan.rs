//! Replanning Loop (`spec.md` §4.10): runs the stochastic simulator
//! against a plan the A* driver produced assuming expected values, and
//! re-invokes the driver whenever execution reveals a material deviation
//! from that expectation. Grounded on the teacher's `mccfr::solver::Solver
//! ::train` retry loop generalized one level further than Consume-Until
//! (§4.5) already generalizes it: here the "retry" is a full re-solve, not
//! just a restart of one wait edge.

use crate::config::SolverConfig;
use crate::consume_until::consume_until;
use crate::driver::{self, SolveOutcome};
use crate::error::ReplanBoundary;
use crate::traits::{CandidateEnumerator, Estimator, GameSim, GameState, Registries, ValueModel};
use crate::types::{Goal, Plan, PlanStep};
use crate::Ticks;
use rand::RngCore;

/// What `execute_plan` observed while carrying out a solved `Plan`
/// against the real, stochastic tick engine.
#[derive(Debug, Clone)]
pub struct ExecutionResult<S> {
    pub state: S,
    pub actual_ticks: Ticks,
    pub deaths: u32,
    /// Every boundary a `Wait`/`Macro` step reported along the way,
    /// including the final one that stopped execution early.
    pub boundaries: Vec<ReplanBoundary>,
}

impl<S> ExecutionResult<S> {
    fn final_boundary(&self) -> Option<&ReplanBoundary> {
        self.boundaries.last()
    }
}

/// Plays `plan` out against the real simulator, step by step, stopping
/// the moment a step's boundary is anything but a clean
/// `WaitConditionSatisfied` — the rest of the plan was built against a
/// state that no longer holds, so there is no point executing it blind.
#[allow(clippy::too_many_arguments)]
pub fn execute_plan<S, G, R, E, V>(
    state: &S,
    plan: &Plan,
    registries: &R,
    estimator: &E,
    sim: &G,
    value_model: &V,
    config: &SolverConfig,
    rng: &mut dyn RngCore,
) -> ExecutionResult<S>
where
    S: GameState,
    G: GameSim<S>,
    R: Registries,
    E: Estimator<S>,
    V: ValueModel<S>,
{
    let mut current = state.clone();
    let mut actual_ticks: Ticks = 0;
    let mut deaths = 0u32;
    let mut boundaries = Vec::new();

    for step in &plan.steps {
        match step {
            PlanStep::Interaction(interaction) => {
                current = sim.apply_interaction(&current, interaction, rng);
            }
            PlanStep::Wait { ticks, wait_for, .. } | PlanStep::Macro { ticks_planned: ticks, wait_for, .. } => {
                let budget = ticks.saturating_add(config.consume_buffer_ticks);
                let result =
                    consume_until(&current, wait_for, registries, estimator, sim, value_model, config, budget, rng);
                current = result.state;
                actual_ticks = actual_ticks.saturating_add(result.ticks_elapsed);
                deaths += result.death_count;
                let stop = !matches!(&result.boundary, ReplanBoundary::WaitConditionSatisfied);
                boundaries.push(result.boundary);
                if stop {
                    break;
                }
            }
        }
    }

    ExecutionResult { state: current, actual_ticks, deaths, boundaries }
}

/// Outcome of the replanning loop: either the goal was reached, or
/// execution terminated on a boundary that isn't recoverable by
/// replanning (limits exceeded, or a solver bug signal per `spec.md` §4.10
/// step 5).
#[derive(Debug, Clone)]
pub enum ReplanOutcome<S> {
    Done { state: S, total_ticks: Ticks, replans: usize },
    Terminated { state: S, boundary: ReplanBoundary, total_ticks: Ticks, replans: usize },
}

fn category_for(boundary: &ReplanBoundary, replan_count: usize) -> &'static str {
    match boundary {
        ReplanBoundary::GoalReached => "done",
        ReplanBoundary::ReplanLimitExceeded { .. } | ReplanBoundary::TimeBudgetExceeded { .. } => "limit",
        ReplanBoundary::NoProgressPossible { .. }
        | ReplanBoundary::CannotAfford { .. }
        | ReplanBoundary::ActionUnavailable { .. } => "error",
        ReplanBoundary::Death => "recovery",
        _ if replan_count == 0 => "planned",
        ReplanBoundary::UnexpectedUnlock { .. } => "expected",
        _ => "replan",
    }
}

/// `spec.md` §4.10: solve, execute, and re-solve on deviation until the
/// goal is reached or a hard limit (`max_replans`/`max_total_ticks`) is
/// hit.
#[allow(clippy::too_many_arguments)]
pub fn solve_with_replanning<S, E, R, G, V, X>(
    state: &S,
    goal: &Goal,
    registries: &R,
    estimator: &E,
    sim: &G,
    value_model: &V,
    enumerator: &X,
    config: &SolverConfig,
    seed: u64,
    rng: &mut dyn RngCore,
) -> ReplanOutcome<S>
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
    G: GameSim<S>,
    V: ValueModel<S>,
    X: CandidateEnumerator<S>,
{
    log::info!("solve_with_replanning: goal={}", goal.describe());

    let mut current = state.clone();
    let mut total_ticks: Ticks = 0;
    let mut replan_count = 0usize;

    loop {
        if replan_count >= config.max_replans {
            let boundary = ReplanBoundary::ReplanLimitExceeded { limit: config.max_replans };
            log::info!("replan[{}]: {}", category_for(&boundary, replan_count), boundary);
            return ReplanOutcome::Terminated { state: current, boundary, total_ticks, replans: replan_count };
        }
        if total_ticks >= config.max_total_ticks {
            let boundary = ReplanBoundary::TimeBudgetExceeded { limit: config.max_total_ticks, actual: total_ticks };
            log::info!("replan[{}]: {}", category_for(&boundary, replan_count), boundary);
            return ReplanOutcome::Terminated { state: current, boundary, total_ticks, replans: replan_count };
        }
        if goal.is_satisfied(&current, value_model.effective_credits(&current)) {
            log::info!("replan[done]: goal already satisfied");
            return ReplanOutcome::Done { state: current, total_ticks, replans: replan_count };
        }

        let plan = match driver::solve(
            &current, goal, registries, estimator, sim, value_model, enumerator, config, seed,
        ) {
            SolveOutcome::Success { plan, .. } => plan,
            SolveOutcome::Failed { failure, .. } => {
                let boundary =
                    ReplanBoundary::NoProgressPossible { reason: format!("solver failed: {failure}") };
                log::info!("replan[{}]: {}", category_for(&boundary, replan_count), boundary);
                return ReplanOutcome::Terminated { state: current, boundary, total_ticks, replans: replan_count };
            }
        };

        let exec = execute_plan(&current, &plan, registries, estimator, sim, value_model, config, rng);
        total_ticks = total_ticks.saturating_add(exec.actual_ticks);
        current = exec.state;

        let goal_satisfied = goal.is_satisfied(&current, value_model.effective_credits(&current));
        if goal_satisfied {
            log::info!("replan[done]: goal satisfied after {replan_count} replans");
            return ReplanOutcome::Done { state: current, total_ticks, replans: replan_count };
        }

        let drift = matches!(exec.final_boundary(), Some(ReplanBoundary::WaitConditionSatisfied))
            && !goal_satisfied;
        let forces_replan =
            drift || exec.boundaries.iter().any(ReplanBoundary::always_forces_replan);

        if !forces_replan {
            let boundary = ReplanBoundary::NoProgressPossible {
                reason: "plan completed without reaching goal and no replan needed".to_string(),
            };
            log::error!("replan[error]: {boundary}");
            return ReplanOutcome::Terminated { state: current, boundary, total_ticks, replans: replan_count };
        }

        replan_count += 1;
        if let Some(boundary) = exec.final_boundary() {
            log::info!("replan[{}]: {}", category_for(boundary, replan_count), boundary);
        }
    }
}
