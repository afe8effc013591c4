//! Segment Loop (`spec.md` §4.9). Iteratively solves to the next material
//! boundary — an upgrade becoming affordable, a skill unlock crossing,
//! inputs depleting, or the outer goal itself being reached — rather than
//! planning the whole goal in one `solve()` call. Grounded on the
//! teacher's `mccfr::solver::Solver::train` outer loop, which likewise
//! repeats a bounded inner solve and feeds its own output back in as the
//! next iteration's starting point.

use crate::config::SolverConfig;
use crate::driver::{self, SolveOutcome};
use crate::error::{ReplanBoundary, SolverFailure};
use crate::traits::{CandidateEnumerator, Estimator, GameSim, GameState, Registries, ValueModel};
use crate::types::{Goal, Interaction, Plan, PlanStep, SellPolicy, WaitFor};
use crate::MAX_SEGMENTS;

/// Resolves a `Candidates::watch_set` into a single `WaitFor` boundary,
/// once, at segment-start — the thing `Goal::Segment`'s `boundary` field
/// holds so `is_satisfied` stays a pure function of `GameState` for the
/// rest of the segment's solve.
pub fn watch_set_to_wait_for<S, R>(
    state: &S,
    watch_set: &crate::types::WatchSet,
    outer: &Goal,
    registries: &R,
) -> WaitFor
where
    S: GameState,
    R: Registries,
{
    let mut conditions = Vec::new();

    for purchase_id in &watch_set.upgrade_affordability {
        if let Some(purchase) = registries.shop_by_id(*purchase_id) {
            conditions.push(WaitFor::InventoryValue { target: purchase.cost });
        }
    }

    for action_id in &watch_set.skill_unlocks {
        if let Some(action) = registries.action_by_id(*action_id) {
            let target_xp = state.xp_required_for_level(action.skill, action.unlock_level);
            conditions.push(WaitFor::SkillXp { skill: action.skill, target_xp });
        }
    }

    if let Some(active) = state.active_action() {
        if let Some(action) = registries.action_by_id(active) {
            if !action.inputs.is_empty()
                && action
                    .inputs
                    .iter()
                    .any(|(item, _)| watch_set.input_depletion.contains(item))
            {
                conditions.push(WaitFor::InputsDepleted { action_id: active });
            }
        }
    }

    if watch_set.goal_crossing {
        conditions.push(WaitFor::Goal(Box::new(outer.clone())));
    }

    if conditions.is_empty() {
        // Nothing material to watch for — fall back to the outer goal
        // itself so the segment still terminates somewhere.
        WaitFor::Goal(Box::new(outer.clone()))
    } else {
        WaitFor::AnyOf(conditions)
    }
}

/// A single completed segment: the plan that produced it, the state it
/// ended in, and why it stopped there.
#[derive(Debug, Clone)]
pub struct Segment<S> {
    pub plan: Plan,
    pub terminal_state: S,
    pub boundary: ReplanBoundary,
}

/// Carries the pieces a segment solve needs beyond the bare goal: the
/// sell policy in effect (computed once per segment, per `spec.md` §4.9)
/// and the resolved watch boundary.
pub struct SegmentContext {
    pub sell_policy: SellPolicy,
    pub boundary: WaitFor,
    pub watched_purchases: Vec<crate::types::PurchaseId>,
}

impl SegmentContext {
    pub fn build<S, R, X>(state: &S, goal: &Goal, registries: &R, enumerator: &X) -> Self
    where
        S: GameState,
        R: Registries,
        X: CandidateEnumerator<S>,
    {
        let candidates = enumerator.enumerate(state, goal);
        let sell_policy = goal.compute_sell_policy(state, registries);
        let watched_purchases = candidates.watch_set.upgrade_affordability.clone();
        let boundary = watch_set_to_wait_for(state, &candidates.watch_set, goal, registries);
        SegmentContext { sell_policy, boundary, watched_purchases }
    }
}

/// Classifies a terminal `Goal::Segment` state into the `ReplanBoundary`
/// that best describes why the segment stopped, per `spec.md` §4.9/§4.10.
/// The boundary is derived purely from the terminal state — the returned
/// plan is never replayed to decide it.
fn classify_boundary<S, R, V>(
    state: &S,
    outer: &Goal,
    registries: &R,
    value_model: &V,
    watched_purchases: &[crate::types::PurchaseId],
) -> ReplanBoundary
where
    S: GameState,
    R: Registries,
    V: ValueModel<S>,
{
    let credits = value_model.effective_credits(state);
    if outer.is_satisfied(state, credits) {
        return ReplanBoundary::GoalReached;
    }
    for purchase_id in watched_purchases {
        if let Some(purchase) = registries.shop_by_id(*purchase_id) {
            if state.currency() < purchase.cost && credits >= purchase.cost {
                return ReplanBoundary::UpgradeAffordableEarly { purchase_id: *purchase_id };
            }
        }
    }
    if let Some(active) = state.active_action() {
        if let Some(action) = registries.action_by_id(active) {
            if action.is_consuming()
                && action
                    .inputs
                    .iter()
                    .any(|(item, needed)| state.inventory_count(*item) < *needed)
            {
                return ReplanBoundary::InputsDepleted { action_id: active, missing_item: None };
            }
        }
    }
    ReplanBoundary::PlannedSegmentStop
}

/// Runs one segment: solves `Goal::Segment { outer, boundary }` and
/// reports where it stopped. `spec.md` §4.9: "invokes `solve(state,
/// SegmentGoal(watch_set))`".
#[allow(clippy::too_many_arguments)]
pub fn solve_segment<S, E, R, G, V, X>(
    state: &S,
    goal: &Goal,
    registries: &R,
    estimator: &E,
    sim: &G,
    value_model: &V,
    enumerator: &X,
    config: &SolverConfig,
    seed: u64,
) -> Result<Segment<S>, SolverFailure>
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
    G: GameSim<S>,
    V: ValueModel<S>,
    X: CandidateEnumerator<S>,
{
    log::info!("solve_segment: goal={}", goal.describe());

    if goal.is_satisfied(state, value_model.effective_credits(state)) {
        return Ok(Segment {
            plan: Plan::empty(),
            terminal_state: state.clone(),
            boundary: ReplanBoundary::GoalReached,
        });
    }

    let ctx = SegmentContext::build(state, goal, registries, enumerator);
    let segment_goal =
        Goal::Segment { outer: Box::new(goal.clone()), boundary: Box::new(ctx.boundary) };

    match driver::solve(
        state,
        &segment_goal,
        registries,
        estimator,
        sim,
        value_model,
        enumerator,
        config,
        seed,
    ) {
        SolveOutcome::Success { plan, terminal_state, .. } => {
            let boundary =
                classify_boundary(&terminal_state, goal, registries, value_model, &ctx.watched_purchases);
            Ok(Segment { plan, terminal_state, boundary })
        }
        SolveOutcome::Failed { failure, .. } => Err(failure),
    }
}

/// `spec.md` §4.9: repeatedly solves to the next material boundary,
/// synthesizing the inter-segment sell-then-buy interactions the driver
/// itself never emits (a segment's terminal state is a *stopping* point,
/// not necessarily one where the watched purchase has actually happened).
#[allow(clippy::too_many_arguments)]
pub fn solve_to_goal<S, E, R, G, V, X>(
    state: &S,
    goal: &Goal,
    registries: &R,
    estimator: &E,
    sim: &G,
    value_model: &V,
    enumerator: &X,
    config: &SolverConfig,
    seed: u64,
) -> Result<Vec<Segment<S>>, SolverFailure>
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
    G: GameSim<S>,
    V: ValueModel<S>,
    X: CandidateEnumerator<S>,
{
    let mut segments = Vec::new();
    let mut current = state.clone();

    for _ in 0..config.max_segments.min(MAX_SEGMENTS) {
        if goal.is_satisfied(&current, value_model.effective_credits(&current)) {
            break;
        }

        let segment = solve_segment(
            &current, goal, registries, estimator, sim, value_model, enumerator, config, seed,
        )?;
        current = segment.terminal_state.clone();
        let boundary = segment.boundary.clone();
        segments.push(segment);

        match boundary {
            ReplanBoundary::GoalReached => {
                if let Goal::ReachCurrency { target } = goal {
                    if current.currency() < *target {
                        let sell_policy = goal.compute_sell_policy(&current, registries);
                        let sold = sim.apply_interaction_deterministic(
                            &current,
                            &Interaction::SellItems { policy: sell_policy.clone() },
                        );
                        let plan = Plan {
                            steps: vec![PlanStep::Interaction(Interaction::SellItems {
                                policy: sell_policy,
                            })],
                            total_ticks: 0,
                            interaction_count: 1,
                            expected_deaths: 0.0,
                            expanded_nodes: 0,
                            enqueued_nodes: 0,
                        };
                        segments.push(Segment {
                            plan,
                            terminal_state: sold.clone(),
                            boundary: ReplanBoundary::GoalReached,
                        });
                        current = sold;
                    }
                }
                break;
            }
            ReplanBoundary::UpgradeAffordableEarly { purchase_id } => {
                let sell_policy = goal.compute_sell_policy(&current, registries);
                match buy_upgrade_segment(&current, purchase_id, &sell_policy, registries, sim) {
                    Ok(bought) => {
                        current = bought.terminal_state.clone();
                        segments.push(bought);
                    }
                    Err(e) => {
                        log::warn!("solve_to_goal: upgrade {purchase_id} reported affordable but buy failed: {e}");
                    }
                }
                continue;
            }
            ReplanBoundary::NoProgressPossible { .. }
            | ReplanBoundary::InputsDepleted { .. }
            | ReplanBoundary::InventoryFull
            | ReplanBoundary::PlannedSegmentStop
            | ReplanBoundary::UnlockObserved { .. }
            | ReplanBoundary::InventoryPressure => {
                continue;
            }
            other => {
                log::warn!("solve_to_goal: unexpected boundary {other}, continuing anyway");
                continue;
            }
        }
    }

    Ok(segments)
}

/// Handles an `UpgradeAffordable` boundary found by the caller's own
/// watch-set evaluation: sells under the segment's policy if short on
/// cash, buys, and asserts success (`spec.md` §4.9 step 4). Returned as a
/// synthetic zero-tick segment.
pub fn buy_upgrade_segment<S, R, G>(
    state: &S,
    purchase_id: crate::types::PurchaseId,
    sell_policy: &SellPolicy,
    registries: &R,
    sim: &G,
) -> Result<Segment<S>, ReplanBoundary>
where
    S: GameState,
    R: Registries,
    G: GameSim<S>,
{
    let purchase = registries
        .shop_by_id(purchase_id)
        .ok_or(ReplanBoundary::CannotAfford { purchase_id })?;

    let mut current = state.clone();
    let mut steps = Vec::new();

    if current.currency() < purchase.cost {
        current = sim.apply_interaction_deterministic(
            &current,
            &Interaction::SellItems { policy: sell_policy.clone() },
        );
        steps.push(PlanStep::Interaction(Interaction::SellItems { policy: sell_policy.clone() }));
    }

    if current.currency() < purchase.cost {
        return Err(ReplanBoundary::CannotAfford { purchase_id });
    }

    let pre_buy_currency = current.currency();
    let bought =
        sim.apply_interaction_deterministic(&current, &Interaction::BuyShopItem { purchase_id });
    if bought.currency() > pre_buy_currency - purchase.cost {
        // The buy must have actually spent at least the listed cost.
        return Err(ReplanBoundary::CannotAfford { purchase_id });
    }
    steps.push(PlanStep::Interaction(Interaction::BuyShopItem { purchase_id }));
    let interaction_count = steps.len();

    Ok(Segment {
        plan: Plan {
            steps,
            total_ticks: 0,
            interaction_count,
            expected_deaths: 0.0,
            expanded_nodes: 0,
            enqueued_nodes: 0,
        },
        terminal_state: bought,
        boundary: ReplanBoundary::UpgradeAffordableEarly { purchase_id },
    })
}
