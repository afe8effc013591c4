//! A* Driver (`spec.md` §4.8, §4.11): priority queue, node store,
//! visited/best-ticks map, expansion of interaction/macro/wait edges, and
//! plan reconstruction. Grounded on the teacher's `mccfr::tree::Tree`
//! traversal plus `mccfr::solver::Solver` outer loop — the append-only
//! node store is the same shape as `Tree`'s node `Vec`; the priority
//! queue generalizes the teacher's regret-based action selection to an
//! admissible-heuristic-ordered frontier.

use crate::advance;
use crate::config::SolverConfig;
use crate::diagnostics::SolveProfile;
use crate::error::{MacroOutcome, SolverFailure};
use crate::frontier::ParetoFrontier;
use crate::macro_expander;
use crate::node::{Node, NodeArena};
use crate::rate_cache::RateCache;
use crate::traits::{CandidateEnumerator, Estimator, GameSim, GameState, Registries, ValueModel};
use crate::types::{ActionId, BucketKey, Goal, Interaction, ItemId, Plan, PlanStep, SkillId, Tool};
use crate::{Gold, Ticks};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// Goal-scoped visited-map key (`spec.md` §4.8). Deliberately finer than
/// `BucketKey`: it also carries bucketed effective credits, so two states
/// that dominance would treat as equivalent can still be distinguished
/// here for visited-map bookkeeping (§9's open question: "keep both; do
/// not collapse them").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    credits_bucket: Gold,
    active_action: Option<ActionId>,
    hp_bucket: Option<i32>,
    mastery_bucket: Option<u32>,
    axe: u32,
    rod: u32,
    pick: u32,
    skill_levels: Vec<(SkillId, u32)>,
    inventory_bucket: Vec<(ItemId, u64)>,
}

impl StateKey {
    fn of<S, V, R>(state: &S, goal: &Goal, value_model: &V, registries: &R) -> Self
    where
        S: GameState,
        V: ValueModel<S>,
        R: Registries,
    {
        let credits = value_model.effective_credits(state);
        let credits_bucket = (credits / crate::GOLD_BUCKET) * crate::GOLD_BUCKET;

        let hp_bucket = goal.should_track_hp(registries).then(|| BucketKey::quantize_hp(state.hp()));
        let mastery_bucket = if goal.should_track_mastery() {
            state.active_action().map(|a| BucketKey::quantize_mastery(state.mastery_level(a)))
        } else {
            None
        };

        let mut skill_levels: Vec<_> = goal
            .relevant_skills_for_bucketing()
            .into_iter()
            .map(|s| (s, state.skill_level(s)))
            .collect();
        skill_levels.sort();

        let mut inventory_bucket = Vec::new();
        if goal.should_track_inventory(registries) {
            for (item, count) in state.inventory() {
                inventory_bucket.push((item, BucketKey::quantize_inventory(count)));
            }
            inventory_bucket.sort();
        }

        Self {
            credits_bucket,
            active_action: state.active_action(),
            hp_bucket,
            mastery_bucket,
            axe: state.tool_tier(Tool::Axe),
            rod: state.tool_tier(Tool::Rod),
            pick: state.tool_tier(Tool::Pick),
            skill_levels,
            inventory_bucket,
        }
    }
}

fn bucket_key_for<S, R>(state: &S, goal: &Goal, registries: &R) -> BucketKey
where
    S: GameState,
    R: Registries,
{
    let mut skill_levels: Vec<_> = goal
        .relevant_skills_for_bucketing()
        .into_iter()
        .map(|s| (s, state.skill_level(s)))
        .collect();
    skill_levels.sort();

    let mut inventory_bucket = Vec::new();
    if goal.should_track_inventory(registries) {
        for (item, count) in state.inventory() {
            inventory_bucket.push((item, BucketKey::quantize_inventory(count)));
        }
        inventory_bucket.sort();
    }

    BucketKey {
        activity: state.active_action(),
        skill_levels,
        axe_level: state.tool_tier(Tool::Axe),
        rod_level: state.tool_tier(Tool::Rod),
        pick_level: state.tool_tier(Tool::Pick),
        hp_bucket: goal.should_track_hp(registries).then(|| BucketKey::quantize_hp(state.hp())),
        mastery_level: if goal.should_track_mastery() {
            state.active_action().map(|a| BucketKey::quantize_mastery(state.mastery_level(a)))
        } else {
            None
        },
        inventory_bucket,
        input_item_mix: 0,
    }
}

/// Admissible heuristic (`spec.md` §4.3).
fn heuristic<S, E, R, V>(
    state: &S,
    goal: &Goal,
    rate_cache: &mut RateCache,
    estimator: &E,
    registries: &R,
    value_model: &V,
) -> Ticks
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
    V: ValueModel<S>,
{
    let credits = value_model.effective_credits(state);
    match goal {
        Goal::MultiSkill { subgoals } => subgoals
            .iter()
            .filter(|(skill, level)| state.skill_level(*skill) < *level)
            .map(|(skill, level)| {
                let sub = Goal::ReachSkillLevel { skill: *skill, target_level: *level };
                let remaining = sub.remaining(state, credits) as f64;
                let rate = rate_cache.per_skill_rate(state, *skill, goal, estimator, registries);
                if rate > 0.0 {
                    (remaining / rate).ceil() as Ticks
                } else {
                    0
                }
            })
            .sum(),
        _ => {
            let remaining = goal.remaining(state, credits) as f64;
            if remaining <= 0.0 {
                return 0;
            }
            let (rate, _reason) = rate_cache.best_unlocked_rate(state, goal, estimator, registries);
            if rate > 0.0 {
                (remaining / rate).ceil() as Ticks
            } else {
                0
            }
        }
    }
}

/// `spec.md` §4.3 root-state tripwire: `None` if the root has a usable
/// rate, `Some(reason)` if it doesn't (and the goal isn't already met).
fn root_tripwire<S, E, R>(
    state: &S,
    goal: &Goal,
    rate_cache: &mut RateCache,
    estimator: &E,
    registries: &R,
) -> Option<crate::rate_cache::RateCacheReason>
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
{
    match goal {
        Goal::MultiSkill { subgoals } => subgoals.iter().find_map(|(skill, level)| {
            if state.skill_level(*skill) >= *level {
                return None;
            }
            let rate = rate_cache.per_skill_rate(state, *skill, goal, estimator, registries);
            (rate <= 0.0).then(|| RateCache::no_unlocked_actions_reason(state, &[*skill], registries, Some(*skill)))
        }),
        _ => {
            let (rate, reason) = rate_cache.best_unlocked_rate(state, goal, estimator, registries);
            (rate <= 0.0).then_some(()).and(reason)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    f: Ticks,
    g: Ticks,
    node_idx: usize,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse so the smallest (f, g) pops first.
        other.f.cmp(&self.f).then_with(|| other.g.cmp(&self.g))
    }
}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
pub enum SolveOutcome<S> {
    Success { plan: Plan, terminal_state: S, profile: Option<SolveProfile> },
    Failed { failure: SolverFailure, profile: Option<SolveProfile> },
}

#[allow(clippy::too_many_arguments)]
pub fn solve<S, E, R, G, V, X>(
    initial: &S,
    goal: &Goal,
    registries: &R,
    estimator: &E,
    sim: &G,
    value_model: &V,
    enumerator: &X,
    config: &SolverConfig,
    seed: u64,
) -> SolveOutcome<S>
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
    G: GameSim<S>,
    V: ValueModel<S>,
    X: CandidateEnumerator<S>,
{
    log::info!("solve: goal={}", goal.describe());
    let mut rate_cache = RateCache::new();
    let mut frontier = ParetoFrontier::new();
    let mut arena: NodeArena<S> = NodeArena::new();
    let mut best_ticks: HashMap<StateKey, Ticks> = HashMap::new();
    let mut pq: BinaryHeap<QueueEntry> = BinaryHeap::new();
    let mut profile = config.collect_stats.then(SolveProfile::new);
    let mut best_credits_seen: Gold = value_model.effective_credits(initial);
    let mut expanded = 0usize;
    let mut enqueued = 0usize;

    if goal.is_satisfied(initial, value_model.effective_credits(initial)) {
        log::info!("solve: already satisfied");
        return SolveOutcome::Success { plan: Plan::empty(), terminal_state: initial.clone(), profile };
    }

    if let Some(reason) = root_tripwire(initial, goal, &mut rate_cache, estimator, registries) {
        log::warn!("solve: zero root rate, {reason}");
        return SolveOutcome::Failed {
            failure: SolverFailure::ZeroRootRate { reason, expanded, enqueued, best_credits: best_credits_seen },
            profile,
        };
    }

    let root_idx = arena.push(Node {
        state: initial.clone(),
        ticks_so_far: 0,
        interactions_so_far: 0,
        parent_id: None,
        step_from_parent: None,
        expected_deaths: 0.0,
    });
    best_ticks.insert(StateKey::of(initial, goal, value_model, registries), 0);
    let root_h = heuristic(initial, goal, &mut rate_cache, estimator, registries, value_model);
    pq.push(QueueEntry { f: root_h, g: 0, node_idx: root_idx });
    enqueued += 1;

    while let Some(QueueEntry { g, node_idx, .. }) = pq.pop() {
        let node = arena.get(node_idx).clone();
        let key = StateKey::of(&node.state, goal, value_model, registries);
        let is_goal = goal.is_satisfied(&node.state, value_model.effective_credits(&node.state));

        if let Some(&best_g) = best_ticks.get(&key) {
            if best_g < g && !is_goal {
                continue;
            }
        }

        if is_goal {
            return finish(&arena, node_idx, &node, expanded, enqueued, goal, &mut frontier, &mut profile);
        }

        if expanded >= config.max_expanded_nodes {
            return SolveOutcome::Failed {
                failure: SolverFailure::ExpandedNodesExceeded { expanded, enqueued, best_credits: best_credits_seen },
                profile,
            };
        }
        expanded += 1;
        best_credits_seen = best_credits_seen.max(value_model.effective_credits(&node.state));

        let candidates = enumerator.enumerate(&node.state, goal);

        macro_rules! enqueue_or_fail {
            ($child:expr) => {
                match $child {
                    ChildOutcome::ReachedGoal(idx, _state) => {
                        let node_ref = arena.get(idx).clone();
                        return finish(&arena, idx, &node_ref, expanded, enqueued, goal, &mut frontier, &mut profile);
                    }
                    ChildOutcome::Enqueued => {
                        enqueued += 1;
                        if enqueued > config.max_queue_size {
                            return SolveOutcome::Failed {
                                failure: SolverFailure::QueueSizeExceeded { expanded, enqueued, best_credits: best_credits_seen },
                                profile,
                            };
                        }
                    }
                    ChildOutcome::Pruned => {}
                }
            };
        }

        for action_id in &candidates.switch_to_activities {
            let next_state = sim.start_action(&node.state, *action_id);
            let outcome = try_enqueue(
                &mut arena, &mut pq, &mut best_ticks, &mut frontier, &mut rate_cache, estimator, registries,
                value_model, goal, node_idx, &node, next_state, node.ticks_so_far, node.interactions_so_far + 1,
                0.0, PlanStep::Interaction(Interaction::SwitchActivity { action_id: *action_id }), false,
            );
            enqueue_or_fail!(outcome);
        }

        for purchase_id in &candidates.buy_upgrades {
            if let Some(purchase) = registries.shop_by_id(*purchase_id) {
                if value_model.effective_credits(&node.state) >= purchase.cost {
                    let interaction = Interaction::BuyShopItem { purchase_id: *purchase_id };
                    let next_state = sim.apply_interaction_deterministic(&node.state, &interaction);
                    let outcome = try_enqueue(
                        &mut arena, &mut pq, &mut best_ticks, &mut frontier, &mut rate_cache, estimator, registries,
                        value_model, goal, node_idx, &node, next_state, node.ticks_so_far, node.interactions_so_far + 1,
                        0.0, PlanStep::Interaction(interaction), false,
                    );
                    enqueue_or_fail!(outcome);
                }
            }
        }

        if candidates.should_emit_sell_candidate {
            let interaction = Interaction::SellItems { policy: candidates.sell_policy.clone() };
            let next_state = sim.apply_interaction_deterministic(&node.state, &interaction);
            let outcome = try_enqueue(
                &mut arena, &mut pq, &mut best_ticks, &mut frontier, &mut rate_cache, estimator, registries,
                value_model, goal, node_idx, &node, next_state, node.ticks_so_far, node.interactions_so_far + 1,
                0.0, PlanStep::Interaction(interaction), false,
            );
            enqueue_or_fail!(outcome);
        }

        for macro_candidate in candidates.macros.iter().cloned() {
            match macro_expander::expand(
                &node.state, macro_candidate, goal, registries, estimator, sim, value_model, &mut rate_cache,
                config, seed,
            ) {
                MacroOutcome::Expanded(result) => {
                    let new_g = node.ticks_so_far + result.ticks_elapsed;
                    let outcome = try_enqueue(
                        &mut arena, &mut pq, &mut best_ticks, &mut frontier, &mut rate_cache, estimator, registries,
                        value_model, goal, node_idx, &node, result.state, new_g, node.interactions_so_far,
                        result.deaths,
                        PlanStep::Macro {
                            macro_candidate: result.macro_candidate,
                            ticks_planned: result.ticks_elapsed,
                            wait_for: result.wait_for,
                        },
                        false,
                    );
                    enqueue_or_fail!(outcome);
                }
                MacroOutcome::AlreadySatisfied { reason } => log::trace!("macro already satisfied: {reason}"),
                MacroOutcome::CannotExpand { reason } => log::trace!("macro cannot expand: {reason}"),
                MacroOutcome::NeedsPrerequisite { .. } | MacroOutcome::NeedsBoundary { .. } => {
                    log::trace!("macro expansion did not terminate");
                }
            }
        }

        let delta = crate::decision_delta::compute(&node.state, goal, &candidates, &mut rate_cache, estimator, registries, value_model);
        if !delta.is_dead_end && delta.delta_ticks > 0 {
            let advance::AdvanceResult { state: next_state, expected_deaths } =
                crate::advance::advance(&node.state, delta.delta_ticks, estimator, sim, seed);
            let new_g = node.ticks_so_far + delta.delta_ticks;
            let new_key = StateKey::of(&next_state, goal, value_model, registries);
            let reaches_goal = goal.is_satisfied(&next_state, value_model.effective_credits(&next_state));
            if new_key != key || reaches_goal {
                let outcome = try_enqueue(
                    &mut arena, &mut pq, &mut best_ticks, &mut frontier, &mut rate_cache, estimator, registries,
                    value_model, goal, node_idx, &node, next_state, new_g, node.interactions_so_far, expected_deaths,
                    PlanStep::Wait { ticks: delta.delta_ticks, wait_for: delta.wait_for, expected_action: delta.intended_action },
                    false,
                );
                enqueue_or_fail!(outcome);
            }
        }
    }

    SolveOutcome::Failed {
        failure: SolverFailure::HeapExhausted { expanded, enqueued, best_credits: best_credits_seen },
        profile,
    }
}

enum ChildOutcome<S> {
    ReachedGoal(usize, S),
    Enqueued,
    Pruned,
}

#[allow(clippy::too_many_arguments)]
fn try_enqueue<S, E, R, V>(
    arena: &mut NodeArena<S>,
    pq: &mut BinaryHeap<QueueEntry>,
    best_ticks: &mut HashMap<StateKey, Ticks>,
    frontier: &mut ParetoFrontier,
    rate_cache: &mut RateCache,
    estimator: &E,
    registries: &R,
    value_model: &V,
    goal: &Goal,
    parent_idx: usize,
    parent: &Node<S>,
    next_state: S,
    new_g: Ticks,
    new_interactions: usize,
    new_deaths: f64,
    step: PlanStep,
    skip_dominance: bool,
) -> ChildOutcome<S>
where
    S: GameState,
    E: Estimator<S>,
    R: Registries,
    V: ValueModel<S>,
{
    let credits = value_model.effective_credits(&next_state);
    let reaches_goal = goal.is_satisfied(&next_state, credits);
    let new_key = StateKey::of(&next_state, goal, value_model, registries);

    if !reaches_goal {
        if !skip_dominance {
            let bucket = bucket_key_for::<S, R>(&next_state, goal, registries);
            let progress = goal.progress(&next_state, credits);
            if frontier.is_dominated_or_insert(bucket, new_g, progress) {
                return ChildOutcome::Pruned;
            }
        }
        let improving = best_ticks.get(&new_key).map(|&bt| new_g < bt).unwrap_or(true);
        if !improving {
            return ChildOutcome::Pruned;
        }
        best_ticks.insert(new_key, new_g);
    } else {
        let bucket = bucket_key_for::<S, R>(&next_state, goal, registries);
        let progress = goal.progress(&next_state, credits);
        frontier.is_dominated_or_insert(bucket, new_g, progress);
        let improving = best_ticks.get(&new_key).map(|&bt| new_g < bt).unwrap_or(true);
        if improving {
            best_ticks.insert(new_key, new_g);
        }
    }

    let child_idx = arena.push(Node {
        state: next_state.clone(),
        ticks_so_far: new_g,
        interactions_so_far: new_interactions,
        parent_id: Some(parent_idx),
        step_from_parent: Some(step),
        expected_deaths: parent.expected_deaths + new_deaths,
    });

    if reaches_goal {
        return ChildOutcome::ReachedGoal(child_idx, next_state);
    }

    let h = heuristic(&next_state, goal, rate_cache, estimator, registries, value_model);
    pq.push(QueueEntry { f: new_g + h, g: new_g, node_idx: child_idx });
    ChildOutcome::Enqueued
}

fn finish<S: GameState>(
    arena: &NodeArena<S>,
    goal_idx: usize,
    node: &Node<S>,
    expanded: usize,
    enqueued: usize,
    goal: &Goal,
    frontier: &mut ParetoFrontier,
    profile: &mut Option<SolveProfile>,
) -> SolveOutcome<S> {
    let mut steps = arena.reconstruct_steps(goal_idx);
    insert_synthetic_sells(&mut steps);
    if matches!(goal, Goal::ReachCurrency { target } if node.state.currency() < *target) {
        steps.push(PlanStep::Interaction(Interaction::SellItems { policy: crate::types::SellPolicy::SellAll }));
    }

    if let Some(p) = profile {
        p.expanded_nodes = expanded;
        p.enqueued_nodes = enqueued;
        let (inserted, removed) = frontier.stats();
        p.frontier_inserted = inserted;
        p.frontier_removed = removed;
        p.frontier_bucket_count = frontier.bucket_count();
    }

    let plan = Plan {
        interaction_count: node.interactions_so_far,
        total_ticks: node.ticks_so_far,
        expected_deaths: node.expected_deaths,
        expanded_nodes: expanded,
        enqueued_nodes: enqueued,
        steps,
    };
    log::info!("solve: success, total_ticks={}, interactions={}", plan.total_ticks, plan.interaction_count);
    SolveOutcome::Success { plan, terminal_state: node.state.clone(), profile: profile.clone() }
}

/// `spec.md` invariant 6 / §8 "Plan reconstruction shape": insert a
/// synthetic `SellItems(SellAll)` immediately before every `BuyShopItem`.
fn insert_synthetic_sells(steps: &mut Vec<PlanStep>) {
    let mut i = 0;
    while i < steps.len() {
        let is_buy = matches!(steps[i], PlanStep::Interaction(Interaction::BuyShopItem { .. }));
        let preceded_by_sell = i > 0 && matches!(steps[i - 1], PlanStep::Interaction(Interaction::SellItems { .. }));
        if is_buy && !preceded_by_sell {
            steps.insert(i, PlanStep::Interaction(Interaction::SellItems { policy: crate::types::SellPolicy::SellAll }));
            i += 1;
        }
        i += 1;
    }
}
