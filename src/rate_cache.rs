//! Rate Cache (`spec.md` §4.1): memoizes the best-unlocked progress rate
//! per capability class of state. Created fresh inside every `solve` —
//! design note §9 is explicit that this must never be hoisted to a
//! process-wide global, the way the teacher's `Profile` (§mccfr/profile.rs)
//! is owned by a single `Blueprint`/training run and never shared across
//! solves.

use crate::traits::{Estimator, GameState, Registries};
use crate::types::{ActionId, Goal, ItemId, SkillId, Tool};
use std::collections::HashMap;

/// How many ticks a thieving-like action's death/restart cycle is assumed
/// to cost on average — travel back, re-initiating the action, etc. A
/// pure heuristic constant the way `CONSUME_BUFFER_TICKS` is.
pub const DEATH_RESTART_OVERHEAD_TICKS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CapabilityKey {
    skill_levels: Vec<(SkillId, u32)>,
    axe: u32,
    rod: u32,
    pick: u32,
}

impl CapabilityKey {
    pub fn of<S: GameState>(state: &S, skills: &[SkillId]) -> Self {
        let mut skill_levels: Vec<_> = skills.iter().map(|s| (*s, state.skill_level(*s))).collect();
        skill_levels.sort_by_key(|(s, _)| *s);
        Self {
            skill_levels,
            axe: state.tool_tier(Tool::Axe),
            rod: state.tool_tier(Tool::Rod),
            pick: state.tool_tier(Tool::Pick),
        }
    }
}

/// Why a rate came back zero — propagated into solver failure messages.
#[derive(Debug, Clone, PartialEq)]
pub enum RateCacheReason {
    NoRelevantSkill,
    NoUnlockedActions {
        missing_input: Option<ItemId>,
        action_needing_input: Option<ActionId>,
        skill: Option<SkillId>,
    },
    InputsRequired,
    ZeroTicks,
}

impl std::fmt::Display for RateCacheReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateCacheReason::NoRelevantSkill => write!(f, "goal has no relevant skill for this state"),
            RateCacheReason::NoUnlockedActions { missing_input, action_needing_input, skill } => {
                write!(
                    f,
                    "no unlocked action can progress{}{}{}",
                    skill.map(|s| format!(" for {s}")).unwrap_or_default(),
                    action_needing_input.map(|a| format!(" ({a} needs input)")).unwrap_or_default(),
                    missing_input.map(|i| format!(" missing {i}")).unwrap_or_default(),
                )
            }
            RateCacheReason::InputsRequired => write!(f, "every unlocked action requires inputs with no producer"),
            RateCacheReason::ZeroTicks => write!(f, "best action has zero throughput"),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct CachedRate {
    rate: f64,
    reason: Option<RateCacheReason>,
}

#[derive(Default)]
pub struct RateCache {
    combined: HashMap<CapabilityKey, CachedRate>,
    per_skill: HashMap<(CapabilityKey, SkillId), CachedRate>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best rate over every skill the goal deems relevant, over every
    /// currently-unlocked, input-satisfiable action. Used by the
    /// single-skill/currency heuristic.
    pub fn best_unlocked_rate<S, E, R>(
        &mut self,
        state: &S,
        goal: &Goal,
        estimator: &E,
        registries: &R,
    ) -> (f64, Option<RateCacheReason>)
    where
        S: GameState,
        E: Estimator<S>,
        R: Registries,
    {
        let skills = self.relevant_skills(goal, registries);
        if skills.is_empty() {
            return (0.0, Some(RateCacheReason::NoRelevantSkill));
        }
        let key = CapabilityKey::of(state, &skills);
        if let Some(cached) = self.combined.get(&key) {
            return (cached.rate, cached.reason.clone());
        }

        let mut best = 0.0f64;
        let mut reason = Some(Self::no_unlocked_actions_reason(state, &skills, registries, None));
        for skill in &skills {
            let (rate, skill_reason) = Self::best_rate_for_skill(state, *skill, goal, estimator, registries);
            if rate > best {
                best = rate;
                reason = None;
            } else if reason.is_some() && skill_reason.is_some() {
                reason = skill_reason;
            }
        }
        let cached = CachedRate { rate: best, reason: if best > 0.0 { None } else { reason } };
        self.combined.insert(key, cached.clone());
        (cached.rate, cached.reason)
    }

    /// Per-skill best rate, used by the multi-skill heuristic. Caps a
    /// consuming action's xp-rate by the slowest input's best producer
    /// throughput.
    pub fn per_skill_rate<S, E, R>(&mut self, state: &S, skill: SkillId, goal: &Goal, estimator: &E, registries: &R) -> f64
    where
        S: GameState,
        E: Estimator<S>,
        R: Registries,
    {
        let key = (CapabilityKey::of(state, &[skill]), skill);
        if let Some(cached) = self.per_skill.get(&key) {
            return cached.rate;
        }
        let (rate, reason) = Self::best_rate_for_skill(state, skill, goal, estimator, registries);
        self.per_skill.insert(key, CachedRate { rate, reason });
        rate
    }

    /// Builds a `NoUnlockedActions` reason naming the lowest-`unlock_level`
    /// action still out of reach for `skill` (or the first of `skills` if
    /// `skill` is `None`) — and that action's first required input, if it
    /// has one — so the failure message surfaced by `root_tripwire` names
    /// the actual thing blocking progress instead of `None` everywhere.
    pub(crate) fn no_unlocked_actions_reason<S, R>(
        state: &S,
        skills: &[SkillId],
        registries: &R,
        skill: Option<SkillId>,
    ) -> RateCacheReason
    where
        S: GameState,
        R: Registries,
    {
        let candidates: Vec<SkillId> = match skill {
            Some(s) => vec![s],
            None => skills.to_vec(),
        };
        for s in candidates {
            let level = state.skill_level(s);
            let mut locked: Vec<_> =
                registries.actions_for_skill(s).into_iter().filter(|a| a.unlock_level > level).collect();
            locked.sort_by_key(|a| a.unlock_level);
            if let Some(next) = locked.first() {
                return RateCacheReason::NoUnlockedActions {
                    missing_input: next.inputs.first().map(|(item, _)| *item),
                    action_needing_input: Some(next.id),
                    skill: Some(s),
                };
            }
        }
        RateCacheReason::NoUnlockedActions { missing_input: None, action_needing_input: None, skill }
    }

    fn relevant_skills<R: Registries>(&self, goal: &Goal, registries: &R) -> Vec<SkillId> {
        let mut skills = std::collections::BTreeSet::new();
        for action in registries.all_actions() {
            if goal.is_skill_relevant(action.skill) {
                skills.insert(action.skill);
            }
        }
        skills.into_iter().collect()
    }

    fn best_rate_for_skill<S, E, R>(
        state: &S,
        skill: SkillId,
        goal: &Goal,
        estimator: &E,
        registries: &R,
    ) -> (f64, Option<RateCacheReason>)
    where
        S: GameState,
        E: Estimator<S>,
        R: Registries,
    {
        let level = state.skill_level(skill);
        let unlocked: Vec<_> = registries
            .actions_for_skill(skill)
            .into_iter()
            .filter(|a| a.unlock_level <= level)
            .collect();
        if unlocked.is_empty() {
            return (0.0, Some(Self::no_unlocked_actions_reason(state, &[skill], registries, Some(skill))));
        }

        let mut best = 0.0f64;
        let mut last_reason = None;
        for action in &unlocked {
            let raw = estimator.estimate_rates_for_action(state, action.id);
            let raw = if raw.has_death_risk() {
                raw.cycle_adjusted(DEATH_RESTART_OVERHEAD_TICKS)
            } else {
                raw
            };

            let xp_rate_raw = *raw.xp_per_tick.get(&skill).unwrap_or(&0.0);
            let gold_rate = Self::gold_rate(&raw, registries);

            let (xp_rate, blocked_reason) = if action.is_consuming() {
                match Self::input_throughput_cap(state, action, estimator, registries) {
                    Some(cap) => {
                        let action_rate = if action.xp_per_action > 0 {
                            xp_rate_raw / action.xp_per_action as f64
                        } else {
                            0.0
                        };
                        let capped_actions = action_rate.min(cap);
                        (capped_actions * action.xp_per_action as f64, None)
                    }
                    None => (0.0, Some(RateCacheReason::InputsRequired)),
                }
            } else {
                (xp_rate_raw, None)
            };

            let activity_rate = goal.activity_rate(skill, gold_rate, xp_rate);
            if activity_rate > best {
                best = activity_rate;
            }
            if blocked_reason.is_some() {
                last_reason = blocked_reason;
            }
        }

        if best <= 0.0 {
            let reason = last_reason.unwrap_or(RateCacheReason::ZeroTicks);
            (0.0, Some(reason))
        } else {
            (best, None)
        }
    }

    pub(crate) fn gold_rate<R: Registries>(rates: &crate::types::Rates, registries: &R) -> f64 {
        let gained: f64 = rates
            .item_flows_per_tick
            .iter()
            .map(|(item, qty)| registries.item_by_id(*item).map(|i| i.sell_price as f64).unwrap_or(0.0) * qty)
            .sum();
        let spent: f64 = rates
            .items_consumed_per_tick
            .iter()
            .map(|(item, qty)| registries.item_by_id(*item).map(|i| i.sell_price as f64).unwrap_or(0.0) * qty)
            .sum();
        (gained - spent).max(0.0)
    }

    /// `None` if at least one input has zero available producer
    /// throughput (action cannot sustain at all); otherwise the max
    /// actions-per-tick achievable given the slowest input.
    fn input_throughput_cap<S, E, R>(
        state: &S,
        action: &crate::traits::registries::ActionDef,
        estimator: &E,
        registries: &R,
    ) -> Option<f64>
    where
        S: GameState,
        E: Estimator<S>,
        R: Registries,
    {
        let mut cap = f64::INFINITY;
        for (item, needed_per_action) in &action.inputs {
            let throughput = registries
                .producers_of(*item)
                .into_iter()
                .filter(|producer| state.skill_level(producer.skill) >= producer.unlock_level)
                .map(|producer| {
                    estimator
                        .estimate_rates_for_action(state, producer.id)
                        .item_flows_per_tick
                        .get(item)
                        .copied()
                        .unwrap_or(0.0)
                })
                .fold(0.0f64, f64::max);
            if throughput <= 0.0 {
                return None;
            }
            cap = cap.min(throughput / *needed_per_action as f64);
        }
        Some(cap)
    }
}
