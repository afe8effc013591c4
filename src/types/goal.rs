use crate::traits::{GameState, Registries};
use crate::types::{Rates, SellPolicy, SkillId, WaitFor};
use crate::{Gold, Progress};

/// `spec.md` §3: Goal is polymorphic over a capability set. Design note
/// §9 prefers a closed sum dispatched by pattern match over an open trait
/// hierarchy here — the same choice the teacher makes for `Edge`/`Turn`/
/// `Player` — since there is no open set of goal kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Goal {
    ReachCurrency { target: Gold },
    ReachSkillLevel { skill: SkillId, target_level: u32 },
    MultiSkill { subgoals: Vec<(SkillId, u32)> },
    /// Internal: wraps an outer goal with a `WatchSet`-driven boundary
    /// check used by the Segment loop (§4.9). `segment::watch_set_to_wait_for`
    /// resolves a `WatchSet` into this `boundary` once, at segment-start, so
    /// `is_satisfied` stays purely a function of `GameState` the same way
    /// every other goal variant is — `is_satisfied` is true the moment the
    /// outer goal finishes early *or* any watched boundary condition fires.
    Segment { outer: Box<Goal>, boundary: Box<WaitFor> },
}

impl Goal {
    /// `effective_credits` is `ValueModel::effective_credits(state)` —
    /// currency plus sellable inventory value — required for
    /// `ReachCurrency` so remaining-ticks never overestimates what a
    /// state already has banked (`spec.md` glossary: "Effective
    /// credits"). Every other variant ignores it.
    pub fn remaining<S: GameState>(&self, state: &S, effective_credits: Gold) -> Progress {
        match self {
            Goal::ReachCurrency { target } => (*target - effective_credits).max(0) as Progress,
            Goal::ReachSkillLevel { skill, target_level } => {
                let target_xp = state.xp_required_for_level(*skill, *target_level);
                target_xp.saturating_sub(state.skill_xp(*skill)) as Progress
            }
            Goal::MultiSkill { subgoals } => subgoals
                .iter()
                .map(|(skill, level)| {
                    Goal::ReachSkillLevel { skill: *skill, target_level: *level }
                        .remaining(state, effective_credits)
                })
                .sum(),
            Goal::Segment { outer, .. } => outer.remaining(state, effective_credits),
        }
    }

    pub fn progress<S: GameState>(&self, state: &S, effective_credits: Gold) -> Progress {
        match self {
            Goal::ReachCurrency { .. } => effective_credits as Progress,
            Goal::ReachSkillLevel { skill, .. } => state.skill_xp(*skill) as Progress,
            Goal::MultiSkill { subgoals } => subgoals
                .iter()
                .map(|(skill, _)| state.skill_xp(*skill) as Progress)
                .sum(),
            Goal::Segment { outer, .. } => outer.progress(state, effective_credits),
        }
    }

    pub fn is_satisfied<S: GameState>(&self, state: &S, effective_credits: Gold) -> bool {
        match self {
            Goal::ReachCurrency { target } => effective_credits >= *target,
            Goal::ReachSkillLevel { skill, target_level } => {
                state.skill_level(*skill) >= *target_level
            }
            Goal::MultiSkill { subgoals } => subgoals
                .iter()
                .all(|(skill, level)| state.skill_level(*skill) >= *level),
            Goal::Segment { outer, boundary } => {
                outer.is_satisfied(state, effective_credits)
                    || boundary.is_satisfied(state, effective_credits)
            }
        }
    }

    /// Per `spec.md` §4.3: the quantity the heuristic divides remaining
    /// ticks by. For currency/single-skill goals this is `activity_rate`
    /// of the single relevant skill; callers pick which rate (gold or xp)
    /// via that method.
    pub fn progress_per_tick(&self, rates: &Rates) -> f64 {
        match self {
            Goal::ReachCurrency { .. } => rates.item_flows_per_tick.values().sum(),
            Goal::ReachSkillLevel { skill, .. } => {
                *rates.xp_per_tick.get(skill).unwrap_or(&0.0)
            }
            Goal::MultiSkill { subgoals } => subgoals
                .iter()
                .map(|(skill, _)| *rates.xp_per_tick.get(skill).unwrap_or(&0.0))
                .sum(),
            Goal::Segment { outer, .. } => outer.progress_per_tick(rates),
        }
    }

    /// Tells the rate cache which rate matters for `skill` under this
    /// goal: gold-rate for currency goals (any skill can fund it), raw
    /// xp-rate for a skill goal training that exact skill.
    pub fn activity_rate(&self, skill: SkillId, gold_rate: f64, xp_rate: f64) -> f64 {
        match self {
            Goal::ReachCurrency { .. } => gold_rate,
            Goal::ReachSkillLevel { skill: target, .. } => {
                if skill == *target {
                    xp_rate
                } else {
                    0.0
                }
            }
            Goal::MultiSkill { subgoals } => {
                if subgoals.iter().any(|(s, _)| *s == skill) {
                    xp_rate
                } else {
                    0.0
                }
            }
            Goal::Segment { outer, .. } => outer.activity_rate(skill, gold_rate, xp_rate),
        }
    }

    pub fn is_skill_relevant(&self, skill: SkillId) -> bool {
        match self {
            Goal::ReachCurrency { .. } => true,
            Goal::ReachSkillLevel { skill: target, .. } => skill == *target,
            Goal::MultiSkill { subgoals } => subgoals.iter().any(|(s, _)| *s == skill),
            Goal::Segment { outer, .. } => outer.is_skill_relevant(skill),
        }
    }

    pub fn relevant_skills_for_bucketing(&self) -> Vec<SkillId> {
        match self {
            Goal::ReachCurrency { .. } => vec![],
            Goal::ReachSkillLevel { skill, .. } => vec![*skill],
            Goal::MultiSkill { subgoals } => subgoals.iter().map(|(s, _)| *s).collect(),
            Goal::Segment { outer, .. } => outer.relevant_skills_for_bucketing(),
        }
    }

    /// Only death-risk (thieving-like) training cares about hp buckets;
    /// plain currency/skill goals over non-combat actions don't need the
    /// extra state-key dimension.
    pub fn should_track_hp(&self, registries: &dyn Registries) -> bool {
        match self {
            Goal::ReachCurrency { .. } => registries.all_actions().iter().any(|a| a.has_death_risk()),
            Goal::ReachSkillLevel { skill, .. } => registries
                .actions_for_skill(*skill)
                .iter()
                .any(|a| a.has_death_risk()),
            Goal::MultiSkill { subgoals } => subgoals.iter().any(|(skill, _)| {
                registries.actions_for_skill(*skill).iter().any(|a| a.has_death_risk())
            }),
            Goal::Segment { outer, .. } => outer.should_track_hp(registries),
        }
    }

    pub fn should_track_mastery(&self) -> bool {
        matches!(self, Goal::ReachSkillLevel { .. } | Goal::MultiSkill { .. })
            || matches!(self, Goal::Segment { outer, .. } if outer.should_track_mastery())
    }

    /// A currency goal always cares about inventory (it's sellable
    /// value); a skill goal only does when one of its consuming skills
    /// needs input stock tracked.
    pub fn should_track_inventory(&self, registries: &dyn Registries) -> bool {
        match self {
            Goal::ReachCurrency { .. } => true,
            Goal::ReachSkillLevel { .. } | Goal::MultiSkill { .. } => {
                !self.consuming_skills(registries).is_empty()
            }
            Goal::Segment { outer, .. } => outer.should_track_inventory(registries),
        }
    }

    pub fn consuming_skills(&self, registries: &dyn Registries) -> Vec<SkillId> {
        self.relevant_skills_for_bucketing()
            .into_iter()
            .filter(|skill| {
                registries
                    .actions_for_skill(*skill)
                    .iter()
                    .any(|a| a.is_consuming())
            })
            .collect()
    }

    /// Default sell policy: sell everything except items that feed a
    /// still-relevant consuming skill's input requirements (so the
    /// segment loop doesn't sell logs out from under firemaking).
    pub fn compute_sell_policy<S: GameState>(
        &self,
        _state: &S,
        registries: &dyn Registries,
    ) -> SellPolicy {
        let keep: Vec<_> = self
            .consuming_skills(registries)
            .into_iter()
            .flat_map(|skill| registries.actions_for_skill(skill))
            .flat_map(|a| a.inputs.iter().map(|(id, _)| *id))
            .collect();
        if keep.is_empty() {
            SellPolicy::SellAll
        } else {
            SellPolicy::ByPredicateKeepRecent { keep_latest_of: keep }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Goal::ReachCurrency { target } => format!("currency >= {target}"),
            Goal::ReachSkillLevel { skill, target_level } => {
                format!("level({skill}) >= {target_level}")
            }
            Goal::MultiSkill { subgoals } => {
                let parts: Vec<_> = subgoals
                    .iter()
                    .map(|(s, l)| format!("level({s}) >= {l}"))
                    .collect();
                format!("all({})", parts.join(" & "))
            }
            Goal::Segment { outer, boundary } => format!("segment({}, until {})", outer.describe(), boundary.describe()),
        }
    }
}
