use crate::toy::{ToyRegistries, ToyState, LOGS, WOODCUTTING};
use crate::traits::{CandidateEnumerator, GameState, Registries};
use crate::types::{Candidates, Goal, MacroCandidate, MacroStopRule, WatchSet};
use std::sync::Arc;

/// Candidate generation for the toy game. Grounded on the teacher's
/// legal-action enumeration (`mccfr::infoset`): a small, goal-driven
/// branch set rather than exhaustive search over every registry entry.
pub struct ToyEnumerator {
    registries: Arc<ToyRegistries>,
}

impl ToyEnumerator {
    pub fn new(registries: Arc<ToyRegistries>) -> Self {
        ToyEnumerator { registries }
    }

    fn build_macro_candidates(&self, state: &ToyState, goal: &Goal) -> Vec<MacroCandidate> {
        let mut macros = Vec::new();

        for skill in goal.relevant_skills_for_bucketing() {
            let target_level = state.skill_level(skill) + 1;
            let actions = self.registries.actions_for_skill(skill);
            let consuming = actions.iter().any(|a| a.is_consuming());
            let primary_stop = MacroStopRule::AtSkillLevel { skill, level: target_level };

            if consuming {
                macros.push(MacroCandidate::TrainConsumingSkillUntil {
                    skill,
                    primary_stop,
                    watched_stops: vec![],
                });
            } else {
                macros.push(MacroCandidate::TrainSkillUntil {
                    skill,
                    primary_stop,
                    watched_stops: vec![],
                });
            }
        }

        if matches!(goal, Goal::ReachCurrency { .. }) {
            macros.push(MacroCandidate::TrainSkillUntil {
                skill: WOODCUTTING,
                primary_stop: MacroStopRule::AtInventory {
                    item_id: LOGS,
                    count: state.inventory_count(LOGS) + 50,
                },
                watched_stops: vec![],
            });
        }

        macros
    }
}

impl CandidateEnumerator<ToyState> for ToyEnumerator {
    fn enumerate(&self, state: &ToyState, goal: &Goal) -> Candidates {
        let active = state.active_action();

        let switch_to_activities: Vec<_> = self
            .registries
            .all_actions()
            .iter()
            .filter(|a| state.skill_level(a.skill) >= a.unlock_level)
            .map(|a| a.id)
            .filter(|id| Some(*id) != active)
            .collect();

        let buy_upgrades: Vec<_> = self
            .registries
            .purchases()
            .iter()
            .filter(|p| state.shop_count(p.id) == 0)
            .map(|p| p.id)
            .collect();

        let unresolved_unlocks: Vec<_> = self
            .registries
            .unlock_boundaries()
            .iter()
            .flat_map(|b| b.newly_unlocked.iter().copied())
            .filter(|id| {
                self.registries
                    .action_by_id(*id)
                    .map(|a| state.skill_level(a.skill) < a.unlock_level)
                    .unwrap_or(false)
            })
            .collect();

        let input_depletion = active
            .and_then(|id| self.registries.action_by_id(id))
            .filter(|a| a.is_consuming())
            .map(|a| a.inputs.iter().map(|(item, _)| *item).collect())
            .unwrap_or_default();

        let watch_set = WatchSet {
            upgrade_affordability: buy_upgrades.clone(),
            skill_unlocks: unresolved_unlocks,
            input_depletion,
            goal_crossing: true,
        };

        Candidates {
            switch_to_activities,
            buy_upgrades,
            macros: self.build_macro_candidates(state, goal),
            should_emit_sell_candidate: !state.inventory().is_empty(),
            sell_policy: goal.compute_sell_policy(state, &*self.registries),
            watch_set,
        }
    }
}
