//! Prerequisite resolver (`spec.md` §4.7, `_ensure_executable`): bounded-
//! depth DFS over an action's unlock and input requirements. Grounded on
//! the teacher's `clustering::abstraction` bounded recursive merge — same
//! visited-set-plus-depth-cap shape against a different domain.

use crate::error::ExecUnknown;
use crate::traits::{GameState, Registries};
use crate::types::{ActionId, MacroCandidate, MacroStopRule};
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub enum ExecStatus {
    Ready,
    NeedsPrerequisite(MacroCandidate),
}

/// Determine whether `action_id` can execute now, and if not, the single
/// prerequisite macro that would unblock it. Prerequisite resolution
/// never emits stocking macros (`spec.md` §4.7) — those are the
/// enumerator's job.
pub fn ensure_executable<S, R>(state: &S, action_id: ActionId, registries: &R, max_depth: usize) -> Result<ExecStatus, ExecUnknown>
where
    S: GameState,
    R: Registries,
{
    let mut visited = HashSet::new();
    ensure_executable_inner(state, action_id, registries, &mut visited, 0, max_depth)
}

fn ensure_executable_inner<S, R>(
    state: &S,
    action_id: ActionId,
    registries: &R,
    visited: &mut HashSet<ActionId>,
    depth: usize,
    max_depth: usize,
) -> Result<ExecStatus, ExecUnknown>
where
    S: GameState,
    R: Registries,
{
    if depth > max_depth {
        return Err(ExecUnknown::DepthExceeded { action_id, depth });
    }
    if !visited.insert(action_id) {
        return Err(ExecUnknown::Cycle { action_id });
    }

    let Some(action) = registries.action_by_id(action_id) else {
        return Err(ExecUnknown::NoProducer { item_id: crate::types::ItemId(0) });
    };

    if state.skill_level(action.skill) < action.unlock_level {
        log::trace!("prerequisite: {action_id} needs {:?} level {}", action.skill, action.unlock_level);
        return Ok(ExecStatus::NeedsPrerequisite(MacroCandidate::TrainSkillUntil {
            skill: action.skill,
            primary_stop: MacroStopRule::AtSkillLevel { skill: action.skill, level: action.unlock_level },
            watched_stops: vec![],
        }));
    }

    for (item, needed) in &action.inputs {
        if state.inventory_count(*item) >= *needed {
            continue;
        }
        let producers = registries.producers_of(*item);
        let unlocked_producer = producers.iter().find(|p| state.skill_level(p.skill) >= p.unlock_level);
        if let Some(producer) = unlocked_producer {
            match ensure_executable_inner(state, producer.id, registries, visited, depth + 1, max_depth)? {
                ExecStatus::Ready => continue,
                needs @ ExecStatus::NeedsPrerequisite(_) => return Ok(needs),
            }
        } else if let Some(locked_producer) = producers.first() {
            return Ok(ExecStatus::NeedsPrerequisite(MacroCandidate::TrainSkillUntil {
                skill: locked_producer.skill,
                primary_stop: MacroStopRule::AtSkillLevel {
                    skill: locked_producer.skill,
                    level: locked_producer.unlock_level,
                },
                watched_stops: vec![],
            }));
        } else {
            return Err(ExecUnknown::NoProducer { item_id: *item });
        }
    }

    Ok(ExecStatus::Ready)
}
