use crate::types::{Interaction, MacroCandidate, WaitFor};
use crate::Ticks;

/// A single edge traversed by the accepted plan. `Wait`/`Macro` consume
/// ticks; `Interaction` never does (`spec.md` invariant 2).
#[derive(Debug, Clone)]
pub enum PlanStep {
    Interaction(Interaction),
    Wait {
        ticks: Ticks,
        wait_for: WaitFor,
        expected_action: Option<crate::types::ActionId>,
    },
    Macro {
        macro_candidate: MacroCandidate,
        ticks_planned: Ticks,
        wait_for: WaitFor,
    },
}

impl PlanStep {
    pub fn ticks(&self) -> Ticks {
        match self {
            PlanStep::Interaction(_) => 0,
            PlanStep::Wait { ticks, .. } => *ticks,
            PlanStep::Macro { ticks_planned, .. } => *ticks_planned,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
    pub total_ticks: Ticks,
    pub interaction_count: usize,
    pub expected_deaths: f64,
    pub expanded_nodes: usize,
    pub enqueued_nodes: usize,
}

impl Plan {
    pub fn empty() -> Self {
        Self::default()
    }
}
