//! Closed error sums (`spec.md` §7). Plain enums with manual `Display` +
//! `std::error::Error`, matching the teacher's `Edge`/`Turn`/`Player` —
//! no `thiserror` anywhere in the teacher's dependency table, so none
//! here either.

use crate::rate_cache::RateCacheReason;
use crate::types::{ActionId, ItemId, PurchaseId};
use crate::Gold;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverFailure {
    ExpandedNodesExceeded { expanded: usize, enqueued: usize, best_credits: Gold },
    QueueSizeExceeded { expanded: usize, enqueued: usize, best_credits: Gold },
    HeapExhausted { expanded: usize, enqueued: usize, best_credits: Gold },
    ZeroRootRate { reason: RateCacheReason, expanded: usize, enqueued: usize, best_credits: Gold },
}

impl SolverFailure {
    pub fn expanded(&self) -> usize {
        match self {
            SolverFailure::ExpandedNodesExceeded { expanded, .. }
            | SolverFailure::QueueSizeExceeded { expanded, .. }
            | SolverFailure::HeapExhausted { expanded, .. }
            | SolverFailure::ZeroRootRate { expanded, .. } => *expanded,
        }
    }
    pub fn enqueued(&self) -> usize {
        match self {
            SolverFailure::ExpandedNodesExceeded { enqueued, .. }
            | SolverFailure::QueueSizeExceeded { enqueued, .. }
            | SolverFailure::HeapExhausted { enqueued, .. }
            | SolverFailure::ZeroRootRate { enqueued, .. } => *enqueued,
        }
    }
    pub fn best_credits(&self) -> Gold {
        match self {
            SolverFailure::ExpandedNodesExceeded { best_credits, .. }
            | SolverFailure::QueueSizeExceeded { best_credits, .. }
            | SolverFailure::HeapExhausted { best_credits, .. }
            | SolverFailure::ZeroRootRate { best_credits, .. } => *best_credits,
        }
    }
}

impl std::fmt::Display for SolverFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            SolverFailure::ExpandedNodesExceeded { .. } => "expanded-nodes cap exceeded".to_string(),
            SolverFailure::QueueSizeExceeded { .. } => "queue-size cap exceeded".to_string(),
            SolverFailure::HeapExhausted { .. } => "search space exhausted without reaching the goal".to_string(),
            SolverFailure::ZeroRootRate { reason, .. } => format!("zero root rate: {reason}"),
        };
        write!(
            f,
            "{reason} (expanded={}, enqueued={}, best_credits={})",
            self.expanded(),
            self.enqueued(),
            self.best_credits()
        )
    }
}

impl std::error::Error for SolverFailure {}

/// Prerequisite resolver failure (`spec.md` §4.7/§7): no path found to
/// make an action executable.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecUnknown {
    NoProducer { item_id: ItemId },
    Cycle { action_id: ActionId },
    DepthExceeded { action_id: ActionId, depth: usize },
}

impl std::fmt::Display for ExecUnknown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecUnknown::NoProducer { item_id } => write!(f, "no producer for {item_id}"),
            ExecUnknown::Cycle { action_id } => write!(f, "prerequisite cycle detected at {action_id}"),
            ExecUnknown::DepthExceeded { action_id, depth } => {
                write!(f, "prerequisite depth {depth} exceeded resolving {action_id}")
            }
        }
    }
}

impl std::error::Error for ExecUnknown {}

/// `spec.md` §7: the closed sum the Replanning Loop dispatches on.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplanBoundary {
    GoalReached,
    WaitConditionSatisfied,
    PlannedSegmentStop,
    UpgradeAffordableEarly { purchase_id: PurchaseId },
    UnlockObserved { action_id: ActionId },
    UnexpectedUnlock { action_id: ActionId },
    InputsDepleted { action_id: ActionId, missing_item: Option<ItemId> },
    InventoryFull,
    InventoryPressure,
    Death,
    NoProgressPossible { reason: String },
    CannotAfford { purchase_id: PurchaseId },
    ActionUnavailable { action_id: ActionId },
    ReplanLimitExceeded { limit: usize },
    TimeBudgetExceeded { limit: crate::Ticks, actual: crate::Ticks },
}

impl std::fmt::Display for ReplanBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplanBoundary::GoalReached => write!(f, "goal reached"),
            ReplanBoundary::WaitConditionSatisfied => write!(f, "wait condition satisfied"),
            ReplanBoundary::PlannedSegmentStop => write!(f, "planned segment stop"),
            ReplanBoundary::UpgradeAffordableEarly { purchase_id } => {
                write!(f, "upgrade {purchase_id} affordable early")
            }
            ReplanBoundary::UnlockObserved { action_id } => write!(f, "unlock observed: {action_id}"),
            ReplanBoundary::UnexpectedUnlock { action_id } => write!(f, "unexpected unlock: {action_id}"),
            ReplanBoundary::InputsDepleted { action_id, missing_item } => write!(
                f,
                "inputs depleted for {action_id}{}",
                missing_item.map(|i| format!(" (missing {i})")).unwrap_or_default()
            ),
            ReplanBoundary::InventoryFull => write!(f, "inventory full"),
            ReplanBoundary::InventoryPressure => write!(f, "inventory pressure"),
            ReplanBoundary::Death => write!(f, "death"),
            ReplanBoundary::NoProgressPossible { reason } => write!(f, "no progress possible: {reason}"),
            ReplanBoundary::CannotAfford { purchase_id } => write!(f, "cannot afford {purchase_id}"),
            ReplanBoundary::ActionUnavailable { action_id } => write!(f, "action unavailable: {action_id}"),
            ReplanBoundary::ReplanLimitExceeded { limit } => write!(f, "replan limit {limit} exceeded"),
            ReplanBoundary::TimeBudgetExceeded { limit, actual } => {
                write!(f, "time budget exceeded: {actual} > {limit}")
            }
        }
    }
}

impl std::error::Error for ReplanBoundary {}

impl ReplanBoundary {
    /// `spec.md` §4.10 step 4: boundaries that always force a replan.
    pub fn always_forces_replan(&self) -> bool {
        matches!(
            self,
            ReplanBoundary::NoProgressPossible { .. }
                | ReplanBoundary::InputsDepleted { .. }
                | ReplanBoundary::InventoryFull
                | ReplanBoundary::PlannedSegmentStop
                | ReplanBoundary::UnlockObserved { .. }
                | ReplanBoundary::InventoryPressure
        )
    }
}

/// Outcome of the Macro Expander (`spec.md` §4.7/§7).
#[derive(Debug, Clone)]
pub enum MacroOutcome<S> {
    Expanded(crate::macro_expander::ExpandResult<S>),
    AlreadySatisfied { reason: String },
    CannotExpand { reason: String },
    NeedsPrerequisite { prereq: Box<crate::types::MacroCandidate> },
    NeedsBoundary { boundary: ReplanBoundary },
}
