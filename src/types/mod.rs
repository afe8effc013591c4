pub mod bucket;
pub mod candidates;
pub mod goal;
pub mod ids;
pub mod interaction;
pub mod macro_candidate;
pub mod plan_step;
pub mod rates;
pub mod wait_for;

pub use bucket::{BucketKey, FrontierPoint};
pub use candidates::{Candidates, WatchSet};
pub use goal::Goal;
pub use ids::{ActionId, ItemId, PurchaseId, SkillId, Tool};
pub use interaction::{Interaction, SellPolicy};
pub use macro_candidate::{MacroCandidate, MacroStopRule};
pub use plan_step::{Plan, PlanStep};
pub use rates::Rates;
pub use wait_for::WaitFor;
