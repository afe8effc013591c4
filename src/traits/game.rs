use crate::types::{ActionId, ItemId, PurchaseId, SkillId, Tool};
use crate::{Gold, Xp};

/// The tree-local world state is fully abstracted: it must be supplied by
/// the game collaborator. Every transition returns a new state — `apply`
/// in the teacher's `gameplay::game::Game` never mutates `self`, cloning
/// first; the same contract holds here. `spec.md` §3 calls this value
/// semantics out as an invariant, not an implementation suggestion.
pub trait GameState: Clone + Send + Sync {
    /// Current currency balance.
    fn currency(&self) -> Gold;

    /// Inventory as an ordered sequence of (item, count) stacks. Ordering
    /// must be stable across clones of logically-equal states so the
    /// bucketed inventory key in `BucketKey`/state-key is deterministic.
    fn inventory(&self) -> Vec<(ItemId, u64)>;

    fn inventory_count(&self, item: ItemId) -> u64 {
        self.inventory()
            .into_iter()
            .find(|(id, _)| *id == item)
            .map(|(_, n)| n)
            .unwrap_or(0)
    }

    /// Current player vital. `None` if the collaborator's game has no
    /// health model at all (hp tracking is then simply never requested
    /// by any `Goal::should_track_hp`).
    fn hp(&self) -> i32;

    /// The action currently running, if any.
    fn active_action(&self) -> Option<ActionId>;

    /// Accumulated experience in a skill, and the level it derives to.
    fn skill_xp(&self, skill: SkillId) -> Xp;
    fn skill_level(&self, skill: SkillId) -> u32;

    /// Accumulated mastery experience for an action, and its derived level.
    fn mastery_xp(&self, action: ActionId) -> Xp;
    fn mastery_level(&self, action: ActionId) -> u32;

    /// Number of times a shop purchase has been bought (tool tiers and
    /// other stacking unlocks are modeled as repeated purchases).
    fn shop_count(&self, purchase: PurchaseId) -> u32;

    /// Current tier of one of the three tracked tools.
    fn tool_tier(&self, tool: Tool) -> u32;

    /// The xp threshold for a given level in `skill`, per the registries
    /// handle this state carries. `ReachSkillLevel` goals are expressed in
    /// levels (`spec.md` example 2); this is how they're converted to the
    /// xp amounts `skill_xp` deals in.
    fn xp_required_for_level(&self, skill: SkillId, level: u32) -> Xp;
}
