use crate::toy::{level_for_xp, xp_for_level};
use crate::traits::GameState;
use crate::types::{ActionId, ItemId, PurchaseId, SkillId, Tool};
use crate::{Gold, Xp};
use std::collections::BTreeMap;

/// Value-semantic world state for the toy game: every transition returns
/// a new `ToyState` (`spec.md` invariant 3), the same contract the
/// teacher's `gameplay::game::Game` holds for `apply`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToyState {
    pub currency: Gold,
    pub inventory: BTreeMap<ItemId, u64>,
    pub hp: i32,
    pub active_action: Option<ActionId>,
    pub skill_xp: BTreeMap<SkillId, Xp>,
    pub mastery_xp: BTreeMap<ActionId, Xp>,
    pub tool_tiers: BTreeMap<Tool, u32>,
    pub shop_counts: BTreeMap<PurchaseId, u32>,
}

impl ToyState {
    pub fn new() -> Self {
        ToyState { hp: 100, ..Default::default() }
    }
}

impl GameState for ToyState {
    fn currency(&self) -> Gold {
        self.currency
    }

    fn inventory(&self) -> Vec<(ItemId, u64)> {
        self.inventory.iter().map(|(id, n)| (*id, *n)).collect()
    }

    fn hp(&self) -> i32 {
        self.hp
    }

    fn active_action(&self) -> Option<ActionId> {
        self.active_action
    }

    fn skill_xp(&self, skill: SkillId) -> Xp {
        *self.skill_xp.get(&skill).unwrap_or(&0)
    }

    fn skill_level(&self, skill: SkillId) -> u32 {
        level_for_xp(self.skill_xp(skill))
    }

    fn mastery_xp(&self, action: ActionId) -> Xp {
        *self.mastery_xp.get(&action).unwrap_or(&0)
    }

    fn mastery_level(&self, action: ActionId) -> u32 {
        level_for_xp(self.mastery_xp(action))
    }

    fn shop_count(&self, purchase: PurchaseId) -> u32 {
        *self.shop_counts.get(&purchase).unwrap_or(&0)
    }

    fn tool_tier(&self, tool: Tool) -> u32 {
        *self.tool_tiers.get(&tool).unwrap_or(&0)
    }

    fn xp_required_for_level(&self, _skill: SkillId, level: u32) -> Xp {
        xp_for_level(level)
    }
}
