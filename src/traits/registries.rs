use crate::types::{ActionId, ItemId, PurchaseId, SkillId};
use crate::{Gold, Ticks, Xp};

/// A single action the player can be actively running. Output items and
/// xp gain are rates the estimator converts per-tick; `inputs` are
/// consumed per completed action (the defining trait of a "consuming
/// skill", `spec.md` glossary).
#[derive(Debug, Clone)]
pub struct ActionDef {
    pub id: ActionId,
    pub skill: SkillId,
    pub unlock_level: u32,
    pub mean_duration_ticks: Ticks,
    pub xp_per_action: Xp,
    pub outputs: Vec<(ItemId, f64)>,
    pub inputs: Vec<(ItemId, u64)>,
    /// Thieving-like actions carry a success probability, a stun penalty
    /// (in ticks, applied on failure) and a death probability. Zero means
    /// "no death/failure model" for ordinary skilling actions.
    pub success_probability: f32,
    pub stun_ticks: Ticks,
    pub death_probability: f32,
}

impl ActionDef {
    pub fn is_consuming(&self) -> bool {
        !self.inputs.is_empty()
    }
    pub fn has_death_risk(&self) -> bool {
        self.death_probability > 0.0
    }
}

#[derive(Debug, Clone)]
pub struct ItemDef {
    pub id: ItemId,
    pub sell_price: Gold,
}

#[derive(Debug, Clone)]
pub struct ShopPurchaseDef {
    pub id: PurchaseId,
    pub cost: Gold,
    /// If this purchase raises a tool tier, which skill's action durations
    /// it discounts and by what fraction (0.1 == 10% faster).
    pub duration_discount: f32,
    pub affects_skill: Option<SkillId>,
}

/// An unlock boundary: a (skill, level) threshold at which a new set of
/// actions becomes available. `unlock_boundaries` returns these sorted
/// ascending by level per skill, as spec §6 requires.
#[derive(Debug, Clone)]
pub struct UnlockBoundary {
    pub skill: SkillId,
    pub level: u32,
    pub newly_unlocked: Vec<ActionId>,
}

/// Read-only capability handle into the game's static content. `spec.md`
/// §5 calls this the only shared resource the core reads; every
/// `GameState` holds a (cheaply cloned/shared) handle to the same
/// registries instance.
pub trait Registries: Send + Sync {
    fn all_actions(&self) -> &[ActionDef];
    fn actions_for_skill(&self, skill: SkillId) -> Vec<&ActionDef>;
    fn action_by_id(&self, id: ActionId) -> Option<&ActionDef>;
    fn item_by_id(&self, id: ItemId) -> Option<&ItemDef>;
    fn shop_by_id(&self, id: PurchaseId) -> Option<&ShopPurchaseDef>;
    fn unlock_boundaries(&self) -> &[UnlockBoundary];

    /// Producers of `item`: actions whose outputs include it.
    fn producers_of(&self, item: ItemId) -> Vec<&ActionDef> {
        self.all_actions()
            .iter()
            .filter(|a| a.outputs.iter().any(|(id, _)| *id == item))
            .collect()
    }
}
