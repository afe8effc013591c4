use crate::toy::{AXE_UPGRADE, BURN_LOGS, CHOP_WOOD, FIREMAKING, LOGS, STEAL, STOLEN_GOODS, THIEVING, WOODCUTTING};
use crate::traits::registries::{ActionDef, ItemDef, ShopPurchaseDef, UnlockBoundary};
use crate::traits::Registries;
use crate::types::{ActionId, ItemId, PurchaseId};

/// Static content for the toy game: three actions, two sellable items,
/// one shop upgrade. Built once per `ToyWorld` and shared (via `Arc`)
/// across every collaborator, per `spec.md` §5.
pub struct ToyRegistries {
    actions: Vec<ActionDef>,
    items: Vec<ItemDef>,
    purchases: Vec<ShopPurchaseDef>,
    unlocks: Vec<UnlockBoundary>,
}

impl ToyRegistries {
    pub fn new() -> Self {
        let actions = vec![
            ActionDef {
                id: CHOP_WOOD,
                skill: WOODCUTTING,
                unlock_level: 1,
                mean_duration_ticks: 10,
                xp_per_action: 10,
                outputs: vec![(LOGS, 1.0)],
                inputs: vec![],
                success_probability: 1.0,
                stun_ticks: 0,
                death_probability: 0.0,
            },
            ActionDef {
                id: BURN_LOGS,
                skill: FIREMAKING,
                unlock_level: 1,
                mean_duration_ticks: 5,
                xp_per_action: 5,
                outputs: vec![],
                inputs: vec![(LOGS, 1)],
                success_probability: 1.0,
                stun_ticks: 0,
                death_probability: 0.0,
            },
            ActionDef {
                id: STEAL,
                skill: THIEVING,
                unlock_level: 1,
                mean_duration_ticks: 8,
                xp_per_action: 8,
                outputs: vec![(STOLEN_GOODS, 1.0)],
                inputs: vec![],
                success_probability: 0.8,
                stun_ticks: 20,
                death_probability: 0.05,
            },
        ];

        let items = vec![
            ItemDef { id: LOGS, sell_price: 2 },
            ItemDef { id: STOLEN_GOODS, sell_price: 15 },
        ];

        let purchases = vec![ShopPurchaseDef {
            id: AXE_UPGRADE,
            cost: 100,
            duration_discount: 0.25,
            affects_skill: Some(WOODCUTTING),
        }];

        let unlocks = vec![
            UnlockBoundary { skill: WOODCUTTING, level: 1, newly_unlocked: vec![CHOP_WOOD] },
            UnlockBoundary { skill: FIREMAKING, level: 1, newly_unlocked: vec![BURN_LOGS] },
            UnlockBoundary { skill: THIEVING, level: 1, newly_unlocked: vec![STEAL] },
        ];

        ToyRegistries { actions, items, purchases, unlocks }
    }

    pub fn purchases(&self) -> &[ShopPurchaseDef] {
        &self.purchases
    }
}

impl Default for ToyRegistries {
    fn default() -> Self {
        Self::new()
    }
}

impl Registries for ToyRegistries {
    fn all_actions(&self) -> &[ActionDef] {
        &self.actions
    }

    fn actions_for_skill(&self, skill: crate::types::SkillId) -> Vec<&ActionDef> {
        self.actions.iter().filter(|a| a.skill == skill).collect()
    }

    fn action_by_id(&self, id: ActionId) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.id == id)
    }

    fn item_by_id(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.iter().find(|i| i.id == id)
    }

    fn shop_by_id(&self, id: PurchaseId) -> Option<&ShopPurchaseDef> {
        self.purchases.iter().find(|p| p.id == id)
    }

    fn unlock_boundaries(&self) -> &[UnlockBoundary] {
        &self.unlocks
    }
}
