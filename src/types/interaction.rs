use crate::types::{ActionId, ItemId, PurchaseId};

/// Which inventory stacks a sell step converts to currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SellPolicy {
    SellAll,
    ByItem(Vec<ItemId>),
    ByPredicateKeepRecent { keep_latest_of: Vec<ItemId> },
}

impl Default for SellPolicy {
    fn default() -> Self {
        SellPolicy::SellAll
    }
}

impl SellPolicy {
    pub fn sells(&self, item: ItemId) -> bool {
        match self {
            SellPolicy::SellAll => true,
            SellPolicy::ByItem(items) => items.contains(&item),
            SellPolicy::ByPredicateKeepRecent { keep_latest_of } => {
                !keep_latest_of.contains(&item)
            }
        }
    }
}

/// A zero-time interaction edge (`spec.md` invariant 2: interactions never
/// consume ticks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    SwitchActivity { action_id: ActionId },
    BuyShopItem { purchase_id: PurchaseId },
    SellItems { policy: SellPolicy },
}

impl std::fmt::Display for Interaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interaction::SwitchActivity { action_id } => write!(f, "switch({action_id})"),
            Interaction::BuyShopItem { purchase_id } => write!(f, "buy({purchase_id})"),
            Interaction::SellItems { policy } => write!(f, "sell({policy:?})"),
        }
    }
}
