use crate::types::{ActionId, ItemId, SkillId};
use crate::Probability;
use std::collections::BTreeMap;

/// Per-tick flows for the currently (or hypothetically) active action.
/// Produced by the `Estimator` collaborator, consumed by the Rate Cache
/// (§4.1) and State Advance (§4.4).
#[derive(Debug, Clone, Default)]
pub struct Rates {
    pub action: Option<ActionId>,
    pub xp_per_tick: BTreeMap<SkillId, f64>,
    pub mastery_xp_per_tick: f64,
    pub item_flows_per_tick: BTreeMap<ItemId, f64>,
    pub items_consumed_per_tick: BTreeMap<ItemId, f64>,
    /// Non-zero only for actions with a death/failure model (thieving-like).
    /// `ticks_until_death` is the expected number of ticks before a death
    /// occurs at the raw (pre-cycle-correction) rate; `None` means no risk.
    pub ticks_until_death: Option<f64>,
    pub success_probability: Probability,
}

impl Rates {
    pub fn has_death_risk(&self) -> bool {
        self.ticks_until_death.is_some()
    }

    /// Fold the death/restart cycle into long-run-average flows: an
    /// action that kills the player every `ticks_until_death` ticks loses
    /// the remainder of that cycle to the restart, so divide every raw
    /// per-tick rate by `(1 + restart_overhead / ticks_until_death)`.
    /// `restart_overhead_ticks` is the collaborator's estimate of how long
    /// a death-to-restart round trip costs (travel, healing, etc).
    pub fn cycle_adjusted(&self, restart_overhead_ticks: f64) -> Rates {
        let Some(death_ticks) = self.ticks_until_death else {
            return self.clone();
        };
        if death_ticks <= 0.0 {
            return self.clone();
        }
        let factor = death_ticks / (death_ticks + restart_overhead_ticks);
        Rates {
            action: self.action,
            xp_per_tick: self
                .xp_per_tick
                .iter()
                .map(|(k, v)| (*k, v * factor))
                .collect(),
            mastery_xp_per_tick: self.mastery_xp_per_tick * factor,
            item_flows_per_tick: self
                .item_flows_per_tick
                .iter()
                .map(|(k, v)| (*k, v * factor))
                .collect(),
            items_consumed_per_tick: self
                .items_consumed_per_tick
                .iter()
                .map(|(k, v)| (*k, v * factor))
                .collect(),
            ticks_until_death: self.ticks_until_death,
            success_probability: self.success_probability,
        }
    }
}
