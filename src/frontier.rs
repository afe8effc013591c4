//! Pareto Frontier (`spec.md` §4.2): per-bucket dominance pruning over
//! `(ticks, progress)`. Grounded on the teacher's `mccfr::tree::Tree`
//! bucket-to-infoset map (`BTreeMap<Bucket, Info>`, witnessed lazily on
//! insert) — same "map keyed by coarsened equivalence class, appended to
//! lazily" shape, here with a tiny per-bucket `Vec` instead of an infoset.

use crate::types::{BucketKey, FrontierPoint};
use crate::{Progress, Ticks};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ParetoFrontier {
    buckets: HashMap<BucketKey, Vec<FrontierPoint>>,
    inserted: usize,
    removed: usize,
}

impl ParetoFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `(ticks, progress)` into `key`'s bucket. Returns `true` if
    /// the point was dominated by an existing point (and therefore NOT
    /// inserted), `false` if it was inserted (possibly removing points it
    /// dominates).
    pub fn is_dominated_or_insert(&mut self, key: BucketKey, ticks: Ticks, progress: Progress) -> bool {
        let candidate = FrontierPoint::new(ticks, progress);
        let points = self.buckets.entry(key).or_default();

        for existing in points.iter() {
            if existing.ticks <= candidate.ticks && existing.progress >= candidate.progress {
                log::trace!("frontier: ({ticks}, {progress}) dominated by ({}, {})", existing.ticks, existing.progress);
                return true;
            }
        }

        let before = points.len();
        points.retain(|existing| {
            !(candidate.ticks <= existing.ticks && candidate.progress >= existing.progress)
        });
        self.removed += before - points.len();
        points.push(candidate);
        self.inserted += 1;
        false
    }

    pub fn stats(&self) -> (usize, usize) {
        (self.inserted, self.removed)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn points_in(&self, key: &BucketKey) -> &[FrontierPoint] {
        self.buckets.get(key).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionId;

    fn key() -> BucketKey {
        BucketKey {
            activity: Some(ActionId(1)),
            skill_levels: vec![],
            axe_level: 0,
            rod_level: 0,
            pick_level: 0,
            hp_bucket: None,
            mastery_level: None,
            inventory_bucket: vec![],
            input_item_mix: 0,
        }
    }

    #[test]
    fn first_insert_is_never_dominated() {
        let mut frontier = ParetoFrontier::new();
        assert!(!frontier.is_dominated_or_insert(key(), 10, 5));
    }

    #[test]
    fn strictly_worse_point_is_dominated() {
        let mut frontier = ParetoFrontier::new();
        assert!(!frontier.is_dominated_or_insert(key(), 10, 5));
        assert!(frontier.is_dominated_or_insert(key(), 20, 3));
    }

    #[test]
    fn strictly_better_point_evicts_dominated() {
        let mut frontier = ParetoFrontier::new();
        assert!(!frontier.is_dominated_or_insert(key(), 20, 3));
        assert!(!frontier.is_dominated_or_insert(key(), 10, 5));
        assert_eq!(frontier.points_in(&key()).len(), 1);
    }

    #[test]
    fn incomparable_points_both_survive() {
        let mut frontier = ParetoFrontier::new();
        assert!(!frontier.is_dominated_or_insert(key(), 10, 5));
        assert!(!frontier.is_dominated_or_insert(key(), 5, 3));
        assert_eq!(frontier.points_in(&key()).len(), 2);
    }

    #[test]
    fn equal_point_is_dominated_not_duplicated() {
        let mut frontier = ParetoFrontier::new();
        assert!(!frontier.is_dominated_or_insert(key(), 10, 5));
        assert!(frontier.is_dominated_or_insert(key(), 10, 5));
        assert_eq!(frontier.points_in(&key()).len(), 1);
    }

    #[test]
    fn no_two_points_in_a_bucket_dominate_each_other() {
        let mut frontier = ParetoFrontier::new();
        let mut rng_points = vec![(10u64, 5i64), (8, 6), (20, 1), (3, 9), (15, 5)];
        rng_points.sort();
        for (t, p) in rng_points {
            frontier.is_dominated_or_insert(key(), t, p);
        }
        let points = frontier.points_in(&key());
        for i in 0..points.len() {
            for j in 0..points.len() {
                if i == j {
                    continue;
                }
                assert!(!points[i].dominates(&points[j]), "{:?} dominates {:?}", points[i], points[j]);
            }
        }
    }
}
