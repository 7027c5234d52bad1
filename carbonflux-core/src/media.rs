//! Append-only ledger of environmental metabolite concentrations over time.

use std::collections::{BTreeMap, BTreeSet};

/// Concentration snapshots keyed by exchange-reaction id, one per timestep.
///
/// `f64::INFINITY` marks an unlimited nutrient and `f64::NEG_INFINITY` a fully
/// restricted one. Snapshots are never mutated in place, only appended, so the
/// full history stays available for replay and debugging. Reactions absent
/// from a snapshot count as concentration 0 for kinetics purposes.
#[derive(Debug, Clone)]
pub struct MediaLedger {
    snapshots: Vec<BTreeMap<String, f64>>,
    fixed: BTreeSet<String>,
}

impl MediaLedger {
    /// Start a ledger from an initial snapshot. Reactions in `fixed` keep
    /// their concentration no matter what deltas are applied.
    pub fn new(initial: BTreeMap<String, f64>, fixed: impl IntoIterator<Item = String>) -> Self {
        MediaLedger {
            snapshots: vec![initial],
            fixed: fixed.into_iter().collect(),
        }
    }

    /// The latest snapshot.
    pub fn current(&self) -> &BTreeMap<String, f64> {
        self.snapshots
            .last()
            .expect("ledger always holds at least the initial snapshot")
    }

    /// Concentration of one reaction in the current snapshot, 0 if absent.
    pub fn concentration(&self, reaction_id: &str) -> f64 {
        self.current().get(reaction_id).copied().unwrap_or(0.0)
    }

    pub fn is_fixed(&self, reaction_id: &str) -> bool {
        self.fixed.contains(reaction_id)
    }

    /// Append a new snapshot produced by adding the signed deltas to the
    /// current one. Fixed reactions carry forward unchanged; everything else
    /// clamps at zero from below. This is total and is the only mutator.
    pub fn apply(&mut self, deltas: &BTreeMap<String, f64>) {
        let mut next = self.current().clone();
        for (reaction_id, delta) in deltas {
            if self.fixed.contains(reaction_id) {
                continue;
            }
            let previous = next.get(reaction_id).copied().unwrap_or(0.0);
            next.insert(reaction_id.clone(), (previous + delta).max(0.0));
        }
        self.snapshots.push(next);
    }

    /// All snapshots, indexed by timestep.
    pub fn history(&self) -> &[BTreeMap<String, f64>] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> MediaLedger {
        MediaLedger::new(
            BTreeMap::from([
                ("EX_glc_e".to_string(), 10.0),
                ("EX_o2_e".to_string(), f64::INFINITY),
                ("EX_nh4_e".to_string(), 5.0),
            ]),
            ["EX_nh4_e".to_string()],
        )
    }

    #[test]
    fn zero_delta_reproduces_previous_snapshot() {
        let mut media = ledger();
        let before = media.current().clone();
        media.apply(&BTreeMap::new());
        assert_eq!(media.len(), 2);
        assert_eq!(media.current(), &before);
    }

    #[test]
    fn fixed_reactions_never_change() {
        let mut media = ledger();
        media.apply(&BTreeMap::from([("EX_nh4_e".to_string(), -3.0)]));
        assert_eq!(media.concentration("EX_nh4_e"), 5.0);
    }

    #[test]
    fn concentrations_clamp_at_zero() {
        let mut media = ledger();
        media.apply(&BTreeMap::from([("EX_glc_e".to_string(), -25.0)]));
        assert_eq!(media.concentration("EX_glc_e"), 0.0);
    }

    #[test]
    fn secretion_raises_concentration_even_for_unknown_reactions() {
        let mut media = ledger();
        media.apply(&BTreeMap::from([("EX_ac_e".to_string(), 1.5)]));
        assert_eq!(media.concentration("EX_ac_e"), 1.5);
    }

    #[test]
    fn unlimited_nutrients_stay_unlimited_under_uptake() {
        let mut media = ledger();
        media.apply(&BTreeMap::from([("EX_o2_e".to_string(), -4.0)]));
        assert_eq!(media.concentration("EX_o2_e"), f64::INFINITY);
    }

    #[test]
    fn snapshot_count_increases_by_one_per_apply() {
        let mut media = ledger();
        for i in 0..4 {
            media.apply(&BTreeMap::from([("EX_glc_e".to_string(), -1.0)]));
            assert_eq!(media.len(), i + 2);
        }
        assert_eq!(media.history().len(), 5);
        assert_eq!(media.concentration("EX_glc_e"), 6.0);
    }
}
