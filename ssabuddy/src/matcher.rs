//! Target matching. Pure functions; no state survives between calls.

use extract::Reading;
use lexicon::Target;

/// Index of the first target the reading satisfies, in list order.
///
/// List order is priority order: once an earlier target is satisfied, later
/// ones are not consulted.
pub fn first_match(reading: &Reading, targets: &[Target]) -> Option<usize> {
    targets.iter().position(|target| satisfies(reading, target))
}

/// A target is satisfied when its passive set is a subset of the reading's
/// passives and every thresholded stat is present with a sufficient value.
/// A threshold at or below zero only requires presence.
fn satisfies(reading: &Reading, target: &Target) -> bool {
    if !target
        .passives()
        .iter()
        .all(|passive| reading.passives.contains(passive))
    {
        return false;
    }

    target
        .thresholds()
        .iter()
        .all(|(name, &required)| match reading.stats.get(name) {
            Some(&value) => required <= 0.0 || value >= required,
            None => false,
        })
}
