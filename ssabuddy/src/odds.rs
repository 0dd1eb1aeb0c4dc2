//! Success-odds, cost and trial estimation, driven only by the target list.
//!
//! Runs independently of the roll loop: before a run to tell the operator
//! what they are signing up for, during a run to project remaining time and
//! spend.

use lexicon::Target;

use crate::config::Config;

/// Probability that one roll lands all requested passives, keyed by how many
/// the target requires. Selection without replacement over the six-passive
/// universe: one specific passive is 1/6, a specific pair is 1/C(6,2).
const PASSIVE_ODDS: [f64; 3] = [1.0, 1.0 / 6.0, 1.0 / 15.0];

/// Pool sizes for landing N requested stats, keyed by N. A roll fills five
/// of the nine stat slots: C(9-N, 5-N) favorable of C(9,5) total.
const STAT_POOL: [f64; 6] = [126.0, 70.0, 35.0, 15.0, 5.0, 1.0];

/// Lower clamp so downstream division by the probability is always safe.
const MIN_PROBABILITY: f64 = 1e-12;

/// Aggregate estimate over an ordered target list.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct OddsEstimate {
    /// Chance that one roll satisfies at least one target, in (0, 1].
    pub combined_probability: f64,
    /// Expected rolls until the first success.
    pub expected_trials: f64,
    /// Fixed price per roll for this run's trial mode.
    pub cost_per_trial: f64,
    /// Expected total spend until the first success.
    pub expected_cost: f64,
    /// Number of structurally distinct targets that contributed probability.
    pub deduped_target_count: usize,
}

impl OddsEstimate {
    /// Chance of at least one success within `budget`, spending
    /// `cost_per_trial` per roll: `1 - (1 - p)^N` over the affordable rolls.
    pub fn success_within_budget(&self, budget: f64) -> f64 {
        if self.cost_per_trial <= 0.0 {
            return 1.0;
        }
        let trials = (budget / self.cost_per_trial).floor();
        if trials < 1.0 {
            return 0.0;
        }
        1.0 - (1.0 - self.combined_probability).powf(trials)
    }
}

/// Estimate the odds of an ordered target list.
///
/// Structurally equal targets (same passive set, same threshold pairs)
/// contribute probability once: defining the same target twice does not
/// double its real-world odds. The trial mode is a per-run choice, so a
/// single double-passive target prices every trial at the double rate.
pub fn estimate(targets: &[Target], config: &Config) -> OddsEstimate {
    let mut distinct: Vec<&Target> = Vec::new();
    for target in targets {
        if !distinct.iter().any(|seen| *seen == target) {
            distinct.push(target);
        }
    }

    let combined_probability = distinct
        .iter()
        .map(|target| target_probability(target))
        .sum::<f64>()
        .clamp(MIN_PROBABILITY, 1.0);

    let cost_per_trial = if targets.iter().any(Target::wants_double_roll) {
        config.double_roll_price
    } else {
        config.single_roll_price
    };

    let expected_trials = 1.0 / combined_probability;

    OddsEstimate {
        combined_probability,
        expected_trials,
        cost_per_trial,
        expected_cost: expected_trials * cost_per_trial,
        deduped_target_count: distinct.len(),
    }
}

fn target_probability(target: &Target) -> f64 {
    let passives = PASSIVE_ODDS[target.passives().len()];
    let stats = STAT_POOL[target.thresholds().len()] / STAT_POOL[0];
    passives * stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexicon::{Lexicon, Passive};

    fn target(passives: &[Passive], thresholds: &[(&str, f64)]) -> Target {
        Target::new(
            &Lexicon::standard(),
            passives.iter().copied(),
            thresholds.iter().map(|(n, v)| (*n, *v)),
        )
        .unwrap()
    }

    #[test]
    fn single_passive_target_is_one_in_six() {
        let est = estimate(&[target(&[Passive::PopStar], &[])], &Config::default());
        assert!((est.combined_probability - 1.0 / 6.0).abs() < 1e-12);
        assert!((est.expected_trials - 6.0).abs() < 1e-9);
    }

    #[test]
    fn stat_counts_follow_the_pool_table() {
        let cfg = Config::default();

        let one = estimate(&[target(&[], &[("Pollen", 10.0)])], &cfg);
        assert!((one.combined_probability - 70.0 / 126.0).abs() < 1e-12);

        let two = estimate(&[target(&[], &[("Pollen", 10.0), ("Convert Rate", 10.0)])], &cfg);
        assert!((two.combined_probability - 35.0 / 126.0).abs() < 1e-12);
    }

    #[test]
    fn identical_targets_contribute_once() {
        let a = target(&[Passive::PopStar], &[("Pollen", 15.0)]);
        let b = a.clone();
        let est = estimate(&[a, b], &Config::default());

        assert_eq!(est.deduped_target_count, 1);
        assert!((est.combined_probability - (1.0 / 6.0) * (70.0 / 126.0)).abs() < 1e-12);
    }

    #[test]
    fn distinct_targets_sum() {
        let est = estimate(
            &[target(&[Passive::PopStar], &[]), target(&[Passive::GummyStar], &[])],
            &Config::default(),
        );
        assert_eq!(est.deduped_target_count, 2);
        assert!((est.combined_probability - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn combined_probability_is_clamped_to_unit_interval() {
        // An unconstrained target alone already has probability 1; adding
        // more must not push the sum past 1.
        let est = estimate(
            &[target(&[], &[]), target(&[Passive::PopStar], &[])],
            &Config::default(),
        );
        assert_eq!(est.combined_probability, 1.0);

        // And an empty list clamps up to epsilon instead of zero.
        let est = estimate(&[], &Config::default());
        assert!(est.combined_probability > 0.0);
        assert!(est.expected_trials.is_finite());
    }

    #[test]
    fn any_double_passive_target_prices_every_trial_higher() {
        let cfg = Config::default();
        let single = target(&[Passive::PopStar], &[]);
        let double = target(&[Passive::PopStar, Passive::GuidingStar], &[]);

        let est = estimate(&[single.clone()], &cfg);
        assert_eq!(est.cost_per_trial, cfg.single_roll_price);

        let est = estimate(&[single, double], &cfg);
        assert_eq!(est.cost_per_trial, cfg.double_roll_price);
    }

    #[test]
    fn budgeted_success_chance_matches_the_closed_form() {
        let est = OddsEstimate {
            combined_probability: 0.05,
            expected_trials: 20.0,
            cost_per_trial: 1.0,
            expected_cost: 20.0,
            deduped_target_count: 1,
        };

        // 100 affordable trials at p = 0.05: 1 - 0.95^100.
        let chance = est.success_within_budget(100.0);
        assert!((chance - 0.994079).abs() < 1e-4);

        // Budget below one trial can never succeed.
        assert_eq!(est.success_within_budget(0.5), 0.0);
    }
}
