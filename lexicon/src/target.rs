use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Lexicon, Passive};

pub const MAX_PASSIVES: usize = 2;
pub const MAX_THRESHOLDS: usize = 5;

/// Acceptance criteria for one amulet: required passives plus minimum stat
/// values. Validated against a [`Lexicon`] at construction and immutable
/// afterwards, so a running roll never sees a half-edited target.
///
/// A threshold of zero (or below) means "the stat must be present, any value".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
	passives: BTreeSet<Passive>,
	thresholds: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TargetError {
	#[error("a target may require at most {MAX_PASSIVES} passives, got {count}")]
	TooManyPassives { count: usize },
	#[error("a target may threshold at most {MAX_THRESHOLDS} stats, got {count}")]
	TooManyThresholds { count: usize },
	#[error("unknown stat {name:?}")]
	UnknownStat { name: String },
	#[error("threshold {value} for {name:?} is outside the valid range {min}..={max} (use 0 for any value)")]
	ThresholdOutOfRange {
		name: String,
		value: f64,
		min: f64,
		max: f64,
	},
}

impl Target {
	pub fn new(
		lexicon: &Lexicon,
		passives: impl IntoIterator<Item = Passive>,
		thresholds: impl IntoIterator<Item = (impl Into<String>, f64)>,
	) -> Result<Self, TargetError> {
		let passives = passives.into_iter().collect::<BTreeSet<_>>();
		if passives.len() > MAX_PASSIVES {
			return Err(TargetError::TooManyPassives {
				count: passives.len(),
			});
		}

		let thresholds = thresholds
			.into_iter()
			.map(|(name, value)| (name.into(), value))
			.collect::<BTreeMap<String, f64>>();
		if thresholds.len() > MAX_THRESHOLDS {
			return Err(TargetError::TooManyThresholds {
				count: thresholds.len(),
			});
		}

		for (name, &value) in &thresholds {
			let Some(stat) = lexicon.get(name) else {
				return Err(TargetError::UnknownStat { name: name.clone() });
			};
			// Zero and below request presence only; no range to honor.
			if value > 0.0 && !stat.contains(value) {
				return Err(TargetError::ThresholdOutOfRange {
					name: name.clone(),
					value,
					min: stat.min_valid(),
					max: stat.max_valid(),
				});
			}
		}

		Ok(Self {
			passives,
			thresholds,
		})
	}

	pub fn passives(&self) -> &BTreeSet<Passive> {
		&self.passives
	}

	pub fn thresholds(&self) -> &BTreeMap<String, f64> {
		&self.thresholds
	}

	/// Two required passives can only roll together in the double-roll trial
	/// mode, which also costs more per attempt.
	pub fn wants_double_roll(&self) -> bool {
		self.passives.len() == MAX_PASSIVES
	}
}
