//! Static registry of amulet attributes: the closed set of star passives and
//! the named stats with their valid ranges and scale-correction rules.

use serde::{Deserialize, Serialize};

mod target;
pub use target::{Target, TargetError, MAX_PASSIVES, MAX_THRESHOLDS};

/// Star passive abilities an amulet can roll. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Passive {
	PopStar,
	GuidingStar,
	StarShower,
	GummyStar,
	ScorchingStar,
	StarSaw,
}

impl Passive {
	pub const ALL: [Passive; 6] = [
		Passive::PopStar,
		Passive::GuidingStar,
		Passive::StarShower,
		Passive::GummyStar,
		Passive::ScorchingStar,
		Passive::StarSaw,
	];

	/// In-game display name, as it appears on the amulet tooltip.
	pub fn label(&self) -> &'static str {
		match self {
			Passive::PopStar => "Pop Star",
			Passive::GuidingStar => "Guiding Star",
			Passive::StarShower => "Star Shower",
			Passive::GummyStar => "Gummy Star",
			Passive::ScorchingStar => "Scorching Star",
			Passive::StarSaw => "Star Saw",
		}
	}
}

impl std::fmt::Display for Passive {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.label())
	}
}

/// Named rescaling rule for recovering a stat value the OCR inflated.
///
/// Each rule fires only when the parsed value sits above the stat's valid
/// range and the rescaled value lands inside it, which keeps every rule
/// idempotent: an in-range value is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleCorrection {
	/// Divide by 10. Recovers from a spurious extra digit ("12" read as "120").
	DropSpuriousDigit,
	/// Divide by 100. Recovers from a lost decimal point ("10.00" read as "1000").
	UndoDecimalShift,
}

impl ScaleCorrection {
	pub fn divisor(&self) -> f64 {
		match self {
			ScaleCorrection::DropSpuriousDigit => 10.0,
			ScaleCorrection::UndoDecimalShift => 100.0,
		}
	}
}

/// One numeric amulet attribute: registry key, valid range, corrections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDefinition {
	name: String,
	min_valid: f64,
	max_valid: f64,
	corrections: Vec<ScaleCorrection>,
}

impl StatDefinition {
	pub fn new(name: impl Into<String>, min_valid: f64, max_valid: f64) -> Self {
		Self {
			name: name.into(),
			min_valid,
			max_valid,
			corrections: vec![ScaleCorrection::DropSpuriousDigit],
		}
	}

	pub fn with_corrections(mut self, corrections: Vec<ScaleCorrection>) -> Self {
		self.corrections = corrections;
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn min_valid(&self) -> f64 {
		self.min_valid
	}

	pub fn max_valid(&self) -> f64 {
		self.max_valid
	}

	pub fn corrections(&self) -> &[ScaleCorrection] {
		&self.corrections
	}

	pub fn contains(&self, value: f64) -> bool {
		value >= self.min_valid && value <= self.max_valid
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexiconError {
	#[error("stat {name:?} has an invalid range: min {min} must be below max {max}")]
	InvalidRange { name: String, min: f64, max: f64 },
	#[error("stat {name:?} is defined twice")]
	DuplicateStat { name: String },
}

/// Validated stat registry.
///
/// Keys are unique and every range satisfies `min < max`. Lookup order for
/// text matching is longest key first, so a specific name ("Blue Pollen") is
/// always tried before a generic one ("Pollen") that it contains.
#[derive(Debug, Clone)]
pub struct Lexicon {
	stats: Vec<StatDefinition>,
	longest_first: Vec<usize>,
}

impl Lexicon {
	pub fn new(stats: Vec<StatDefinition>) -> Result<Self, LexiconError> {
		let mut seen = std::collections::HashSet::new();
		for stat in &stats {
			if stat.min_valid >= stat.max_valid {
				return Err(LexiconError::InvalidRange {
					name: stat.name.clone(),
					min: stat.min_valid,
					max: stat.max_valid,
				});
			}
			if !seen.insert(stat.name.as_str()) {
				return Err(LexiconError::DuplicateStat {
					name: stat.name.clone(),
				});
			}
		}

		let mut longest_first = (0..stats.len()).collect::<Vec<_>>();
		longest_first.sort_by_key(|&i| std::cmp::Reverse(stats[i].name.len()));

		Ok(Self {
			stats,
			longest_first,
		})
	}

	/// The nine amulet stats with their in-game ranges.
	///
	/// Instant Conversion is the one ratio-typed stat whose tooltip renders
	/// with two decimals, so a lost decimal point inflates it by exactly 100.
	pub fn standard() -> Self {
		use ScaleCorrection::*;

		Self::new(vec![
			StatDefinition::new("Pollen", 8.0, 20.0),
			StatDefinition::new("White Pollen", 15.0, 70.0),
			StatDefinition::new("Blue Pollen", 15.0, 70.0),
			StatDefinition::new("Red Pollen", 15.0, 70.0),
			StatDefinition::new("Bee Gather Pollen", 15.0, 70.0),
			StatDefinition::new("Instant Conversion", 8.0, 12.0)
				.with_corrections(vec![UndoDecimalShift, DropSpuriousDigit]),
			StatDefinition::new("Convert Rate", 5.0, 25.0),
			StatDefinition::new("Bee Ability Rate", 2.0, 7.0),
			StatDefinition::new("Critical Chance", 2.0, 7.0),
		])
		.expect("builtin lexicon is valid")
	}

	pub fn get(&self, name: &str) -> Option<&StatDefinition> {
		self.stats.iter().find(|s| s.name == name)
	}

	/// Definitions ordered longest key first.
	pub fn longest_first(&self) -> impl Iterator<Item = &StatDefinition> {
		self.longest_first.iter().map(|&i| &self.stats[i])
	}

	pub fn iter(&self) -> impl Iterator<Item = &StatDefinition> {
		self.stats.iter()
	}

	pub fn len(&self) -> usize {
		self.stats.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stats.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn standard_lexicon_orders_specific_names_before_generic() {
		let lexicon = Lexicon::standard();
		let order = lexicon
			.longest_first()
			.map(|s| s.name().to_string())
			.collect::<Vec<_>>();

		let pollen = order.iter().position(|n| n == "Pollen").unwrap();
		for specific in ["Blue Pollen", "White Pollen", "Red Pollen", "Bee Gather Pollen"] {
			let pos = order.iter().position(|n| n == specific).unwrap();
			assert!(pos < pollen, "{specific} must be tried before Pollen");
		}
	}

	#[test]
	fn rejects_inverted_range() {
		let err = Lexicon::new(vec![StatDefinition::new("Pollen", 20.0, 8.0)]).unwrap_err();
		assert_eq!(
			err,
			LexiconError::InvalidRange {
				name: "Pollen".into(),
				min: 20.0,
				max: 8.0,
			}
		);
	}

	#[test]
	fn rejects_duplicate_keys() {
		let err = Lexicon::new(vec![
			StatDefinition::new("Pollen", 8.0, 20.0),
			StatDefinition::new("Pollen", 1.0, 2.0),
		])
		.unwrap_err();
		assert_eq!(err, LexiconError::DuplicateStat { name: "Pollen".into() });
	}
}
