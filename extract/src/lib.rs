//! Reading extraction from noisy recognized text.
//!
//! Input is line-oriented OCR output with character substitutions, missing
//! spaces, inconsistent casing and stray punctuation. The extractor is
//! intentionally conservative: a line it cannot attribute is dropped, and
//! malformed input yields an empty [`Reading`] instead of an error.

use std::sync::LazyLock;

use regex::Regex;

use lexicon::{Lexicon, Passive, StatDefinition};

mod normalize;
mod reading;
pub use reading::Reading;

/// Percent form: a numeric token (possibly with digit look-alikes) suffixed
/// by a percent marker, then the stat description.
static PERCENT_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"([+\w]+)\s*%\s*(.+)").expect("regex"));

/// Multiplier form: an "x"-prefixed factor, then the stat description.
static MULTIPLIER_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"x([\w.]+)\s+(.+)").expect("regex"));

/// Marker word amulet tooltips put in front of a passive ability line.
const PASSIVE_MARKER: &str = "passive";

/// Maximum edit distance for the fuzzy passive fallback.
const PASSIVE_FUZZ: usize = 2;

pub struct Extractor {
	lexicon: Lexicon,
}

impl Extractor {
	pub fn new(lexicon: Lexicon) -> Self {
		Self { lexicon }
	}

	/// Extractor over the builtin amulet lexicon.
	pub fn standard() -> Self {
		Self::new(Lexicon::standard())
	}

	pub fn lexicon(&self) -> &Lexicon {
		&self.lexicon
	}

	/// Decode one capture's worth of recognized text.
	///
	/// Passives are the set union over all lines; for stats, a later line
	/// wins when two lines name the same stat.
	pub fn extract(&self, raw_text: &str) -> Reading {
		let mut reading = Reading::default();

		for raw_line in raw_text.lines() {
			let line = normalize::normalize_line(raw_line);
			if line.is_empty() {
				continue;
			}
			let folded = normalize::fold(&line);

			let mut found_passive = false;
			for passive in Passive::ALL {
				if folded.contains(&normalize::fold(passive.label())) {
					reading.passives.insert(passive);
					found_passive = true;
				}
			}
			// A marked passive line that survived normalization but matched
			// nothing by containment gets one bounded fuzzy attempt.
			if !found_passive && folded.contains(PASSIVE_MARKER) {
				if let Some(passive) = fuzzy_passive(&line) {
					reading.passives.insert(passive);
				}
			}

			if let Some((name, value)) = self.parse_stat_line(&line) {
				reading.stats.insert(name, value);
			}
		}

		reading
	}

	/// Try the two stat lexical forms against a normalized line.
	///
	/// The percent form is committal: once its shape matches, the multiplier
	/// form is not attempted even if the percent parse goes nowhere.
	fn parse_stat_line(&self, line: &str) -> Option<(String, f64)> {
		if let Some(cap) = PERCENT_RE.captures(line) {
			let digits = normalize::clean_numeric(&cap[1])
				.chars()
				.filter(char::is_ascii_digit)
				.collect::<String>();
			let value = digits.parse::<f64>().ok()?;
			let stat = self.find_stat(&cap[2])?;
			return Some((stat.name().to_string(), correct_scale(stat, value)));
		}

		let cap = MULTIPLIER_RE.captures(line)?;
		let multiplier = normalize::clean_numeric(&cap[1]).parse::<f64>().ok()?;
		let stat = self.find_stat(&cap[2])?;
		// Store multipliers as an equivalent percentage delta: x1.15 -> 15.
		let value = ((multiplier - 1.0) * 100.0).round();
		Some((stat.name().to_string(), value))
	}

	/// Longest key first, so "Blue Pollen" is consumed before "Pollen" can
	/// falsely absorb the line. First hit wins.
	fn find_stat(&self, remainder: &str) -> Option<&StatDefinition> {
		let folded = normalize::fold(remainder);
		self.lexicon
			.longest_first()
			.find(|stat| folded.contains(&normalize::fold(stat.name())))
	}
}

/// Apply a stat's named scale corrections in order.
///
/// A correction fires only when the value sits above the valid range and the
/// rescaled value lands inside it, so an already-in-range value is never
/// touched and reapplying the correction is a no-op.
fn correct_scale(stat: &StatDefinition, raw: f64) -> f64 {
	let mut value = raw;
	for rule in stat.corrections() {
		if value <= stat.max_valid() {
			break;
		}
		let corrected = value / rule.divisor();
		if stat.contains(corrected) {
			value = corrected;
		}
	}
	value
}

fn fuzzy_passive(line: &str) -> Option<Passive> {
	let tail = line
		.split_once(':')
		.map(|(_, tail)| tail)
		.unwrap_or(line)
		.trim();
	if tail.is_empty() {
		return None;
	}

	let mut best: Option<(Passive, usize)> = None;
	for passive in Passive::ALL {
		let distance = levenshtein::levenshtein(tail, &passive.label().to_lowercase());
		if best.is_none_or(|(_, d)| distance < d) {
			best = Some((passive, distance));
		}
	}
	best.and_then(|(passive, distance)| (distance <= PASSIVE_FUZZ).then_some(passive))
}

#[cfg(test)]
mod tests {
	use super::*;
	use lexicon::ScaleCorrection;

	fn extractor() -> Extractor {
		Extractor::standard()
	}

	#[test]
	fn extracts_stats_and_passives_from_clean_text() {
		let reading = extractor().extract("12% Pollen\n15% Blue Pollen\nPassive: Pop Star");

		assert_eq!(reading.stats.get("Pollen"), Some(&12.0));
		assert_eq!(reading.stats.get("Blue Pollen"), Some(&15.0));
		assert_eq!(reading.stats.len(), 2);
		assert!(reading.passives.contains(&Passive::PopStar));
		assert_eq!(reading.passives.len(), 1);
	}

	#[test]
	fn specific_stat_name_is_never_absorbed_by_generic_key() {
		let reading = extractor().extract("17% Bee Gather Pollen");
		assert_eq!(reading.stats.get("Bee Gather Pollen"), Some(&17.0));
		assert!(!reading.stats.contains_key("Pollen"));
	}

	#[test]
	fn repairs_digit_lookalikes_and_misspellings() {
		let reading = extractor().extract("1s% Biue Polien");
		assert_eq!(reading.stats.get("Blue Pollen"), Some(&15.0));
	}

	#[test]
	fn multiplier_form_becomes_percentage_delta() {
		let reading = extractor().extract("x1.15 Convert Rate");
		assert_eq!(reading.stats.get("Convert Rate"), Some(&15.0));
	}

	#[test]
	fn fuzzy_fallback_only_on_marked_passive_lines() {
		let reading = extractor().extract("Passive: Pop Siar");
		assert!(reading.passives.contains(&Passive::PopStar));

		// Unmarked garbage must not fuzzy-match anything.
		let reading = extractor().extract("Pop Siar");
		assert!(reading.passives.is_empty());
	}

	#[test]
	fn one_line_can_carry_two_passives() {
		let reading = extractor().extract("Passives: Pop Star + Gummy Star");
		assert!(reading.passives.contains(&Passive::PopStar));
		assert!(reading.passives.contains(&Passive::GummyStar));
	}

	#[test]
	fn later_stat_line_wins() {
		let reading = extractor().extract("12% Pollen\n14% Pollen");
		assert_eq!(reading.stats.get("Pollen"), Some(&14.0));
	}

	#[test]
	fn garbage_and_empty_input_yield_empty_reading() {
		assert!(extractor().extract("").is_empty());
		assert!(extractor().extract("\n\n   \n").is_empty());
		assert!(extractor().extract("q3@@@\n~~%~~\nzzz").is_empty());
	}

	#[test]
	fn scale_correction_drops_spurious_digit() {
		// "12" read as "120": an order of magnitude above Pollen's max of 20.
		let reading = extractor().extract("120% Pollen");
		assert_eq!(reading.stats.get("Pollen"), Some(&12.0));
	}

	#[test]
	fn scale_correction_undoes_decimal_shift() {
		// "10.00" read as "1000" on the one two-decimal ratio stat.
		let reading = extractor().extract("1000% Instant Conversion");
		assert_eq!(reading.stats.get("Instant Conversion"), Some(&10.0));

		// 120 on an 8..=12 stat must recover via /10, not /100.
		let reading = extractor().extract("120% Instant Conversion");
		assert_eq!(reading.stats.get("Instant Conversion"), Some(&12.0));
	}

	#[test]
	fn scale_correction_is_idempotent_on_in_range_values() {
		let stat = StatDefinition::new("Pollen", 8.0, 20.0);
		for value in [8.0, 12.0, 20.0] {
			assert_eq!(correct_scale(&stat, value), value);
		}
		// And reapplying a corrected value changes nothing further.
		let corrected = correct_scale(&stat, 120.0);
		assert_eq!(corrected, 12.0);
		assert_eq!(correct_scale(&stat, corrected), corrected);
	}

	#[test]
	fn scale_correction_skips_when_result_would_leave_range() {
		// 25 on an 8..=20 stat: /10 would land at 2.5, below min. Keep raw.
		let stat = StatDefinition::new("Pollen", 8.0, 20.0);
		assert_eq!(correct_scale(&stat, 25.0), 25.0);
	}

	#[test]
	fn custom_corrections_are_honored_in_order() {
		let stat = StatDefinition::new("Ratio", 1.0, 1.3)
			.with_corrections(vec![ScaleCorrection::UndoDecimalShift]);
		assert_eq!(correct_scale(&stat, 115.0), 1.15);
	}
}
