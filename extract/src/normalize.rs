//! Text cleanup applied before any matching.
//!
//! Two independent substitution tables: whole-word fixups for domain terms
//! the OCR reliably mangles, and digit look-alike fixups that are only safe
//! inside a token already known to be numeric.

/// Known OCR misreadings of domain words, replaced whole-word after
/// lowercasing. Replacing inside words would corrupt legitimate text
/// ("rea" appears in "increase"), so tokens must match exactly.
const WORD_FIXUPS: &[(&str, &str)] = &[
	("polien", "pollen"),
	("pallen", "pollen"),
	("biue", "blue"),
	("rea", "red"),
	("instont", "instant"),
	("crltlcal", "critical"),
	("converslon", "conversion"),
];

/// Digit look-alikes. Applied only to numeric tokens.
const DIGIT_FIXUPS: &[(char, char)] = &[
	('o', '0'),
	('s', '5'),
	('i', '1'),
	('l', '1'),
	('b', '8'),
];

/// Lowercase, strip punctuation that is neither part of a number nor a
/// delimiter, collapse whitespace, then apply the word fixups.
pub fn normalize_line(raw: &str) -> String {
	let mut cleaned = String::with_capacity(raw.len());
	for c in raw.chars() {
		match c {
			c if c.is_alphanumeric() => cleaned.extend(c.to_lowercase()),
			'.' | '%' | '+' | ':' => cleaned.push(c),
			_ => cleaned.push(' '),
		}
	}

	cleaned
		.split_whitespace()
		.map(|word| {
			WORD_FIXUPS
				.iter()
				.find(|(from, _)| *from == word)
				.map(|(_, to)| *to)
				.unwrap_or(word)
		})
		.collect::<Vec<_>>()
		.join(" ")
}

/// Fold to lowercase alphanumerics only, for space/punctuation-insensitive
/// containment tests.
pub fn fold(s: &str) -> String {
	s.chars()
		.filter(|c| c.is_alphanumeric())
		.flat_map(char::to_lowercase)
		.collect()
}

/// Repair a numeric token: digit look-alikes, then stray double dots.
pub fn clean_numeric(token: &str) -> String {
	let mut out = String::with_capacity(token.len());
	for c in token.chars() {
		let c = DIGIT_FIXUPS
			.iter()
			.find(|(from, _)| *from == c)
			.map(|(_, to)| *to)
			.unwrap_or(c);
		out.push(c);
	}
	while out.contains("..") {
		out = out.replace("..", ".");
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn normalizes_case_punctuation_and_known_misspellings() {
		assert_eq!(normalize_line("  +15% Biue Polien!  "), "+15% blue pollen");
		assert_eq!(normalize_line("Instont Converslon"), "instant conversion");
		// "rea" only replaces as a whole word.
		assert_eq!(normalize_line("Rea Pollen increase"), "red pollen increase");
	}

	#[test]
	fn fold_is_space_and_punctuation_insensitive() {
		assert_eq!(fold("Pop Star"), "popstar");
		assert_eq!(fold("pop-star!"), "popstar");
	}

	#[test]
	fn cleans_digit_lookalikes_and_double_dots() {
		assert_eq!(clean_numeric("1s"), "15");
		assert_eq!(clean_numeric("l.i5"), "1.15");
		assert_eq!(clean_numeric("1..15"), "1.15");
	}
}
