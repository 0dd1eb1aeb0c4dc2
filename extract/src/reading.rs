use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use lexicon::Passive;

/// Structured attributes decoded from one capture of recognized text.
///
/// Owned by the cycle that produced it; the controller discards it after
/// matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
	pub passives: BTreeSet<Passive>,
	pub stats: BTreeMap<String, f64>,
}

impl Reading {
	pub fn is_empty(&self) -> bool {
		self.passives.is_empty() && self.stats.is_empty()
	}
}
