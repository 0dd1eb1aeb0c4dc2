//! SSABuddy core: automated star-sign amulet rerolling.
//!
//! The core sequences an external input actuator and an external capture/OCR
//! service into a terminating reroll loop: act, wait for the game to settle,
//! capture, decode the tooltip text into a [`Reading`], and stop as soon as
//! an operator-defined [`Target`] is satisfied. Odds, cost and remaining-time
//! estimates are derived from the target list alone.
//!
//! Rendering a GUI, persisting target lists, simulating input and locating
//! screen regions all live behind the [`ActionInterface`] and
//! [`PerceptionInterface`] boundaries and are not this crate's business.

mod config;
mod interface;
mod matcher;
mod odds;
mod roller;

pub use config::Config;
pub use interface::{ActionInterface, NormalizedPoint, NormalizedRect, PerceptionInterface};
pub use matcher::first_match;
pub use odds::{estimate, OddsEstimate};
pub use roller::{ProbeReport, Roller, RunState, RunStatistics, StopReason};

pub use extract::{Extractor, Reading};
pub use lexicon::{
    Lexicon, LexiconError, Passive, ScaleCorrection, StatDefinition, Target, TargetError,
};
