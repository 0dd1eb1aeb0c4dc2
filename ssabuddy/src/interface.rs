//! Boundaries to the external collaborators.
//!
//! All coordinates are fractions of the screen size; resolving them to
//! device pixels (and everything behind that: window lookup, template
//! matching, OCR, input injection) is the collaborator's job.

use serde::{Deserialize, Serialize};

/// A point in screen-fraction coordinates (0.0..=1.0 on both axes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f32,
    pub y: f32,
}

/// An axis-aligned region in screen-fraction coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Input actuator.
///
/// Actions are fire-and-forget; the controller owns the settle delays that
/// follow each action (the scheduling contract lives in the config).
pub trait ActionInterface: Send {
    /// Fire the in-game reroll input.
    fn perform_reroll(&mut self) -> anyhow::Result<()>;

    /// Click the screen at a normalized position.
    fn click_point(&mut self, point: NormalizedPoint) -> anyhow::Result<()>;
}

/// Opaque text source: capture a region, run whatever template matching and
/// OCR it needs, and return the recognized text.
///
/// No timeout is enforced on this call; a hang here hangs the loop. That is
/// the interface implementation's responsibility, not the controller's.
pub trait PerceptionInterface: Send {
    fn capture_region(&mut self, region: NormalizedRect) -> anyhow::Result<String>;
}
