//! Persistent runtime configuration.
//!
//! Stored as JSON in a platform-appropriate config directory. Target lists
//! are deliberately absent: persisting them belongs to the configuration
//! surface, not the core.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::interface::{NormalizedPoint, NormalizedRect};

/// On-disk configuration for the reroll core.
///
/// The settle delays are the loop's scheduling contract: the game needs time
/// to react to an input before the next capture reflects it. They are data,
/// not code, so the same loop works across machines and frame rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seconds to wait after firing the reroll input.
    pub roll_settle_s: f32,

    /// Seconds to wait after clicking the accept control, before capturing.
    pub accept_settle_s: f32,

    /// Screen region the amulet tooltip is captured from.
    pub scan_region: NormalizedRect,

    /// Accept control when only one passive slot rerolls.
    pub single_roll_button: NormalizedPoint,

    /// Accept control when both passive slots reroll.
    pub double_roll_button: NormalizedPoint,

    /// Captures shorter than this are treated as failed, not parsed.
    pub min_text_len: usize,

    /// Price of one trial in single-roll mode.
    pub single_roll_price: f64,

    /// Price of one trial in double-roll mode.
    pub double_roll_price: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roll_settle_s: 1.0,
            accept_settle_s: 1.5,
            scan_region: NormalizedRect {
                x: 0.40,
                y: 0.32,
                w: 0.20,
                h: 0.34,
            },
            single_roll_button: NormalizedPoint { x: 0.55, y: 0.60 },
            double_roll_button: NormalizedPoint { x: 0.45, y: 0.60 },
            min_text_len: 10,
            single_roll_price: 1.0,
            double_roll_price: 2.5,
        }
    }
}

impl Config {
    /// Path to the config file.
    pub fn path() -> Result<PathBuf> {
        let base = dirs::config_dir().context("config_dir() unavailable")?;
        Ok(base.join("ssabuddy.json"))
    }

    /// Load configuration from disk, falling back to defaults on failure.
    pub fn load_or_default() -> Self {
        match Self::try_load() {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load config; using defaults");
                Self::default()
            }
        }
    }

    /// Try to load configuration from disk.
    pub fn try_load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = fs::read_to_string(&path).with_context(|| format!("read {:?}", path))?;
        let cfg = serde_json::from_str(&json).with_context(|| format!("parse {:?}", path))?;
        Ok(cfg)
    }

    /// Save configuration to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(&path, json).with_context(|| format!("write {:?}", path))?;
        Ok(())
    }
}
