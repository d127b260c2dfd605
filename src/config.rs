//! Engine configuration file handling
//!
//! Rounding, negative-total policy and display switches, loaded from JSON.
//! Every field has a default so a partial (or missing) file is valid.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::RoundingMode;

/// Largest supported number of decimal places for money
const MAX_SCALE: u32 = 6;

/// Rounding applied to displayed money amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rounding {
    /// Decimal places (typically 2)
    pub scale: u32,
    pub mode: RoundingMode,
}

impl Default for Rounding {
    fn default() -> Self {
        Self {
            scale: 2,
            mode: RoundingMode::HalfUp,
        }
    }
}

impl Rounding {
    /// Round an amount with this policy
    pub fn apply(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.scale, self.mode.strategy())
    }
}

/// Pricing policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub rounding: Rounding,
    /// Floor the final price at zero when a fixed discount exceeds the
    /// subtotal. Off by default: the negative total is reported as-is and the
    /// caller decides how to present it.
    pub clamp_negative_total: bool,
}

/// Storefront display switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub show_progress: bool,
    pub show_summary: bool,
    /// Show the discount as savings next to the total
    pub show_savings: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
            show_summary: true,
            show_savings: false,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pricing: PricingConfig,
    pub display: DisplayOptions,
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        config.validate()?;
        Ok(config)
    }

    /// Load the file when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.pricing.rounding.scale > MAX_SCALE {
            anyhow::bail!(
                "Rounding scale {} exceeds the maximum of {} decimal places",
                self.pricing.rounding.scale,
                MAX_SCALE
            );
        }
        Ok(())
    }
}
