//! Tuning constants for reconciliation and visual encoding.
//!
//! The defaults were tuned by eye against the Borges library graphs and are
//! what the renderer's legend assumes. Override them only for experiments.

use serde::{Deserialize, Serialize};

use crate::error::{HighlightError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// Fuzzy matches must score strictly above this to be accepted.
    pub match_threshold: f64,
    /// Bonus added to the reasoning importance of the first entities of a long path.
    pub centrality_bonus: f64,
    /// The bonus applies only when the path has more entities than this.
    pub centrality_bonus_min_entities: usize,
    /// ... and only to entities whose order is at most this.
    pub centrality_bonus_max_order: u32,
    /// Per-channel brightness added at importance 1.0.
    pub brightness_boost: f64,
    pub pulse_high_threshold: f64,
    pub pulse_medium_threshold: f64,
    /// Highlighted nodes are never drawn smaller than this.
    pub min_node_size: f64,
    /// Upper bound of the contextual relevance of non-highlighted nodes.
    pub contextual_relevance_cap: f64,
    /// Seconds of animation delay per traversal step on primary links.
    pub animation_step_secs: f64,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.3,
            centrality_bonus: 0.3,
            centrality_bonus_min_entities: 5,
            centrality_bonus_max_order: 2,
            brightness_boost: 50.0,
            pulse_high_threshold: 0.8,
            pulse_medium_threshold: 0.5,
            min_node_size: 8.0,
            contextual_relevance_cap: 0.8,
            animation_step_secs: 0.2,
        }
    }
}

impl HighlightConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        unit_interval("match_threshold", self.match_threshold)?;
        unit_interval("centrality_bonus", self.centrality_bonus)?;
        unit_interval("pulse_high_threshold", self.pulse_high_threshold)?;
        unit_interval("pulse_medium_threshold", self.pulse_medium_threshold)?;
        unit_interval("contextual_relevance_cap", self.contextual_relevance_cap)?;

        if self.pulse_medium_threshold > self.pulse_high_threshold {
            return Err(HighlightError::InvalidConfig {
                field: "pulse_medium_threshold",
                value: self.pulse_medium_threshold,
                reason: "must not exceed pulse_high_threshold",
            });
        }
        if !(0.0..=255.0).contains(&self.brightness_boost) {
            return Err(HighlightError::InvalidConfig {
                field: "brightness_boost",
                value: self.brightness_boost,
                reason: "must be within 0..=255",
            });
        }
        non_negative("min_node_size", self.min_node_size)?;
        non_negative("animation_step_secs", self.animation_step_secs)?;
        Ok(())
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(HighlightError::InvalidConfig {
            field,
            value,
            reason: "must be within 0..=1",
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(HighlightError::InvalidConfig {
            field,
            value,
            reason: "must be a finite non-negative number",
        })
    }
}
