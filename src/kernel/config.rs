use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::ConfigError;

/// Thresholds and limits for the turn kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Below this, any intent is rejected as low confidence.
    pub min_confidence: f32,
    /// Dangerous intents need at least this much.
    pub high_confidence: f32,
    /// References ("do it again") need at least this much.
    pub min_reference_confidence: f32,
    /// Multiplier applied to a resolved follow-up, capped at 1.0.
    pub followup_boost: f32,
    /// Entries kept in the execution history.
    pub history_capacity: usize,
    /// Turns a conversation context stays valid. `None` keeps it for the session.
    pub context_ttl_turns: Option<u64>,
    /// Dispatch to a dry-run backend instead of the system.
    pub safe_mode: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.3,
            high_confidence: 0.7,
            min_reference_confidence: 0.5,
            followup_boost: 1.1,
            history_capacity: 20,
            context_ttl_turns: None,
            safe_mode: false,
        }
    }
}

impl KernelConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: KernelConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("min_confidence", self.min_confidence),
            ("high_confidence", self.high_confidence),
            ("min_reference_confidence", self.min_reference_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }
        if self.min_confidence > self.high_confidence {
            return Err(ConfigError::Invalid {
                field: "high_confidence",
                reason: "must not be lower than min_confidence".to_string(),
            });
        }
        if !(self.followup_boost >= 1.0) {
            return Err(ConfigError::Invalid {
                field: "followup_boost",
                reason: format!("{} is below 1.0", self.followup_boost),
            });
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "history_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
