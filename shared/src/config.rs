use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Timing knobs for the core. Defaults come from the crate constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub tick_interval_ms: u64,
    pub observation_prompt_delay_ms: u64,
    pub ride_event_debounce_ms: u64,
    pub banner_expand_delay_ms: u64,
    pub banner_collapse_delay_ms: u64,
    pub focused_sheet_height: f64,
}

#[allow(clippy::cast_possible_truncation)]
fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: millis(crate::TICK_INTERVAL),
            observation_prompt_delay_ms: millis(crate::OBSERVATION_PROMPT_DELAY),
            ride_event_debounce_ms: millis(crate::RIDE_EVENT_RADIUS_DEBOUNCE),
            banner_expand_delay_ms: millis(crate::BANNER_EXPAND_DELAY),
            banner_collapse_delay_ms: millis(crate::BANNER_COLLAPSE_DELAY),
            focused_sheet_height: crate::FOCUSED_SHEET_HEIGHT,
        }
    }
}

impl CoreConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("tick_interval_ms", self.tick_interval_ms),
            ("observation_prompt_delay_ms", self.observation_prompt_delay_ms),
            ("ride_event_debounce_ms", self.ride_event_debounce_ms),
            ("banner_expand_delay_ms", self.banner_expand_delay_ms),
            ("banner_collapse_delay_ms", self.banner_collapse_delay_ms),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be greater than 0")));
        }
        if !(self.focused_sheet_height > 0.0 && self.focused_sheet_height <= 1.0) {
            return Err(ConfigError::Invalid(
                "focused_sheet_height must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn observation_prompt_delay(&self) -> Duration {
        Duration::from_millis(self.observation_prompt_delay_ms)
    }

    pub fn ride_event_debounce(&self) -> Duration {
        Duration::from_millis(self.ride_event_debounce_ms)
    }

    pub fn banner_expand_delay(&self) -> Duration {
        Duration::from_millis(self.banner_expand_delay_ms)
    }

    pub fn banner_collapse_delay(&self) -> Duration {
        Duration::from_millis(self.banner_collapse_delay_ms)
    }
}
