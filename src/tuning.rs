//! Data-driven timing knobs
//!
//! Durations are stored as whole milliseconds in JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::SettingsError;

/// Timing and placement knobs shared by every difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Interval of the movement/collision task
    #[serde(with = "millis")]
    pub movement_interval: Duration,
    /// Interval of the countdown task
    #[serde(with = "millis")]
    pub countdown_interval: Duration,
    /// Delay between a catch and the ball reappearing
    #[serde(with = "millis")]
    pub settle_delay: Duration,
    /// Disable window hinted to the presentation layer after a button press
    #[serde(with = "millis")]
    pub control_cooldown: Duration,
    /// Draws before ball placement accepts an overlapping spot
    pub max_placement_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            movement_interval: MOVEMENT_TICK,
            countdown_interval: COUNTDOWN_TICK,
            settle_delay: SETTLE_DELAY,
            control_cooldown: CONTROL_COOLDOWN,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), SettingsError> {
        // Periodic tasks with a zero interval would never let the clock advance
        if self.movement_interval.is_zero() {
            return Err(SettingsError::ZeroInterval { field: "movement_interval" });
        }
        if self.countdown_interval.is_zero() {
            return Err(SettingsError::ZeroInterval { field: "countdown_interval" });
        }
        if self.max_placement_attempts == 0 {
            return Err(SettingsError::NoPlacementAttempts);
        }
        Ok(())
    }

    /// Parse and validate tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides: {:?}", tuning);
        Ok(tuning)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
