//! Difficulty tiers and gameplay settings
//!
//! A `Settings` value is fixed for the lifetime of a session. Presets are
//! known-good; anything loaded from JSON is validated before use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{COLLISION_SOUND, END_GAME_SOUND};

/// Errors raised while building settings or tuning
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("target bounds must satisfy min < initial < max (min={min}, initial={initial}, max={max})")]
    TargetBounds { min: f32, initial: f32, max: f32 },

    #[error("game duration must be at least one second")]
    ZeroDuration,

    #[error("{field} must be longer than zero")]
    ZeroInterval { field: &'static str },

    #[error("placement needs at least one attempt")]
    NoPlacementAttempts,

    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque sound identifier handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(pub u32);

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" | "1" => Some(Difficulty::Easy),
            "normal" | "2" => Some(Difficulty::Normal),
            "hard" | "3" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Preset settings for this tier
    pub fn settings(&self) -> Settings {
        match self {
            Difficulty::Easy => Settings {
                target_size: 80.0,
                ball_size: 60.0,
                target_speed: 3.0,
                game_duration: 45,
                ..Settings::BASE
            },
            Difficulty::Normal => Settings::BASE,
            Difficulty::Hard => Settings {
                target_size: 60.0,
                ball_size: 40.0,
                target_speed: 8.0,
                game_duration: 20,
                ..Settings::BASE
            },
        }
    }
}

/// Gameplay settings for one session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Side length of the square target
    pub target_size: f32,
    /// Ball diameter
    pub ball_size: f32,
    /// Side length of the square play area
    pub game_area_size: f32,
    /// Horizontal origin of the target; all offsets are relative to it
    pub target_initial_x: f32,
    /// Leftmost absolute x the target may be dragged to
    pub target_min_x: f32,
    /// Rightmost absolute x the target may be dragged to
    pub target_max_x: f32,
    /// Vertical distance covered per movement tick
    pub target_speed: f32,
    /// Session length in seconds
    pub game_duration: u32,
    pub collision_sound: SoundId,
    pub end_game_sound: SoundId,
}

impl Default for Settings {
    fn default() -> Self {
        Difficulty::default().settings()
    }
}

impl Settings {
    /// Normal tier; the other tiers only change sizes, speed and duration
    const BASE: Settings = Settings {
        target_size: 70.0,
        ball_size: 50.0,
        game_area_size: 300.0,
        target_initial_x: 150.0,
        target_min_x: 35.0,
        target_max_x: 265.0,
        target_speed: 5.0,
        game_duration: 30,
        collision_sound: SoundId(COLLISION_SOUND),
        end_game_sound: SoundId(END_GAME_SOUND),
    };

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (field, value) in [
            ("target_size", self.target_size),
            ("ball_size", self.ball_size),
            ("game_area_size", self.game_area_size),
            ("target_speed", self.target_speed),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::NonPositive { field, value });
            }
        }

        let (min, initial, max) = (self.target_min_x, self.target_initial_x, self.target_max_x);
        if !(min.is_finite() && max.is_finite() && min < initial && initial < max) {
            return Err(SettingsError::TargetBounds { min, initial, max });
        }

        if self.game_duration == 0 {
            return Err(SettingsError::ZeroDuration);
        }

        Ok(())
    }

    /// Consume and return self if valid
    pub fn validated(self) -> Result<Self, SettingsError> {
        self.validate()?;
        Ok(self)
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        let settings = settings.validated()?;
        log::info!("Loaded custom settings from JSON");
        Ok(settings)
    }

    /// Allowed range for the target's horizontal offset
    pub fn target_x_bounds(&self) -> (f32, f32) {
        (
            self.target_min_x - self.target_initial_x,
            self.target_max_x - self.target_initial_x,
        )
    }

    /// Half the play area; random horizontal offsets are drawn from ±this
    #[inline]
    pub fn half_area(&self) -> f32 {
        self.game_area_size / 2.0
    }

    #[inline]
    pub fn ball_radius(&self) -> f32 {
        self.ball_size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for difficulty in Difficulty::ALL {
            assert!(difficulty.settings().validate().is_ok(), "{}", difficulty.as_str());
        }
    }

    #[test]
    fn test_preset_values() {
        let easy = Difficulty::Easy.settings();
        assert_eq!(easy.target_size, 80.0);
        assert_eq!(easy.game_duration, 45);

        let normal = Difficulty::Normal.settings();
        assert_eq!(normal.target_speed, 5.0);
        assert_eq!(normal.game_duration, 30);
        assert_eq!(normal.collision_sound, SoundId(1004));
        assert_eq!(normal.end_game_sound, SoundId(1005));

        let hard = Difficulty::Hard.settings();
        assert_eq!(hard.ball_size, 40.0);
        assert_eq!(hard.target_speed, 8.0);
        assert_eq!(hard.game_area_size, 300.0);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("2"), Some(Difficulty::Normal));
        assert_eq!(Difficulty::from_str("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let settings = Settings {
            target_min_x: 300.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::TargetBounds { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let settings = Settings {
            target_speed: 0.0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::NonPositive { field: "target_speed", .. })
        ));

        let settings = Settings {
            ball_size: f32::NAN,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::NonPositive { field: "ball_size", .. })
        ));

        let settings = Settings {
            game_duration: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::ZeroDuration)));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::to_string(&Difficulty::Hard.settings()).unwrap();
        let parsed = Settings::from_json(&json).unwrap();
        assert_eq!(parsed, Difficulty::Hard.settings());

        let broken = json.replace("\"game_duration\":20", "\"game_duration\":0");
        assert!(matches!(Settings::from_json(&broken), Err(SettingsError::ZeroDuration)));
        assert!(matches!(Settings::from_json("{"), Err(SettingsError::Json(_))));
    }

    #[test]
    fn test_target_x_bounds() {
        let (min, max) = Settings::default().target_x_bounds();
        assert_eq!(min, -115.0);
        assert_eq!(max, 115.0);
    }
}
