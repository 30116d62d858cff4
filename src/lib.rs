//! Sweep Catch - a sweeping-target catch mini-game
//!
//! Core modules:
//! - `sim`: Simulation core (game state, collisions, engine, scheduling)
//! - `settings`: Difficulty tiers and their validated gameplay settings
//! - `tuning`: Data-driven timing knobs (tick intervals, settle delay)

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Difficulty, Settings, SettingsError, SoundId};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Movement/collision tick interval (20 Hz)
    pub const MOVEMENT_TICK: Duration = Duration::from_millis(50);
    /// Countdown tick interval
    pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);
    /// Pause between a scored collision and the ball reappearing
    pub const SETTLE_DELAY: Duration = Duration::from_millis(500);
    /// How long the control button stays disabled after a press
    pub const CONTROL_COOLDOWN: Duration = Duration::from_secs(2);
    /// Ball placement gives up looking for a free spot after this many draws
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

    /// Sound played when the target catches the ball
    pub const COLLISION_SOUND: u32 = 1004;
    /// Sound played when the countdown runs out
    pub const END_GAME_SOUND: u32 = 1005;

    /// Ball visual scale while a catch is settling
    pub const HIT_BALL_SCALE: f32 = 0.5;
}
