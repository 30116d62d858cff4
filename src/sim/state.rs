//! Game state and the values handed to the presentation layer
//!
//! `GameState` is rebuilt from `Settings` for every session. Only the engine
//! mutates it.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, Rect, rect_intersects_circle};
use crate::consts::HIT_BALL_SCALE;
use crate::settings::{Settings, SoundId};

/// Ball color as rendered by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallColor {
    Green,
    Yellow,
}

/// Transient visual state of the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallFeedback {
    #[default]
    Normal,
    /// Just caught; shown shrunk and recolored until the settle task runs
    Hit,
}

impl BallFeedback {
    pub fn color(&self) -> BallColor {
        match self {
            BallFeedback::Normal => BallColor::Green,
            BallFeedback::Hit => BallColor::Yellow,
        }
    }

    pub fn scale(&self) -> f32 {
        match self {
            BallFeedback::Normal => 1.0,
            BallFeedback::Hit => HIT_BALL_SCALE,
        }
    }
}

/// Discrete signals for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The target caught the ball
    Collision { sound: SoundId },
    /// The countdown ran out or the player ended the session
    GameOver { sound: SoundId, final_score: u32 },
    /// The control that triggered a start/stop should be disabled briefly
    DisableControl { duration: Duration },
}

/// Mutable simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub score: u32,
    /// Seconds left on the countdown
    pub time_remaining: u32,
    pub is_active: bool,
    /// Horizontal offset of the target from `settings.target_initial_x`
    pub target_x: f32,
    /// Vertical position of the target's center, in `[0, game_area_size]`
    pub target_y: f32,
    /// Ball center relative to `(settings.target_initial_x, 0)`
    pub ball_offset: Vec2,
    pub ball_feedback: BallFeedback,
    /// Set while a catch is settling so it scores only once
    pub is_collision_locked: bool,
    pub settings: Settings,
}

impl GameState {
    pub fn new(settings: Settings) -> Self {
        Self {
            score: 0,
            time_remaining: settings.game_duration,
            is_active: false,
            target_x: 0.0,
            target_y: 0.0,
            ball_offset: Vec2::ZERO,
            ball_feedback: BallFeedback::Normal,
            is_collision_locked: false,
            settings,
        }
    }

    /// Clamp a horizontal target offset into the drag bounds
    pub fn clamp_target_x(&self, offset: f32) -> f32 {
        let (min, max) = self.settings.target_x_bounds();
        offset.clamp(min, max)
    }

    /// Move the target down one step, wrapping to the top once it leaves the area
    pub fn advance_target(&mut self) {
        let next = self.target_y + self.settings.target_speed;
        self.target_y = if next > self.settings.game_area_size {
            0.0
        } else {
            next
        };
    }

    /// Target square in absolute coordinates
    pub fn target_rect(&self) -> Rect {
        let center = Vec2::new(self.settings.target_initial_x + self.target_x, self.target_y);
        Rect::square(center, self.settings.target_size)
    }

    /// Ball circle for an arbitrary offset
    pub fn ball_circle_at(&self, offset: Vec2) -> Circle {
        let center = Vec2::new(self.settings.target_initial_x + offset.x, offset.y);
        Circle::new(center, self.settings.ball_radius())
    }

    /// Ball circle at its current position
    pub fn ball_circle(&self) -> Circle {
        self.ball_circle_at(self.ball_offset)
    }

    /// Would a ball at `offset` overlap the target where it is right now?
    pub fn target_overlaps(&self, offset: Vec2) -> bool {
        rect_intersects_circle(&self.target_rect(), &self.ball_circle_at(offset))
    }

    pub fn ball_intersects_target(&self) -> bool {
        self.target_overlaps(self.ball_offset)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.score,
            time_remaining: self.time_remaining,
            is_active: self.is_active,
            target_x: self.target_x,
            target_y: self.target_y,
            ball_offset: self.ball_offset,
            ball_color: self.ball_feedback.color(),
            ball_scale: self.ball_feedback.scale(),
            is_collision_locked: self.is_collision_locked,
        }
    }
}

/// Read-only view of the state for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u32,
    pub time_remaining: u32,
    pub is_active: bool,
    pub target_x: f32,
    pub target_y: f32,
    pub ball_offset: Vec2,
    pub ball_color: BallColor,
    pub ball_scale: f32,
    pub is_collision_locked: bool,
}
