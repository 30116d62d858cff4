//! Simulation engine
//!
//! Owns the session lifecycle: countdown, target sweep, catch detection,
//! scoring, and ball placement. Timed work is registered with a host-owned
//! [`Scheduler`] and comes back through [`SimulationEngine::run_task`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::schedule::{Scheduler, Task, TaskId};
use super::state::{BallFeedback, GameEvent, GameState, Snapshot};
use crate::settings::{Difficulty, Settings, SettingsError};
use crate::tuning::Tuning;

/// Result of a ball placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallPlacement {
    pub offset: Vec2,
    /// Candidates drawn, including the accepted one
    pub attempts: u32,
    /// True when every attempt overlapped and the last one was taken anyway
    pub overlapping: bool,
}

/// The game simulation
#[derive(Debug)]
pub struct SimulationEngine {
    state: GameState,
    tuning: Tuning,
    rng: Pcg32,
    /// Bumped on every session start; stale settle tasks carry an older value
    session: u64,
    countdown_task: Option<TaskId>,
    movement_task: Option<TaskId>,
    settle_task: Option<TaskId>,
    events: Vec<GameEvent>,
}

impl SimulationEngine {
    /// Create an engine for custom settings
    pub fn new(settings: Settings, tuning: Tuning, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;
        tuning.validate()?;
        Ok(Self {
            state: GameState::new(settings),
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            session: 0,
            countdown_task: None,
            movement_task: None,
            settle_task: None,
            events: Vec::new(),
        })
    }

    /// Create an engine for a difficulty preset
    pub fn with_difficulty(difficulty: Difficulty, tuning: Tuning, seed: u64) -> Result<Self, SettingsError> {
        Self::new(difficulty.settings(), tuning, seed)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active
    }

    /// Generation of the current (or most recent) session
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Swap in new settings; only allowed between sessions
    ///
    /// Returns false (and changes nothing) while a session is running.
    pub fn apply_settings(&mut self, settings: Settings) -> Result<bool, SettingsError> {
        settings.validate()?;
        if self.state.is_active {
            log::warn!("Ignoring settings change during an active session");
            return Ok(false);
        }
        self.state = GameState::new(settings);
        Ok(true)
    }

    /// Switch to a difficulty preset; only allowed between sessions
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.state.is_active {
            log::warn!("Ignoring difficulty change to {} during an active session", difficulty.as_str());
            return false;
        }
        log::info!("Difficulty set to {}", difficulty.as_str());
        self.state = GameState::new(difficulty.settings());
        true
    }

    /// Start a new session, ending the current one silently first
    pub fn start_session(&mut self, scheduler: &mut dyn Scheduler) {
        if self.state.is_active {
            self.stop_session(false, scheduler);
        }

        self.session += 1;
        self.state = GameState::new(self.state.settings);
        self.state.is_active = true;

        self.place_target();
        self.place_ball();

        self.countdown_task = Some(scheduler.schedule_repeating(Task::Countdown, self.tuning.countdown_interval));
        self.movement_task = Some(scheduler.schedule_repeating(Task::Movement, self.tuning.movement_interval));

        log::info!(
            "Session {} started ({}s, target_x={:.1}, ball={:?})",
            self.session,
            self.state.time_remaining,
            self.state.target_x,
            self.state.ball_offset
        );
    }

    /// End the session and cancel everything it scheduled
    ///
    /// Emits `GameOver` only when `emit_end_signal` is set, even if no session was running.
    pub fn stop_session(&mut self, emit_end_signal: bool, scheduler: &mut dyn Scheduler) {
        let was_active = self.state.is_active;
        self.state.is_active = false;

        for id in [
            self.countdown_task.take(),
            self.movement_task.take(),
            self.settle_task.take(),
        ]
        .into_iter()
        .flatten()
        {
            scheduler.cancel(id);
        }

        if was_active {
            log::info!("Session {} ended with score {}", self.session, self.state.score);
        }

        if emit_end_signal {
            self.events.push(GameEvent::GameOver {
                sound: self.state.settings.end_game_sound,
                final_score: self.state.score,
            });
        }
    }

    /// Dispatch a task popped from the scheduler
    pub fn run_task(&mut self, task: Task, scheduler: &mut dyn Scheduler) {
        match task {
            Task::Countdown => self.on_countdown_tick(scheduler),
            Task::Movement => self.on_movement_tick(scheduler),
            Task::Settle { session } => self.on_settle(session),
        }
    }

    /// One countdown step; the session ends on the tick after reaching zero
    pub fn on_countdown_tick(&mut self, scheduler: &mut dyn Scheduler) {
        if !self.state.is_active {
            if let Some(id) = self.countdown_task.take() {
                scheduler.cancel(id);
            }
            return;
        }

        if self.state.time_remaining > 0 {
            self.state.time_remaining -= 1;
        } else {
            if let Some(id) = self.countdown_task.take() {
                scheduler.cancel(id);
            }
            self.stop_session(true, scheduler);
        }
    }

    /// One movement step: sweep the target down, then check for a catch
    pub fn on_movement_tick(&mut self, scheduler: &mut dyn Scheduler) {
        if !self.state.is_active {
            if let Some(id) = self.movement_task.take() {
                scheduler.cancel(id);
            }
            return;
        }

        self.state.advance_target();
        self.check_collision(scheduler);
    }

    /// Follow the player's drag; works whether or not a session is running
    pub fn on_drag_input(&mut self, absolute_x: f32) {
        if !absolute_x.is_finite() {
            log::warn!("Ignoring non-finite drag position {}", absolute_x);
            return;
        }
        let offset = absolute_x - self.state.settings.target_initial_x;
        self.state.target_x = self.state.clamp_target_x(offset);
    }

    /// Start/stop toggle
    pub fn on_control_button_press(&mut self, scheduler: &mut dyn Scheduler) {
        if self.state.is_active {
            self.stop_session(true, scheduler);
        } else {
            self.start_session(scheduler);
        }
        self.events.push(GameEvent::DisableControl {
            duration: self.tuning.control_cooldown,
        });
    }

    /// Score a catch if the target overlaps the ball and no catch is settling
    fn check_collision(&mut self, scheduler: &mut dyn Scheduler) {
        if self.state.is_collision_locked || !self.state.ball_intersects_target() {
            return;
        }

        self.state.is_collision_locked = true;
        self.state.score += 1;
        self.state.ball_feedback = BallFeedback::Hit;
        self.events.push(GameEvent::Collision {
            sound: self.state.settings.collision_sound,
        });
        log::debug!(
            "Catch at target=({:.1}, {:.1}) ball={:?}, score {}",
            self.state.target_x,
            self.state.target_y,
            self.state.ball_offset,
            self.state.score
        );

        let task = Task::Settle { session: self.session };
        self.settle_task = Some(scheduler.schedule_once(task, self.tuning.settle_delay));
    }

    /// Deferred half of a catch: move the ball and re-arm scoring
    fn on_settle(&mut self, session: u64) {
        if session != self.session || !self.state.is_active {
            log::debug!("Dropping stale settle task from session {}", session);
            return;
        }
        if !self.state.is_collision_locked {
            return;
        }

        self.settle_task = None;
        self.place_ball();
        self.state.ball_feedback = BallFeedback::Normal;
        self.state.is_collision_locked = false;
    }

    /// Random horizontal target offset within the drag bounds, back at the top
    fn place_target(&mut self) {
        let half = self.state.settings.half_area();
        let x = self.rng.random_range(-half..=half);
        self.state.target_x = self.state.clamp_target_x(x);
        self.state.target_y = 0.0;
    }

    /// Move the ball to a random spot clear of the target
    ///
    /// Gives up after `max_placement_attempts` draws and keeps the last
    /// candidate, so a target covering most of the area cannot stall placement.
    pub fn place_ball(&mut self) -> BallPlacement {
        let half = self.state.settings.half_area();
        let area = self.state.settings.game_area_size;
        let max_attempts = self.tuning.max_placement_attempts;

        let mut attempts = 0;
        let (offset, overlapping) = loop {
            let candidate = Vec2::new(
                self.rng.random_range(-half..=half),
                self.rng.random_range(0.0..=area),
            );
            attempts += 1;

            let overlapping = self.state.target_overlaps(candidate);
            if !overlapping || attempts >= max_attempts {
                break (candidate, overlapping);
            }
        };

        if overlapping {
            log::debug!("Ball placement exhausted {} attempts, accepting overlap", attempts);
        }

        self.state.ball_offset = offset;
        BallPlacement {
            offset,
            attempts,
            overlapping,
        }
    }
}
