//! Host driver
//!
//! Bundles the engine with a [`ManualScheduler`] and a list of event
//! observers. A host advances it by elapsed wall time and forwards input; the
//! presentation layer reads snapshots and listens for events.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::engine::SimulationEngine;
use super::schedule::ManualScheduler;
use super::state::{GameEvent, Snapshot};
use crate::settings::{Difficulty, Settings, SettingsError};
use crate::tuning::Tuning;

/// Callback invoked for every emitted event
pub type EventObserver = Box<dyn FnMut(&GameEvent) + Send>;

/// Driver shared between a ticking thread and input handlers
pub type SharedDriver = Arc<Mutex<GameDriver>>;

pub struct GameDriver {
    engine: SimulationEngine,
    scheduler: ManualScheduler,
    observers: Vec<EventObserver>,
}

impl GameDriver {
    pub fn new(difficulty: Difficulty, tuning: Tuning, seed: u64) -> Result<Self, SettingsError> {
        Self::with_settings(difficulty.settings(), tuning, seed)
    }

    pub fn with_settings(settings: Settings, tuning: Tuning, seed: u64) -> Result<Self, SettingsError> {
        Ok(Self {
            engine: SimulationEngine::new(settings, tuning, seed)?,
            scheduler: ManualScheduler::new(),
            observers: Vec::new(),
        })
    }

    /// Wrap the driver for use from several threads
    pub fn into_shared(self) -> SharedDriver {
        Arc::new(Mutex::new(self))
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    /// Virtual time since the driver was created
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Register an event observer
    pub fn subscribe(&mut self, observer: impl FnMut(&GameEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Run every task that falls due within the next `dt`
    pub fn advance(&mut self, dt: Duration) {
        let deadline = self.scheduler.now() + dt;
        while let Some(task) = self.scheduler.pop_due(deadline) {
            self.engine.run_task(task, &mut self.scheduler);
        }
        self.scheduler.advance_to(deadline);
        self.flush_events();
    }

    pub fn drag(&mut self, absolute_x: f32) {
        self.engine.on_drag_input(absolute_x);
    }

    pub fn press_control(&mut self) {
        self.engine.on_control_button_press(&mut self.scheduler);
        self.flush_events();
    }

    pub fn start(&mut self) {
        self.engine.start_session(&mut self.scheduler);
        self.flush_events();
    }

    pub fn stop(&mut self, emit_end_signal: bool) {
        self.engine.stop_session(emit_end_signal, &mut self.scheduler);
        self.flush_events();
    }

    /// Change difficulty; refused while a session is running
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        self.engine.select_difficulty(difficulty)
    }

    fn flush_events(&mut self) {
        for event in self.engine.drain_events() {
            for observer in &mut self.observers {
                observer(&event);
            }
        }
    }
}
