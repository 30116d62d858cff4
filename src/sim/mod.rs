//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, plays sound
//! or reads the wall clock:
//! - Time arrives as scheduled tasks
//! - Seeded RNG only
//! - Presentation sees snapshots and events, never the live state

pub mod collision;
pub mod driver;
pub mod engine;
pub mod schedule;
pub mod state;

pub use collision::{Circle, Rect, rect_intersects_circle};
pub use driver::{EventObserver, GameDriver, SharedDriver};
pub use engine::{BallPlacement, SimulationEngine};
pub use schedule::{ManualScheduler, Scheduler, Task, TaskId};
pub use state::{BallColor, BallFeedback, GameEvent, GameState, Snapshot};
