//! Task scheduling
//!
//! The engine never runs timers itself. It registers `Task`s with a
//! `Scheduler` owned by the host, and the host hands due tasks back to
//! `SimulationEngine::run_task`. All state changes therefore go through the
//! engine, one call at a time.

use std::time::Duration;

/// Work the engine can ask to be run later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Once-per-second countdown
    Countdown,
    /// Target movement and catch check
    Movement,
    /// Deferred ball reposition after a catch, tagged with the session that scheduled it
    Settle { session: u64 },
}

/// Handle returned when a task is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Something that can run tasks later
pub trait Scheduler {
    /// Run `task` every `interval`, first after one interval
    fn schedule_repeating(&mut self, task: Task, interval: Duration) -> TaskId;

    /// Run `task` once after `delay`
    fn schedule_once(&mut self, task: Task, delay: Duration) -> TaskId;

    /// Drop a task; cancelling an unknown or finished task is a no-op
    fn cancel(&mut self, id: TaskId);
}

#[derive(Debug, Clone)]
struct Entry {
    id: TaskId,
    task: Task,
    due: Duration,
    /// Registration order, breaks ties between tasks due at the same instant
    seq: u64,
    period: Option<Duration>,
}

/// Scheduler driven by an explicit virtual clock
///
/// Time only moves when the host calls `pop_due`/`advance_to`, which makes it
/// suitable both for tests and for a real-time host feeding in elapsed time.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    entries: Vec<Entry>,
    next_id: u64,
    next_seq: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered tasks in firing order
    pub fn pending(&self) -> Vec<Task> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by_key(|e| (e.due, e.seq));
        entries.into_iter().map(|e| e.task).collect()
    }

    /// Whether `task` is currently registered
    pub fn is_scheduled(&self, task: Task) -> bool {
        self.entries.iter().any(|e| e.task == task)
    }

    /// Pop the next task due at or before `deadline`
    ///
    /// The clock moves to the task's due time. Repeating tasks are re-armed
    /// before being returned, so cancelling them from the handler works.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<Task> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= deadline)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;

        let due = self.entries[index].due;
        self.now = self.now.max(due);

        let task = self.entries[index].task;
        match self.entries[index].period {
            Some(period) => {
                let seq = self.bump_seq();
                let entry = &mut self.entries[index];
                entry.due = due + period;
                entry.seq = seq;
            }
            None => {
                self.entries.swap_remove(index);
            }
        }
        Some(task)
    }

    /// Move the clock forward without running anything
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn insert(&mut self, task: Task, delay: Duration, period: Option<Duration>) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.entries.push(Entry {
            id,
            task,
            due: self.now + delay,
            seq,
            period,
        });
        id
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, task: Task, interval: Duration) -> TaskId {
        self.insert(task, interval, Some(interval))
    }

    fn schedule_once(&mut self, task: Task, delay: Duration) -> TaskId {
        self.insert(task, delay, None)
    }

    fn cancel(&mut self, id: TaskId) {
        self.entries.retain(|e| e.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(scheduler: &mut ManualScheduler, deadline: Duration) -> Vec<Task> {
        let mut fired = Vec::new();
        while let Some(task) = scheduler.pop_due(deadline) {
            fired.push(task);
        }
        scheduler.advance_to(deadline);
        fired
    }

    #[test]
    fn test_repeating_task_fires_each_interval() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_repeating(Task::Movement, ms(50));

        assert!(drain(&mut scheduler, ms(49)).is_empty());
        assert_eq!(drain(&mut scheduler, ms(200)).len(), 4);
        assert_eq!(scheduler.now(), ms(200));
        assert!(scheduler.is_scheduled(Task::Movement));
    }

    #[test]
    fn test_once_task_fires_once() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_once(Task::Settle { session: 1 }, ms(500));

        assert_eq!(drain(&mut scheduler, ms(1000)), vec![Task::Settle { session: 1 }]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_ties_fire_in_registration_order() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_repeating(Task::Countdown, ms(1000));
        scheduler.schedule_repeating(Task::Movement, ms(50));

        let fired = drain(&mut scheduler, ms(1000));
        assert_eq!(fired.len(), 21);
        // Movement re-armed at 950ms, after Countdown registered at 0ms
        assert_eq!(fired[19], Task::Countdown);
        assert_eq!(fired[20], Task::Movement);
    }

    #[test]
    fn test_cancel_stops_future_runs() {
        let mut scheduler = ManualScheduler::new();
        let id = scheduler.schedule_repeating(Task::Movement, ms(50));
        assert_eq!(drain(&mut scheduler, ms(100)).len(), 2);

        scheduler.cancel(id);
        scheduler.cancel(id);
        assert!(drain(&mut scheduler, ms(1000)).is_empty());
    }

    #[test]
    fn test_delay_is_relative_to_now() {
        let mut scheduler = ManualScheduler::new();
        scheduler.advance_to(ms(300));
        scheduler.schedule_once(Task::Settle { session: 2 }, ms(500));

        assert!(drain(&mut scheduler, ms(799)).is_empty());
        assert_eq!(scheduler.pending(), vec![Task::Settle { session: 2 }]);
        assert_eq!(drain(&mut scheduler, ms(800)).len(), 1);
    }
}
