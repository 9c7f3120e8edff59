//! Periodic animation tasks.
//!
//! The scheduler keeps a virtual clock that only moves when the host calls
//! `Runtime::tick`. Ticks therefore interleave with interpreter runs on one
//! thread and never preempt a `run` in progress.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tracing::debug;

/// Shortest interval a task may tick at, whatever its rate.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

/// Animation category. A shape has at most one live task per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel { Rotation, MotionX, MotionY }

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Rotation, Channel::MotionX, Channel::MotionY];
}

/// What one tick does to the live shape record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskAction {
    Rotate { step: f64 },
    Translate { dx: f64, dy: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub shape: String,
    pub channel: Channel,
    pub action: TaskAction,
    pub interval: Duration,
    pub next_due: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Firings allowed per task in one `advance`; a task further behind
    /// skips the missed ticks instead of replaying them.
    pub max_catch_up: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self { Self { max_catch_up: 32 } }
}

/// `1000ms / |rate|`, clamped to `MIN_INTERVAL`.
pub fn interval_for(rate: f64) -> Duration {
    let secs = 1.0 / rate.abs();
    if secs.is_nan() {
        return MIN_INTERVAL;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX).max(MIN_INTERVAL)
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    tasks: BTreeMap<TaskId, Task>,
    channels: HashMap<(String, Channel), TaskId>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> SchedulerConfig { self.config }

    pub fn set_config(&mut self, config: SchedulerConfig) { self.config = config; }

    /// Time since the session started, as seen by the tasks.
    pub fn now(&self) -> Duration { self.now }

    /// Start a task ticking every `interval_for(rate)`, first due one interval
    /// from now. Any task already on `(shape, channel)` is cancelled first.
    pub fn start(&mut self, shape: &str, channel: Channel, action: TaskAction, rate: f64) -> TaskId {
        self.cancel_channel(shape, channel);
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let interval = interval_for(rate);
        let task = Task {
            id,
            shape: shape.to_string(),
            channel,
            action,
            interval,
            next_due: self.now.saturating_add(interval),
        };
        debug!(?id, shape, ?channel, ?interval, "task started");
        self.tasks.insert(id, task);
        self.channels.insert((shape.to_string(), channel), id);
        id
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.remove(&id) else { return false };
        let key = (task.shape, task.channel);
        if self.channels.get(&key) == Some(&id) {
            self.channels.remove(&key);
        }
        debug!(?id, shape = %key.0, channel = ?key.1, "task cancelled");
        true
    }

    pub fn cancel_channel(&mut self, shape: &str, channel: Channel) -> Option<TaskId> {
        let id = self.active(shape, channel)?;
        self.cancel(id);
        Some(id)
    }

    pub fn active(&self, shape: &str, channel: Channel) -> Option<TaskId> {
        self.channels.get(&(shape.to_string(), channel)).copied()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> { self.tasks.get(&id) }

    pub fn is_active(&self, id: TaskId) -> bool { self.tasks.contains_key(&id) }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> { self.tasks.values() }

    pub fn len(&self) -> usize { self.tasks.len() }

    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }

    /// Move the clock to `until` and return every firing that fell due, in
    /// time order (ties broken by task id). Each task's next due time is
    /// already advanced past the returned firings.
    pub(crate) fn advance(&mut self, until: Duration) -> Vec<(Duration, TaskId)> {
        let mut due = Vec::new();
        for task in self.tasks.values_mut() {
            let mut fired = 0;
            while task.next_due <= until {
                if fired == self.config.max_catch_up {
                    let missed = (until - task.next_due).as_nanos() / task.interval.as_nanos() + 1;
                    let missed = u32::try_from(missed).unwrap_or(u32::MAX);
                    task.next_due = task.next_due.saturating_add(task.interval.saturating_mul(missed));
                    debug!(id = ?task.id, missed, "task skipped ticks");
                    break;
                }
                due.push((task.next_due, task.id));
                task.next_due = task.next_due.saturating_add(task.interval);
                fired += 1;
            }
        }
        self.now = until;
        due.sort();
        due
    }
}
