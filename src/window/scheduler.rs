//! Virtual clock with a timeout and animation-frame queue.
//!
//! Nothing runs on its own: the host advances the clock and the window pops
//! due tasks one at a time, running each with no borrow held.

use std::fmt;
use std::time::Duration;

/// Handle returned by `set_timeout` and `request_animation_frame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

pub(crate) type Task = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Timeout,
    AnimationFrame,
}

struct ScheduledTask {
    id: TimerId,
    due_at: Duration,
    order: u64,
    kind: TaskKind,
    callback: Task,
}

/// A pending task as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTimer {
    pub id: TimerId,
    pub due_at: Duration,
    pub kind: TaskKind,
}

pub struct Scheduler {
    now: Duration,
    frame_interval: Duration,
    next_id: u64,
    next_order: u64,
    tasks: Vec<ScheduledTask>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now)
            .field("pending", &self.tasks.len())
            .finish()
    }
}

impl Scheduler {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval,
            next_id: 1,
            next_order: 0,
            tasks: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn set_now(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    /// Queue a callback to run `delay` after now.
    pub fn schedule(&mut self, delay: Duration, callback: Task) -> TimerId {
        self.push(self.now.saturating_add(delay), TaskKind::Timeout, callback)
    }

    /// Queue a callback for the next animation frame.
    pub fn schedule_frame(&mut self, callback: Task) -> TimerId {
        self.push(
            self.now.saturating_add(self.frame_interval),
            TaskKind::AnimationFrame,
            callback,
        )
    }

    fn push(&mut self, due_at: Duration, kind: TaskKind, callback: Task) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let order = self.next_order;
        self.next_order += 1;
        self.tasks.push(ScheduledTask {
            id,
            due_at,
            order,
            kind,
            callback,
        });
        id
    }

    /// Drop a pending task. Returns whether it was still queued.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Queued tasks in run order.
    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        let mut tasks: Vec<_> = self.tasks.iter().collect();
        tasks.sort_by_key(|task| (task.due_at, task.order));
        tasks
            .into_iter()
            .map(|task| PendingTimer {
                id: task.id,
                due_at: task.due_at,
                kind: task.kind,
            })
            .collect()
    }

    /// Remove the next task due at or before `due_limit` (any task when
    /// `None`), moving the clock forward to its due time.
    pub(crate) fn pop_next(&mut self, due_limit: Option<Duration>) -> Option<Task> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| due_limit.is_none_or(|limit| task.due_at <= limit))
            .min_by_key(|(_, task)| (task.due_at, task.order))
            .map(|(index, _)| index)?;

        let task = self.tasks.swap_remove(index);
        self.set_now(task.due_at);
        Some(task.callback)
    }
}
