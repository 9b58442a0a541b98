mod cache;

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use anyhow::Result;
use serde::Deserialize;

pub use cache::{
    PendingAsset, SharedAssetCache, collect_preloaded, schedule_cleanup, schedule_preload,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Normal,
    High,
}

pub type IdleTask = Box<dyn FnOnce() -> Result<()>>;

/// Reports how much of the current idle slot is left.
pub trait IdleDeadline {
    fn time_remaining(&self) -> Duration;
}

pub struct FrameDeadline {
    ends_at: Instant,
}

impl FrameDeadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            ends_at: Instant::now() + budget,
        }
    }
}

impl IdleDeadline for FrameDeadline {
    fn time_remaining(&self) -> Duration {
        self.ends_at.saturating_duration_since(Instant::now())
    }
}

struct QueuedTask {
    id: u64,
    priority: TaskPriority,
    task: IdleTask,
}

/// Background chores run between frames, highest priority first.
#[derive(Default)]
pub struct IdleTaskQueue {
    tasks: VecDeque<QueuedTask>,
    next_id: u64,
}

impl IdleTaskQueue {
    pub fn add_task(&mut self, task: IdleTask, priority: TaskPriority) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push_back(QueuedTask { id, priority, task });
        id
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Runs queued tasks until the queue is empty or the deadline is spent.
    /// Returns how many tasks ran.
    pub fn drain(&mut self, deadline: &dyn IdleDeadline) -> usize {
        // stable: FIFO within a priority
        self.tasks
            .make_contiguous()
            .sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut ran = 0;
        while !self.tasks.is_empty() && !deadline.time_remaining().is_zero() {
            let Some(QueuedTask { id, priority, task }) = self.tasks.pop_front() else {
                break;
            };
            if let Err(error) = task() {
                log::warn!("idle task {id} ({priority:?}) failed: {error:#}");
            }
            ran += 1;
        }
        ran
    }

    pub fn clear(&mut self) {
        if !self.tasks.is_empty() {
            log::debug!("dropping {} pending idle tasks", self.tasks.len());
        }
        self.tasks.clear();
    }
}

/// Runs `processor` over `data` in an idle slot; the outcome arrives on the returned channel.
pub fn schedule_process<T, R, F>(
    queue: &mut IdleTaskQueue,
    data: T,
    processor: F,
    priority: TaskPriority,
) -> Receiver<Result<R>>
where
    T: 'static,
    R: 'static,
    F: FnOnce(T) -> Result<R> + 'static,
{
    let (sender, receiver) = mpsc::channel();
    queue.add_task(
        Box::new(move || -> Result<()> {
            if sender.send(processor(data)).is_err() {
                log::debug!("idle result dropped; nobody is waiting for it");
            }
            Ok(())
        }),
        priority,
    );
    receiver
}
