mod task_queue;

use std::cell::RefCell;
use std::rc::Rc;

use crate::future::{Future, FutureState};

pub use task_queue::TaskQueue;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// The deferral seam the future core depends on: run `task` after the
/// current synchronous execution completes, in FIFO order with other
/// deferrals. Implementations must not run the task inside `schedule`.
pub trait Schedule {
    fn schedule(&self, task: Task);
}

/// Deterministic FIFO scheduler and driver. Cloning yields another handle
/// to the same queue, so a test can hand one clone to futures and keep
/// another to drain manually.
#[derive(Clone, Default)]
pub struct Scheduler {
    tasks: Rc<RefCell<TaskQueue>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs at most one queued task. Returns whether one ran.
    pub fn step(&self) -> bool {
        // The borrow must end before the task runs: tasks enqueue more work.
        let task = self.tasks.borrow_mut().pop();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Drains the queue until no work remains, including work enqueued
    /// while draining. Returns the number of tasks run.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.step() {
            ran += 1;
        }
        ran
    }

    /// Steps until `future` leaves `Pending` or the queue empties. A future
    /// that never settles is a valid terminal state; the still-pending
    /// state is simply returned.
    pub fn run_until_settled(&self, future: &Future) -> FutureState {
        while future.is_pending() && self.step() {}
        future.state()
    }

    pub fn has_pending(&self) -> bool {
        !self.tasks.borrow().is_empty()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Schedule for Scheduler {
    fn schedule(&self, task: Task) {
        self.tasks.borrow_mut().enqueue(task);
    }
}
