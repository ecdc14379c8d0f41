//! Stoppable repeating task.
//!
//! A [`RepeatingTask`] runs its body once per scheduler tick and re-arms itself
//! after each run unless it has been stopped. The scheduler only ever needs to
//! deliver single-shot callbacks (`requestAnimationFrame`, `setTimeout`, or a
//! manual clock in tests).

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};

pub type Tick = Rc<dyn Fn(f64)>;

pub trait Scheduler {
    /// Arrange for `tick` to be called once with a timestamp in milliseconds.
    /// Returns a handle for [`Scheduler::cancel`], or `None` if the request failed.
    fn schedule_once(&self, tick: &Tick) -> Option<i32>;
    fn cancel(&self, handle: i32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Running,
}

type Body = Box<dyn FnMut(f64) -> ControlFlow<()>>;

struct Inner<S: Scheduler> {
    scheduler: S,
    body: RefCell<Body>,
    stopped: Cell<bool>,
    pending: Cell<Option<i32>>,
    tick: RefCell<Option<Tick>>,
}

impl<S: Scheduler> Inner<S> {
    fn arm(&self) {
        let Some(tick) = self.tick.borrow().clone() else {
            return;
        };
        match self.scheduler.schedule_once(&tick) {
            Some(handle) => self.pending.set(Some(handle)),
            None => {
                log::warn!("scheduler refused callback; stopping task");
                self.halt();
            }
        }
    }

    fn run(&self, now: f64) {
        self.pending.set(None);
        if self.stopped.get() {
            return;
        }
        let flow = (self.body.borrow_mut())(now);
        if flow.is_break() {
            self.halt();
        } else if !self.stopped.get() {
            self.arm();
        }
    }

    fn halt(&self) {
        self.stopped.set(true);
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
        self.tick.borrow_mut().take();
    }
}

/// Handle to a running callback chain. Dropping it stops the chain.
pub struct RepeatingTask<S: Scheduler + 'static> {
    inner: Rc<Inner<S>>,
}

impl<S: Scheduler + 'static> RepeatingTask<S> {
    /// Start the chain; the first run happens on the scheduler's next tick.
    pub fn start(scheduler: S, body: impl FnMut(f64) -> ControlFlow<()> + 'static) -> Self {
        let inner = Rc::new(Inner {
            scheduler,
            body: RefCell::new(Box::new(body)),
            stopped: Cell::new(false),
            pending: Cell::new(None),
            tick: RefCell::new(None),
        });
        let weak: Weak<Inner<S>> = Rc::downgrade(&inner);
        let tick: Tick = Rc::new(move |now| {
            if let Some(inner) = weak.upgrade() {
                inner.run(now);
            }
        });
        *inner.tick.borrow_mut() = Some(tick);
        inner.arm();
        Self { inner }
    }

    pub fn state(&self) -> TaskState {
        if self.inner.stopped.get() {
            TaskState::Idle
        } else {
            TaskState::Running
        }
    }

    /// Cancel the pending callback. Idempotent.
    pub fn stop(&self) {
        if !self.inner.stopped.get() {
            self.inner.halt();
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.inner.scheduler
    }
}

impl<S: Scheduler + 'static> Drop for RepeatingTask<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Scheduler driven by hand; callbacks only fire on [`ManualScheduler::advance`].
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Rc<RefCell<Vec<(i32, Tick)>>>,
    next_id: Rc<Cell<i32>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Fire every callback queued before this call. Returns how many ran.
    pub fn advance(&self, now: f64) -> usize {
        let due: Vec<(i32, Tick)> = self.queue.borrow_mut().drain(..).collect();
        for (_, tick) in &due {
            tick(now);
        }
        due.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, tick: &Tick) -> Option<i32> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.queue.borrow_mut().push((id, tick.clone()));
        Some(id)
    }

    fn cancel(&self, handle: i32) {
        self.queue.borrow_mut().retain(|(id, _)| *id != handle);
    }
}
