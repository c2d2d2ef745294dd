use crate::core::easing::Easing;
use crate::core::timeline::Timeline;
use crate::domain::ports::{Clock, FrameCallback, FrameId, FrameScheduler};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Wall clock backed by [`Instant`], measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) -> Duration {
        let next = self.now.get() + by;
        self.now.set(next);
        next
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Single-threaded frame queue, the equivalent of `requestAnimationFrame`.
///
/// Callbacks registered while a frame is running are deferred to the next
/// frame, so a timeline that re-arms itself advances exactly once per frame.
#[derive(Default)]
pub struct FrameLoop {
    next_id: Cell<u64>,
    pending: RefCell<BTreeMap<FrameId, FrameCallback>>,
    frames_run: Cell<u64>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// 執行目前登記的所有回呼，回傳執行數量
    pub fn run_frame(&self, now: Duration) -> usize {
        let due = std::mem::take(&mut *self.pending.borrow_mut());
        let count = due.len();
        for (_, callback) in due {
            callback(now);
        }
        self.frames_run.set(self.frames_run.get() + 1);
        count
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run.get()
    }
}

impl FrameScheduler for FrameLoop {
    fn request_frame(&self, callback: FrameCallback) -> FrameId {
        let id = FrameId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.pending.borrow_mut().insert(id, callback);
        id
    }

    fn cancel_frame(&self, id: FrameId) -> bool {
        self.pending.borrow_mut().remove(&id).is_some()
    }
}

impl fmt::Debug for FrameLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameLoop")
            .field("pending", &self.pending_count())
            .field("frames_run", &self.frames_run.get())
            .finish()
    }
}

/// Clock + scheduler pair every timeline is started from.
#[derive(Clone)]
pub struct Animator {
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn FrameScheduler>,
}

impl Animator {
    pub fn new(clock: Rc<dyn Clock>, scheduler: Rc<dyn FrameScheduler>) -> Self {
        Self { clock, scheduler }
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Idle timeline, nothing scheduled until [`Timeline::start`].
    pub fn timeline(&self, target: f64, duration: Duration, easing: Easing) -> Timeline {
        Timeline::new(
            Rc::clone(&self.clock),
            Rc::clone(&self.scheduler),
            target,
            duration,
            easing,
        )
    }

    pub fn start(&self, target: f64, duration: Duration, easing: Easing) -> Timeline {
        let timeline = self.timeline(target, duration, easing);
        timeline.start();
        timeline
    }

    /// Shared-fraction timeline: target 1.0 under cubic ease-out.
    pub fn progress(&self, duration: Duration) -> Timeline {
        self.start(1.0, duration, Easing::CubicOut)
    }

    pub fn cancel(&self, timeline: &Timeline) {
        timeline.cancel();
    }
}

impl fmt::Debug for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("now", &self.clock.now())
            .finish()
    }
}
