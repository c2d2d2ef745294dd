use crate::core::easing::Easing;
use crate::domain::ports::{Clock, FrameId, FrameScheduler};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Settled,
    Cancelled,
}

struct TimelineState {
    target: f64,
    duration: Duration,
    easing: Easing,
    start: Duration,
    fraction: f64,
    eased: f64,
    value: f64,
    phase: Phase,
    pending: Option<FrameId>,
    // 每次重啟或取消都會遞增，舊的回呼看到不同代數就直接略過
    generation: u64,
    frames: u64,
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn FrameScheduler>,
}

impl TimelineState {
    fn release_frame(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
    }

    fn reset(&mut self) {
        self.release_frame();
        self.generation += 1;
        self.start = self.clock.now();
        self.fraction = 0.0;
        self.eased = 0.0;
        self.value = 0.0;
        self.frames = 0;
        self.phase = Phase::Running;
    }

    fn advance(&mut self, now: Duration) {
        let elapsed = now.saturating_sub(self.start);
        let t = fraction_of(elapsed, self.duration).max(self.fraction);
        self.fraction = t;
        self.frames += 1;

        if t >= 1.0 {
            // 收尾影格必須剛好等於目標值
            self.eased = 1.0;
            self.value = self.target;
            self.phase = Phase::Settled;
        } else {
            self.eased = self.easing.apply(t);
            self.value = self.target * self.eased;
        }
    }
}

/// `t = min(1, elapsed / duration)`; a zero duration is already complete.
pub fn fraction_of(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

/// Drives one number from 0 to `target` over `duration`, one step per frame.
///
/// The timeline owns its frame registration: [`Timeline::cancel`], a restart
/// or dropping the timeline releases it, and a callback that fires after that
/// does nothing.
pub struct Timeline {
    state: Rc<RefCell<TimelineState>>,
}

impl Timeline {
    pub fn new(
        clock: Rc<dyn Clock>,
        scheduler: Rc<dyn FrameScheduler>,
        target: f64,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        let start = clock.now();
        Self {
            state: Rc::new(RefCell::new(TimelineState {
                target,
                duration,
                easing,
                start,
                fraction: 0.0,
                eased: 0.0,
                value: 0.0,
                phase: Phase::Idle,
                pending: None,
                generation: 0,
                frames: 0,
                clock,
                scheduler,
            })),
        }
    }

    /// Records the start timestamp and schedules the first frame.
    ///
    /// Only an idle timeline starts; use [`Timeline::restart`] otherwise.
    pub fn start(&self) -> bool {
        if self.phase() != Phase::Idle {
            return false;
        }
        self.state.borrow_mut().reset();
        schedule(&self.state);
        true
    }

    /// Starts over from 0 with new parameters, whatever the current phase.
    /// 不沿用動畫中途的值，畫面可能瞬間跳回 0
    pub fn restart(&self, target: f64, duration: Duration) {
        {
            let mut state = self.state.borrow_mut();
            state.target = target;
            state.duration = duration;
            state.reset();
        }
        tracing::debug!(
            "Timeline restarted: target={}, duration={:?}",
            target,
            duration
        );
        schedule(&self.state);
    }

    /// Restarts only when the target or duration actually changed.
    pub fn retarget(&self, target: f64, duration: Duration) -> bool {
        let changed = {
            let state = self.state.borrow();
            state.target.to_bits() != target.to_bits() || state.duration != duration
        };
        if changed {
            self.restart(target, duration);
        }
        changed
    }

    pub fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        state.release_frame();
        state.generation += 1;
        if matches!(state.phase, Phase::Idle | Phase::Running) {
            state.phase = Phase::Cancelled;
        }
    }

    pub fn value(&self) -> f64 {
        self.state.borrow().value
    }

    /// Raw elapsed-time fraction `t`.
    pub fn fraction(&self) -> f64 {
        self.state.borrow().fraction
    }

    /// `ease(t)`, the shared progress for composite cards.
    pub fn eased(&self) -> f64 {
        self.state.borrow().eased
    }

    pub fn target(&self) -> f64 {
        self.state.borrow().target
    }

    pub fn duration(&self) -> Duration {
        self.state.borrow().duration
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase() == Phase::Settled
    }

    pub fn is_running(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// Frames processed since the last (re)start.
    pub fn frames(&self) -> u64 {
        self.state.borrow().frames
    }
}

fn schedule(state: &Rc<RefCell<TimelineState>>) {
    let weak = Rc::downgrade(state);
    let mut guard = state.borrow_mut();
    let generation = guard.generation;
    let id = guard
        .scheduler
        .request_frame(Box::new(move |now| on_frame(&weak, generation, now)));
    guard.pending = Some(id);
}

fn on_frame(weak: &Weak<RefCell<TimelineState>>, generation: u64, now: Duration) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let keep_running = {
        let mut guard = state.borrow_mut();
        if guard.generation != generation || guard.phase != Phase::Running {
            return;
        }
        guard.pending = None;
        guard.advance(now);
        guard.phase == Phase::Running
    };
    if keep_running {
        schedule(&state);
    }
}

impl Drop for Timeline {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.release_frame();
        }
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Timeline")
            .field("target", &state.target)
            .field("duration", &state.duration)
            .field("phase", &state.phase)
            .field("fraction", &state.fraction)
            .field("value", &state.value)
            .finish()
    }
}
