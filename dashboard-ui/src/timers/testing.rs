//! Deterministic clock and scheduler for timer tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use chrono::{TimeZone, Utc};

use super::{TickGuard, TimerEnv, TimerFrame, TimerTarget};

struct Slot {
    period: f64,
    next_due: f64,
    tick: Option<Box<dyn FnMut()>>,
}

#[derive(Default)]
struct ManualState {
    now: f64,
    next_id: u64,
    slots: BTreeMap<u64, Slot>,
    deferred: VecDeque<Box<dyn FnOnce()>>,
}

struct ManualCancel {
    state: Weak<RefCell<ManualState>>,
    id: u64,
}

impl Drop for ManualCancel {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let removed = state.borrow_mut().slots.remove(&self.id);
            drop(removed);
        }
    }
}

/// Mock clock. `advance` fires due ticks in order, running deferred tasks
/// after each one.
#[derive(Clone, Default)]
pub struct ManualTimerEnv {
    state: Rc<RefCell<ManualState>>,
}

impl ManualTimerEnv {
    pub fn new(now_ms: f64) -> Self {
        let env = Self::default();
        env.state.borrow_mut().now = now_ms;
        env
    }

    pub fn handle(&self) -> Rc<dyn TimerEnv> {
        Rc::new(self.clone())
    }

    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    pub fn active_ticks(&self) -> usize {
        self.state.borrow().slots.len()
    }

    pub fn advance(&self, ms: u64) {
        let until = self.now() + ms as f64;
        self.run_deferred();

        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .slots
                    .iter()
                    .filter(|(_, slot)| slot.next_due <= until)
                    .min_by(|a, b| a.1.next_due.total_cmp(&b.1.next_due).then(a.0.cmp(b.0)))
                    .map(|(id, slot)| (*id, slot.next_due));
                let Some((id, at)) = next else {
                    break;
                };
                state.now = at;
                let slot = state.slots.get_mut(&id).map(|slot| {
                    slot.next_due += slot.period;
                    slot.tick.take()
                });
                (id, slot.flatten())
            };

            let (id, Some(mut tick)) = due else {
                continue;
            };
            tick();

            let leftover = {
                let mut state = self.state.borrow_mut();
                match state.slots.get_mut(&id) {
                    Some(slot) => {
                        slot.tick = Some(tick);
                        None
                    }
                    None => Some(tick),
                }
            };
            drop(leftover);
            self.run_deferred();
        }

        self.state.borrow_mut().now = until;
        self.run_deferred();
    }

    fn run_deferred(&self) {
        loop {
            let task = self.state.borrow_mut().deferred.pop_front();
            match task {
                Some(task) => task(),
                None => break,
            }
        }
    }
}

impl TimerEnv for ManualTimerEnv {
    fn now_ms(&self) -> f64 {
        self.now()
    }

    fn repeat(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> TickGuard {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let period = f64::from(period_ms.max(1));
        let next_due = state.now + period;
        state.slots.insert(
            id,
            Slot {
                period,
                next_due,
                tick: Some(tick),
            },
        );
        TickGuard::new(ManualCancel {
            state: Rc::downgrade(&self.state),
            id,
        })
    }

    fn defer(&self, task: Box<dyn FnOnce()>) {
        self.state.borrow_mut().deferred.push_back(task);
    }
}

/// Shared record of every frame a target received.
#[derive(Clone, Default)]
pub struct FrameLog {
    frames: Rc<RefCell<Vec<TimerFrame>>>,
}

impl FrameLog {
    pub fn target(&self) -> Box<dyn TimerTarget> {
        Box::new(self.clone())
    }

    pub fn frames(&self) -> Vec<TimerFrame> {
        self.frames.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn last(&self) -> Option<TimerFrame> {
        self.frames.borrow().last().cloned()
    }

    pub fn count(&self, frame: &TimerFrame) -> usize {
        self.frames.borrow().iter().filter(|f| *f == frame).count()
    }
}

impl TimerTarget for FrameLog {
    fn render(&mut self, frame: TimerFrame) {
        self.frames.borrow_mut().push(frame);
    }
}

/// Server-style timestamp for an epoch millisecond value.
pub fn iso(epoch_ms: i64) -> String {
    Utc.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string())
        .unwrap_or_default()
}
