//! Stopwatch and countdown display primitives.
//!
//! A timer owns one repeating tick and one render target. The tick closure
//! only holds a weak reference to the timer, and every tick re-checks the
//! phase before writing, so a destroyed or finished timer never renders
//! again even if its interval fires once more. Tick guards are always
//! released through [`TimerEnv::defer`], never from inside the tick that
//! triggered the release.

mod format;
#[cfg(test)]
pub(crate) mod testing;

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Interval;
use shared_types::parse_server_timestamp;

pub use format::{format_elapsed, format_remaining};

pub const READY_TEXT: &str = "READY...";

/// Clock and scheduler a timer runs against.
pub trait TimerEnv {
    fn now_ms(&self) -> f64;

    /// Call `tick` every `period_ms` until the returned guard is dropped.
    fn repeat(&self, period_ms: u32, tick: Box<dyn FnMut()>) -> TickGuard;

    /// Run `task` after the current callback has returned.
    fn defer(&self, task: Box<dyn FnOnce()>);
}

/// Keeps a repeating tick alive. Dropping it cancels the tick.
pub struct TickGuard {
    _handle: Box<dyn Any>,
}

impl TickGuard {
    pub fn new<T: 'static>(handle: T) -> Self {
        Self {
            _handle: Box::new(handle),
        }
    }
}

/// `Date.now()` plus gloo intervals.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTimerEnv;

impl TimerEnv for BrowserTimerEnv {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn repeat(&self, period_ms: u32, mut tick: Box<dyn FnMut()>) -> TickGuard {
        TickGuard::new(Interval::new(period_ms, move || tick()))
    }

    fn defer(&self, task: Box<dyn FnOnce()>) {
        wasm_bindgen_futures::spawn_local(async move { task() });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerFrame {
    Blank,
    Text(String),
    Ready,
}

impl TimerFrame {
    fn labelled(label: Option<&str>, value: String) -> Self {
        match label {
            Some(label) => TimerFrame::Text(format!("{label} ({value})")),
            None => TimerFrame::Text(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TimerFrame::Blank => "",
            TimerFrame::Text(text) => text,
            TimerFrame::Ready => READY_TEXT,
        }
    }
}

/// Where a timer writes its frames.
pub trait TimerTarget {
    fn render(&mut self, frame: TimerFrame);
}

#[derive(Debug, Clone, Copy)]
pub struct TimerOptions {
    pub period_ms: u32,
    pub padding: Option<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Ready,
    Stopped,
}

struct TimerCore {
    env: Rc<dyn TimerEnv>,
    date_orig: String,
    phase: Cell<Phase>,
    guard: RefCell<Option<TickGuard>>,
    target: RefCell<Box<dyn TimerTarget>>,
}

impl TimerCore {
    fn new(env: Rc<dyn TimerEnv>, date_orig: &str, target: Box<dyn TimerTarget>) -> Rc<Self> {
        Rc::new(Self {
            env,
            date_orig: date_orig.to_string(),
            phase: Cell::new(Phase::Running),
            guard: RefCell::new(None),
            target: RefCell::new(target),
        })
    }

    fn render(&self, frame: TimerFrame) {
        if let Ok(mut target) = self.target.try_borrow_mut() {
            target.render(frame);
        }
    }

    fn is_running(&self) -> bool {
        self.phase.get() == Phase::Running
    }

    fn stop(&self, next: Phase) {
        self.phase.set(next);
        let guard = self.guard.borrow_mut().take();
        if let Some(guard) = guard {
            self.env.defer(Box::new(move || drop(guard)));
        }
    }

    fn schedule<F>(self: &Rc<Self>, period_ms: u32, mut on_tick: F)
    where
        F: FnMut(&TimerCore) + 'static,
    {
        let weak = Rc::downgrade(self);
        let guard = self.env.repeat(
            period_ms,
            Box::new(move || {
                let Some(core) = weak.upgrade() else {
                    return;
                };
                if core.is_running() {
                    on_tick(core.as_ref());
                }
            }),
        );
        *self.guard.borrow_mut() = Some(guard);
    }
}

fn parse_origin_ms(raw: &str) -> Option<f64> {
    parse_server_timestamp(raw).map(|dt| dt.timestamp_millis() as f64)
}

/// Elapsed time since an origin timestamp.
pub struct Stopwatch {
    core: Rc<TimerCore>,
}

impl Stopwatch {
    pub fn start(
        env: Rc<dyn TimerEnv>,
        origin: &str,
        label: Option<&str>,
        target: Box<dyn TimerTarget>,
        options: TimerOptions,
    ) -> Self {
        let core = TimerCore::new(env, origin, target);
        let Some(origin_ms) = parse_origin_ms(origin) else {
            core.phase.set(Phase::Stopped);
            core.render(TimerFrame::Blank);
            return Self { core };
        };

        let label = label.map(str::to_string);
        let frame = move |core: &TimerCore| {
            let elapsed = (core.env.now_ms() - origin_ms) as i64;
            TimerFrame::labelled(
                label.as_deref(),
                format_elapsed(elapsed, options.padding),
            )
        };

        core.render(frame(core.as_ref()));
        core.schedule(options.period_ms, move |core| core.render(frame(core)));
        Self { core }
    }

    pub fn date_orig(&self) -> &str {
        &self.core.date_orig
    }

    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    /// Stop ticking. Safe to call any number of times.
    pub fn destroy(&self) {
        self.core.stop(Phase::Stopped);
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Remaining time until a target timestamp, finishing once on `READY...`.
pub struct Countdown {
    core: Rc<TimerCore>,
}

impl Countdown {
    pub fn start(
        env: Rc<dyn TimerEnv>,
        target_time: &str,
        label: Option<&str>,
        target: Box<dyn TimerTarget>,
        options: TimerOptions,
    ) -> Self {
        let core = TimerCore::new(env, target_time, target);
        let Some(target_ms) = parse_origin_ms(target_time) else {
            core.phase.set(Phase::Stopped);
            core.render(TimerFrame::Blank);
            return Self { core };
        };

        let label = label.map(str::to_string);
        let tick = move |core: &TimerCore| {
            let remaining = (target_ms - core.env.now_ms()) as i64;
            if remaining <= 0 {
                core.render(TimerFrame::Ready);
                core.stop(Phase::Ready);
            } else {
                core.render(TimerFrame::labelled(
                    label.as_deref(),
                    format_remaining(remaining, options.padding),
                ));
            }
        };

        tick(core.as_ref());
        if core.is_running() {
            core.schedule(options.period_ms, tick);
        }
        Self { core }
    }

    pub fn date_orig(&self) -> &str {
        &self.core.date_orig
    }

    pub fn is_running(&self) -> bool {
        self.core.is_running()
    }

    pub fn is_ready(&self) -> bool {
        self.core.phase.get() == Phase::Ready
    }

    /// Stop ticking. Safe to call any number of times, including after `READY...`.
    pub fn destroy(&self) {
        if self.core.phase.get() == Phase::Running {
            self.core.stop(Phase::Stopped);
        }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.destroy();
    }
}
