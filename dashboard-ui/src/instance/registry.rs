use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use dioxus_logger::tracing::debug;

use crate::timers::{Countdown, Stopwatch, TimerEnv, TimerFrame, TimerOptions, TimerTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Stopwatch,
    Countdown,
}

/// A display slot that may own one timer.
pub trait TimerSlot: Copy + Eq + Hash + Debug + 'static {
    fn kind(&self) -> TimerKind;

    /// Text shown while the slot has no timestamp.
    fn placeholder(&self) -> &'static str;
}

/// Hands out the render target bound to a slot.
pub trait TimerTargets<K> {
    fn target_for(&self, key: K) -> Box<dyn TimerTarget>;
}

pub enum TimerHandle {
    Stopwatch(Stopwatch),
    Countdown(Countdown),
}

impl TimerHandle {
    pub fn date_orig(&self) -> &str {
        match self {
            TimerHandle::Stopwatch(timer) => timer.date_orig(),
            TimerHandle::Countdown(timer) => timer.date_orig(),
        }
    }

    pub fn destroy(&self) {
        match self {
            TimerHandle::Stopwatch(timer) => timer.destroy(),
            TimerHandle::Countdown(timer) => timer.destroy(),
        }
    }
}

/// Outcome of one [`TimerRegistry::reconcile`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Created,
    Kept,
    Replaced,
    Destroyed,
    Placeholder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub created: usize,
    pub destroyed: usize,
}

/// Owns at most one live timer per slot.
pub struct TimerRegistry<K: TimerSlot> {
    env: Rc<dyn TimerEnv>,
    targets: Box<dyn TimerTargets<K>>,
    stopwatch: TimerOptions,
    countdown: TimerOptions,
    handles: HashMap<K, TimerHandle>,
    placeholders: HashSet<K>,
    stats: RegistryStats,
}

impl<K: TimerSlot> TimerRegistry<K> {
    pub fn new(
        env: Rc<dyn TimerEnv>,
        targets: Box<dyn TimerTargets<K>>,
        stopwatch: TimerOptions,
        countdown: TimerOptions,
    ) -> Self {
        Self {
            env,
            targets,
            stopwatch,
            countdown,
            handles: HashMap::new(),
            placeholders: HashSet::new(),
            stats: RegistryStats::default(),
        }
    }

    pub fn reconcile(&mut self, key: K, timestamp: Option<&str>) -> TimerAction {
        self.reconcile_labelled(key, timestamp, None)
    }

    /// Bring `key` in line with `timestamp`. An existing timer is kept only
    /// while its origin matches; otherwise it is destroyed before any
    /// replacement starts writing to the same target.
    pub fn reconcile_labelled(
        &mut self,
        key: K,
        timestamp: Option<&str>,
        label: Option<&str>,
    ) -> TimerAction {
        let timestamp = timestamp.map(str::trim).filter(|ts| !ts.is_empty());
        let same_origin = self
            .handles
            .get(&key)
            .map(|handle| Some(handle.date_orig()) == timestamp);

        match (timestamp, same_origin) {
            (Some(_), Some(true)) => TimerAction::Kept,
            (Some(ts), Some(false)) => {
                self.destroy(key);
                self.create(key, ts, label);
                TimerAction::Replaced
            }
            (Some(ts), None) => {
                self.create(key, ts, label);
                TimerAction::Created
            }
            (None, Some(_)) => {
                self.destroy(key);
                self.show_placeholder(key);
                TimerAction::Destroyed
            }
            (None, None) => {
                if !self.placeholders.contains(&key) {
                    self.show_placeholder(key);
                }
                TimerAction::Placeholder
            }
        }
    }

    /// Destroy every timer and forget which placeholders are on screen.
    pub fn clear(&mut self) {
        let keys: Vec<K> = self.handles.keys().copied().collect();
        for key in keys {
            self.destroy(key);
        }
        self.placeholders.clear();
    }

    pub fn live(&self) -> usize {
        self.handles.len()
    }

    pub fn contains(&self, key: K) -> bool {
        self.handles.contains_key(&key)
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats
    }

    fn create(&mut self, key: K, timestamp: &str, label: Option<&str>) {
        let target = self.targets.target_for(key);
        let handle = match key.kind() {
            TimerKind::Stopwatch => TimerHandle::Stopwatch(Stopwatch::start(
                self.env.clone(),
                timestamp,
                label,
                target,
                self.stopwatch,
            )),
            TimerKind::Countdown => TimerHandle::Countdown(Countdown::start(
                self.env.clone(),
                timestamp,
                label,
                target,
                self.countdown,
            )),
        };
        debug!("Timer created for {:?} at {}", key, timestamp);
        self.placeholders.remove(&key);
        self.handles.insert(key, handle);
        self.stats.created += 1;
    }

    fn destroy(&mut self, key: K) {
        if let Some(handle) = self.handles.remove(&key) {
            handle.destroy();
            debug!("Timer destroyed for {:?}", key);
            self.stats.destroyed += 1;
        }
    }

    fn show_placeholder(&mut self, key: K) {
        let mut target = self.targets.target_for(key);
        target.render(TimerFrame::Text(key.placeholder().to_string()));
        self.placeholders.insert(key);
    }
}

impl<K: TimerSlot> Drop for TimerRegistry<K> {
    fn drop(&mut self) {
        self.clear();
    }
}
