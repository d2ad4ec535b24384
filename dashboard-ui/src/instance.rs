//! Instance panel state: timer ownership, rendered fields and the
//! snapshot reconciler that keeps them in sync.

mod reconciler;
mod registry;
mod view;

use shared_types::{CountdownKey, InstanceSignal, InstanceState};

pub use reconciler::InstanceReconciler;
pub use registry::{
    RegistryStats, TimerAction, TimerHandle, TimerKind, TimerRegistry, TimerSlot, TimerTargets,
};
pub use view::{
    render_view, selected_choice, Field, FieldValue, InstanceView, RowKey, StageTone, ViewSink,
};

/// Placeholder for instance fields.
pub const NA: &str = "N/A";
/// Placeholder for variables and countdowns.
pub const EMPTY: &str = "------";

/// Timer-backed slots on the instance panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerKey {
    Started,
    LastPrestige,
    Countdown(CountdownKey),
}

impl TimerKey {
    pub fn all() -> impl Iterator<Item = TimerKey> {
        [TimerKey::Started, TimerKey::LastPrestige]
            .into_iter()
            .chain(CountdownKey::ALL.into_iter().map(TimerKey::Countdown))
    }
}

impl TimerSlot for TimerKey {
    fn kind(&self) -> TimerKind {
        match self {
            TimerKey::Started | TimerKey::LastPrestige => TimerKind::Stopwatch,
            TimerKey::Countdown(_) => TimerKind::Countdown,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            TimerKey::Started | TimerKey::LastPrestige => NA,
            TimerKey::Countdown(_) => EMPTY,
        }
    }
}

/// Which instance controls are clickable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet {
    pub play: bool,
    pub pause: bool,
    pub stop: bool,
}

impl ActionSet {
    /// RUNNING can pause or stop; PAUSED and STOPPED can only play.
    pub fn for_state(state: InstanceState) -> Self {
        match state {
            InstanceState::Running => Self {
                play: false,
                pause: true,
                stop: true,
            },
            InstanceState::Paused | InstanceState::Stopped => Self {
                play: true,
                pause: false,
                stop: false,
            },
        }
    }

    pub fn allows(&self, signal: InstanceSignal) -> bool {
        match signal {
            InstanceSignal::Play => self.play,
            InstanceSignal::Pause => self.pause,
            InstanceSignal::Stop => self.stop,
        }
    }

    pub fn enabled(&self) -> Vec<InstanceSignal> {
        InstanceSignal::ALL
            .into_iter()
            .filter(|signal| self.allows(*signal))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_stopped_running_action_sets() {
        use InstanceSignal::*;

        let running = ActionSet::for_state(InstanceState::Running);
        let stopped = ActionSet::for_state(InstanceState::Stopped);

        assert_eq!(running.enabled(), vec![Pause, Stop]);
        assert!(!stopped.pause && !stopped.stop);
        assert_eq!(stopped.enabled(), vec![Play]);
        assert_eq!(ActionSet::for_state(InstanceState::Running), running);
    }

    #[test]
    fn paused_can_only_resume() {
        let paused = ActionSet::for_state(InstanceState::Paused);
        assert_eq!(paused.enabled(), vec![InstanceSignal::Play]);
    }

    #[test]
    fn every_slot_is_listed_once() {
        let keys: Vec<TimerKey> = TimerKey::all().collect();
        assert_eq!(keys.len(), 2 + CountdownKey::ALL.len());
        assert_eq!(TimerKey::Started.placeholder(), NA);
        assert_eq!(
            TimerKey::Countdown(CountdownKey::NextWarCry).placeholder(),
            EMPTY
        );
    }
}
