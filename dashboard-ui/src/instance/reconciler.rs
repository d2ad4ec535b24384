use dioxus_logger::tracing::debug;
use shared_types::{CountdownKey, InstanceSnapshot};

use super::registry::TimerRegistry;
use super::view::{render_view, InstanceView, ViewSink};
use super::TimerKey;

/// Applies instance snapshots to the panel, writing only what changed.
pub struct InstanceReconciler {
    rendered: InstanceView,
    timers: TimerRegistry<TimerKey>,
}

impl InstanceReconciler {
    pub fn new(timers: TimerRegistry<TimerKey>) -> Self {
        Self {
            rendered: InstanceView::new(),
            timers,
        }
    }

    /// Diff `snapshot` against the last rendered view and push changed fields
    /// to `sink`. Returns the number of field writes.
    pub fn apply(&mut self, snapshot: &InstanceSnapshot, sink: &mut impl ViewSink) -> usize {
        let next = render_view(snapshot);
        let mut writes = 0;

        for (field, value) in &next {
            if self.rendered.get(field) != Some(value) {
                sink.write_field(*field, value.clone());
                writes += 1;
            }
        }
        self.rendered = next;

        self.reconcile_timers(snapshot);
        debug!(
            "Applied snapshot for instance {} ({} writes, {} live timers)",
            snapshot.id,
            writes,
            self.timers.live()
        );
        writes
    }

    /// Tear down all timers and forget the rendered view, so the next
    /// snapshot repaints every field.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.rendered.clear();
    }

    pub fn timers(&self) -> &TimerRegistry<TimerKey> {
        &self.timers
    }

    fn reconcile_timers(&mut self, snapshot: &InstanceSnapshot) {
        let active = snapshot.is_active();

        let started = snapshot.started.datetime.as_deref().filter(|_| active);
        self.timers.reconcile_labelled(
            TimerKey::Started,
            started,
            snapshot.started.formatted.as_deref(),
        );

        let last_prestige = snapshot.last_prestige.as_ref().filter(|_| active);
        self.timers.reconcile_labelled(
            TimerKey::LastPrestige,
            last_prestige.and_then(|p| p.timestamp.datetime.as_deref()),
            last_prestige
                .map(|p| p.timestamp.formatted.as_str())
                .filter(|label| !label.is_empty()),
        );

        for key in CountdownKey::ALL {
            let timestamp = snapshot.countdown(key).filter(|_| active);
            self.timers.reconcile(TimerKey::Countdown(key), timestamp);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::instance::registry::tests::{RecordingTargets, OPTIONS};
    use crate::instance::view::{Field, FieldValue};
    use crate::instance::ActionSet;
    use crate::timers::testing::{iso, ManualTimerEnv};
    use crate::timers::TimerFrame;

    const NOW: i64 = 1_600_000_000_000;

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<(Field, FieldValue)>,
    }

    impl ViewSink for RecordingSink {
        fn write_field(&mut self, field: Field, value: FieldValue) {
            self.writes.push((field, value));
        }
    }

    fn reconciler(env: &ManualTimerEnv) -> (InstanceReconciler, RecordingTargets<TimerKey>) {
        let targets = RecordingTargets::default();
        let registry =
            TimerRegistry::new(env.handle(), Box::new(targets.clone()), OPTIONS, OPTIONS);
        (InstanceReconciler::new(registry), targets)
    }

    fn snapshot(state: &str, started: Option<String>, next_prestige: Option<String>) -> InstanceSnapshot {
        let mut value = json!({
            "id": 9,
            "name": "Main",
            "state": state,
            "started": {"datetime": started, "formatted": "09/13/2020 12:00:00 PM"},
            "current_function": {"function": "prestige", "title": "Prestige"},
            "current_stage": {"stage": 100, "diff_from_max": 3, "percent_from_max": "97%"},
            "session": {"uuid": "abc", "url": "/session/abc"}
        });
        if let (Some(ts), Value::Object(map)) = (next_prestige, &mut value) {
            map.insert(
                "next_prestige".to_string(),
                json!({"datetime": ts, "formatted": "soon"}),
            );
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn duplicate_snapshots_write_nothing() {
        let env = ManualTimerEnv::new(NOW as f64);
        let (mut reconciler, targets) = reconciler(&env);
        let mut sink = RecordingSink::default();
        let snap = snapshot("RUNNING", Some(iso(NOW - 5_000)), Some(iso(NOW + 60_000)));

        assert!(reconciler.apply(&snap, &mut sink) > 0);
        let timer_frames = targets.frames.borrow().len();

        sink.writes.clear();
        assert_eq!(reconciler.apply(&snap, &mut sink), 0);
        assert_eq!(reconciler.apply(&snap.clone(), &mut sink), 0);
        assert!(sink.writes.is_empty());
        assert_eq!(targets.frames.borrow().len(), timer_frames);
        assert_eq!(reconciler.timers().stats().created, 2);
    }

    #[test]
    fn only_changed_fields_are_written() {
        let env = ManualTimerEnv::new(NOW as f64);
        let (mut reconciler, _) = reconciler(&env);
        let mut sink = RecordingSink::default();
        let mut snap = snapshot("RUNNING", None, None);
        reconciler.apply(&snap, &mut sink);

        sink.writes.clear();
        snap.name = "Renamed".to_string();
        assert_eq!(reconciler.apply(&snap, &mut sink), 1);
        assert_eq!(sink.writes[0], (Field::Name, FieldValue::Text("Renamed".into())));
    }

    #[test]
    fn timestamp_toggle_pairs_creates_with_destroys() {
        let env = ManualTimerEnv::new(NOW as f64);
        let (mut reconciler, _) = reconciler(&env);
        let mut sink = RecordingSink::default();
        let t1 = iso(NOW - 1_000);
        let c1 = iso(NOW + 90_000);

        let sequence = [
            snapshot("RUNNING", None, None),
            snapshot("RUNNING", Some(t1.clone()), Some(c1.clone())),
            snapshot("RUNNING", Some(t1.clone()), Some(c1.clone())),
            snapshot("RUNNING", None, None),
        ];

        let mut max_live = 0;
        for snap in &sequence {
            reconciler.apply(snap, &mut sink);
            max_live = max_live.max(reconciler.timers().live());
        }

        let stats = reconciler.timers().stats();
        assert_eq!(stats.created, 2);
        assert_eq!(stats.destroyed, 2);
        assert_eq!(max_live, 2);
        assert!(!reconciler.timers().contains(TimerKey::Started));

        env.advance(5_000);
        assert_eq!(env.active_ticks(), 0);
    }

    #[test]
    fn stopping_resets_fields_and_timers() {
        let env = ManualTimerEnv::new(NOW as f64);
        let (mut reconciler, targets) = reconciler(&env);
        let mut sink = RecordingSink::default();
        let t1 = iso(NOW - 1_000);
        let c1 = iso(NOW + 90_000);

        let states = ["RUNNING", "STOPPED", "RUNNING"];
        let mut actions = Vec::new();
        for state in states {
            sink.writes.clear();
            reconciler.apply(
                &snapshot(state, Some(t1.clone()), Some(c1.clone())),
                &mut sink,
            );
            actions.extend(sink.writes.iter().filter_map(|(field, value)| match value {
                FieldValue::Actions(set) if *field == Field::Actions => Some(*set),
                _ => None,
            }));
            if state == "STOPPED" {
                assert_eq!(reconciler.timers().live(), 0);
                let frames = targets.frames.borrow();
                assert!(frames.contains(&(TimerKey::Started, TimerFrame::Text("N/A".into()))));
            }
        }

        assert_eq!(
            actions,
            vec![
                ActionSet {
                    play: false,
                    pause: true,
                    stop: true
                },
                ActionSet {
                    play: true,
                    pause: false,
                    stop: false
                },
                ActionSet {
                    play: false,
                    pause: true,
                    stop: true
                },
            ]
        );
    }

    #[test]
    fn reset_repaints_everything_on_next_apply() {
        let env = ManualTimerEnv::new(NOW as f64);
        let (mut reconciler, _) = reconciler(&env);
        let mut sink = RecordingSink::default();
        let snap = snapshot("RUNNING", Some(iso(NOW - 1_000)), None);

        let first = reconciler.apply(&snap, &mut sink);
        reconciler.reset();
        assert_eq!(reconciler.timers().live(), 0);
        assert_eq!(reconciler.apply(&snap, &mut sink), first);
        assert_eq!(reconciler.timers().live(), 1);
    }
}
