use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_logger::tracing::{info, warn};
use gloo_timers::future::TimeoutFuture;
use shared_types::{
    DashboardBootstrap, InstanceId, InstanceSnapshot, PushMessage, PushTopic, ReleaseNotes,
    ReleaseResponse,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::alerts::{notify, notify_error, AlertLevel};
use crate::api::{fetch_instance, fetch_prestige_averages, fetch_prestiges, fetch_release};
use crate::config::config;
use crate::dashboard::state::{DashboardState, InstanceScope};
use crate::dashboard::ws::{connect_channel, ChannelEvent, PushChannel};
use crate::dom::element;
use crate::error::Result;
use crate::feeds::AverageQuery;
use crate::instance::InstanceReconciler;
use crate::selection::ACTIVE_INSTANCE;

pub const BOOTSTRAP_ELEMENT: &str = "dashboardBootstrap";

/// Read the instance table and selector options embedded in the host page.
pub fn read_bootstrap() -> DashboardBootstrap {
    let raw = element(BOOTSTRAP_ELEMENT)
        .and_then(|node| node.get_attribute("data-json"))
        .unwrap_or_default();
    if raw.trim().is_empty() {
        warn!("No #{} element; starting with an empty dashboard", BOOTSTRAP_ELEMENT);
    }
    DashboardBootstrap::from_json(&raw)
}

/// Reconcile the instance panel. An inactive instance also empties its
/// prestige summary and queue.
pub fn apply_snapshot(
    snapshot: &InstanceSnapshot,
    reconciler: &RefCell<InstanceReconciler>,
    scope: &mut impl InstanceScope,
) {
    if !snapshot.is_active() {
        scope.clear_idle_feeds();
    }
    reconciler.borrow_mut().apply(snapshot, scope);
}

/// Tear down timers and per-instance data before the next instance loads.
pub fn switch_scope(reconciler: &RefCell<InstanceReconciler>, scope: &mut impl InstanceScope) {
    reconciler.borrow_mut().reset();
    scope.clear();
}

/// Route an accepted push to the feed that owns it.
pub fn dispatch_push(
    message: PushMessage,
    reconciler: &RefCell<InstanceReconciler>,
    mut state: DashboardState,
) {
    match message {
        PushMessage::Instance { snapshot, .. } => {
            apply_snapshot(&snapshot, reconciler, &mut state);
        }
        PushMessage::Log { record, .. } => state.log.write().push(record.message),
        PushMessage::Prestige {
            instance_id,
            prestige,
        } => {
            let query = state.prestiges.write().push(*prestige);
            spawn(refresh_prestige_averages(instance_id, query, state));
        }
        PushMessage::Queued { kind, queued, .. } => state.queue.write().apply(kind, queued),
    }
}

pub async fn load_instance(
    instance: InstanceId,
    reconciler: Rc<RefCell<InstanceReconciler>>,
    mut state: DashboardState,
) {
    match fetch_instance(instance).await {
        Ok(snapshot) => {
            // The selection may have moved while the request was in flight.
            if *ACTIVE_INSTANCE.peek() != Some(instance) {
                return;
            }
            apply_snapshot(&snapshot, &reconciler, &mut state);
        }
        Err(e) => notify_error("Failed to load instance", &e),
    }
}

pub async fn load_prestiges(instance: InstanceId, mut state: DashboardState) {
    match fetch_prestiges(instance).await {
        Ok(response) => {
            if *ACTIVE_INSTANCE.peek() == Some(instance) {
                state.prestiges.write().load(response);
            }
        }
        Err(e) => notify_error("Failed to load prestiges", &e),
    }
}

pub async fn refresh_prestige_averages(
    instance: InstanceId,
    query: AverageQuery,
    mut state: DashboardState,
) {
    match fetch_prestige_averages(query).await {
        Ok(averages) => {
            if *ACTIVE_INSTANCE.peek() == Some(instance) {
                state.prestiges.write().apply_averages(averages);
            }
        }
        Err(e) => notify_error("Failed to refresh prestige averages", &e),
    }
}

/// First load after activation: the instance panel, then the prestige table.
pub async fn initial_load(
    instance: InstanceId,
    reconciler: Rc<RefCell<InstanceReconciler>>,
    state: DashboardState,
) {
    let settings = config();
    TimeoutFuture::new(settings.initial_instance_delay_ms).await;
    load_instance(instance, reconciler, state).await;

    let remaining = settings
        .initial_prestige_delay_ms
        .saturating_sub(settings.initial_instance_delay_ms);
    TimeoutFuture::new(remaining).await;
    load_prestiges(instance, state).await;
}

pub fn bootstrap_channels<F>(on_event: F) -> Vec<Result<PushChannel>>
where
    F: FnMut(ChannelEvent) + Clone + 'static,
{
    [
        PushTopic::Instance,
        PushTopic::Log,
        PushTopic::Prestige,
        PushTopic::Queued,
    ]
    .into_iter()
    .map(|topic| connect_channel(topic, on_event.clone()))
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Show(ReleaseNotes),
    Alert(String),
    Nothing,
}

const RELEASE_ERROR: &str = "Unable to retrieve release information.";

/// Notes are shown only for a release the user has not seen yet.
pub fn release_outcome(response: ReleaseResponse) -> ReleaseOutcome {
    if response.status == "error" {
        return ReleaseOutcome::Alert(response.error.unwrap_or_else(|| RELEASE_ERROR.to_string()));
    }
    if response.status != "success" || response.state.as_deref() != Some("not_shown") {
        return ReleaseOutcome::Nothing;
    }
    match response.release {
        Some(notes) if notes.status == "success" => ReleaseOutcome::Show(notes),
        Some(notes) => {
            ReleaseOutcome::Alert(notes.error.unwrap_or_else(|| RELEASE_ERROR.to_string()))
        }
        None => ReleaseOutcome::Nothing,
    }
}

pub async fn check_release(mut release: Signal<Option<ReleaseNotes>>) {
    match fetch_release().await {
        Ok(response) => match release_outcome(response) {
            ReleaseOutcome::Show(notes) => {
                info!("Showing release notes: {}", notes.title);
                release.set(Some(notes));
            }
            ReleaseOutcome::Alert(message) => notify(AlertLevel::Danger, message),
            ReleaseOutcome::Nothing => {}
        },
        Err(e) => notify_error("Failed to check release notes", &e),
    }
}

/// Record the time of every click on the page.
pub fn track_activity(mut last_click: Signal<f64>) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        last_click.set(js_sys::Date::now());
    }) as Box<dyn FnMut(web_sys::Event)>);

    let _ = document.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());

    // Keep listener alive for the page lifetime.
    callback.forget();
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared_types::{PrestigeRecord, QueueEventKind, QueuedFunction};

    use super::*;
    use crate::feeds::{LogFeed, PrestigeFeed, QueueFeed};
    use crate::instance::{
        Field, FieldValue, InstanceView, TimerKey, TimerRegistry, TimerTargets, ViewSink, NA,
    };
    use crate::timers::testing::{iso, FrameLog, ManualTimerEnv};
    use crate::timers::{TimerOptions, TimerTarget};

    const NOW: i64 = 1_600_000_000_000;
    const OPTIONS: TimerOptions = TimerOptions {
        period_ms: 1_000,
        padding: Some('0'),
    };

    #[derive(Default)]
    struct MemoryScope {
        view: InstanceView,
        log: LogFeed,
        prestiges: PrestigeFeed,
        queue: QueueFeed,
    }

    impl ViewSink for MemoryScope {
        fn write_field(&mut self, field: Field, value: FieldValue) {
            self.view.insert(field, value);
        }
    }

    impl InstanceScope for MemoryScope {
        fn clear(&mut self) {
            self.view.clear();
            self.log.clear();
            self.clear_idle_feeds();
        }

        fn clear_idle_feeds(&mut self) {
            self.prestiges.reset();
            self.queue.clear();
        }
    }

    struct Frames(FrameLog);

    impl TimerTargets<TimerKey> for Frames {
        fn target_for(&self, _key: TimerKey) -> Box<dyn TimerTarget> {
            self.0.target()
        }
    }

    fn reconciler(env: &ManualTimerEnv) -> RefCell<InstanceReconciler> {
        let registry = TimerRegistry::new(
            env.handle(),
            Box::new(Frames(FrameLog::default())),
            OPTIONS,
            OPTIONS,
        );
        RefCell::new(InstanceReconciler::new(registry))
    }

    fn snapshot(state: &str) -> InstanceSnapshot {
        serde_json::from_value(json!({
            "id": 3,
            "name": "Main",
            "state": state,
            "started": {"datetime": iso(NOW - 5_000), "formatted": "09/13/2020 12:00:00 PM"},
            "current_function": {"function": "prestige", "title": "Prestige"},
            "current_stage": {"stage": 100, "diff_from_max": 3, "percent_from_max": "97%"},
            "next_prestige": {"datetime": iso(NOW + 60_000), "formatted": "soon"}
        }))
        .unwrap()
    }

    fn populated_scope() -> MemoryScope {
        let mut scope = MemoryScope::default();
        scope.log.push("Levelling heroes");
        scope.queue.apply(
            QueueEventKind::Saved,
            QueuedFunction {
                id: 1,
                function: "level_heroes".to_string(),
                title: "Level Heroes".to_string(),
                created: "01/01/2020 10:00:00 AM".to_string(),
            },
        );
        let prestige: PrestigeRecord = serde_json::from_value(json!({
            "timestamp": {"datetime": "2020-01-01 10:00:00+00:00", "formatted": "x"},
            "duration": {"formatted": "00:10:00", "seconds": 600},
            "artifact": null,
            "stage": 420
        }))
        .unwrap();
        scope.prestiges.push(prestige);
        scope
    }

    #[test]
    fn switching_instance_clears_scope_and_timers() {
        let env = ManualTimerEnv::new(NOW as f64);
        let reconciler = reconciler(&env);
        let mut scope = populated_scope();

        apply_snapshot(&snapshot("RUNNING"), &reconciler, &mut scope);
        assert_eq!(reconciler.borrow().timers().live(), 2);
        assert_eq!(scope.view[&Field::Name], FieldValue::Text("Main".into()));
        assert_eq!(scope.queue.rows().len(), 1);

        switch_scope(&reconciler, &mut scope);
        assert!(scope.view.is_empty());
        assert!(scope.log.is_empty());
        assert!(scope.queue.is_empty());
        assert_eq!(scope.prestiges, PrestigeFeed::default());
        assert_eq!(reconciler.borrow().timers().live(), 0);

        env.advance(5_000);
        assert_eq!(env.active_ticks(), 0);
    }

    #[test]
    fn next_instance_repaints_after_switch() {
        let env = ManualTimerEnv::new(NOW as f64);
        let reconciler = reconciler(&env);
        let mut scope = MemoryScope::default();

        apply_snapshot(&snapshot("RUNNING"), &reconciler, &mut scope);
        switch_scope(&reconciler, &mut scope);
        apply_snapshot(&snapshot("PAUSED"), &reconciler, &mut scope);

        assert_eq!(scope.view[&Field::Name], FieldValue::Text("Main".into()));
        assert_eq!(reconciler.borrow().timers().live(), 2);
    }

    #[test]
    fn stopped_snapshot_empties_queue_and_prestiges() {
        let env = ManualTimerEnv::new(NOW as f64);
        let reconciler = reconciler(&env);
        let mut scope = populated_scope();

        apply_snapshot(&snapshot("STOPPED"), &reconciler, &mut scope);
        assert!(scope.queue.is_empty());
        assert!(scope.prestiges.rows().is_empty());
        assert_eq!(scope.log.records(), &["Levelling heroes".to_string()]);
        assert_eq!(scope.view[&Field::Name], FieldValue::Text(NA.into()));
        assert_eq!(reconciler.borrow().timers().live(), 0);
    }

    #[test]
    fn running_snapshot_keeps_feeds() {
        let env = ManualTimerEnv::new(NOW as f64);
        let reconciler = reconciler(&env);
        let mut scope = populated_scope();

        apply_snapshot(&snapshot("RUNNING"), &reconciler, &mut scope);
        assert_eq!(scope.queue.rows().len(), 1);
        assert_eq!(scope.prestiges.rows().len(), 1);
    }

    fn response(value: serde_json::Value) -> ReleaseResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn unseen_release_is_shown() {
        let outcome = release_outcome(response(json!({
            "status": "success",
            "state": "not_shown",
            "release": {"status": "success", "title": "v1.2.0", "body": "<p>Fixes</p>"}
        })));
        match outcome {
            ReleaseOutcome::Show(notes) => assert_eq!(notes.title, "v1.2.0"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn seen_release_does_nothing() {
        let outcome = release_outcome(response(json!({
            "status": "success",
            "state": "shown",
            "release": {"status": "error", "error": "rate limited"}
        })));
        assert_eq!(outcome, ReleaseOutcome::Nothing);
    }

    #[test]
    fn errors_become_alerts() {
        assert_eq!(
            release_outcome(response(json!({"status": "error", "error": "offline"}))),
            ReleaseOutcome::Alert("offline".to_string())
        );
        assert_eq!(
            release_outcome(response(json!({
                "status": "success",
                "state": "not_shown",
                "release": {"status": "error", "error": "rate limited"}
            }))),
            ReleaseOutcome::Alert("rate limited".to_string())
        );
    }
}
