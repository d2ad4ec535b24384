use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_logger::tracing::{error, info};
use gloo_timers::future::TimeoutFuture;
use shared_types::ReleaseNotes;

use crate::components::{
    AlertStack, AwayOverlay, GameScreen, InstancePanel, InstancesTable, KillInstanceButton,
    LogPanel, PrestigePanel, QueuePanel, ReleaseModal, ThemeSelect, DASHBOARD_STYLES,
};
use crate::config::config;
use crate::dashboard::effects;
use crate::dashboard::state::{accept_push, DashboardState, TimerFrames};
use crate::dashboard::ws::{ChannelEvent, PushChannel};
use crate::instance::{InstanceReconciler, TimerRegistry};
use crate::selection::{SelectionWatch, ACTIVE_INSTANCE};
use crate::timers::{BrowserTimerEnv, TimerOptions};

fn build_reconciler(frames: &TimerFrames) -> InstanceReconciler {
    let settings = config();
    let registry = TimerRegistry::new(
        Rc::new(BrowserTimerEnv),
        Box::new(frames.clone()),
        TimerOptions {
            period_ms: settings.stopwatch_period_ms,
            padding: settings.timer_padding,
        },
        TimerOptions {
            period_ms: settings.countdown_period_ms,
            padding: settings.timer_padding,
        },
    );
    InstanceReconciler::new(registry)
}

#[component]
pub fn DashboardShell() -> Element {
    let mut state = use_context_provider(|| DashboardState::new(effects::read_bootstrap()));
    let frames = use_context_provider(TimerFrames::new);
    let reconciler = use_hook(|| Rc::new(RefCell::new(build_reconciler(&frames))));
    let watch = use_hook(|| Rc::new(RefCell::new(SelectionWatch::default())));
    let mut loaded = use_signal(|| false);
    let release = use_signal(|| None::<ReleaseNotes>);

    let channels = use_hook(|| Rc::new(RefCell::new(Vec::<PushChannel>::new())));
    let mut channels_started = use_signal(|| false);
    let event_queue = use_hook(|| Rc::new(RefCell::new(VecDeque::<ChannelEvent>::new())));
    let mut event_pump_started = use_signal(|| false);
    let mut selection_started = use_signal(|| false);
    let alive = use_hook(|| Rc::new(Cell::new(true)));

    {
        let alive = alive.clone();
        let channels = channels.clone();
        let reconciler = reconciler.clone();
        use_drop(move || {
            alive.set(false);
            channels.borrow_mut().clear();
            reconciler.borrow_mut().reset();
        });
    }

    use_effect(move || {
        spawn(async move {
            effects::check_release(release).await;
        });
    });

    // Selection watch: a changed active instance is a context switch.
    {
        let alive = alive.clone();
        let watch = watch.clone();
        let reconciler = reconciler.clone();
        let frames = frames.clone();
        use_effect(move || {
            if selection_started() {
                return;
            }
            selection_started.set(true);

            let alive = alive.clone();
            let watch = watch.clone();
            let reconciler = reconciler.clone();
            let frames = frames.clone();
            spawn(async move {
                *ACTIVE_INSTANCE.write() = state.rows.peek().selected();
                let mut first = true;

                while alive.get() {
                    let current = *ACTIVE_INSTANCE.peek();
                    let switch = watch.borrow_mut().poll(current);

                    if let Some(switch) = switch {
                        info!(
                            "Active instance changed: {:?} -> {:?}",
                            switch.from, switch.to
                        );
                        effects::switch_scope(&reconciler, &mut state);
                        frames.blank_all();

                        match switch.to {
                            Some(id) if first => {
                                let reconciler = reconciler.clone();
                                spawn(async move {
                                    effects::initial_load(id, reconciler, state).await;
                                    loaded.set(true);
                                });
                            }
                            Some(id) => {
                                spawn(effects::load_instance(id, reconciler.clone(), state));
                                spawn(effects::load_prestiges(id, state));
                            }
                            None => loaded.set(true),
                        }
                        first = false;
                    }

                    TimeoutFuture::new(config().selection_poll_ms).await;
                }
            });
        });
    }

    {
        let event_queue = event_queue.clone();
        let alive = alive.clone();
        let watch = watch.clone();
        let reconciler = reconciler.clone();
        use_effect(move || {
            if event_pump_started() {
                return;
            }
            event_pump_started.set(true);

            let event_queue = event_queue.clone();
            let alive = alive.clone();
            let watch = watch.clone();
            let reconciler = reconciler.clone();
            spawn(async move {
                while alive.get() {
                    let drained: Vec<ChannelEvent> = event_queue.borrow_mut().drain(..).collect();

                    for event in drained {
                        match event {
                            ChannelEvent::Opened(topic) => state.channels.write().set(topic, true),
                            ChannelEvent::Closed(topic) => {
                                state.channels.write().set(topic, false)
                            }
                            ChannelEvent::Message(message) => {
                                let accepted = accept_push(&watch.borrow(), message);
                                if let Some(message) = accepted {
                                    effects::dispatch_push(message, &reconciler, state);
                                }
                            }
                        }
                    }

                    TimeoutFuture::new(16).await;
                }
            });
        });
    }

    {
        let event_queue = event_queue.clone();
        let channels = channels.clone();
        use_effect(move || {
            if channels_started() {
                return;
            }
            channels_started.set(true);

            let event_queue = event_queue.clone();
            for result in effects::bootstrap_channels(move |event| {
                event_queue.borrow_mut().push_back(event);
            }) {
                match result {
                    Ok(channel) => {
                        info!("{:?} channel created", channel.topic());
                        channels.borrow_mut().push(channel);
                    }
                    Err(e) => error!("Push channel unavailable: {}", e),
                }
            }
        });
    }

    rsx! {
        style { {DASHBOARD_STYLES} }
        AlertStack {}
        div { class: "dashboard",
            header { class: "dashboard-header",
                h1 { class: "dashboard-title", "TitanDash" }
                div { class: "dashboard-tools",
                    ThemeSelect {}
                    KillInstanceButton {}
                }
            }
            div { class: "dashboard-grid",
                div { class: "dashboard-column",
                    InstancesTable {}
                    InstancePanel { loaded }
                    GameScreen {}
                }
                div { class: "dashboard-column",
                    QueuePanel {}
                    PrestigePanel {}
                    LogPanel {}
                }
            }
        }
        ReleaseModal { notes: release }
        AwayOverlay {}
    }
}
