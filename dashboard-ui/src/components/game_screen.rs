use dioxus::prelude::*;
use dioxus_logger::tracing::debug;
use gloo_timers::future::TimeoutFuture;

use crate::api::fetch_game_screen;
use crate::config::config;
use crate::dashboard::DashboardState;
use crate::instance::{Field, FieldValue, InstanceView};
use crate::selection::ACTIVE_INSTANCE;

/// Whether a polling loop started as `generation` should keep going.
fn keep_polling(view: &InstanceView, running: bool, generation: u64, current: u64) -> bool {
    running
        && generation == current
        && view.get(&Field::Active).is_some_and(FieldValue::is_set)
}

/// Streams the instance's game screen while started.
///
/// Every start bumps a generation counter; a polling loop exits as soon as
/// it sees a newer generation, so start/stop/start never runs two loops.
/// A loop also ends, and the image clears, once the instance is inactive.
#[component]
pub fn GameScreen() -> Element {
    let state = use_context::<DashboardState>();
    let mut running = use_signal(|| false);
    let mut generation = use_signal(|| 0_u64);
    let mut src = use_signal(String::new);
    let active = state.field(Field::Active).is_some_and(|v| v.is_set());

    let start = move |_| {
        if *running.peek() {
            return;
        }
        running.set(true);
        let current = *generation.peek() + 1;
        generation.set(current);

        spawn(async move {
            let poll_ms = config().game_screen_poll_ms;
            loop {
                let polling = keep_polling(
                    &state.view.peek(),
                    *running.peek(),
                    *generation.peek(),
                    current,
                );
                if !polling {
                    break;
                }
                if let Some(instance) = *ACTIVE_INSTANCE.peek() {
                    match fetch_game_screen(instance).await {
                        // A reply landing after stop is discarded.
                        Ok(screen) if *running.peek() && *generation.peek() == current => {
                            src.set(screen.src);
                        }
                        Ok(_) => {}
                        Err(e) => debug!("Game screen unavailable: {}", e),
                    }
                }
                TimeoutFuture::new(poll_ms).await;
            }
            // The instance went inactive under a live stream.
            if *running.peek() && *generation.peek() == current {
                running.set(false);
                src.set(String::new());
            }
        });
    };

    let stop = move |_| {
        if !*running.peek() {
            return;
        }
        running.set(false);
        let stopped_at = *generation.peek();
        spawn(async move {
            TimeoutFuture::new(config().game_screen_clear_ms).await;
            if !*running.peek() && *generation.peek() == stopped_at {
                src.set(String::new());
            }
        });
    };

    let (start_class, stop_class) = if running() {
        ("icon-button text-success", "icon-button text-dark")
    } else {
        ("icon-button text-dark", "icon-button text-success")
    };

    rsx! {
        section { class: "panel game-screen-panel",
            div { class: "panel-header",
                h2 { "Game Screen" }
                button {
                    class: start_class,
                    title: "Start streaming",
                    disabled: !active,
                    onclick: start,
                    i { class: "fa fa-play-circle" }
                }
                button {
                    class: stop_class,
                    title: "Stop streaming",
                    disabled: !active,
                    onclick: stop,
                    i { class: "fa fa-stop-circle" }
                }
            }
            div { class: "panel-body game-screen-body",
                if !src().is_empty() {
                    img { class: "game-screen-image", src: "{src}", alt: "Game screen" }
                }
            }
        }
    }
}
