use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use dioxus_logger::tracing::info;
use futures_util::StreamExt;
use gloo_timers::future::IntervalStream;

use crate::config::config;
use crate::dashboard::{track_activity, FrameTarget};
use crate::timers::{BrowserTimerEnv, Stopwatch, TimerFrame, TimerOptions};

const AWAY_CHECK_MS: u32 = 1000;

fn away_secs(now_ms: f64, last_click_ms: f64) -> f64 {
    ((now_ms - last_click_ms) / 1000.0).abs()
}

/// Stopwatch origin for a click recorded as epoch milliseconds.
fn click_origin(last_click_ms: f64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(last_click_ms as i64).map(|dt| dt.to_rfc3339())
}

/// Dims the dashboard and counts the time since the last click once the
/// page has been left alone long enough.
#[component]
pub fn AwayOverlay() -> Element {
    let last_click = use_signal(js_sys::Date::now);
    let mut shown = use_signal(|| false);
    let frame = use_signal(|| TimerFrame::Blank);
    let stopwatch = use_hook(|| Rc::new(RefCell::new(None::<Stopwatch>)));
    let alive = use_hook(|| Rc::new(Cell::new(true)));

    use_hook(|| track_activity(last_click));

    {
        let alive = alive.clone();
        let stopwatch = stopwatch.clone();
        use_drop(move || {
            alive.set(false);
            stopwatch.borrow_mut().take();
        });
    }

    {
        let stopwatch = stopwatch.clone();
        use_hook(move || {
            spawn(async move {
                let threshold = f64::from(config().away_threshold_secs);
                let mut ticks = IntervalStream::new(AWAY_CHECK_MS);
                while ticks.next().await.is_some() && alive.get() {
                    if *shown.peek() {
                        continue;
                    }
                    let last = *last_click.peek();
                    if away_secs(js_sys::Date::now(), last) < threshold {
                        continue;
                    }
                    let Some(origin) = click_origin(last) else {
                        continue;
                    };
                    info!("No activity since {}, showing away overlay", origin);
                    *stopwatch.borrow_mut() = Some(Stopwatch::start(
                        Rc::new(BrowserTimerEnv),
                        &origin,
                        None,
                        Box::new(FrameTarget::new(frame)),
                        TimerOptions {
                            period_ms: config().stopwatch_period_ms,
                            padding: Some('0'),
                        },
                    ));
                    shown.set(true);
                }
            });
        });
    }

    if !shown() {
        return rsx! {};
    }

    let hide = move |_| {
        if let Some(watch) = stopwatch.borrow_mut().take() {
            watch.destroy();
        }
        shown.set(false);
    };

    rsx! {
        div { class: "away-overlay", onclick: hide,
            h1 { class: "away-time", "{frame.read().as_str()}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use shared_types::parse_server_timestamp;

    use super::*;

    #[test]
    fn away_time_is_measured_from_the_last_click() {
        assert_eq!(away_secs(1_201_000.0, 1_000.0), 1200.0);
        assert!(away_secs(5_000.0, 1_000.0) < 1200.0);
    }

    #[test]
    fn click_origin_parses_as_a_server_timestamp() {
        let origin = click_origin(1_600_000_000_123.0).unwrap();
        let parsed = parse_server_timestamp(&origin).unwrap();
        assert_eq!(parsed.timestamp_millis(), 1_600_000_000_123);
    }
}
