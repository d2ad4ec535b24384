use dioxus::prelude::*;
use futures_util::future::select;
use futures_util::StreamExt;
use gloo_timers::future::IntervalStream;

use crate::dashboard::{
    get_cached_theme_preference, kill_instance_action, persist_theme, DashboardState,
    DEFAULT_THEME,
};
use crate::dom::LoadingDots;

const KILL_CAPTION: &str = "Kill Instance";
const KILL_DOTS_MAX: usize = 10;
const KILL_DOTS_PERIOD_MS: u32 = 500;

/// Kills the active instance's bot process. The caption animates until the
/// server replies.
#[component]
pub fn KillInstanceButton() -> Element {
    let mut caption = use_signal(|| None::<String>);
    let busy = caption().is_some();

    let kill = move |_| {
        if caption.peek().is_some() {
            return;
        }
        let mut dots = LoadingDots::new("Launching", KILL_DOTS_MAX);
        caption.set(Some(dots.text()));

        spawn(async move {
            let animate = async move {
                let mut ticks = IntervalStream::new(KILL_DOTS_PERIOD_MS);
                while ticks.next().await.is_some() {
                    caption.set(Some(dots.step()));
                }
            };
            select(Box::pin(kill_instance_action()), Box::pin(animate)).await;
            caption.set(None);
        });
    };

    let text = caption().unwrap_or_else(|| KILL_CAPTION.to_string());
    rsx! {
        button {
            class: "btn btn-sm btn-danger kill-button",
            disabled: busy,
            onclick: kill,
            "{text}"
        }
    }
}

#[component]
pub fn ThemeSelect() -> Element {
    let state = use_context::<DashboardState>();
    let (themes, current) = {
        let bootstrap = state.bootstrap.read();
        (
            bootstrap.themes.clone(),
            bootstrap
                .theme
                .clone()
                .or_else(get_cached_theme_preference)
                .unwrap_or_else(|| DEFAULT_THEME.to_string()),
        )
    };
    if themes.is_empty() {
        return rsx! {};
    }
    let offered = themes.clone();

    rsx! {
        label { class: "theme-select",
            span { "Theme" }
            select {
                value: "{current}",
                onchange: move |evt| {
                    let theme = evt.value();
                    spawn(persist_theme(theme, offered.clone()));
                },
                for theme in themes {
                    option {
                        key: "{theme}",
                        value: "{theme}",
                        selected: theme == current,
                        "{theme}"
                    }
                }
            }
        }
    }
}
