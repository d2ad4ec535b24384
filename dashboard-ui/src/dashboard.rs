//! The live dashboard page: instance panel, feeds and push channels.

use dioxus::prelude::*;

mod actions;
mod effects;
mod shell;
mod state;
mod theme;
mod ws;

pub use actions::{
    create_instance_action, kill_instance_action, queue_function_action, remove_instance_action,
    select_instance_action, signal_instance,
};
pub use effects::track_activity;
pub use shell::DashboardShell;
pub use state::{ChannelStatus, DashboardState, FrameTarget, TimerFrames};
pub use theme::{get_cached_theme_preference, persist_theme, DEFAULT_THEME};

#[component]
pub fn Dashboard() -> Element {
    rsx! {
        DashboardShell {}
    }
}
