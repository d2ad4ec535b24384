use dioxus::prelude::*;
use shared_types::{PrestigeRecord, PushTopic, QueuedFunction};

use crate::alerts::notify_error;
use crate::dashboard::{queue_function_action, DashboardState};
use crate::dom::element;
use crate::export::export_to_json_file;
use crate::feeds::LOG_PLACEHOLDER;
use crate::instance::{Field, EMPTY, NA};

const LOG_BODY_ID: &str = "dashboardLogBody";

#[component]
fn ChannelBadge(topic: PushTopic) -> Element {
    let state = use_context::<DashboardState>();
    let (class, title, text) = if state.channels.read().is_connected(topic) {
        ("channel-badge connected", "Live", "live")
    } else {
        (
            "channel-badge disconnected",
            "Disconnected, reload to resume updates",
            "offline",
        )
    };
    rsx! {
        span { class, title, "{text}" }
    }
}

#[component]
pub fn LogPanel() -> Element {
    let mut state = use_context::<DashboardState>();
    let log = state.log.read().clone();
    let scroller_class = if log.auto_scroll() {
        "icon-button text-success"
    } else {
        "icon-button text-dark"
    };

    use_effect(move || {
        let feed = state.log.read();
        if !feed.auto_scroll() || feed.is_empty() {
            return;
        }
        if let Some(body) = element(LOG_BODY_ID) {
            body.set_scroll_top(body.scroll_height());
        }
    });

    rsx! {
        section { class: "panel log-panel",
            div { class: "panel-header",
                h2 { "Log" }
                ChannelBadge { topic: PushTopic::Log }
                button {
                    class: scroller_class,
                    title: "Toggle auto scroll",
                    onclick: move |_| {
                        state.log.write().toggle_auto_scroll();
                    },
                    i { class: "fa fa-arrow-down" }
                }
                button {
                    class: "icon-button",
                    title: "Clear log records",
                    onclick: move |_| state.log.write().clear(),
                    i { class: "fa fa-trash" }
                }
            }
            div { id: LOG_BODY_ID, class: "panel-body log-body",
                if log.is_empty() {
                    h5 { class: "panel-empty", "{LOG_PLACEHOLDER}" }
                } else {
                    for (idx, record) in log.records().iter().enumerate() {
                        code { key: "{idx}", class: "log-record",
                            small { strong { "{record}" } }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PrestigeRow(record: PrestigeRecord) -> Element {
    let stage = record
        .stage
        .map_or_else(|| NA.to_string(), |stage| stage.to_string());
    let artifact = match record.artifact {
        Some(artifact) => rsx! {
            img { class: "artifact-image", src: "{artifact.path}", alt: "{artifact.title}" }
            "{artifact.title}"
        },
        None => rsx! { "{NA}" },
    };
    let session = match record.session {
        Some(session) => {
            let short = session.uuid_short.unwrap_or(session.uuid);
            match session.url {
                Some(url) => rsx! { a { href: "{url}", target: "_blank", "{short}" } },
                None => rsx! { "{short}" },
            }
        }
        None => rsx! { "{EMPTY}" },
    };
    rsx! {
        tr {
            td { "{record.timestamp.formatted}" }
            td { "{record.duration.formatted}" }
            td { "{stage}" }
            td { {artifact} }
            td { {session} }
        }
    }
}

#[component]
pub fn PrestigePanel() -> Element {
    let state = use_context::<DashboardState>();
    let feed = state.prestiges.read().clone();
    let summary = feed.summary().clone();
    let last_artifact = summary.last_artifact_title().to_string();

    let export = move |_| {
        let rows = state.prestiges.read().rows().to_vec();
        let value = match serde_json::to_value(rows) {
            Ok(value) => value,
            Err(e) => {
                dioxus_logger::tracing::error!("Failed to serialise prestiges: {}", e);
                return;
            }
        };
        if let Err(e) = export_to_json_file(&value, "prestiges") {
            notify_error("Failed to export prestiges", &e);
        }
    };

    rsx! {
        section { class: "panel prestige-panel",
            div { class: "panel-header",
                h2 { "Prestiges" }
                ChannelBadge { topic: PushTopic::Prestige }
                button { class: "icon-button", title: "Export prestiges", onclick: export,
                    i { class: "fa fa-download" }
                }
            }
            div { class: "prestige-summary",
                div { class: "summary-card",
                    span { class: "summary-label", "Average Duration" }
                    span { class: "summary-value", "{summary.avg_duration}" }
                }
                div { class: "summary-card",
                    span { class: "summary-label", "Average Stage" }
                    span { class: "summary-value", "{summary.avg_stage}" }
                }
                div { class: "summary-card",
                    span { class: "summary-label", "Total Prestiges" }
                    span { class: "summary-value", "{summary.total}" }
                }
                div { class: "summary-card",
                    span { class: "summary-label", "Last Artifact" }
                    span { class: "summary-value", "{last_artifact}" }
                }
            }
            div { class: "panel-body",
                if feed.rows().is_empty() {
                    p { class: "panel-empty", "No prestiges have taken place yet..." }
                } else {
                    table { class: "prestige-table",
                        thead {
                            tr {
                                th { "Timestamp" }
                                th { "Duration" }
                                th { "Stage" }
                                th { "Artifact" }
                                th { "Session" }
                            }
                        }
                        tbody {
                            for (idx, record) in feed.rows().iter().cloned().enumerate() {
                                PrestigeRow { key: "{idx}", record }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn QueueRow(queued: QueuedFunction) -> Element {
    rsx! {
        tr {
            td { "{queued.title}" }
            td { "{queued.created}" }
        }
    }
}

#[component]
pub fn QueuePanel() -> Element {
    let state = use_context::<DashboardState>();
    let queue = state.queue.read().clone();
    let functions = state.bootstrap.read().queueable.clone();
    let active = state.field(Field::Active).is_some_and(|v| v.is_set());
    let mut chosen = use_signal(|| functions.first().map(|f| f.function.clone()));

    rsx! {
        section { class: "panel queue-panel",
            div { class: "panel-header",
                h2 { "Queue" }
                ChannelBadge { topic: PushTopic::Queued }
            }
            div { class: "queue-controls",
                select {
                    disabled: !active,
                    onchange: move |evt| chosen.set(Some(evt.value()).filter(|v| !v.is_empty())),
                    for function in functions {
                        option { key: "{function.function}", value: "{function.function}", "{function.title}" }
                    }
                }
                button {
                    class: "btn btn-sm btn-primary",
                    disabled: !active || chosen().is_none(),
                    onclick: move |_| {
                        if let Some(function) = chosen() {
                            spawn(queue_function_action(function));
                        }
                    },
                    "Queue"
                }
            }
            div { class: "panel-body",
                if queue.is_empty() {
                    p { class: "panel-empty", "No functions are currently queued..." }
                } else {
                    table { class: "queue-table",
                        tbody {
                            for (idx, queued) in queue.rows().iter().cloned().enumerate() {
                                QueueRow { key: "{idx}", queued }
                            }
                        }
                    }
                }
            }
        }
    }
}
