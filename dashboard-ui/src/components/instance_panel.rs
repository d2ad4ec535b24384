use dioxus::prelude::*;
use shared_types::{ChoiceOption, CountdownKey, InstanceSignal, InstanceState};

use crate::dashboard::{signal_instance, DashboardState, TimerFrames};
use crate::instance::{ActionSet, Field, FieldValue, RowKey, StageTone, TimerKey, EMPTY, NA};
use crate::timers::TimerFrame;

/// Text of one timer slot. Subscribes only to that slot's frame.
#[component]
pub fn TimerText(slot: TimerKey) -> Element {
    let frames = use_context::<TimerFrames>();
    let Some(frame) = frames.get(slot) else {
        return rsx! {};
    };
    let frame = frame.read();
    let class = match *frame {
        TimerFrame::Ready => "timer timer-ready",
        _ => "timer",
    };
    rsx! {
        span { class, "{frame.as_str()}" }
    }
}

fn state_badge(state: Option<InstanceState>) -> (&'static str, &'static str) {
    match state {
        Some(InstanceState::Running) => ("fa fa-circle text-success", "Running"),
        Some(InstanceState::Paused) => ("fa fa-circle text-warning", "Paused"),
        Some(InstanceState::Stopped) => ("fa fa-circle text-danger", "Stopped"),
        None => ("fa fa-circle text-muted", NA),
    }
}

fn signal_icon(signal: InstanceSignal) -> (&'static str, &'static str) {
    match signal {
        InstanceSignal::Play => ("fa fa-3x fa-play", "text-success"),
        InstanceSignal::Pause => ("fa fa-3x fa-pause", "text-warning"),
        InstanceSignal::Stop => ("fa fa-3x fa-stop", "text-danger"),
    }
}

#[component]
fn FieldText(value: Option<FieldValue>) -> Element {
    match value {
        None => rsx! { span { class: "text-muted", "{NA}" } },
        Some(FieldValue::Text(text)) => rsx! { span { "{text}" } },
        Some(FieldValue::Link { text, href: Some(href) }) => rsx! {
            a { href: "{href}", target: "_blank", "{text}" }
        },
        Some(FieldValue::Link { text, href: None }) => rsx! { span { "{text}" } },
        Some(FieldValue::Artifact { title, image }) => rsx! {
            span { class: "artifact",
                if let Some(image) = image {
                    img { class: "artifact-image", src: "{image}", alt: "{title}" }
                }
                "{title}"
            }
        },
        Some(FieldValue::Stage {
            stage,
            diff,
            tone,
            percent,
        }) => {
            let (sign, class) = match tone {
                StageTone::Behind => ("-", "text-danger"),
                StageTone::Ahead => ("+", "text-success"),
                StageTone::Level => ("", "text-muted"),
            };
            rsx! {
                span { "{stage} " }
                span { class, "({sign}{diff}) {percent}" }
            }
        }
        Some(_) => rsx! {},
    }
}

fn row_class(dimmed: bool) -> &'static str {
    if dimmed {
        "info-row dimmed"
    } else {
        "info-row"
    }
}

#[component]
fn InfoRow(label: &'static str, value: Option<FieldValue>, dimmed: bool) -> Element {
    rsx! {
        tr { class: row_class(dimmed),
            th { "{label}" }
            td { FieldText { value } }
        }
    }
}

#[component]
fn TimerRow(label: &'static str, slot: TimerKey, dimmed: bool) -> Element {
    rsx! {
        tr { class: row_class(dimmed),
            th { "{label}" }
            td { TimerText { slot } }
        }
    }
}

#[component]
fn ActionButton(signal: InstanceSignal, enabled: bool) -> Element {
    let state = use_context::<DashboardState>();
    let (icon, color) = signal_icon(signal);
    let icon_class = if enabled {
        format!("{icon} {color}")
    } else {
        format!("{icon} text-light")
    };
    rsx! {
        button {
            class: "action-button",
            title: "{signal.as_str()}",
            disabled: !enabled,
            onclick: move |_| {
                if enabled {
                    signal_instance(signal, state);
                }
            },
            i { class: "{icon_class}" }
        }
    }
}

#[component]
fn ActionButtons(actions: ActionSet) -> Element {
    rsx! {
        div { class: "instance-actions",
            for signal in InstanceSignal::ALL {
                ActionButton {
                    key: "{signal.as_str()}",
                    signal,
                    enabled: actions.allows(signal),
                }
            }
        }
    }
}

#[component]
fn ChoiceSelect(
    label: &'static str,
    options: Vec<ChoiceOption>,
    pinned: Option<FieldValue>,
    mut choice: Signal<Option<String>>,
) -> Element {
    let (value, locked) = match pinned {
        Some(FieldValue::Choice {
            value: Some(value),
            locked: true,
        }) => (Some(value), true),
        _ => (choice(), false),
    };
    let selected = value.unwrap_or_default();

    rsx! {
        label { class: "choice",
            span { "{label}" }
            select {
                disabled: locked,
                value: "{selected}",
                onchange: move |evt| {
                    let next = evt.value();
                    choice.set(Some(next).filter(|v| !v.is_empty()));
                },
                if options.is_empty() {
                    option { value: "", "{EMPTY}" }
                }
                for opt in options {
                    option {
                        key: "{opt.value}",
                        value: "{opt.value}",
                        selected: opt.value == selected,
                        "{opt.label}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn InstancePanel(loaded: Signal<bool>) -> Element {
    let state = use_context::<DashboardState>();
    let field = move |f: Field| state.field(f);
    let dimmed = move |row: RowKey| state.field(Field::Dimmed(row)).is_some_and(|v| v.is_set());

    let instance_state = match field(Field::State) {
        Some(FieldValue::State(s)) => Some(s),
        _ => None,
    };
    let actions = match field(Field::Actions) {
        Some(FieldValue::Actions(actions)) => actions,
        _ => ActionSet::for_state(InstanceState::Stopped),
    };
    let active = field(Field::Active).is_some_and(|v| v.is_set());
    let (badge, badge_label) = state_badge(instance_state);
    let name = match field(Field::Name) {
        Some(FieldValue::Text(name)) => name,
        _ => NA.to_string(),
    };
    let state_label = instance_state.map_or(NA, |s| s.as_str());

    let (configurations, windows) = {
        let bootstrap = state.bootstrap.read();
        (bootstrap.configurations.clone(), bootstrap.windows.clone())
    };

    rsx! {
        section { class: "panel instance-panel",
            div { class: "panel-header",
                i { class: "{badge}", title: "{badge_label}" }
                h2 { "{name}" }
                span { class: "instance-state", "{state_label}" }
            }
            if !loaded() {
                div { class: "panel-loader", "Loading instance..." }
            }
            div { class: "panel-body",
                div { class: "instance-controls",
                    ChoiceSelect {
                        label: "Configuration",
                        options: configurations,
                        pinned: field(Field::ConfigurationChoice),
                        choice: state.configuration_choice,
                    }
                    ChoiceSelect {
                        label: "Window",
                        options: windows,
                        pinned: field(Field::WindowChoice),
                        choice: state.window_choice,
                    }
                    ActionButtons { actions }
                }
                table { class: "info-table",
                    tbody {
                        TimerRow { label: "Started", slot: TimerKey::Started, dimmed: false }
                        InfoRow { label: "Session", value: field(Field::Session), dimmed: false }
                        InfoRow {
                            label: "Current Function",
                            value: field(Field::CurrentFunction),
                            dimmed: dimmed(RowKey::CurrentFunction),
                        }
                        InfoRow {
                            label: "Current Stage",
                            value: field(Field::CurrentStage),
                            dimmed: dimmed(RowKey::CurrentStage),
                        }
                        InfoRow {
                            label: "Next Artifact Upgrade",
                            value: field(Field::NextArtifactUpgrade),
                            dimmed: dimmed(RowKey::NextArtifactUpgrade),
                        }
                        TimerRow { label: "Last Prestige", slot: TimerKey::LastPrestige, dimmed: false }
                        InfoRow { label: "Last Prestige Stage", value: field(Field::LastPrestigeStage), dimmed: false }
                        InfoRow { label: "Last Prestige Duration", value: field(Field::LastPrestigeDuration), dimmed: false }
                        InfoRow { label: "Last Prestige Artifact", value: field(Field::LastPrestigeArtifact), dimmed: false }
                        InfoRow { label: "Log File", value: field(Field::LogFile), dimmed: false }
                        InfoRow { label: "Configuration", value: field(Field::Configuration), dimmed: false }
                        InfoRow { label: "Window", value: field(Field::Window), dimmed: false }
                    }
                }
                if active {
                    table { class: "info-table countdowns",
                        tbody {
                            for key in CountdownKey::ALL {
                                TimerRow {
                                    key: "{key.field_name()}",
                                    label: key.label(),
                                    slot: TimerKey::Countdown(key),
                                    dimmed: dimmed(RowKey::Countdown(key)),
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
