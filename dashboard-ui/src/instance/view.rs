use std::collections::BTreeMap;

use shared_types::{CountdownKey, InstanceSnapshot, InstanceState};

use super::{ActionSet, EMPTY, NA};

/// Table rows that fade out when their value is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    CurrentFunction,
    NextArtifactUpgrade,
    CurrentStage,
    Countdown(CountdownKey),
}

/// Every non-timer value on the instance panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    State,
    Session,
    CurrentFunction,
    LastPrestigeStage,
    LastPrestigeDuration,
    LastPrestigeArtifact,
    LogFile,
    Configuration,
    Window,
    NextArtifactUpgrade,
    CurrentStage,
    ConfigurationChoice,
    WindowChoice,
    Actions,
    Active,
    Dimmed(RowKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageTone {
    /// Below the max stage.
    Behind,
    /// Past the max stage.
    Ahead,
    Level,
}

impl StageTone {
    fn from_diff(diff: i64) -> Self {
        match diff {
            d if d > 0 => StageTone::Behind,
            d if d < 0 => StageTone::Ahead,
            _ => StageTone::Level,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Link {
        text: String,
        href: Option<String>,
    },
    Artifact {
        title: String,
        image: Option<String>,
    },
    Stage {
        stage: i64,
        diff: i64,
        tone: StageTone,
        percent: String,
    },
    /// A settings selector: pinned to `value` and locked while the instance runs.
    Choice {
        value: Option<String>,
        locked: bool,
    },
    State(InstanceState),
    Actions(ActionSet),
    Flag(bool),
}

impl FieldValue {
    fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    fn empty_link() -> Self {
        FieldValue::Link {
            text: EMPTY.to_string(),
            href: None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }
}

pub type InstanceView = BTreeMap<Field, FieldValue>;

/// Receives the fields whose rendered value changed.
pub trait ViewSink {
    fn write_field(&mut self, field: Field, value: FieldValue);
}

/// The full field set for one snapshot. Inactive instances render placeholders.
pub fn render_view(snapshot: &InstanceSnapshot) -> InstanceView {
    let active = snapshot.is_active();
    let mut view = InstanceView::new();

    if active {
        view.insert(Field::Name, FieldValue::text(&snapshot.name));
        view.insert(Field::State, FieldValue::State(snapshot.state));
    } else {
        view.insert(Field::Name, FieldValue::text(NA));
        view.insert(Field::State, FieldValue::text(NA));
    }
    view.insert(
        Field::Actions,
        FieldValue::Actions(ActionSet::for_state(snapshot.state)),
    );
    view.insert(Field::Active, FieldValue::Flag(active));

    let session = snapshot.session.as_ref().filter(|_| active);
    view.insert(
        Field::Session,
        match session {
            Some(session) => FieldValue::Link {
                text: session.uuid.clone(),
                href: Some(session.url.clone()),
            },
            None => FieldValue::text(NA),
        },
    );

    let function = active
        .then_some(snapshot.current_function.function.as_ref())
        .flatten();
    view.insert(
        Field::CurrentFunction,
        match (active, &snapshot.current_function.title) {
            (true, Some(title)) if function.is_some() => FieldValue::text(title),
            _ => FieldValue::text(NA),
        },
    );
    view.insert(
        Field::Dimmed(RowKey::CurrentFunction),
        FieldValue::Flag(active && function.is_none()),
    );

    insert_last_prestige(&mut view, snapshot, active);

    view.insert(
        Field::LogFile,
        match snapshot.log_file.as_ref().filter(|_| active) {
            Some(url) => FieldValue::Link {
                text: "Link".to_string(),
                href: Some(url.clone()),
            },
            None => FieldValue::empty_link(),
        },
    );

    let configuration = snapshot.configuration.as_ref().filter(|_| active);
    view.insert(
        Field::Configuration,
        match configuration {
            Some(config) => FieldValue::Link {
                text: config.name.clone(),
                href: Some(config.url.clone()).filter(|url| !url.is_empty()),
            },
            None => FieldValue::empty_link(),
        },
    );
    view.insert(
        Field::ConfigurationChoice,
        FieldValue::Choice {
            value: configuration.map(|config| config.id.to_string()),
            locked: active,
        },
    );

    let window = snapshot.window.as_ref().filter(|_| active);
    view.insert(
        Field::Window,
        FieldValue::text(window.map_or(EMPTY, |w| w.formatted.as_str())),
    );
    view.insert(
        Field::WindowChoice,
        FieldValue::Choice {
            value: window.map(|w| w.hwnd.to_string()),
            locked: active,
        },
    );

    let upgrade = snapshot
        .next_artifact_upgrade
        .title
        .as_ref()
        .filter(|_| active);
    view.insert(
        Field::NextArtifactUpgrade,
        match upgrade {
            Some(title) => FieldValue::Artifact {
                title: title.clone(),
                image: snapshot.next_artifact_upgrade.image.clone(),
            },
            None => FieldValue::text(EMPTY),
        },
    );
    view.insert(
        Field::Dimmed(RowKey::NextArtifactUpgrade),
        FieldValue::Flag(active && upgrade.is_none()),
    );

    let stage = snapshot.current_stage.stage.filter(|_| active);
    view.insert(
        Field::CurrentStage,
        match stage {
            Some(stage) => {
                let diff = snapshot.current_stage.diff_from_max.unwrap_or(0);
                FieldValue::Stage {
                    stage,
                    diff: diff.abs(),
                    tone: StageTone::from_diff(diff),
                    percent: snapshot
                        .current_stage
                        .percent_from_max
                        .clone()
                        .unwrap_or_default(),
                }
            }
            None => FieldValue::text(EMPTY),
        },
    );
    view.insert(
        Field::Dimmed(RowKey::CurrentStage),
        FieldValue::Flag(active && stage.is_none()),
    );

    for key in CountdownKey::ALL {
        view.insert(
            Field::Dimmed(RowKey::Countdown(key)),
            FieldValue::Flag(active && snapshot.countdown(key).is_none()),
        );
    }

    view
}

/// Value a signal should carry for a selector: the pinned snapshot value
/// while the instance is active, otherwise the user's pick.
pub fn selected_choice(
    view: &InstanceView,
    field: Field,
    picked: Option<String>,
) -> Option<String> {
    match view.get(&field) {
        Some(FieldValue::Choice {
            value: Some(value),
            locked: true,
        }) => Some(value.clone()),
        _ => picked,
    }
}

fn insert_last_prestige(view: &mut InstanceView, snapshot: &InstanceSnapshot, active: bool) {
    let prestige = snapshot.last_prestige.as_ref().filter(|_| active);

    let (stage, duration, artifact) = match prestige {
        Some(prestige) => (
            prestige
                .stage
                .map_or_else(|| NA.to_string(), |stage| stage.to_string()),
            FieldValue::text(&prestige.duration.formatted),
            match &prestige.artifact {
                Some(artifact) => FieldValue::Artifact {
                    title: artifact.title.clone(),
                    image: Some(artifact.path.clone()).filter(|path| !path.is_empty()),
                },
                None => FieldValue::text(NA),
            },
        ),
        None => (NA.to_string(), FieldValue::text(NA), FieldValue::text(NA)),
    };

    view.insert(Field::LastPrestigeStage, FieldValue::Text(stage));
    view.insert(Field::LastPrestigeDuration, duration);
    view.insert(Field::LastPrestigeArtifact, artifact);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(state: &str) -> InstanceSnapshot {
        serde_json::from_value(json!({
            "id": 1,
            "name": "Main",
            "state": state,
            "current_function": {"function": null, "title": null},
            "current_stage": {"stage": 120, "diff_from_max": -5, "percent_from_max": "104%"},
            "configuration": {"id": 4, "url": "/admin/4", "name": "Farm"},
            "window": {"hwnd": 77, "formatted": "Nox (77)"},
            "log_file": "/logs/1.log",
            "next_prestige": {"datetime": "2020-01-01 11:00:00+00:00", "formatted": "x"}
        }))
        .unwrap()
    }

    #[test]
    fn active_snapshot_pins_and_locks_selectors() {
        let view = render_view(&snapshot("RUNNING"));
        assert_eq!(
            view[&Field::ConfigurationChoice],
            FieldValue::Choice {
                value: Some("4".into()),
                locked: true
            }
        );
        assert_eq!(
            view[&Field::CurrentStage],
            FieldValue::Stage {
                stage: 120,
                diff: 5,
                tone: StageTone::Ahead,
                percent: "104%".into()
            }
        );
        assert!(view[&Field::Dimmed(RowKey::CurrentFunction)].is_set());
        assert!(!view[&Field::Dimmed(RowKey::Countdown(CountdownKey::NextPrestige))].is_set());
        assert!(view[&Field::Dimmed(RowKey::Countdown(CountdownKey::NextBreak))].is_set());
    }

    #[test]
    fn paused_instance_resumes_with_pinned_choices() {
        let view = render_view(&snapshot("PAUSED"));
        assert_eq!(
            view[&Field::Actions],
            FieldValue::Actions(ActionSet::for_state(InstanceState::Paused))
        );
        assert_eq!(
            selected_choice(&view, Field::ConfigurationChoice, Some("9".into())),
            Some("4".into())
        );
        assert_eq!(
            selected_choice(&view, Field::WindowChoice, None),
            Some("77".into())
        );
    }

    #[test]
    fn stopped_instance_uses_picked_choices() {
        let view = render_view(&snapshot("STOPPED"));
        assert_eq!(
            selected_choice(&view, Field::ConfigurationChoice, Some("9".into())),
            Some("9".into())
        );
        assert_eq!(selected_choice(&InstanceView::new(), Field::WindowChoice, None), None);
    }

    #[test]
    fn inactive_snapshot_renders_placeholders() {
        let view = render_view(&snapshot("STOPPED"));
        assert_eq!(view[&Field::Name], FieldValue::text(NA));
        assert_eq!(view[&Field::State], FieldValue::text(NA));
        assert_eq!(
            view[&Field::Actions],
            FieldValue::Actions(ActionSet::for_state(InstanceState::Stopped))
        );
        assert_eq!(view[&Field::LogFile], FieldValue::empty_link());
        assert_eq!(view[&Field::Window], FieldValue::text(EMPTY));
        assert_eq!(view[&Field::CurrentStage], FieldValue::text(EMPTY));
        assert_eq!(view[&Field::LastPrestigeStage], FieldValue::text(NA));
        assert_eq!(
            view[&Field::WindowChoice],
            FieldValue::Choice {
                value: None,
                locked: false
            }
        );
        assert!(!view[&Field::Active].is_set());
    }
}
