//! The configuration list (import, export, delete) and the configuration
//! editor.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus_logger::tracing::{info, warn};
use shared_types::ImportedConfiguration;
use wasm_bindgen_futures::spawn_local;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlFormElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use super::{alert_error, ALERT_CONTAINER};
use crate::alerts::AlertLevel;
use crate::api::{delete_configuration, import_configuration, save_configuration};
use crate::dom::{
    closest_target, copy_field, data_attr, element, encode_pairs, form_pairs, input_value,
    listen, on, redirect, send_alert, set_disabled, set_text, typed, web_document, FormEncoding,
};

const TABLE: &str = "configurationsTable";
const MESSAGE_CONTAINER: &str = "messageContainer";

const IMPORT_OPEN: &str = "importConfigurationButton";
const IMPORT_MODAL: &str = "importModal";
const IMPORT_STRING: &str = "importImportString";
const IMPORT_SUBMIT: &str = "importImportButton";
const IMPORT_ALERTS: &str = "importAlertContainer";

const EXPORT_MODAL: &str = "exportModal";
const EXPORT_TITLE: &str = "exportModalTitle";
const EXPORT_STRING: &str = "exportModalExportString";
const EXPORT_COPY: &str = "exportCopyButton";
const COPY_ALERTS: &str = "copyAlertContainer";

const DELETE_MODAL: &str = "deleteModal";
const DELETE_TITLE: &str = "deleteModalTitle";
const DELETE_CONFIRM: &str = "confirmDeleteButton";

const EDITOR_FORM: &str = "configurationForm";
const EDITOR_SAVE: &str = "saveConfigurationButton";
const INVALID_MESSAGE: &str =
    "Some errors are present on the configuration, please fix them before saving.";

/// Fields that must hold a value before a configuration can be saved.
const REQUIRED_FIELDS: [&str; 29] = [
    "name",
    "post_action_min_wait_time",
    "post_action_max_wait_time",
    "tapping_repeat",
    "minigames_repeat",
    "breaks_jitter",
    "breaks_minutes_required",
    "breaks_minutes_max",
    "breaks_minutes_min",
    "daily_achievements_check_every_x_hours",
    "milestones_check_every_x_hours",
    "raid_notifications_check_every_x_minutes",
    "parse_clan_results_every_x_minutes",
    "master_level_every_x_seconds",
    "master_level_intensity",
    "hero_level_every_x_seconds",
    "hero_level_intensity",
    "level_skills_every_x_seconds",
    "activate_skills_every_x_seconds",
    "interval_heavenly_strike",
    "interval_deadly_strike",
    "interval_hand_of_midas",
    "interval_fire_sword",
    "interval_war_cry",
    "interval_shadow_clone",
    "prestige_x_minutes",
    "prestige_at_stage",
    "prestige_at_max_stage_percent",
    "update_stats_every_x_minutes",
];

/// Selects whose stored value is the selected option's `data-value`.
const DATA_VALUE_SELECTS: [&str; 8] = [
    "emulator",
    "logging_level",
    "level_heavenly_strike_cap",
    "level_deadly_strike_cap",
    "level_hand_of_midas_cap",
    "level_fire_sword_cap",
    "level_war_cry_cap",
    "level_shadow_clone_cap",
];

/// Selection tables whose checked rows are sent as repeated `data-key` values.
const SELECTION_TABLES: [&str; 3] = ["upgrade_owned_tier", "upgrade_artifacts", "ignore_artifacts"];

fn show_modal(id: &str, visible: bool) {
    let Some(modal) = element(id) else {
        return;
    };
    let _ = modal.class_list().toggle_with_force("show", visible);
    if visible {
        let _ = modal.set_attribute("style", "display: block;");
    } else {
        let _ = modal.remove_attribute("style");
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn formatted(value: &Option<serde_json::Value>) -> String {
    value
        .as_ref()
        .and_then(|v| v.get("formatted"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Table row for a freshly imported configuration.
fn configuration_row_html(config: &ImportedConfiguration) -> String {
    let url = escape_html(&config.url);
    let name = escape_html(&config.name);
    format!(
        concat!(
            r#"<tr data-export-string="{export}" data-name="{name}" data-id="{pk}">"#,
            r#"<td><a href="{url}">{pk}</a></td>"#,
            r#"<td><a href="{url}">{name}</a></td>"#,
            "<td>{created}</td>",
            "<td>{updated}</td>",
            r#"<td><button type="button" class="btn btn-primary btn-export">Export</button></td>"#,
            r#"<td><button type="button" class="btn btn-danger btn-delete">Delete</button></td>"#,
            "</tr>"
        ),
        export = escape_html(&config.export),
        name = name,
        pk = config.pk,
        url = url,
        created = escape_html(&formatted(&config.created)),
        updated = escape_html(&formatted(&config.updated)),
    )
}

fn append_row(html: &str) {
    let body = web_document()
        .and_then(|doc| doc.query_selector(&format!("#{TABLE} tbody")).ok().flatten());
    if let Some(body) = body {
        let _ = body.insert_adjacent_html("beforeend", html);
    }
}

fn bind_import() {
    on(IMPORT_OPEN, "click", |_| show_modal(IMPORT_MODAL, true));

    if let Some(submit) = element(IMPORT_SUBMIT) {
        set_disabled(&submit, input_value(IMPORT_STRING).is_empty());
        on(IMPORT_STRING, "input", move |_| {
            set_disabled(&submit, input_value(IMPORT_STRING).is_empty());
        });
    }

    on(IMPORT_SUBMIT, "click", |_| {
        let import_string = input_value(IMPORT_STRING);
        if import_string.is_empty() {
            return;
        }
        spawn_local(async move {
            let reply = match import_configuration(&import_string).await {
                Ok(reply) => reply,
                Err(e) => {
                    alert_error(IMPORT_ALERTS, &e);
                    return;
                }
            };
            let message = reply.message.unwrap_or_default();
            match (reply.status.as_str(), reply.config) {
                ("success", Some(config)) => {
                    info!("Imported configuration {} ({})", config.pk, config.name);
                    append_row(&configuration_row_html(&config));
                    show_modal(IMPORT_MODAL, false);
                    send_alert(ALERT_CONTAINER, &message, AlertLevel::Success);
                    if let Some(input) = typed::<HtmlTextAreaElement>(IMPORT_STRING) {
                        input.set_value("");
                    }
                }
                ("error", _) => send_alert(IMPORT_ALERTS, &message, AlertLevel::Danger),
                (status, _) => warn!("Unexpected import status {}", status),
            }
        });
    });
}

fn bind_export() {
    let Some(table) = element(TABLE) else {
        return;
    };
    listen(&table, "click", |event| {
        let Some(row) = closest_target(&event, ".btn-export").and_then(|b| b.closest("tr").ok().flatten())
        else {
            return;
        };
        let name = data_attr(&row, "name").unwrap_or_default();
        let export = data_attr(&row, "export-string").unwrap_or_default();
        set_text(EXPORT_TITLE, format!("Export Configuration: {name}"));
        set_text(EXPORT_STRING, &export);
        show_modal(EXPORT_MODAL, true);
    });

    on(EXPORT_COPY, "click", |_| {
        copy_field(EXPORT_STRING);
        send_alert(COPY_ALERTS, "Export String Copied...", AlertLevel::Success);
    });
}

fn bind_delete() {
    let Some(table) = element(TABLE) else {
        return;
    };
    let pending: Rc<RefCell<Option<Element>>> = Rc::new(RefCell::new(None));

    let selected = pending.clone();
    listen(&table, "click", move |event| {
        let Some(row) = closest_target(&event, ".btn-delete").and_then(|b| b.closest("tr").ok().flatten())
        else {
            return;
        };
        let name = data_attr(&row, "name").unwrap_or_default();
        set_text(DELETE_TITLE, format!("Delete Configuration: {name}"));
        *selected.borrow_mut() = Some(row);
        show_modal(DELETE_MODAL, true);
    });

    on(DELETE_CONFIRM, "click", move |_| {
        let Some(row) = pending.borrow_mut().take() else {
            return;
        };
        let Some(id) = data_attr(&row, "id") else {
            return;
        };
        spawn_local(async move {
            let reply = delete_configuration(&id).await;
            show_modal(DELETE_MODAL, false);
            match reply {
                Ok(reply) if reply.is_error() => send_alert(
                    ALERT_CONTAINER,
                    reply.message.as_deref().unwrap_or_default(),
                    AlertLevel::Danger,
                ),
                Ok(reply) => {
                    send_alert(
                        ALERT_CONTAINER,
                        reply.message.as_deref().unwrap_or_default(),
                        AlertLevel::Success,
                    );
                    row.remove();
                }
                Err(e) => alert_error(ALERT_CONTAINER, &e),
            }
        });
    });
}

pub(super) fn bind_list() {
    bind_import();
    bind_export();
    bind_delete();

    // Messages handed over by a redirect, e.g. after a save.
    if let Some(message) = element(MESSAGE_CONTAINER).and_then(|node| data_attr(&node, "message")) {
        send_alert(ALERT_CONTAINER, &message, AlertLevel::Success);
    }
}

fn missing_required(value_of: impl Fn(&str) -> Option<String>, fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .filter(|id| value_of(id).is_some_and(|value| value.trim().is_empty()))
        .map(|id| id.to_string())
        .collect()
}

/// Checked rows of the selection tables, keyed by table id.
fn selection_pairs() -> Vec<(String, String)> {
    let Some(doc) = web_document() else {
        return Vec::new();
    };
    let mut pairs = Vec::new();
    for table in SELECTION_TABLES {
        let selector = format!("#{table} tr[data-key]");
        let Ok(rows) = doc.query_selector_all(&selector) else {
            continue;
        };
        for idx in 0..rows.length() {
            let Some(row) = rows
                .item(idx)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let checked = row
                .query_selector("input[type=checkbox]")
                .ok()
                .flatten()
                .and_then(|node| node.dyn_into::<HtmlInputElement>().ok())
                .is_some_and(|input| input.checked());
            if let (true, Some(key)) = (checked, data_attr(&row, "key")) {
                pairs.push((table.to_string(), key));
            }
        }
    }
    pairs
}

fn data_value_pairs() -> Vec<(String, String)> {
    DATA_VALUE_SELECTS
        .iter()
        .filter_map(|id| {
            let select = typed::<HtmlSelectElement>(id)?;
            let value = select
                .selected_options()
                .item(0)
                .and_then(|option| option.get_attribute("data-value"))?;
            Some((id.to_string(), value))
        })
        .collect()
}

fn mark_invalid(id: &str, invalid: bool) {
    if let Some(node) = element(id) {
        let _ = node.class_list().toggle_with_force("is-invalid", invalid);
    }
}

pub(super) fn bind_editor() {
    let Some(button) = element(EDITOR_SAVE) else {
        return;
    };

    for id in REQUIRED_FIELDS {
        on(id, "focusout", move |_| {
            mark_invalid(id, input_value(id).trim().is_empty());
        });
    }

    let target = button.clone();
    listen(&button, "click", move |_| {
        let missing = missing_required(
            |id| element(id).map(|_| input_value(id)),
            &REQUIRED_FIELDS,
        );
        for id in REQUIRED_FIELDS {
            mark_invalid(id, missing.iter().any(|m| m == id));
        }
        if !missing.is_empty() {
            warn!("Configuration is missing {:?}", missing);
            send_alert(ALERT_CONTAINER, INVALID_MESSAGE, AlertLevel::Danger);
            return;
        }

        let Some(form) = typed::<HtmlFormElement>(EDITOR_FORM) else {
            return;
        };
        let mut pairs = form_pairs(
            &form,
            FormEncoding {
                checkbox_flags: true,
            },
        );
        // Row selections and data-value selects replace their raw inputs.
        let extra: Vec<(String, String)> = data_value_pairs()
            .into_iter()
            .chain(selection_pairs())
            .collect();
        pairs.retain(|(name, _)| {
            !name.ends_with("_length") && !extra.iter().any(|(taken, _)| taken == name)
        });
        pairs.extend(extra);
        if let Some(pk) = data_attr(&target, "pk") {
            pairs.push(("key".to_string(), pk));
        }

        let button = target.clone();
        set_disabled(&button, true);
        let body = encode_pairs(&pairs);
        spawn_local(async move {
            let reply = save_configuration(body).await;
            set_disabled(&button, false);
            match reply {
                Ok(reply) if reply.is_error() => send_alert(
                    ALERT_CONTAINER,
                    reply.message.as_deref().unwrap_or_default(),
                    AlertLevel::Danger,
                ),
                Ok(_) => redirect("/configurations"),
                Err(e) => alert_error(ALERT_CONTAINER, &e),
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn imported_row_escapes_server_text() {
        let config = ImportedConfiguration {
            pk: 7,
            name: "Push <fast>".to_string(),
            url: "/configurations/7".to_string(),
            export: "a\"b".to_string(),
            created: Some(json!({"formatted": "2020-01-01 10:00:00"})),
            updated: None,
        };
        let html = configuration_row_html(&config);
        assert!(html.contains(r#"data-id="7""#));
        assert!(html.contains("Push &lt;fast&gt;"));
        assert!(html.contains(r#"data-export-string="a&quot;b""#));
        assert!(html.contains("<td>2020-01-01 10:00:00</td>"));
    }

    #[test]
    fn blank_required_fields_are_reported() {
        let values = |id: &str| match id {
            "name" => Some("  ".to_string()),
            "tapping_repeat" => Some("5".to_string()),
            _ => None,
        };
        assert_eq!(
            missing_required(values, &["name", "tapping_repeat", "absent"]),
            vec!["name".to_string()]
        );
    }
}
