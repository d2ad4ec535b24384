//! Bindings for the server-rendered pages.
//!
//! Each page names itself through `<body data-page>`; [`bind`] wires the
//! matching controller onto the markup the server already rendered.

mod configurations;
mod globals;
mod login;
mod tables;
mod token;

use dioxus_logger::tracing::{debug, info};
use wasm_bindgen_futures::spawn_local;

use crate::alerts::AlertLevel;
use crate::api::open_log;
use crate::dom::{current_element, data_attr, on, send_alert};
use crate::error::DashboardError;

/// Shared alert container of the base template.
const ALERT_CONTAINER: &str = "alert-container";

fn alert_error(container: &str, err: &DashboardError) {
    send_alert(container, &err.alert_message(), AlertLevel::Danger);
}

fn bind_log() {
    on("openLogFileButton", "click", |event| {
        let Some(log) = current_element(&event).and_then(|node| data_attr(&node, "log")) else {
            return;
        };
        spawn_local(async move {
            if let Err(e) = open_log(&log).await {
                alert_error(ALERT_CONTAINER, &e);
            }
        });
    });
}

/// Wire the controller for `page`. The token modal lives in the base
/// template, so it is bound on every page.
pub fn bind(page: &str) {
    token::bind();

    match page {
        "login" => login::bind(),
        "configurations" => configurations::bind_list(),
        "configuration" => configurations::bind_editor(),
        "globals" => globals::bind(),
        "log" => bind_log(),
        other => match tables::page(other) {
            Some(table) => tables::bind(table),
            None => {
                debug!("No controller for page {}", other);
                return;
            }
        },
    }
    info!("Bound {} page", page);
}
