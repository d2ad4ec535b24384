use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlFormElement;

use super::{alert_error, ALERT_CONTAINER};
use crate::alerts::AlertLevel;
use crate::api::save_globals;
use crate::dom::{element, listen, on, send_alert, serialize_form_urlencoded, set_disabled, typed};
use crate::export::export_embedded_json;

const FORM: &str = "globalsForm";
const SAVE_BUTTON: &str = "saveGlobalsButton";
const EXPORT_BUTTON: &str = "exportGlobalsJson";
const SAVED_MESSAGE: &str = "Global settings have been saved successfully...";

fn save_failed_message(message: &str) -> String {
    format!("An error occurred while saving global settings: {message}")
}

pub(super) fn bind() {
    on(EXPORT_BUTTON, "click", |_| {
        if let Err(e) = export_embedded_json("jsonData", "globals") {
            alert_error(ALERT_CONTAINER, &e);
        }
    });

    let Some(button) = element(SAVE_BUTTON) else {
        return;
    };
    let target = button.clone();
    listen(&button, "click", move |_| {
        let Some(form) = typed::<HtmlFormElement>(FORM) else {
            return;
        };
        let body = serialize_form_urlencoded(&form);
        let button = target.clone();
        set_disabled(&button, true);

        spawn_local(async move {
            match save_globals(body).await {
                Ok(reply) if reply.is_error() => send_alert(
                    ALERT_CONTAINER,
                    &save_failed_message(reply.message.as_deref().unwrap_or_default()),
                    AlertLevel::Danger,
                ),
                Ok(_) => send_alert(ALERT_CONTAINER, SAVED_MESSAGE, AlertLevel::Success),
                Err(e) => alert_error(ALERT_CONTAINER, &e),
            }
            set_disabled(&button, false);
        });
    });
}
