use wasm_bindgen_futures::spawn_local;

use crate::alerts::AlertLevel;
use crate::api::update_token;
use crate::dom::{animate_button, element, input_value, listen, restore_button, send_alert, LoadingDots};

const TOKEN_INPUT: &str = "tokenValue";
const SAVE_BUTTON: &str = "tokenSaveButton";
const MODAL_ALERTS: &str = "tokenModalAlerts";
const SAVE_CAPTION: &str = "Save";
const SAVING_DOTS_MAX: usize = 3;
const SAVING_DOTS_PERIOD_MS: u32 = 250;

pub(super) fn bind() {
    let Some(button) = element(SAVE_BUTTON) else {
        return;
    };
    let target = button.clone();
    listen(&button, "click", move |_| {
        let button = target.clone();
        let token = input_value(TOKEN_INPUT);
        let animation = animate_button(
            &button,
            LoadingDots::new("Saving", SAVING_DOTS_MAX),
            SAVING_DOTS_PERIOD_MS,
        );
        spawn_local(async move {
            let reply = update_token(&token).await;
            restore_button(&button, animation, SAVE_CAPTION);
            match reply {
                Ok(reply) => send_alert(
                    MODAL_ALERTS,
                    &reply.message.unwrap_or_default(),
                    AlertLevel::from_status(&reply.status),
                ),
                Err(e) => super::alert_error(MODAL_ALERTS, &e),
            }
        });
    });
}
