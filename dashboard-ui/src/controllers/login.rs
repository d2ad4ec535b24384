use shared_types::StatusResponse;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlFormElement;

use crate::alerts::AlertLevel;
use crate::api::submit_credentials;
use crate::dom::{element, listen, redirect, send_alert, serialize_form_urlencoded, set_disabled, web_document};
use crate::error::Result;

const FORM_SELECTOR: &str = ".form-signin";
const MESSAGE_CONTAINER: &str = "messageContainer";
const INPUTS: [&str; 4] = ["inputEmail", "inputToken", "signInButton", "signUpButton"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoginOutcome {
    SignedIn,
    Rejected(String),
}

fn login_outcome(reply: Result<StatusResponse>) -> LoginOutcome {
    match reply {
        Ok(reply) if reply.is_error() => LoginOutcome::Rejected(reply.message.unwrap_or_default()),
        Ok(_) => LoginOutcome::SignedIn,
        Err(e) => LoginOutcome::Rejected(e.alert_message()),
    }
}

fn set_inputs_disabled(disabled: bool) {
    for id in INPUTS {
        if let Some(node) = element(id) {
            set_disabled(&node, disabled);
        }
    }
}

pub(super) fn bind() {
    let form = web_document()
        .and_then(|doc| doc.query_selector(FORM_SELECTOR).ok().flatten())
        .and_then(|node| node.dyn_into::<HtmlFormElement>().ok());
    let Some(form) = form else {
        return;
    };

    let target = form.clone();
    listen(&form, "submit", move |event| {
        event.prevent_default();
        // Serialise before disabling; disabled inputs are skipped by browsers.
        let body = serialize_form_urlencoded(&target);
        set_inputs_disabled(true);

        spawn_local(async move {
            let outcome = login_outcome(submit_credentials(body).await);
            set_inputs_disabled(false);
            match outcome {
                LoginOutcome::SignedIn => redirect("/"),
                LoginOutcome::Rejected(message) => {
                    send_alert(MESSAGE_CONTAINER, &message, AlertLevel::Danger)
                }
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    #[test]
    fn credentials_reply_decides_the_redirect() {
        let ok = StatusResponse {
            status: "success".to_string(),
            message: None,
        };
        assert_eq!(login_outcome(Ok(ok)), LoginOutcome::SignedIn);

        let rejected = StatusResponse {
            status: "error".to_string(),
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(
            login_outcome(Ok(rejected)),
            LoginOutcome::Rejected("Invalid credentials".to_string())
        );
    }

    #[test]
    fn transport_failure_shows_the_status_text() {
        let err = DashboardError::Transport {
            status: Some(502),
            message: "HTTP error: 502 (Bad Gateway)".to_string(),
        };
        assert_eq!(
            login_outcome(Err(err)),
            LoginOutcome::Rejected("HTTP error: 502 (Bad Gateway)".to_string())
        );
    }
}
