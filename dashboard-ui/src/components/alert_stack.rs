use dioxus::prelude::*;

use crate::alerts::ALERTS;

/// Transient banners pushed through [`crate::alerts::notify`].
#[component]
pub fn AlertStack() -> Element {
    let alerts = ALERTS.read().alerts().to_vec();
    rsx! {
        div { class: "alert-stack",
            for alert in alerts {
                div {
                    key: "{alert.id}",
                    class: alert.level.css_class(),
                    role: "alert",
                    onclick: move |_| {
                        ALERTS.write().dismiss(alert.id);
                    },
                    "{alert.message}"
                }
            }
        }
    }
}
