use dioxus::prelude::*;
use dioxus_web::WebEventExt;
use shared_types::ReleaseNotes;

/// The click landed on the backdrop itself, not inside the dialog.
fn is_backdrop_click(evt: &MouseEvent) -> bool {
    evt.data().try_as_web_event().is_some_and(|event| {
        let target = event.target();
        target.is_some() && target == event.current_target()
    })
}

/// Notes for a release the user has not seen yet. The body is server HTML.
/// Closes from either button or a click on the backdrop.
#[component]
pub fn ReleaseModal(mut notes: Signal<Option<ReleaseNotes>>) -> Element {
    let Some(release) = notes() else {
        return rsx! {};
    };
    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |evt| {
                if is_backdrop_click(&evt) {
                    notes.set(None);
                }
            },
            div { class: "modal release-modal", role: "dialog",
                div { class: "modal-header",
                    h3 { class: "modal-title", "{release.title}" }
                    button {
                        class: "icon-button",
                        title: "Close",
                        onclick: move |_| notes.set(None),
                        i { class: "fa fa-times" }
                    }
                }
                div { class: "modal-body", dangerous_inner_html: "{release.body}" }
                div { class: "modal-footer",
                    button {
                        class: "btn btn-sm btn-primary",
                        onclick: move |_| notes.set(None),
                        "Close"
                    }
                }
            }
        }
    }
}
