use dioxus::prelude::*;
use shared_types::InstanceSummary;

use crate::dashboard::{
    create_instance_action, remove_instance_action, select_instance_action, DashboardState,
};

/// The mutually exclusive instance rows plus the create button.
#[component]
pub fn InstancesTable() -> Element {
    let state = use_context::<DashboardState>();
    let rows = state.rows.read().clone();

    rsx! {
        section { class: "panel instances-panel",
            div { class: "panel-header",
                h2 { "Instances" }
                button {
                    class: "btn btn-sm btn-success",
                    onclick: move |_| {
                        spawn(create_instance_action(state));
                    },
                    "Add Instance"
                }
            }
            div { class: "panel-body",
                if rows.rows().is_empty() {
                    p { class: "panel-empty", "No instances have been created yet..." }
                } else {
                    table { class: "instances-table",
                        tbody {
                            for row in rows.rows().iter().cloned() {
                                InstanceRow {
                                    key: "{row.id}",
                                    selected: rows.is_selected(row.id),
                                    row,
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn InstanceRow(row: InstanceSummary, selected: bool) -> Element {
    let state = use_context::<DashboardState>();
    let id = row.id;
    rsx! {
        tr {
            td { class: "instance-name", "{row.name}" }
            td {
                button {
                    class: "btn btn-sm btn-primary",
                    disabled: selected,
                    onclick: move |_| select_instance_action(id, state),
                    if selected { "Selected" } else { "Select" }
                }
            }
            td {
                button {
                    class: "btn btn-sm btn-danger",
                    disabled: selected,
                    onclick: move |_| {
                        spawn(remove_instance_action(id, state));
                    },
                    "Remove"
                }
            }
        }
    }
}
