//! Data table pages: an instance selector that swaps the table body, and a
//! JSON export of the embedded data.

use dioxus_logger::tracing::warn;
use wasm_bindgen_futures::spawn_local;

use super::{alert_error, ALERT_CONTAINER};
use crate::api::fetch_table;
use crate::dom::{element, input_value, on, set_html};
use crate::export::export_embedded_json;

const JSON_DATA: &str = "jsonData";
const LOADER_HTML: &str = r#"<div class="loader-template">Loading...</div>"#;

/// Where an exported file takes its name from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ExportName {
    Fixed(&'static str),
    /// Text of the element with this id, e.g. a session uuid.
    FromElement(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TableSource {
    pub path: &'static str,
    pub selector: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct TablePage {
    pub name: &'static str,
    pub source: Option<TableSource>,
    pub export_button: &'static str,
    pub export_name: ExportName,
}

const PAGES: [TablePage; 8] = [
    TablePage {
        name: "artifacts",
        source: Some(TableSource {
            path: "/artifacts",
            selector: "artifactsInstanceSelect",
            body: "artifactContent",
        }),
        export_button: "exportArtifactsJson",
        export_name: ExportName::Fixed("artifacts"),
    },
    TablePage {
        name: "all_prestiges",
        source: Some(TableSource {
            path: "/all_prestiges",
            selector: "prestigesInstanceSelect",
            body: "prestigesCardBody",
        }),
        export_button: "exportPrestigesJson",
        export_name: ExportName::Fixed("prestiges"),
    },
    TablePage {
        name: "statistics",
        source: None,
        export_button: "exportStatisticsJson",
        export_name: ExportName::Fixed("stats"),
    },
    TablePage {
        name: "raids",
        source: Some(TableSource {
            path: "/raids",
            selector: "raidsInstanceSelect",
            body: "raidsCardBody",
        }),
        export_button: "exportRaidsJson",
        export_name: ExportName::Fixed("raids"),
    },
    TablePage {
        name: "sessions",
        source: Some(TableSource {
            path: "/sessions",
            selector: "sessionsInstanceSelect",
            body: "sessionsCardBody",
        }),
        export_button: "exportSessionsJson",
        export_name: ExportName::Fixed("sessions"),
    },
    TablePage {
        name: "session",
        source: None,
        export_button: "exportSessionJson",
        export_name: ExportName::FromElement("sessionUuidValue"),
    },
    TablePage {
        name: "raid",
        source: None,
        export_button: "exportRaidJson",
        export_name: ExportName::FromElement("raidDigestValue"),
    },
    TablePage {
        name: "settings",
        source: None,
        export_button: "exportSettingsJson",
        export_name: ExportName::Fixed("settings"),
    },
];

pub(super) fn page(name: &str) -> Option<TablePage> {
    PAGES.iter().copied().find(|page| page.name == name)
}

impl ExportName {
    fn resolve(self) -> String {
        match self {
            ExportName::Fixed(name) => name.to_string(),
            ExportName::FromElement(id) => element(id)
                .and_then(|node| node.text_content())
                .map(|text| text.trim().to_string())
                .unwrap_or_default(),
        }
    }
}

fn bind_source(source: TableSource) {
    on(source.selector, "change", move |_| {
        let instance = input_value(source.selector);
        if instance.is_empty() {
            return;
        }
        set_html(source.body, LOADER_HTML);
        spawn_local(async move {
            match fetch_table(source.path, &instance).await {
                Ok(fragment) => set_html(source.body, &fragment.table),
                Err(e) => {
                    set_html(source.body, "");
                    alert_error(ALERT_CONTAINER, &e);
                }
            }
        });
    });
}

pub(super) fn bind(page: TablePage) {
    if let Some(source) = page.source {
        bind_source(source);
    }
    let export_name = page.export_name;
    on(page.export_button, "click", move |_| {
        if let Err(e) = export_embedded_json(JSON_DATA, &export_name.resolve()) {
            warn!("Export failed: {}", e);
            alert_error(ALERT_CONTAINER, &e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pages_are_looked_up_by_name() {
        let prestiges = page("all_prestiges").unwrap();
        assert_eq!(prestiges.source.unwrap().path, "/all_prestiges");
        assert_eq!(prestiges.export_name, ExportName::Fixed("prestiges"));

        let session = page("session").unwrap();
        assert!(session.source.is_none());
        assert_eq!(session.export_name, ExportName::FromElement("sessionUuidValue"));

        assert!(page("dashboard").is_none());
    }

    #[test]
    fn statistics_export_keeps_its_short_name() {
        assert_eq!(
            page("statistics").unwrap().export_name,
            ExportName::Fixed("stats")
        );
    }
}
