//! JSON download helpers.

use serde_json::Value;
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

use crate::dom::{encode_component, web_document};
use crate::error::{DashboardError, Result};

pub const JSON_DATA_PREFIX: &str = "data:application/json;charset=utf-8,";

pub fn export_file_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        "export.json".to_string()
    } else {
        format!("{name}.json")
    }
}

pub fn json_data_uri(value: &Value) -> String {
    format!("{JSON_DATA_PREFIX}{}", encode_component(&value.to_string()))
}

/// Download `value` as `<name>.json` through a temporary anchor.
pub fn export_to_json_file(value: &Value, name: &str) -> Result<()> {
    let doc = web_document().ok_or_else(|| DashboardError::Dom("document".to_string()))?;
    let anchor = doc
        .create_element("a")
        .ok()
        .and_then(|node| node.dyn_into::<HtmlAnchorElement>().ok())
        .ok_or_else(|| DashboardError::Dom("a".to_string()))?;

    anchor.set_href(&json_data_uri(value));
    anchor.set_download(&export_file_name(name));
    let body = doc
        .body()
        .ok_or_else(|| DashboardError::Dom("body".to_string()))?;
    let _ = body.append_child(&anchor);
    anchor.click();
    anchor.remove();
    Ok(())
}

/// Export the JSON stored in `data-json` on `element_id`.
pub fn export_embedded_json(element_id: &str, name: &str) -> Result<()> {
    let node = crate::dom::require(element_id)?;
    let raw = node.get_attribute("data-json").unwrap_or_default();
    let value: Value =
        serde_json::from_str(&raw).map_err(|e| DashboardError::Decode(e.to_string()))?;
    export_to_json_file(&value, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_get_json_extension() {
        assert_eq!(export_file_name("prestiges"), "prestiges.json");
        assert_eq!(export_file_name("  "), "export.json");
    }
}
