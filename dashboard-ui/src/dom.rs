//! Small helpers for binding to server-rendered markup.

use gloo_timers::callback::{Interval, Timeout};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement,
};

use crate::alerts::AlertLevel;
use crate::config::config;
use crate::error::{DashboardError, Result};

pub fn web_document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

pub fn element(id: &str) -> Option<Element> {
    web_document().and_then(|doc| doc.get_element_by_id(id))
}

pub fn require(id: &str) -> Result<Element> {
    element(id).ok_or_else(|| DashboardError::Dom(id.to_string()))
}

pub fn typed<T: JsCast>(id: &str) -> Option<T> {
    element(id).and_then(|node| node.dyn_into::<T>().ok())
}

/// Write text only when it differs from what is shown.
pub fn set_text(id: &str, value: impl AsRef<str>) {
    let Some(node) = element(id) else {
        return;
    };
    let next = value.as_ref();
    if node.text_content().as_deref() == Some(next) {
        return;
    }
    node.set_text_content(Some(next));
}

pub fn set_html(id: &str, html: &str) {
    if let Some(node) = element(id) {
        node.set_inner_html(html);
    }
}

pub fn set_class(id: &str, class_name: &str) {
    if let Some(node) = element(id) {
        node.set_class_name(class_name);
    }
}

pub fn set_hidden(id: &str, hidden: bool) {
    if let Some(node) = typed::<HtmlElement>(id) {
        node.set_hidden(hidden);
    }
}

pub fn set_disabled(node: &Element, disabled: bool) {
    if disabled {
        let _ = node.set_attribute("disabled", "");
    } else {
        let _ = node.remove_attribute("disabled");
    }
}

pub fn input_value(id: &str) -> String {
    if let Some(input) = typed::<HtmlInputElement>(id) {
        return input.value();
    }
    if let Some(select) = typed::<HtmlSelectElement>(id) {
        return select.value();
    }
    typed::<HtmlTextAreaElement>(id)
        .map(|area| area.value())
        .unwrap_or_default()
}

pub fn data_attr(node: &Element, name: &str) -> Option<String> {
    node.get_attribute(&format!("data-{name}"))
        .filter(|value| !value.trim().is_empty())
}

/// `data-page` on `<body>`; picks which controller binds the page.
pub fn page_name() -> Option<String> {
    web_document()
        .and_then(|doc| doc.body())
        .and_then(|body| data_attr(&body, "page"))
}

/// Attach `handler` to `event` on `node` for the page lifetime.
pub fn listen<F>(node: &Element, event: &str, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let _ = node.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
    callback.forget();
}

/// The element a listener is attached to.
pub fn current_element(event: &Event) -> Option<Element> {
    event
        .current_target()
        .and_then(|target| target.dyn_into::<Element>().ok())
}

/// The nearest ancestor of the event target matching `selector`.
pub fn closest_target(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|node| node.closest(selector).ok().flatten())
}

pub fn on(id: &str, event: &str, handler: impl FnMut(Event) + 'static) {
    if let Some(node) = element(id) {
        listen(&node, event, handler);
    }
}

/// Bind `handler` to every element matching `selector`.
pub fn on_all<F>(selector: &str, event: &str, handler: F)
where
    F: Fn(Element, Event) + Clone + 'static,
{
    let Some(nodes) = web_document().and_then(|doc| doc.query_selector_all(selector).ok()) else {
        return;
    };
    for idx in 0..nodes.length() {
        let Some(node) = nodes.item(idx).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let handler = handler.clone();
        let target = node.clone();
        listen(&node, event, move |e| handler(target.clone(), e));
    }
}

/// Button caption that grows one dot per step and wraps after `max` dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingDots {
    base: &'static str,
    max: usize,
    count: usize,
}

impl LoadingDots {
    pub fn new(base: &'static str, max: usize) -> Self {
        Self {
            base,
            max: max.max(1),
            count: 0,
        }
    }

    pub fn text(&self) -> String {
        format!("{}{}", self.base, ".".repeat(self.count))
    }

    pub fn step(&mut self) -> String {
        self.count += 1;
        if self.count >= self.max {
            self.count = 0;
        }
        self.text()
    }
}

/// Disable `node` and animate `dots` on it until the returned interval is dropped.
pub fn animate_button(node: &Element, mut dots: LoadingDots, period_ms: u32) -> Interval {
    set_disabled(node, true);
    node.set_text_content(Some(&dots.text()));
    let target = node.clone();
    Interval::new(period_ms, move || {
        target.set_text_content(Some(&dots.step()));
    })
}

/// Stop an [`animate_button`] animation and restore the caption.
pub fn restore_button(node: &Element, animation: Interval, caption: &str) {
    drop(animation);
    node.set_text_content(Some(caption));
    set_disabled(node, false);
}

pub fn encode_component(input: &str) -> String {
    js_sys::encode_uri_component(input)
        .as_string()
        .unwrap_or_else(|| input.to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormEncoding {
    /// Send every checkbox as `true`/`false` instead of omitting unchecked ones.
    pub checkbox_flags: bool,
}

pub fn form_pairs(form: &HtmlFormElement, encoding: FormEncoding) -> Vec<(String, String)> {
    let mut pairs = Vec::<(String, String)>::new();
    let elements = form.elements();

    for idx in 0..elements.length() {
        let Some(element) = elements.item(idx) else {
            continue;
        };

        let name = element.get_attribute("name").unwrap_or_default();
        if name.trim().is_empty() {
            continue;
        }

        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            let kind = input.type_().to_ascii_lowercase();
            if matches!(kind.as_str(), "submit" | "button" | "reset" | "file" | "image") {
                continue;
            }
            if kind == "checkbox" && encoding.checkbox_flags {
                pairs.push((name, input.checked().to_string()));
                continue;
            }
            if matches!(kind.as_str(), "checkbox" | "radio") && !input.checked() {
                continue;
            }
            pairs.push((name, input.value()));
            continue;
        }

        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            pairs.push((name, select.value()));
            continue;
        }

        if let Some(textarea) = element.dyn_ref::<HtmlTextAreaElement>() {
            pairs.push((name, textarea.value()));
        }
    }

    pairs
}

pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn serialize_form_urlencoded(form: &HtmlFormElement) -> String {
    encode_pairs(&form_pairs(form, FormEncoding::default()))
}

/// Prepend a transient alert to `container_id`, removed after the configured delay.
pub fn send_alert(container_id: &str, message: &str, level: AlertLevel) {
    let Some(doc) = web_document() else {
        return;
    };
    let Some(container) = doc.get_element_by_id(container_id) else {
        return;
    };
    let Ok(alert) = doc.create_element("div") else {
        return;
    };
    alert.set_class_name(level.css_class());
    let _ = alert.set_attribute("role", "alert");
    alert.set_text_content(Some(message));
    let _ = container.prepend_with_node_1(&alert);

    Timeout::new(config().alert_dismiss_ms, move || alert.remove()).forget();
}

pub fn redirect(path: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(path);
    }
}

pub fn reload() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Select the text of an input or textarea and copy it to the clipboard.
pub fn copy_field(id: &str) {
    let value = input_value(id);
    if let Some(input) = typed::<HtmlInputElement>(id) {
        input.select();
    } else if let Some(area) = typed::<HtmlTextAreaElement>(id) {
        area.select();
    }
    if let Some(window) = web_sys::window() {
        let _ = window.navigator().clipboard().write_text(&value);
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount(tag: &str, id: &str) -> Element {
        let doc = web_document().unwrap();
        let node = doc.create_element(tag).unwrap();
        node.set_id(id);
        doc.body().unwrap().append_child(&node).unwrap();
        node
    }

    #[wasm_bindgen_test]
    fn form_values_are_uri_encoded() {
        let pairs = vec![
            ("name".to_string(), "a b&c".to_string()),
            ("key".to_string(), "7".to_string()),
        ];
        assert_eq!(encode_pairs(&pairs), "name=a%20b%26c&key=7");
    }

    #[wasm_bindgen_test]
    fn set_text_writes_into_the_element() {
        let node = mount("span", "domTestText");
        set_text("domTestText", "READY...");
        assert_eq!(node.text_content().as_deref(), Some("READY..."));
        node.remove();
    }

    #[wasm_bindgen_test]
    fn animated_button_is_restored() {
        let node = mount("button", "domTestButton");
        let animation = animate_button(&node, LoadingDots::new("Saving", 3), 250);
        assert!(node.has_attribute("disabled"));
        assert_eq!(node.text_content().as_deref(), Some("Saving"));

        restore_button(&node, animation, "Save");
        assert!(!node.has_attribute("disabled"));
        assert_eq!(node.text_content().as_deref(), Some("Save"));
        node.remove();
    }
}
