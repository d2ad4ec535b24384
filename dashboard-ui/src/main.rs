use dioxus::launch;
use dioxus::prelude::*;
use dioxus_logger::tracing::Level;

use dashboard_ui::dom::page_name;
use dashboard_ui::{controllers, Dashboard};

const DASHBOARD_PAGE: &str = "dashboard";

fn main() {
    console_error_panic_hook::set_once();
    // Initialize logging for WASM
    wasm_logger::init(wasm_logger::Config::default());
    dioxus_logger::init(Level::INFO).ok();

    let page = page_name().unwrap_or_default();
    controllers::bind(&page);
    if page == DASHBOARD_PAGE {
        launch(App);
    }
}

#[component]
fn App() -> Element {
    rsx! {
        Dashboard {}
    }
}
