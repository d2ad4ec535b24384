use dioxus_logger::tracing::warn;

use crate::alerts::notify_error;
use crate::api::{change_theme, check_status};
use crate::dom::reload;

pub const DEFAULT_THEME: &str = "default";
const THEME_KEY: &str = "titandash.theme";

/// Only names the server offered are applied.
pub fn is_known_theme(theme: &str, themes: &[String]) -> bool {
    themes.iter().any(|known| known == theme)
}

pub fn get_cached_theme_preference() -> Option<String> {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(THEME_KEY).ok().flatten())
}

pub fn set_cached_theme_preference(theme: &str) {
    if let Some(storage) =
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    {
        let _ = storage.set_item(THEME_KEY, theme);
    }
}

/// Themes are stylesheets rendered by the server, so a change reloads the page.
pub async fn persist_theme(theme: String, themes: Vec<String>) {
    if !is_known_theme(&theme, &themes) {
        warn!("Ignoring unknown theme {}", theme);
        return;
    }
    match change_theme(&theme).await.and_then(check_status) {
        Ok(_) => {
            set_cached_theme_preference(&theme);
            reload();
        }
        Err(e) => notify_error("Failed to change theme", &e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_offered_themes_are_known() {
        let themes = vec!["default".to_string(), "dark".to_string()];
        assert!(is_known_theme("dark", &themes));
        assert!(!is_known_theme("neon", &themes));
    }
}
