//! Client tunables.
//!
//! Every period the dashboard relies on lives here. Defaults match the
//! server-rendered templates; a JSON object stored under [`CONFIG_KEY`] in
//! `localStorage` may override any subset of fields.

use std::sync::OnceLock;

use dioxus_logger::tracing::warn;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

pub const CONFIG_KEY: &str = "titandash.config.v1";

/// How often per-instance consumers re-check the active selection.
/// A switch can go unnoticed for at most this long; pushes for the new
/// instance that arrive inside that window are dropped.
pub const SELECTION_POLL_MS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Explicit server origin. `None` resolves from `window.location`.
    pub api_base: Option<String>,
    pub stopwatch_period_ms: u32,
    pub countdown_period_ms: u32,
    pub selection_poll_ms: u32,
    pub alert_dismiss_ms: u32,
    pub game_screen_poll_ms: u32,
    pub game_screen_clear_ms: u32,
    pub away_threshold_secs: u32,
    pub initial_instance_delay_ms: u32,
    pub initial_prestige_delay_ms: u32,
    /// Pad character for timer fields.
    pub timer_padding: Option<char>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            stopwatch_period_ms: 50,
            countdown_period_ms: 1000,
            selection_poll_ms: SELECTION_POLL_MS,
            alert_dismiss_ms: 2000,
            game_screen_poll_ms: 100,
            game_screen_clear_ms: 1500,
            away_threshold_secs: 1200,
            initial_instance_delay_ms: 400,
            initial_prestige_delay_ms: 1000,
            timer_padding: Some('0'),
        }
    }
}

impl DashboardConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        let mut config: Self =
            serde_json::from_str(raw).map_err(|e| DashboardError::Decode(e.to_string()))?;
        config.clamp_periods();
        Ok(config)
    }

    /// Zero periods would spin the event loop.
    fn clamp_periods(&mut self) {
        for period in [
            &mut self.stopwatch_period_ms,
            &mut self.countdown_period_ms,
            &mut self.selection_poll_ms,
            &mut self.game_screen_poll_ms,
        ] {
            *period = (*period).max(1);
        }
    }

    fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(CONFIG_KEY).ok().flatten());

        let Some(raw) = stored else {
            return Self::default();
        };

        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring stored dashboard config: {}", e);
                Self::default()
            }
        }
    }
}

static CONFIG_CACHE: OnceLock<DashboardConfig> = OnceLock::new();

/// Page-lifetime configuration, read from storage on first use.
pub fn config() -> &'static DashboardConfig {
    CONFIG_CACHE.get_or_init(DashboardConfig::load)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let config = DashboardConfig::from_json(r#"{"alert_dismiss_ms": 5000}"#).unwrap();
        assert_eq!(config.alert_dismiss_ms, 5000);
        assert_eq!(config.countdown_period_ms, 1000);
        assert_eq!(config.selection_poll_ms, SELECTION_POLL_MS);
        assert_eq!(config.timer_padding, Some('0'));
    }

    #[test]
    fn zero_periods_are_clamped() {
        let config = DashboardConfig::from_json(r#"{"stopwatch_period_ms": 0}"#).unwrap();
        assert_eq!(config.stopwatch_period_ms, 1);
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        assert!(matches!(
            DashboardConfig::from_json("{not json"),
            Err(DashboardError::Decode(_))
        ));
    }
}
