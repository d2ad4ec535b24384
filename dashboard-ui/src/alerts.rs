//! Transient alert banners.

use dioxus::prelude::*;
use dioxus::signals::GlobalSignal;
use dioxus_logger::tracing::error;
use gloo_timers::future::TimeoutFuture;
use shared_types::InstanceSignal;

use crate::config::config;
use crate::error::DashboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertLevel {
    /// Map a server `status` string. Unknown values are informational.
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "success" => AlertLevel::Success,
            "warning" => AlertLevel::Warning,
            "danger" | "error" => AlertLevel::Danger,
            _ => AlertLevel::Info,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            AlertLevel::Success => "alert alert-success",
            AlertLevel::Info => "alert alert-info",
            AlertLevel::Warning => "alert alert-warning",
            AlertLevel::Danger => "alert alert-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub id: u64,
    pub level: AlertLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertCenter {
    next_id: u64,
    alerts: Vec<Alert>,
}

impl AlertCenter {
    pub fn push(&mut self, level: AlertLevel, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.alerts.push(Alert {
            id,
            level,
            message: message.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.id != id);
        self.alerts.len() != before
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }
}

/// Alerts shown by the dashboard's `AlertStack`.
pub static ALERTS: GlobalSignal<AlertCenter> = GlobalSignal::new(AlertCenter::default);

/// Show an alert and dismiss it after the configured delay.
/// Must run inside the Dioxus runtime (event handlers or spawned tasks).
pub fn notify(level: AlertLevel, message: impl Into<String>) {
    let id = ALERTS.write().push(level, message);
    let delay = config().alert_dismiss_ms;
    dioxus::core::spawn_forever(async move {
        TimeoutFuture::new(delay).await;
        ALERTS.write().dismiss(id);
    });
}

/// Log `err` and surface it as a danger alert.
pub fn notify_error(context: &str, err: &DashboardError) {
    error!("{}: {}", context, err);
    notify(AlertLevel::Danger, err.alert_message());
}

pub fn signal_sent_message(signal: InstanceSignal) -> String {
    format!("{} SIGNAL HAS BEEN SUCCESSFULLY SENT...", signal.as_str())
}
