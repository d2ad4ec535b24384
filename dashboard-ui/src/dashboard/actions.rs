use dioxus::prelude::*;
use dioxus_logger::tracing::{info, warn};
use shared_types::{InstanceId, InstanceSignal};

use crate::alerts::{notify, notify_error, signal_sent_message, AlertLevel};
use crate::api::{create_instance, kill_instance, queue_function, remove_instance, send_signal};
use crate::dashboard::state::DashboardState;
use crate::feeds::queued_alert;
use crate::instance::{selected_choice, Field};
use crate::selection::ACTIVE_INSTANCE;

fn active_instance() -> Option<InstanceId> {
    *ACTIVE_INSTANCE.peek()
}

/// Fire a control signal. The confirmation is shown right away; the state
/// change itself arrives with a later snapshot.
pub fn signal_instance(signal: InstanceSignal, state: DashboardState) {
    let Some(instance) = active_instance() else {
        warn!("No active instance to send {} to", signal.as_str());
        return;
    };
    let (configuration, window) = {
        let view = state.view.peek();
        (
            selected_choice(
                &view,
                Field::ConfigurationChoice,
                state.configuration_choice.peek().clone(),
            ),
            selected_choice(&view, Field::WindowChoice, state.window_choice.peek().clone()),
        )
    };

    notify(AlertLevel::Success, signal_sent_message(signal));
    spawn(async move {
        if let Err(e) = send_signal(
            signal,
            instance,
            configuration.as_deref(),
            window.as_deref(),
        )
        .await
        {
            notify_error("Failed to send signal", &e);
        }
    });
}

pub async fn queue_function_action(function: String) {
    let Some(instance) = active_instance() else {
        return;
    };
    match queue_function(&function, instance).await {
        Ok(reply) => notify(AlertLevel::Success, queued_alert(&reply.function)),
        Err(e) => notify_error("Failed to queue function", &e),
    }
}

pub async fn create_instance_action(mut state: DashboardState) {
    match create_instance().await {
        Ok(summary) => {
            info!("Created instance {} ({})", summary.id, summary.name);
            let id = summary.id;
            if state.rows.write().insert(summary) {
                *ACTIVE_INSTANCE.write() = Some(id);
            }
        }
        Err(e) => notify_error("Failed to create instance", &e),
    }
}

pub fn select_instance_action(id: InstanceId, mut state: DashboardState) {
    match state.rows.write().select(id) {
        Ok(true) => *ACTIVE_INSTANCE.write() = Some(id),
        Ok(false) => {}
        Err(e) => warn!("Cannot select instance: {}", e),
    }
}

pub async fn remove_instance_action(id: InstanceId, mut state: DashboardState) {
    if state.rows.peek().is_selected(id) {
        warn!("Refusing to remove the selected instance {}", id);
        return;
    }
    match remove_instance(id).await {
        Ok(()) => {
            if let Err(e) = state.rows.write().remove(id) {
                warn!("Instance row already gone: {}", e);
            }
        }
        Err(e) => notify_error("Failed to remove instance", &e),
    }
}

pub async fn kill_instance_action() {
    let Some(instance) = active_instance() else {
        return;
    };
    match kill_instance(instance).await {
        Ok(reply) => notify(AlertLevel::from_status(&reply.status), reply.message),
        Err(e) => notify_error("Failed to kill instance", &e),
    }
}
