use std::sync::OnceLock;

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared_types::{
    GameScreenResponse, ImportResponse, InstanceId, InstanceSignal, InstanceSnapshot,
    InstanceSummary, KillResponse, PrestigeAverages, PrestigeListResponse, QueuedResponse,
    ReleaseResponse, StatusResponse, TableFragment,
};

use crate::config::config;
use crate::error::{DashboardError, Result};
use crate::feeds::AverageQuery;

/// Get the API base URL based on current environment
/// - An explicit `api_base` in the stored config wins
/// - In development (dx serve on localhost): use the Django dev server on :8000
/// - Otherwise: same origin (the server renders the host page)
fn get_api_base() -> String {
    if let Some(base) = config().api_base.as_ref() {
        return base.trim_end_matches('/').to_string();
    }

    let location = web_sys::window().map(|w| w.location());
    let hostname = location
        .as_ref()
        .and_then(|l| l.hostname().ok())
        .unwrap_or_default();
    let port = location
        .as_ref()
        .and_then(|l| l.port().ok())
        .unwrap_or_default();

    if matches!(hostname.as_str(), "localhost" | "127.0.0.1") && port == "8080" {
        "http://localhost:8000".to_string()
    } else {
        String::new()
    }
}

static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

/// Get the cached API base URL
pub fn api_base() -> &'static str {
    API_BASE_CACHE.get_or_init(get_api_base).as_str()
}

fn url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

async fn describe_http_error(response: Response) -> DashboardError {
    let status = response.status();
    let status_text = response.status_text();
    let body = response.text().await.unwrap_or_default();

    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .or_else(|| json.get("message"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .or_else(|| Some(status_text).filter(|text| !text.trim().is_empty()));

    let message = match detail {
        Some(detail) => format!("HTTP error: {status} ({detail})"),
        None => format!("HTTP error: {status}"),
    };
    DashboardError::Transport {
        status: Some(status),
        message,
    }
}

async fn send_json<T: DeserializeOwned>(request: Result<Request>) -> Result<T> {
    let response = request?
        .send()
        .await
        .map_err(|e| DashboardError::transport(format!("Request failed: {e}")))?;

    if !response.ok() {
        return Err(describe_http_error(response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| DashboardError::Decode(e.to_string()))
}

fn build(builder: RequestBuilder) -> Result<Request> {
    builder
        .build()
        .map_err(|e| DashboardError::transport(format!("Request failed: {e}")))
}

async fn get_json<T, V>(path: &str, params: &[(&str, V)]) -> Result<T>
where
    T: DeserializeOwned,
    V: AsRef<str>,
{
    let builder = Request::get(&url(path))
        .query(params.iter().map(|(k, v)| (*k, v.as_ref())))
        .header("X-Requested-With", "XMLHttpRequest");
    send_json(build(builder)).await
}

async fn post_form<T: DeserializeOwned>(path: &str, body: String) -> Result<T> {
    let request = Request::post(&url(path))
        .header("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
        .header("X-Requested-With", "XMLHttpRequest")
        .body(body)
        .map_err(|e| DashboardError::transport(format!("Request failed: {e}")));
    send_json(request).await
}

/// Turn `status: error` into an application error.
pub fn check_status(reply: StatusResponse) -> Result<StatusResponse> {
    if reply.is_error() {
        return Err(DashboardError::application(
            reply.message.unwrap_or_default(),
        ));
    }
    Ok(reply)
}

const NO_PARAMS: &[(&str, &str)] = &[];

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

pub async fn fetch_instance(instance: InstanceId) -> Result<InstanceSnapshot> {
    get_json(
        "/ajax/bot_instance/get",
        &[("instance", instance.to_string())],
    )
    .await
}

/// Fire-and-forget; the resulting state arrives with the next snapshot.
pub async fn send_signal(
    signal: InstanceSignal,
    instance: InstanceId,
    configuration: Option<&str>,
    window: Option<&str>,
) -> Result<()> {
    let mut params = vec![
        ("signal", signal.as_str().to_string()),
        ("instance", instance.to_string()),
    ];
    if signal == InstanceSignal::Play {
        if let Some(configuration) = configuration {
            params.push(("config", configuration.to_string()));
        }
        if let Some(window) = window {
            params.push(("window", window.to_string()));
        }
    }

    let builder = Request::get(&url("/ajax/signal"))
        .query(params.iter().map(|(k, v)| (*k, v.as_str())))
        .header("X-Requested-With", "XMLHttpRequest");
    let response = build(builder)?
        .send()
        .await
        .map_err(|e| DashboardError::transport(format!("Request failed: {e}")))?;
    if !response.ok() {
        return Err(describe_http_error(response).await);
    }
    Ok(())
}

pub async fn fetch_game_screen(instance: InstanceId) -> Result<GameScreenResponse> {
    get_json("/ajax/game_screen", &[("instance", instance.to_string())]).await
}

pub async fn fetch_prestiges(instance: InstanceId) -> Result<PrestigeListResponse> {
    get_json(
        "/ajax/prestige",
        &[
            ("type", "PRESTIGES".to_string()),
            ("instance", instance.to_string()),
        ],
    )
    .await
}

pub async fn fetch_prestige_averages(query: AverageQuery) -> Result<PrestigeAverages> {
    get_json("/ajax/prestige", &query.params()).await
}

pub async fn queue_function(function: &str, instance: InstanceId) -> Result<QueuedResponse> {
    get_json(
        "/ajax/generate_queued",
        &[
            ("function", function.to_string()),
            ("instance", instance.to_string()),
        ],
    )
    .await
}

pub async fn create_instance() -> Result<InstanceSummary> {
    get_json("/ajax/instances/create", NO_PARAMS).await
}

pub async fn remove_instance(id: InstanceId) -> Result<()> {
    let reply: StatusResponse =
        get_json("/ajax/instances/remove", &[("id", id.to_string())]).await?;
    check_status(reply).map(|_| ())
}

pub async fn kill_instance(instance: InstanceId) -> Result<KillResponse> {
    get_json(
        "/ajax/bot_instance/kill",
        &[("instance", instance.to_string())],
    )
    .await
}

pub async fn fetch_release() -> Result<ReleaseResponse> {
    get_json("/ajax/release", NO_PARAMS).await
}

pub async fn change_theme(theme: &str) -> Result<StatusResponse> {
    get_json("/ajax/theme_change", &[("theme", theme)]).await
}

// ---------------------------------------------------------------------------
// Server-rendered pages
// ---------------------------------------------------------------------------

pub async fn submit_credentials(form: String) -> Result<StatusResponse> {
    post_form("/auth/ajax/credentials", form).await
}

pub async fn open_log(log: &str) -> Result<StatusResponse> {
    get_json("/ajax/open_log", &[("log", log)]).await
}

pub async fn update_token(token: &str) -> Result<StatusResponse> {
    get_json("/ajax/update_token", &[("token", token)]).await
}

pub async fn save_configuration(form: String) -> Result<StatusResponse> {
    post_form("/configurations/save/", form).await
}

pub async fn delete_configuration(id: &str) -> Result<StatusResponse> {
    get_json("/configurations/delete/", &[("id", id)]).await
}

pub async fn import_configuration(import_string: &str) -> Result<ImportResponse> {
    get_json("/configurations/import/", &[("importString", import_string)]).await
}

pub async fn save_globals(form: String) -> Result<StatusResponse> {
    post_form("/globals/save/", form).await
}

/// `GET /<page>?instance=&context=true` for the data table pages.
pub async fn fetch_table(path: &str, instance: &str) -> Result<TableFragment> {
    get_json(path, &[("instance", instance), ("context", "true")]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_becomes_application_error() {
        let reply = StatusResponse {
            status: "error".to_string(),
            message: Some("Invalid token".to_string()),
        };
        assert_eq!(
            check_status(reply),
            Err(DashboardError::application("Invalid token"))
        );
    }

    #[test]
    fn success_status_passes_through() {
        let reply = StatusResponse {
            status: "success".to_string(),
            message: None,
        };
        assert!(check_status(reply).is_ok());
    }
}
