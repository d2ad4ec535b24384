//! Shared wire types for the TitanDash dashboard client
//!
//! These types describe the JSON the dashboard server hands out over:
//! - ajax endpoints (`/ajax/...`, `/configurations/...`, table pages)
//! - topic-scoped push channels (`/ws/instance/`, `/ws/log/`, `/ws/prestige/`, `/ws/queued/`)
//!
//! Everything here is plain serde data so it can be unit tested natively.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder the server sends in place of a missing record.
pub const NOT_AVAILABLE: &str = "N/A";

// ============================================================================
// Core Types
// ============================================================================

/// Primary key of a bot instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct InstanceId(pub i64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a bot instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceState {
    Running,
    Paused,
    Stopped,
}

impl InstanceState {
    /// RUNNING and PAUSED count as "active"; only STOPPED is inactive.
    pub fn is_active(self) -> bool {
        matches!(self, InstanceState::Running | InstanceState::Paused)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstanceState::Running => "RUNNING",
            InstanceState::Paused => "PAUSED",
            InstanceState::Stopped => "STOPPED",
        }
    }
}

/// Signals a user can send to an instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstanceSignal {
    Play,
    Pause,
    Stop,
}

impl InstanceSignal {
    pub const ALL: [InstanceSignal; 3] = [
        InstanceSignal::Play,
        InstanceSignal::Pause,
        InstanceSignal::Stop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InstanceSignal::Play => "PLAY",
            InstanceSignal::Pause => "PAUSE",
            InstanceSignal::Stop => "STOP",
        }
    }
}

// ============================================================================
// Instance Snapshot
// ============================================================================

/// A server timestamp pair: raw value used for timers plus a display string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timestamp {
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRef {
    pub uuid: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentFunction {
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentStage {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stage: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub diff_from_max: Option<i64>,
    #[serde(default)]
    pub percent_from_max: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NextArtifactUpgrade {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigurationRef {
    pub id: i64,
    #[serde(default)]
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowRef {
    #[serde(default)]
    pub hwnd: i64,
    #[serde(default)]
    pub formatted: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrestigeTimestamp {
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub formatted: String,
    #[serde(default)]
    pub epoch: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrestigeDuration {
    #[serde(default)]
    pub formatted: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrestigeSession {
    pub uuid: String,
    #[serde(default)]
    pub uuid_short: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One prestige, as pushed on `/ws/prestige/` and listed by `/ajax/prestige`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrestigeRecord {
    #[serde(default)]
    pub timestamp: PrestigeTimestamp,
    #[serde(default)]
    pub duration: PrestigeDuration,
    #[serde(default, deserialize_with = "na_option")]
    pub artifact: Option<ArtifactRef>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stage: Option<i64>,
    #[serde(default)]
    pub session: Option<PrestigeSession>,
}

/// Every countdown an instance schedules. The variant order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CountdownKey {
    RaidAttackReset,
    NextBreak,
    ResumeFromBreak,
    NextMasterLevel,
    NextHeroesLevel,
    NextSkillsLevel,
    NextSkillsActivation,
    NextMiscellaneousActions,
    NextPrestige,
    NextRandomizedPrestige,
    NextStatsUpdate,
    NextDailyAchievementCheck,
    NextMilestoneCheck,
    NextRaidNotificationsCheck,
    NextClanResultsParse,
    NextHeavenlyStrike,
    NextDeadlyStrike,
    NextHandOfMidas,
    NextFireSword,
    NextWarCry,
    NextShadowClone,
}

impl CountdownKey {
    pub const ALL: [CountdownKey; 21] = [
        CountdownKey::RaidAttackReset,
        CountdownKey::NextBreak,
        CountdownKey::ResumeFromBreak,
        CountdownKey::NextMasterLevel,
        CountdownKey::NextHeroesLevel,
        CountdownKey::NextSkillsLevel,
        CountdownKey::NextSkillsActivation,
        CountdownKey::NextMiscellaneousActions,
        CountdownKey::NextPrestige,
        CountdownKey::NextRandomizedPrestige,
        CountdownKey::NextStatsUpdate,
        CountdownKey::NextDailyAchievementCheck,
        CountdownKey::NextMilestoneCheck,
        CountdownKey::NextRaidNotificationsCheck,
        CountdownKey::NextClanResultsParse,
        CountdownKey::NextHeavenlyStrike,
        CountdownKey::NextDeadlyStrike,
        CountdownKey::NextHandOfMidas,
        CountdownKey::NextFireSword,
        CountdownKey::NextWarCry,
        CountdownKey::NextShadowClone,
    ];

    /// JSON field carrying this countdown in an instance snapshot.
    pub fn field_name(self) -> &'static str {
        match self {
            CountdownKey::RaidAttackReset => "next_raid_attack_reset",
            CountdownKey::NextBreak => "next_break",
            CountdownKey::ResumeFromBreak => "resume_from_break",
            CountdownKey::NextMasterLevel => "next_master_level",
            CountdownKey::NextHeroesLevel => "next_heroes_level",
            CountdownKey::NextSkillsLevel => "next_skills_level",
            CountdownKey::NextSkillsActivation => "next_skills_activation",
            CountdownKey::NextMiscellaneousActions => "next_miscellaneous_actions",
            CountdownKey::NextPrestige => "next_prestige",
            CountdownKey::NextRandomizedPrestige => "next_randomized_prestige",
            CountdownKey::NextStatsUpdate => "next_stats_update",
            CountdownKey::NextDailyAchievementCheck => "next_daily_achievement_check",
            CountdownKey::NextMilestoneCheck => "next_milestone_check",
            CountdownKey::NextRaidNotificationsCheck => "next_raid_notifications_check",
            CountdownKey::NextClanResultsParse => "next_clan_results_parse",
            CountdownKey::NextHeavenlyStrike => "next_heavenly_strike",
            CountdownKey::NextDeadlyStrike => "next_deadly_strike",
            CountdownKey::NextHandOfMidas => "next_hand_of_midas",
            CountdownKey::NextFireSword => "next_fire_sword",
            CountdownKey::NextWarCry => "next_war_cry",
            CountdownKey::NextShadowClone => "next_shadow_clone",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CountdownKey::RaidAttackReset => "Raid Attack Reset",
            CountdownKey::NextBreak => "Next Break",
            CountdownKey::ResumeFromBreak => "Break Resume",
            CountdownKey::NextMasterLevel => "Next Master Level",
            CountdownKey::NextHeroesLevel => "Next Heroes Level",
            CountdownKey::NextSkillsLevel => "Next Skills Level",
            CountdownKey::NextSkillsActivation => "Next Skills Activation",
            CountdownKey::NextMiscellaneousActions => "Next Miscellaneous Actions",
            CountdownKey::NextPrestige => "Next Prestige",
            CountdownKey::NextRandomizedPrestige => "Next Randomized Prestige",
            CountdownKey::NextStatsUpdate => "Next Stats Update",
            CountdownKey::NextDailyAchievementCheck => "Next Daily Achievement Check",
            CountdownKey::NextMilestoneCheck => "Next Milestone Check",
            CountdownKey::NextRaidNotificationsCheck => "Next Raid Notifications Check",
            CountdownKey::NextClanResultsParse => "Next Clan Results Parse",
            CountdownKey::NextHeavenlyStrike => "Next Heavenly Strike",
            CountdownKey::NextDeadlyStrike => "Next Deadly Strike",
            CountdownKey::NextHandOfMidas => "Next Hand Of Midas",
            CountdownKey::NextFireSword => "Next Fire Sword",
            CountdownKey::NextWarCry => "Next War Cry",
            CountdownKey::NextShadowClone => "Next Shadow Clone",
        }
    }
}

/// Point-in-time description of one instance, from `/ajax/bot_instance/get` or `/ws/instance/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceSnapshot {
    pub id: InstanceId,
    #[serde(default)]
    pub name: String,
    pub state: InstanceState,
    #[serde(default)]
    pub started: Timestamp,
    #[serde(default)]
    pub current_function: CurrentFunction,
    #[serde(default, deserialize_with = "na_option")]
    pub last_prestige: Option<PrestigeRecord>,
    #[serde(default, deserialize_with = "na_option")]
    pub log_file: Option<String>,
    #[serde(default)]
    pub current_stage: CurrentStage,
    #[serde(default)]
    pub next_artifact_upgrade: NextArtifactUpgrade,
    #[serde(default)]
    pub session: Option<SessionRef>,
    #[serde(default)]
    pub configuration: Option<ConfigurationRef>,
    #[serde(default)]
    pub window: Option<WindowRef>,
    /// Named next-event timestamps, keyed by `CountdownKey::field_name`.
    #[serde(flatten)]
    pub schedule: serde_json::Map<String, Value>,
}

impl InstanceSnapshot {
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Raw timestamp for a countdown, `None` when unscheduled.
    pub fn countdown(&self, key: CountdownKey) -> Option<&str> {
        self.schedule
            .get(key.field_name())
            .and_then(|v| v.get("datetime"))
            .and_then(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }
}

// ============================================================================
// Queue / Log Payloads
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueuedFunction {
    pub id: i64,
    #[serde(default)]
    pub function: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogRecord {
    pub message: String,
}

// ============================================================================
// Push Channels
// ============================================================================

/// A socket topic. Each topic owns one endpoint and one envelope key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PushTopic {
    Instance,
    Log,
    Prestige,
    Queued,
}

impl PushTopic {
    pub fn path(self) -> &'static str {
        match self {
            PushTopic::Instance => "/ws/instance/",
            PushTopic::Log => "/ws/log/",
            PushTopic::Prestige => "/ws/prestige/",
            PushTopic::Queued => "/ws/queued/",
        }
    }

    /// Key of the outer envelope object; the inner payload uses the same key.
    pub fn envelope_key(self) -> &'static str {
        match self {
            PushTopic::Instance => "instance",
            PushTopic::Log => "record",
            PushTopic::Prestige => "prestige",
            PushTopic::Queued => "queued",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueEventKind {
    Saved,
    Finished,
}

/// A decoded push message, still tagged with the instance it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    Instance {
        instance_id: InstanceId,
        snapshot: Box<InstanceSnapshot>,
    },
    Log {
        instance_id: InstanceId,
        record: LogRecord,
    },
    Prestige {
        instance_id: InstanceId,
        prestige: Box<PrestigeRecord>,
    },
    Queued {
        instance_id: InstanceId,
        kind: QueueEventKind,
        queued: QueuedFunction,
    },
}

impl PushMessage {
    pub fn instance_id(&self) -> InstanceId {
        match self {
            PushMessage::Instance { instance_id, .. }
            | PushMessage::Log { instance_id, .. }
            | PushMessage::Prestige { instance_id, .. }
            | PushMessage::Queued { instance_id, .. } => *instance_id,
        }
    }
}

/// Decode one text frame received on `topic`. Malformed frames yield `None`.
pub fn parse_push(topic: PushTopic, payload: &str) -> Option<PushMessage> {
    let json = serde_json::from_str::<Value>(payload).ok()?;
    let key = topic.envelope_key();
    let envelope = json.get(key)?;
    let instance_id = InstanceId(envelope.get("instance_id")?.as_i64()?);
    let inner = envelope.get(key)?.clone();

    match topic {
        PushTopic::Instance => serde_json::from_value::<InstanceSnapshot>(inner)
            .ok()
            .map(|snapshot| PushMessage::Instance {
                instance_id,
                snapshot: Box::new(snapshot),
            }),
        PushTopic::Log => serde_json::from_value::<LogRecord>(inner)
            .ok()
            .map(|record| PushMessage::Log {
                instance_id,
                record,
            }),
        PushTopic::Prestige => serde_json::from_value::<PrestigeRecord>(inner)
            .ok()
            .map(|prestige| PushMessage::Prestige {
                instance_id,
                prestige: Box::new(prestige),
            }),
        PushTopic::Queued => {
            let kind = match json.get("type").and_then(|v| v.as_str())? {
                "saved" => QueueEventKind::Saved,
                "finished" => QueueEventKind::Finished,
                _ => return None,
            };
            serde_json::from_value::<QueuedFunction>(inner)
                .ok()
                .map(|queued| PushMessage::Queued {
                    instance_id,
                    kind,
                    queued,
                })
        }
    }
}

// ============================================================================
// Ajax Responses
// ============================================================================

/// `{status, message?}` reply used by most mutating endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceSummary {
    pub id: InstanceId,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PrestigeListResponse {
    #[serde(default)]
    pub prestiges: Vec<PrestigeRecord>,
    #[serde(default, rename = "avgPrestigeTime")]
    pub avg_prestige_time: Option<String>,
    #[serde(default, rename = "avgPrestigeStage", deserialize_with = "lenient_i64")]
    pub avg_prestige_stage: Option<i64>,
    #[serde(default, rename = "lastArtifact")]
    pub last_artifact: Option<ArtifactRef>,
    #[serde(default, rename = "totalPrestiges")]
    pub total_prestiges: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrestigeAverages {
    #[serde(default, rename = "avgPrestigeTime")]
    pub avg_prestige_time: String,
    #[serde(default, rename = "avgPrestigeStage", deserialize_with = "lenient_i64")]
    pub avg_prestige_stage: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameScreenResponse {
    #[serde(default)]
    pub src: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueuedResponse {
    #[serde(default)]
    pub status: Option<String>,
    pub function: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KillResponse {
    #[serde(default)]
    pub killed: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseNotes {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub release: Option<ReleaseNotes>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `{table: <html fragment>}` returned by the data table pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableFragment {
    #[serde(default)]
    pub table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportedConfiguration {
    pub pk: i64,
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub export: String,
    #[serde(default)]
    pub created: Option<Value>,
    #[serde(default)]
    pub updated: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub config: Option<ImportedConfiguration>,
}

// ============================================================================
// Dashboard Bootstrap
// ============================================================================

/// One `<option>` of a server-provided selector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChoiceOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

/// A function the user may queue against an instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueableFunction {
    pub function: String,
    #[serde(default)]
    pub title: String,
}

/// Initial dashboard data embedded in the host page as `#dashboardBootstrap[data-json]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardBootstrap {
    pub instances: Vec<InstanceSummary>,
    pub active: Option<InstanceId>,
    pub configurations: Vec<ChoiceOption>,
    pub windows: Vec<ChoiceOption>,
    pub queueable: Vec<QueueableFunction>,
    pub themes: Vec<String>,
    pub theme: Option<String>,
}

impl DashboardBootstrap {
    /// Parse the embedded JSON; anything malformed yields an empty dashboard.
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse a server timestamp. Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS[.f]+HH:MM` form.
pub fn parse_server_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Treat JSON `null` and the `"N/A"` marker as `None`.
fn na_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::String(ref s) if s == NOT_AVAILABLE => Ok(None),
        other => serde_json::from_value(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot_json() -> Value {
        json!({
            "id": 3,
            "name": "Titandash Instance 3",
            "state": "RUNNING",
            "started": {"datetime": "2020-01-01 10:00:00.000000+00:00", "formatted": "01/01/2020 10:00:00 AM"},
            "current_function": {"function": "prestige", "title": "Prestige"},
            "last_prestige": "N/A",
            "log_file": "N/A",
            "current_stage": {"stage": "4500", "diff_from_max": 20, "percent_from_max": "99%"},
            "next_artifact_upgrade": {"title": null, "image": null},
            "next_prestige": {"datetime": "2020-01-01 11:00:00+00:00", "formatted": "01/01/2020 11:00:00 AM"},
            "next_break": {"datetime": null, "formatted": null},
            "session": {"uuid": "abc", "url": "/session/abc"},
            "configuration": {"id": 1, "url": "/admin/1", "name": "Default"},
            "window": {"hwnd": 1234, "formatted": "Nox (1234)"}
        })
    }

    #[test]
    fn snapshot_decodes_na_markers_and_countdowns() {
        let snapshot: InstanceSnapshot = serde_json::from_value(snapshot_json()).unwrap();
        assert_eq!(snapshot.id, InstanceId(3));
        assert!(snapshot.is_active());
        assert!(snapshot.last_prestige.is_none());
        assert!(snapshot.log_file.is_none());
        assert_eq!(snapshot.current_stage.stage, Some(4500));
        assert_eq!(
            snapshot.countdown(CountdownKey::NextPrestige),
            Some("2020-01-01 11:00:00+00:00")
        );
        assert_eq!(snapshot.countdown(CountdownKey::NextBreak), None);
        assert_eq!(snapshot.countdown(CountdownKey::NextWarCry), None);
    }

    #[test]
    fn stopped_snapshot_without_optional_sections_decodes() {
        let snapshot: InstanceSnapshot = serde_json::from_value(json!({
            "id": 1,
            "name": "Idle",
            "state": "STOPPED",
            "started": {"datetime": null, "formatted": null}
        }))
        .unwrap();
        assert!(!snapshot.is_active());
        assert!(snapshot.session.is_none());
        assert!(snapshot.configuration.is_none());
    }

    #[test]
    fn instance_push_is_unwrapped_from_envelope() {
        let frame = json!({
            "type": "saved",
            "instance": {"type": "saved", "instance_id": 3, "instance": snapshot_json()}
        })
        .to_string();
        let message = parse_push(PushTopic::Instance, &frame).expect("instance push");
        assert_eq!(message.instance_id(), InstanceId(3));
        assert!(matches!(message, PushMessage::Instance { .. }));
    }

    #[test]
    fn queue_push_carries_event_kind() {
        let frame = json!({
            "type": "finished",
            "queued": {
                "type": "finished",
                "instance_id": 7,
                "queued": {"id": 12, "function": "level_heroes", "title": "Level Heroes", "created": "01/01/2020"}
            }
        })
        .to_string();
        match parse_push(PushTopic::Queued, &frame) {
            Some(PushMessage::Queued {
                instance_id,
                kind,
                queued,
            }) => {
                assert_eq!(instance_id, InstanceId(7));
                assert_eq!(kind, QueueEventKind::Finished);
                assert_eq!(queued.id, 12);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn log_push_and_wrong_topic() {
        let frame = json!({
            "type": "emitted",
            "record": {"type": "emitted", "instance_id": 2, "record": {"message": "[..] INFO hello"}}
        })
        .to_string();
        assert!(matches!(
            parse_push(PushTopic::Log, &frame),
            Some(PushMessage::Log { .. })
        ));
        assert!(parse_push(PushTopic::Prestige, &frame).is_none());
        assert!(parse_push(PushTopic::Log, "not json").is_none());
    }

    #[test]
    fn prestige_record_accepts_na_fields() {
        let record: PrestigeRecord = serde_json::from_value(json!({
            "timestamp": {"datetime": "2020-01-01 10:00:00+00:00", "formatted": "x", "epoch": 1577872800},
            "duration": {"formatted": "N/A", "seconds": "N/A"},
            "artifact": "N/A",
            "stage": "N/A"
        }))
        .unwrap();
        assert!(record.artifact.is_none());
        assert!(record.stage.is_none());
        assert!(record.duration.seconds.is_none());
    }

    #[test]
    fn server_timestamps_parse_in_both_forms() {
        let a = parse_server_timestamp("2020-01-01T10:00:00Z").unwrap();
        let b = parse_server_timestamp("2020-01-01 10:00:00.000000+00:00").unwrap();
        let c = parse_server_timestamp("2020-01-01 12:00:00+02:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(parse_server_timestamp("").is_none());
        assert!(parse_server_timestamp("soon").is_none());
    }

    #[test]
    fn signal_and_state_names() {
        assert_eq!(InstanceSignal::Play.as_str(), "PLAY");
        assert_eq!(
            serde_json::to_value(InstanceState::Paused).unwrap(),
            json!("PAUSED")
        );
    }

    #[test]
    fn bootstrap_tolerates_missing_and_malformed_json() {
        let boot = DashboardBootstrap::from_json(
            r#"{"instances": [{"id": 1, "name": "Instance 1"}], "active": 1,
                "queueable": [{"function": "prestige", "title": "Prestige"}]}"#,
        );
        assert_eq!(boot.instances.len(), 1);
        assert_eq!(boot.active, Some(InstanceId(1)));
        assert!(boot.windows.is_empty());
        assert_eq!(boot.queueable[0].title, "Prestige");

        assert_eq!(DashboardBootstrap::from_json("{not json"), DashboardBootstrap::default());
    }
}
