//! Per-instance live feeds: log records, prestiges and queued functions.
//!
//! Feeds are plain state. Push filtering by active instance happens in the
//! consumer before anything reaches a feed.

use shared_types::{
    ArtifactRef, PrestigeAverages, PrestigeListResponse, PrestigeRecord, QueueEventKind,
    QueuedFunction,
};

use crate::instance::EMPTY;

pub const LOG_PLACEHOLDER: &str = "Log records will appear here as they are emitted...";

/// Oldest records are dropped past this many.
pub const LOG_CAPACITY: usize = 2_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFeed {
    records: Vec<String>,
    auto_scroll: bool,
}

impl Default for LogFeed {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            auto_scroll: true,
        }
    }
}

impl LogFeed {
    pub fn push(&mut self, message: impl Into<String>) {
        self.records.push(message.into());
        if self.records.len() > LOG_CAPACITY {
            let trim = self.records.len() - LOG_CAPACITY;
            self.records.drain(0..trim);
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[String] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn toggle_auto_scroll(&mut self) -> bool {
        self.auto_scroll = !self.auto_scroll;
        self.auto_scroll
    }
}

/// Prestige summary cards above the recent prestiges table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrestigeSummary {
    pub avg_duration: String,
    pub avg_stage: String,
    pub total: usize,
    pub last_artifact: Option<ArtifactRef>,
}

impl Default for PrestigeSummary {
    fn default() -> Self {
        Self {
            avg_duration: "00:00:00".to_string(),
            avg_stage: "0".to_string(),
            total: 0,
            last_artifact: None,
        }
    }
}

impl PrestigeSummary {
    pub fn last_artifact_title(&self) -> &str {
        self.last_artifact
            .as_ref()
            .map_or(EMPTY, |artifact| artifact.title.as_str())
    }
}

/// Query for `/ajax/prestige?type=AVG`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AverageQuery {
    pub total_seconds: i64,
    pub total_stages: i64,
    pub valid_seconds: usize,
    pub valid_stages: usize,
}

impl AverageQuery {
    pub fn params(&self) -> [(&'static str, String); 5] {
        [
            ("type", "AVG".to_string()),
            ("totalSeconds", self.total_seconds.to_string()),
            ("totalStages", self.total_stages.to_string()),
            ("validSeconds", self.valid_seconds.to_string()),
            ("validStages", self.valid_stages.to_string()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrestigeFeed {
    rows: Vec<PrestigeRecord>,
    summary: PrestigeSummary,
}

impl PrestigeFeed {
    pub fn rows(&self) -> &[PrestigeRecord] {
        &self.rows
    }

    pub fn summary(&self) -> &PrestigeSummary {
        &self.summary
    }

    /// Replace rows from the initial list. The summary only moves when
    /// the server returned at least one prestige.
    pub fn load(&mut self, response: PrestigeListResponse) {
        self.rows = response.prestiges;
        if self.rows.is_empty() {
            return;
        }
        if let Some(avg) = response.avg_prestige_time {
            self.summary.avg_duration = avg;
        }
        self.summary.avg_stage = response
            .avg_prestige_stage
            .map_or_else(|| "0".to_string(), |stage| stage.to_string());
        self.summary.total = usize::try_from(response.total_prestiges).unwrap_or(self.rows.len());
        self.summary.last_artifact = response.last_artifact;
    }

    /// Prepend a pushed prestige and return the averages query over every row.
    pub fn push(&mut self, record: PrestigeRecord) -> AverageQuery {
        self.rows.insert(0, record);
        self.average_query()
    }

    /// Apply the averages reply for the most recent push.
    pub fn apply_averages(&mut self, averages: PrestigeAverages) {
        self.summary.avg_duration = averages.avg_prestige_time;
        self.summary.avg_stage = averages
            .avg_prestige_stage
            .map_or_else(|| "0".to_string(), |stage| stage.to_string());
        self.summary.total = self.rows.len();
        self.summary.last_artifact = self.rows.first().and_then(|row| row.artifact.clone());
    }

    pub fn average_query(&self) -> AverageQuery {
        let mut query = AverageQuery::default();
        for row in &self.rows {
            if let Some(stage) = row.stage {
                query.total_stages += stage;
                query.valid_stages += 1;
            }
            if let Some(seconds) = row.duration.seconds {
                query.total_seconds += seconds as i64;
                query.valid_seconds += 1;
            }
        }
        query
    }

    /// Empty the table and zero the summary.
    pub fn reset(&mut self) {
        self.rows.clear();
        self.summary = PrestigeSummary::default();
    }
}

/// Queued functions for the active instance, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueFeed {
    rows: Vec<QueuedFunction>,
}

impl QueueFeed {
    pub fn rows(&self) -> &[QueuedFunction] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `saved` prepends without deduplication; `finished` drops every row
    /// with that id and ignores unknown ids.
    pub fn apply(&mut self, kind: QueueEventKind, queued: QueuedFunction) {
        match kind {
            QueueEventKind::Saved => self.rows.insert(0, queued),
            QueueEventKind::Finished => self.rows.retain(|row| row.id != queued.id),
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

pub fn queued_alert(function: &str) -> String {
    format!("FUNCTION: \"{function}\" HAS BEEN QUEUED SUCCESSFULLY...")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn queued(id: i64) -> QueuedFunction {
        QueuedFunction {
            id,
            function: "level_heroes".to_string(),
            title: "Level Heroes".to_string(),
            created: "01/01/2020 10:00:00 AM".to_string(),
        }
    }

    fn prestige(stage: serde_json::Value, seconds: serde_json::Value) -> PrestigeRecord {
        serde_json::from_value(json!({
            "timestamp": {"datetime": "2020-01-01 10:00:00+00:00", "formatted": "x"},
            "duration": {"formatted": "00:10:00", "seconds": seconds},
            "artifact": {"title": "Book of Shadows", "image": "bos.png", "path": "/static/bos.png"},
            "stage": stage
        }))
        .unwrap()
    }

    #[test]
    fn finished_for_unknown_id_is_noop() {
        let mut feed = QueueFeed::default();
        feed.apply(QueueEventKind::Saved, queued(1));
        feed.apply(QueueEventKind::Finished, queued(42));
        assert_eq!(feed.rows().len(), 1);
    }

    #[test]
    fn duplicate_saved_yields_two_rows() {
        let mut feed = QueueFeed::default();
        feed.apply(QueueEventKind::Saved, queued(5));
        feed.apply(QueueEventKind::Saved, queued(5));
        assert_eq!(feed.rows().len(), 2);

        feed.apply(QueueEventKind::Finished, queued(5));
        assert!(feed.is_empty());
    }

    #[test]
    fn saved_rows_are_newest_first() {
        let mut feed = QueueFeed::default();
        feed.apply(QueueEventKind::Saved, queued(1));
        feed.apply(QueueEventKind::Saved, queued(2));
        assert_eq!(feed.rows()[0].id, 2);
    }

    #[test]
    fn log_feed_trims_and_toggles() {
        let mut feed = LogFeed::default();
        assert!(feed.auto_scroll());
        for i in 0..(LOG_CAPACITY + 5) {
            feed.push(format!("line {i}"));
        }
        assert_eq!(feed.records().len(), LOG_CAPACITY);
        assert_eq!(feed.records()[0], "line 5");
        assert!(!feed.toggle_auto_scroll());
        feed.clear();
        assert!(feed.is_empty());
    }

    #[test]
    fn push_counts_only_valid_stage_and_duration() {
        let mut feed = PrestigeFeed::default();
        feed.push(prestige(json!(100), json!(600)));
        let query = feed.push(prestige(json!("N/A"), json!("N/A")));
        assert_eq!(
            query,
            AverageQuery {
                total_seconds: 600,
                total_stages: 100,
                valid_seconds: 1,
                valid_stages: 1,
            }
        );

        feed.apply_averages(PrestigeAverages {
            avg_prestige_time: "00:10:00".to_string(),
            avg_prestige_stage: Some(100),
        });
        assert_eq!(feed.summary().total, 2);
        assert_eq!(feed.summary().last_artifact_title(), "Book of Shadows");
    }

    #[test]
    fn empty_initial_load_keeps_summary() {
        let mut feed = PrestigeFeed::default();
        feed.load(PrestigeListResponse::default());
        assert_eq!(feed.summary(), &PrestigeSummary::default());
        assert_eq!(feed.summary().last_artifact_title(), EMPTY);
    }

    #[test]
    fn reset_zeroes_summary() {
        let mut feed = PrestigeFeed::default();
        feed.load(PrestigeListResponse {
            prestiges: vec![prestige(json!(10), json!(60))],
            avg_prestige_time: Some("00:01:00".to_string()),
            avg_prestige_stage: Some(10),
            last_artifact: None,
            total_prestiges: 1,
        });
        assert_eq!(feed.summary().avg_stage, "10");
        feed.reset();
        assert_eq!(feed.summary().avg_duration, "00:00:00");
        assert!(feed.rows().is_empty());
    }

    #[test]
    fn queued_alert_text() {
        assert_eq!(
            queued_alert("prestige"),
            "FUNCTION: \"prestige\" HAS BEEN QUEUED SUCCESSFULLY..."
        );
    }
}
