//! Active instance selection.
//!
//! The instance table is a set of mutually exclusive rows: exactly one is
//! selected and that row's select/remove controls are disabled. The chosen
//! id is published through [`ACTIVE_INSTANCE`]; per-instance consumers
//! re-check it every [`SELECTION_POLL_MS`](crate::config::SELECTION_POLL_MS)
//! through a [`SelectionWatch`] and treat a change as a context switch.

use dioxus::signals::GlobalSignal;
use shared_types::{InstanceId, InstanceSummary};
use thiserror::Error;

/// Page-wide active instance.
pub static ACTIVE_INSTANCE: GlobalSignal<Option<InstanceId>> = GlobalSignal::new(|| None);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("instance {0} is selected and cannot be removed")]
    Selected(InstanceId),
    #[error("instance {0} is not listed")]
    Unknown(InstanceId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceRows {
    rows: Vec<InstanceSummary>,
    selected: Option<InstanceId>,
}

impl InstanceRows {
    /// Rows as rendered by the server. Falls back to the first row when
    /// `selected` is missing or not listed.
    pub fn new(rows: Vec<InstanceSummary>, selected: Option<InstanceId>) -> Self {
        let selected = selected
            .filter(|id| rows.iter().any(|row| row.id == *id))
            .or_else(|| rows.first().map(|row| row.id));
        Self { rows, selected }
    }

    pub fn rows(&self) -> &[InstanceSummary] {
        &self.rows
    }

    pub fn selected(&self) -> Option<InstanceId> {
        self.selected
    }

    pub fn is_selected(&self, id: InstanceId) -> bool {
        self.selected == Some(id)
    }

    /// Append a newly created instance. Returns `true` when it became the
    /// selection because the table was empty.
    pub fn insert(&mut self, row: InstanceSummary) -> bool {
        let first = self.rows.is_empty();
        if first {
            self.selected = Some(row.id);
        }
        self.rows.push(row);
        first
    }

    /// Returns `true` when the selection changed.
    pub fn select(&mut self, id: InstanceId) -> Result<bool, RowError> {
        if !self.rows.iter().any(|row| row.id == id) {
            return Err(RowError::Unknown(id));
        }
        let changed = self.selected != Some(id);
        self.selected = Some(id);
        Ok(changed)
    }

    pub fn remove(&mut self, id: InstanceId) -> Result<(), RowError> {
        if self.is_selected(id) {
            return Err(RowError::Selected(id));
        }
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        if self.rows.len() == before {
            return Err(RowError::Unknown(id));
        }
        Ok(())
    }
}

/// A detected change of the active instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch {
    pub from: Option<InstanceId>,
    pub to: Option<InstanceId>,
}

/// Remembers the last seen selection and reports each change once.
/// The first poll always reports, which doubles as the activation load.
#[derive(Debug, Clone, Default)]
pub struct SelectionWatch {
    seen: Option<Option<InstanceId>>,
}

impl SelectionWatch {
    pub fn poll(&mut self, current: Option<InstanceId>) -> Option<Switch> {
        match self.seen {
            Some(previous) if previous == current => None,
            previous => {
                self.seen = Some(current);
                Some(Switch {
                    from: previous.flatten(),
                    to: current,
                })
            }
        }
    }

    pub fn current(&self) -> Option<InstanceId> {
        self.seen.flatten()
    }

    /// Whether a push tagged with `instance_id` belongs to the current selection.
    pub fn accepts(&self, instance_id: InstanceId) -> bool {
        self.current() == Some(instance_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64) -> InstanceSummary {
        InstanceSummary {
            id: InstanceId(id),
            name: format!("Instance {id}"),
        }
    }

    #[test]
    fn first_created_row_is_selected() {
        let mut rows = InstanceRows::default();
        assert!(rows.insert(row(1)));
        assert!(!rows.insert(row(2)));
        assert_eq!(rows.selected(), Some(InstanceId(1)));
    }

    #[test]
    fn selected_row_cannot_be_removed() {
        let mut rows = InstanceRows::new(vec![row(1), row(2)], Some(InstanceId(2)));
        assert_eq!(
            rows.remove(InstanceId(2)),
            Err(RowError::Selected(InstanceId(2)))
        );
        assert_eq!(rows.remove(InstanceId(1)), Ok(()));
        assert_eq!(rows.remove(InstanceId(1)), Err(RowError::Unknown(InstanceId(1))));
        assert_eq!(rows.rows().len(), 1);
    }

    #[test]
    fn unknown_initial_selection_falls_back_to_first_row() {
        let rows = InstanceRows::new(vec![row(3), row(4)], Some(InstanceId(99)));
        assert_eq!(rows.selected(), Some(InstanceId(3)));
    }

    #[test]
    fn select_reports_change_only_once() {
        let mut rows = InstanceRows::new(vec![row(1), row(2)], None);
        assert_eq!(rows.select(InstanceId(2)), Ok(true));
        assert_eq!(rows.select(InstanceId(2)), Ok(false));
    }

    #[test]
    fn watch_reports_each_switch_once() {
        let mut watch = SelectionWatch::default();
        assert_eq!(
            watch.poll(Some(InstanceId(1))),
            Some(Switch {
                from: None,
                to: Some(InstanceId(1))
            })
        );
        assert_eq!(watch.poll(Some(InstanceId(1))), None);
        assert_eq!(
            watch.poll(Some(InstanceId(2))),
            Some(Switch {
                from: Some(InstanceId(1)),
                to: Some(InstanceId(2))
            })
        );
        assert!(watch.accepts(InstanceId(2)));
        assert!(!watch.accepts(InstanceId(1)));
    }

    #[test]
    fn first_poll_reports_even_without_selection() {
        let mut watch = SelectionWatch::default();
        assert!(watch.poll(None).is_some());
        assert!(watch.poll(None).is_none());
    }
}
