//! Structured view nodes produced from dashboard data.
//!
//! Everything here is a pure transform: the TUI draws these nodes with
//! ratatui, tests inspect them directly.

pub mod sprint;
pub mod tables;

use crate::data::{SortColumn, Statistics, STATUS_DONE, STATUS_IN_PROGRESS};
use crate::format::{PriorityClass, RowClass, StatusClass};

/// A hyperlink to the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Link(Link),
    /// Linked issue badges; an empty list displays `-`
    Links(Vec<Link>),
    /// Status badge
    Badge { text: String, class: StatusClass },
    Priority { text: String, class: PriorityClass },
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Plain text as it appears in the table.
    pub fn display(&self) -> String {
        match self {
            Self::Text(t) => t.clone(),
            Self::Link(link) => link.text.clone(),
            Self::Links(links) if links.is_empty() => "-".to_string(),
            Self::Links(links) => links
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            Self::Badge { text, .. } | Self::Priority { text, .. } => text.clone(),
        }
    }

    /// Every link carried by the cell.
    pub fn links(&self) -> Vec<&Link> {
        match self {
            Self::Link(link) => vec![link],
            Self::Links(links) => links.iter().collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    /// Set for sortable headers
    pub sort: Option<SortColumn>,
    /// ▲ ▼ or ⇅ for sortable headers
    pub indicator: Option<&'static str>,
}

impl Column {
    pub fn plain(title: &str) -> Self {
        Self {
            title: title.to_string(),
            sort: None,
            indicator: None,
        }
    }

    pub fn header(&self) -> String {
        match self.indicator {
            Some(ind) => format!("{} {}", self.title, ind),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub class: RowClass,
    /// Issue the row represents, when it represents one
    pub issue_key: Option<String>,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn plain(cells: Vec<Cell>) -> Self {
        Self {
            class: RowClass::Default,
            issue_key: None,
            cells,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub title: Option<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display text of one column for every row.
    pub fn column_text(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|r| r.cells.get(index))
            .map(Cell::display)
            .collect()
    }
}

/// Header counters shown above the tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total: u64,
    pub total_links: u64,
    pub in_progress: u64,
    pub completed: u64,
}

impl Counters {
    /// In-progress and completed counts come from the exact status rows,
    /// the same ones the backend's sprint stats count.
    pub fn from_statistics(stats: &Statistics) -> Self {
        let count_of = |label: &str| -> u64 {
            stats
                .by_status
                .iter()
                .find(|s| s.status.as_deref() == Some(label))
                .map_or(0, |s| s.count)
        };
        Self {
            total: stats.total,
            total_links: stats.total_links,
            in_progress: count_of(STATUS_IN_PROGRESS),
            completed: count_of(STATUS_DONE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StatusCount;

    #[test]
    fn test_counters_use_exact_status_rows() {
        let stats = Statistics {
            total: 12,
            total_links: 5,
            by_status: vec![
                StatusCount { status: Some("В работе".into()), count: 3 },
                StatusCount { status: Some("In Progress".into()), count: 2 },
                StatusCount { status: Some("Готово".into()), count: 4 },
                StatusCount { status: Some("Открыто".into()), count: 3 },
                StatusCount { status: Some("Closed".into()), count: 5 },
            ],
            ..Default::default()
        };
        let counters = Counters::from_statistics(&stats);
        assert_eq!(counters.total, 12);
        assert_eq!(counters.total_links, 5);
        assert_eq!(counters.in_progress, 3);
        assert_eq!(counters.completed, 4);
    }

    #[test]
    fn test_empty_links_cell_displays_dash() {
        assert_eq!(Cell::Links(Vec::new()).display(), "-");
    }
}
