//! Backend payloads and the in-memory dashboard state.

pub mod filter;
pub mod sorting;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use filter::{ActiveFilters, FilterField, FilterOptions};
pub use sorting::{SortColumn, SortDirection, SortState};

/// Workflow status labels the backend counts by exact match.
pub const STATUS_IN_PROGRESS: &str = "В работе";
pub const STATUS_OPEN: &str = "Открыто";
pub const STATUS_DONE: &str = "Готово";

/// A Jira issue as served by `/api/issues`.
///
/// Duration fields are kept as raw JSON: the backend serializes numeric
/// columns either as numbers or as decimal strings, and may send null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub issue_key: String,
    #[serde(default)]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub time_original_estimate: Value,
    #[serde(default)]
    pub time_spent: Value,
    #[serde(default)]
    pub sprint: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub linked_issues: Vec<String>,
    #[serde(default)]
    pub last_synced: Option<String>,
    #[serde(default)]
    pub epic_link: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `/api/statistics`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total: u64,
    #[serde(default)]
    pub total_links: u64,
    #[serde(default)]
    pub by_status: Vec<StatusCount>,
    #[serde(default)]
    pub by_sprint: Vec<SprintSummary>,
    #[serde(default)]
    pub by_type: Vec<TypeCount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCount {
    #[serde(default)]
    pub status: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(default)]
    pub issue_type: Option<String>,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SprintSummary {
    #[serde(default)]
    pub sprint: Option<String>,
    pub count: u64,
    #[serde(default)]
    pub total_estimate: Value,
    #[serde(default)]
    pub total_spent: Value,
}

/// Workload metrics for the current sprint, computed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SprintWorkloadStats {
    pub sprint_name: String,
    pub sprint_capacity: f64,
    pub total_estimated: f64,
    pub total_spent: f64,
    pub workload_percent: f64,
    pub time_used_percent: f64,
    pub completed_tasks: u64,
    pub total_tasks: u64,
    pub in_progress_tasks: u64,
    pub open_tasks: u64,
    pub remaining_capacity: f64,
    pub remaining_work: f64,
    #[serde(default)]
    pub workload_status: String,
    pub progress_percent: f64,
    #[serde(default)]
    pub completed_spent: Option<f64>,
}

/// `/api/current-sprint-stats`: either the stats or a logical absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrentSprintStats {
    Unavailable { error: String },
    Available(SprintWorkloadStats),
}

/// `/api/current-sprint-issues`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurrentSprintIssues {
    Unavailable {
        error: String,
    },
    Available {
        #[serde(default)]
        issues: Vec<Issue>,
        #[serde(default)]
        sprint_name: Option<String>,
    },
}

/// `/api/my-tasks-seo`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoTask {
    pub issue_key: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub time_spent: Value,
    #[serde(default)]
    pub sprint: Option<String>,
}

/// `/api/graph`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub issue_key: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source_issue_key: String,
    pub target_issue_key: String,
    #[serde(default)]
    pub direction: LinkDirection,
    #[serde(default)]
    pub direction_label: Option<String>,
    #[serde(default)]
    pub link_type_name: Option<String>,
}

/// Direction of an issue link relative to its source issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDirection {
    Inward,
    #[default]
    #[serde(other)]
    Outward,
}

impl LinkDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inward => "Входящая связь",
            Self::Outward => "Исходящая связь",
        }
    }
}

/// `/api/issue/<key>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueDetails {
    pub issue: Issue,
    #[serde(default)]
    pub links: Vec<IssueLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueLink {
    pub target_issue_key: String,
    #[serde(default)]
    pub link_type_name: Option<String>,
    #[serde(default)]
    pub direction: LinkDirection,
    #[serde(default)]
    pub direction_label: Option<String>,
    #[serde(default)]
    pub target_summary: Option<String>,
    #[serde(default)]
    pub target_status: Option<String>,
    #[serde(default)]
    pub target_priority: Option<String>,
}

/// What the issues panel currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum IssuesPanel {
    /// Filtered and sorted issue table
    #[default]
    Issues,
    /// Personal SEO task list, until the next filter/sort interaction
    SeoTasks(Vec<SeoTask>),
}

/// Application state: the issue collection and everything the issue view
/// is derived from.
#[derive(Debug, Default)]
pub struct AppState {
    pub issues: Vec<Issue>,
    pub filters: ActiveFilters,
    pub sort: SortState,
    pub search_query: String,
    pub search_mode: bool,
    pub statistics: Option<Statistics>,
    pub last_refresh: Option<DateTime<Utc>>,
    pub panel: IssuesPanel,
}

impl AppState {
    /// The visible issue sequence for the current filters, query and sort.
    pub fn visible_issues(&self) -> Vec<&Issue> {
        let filtered = filter::filter_issues(&self.issues, &self.filters, &self.search_query);
        sorting::sort_issues(filtered, &self.sort)
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_issues(&self.issues)
    }

    /// Replace the issue collection wholesale.
    pub fn set_issues(&mut self, issues: Vec<Issue>) {
        self.issues = issues;
        self.last_refresh = Some(Utc::now());
    }

    /// Last sync timestamp reported by the backend (taken from the first issue).
    pub fn last_synced(&self) -> Option<&str> {
        self.issues.first().and_then(|i| i.last_synced.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_parses_decimal_strings_and_nulls() {
        let issue: Issue = serde_json::from_value(json!({
            "issue_key": "MAR-1",
            "issue_type": "Задача",
            "status": "В работе",
            "summary": null,
            "time_original_estimate": "8.00",
            "time_spent": null,
            "linked_issues": null,
            "last_synced": "01.12.2025 10:00"
        }))
        .unwrap();
        assert_eq!(issue.time_original_estimate, json!("8.00"));
        assert_eq!(issue.time_spent, Value::Null);
        assert!(issue.linked_issues.is_empty());
        assert!(issue.summary.is_none());
    }

    #[test]
    fn test_current_sprint_stats_error_payload() {
        let stats: CurrentSprintStats = serde_json::from_value(json!({
            "error": "Нет данных по спринтам",
            "sprint_name": null
        }))
        .unwrap();
        assert!(matches!(stats, CurrentSprintStats::Unavailable { .. }));
    }

    #[test]
    fn test_current_sprint_stats_available_payload() {
        let stats: CurrentSprintStats = serde_json::from_value(json!({
            "sprint_name": "MAR 08.12.25 - 22.12.25 #24",
            "sprint_capacity": 80,
            "total_tasks": 10,
            "completed_tasks": 4,
            "in_progress_tasks": 3,
            "open_tasks": 3,
            "total_estimated": 72.5,
            "total_spent": 40.0,
            "completed_spent": 20.0,
            "remaining_capacity": 40.0,
            "remaining_work": 52.5,
            "progress_percent": 40.0,
            "workload_percent": 90.6,
            "time_used_percent": 50.0,
            "workload_status": "full"
        }))
        .unwrap();
        match stats {
            CurrentSprintStats::Available(s) => {
                assert_eq!(s.sprint_capacity, 80.0);
                assert_eq!(s.workload_status, "full");
                assert_eq!(s.completed_spent, Some(20.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_link_direction_unknown_is_outward() {
        let edge: GraphEdge = serde_json::from_value(json!({
            "source_issue_key": "A-1",
            "target_issue_key": "A-2",
            "direction": "sideways"
        }))
        .unwrap();
        assert_eq!(edge.direction, LinkDirection::Outward);

        let edge: GraphEdge = serde_json::from_value(json!({
            "source_issue_key": "A-1",
            "target_issue_key": "A-2",
            "direction": "inward",
            "direction_label": "is blocked by"
        }))
        .unwrap();
        assert_eq!(edge.direction, LinkDirection::Inward);
    }

    #[test]
    fn test_last_synced_from_first_issue() {
        let mut state = AppState::default();
        assert!(state.last_synced().is_none());
        state.set_issues(vec![Issue {
            issue_key: "A-1".into(),
            last_synced: Some("02.12.2025 09:30".into()),
            ..Default::default()
        }]);
        assert_eq!(state.last_synced(), Some("02.12.2025 09:30"));
        assert!(state.last_refresh.is_some());
    }
}
