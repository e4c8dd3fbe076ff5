//! Table builders for the issue, sprint, status, SEO and link views.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Cell, Column, Link, Row, Table};
use crate::data::{
    Issue, IssueLink, SeoTask, SortColumn, SortState, SprintSummary, StatusCount, TypeCount,
    STATUS_DONE, STATUS_IN_PROGRESS, STATUS_OPEN,
};
use crate::format::{
    browse_url, format_hours, format_sprint_hours, or_dash, PriorityClass, RowClass, StatusClass,
};

static SPRINT_NUMBER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"#(\d+)").ok());

/// Notification shown instead of an empty SEO table.
pub const NO_SEO_TASKS: &str = "SEO задач не найдено";

/// Placeholder for a sprint with no issues (or an unavailable sprint).
pub const NO_SPRINT_ISSUES: &str = "Нет задач в текущем спринте";

fn key_link(base: &str, key: &str) -> Link {
    Link {
        text: key.to_string(),
        url: browse_url(base, key),
    }
}

fn linked_issues_cell(base: &str, keys: &[String]) -> Cell {
    Cell::Links(keys.iter().map(|k| key_link(base, k)).collect())
}

fn status_badge(status: Option<&str>) -> Cell {
    Cell::Badge {
        text: or_dash(status).to_string(),
        class: StatusClass::classify(status),
    }
}

fn priority_cell(priority: Option<&str>) -> Cell {
    Cell::Priority {
        text: or_dash(priority).to_string(),
        class: PriorityClass::classify(priority),
    }
}

fn sortable(title: &str, column: SortColumn, sort: &SortState) -> Column {
    Column {
        title: title.to_string(),
        sort: Some(column),
        indicator: Some(sort.indicator(column)),
    }
}

/// The main issues table, in the order given.
pub fn issues_table(issues: &[&Issue], sort: &SortState, browse_base: &str) -> Table {
    let columns = vec![
        sortable("Ключ", SortColumn::Key, sort),
        Column::plain("Тип"),
        Column::plain("Статус"),
        sortable("Описание", SortColumn::Summary, sort),
        sortable("Исполнитель", SortColumn::Assignee, sort),
        Column::plain("Приоритет"),
        sortable("Оценка", SortColumn::Estimate, sort),
        sortable("Затрачено", SortColumn::Spent, sort),
        Column::plain("Спринт"),
        Column::plain("Связи"),
    ];

    let rows = issues
        .iter()
        .map(|issue| Row {
            class: RowClass::classify(issue.issue_type.as_deref()),
            issue_key: Some(issue.issue_key.clone()),
            cells: vec![
                Cell::Link(key_link(browse_base, &issue.issue_key)),
                Cell::text(or_dash(issue.issue_type.as_deref())),
                status_badge(issue.status.as_deref()),
                Cell::text(or_dash(issue.summary.as_deref())),
                Cell::text(or_dash(issue.assignee.as_deref())),
                priority_cell(issue.priority.as_deref()),
                Cell::text(format_hours(&issue.time_original_estimate)),
                Cell::text(format_hours(&issue.time_spent)),
                Cell::text(or_dash(issue.sprint.as_deref())),
                linked_issues_cell(browse_base, &issue.linked_issues),
            ],
        })
        .collect();

    Table {
        title: None,
        columns,
        rows,
    }
}

/// Sprint number taken from the first `#<digits>` in the name, 0 without one.
pub fn sprint_number(name: Option<&str>) -> u64 {
    let Some(re) = SPRINT_NUMBER.as_ref() else {
        return 0;
    };
    name.and_then(|n| re.captures(n))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Sprint summary ordered by sprint number, newest first. Stable for ties.
pub fn sprint_summary_table(sprints: &[SprintSummary]) -> Table {
    let mut ordered: Vec<&SprintSummary> = sprints.iter().collect();
    ordered.sort_by_key(|s| std::cmp::Reverse(sprint_number(s.sprint.as_deref())));

    let rows = ordered
        .into_iter()
        .map(|s| {
            Row::plain(vec![
                Cell::text(or_dash(s.sprint.as_deref())),
                Cell::text(s.count.to_string()),
                Cell::text(format_sprint_hours(&s.total_estimate)),
                Cell::text(format_sprint_hours(&s.total_spent)),
            ])
        })
        .collect();

    Table {
        title: Some("Статистика по спринтам".to_string()),
        columns: vec![
            Column::plain("Спринт"),
            Column::plain("Задач"),
            Column::plain("Оценка (часы)"),
            Column::plain("Затрачено (часы)"),
        ],
        rows,
    }
}

/// Share of `count` in `total`, one decimal. A zero total yields `0.0`.
pub fn status_percent(count: u64, total: u64) -> String {
    if total == 0 {
        return "0.0".to_string();
    }
    format!("{:.1}", count as f64 / total as f64 * 100.0)
}

pub fn status_summary_table(statuses: &[StatusCount]) -> Table {
    let total: u64 = statuses.iter().map(|s| s.count).sum();
    let rows = statuses
        .iter()
        .map(|s| {
            Row::plain(vec![
                status_badge(s.status.as_deref()),
                Cell::text(s.count.to_string()),
                Cell::text(format!("{}%", status_percent(s.count, total))),
            ])
        })
        .collect();

    Table {
        title: Some("Статистика по статусам".to_string()),
        columns: vec![
            Column::plain("Статус"),
            Column::plain("Количество"),
            Column::plain("Процент"),
        ],
        rows,
    }
}

pub fn type_summary_table(types: &[TypeCount]) -> Table {
    let rows = types
        .iter()
        .map(|t| Row {
            class: RowClass::classify(t.issue_type.as_deref()),
            issue_key: None,
            cells: vec![
                Cell::text(or_dash(t.issue_type.as_deref())),
                Cell::text(t.count.to_string()),
            ],
        })
        .collect();

    Table {
        title: Some("Статистика по типам".to_string()),
        columns: vec![Column::plain("Тип"), Column::plain("Количество")],
        rows,
    }
}

/// Fixed status groups of the sprint detail view, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SprintBucket {
    InProgress,
    Open,
    Done,
    Other,
}

impl SprintBucket {
    pub const ORDER: [SprintBucket; 4] = [Self::InProgress, Self::Open, Self::Done, Self::Other];

    /// Only the exact workflow labels get a named bucket; everything else
    /// (including missing status) is `Other`.
    pub fn of(issue: &Issue) -> Self {
        match issue.status.as_deref() {
            Some(STATUS_IN_PROGRESS) => Self::InProgress,
            Some(STATUS_OPEN) => Self::Open,
            Some(STATUS_DONE) => Self::Done,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Open => STATUS_OPEN,
            Self::Done => STATUS_DONE,
            Self::Other => "Другое",
        }
    }

    pub fn status_class(&self) -> StatusClass {
        StatusClass::classify(Some(self.label()))
    }
}

/// Partition issues into the non-empty buckets, each keeping input order.
pub fn bucket_sprint_issues(issues: &[Issue]) -> Vec<(SprintBucket, Vec<&Issue>)> {
    SprintBucket::ORDER
        .iter()
        .map(|bucket| {
            let members: Vec<&Issue> = issues
                .iter()
                .filter(|i| SprintBucket::of(i) == *bucket)
                .collect();
            (*bucket, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

/// Current sprint's issues grouped by status bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintDetail {
    pub sprint_name: String,
    pub total: usize,
    pub groups: Vec<(SprintBucket, Table)>,
}

impl SprintDetail {
    pub fn header(&self) -> String {
        format!("📋 Задачи спринта: {}", self.sprint_name)
    }
}

/// `None` when there is nothing to show; the caller renders
/// [`NO_SPRINT_ISSUES`].
pub fn sprint_detail(issues: &[Issue], sprint_name: &str, browse_base: &str) -> Option<SprintDetail> {
    if issues.is_empty() {
        return None;
    }
    let groups = bucket_sprint_issues(issues)
        .into_iter()
        .map(|(bucket, members)| (bucket, sprint_group_table(bucket, &members, browse_base)))
        .collect();
    Some(SprintDetail {
        sprint_name: sprint_name.to_string(),
        total: issues.len(),
        groups,
    })
}

fn sprint_group_table(bucket: SprintBucket, issues: &[&Issue], browse_base: &str) -> Table {
    let rows = issues
        .iter()
        .map(|issue| Row {
            class: RowClass::classify(issue.issue_type.as_deref()),
            issue_key: Some(issue.issue_key.clone()),
            cells: vec![
                Cell::Link(key_link(browse_base, &issue.issue_key)),
                Cell::text(or_dash(issue.issue_type.as_deref())),
                Cell::text(or_dash(issue.summary.as_deref())),
                Cell::text(or_dash(issue.assignee.as_deref())),
                priority_cell(issue.priority.as_deref()),
                Cell::text(format_hours(&issue.time_original_estimate)),
                Cell::text(format_hours(&issue.time_spent)),
                linked_issues_cell(browse_base, &issue.linked_issues),
            ],
        })
        .collect();

    Table {
        title: Some(format!("{} ({})", bucket.label(), issues.len())),
        columns: ["Ключ", "Тип", "Описание", "Исполнитель", "Приоритет", "Оценка", "Затрачено", "Связи"]
            .into_iter()
            .map(Column::plain)
            .collect(),
        rows,
    }
}

/// Personal SEO task table; `None` for an empty list.
pub fn seo_table(tasks: &[SeoTask], browse_base: &str) -> Option<Table> {
    if tasks.is_empty() {
        return None;
    }
    let rows = tasks
        .iter()
        .map(|task| Row {
            class: RowClass::Default,
            issue_key: Some(task.issue_key.clone()),
            cells: vec![
                Cell::Link(key_link(browse_base, &task.issue_key)),
                Cell::text(or_dash(task.summary.as_deref())),
                status_badge(task.status.as_deref()),
                Cell::text(format_hours(&task.time_spent)),
                Cell::text(or_dash(task.sprint.as_deref())),
            ],
        })
        .collect();

    Some(Table {
        title: Some(format!("🔍 Мои SEO задачи ({})", tasks.len())),
        columns: ["Ключ", "Описание", "Статус", "Затрачено", "Спринт"]
            .into_iter()
            .map(Column::plain)
            .collect(),
        rows,
    })
}

/// Links of one issue, for the details modal.
pub fn issue_links_table(links: &[IssueLink], browse_base: &str) -> Table {
    let rows = links
        .iter()
        .map(|link| Row {
            class: RowClass::Default,
            issue_key: Some(link.target_issue_key.clone()),
            cells: vec![
                Cell::text(
                    link.direction_label
                        .clone()
                        .unwrap_or_else(|| link.direction.label().to_string()),
                ),
                Cell::Link(key_link(browse_base, &link.target_issue_key)),
                Cell::text(or_dash(link.target_summary.as_deref())),
                status_badge(link.target_status.as_deref()),
                priority_cell(link.target_priority.as_deref()),
            ],
        })
        .collect();

    Table {
        title: Some(format!("Связи ({})", links.len())),
        columns: ["Связь", "Ключ", "Описание", "Статус", "Приоритет"]
            .into_iter()
            .map(Column::plain)
            .collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SortDirection;
    use serde_json::json;

    const BASE: &str = "https://jira.example.com";

    #[test]
    fn test_issues_table_headers_show_sort_state() {
        let sort = SortState {
            column: Some(SortColumn::Spent),
            direction: SortDirection::Desc,
        };
        let table = issues_table(&[], &sort, BASE);
        let headers: Vec<_> = table.columns.iter().map(|c| c.header()).collect();
        assert_eq!(headers[0], "Ключ ⇅");
        assert_eq!(headers[1], "Тип");
        assert_eq!(headers[7], "Затрачено ▼");
    }

    #[test]
    fn test_issue_row_cells() {
        let issue = Issue {
            issue_key: "MAR-7".into(),
            issue_type: Some("История".into()),
            status: Some("В работе".into()),
            time_original_estimate: json!("4.50"),
            linked_issues: vec!["MAR-8".into()],
            ..Default::default()
        };
        let table = issues_table(&[&issue], &SortState::default(), BASE);
        let row = &table.rows[0];
        assert_eq!(row.class, RowClass::Story);
        assert_eq!(row.cells[0].links()[0].url, "https://jira.example.com/browse/MAR-7");
        assert_eq!(row.cells[3].display(), "-");
        assert_eq!(row.cells[6].display(), "4.50ч");
        assert_eq!(row.cells[7].display(), "-");
        assert_eq!(row.cells[9].display(), "MAR-8");
    }

    #[test]
    fn test_sprint_number() {
        assert_eq!(sprint_number(Some("MAR 08.12.25 - 22.12.25 #24")), 24);
        assert_eq!(sprint_number(Some("Backlog")), 0);
        assert_eq!(sprint_number(None), 0);
    }

    #[test]
    fn test_status_percent_zero_total() {
        assert_eq!(status_percent(0, 0), "0.0");
        assert_eq!(status_percent(1, 3), "33.3");
    }

    #[test]
    fn test_seo_table_empty_is_none() {
        assert!(seo_table(&[], BASE).is_none());
    }

    #[test]
    fn test_bucket_status_classes() {
        assert_eq!(SprintBucket::InProgress.status_class(), StatusClass::InProgress);
        assert_eq!(SprintBucket::Open.status_class(), StatusClass::Open);
        assert_eq!(SprintBucket::Done.status_class(), StatusClass::Done);
        assert_eq!(SprintBucket::Other.status_class(), StatusClass::Closed);
    }
}
