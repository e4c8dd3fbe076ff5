//! Exact-match filters and free-text search over the issue collection.

use super::Issue;

/// One of the four filterable issue fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Type,
    Status,
    Priority,
    Sprint,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [Self::Type, Self::Status, Self::Priority, Self::Sprint];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Type => "Тип",
            Self::Status => "Статус",
            Self::Priority => "Приоритет",
            Self::Sprint => "Спринт",
        }
    }

    fn value_of<'a>(&self, issue: &'a Issue) -> Option<&'a str> {
        match self {
            Self::Type => issue.issue_type.as_deref(),
            Self::Status => issue.status.as_deref(),
            Self::Priority => issue.priority.as_deref(),
            Self::Sprint => issue.sprint.as_deref(),
        }
    }
}

/// Active filter selection. `None` means the field is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    pub issue_type: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sprint: Option<String>,
}

impl ActiveFilters {
    pub fn get(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Type => self.issue_type.as_deref(),
            FilterField::Status => self.status.as_deref(),
            FilterField::Priority => self.priority.as_deref(),
            FilterField::Sprint => self.sprint.as_deref(),
        }
    }

    /// Set or clear one filter. An empty string clears it.
    pub fn set(&mut self, field: FilterField, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        match field {
            FilterField::Type => self.issue_type = value,
            FilterField::Status => self.status = value,
            FilterField::Priority => self.priority = value,
            FilterField::Sprint => self.sprint = value,
        }
    }

    pub fn is_active(&self) -> bool {
        FilterField::ALL.iter().any(|f| self.get(*f).is_some())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// An issue passes when every set filter equals its field exactly.
    pub fn matches(&self, issue: &Issue) -> bool {
        FilterField::ALL.iter().all(|field| match self.get(*field) {
            None => true,
            Some(wanted) => field.value_of(issue) == Some(wanted),
        })
    }
}

/// Case-insensitive substring match of the query on key, summary or assignee.
/// An empty query matches everything; whitespace in the query is significant.
pub fn matches_query(issue: &Issue, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    [
        Some(issue.issue_key.as_str()),
        issue.summary.as_deref(),
        issue.assignee.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|text| text.to_lowercase().contains(&query))
}

/// Filter the collection, preserving its order.
pub fn filter_issues<'a>(issues: &'a [Issue], filters: &ActiveFilters, query: &str) -> Vec<&'a Issue> {
    issues
        .iter()
        .filter(|issue| filters.matches(issue) && matches_query(issue, query))
        .collect()
}

/// Distinct values offered by each filter control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub types: Vec<String>,
    pub statuses: Vec<String>,
    pub priorities: Vec<String>,
    pub sprints: Vec<String>,
}

impl FilterOptions {
    /// Types, statuses and priorities ascending; sprints descending so the
    /// newest sprint comes first.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut options = Self {
            types: distinct(issues, FilterField::Type),
            statuses: distinct(issues, FilterField::Status),
            priorities: distinct(issues, FilterField::Priority),
            sprints: distinct(issues, FilterField::Sprint),
        };
        options.sprints.reverse();
        options
    }

    pub fn values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Type => &self.types,
            FilterField::Status => &self.statuses,
            FilterField::Priority => &self.priorities,
            FilterField::Sprint => &self.sprints,
        }
    }
}

fn distinct(issues: &[Issue], field: FilterField) -> Vec<String> {
    let mut values: Vec<String> = issues
        .iter()
        .filter_map(|i| field.value_of(i))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    values.sort();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_issue(key: &str, status: &str, sprint: Option<&str>) -> Issue {
        Issue {
            issue_key: key.to_string(),
            status: Some(status.to_string()),
            issue_type: Some("Задача".to_string()),
            sprint: sprint.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_set_empty_clears() {
        let mut filters = ActiveFilters::default();
        filters.set(FilterField::Status, Some("Готово".into()));
        assert!(filters.is_active());
        filters.set(FilterField::Status, Some(String::new()));
        assert!(!filters.is_active());
    }

    #[test]
    fn test_missing_field_never_matches_set_filter() {
        let mut filters = ActiveFilters::default();
        filters.set(FilterField::Sprint, Some("S1".into()));
        assert!(!filters.matches(&make_issue("A-1", "Готово", None)));
        assert!(filters.matches(&make_issue("A-2", "Готово", Some("S1"))));
    }

    #[test]
    fn test_sprint_options_descending() {
        let issues = vec![
            make_issue("A-1", "Готово", Some("MAR #9")),
            make_issue("A-2", "Открыто", Some("MAR #24")),
            make_issue("A-3", "Открыто", Some("MAR #9")),
            make_issue("A-4", "Открыто", None),
        ];
        let options = FilterOptions::from_issues(&issues);
        assert_eq!(options.sprints, vec!["MAR #9", "MAR #24"]);
        assert_eq!(options.statuses, vec!["Готово", "Открыто"]);
        assert_eq!(options.types, vec!["Задача"]);
        assert!(options.priorities.is_empty());
    }
}
