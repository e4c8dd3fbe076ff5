//! Column sorting for the issues table.
//!
//! The sort never mutates the collection: it orders a vector of references
//! produced by the filter step.

use std::cmp::Ordering;

use super::Issue;
use crate::format::parse_hours;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Key,
    Summary,
    Assignee,
    Estimate,
    Spent,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        Self::Key,
        Self::Summary,
        Self::Assignee,
        Self::Estimate,
        Self::Spent,
    ];

    /// Backend field name of the column.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Key => "issue_key",
            Self::Summary => "summary",
            Self::Assignee => "assignee",
            Self::Estimate => "time_original_estimate",
            Self::Spent => "time_spent",
        }
    }

    /// Numeric columns compare coerced hours; text columns treat missing as "".
    fn compare(&self, a: &Issue, b: &Issue) -> Ordering {
        let text = |o: &Option<String>, p: &Option<String>| {
            o.as_deref().unwrap_or("").cmp(p.as_deref().unwrap_or(""))
        };
        match self {
            Self::Key => a.issue_key.cmp(&b.issue_key),
            Self::Summary => text(&a.summary, &b.summary),
            Self::Assignee => text(&a.assignee, &b.assignee),
            Self::Estimate => parse_hours(&a.time_original_estimate)
                .total_cmp(&parse_hours(&b.time_original_estimate)),
            Self::Spent => parse_hours(&a.time_spent).total_cmp(&parse_hours(&b.time_spent)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    /// Header click: the same column flips direction, another column starts
    /// ascending.
    pub fn select(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Asc;
        }
    }

    /// Indicator shown next to a sortable header.
    pub fn indicator(&self, column: SortColumn) -> &'static str {
        match (self.column == Some(column), self.direction) {
            (true, SortDirection::Asc) => "▲",
            (true, SortDirection::Desc) => "▼",
            (false, _) => "⇅",
        }
    }
}

/// Stable sort by the active column; no column keeps the input order.
pub fn sort_issues<'a>(mut issues: Vec<&'a Issue>, sort: &SortState) -> Vec<&'a Issue> {
    let Some(column) = sort.column else {
        return issues;
    };
    issues.sort_by(|a, b| {
        let ord = column.compare(a, b);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    issues
}
