//! Classification and formatting helpers shared by the tables, cards and graph.
//!
//! Status, priority and issue type are free-form strings coming straight from
//! the tracker, in Russian or English. They are classified by case-insensitive
//! substring matching.

use serde_json::Value;

/// Visual class of an issue status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    InProgress,
    Done,
    Open,
    /// Anything unrecognized, including a missing status
    Closed,
}

impl StatusClass {
    /// Classify a status string. Checked in order: in-progress, done, open.
    pub fn classify(status: Option<&str>) -> Self {
        let Some(status) = status else {
            return Self::Closed;
        };
        let s = status.to_lowercase();
        if s.contains("работ") || s.contains("progress") {
            Self::InProgress
        } else if s.contains("готов") || s.contains("done") || s.contains("closed") {
            Self::Done
        } else if s.contains("откр") || s.contains("open") || s.contains("new") {
            Self::Open
        } else {
            Self::Closed
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::InProgress => "status-progress",
            Self::Done => "status-done",
            Self::Open => "status-open",
            Self::Closed => "status-closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityClass {
    High,
    Medium,
    Low,
    None,
}

impl PriorityClass {
    pub fn classify(priority: Option<&str>) -> Self {
        let Some(priority) = priority else {
            return Self::None;
        };
        let p = priority.to_lowercase();
        if p.contains("high") || p.contains("высок") {
            Self::High
        } else if p.contains("medium") || p.contains("средн") {
            Self::Medium
        } else if p.contains("low") || p.contains("низк") {
            Self::Low
        } else {
            Self::None
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::High => "priority-high",
            Self::Medium => "priority-medium",
            Self::Low => "priority-low",
            Self::None => "",
        }
    }
}

/// Row style derived from the issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowClass {
    Story,
    Epic,
    Default,
}

impl RowClass {
    pub fn classify(issue_type: Option<&str>) -> Self {
        let Some(issue_type) = issue_type else {
            return Self::Default;
        };
        let t = issue_type.to_lowercase();
        if t.contains("story") || t.contains("история") {
            Self::Story
        } else if t.contains("epic") || t.contains("эпик") {
            Self::Epic
        } else {
            Self::Default
        }
    }
}

/// Interpret a duration value as a finite number, if it is one.
///
/// Numbers pass through; strings must parse completely. Everything else
/// (null, objects, `"null"`, `"abc"`, infinities) is `None`.
pub fn hours_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn trim_number(n: f64) -> String {
    if n.fract() == 0.0 {
        // `+ 0.0` folds negative zero into `0`
        format!("{}", n + 0.0)
    } else {
        format!("{:.2}", n)
    }
}

/// Hours with the `ч` suffix, or `-` when the value is not a number.
pub fn format_hours(value: &Value) -> String {
    match hours_value(value) {
        Some(n) => format!("{}ч", trim_number(n)),
        None => "-".to_string(),
    }
}

/// Hours for the sprint summary table: no suffix, `0` when missing or zero.
pub fn format_sprint_hours(value: &Value) -> String {
    match hours_value(value) {
        Some(n) if n != 0.0 => trim_number(n),
        _ => "0".to_string(),
    }
}

/// Lenient numeric coercion used for sorting: leading numeric prefix of a
/// string, failure → 0.
pub fn parse_hours(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_float_prefix(s),
        _ => 0.0,
    }
}

fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let mut last_valid = 0;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
                last_valid = end;
            }
            b'.' if !seen_dot && !seen_exp => {
                seen_dot = true;
                end += 1;
            }
            b'e' | b'E' if seen_digit && !seen_exp => {
                seen_exp = true;
                end += 1;
                if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
                    end += 1;
                }
            }
            _ => break,
        }
    }

    if !seen_digit {
        return 0.0;
    }
    s[..last_valid]
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Tracker link for an issue key.
pub fn browse_url(base: &str, issue_key: &str) -> String {
    format!(
        "{}/browse/{}",
        base.trim_end_matches('/'),
        urlencoding::encode(issue_key)
    )
}

/// Text for optional fields in tables.
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(&Value::Null), "-");
        assert_eq!(format_hours(&json!(3)), "3ч");
        assert_eq!(format_hours(&json!(2.5)), "2.50ч");
        assert_eq!(format_hours(&json!("abc")), "-");
        assert_eq!(format_hours(&json!("null")), "-");
        assert_eq!(format_hours(&json!("")), "-");
        assert_eq!(format_hours(&json!("8.00")), "8ч");
        assert_eq!(format_hours(&json!({"h": 1})), "-");
        assert_eq!(format_hours(&json!(0)), "0ч");
    }

    #[test]
    fn test_format_hours_large_and_negative_zero() {
        assert_eq!(format_hours(&json!(1e20)), "100000000000000000000ч");
        assert_eq!(format_hours(&json!("-0")), "0ч");
        assert_eq!(format_sprint_hours(&json!(1e20)), "100000000000000000000");
    }

    #[test]
    fn test_format_sprint_hours() {
        assert_eq!(format_sprint_hours(&Value::Null), "0");
        assert_eq!(format_sprint_hours(&json!(0)), "0");
        assert_eq!(format_sprint_hours(&json!(40)), "40");
        assert_eq!(format_sprint_hours(&json!("12.345")), "12.35");
    }

    #[test]
    fn test_parse_hours_prefix() {
        assert_eq!(parse_hours(&json!("5h")), 5.0);
        assert_eq!(parse_hours(&json!("2.5")), 2.5);
        assert_eq!(parse_hours(&json!("abc")), 0.0);
        assert_eq!(parse_hours(&json!("-1.5e1x")), -15.0);
        assert_eq!(parse_hours(&json!("1.")), 1.0);
        assert_eq!(parse_hours(&Value::Null), 0.0);
        assert_eq!(parse_hours(&json!(7)), 7.0);
    }

    #[test]
    fn test_status_class_order() {
        assert_eq!(StatusClass::classify(Some("В работе")), StatusClass::InProgress);
        assert_eq!(StatusClass::classify(Some("In Progress")), StatusClass::InProgress);
        assert_eq!(StatusClass::classify(Some("Готово")), StatusClass::Done);
        assert_eq!(StatusClass::classify(Some("CLOSED")), StatusClass::Done);
        assert_eq!(StatusClass::classify(Some("Открыто")), StatusClass::Open);
        assert_eq!(StatusClass::classify(Some("New")), StatusClass::Open);
        assert_eq!(StatusClass::classify(Some("Review")), StatusClass::Closed);
        assert_eq!(StatusClass::classify(None), StatusClass::Closed);
        // "done" is checked before "open"
        assert_eq!(StatusClass::classify(Some("Reopened done")), StatusClass::Done);
    }

    #[test]
    fn test_priority_and_row_class() {
        assert_eq!(PriorityClass::classify(Some("Высокий")), PriorityClass::High);
        assert_eq!(PriorityClass::classify(Some("Medium")), PriorityClass::Medium);
        assert_eq!(PriorityClass::classify(Some("низкий")), PriorityClass::Low);
        assert_eq!(PriorityClass::classify(Some("Blocker")), PriorityClass::None);
        assert_eq!(RowClass::classify(Some("История")), RowClass::Story);
        assert_eq!(RowClass::classify(Some("Epic")), RowClass::Epic);
        assert_eq!(RowClass::classify(Some("Задача")), RowClass::Default);
    }

    #[test]
    fn test_browse_url() {
        assert_eq!(
            browse_url("https://jira.example.com/", "MAR-42"),
            "https://jira.example.com/browse/MAR-42"
        );
        assert_eq!(browse_url("http://j", "A B"), "http://j/browse/A%20B");
    }
}
