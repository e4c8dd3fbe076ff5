//! Test utilities and fixtures for jira-dashboard tests
#![allow(dead_code)]

pub mod http_stub;

use jira_dashboard::config::Config;
use jira_dashboard::data::{GraphData, GraphEdge, GraphNode, Issue, LinkDirection, SprintWorkloadStats};
use serde_json::{json, Value};

/// Config pointing at a backend that is never reached.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.server.base_url = "http://127.0.0.1:9".to_string();
    config.tracker.browse_url = "https://jira.example.com".to_string();
    config
}

/// Issue with the fields the filters and sorts look at.
pub fn make_issue(key: &str, issue_type: &str, status: &str, sprint: &str) -> Issue {
    Issue {
        issue_key: key.to_string(),
        issue_type: Some(issue_type.to_string()),
        status: Some(status.to_string()),
        summary: Some(format!("Summary of {}", key)),
        sprint: Some(sprint.to_string()),
        ..Default::default()
    }
}

pub fn with_assignee(mut issue: Issue, assignee: Option<&str>) -> Issue {
    issue.assignee = assignee.map(str::to_string);
    issue
}

pub fn with_hours(mut issue: Issue, estimate: Value, spent: Value) -> Issue {
    issue.time_original_estimate = estimate;
    issue.time_spent = spent;
    issue
}

/// A small mixed backlog across two sprints.
pub fn sample_issues() -> Vec<Issue> {
    vec![
        with_hours(
            with_assignee(make_issue("MAR-3", "Задача", "В работе", "MAR #24"), Some("Иван")),
            json!("8.00"),
            json!(2),
        ),
        with_hours(
            with_assignee(make_issue("MAR-1", "История", "Открыто", "MAR #24"), Some("Анна")),
            json!(4),
            Value::Null,
        ),
        with_hours(
            with_assignee(make_issue("MAR-2", "Эпик", "Готово", "MAR #23"), None),
            json!("16"),
            json!("12.5"),
        ),
        with_hours(
            with_assignee(make_issue("SEO-7", "Задача", "Готово", "MAR #23"), Some("Иван")),
            Value::Null,
            json!(1),
        ),
    ]
}

pub fn sprint_stats(workload_percent: f64) -> SprintWorkloadStats {
    SprintWorkloadStats {
        sprint_name: "MAR 08.12.25 - 22.12.25 #24".to_string(),
        sprint_capacity: 80.0,
        total_estimated: workload_percent * 0.8,
        workload_percent,
        total_tasks: 10,
        completed_tasks: 4,
        in_progress_tasks: 3,
        open_tasks: 3,
        progress_percent: 40.0,
        time_used_percent: 50.0,
        remaining_capacity: 40.0,
        remaining_work: 30.0,
        workload_status: String::new(),
        ..Default::default()
    }
}

pub fn sample_graph() -> GraphData {
    let node = |key: &str, issue_type: &str, status: &str| GraphNode {
        issue_key: key.to_string(),
        summary: Some(format!("Summary of {}", key)),
        status: Some(status.to_string()),
        issue_type: Some(issue_type.to_string()),
        ..Default::default()
    };
    GraphData {
        nodes: vec![
            node("MAR-1", "Эпик", "В работе"),
            node("MAR-2", "История", "Готово"),
            node("MAR-3", "Задача", "Открыто"),
        ],
        edges: vec![
            GraphEdge {
                source_issue_key: "MAR-1".to_string(),
                target_issue_key: "MAR-2".to_string(),
                direction: LinkDirection::Outward,
                direction_label: Some("blocks".to_string()),
                link_type_name: Some("Blocks".to_string()),
            },
            GraphEdge {
                source_issue_key: "MAR-3".to_string(),
                target_issue_key: "MAR-1".to_string(),
                direction: LinkDirection::Inward,
                direction_label: Some("is blocked by".to_string()),
                link_type_name: Some("Blocks".to_string()),
            },
        ],
    }
}
