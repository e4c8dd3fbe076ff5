//! Background fetches reporting to the UI over a channel.
//!
//! Each fetch runs in its own task and sends exactly one [`LoadEvent`].
//! Nothing is de-duplicated or cancelled: the UI applies events in arrival
//! order.

use anyhow::Error;
use tokio::sync::mpsc;

use super::ApiClient;
use crate::data::{
    CurrentSprintIssues, CurrentSprintStats, GraphData, Issue, IssueDetails, SeoTask, Statistics,
};
use crate::util::send_or_log;

#[derive(Debug)]
pub enum LoadEvent {
    Statistics(Statistics),
    Issues(Vec<Issue>),
    /// Statistics or issues could not be loaded
    LoadFailed(Error),
    SprintStats(Result<CurrentSprintStats, Error>),
    SprintIssues(Result<CurrentSprintIssues, Error>),
    Graph(Result<GraphData, Error>),
    SeoTasks(Result<Vec<SeoTask>, Error>),
    IssueDetails {
        issue_key: String,
        result: Result<IssueDetails, Error>,
    },
}

/// Initial and manual-refresh load: statistics, then issues, then the
/// current sprint stats. A primary failure stops the sequence.
pub async fn load_dashboard(api: &ApiClient, tx: &mpsc::Sender<LoadEvent>) {
    match api.statistics().await {
        Ok(stats) => send_or_log(tx, LoadEvent::Statistics(stats), "statistics").await,
        Err(e) => {
            tracing::error!("Failed to load statistics: {:#}", e);
            send_or_log(tx, LoadEvent::LoadFailed(e), "load failure").await;
            return;
        }
    }

    match api.issues().await {
        Ok(issues) => {
            tracing::info!("Loaded {} issues", issues.len());
            send_or_log(tx, LoadEvent::Issues(issues), "issues").await;
        }
        Err(e) => {
            tracing::error!("Failed to load issues: {:#}", e);
            send_or_log(tx, LoadEvent::LoadFailed(e), "load failure").await;
            return;
        }
    }

    let stats = api.current_sprint_stats().await;
    send_or_log(tx, LoadEvent::SprintStats(stats), "sprint stats").await;
}

pub fn spawn_dashboard_load(api: ApiClient, tx: mpsc::Sender<LoadEvent>) {
    tokio::spawn(async move {
        load_dashboard(&api, &tx).await;
    });
}

pub fn spawn_sprint_stats(api: ApiClient, tx: mpsc::Sender<LoadEvent>) {
    tokio::spawn(async move {
        let result = api.current_sprint_stats().await;
        send_or_log(&tx, LoadEvent::SprintStats(result), "sprint stats").await;
    });
}

pub fn spawn_sprint_issues(api: ApiClient, tx: mpsc::Sender<LoadEvent>) {
    tokio::spawn(async move {
        let result = api.current_sprint_issues().await;
        send_or_log(&tx, LoadEvent::SprintIssues(result), "sprint issues").await;
    });
}

pub fn spawn_graph(api: ApiClient, tx: mpsc::Sender<LoadEvent>) {
    tokio::spawn(async move {
        let result = api.graph().await;
        send_or_log(&tx, LoadEvent::Graph(result), "graph").await;
    });
}

pub fn spawn_seo_tasks(api: ApiClient, tx: mpsc::Sender<LoadEvent>) {
    tokio::spawn(async move {
        let result = api.my_seo_tasks().await;
        send_or_log(&tx, LoadEvent::SeoTasks(result), "seo tasks").await;
    });
}

pub fn spawn_issue_details(api: ApiClient, tx: mpsc::Sender<LoadEvent>, issue_key: String) {
    tokio::spawn(async move {
        let result = api.issue_details(&issue_key).await;
        send_or_log(
            &tx,
            LoadEvent::IssueDetails { issue_key, result },
            "issue details",
        )
        .await;
    });
}
