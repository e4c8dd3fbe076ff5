//! Client for the dashboard backend's `/api/*` endpoints.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use super::HTTP_CLIENT;
use crate::data::{
    CurrentSprintIssues, CurrentSprintStats, GraphData, Issue, IssueDetails, SeoTask, Statistics,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!("GET {}", url);

        let response = HTTP_CLIENT
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("{} returned {}", url, status);
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    pub async fn statistics(&self) -> Result<Statistics> {
        self.get_json("/api/statistics").await
    }

    pub async fn issues(&self) -> Result<Vec<Issue>> {
        self.get_json("/api/issues").await
    }

    pub async fn current_sprint_stats(&self) -> Result<CurrentSprintStats> {
        self.get_json("/api/current-sprint-stats").await
    }

    pub async fn current_sprint_issues(&self) -> Result<CurrentSprintIssues> {
        self.get_json("/api/current-sprint-issues").await
    }

    pub async fn graph(&self) -> Result<GraphData> {
        self.get_json("/api/graph").await
    }

    pub async fn my_seo_tasks(&self) -> Result<Vec<SeoTask>> {
        self.get_json("/api/my-tasks-seo").await
    }

    pub async fn issue_details(&self, issue_key: &str) -> Result<IssueDetails> {
        let path = format!("/api/issue/{}", urlencoding::encode(issue_key));
        self.get_json(&path).await
    }
}
