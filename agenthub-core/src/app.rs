//! Application state shared by every page.

use std::sync::Arc;

use crate::api::{ApiClient, Backend};
use crate::config::ApiConfig;
use crate::error::Result;
use crate::store::{
    AgentStore, BusinessRuleStore, ChangeImpactStore, IssueStore, ProjectStore, SuggestionStore,
};
use crate::types::{ChatReply, DashboardStats, Issue};

/// The six state containers plus the backend they share.
///
/// Built once at startup and handed to pages by reference; there is no
/// global instance. Stores live as long as the `AppState` does.
pub struct AppState {
    api: Arc<dyn Backend>,
    pub projects: ProjectStore,
    pub agents: AgentStore,
    pub suggestions: SuggestionStore,
    pub issues: IssueStore,
    pub business_rules: BusinessRuleStore,
    pub change_impacts: ChangeImpactStore,
}

impl AppState {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            projects: ProjectStore::new(Arc::clone(&api)),
            agents: AgentStore::new(Arc::clone(&api)),
            suggestions: SuggestionStore::new(Arc::clone(&api)),
            issues: IssueStore::new(Arc::clone(&api)),
            business_rules: BusinessRuleStore::new(Arc::clone(&api)),
            change_impacts: ChangeImpactStore::new(Arc::clone(&api)),
            api,
        }
    }

    /// Build the HTTP client from configuration and wrap it.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = ApiClient::from_config(config)?;
        tracing::info!(base_url = client.base_url(), "API client ready");
        Ok(Self::new(Arc::new(client)))
    }

    /// Fetch issues for the active filter, fanning out over the projects
    /// currently loaded when no filter is set.
    pub async fn fetch_issues(&self) -> Result<Vec<Issue>> {
        self.issues.fetch_issues(&self.projects).await
    }

    pub async fn set_issue_filter(&self, project_id: Option<i64>) -> Result<Vec<Issue>> {
        self.issues
            .set_filter_project_id(project_id, &self.projects)
            .await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.api.get_dashboard_stats().await
    }

    pub async fn send_chat_message(
        &self,
        message: &str,
        agent_id: Option<&str>,
    ) -> Result<ChatReply> {
        self.api.send_chat_message(message, agent_id).await
    }
}
