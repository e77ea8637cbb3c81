//! Issues, optionally scoped to one project

use std::sync::Arc;

use crate::api::Backend;
use crate::error::Result;
use crate::types::{Issue, NewIssue};

use super::{replace_by, ActionStatus, ProjectStore, Shared, Tracked};

#[derive(Debug, Default)]
struct IssueState {
    issues: Vec<Issue>,
    current_issue: Option<Issue>,
    filter_project_id: Option<i64>,
    status: ActionStatus,
}

impl Tracked for IssueState {
    fn status_mut(&mut self) -> &mut ActionStatus {
        &mut self.status
    }
}

/// Issue list. Without a project filter the list spans every known project.
pub struct IssueStore {
    api: Arc<dyn Backend>,
    state: Shared<IssueState>,
}

impl IssueStore {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            state: Shared::default(),
        }
    }

    // ========== Actions ==========

    /// Fetch issues for the filtered project, or for every project currently
    /// in `projects` when no filter is set.
    ///
    /// The unfiltered fetch asks each project in list order and concatenates
    /// what comes back. A project whose fetch fails is logged and skipped;
    /// the others still land in the list and the call succeeds.
    pub async fn fetch_issues(&self, projects: &ProjectStore) -> Result<Vec<Issue>> {
        let filter = self.state.read(|s| s.filter_project_id);
        self.state
            .track("fetch_issues", async {
                let issues = match filter {
                    Some(project_id) => self.api.list_issues(project_id).await?,
                    None => self.fan_out(projects).await,
                };
                self.state.write(|s| s.issues = issues.clone());
                Ok(issues)
            })
            .await
    }

    async fn fan_out(&self, projects: &ProjectStore) -> Vec<Issue> {
        let mut all = Vec::new();
        for project in projects.projects() {
            match self.api.list_issues(project.id).await {
                Ok(issues) => all.extend(issues),
                // TODO: surface partial failures once product confirms whether the
                // aggregate view should show them.
                Err(e) => tracing::warn!(
                    project_id = project.id,
                    error = %e,
                    "Failed to fetch issues for project"
                ),
            }
        }
        all
    }

    /// Replace the list with one project's issues.
    pub async fn fetch_issues_by_project(&self, project_id: i64) -> Result<Vec<Issue>> {
        self.state
            .track("fetch_issues_by_project", self.load_project_issues(project_id))
            .await
    }

    /// Create an issue, append it, then re-fetch that project's issues.
    pub async fn create_issue(&self, project_id: i64, issue: &NewIssue) -> Result<Issue> {
        self.state
            .track("create_issue", async {
                let created = self.api.create_issue(project_id, issue).await?;
                self.state.write(|s| s.issues.push(created.clone()));
                self.load_project_issues(project_id).await?;
                Ok(created)
            })
            .await
    }

    pub async fn update_issue_status(&self, issue_id: i64, status: &str) -> Result<Issue> {
        self.state
            .track("update_issue_status", async {
                let updated = self.api.update_issue_status(issue_id, status).await?;
                self.state
                    .write(|s| replace_by(&mut s.issues, updated.clone(), |i| i.id));
                Ok(updated)
            })
            .await
    }

    pub async fn fetch_issue(&self, issue_id: i64) -> Result<Issue> {
        self.state
            .track("fetch_issue", async {
                let issue = self.api.get_issue(issue_id).await?;
                self.state.write(|s| s.current_issue = Some(issue.clone()));
                Ok(issue)
            })
            .await
    }

    /// Set or clear the project filter, then fetch accordingly.
    pub async fn set_filter_project_id(
        &self,
        project_id: Option<i64>,
        projects: &ProjectStore,
    ) -> Result<Vec<Issue>> {
        self.state.write(|s| s.filter_project_id = project_id);
        match project_id {
            Some(project_id) => self.fetch_issues_by_project(project_id).await,
            None => self.fetch_issues(projects).await,
        }
    }

    async fn load_project_issues(&self, project_id: i64) -> Result<Vec<Issue>> {
        let issues = self.api.list_issues(project_id).await?;
        self.state.write(|s| s.issues = issues.clone());
        Ok(issues)
    }

    // ========== Views ==========

    pub fn issues(&self) -> Vec<Issue> {
        self.state.read(|s| s.issues.clone())
    }

    pub fn issue_by_id(&self, issue_id: i64) -> Option<Issue> {
        self.state
            .read(|s| s.issues.iter().find(|i| i.id == issue_id).cloned())
    }

    pub fn current_issue(&self) -> Option<Issue> {
        self.state.read(|s| s.current_issue.clone())
    }

    pub fn filter_project_id(&self) -> Option<i64> {
        self.state.read(|s| s.filter_project_id)
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.status.is_loading())
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.status.error.clone())
    }
}
