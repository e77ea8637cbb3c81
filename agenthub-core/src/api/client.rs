//! HTTP implementation of [`Backend`]

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::{resolve_base_url, ApiConfig};
use crate::error::{Error, Result};
use crate::types::{
    AgentType, AgentTypeList, AnalyzeRequest, Approval, ApprovalAction, ApprovalRequest,
    BusinessRule, BusinessRuleUpdate, ChangeImpact, ChangeImpactRequest, ChangeTrigger,
    ChatMessage, ChatReply, CodeFile, DashboardStats, Issue, NewBusinessRule, NewCodeFile,
    NewIssue, NewProject, Project, RuleStatus, RuleVersion, SequenceRequest, Suggestion,
    SuggestionQuery,
};

use super::Backend;

/// HTTP client for the analysis backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client that sends every request under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("base URL must not be empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Create a client from configuration. The base URL is resolved once,
    /// here, and never re-evaluated.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(resolve_base_url(config)?)
    }

    /// The resolved base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!(%method, path, "API request");

        let mut request = self.http_client.request(method.clone(), self.url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::new());
            tracing::warn!(%method, path, status = status.as_u16(), "API error response");
            Err(Error::from_response(status.as_u16(), body))
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send::<(), T>(Method::GET, path, &[], None).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, &[], Some(body)).await
    }
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[async_trait]
impl Backend for ApiClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get("/projects/").await
    }

    async fn get_project(&self, project_id: i64) -> Result<Project> {
        self.get(&format!("/projects/{}", project_id)).await
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project> {
        self.post("/projects/", project).await
    }

    async fn list_code_files(&self, project_id: i64) -> Result<Vec<CodeFile>> {
        self.get(&format!("/projects/{}/files", project_id)).await
    }

    async fn create_code_file(&self, project_id: i64, file: &NewCodeFile) -> Result<CodeFile> {
        self.post(&format!("/projects/{}/files", project_id), file)
            .await
    }

    async fn get_code_file(&self, project_id: i64, file_id: i64) -> Result<CodeFile> {
        self.get(&format!("/projects/{}/files/{}", project_id, file_id))
            .await
    }

    async fn list_agent_types(&self) -> Result<Vec<AgentType>> {
        let list: AgentTypeList = self.get("/agents/types").await?;
        Ok(list.agent_types)
    }

    async fn run_agent(&self, agent_type: &str, request: &AnalyzeRequest) -> Result<Value> {
        self.post(&format!("/agents/{}/analyze", segment(agent_type)), request)
            .await
    }

    async fn list_suggestions(&self, query: &SuggestionQuery) -> Result<Vec<Suggestion>> {
        self.send::<(), _>(Method::GET, "/suggestions/", &query.to_pairs(), None)
            .await
    }

    async fn get_suggestion(&self, suggestion_id: i64) -> Result<Suggestion> {
        self.get(&format!("/suggestions/{}", suggestion_id)).await
    }

    async fn approve_suggestion(
        &self,
        suggestion_id: i64,
        action: ApprovalAction,
        comments: &str,
    ) -> Result<Approval> {
        let body = ApprovalRequest {
            user_action: action,
            comments: comments.to_string(),
        };
        self.post(
            &format!("/approvals/suggestions/{}/approve", suggestion_id),
            &body,
        )
        .await
    }

    async fn get_approval_history(&self, suggestion_id: i64) -> Result<Vec<Approval>> {
        self.get(&format!("/approvals/suggestions/{}/history", suggestion_id))
            .await
    }

    async fn create_issue(&self, project_id: i64, issue: &NewIssue) -> Result<Issue> {
        self.post(&format!("/issues/projects/{}/issues", project_id), issue)
            .await
    }

    async fn list_issues(&self, project_id: i64) -> Result<Vec<Issue>> {
        self.get(&format!("/issues/projects/{}/issues", project_id))
            .await
    }

    async fn get_issue(&self, issue_id: i64) -> Result<Issue> {
        self.get(&format!("/issues/{}", issue_id)).await
    }

    async fn update_issue_status(&self, issue_id: i64, status: &str) -> Result<Issue> {
        self.send::<(), _>(
            Method::PATCH,
            &format!("/issues/{}/status", issue_id),
            &[("status", status.to_string())],
            None,
        )
        .await
    }

    async fn list_business_rules(
        &self,
        project_id: i64,
        status: Option<&RuleStatus>,
    ) -> Result<Vec<BusinessRule>> {
        let query: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.as_str().to_string())])
            .unwrap_or_default();
        self.send::<(), _>(
            Method::GET,
            &format!("/business-rules/projects/{}/rules", project_id),
            &query,
            None,
        )
        .await
    }

    async fn create_business_rule(
        &self,
        project_id: i64,
        rule: &NewBusinessRule,
    ) -> Result<BusinessRule> {
        self.post(
            &format!("/business-rules/projects/{}/rules", project_id),
            rule,
        )
        .await
    }

    async fn get_business_rule(&self, rule_id: &str) -> Result<BusinessRule> {
        self.get(&format!("/business-rules/rules/{}", segment(rule_id)))
            .await
    }

    async fn update_business_rule(
        &self,
        rule_id: &str,
        update: &BusinessRuleUpdate,
    ) -> Result<BusinessRule> {
        self.send(
            Method::PUT,
            &format!("/business-rules/rules/{}", segment(rule_id)),
            &[],
            Some(update),
        )
        .await
    }

    async fn approve_business_rule(
        &self,
        rule_id: &str,
        approved_by: &str,
    ) -> Result<BusinessRule> {
        self.post(
            &format!("/business-rules/rules/{}/approve", segment(rule_id)),
            &serde_json::json!({ "approved_by": approved_by }),
        )
        .await
    }

    async fn get_rule_versions(&self, rule_id: &str) -> Result<Vec<RuleVersion>> {
        self.get(&format!("/business-rules/rules/{}/versions", segment(rule_id)))
            .await
    }

    async fn analyze_change_impact(&self, request: &ChangeImpactRequest) -> Result<Value> {
        self.post("/change-impact/analyze", request).await
    }

    async fn list_change_impacts(&self, project_id: i64) -> Result<Vec<ChangeImpact>> {
        self.get(&format!("/change-impact/projects/{}/impacts", project_id))
            .await
    }

    async fn get_change_impact(&self, impact_id: i64) -> Result<ChangeImpact> {
        self.get(&format!("/change-impact/{}", impact_id)).await
    }

    async fn run_agent_sequence(&self, request: &SequenceRequest) -> Result<Value> {
        self.post("/orchestration/run-sequence", request).await
    }

    async fn trigger_by_change(
        &self,
        project_id: i64,
        change_type: &str,
        rule_ids: Option<&[String]>,
    ) -> Result<Value> {
        let body = ChangeTrigger {
            project_id,
            change_type: change_type.to_string(),
            rule_ids: rule_ids.map(<[String]>::to_vec),
        };
        self.post("/orchestration/trigger-by-change", &body).await
    }

    async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        self.get("/dashboard/stats").await
    }

    async fn send_chat_message(&self, message: &str, agent_id: Option<&str>) -> Result<ChatReply> {
        let body = ChatMessage {
            message: message.to_string(),
            agent_id: agent_id.map(str::to_string),
        };
        self.post("/chat/message", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Mode;

    #[test]
    fn test_client_rejects_empty_base_url() {
        assert!(ApiClient::new("").is_err());
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.url("/projects/"),
            "http://localhost:8000/api/projects/"
        );
    }

    #[test]
    fn test_client_from_production_config() {
        let config = ApiConfig {
            mode: Mode::Production,
            origin: Some("https://hub.example.com".to_string()),
            ..Default::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://hub.example.com/api");
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(segment("BR 001/x"), "BR%20001%2Fx");
        assert_eq!(segment("quality_test"), "quality_test");
    }
}
