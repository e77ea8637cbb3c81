//! REST client for the analysis backend
//!
//! [`Backend`] is the seam the stores talk through: one async method per
//! endpoint. [`ApiClient`] implements it over HTTP; tests substitute an
//! in-memory implementation.
//!
//! Every call is a direct mapping to one request. There is no batching,
//! no retry and no timeout beyond the HTTP library default. A non-2xx
//! response becomes [`Error::Api`](crate::Error::Api) carrying the server's
//! `detail`, and a request that never got a response becomes
//! [`Error::Transport`](crate::Error::Transport).

mod client;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{
    AgentType, AnalyzeRequest, Approval, ApprovalAction, BusinessRule, BusinessRuleUpdate,
    ChangeImpact, ChangeImpactRequest, ChatReply, CodeFile, DashboardStats, Issue,
    NewBusinessRule, NewCodeFile, NewIssue, NewProject, Project, RuleStatus, RuleVersion,
    SequenceRequest, Suggestion, SuggestionQuery,
};

pub use client::ApiClient;

/// One async method per backend endpoint.
#[async_trait]
pub trait Backend: Send + Sync {
    // Projects
    async fn list_projects(&self) -> Result<Vec<Project>>;
    async fn get_project(&self, project_id: i64) -> Result<Project>;
    async fn create_project(&self, project: &NewProject) -> Result<Project>;
    async fn list_code_files(&self, project_id: i64) -> Result<Vec<CodeFile>>;
    async fn create_code_file(&self, project_id: i64, file: &NewCodeFile) -> Result<CodeFile>;
    async fn get_code_file(&self, project_id: i64, file_id: i64) -> Result<CodeFile>;

    // Agents
    async fn list_agent_types(&self) -> Result<Vec<AgentType>>;
    async fn run_agent(&self, agent_type: &str, request: &AnalyzeRequest) -> Result<Value>;

    // Suggestions & approvals
    async fn list_suggestions(&self, query: &SuggestionQuery) -> Result<Vec<Suggestion>>;
    async fn get_suggestion(&self, suggestion_id: i64) -> Result<Suggestion>;
    async fn approve_suggestion(
        &self,
        suggestion_id: i64,
        action: ApprovalAction,
        comments: &str,
    ) -> Result<Approval>;
    async fn get_approval_history(&self, suggestion_id: i64) -> Result<Vec<Approval>>;

    // Issues
    async fn create_issue(&self, project_id: i64, issue: &NewIssue) -> Result<Issue>;
    async fn list_issues(&self, project_id: i64) -> Result<Vec<Issue>>;
    async fn get_issue(&self, issue_id: i64) -> Result<Issue>;
    async fn update_issue_status(&self, issue_id: i64, status: &str) -> Result<Issue>;

    // Business rules
    async fn list_business_rules(
        &self,
        project_id: i64,
        status: Option<&RuleStatus>,
    ) -> Result<Vec<BusinessRule>>;
    async fn create_business_rule(
        &self,
        project_id: i64,
        rule: &NewBusinessRule,
    ) -> Result<BusinessRule>;
    async fn get_business_rule(&self, rule_id: &str) -> Result<BusinessRule>;
    async fn update_business_rule(
        &self,
        rule_id: &str,
        update: &BusinessRuleUpdate,
    ) -> Result<BusinessRule>;
    async fn approve_business_rule(&self, rule_id: &str, approved_by: &str)
        -> Result<BusinessRule>;
    async fn get_rule_versions(&self, rule_id: &str) -> Result<Vec<RuleVersion>>;

    // Change impact
    async fn analyze_change_impact(&self, request: &ChangeImpactRequest) -> Result<Value>;
    async fn list_change_impacts(&self, project_id: i64) -> Result<Vec<ChangeImpact>>;
    async fn get_change_impact(&self, impact_id: i64) -> Result<ChangeImpact>;

    // Orchestration
    async fn run_agent_sequence(&self, request: &SequenceRequest) -> Result<Value>;
    async fn trigger_by_change(
        &self,
        project_id: i64,
        change_type: &str,
        rule_ids: Option<&[String]>,
    ) -> Result<Value>;

    // Dashboard & chat
    async fn get_dashboard_stats(&self) -> Result<DashboardStats>;
    async fn send_chat_message(&self, message: &str, agent_id: Option<&str>) -> Result<ChatReply>;
}
