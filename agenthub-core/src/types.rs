//! Core domain types for agenthub
//!
//! Records come from the analysis backend and are passed through unchanged.
//! Each struct names the fields the client itself reads (identifiers and the
//! fields used for filtering) and keeps everything else in `extra`, so a
//! record serializes back to the shape the server sent.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Project** | A codebase registered with the backend; owns code files, issues, suggestions and rules |
//! | **Agent** | A backend analysis routine identified by a type string |
//! | **Suggestion** | A finding or proposed change produced by an agent run, subject to approval |
//! | **Business Rule** | A versioned, approvable policy record scoped to a project |
//! | **Change Impact** | An analysis of the effect of a proposed change, scoped to a project |

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Extra fields carried through untouched
pub type Extra = Map<String, Value>;

// ============================================
// Projects & code files
// ============================================

/// A project registered with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for `POST /projects/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
}

/// A source file uploaded to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for `POST /projects/{id}/files`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCodeFile {
    pub file_path: String,
    pub content: String,
    #[serde(default)]
    pub language: String,
}

// ============================================
// Agents
// ============================================

/// One entry of `GET /agents/types`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentType {
    pub value: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Envelope returned by `GET /agents/types`
#[derive(Debug, Clone, Deserialize)]
pub struct AgentTypeList {
    pub agent_types: Vec<AgentType>,
}

/// Body for `POST /agents/{type}/analyze`.
///
/// Only `project_id` is common to every agent; agent-specific inputs
/// (`rule_ids`, `release_version`, `original_prompt`, ...) go in `params`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub project_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_file_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_ids: Option<Vec<String>>,
    #[serde(flatten)]
    pub params: Extra,
}

/// Outcome of the most recent agent run.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentRunResult {
    /// Payload returned by the server
    Completed(Value),
    /// Synthesized record for a failed run
    Failed { error: String },
}

impl AgentRunResult {
    pub fn is_error(&self) -> bool {
        matches!(self, AgentRunResult::Failed { .. })
    }

    /// The record a view renders: the server payload, or
    /// `{"status": "error", "error": <message>}`.
    pub fn to_value(&self) -> Value {
        match self {
            AgentRunResult::Completed(value) => value.clone(),
            AgentRunResult::Failed { error } => {
                serde_json::json!({ "status": "error", "error": error })
            }
        }
    }
}

impl Serialize for AgentRunResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

/// Body for `POST /orchestration/run-sequence`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceRequest {
    pub project_id: i64,
    pub agent_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_file_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_version: Option<String>,
}

/// Body for `POST /orchestration/trigger-by-change`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeTrigger {
    pub project_id: i64,
    pub change_type: String,
    pub rule_ids: Option<Vec<String>>,
}

// ============================================
// Suggestions & approvals
// ============================================

/// A finding produced by an agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    #[serde(default)]
    pub agent_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Query parameters for `GET /suggestions/`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionQuery {
    pub project_id: Option<i64>,
    pub agent_type: Option<String>,
    pub status: Option<String>,
}

impl SuggestionQuery {
    /// Key/value pairs actually sent; empty values are dropped.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(project_id) = self.project_id {
            pairs.push(("project_id", project_id.to_string()));
        }
        if let Some(agent_type) = non_empty(&self.agent_type) {
            pairs.push(("agent_type", agent_type.to_string()));
        }
        if let Some(status) = non_empty(&self.status) {
            pairs.push(("status", status.to_string()));
        }
        pairs
    }
}

/// Active suggestion filters. `None` means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionFilters {
    pub agent_type: Option<String>,
    pub status: Option<String>,
}

impl SuggestionFilters {
    /// Merge an update: fields present in `update` replace ours, and an empty
    /// string clears the filter.
    pub fn merge(&mut self, update: SuggestionFilters) {
        if let Some(agent_type) = update.agent_type {
            self.agent_type = Some(agent_type).filter(|v| !v.is_empty());
        }
        if let Some(status) = update.status {
            self.status = Some(status).filter(|v| !v.is_empty());
        }
    }

    pub fn matches(&self, suggestion: &Suggestion) -> bool {
        self.agent_type
            .as_deref()
            .map_or(true, |t| suggestion.agent_type == t)
            && self
                .status
                .as_deref()
                .map_or(true, |s| suggestion.status == s)
    }
}

/// What the reviewer decided about a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approve,
    Reject,
    Modify,
}

impl ApprovalAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
            ApprovalAction::Modify => "modify",
        }
    }
}

impl std::str::FromStr for ApprovalAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(ApprovalAction::Approve),
            "reject" => Ok(ApprovalAction::Reject),
            "modify" => Ok(ApprovalAction::Modify),
            other => Err(format!("unknown approval action: {other}")),
        }
    }
}

/// Body for `POST /approvals/suggestions/{id}/approve`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalRequest {
    pub user_action: ApprovalAction,
    pub comments: String,
}

/// One approval decision recorded against a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_id: Option<i64>,
    #[serde(default)]
    pub user_action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================
// Issues
// ============================================

/// A tracked issue within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for `POST /issues/projects/{id}/issues`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_file_id: Option<i64>,
}

// ============================================
// Business rules
// ============================================

/// Lifecycle state of a business rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleStatus {
    Draft,
    PendingApproval,
    Approved,
    /// Any status this client does not know about, kept verbatim
    Other(String),
}

impl RuleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RuleStatus::Draft => "draft",
            RuleStatus::PendingApproval => "pending_approval",
            RuleStatus::Approved => "approved",
            RuleStatus::Other(s) => s,
        }
    }
}

impl From<&str> for RuleStatus {
    fn from(s: &str) -> Self {
        match s {
            "draft" => RuleStatus::Draft,
            "pending_approval" => RuleStatus::PendingApproval,
            "approved" => RuleStatus::Approved,
            other => RuleStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RuleStatus {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleStatus {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(RuleStatus::from(raw.as_str()))
    }
}

/// A versioned policy record, identified by its string `rule_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRule {
    pub rule_id: String,
    pub status: RuleStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for `POST /business-rules/projects/{id}/rules`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewBusinessRule {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Body for `PUT /business-rules/rules/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessRuleUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RuleStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// One historical version of a business rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVersion {
    #[serde(default)]
    pub rule_id: String,
    #[serde(default)]
    pub version: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================
// Change impact
// ============================================

/// Result of a change-impact analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeImpact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub project_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Body for `POST /change-impact/analyze`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeImpactRequest {
    pub project_id: i64,
    pub change_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_ids: Option<Vec<String>>,
}

// ============================================
// Dashboard & chat
// ============================================

/// Payload of `GET /dashboard/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub metrics: Map<String, Value>,
    #[serde(default)]
    pub ai_insights: Vec<Value>,
    #[serde(default)]
    pub charts: Map<String, Value>,
}

/// Body for `POST /chat/message`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub message: String,
    pub agent_id: Option<String>,
}

/// Reply from `POST /chat/message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    #[serde(default)]
    pub agent: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
