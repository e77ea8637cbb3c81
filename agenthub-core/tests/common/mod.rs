//! Scripted in-memory backend for store tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use agenthub_core::api::Backend;
use agenthub_core::{
    AgentType, AnalyzeRequest, Approval, ApprovalAction, BusinessRule, BusinessRuleUpdate,
    ChangeImpact, ChangeImpactRequest, ChatReply, CodeFile, DashboardStats, Error, Issue,
    NewBusinessRule, NewCodeFile, NewIssue, NewProject, Project, Result, RuleStatus, RuleVersion,
    SequenceRequest, Suggestion, SuggestionQuery,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Notify;

/// One queued answer for a backend method.
pub enum Reply {
    Ok(Value),
    Api { status: u16, detail: String },
    Transport(String),
}

/// Holds a call open until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

/// Backend whose answers are queued per method name.
///
/// Every call is appended to the call log as `method` or `method:args`.
/// A call with no queued reply panics, so an unexpected request fails the
/// test loudly.
#[derive(Default)]
pub struct MockBackend {
    replies: Mutex<HashMap<&'static str, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, Arc<Gate>>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn ok(&self, method: &'static str, value: Value) -> &Self {
        self.push(method, Reply::Ok(value))
    }

    pub fn api_error(&self, method: &'static str, status: u16, detail: &str) -> &Self {
        self.push(
            method,
            Reply::Api {
                status,
                detail: detail.to_string(),
            },
        )
    }

    pub fn transport_error(&self, method: &'static str, message: &str) -> &Self {
        self.push(method, Reply::Transport(message.to_string()))
    }

    fn push(&self, method: &'static str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(reply);
        self
    }

    /// Gate the next call whose log entry equals `call`.
    pub fn gate(&self, call: &str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        self.gates
            .lock()
            .unwrap()
            .insert(call.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| *c == prefix || c.starts_with(&format!("{prefix}:")))
            .count()
    }

    async fn answer<T: DeserializeOwned>(&self, method: &'static str, call: String) -> Result<T> {
        self.calls.lock().unwrap().push(call.clone());

        let gate = self.gates.lock().unwrap().remove(&call);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Ok(value)) => Ok(serde_json::from_value(value)?),
            Some(Reply::Api { status, detail }) => Err(Error::from_response(
                status,
                json!({ "detail": detail }).to_string(),
            )),
            Some(Reply::Transport(message)) => Err(Error::Transport(message)),
            None => panic!("no scripted reply for {call}"),
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.answer("list_projects", "list_projects".into()).await
    }

    async fn get_project(&self, project_id: i64) -> Result<Project> {
        self.answer("get_project", format!("get_project:{project_id}"))
            .await
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project> {
        self.answer("create_project", format!("create_project:{}", project.name))
            .await
    }

    async fn list_code_files(&self, project_id: i64) -> Result<Vec<CodeFile>> {
        self.answer("list_code_files", format!("list_code_files:{project_id}"))
            .await
    }

    async fn create_code_file(&self, project_id: i64, file: &NewCodeFile) -> Result<CodeFile> {
        self.answer(
            "create_code_file",
            format!("create_code_file:{project_id}:{}", file.file_path),
        )
        .await
    }

    async fn get_code_file(&self, project_id: i64, file_id: i64) -> Result<CodeFile> {
        self.answer(
            "get_code_file",
            format!("get_code_file:{project_id}:{file_id}"),
        )
        .await
    }

    async fn list_agent_types(&self) -> Result<Vec<AgentType>> {
        self.answer("list_agent_types", "list_agent_types".into())
            .await
    }

    async fn run_agent(&self, agent_type: &str, _request: &AnalyzeRequest) -> Result<Value> {
        self.answer("run_agent", format!("run_agent:{agent_type}"))
            .await
    }

    async fn list_suggestions(&self, query: &SuggestionQuery) -> Result<Vec<Suggestion>> {
        let pairs: Vec<String> = query
            .to_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        self.answer(
            "list_suggestions",
            format!("list_suggestions:{}", pairs.join("&")),
        )
        .await
    }

    async fn get_suggestion(&self, suggestion_id: i64) -> Result<Suggestion> {
        self.answer("get_suggestion", format!("get_suggestion:{suggestion_id}"))
            .await
    }

    async fn approve_suggestion(
        &self,
        suggestion_id: i64,
        action: ApprovalAction,
        _comments: &str,
    ) -> Result<Approval> {
        self.answer(
            "approve_suggestion",
            format!("approve_suggestion:{suggestion_id}:{}", action.as_str()),
        )
        .await
    }

    async fn get_approval_history(&self, suggestion_id: i64) -> Result<Vec<Approval>> {
        self.answer(
            "get_approval_history",
            format!("get_approval_history:{suggestion_id}"),
        )
        .await
    }

    async fn create_issue(&self, project_id: i64, issue: &NewIssue) -> Result<Issue> {
        self.answer(
            "create_issue",
            format!("create_issue:{project_id}:{}", issue.title),
        )
        .await
    }

    async fn list_issues(&self, project_id: i64) -> Result<Vec<Issue>> {
        self.answer("list_issues", format!("list_issues:{project_id}"))
            .await
    }

    async fn get_issue(&self, issue_id: i64) -> Result<Issue> {
        self.answer("get_issue", format!("get_issue:{issue_id}"))
            .await
    }

    async fn update_issue_status(&self, issue_id: i64, status: &str) -> Result<Issue> {
        self.answer(
            "update_issue_status",
            format!("update_issue_status:{issue_id}:{status}"),
        )
        .await
    }

    async fn list_business_rules(
        &self,
        project_id: i64,
        status: Option<&RuleStatus>,
    ) -> Result<Vec<BusinessRule>> {
        let status = status.map(RuleStatus::as_str).unwrap_or("any");
        self.answer(
            "list_business_rules",
            format!("list_business_rules:{project_id}:{status}"),
        )
        .await
    }

    async fn create_business_rule(
        &self,
        project_id: i64,
        _rule: &NewBusinessRule,
    ) -> Result<BusinessRule> {
        self.answer(
            "create_business_rule",
            format!("create_business_rule:{project_id}"),
        )
        .await
    }

    async fn get_business_rule(&self, rule_id: &str) -> Result<BusinessRule> {
        self.answer("get_business_rule", format!("get_business_rule:{rule_id}"))
            .await
    }

    async fn update_business_rule(
        &self,
        rule_id: &str,
        _update: &BusinessRuleUpdate,
    ) -> Result<BusinessRule> {
        self.answer(
            "update_business_rule",
            format!("update_business_rule:{rule_id}"),
        )
        .await
    }

    async fn approve_business_rule(
        &self,
        rule_id: &str,
        approved_by: &str,
    ) -> Result<BusinessRule> {
        self.answer(
            "approve_business_rule",
            format!("approve_business_rule:{rule_id}:{approved_by}"),
        )
        .await
    }

    async fn get_rule_versions(&self, rule_id: &str) -> Result<Vec<RuleVersion>> {
        self.answer("get_rule_versions", format!("get_rule_versions:{rule_id}"))
            .await
    }

    async fn analyze_change_impact(&self, request: &ChangeImpactRequest) -> Result<Value> {
        self.answer(
            "analyze_change_impact",
            format!(
                "analyze_change_impact:{}:{}",
                request.project_id, request.change_type
            ),
        )
        .await
    }

    async fn list_change_impacts(&self, project_id: i64) -> Result<Vec<ChangeImpact>> {
        self.answer(
            "list_change_impacts",
            format!("list_change_impacts:{project_id}"),
        )
        .await
    }

    async fn get_change_impact(&self, impact_id: i64) -> Result<ChangeImpact> {
        self.answer("get_change_impact", format!("get_change_impact:{impact_id}"))
            .await
    }

    async fn run_agent_sequence(&self, request: &SequenceRequest) -> Result<Value> {
        self.answer(
            "run_agent_sequence",
            format!(
                "run_agent_sequence:{}:{}",
                request.project_id,
                request.agent_types.join(",")
            ),
        )
        .await
    }

    async fn trigger_by_change(
        &self,
        project_id: i64,
        change_type: &str,
        _rule_ids: Option<&[String]>,
    ) -> Result<Value> {
        self.answer(
            "trigger_by_change",
            format!("trigger_by_change:{project_id}:{change_type}"),
        )
        .await
    }

    async fn get_dashboard_stats(&self) -> Result<DashboardStats> {
        self.answer("get_dashboard_stats", "get_dashboard_stats".into())
            .await
    }

    async fn send_chat_message(&self, message: &str, _agent_id: Option<&str>) -> Result<ChatReply> {
        self.answer("send_chat_message", format!("send_chat_message:{message}"))
            .await
    }
}

// ========== Fixtures ==========

pub fn project(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

pub fn issue(id: i64, project_id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "project_id": project_id,
        "title": format!("Issue {id}"),
        "status": status,
    })
}

pub fn rule(rule_id: &str, status: &str) -> Value {
    json!({ "rule_id": rule_id, "status": status, "project_id": 1 })
}

pub fn suggestion(id: i64, agent_type: &str, status: &str) -> Value {
    json!({ "id": id, "agent_type": agent_type, "status": status })
}

pub fn agent_type(value: &str) -> Value {
    json!({ "value": value, "name": value.replace('_', " ") })
}
