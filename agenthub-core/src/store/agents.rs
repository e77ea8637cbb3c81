//! Agent types, agent runs and orchestration triggers

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::api::Backend;
use crate::error::Result;
use crate::types::{AgentRunResult, AgentType, AnalyzeRequest, SequenceRequest};

use super::{LoadingMap, Shared};

/// Agent types treated as primary. Everything else is legacy.
pub const PRODUCTION_AGENTS: [&str; 7] = [
    "business_logic_policy",
    "product_requirements",
    "api_contract",
    "technical_architecture",
    "quality_test",
    "change_impact",
    "release_readiness",
];

pub fn is_production_agent(value: &str) -> bool {
    PRODUCTION_AGENTS.contains(&value)
}

/// Operation keys of the agent store's loading map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AgentLoadingKey {
    /// Fetching the agent type list
    Types,
    /// A run of one agent type
    Agent(String),
    /// An orchestrated sequence run
    Sequence,
    /// A change-triggered re-run
    ChangeTrigger,
}

#[derive(Debug, Default)]
struct AgentState {
    agent_types: Vec<AgentType>,
    loading: LoadingMap<AgentLoadingKey>,
    last_result: Option<AgentRunResult>,
    error: Option<String>,
}

/// Agent catalogue and run state. Loading is tracked per operation key so
/// runs of different agent types report independently.
pub struct AgentStore {
    api: Arc<dyn Backend>,
    state: Shared<AgentState>,
}

/// Production agents first, legacy after; order within each group is kept.
pub fn sort_production_first(mut types: Vec<AgentType>) -> Vec<AgentType> {
    // sort_by_key is stable
    types.sort_by_key(|t| !is_production_agent(&t.value));
    types
}

impl AgentStore {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            state: Shared::default(),
        }
    }

    async fn keyed<T, F>(&self, key: AgentLoadingKey, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.state.write(|s| {
            s.loading.begin(key.clone());
            s.error = None;
        });

        let result = fut.await;

        self.state.write(|s| {
            if let Err(err) = &result {
                let message = err.failure().message;
                tracing::debug!(key = ?key, error = %message, "agent action failed");
                s.error = Some(message);
            }
            s.loading.finish(&key);
        });

        result
    }

    // ========== Actions ==========

    /// Fetch the agent catalogue, production agents first.
    pub async fn fetch_agent_types(&self) -> Result<Vec<AgentType>> {
        self.keyed(AgentLoadingKey::Types, async {
            let sorted = sort_production_first(self.api.list_agent_types().await?);
            self.state.write(|s| s.agent_types = sorted.clone());
            Ok(sorted)
        })
        .await
    }

    /// Run one agent. The outcome, success or failure, replaces the last
    /// result so a view can render it inline.
    pub async fn run_agent(&self, agent_type: &str, request: &AnalyzeRequest) -> Result<Value> {
        let key = AgentLoadingKey::Agent(agent_type.to_string());
        self.keyed(key, async {
            match self.api.run_agent(agent_type, request).await {
                Ok(payload) => {
                    self.state.write(|s| {
                        s.last_result = Some(AgentRunResult::Completed(payload.clone()))
                    });
                    Ok(payload)
                }
                Err(err) => {
                    let error = err.failure().message;
                    self.state
                        .write(|s| s.last_result = Some(AgentRunResult::Failed { error }));
                    Err(err)
                }
            }
        })
        .await
    }

    pub async fn run_agent_sequence(&self, request: &SequenceRequest) -> Result<Value> {
        self.keyed(AgentLoadingKey::Sequence, self.api.run_agent_sequence(request))
            .await
    }

    pub async fn trigger_by_change(
        &self,
        project_id: i64,
        change_type: &str,
        rule_ids: Option<&[String]>,
    ) -> Result<Value> {
        self.keyed(
            AgentLoadingKey::ChangeTrigger,
            self.api.trigger_by_change(project_id, change_type, rule_ids),
        )
        .await
    }

    // ========== Views ==========

    pub fn agent_types(&self) -> Vec<AgentType> {
        self.state.read(|s| s.agent_types.clone())
    }

    pub fn is_agent_loading(&self, agent_type: &str) -> bool {
        self.is_loading(&AgentLoadingKey::Agent(agent_type.to_string()))
    }

    pub fn is_loading(&self, key: &AgentLoadingKey) -> bool {
        self.state.read(|s| s.loading.is_loading(key))
    }

    pub fn production_agents(&self) -> Vec<AgentType> {
        self.state.read(|s| {
            s.agent_types
                .iter()
                .filter(|t| is_production_agent(&t.value))
                .cloned()
                .collect()
        })
    }

    pub fn legacy_agents(&self) -> Vec<AgentType> {
        self.state.read(|s| {
            s.agent_types
                .iter()
                .filter(|t| !is_production_agent(&t.value))
                .cloned()
                .collect()
        })
    }

    pub fn last_result(&self) -> Option<AgentRunResult> {
        self.state.read(|s| s.last_result.clone())
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.error.clone())
    }
}
