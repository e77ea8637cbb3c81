//! Change-impact analyses

use std::sync::Arc;

use serde_json::Value;

use crate::api::Backend;
use crate::error::Result;
use crate::types::{ChangeImpact, ChangeImpactRequest};

use super::{ActionStatus, Shared, Tracked};

#[derive(Debug, Default)]
struct ChangeImpactState {
    impacts: Vec<ChangeImpact>,
    current_impact: Option<ChangeImpact>,
    last_analysis: Option<Value>,
    status: ActionStatus,
}

impl Tracked for ChangeImpactState {
    fn status_mut(&mut self) -> &mut ActionStatus {
        &mut self.status
    }
}

pub struct ChangeImpactStore {
    api: Arc<dyn Backend>,
    state: Shared<ChangeImpactState>,
}

impl ChangeImpactStore {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            state: Shared::default(),
        }
    }

    // ========== Actions ==========

    pub async fn fetch_change_impacts(&self, project_id: i64) -> Result<Vec<ChangeImpact>> {
        self.state
            .track("fetch_change_impacts", async {
                let impacts = self.api.list_change_impacts(project_id).await?;
                self.state.write(|s| s.impacts = impacts.clone());
                Ok(impacts)
            })
            .await
    }

    /// Ask the backend to analyze a change. The result is kept as the last
    /// analysis; the impact list is not touched until the next fetch.
    pub async fn analyze_change_impact(&self, request: &ChangeImpactRequest) -> Result<Value> {
        self.state
            .track("analyze_change_impact", async {
                let analysis = self.api.analyze_change_impact(request).await?;
                self.state.write(|s| s.last_analysis = Some(analysis.clone()));
                Ok(analysis)
            })
            .await
    }

    pub async fn fetch_change_impact(&self, impact_id: i64) -> Result<ChangeImpact> {
        self.state
            .track("fetch_change_impact", async {
                let impact = self.api.get_change_impact(impact_id).await?;
                self.state.write(|s| s.current_impact = Some(impact.clone()));
                Ok(impact)
            })
            .await
    }

    // ========== Views ==========

    pub fn impacts(&self) -> Vec<ChangeImpact> {
        self.state.read(|s| s.impacts.clone())
    }

    pub fn impacts_by_project(&self, project_id: i64) -> Vec<ChangeImpact> {
        self.state.read(|s| {
            s.impacts
                .iter()
                .filter(|i| i.project_id == project_id)
                .cloned()
                .collect()
        })
    }

    pub fn current_impact(&self) -> Option<ChangeImpact> {
        self.state.read(|s| s.current_impact.clone())
    }

    pub fn last_analysis(&self) -> Option<Value> {
        self.state.read(|s| s.last_analysis.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.status.is_loading())
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.status.error.clone())
    }
}
