//! Agent suggestions and their approvals

use std::sync::Arc;

use crate::api::Backend;
use crate::error::Result;
use crate::types::{Approval, ApprovalAction, Suggestion, SuggestionFilters, SuggestionQuery};

use super::{ActionStatus, Shared, Tracked};

#[derive(Debug, Default)]
struct SuggestionState {
    suggestions: Vec<Suggestion>,
    current_suggestion: Option<Suggestion>,
    filters: SuggestionFilters,
    approval_history: Vec<Approval>,
    status: ActionStatus,
}

impl Tracked for SuggestionState {
    fn status_mut(&mut self) -> &mut ActionStatus {
        &mut self.status
    }
}

/// Suggestions with a server-side filter (sent as query parameters) and a
/// client-side view that re-applies the same filter to the fetched list.
pub struct SuggestionStore {
    api: Arc<dyn Backend>,
    state: Shared<SuggestionState>,
}

impl SuggestionStore {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            state: Shared::default(),
        }
    }

    // ========== Actions ==========

    /// Fetch suggestions. Active filters override the same keys in `query`.
    pub async fn fetch_suggestions(&self, query: SuggestionQuery) -> Result<Vec<Suggestion>> {
        self.state
            .track("fetch_suggestions", self.load_suggestions(query))
            .await
    }

    pub async fn fetch_suggestion(&self, suggestion_id: i64) -> Result<Suggestion> {
        self.state
            .track("fetch_suggestion", async {
                let suggestion = self.api.get_suggestion(suggestion_id).await?;
                self.state
                    .write(|s| s.current_suggestion = Some(suggestion.clone()));
                Ok(suggestion)
            })
            .await
    }

    /// Record a decision, then re-fetch the suggestion list once. Nothing is
    /// re-fetched when the approval call fails.
    pub async fn approve_suggestion(
        &self,
        suggestion_id: i64,
        action: ApprovalAction,
        comments: &str,
    ) -> Result<Approval> {
        self.state
            .track("approve_suggestion", async {
                let approval = self
                    .api
                    .approve_suggestion(suggestion_id, action, comments)
                    .await?;
                self.load_suggestions(SuggestionQuery::default()).await?;
                Ok(approval)
            })
            .await
    }

    /// Merge filter changes and re-fetch.
    pub async fn set_filters(&self, update: SuggestionFilters) -> Result<Vec<Suggestion>> {
        self.state.write(|s| s.filters.merge(update));
        self.fetch_suggestions(SuggestionQuery::default()).await
    }

    pub async fn fetch_approval_history(&self, suggestion_id: i64) -> Result<Vec<Approval>> {
        self.state
            .track("fetch_approval_history", async {
                let history = self.api.get_approval_history(suggestion_id).await?;
                self.state.write(|s| s.approval_history = history.clone());
                Ok(history)
            })
            .await
    }

    async fn load_suggestions(&self, mut query: SuggestionQuery) -> Result<Vec<Suggestion>> {
        let filters = self.state.read(|s| s.filters.clone());
        if filters.agent_type.is_some() {
            query.agent_type = filters.agent_type;
        }
        if filters.status.is_some() {
            query.status = filters.status;
        }

        let suggestions = self.api.list_suggestions(&query).await?;
        self.state.write(|s| s.suggestions = suggestions.clone());
        Ok(suggestions)
    }

    // ========== Views ==========

    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.state.read(|s| s.suggestions.clone())
    }

    /// The last fetched list, narrowed by the active filters.
    pub fn filtered_suggestions(&self) -> Vec<Suggestion> {
        self.state.read(|s| {
            s.suggestions
                .iter()
                .filter(|suggestion| s.filters.matches(suggestion))
                .cloned()
                .collect()
        })
    }

    pub fn filters(&self) -> SuggestionFilters {
        self.state.read(|s| s.filters.clone())
    }

    pub fn current_suggestion(&self) -> Option<Suggestion> {
        self.state.read(|s| s.current_suggestion.clone())
    }

    pub fn approval_history(&self) -> Vec<Approval> {
        self.state.read(|s| s.approval_history.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.status.is_loading())
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.status.error.clone())
    }
}
