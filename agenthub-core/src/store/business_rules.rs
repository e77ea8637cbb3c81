//! Business rules, their versions and approvals

use std::sync::Arc;

use crate::api::Backend;
use crate::error::Result;
use crate::types::{BusinessRule, BusinessRuleUpdate, NewBusinessRule, RuleStatus, RuleVersion};

use super::{replace_by, ActionStatus, Shared, Tracked};

#[derive(Debug, Default)]
struct BusinessRuleState {
    rules: Vec<BusinessRule>,
    current_rule: Option<BusinessRule>,
    rule_versions: Vec<RuleVersion>,
    status: ActionStatus,
}

impl Tracked for BusinessRuleState {
    fn status_mut(&mut self) -> &mut ActionStatus {
        &mut self.status
    }
}

/// Business rules of the project last fetched.
///
/// Updates and approvals are merged in place from the server's response,
/// keyed by `rule_id`. A rule that is not in the list is not added.
pub struct BusinessRuleStore {
    api: Arc<dyn Backend>,
    state: Shared<BusinessRuleState>,
}

impl BusinessRuleStore {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            state: Shared::default(),
        }
    }

    // ========== Actions ==========

    /// Replace the list with a project's rules, optionally filtered by status
    /// on the server.
    pub async fn fetch_rules(
        &self,
        project_id: i64,
        status: Option<RuleStatus>,
    ) -> Result<Vec<BusinessRule>> {
        self.state
            .track("fetch_rules", async {
                let rules = self
                    .api
                    .list_business_rules(project_id, status.as_ref())
                    .await?;
                self.state.write(|s| s.rules = rules.clone());
                Ok(rules)
            })
            .await
    }

    /// Create a rule; the new rule goes to the front of the list.
    pub async fn create_rule(
        &self,
        project_id: i64,
        rule: &NewBusinessRule,
    ) -> Result<BusinessRule> {
        self.state
            .track("create_rule", async {
                let created = self.api.create_business_rule(project_id, rule).await?;
                self.state.write(|s| s.rules.insert(0, created.clone()));
                Ok(created)
            })
            .await
    }

    pub async fn fetch_rule(&self, rule_id: &str) -> Result<BusinessRule> {
        self.state
            .track("fetch_rule", async {
                let rule = self.api.get_business_rule(rule_id).await?;
                self.state.write(|s| s.current_rule = Some(rule.clone()));
                Ok(rule)
            })
            .await
    }

    pub async fn update_rule(
        &self,
        rule_id: &str,
        update: &BusinessRuleUpdate,
    ) -> Result<BusinessRule> {
        self.state
            .track("update_rule", async {
                let updated = self.api.update_business_rule(rule_id, update).await?;
                self.merge(updated.clone());
                Ok(updated)
            })
            .await
    }

    pub async fn approve_rule(&self, rule_id: &str, approved_by: &str) -> Result<BusinessRule> {
        self.state
            .track("approve_rule", async {
                let approved = self.api.approve_business_rule(rule_id, approved_by).await?;
                self.merge(approved.clone());
                Ok(approved)
            })
            .await
    }

    pub async fn fetch_rule_versions(&self, rule_id: &str) -> Result<Vec<RuleVersion>> {
        self.state
            .track("fetch_rule_versions", async {
                let versions = self.api.get_rule_versions(rule_id).await?;
                self.state.write(|s| s.rule_versions = versions.clone());
                Ok(versions)
            })
            .await
    }

    fn merge(&self, rule: BusinessRule) {
        self.state
            .write(|s| replace_by(&mut s.rules, rule, |r| r.rule_id.clone()));
    }

    // ========== Views ==========

    pub fn rules(&self) -> Vec<BusinessRule> {
        self.state.read(|s| s.rules.clone())
    }

    pub fn rules_with_status(&self, status: &RuleStatus) -> Vec<BusinessRule> {
        self.state.read(|s| {
            s.rules
                .iter()
                .filter(|r| &r.status == status)
                .cloned()
                .collect()
        })
    }

    pub fn approved_rules(&self) -> Vec<BusinessRule> {
        self.rules_with_status(&RuleStatus::Approved)
    }

    pub fn pending_rules(&self) -> Vec<BusinessRule> {
        self.rules_with_status(&RuleStatus::PendingApproval)
    }

    pub fn draft_rules(&self) -> Vec<BusinessRule> {
        self.rules_with_status(&RuleStatus::Draft)
    }

    pub fn rule_by_id(&self, rule_id: &str) -> Option<BusinessRule> {
        self.state
            .read(|s| s.rules.iter().find(|r| r.rule_id == rule_id).cloned())
    }

    pub fn current_rule(&self) -> Option<BusinessRule> {
        self.state.read(|s| s.current_rule.clone())
    }

    pub fn rule_versions(&self) -> Vec<RuleVersion> {
        self.state.read(|s| s.rule_versions.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.status.is_loading())
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.status.error.clone())
    }
}
