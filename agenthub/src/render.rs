//! Plain-text and JSON output

use agenthub_core::config::Config;
use agenthub_core::router::ROUTES;
use agenthub_core::{
    AgentRunResult, AgentType, Approval, BusinessRule, ChangeImpact, CodeFile, DashboardStats,
    Issue, Project, RuleVersion, Suggestion,
};
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// Where command output goes and in which form.
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Print `value` as pretty JSON when `--json` is set, otherwise run `text`.
    pub fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }
}

fn dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let cut: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// A field from a record's untyped remainder, rendered as text.
fn extra_str(extra: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match extra.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ============================================
// Tables
// ============================================

pub fn projects(out: &Output, projects: &[Project]) -> Result<()> {
    out.emit(projects, || {
        if projects.is_empty() {
            println!("No projects.");
            return;
        }
        println!("{:<6} {:<28} {:<40}", "ID", "NAME", "REPOSITORY");
        println!("{}", "-".repeat(76));
        for p in projects {
            println!(
                "{:<6} {:<28} {:<40}",
                p.id,
                truncate(&p.name, 28),
                dash(p.repository_url.as_deref())
            );
        }
    })
}

pub fn project(out: &Output, project: &Project) -> Result<()> {
    out.emit(project, || {
        println!("Project {}", project.id);
        println!("==========");
        println!("Name:         {}", project.name);
        println!("Description:  {}", dash(project.description.as_deref()));
        println!("Repository:   {}", dash(project.repository_url.as_deref()));
        println!("Created:      {}", dash(project.created_at.as_deref()));
    })
}

pub fn code_files(out: &Output, files: &[CodeFile]) -> Result<()> {
    out.emit(files, || {
        if files.is_empty() {
            println!("No code files.");
            return;
        }
        println!("{:<6} {:<12} {}", "ID", "LANGUAGE", "PATH");
        println!("{}", "-".repeat(60));
        for f in files {
            let id = f.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
            println!("{:<6} {:<12} {}", id, dash(f.language.as_deref()), f.file_path);
        }
    })
}

pub fn code_file(out: &Output, file: &CodeFile) -> Result<()> {
    out.emit(file, || {
        println!("{} ({})", file.file_path, dash(file.language.as_deref()));
        if let Some(content) = extra_str(&file.extra, "content") {
            println!();
            println!("{content}");
        }
    })
}

pub fn agent_types(out: &Output, production: &[AgentType], legacy: &[AgentType]) -> Result<()> {
    let all: Vec<&AgentType> = production.iter().chain(legacy).collect();
    out.emit(&all, || {
        println!("Production agents");
        println!("-----------------");
        for t in production {
            println!("  {:<28} {}", t.value, t.name);
        }
        if !legacy.is_empty() {
            println!();
            println!("Legacy agents");
            println!("-------------");
            for t in legacy {
                println!("  {:<28} {}", t.value, t.name);
            }
        }
    })
}

pub fn run_result(out: &Output, result: &AgentRunResult) -> Result<()> {
    out.emit(result, || {
        // Always pretty JSON: run payloads have no fixed shape.
        let rendered = serde_json::to_string_pretty(&result.to_value())
            .unwrap_or_else(|_| result.to_value().to_string());
        println!("{rendered}");
    })
}

pub fn payload(out: &Output, value: &Value) -> Result<()> {
    out.emit(value, || {
        let rendered =
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        println!("{rendered}");
    })
}

pub fn suggestions(out: &Output, suggestions: &[Suggestion]) -> Result<()> {
    out.emit(suggestions, || {
        if suggestions.is_empty() {
            println!("No suggestions.");
            return;
        }
        println!("{:<6} {:<26} {:<12} {}", "ID", "AGENT", "STATUS", "TITLE");
        println!("{}", "-".repeat(80));
        for s in suggestions {
            let title = extra_str(&s.extra, "title").unwrap_or_default();
            println!(
                "{:<6} {:<26} {:<12} {}",
                s.id,
                s.agent_type,
                s.status,
                truncate(&title, 40)
            );
        }
    })
}

pub fn suggestion(out: &Output, suggestion: &Suggestion) -> Result<()> {
    out.emit(suggestion, || {
        println!("Suggestion {}", suggestion.id);
        println!("Agent:    {}", suggestion.agent_type);
        println!("Status:   {}", suggestion.status);
        if let Some(project_id) = suggestion.project_id {
            println!("Project:  {project_id}");
        }
        for (key, value) in &suggestion.extra {
            println!("{key}: {value}");
        }
    })
}

pub fn approvals(out: &Output, approvals: &[Approval]) -> Result<()> {
    out.emit(approvals, || {
        if approvals.is_empty() {
            println!("No approval history.");
            return;
        }
        for a in approvals {
            println!(
                "{:<24} {:<8} {}",
                dash(a.timestamp.as_deref()),
                a.user_action,
                dash(a.comments.as_deref())
            );
        }
    })
}

pub fn issues(out: &Output, issues: &[Issue]) -> Result<()> {
    out.emit(issues, || {
        if issues.is_empty() {
            println!("No issues.");
            return;
        }
        println!("{:<6} {:<8} {:<12} {}", "ID", "PROJECT", "STATUS", "TITLE");
        println!("{}", "-".repeat(72));
        for i in issues {
            let project = i
                .project_id
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".into());
            println!(
                "{:<6} {:<8} {:<12} {}",
                i.id,
                project,
                i.status,
                truncate(&i.title, 44)
            );
        }
    })
}

pub fn issue(out: &Output, issue: &Issue) -> Result<()> {
    out.emit(issue, || {
        println!("Issue {}: {}", issue.id, issue.title);
        println!("Status: {}", issue.status);
        if let Some(description) = extra_str(&issue.extra, "description") {
            println!();
            println!("{description}");
        }
    })
}

pub fn rules(out: &Output, rules: &[BusinessRule]) -> Result<()> {
    out.emit(rules, || {
        if rules.is_empty() {
            println!("No business rules.");
            return;
        }
        println!("{:<14} {:<18} {:<8} {}", "RULE", "STATUS", "VERSION", "CONTENT");
        println!("{}", "-".repeat(80));
        for r in rules {
            let content = extra_str(&r.extra, "content").unwrap_or_default();
            println!(
                "{:<14} {:<18} {:<8} {}",
                r.rule_id,
                r.status.as_str(),
                dash(r.version.as_deref()),
                truncate(&content, 36)
            );
        }
    })
}

pub fn rule(out: &Output, rule: &BusinessRule) -> Result<()> {
    out.emit(rule, || {
        println!("Rule {} ({})", rule.rule_id, rule.status);
        println!("Version: {}", dash(rule.version.as_deref()));
        for (key, value) in &rule.extra {
            println!("{key}: {value}");
        }
    })
}

pub fn rule_versions(out: &Output, versions: &[RuleVersion]) -> Result<()> {
    out.emit(versions, || {
        for v in versions {
            let at = extra_str(&v.extra, "created_at").unwrap_or_default();
            println!("{:<10} {}", v.version, at);
        }
    })
}

pub fn impacts(out: &Output, impacts: &[ChangeImpact]) -> Result<()> {
    out.emit(impacts, || {
        if impacts.is_empty() {
            println!("No change impacts.");
            return;
        }
        println!("{:<6} {:<20} {}", "ID", "CHANGE", "RISK");
        println!("{}", "-".repeat(40));
        for i in impacts {
            let id = i.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
            println!(
                "{:<6} {:<20} {}",
                id,
                dash(i.change_type.as_deref()),
                dash(i.risk_level.as_deref())
            );
        }
    })
}

pub fn impact(out: &Output, impact: &ChangeImpact) -> Result<()> {
    out.emit(impact, || {
        println!(
            "Change impact {} on project {}",
            impact.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
            impact.project_id
        );
        println!("Change: {}", dash(impact.change_type.as_deref()));
        println!("Risk:   {}", dash(impact.risk_level.as_deref()));
        for (key, value) in &impact.extra {
            println!("{key}: {value}");
        }
    })
}

pub fn dashboard(out: &Output, stats: &DashboardStats) -> Result<()> {
    out.emit(stats, || {
        println!("Metrics");
        println!("=======");
        for (key, value) in &stats.metrics {
            println!("{:<28} {}", key, value);
        }
        if !stats.ai_insights.is_empty() {
            println!();
            println!("Insights");
            println!("========");
            for insight in &stats.ai_insights {
                let text = insight
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| insight.to_string());
                println!("  * {text}");
            }
        }
    })
}

// ============================================
// Local commands
// ============================================

#[derive(Serialize)]
struct RouteRow {
    name: &'static str,
    path: &'static str,
}

pub fn routes(out: &Output) -> Result<()> {
    let rows: Vec<RouteRow> = ROUTES
        .iter()
        .map(|r| RouteRow {
            name: r.name,
            path: r.pattern,
        })
        .collect();
    out.emit(&rows, || {
        println!("{:<18} {}", "NAME", "PATH");
        for row in &rows {
            println!("{:<18} {}", row.name, row.path);
        }
    })
}

#[derive(Serialize)]
struct ConfigView {
    mode: &'static str,
    origin: Option<String>,
    base_url: String,
    config_path: String,
    log_path: String,
}

pub fn config(out: &Output, config: &Config) -> Result<()> {
    let view = ConfigView {
        mode: config.api.mode.as_str(),
        origin: config.api.origin.clone(),
        base_url: config.base_url()?,
        config_path: Config::config_path().display().to_string(),
        log_path: Config::log_path().display().to_string(),
    };
    out.emit(&view, || {
        println!("Mode:      {}", view.mode);
        println!("Origin:    {}", dash(view.origin.as_deref()));
        println!("Base URL:  {}", view.base_url);
        println!("Config:    {}", view.config_path);
        println!("Log file:  {}", view.log_path);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer title", 10), "a much ...");
    }

    #[test]
    fn test_dash() {
        assert_eq!(dash(None), "-");
        assert_eq!(dash(Some("")), "-");
        assert_eq!(dash(Some("x")), "x");
    }

    #[test]
    fn test_extra_str() {
        let extra = serde_json::json!({ "title": "Fix", "count": 3, "gone": null });
        let extra = extra.as_object().unwrap();
        assert_eq!(extra_str(extra, "title").as_deref(), Some("Fix"));
        assert_eq!(extra_str(extra, "count").as_deref(), Some("3"));
        assert_eq!(extra_str(extra, "gone"), None);
        assert_eq!(extra_str(extra, "missing"), None);
    }
}
