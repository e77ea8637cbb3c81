//! Subcommands and the store actions behind them

use std::path::PathBuf;

use agenthub_core::router::{self, Page};
use agenthub_core::{
    AnalyzeRequest, AppState, ApprovalAction, BusinessRuleUpdate, ChangeImpactRequest,
    NewBusinessRule, NewCodeFile, NewIssue, NewProject, RuleStatus, SequenceRequest,
    SuggestionQuery,
};
use anyhow::{bail, Context, Result};
use clap::Subcommand;

use crate::render::{self, Output};

#[derive(Subcommand)]
pub enum ProjectsCmd {
    /// List all projects
    List,

    /// Show one project
    Show { project_id: i64 },

    /// Create a project
    Create {
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        repository_url: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum FilesCmd {
    /// List a project's code files
    List { project_id: i64 },

    /// Show one code file
    Show { project_id: i64, file_id: i64 },

    /// Upload a local file
    Add {
        project_id: i64,

        /// Local file to upload
        path: PathBuf,

        /// Path to record on the server (default: the local path)
        #[arg(long = "as")]
        file_path: Option<String>,

        #[arg(long, default_value = "python")]
        language: String,
    },
}

#[derive(Subcommand)]
pub enum AgentsCmd {
    /// List agent types, production agents first
    List,

    /// Run one agent against a project
    Run {
        agent_type: String,

        #[arg(long)]
        project: i64,

        #[arg(long)]
        file: Option<i64>,

        #[arg(long)]
        issue: Option<i64>,

        /// Business rule to include (repeatable)
        #[arg(long = "rule")]
        rules: Vec<String>,
    },

    /// Run several agents in order
    Sequence {
        #[arg(long)]
        project: i64,

        /// Agent types, in run order
        #[arg(required = true)]
        agents: Vec<String>,

        #[arg(long = "rule")]
        rules: Vec<String>,

        #[arg(long)]
        file: Option<i64>,

        #[arg(long)]
        change_type: Option<String>,

        #[arg(long)]
        release: Option<String>,
    },

    /// Re-run the agents affected by a change
    Trigger {
        #[arg(long)]
        project: i64,

        change_type: String,

        #[arg(long = "rule")]
        rules: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum SuggestionsCmd {
    /// List suggestions
    List {
        #[arg(long)]
        project: Option<i64>,

        #[arg(long)]
        agent: Option<String>,

        #[arg(long)]
        status: Option<String>,
    },

    /// Show one suggestion
    Show { suggestion_id: i64 },

    /// Approve, reject or modify a suggestion
    Approve {
        suggestion_id: i64,

        /// approve, reject or modify
        #[arg(long, default_value = "approve")]
        action: ApprovalAction,

        #[arg(long, default_value = "")]
        comments: String,
    },

    /// Show a suggestion's approval history
    History { suggestion_id: i64 },
}

#[derive(Subcommand)]
pub enum IssuesCmd {
    /// List issues of one project, or of every project
    List {
        #[arg(long)]
        project: Option<i64>,
    },

    /// Show one issue
    Show { issue_id: i64 },

    /// Report an issue
    Create {
        project_id: i64,

        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long)]
        file: Option<i64>,
    },

    /// Change an issue's status
    Status { issue_id: i64, status: String },
}

#[derive(Subcommand)]
pub enum RulesCmd {
    /// List a project's business rules
    List {
        project_id: i64,

        /// draft, pending_approval or approved
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one rule
    Show { rule_id: String },

    /// Create a rule
    Create {
        project_id: i64,

        content: String,

        #[arg(long)]
        assumptions: Option<String>,

        #[arg(long)]
        created_by: Option<String>,
    },

    /// Update a rule
    Update {
        rule_id: String,

        #[arg(long)]
        content: Option<String>,

        #[arg(long)]
        assumptions: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        created_by: Option<String>,
    },

    /// Approve a rule
    Approve {
        rule_id: String,

        #[arg(long = "by")]
        approved_by: String,
    },

    /// Show a rule's version history
    Versions { rule_id: String },
}

#[derive(Subcommand)]
pub enum ImpactsCmd {
    /// List a project's change impacts
    List { project_id: i64 },

    /// Show one change impact
    Show { impact_id: i64 },

    /// Analyze the impact of a change
    Analyze {
        project_id: i64,

        change_type: String,

        #[arg(long = "rule")]
        rules: Vec<String>,
    },
}

fn non_empty(rules: Vec<String>) -> Option<Vec<String>> {
    (!rules.is_empty()).then_some(rules)
}

pub async fn projects(app: &AppState, out: &Output, cmd: ProjectsCmd) -> Result<()> {
    let store = &app.projects;
    match cmd {
        ProjectsCmd::List => {
            let projects = store
                .fetch_projects()
                .await
                .context("failed to fetch projects")?;
            render::projects(out, &projects)
        }
        ProjectsCmd::Show { project_id } => {
            let project = store
                .fetch_project(project_id)
                .await
                .with_context(|| format!("failed to fetch project {project_id}"))?;
            render::project(out, &project)
        }
        ProjectsCmd::Create {
            name,
            description,
            repository_url,
        } => {
            let project = store
                .create_project(&NewProject {
                    name,
                    description,
                    repository_url,
                })
                .await
                .context("failed to create project")?;
            render::project(out, &project)
        }
    }
}

pub async fn files(app: &AppState, out: &Output, cmd: FilesCmd) -> Result<()> {
    let store = &app.projects;
    match cmd {
        FilesCmd::List { project_id } => {
            let files = store
                .fetch_code_files(project_id)
                .await
                .context("failed to fetch code files")?;
            render::code_files(out, &files)
        }
        FilesCmd::Show {
            project_id,
            file_id,
        } => {
            let file = store
                .fetch_code_file(project_id, file_id)
                .await
                .with_context(|| format!("failed to fetch code file {file_id}"))?;
            render::code_file(out, &file)
        }
        FilesCmd::Add {
            project_id,
            path,
            file_path,
            language,
        } => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let file = NewCodeFile {
                file_path: file_path.unwrap_or_else(|| path.display().to_string()),
                content,
                language,
            };
            store
                .create_code_file(project_id, &file)
                .await
                .context("failed to upload code file")?;
            render::code_files(out, &store.code_files_for(project_id))
        }
    }
}

pub async fn agents(app: &AppState, out: &Output, cmd: AgentsCmd) -> Result<()> {
    let store = &app.agents;
    match cmd {
        AgentsCmd::List => {
            store
                .fetch_agent_types()
                .await
                .context("failed to fetch agent types")?;
            render::agent_types(out, &store.production_agents(), &store.legacy_agents())
        }
        AgentsCmd::Run {
            agent_type,
            project,
            file,
            issue,
            rules,
        } => {
            let request = AnalyzeRequest {
                project_id: project,
                code_file_id: file,
                issue_id: issue,
                rule_ids: non_empty(rules),
                ..Default::default()
            };
            // A failed run still leaves an error record to show.
            let outcome = store.run_agent(&agent_type, &request).await;
            if let Some(result) = store.last_result() {
                render::run_result(out, &result)?;
            }
            outcome
                .map(|_| ())
                .with_context(|| format!("agent {agent_type} failed"))
        }
        AgentsCmd::Sequence {
            project,
            agents,
            rules,
            file,
            change_type,
            release,
        } => {
            let request = SequenceRequest {
                project_id: project,
                agent_types: agents,
                rule_ids: non_empty(rules),
                code_file_id: file,
                change_type,
                release_version: release,
            };
            let result = store
                .run_agent_sequence(&request)
                .await
                .context("agent sequence failed")?;
            render::payload(out, &result)
        }
        AgentsCmd::Trigger {
            project,
            change_type,
            rules,
        } => {
            let rules = non_empty(rules);
            let result = store
                .trigger_by_change(project, &change_type, rules.as_deref())
                .await
                .context("change trigger failed")?;
            render::payload(out, &result)
        }
    }
}

pub async fn suggestions(app: &AppState, out: &Output, cmd: SuggestionsCmd) -> Result<()> {
    let store = &app.suggestions;
    match cmd {
        SuggestionsCmd::List {
            project,
            agent,
            status,
        } => {
            let suggestions = store
                .fetch_suggestions(SuggestionQuery {
                    project_id: project,
                    agent_type: agent,
                    status,
                })
                .await
                .context("failed to fetch suggestions")?;
            render::suggestions(out, &suggestions)
        }
        SuggestionsCmd::Show { suggestion_id } => {
            let suggestion = store
                .fetch_suggestion(suggestion_id)
                .await
                .with_context(|| format!("failed to fetch suggestion {suggestion_id}"))?;
            render::suggestion(out, &suggestion)
        }
        SuggestionsCmd::Approve {
            suggestion_id,
            action,
            comments,
        } => {
            store
                .approve_suggestion(suggestion_id, action, &comments)
                .await
                .with_context(|| format!("failed to {} suggestion", action.as_str()))?;
            render::suggestions(out, &store.suggestions())
        }
        SuggestionsCmd::History { suggestion_id } => {
            let history = store
                .fetch_approval_history(suggestion_id)
                .await
                .context("failed to fetch approval history")?;
            render::approvals(out, &history)
        }
    }
}

pub async fn issues(app: &AppState, out: &Output, cmd: IssuesCmd) -> Result<()> {
    match cmd {
        IssuesCmd::List { project } => {
            if project.is_none() {
                app.projects
                    .fetch_projects()
                    .await
                    .context("failed to fetch projects")?;
            }
            let issues = app
                .set_issue_filter(project)
                .await
                .context("failed to fetch issues")?;
            render::issues(out, &issues)
        }
        IssuesCmd::Show { issue_id } => {
            let issue = app
                .issues
                .fetch_issue(issue_id)
                .await
                .with_context(|| format!("failed to fetch issue {issue_id}"))?;
            render::issue(out, &issue)
        }
        IssuesCmd::Create {
            project_id,
            title,
            description,
            file,
        } => {
            let issue = app
                .issues
                .create_issue(
                    project_id,
                    &NewIssue {
                        title,
                        description,
                        code_file_id: file,
                    },
                )
                .await
                .context("failed to create issue")?;
            render::issue(out, &issue)
        }
        IssuesCmd::Status { issue_id, status } => {
            let issue = app
                .issues
                .update_issue_status(issue_id, &status)
                .await
                .context("failed to update issue status")?;
            render::issue(out, &issue)
        }
    }
}

pub async fn rules(app: &AppState, out: &Output, cmd: RulesCmd) -> Result<()> {
    let store = &app.business_rules;
    match cmd {
        RulesCmd::List { project_id, status } => {
            let status = status.as_deref().map(RuleStatus::from);
            let rules = store
                .fetch_rules(project_id, status)
                .await
                .context("failed to fetch business rules")?;
            render::rules(out, &rules)
        }
        RulesCmd::Show { rule_id } => {
            let rule = store
                .fetch_rule(&rule_id)
                .await
                .with_context(|| format!("failed to fetch rule {rule_id}"))?;
            render::rule(out, &rule)
        }
        RulesCmd::Create {
            project_id,
            content,
            assumptions,
            created_by,
        } => {
            let rule = store
                .create_rule(
                    project_id,
                    &NewBusinessRule {
                        content,
                        assumptions,
                        created_by,
                    },
                )
                .await
                .context("failed to create business rule")?;
            render::rule(out, &rule)
        }
        RulesCmd::Update {
            rule_id,
            content,
            assumptions,
            status,
            created_by,
        } => {
            let update = BusinessRuleUpdate {
                content,
                assumptions,
                status: status.as_deref().map(RuleStatus::from),
                created_by,
            };
            let rule = store
                .update_rule(&rule_id, &update)
                .await
                .with_context(|| format!("failed to update rule {rule_id}"))?;
            render::rule(out, &rule)
        }
        RulesCmd::Approve {
            rule_id,
            approved_by,
        } => {
            let rule = store
                .approve_rule(&rule_id, &approved_by)
                .await
                .with_context(|| format!("failed to approve rule {rule_id}"))?;
            render::rule(out, &rule)
        }
        RulesCmd::Versions { rule_id } => {
            let versions = store
                .fetch_rule_versions(&rule_id)
                .await
                .context("failed to fetch rule versions")?;
            render::rule_versions(out, &versions)
        }
    }
}

pub async fn impacts(app: &AppState, out: &Output, cmd: ImpactsCmd) -> Result<()> {
    let store = &app.change_impacts;
    match cmd {
        ImpactsCmd::List { project_id } => {
            let impacts = store
                .fetch_change_impacts(project_id)
                .await
                .context("failed to fetch change impacts")?;
            render::impacts(out, &impacts)
        }
        ImpactsCmd::Show { impact_id } => {
            let impact = store
                .fetch_change_impact(impact_id)
                .await
                .with_context(|| format!("failed to fetch change impact {impact_id}"))?;
            render::impact(out, &impact)
        }
        ImpactsCmd::Analyze {
            project_id,
            change_type,
            rules,
        } => {
            let analysis = store
                .analyze_change_impact(&ChangeImpactRequest {
                    project_id,
                    change_type,
                    rule_ids: non_empty(rules),
                })
                .await
                .context("change impact analysis failed")?;
            render::payload(out, &analysis)
        }
    }
}

pub async fn dashboard(app: &AppState, out: &Output) -> Result<()> {
    let stats = app
        .dashboard_stats()
        .await
        .context("failed to fetch dashboard stats")?;
    render::dashboard(out, &stats)
}

pub async fn chat(app: &AppState, out: &Output, message: &str, agent: Option<&str>) -> Result<()> {
    let reply = app
        .send_chat_message(message, agent)
        .await
        .context("failed to send chat message")?;
    out.emit(&reply, || match &reply.agent {
        Some(agent) => println!("[{agent}] {}", reply.content),
        None => println!("{}", reply.content),
    })
}

/// Resolve `path` and load what that page shows.
pub async fn open(app: &AppState, out: &Output, path: &str) -> Result<()> {
    let Some(route) = router::resolve(path) else {
        bail!("no page at {path}");
    };
    tracing::debug!(page = ?route.page(), path, "resolved page");
    if !out.is_json() {
        println!("# {} ({})", route.route.name, path);
        println!();
    }

    match route.page() {
        Page::Overview => {
            dashboard(app, out).await?;
            let projects = app
                .projects
                .fetch_projects()
                .await
                .context("failed to fetch projects")?;
            render::projects(out, &projects)
        }
        Page::AgentHub => {
            agents(app, out, AgentsCmd::List).await?;
            let suggestions = app
                .suggestions
                .fetch_suggestions(SuggestionQuery::default())
                .await
                .context("failed to fetch suggestions")?;
            render::suggestions(out, &suggestions)
        }
        Page::ProjectDetail => {
            let raw = route.param("id").unwrap_or_default();
            let project_id: i64 = raw
                .parse()
                .with_context(|| format!("invalid project id: {raw}"))?;

            projects(app, out, ProjectsCmd::Show { project_id }).await?;
            files(app, out, FilesCmd::List { project_id }).await?;
            issues(
                app,
                out,
                IssuesCmd::List {
                    project: Some(project_id),
                },
            )
            .await?;
            rules(
                app,
                out,
                RulesCmd::List {
                    project_id,
                    status: None,
                },
            )
            .await?;
            impacts(app, out, ImpactsCmd::List { project_id }).await
        }
        Page::AgentRunOutput => {
            let run_id = route.param("id").unwrap_or_default();
            match app.agents.last_result() {
                Some(result) => render::run_result(out, &result),
                None => {
                    if !out.is_json() {
                        println!("No output for run {run_id} in this session.");
                        println!("Start a run with: agenthub agents run <agent-type> --project <id>");
                    }
                    Ok(())
                }
            }
        }
    }
}
