//! agenthub - command-line client for the Agent Hub analysis platform
//!
//! Every command builds the application state, runs one or more store
//! actions against the backend, and prints what the stores now hold.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/agenthub/config.toml (~/.config/agenthub/config.toml)
//! - Logs: $XDG_STATE_HOME/agenthub/agenthub.log (~/.local/state/agenthub/agenthub.log)

mod commands;
mod render;

use agenthub_core::{AppState, Config};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    AgentsCmd, FilesCmd, ImpactsCmd, IssuesCmd, ProjectsCmd, RulesCmd, SuggestionsCmd,
};
use render::Output;

#[derive(Parser)]
#[command(name = "agenthub")]
#[command(about = "Command-line client for the Agent Hub analysis platform")]
#[command(version)]
struct Args {
    /// Write debug logs to the state directory
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Projects
    Projects {
        #[command(subcommand)]
        action: ProjectsCmd,
    },

    /// Code files of a project
    Files {
        #[command(subcommand)]
        action: FilesCmd,
    },

    /// Agent catalogue and agent runs
    Agents {
        #[command(subcommand)]
        action: AgentsCmd,
    },

    /// Agent suggestions and their approvals
    Suggestions {
        #[command(subcommand)]
        action: SuggestionsCmd,
    },

    /// Issues
    Issues {
        #[command(subcommand)]
        action: IssuesCmd,
    },

    /// Business rules
    Rules {
        #[command(subcommand)]
        action: RulesCmd,
    },

    /// Change-impact analyses
    Impacts {
        #[command(subcommand)]
        action: ImpactsCmd,
    },

    /// Show dashboard metrics and insights
    Dashboard,

    /// Send a chat message
    Chat {
        /// Message text
        message: String,

        /// Agent to address
        #[arg(long)]
        agent: Option<String>,
    },

    /// Resolve a page path (e.g. /projects/3) and render that page
    Open {
        /// Path as it would appear in the browser
        path: String,
    },

    /// Print the routing table
    Routes,

    /// Show the resolved configuration
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let out = Output::new(args.json);

    // Commands that never talk to the backend
    match &args.command {
        Command::Routes => return render::routes(&out),
        Command::Config => {
            let config = Config::load().context("failed to load configuration")?;
            return render::config(&out, &config);
        }
        _ => {}
    }

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard = if args.verbose {
        Some(agenthub_core::logging::init(&config.logging).context("failed to initialize logging")?)
    } else {
        None
    };

    let app = AppState::from_config(&config.api).context("failed to create API client")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create async runtime")?;

    runtime.block_on(run(&app, &out, args.command))
}

async fn run(app: &AppState, out: &Output, command: Command) -> Result<()> {
    match command {
        Command::Projects { action } => commands::projects(app, out, action).await,
        Command::Files { action } => commands::files(app, out, action).await,
        Command::Agents { action } => commands::agents(app, out, action).await,
        Command::Suggestions { action } => commands::suggestions(app, out, action).await,
        Command::Issues { action } => commands::issues(app, out, action).await,
        Command::Rules { action } => commands::rules(app, out, action).await,
        Command::Impacts { action } => commands::impacts(app, out, action).await,
        Command::Dashboard => commands::dashboard(app, out).await,
        Command::Chat { message, agent } => {
            commands::chat(app, out, &message, agent.as_deref()).await
        }
        Command::Open { path } => commands::open(app, out, &path).await,
        Command::Routes | Command::Config => Ok(()),
    }
}
