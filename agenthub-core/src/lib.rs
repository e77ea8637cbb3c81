//! # agenthub-core
//!
//! Client library for the multi-agent software-analysis platform.
//!
//! This library provides:
//! - Domain types for projects, agents, suggestions, issues, business rules
//!   and change impacts
//! - A REST client with one method per backend endpoint
//! - Per-entity state containers that fetch, cache and mutate those records
//! - The routing table of the Agent Hub pages
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Three layers, each depending only on the ones below it:
//! - **API client:** [`api::Backend`], implemented over HTTP by [`ApiClient`]
//! - **State containers:** [`store`], one per entity family, gathered in [`AppState`]
//! - **Routing:** [`router`], a static path → page table
//!
//! A page triggers a store action, the action calls the backend, the response
//! updates the store's snapshot, and the page reads the snapshot back.
//!
//! ## Example
//!
//! ```rust,no_run
//! use agenthub_core::{AppState, Config};
//!
//! # async fn run() -> agenthub_core::Result<()> {
//! let config = Config::load()?;
//! let app = AppState::from_config(&config.api)?;
//!
//! app.projects.fetch_projects().await?;
//! app.fetch_issues().await?;
//! println!("{} issues", app.issues.issues().len());
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use api::{ApiClient, Backend};
pub use app::AppState;
pub use config::Config;
pub use error::{Error, Failure, Result};
pub use types::*;

// Public modules
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod store;
pub mod types;
