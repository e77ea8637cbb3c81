//! Projects and their code files

use std::collections::HashMap;
use std::sync::Arc;

use crate::api::Backend;
use crate::error::Result;
use crate::types::{CodeFile, NewCodeFile, NewProject, Project};

use super::{ActionStatus, Shared, Tracked};

#[derive(Debug, Default)]
struct ProjectState {
    projects: Vec<Project>,
    current_project: Option<Project>,
    current_code_file: Option<CodeFile>,
    /// Code files keyed by owning project id
    code_files: HashMap<i64, Vec<CodeFile>>,
    status: ActionStatus,
}

impl Tracked for ProjectState {
    fn status_mut(&mut self) -> &mut ActionStatus {
        &mut self.status
    }
}

/// Project list, the project being viewed, and per-project code files.
pub struct ProjectStore {
    api: Arc<dyn Backend>,
    state: Shared<ProjectState>,
}

impl ProjectStore {
    pub fn new(api: Arc<dyn Backend>) -> Self {
        Self {
            api,
            state: Shared::default(),
        }
    }

    // ========== Actions ==========

    /// Replace the project list with the server's.
    pub async fn fetch_projects(&self) -> Result<Vec<Project>> {
        self.state
            .track("fetch_projects", self.load_projects())
            .await
    }

    /// Load one project as the current project.
    pub async fn fetch_project(&self, project_id: i64) -> Result<Project> {
        self.state
            .track("fetch_project", async {
                let project = self.api.get_project(project_id).await?;
                self.state
                    .write(|s| s.current_project = Some(project.clone()));
                Ok(project)
            })
            .await
    }

    /// Create a project, then re-fetch the list. Returns the created record.
    pub async fn create_project(&self, project: &NewProject) -> Result<Project> {
        self.state
            .track("create_project", async {
                let created = self.api.create_project(project).await?;
                self.load_projects().await?;
                Ok(created)
            })
            .await
    }

    /// Replace one project's code files; other projects are untouched.
    pub async fn fetch_code_files(&self, project_id: i64) -> Result<Vec<CodeFile>> {
        self.state
            .track("fetch_code_files", self.load_code_files(project_id))
            .await
    }

    /// Upload a code file: append it locally, then re-fetch that project's
    /// files so the list matches the server.
    pub async fn create_code_file(&self, project_id: i64, file: &NewCodeFile) -> Result<CodeFile> {
        self.state
            .track("create_code_file", async {
                let created = self.api.create_code_file(project_id, file).await?;
                self.state.write(|s| {
                    s.code_files
                        .entry(project_id)
                        .or_default()
                        .push(created.clone())
                });
                self.load_code_files(project_id).await?;
                Ok(created)
            })
            .await
    }

    /// Load a single code file as the current file.
    pub async fn fetch_code_file(&self, project_id: i64, file_id: i64) -> Result<CodeFile> {
        self.state
            .track("fetch_code_file", async {
                let file = self.api.get_code_file(project_id, file_id).await?;
                self.state
                    .write(|s| s.current_code_file = Some(file.clone()));
                Ok(file)
            })
            .await
    }

    async fn load_projects(&self) -> Result<Vec<Project>> {
        let projects = self.api.list_projects().await?;
        self.state.write(|s| s.projects = projects.clone());
        Ok(projects)
    }

    async fn load_code_files(&self, project_id: i64) -> Result<Vec<CodeFile>> {
        let files = self.api.list_code_files(project_id).await?;
        self.state
            .write(|s| s.code_files.insert(project_id, files.clone()));
        Ok(files)
    }

    // ========== Views ==========

    pub fn projects(&self) -> Vec<Project> {
        self.state.read(|s| s.projects.clone())
    }

    pub fn current_project(&self) -> Option<Project> {
        self.state.read(|s| s.current_project.clone())
    }

    pub fn project_by_id(&self, project_id: i64) -> Option<Project> {
        self.state
            .read(|s| s.projects.iter().find(|p| p.id == project_id).cloned())
    }

    /// Code files of one project; empty if never fetched.
    pub fn code_files_for(&self, project_id: i64) -> Vec<CodeFile> {
        self.state
            .read(|s| s.code_files.get(&project_id).cloned().unwrap_or_default())
    }

    pub fn current_code_file(&self) -> Option<CodeFile> {
        self.state.read(|s| s.current_code_file.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.status.is_loading())
    }

    pub fn error(&self) -> Option<String> {
        self.state.read(|s| s.status.error.clone())
    }
}
