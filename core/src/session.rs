//! The per-process session: one client, one token, one project cache.

use serde_json::Value;

use crate::bugs;
use crate::cache::{ProjectCache, ProjectQuery};
use crate::catalog;
use crate::client::ZentaoClient;
use crate::config::{RuntimeOptions, ZentaoConfig};
use crate::error::Result;
use crate::model::{
    Bug, BugResolution, BugStatus, CreateTaskRequest, Execution, Product, Project, Task, TaskStatus,
    TaskUpdate,
};
use crate::tasks::{self, CreatedTask, TaskQuery};

/// Holds the credential and project-cache state for the lifetime of the process.
///
/// Build it once and pass it around; nothing here is reset short of dropping it.
pub struct ZentaoSession {
    client: ZentaoClient,
    projects: ProjectCache,
}

impl ZentaoSession {
    pub fn new(config: &ZentaoConfig, options: &RuntimeOptions) -> Result<Self> {
        Ok(Self::with_parts(
            ZentaoClient::new(config)?,
            ProjectCache::from_options(options)?,
        ))
    }

    pub fn with_parts(client: ZentaoClient, projects: ProjectCache) -> Self {
        Self { client, projects }
    }

    pub fn client(&self) -> &ZentaoClient {
        &self.client
    }

    /// Exchanges credentials for a token now instead of on the first request.
    pub async fn login(&self) -> Result<String> {
        self.client.token().await
    }

    pub async fn get_projects(&self, query: ProjectQuery) -> Result<Vec<Project>> {
        let client = &self.client;
        self.projects
            .get_or_fetch(query, || catalog::fetch_projects(client))
            .await
    }

    pub async fn get_my_tasks(
        &self,
        status: TaskStatus,
        include_all: bool,
        query: &TaskQuery,
    ) -> Result<Vec<Task>> {
        tasks::get_my_tasks(&self.client, status, include_all, query).await
    }

    pub async fn get_task_detail(&self, task_id: u64) -> Result<Task> {
        tasks::get_task_detail(&self.client, task_id).await
    }

    pub async fn update_task(&self, task_id: u64, update: &TaskUpdate) -> Result<Value> {
        tasks::update_task(&self.client, task_id, update).await
    }

    pub async fn finish_task(&self, task_id: u64, update: TaskUpdate) -> Result<Value> {
        tasks::finish_task(&self.client, task_id, update).await
    }

    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<CreatedTask> {
        tasks::create_task(&self.client, request).await
    }

    pub async fn get_project_task_count(&self, project_id: u64, status: TaskStatus) -> Result<u64> {
        tasks::get_project_task_count(&self.client, project_id, status).await
    }

    pub async fn get_products(&self) -> Result<Vec<Product>> {
        catalog::get_products(&self.client).await
    }

    pub async fn get_executions(&self, project_id: Option<u64>) -> Result<Vec<Execution>> {
        catalog::get_executions(&self.client, project_id).await
    }

    pub async fn get_my_bugs(
        &self,
        status: BugStatus,
        product_id: Option<u64>,
    ) -> Result<Vec<Bug>> {
        bugs::get_my_bugs(&self.client, status, product_id).await
    }

    pub async fn get_bug_detail(&self, bug_id: u64) -> Result<Bug> {
        bugs::get_bug_detail(&self.client, bug_id).await
    }

    pub async fn resolve_bug(&self, bug_id: u64, resolution: &BugResolution) -> Result<Value> {
        bugs::resolve_bug(&self.client, bug_id, resolution).await
    }
}
