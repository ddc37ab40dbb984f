//! Project lifecycle operations.
//!
//! Every operation is a fixed chain of dependent calls that stops at the
//! first failure. Nothing is rolled back: a create that fails after the
//! remote project exists leaves that project (and whatever else was created)
//! behind in Qovery.

use std::sync::Arc;
use tracing::info;

use crate::deploy::DeploymentApi;
use crate::error::{LaunchpadError, Result};
use crate::store::ProjectStore;
use crate::template::ApplicationTemplate;
use crate::types::{
    CreateProjectInput, CreateProjectOutput, NewProject, OperationResult, Project, ProjectId,
    UserId,
};

/// Name of the single environment created for every project.
pub const ENVIRONMENT_NAME: &str = "production";

#[derive(Clone)]
pub struct Orchestrator {
    deploy: Arc<dyn DeploymentApi>,
    store: Arc<dyn ProjectStore>,
    organization_id: String,
    template: ApplicationTemplate,
}

impl Orchestrator {
    pub fn new(
        deploy: Arc<dyn DeploymentApi>,
        store: Arc<dyn ProjectStore>,
        organization_id: impl Into<String>,
    ) -> Self {
        Orchestrator {
            deploy,
            store,
            organization_id: organization_id.into(),
            template: ApplicationTemplate::default(),
        }
    }

    pub fn with_template(mut self, template: ApplicationTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn template(&self) -> &ApplicationTemplate {
        &self.template
    }

    /// Provision project, environment and application in Qovery, then record
    /// the project in the store under `owner`.
    pub async fn create_project(
        &self,
        input: &CreateProjectInput,
        owner: &UserId,
    ) -> Result<CreateProjectOutput> {
        info!(name = %input.name, owner = %owner, "received create project request");
        let owner_id = owner.owner_id()?;

        let project = self
            .deploy
            .create_project(&self.organization_id, &input.name)
            .await?;
        let environment = self
            .deploy
            .create_environment(&project.id, ENVIRONMENT_NAME)
            .await?;
        let application = self
            .deploy
            .create_application(&environment.id, &self.template)
            .await?;

        let url = self
            .deploy
            .list_application_links(&application.id)
            .await?
            .into_iter()
            .next()
            .map(|link| link.url)
            .ok_or_else(|| LaunchpadError::MissingApplicationLink(application.id.clone()))?;

        let record = NewProject {
            owner_id,
            name: input.name.clone(),
            url,
            qovery_project_id: project.id,
            qovery_environment_id: environment.id,
        };
        let id = self.store.insert_project(&record).await?;

        info!(id, qovery_project_id = %record.qovery_project_id, "project created");
        Ok(CreateProjectOutput {
            id,
            name: record.name,
            url: record.url,
        })
    }

    pub async fn start_project(&self, id: ProjectId) -> Result<OperationResult> {
        info!(id, "received start project request");
        let project = self.find_project(id).await?;
        self.deploy
            .deploy_environment(&project.qovery_environment_id)
            .await?;
        Ok(OperationResult::ok())
    }

    pub async fn stop_project(&self, id: ProjectId) -> Result<OperationResult> {
        info!(id, "received stop project request");
        let project = self.find_project(id).await?;
        self.deploy
            .stop_environment(&project.qovery_environment_id)
            .await?;
        Ok(OperationResult::ok())
    }

    /// Delete the Qovery project, then its store record. The record is kept
    /// if the remote delete fails.
    pub async fn delete_project(&self, id: ProjectId) -> Result<OperationResult> {
        info!(id, "received delete project request");
        let project = self.find_project(id).await?;
        self.deploy
            .delete_project(&project.qovery_project_id)
            .await?;
        self.store.delete_project(id).await?;
        Ok(OperationResult::ok())
    }

    /// The lookup must match exactly one row.
    async fn find_project(&self, id: ProjectId) -> Result<Project> {
        let mut rows = self.store.projects_by_id(id).await?;
        if rows.len() != 1 {
            return Err(LaunchpadError::ProjectNotFound);
        }
        Ok(rows.remove(0))
    }
}
