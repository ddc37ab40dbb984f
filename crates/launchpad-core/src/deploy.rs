//! Qovery deployment API: the calls the orchestrator makes and a reqwest client.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::template::ApplicationTemplate;

/// The remote call a [`DeployError`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeployStep {
    CreateProject,
    CreateEnvironment,
    CreateApplication,
    ListApplicationLinks,
    DeployEnvironment,
    StopEnvironment,
    DeleteProject,
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeployStep::CreateProject => "creating a new project",
            DeployStep::CreateEnvironment => "creating a new environment",
            DeployStep::CreateApplication => "creating a new application",
            DeployStep::ListApplicationLinks => "getting a new application link",
            DeployStep::DeployEnvironment => "starting a project",
            DeployStep::StopEnvironment => "stopping a project",
            DeployStep::DeleteProject => "deleting a project",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("{step} from Qovery API failed: {source}")]
    Transport {
        step: DeployStep,
        #[source]
        source: reqwest::Error,
    },

    #[error("received {status} {step} from Qovery API")]
    Status { step: DeployStep, status: StatusCode },

    #[error("unexpected response {step} from Qovery API: {source}")]
    Decode {
        step: DeployStep,
        #[source]
        source: reqwest::Error,
    },
}

impl DeployError {
    pub fn step(&self) -> DeployStep {
        match self {
            DeployError::Transport { step, .. }
            | DeployError::Status { step, .. }
            | DeployError::Decode { step, .. } => *step,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Any Qovery resource we only need the id of.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteResource {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApplicationLink {
    pub url: String,
}

#[derive(Deserialize)]
struct LinkList {
    #[serde(default)]
    results: Vec<ApplicationLink>,
}

#[derive(Serialize)]
struct NameRequest<'a> {
    name: &'a str,
}

// ---------------------------------------------------------------------------
// DeploymentApi
// ---------------------------------------------------------------------------

#[async_trait]
pub trait DeploymentApi: Send + Sync {
    async fn create_project(
        &self,
        organization_id: &str,
        name: &str,
    ) -> Result<RemoteResource, DeployError>;

    async fn create_environment(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<RemoteResource, DeployError>;

    async fn create_application(
        &self,
        environment_id: &str,
        template: &ApplicationTemplate,
    ) -> Result<RemoteResource, DeployError>;

    async fn list_application_links(
        &self,
        application_id: &str,
    ) -> Result<Vec<ApplicationLink>, DeployError>;

    async fn deploy_environment(&self, environment_id: &str) -> Result<(), DeployError>;

    async fn stop_environment(&self, environment_id: &str) -> Result<(), DeployError>;

    /// Deleting a project removes its environments and applications with it.
    async fn delete_project(&self, project_id: &str) -> Result<(), DeployError>;
}

// ---------------------------------------------------------------------------
// QoveryClient
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct QoveryClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl QoveryClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        QoveryClient {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, step: DeployStep, request: RequestBuilder) -> Result<Response, DeployError> {
        tracing::debug!(%step, "calling Qovery API");
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|source| DeployError::Transport { step, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeployError::Status { step, status });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        step: DeployStep,
        request: RequestBuilder,
    ) -> Result<T, DeployError> {
        self.send(step, request)
            .await?
            .json::<T>()
            .await
            .map_err(|source| DeployError::Decode { step, source })
    }
}

#[async_trait]
impl DeploymentApi for QoveryClient {
    async fn create_project(
        &self,
        organization_id: &str,
        name: &str,
    ) -> Result<RemoteResource, DeployError> {
        let url = self.url(&format!("/organization/{organization_id}/project"));
        let request = self.client.post(url).json(&NameRequest { name });
        self.send_json(DeployStep::CreateProject, request).await
    }

    async fn create_environment(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<RemoteResource, DeployError> {
        let url = self.url(&format!("/project/{project_id}/environment"));
        let request = self.client.post(url).json(&NameRequest { name });
        self.send_json(DeployStep::CreateEnvironment, request).await
    }

    async fn create_application(
        &self,
        environment_id: &str,
        template: &ApplicationTemplate,
    ) -> Result<RemoteResource, DeployError> {
        let url = self.url(&format!("/environment/{environment_id}/application"));
        let request = self.client.post(url).json(template);
        self.send_json(DeployStep::CreateApplication, request).await
    }

    async fn list_application_links(
        &self,
        application_id: &str,
    ) -> Result<Vec<ApplicationLink>, DeployError> {
        let url = self.url(&format!("/application/{application_id}/link"));
        let request = self.client.get(url);
        let links: LinkList = self
            .send_json(DeployStep::ListApplicationLinks, request)
            .await?;
        Ok(links.results)
    }

    async fn deploy_environment(&self, environment_id: &str) -> Result<(), DeployError> {
        let url = self.url(&format!("/environment/{environment_id}/deploy"));
        self.send(DeployStep::DeployEnvironment, self.client.post(url))
            .await?;
        Ok(())
    }

    async fn stop_environment(&self, environment_id: &str) -> Result<(), DeployError> {
        let url = self.url(&format!("/environment/{environment_id}/stop"));
        self.send(DeployStep::StopEnvironment, self.client.post(url))
            .await?;
        Ok(())
    }

    async fn delete_project(&self, project_id: &str) -> Result<(), DeployError> {
        let url = self.url(&format!("/project/{project_id}"));
        self.send(DeployStep::DeleteProject, self.client.delete(url))
            .await?;
        Ok(())
    }
}
