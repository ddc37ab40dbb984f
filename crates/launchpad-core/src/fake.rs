//! In-memory [`DeploymentApi`] and [`ProjectStore`] that record every call.
//!
//! Both fakes append to one shared [`CallLog`] so tests can assert ordering
//! across the two services. A call is logged before it fails.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::deploy::{ApplicationLink, DeployError, DeployStep, DeploymentApi, RemoteResource};
use crate::store::{ProjectStore, StoreError};
use crate::template::ApplicationTemplate;
use crate::types::{NewProject, Project, ProjectId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateProject {
        organization_id: String,
        name: String,
    },
    CreateEnvironment {
        project_id: String,
        name: String,
    },
    CreateApplication {
        environment_id: String,
        name: String,
    },
    ListApplicationLinks {
        application_id: String,
    },
    DeployEnvironment {
        environment_id: String,
    },
    StopEnvironment {
        environment_id: String,
    },
    DeleteProject {
        project_id: String,
    },
    InsertProject(NewProject),
    ProjectsById(ProjectId),
    DeleteProjectRecord(ProjectId),
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    fn push(&self, call: Call) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }
}

// ---------------------------------------------------------------------------
// FakeDeployment
// ---------------------------------------------------------------------------

pub struct FakeDeployment {
    log: CallLog,
    project_id: String,
    environment_id: String,
    application_id: String,
    links: Vec<String>,
    failures: HashMap<DeployStep, StatusCode>,
}

impl FakeDeployment {
    pub fn new(log: CallLog) -> Self {
        FakeDeployment {
            log,
            project_id: "qp-1".to_string(),
            environment_id: "qe-1".to_string(),
            application_id: "qa-1".to_string(),
            links: vec!["https://app.example".to_string()],
            failures: HashMap::new(),
        }
    }

    /// Ids handed out for created project, environment and application.
    pub fn with_ids(mut self, project: &str, environment: &str, application: &str) -> Self {
        self.project_id = project.to_string();
        self.environment_id = environment.to_string();
        self.application_id = application.to_string();
        self
    }

    pub fn with_links(mut self, urls: &[&str]) -> Self {
        self.links = urls.iter().map(|u| u.to_string()).collect();
        self
    }

    /// Answer `step` with `status` instead of succeeding.
    pub fn failing(mut self, step: DeployStep, status: StatusCode) -> Self {
        self.failures.insert(step, status);
        self
    }

    fn record(&self, step: DeployStep, call: Call) -> Result<(), DeployError> {
        self.log.push(call);
        match self.failures.get(&step) {
            Some(&status) => Err(DeployError::Status { step, status }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DeploymentApi for FakeDeployment {
    async fn create_project(
        &self,
        organization_id: &str,
        name: &str,
    ) -> Result<RemoteResource, DeployError> {
        self.record(
            DeployStep::CreateProject,
            Call::CreateProject {
                organization_id: organization_id.to_string(),
                name: name.to_string(),
            },
        )?;
        Ok(RemoteResource {
            id: self.project_id.clone(),
        })
    }

    async fn create_environment(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<RemoteResource, DeployError> {
        self.record(
            DeployStep::CreateEnvironment,
            Call::CreateEnvironment {
                project_id: project_id.to_string(),
                name: name.to_string(),
            },
        )?;
        Ok(RemoteResource {
            id: self.environment_id.clone(),
        })
    }

    async fn create_application(
        &self,
        environment_id: &str,
        template: &ApplicationTemplate,
    ) -> Result<RemoteResource, DeployError> {
        self.record(
            DeployStep::CreateApplication,
            Call::CreateApplication {
                environment_id: environment_id.to_string(),
                name: template.name.clone(),
            },
        )?;
        Ok(RemoteResource {
            id: self.application_id.clone(),
        })
    }

    async fn list_application_links(
        &self,
        application_id: &str,
    ) -> Result<Vec<ApplicationLink>, DeployError> {
        self.record(
            DeployStep::ListApplicationLinks,
            Call::ListApplicationLinks {
                application_id: application_id.to_string(),
            },
        )?;
        Ok(self
            .links
            .iter()
            .map(|url| ApplicationLink { url: url.clone() })
            .collect())
    }

    async fn deploy_environment(&self, environment_id: &str) -> Result<(), DeployError> {
        self.record(
            DeployStep::DeployEnvironment,
            Call::DeployEnvironment {
                environment_id: environment_id.to_string(),
            },
        )
    }

    async fn stop_environment(&self, environment_id: &str) -> Result<(), DeployError> {
        self.record(
            DeployStep::StopEnvironment,
            Call::StopEnvironment {
                environment_id: environment_id.to_string(),
            },
        )
    }

    async fn delete_project(&self, project_id: &str) -> Result<(), DeployError> {
        self.record(
            DeployStep::DeleteProject,
            Call::DeleteProject {
                project_id: project_id.to_string(),
            },
        )
    }
}

// ---------------------------------------------------------------------------
// FakeStore
// ---------------------------------------------------------------------------

pub struct FakeStore {
    log: CallLog,
    rows: Mutex<Vec<Project>>,
    next_id: Mutex<ProjectId>,
    failure: Option<String>,
}

impl FakeStore {
    pub fn new(log: CallLog) -> Self {
        FakeStore {
            log,
            rows: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            failure: None,
        }
    }

    /// Rows are not deduplicated, so adding the same id twice makes lookups
    /// ambiguous.
    pub fn with_project(self, project: Project) -> Self {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(project);
        self
    }

    pub fn with_next_id(self, id: ProjectId) -> Self {
        *self.next_id.lock().unwrap_or_else(PoisonError::into_inner) = id;
        self
    }

    /// Every operation answers with a GraphQL error carrying `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    fn record(&self, call: Call) -> Result<(), StoreError> {
        self.log.push(call);
        match &self.failure {
            Some(message) => Err(StoreError::GraphQl(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProjectStore for FakeStore {
    async fn insert_project(&self, project: &NewProject) -> Result<ProjectId, StoreError> {
        self.record(Call::InsertProject(project.clone()))?;
        let mut next_id = self.next_id.lock().unwrap_or_else(PoisonError::into_inner);
        let id = *next_id;
        *next_id += 1;
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Project {
                id,
                name: project.name.clone(),
                url: project.url.clone(),
                qovery_project_id: project.qovery_project_id.clone(),
                qovery_environment_id: project.qovery_environment_id.clone(),
            });
        Ok(id)
    }

    async fn projects_by_id(&self, id: ProjectId) -> Result<Vec<Project>, StoreError> {
        self.record(Call::ProjectsById(id))?;
        Ok(self
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|p| p.id == id)
            .cloned()
            .collect())
    }

    async fn delete_project(&self, id: ProjectId) -> Result<(), StoreError> {
        self.record(Call::DeleteProjectRecord(id))?;
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|p| p.id != id);
        Ok(())
    }
}
