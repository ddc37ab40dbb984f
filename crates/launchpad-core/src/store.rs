//! Hasura GraphQL store for project records.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{NewProject, Project, ProjectId};

const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

const PROJECT_BY_ID: &str = r#"
query ProjectById($id: Int!) {
  project(where: {id: {_eq: $id}}) {
    id
    name
    url
    qovery_project_id
    qovery_environment_id
  }
}"#;

const INSERT_PROJECT: &str = r#"
mutation InsertProject($owner_id: Int!, $name: String!, $url: String!, $qovery_project_id: String!, $qovery_environment_id: String!) {
  insert_project_one(object: {owner_id: $owner_id, name: $name, url: $url, qovery_project_id: $qovery_project_id, qovery_environment_id: $qovery_environment_id}) {
    id
  }
}"#;

const DELETE_PROJECT: &str = r#"
mutation DeleteProject($id: Int!) {
  delete_project_by_pk(id: $id) {
    id
  }
}"#;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("GraphQL request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("received {0} from GraphQL endpoint")]
    Status(StatusCode),

    #[error("unexpected GraphQL response: {0}")]
    Decode(#[source] reqwest::Error),

    /// Messages of the response's `errors` array, joined.
    #[error("{0}")]
    GraphQl(String),

    #[error("GraphQL response has no {0}")]
    MissingData(&'static str),
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Inserts a project and returns its primary key.
    async fn insert_project(&self, project: &NewProject) -> Result<ProjectId, StoreError>;

    /// All rows whose primary key equals `id`.
    async fn projects_by_id(&self, id: ProjectId) -> Result<Vec<Project>, StoreError>;

    async fn delete_project(&self, id: ProjectId) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// GraphQL wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Returning {
    id: ProjectId,
}

#[derive(Debug, Deserialize)]
struct ProjectRows {
    project: Vec<Project>,
}

#[derive(Debug, Deserialize)]
struct Inserted {
    insert_project_one: Option<Returning>,
}

#[derive(Serialize)]
struct IdVariables {
    id: ProjectId,
}

// ---------------------------------------------------------------------------
// HasuraStore
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct HasuraStore {
    client: reqwest::Client,
    url: String,
    admin_secret: String,
}

impl HasuraStore {
    pub fn new(url: impl Into<String>, admin_secret: impl Into<String>) -> Self {
        HasuraStore {
            client: reqwest::Client::new(),
            url: url.into(),
            admin_secret: admin_secret.into(),
        }
    }

    async fn execute<V, T>(&self, query: &str, variables: V) -> Result<T, StoreError>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        tracing::debug!(url = %self.url, "calling GraphQL endpoint");
        let response = self
            .client
            .post(&self.url)
            .header(ADMIN_SECRET_HEADER, &self.admin_secret)
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status(status));
        }

        let body: GraphQlResponse<T> = response.json().await.map_err(StoreError::Decode)?;
        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(StoreError::GraphQl(message));
        }
        body.data.ok_or(StoreError::MissingData("data"))
    }
}

#[async_trait]
impl ProjectStore for HasuraStore {
    async fn insert_project(&self, project: &NewProject) -> Result<ProjectId, StoreError> {
        let inserted: Inserted = self.execute(INSERT_PROJECT, project).await?;
        inserted
            .insert_project_one
            .map(|row| row.id)
            .ok_or(StoreError::MissingData("insert_project_one"))
    }

    async fn projects_by_id(&self, id: ProjectId) -> Result<Vec<Project>, StoreError> {
        let rows: ProjectRows = self.execute(PROJECT_BY_ID, IdVariables { id }).await?;
        Ok(rows.project)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<(), StoreError> {
        // A null `delete_project_by_pk` means the row was already gone.
        let _: serde_json::Value = self.execute(DELETE_PROJECT, IdVariables { id }).await?;
        Ok(())
    }
}
