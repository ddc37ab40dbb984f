use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::error::{LaunchpadError, Result};

/// Session variable carrying the caller's identity.
pub const USER_ID_SESSION_KEY: &str = "x-hasura-user-id";

pub type SessionVariables = HashMap<String, String>;

/// Primary key of a row in the `project` table.
pub type ProjectId = i32;

// ---------------------------------------------------------------------------
// ActionPayload
// ---------------------------------------------------------------------------

/// Envelope Hasura posts to an action handler.
///
/// Other envelope fields (`action`, `request_query`) are ignored. `input` is
/// kept as raw JSON until the caller has been identified; decode it with
/// [`ActionPayload::arguments`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionPayload {
    #[serde(default)]
    pub session_variables: Option<SessionVariables>,
    #[serde(default)]
    pub input: Value,
}

impl ActionPayload {
    /// Decode the action arguments as `T`.
    ///
    /// Accepts both the argument object Hasura sends for an action declared
    /// with a single `input` argument (`{"input": {...}}`) and the bare
    /// fields. Anything else is a [`LaunchpadError::MalformedRequest`].
    pub fn arguments<T: DeserializeOwned>(&self) -> Result<T> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Arguments<U> {
            Named { input: U },
            Inline(U),
        }

        match Arguments::<T>::deserialize(&self.input) {
            Ok(Arguments::Named { input }) | Ok(Arguments::Inline(input)) => Ok(input),
            Err(e) => {
                tracing::debug!(error = %e, "unreadable action input");
                Err(LaunchpadError::MalformedRequest)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// UserId
// ---------------------------------------------------------------------------

/// Authenticated caller, as found in the session or token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for an empty id.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as the store's `owner_id` column.
    pub fn owner_id(&self) -> Result<i32> {
        self.0
            .parse()
            .map_err(|_| LaunchpadError::InvalidUserId(self.0.clone()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Action inputs and outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
}

/// Input of the start, stop and delete actions.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProjectRef {
    pub id: ProjectId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectOutput {
    pub id: ProjectId,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub ok: bool,
}

impl OperationResult {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

// ---------------------------------------------------------------------------
// Store records
// ---------------------------------------------------------------------------

/// A row of the `project` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub url: String,
    pub qovery_project_id: String,
    pub qovery_environment_id: String,
}

/// Values for `insert_project_one`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProject {
    pub owner_id: i32,
    pub name: String,
    pub url: String,
    pub qovery_project_id: String,
    pub qovery_environment_id: String,
}
