use thiserror::Error;

use crate::deploy::DeployError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum LaunchpadError {
    #[error("invalid payload")]
    MalformedRequest,

    #[error("user not authenticated")]
    Unauthenticated,

    #[error("invalid user id '{0}': expected an integer")]
    InvalidUserId(String),

    #[error("project not found")]
    ProjectNotFound,

    #[error("no public link returned for application {0}")]
    MissingApplicationLink(String),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification of a [`LaunchpadError`].
///
/// The HTTP layer answers every kind with the same status; the kind is kept
/// for logging and for callers that want to tell failures apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedRequest,
    Unauthenticated,
    NotFound,
    RemoteCallFailure,
    RemoteStatusError,
    StoreMutationFailure,
}

impl LaunchpadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LaunchpadError::MalformedRequest | LaunchpadError::InvalidUserId(_) => {
                ErrorKind::MalformedRequest
            }
            LaunchpadError::Unauthenticated => ErrorKind::Unauthenticated,
            LaunchpadError::ProjectNotFound | LaunchpadError::MissingApplicationLink(_) => {
                ErrorKind::NotFound
            }
            LaunchpadError::Deploy(DeployError::Status { .. }) => ErrorKind::RemoteStatusError,
            LaunchpadError::Deploy(_) => ErrorKind::RemoteCallFailure,
            LaunchpadError::Store(StoreError::Transport(_)) => ErrorKind::RemoteCallFailure,
            LaunchpadError::Store(_) => ErrorKind::StoreMutationFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, LaunchpadError>;
