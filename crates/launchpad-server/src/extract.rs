use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::AUTHORIZATION;
use launchpad_core::identity::Credentials;
use launchpad_core::types::{ActionPayload, UserId};
use launchpad_core::LaunchpadError;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::state::AppState;

/// A Hasura action call: the parsed `input` plus the resolved caller.
///
/// A body that is not a JSON envelope is rejected first. The caller is
/// resolved next, so a payload without a user id is unauthenticated even
/// when its `input` is missing or the wrong shape. `input` is decoded last.
#[derive(Debug)]
pub struct Action<T> {
    pub user: UserId,
    pub input: T,
}

impl<T> FromRequest<AppState> for Action<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|v| v.trim().to_string());

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| LaunchpadError::MalformedRequest)?;
        let payload: ActionPayload = serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(error = %e, "unreadable action payload");
            LaunchpadError::MalformedRequest
        })?;

        let credentials = Credentials {
            session_variables: payload.session_variables.as_ref(),
            bearer_token: bearer.as_deref(),
        };
        let user = state.identity.resolve(&credentials)?;

        let input = payload.arguments()?;

        Ok(Action { user, input })
    }
}
