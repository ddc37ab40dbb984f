//! Caller identity: where an action's user id comes from.
//!
//! Handlers only ever see a [`UserId`]; swapping [`SessionIdentity`] for
//! [`TokenIdentity`] changes how it is obtained without touching the
//! orchestration.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{LaunchpadError, Result};
use crate::types::{SessionVariables, UserId, USER_ID_SESSION_KEY};

/// Claims namespace Hasura reads its session variables from.
pub const HASURA_CLAIMS_NAMESPACE: &str = "https://hasura.io/jwt/claims";

pub const DEFAULT_ROLE: &str = "admin";

pub const TOKEN_LIFETIME_HOURS: i64 = 72;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("could not sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// What a request carries that can identify its caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct Credentials<'a> {
    pub session_variables: Option<&'a SessionVariables>,
    /// Value of a forwarded `Authorization: Bearer` header, prefix stripped.
    pub bearer_token: Option<&'a str>,
}

pub trait IdentityResolver: Send + Sync {
    /// Fails with [`LaunchpadError::Unauthenticated`] when no user id can be
    /// established.
    fn resolve(&self, credentials: &Credentials<'_>) -> Result<UserId>;
}

// ---------------------------------------------------------------------------
// SessionIdentity
// ---------------------------------------------------------------------------

/// Trusts `x-hasura-user-id` as sent by the GraphQL engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SessionIdentity;

impl IdentityResolver for SessionIdentity {
    fn resolve(&self, credentials: &Credentials<'_>) -> Result<UserId> {
        credentials
            .session_variables
            .and_then(|vars| vars.get(USER_ID_SESSION_KEY))
            .and_then(|id| UserId::new(id.as_str()))
            .ok_or(LaunchpadError::Unauthenticated)
    }
}

// ---------------------------------------------------------------------------
// TokenIdentity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HasuraClaims {
    pub x_hasura_user_id: String,
    pub x_hasura_default_role: String,
    pub x_hasura_allowed_roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "https://hasura.io/jwt/claims")]
    pub hasura: HasuraClaims,
    pub exp: i64,
}

/// Verifies HS256 tokens signed with the shared secret.
pub struct TokenIdentity {
    key: DecodingKey,
    validation: Validation,
}

impl TokenIdentity {
    pub fn new(secret: &str) -> Self {
        TokenIdentity {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

impl IdentityResolver for TokenIdentity {
    fn resolve(&self, credentials: &Credentials<'_>) -> Result<UserId> {
        let token = credentials
            .bearer_token
            .ok_or(LaunchpadError::Unauthenticated)?;
        let data = decode::<TokenClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            LaunchpadError::Unauthenticated
        })?;
        UserId::new(data.claims.hasura.x_hasura_user_id).ok_or(LaunchpadError::Unauthenticated)
    }
}

/// Sign a token Hasura accepts for `user_id`, valid for 72 hours.
pub fn sign_token_for(user_id: &str, secret: &str) -> std::result::Result<String, IdentityError> {
    let claims = TokenClaims {
        hasura: HasuraClaims {
            x_hasura_user_id: user_id.to_string(),
            x_hasura_default_role: DEFAULT_ROLE.to_string(),
            x_hasura_allowed_roles: vec![DEFAULT_ROLE.to_string()],
        },
        exp: (Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}
