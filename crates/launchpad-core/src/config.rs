use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_SECRET: &str = "SECRET";
pub const ENV_HASURA_API_URL: &str = "HASURA_API_URL";
pub const ENV_HASURA_API_TOKEN: &str = "HASURA_API_TOKEN";
pub const ENV_QOVERY_API_TOKEN: &str = "API_TOKEN_QOVERY";
pub const ENV_QOVERY_ORGANIZATION_ID: &str = "ORGANIZATION_ID_QOVERY";
pub const ENV_QOVERY_API_URL: &str = "QOVERY_API_URL";
pub const ENV_IDENTITY: &str = "LAUNCHPAD_IDENTITY";

pub const DEFAULT_QOVERY_API_URL: &str = "https://api.qovery.com";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{}", missing_lines(.0))]
    Missing(Vec<&'static str>),

    #[error("invalid LAUNCHPAD_IDENTITY '{0}': expected 'session' or 'token'")]
    InvalidIdentityMode(String),
}

fn missing_lines(names: &[&'static str]) -> String {
    names
        .iter()
        .map(|name| format!("{name} env required"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ---------------------------------------------------------------------------
// IdentityMode
// ---------------------------------------------------------------------------

/// Where the caller's user id is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityMode {
    /// Trust `x-hasura-user-id` from the action's session variables.
    #[default]
    Session,
    /// Verify the forwarded `Authorization: Bearer` token with the secret.
    Token,
}

impl FromStr for IdentityMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "session" => Ok(IdentityMode::Session),
            "token" => Ok(IdentityMode::Token),
            _ => Err(ConfigError::InvalidIdentityMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Process configuration, read once at startup and passed to whatever needs it.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub secret: String,
    pub hasura_api_url: String,
    pub hasura_api_token: String,
    pub qovery_api_token: String,
    pub qovery_organization_id: String,
    pub qovery_api_url: String,
    pub identity: IdentityMode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Every required variable that is unset or empty is reported, not just
    /// the first one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut required = |key: &'static str| match lookup(key) {
            Some(value) if !value.is_empty() => value,
            _ => {
                missing.push(key);
                String::new()
            }
        };

        let secret = required(ENV_SECRET);
        let hasura_api_url = required(ENV_HASURA_API_URL);
        let hasura_api_token = required(ENV_HASURA_API_TOKEN);
        let qovery_api_token = required(ENV_QOVERY_API_TOKEN);
        let qovery_organization_id = required(ENV_QOVERY_ORGANIZATION_ID);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let qovery_api_url = lookup(ENV_QOVERY_API_URL)
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_QOVERY_API_URL.to_string());
        let identity = match lookup(ENV_IDENTITY).filter(|mode| !mode.is_empty()) {
            Some(mode) => mode.parse()?,
            None => IdentityMode::default(),
        };

        Ok(Self {
            secret,
            hasura_api_url,
            hasura_api_token,
            qovery_api_token,
            qovery_organization_id,
            qovery_api_url,
            identity,
        })
    }
}

// Tokens and the secret stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("secret", &"***")
            .field("hasura_api_url", &self.hasura_api_url)
            .field("hasura_api_token", &"***")
            .field("qovery_api_token", &"***")
            .field("qovery_organization_id", &self.qovery_organization_id)
            .field("qovery_api_url", &self.qovery_api_url)
            .field("identity", &self.identity)
            .finish()
    }
}
