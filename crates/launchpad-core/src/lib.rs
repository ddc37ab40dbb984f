//! Project lifecycle orchestration between Hasura and Qovery.
//!
//! Hasura is the system of record for projects; Qovery provisions the cloud
//! resources behind them. This crate holds everything between the two:
//!
//! ```text
//! ActionPayload ──► IdentityResolver ──► Orchestrator ──┬──► DeploymentApi (Qovery REST)
//!                                                      └──► ProjectStore  (Hasura GraphQL)
//! ```
//!
//! The HTTP surface lives in `launchpad-server`; nothing here knows about axum.

pub mod config;
pub mod deploy;
pub mod error;
pub mod identity;
pub mod orchestrator;
pub mod store;
pub mod template;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

pub use config::{Config, ConfigError, IdentityMode};
pub use deploy::{DeployError, DeployStep, DeploymentApi, QoveryClient};
pub use error::{ErrorKind, LaunchpadError, Result};
pub use identity::{IdentityResolver, SessionIdentity, TokenIdentity};
pub use orchestrator::Orchestrator;
pub use store::{HasuraStore, ProjectStore, StoreError};
pub use template::ApplicationTemplate;
