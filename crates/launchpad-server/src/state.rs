use launchpad_core::{
    ApplicationTemplate, Config, HasuraStore, IdentityMode, IdentityResolver, Orchestrator,
    QoveryClient, SessionIdentity, TokenIdentity,
};
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub identity: Arc<dyn IdentityResolver>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            orchestrator,
            identity,
        }
    }

    /// Wire the Qovery client, the Hasura store and the configured identity
    /// resolver.
    pub fn from_config(config: &Config, template: ApplicationTemplate) -> Self {
        let deploy = QoveryClient::new(&config.qovery_api_url, &config.qovery_api_token);
        let store = HasuraStore::new(&config.hasura_api_url, &config.hasura_api_token);
        let orchestrator = Orchestrator::new(
            Arc::new(deploy),
            Arc::new(store),
            &config.qovery_organization_id,
        )
        .with_template(template);

        let identity: Arc<dyn IdentityResolver> = match config.identity {
            IdentityMode::Session => Arc::new(SessionIdentity),
            IdentityMode::Token => Arc::new(TokenIdentity::new(&config.secret)),
        };

        Self::new(orchestrator, identity)
    }
}
