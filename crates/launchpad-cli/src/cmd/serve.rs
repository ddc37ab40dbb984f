use anyhow::{Context, Result};
use launchpad_core::{ApplicationTemplate, Config};
use launchpad_server::AppState;
use std::net::SocketAddr;
use std::path::Path;

pub fn run(host: &str, port: u16, template: Option<&Path>) -> Result<()> {
    let config = Config::from_env()?;

    let template = match template {
        Some(path) => ApplicationTemplate::load(path)
            .with_context(|| format!("loading template {}", path.display()))?,
        None => ApplicationTemplate::default(),
    };

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    tracing::info!(
        identity = ?config.identity,
        qovery = %config.qovery_api_url,
        application = %template.name,
        "starting launchpad"
    );
    let state = AppState::from_config(&config, template);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(launchpad_server::serve(addr, state))
}
