use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::rpc::Dispatcher;
use crate::cli::Cli;
use crate::clients::gemini::GeminiClient;
use crate::infra::config::{Config, Mode};
use crate::infra::gateway::{GeminiGateway, SearchGateway};
use crate::tools::registry::build_registry;

/// Resolve configuration and the shared default backend client.
pub fn prepare(cli: &Cli) -> anyhow::Result<(Config, Arc<dyn SearchGateway>)> {
    let mut cfg = Config::from_env_and_toml()?;
    cli.apply(&mut cfg);
    let client = GeminiClient::new(cfg.api_base.clone(), cfg.api_key()?, cfg.model.clone());
    let gateway: Arc<dyn SearchGateway> = Arc::new(GeminiGateway::new(Arc::new(client)));
    Ok((cfg, gateway))
}

pub async fn run_server(cli: Cli) -> anyhow::Result<()> {
    let (cfg, gateway) = prepare(&cli)?;
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        model = %cfg.model,
        "BOOT search-mcp-gateway"
    );

    if cfg.mode == Mode::Stdio {
        let dispatcher = Dispatcher::new(build_registry(gateway));
        crate::infra::stdio::serve_stdio(dispatcher).await?;
        return Ok(());
    }

    let app = crate::infra::http_app::build_app(gateway);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
