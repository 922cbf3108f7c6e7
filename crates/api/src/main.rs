//! MeetSync server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use meetsync_api::{routes, AppContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "loaded environment file");
    }

    let config = meetsync_infra::config::load()?;
    info!(
        port = config.server.port,
        provider = config.provider.api_key.is_some(),
        llm = config.llm.api_key.is_some(),
        database = config.database.path.is_some(),
        "starting MeetSync server"
    );

    let context = Arc::new(AppContext::new(config.clone())?);
    let app = routes::router(context);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, frontend = %config.server.frontend_url, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
