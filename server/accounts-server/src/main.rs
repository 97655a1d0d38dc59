use accounts_server::{create_app, AccountsServer, ServerConfig};
use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("accounts_server=debug,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env();
    let addr = format!("{}:{}", config.host, config.port);

    let server = AccountsServer::new(config).await?;
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "accounts server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
