use anyhow::Result;
use orbitdeck_ops_server::bootstrap;

#[tokio::main]
async fn main() -> Result<()> {
    // Bootstrap the application (config, logging, services, API router)
    let app = bootstrap::setup().await?;

    tracing::info!("HTTP server listening on http://{}", app.bind_address);

    let listener = tokio::net::TcpListener::bind(app.socket_addr).await?;
    axum::serve(listener, app.router).await?;

    Ok(())
}
