/**
 * Taskboard Server Entry Point
 *
 * Loads `.env`, reads the layered configuration, initializes tracing and
 * serves the Axum app.
 */

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let config = taskboard::shared::ServerConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .init();
    tracing::info!("Tracing initialized with filter {:?}", config.log_filter);

    let addr = config.bind_address()?;
    let app = taskboard::backend::server::create_app(config).await?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(not(feature = "server"))]
fn main() {
    eprintln!("The server requires the 'server' feature to be enabled.");
    eprintln!("Run with: cargo run --bin taskboard-server --features server");
    std::process::exit(1);
}
