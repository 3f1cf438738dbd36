/**
 * Chatline Server Entry Point
 *
 * Loads configuration, initializes tracing, wires the application and serves
 * it until Ctrl-C. On shutdown, waiting long polls return empty lists and all
 * push topics are closed so in-flight connections finish promptly.
 */

use chatline::backend::server::{build_state, create_app, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let config = ServerConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .init();

    tracing::info!("[STARTUP] Server initialization started");

    let state = build_state(&config).await;
    let app = create_app(state.clone(), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("[STARTUP] Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            state.begin_shutdown();
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
