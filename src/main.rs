use taskhub_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is a development convenience; absence is fine
    dotenvy::dotenv().ok();

    // Logging before configuration so the dev-secret warning is visible
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(None, log_dir.as_deref());

    // A missing SESSION_SECRET in production must stop the process before
    // anything binds a port
    let config = Config::from_env()?;

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "TaskHub server starting"
    );

    let state = ServerState::initialize(config).await?;

    let server = Server::new(state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
