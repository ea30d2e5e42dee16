use brew_server::{Config, Server, ServerState, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (dotenv, logging)
    setup_environment()?;

    tracing::info!("Brew server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. State (directories, database, services)
    let state = ServerState::initialize(&config).await?;

    // 4. HTTP server (spawns the reaper and the push listener)
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
