use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use vimi::{Config, Database, EnvKeyProvider, KeyProvider, StaticKeyProvider, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration
    let mut config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = vimi::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        vimi::logging::init_console_only(&config.logging.level);
    }

    info!("vimi - private messaging service");

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> vimi::Result<()> {
    config.validate()?;

    // Refuse to start without a usable message key
    let env_keys = EnvKeyProvider::from_config(&config.messaging);
    let keys = StaticKeyProvider::resolve_once(&env_keys)?;
    info!(
        "Message key loaded from {} ({} bit)",
        env_keys.var_name(),
        keys.resolve_key()?.bits()
    );

    let db = Database::open(&config.database.path, config.database.max_connections).await?;
    info!("Database ready at {}", config.database.path);

    let server = WebServer::new(&config.web, Arc::new(db), Arc::new(keys))?;
    info!("Web API configured on {}", server.addr());
    server.run().await?;

    Ok(())
}
