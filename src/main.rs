use cpr_coach::{
    config::Settings, error::AppError, intake::client::ClientManager, network::Server,
};
use tracing::{Level, info};

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config_path = std::env::args().nth(1);
    let settings = Settings::load(config_path.as_deref())?;
    init_logging(settings.level()?);
    info!("Loaded settings: {:?}", settings);

    let (manager, handle) = ClientManager::new(&settings, None);
    let server = Server::bind(&settings, handle.clone()).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
    }

    handle.shutdown_all().await?;
    manager.stop();
    info!("Coaching server stopped");
    Ok(())
}
