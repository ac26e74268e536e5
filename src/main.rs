use artrelay::logger::{self, LogLevel, LoggerConfig};
use artrelay::{server, Config};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_with_config(LoggerConfig::development().with_level(LogLevel::Debug))?;

    match dotenv::dotenv() {
        Ok(_) => log::info!(".env file loaded successfully"),
        Err(_) => log::warn!("No .env file found, using system environment variables"),
    }

    let config = Config::from_env();
    log::info!("Upstream endpoint: {}", config.upstream.api_url);
    log::info!(
        "Retry policy: {} attempts, {}s timeout per attempt",
        config.upstream.max_attempts,
        config.upstream.request_timeout.as_secs()
    );

    if let Err(e) = server::run(config).await {
        log::error!("Server terminated: {}", e);
        return Err(e.into());
    }

    Ok(())
}
