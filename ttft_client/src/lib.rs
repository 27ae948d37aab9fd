use tracing::info;
use tracing_subscriber::EnvFilter;
use ttft::GenerationRequest;

mod client;
pub mod models;
mod utils;

pub use client::{ClientError, HttpCompletionClient, fragments};
pub use models::config::{Args, ConfigError, TtftConfig};

/// Set up logging and load the config file, returning a client for the
/// configured API and the request to measure with it.
pub fn init(
    args: Args,
) -> Result<(HttpCompletionClient, GenerationRequest), Box<dyn std::error::Error>> {
    // A `.env` file can set RUST_LOG and secrets referenced by the config
    // file, so it's loaded before anything reads the environment.
    let dotenv_path = dotenvy::dotenv().ok();

    // Logs go to stderr so the report is the only thing on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&dotenvy::var("RUST_LOG").unwrap_or_default()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
    if let Some(path) = dotenv_path {
        info!("loaded environment from {}", path.display());
    }

    let config_path = args
        .config_path
        .clone()
        .or_else(utils::default_config_path)
        .ok_or(ConfigError::MissingPath)?;
    info!("loading config from {}", config_path.display());
    let config = TtftConfig::from_path(&config_path)?.with_overrides(args);
    let (api_config, request) = config.into_parts();
    let client = HttpCompletionClient::new(api_config)?;
    Ok((client, request))
}

fn env_filter(directives: &str) -> EnvFilter {
    EnvFilter::new(directives)
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::env_filter;

    #[test]
    fn log_directives() {
        assert_eq!(env_filter("debug").max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            env_filter("warn,ttft=trace").max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }
}
