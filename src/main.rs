use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

pub mod config;
pub mod model;
pub mod parse;
pub mod prompt;
pub mod recommend;
pub mod urls;
pub mod web;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));
    let config = config::Config::read_or_create(&config_path)?;

    web::run(config).await
}
