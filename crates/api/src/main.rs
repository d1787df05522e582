use anyhow::Context;

use orgbook_api::config::AppConfig;
use orgbook_api::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the variables directly.
    let _ = dotenvy::dotenv();

    orgbook_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    server::run(config, server::shutdown_signal()).await
}
