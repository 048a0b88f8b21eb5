//! # Backend Service
//!
//! Thin entry point that loads `.env`, builds the configuration, and delegates
//! to lib-web for server setup.

use lib_core::Config;
use lib_web::start_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    config.validate()?;

    start_server(config).await
}
