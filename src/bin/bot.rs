//! slirc-bot: a minimal modular bot on the slirc-client core.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use slirc_client::{Client, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "bot.toml".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            error!(path = %config_path, error = %err, "failed to load configuration");
            return Err(err.into());
        }
    };

    info!(
        host = %config.server.host,
        nick = %config.server.nick,
        "starting slirc-bot"
    );

    let mut client = Client::new(config);
    slirc_client::modules::register_builtins(&mut client.controller);
    if !client.start_modules() {
        error!("one or more configured modules failed to load");
    }
    client.connect().await?;
    client.run().await
}
