use std::time::Duration;

use configs::DatabaseConfig;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use tracing::info;

const APP_NAME: &str = "message-board";

/// Connect to MongoDB and return a handle to the configured database.
///
/// The driver connects lazily; a `ping` is issued so a wrong URL or an
/// unreachable server fails at startup instead of on the first request.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<Database> {
    let mut options = ClientOptions::parse(cfg.url.as_str()).await?;
    let timeout = Duration::from_secs(cfg.connect_timeout_secs);
    options.app_name = Some(APP_NAME.to_string());
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);

    let client = Client::with_options(options)?;
    let db = client.database(&cfg.name);
    db.run_command(doc! { "ping": 1 }).await?;
    info!(database = %cfg.name, "connected to mongodb");
    Ok(db)
}
