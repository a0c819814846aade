#![cfg(test)]
use std::path::PathBuf;

use configs::DatabaseConfig;
use mongodb::Database;

/// Connect to a throwaway database on the server named by `MONGODB_TEST_URL`.
///
/// Returns `Ok(None)` when the variable is unset or `SKIP_DB_TESTS` is set,
/// so tests needing a live server return early instead of failing.
pub async fn mongo_test_db() -> Result<Option<Database>, anyhow::Error> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(None);
    }
    let Ok(url) = std::env::var("MONGODB_TEST_URL") else {
        eprintln!("MONGODB_TEST_URL missing; skip mongodb tests");
        return Ok(None);
    };
    let cfg = DatabaseConfig {
        url,
        name: format!("message_board_test_{}", uuid::Uuid::new_v4().simple()),
        ..DatabaseConfig::default()
    };
    let db = models::db::connect(&cfg).await?;
    Ok(Some(db))
}

/// Unique path under the OS temp dir for a file-backed store.
pub fn temp_store_path(prefix: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("{prefix}_{}", uuid::Uuid::new_v4()))
        .join("messages.json")
}
