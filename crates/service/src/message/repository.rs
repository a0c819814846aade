use std::sync::Arc;

use configs::{DatabaseConfig, StoreBackend};
use models::Message;
use tracing::info;

use crate::errors::ServiceError;
use crate::repository::{mongo::MongoRepository, Repository};
use crate::storage::json_document_store::JsonDocumentStore;

/// Message repository as seen by the service; the backend is picked at startup.
pub type MessageRepository = dyn Repository<Message, String>;

/// Build the message repository for the configured backend.
pub async fn open(cfg: &DatabaseConfig) -> Result<Arc<MessageRepository>, ServiceError> {
    let repo: Arc<MessageRepository> = match cfg.backend {
        StoreBackend::Mongodb => {
            let db = models::db::connect(cfg).await.map_err(|e| ServiceError::Db(e.to_string()))?;
            Arc::new(MongoRepository::<Message>::new(&db))
        }
        StoreBackend::File => JsonDocumentStore::<Message>::open(&cfg.path).await?,
        StoreBackend::Memory => JsonDocumentStore::<Message>::in_memory(),
    };
    info!(backend = ?cfg.backend, "message repository ready");
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store_path;

    #[tokio::test]
    async fn opens_memory_backend() -> Result<(), anyhow::Error> {
        let cfg = DatabaseConfig { backend: StoreBackend::Memory, ..DatabaseConfig::default() };
        let repo = open(&cfg).await?;
        assert!(repo.find_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn opens_file_backend_creating_dirs() -> Result<(), anyhow::Error> {
        let path = temp_store_path("message_repository");
        let cfg = DatabaseConfig { backend: StoreBackend::File, path: path.clone(), ..DatabaseConfig::default() };
        let repo = open(&cfg).await?;
        repo.save(Message::new().with_field("text", "hi")).await?;
        assert!(tokio::fs::metadata(&path).await?.is_file());
        if let Some(dir) = path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_mongodb_is_a_db_error() {
        let cfg = DatabaseConfig {
            backend: StoreBackend::Mongodb,
            url: "mongodb://127.0.0.1:1/?directConnection=true".into(),
            connect_timeout_secs: 1,
            ..DatabaseConfig::default()
        };
        let res = open(&cfg).await;
        assert!(matches!(res, Err(ServiceError::Db(_))));
    }
}
