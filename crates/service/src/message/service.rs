use std::sync::Arc;

use models::Message;
use tracing::instrument;

use crate::errors::ServiceError;
use crate::repository::Repository;

/// Application service for the message board. Hands every call straight to
/// the repository; results and errors come back untouched.
pub struct MessageService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R> MessageService<R>
where
    R: Repository<Message, String> + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// All stored messages, in store order.
    ///
    /// # Examples
    /// ```
    /// use service::message::MessageService;
    /// use service::storage::json_document_store::JsonDocumentStore;
    /// use models::Message;
    /// let svc = MessageService::new(JsonDocumentStore::<Message>::in_memory());
    /// let saved = tokio_test::block_on(svc.save_message(Message::new().with_field("text", "hi"))).unwrap();
    /// let all = tokio_test::block_on(svc.get_all_messages()).unwrap();
    /// assert_eq!(all, vec![saved]);
    /// ```
    #[instrument(skip(self))]
    pub async fn get_all_messages(&self) -> Result<Vec<Message>, ServiceError> {
        self.repo.find_all().await
    }

    #[instrument(skip(self, message), fields(id = ?message.id))]
    pub async fn save_message(&self, message: Message) -> Result<Message, ServiceError> {
        self.repo.save(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::storage::json_document_store::JsonDocumentStore;

    /// Records calls and fails on demand.
    #[derive(Default)]
    struct RecordingRepo {
        saved: Mutex<Vec<Message>>,
        fail: bool,
    }

    #[async_trait]
    impl Repository<Message, String> for RecordingRepo {
        async fn find_all(&self) -> Result<Vec<Message>, ServiceError> {
            if self.fail {
                return Err(ServiceError::Db("connection refused".into()));
            }
            Ok(self.saved.lock().map_err(|e| ServiceError::Db(e.to_string()))?.clone())
        }

        async fn save(&self, entity: Message) -> Result<Message, ServiceError> {
            if self.fail {
                return Err(ServiceError::Db("connection refused".into()));
            }
            self.saved.lock().map_err(|e| ServiceError::Db(e.to_string()))?.push(entity.clone());
            Ok(entity)
        }
    }

    #[tokio::test]
    async fn save_passes_message_through_unchanged() -> Result<(), anyhow::Error> {
        let repo = Arc::new(RecordingRepo::default());
        let svc = MessageService::new(Arc::clone(&repo));
        let m = Message::new().with_field("sender", "ana").with_field("text", "  spaced  ");

        let out = svc.save_message(m.clone()).await?;
        assert_eq!(out, m);
        assert_eq!(repo.saved.lock().map_err(|e| anyhow::anyhow!(e.to_string()))?.as_slice(), &[m]);
        Ok(())
    }

    #[tokio::test]
    async fn errors_propagate_untranslated() {
        let svc = MessageService::new(Arc::new(RecordingRepo { fail: true, ..Default::default() }));
        assert!(matches!(svc.get_all_messages().await, Err(ServiceError::Db(msg)) if msg == "connection refused"));
        assert!(matches!(svc.save_message(Message::new()).await, Err(ServiceError::Db(_))));
    }

    #[tokio::test]
    async fn works_through_a_trait_object() -> Result<(), anyhow::Error> {
        let repo: Arc<crate::message::MessageRepository> = JsonDocumentStore::<Message>::in_memory();
        let svc = MessageService::new(repo);

        let saved = svc.save_message(Message::new().with_field("content", "hello")).await?;
        assert!(saved.id.is_some());
        assert_eq!(saved.field("content"), Some(&json!("hello")));

        let all = svc.get_all_messages().await?;
        assert_eq!(all, vec![saved]);
        Ok(())
    }
}
