use std::sync::Arc;

use service::message::{MessageRepository, MessageService};

/// Shared handler state: the message service over whichever backend was opened.
#[derive(Clone)]
pub struct ServerState {
    pub messages: Arc<MessageService<MessageRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<MessageRepository>) -> Self {
        Self { messages: Arc::new(MessageService::new(repo)) }
    }
}
