use std::sync::Arc;

use nexus_db::{ConversationAggregator, Database, MessageLog};

/// Shared application state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub log: MessageLog,
    pub conversations: ConversationAggregator,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            log: MessageLog::new(db.clone()),
            conversations: ConversationAggregator::new(db),
        }
    }
}
