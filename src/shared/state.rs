use crate::chat::SessionStore;
use crate::config::AppConfig;
use crate::llm::LlmProvider;
use crate::shared::utils::DbPool;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub conn: DbPool,
    pub config: AppConfig,
    pub llm: Arc<dyn LlmProvider>,
    pub chat_sessions: Arc<Mutex<SessionStore>>,
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            config: self.config.clone(),
            llm: Arc::clone(&self.llm),
            chat_sessions: Arc::clone(&self.chat_sessions),
        }
    }
}
