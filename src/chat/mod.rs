pub mod ui;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::auth::current_user;
use crate::extract::parse_chat_reply;
use crate::shared::error::ServiceError;
use crate::shared::state::AppState;
use crate::tickets::{build_ticket, insert_ticket};

/// Instruction prologue sent ahead of the accumulated context on every turn.
/// The labelled format is what [`parse_chat_reply`] looks for.
pub const CHAT_PROMPT_PROLOGUE: &str = "\
You are a support assistant. Your job is to gather enough information from the user about their complaint.
Once enough info is collected, respond in this format ONLY:

SUBJECT: <short title>
DESCRIPTION: <detailed explanation>
PRIORITY: <high | medium | low>
CHURN RISK: <high | medium | low>
ETA: <number of hours>
RESPONSE: An agent will be assigned to you shortly.";

/// One chat session's transcript. Append-only and monotonically growing;
/// never pruned or summarized, which is an accepted limitation for long
/// conversations.
#[derive(Debug, Default)]
pub struct ChatSession {
    context: String,
}

impl ChatSession {
    pub fn append_user(&mut self, text: &str) {
        self.context.push_str("User: ");
        self.context.push_str(text);
        self.context.push('\n');
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn prompt(&self) -> String {
        format!("{CHAT_PROMPT_PROLOGUE}\n\nContext so far:\n{}", self.context)
    }
}

/// In-memory store of live chat sessions. Each context is owned by exactly
/// one session; the store lock only guards the map itself.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, ChatSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, session_id: Option<Uuid>) -> (Uuid, &mut ChatSession) {
        let id = session_id.unwrap_or_else(Uuid::new_v4);
        (id, self.sessions.entry(id).or_default())
    }

    pub fn end_session(&mut self, session_id: &Uuid) {
        self.sessions.remove(session_id);
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
}

impl ChatMessage {
    fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: "Bot".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TicketReceipt {
    pub id: Uuid,
    pub priority: String,
    pub churn_risk: String,
    pub eta_hours: i32,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub ticket: Option<TicketReceipt>,
    pub error: Option<String>,
}

/// POST /api/chat/messages
///
/// One turn: append the utterance to the session context, ask the model,
/// display the raw reply, then independently try to extract a ticket from
/// that same reply. The reply is shown whether or not it parses.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServiceError> {
    let message = req.message.trim();

    let (session_id, prompt) = {
        let mut store = state.chat_sessions.lock().await;
        let (id, session) = store.get_or_create(req.session_id);
        if message.is_empty() {
            return Ok(Json(ChatResponse {
                session_id: id,
                messages: Vec::new(),
                ticket: None,
                error: None,
            }));
        }
        session.append_user(message);
        (id, session.prompt())
    };

    let reply = match state
        .llm
        .generate(&state.config.llm.chat_model, &prompt)
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            error!("chat generation failed for session {session_id}: {e}");
            return Ok(Json(ChatResponse {
                session_id,
                messages: vec![ChatMessage::bot("Error while processing your request.")],
                ticket: None,
                error: None,
            }));
        }
    };

    let mut messages = vec![ChatMessage::bot(reply.clone())];
    let mut receipt = None;
    let mut user_error = None;

    if let Some(fields) = parse_chat_reply(&reply) {
        let customer = current_user(&cookies, &state.config.auth.jwt_secret);
        match build_ticket(customer, fields) {
            Ok(ticket) => {
                let mut conn = state
                    .conn
                    .get()
                    .map_err(|e| ServiceError::Persistence(e.to_string()))?;
                match insert_ticket(&mut conn, &ticket) {
                    Ok(()) => {
                        info!("ticket {} created from chat session {session_id}", ticket.id);
                        messages.push(ChatMessage::bot(format!(
                            "Ticket Created\nPriority: {}\nChurn Risk: {}\nETA: {} hrs.",
                            ticket.priority, ticket.churn_risk, ticket.eta_hours
                        )));
                        receipt = Some(TicketReceipt {
                            id: ticket.id,
                            priority: ticket.priority,
                            churn_risk: ticket.churn_risk,
                            eta_hours: ticket.eta_hours,
                        });
                    }
                    Err(ServiceError::Persistence(msg)) => {
                        warn!("ticket insert failed for session {session_id}: {msg}");
                        messages.push(ChatMessage::bot(format!("Failed to create ticket: {msg}")));
                    }
                    Err(e) => return Err(e),
                }
            }
            Err(ServiceError::AuthenticationRequired) => {
                // The reply stays visible; the alert rides alongside it.
                user_error = Some("You must be logged in to submit a ticket.".to_string());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Json(ChatResponse {
        session_id,
        messages,
        ticket: receipt,
        error: user_error,
    }))
}

pub fn configure_chat_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/chat/messages", post(send_message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_accumulates_turns() {
        let mut session = ChatSession::default();
        session.append_user("my invoice is wrong");
        session.append_user("it doubled since May");
        assert_eq!(
            session.context(),
            "User: my invoice is wrong\nUser: it doubled since May\n"
        );
    }

    #[test]
    fn test_prompt_carries_prologue_and_context() {
        let mut session = ChatSession::default();
        session.append_user("hello");
        let prompt = session.prompt();
        assert!(prompt.starts_with("You are a support assistant."));
        assert!(prompt.contains("SUBJECT: <short title>"));
        assert!(prompt.ends_with("Context so far:\nUser: hello\n"));
    }

    #[test]
    fn test_store_reuses_session_by_id() {
        let mut store = SessionStore::new();
        let (id, session) = store.get_or_create(None);
        session.append_user("first");
        let (same_id, session) = store.get_or_create(Some(id));
        assert_eq!(id, same_id);
        assert_eq!(session.context(), "User: first\n");
    }

    #[test]
    fn test_store_drops_context_when_session_ends() {
        let mut store = SessionStore::new();
        let (id, session) = store.get_or_create(None);
        session.append_user("ephemeral");
        store.end_session(&id);
        let (_, session) = store.get_or_create(Some(id));
        assert_eq!(session.context(), "");
    }
}
