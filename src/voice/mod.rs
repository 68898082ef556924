pub mod ui;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::auth::current_user;
use crate::extract::{parse_voice_reply, voice_fallback, ParsedFields};
use crate::llm::LlmProvider;
use crate::shared::error::ServiceError;
use crate::shared::state::AppState;
use crate::tickets::{build_ticket, insert_ticket};

pub fn classification_prompt(complaint: &str) -> String {
    format!(
        "Rephrase the following user's complaint into a Subject and a Description, \
classify its Priority as high, medium, or low, estimate Churn Risk as high, medium, or low, \
and provide an ETA in hours. Respond in this format:

Subject: <short title>
Description: <detailed explanation>
Priority: <high | medium | low>
Churn Risk: <high | medium | low>
ETA: <number of hours>

Complaint:
{complaint}"
    )
}

/// Classifies a transcribed complaint. A reply that does not match the voice
/// schema, or a model failure, falls back to defaults with the complaint
/// text kept verbatim as the description.
pub async fn classify_complaint(
    llm: &dyn LlmProvider,
    model: &str,
    complaint: &str,
) -> ParsedFields {
    let prompt = classification_prompt(complaint);
    match llm.generate(model, &prompt).await {
        Ok(reply) => {
            parse_voice_reply(reply.trim()).unwrap_or_else(|| voice_fallback(complaint))
        }
        Err(e) => {
            warn!("voice classification unavailable, using fallback defaults: {e}");
            voice_fallback(complaint)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VoiceComplaintRequest {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceComplaintResponse {
    pub ticket_id: Uuid,
    #[serde(flatten)]
    pub fields: ParsedFields,
}

/// POST /api/voice/complaints
pub async fn submit_complaint(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<VoiceComplaintRequest>,
) -> Result<Json<VoiceComplaintResponse>, ServiceError> {
    let fields = classify_complaint(
        state.llm.as_ref(),
        &state.config.llm.chat_model,
        req.transcript.trim(),
    )
    .await;

    let customer = current_user(&cookies, &state.config.auth.jwt_secret);
    let ticket = build_ticket(customer, fields.clone())?;

    let mut conn = state
        .conn
        .get()
        .map_err(|e| ServiceError::Persistence(e.to_string()))?;
    insert_ticket(&mut conn, &ticket)?;

    info!("ticket {} created from voice complaint", ticket.id);
    Ok(Json(VoiceComplaintResponse {
        ticket_id: ticket.id,
        fields,
    }))
}

pub fn configure_voice_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/voice/complaints", post(submit_complaint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Severity;
    use crate::llm::LlmError;
    use async_trait::async_trait;

    struct FixedReply(Result<String, ()>);

    #[async_trait]
    impl LlmProvider for FixedReply {
        async fn generate(&self, _model: &str, _prompt: &str) -> Result<String, LlmError> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(LlmError::BadResponse("no response field".to_string())),
            }
        }
    }

    #[test]
    fn test_classification_prompt_embeds_complaint() {
        let prompt = classification_prompt("the app keeps logging me out");
        assert!(prompt.contains("Complaint:\nthe app keeps logging me out"));
        assert!(prompt.contains("Subject: <short title>"));
    }

    #[tokio::test]
    async fn test_matching_reply_wins_over_fallback() {
        let llm = FixedReply(Ok(
            "Subject: Session drops\nDescription: App logs out hourly.\nPriority: high\nChurn Risk: low\nETA: 6"
                .to_string(),
        ));
        let fields = classify_complaint(&llm, "mistral", "the app keeps logging me out").await;
        assert_eq!(fields.subject, "Session drops");
        assert_eq!(fields.priority, Severity::High);
        assert_eq!(fields.eta_hours, 6);
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back_with_verbatim_description() {
        let llm = FixedReply(Ok("I could not quite structure that, sorry.".to_string()));
        let fields = classify_complaint(&llm, "mistral", "my exports are empty").await;
        assert_eq!(fields.subject, "Voice Complaint");
        assert_eq!(fields.description, "my exports are empty");
        assert_eq!(fields.priority, Severity::Medium);
        assert_eq!(fields.churn_risk, Severity::Medium);
        assert_eq!(fields.eta_hours, 24);
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let llm = FixedReply(Err(()));
        let fields = classify_complaint(&llm, "mistral", "billing page 500s").await;
        assert_eq!(fields.subject, "Voice Complaint");
        assert_eq!(fields.description, "billing page 500s");
    }
}
