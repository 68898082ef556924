pub mod ui;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::PgConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::extract::ParsedFields;
use crate::shared::error::ServiceError;
use crate::shared::schema::{agents, tickets};
use crate::shared::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Insertable)]
#[diesel(table_name = tickets)]
pub struct Ticket {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub subject: String,
    pub description: String,
    pub priority: String,
    pub churn_risk: String,
    pub eta_hours: i32,
    pub status: String,
    pub assigned_agent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TicketListEntry {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub agent_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub priority: Option<String>,
}

/// Validated fields plus a known customer become a persistable ticket.
/// A missing customer identity fails before any write is attempted.
pub fn build_ticket(
    customer: Option<Uuid>,
    fields: ParsedFields,
) -> Result<Ticket, ServiceError> {
    let customer_id = customer.ok_or(ServiceError::AuthenticationRequired)?;

    Ok(Ticket {
        id: Uuid::new_v4(),
        customer_id,
        subject: fields.subject,
        description: fields.description,
        priority: fields.priority.as_str().to_string(),
        churn_risk: fields.churn_risk.as_str().to_string(),
        eta_hours: fields.eta_hours,
        status: "pending".to_string(),
        assigned_agent_id: None,
        created_at: Utc::now(),
    })
}

/// Exactly one insert attempt; the collaborator's message is surfaced, the
/// write is never retried.
pub fn insert_ticket(conn: &mut PgConnection, ticket: &Ticket) -> Result<(), ServiceError> {
    diesel::insert_into(tickets::table)
        .values(ticket)
        .execute(conn)
        .map_err(|e| ServiceError::Persistence(e.to_string()))?;
    Ok(())
}

pub fn load_tickets(
    conn: &mut PgConnection,
    priority: Option<&str>,
) -> Result<Vec<TicketListEntry>, ServiceError> {
    let mut query = tickets::table
        .left_join(agents::table)
        .select((tickets::all_columns, agents::name.nullable()))
        .into_boxed();

    if let Some(priority) = priority.filter(|p| !p.is_empty()) {
        query = query.filter(tickets::priority.eq(priority.to_string()));
    }

    let rows: Vec<(Ticket, Option<String>)> = query
        .order(tickets::created_at.desc())
        .load(conn)
        .map_err(|e| ServiceError::Persistence(e.to_string()))?;

    Ok(rows
        .into_iter()
        .map(|(ticket, agent_name)| TicketListEntry { ticket, agent_name })
        .collect())
}

/// GET /api/tickets?priority=high|medium|low
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<TicketListEntry>>, ServiceError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ServiceError::Persistence(e.to_string()))?;

    let entries = load_tickets(&mut conn, query.priority.as_deref())?;
    Ok(Json(entries))
}

pub fn configure_tickets_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/tickets", get(list_tickets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Severity;

    fn sample_fields() -> ParsedFields {
        ParsedFields {
            subject: "Slow dashboard".to_string(),
            description: "Loading takes over a minute.".to_string(),
            priority: Severity::High,
            churn_risk: Severity::Low,
            eta_hours: 8,
        }
    }

    #[test]
    fn test_build_ticket_requires_customer() {
        let err = build_ticket(None, sample_fields()).unwrap_err();
        assert!(matches!(err, ServiceError::AuthenticationRequired));
    }

    #[test]
    fn test_build_ticket_is_pending_and_unassigned() {
        let customer = Uuid::new_v4();
        let ticket = build_ticket(Some(customer), sample_fields()).unwrap();
        assert_eq!(ticket.customer_id, customer);
        assert_eq!(ticket.status, "pending");
        assert_eq!(ticket.assigned_agent_id, None);
        assert_eq!(ticket.priority, "high");
        assert_eq!(ticket.churn_risk, "low");
        assert_eq!(ticket.eta_hours, 8);
        assert_eq!(ticket.subject, "Slow dashboard");
    }
}
