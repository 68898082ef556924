use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::shared::error::ServiceError;
use crate::shared::state::AppState;
use crate::shared::utils::{html_escape, render_page};
use crate::tickets::{load_tickets, ListQuery, TicketListEntry};

fn severity_badge(label: &str, value: &str) -> String {
    let class = match value {
        "high" => "badge-danger",
        "medium" => "badge-warning",
        "low" => "badge-success",
        _ => "badge-muted",
    };
    format!(
        "<span class=\"badge {class}\">{label}: {}</span>",
        html_escape(value)
    )
}

fn render_ticket_card(entry: &TicketListEntry) -> String {
    let ticket = &entry.ticket;
    let agent = entry
        .agent_name
        .as_deref()
        .map(|name| {
            format!(
                "<span class=\"badge badge-muted\">Assigned Agent: {}</span>",
                html_escape(name)
            )
        })
        .unwrap_or_default();

    format!(
        "<div class=\"card\">\
<h4>{subject}</h4>\
<p>{description}</p>\
<p>Status: <strong>{status}</strong></p>\
{priority}{churn}\
<span class=\"badge badge-info\">ETA: {eta} hours</span>\
{agent}\
</div>",
        subject = html_escape(&ticket.subject),
        description = html_escape(&ticket.description),
        status = html_escape(&ticket.status),
        priority = severity_badge("Priority", &ticket.priority),
        churn = severity_badge("Churn Risk", &ticket.churn_risk),
        eta = ticket.eta_hours,
        agent = agent,
    )
}

fn render_filter(selected: &str) -> String {
    let option = |value: &str, label: &str| {
        let mark = if value == selected { " selected" } else { "" };
        format!("<option value=\"{value}\"{mark}>{label}</option>")
    };
    format!(
        "<form method=\"get\" action=\"/tickets\">\
<label for=\"priority-filter\">Filter by Priority:</label>\
<select id=\"priority-filter\" name=\"priority\" onchange=\"this.form.submit()\">\
{}{}{}{}\
</select>\
</form>",
        option("", "All"),
        option("high", "High"),
        option("medium", "Medium"),
        option("low", "Low"),
    )
}

/// GET /tickets?priority=
pub async fn tickets_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, ServiceError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ServiceError::Persistence(e.to_string()))?;

    let priority = query.priority.as_deref().unwrap_or("");
    let entries = load_tickets(&mut conn, query.priority.as_deref())?;

    let list = if entries.is_empty() {
        "<p>No tickets found.</p>".to_string()
    } else {
        entries.iter().map(render_ticket_card).collect::<String>()
    };

    let body = format!(
        "<h2>All Tickets</h2>{}{list}",
        render_filter(priority)
    );
    Ok(Html(render_page("All Tickets", &body)))
}

pub fn configure_tickets_ui_routes() -> Router<Arc<AppState>> {
    Router::new().route("/tickets", get(tickets_page))
}
