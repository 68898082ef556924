use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_cookies::Cookies;

use crate::auth::current_user;
use crate::billing::{build_summary, BillingPeriod, BillingSummary};
use crate::shared::error::ServiceError;
use crate::shared::state::AppState;
use crate::shared::utils::{html_escape, render_page};

fn render_chart(periods: &[BillingPeriod]) -> String {
    if periods.is_empty() {
        return "<p>No billing history yet.</p>".to_string();
    }

    let max = periods
        .iter()
        .map(|p| p.total_amount)
        .fold(f64::MIN, f64::max)
        .max(1.0);

    let bars: String = periods
        .iter()
        .map(|p| {
            let height = (p.total_amount / max * 100.0).round() as i64;
            format!(
                "<div style=\"flex:1;text-align:center\">\
<div style=\"height:200px;display:flex;align-items:flex-end\">\
<div style=\"width:100%;background:#82ca9d;height:{height}%\" title=\"{amount}\"></div>\
</div>\
<small>{month}</small>\
</div>",
                amount = p.total_amount,
                month = html_escape(&p.month),
            )
        })
        .collect();

    format!(
        "<div class=\"card\"><div style=\"display:flex;gap:6px;align-items:flex-end\">{bars}</div></div>"
    )
}

fn render_summary(summary: &BillingSummary) -> String {
    let callout = summary
        .hike_reason
        .as_deref()
        .map(|reason| {
            format!(
                "<div class=\"callout\"><h4>Hike Detected</h4>{}</div>",
                html_escape(reason)
            )
        })
        .unwrap_or_default();

    format!(
        "<h2>Monthly Bill Summary</h2>{}{callout}",
        render_chart(&summary.periods)
    )
}

/// GET /billing
pub async fn billing_page(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Html<String>, ServiceError> {
    let user = current_user(&cookies, &state.config.auth.jwt_secret)
        .ok_or(ServiceError::AuthenticationRequired)?;
    let summary = build_summary(&state, user).await?;
    Ok(Html(render_page(
        "Monthly Bill Summary",
        &render_summary(&summary),
    )))
}

pub fn configure_billing_ui_routes() -> Router<Arc<AppState>> {
    Router::new().route("/billing", get(billing_page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn period(month: &str, amount: f64) -> BillingPeriod {
        BillingPeriod {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            month: month.to_string(),
            total_amount: amount,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_chart_scales_to_largest_month() {
        let html = render_chart(&[period("2026-01", 50.0), period("2026-02", 100.0)]);
        assert!(html.contains("height:50%"));
        assert!(html.contains("height:100%"));
        assert!(html.contains("2026-02"));
    }

    #[test]
    fn test_summary_without_hike_has_no_callout() {
        let summary = BillingSummary {
            periods: vec![period("2026-01", 50.0)],
            hike_reason: None,
        };
        assert!(!render_summary(&summary).contains("Hike Detected"));
    }

    #[test]
    fn test_summary_with_hike_escapes_model_text() {
        let summary = BillingSummary {
            periods: Vec::new(),
            hike_reason: Some("<script>Usage grew</script>".to_string()),
        };
        let html = render_summary(&summary);
        assert!(html.contains("Hike Detected"));
        assert!(html.contains("&lt;script&gt;Usage grew&lt;/script&gt;"));
    }
}
