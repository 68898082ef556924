pub mod ui;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::PgConnection;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_cookies::Cookies;
use uuid::Uuid;

use crate::auth::current_user;
use crate::shared::error::ServiceError;
use crate::shared::schema::monthly_billing_summary;
use crate::shared::state::AppState;

/// The trailing window the detector operates on: five historical months plus
/// the current one.
pub const ANOMALY_WINDOW: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable)]
pub struct BillingPeriod {
    pub id: Uuid,
    pub user_id: Uuid,
    pub month: String,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hike {
    pub history: [f64; 5],
    pub current: f64,
    pub mean: f64,
}

/// Flags the most recent period when it exceeds the mean of the five months
/// immediately preceding it. Fewer than six periods is a silent no-op, and a
/// tie is not an anomaly. Input must be ordered chronologically ascending.
pub fn detect_hike(amounts: &[f64]) -> Option<Hike> {
    if amounts.len() < ANOMALY_WINDOW {
        return None;
    }

    let window = &amounts[amounts.len() - ANOMALY_WINDOW..];
    let mut history = [0.0f64; 5];
    history.copy_from_slice(&window[..5]);
    let mean = history.iter().sum::<f64>() / 5.0;
    let current = window[5];

    if current > mean {
        Some(Hike {
            history,
            current,
            mean,
        })
    } else {
        None
    }
}

/// Natural-language question about the spike, amounts embedded verbatim.
pub fn hike_prompt(hike: &Hike) -> String {
    let past = hike
        .history
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Here are the past 5 months' bills: {past}, and the current month is {}. \
What could be the reason for the hike in the latest bill?",
        hike.current
    )
}

#[derive(Debug, Serialize)]
pub struct BillingSummary {
    pub periods: Vec<BillingPeriod>,
    pub hike_reason: Option<String>,
}

pub fn load_periods(
    conn: &mut PgConnection,
    user: Uuid,
) -> Result<Vec<BillingPeriod>, ServiceError> {
    monthly_billing_summary::table
        .filter(monthly_billing_summary::user_id.eq(user))
        .order(monthly_billing_summary::month.asc())
        .load(conn)
        .map_err(|e| ServiceError::Persistence(e.to_string()))
}

/// Runs the detector over a user's history and, on a flagged hike, asks the
/// model for an explanation. Model failure degrades to no explanation; the
/// summary itself still renders.
pub async fn build_summary(
    state: &AppState,
    user: Uuid,
) -> Result<BillingSummary, ServiceError> {
    let periods = {
        let mut conn = state
            .conn
            .get()
            .map_err(|e| ServiceError::Persistence(e.to_string()))?;
        load_periods(&mut conn, user)?
    };

    let amounts: Vec<f64> = periods.iter().map(|p| p.total_amount).collect();
    let hike_reason = match detect_hike(&amounts) {
        Some(hike) => {
            info!(
                "billing hike for user {user}: current {} vs trailing mean {}",
                hike.current, hike.mean
            );
            match state
                .llm
                .generate(&state.config.llm.billing_model, &hike_prompt(&hike))
                .await
            {
                Ok(text) => Some(text.trim().to_string()),
                Err(e) => {
                    warn!("hike explanation unavailable for user {user}: {e}");
                    None
                }
            }
        }
        None => None,
    };

    Ok(BillingSummary {
        periods,
        hike_reason,
    })
}

/// GET /api/billing/summary
pub async fn billing_summary(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<BillingSummary>, ServiceError> {
    let user = current_user(&cookies, &state.config.auth.jwt_secret)
        .ok_or(ServiceError::AuthenticationRequired)?;
    let summary = build_summary(&state, user).await?;
    Ok(Json(summary))
}

pub fn configure_billing_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/billing/summary", get(billing_summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_history_is_silent() {
        assert!(detect_hike(&[]).is_none());
        assert!(detect_hike(&[100.0, 100.0, 100.0, 100.0, 150.0]).is_none());
    }

    #[test]
    fn test_spike_above_trailing_mean_is_flagged() {
        let hike = detect_hike(&[100.0, 100.0, 100.0, 100.0, 100.0, 150.0]).unwrap();
        assert_eq!(hike.mean, 100.0);
        assert_eq!(hike.current, 150.0);
        assert_eq!(hike.history, [100.0; 5]);
    }

    #[test]
    fn test_tie_with_mean_is_not_anomalous() {
        assert!(detect_hike(&[100.0, 100.0, 100.0, 100.0, 100.0, 100.0]).is_none());
    }

    #[test]
    fn test_current_below_mean_is_not_anomalous() {
        assert!(detect_hike(&[120.0, 110.0, 100.0, 90.0, 80.0, 90.0]).is_none());
    }

    #[test]
    fn test_only_the_trailing_window_counts() {
        // Old expensive months outside the window must not mask the hike.
        let hike = detect_hike(&[900.0, 900.0, 100.0, 100.0, 100.0, 100.0, 100.0, 150.0]).unwrap();
        assert_eq!(hike.mean, 100.0);
        assert_eq!(hike.current, 150.0);
    }

    #[test]
    fn test_prompt_embeds_amounts_verbatim() {
        let hike = detect_hike(&[100.0, 100.0, 100.0, 100.0, 100.0, 150.0]).unwrap();
        let prompt = hike_prompt(&hike);
        assert_eq!(
            prompt,
            "Here are the past 5 months' bills: 100, 100, 100, 100, 100, \
and the current month is 150. What could be the reason for the hike in the latest bill?"
        );
    }
}
