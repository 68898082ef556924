//! Combines the per-feature API and view routers into the application router.

use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use crate::shared::state::AppState;

async fn health() -> &'static str {
    "ok"
}

pub fn configure_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(crate::auth::configure_auth_routes())
        .merge(crate::auth::ui::configure_auth_ui_routes())
        .merge(crate::chat::configure_chat_routes())
        .merge(crate::chat::ui::configure_chat_ui_routes())
        .merge(crate::voice::configure_voice_routes())
        .merge(crate::voice::ui::configure_voice_ui_routes())
        .merge(crate::tickets::configure_tickets_routes())
        .merge(crate::tickets::ui::configure_tickets_ui_routes())
        .merge(crate::billing::configure_billing_routes())
        .merge(crate::billing::ui::configure_billing_ui_routes())
}
