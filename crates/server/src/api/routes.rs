use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{batch, handlers, tickets};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Tickets
        .route("/tickets", post(tickets::create_ticket))
        .route("/tickets", get(tickets::list_tickets))
        .route("/tickets/{id}", get(tickets::get_ticket))
        // Pipeline steps, independently invocable per ticket
        .route("/tickets/{id}/classify", post(tickets::classify))
        .route("/tickets/{id}/issue", post(tickets::open_issue))
        .route("/tickets/{id}/notify", post(tickets::notify))
        .route("/tickets/{id}/draft", post(tickets::draft))
        .route("/tickets/{id}/email", post(tickets::send_email))
        // Batch pipeline
        .route("/batch", post(batch::run_batch))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
}
