//! Ticket and pipeline-step handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use supportflow_core::{PipelineError, Ticket, TicketFilter};

use crate::state::AppState;

/// Maximum allowed limit for ticket queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for ticket queries
const DEFAULT_LIMIT: i64 = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a ticket
#[derive(Debug, Deserialize)]
pub struct CreateTicketBody {
    pub customer_email: String,
    pub description: String,
    /// Defaults to "Unknown" when absent.
    pub product_purchased: Option<String>,
}

/// Query parameters for listing tickets
#[derive(Debug, Deserialize)]
pub struct ListTicketsParams {
    /// Filter by status (e.g. "open", "sent")
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response for listing tickets
#[derive(Debug, Serialize)]
pub struct ListTicketsResponse {
    pub tickets: Vec<Ticket>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Map the pipeline's hard errors onto HTTP statuses. Step-level external
/// failures never land here — they ride inside 200 responses as fields.
fn pipeline_error(e: PipelineError) -> (StatusCode, Json<ErrorBody>) {
    match e {
        PipelineError::NotFound(_) => error_response(StatusCode::NOT_FOUND, e.to_string()),
        PipelineError::Storage(_) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a new ticket from a customer query
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTicketBody>,
) -> Result<(StatusCode, Json<supportflow_core::TicketCreated>), (StatusCode, Json<ErrorBody>)> {
    state
        .pipeline()
        .create_ticket(
            &body.customer_email,
            &body.description,
            body.product_purchased.as_deref(),
        )
        .await
        .map(|created| (StatusCode::CREATED, Json(created)))
        .map_err(pipeline_error)
}

/// Get a ticket by id
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Ticket>, (StatusCode, Json<ErrorBody>)> {
    match state.ticket_store().get(id) {
        Ok(Some(ticket)) => Ok(Json(ticket)),
        Ok(None) => Err(error_response(
            StatusCode::NOT_FOUND,
            format!("Ticket not found: {}", id),
        )),
        Err(e) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            e.to_string(),
        )),
    }
}

/// List tickets
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTicketsParams>,
) -> Result<Json<ListTicketsResponse>, (StatusCode, Json<ErrorBody>)> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut filter = TicketFilter::new().with_limit(limit).with_offset(offset);
    if let Some(status) = params.status {
        filter = filter.with_status(status);
    }

    let tickets = state
        .ticket_store()
        .list(&filter)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let total = state
        .ticket_store()
        .count(&filter)
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(ListTicketsResponse {
        tickets,
        total,
        limit,
        offset,
    }))
}

/// Classify the ticket description
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<supportflow_core::Classification>, (StatusCode, Json<ErrorBody>)> {
    state
        .pipeline()
        .classify(id)
        .await
        .map(Json)
        .map_err(pipeline_error)
}

/// Open a tracker issue for the ticket
pub async fn open_issue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<supportflow_core::IssueOpened>, (StatusCode, Json<ErrorBody>)> {
    state
        .pipeline()
        .open_issue(id)
        .await
        .map(Json)
        .map_err(pipeline_error)
}

/// Post the ticket alert to the team channel
pub async fn notify(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<supportflow_core::NotificationResult>, (StatusCode, Json<ErrorBody>)> {
    state
        .pipeline()
        .notify(id)
        .await
        .map(Json)
        .map_err(pipeline_error)
}

/// Draft the reply email
pub async fn draft(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<supportflow_core::DraftResult>, (StatusCode, Json<ErrorBody>)> {
    state
        .pipeline()
        .draft(id)
        .await
        .map(Json)
        .map_err(pipeline_error)
}

/// Send the reply email
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<supportflow_core::SendResult>, (StatusCode, Json<ErrorBody>)> {
    state
        .pipeline()
        .send_email(id)
        .await
        .map(Json)
        .map_err(pipeline_error)
}
