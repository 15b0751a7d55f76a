use axum::{
    extract::{Json, State},
    routing::post,
    Extension, Router,
};
use serde_json::json;
use tracing::info;
use tripdesk_core::BookingRequest;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings", post(create_booking))
}

/// POST /v1/bookings
/// Runs the full execution pipeline and returns the booking result, merged
/// with the persisted record id when the insert succeeded.
async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let outcome = state.executor.execute(&claims.sub, req).await?;

    info!(
        user = %claims.sub,
        reference = %outcome.result.booking_reference,
        simulated = outcome.result.simulated,
        "booking executed"
    );

    let mut body = serde_json::to_value(&outcome.result)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    if let Some(id) = outcome.booking_id {
        body["bookingId"] = json!(id);
    }

    Ok(Json(body))
}
