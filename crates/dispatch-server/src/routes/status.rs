use axum::extract::State;
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/status — the latest driver report, as received, plus when it arrived
/// and whether a command is still waiting for the driver.
pub async fn get_status(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.dispatch.status();
    let snapshot = store.latest();
    Ok(Json(serde_json::json!({
        "reported_at": store.reported_at(),
        "status": serde_json::to_value(snapshot.as_ref())?,
        "pending_action": app.dispatch.mailbox().is_filled(),
    })))
}
