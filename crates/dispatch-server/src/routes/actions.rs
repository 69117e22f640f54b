use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use dispatch_core::protocol::{self, Command, NextAction, SubmitAck, TargetList};
use dispatch_core::CommandOutcome;

use crate::error::AppError;
use crate::state::AppState;

/// POST /api/set_next_action — commander submits an action or lists targets.
///
/// The body is parsed as JSON whatever the declared content type.
pub async fn set_next_action(
    State(app): State<AppState>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, AppError> {
    let command = Command::parse(&body)?;
    let result = match app.dispatch.execute(command)? {
        CommandOutcome::Submitted(action) => {
            tracing::info!(?action, "next action set");
            serde_json::to_value(SubmitAck { success: true })?
        }
        CommandOutcome::Targets(targets) => serde_json::to_value(TargetList { targets })?,
    };
    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct PollQuery {
    #[serde(default)]
    pub body: Option<String>,
}

/// GET /api/get_next_action?body=<status json> — driver long poll.
///
/// Stores the attached status report, then holds the request open until a
/// command arrives or the poll window closes.
pub async fn get_next_action(
    State(app): State<AppState>,
    Query(query): Query<PollQuery>,
) -> Result<Json<NextAction>, AppError> {
    let raw = query
        .body
        .ok_or_else(|| AppError::bad_request("missing body parameter"))?;
    let snapshot = protocol::parse_report(&raw)?;

    let dispatch = app.dispatch.clone();
    let timeout = app.poll_timeout;
    let pending = tokio::task::spawn_blocking(move || dispatch.report_and_wait(snapshot, timeout))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?;

    Ok(Json(NextAction::from(pending)))
}
