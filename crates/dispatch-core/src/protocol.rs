//! Wire types shared by the server, the commander client and the MCP tools.
//!
//! Request bodies arrive loosely typed; everything here turns them into the
//! closed set of commands the core understands before any state is touched.

use crate::error::{DispatchError, Result};
use crate::mailbox::PendingAction;
use crate::status::{StatusSnapshot, Target};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Commander requests
// ---------------------------------------------------------------------------

/// A validated request from the commander side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GoToNearest,
    GoToTarget(i64),
    GetAllTargets,
}

#[derive(Debug, Deserialize)]
struct RawCommand {
    #[serde(default)]
    action: Option<serde_json::Value>,
    #[serde(default)]
    target: Option<serde_json::Value>,
}

impl Command {
    pub const GO_TO_NEAREST: &'static str = "go_to_nearest";
    pub const GO_TO_TARGET: &'static str = "go_to_target";
    pub const GET_ALL_TARGETS: &'static str = "get_all_targets";

    /// Parse a raw request body. The content type is not consulted.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|e| DispatchError::MalformedInput(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(DispatchError::MalformedInput(format!(
                "expected a JSON object, got {value}"
            )));
        }
        let raw: RawCommand = serde_json::from_value(value)
            .map_err(|e| DispatchError::MalformedInput(e.to_string()))?;

        let action = match raw.action {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => return Err(DispatchError::UnknownActionKind(other.to_string())),
            None => return Err(DispatchError::UnknownActionKind("<missing>".into())),
        };

        match action.as_str() {
            Self::GO_TO_NEAREST => Ok(Command::GoToNearest),
            Self::GO_TO_TARGET => match raw.target {
                None | Some(serde_json::Value::Null) => Err(DispatchError::MissingTarget),
                Some(t) => integral_target(&t).map(Command::GoToTarget).ok_or_else(|| {
                    DispatchError::MalformedInput(format!("target must be an integer, got {t}"))
                }),
            },
            Self::GET_ALL_TARGETS => Ok(Command::GetAllTargets),
            _ => Err(DispatchError::UnknownActionKind(action)),
        }
    }

    /// The JSON body a client sends for this command.
    pub fn to_body(&self) -> serde_json::Value {
        match self {
            Command::GoToNearest => serde_json::json!({ "action": Self::GO_TO_NEAREST }),
            Command::GoToTarget(id) => {
                serde_json::json!({ "action": Self::GO_TO_TARGET, "target": id })
            }
            Command::GetAllTargets => serde_json::json!({ "action": Self::GET_ALL_TARGETS }),
        }
    }
}

/// A target id sent as `4` or as `4.0`. Fractional or out-of-range numbers
/// and non-numbers are rejected.
fn integral_target(value: &serde_json::Value) -> Option<i64> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    let f = value.as_f64()?;
    // i64::MAX is not exactly representable; the open upper bound excludes it.
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Driver report
// ---------------------------------------------------------------------------

/// Parse the status report the driver attaches to its long poll.
pub fn parse_report(body: &str) -> Result<StatusSnapshot> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| DispatchError::MalformedInput(e.to_string()))?;
    if !value.is_object() {
        return Err(DispatchError::MalformedInput(format!(
            "expected a JSON object, got {value}"
        )));
    }
    serde_json::from_value(value).map_err(|e| DispatchError::MalformedInput(e.to_string()))
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Go,
}

/// Long-poll answer: `{"action": null}`, `{"action": "go"}` or
/// `{"action": "go", "target": <id>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAction {
    pub action: Option<ActionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
}

impl From<Option<PendingAction>> for NextAction {
    fn from(pending: Option<PendingAction>) -> Self {
        match pending {
            None => NextAction {
                action: None,
                target: None,
            },
            Some(PendingAction::GoToNearest) => NextAction {
                action: Some(ActionKind::Go),
                target: None,
            },
            Some(PendingAction::GoToTarget { target_id }) => NextAction {
                action: Some(ActionKind::Go),
                target: Some(target_id),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAck {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetList {
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
