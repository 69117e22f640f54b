use crate::client::CommanderClient;
use crate::tools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 protocol types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ToolContent {
    r#type: &'static str,
    text: String,
}

#[derive(Debug, Serialize)]
struct ToolCallResult {
    content: Vec<ToolContent>,
    #[serde(rename = "isError")]
    is_error: bool,
}

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

impl JsonRpcResponse {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Server loop
// ---------------------------------------------------------------------------

/// Serve MCP over stdin/stdout, one JSON-RPC message per line, until stdin closes.
pub fn run(client: &CommanderClient) -> anyhow::Result<()> {
    tracing::info!("MCP server ready on stdio");
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let tools = tools::all_tools();

    for line in stdin.lock().lines() {
        let line = line?;
        let Some(response) = respond_to_line(&line, &tools, client) else {
            continue;
        };
        let mut out = stdout.lock();
        serde_json::to_writer(&mut out, &response)?;
        writeln!(out)?;
        out.flush()?;
    }

    Ok(())
}

/// Turn one input line into a response. Blank lines and notifications
/// (messages without an `id`) get none.
fn respond_to_line(
    line: &str,
    tools: &[Box<dyn tools::DispatchTool>],
    client: &CommanderClient,
) -> Option<JsonRpcResponse> {
    if line.trim().is_empty() {
        return None;
    }

    let raw: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            return Some(JsonRpcResponse::err(
                None,
                PARSE_ERROR,
                format!("parse error: {e}"),
            ))
        }
    };

    if !raw.as_object().is_some_and(|o| o.contains_key("id")) {
        return None;
    }

    match serde_json::from_value::<JsonRpcRequest>(raw) {
        Ok(request) => Some(handle_request(&request, tools, client)),
        Err(e) => Some(JsonRpcResponse::err(
            None,
            INVALID_REQUEST,
            format!("invalid request: {e}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Request dispatch (pub for unit tests)
// ---------------------------------------------------------------------------

pub fn handle_request(
    req: &JsonRpcRequest,
    tools: &[Box<dyn tools::DispatchTool>],
    client: &CommanderClient,
) -> JsonRpcResponse {
    let id = req.id.clone();
    match req.method.as_str() {
        "initialize" => JsonRpcResponse::ok(
            id,
            serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": "dispatch",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        ),

        "tools/list" => {
            let tool_list: Vec<Value> = tools
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "name": t.name(),
                        "description": t.description(),
                        "inputSchema": t.schema()
                    })
                })
                .collect();
            JsonRpcResponse::ok(id, serde_json::json!({ "tools": tool_list }))
        }

        "tools/call" => call_tool(id, req.params.as_ref(), tools, client),

        other => JsonRpcResponse::err(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
    }
}

fn call_tool(
    id: Option<Value>,
    params: Option<&Value>,
    tools: &[Box<dyn tools::DispatchTool>],
    client: &CommanderClient,
) -> JsonRpcResponse {
    let Some(params) = params else {
        return JsonRpcResponse::err(id, INVALID_PARAMS, "missing params");
    };
    let Some(tool_name) = params["name"].as_str() else {
        return JsonRpcResponse::err(id, INVALID_PARAMS, "missing tool name in params");
    };
    let Some(tool) = tools.iter().find(|t| t.name() == tool_name) else {
        return JsonRpcResponse::err(id, METHOD_NOT_FOUND, format!("tool not found: {tool_name}"));
    };

    let args = params.get("arguments").cloned().unwrap_or(Value::Null);
    tracing::info!(tool = tool_name, "tool call");

    // Tool failures are reported in-band so the model can read them.
    let (text, is_error) = match tool.call(args, client) {
        Ok(v) => (
            serde_json::to_string_pretty(&v)
                .unwrap_or_else(|e| format!("serialization error: {e}")),
            false,
        ),
        Err(e) => {
            tracing::warn!(tool = tool_name, error = %e, "tool call failed");
            (e, true)
        }
    };

    let call_result = ToolCallResult {
        content: vec![ToolContent {
            r#type: "text",
            text,
        }],
        is_error,
    };
    let result = serde_json::to_value(&call_result)
        .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }));
    JsonRpcResponse::ok(id, result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
