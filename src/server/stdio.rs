use anyhow::Result;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::mcp::{protocol::*, resources, session::Session, tools};

/// Run the MCP server over stdio (stdin/stdout). Returns when stdin closes.
pub async fn run(session: Session) -> Result<()> {
    let stdin = BufReader::new(io::stdin());
    let mut stdout = io::stdout();
    let mut lines = stdin.lines();

    tracing::info!("fieldsmith stdio transport ready");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        tracing::debug!("← {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                let resp = JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {e}"));
                send(&mut stdout, &resp).await?;
                continue;
            }
        };

        let response = handle_request(&session, &request);

        // Notifications (no id) don't get a response
        if request.id.is_some() {
            send(&mut stdout, &response).await?;
        }
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}

pub fn handle_request(session: &Session, req: &JsonRpcRequest) -> JsonRpcResponse {
    let id = req.id.clone();

    match req.method.as_str() {
        // ── Lifecycle ──────────────────────────────────────────────
        "initialize" => JsonRpcResponse::from_result(
            id,
            &InitializeResult {
                protocol_version: "2025-03-26".into(),
                capabilities: ServerCapabilities {
                    tools: Some(ToolsCapability {}),
                    resources: Some(ResourcesCapability {}),
                },
                server_info: ServerInfo {
                    name: "fieldsmith".into(),
                    version: env!("CARGO_PKG_VERSION").into(),
                },
            },
        ),

        "notifications/initialized" | "initialized" => JsonRpcResponse::success(id, json!({})),

        // ── Tools ──────────────────────────────────────────────────
        "tools/list" => JsonRpcResponse::from_result(
            id,
            &ToolsListResult {
                tools: tools::list_tools(),
            },
        ),

        "tools/call" => match params::<ToolCallParams>(req) {
            Ok(params) => JsonRpcResponse::from_result(
                id,
                &tools::call_tool(session, &params.name, &params.arguments),
            ),
            Err(resp) => resp,
        },

        // ── Resources ──────────────────────────────────────────────
        "resources/list" => JsonRpcResponse::from_result(
            id,
            &ResourcesListResult {
                resources: resources::list_resources(session),
            },
        ),

        "resources/read" => match params::<ResourceReadParams>(req) {
            Ok(params) => {
                JsonRpcResponse::from_result(id, &resources::read_resource(session, &params.uri))
            }
            Err(resp) => resp,
        },

        "ping" => JsonRpcResponse::success(id, json!({})),

        method => JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {method}")),
    }
}

/// Decodes the request params, or the error response to send instead.
fn params<T: DeserializeOwned>(req: &JsonRpcRequest) -> std::result::Result<T, JsonRpcResponse> {
    let Some(raw) = req.params.as_ref() else {
        return Err(JsonRpcResponse::error(req.id.clone(), INVALID_PARAMS, "Missing params"));
    };
    serde_json::from_value(raw.clone()).map_err(|e| {
        JsonRpcResponse::error(req.id.clone(), INVALID_PARAMS, format!("Invalid params: {e}"))
    })
}

async fn send(stdout: &mut io::Stdout, resp: &JsonRpcResponse) -> Result<()> {
    let json = serde_json::to_string(resp)?;
    tracing::debug!("→ {}", json);
    stdout.write_all(json.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
