use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// MCP tool server that drives a running taskboard through its REST API.
#[derive(Clone)]
pub struct TaskboardMcp {
    client: reqwest::Client,
    base_url: String,
    tool_router: ToolRouter<Self>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct BoardInput {
    /// Action: "list" (default), "create", "get", or "delete"
    #[serde(default = "default_list")]
    action: String,
    /// Board name (required for "create")
    name: Option<String>,
    /// Board ID (required for "get" and "delete")
    board_id: Option<String>,
}

fn default_list() -> String {
    "list".to_string()
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct CreateCardInput {
    board_id: String,
    title: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct GetCardInput {
    card_id: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
struct CardActionInput {
    card_id: String,
    /// Action: "move", "cancel", "block", or "unblock"
    action: String,
    /// Reason (required for "block" and "unblock")
    reason: Option<String>,
}

#[tool_router]
impl TaskboardMcp {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            tool_router: Self::tool_router(),
        }
    }

    fn api_err(msg: String) -> McpError {
        McpError::internal_error(msg, None)
    }

    fn json_result(value: &serde_json::Value) -> Result<CallToolResult, McpError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    async fn read_response(
        path: &str,
        resp: reqwest::Response,
    ) -> Result<serde_json::Value, McpError> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(McpError::internal_error(
                format!("API error {} on {}: {}", status, path, body),
                None,
            ));
        }
        let text = resp.text().await.unwrap_or_default();
        if text.is_empty() {
            return Ok(json!({"ok": true}));
        }
        serde_json::from_str(&text).map_err(|e| Self::api_err(format!("JSON decode: {}", e)))
    }

    async fn get(&self, path: &str) -> Result<serde_json::Value, McpError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::api_err(format!("HTTP GET {}: {}", path, e)))?;
        Self::read_response(path, resp).await
    }

    async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, McpError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| Self::api_err(format!("HTTP POST {}: {}", path, e)))?;
        Self::read_response(path, resp).await
    }

    async fn delete(&self, path: &str) -> Result<serde_json::Value, McpError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| Self::api_err(format!("HTTP DELETE {}: {}", path, e)))?;
        Self::read_response(path, resp).await
    }

    #[tool(
        description = "Manage boards. Actions: \"list\" (default), \"create\" (requires name; the board gets the fixed columns Inicial, Pendente, Final, Cancelado), \"get\" (requires board_id; returns columns with their cards), \"delete\" (requires board_id; removes its columns and cards too)."
    )]
    async fn taskboard_board(
        &self,
        Parameters(input): Parameters<BoardInput>,
    ) -> Result<CallToolResult, McpError> {
        match input.action.as_str() {
            "list" => {
                let data = self.get("/api/boards").await?;
                Self::json_result(&data)
            }
            "create" => {
                let name = input.name.ok_or_else(|| {
                    McpError::internal_error("name is required for action 'create'", None)
                })?;
                let data = self.post("/api/boards", &json!({"name": name})).await?;
                Self::json_result(&data)
            }
            "get" | "delete" => {
                let board_id = input.board_id.ok_or_else(|| {
                    McpError::internal_error(
                        format!("board_id is required for action '{}'", input.action),
                        None,
                    )
                })?;
                let path = format!("/api/boards/{}", board_id);
                let data = if input.action == "get" {
                    self.get(&path).await?
                } else {
                    self.delete(&path).await?
                };
                Self::json_result(&data)
            }
            other => Err(McpError::internal_error(
                format!("Unknown action '{}'. Valid: list, create, get, delete", other),
                None,
            )),
        }
    }

    #[tool(
        description = "Create a card in the INITIAL column of a board. Returns the created card with its column."
    )]
    async fn taskboard_create_card(
        &self,
        Parameters(input): Parameters<CreateCardInput>,
    ) -> Result<CallToolResult, McpError> {
        let body = json!({
            "board_id": input.board_id,
            "title": input.title,
            "description": input.description,
        });
        let data = self.post("/api/cards", &body).await?;
        Self::json_result(&data)
    }

    #[tool(description = "Get one card, including its column, blocked flag and last block/unblock reasons.")]
    async fn taskboard_get_card(
        &self,
        Parameters(input): Parameters<GetCardInput>,
    ) -> Result<CallToolResult, McpError> {
        let data = self.get(&format!("/api/cards/{}", input.card_id)).await?;
        Self::json_result(&data)
    }

    #[tool(
        description = "Apply a lifecycle action to a card. \"move\" advances to the next column (fails when blocked, in FINAL, or when the next column is CANCELED). \"cancel\" sends it to CANCELED unless it is in FINAL. \"block\" and \"unblock\" require a reason."
    )]
    async fn taskboard_card_action(
        &self,
        Parameters(input): Parameters<CardActionInput>,
    ) -> Result<CallToolResult, McpError> {
        let body = match input.action.as_str() {
            "move" | "cancel" => json!({}),
            "block" | "unblock" => json!({"reason": input.reason}),
            other => {
                return Err(McpError::internal_error(
                    format!("Unknown action '{}'. Valid: move, cancel, block, unblock", other),
                    None,
                ));
            }
        };
        let data = self
            .post(&format!("/api/cards/{}/{}", input.card_id, input.action), &body)
            .await?;
        Self::json_result(&data)
    }
}

#[tool_handler]
impl ServerHandler for TaskboardMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Task board tools. Proxies to the taskboard REST API for all operations.".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
