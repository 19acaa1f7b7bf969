//! HTTP transport implementation.
//!
//! One axum router serves every HTTP surface of the server:
//! - `GET {sse_path}` opens an SSE session stream
//! - `POST {message_path}?sessionId=<id>` submits a JSON-RPC message whose
//!   response is pushed on that session's stream
//! - `POST {rpc_path}` answers JSON-RPC directly in the response body
//! - `GET /health` and `GET /` for liveness and discovery

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    response::{
        IntoResponse, Response,
        sse::{KeepAlive, Sse},
    },
    routing::{get, post},
};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::adapter::TransportAdapter;
use super::jsonrpc::JsonRpcRequest;
use super::sse::{SessionRegistry, session_stream};
use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;

/// Header accepted as a fallback for the `sessionId` query parameter.
pub const SESSION_HEADER: &str = "x-session-id";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    adapter: TransportAdapter,
    sessions: Arc<SessionRegistry>,
    config: Arc<HttpConfig>,
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    #[serde(rename = "sessionId")]
    session_id: Option<String>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = router(server, self.config.clone());

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → SSE:      GET  {}", self.config.sse_path);
        info!("  → Messages: POST {}?sessionId=<id>", self.config.message_path);
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET  /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Build the router for `server`.
pub fn router(server: McpServer, config: HttpConfig) -> Router {
    let log_requests = server.config().adapter.log_requests;
    let state = AppState {
        adapter: TransportAdapter::new(server),
        sessions: Arc::new(SessionRegistry::new(config.channel_capacity)),
        config: Arc::new(config),
    };

    let mut app = Router::new()
        .route(&state.config.sse_path, get(handle_sse))
        .route(&state.config.message_path, post(handle_session_message))
        .route(&state.config.rpc_path, post(handle_rpc))
        .route("/health", get(health_check))
        .route("/", get(root_handler))
        .with_state(state.clone());

    if state.config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    if log_requests {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    let server = state.adapter.server();
    Json(json!({
        "name": server.name(),
        "version": server.version(),
        "transport": "HTTP",
        "endpoints": {
            "sse": state.config.sse_path,
            "message": state.config.message_path,
            "rpc": state.config.rpc_path,
            "health": "/health"
        },
        "protocol": "JSON-RPC 2.0",
        "documentation": format!(
            "Open GET {} and POST JSON-RPC messages to the endpoint it announces, or POST directly to {}",
            state.config.sse_path, state.config.rpc_path
        )
    }))
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "sessions": state.sessions.len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Open an SSE session.
#[instrument(skip_all)]
async fn handle_sse(State(state): State<AppState>) -> impl IntoResponse {
    let (guard, rx) = state.sessions.open();
    let endpoint = format!("{}?sessionId={}", state.config.message_path, guard.id());

    Sse::new(session_stream(endpoint, guard, rx)).keep_alive(
        KeepAlive::new().interval(Duration::from_secs(state.config.keep_alive_secs)),
    )
}

/// Accept a message for an SSE session; the response goes out on its stream.
#[instrument(skip_all, fields(session_id))]
async fn handle_session_message(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let session_id = query.session_id.or_else(|| {
        headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    });

    let Some(session_id) = session_id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing sessionId" })),
        )
            .into_response();
    };
    tracing::Span::current().record("session_id", session_id.as_str());

    if !state.sessions.contains(&session_id) {
        warn!("Message for unknown session");
        return unknown_session(&session_id);
    }

    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    if let Some(response) = state.adapter.handle_message(request) {
        let message = match serde_json::to_string(&response) {
            Ok(message) => message,
            Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        };

        if let Err(e) = state.sessions.send(&session_id, message).await {
            warn!("Could not deliver response: {}", e);
            return unknown_session(&session_id);
        }
    }

    StatusCode::ACCEPTED.into_response()
}

/// Handle JSON-RPC requests directly.
#[instrument(skip_all)]
async fn handle_rpc(State(state): State<AppState>, body: Bytes) -> Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match state.adapter.handle_message(request) {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

#[allow(clippy::result_large_err)]
fn parse_request(body: &[u8]) -> Result<JsonRpcRequest, Response> {
    JsonRpcRequest::from_slice(body).map_err(|response| {
        warn!("Rejecting malformed JSON-RPC message: {:?}", response.error);
        (StatusCode::BAD_REQUEST, Json(response)).into_response()
    })
}

fn unknown_session(session_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("unknown session: {}", session_id) })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use axum::body::Body;
    use futures::StreamExt;
    use http::Request;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let server = McpServer::with_builtin_tools(Config::default()).unwrap();
        router(server, HttpConfig::default())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Pull SSE frames until one with the given event name arrives; return its data.
    async fn next_event<S>(stream: &mut S, event: &str) -> String
    where
        S: futures::Stream<Item = Result<Bytes, axum::Error>> + Unpin,
    {
        let mut buffer = String::new();
        loop {
            let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
                .await
                .expect("timed out waiting for SSE event")
                .expect("stream ended")
                .unwrap();
            buffer.push_str(std::str::from_utf8(&chunk).unwrap());

            while let Some(end) = buffer.find("\n\n") {
                let frame: String = buffer.drain(..end + 2).collect();
                let name = frame
                    .lines()
                    .find_map(|l| l.strip_prefix("event:"))
                    .map(str::trim_start);
                if name == Some(event) {
                    return frame
                        .lines()
                        .filter_map(|l| l.strip_prefix("data:"))
                        .map(str::trim_start)
                        .collect::<Vec<_>>()
                        .join("\n");
                }
            }
        }
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["endpoints"]["sse"], "/mcp/sse");
        assert_eq!(json["endpoints"]["message"], "/mcp/message");
    }

    #[tokio::test]
    async fn test_direct_rpc_tools_call() {
        let request = post_json(
            "/mcp",
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "percentage", "arguments": {"a": 25, "b": 200}}
            }),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["id"], 1);
        assert_eq!(json["result"]["content"][0]["text"], "12.50%");
    }

    #[tokio::test]
    async fn test_direct_rpc_tools_list() {
        let request = post_json("/mcp", json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}));
        let json = body_json(app().oneshot(request).await.unwrap()).await;
        let tools = json["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 6);
        assert_eq!(tools[5]["name"], "calculate");
        assert_eq!(
            tools[5]["inputSchema"]["properties"]["operation"]["enum"],
            json!(["add", "subtract", "multiply", "divide"])
        );
    }

    #[tokio::test]
    async fn test_direct_rpc_notification_accepted() {
        let request = post_json(
            "/mcp",
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_malformed_json_is_parse_error() {
        let request = Request::post("/mcp")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_request_without_method_is_invalid() {
        let response = app()
            .oneshot(post_json("/mcp", json!({"jsonrpc": "2.0", "id": 1})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], -32600);
        assert_eq!(body["id"], 1);
    }

    #[tokio::test]
    async fn test_direct_rpc_null_id_gets_response() {
        let response = app()
            .oneshot(post_json(
                "/mcp",
                json!({
                    "jsonrpc": "2.0",
                    "id": null,
                    "method": "tools/call",
                    "params": {"name": "add", "arguments": {"a": 2, "b": 3}}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["id"].is_null());
        assert_eq!(body["result"]["content"][0]["text"], "5.00");
    }

    #[tokio::test]
    async fn test_message_without_session_id() {
        let request = post_json("/mcp/message", json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}));
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_message_unknown_session() {
        let request = post_json(
            "/mcp/message?sessionId=does-not-exist",
            json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}),
        );
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_sse_round_trip() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::get("/mcp/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let mut events = Box::pin(response.into_body().into_data_stream());

        let endpoint = next_event(&mut events, "endpoint").await;
        assert!(endpoint.starts_with("/mcp/message?sessionId="));

        let request = post_json(
            &endpoint,
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "tools/call",
                "params": {"name": "divide", "arguments": {"a": 10, "b": 0}}
            }),
        );
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let message: Value = serde_json::from_str(&next_event(&mut events, "message").await).unwrap();
        assert_eq!(message["id"], 7);
        assert_eq!(message["result"]["isError"], true);
        assert_eq!(message["result"]["content"][0]["text"], "cannot divide by zero");
    }

    #[tokio::test]
    async fn test_session_id_header_fallback() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::get("/mcp/sse").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let mut events = Box::pin(response.into_body().into_data_stream());
        let endpoint = next_event(&mut events, "endpoint").await;
        let session_id = endpoint.rsplit('=').next().unwrap().to_string();

        let request = Request::post("/mcp/message")
            .header("content-type", "application/json")
            .header(SESSION_HEADER, session_id)
            .body(Body::from(
                json!({"jsonrpc": "2.0", "id": "p", "method": "ping"}).to_string(),
            ))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let message: Value = serde_json::from_str(&next_event(&mut events, "message").await).unwrap();
        assert_eq!(message["id"], "p");
        assert_eq!(message["result"], json!({}));
    }
}
