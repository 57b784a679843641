//! HTTP server: routing, request handlers, and startup wiring.
//!
//! The surface mirrors a small JSON API: a service banner at `/`, a health
//! probe, paged conversation history, and the chat endpoint. A missing API
//! credential is not fatal — the server starts with the chatbot
//! uninitialized and the chat/history endpoints answer 500 while `/` and
//! `/api/health` keep responding.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::chat::Chatbot;
use crate::completion::GroqClient;
use crate::config::{self, LaponiaConfig};
use crate::db;
use crate::store::Store;

const NOT_INITIALIZED: &str = "Chatbot não inicializado corretamente";
const INVALID_REQUEST: &str =
    "Formato de requisição inválido. Envie um JSON com o campo 'message'";

/// Shared application state. `chatbot` is `None` when startup configuration
/// failed (missing API credential).
pub struct AppState {
    pub chatbot: Option<Arc<Chatbot>>,
}

/// JSON error response: `{"error": <message>}` with the given status.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_initialized() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: NOT_INITIALIZED.to_string(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Build the application state from config: open the database, construct the
/// store, and initialize the chatbot if a credential is available.
pub fn build_state(config: &LaponiaConfig) -> anyhow::Result<Arc<AppState>> {
    let conn = db::open_database(config.resolved_db_path())?;
    let store = Arc::new(Store::new(conn));

    let chatbot = match config::api_key_from_env() {
        Some(api_key) => {
            let provider = Arc::new(GroqClient::new(&config.completion, api_key));
            tracing::info!(model = %config.completion.model, "chatbot initialized");
            Some(Arc::new(Chatbot::new(store, provider)))
        }
        None => {
            tracing::error!("GROQ_API_KEY not set — chat and history endpoints disabled");
            None
        }
    };

    Ok(Arc::new(AppState { chatbot }))
}

/// Create the API router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/api/health", get(health))
        .route("/api/history", get(history))
        .route("/api/chat", post(chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and block until ctrl-c.
pub async fn serve(config: LaponiaConfig) -> anyhow::Result<()> {
    let state = build_state(&config)?;
    let app = router(state);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Laponia API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}

async fn home(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "API Chatbot Laponia está funcionando!",
        "status": "healthy",
        "chatbot_initialized": state.chatbot.is_some(),
    }))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "chatbot_initialized": state.chatbot.is_some(),
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}

#[derive(Deserialize)]
struct HistoryParams {
    #[serde(default = "default_history_limit")]
    limit: u32,
}

fn default_history_limit() -> u32 {
    10
}

async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let chatbot = state.chatbot.as_ref().ok_or_else(ApiError::not_initialized)?;
    let turns = chatbot.store().get_conversation_history(params.limit);
    Ok(Json(json!({ "history": turns })))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let chatbot = state.chatbot.as_ref().ok_or_else(ApiError::not_initialized)?;

    // Parse by hand so that both unparseable bodies and a missing `message`
    // field produce the same descriptive 400.
    let message = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .ok_or_else(|| ApiError::bad_request(INVALID_REQUEST))?;

    let response = chatbot.handle_message(&message).await;
    Ok(Json(json!({ "response": response })))
}
