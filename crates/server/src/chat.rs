use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use dinebot_agent::runtime::AgentRuntime;
use dinebot_core::domain::recommendation::{ChatRequest, ChatResponse};
use dinebot_core::errors::{ApplicationError, DomainError, InterfaceError};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatState {
    runtime: Arc<AgentRuntime>,
}

#[derive(Debug, Serialize)]
pub struct ChatError {
    pub error: String,
    pub detail: String,
    pub correlation_id: String,
}

fn error_response(error: InterfaceError) -> (StatusCode, Json<ChatError>) {
    let status = match error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
    };
    let body = ChatError {
        error: error.user_message().to_string(),
        detail: error.to_string(),
        correlation_id: error.correlation_id().to_string(),
    };
    (status, Json(body))
}

pub fn router(runtime: Arc<AgentRuntime>) -> Router {
    Router::new().route("/chat", post(chat)).with_state(ChatState { runtime })
}

pub async fn chat(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ChatError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    if request.query.trim().is_empty() {
        warn!(
            event_name = "server.chat.rejected",
            correlation_id = %correlation_id,
            "empty query rejected"
        );
        return Err(error_response(
            ApplicationError::from(DomainError::EmptyQuery).into_interface(correlation_id),
        ));
    }

    info!(
        event_name = "server.chat.received",
        correlation_id = %correlation_id,
        query_len = request.query.len(),
        "chat request received"
    );

    let response = state.runtime.handle_query(&request.query).await;

    info!(
        event_name = "server.chat.answered",
        correlation_id = %correlation_id,
        "chat request answered"
    );
    Ok(Json(response))
}
