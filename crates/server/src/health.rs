use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    model_ready: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub model: HealthCheck,
    pub checked_at: String,
}

pub fn router(model_ready: bool) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { model_ready })
}

/// A missing model credential degrades answers but never takes the service
/// down, so the endpoint reports it and still returns 200.
pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let model = model_check(state.model_ready);

    let payload = HealthResponse {
        status: model.status,
        service: HealthCheck {
            status: "ready",
            detail: "dinebot-server runtime initialized".to_string(),
        },
        model,
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

fn model_check(model_ready: bool) -> HealthCheck {
    if model_ready {
        HealthCheck { status: "ready", detail: "model credential configured".to_string() }
    } else {
        HealthCheck {
            status: "degraded",
            detail: "model credential missing; replies use the fallback payload".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};

    use crate::health::{health, HealthState};

    #[tokio::test]
    async fn health_returns_ready_when_model_is_configured() {
        let (status, Json(payload)) = health(State(HealthState { model_ready: true })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.model.status, "ready");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_reports_degraded_without_credential() {
        let (status, Json(payload)) = health(State(HealthState { model_ready: false })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.model.status, "degraded");
        assert_eq!(payload.service.status, "ready");
        assert!(payload.model.detail.contains("credential missing"));
    }
}
