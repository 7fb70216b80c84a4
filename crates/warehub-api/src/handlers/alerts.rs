//! Alert dispatch handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::Validate;

use warehub_core::error::{AppError, ErrorKind};

use crate::dto::request::SendAlertsRequest;
use crate::dto::response::TestSendResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /send-alerts
///
/// Processes a batch of pending alerts, or sends a diagnostic email when
/// `test_send` is set. The body is optional.
pub async fn send_alerts(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let req = parse_body(&body)?;

    if req.test_send {
        return Ok(test_send(&state, &req).await);
    }

    let summary = state.dispatcher.run_batch(&req.dispatch_request()).await?;
    Ok(Json(summary).into_response())
}

/// OPTIONS /send-alerts
///
/// Preflight requests carrying an `Origin` are answered by the CORS layer.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn parse_body(body: &[u8]) -> Result<SendAlertsRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SendAlertsRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))
}

async fn test_send(state: &AppState, req: &SendAlertsRequest) -> Response {
    let Some(to) = req.test_email.as_deref().filter(|e| !e.trim().is_empty()) else {
        return failed(
            StatusCode::BAD_REQUEST,
            "test_email is required when test_send is true",
        );
    };
    if let Err(e) = req.validate() {
        return failed(StatusCode::BAD_REQUEST, e.to_string());
    }

    match state.dispatcher.send_test(req.tenant_id, to).await {
        Ok(message) => Json(TestSendResponse::ok(message)).into_response(),
        Err(e) if e.kind == ErrorKind::Validation => failed(StatusCode::BAD_REQUEST, e.message),
        Err(e) => {
            tracing::warn!(error = %e, "Test send failed");
            failed(StatusCode::INTERNAL_SERVER_ERROR, e.message)
        }
    }
}

fn failed(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(TestSendResponse::failed(error))).into_response()
}
