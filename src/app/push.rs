use crate::ports::PushSender;
use crate::push as push_service;
use crate::state;
use crate::types::push::{DispatchResult, PushMessage};

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct SendRequest {
    pub(crate) tokens: Vec<String>,
    pub(crate) title: String,
    pub(crate) body: String,
    pub(crate) icon: Option<String>,
}

/// On-demand notification endpoint. The caller supplies the audience
/// directly; the result body mirrors the dispatch outcome, with the status
/// code distinguishing success from gateway failure.
pub(crate) async fn send_push_notifications<S: PushSender>(
    State(state): State<state::AppState<S>>,
    Json(request): Json<SendRequest>,
) -> (StatusCode, Json<DispatchResult>) {
    if request.tokens.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(DispatchResult::failed("tokens must not be empty")),
        );
    }

    let message = PushMessage {
        title: request.title,
        body: request.body,
        icon: request.icon,
    };
    let result = push_service::dispatch(&state.sender, &message, &request.tokens).await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(result))
}
