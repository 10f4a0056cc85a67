// src/routes/chat.rs
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
    response::Response,
};

use crate::state::SharedState;

/// `POST /chat`. The body is parsed by the relay so malformed input is
/// reported like any other relay failure.
pub async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.relay.relay(&body, headers.get(header::ACCEPT)).await
}
