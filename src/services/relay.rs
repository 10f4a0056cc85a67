// src/services/relay.rs
use std::sync::Arc;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use super::sse;
use crate::{
    config::RelayConfig,
    error::AppError,
    message::{ChatRequest, ChatResponse, UpstreamReply, UpstreamRequest},
};

/// Forwards one chat message to the upstream backend per call.
#[derive(Clone, Debug)]
pub struct ChatRelay {
    client: reqwest::Client,
    config: Arc<RelayConfig>,
}

impl ChatRelay {
    pub fn new(config: RelayConfig) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Relays a raw `POST /chat` body. `accept` is the caller's `Accept`
    /// header; the response is always produced, errors included.
    pub async fn relay(&self, body: &[u8], accept: Option<&HeaderValue>) -> Response {
        let streaming = sse::is_event_stream(accept);
        let span = tracing::info_span!("relay", request_id = %Uuid::new_v4(), streaming);

        async move {
            match self.try_relay(body, streaming).await {
                Ok(response) => response,
                Err(err) => err.into_response(),
            }
        }
        .instrument(span)
        .await
    }

    async fn try_relay(&self, body: &[u8], streaming: bool) -> Result<Response, AppError> {
        let request: ChatRequest = serde_json::from_slice(body)?;
        let endpoint = self
            .config
            .chat_endpoint()
            .ok_or(AppError::MissingBackendUrl)?;

        tracing::debug!(%endpoint, input_len = request.input.len(), "forwarding chat message");

        let upstream = self
            .client
            .post(&endpoint)
            .json(&UpstreamRequest {
                message: &request.input,
                session_id: request.session_id.as_deref(),
            })
            .send()
            .await?;

        let status = upstream.status();
        let upstream_streams = sse::is_event_stream(upstream.headers().get(header::CONTENT_TYPE));
        tracing::debug!(%status, upstream_streams, "upstream responded");

        if !streaming {
            if !status.is_success() {
                return Err(AppError::Upstream(upstream.text().await?));
            }
            let reply = UpstreamReply::from_value(upstream.json().await?).into_reply();
            return Ok(Json(ChatResponse { reply }).into_response());
        }

        if upstream_streams {
            return Ok(sse::sse_response(
                StatusCode::OK,
                sse::passthrough(upstream.bytes_stream()),
            ));
        }

        if !status.is_success() {
            let err = AppError::Upstream(upstream.text().await?);
            tracing::warn!(%status, "upstream failed, sending error frame");
            return Ok(sse::sse_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                sse::error_frame(&err.client_message()),
            ));
        }

        let reply = UpstreamReply::from_value(upstream.json().await?).into_reply();
        tracing::debug!(reply_len = reply.len(), "synthesizing stream");
        Ok(sse::sse_response(
            StatusCode::OK,
            sse::synthesized(reply, self.config.chunk_size, self.config.chunk_delay),
        ))
    }
}
