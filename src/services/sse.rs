// src/services/sse.rs
//! Server-sent event framing for relay responses.
//!
//! Every stream built here ends with exactly one [`DONE_FRAME`], whether the
//! upstream succeeded, failed, or stopped mid-body.

use std::{convert::Infallible, fmt::Display, pin::Pin, time::Duration};

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::{Stream, StreamExt};

pub const DONE_FRAME: &[u8] = b"data: [DONE]\n\n";
pub const EVENT_STREAM: &str = "text/event-stream";

pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Bytes, Infallible>> + Send>>;

/// Encodes one event. Each line of `payload` gets its own `data: ` field so
/// a client joining the fields with `\n` recovers the text, line breaks
/// included. `\r\n` and lone `\r` count as line breaks.
pub fn frame(payload: &str) -> Bytes {
    let payload = payload.replace("\r\n", "\n").replace('\r', "\n");
    let mut event = String::with_capacity(payload.len() + 8);
    for line in payload.split('\n') {
        event.push_str("data: ");
        event.push_str(line);
        event.push('\n');
    }
    event.push('\n');
    Bytes::from(event)
}

/// Splits `reply` into consecutive slices of at most `chunk_size` characters.
/// Slices never cut through a UTF-8 sequence or a `\r\n` pair.
pub fn split_reply(reply: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut slices = Vec::with_capacity(reply.len() / chunk_size + 1);
    let mut start = 0;
    let mut count = 0;
    let mut prev = None;

    for (idx, ch) in reply.char_indices() {
        if count >= chunk_size && !(prev == Some('\r') && ch == '\n') {
            slices.push(&reply[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
        prev = Some(ch);
    }
    if start < reply.len() {
        slices.push(&reply[start..]);
    }
    slices
}

/// Replays a complete reply as a paced stream of frames.
pub fn synthesized(reply: String, chunk_size: usize, delay: Duration) -> FrameStream {
    Box::pin(async_stream::stream! {
        for slice in split_reply(&reply, chunk_size) {
            yield Ok::<_, Infallible>(frame(slice));
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        yield Ok(Bytes::from_static(DONE_FRAME));
    })
}

/// Forwards upstream body chunks untouched, then closes with the sentinel.
/// A read failure ends the passthrough early but still emits the sentinel.
pub fn passthrough<S, E>(upstream: S) -> FrameStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut upstream = Box::pin(upstream);
        let mut relayed = 0usize;
        while let Some(chunk) = upstream.next().await {
            match chunk {
                Ok(bytes) => {
                    relayed += bytes.len();
                    yield Ok::<_, Infallible>(bytes);
                }
                Err(e) => {
                    tracing::warn!(error = %e, relayed, "upstream stream failed mid-body");
                    break;
                }
            }
        }
        tracing::debug!(relayed, "upstream stream finished");
        yield Ok(Bytes::from_static(DONE_FRAME));
    })
}

/// A single frame carrying `message` as a JSON string, then the sentinel.
pub fn error_frame(message: &str) -> FrameStream {
    let payload = serde_json::Value::String(message.to_owned()).to_string();
    let frames: [Result<Bytes, Infallible>; 2] =
        [Ok(frame(&payload)), Ok(Bytes::from_static(DONE_FRAME))];
    Box::pin(futures::stream::iter(frames))
}

pub fn sse_response(status: StatusCode, frames: FrameStream) -> Response {
    let mut response = (status, Body::from_stream(frames)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream; charset=utf-8"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-transform"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    response
}

/// True when an `Accept` or `Content-Type` value names the event-stream type.
pub fn is_event_stream(value: Option<&HeaderValue>) -> bool {
    value
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains(EVENT_STREAM))
}
