// src/message.rs
use serde::{Deserialize, Serialize};

/// Body accepted by `POST /chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub input: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Body sent to the upstream backend.
#[derive(Debug, Serialize)]
pub struct UpstreamRequest<'a> {
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Upstream JSON reply. Older backends answer with `response`, newer ones
/// with `reply`; both are accepted.
#[derive(Debug, Default)]
pub struct UpstreamReply {
    reply: Option<serde_json::Value>,
    response: Option<serde_json::Value>,
}

impl UpstreamReply {
    /// Any JSON document is accepted. Only an object can carry a reply;
    /// `null`, strings, arrays and numbers read as an empty one.
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(mut fields) => Self {
                reply: fields.remove("reply"),
                response: fields.remove("response"),
            },
            _ => Self::default(),
        }
    }

    /// `reply` wins over `response`. A missing or non-string field falls
    /// through to the next one, and the result defaults to an empty string.
    pub fn into_reply(self) -> String {
        [self.reply, self.response]
            .into_iter()
            .flatten()
            .find_map(|value| match value {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .unwrap_or_default()
    }
}
