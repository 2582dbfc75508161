use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const TEMPERATURE: f64 = 0.7;

/// One message in a conversation. The role is conventionally
/// "user", "assistant" or "system" but is not checked, and content may be
/// a plain string or any other JSON the upstream understands (content parts).
/// Fields missing from the inbound turn stay missing on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl ChatTurn {
    pub fn user(content: impl Into<Value>) -> Self {
        Self {
            role: Some(Value::from("user")),
            content: Some(content.into()),
        }
    }

    fn from_value(value: &Value) -> Self {
        Self {
            role: value.get("role").cloned(),
            content: value.get("content").cloned(),
        }
    }
}

/// Inbound body. Accepts any JSON value: a missing or null message becomes
/// "", and a history that is not an array becomes empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct IncomingRequest {
    pub message: Value,
    pub history: Vec<ChatTurn>,
}

impl From<Value> for IncomingRequest {
    fn from(body: Value) -> Self {
        let message = match body.get("message") {
            None | Some(Value::Null) => Value::from(""),
            Some(message) => message.clone(),
        };
        let history = match body.get("history") {
            Some(Value::Array(turns)) => turns.iter().map(ChatTurn::from_value).collect(),
            _ => Vec::new(),
        };
        Self { message, history }
    }
}

impl IncomingRequest {
    /// History in its original order, then the new message as the user turn.
    pub fn into_payload(self, model: &str) -> UpstreamPayload {
        let mut messages = self.history;
        messages.push(ChatTurn::user(self.message));
        UpstreamPayload {
            model: model.to_string(),
            messages,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamPayload {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub temperature: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssistantReply {
    pub assistant_message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
