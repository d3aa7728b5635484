use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatStreamRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl ChatStreamRequest {
    pub fn single_user_message(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(content)],
            stream: true,
        }
    }
}

/// One line of the newline-delimited JSON chat stream.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatStreamChunk {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /api/tags`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelRecord>,
}

/// A model registry entry. Backends report either a `name` key or only a
/// `model` field; `name` wins when both are present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ModelRecord {
    Named {
        #[serde(deserialize_with = "stringify")]
        name: String,
    },
    Tagged {
        #[serde(deserialize_with = "stringify")]
        model: String,
    },
    Unrecognized(serde_json::Value),
}

/// Accepts any JSON value as an identifier; non-strings keep their JSON text.
fn stringify<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

impl ModelRecord {
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Named { name } => Some(name),
            Self::Tagged { model } => Some(model),
            Self::Unrecognized(_) => None,
        }
    }
}

/// Error body Ollama returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
