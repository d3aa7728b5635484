mod think;

pub use think::strip_reasoning;

use crate::{
    Error, Result,
    ollama::{ChatStreamRequest, InferenceBackend, ModelRecord},
};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info};

/// Returned in place of model output whenever the backend call fails.
pub const CHAT_ERROR_RESPONSE: &str = "Error: Could not get a response.";

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Forwards chat and model-list requests to the inference backend and
/// normalizes what comes back. Holds no per-request state.
#[derive(Clone)]
pub struct ChatGateway {
    backend: Arc<dyn InferenceBackend>,
    default_model: String,
}

impl ChatGateway {
    pub fn new(backend: Arc<dyn InferenceBackend>, default_model: impl Into<String>) -> Self {
        Self {
            backend,
            default_model: default_model.into(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Resolves the model for a request, falling back to the default when the
    /// caller sent none or an empty name.
    pub fn resolve_model<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(name) if !name.is_empty() => name,
            _ => &self.default_model,
        }
    }

    pub async fn handle_chat(
        &self,
        request: ChatRequest,
        client: Option<SocketAddr>,
    ) -> ChatResponse {
        match client {
            Some(addr) => info!("Received request from {}", addr.ip()),
            None => info!("Received request from unknown client"),
        }
        info!("User message: {}", request.message);

        let model = self
            .resolve_model(request.model_name.as_deref())
            .to_string();
        info!("Using Ollama model: {}", model);

        match self.complete(&model, request.message).await {
            Ok(full_response) => {
                let cleaned = strip_reasoning(&full_response);
                info!("Ollama response: {}", cleaned);
                ChatResponse { response: cleaned }
            }
            Err(e) => {
                error!("Error calling Ollama: {}", e);
                ChatResponse {
                    response: CHAT_ERROR_RESPONSE.to_string(),
                }
            }
        }
    }

    /// Consumes the backend stream to completion and concatenates its
    /// fragments.
    async fn complete(&self, model: &str, message: String) -> Result<String> {
        let request = ChatStreamRequest::single_user_message(model, message);
        let stream = self.backend.chat_stream(request).await?;

        stream
            .try_fold(String::new(), |mut acc, fragment| async move {
                acc.push_str(&fragment);
                Ok::<_, Error>(acc)
            })
            .await
    }

    pub async fn list_models(&self) -> ModelsResponse {
        match self.backend.list_models().await {
            Ok(records) => ModelsResponse {
                models: normalize_models(&records),
                error: None,
            },
            Err(e) => {
                error!("Error fetching models from Ollama: {}", e);
                ModelsResponse {
                    models: Vec::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Plain identifiers for every recognizable record, in registry order.
pub fn normalize_models(records: &[ModelRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(ModelRecord::identifier)
        .map(str::to_string)
        .collect()
}
