use super::stream::decode_chat_stream;
use super::types::*;
use crate::{Error, Result, config::OllamaConfig};
use async_trait::async_trait;
use futures::stream::BoxStream;
use tracing::{debug, info};

#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Starts a streaming chat call and returns its content fragments in
    /// arrival order.
    async fn chat_stream(
        &self,
        request: ChatStreamRequest,
    ) -> Result<BoxStream<'static, Result<String>>>;

    /// Reads the backend's model registry, in the order the backend reports it.
    async fn list_models(&self) -> Result<Vec<ModelRecord>>;
}

pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Maps a non-2xx response into an error carrying Ollama's message.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    Err(Error::ollama(format!("{}: {}", status, message)))
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn chat_stream(
        &self,
        request: ChatStreamRequest,
    ) -> Result<BoxStream<'static, Result<String>>> {
        debug!(
            "Opening chat stream to {} with model {}",
            self.base_url, request.model
        );

        let response = self
            .client
            .post(self.endpoint("/api/chat"))
            .json(&request)
            .send()
            .await?;
        let response = error_for_status(response).await?;

        Ok(decode_chat_stream(response.bytes_stream()))
    }

    async fn list_models(&self) -> Result<Vec<ModelRecord>> {
        let response = self.client.get(self.endpoint("/api/tags")).send().await?;
        let response = error_for_status(response).await?;

        let raw = response.text().await?;
        info!("Ollama model registry response: {}", raw);

        let list: ModelList = serde_json::from_str(&raw)?;
        Ok(list.models)
    }
}
