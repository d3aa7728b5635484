use async_trait::async_trait;
use chat_gateway::{
    Error, Result,
    ollama::{ChatStreamRequest, InferenceBackend, ModelRecord},
};
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::{Arc, Mutex};

/// Mock inference backend for testing
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    pub fragments: Vec<String>,
    pub models: Vec<ModelRecord>,
    pub chat_error: Option<String>,
    pub models_error: Option<String>,
    pub requests: Arc<Mutex<Vec<ChatStreamRequest>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fragments(mut self, fragments: &[&str]) -> Self {
        self.fragments = fragments.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_models(mut self, models: Vec<ModelRecord>) -> Self {
        self.models = models;
        self
    }

    pub fn with_chat_error(mut self, error: &str) -> Self {
        self.chat_error = Some(error.to_string());
        self
    }

    pub fn with_models_error(mut self, error: &str) -> Self {
        self.models_error = Some(error.to_string());
        self
    }

    pub fn get_requests(&self) -> Vec<ChatStreamRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    async fn chat_stream(
        &self,
        request: ChatStreamRequest,
    ) -> Result<BoxStream<'static, Result<String>>> {
        self.requests.lock().unwrap().push(request);

        if let Some(ref error) = self.chat_error {
            return Err(Error::ollama(error.clone()));
        }

        let fragments: Vec<Result<String>> = self.fragments.iter().cloned().map(Ok).collect();
        Ok(stream::iter(fragments).boxed())
    }

    async fn list_models(&self) -> Result<Vec<ModelRecord>> {
        if let Some(ref error) = self.models_error {
            return Err(Error::ollama(error.clone()));
        }
        Ok(self.models.clone())
    }
}
