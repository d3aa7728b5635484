use crate::gateway::{ChatGateway, ChatRequest, ChatResponse, ModelsResponse};
use axum::{
    extract::{ConnectInfo, State},
    response::Json,
};
use std::{net::SocketAddr, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ChatGateway>,
}

impl AppState {
    pub fn new(gateway: ChatGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// `POST /api/chat`. Backend failures are reported in the body; the status
/// is always 200 once the request body has been accepted.
pub async fn chat(
    State(state): State<AppState>,
    client: Option<ConnectInfo<SocketAddr>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let client = client.map(|ConnectInfo(addr)| addr);
    Json(state.gateway.handle_chat(request, client).await)
}

/// `GET /api/models`.
pub async fn models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(state.gateway.list_models().await)
}
