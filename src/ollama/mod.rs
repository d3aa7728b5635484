pub mod client;
pub mod stream;
pub mod types;

pub use client::{InferenceBackend, OllamaClient};
pub use types::*;
