//! Decoding of Ollama's newline-delimited JSON chat stream into content
//! fragments.

use super::types::ChatStreamChunk;
use crate::{Error, Result};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use tracing::{debug, trace};

/// Splits raw body bytes into complete lines, buffering any partial line
/// until the next push.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line).trim().to_string();
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }

    /// Returns the unterminated trailing line, if any.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        let line = String::from_utf8_lossy(&rest).trim().to_string();
        (!line.is_empty()).then_some(line)
    }
}

/// Parses one stream line into its content fragment.
///
/// Lines without a message (the final `done` summary, for instance) yield
/// `None`. A line carrying `error` fails the whole stream.
pub fn parse_line(line: &str) -> Result<Option<String>> {
    let chunk: ChatStreamChunk = serde_json::from_str(line)?;

    if let Some(error) = chunk.error {
        return Err(Error::ollama(error));
    }
    if chunk.done {
        debug!("Chat stream finished for model {:?}", chunk.model);
    }

    Ok(chunk.message.map(|message| message.content))
}

struct DecodeState<S> {
    inner: Pin<Box<S>>,
    decoder: LineDecoder,
    pending: VecDeque<String>,
    exhausted: bool,
}

/// Turns a raw byte stream into a lazy stream of content fragments in arrival
/// order. The stream ends after the first error.
pub fn decode_chat_stream<S, B, E>(inner: S) -> BoxStream<'static, Result<String>>
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<Error> + Send + 'static,
{
    let state = DecodeState {
        inner: Box::pin(inner),
        decoder: LineDecoder::new(),
        pending: VecDeque::new(),
        exhausted: false,
    };

    stream::try_unfold(state, next_fragment).boxed()
}

async fn next_fragment<S, B, E>(
    mut state: DecodeState<S>,
) -> Result<Option<(String, DecodeState<S>)>>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Error>,
{
    loop {
        if let Some(line) = state.pending.pop_front() {
            trace!("Chat stream line: {}", line);
            match parse_line(&line)? {
                Some(fragment) => return Ok(Some((fragment, state))),
                None => continue,
            }
        }

        if state.exhausted {
            return Ok(None);
        }

        match state.inner.next().await {
            Some(chunk) => {
                let bytes = chunk.map_err(Into::<Error>::into)?;
                let lines = state.decoder.push(bytes.as_ref());
                state.pending.extend(lines);
            }
            None => {
                state.exhausted = true;
                state.pending.extend(state.decoder.finish());
            }
        }
    }
}
