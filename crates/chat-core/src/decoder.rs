//! Server-sent token stream decoding.
//!
//! The response body is a sequence of newline-separated records. Only lines
//! starting with `data: ` carry a payload, a JSON object whose `token` field
//! is the next piece of assistant text. Anything else is skipped so one bad
//! line cannot abort an otherwise healthy stream.
//!
//! Chunk boundaries are arbitrary, so bytes are buffered until a full line is
//! available. Splitting on the `\n` byte is safe for UTF-8 because that byte
//! never occurs inside a multi-byte sequence.

use std::collections::VecDeque;
use std::pin::Pin;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use chat_types::Result;
use crate::ports::ByteStream;

const DATA_PREFIX: &str = "data: ";

/// Lazy sequence of decoded tokens. Finite and not restartable.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>>>>;

#[derive(Deserialize)]
struct Frame {
    token: String,
}

/// Parse one complete record. `None` for lines that carry no token.
pub fn parse_record(line: &str) -> Option<String> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    match serde_json::from_str::<Frame>(payload) {
        Ok(frame) => Some(frame.token),
        Err(e) => {
            log::debug!("Skipping malformed stream record ({}): {:?}", e, payload);
            None
        }
    }
}

/// Incremental line splitter. Feed chunks with [`push`](Self::push), then
/// call [`finish`](Self::finish) at end of input.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a chunk and return the tokens of every line it completed
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut tokens = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(token) = decode_line(&line[..pos]) {
                tokens.push(token);
            }
        }
        tokens
    }

    /// Flush a trailing record that was not newline-terminated
    pub fn finish(&mut self) -> Vec<String> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest).into_iter().collect()
    }

    /// Bytes held back waiting for a line break
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

fn decode_line(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.is_empty() {
        return None;
    }
    match std::str::from_utf8(raw) {
        Ok(line) => parse_record(line),
        Err(_) => {
            log::debug!("Skipping stream record with invalid UTF-8 ({} bytes)", raw.len());
            None
        }
    }
}

struct DecodeState {
    source: ByteStream,
    lines: LineDecoder,
    ready: VecDeque<String>,
    finished: bool,
}

/// Turn a raw byte channel into tokens, in arrival order.
/// A channel read error is yielded once and ends the sequence; the partial
/// line it interrupted is dropped.
pub fn decode_tokens(source: ByteStream) -> TokenStream {
    let state = DecodeState {
        source,
        lines: LineDecoder::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            if let Some(token) = st.ready.pop_front() {
                return Some((Ok(token), st));
            }
            if st.finished {
                return None;
            }
            match st.source.next().await {
                Some(Ok(chunk)) => {
                    let tokens = st.lines.push(&chunk);
                    st.ready.extend(tokens);
                }
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((Err(e), st));
                }
                None => {
                    st.finished = true;
                    let tokens = st.lines.finish();
                    st.ready.extend(tokens);
                }
            }
        }
    }))
}
