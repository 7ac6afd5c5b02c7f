//! Adapts a fetch `ReadableStream` body into a [`ByteStream`].
//!
//! Each `read()` on the default reader resolves to `{ done, value }` where
//! `value` is a `Uint8Array`. Dropping the stream before the body is
//! exhausted cancels the reader, which aborts the underlying response.

use futures::stream;
use js_sys::{Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{ReadableStream, ReadableStreamDefaultReader};

use chat_core::ports::ByteStream;
use chat_types::ChatError;
use crate::http::js_error;

struct BodyReader {
    reader: ReadableStreamDefaultReader,
    finished: bool,
}

impl Drop for BodyReader {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("Closing response body before end of stream");
            let _ = self.reader.cancel();
        }
    }
}

pub fn byte_stream(body: ReadableStream) -> ByteStream {
    let state = BodyReader {
        reader: body.get_reader().unchecked_into(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        if st.finished {
            return None;
        }
        let chunk = match JsFuture::from(st.reader.read()).await {
            Ok(result) => read_result(&result),
            Err(e) => Err(ChatError::Transport(format!("Stream read failed: {}", js_error(e)))),
        };
        match chunk {
            Ok(Some(bytes)) => Some((Ok(bytes), st)),
            Ok(None) => {
                st.finished = true;
                None
            }
            Err(e) => {
                st.finished = true;
                Some((Err(e), st))
            }
        }
    }))
}

/// `Ok(None)` once the reader reports `done`
fn read_result(result: &JsValue) -> Result<Option<Vec<u8>>, ChatError> {
    let done = Reflect::get(result, &JsValue::from_str("done"))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(true);
    if done {
        return Ok(None);
    }
    let value = Reflect::get(result, &JsValue::from_str("value"))
        .map_err(|e| ChatError::Transport(js_error(e)))?;
    let bytes = value
        .dyn_into::<Uint8Array>()
        .map_err(|_| ChatError::Transport("Stream chunk is not a byte array".to_string()))?;
    Ok(Some(bytes.to_vec()))
}
