//! SSE parsing for OpenAI-style streaming chat completions.
//!
//! Both chat backends speak the same wire format: `data:` lines carrying a
//! JSON chunk with `choices[0].delta.content`, terminated by a `[DONE]`
//! sentinel.

use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;

use crate::provider::LlmError;

/// One parsed line from the event stream.
#[derive(Debug, PartialEq)]
pub(super) enum StreamData {
    /// Assistant text delta.
    Delta(String),
    /// End-of-stream sentinel.
    Done,
    /// Comment, empty line, keep-alive, or a chunk without text content.
    Skip,
}

pub(super) fn parse_stream_line(line: &str) -> StreamData {
    let Some(payload) = line.strip_prefix("data:") else {
        return StreamData::Skip;
    };
    let payload = payload.trim();
    if payload == "[DONE]" {
        return StreamData::Done;
    }
    match serde_json::from_str::<Value>(payload) {
        Ok(chunk) => match chunk["choices"][0]["delta"]["content"].as_str() {
            Some(content) if !content.is_empty() => StreamData::Delta(content.to_string()),
            _ => StreamData::Skip,
        },
        Err(_) => StreamData::Skip,
    }
}

/// Adapt a streaming HTTP response into a stream of assistant-text deltas.
///
/// Buffers bytes until complete lines are available, parses each `data:`
/// line, and ends the stream at `[DONE]`, upstream EOF, or the first
/// transport error.
pub(super) fn delta_stream(
    response: reqwest::Response,
) -> BoxStream<'static, Result<String, LlmError>> {
    struct State {
        bytes: BoxStream<'static, Result<bytes::Bytes, reqwest::Error>>,
        buffer: String,
        done: bool,
    }

    let state = State {
        bytes: response.bytes_stream().boxed(),
        buffer: String::new(),
        done: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            if state.done {
                return None;
            }

            // Drain complete lines already buffered.
            while let Some(pos) = state.buffer.find('\n') {
                let line: String = state.buffer.drain(..=pos).collect();
                match parse_stream_line(line.trim()) {
                    StreamData::Delta(text) => return Some((Ok(text), state)),
                    StreamData::Done => {
                        state.done = true;
                        return None;
                    }
                    StreamData::Skip => {}
                }
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    state.buffer.push_str(&String::from_utf8_lossy(&chunk));
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(LlmError::HttpError(e)), state));
                }
                None => {
                    state.done = true;
                    return None;
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_content_delta() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"}}]}"#;
        assert_eq!(parse_stream_line(line), StreamData::Delta("Hello".into()));
    }

    #[test]
    fn recognizes_done_sentinel() {
        assert_eq!(parse_stream_line("data: [DONE]"), StreamData::Done);
    }

    #[test]
    fn skips_chunks_without_content() {
        // Role-announcement chunk at stream start has no content field.
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_stream_line(line), StreamData::Skip);
    }

    #[test]
    fn skips_empty_content() {
        let line = r#"data: {"choices":[{"delta":{"content":""}}]}"#;
        assert_eq!(parse_stream_line(line), StreamData::Skip);
    }

    #[test]
    fn skips_non_data_lines() {
        assert_eq!(parse_stream_line(""), StreamData::Skip);
        assert_eq!(parse_stream_line(": keep-alive"), StreamData::Skip);
        assert_eq!(parse_stream_line("event: message"), StreamData::Skip);
    }

    #[test]
    fn skips_malformed_json() {
        assert_eq!(parse_stream_line("data: {not json"), StreamData::Skip);
    }
}
