//! Server-sent-events framing for streamed chat completions.

use crate::error::AiError;

use super::types::StreamChunk;

/// One decoded SSE line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SseEvent {
    Delta(String),
    Done,
    Skip,
}

/// Splits a byte stream into complete lines. Partial lines (including
/// multi-byte characters cut across chunks) stay buffered until the next push.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buf: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line).trim_end().to_string());
        }
        lines
    }

    /// Whatever is left once the body ends without a trailing newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.buf);
        Some(String::from_utf8_lossy(&rest).trim_end().to_string())
    }
}

pub(crate) fn parse_sse_line(line: &str) -> Result<SseEvent, AiError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(':') {
        return Ok(SseEvent::Skip);
    }
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(SseEvent::Skip);
    };
    let data = data.trim_start();
    if data == "[DONE]" {
        return Ok(SseEvent::Done);
    }

    let chunk: StreamChunk = serde_json::from_str(data)
        .map_err(|e| AiError::Stream(format!("bad chunk: {e}")))?;

    match chunk
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
    {
        Some(content) if !content.is_empty() => Ok(SseEvent::Delta(content)),
        _ => Ok(SseEvent::Skip),
    }
}
