//! Incremental decoder for `text/event-stream` bodies.

use storygen_error::{GeminiError, GeminiErrorKind, StorygenResult};

/// Splits a byte stream into SSE event payloads.
///
/// Bytes are buffered until a blank line ends the event, so events and
/// multi-byte characters may straddle network chunks.
///
/// # Examples
///
/// ```
/// use storygen_models::SseDecoder;
///
/// let mut decoder = SseDecoder::new();
/// assert!(decoder.push(b"data: {\"a\"").unwrap().is_empty());
/// assert_eq!(decoder.push(b":1}\n\n").unwrap(), vec!["{\"a\":1}".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    /// Empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return the data of every event it completes.
    pub fn push(&mut self, chunk: &[u8]) -> StorygenResult<Vec<String>> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((end, delimiter)) = event_boundary(&self.buffer) {
            let raw: Vec<u8> = self.buffer.drain(..end + delimiter).collect();
            if let Some(data) = event_data(&raw[..end])? {
                events.push(data);
            }
        }
        Ok(events)
    }

    /// Flush an event left unterminated at end of stream.
    pub fn finish(&mut self) -> StorygenResult<Option<String>> {
        let raw = std::mem::take(&mut self.buffer);
        event_data(&raw)
    }
}

fn event_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    (0..buffer.len()).find_map(|i| {
        let rest = &buffer[i..];
        if rest.starts_with(b"\r\n\r\n") {
            Some((i, 4))
        } else if rest.starts_with(b"\n\n") {
            Some((i, 2))
        } else {
            None
        }
    })
}

fn event_data(raw: &[u8]) -> StorygenResult<Option<String>> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        GeminiError::new(GeminiErrorKind::StreamInterrupted(format!(
            "Event is not valid UTF-8: {}",
            e
        )))
    })?;

    let data: Vec<&str> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|value| value.strip_prefix(' ').unwrap_or(value))
        .collect();

    if data.is_empty() {
        Ok(None)
    } else {
        Ok(Some(data.join("\n")))
    }
}
