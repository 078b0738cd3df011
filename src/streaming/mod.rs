//! Streaming translation from the upstream line format to client events
//!
//! Upstream data arrives as byte chunks that align with neither character nor
//! line boundaries. The pieces here are layered:
//! - [`Utf8StreamDecoder`] turns bytes into text across chunk boundaries
//! - [`LineBuffer`] holds back the partial last line
//! - [`classify_line`] maps one line to an [`UpstreamLine`]
//! - [`StreamTranslator`] and [`relay_events`] drive the above for one session

pub mod decoder;
pub mod event;
pub mod relay;

pub use decoder::Utf8StreamDecoder;
pub use event::{classify_line, OutboundEvent, UpstreamLine};
pub use relay::{relay_events, StreamTranslator, STREAM_FAILURE_MESSAGE};

/// Buffer for accumulating an incomplete line across chunk boundaries.
///
/// # Example
/// ```
/// use chat_relay::streaming::LineBuffer;
///
/// let mut buffer = LineBuffer::new(1024);
///
/// let lines1 = buffer.feed("data: {\"ai_message\":\"hel");
/// assert!(lines1.is_empty());
///
/// let lines2 = buffer.feed("lo\"}\n");
/// assert_eq!(lines2, vec!["data: {\"ai_message\":\"hello\"}"]);
/// ```
#[derive(Debug)]
pub struct LineBuffer {
    /// Text after the last newline seen so far
    pending: String,
    /// Size at which `pending` is released even without a newline
    max_pending: usize,
}

impl LineBuffer {
    /// Create an empty buffer bounded at `max_pending` bytes
    pub fn new(max_pending: usize) -> Self {
        Self {
            pending: String::new(),
            max_pending: max_pending.max(1),
        }
    }

    /// Append decoded text and return every line it completes.
    ///
    /// Newlines are stripped. Blank lines are returned too; callers decide
    /// what to skip. If the held-back fragment grows past the bound it is
    /// returned as a line of its own.
    pub fn feed(&mut self, text: &str) -> Vec<String> {
        self.pending.push_str(text);

        let mut lines = Vec::new();
        if let Some(last_newline) = self.pending.rfind('\n') {
            let tail = self.pending.split_off(last_newline + 1);
            let complete = std::mem::replace(&mut self.pending, tail);
            lines.extend(
                complete
                    .strip_suffix('\n')
                    .unwrap_or(complete.as_str())
                    .split('\n')
                    .map(str::to_string),
            );
        }

        if self.pending.len() > self.max_pending {
            lines.push(std::mem::take(&mut self.pending));
        }

        lines
    }

    /// Check if a partial line is being held back
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Take the held-back fragment at end of stream
    pub fn take_remaining(&mut self) -> String {
        std::mem::take(&mut self.pending)
    }
}
