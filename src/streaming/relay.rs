//! Per-session stream translation and the outbound body stream

use std::convert::Infallible;
use std::fmt::Display;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt};

use super::{classify_line, LineBuffer, OutboundEvent, Utf8StreamDecoder};
use crate::proxy::logging::RelayContext;
use crate::routes::metrics::{record_event, record_stream_duration};

/// Apology sent when reading the upstream body fails mid-stream
pub const STREAM_FAILURE_MESSAGE: &str =
    "I apologize, but I encountered an error while processing your request. Please try again.";

/// Translates one upstream body into client events for a single session.
#[derive(Debug)]
pub struct StreamTranslator {
    session_id: String,
    decoder: Utf8StreamDecoder,
    lines: LineBuffer,
}

impl StreamTranslator {
    pub fn new(session_id: impl Into<String>, max_pending_line_bytes: usize) -> Self {
        Self {
            session_id: session_id.into(),
            decoder: Utf8StreamDecoder::new(),
            lines: LineBuffer::new(max_pending_line_bytes),
        }
    }

    /// Feed a raw upstream chunk, returning the events of every completed line
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<OutboundEvent> {
        let text = self.decoder.decode(chunk);
        let lines = self.lines.feed(&text);
        self.translate(lines)
    }

    /// Flush the decoder and the held-back fragment at end of stream
    pub fn finish(&mut self) -> Vec<OutboundEvent> {
        let tail = self.decoder.finish();
        let mut lines = self.lines.feed(&tail);
        lines.push(self.lines.take_remaining());
        self.translate(lines)
    }

    /// The terminal event sent when the upstream body cannot be read
    pub fn failure_event(&self) -> OutboundEvent {
        OutboundEvent::message(STREAM_FAILURE_MESSAGE, self.session_id.clone(), false)
    }

    fn translate(&self, lines: Vec<String>) -> Vec<OutboundEvent> {
        lines
            .iter()
            .filter_map(|line| {
                let classified = classify_line(line);
                record_event(classified.kind());
                classified.into_event(&self.session_id)
            })
            .collect()
    }
}

/// Build the client body stream for an upstream byte stream.
///
/// Every event is yielded as its own frame. A transport error or a read idle
/// longer than `read_timeout` ends the stream with one failure event; the
/// held-back fragment is only processed when the upstream completes cleanly.
/// Dropping the returned stream drops `upstream` with it.
pub fn relay_events<S, E>(
    upstream: S,
    mut translator: StreamTranslator,
    read_timeout: Duration,
    ctx: RelayContext,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut upstream = Box::pin(upstream);
        let mut emitted = 0usize;

        loop {
            let (events, done) = match tokio::time::timeout(read_timeout, upstream.next()).await {
                Ok(Some(Ok(chunk))) => (translator.feed(&chunk), false),
                Ok(Some(Err(e))) => {
                    ctx.log_stream_error(&e.to_string());
                    (vec![translator.failure_event()], true)
                }
                Ok(None) => (translator.finish(), true),
                Err(_) => {
                    ctx.log_timeout(read_timeout.as_millis());
                    (vec![translator.failure_event()], true)
                }
            };

            for event in events {
                match event.encode() {
                    Ok(frame) => {
                        emitted += 1;
                        yield Ok::<Bytes, Infallible>(frame);
                    }
                    Err(e) => ctx.log_line_skipped(&e.to_string()),
                }
            }

            if done {
                break;
            }
        }

        record_stream_duration(ctx.start_time.elapsed().as_secs_f64());
        ctx.log_stream_ended(emitted);
    }
}
