use crate::api::models::StreamResponse;
use crate::error::{R3asonError, Result};
use bytes::Bytes;
use colored::*;
use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use tokio::time::{timeout, Duration};

/// Content fragments decoded from an SSE response, delivered in arrival
/// order and terminated at `[DONE]` or end of the underlying byte stream.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

struct SseConsumer {
    bytes: ByteStream,
    incomplete_line: String,
    pending: VecDeque<String>,
    chunk_timeout: Duration,
    done: bool,
    verbose: bool,
}

impl SseConsumer {
    fn new(response: reqwest::Response, timeout_secs: u64, verbose: bool) -> Self {
        Self {
            bytes: Box::pin(response.bytes_stream()),
            incomplete_line: String::new(),
            pending: VecDeque::new(),
            chunk_timeout: Duration::from_secs(timeout_secs),
            done: false,
            verbose,
        }
    }

    async fn next_fragment(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(fragment) = self.pending.pop_front() {
                return Ok(Some(fragment));
            }
            if self.done {
                return Ok(None);
            }

            match timeout(self.chunk_timeout, self.bytes.next()).await {
                Ok(Some(chunk)) => {
                    let chunk = chunk.map_err(R3asonError::NetworkError)?;
                    self.incomplete_line
                        .push_str(&String::from_utf8_lossy(&chunk));
                }
                Ok(None) => {
                    self.done = true;
                    continue;
                }
                Err(_) => return Err(R3asonError::Timeout),
            }

            // Only process complete lines; keep the tail for the next chunk
            if let Some(last_newline_pos) = self.incomplete_line.rfind('\n') {
                let complete = self.incomplete_line[..=last_newline_pos].to_string();
                self.incomplete_line = self.incomplete_line[last_newline_pos + 1..].to_string();
                self.ingest_lines(&complete);
            }
        }
    }

    fn ingest_lines(&mut self, complete: &str) {
        for line in complete.lines() {
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            // Parse SSE field
            let Some(colon_pos) = line.find(':') else {
                continue;
            };
            let field = line[..colon_pos].trim();
            let value = line[colon_pos + 1..].trim_start();

            match field {
                "data" => {
                    if value == "[DONE]" {
                        self.done = true;
                        return;
                    }

                    match serde_json::from_str::<StreamResponse>(value) {
                        Ok(parsed) => {
                            for choice in parsed.choices.unwrap_or_default() {
                                if let Some(delta) = choice.delta {
                                    if let Some(content) = delta.content {
                                        self.pending.push_back(content);
                                    }
                                }
                            }
                        }
                        Err(e) => {
                            if self.verbose {
                                eprintln!(
                                    "{}",
                                    format!("[r3ason] JSON parse error: {}", e).dimmed()
                                );
                            }
                        }
                    }
                }
                "event" | "id" | "retry" => {
                    if self.verbose {
                        eprintln!("{}", format!("[r3ason] SSE {}: {}", field, value).dimmed());
                    }
                }
                _ => {
                    if self.verbose {
                        eprintln!(
                            "{}",
                            format!("[r3ason] Unknown SSE field: {}", field).dimmed()
                        );
                    }
                }
            }
        }
    }
}

/// Wrap a streaming HTTP response into a [`FragmentStream`] of content
/// deltas. Each fragment arrival is the only suspension point; a gap of
/// more than `timeout_secs` between chunks fails the stream with `Timeout`.
pub fn sse_fragments(response: reqwest::Response, timeout_secs: u64, verbose: bool) -> FragmentStream {
    let consumer = SseConsumer::new(response, timeout_secs, verbose);
    Box::pin(stream::try_unfold(consumer, |mut consumer| async move {
        match consumer.next_fragment().await {
            Ok(Some(fragment)) => Ok(Some((fragment, consumer))),
            Ok(None) => Ok(None),
            Err(err) => Err(err),
        }
    }))
}
