//! Lazy stream of decoded response chunks
//!
//! Wraps a chunked HTTP body and yields one `serde_json::Value` per
//! non-empty line. The stream owns the response, so the connection is
//! released when the stream is exhausted, closed or dropped.

use crate::errors::{ClientError, Result};
use crate::streaming::parser::LineParser;
use bytes::Bytes;
use futures_util::{Stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

/// What to do with a streamed line that is not valid JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Log a warning and move on to the next line
    #[default]
    Skip,

    /// Yield a decode error and end the stream
    Strict,
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodePolicy::Skip => write!(f, "skip"),
            DecodePolicy::Strict => write!(f, "strict"),
        }
    }
}

impl DecodePolicy {
    /// Decode one line, applying the policy to failures
    ///
    /// Returns `None` when the line was skipped.
    pub fn decode(self, line_number: usize, line: &[u8]) -> Option<Result<Value>> {
        match serde_json::from_slice::<Value>(line) {
            Ok(value) => Some(Ok(value)),
            Err(source) => {
                let text = String::from_utf8_lossy(line).into_owned();
                match self {
                    DecodePolicy::Skip => {
                        tracing::warn!(
                            line_number,
                            line = %text,
                            error = %source,
                            "skipping undecodable stream line"
                        );
                        None
                    }
                    DecodePolicy::Strict => Some(Err(ClientError::Decode {
                        line_number,
                        line: text,
                        source,
                    })),
                }
            }
        }
    }
}

/// Single-pass stream of decoded chunks
pub struct ChunkStream {
    inner: Pin<Box<dyn Stream<Item = Result<Value>> + Send>>,
    finished: bool,
}

impl ChunkStream {
    /// Stream the body of a successful response
    pub fn from_response(
        response: reqwest::Response,
        policy: DecodePolicy,
        max_line_bytes: usize,
    ) -> Self {
        Self::from_byte_stream(response.bytes_stream(), policy, max_line_bytes)
    }

    /// Stream any chunked byte source
    pub fn from_byte_stream<S, E>(byte_stream: S, policy: DecodePolicy, max_line_bytes: usize) -> Self
    where
        S: Stream<Item = std::result::Result<Bytes, E>> + Send + 'static,
        E: Into<ClientError> + Send + 'static,
    {
        let chunks = async_stream::stream! {
            let mut parser = LineParser::with_capacity(max_line_bytes);
            let mut byte_stream = std::pin::pin!(byte_stream);
            let mut line_number = 0usize;

            loop {
                let mut lines = Vec::new();
                let ended = match byte_stream.next().await {
                    Some(Ok(bytes)) => {
                        parser.add_bytes(&bytes);
                        while let Some(line) = parser.next_line() {
                            lines.push(line);
                        }
                        false
                    }
                    Some(Err(e)) => {
                        yield Err::<Value, ClientError>(e.into());
                        return;
                    }
                    None => {
                        lines.extend(parser.finish());
                        true
                    }
                };

                for line in lines {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    };
                    line_number += 1;
                    match policy.decode(line_number, &line) {
                        Some(Ok(value)) => yield Ok(value),
                        Some(Err(e)) => {
                            yield Err(e);
                            return;
                        }
                        None => {}
                    }
                }

                if ended {
                    tracing::debug!(lines = line_number, "stream finished");
                    return;
                }
            }
        };

        Self {
            inner: Box::pin(chunks),
            finished: false,
        }
    }

    /// Drain the stream into a vector, stopping at the first error
    pub async fn collect_chunks(self) -> Result<Vec<Value>> {
        self.try_collect().await
    }

    /// Stop reading and release the connection
    pub fn close(self) {
        drop(self);
    }

    /// Whether the stream has ended
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Stream for ChunkStream {
    type Item = Result<Value>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }

        let polled = self.inner.as_mut().poll_next(cx);
        if let Poll::Ready(None) = polled {
            self.finished = true;
        }
        polled
    }
}

impl fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkStream")
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
