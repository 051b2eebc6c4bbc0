//! Streaming turn: a finite, non-restartable sequence of turn results.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::stream::FusedStream;
use futures::{FutureExt, Stream, StreamExt};
use tracing::{debug, warn};

use crate::error::{ConferentiError, Result};
use crate::transport::ChunkStream;
use crate::types::TurnResult;

use super::history::History;

/// Lifecycle of a [`TurnStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStreamState {
    /// Waiting for the transport to accept the request.
    Opening,
    /// Yielding fragments as they arrive.
    Emitting,
    /// Transport exhausted; the assistant message is being recorded.
    Finalizing,
    /// Assistant message recorded; the stream is finished.
    Terminal,
    /// A failure was reported; nothing was recorded.
    Aborted,
}

/// Streaming turn returned by [`Agent::run_streaming`](super::Agent::run_streaming).
///
/// Yields one `InProgress` result per fragment. When the transport is drained
/// without error, the accumulated reply is appended to the agent's history
/// exactly once, in the same poll that returns `None`. A transport failure
/// yields a single `Failed` result and ends the stream, discarding partial
/// text. Dropping the stream early records nothing.
///
/// The stream holds the agent's history mutably, so no other turn can run on
/// the same agent until it is dropped.
pub struct TurnStream<'a> {
    history: &'a mut History,
    model: String,
    state: TurnStreamState,
    opening: Option<BoxFuture<'static, Result<ChunkStream>>>,
    fragments: Option<ChunkStream>,
    buffer: String,
}

impl<'a> TurnStream<'a> {
    pub(crate) fn open(
        history: &'a mut History,
        model: String,
        opening: BoxFuture<'static, Result<ChunkStream>>,
    ) -> Self {
        Self {
            history,
            model,
            state: TurnStreamState::Opening,
            opening: Some(opening),
            fragments: None,
            buffer: String::new(),
        }
    }

    /// A stream that reports `error` as its only item without touching history.
    pub(crate) fn rejected(history: &'a mut History, model: String, error: ConferentiError) -> Self {
        Self::open(history, model, futures::future::ready(Err(error)).boxed())
    }

    pub fn state(&self) -> TurnStreamState {
        self.state
    }

    /// Text accumulated so far in this turn.
    pub fn accumulated(&self) -> &str {
        &self.buffer
    }

    fn abort(&mut self, error: ConferentiError) -> TurnResult {
        warn!(
            model = %self.model,
            discarded_chars = self.buffer.len(),
            error = %error,
            "streaming turn failed"
        );
        self.opening = None;
        self.fragments = None;
        self.buffer.clear();
        self.state = TurnStreamState::Aborted;
        TurnResult::failed(error.to_string())
    }

    fn finalize(&mut self) {
        self.fragments = None;
        let reply = std::mem::take(&mut self.buffer);
        debug!(model = %self.model, chars = reply.len(), "streaming turn completed");
        self.history.push_assistant(reply);
        self.state = TurnStreamState::Terminal;
    }
}

impl Stream for TurnStream<'_> {
    type Item = TurnResult;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<TurnResult>> {
        let this = self.get_mut();
        loop {
            match this.state {
                TurnStreamState::Opening => {
                    let Some(opening) = this.opening.as_mut() else {
                        this.state = TurnStreamState::Aborted;
                        return Poll::Ready(None);
                    };
                    match opening.poll_unpin(cx) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Ok(fragments)) => {
                            this.opening = None;
                            this.fragments = Some(fragments);
                            this.state = TurnStreamState::Emitting;
                        }
                        Poll::Ready(Err(error)) => {
                            return Poll::Ready(Some(this.abort(error)));
                        }
                    }
                }
                TurnStreamState::Emitting => {
                    let Some(fragments) = this.fragments.as_mut() else {
                        this.state = TurnStreamState::Finalizing;
                        continue;
                    };
                    match fragments.poll_next_unpin(cx) {
                        Poll::Pending => return Poll::Pending,
                        Poll::Ready(Some(Ok(chunk))) => {
                            this.buffer.push_str(&chunk.content);
                            return Poll::Ready(Some(TurnResult::in_progress(chunk.content)));
                        }
                        Poll::Ready(Some(Err(error))) => {
                            return Poll::Ready(Some(this.abort(error)));
                        }
                        Poll::Ready(None) => this.state = TurnStreamState::Finalizing,
                    }
                }
                TurnStreamState::Finalizing => {
                    this.finalize();
                    return Poll::Ready(None);
                }
                TurnStreamState::Terminal | TurnStreamState::Aborted => {
                    return Poll::Ready(None);
                }
            }
        }
    }
}

impl FusedStream for TurnStream<'_> {
    fn is_terminated(&self) -> bool {
        matches!(
            self.state,
            TurnStreamState::Terminal | TurnStreamState::Aborted
        )
    }
}

impl fmt::Debug for TurnStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurnStream")
            .field("model", &self.model)
            .field("state", &self.state)
            .field("accumulated", &self.buffer.len())
            .finish()
    }
}
