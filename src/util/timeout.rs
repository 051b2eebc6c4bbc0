//! Timeout helpers.

use std::future::Future;
use std::time::Duration;

use futures::{Stream, StreamExt};

use crate::error::{ConferentiError, Result};
use crate::types::TurnResult;

/// Wrap a fallible future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(timeout_error(duration)),
    }
}

/// Bound a synchronous turn. On expiry the turn future is dropped, so its
/// reply is never recorded, and a `Failed` result is returned.
pub async fn turn_with_timeout(
    duration: Duration,
    turn: impl Future<Output = TurnResult>,
) -> TurnResult {
    match tokio::time::timeout(duration, turn).await {
        Ok(result) => result,
        Err(_) => TurnResult::failed(timeout_error(duration).to_string()),
    }
}

/// Bound a streaming turn by one deadline covering every chunk.
///
/// Results pass through until the deadline. On expiry the inner stream is
/// dropped, so nothing is recorded, and a single `Failed` result ends the
/// stream.
pub fn turn_stream_with_timeout<'a>(
    duration: Duration,
    turn: impl Stream<Item = TurnResult> + 'a,
) -> impl Stream<Item = TurnResult> + 'a {
    let deadline = tokio::time::Instant::now() + duration;
    async_stream::stream! {
        let mut turn = Box::pin(turn);
        loop {
            match tokio::time::timeout_at(deadline, turn.next()).await {
                Ok(Some(result)) => yield result,
                Ok(None) => break,
                Err(_) => {
                    drop(turn);
                    yield TurnResult::failed(timeout_error(duration).to_string());
                    break;
                }
            }
        }
    }
}

fn timeout_error(duration: Duration) -> ConferentiError {
    ConferentiError::Timeout(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
