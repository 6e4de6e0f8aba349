use std::pin::Pin;
use std::task::{Context, Poll};

use tokio_stream::Stream;
use tokio_util::sync::DropGuard;

/// Response stream that fires a cancellation token when dropped.
///
/// Streaming handlers move their work onto a dedicated task that outlives
/// the handler future; tying the token to the response stream is what lets
/// that task observe the caller going away.
pub struct CancelOnDrop<S> {
    inner: S,
    _guard: DropGuard,
}

impl<S> CancelOnDrop<S> {
    /// Wraps a stream with the guard of the producer's cancellation token.
    pub fn new(inner: S, guard: DropGuard) -> Self {
        Self {
            inner,
            _guard: guard,
        }
    }
}

impl<S: Stream + Unpin> Stream for CancelOnDrop<S> {
    type Item = S::Item;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use tokio_stream::StreamExt;
    use tokio_util::sync::CancellationToken;

    use super::*;

    #[tokio::test]
    async fn dropping_the_stream_cancels_the_token() {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();

        let inner = tokio_stream::iter(vec![1, 2, 3]);
        let mut stream = CancelOnDrop::new(inner, guard);

        assert_eq!(stream.next().await, Some(1));
        assert!(!token.is_cancelled());

        drop(stream);
        assert!(token.is_cancelled());
    }
}
