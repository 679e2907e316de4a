//! Deferred completion for the non-blocking entry points

use super::error::{MappingError, MappingResult};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Future resolving to the result of a mapping call
///
/// The mapping work runs to completion when the `_async` method is called;
/// the result is handed over through a one-shot channel and observed when
/// the future is awaited. No task is spawned, so awaiting does not require a
/// multi-threaded runtime.
#[derive(Debug)]
pub struct Deferred<T> {
    rx: oneshot::Receiver<MappingResult<T>>,
}

impl<T> Deferred<T> {
    /// Deliver an already computed result
    pub(crate) fn complete(result: MappingResult<T>) -> Self {
        let (tx, rx) = oneshot::channel();
        // The receiver is alive here, so the send cannot fail.
        let _ = tx.send(result);
        Self { rx }
    }

    /// Run `work` now and defer delivery of its result
    pub(crate) fn run(work: impl FnOnce() -> MappingResult<T>) -> Self {
        Self::complete(work())
    }
}

impl<T> Future for Deferred<T> {
    type Output = MappingResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(MappingError::Dropped)))
    }
}
