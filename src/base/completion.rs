//! Single-settle completions for callback-style host calls.
//!
//! A host that reports results through callbacks receives a [`Completion`];
//! the caller awaits the paired [`Pending`]. `Completion::complete` consumes
//! the completion, so a host cannot settle the same call twice.

use crate::base::shimerror::HostError;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// The host-facing half of a pending call.
#[derive(Debug)]
pub struct Completion<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Completion<T> {
    /// Settle the call.
    ///
    /// If the caller has already gone away the value is discarded.
    pub fn complete(self, value: T) {
        if self.tx.send(value).is_err() {
            tracing::trace!("completion settled after caller went away");
        }
    }
}

/// The caller-facing half of a pending call.
///
/// Resolves to `Err(HostError::Dropped)` when the host drops the
/// [`Completion`] without settling it.
#[derive(Debug)]
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for Pending<T> {
    type Output = Result<T, HostError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.map_err(|_| HostError::Dropped))
    }
}

/// Create a linked completion/pending pair.
pub fn pending<T>() -> (Completion<T>, Pending<T>) {
    let (tx, rx) = oneshot::channel();
    (Completion { tx }, Pending { rx })
}
