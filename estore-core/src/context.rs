//! Cancellable unit-of-work context
//!
//! Every service operation takes a [`Ctx`]. Backend calls are raced against
//! the context's cancel signal and deadline; the loser is dropped, which for
//! sqlx aborts the in-flight query.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::{CoreError, Result, StorageResult};

/// Unit of work carried through a single request.
#[derive(Debug, Clone)]
pub struct Ctx {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every [`Ctx`] derived from it.
///
/// Dropping the handle without calling [`CancelHandle::cancel`] leaves the
/// contexts running.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Ctx {
    /// Context that is never canceled and has no deadline.
    pub fn background() -> Self {
        Self {
            cancel: None,
            deadline: None,
        }
    }

    /// Context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Context canceled through the returned handle.
    pub fn cancellable() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancel: Some(rx),
            deadline: None,
        };
        (ctx, CancelHandle { tx })
    }

    /// Tighten the deadline. An earlier existing deadline wins.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_canceled(&self) -> bool {
        let signaled = self.cancel.as_ref().is_some_and(|rx| *rx.borrow());
        let expired = self.deadline.is_some_and(|deadline| Instant::now() >= deadline);
        signaled || expired
    }

    /// Drive a backend call to completion unless the context fires first.
    ///
    /// An already-canceled context returns [`CoreError::Canceled`] without
    /// polling `call`.
    pub async fn run<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        if self.is_canceled() {
            return Err(CoreError::Canceled);
        }

        let mut cancel = self.cancel.clone();
        let signaled = async move {
            match cancel.as_mut() {
                Some(rx) => {
                    while !*rx.borrow_and_update() {
                        if rx.changed().await.is_err() {
                            // handle dropped without canceling
                            std::future::pending::<()>().await;
                        }
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };

        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = signaled => {
                tracing::debug!("unit of work canceled, dropping backend call");
                Err(CoreError::Canceled)
            }
            _ = expired => {
                tracing::debug!("unit of work deadline passed, dropping backend call");
                Err(CoreError::Canceled)
            }
            result = call => result.map_err(CoreError::from),
        }
    }
}

impl Default for Ctx {
    fn default() -> Self {
        Self::background()
    }
}
