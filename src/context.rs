// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request deadline and cancellation.
//!
//! Every network call made by the core is raced against the caller's
//! deadline and cancellation token. A call that loses the race is dropped
//! and the pipeline aborts at that stage.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{WalletError, WalletResult};

/// Deadline and cancellation handle carried through one operation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    deadline: Instant,
    cancel: CancellationToken,
}

impl RequestContext {
    /// Create a context expiring at `deadline`.
    pub fn new(deadline: Instant) -> Self {
        Self {
            deadline,
            cancel: CancellationToken::new(),
        }
    }

    /// Create a context expiring `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Instant::now() + timeout)
    }

    /// Attach an external cancellation token (e.g. the HTTP request's).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run `fut` unless the deadline passes or the request is cancelled first.
    ///
    /// `stage` names what the call was doing and ends up in the error.
    pub async fn guard<F>(&self, stage: &'static str, fut: F) -> WalletResult<F::Output>
    where
        F: Future,
    {
        if self.cancel.is_cancelled() {
            return Err(WalletError::Cancelled(stage));
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(WalletError::Cancelled(stage)),
            result = tokio::time::timeout_at(self.deadline, fut) => {
                result.map_err(|_| WalletError::Timeout(stage))
            }
        }
    }
}
