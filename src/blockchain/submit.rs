// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Broadcasting signed transactions.
//!
//! Submission is attempted exactly once. Retries are left to the caller.

use super::client::{ChainError, ChainProvider};
use super::signing::SignedTransaction;
use crate::context::RequestContext;
use crate::error::{WalletError, WalletResult};

/// Broadcasts signed transactions through a [`ChainProvider`].
pub struct TransactionSubmitter<'a> {
    provider: &'a dyn ChainProvider,
}

impl<'a> TransactionSubmitter<'a> {
    pub fn new(provider: &'a dyn ChainProvider) -> Self {
        Self { provider }
    }

    /// Send `signed` and return its `0x`-prefixed hash.
    ///
    /// Node rejections keep the node's message: "insufficient funds" maps to
    /// [`WalletError::InsufficientFunds`], anything else to
    /// [`WalletError::Rejected`]. Transport problems are
    /// [`WalletError::Network`] with a fixed prefix.
    pub async fn submit(
        &self,
        signed: &SignedTransaction,
        ctx: &RequestContext,
    ) -> WalletResult<String> {
        let node_hash = ctx
            .guard(
                "broadcasting transaction",
                self.provider.send_raw_transaction(signed.raw()),
            )
            .await?
            .map_err(map_submit_error)?;

        if node_hash != signed.hash() {
            tracing::warn!(
                local = %signed.tx_hash_hex(),
                node = %node_hash,
                "Node reported a different transaction hash"
            );
        }

        Ok(format!("{node_hash:#x}"))
    }
}

fn map_submit_error(err: ChainError) -> WalletError {
    match err {
        ChainError::Rejected(msg) if msg.to_ascii_lowercase().contains("insufficient funds") => {
            WalletError::InsufficientFunds(msg)
        }
        ChainError::Rejected(msg) => WalletError::Rejected(msg),
        other => WalletError::Network(format!("failed to send transaction: {other}")),
    }
}
