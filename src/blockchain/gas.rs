// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Nonce, gas price and gas limit selection.
//!
//! The gas price is the node's suggestion raised by 20% so transfers are not
//! stuck behind slightly rising prices. The uplift is integer arithmetic:
//! `price * 120 / 100`, truncating.

use alloy::primitives::Address;

use super::client::{CallRequest, ChainError, ChainProvider};
use super::transactions::TransferKind;
use crate::config::GasLimitMode;
use crate::context::RequestContext;
use crate::error::{WalletError, WalletResult};

/// Numerator of the gas price uplift.
pub const GAS_PRICE_UPLIFT_NUMERATOR: u128 = 120;

/// Denominator of the gas price uplift.
pub const GAS_PRICE_UPLIFT_DENOMINATOR: u128 = 100;

/// Gas limit of a plain value transfer.
pub const NATIVE_TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Gas limit of an ERC-20 `transfer` call.
pub const TOKEN_TRANSFER_GAS_LIMIT: u64 = 100_000;

/// Apply the 20% uplift to a suggested gas price.
pub fn apply_uplift(suggested: u128) -> WalletResult<u128> {
    suggested
        .checked_mul(GAS_PRICE_UPLIFT_NUMERATOR)
        .map(|scaled| scaled / GAS_PRICE_UPLIFT_DENOMINATOR)
        .ok_or_else(|| {
            WalletError::Network(format!("suggested gas price {suggested} is out of range"))
        })
}

/// The fixed gas limit for a transfer kind.
pub fn fixed_gas_limit(kind: TransferKind) -> u64 {
    match kind {
        TransferKind::Native => NATIVE_TRANSFER_GAS_LIMIT,
        TransferKind::Token => TOKEN_TRANSFER_GAS_LIMIT,
    }
}

/// Network-dependent fields of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasQuote {
    pub nonce: u64,
    /// Uplifted gas price in wei
    pub gas_price: u128,
    pub chain_id: u64,
}

/// Reads nonce, gas price and chain id from the node.
pub struct GasPolicy<'a> {
    provider: &'a dyn ChainProvider,
}

impl<'a> GasPolicy<'a> {
    pub fn new(provider: &'a dyn ChainProvider) -> Self {
        Self { provider }
    }

    /// Fetch the pending nonce of `from`, the uplifted gas price and the chain id.
    ///
    /// Each call is bounded by `ctx`. The nonce is only valid while the
    /// caller holds the account's send lease.
    pub async fn quote(&self, from: Address, ctx: &RequestContext) -> WalletResult<GasQuote> {
        let nonce = ctx
            .guard("fetching nonce", self.provider.get_pending_nonce(from))
            .await?
            .map_err(|e| rpc_failure("failed to get nonce", e))?;

        let suggested = ctx
            .guard("fetching gas price", self.provider.suggest_gas_price())
            .await?
            .map_err(|e| rpc_failure("failed to get gas price", e))?;

        let chain_id = ctx
            .guard("fetching chain id", self.provider.get_chain_id())
            .await?
            .map_err(|e| rpc_failure("failed to get chain id", e))?;

        Ok(GasQuote {
            nonce,
            gas_price: apply_uplift(suggested)?,
            chain_id,
        })
    }

    /// Choose the gas limit for `request` according to `mode`.
    pub async fn gas_limit(
        &self,
        kind: TransferKind,
        request: &CallRequest,
        mode: GasLimitMode,
        ctx: &RequestContext,
    ) -> WalletResult<u64> {
        match mode {
            GasLimitMode::Fixed => Ok(fixed_gas_limit(kind)),
            GasLimitMode::Estimate => {
                let estimate = ctx
                    .guard("estimating gas", self.provider.estimate_gas(request))
                    .await?
                    .map_err(|e| rpc_failure("failed to estimate gas", e))?;

                tracing::debug!(?kind, estimate, "gas estimated");
                Ok(estimate)
            }
        }
    }
}

fn rpc_failure(action: &str, err: ChainError) -> WalletError {
    WalletError::Network(format!("{action}: {err}"))
}
