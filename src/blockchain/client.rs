// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ethereum JSON-RPC access.
//!
//! The pipeline only talks to the node through [`ChainProvider`]. The
//! production implementation wraps an alloy HTTP provider with the
//! recommended fillers disabled: nonce, gas and chain id are chosen by the
//! wallet, never by the provider.

use alloy::{
    primitives::{Address, Bytes, B256, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    transports::{RpcError, TransportErrorKind},
};
use async_trait::async_trait;
use url::Url;

/// Errors returned by a [`ChainProvider`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// Transport failure or unexpected response.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node answered with a JSON-RPC error. Carries the node's message.
    #[error("{0}")]
    Rejected(String),
}

impl From<RpcError<TransportErrorKind>> for ChainError {
    fn from(err: RpcError<TransportErrorKind>) -> Self {
        match err.as_error_resp() {
            Some(payload) => ChainError::Rejected(payload.message.to_string()),
            None => ChainError::Rpc(err.to_string()),
        }
    }
}

/// Read-only call or gas estimation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl CallRequest {
    fn into_transaction_request(self) -> TransactionRequest {
        let mut tx = TransactionRequest::default()
            .to(self.to)
            .value(self.value)
            .input(self.data.into());
        if let Some(from) = self.from {
            tx = tx.from(from);
        }
        tx
    }
}

/// The node operations the wallet needs.
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Native balance in wei at the latest block.
    async fn get_balance(&self, address: Address) -> Result<U256, ChainError>;

    /// Transaction count including the node's pending pool.
    async fn get_pending_nonce(&self, address: Address) -> Result<u64, ChainError>;

    /// The node's suggested legacy gas price in wei.
    async fn suggest_gas_price(&self) -> Result<u128, ChainError>;

    async fn get_chain_id(&self) -> Result<u64, ChainError>;

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError>;

    /// `eth_call` against the latest block.
    async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError>;

    /// Broadcast a signed, encoded transaction. Returns the node's hash.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, ChainError>;
}

/// [`ChainProvider`] backed by an alloy HTTP provider.
#[derive(Clone)]
pub struct RpcChainProvider {
    provider: DynProvider,
}

impl RpcChainProvider {
    /// Create a provider for `rpc_url`. No request is made until first use.
    pub fn new(rpc_url: Url) -> Self {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(rpc_url)
            .erased();
        Self { provider }
    }

    /// Parse `rpc_url` and create a provider.
    pub fn from_url_str(rpc_url: &str) -> Result<Self, ChainError> {
        let url: Url = rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))?;
        Ok(Self::new(url))
    }
}

#[async_trait]
impl ChainProvider for RpcChainProvider {
    async fn get_balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn get_pending_nonce(&self, address: Address) -> Result<u64, ChainError> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn suggest_gas_price(&self) -> Result<u128, ChainError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn get_chain_id(&self) -> Result<u64, ChainError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError> {
        self.provider
            .estimate_gas(request.clone().into_transaction_request())
            .await
            .map_err(ChainError::from)
    }

    async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError> {
        self.provider
            .call(request.clone().into_transaction_request())
            .await
            .map_err(ChainError::from)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, ChainError> {
        let pending = self.provider.send_raw_transaction(raw).await?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for RpcChainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcChainProvider").finish_non_exhaustive()
    }
}
