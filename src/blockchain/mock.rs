// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory [`ChainProvider`] for tests.
//!
//! Tracks a single account's nonce the way a node does: a submission is
//! accepted only when its nonce equals the next expected one, otherwise it
//! is rejected with the node's usual message.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use alloy::{
    consensus::TxEnvelope,
    eips::eip2718::Decodable2718,
    primitives::{Address, Bytes, TxKind, B256, U256},
    sol_types::SolValue,
};
use async_trait::async_trait;

use super::client::{CallRequest, ChainError, ChainProvider};

/// A transaction the mock accepted.
#[derive(Debug, Clone)]
pub struct SubmittedTx {
    pub nonce: u64,
    pub to: Address,
    pub value: U256,
    pub input: Bytes,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub chain_id: Option<u64>,
    pub hash: B256,
}

#[derive(Debug, Default)]
struct MockState {
    next_nonce: u64,
    submitted: Vec<SubmittedTx>,
    rejected: Vec<String>,
}

#[derive(Debug)]
pub struct MockChainProvider {
    chain_id: u64,
    gas_price: u128,
    balance: U256,
    token_balance: U256,
    estimate: u64,
    nonce_delay: Duration,
    fail_nonce: Option<ChainError>,
    submit_error: Option<ChainError>,
    calls: AtomicUsize,
    state: Mutex<MockState>,
}

impl Default for MockChainProvider {
    fn default() -> Self {
        Self {
            chain_id: 1,
            gas_price: 100,
            balance: U256::ZERO,
            token_balance: U256::ZERO,
            estimate: 21_000,
            nonce_delay: Duration::ZERO,
            fail_nonce: None,
            submit_error: None,
            calls: AtomicUsize::new(0),
            state: Mutex::new(MockState::default()),
        }
    }
}

impl MockChainProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_token_balance(mut self, balance: U256) -> Self {
        self.token_balance = balance;
        self
    }

    pub fn with_estimate(mut self, gas: u64) -> Self {
        self.estimate = gas;
        self
    }

    pub fn with_next_nonce(self, nonce: u64) -> Self {
        self.lock().next_nonce = nonce;
        self
    }

    /// Delay every nonce lookup, widening the read-to-submit window.
    pub fn with_nonce_delay(mut self, delay: Duration) -> Self {
        self.nonce_delay = delay;
        self
    }

    pub fn with_nonce_error(mut self, err: ChainError) -> Self {
        self.fail_nonce = Some(err);
        self
    }

    pub fn with_submit_error(mut self, err: ChainError) -> Self {
        self.submit_error = Some(err);
        self
    }

    /// Number of provider methods invoked so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<SubmittedTx> {
        self.lock().submitted.clone()
    }

    pub fn rejected(&self) -> Vec<String> {
        self.lock().rejected.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn decode(raw: &[u8]) -> Result<SubmittedTx, ChainError> {
        let envelope = TxEnvelope::decode_2718(&mut &raw[..])
            .map_err(|e| ChainError::Rejected(format!("rlp: {e}")))?;
        let signed = envelope
            .as_legacy()
            .ok_or_else(|| ChainError::Rejected("only legacy transactions accepted".into()))?;
        let tx = signed.tx();
        let to = match tx.to {
            TxKind::Call(to) => to,
            TxKind::Create => return Err(ChainError::Rejected("contract creation".into())),
        };

        Ok(SubmittedTx {
            nonce: tx.nonce,
            to,
            value: tx.value,
            input: tx.input.clone(),
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            chain_id: tx.chain_id,
            hash: *signed.hash(),
        })
    }
}

#[async_trait]
impl ChainProvider for MockChainProvider {
    async fn get_balance(&self, _address: Address) -> Result<U256, ChainError> {
        self.record_call();
        Ok(self.balance)
    }

    async fn get_pending_nonce(&self, _address: Address) -> Result<u64, ChainError> {
        self.record_call();
        // The node answers with the nonce as of the request; the delay
        // models response latency.
        let nonce = self.lock().next_nonce;
        if !self.nonce_delay.is_zero() {
            tokio::time::sleep(self.nonce_delay).await;
        }
        match &self.fail_nonce {
            Some(err) => Err(err.clone()),
            None => Ok(nonce),
        }
    }

    async fn suggest_gas_price(&self) -> Result<u128, ChainError> {
        self.record_call();
        Ok(self.gas_price)
    }

    async fn get_chain_id(&self) -> Result<u64, ChainError> {
        self.record_call();
        Ok(self.chain_id)
    }

    async fn estimate_gas(&self, _request: &CallRequest) -> Result<u64, ChainError> {
        self.record_call();
        Ok(self.estimate)
    }

    async fn call(&self, _request: &CallRequest) -> Result<Bytes, ChainError> {
        self.record_call();
        Ok(self.token_balance.abi_encode().into())
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, ChainError> {
        self.record_call();
        if let Some(err) = &self.submit_error {
            return Err(err.clone());
        }

        let tx = Self::decode(raw)?;
        let mut state = self.lock();
        if tx.nonce != state.next_nonce {
            let message = if tx.nonce < state.next_nonce {
                "nonce too low"
            } else {
                "nonce too high"
            };
            state.rejected.push(message.to_string());
            return Err(ChainError::Rejected(message.to_string()));
        }

        state.next_nonce += 1;
        let hash = tx.hash;
        state.submitted.push(tx);
        Ok(hash)
    }
}
