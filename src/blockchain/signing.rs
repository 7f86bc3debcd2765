// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EIP-155 transaction signing.
//!
//! Transactions are signed as legacy transactions with the chain id mixed
//! into the signing hash, so a signature is only valid on its own chain.
//! ECDSA nonces are RFC 6979 deterministic: the same transaction and key
//! always produce the same bytes.

use alloy::{
    consensus::{SignableTransaction, TxEnvelope},
    eips::eip2718::Encodable2718,
    primitives::{keccak256, Signature, B256, U256},
    signers::SignerSync,
};

use super::hd::Keypair;
use super::transactions::UnsignedTransaction;
use crate::error::{WalletError, WalletResult};

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    unsigned: UnsignedTransaction,
    signature: Signature,
    hash: B256,
    raw: Vec<u8>,
}

impl SignedTransaction {
    pub fn unsigned(&self) -> &UnsignedTransaction {
        &self.unsigned
    }

    /// RLP encoding as accepted by `eth_sendRawTransaction`.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// keccak256 of the raw encoding.
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// `0x`-prefixed lowercase transaction hash.
    pub fn tx_hash_hex(&self) -> String {
        format!("{:#x}", self.hash)
    }

    /// EIP-155 `v`: `chain_id * 2 + 35 + y_parity`.
    pub fn v(&self) -> u128 {
        u128::from(self.unsigned.chain_id) * 2 + 35 + u128::from(self.signature.v())
    }

    pub fn r(&self) -> U256 {
        self.signature.r()
    }

    pub fn s(&self) -> U256 {
        self.signature.s()
    }
}

/// Signs unsigned transactions with a derived key.
pub struct TransactionSigner;

impl TransactionSigner {
    /// Sign `tx` for `chain_id`.
    ///
    /// # Errors
    /// [`WalletError::CryptoFailure`] when `chain_id` differs from the chain
    /// id the transaction was built for, or the signer fails.
    pub fn sign(
        tx: &UnsignedTransaction,
        keypair: &Keypair,
        chain_id: u64,
    ) -> WalletResult<SignedTransaction> {
        if tx.chain_id != chain_id {
            return Err(WalletError::CryptoFailure(format!(
                "transaction built for chain {} cannot be signed for chain {chain_id}",
                tx.chain_id
            )));
        }

        let legacy = tx.to_legacy();
        let signing_hash = legacy.signature_hash();
        let signature = keypair
            .signer()
            .sign_hash_sync(&signing_hash)
            .map_err(|e| WalletError::CryptoFailure(format!("signing failed: {e}")))?;

        let envelope = TxEnvelope::from(legacy.into_signed(signature));
        let raw = envelope.encoded_2718();
        let hash = keccak256(&raw);

        Ok(SignedTransaction {
            unsigned: tx.clone(),
            signature,
            hash,
            raw,
        })
    }
}
