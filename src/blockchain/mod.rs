// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ethereum integration.
//!
//! This module provides functionality for:
//! - BIP-39/BIP-44 account derivation
//! - Nonce and gas price selection
//! - Native and ERC-20 transfer building
//! - EIP-155 signing and broadcasting
//! - Native and ERC-20 balance queries

pub mod client;
pub mod erc20;
pub mod gas;
pub mod hd;
pub mod signing;
pub mod submit;
pub mod transactions;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{CallRequest, ChainError, ChainProvider, RpcChainProvider};
pub use gas::{GasPolicy, GasQuote};
pub use hd::{DerivationPath, Keypair, Mnemonic};
pub use signing::{SignedTransaction, TransactionSigner};
pub use submit::TransactionSubmitter;
pub use transactions::{TransactionBuilder, TransferIntent, TransferKind, UnsignedTransaction};
pub use types::*;
