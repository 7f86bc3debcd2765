// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational PIN Wallet - PIN-sealed HD wallet core
//!
//! This crate keeps a user's BIP-39 mnemonic sealed behind a short PIN and
//! builds, signs and broadcasts native and ERC-20 transfers for the account
//! derived from it.
//!
//! ## Modules
//!
//! - `crypto` - scrypt key derivation, AES-256-GCM sealing, salts
//! - `blockchain` - HD derivation, gas policy, transaction build/sign/submit
//! - `wallet` - the send pipeline and per-account nonce serialisation
//! - `config` - explicit runtime configuration
//! - `telemetry` - tracing subscriber setup
//!
//! HTTP routing, sessions and persistence live with the caller. The core
//! receives the sealed mnemonic and the PIN as arguments and never keeps
//! decrypted material beyond a single call.

pub mod blockchain;
pub mod config;
pub mod context;
pub mod crypto;
pub mod error;
pub mod telemetry;
pub mod wallet;

pub use config::{GasLimitMode, TokenConfig, WalletConfig};
pub use context::RequestContext;
pub use error::{ErrorKind, WalletError, WalletResult};
pub use wallet::{SendReceipt, SendRequest, WalletService};
