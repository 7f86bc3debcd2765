// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet service and send serialisation.

pub mod locks;
pub mod service;

pub use locks::{AccountLease, AccountLocks};
pub use service::{
    CreatedWallet, ProvisionedWallet, RecoveredWallet, ResealedWallet, SendReceipt, SendRequest,
    SendStage, WalletService,
};
