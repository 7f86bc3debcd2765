// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-account send serialisation.
//!
//! A send reads the pending nonce and later broadcasts a transaction using
//! it. Two sends from the same account must not interleave between those
//! points, or both read the same nonce and the second broadcast is
//! rejected. [`AccountLocks`] hands out one lease per account; holders of
//! leases for different accounts do not wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::primitives::Address;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type AccountSlot = Arc<AsyncMutex<()>>;

/// Registry of per-account send locks.
#[derive(Debug, Clone, Default)]
pub struct AccountLocks {
    slots: Arc<Mutex<HashMap<Address, AccountSlot>>>,
}

/// Exclusive right to send from one account. Released on drop.
#[derive(Debug)]
pub struct AccountLease {
    address: Address,
    _guard: OwnedMutexGuard<()>,
}

impl AccountLease {
    pub fn address(&self) -> Address {
        self.address
    }
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lease for `address`.
    ///
    /// Waiters are served in FIFO order.
    pub async fn acquire(&self, address: Address) -> AccountLease {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|p| p.into_inner());
            // Drop slots nobody holds or waits on.
            slots.retain(|addr, slot| *addr == address || Arc::strong_count(slot) > 1);
            slots.entry(address).or_default().clone()
        };

        AccountLease {
            address,
            _guard: slot.lock_owned().await,
        }
    }

    /// Number of accounts with a live slot.
    pub fn tracked_accounts(&self) -> usize {
        self.slots.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}
