// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Random salts and nonces from the operating system's CSPRNG.
//!
//! There is no fallback source: if the OS cannot provide entropy the call
//! fails with [`WalletError::CryptoFailure`].

use base64ct::{Base64, Encoding};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};

/// Length of the per-account salt in bytes.
pub const ACCOUNT_SALT_LEN: usize = 16;

/// Fill a fresh buffer of `len` bytes from the OS entropy source.
pub fn random_bytes(len: usize) -> WalletResult<Zeroizing<Vec<u8>>> {
    let mut bytes = Zeroizing::new(vec![0u8; len]);
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| WalletError::CryptoFailure(format!("OS entropy source unavailable: {e}")))?;
    Ok(bytes)
}

/// Generate `length` random bytes and return them base64-encoded.
pub fn generate_salt(length: usize) -> WalletResult<String> {
    let bytes = random_bytes(length)?;
    Ok(Base64::encode_string(&bytes))
}

/// Generate a new 16-byte account salt.
pub fn generate_account_salt() -> WalletResult<String> {
    generate_salt(ACCOUNT_SALT_LEN)
}
