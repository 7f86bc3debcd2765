// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! scrypt key derivation for PIN-sealed secrets.
//!
//! PINs carry very little entropy, so the derivation is deliberately
//! memory-hard: N = 16384, r = 8, p = 1 with a 32-byte output (AES-256 key
//! size). Parameters are validated once when a [`KeyDerivation`] is built;
//! a bad combination is a deployment error and never depends on user input.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{WalletError, WalletResult};

/// log2 of the scrypt CPU/memory cost N (N = 16384).
pub const SCRYPT_LOG_N: u8 = 14;

/// scrypt block size r.
pub const SCRYPT_R: u32 = 8;

/// scrypt parallelism p.
pub const SCRYPT_P: u32 = 1;

/// Length of the derived key in bytes.
pub const KEY_LEN: usize = 32;

/// 256-bit symmetric key. Zeroized on drop, never cloned or printed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// scrypt cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: SCRYPT_LOG_N,
            r: SCRYPT_R,
            p: SCRYPT_P,
        }
    }
}

/// Validated scrypt instance.
#[derive(Debug, Clone, Copy)]
pub struct KeyDerivation {
    params: scrypt::Params,
}

impl KeyDerivation {
    /// Validate `params` and build the derivation.
    ///
    /// # Errors
    /// [`WalletError::Config`] when scrypt rejects the combination.
    pub fn new(params: KdfParams) -> WalletResult<Self> {
        let params = scrypt::Params::new(params.log_n, params.r, params.p, KEY_LEN)
            .map_err(|e| WalletError::Config(format!("invalid scrypt parameters: {e}")))?;
        Ok(Self { params })
    }

    /// The production parameters (N = 16384, r = 8, p = 1).
    pub fn production() -> WalletResult<Self> {
        Self::new(KdfParams::default())
    }

    /// Derive a 32-byte key. Same `(password, salt)` always gives the same key.
    pub fn derive(&self, password: &[u8], salt: &[u8]) -> WalletResult<DerivedKey> {
        let mut output = [0u8; KEY_LEN];
        scrypt::scrypt(password, salt, &self.params, &mut output)
            .map_err(|e| WalletError::CryptoFailure(format!("scrypt derivation failed: {e}")))?;

        let key = DerivedKey(output);
        output.zeroize();
        Ok(key)
    }
}
