// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AES-256-GCM sealing.
//!
//! Blob layout: `nonce (12) ‖ ciphertext ‖ tag (16)`. A fresh random nonce
//! is drawn for every call. Any tag mismatch (wrong key, wrong PIN,
//! truncated or altered data) is reported as
//! [`WalletError::AuthenticationFailure`] and nothing of the plaintext is
//! returned.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use zeroize::Zeroizing;

use super::kdf::DerivedKey;
use super::salt::random_bytes;
use crate::error::{WalletError, WalletResult};

/// AES-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

fn cipher_for(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypt `plaintext` under `key`, returning `nonce ‖ ciphertext ‖ tag`.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> WalletResult<Vec<u8>> {
    let nonce = random_bytes(NONCE_LEN)?;

    let sealed = cipher_for(key)
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| WalletError::CryptoFailure("AES-GCM encryption failed".to_string()))?;

    let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&sealed);
    Ok(blob)
}

/// Decrypt a `nonce ‖ ciphertext ‖ tag` blob.
pub fn decrypt(key: &DerivedKey, blob: &[u8]) -> WalletResult<Zeroizing<Vec<u8>>> {
    if blob.len() < NONCE_LEN + TAG_LEN {
        return Err(WalletError::AuthenticationFailure);
    }

    let (nonce, sealed) = blob.split_at(NONCE_LEN);
    cipher_for(key)
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map(Zeroizing::new)
        .map_err(|_| WalletError::AuthenticationFailure)
}
