// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sealing and opening the mnemonic with a PIN.
//!
//! The AES key is `scrypt(pin || account_salt, "")`. The per-account salt is
//! mixed into the password rather than used as the scrypt salt, so wallets
//! sealed before per-account salts existed (empty salt) open with the same
//! PIN. The sealed form is `base64(nonce || ciphertext || tag)`.

use base64ct::{Base64, Encoding};
use zeroize::Zeroizing;

use super::cipher;
use super::kdf::{DerivedKey, KeyDerivation};
use crate::blockchain::hd::Mnemonic;
use crate::error::{WalletError, WalletResult};

/// Seals mnemonics under a PIN-derived key.
#[derive(Debug, Clone, Copy)]
pub struct PinVault {
    kdf: KeyDerivation,
}

impl PinVault {
    pub fn new(kdf: KeyDerivation) -> Self {
        Self { kdf }
    }

    /// Vault using the production scrypt parameters.
    pub fn production() -> WalletResult<Self> {
        Ok(Self::new(KeyDerivation::production()?))
    }

    /// Derive the sealing key for `pin` and the account's salt.
    pub fn pin_key(&self, pin: &str, account_salt: &str) -> WalletResult<DerivedKey> {
        if pin.is_empty() {
            return Err(WalletError::InvalidPin("PIN must not be empty".to_string()));
        }

        let mut secret = Zeroizing::new(Vec::with_capacity(pin.len() + account_salt.len()));
        secret.extend_from_slice(pin.as_bytes());
        secret.extend_from_slice(account_salt.as_bytes());

        self.kdf.derive(&secret, b"")
    }

    /// Seal `mnemonic` and return the base64 blob to persist.
    pub fn seal(&self, pin: &str, account_salt: &str, mnemonic: &Mnemonic) -> WalletResult<String> {
        let key = self.pin_key(pin, account_salt)?;
        let blob = cipher::encrypt(&key, mnemonic.phrase().as_bytes())?;
        Ok(Base64::encode_string(&blob))
    }

    /// Open a sealed mnemonic.
    ///
    /// A wrong PIN, wrong salt, tampered blob or undecodable blob all return
    /// [`WalletError::AuthenticationFailure`]. The key is always derived
    /// first so every failure costs one full scrypt run.
    pub fn open(&self, pin: &str, account_salt: &str, sealed: &str) -> WalletResult<Mnemonic> {
        let key = self.pin_key(pin, account_salt)?;

        let blob = Base64::decode_vec(sealed.trim()).map_err(|_| WalletError::AuthenticationFailure)?;
        let plaintext = cipher::decrypt(&key, &blob)?;

        let phrase = std::str::from_utf8(&plaintext).map_err(|_| {
            WalletError::CryptoFailure("sealed mnemonic is not valid UTF-8".to_string())
        })?;

        Mnemonic::parse(phrase).map_err(|_| {
            WalletError::CryptoFailure("sealed mnemonic is not a valid phrase".to_string())
        })
    }

    /// Re-seal under a new PIN and/or salt. The old PIN must open the blob.
    pub fn reseal(
        &self,
        old_pin: &str,
        old_salt: &str,
        sealed: &str,
        new_pin: &str,
        new_salt: &str,
    ) -> WalletResult<String> {
        let mnemonic = self.open(old_pin, old_salt, sealed)?;
        self.seal(new_pin, new_salt, &mnemonic)
    }
}
