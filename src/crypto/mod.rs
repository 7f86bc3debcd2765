// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! PIN-based protection of the wallet mnemonic.
//!
//! - `kdf` - scrypt key derivation from PIN material
//! - `cipher` - AES-256-GCM sealing with random 96-bit nonces
//! - `salt` - OS-entropy salts and nonces
//! - `vault` - the combination used to seal and open a mnemonic

pub mod cipher;
pub mod kdf;
pub mod salt;
pub mod vault;

pub use kdf::{DerivedKey, KdfParams, KeyDerivation};
pub use salt::{generate_account_salt, generate_salt, ACCOUNT_SALT_LEN};
pub use vault::PinVault;
