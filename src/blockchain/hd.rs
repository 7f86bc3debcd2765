// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Hierarchical deterministic wallet derivation (BIP-39 / BIP-32 / BIP-44).
//!
//! A 12-word English mnemonic (128 bits of entropy) is turned into a seed
//! with an empty passphrase, then walked along a [`DerivationPath`] to a
//! secp256k1 key. The seed and every intermediate copy of the phrase are
//! wiped on drop. The same `(mnemonic, path)` pair always yields the same
//! [`Keypair`], matching every other BIP-44 Ethereum wallet.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use coins_bip32::xkeys::{Parent, XPriv};
use k256::ecdsa::SigningKey;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::salt::random_bytes;
use crate::error::{WalletError, WalletResult};

/// Default Ethereum account path: purpose 44', coin 60', account 0', external chain, index 0.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Entropy of a freshly created mnemonic in bytes (128 bits, 12 words).
pub const MNEMONIC_ENTROPY_LEN: usize = 16;

const HARDENED_BIT: u32 = 0x8000_0000;

// =============================================================================
// Derivation paths
// =============================================================================

/// One step of a derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildIndex {
    index: u32,
    hardened: bool,
}

impl ChildIndex {
    /// A non-hardened index below 2^31.
    pub fn normal(index: u32) -> WalletResult<Self> {
        Self::checked(index, false)
    }

    /// A hardened index below 2^31 (written `index'`).
    pub fn hardened(index: u32) -> WalletResult<Self> {
        Self::checked(index, true)
    }

    fn checked(index: u32, hardened: bool) -> WalletResult<Self> {
        if index & HARDENED_BIT != 0 {
            return Err(WalletError::InvalidPath(format!(
                "index {index} is out of range (must be below 2^31)"
            )));
        }
        Ok(Self { index, hardened })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// The raw BIP-32 child number, with the hardened bit applied.
    pub fn child_number(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_BIT
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// An absolute derivation path such as `m/44'/60'/0'/0/0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// BIP-44 path `m/44'/coin'/account'/change/index`.
    pub fn bip44(coin_type: u32, account: u32, change: u32, index: u32) -> WalletResult<Self> {
        Ok(Self(vec![
            ChildIndex::hardened(44)?,
            ChildIndex::hardened(coin_type)?,
            ChildIndex::hardened(account)?,
            ChildIndex::normal(change)?,
            ChildIndex::normal(index)?,
        ]))
    }

    /// The fixed production path `m/44'/60'/0'/0/0`.
    pub fn ethereum_default() -> Self {
        Self(vec![
            ChildIndex { index: 44, hardened: true },
            ChildIndex { index: 60, hardened: true },
            ChildIndex { index: 0, hardened: true },
            ChildIndex { index: 0, hardened: false },
            ChildIndex { index: 0, hardened: false },
        ])
    }

    pub fn indices(&self) -> &[ChildIndex] {
        &self.0
    }
}

impl Default for DerivationPath {
    fn default() -> Self {
        Self::ethereum_default()
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    /// Parse `m/<i>[']/...`. Hardened steps may be marked with `'`, `h` or `H`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("m/")
            .ok_or_else(|| WalletError::InvalidPath(format!("`{s}` must start with `m/`")))?;

        let mut indices = Vec::new();
        for component in rest.split('/') {
            let (digits, hardened) = match component
                .strip_suffix('\'')
                .or_else(|| component.strip_suffix('h'))
                .or_else(|| component.strip_suffix('H'))
            {
                Some(digits) => (digits, true),
                None => (component, false),
            };

            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(WalletError::InvalidPath(format!(
                    "`{component}` is not a valid path component in `{s}`"
                )));
            }

            let index = digits.parse::<u32>().map_err(|_| {
                WalletError::InvalidPath(format!("`{component}` is out of range in `{s}`"))
            })?;
            indices.push(ChildIndex::checked(index, hardened)?);
        }

        Ok(Self(indices))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Mnemonic
// =============================================================================

/// A validated BIP-39 English mnemonic. Zeroized on drop.
pub struct Mnemonic(Zeroizing<String>);

impl Mnemonic {
    /// Validate a phrase (word list and checksum).
    ///
    /// Runs of whitespace are collapsed to single spaces; words are
    /// otherwise taken as given.
    pub fn parse(phrase: &str) -> WalletResult<Self> {
        let normalized = Zeroizing::new(phrase.split_whitespace().collect::<Vec<_>>().join(" "));

        Self::checked(&normalized).map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;

        Ok(Self(normalized))
    }

    fn checked(phrase: &str) -> Result<Zeroizing<bip39::Mnemonic>, bip39::Error> {
        bip39::Mnemonic::parse_in_normalized(bip39::Language::English, phrase).map(Zeroizing::new)
    }

    /// BIP-39 seed with an empty passphrase.
    fn seed(&self) -> WalletResult<Zeroizing<[u8; 64]>> {
        let mnemonic = Self::checked(&self.0)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
        Ok(Zeroizing::new(mnemonic.to_seed_normalized("")))
    }

    /// Create a new 12-word mnemonic from 128 bits of OS entropy.
    pub fn generate() -> WalletResult<Self> {
        let entropy = random_bytes(MNEMONIC_ENTROPY_LEN)?;
        let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
            .map(Zeroizing::new)
            .map_err(|e| WalletError::CryptoFailure(format!("mnemonic generation failed: {e}")))?;
        Ok(Self(Zeroizing::new(mnemonic.to_string())))
    }

    pub fn phrase(&self) -> &str {
        &self.0
    }

    pub fn word_count(&self) -> usize {
        self.0.split(' ').count()
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic([REDACTED; {} words])", self.word_count())
    }
}

// =============================================================================
// Keypair
// =============================================================================

/// Address and private key of one derived account.
///
/// The key lives inside alloy's signer and is never serialized or printed.
pub struct Keypair {
    address: Address,
    signer: PrivateKeySigner,
}

impl Keypair {
    /// Build a keypair from a raw 32-byte secp256k1 scalar.
    pub fn from_private_key(bytes: &[u8; 32]) -> WalletResult<Self> {
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|e| WalletError::CryptoFailure(format!("invalid private key: {e}")))?;
        Ok(Self::from_signer(PrivateKeySigner::from_signing_key(signing_key)))
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        Self {
            address: signer.address(),
            signer,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// EIP-55 checksummed address.
    pub fn address_checksummed(&self) -> String {
        self.address.to_checksum(None)
    }

    /// The private scalar. Wiped when the returned buffer is dropped.
    pub fn private_key(&self) -> Zeroizing<[u8; 32]> {
        let mut bytes = self.signer.credential().to_bytes();
        let mut out = Zeroizing::new([0u8; 32]);
        out.copy_from_slice(bytes.as_slice());
        bytes.as_mut_slice().zeroize();
        out
    }

    pub(crate) fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// Derivation
// =============================================================================

/// Create a new random 12-word mnemonic.
pub fn create_mnemonic() -> WalletResult<Mnemonic> {
    Mnemonic::generate()
}

/// Derive the keypair at `path` from `mnemonic` (empty BIP-39 passphrase).
pub fn derive_keypair(mnemonic: &Mnemonic, path: &DerivationPath) -> WalletResult<Keypair> {
    let seed = mnemonic.seed()?;
    let mut xpriv = XPriv::root_from_seed(seed.as_slice(), None)
        .map_err(|e| WalletError::CryptoFailure(format!("key derivation failed: {e}")))?;
    for child in path.indices() {
        xpriv = xpriv
            .derive_child(child.child_number())
            .map_err(|e| WalletError::CryptoFailure(format!("key derivation failed: {e}")))?;
    }

    let signing_key: &SigningKey = xpriv.as_ref();
    Ok(Keypair::from_signer(PrivateKeySigner::from_signing_key(
        signing_key.clone(),
    )))
}

/// Parse `phrase` and `path` and derive the keypair.
pub fn recover_keypair(phrase: &str, path: &str) -> WalletResult<Keypair> {
    let mnemonic = Mnemonic::parse(phrase)?;
    let path: DerivationPath = path.parse()?;
    derive_keypair(&mnemonic, &path)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    /// Hardhat / Anvil development mnemonic.
    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    #[test]
    fn default_path_matches_published_vector() {
        let mnemonic = Mnemonic::parse(TEST_MNEMONIC).unwrap();
        let keypair = derive_keypair(&mnemonic, &DerivationPath::ethereum_default()).unwrap();

        assert_eq!(
            keypair.address_checksummed(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(
            alloy::hex::encode(*keypair.private_key()),
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
        );
    }

    #[test]
    fn abandon_about_vector() {
        let keypair = recover_keypair(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
            DEFAULT_DERIVATION_PATH,
        )
        .unwrap();
        assert_eq!(
            keypair.address_checksummed(),
            "0x9858EfFD232B4033E47d90003D41EC34EcaEda94"
        );
    }

    #[test]
    fn seed_matches_bip39_vector() {
        let mnemonic = Mnemonic::parse(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
        )
        .unwrap();
        assert_eq!(
            alloy::hex::encode(*mnemonic.seed().unwrap()),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn second_index_matches_published_vector() {
        let keypair = recover_keypair(TEST_MNEMONIC, "m/44'/60'/0'/0/1").unwrap();
        assert_eq!(
            keypair.address_checksummed(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let mnemonic = create_mnemonic().unwrap();
        let path: DerivationPath = "m/44'/60'/3'/0/9".parse().unwrap();

        let a = derive_keypair(&mnemonic, &path).unwrap();
        let b = derive_keypair(&mnemonic, &path).unwrap();
        assert_eq!(a.address(), b.address());
        assert_eq!(*a.private_key(), *b.private_key());
    }

    fn mnemonic_from_entropy(entropy: &[u8]) -> Mnemonic {
        let phrase = bip39::Mnemonic::from_entropy(entropy).unwrap().to_string();
        Mnemonic::parse(&phrase).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn derivation_is_deterministic_for_any_path(
            entropy in proptest::array::uniform16(any::<u8>()),
            steps in proptest::collection::vec((0u32..HARDENED_BIT, any::<bool>()), 1..6),
        ) {
            let mnemonic = mnemonic_from_entropy(&entropy);
            let indices = steps
                .iter()
                .map(|&(index, hardened)| ChildIndex::checked(index, hardened).unwrap())
                .collect();
            let path = DerivationPath(indices);
            let reparsed: DerivationPath = path.to_string().parse().unwrap();
            prop_assert_eq!(&reparsed, &path);

            let a = derive_keypair(&mnemonic, &path).unwrap();
            let b = derive_keypair(&mnemonic, &reparsed).unwrap();
            prop_assert_eq!(a.address(), b.address());
            prop_assert_eq!(*a.private_key(), *b.private_key());
        }
    }

    #[test]
    fn generated_mnemonic_has_twelve_valid_words() {
        let mnemonic = create_mnemonic().unwrap();
        assert_eq!(mnemonic.word_count(), 12);
        assert!(Mnemonic::parse(mnemonic.phrase()).is_ok());
    }

    #[test]
    fn bad_checksum_is_invalid_mnemonic() {
        let err = Mnemonic::parse(
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon",
        )
        .unwrap_err();
        assert!(matches!(err, WalletError::InvalidMnemonic(_)));
    }

    #[test]
    fn unknown_word_is_invalid_mnemonic() {
        let err = Mnemonic::parse("test test test test test test test test test test test zzzz")
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidMnemonic(_)));
    }

    #[test]
    fn whitespace_is_normalized() {
        let mnemonic = Mnemonic::parse(
            "  test test test test test test\ttest test test test test   junk ",
        )
        .unwrap();
        assert_eq!(mnemonic.phrase(), TEST_MNEMONIC);
    }

    #[test]
    fn parses_and_prints_paths() {
        let path: DerivationPath = "m/44h/60H/0'/0/5".parse().unwrap();
        assert_eq!(path.to_string(), "m/44'/60'/0'/0/5");
        assert_eq!(path.indices()[0].child_number(), 0x8000_002C);
        assert_eq!(path.indices()[4].child_number(), 5);
        assert_eq!(
            DerivationPath::bip44(60, 0, 0, 0).unwrap(),
            DerivationPath::ethereum_default()
        );
    }

    #[test]
    fn malformed_paths_are_rejected() {
        for bad in [
            "",
            "m",
            "m/",
            "44'/60'/0'/0/0",
            "m/44''/60'",
            "m/44'/-1",
            "m/44'/60'//0",
            "m/44'/x/0",
            "m/2147483648",
            "m/99999999999",
        ] {
            let result: WalletResult<DerivationPath> = bad.parse();
            assert!(
                matches!(result, Err(WalletError::InvalidPath(_))),
                "`{bad}` should be rejected"
            );
        }
    }

    #[test]
    fn secrets_are_not_debug_printed() {
        let keypair = recover_keypair(TEST_MNEMONIC, DEFAULT_DERIVATION_PATH).unwrap();
        let printed = format!("{keypair:?}");
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("ac0974be"));

        let mnemonic = Mnemonic::parse(TEST_MNEMONIC).unwrap();
        assert_eq!(format!("{mnemonic:?}"), "Mnemonic([REDACTED; 12 words])");
    }

    #[test]
    fn keypair_from_private_key_matches_derived_address() {
        let derived = recover_keypair(TEST_MNEMONIC, DEFAULT_DERIVATION_PATH).unwrap();
        let rebuilt = Keypair::from_private_key(&derived.private_key()).unwrap();
        assert_eq!(rebuilt.address(), derived.address());
        assert!(Keypair::from_private_key(&[0u8; 32]).is_err());
    }
}
