// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error types shared by every stage of the wallet core.
//!
//! Variants never carry secret material. Provider messages are passed
//! through verbatim for rejected transactions so callers can surface them.

/// Broad failure classes used by calling layers to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed amount, address, derivation path, mnemonic or PIN.
    InvalidInput,
    /// The PIN-derived key failed to open the sealed mnemonic.
    AuthenticationFailure,
    /// Internal derivation or signing failure. Unexpected and fatal.
    CryptoFailure,
    /// RPC unreachable, timed out, cancelled or returned a non-success response.
    NetworkFailure,
    /// The network refused the signed transaction.
    Rejected,
    /// Invalid deployment configuration.
    Configuration,
}

/// Errors produced by the wallet core.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid PIN input: {0}")]
    InvalidPin(String),

    #[error("Authentication failed")]
    AuthenticationFailure,

    #[error("Crypto failure: {0}")]
    CryptoFailure(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Network call timed out while {0}")]
    Timeout(&'static str),

    #[error("Request cancelled while {0}")]
    Cancelled(&'static str),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalletError {
    /// Classify this error into one of the core failure classes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_)
            | Self::InvalidAddress(_)
            | Self::InvalidPath(_)
            | Self::InvalidMnemonic(_)
            | Self::InvalidPin(_) => ErrorKind::InvalidInput,
            Self::AuthenticationFailure => ErrorKind::AuthenticationFailure,
            Self::CryptoFailure(_) => ErrorKind::CryptoFailure,
            Self::Network(_) | Self::Timeout(_) | Self::Cancelled(_) => ErrorKind::NetworkFailure,
            Self::InsufficientFunds(_) | Self::Rejected(_) => ErrorKind::Rejected,
            Self::Config(_) => ErrorKind::Configuration,
        }
    }

    /// True when nothing was sent to the network before the failure.
    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}

/// Result alias used throughout the crate.
pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            WalletError::InvalidAmount("abc".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            WalletError::InvalidPath("m/x".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            WalletError::AuthenticationFailure.kind(),
            ErrorKind::AuthenticationFailure
        );
        assert_eq!(
            WalletError::Timeout("fetching nonce").kind(),
            ErrorKind::NetworkFailure
        );
        assert_eq!(
            WalletError::InsufficientFunds("insufficient funds for gas".into()).kind(),
            ErrorKind::Rejected
        );
        assert_eq!(
            WalletError::CryptoFailure("bad scalar".into()).kind(),
            ErrorKind::CryptoFailure
        );
    }

    #[test]
    fn authentication_failure_message_is_opaque() {
        assert_eq!(
            WalletError::AuthenticationFailure.to_string(),
            "Authentication failed"
        );
    }

    #[test]
    fn rejected_message_is_verbatim() {
        let err = WalletError::Rejected("nonce too low".into());
        assert_eq!(err.to_string(), "Transaction rejected: nonce too low");
        assert!(!err.is_invalid_input());
    }
}
