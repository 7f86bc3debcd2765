// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer intents and unsigned transaction assembly.
//!
//! Everything here is pure: amounts and addresses are validated into a
//! [`TransferIntent`] before the pipeline touches the network, and
//! [`TransactionBuilder`] combines an intent with a [`GasQuote`] into the
//! legacy transaction that gets signed.

use alloy::{
    consensus::TxLegacy,
    primitives::{Address, Bytes, TxKind, U256},
};

use super::client::CallRequest;
use super::erc20::encode_transfer;
use super::gas::GasQuote;
use super::types::{parse_recipient, MAX_DECIMALS, NATIVE_DECIMALS};
use crate::config::TokenConfig;
use crate::error::{WalletError, WalletResult};

/// Which asset a transfer moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// Native currency (ETH)
    Native,
    /// The configured ERC-20 token
    Token,
}

/// A validated transfer request. Amounts are in the asset's smallest unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferIntent {
    Native {
        to: Address,
        value: U256,
    },
    Token {
        contract: Address,
        to: Address,
        amount: U256,
    },
}

impl TransferIntent {
    /// Validate a native transfer of `amount` ETH to `to`.
    pub fn native(to: &str, amount: &str) -> WalletResult<Self> {
        let value = parse_amount(amount, NATIVE_DECIMALS)?;
        let to = parse_recipient(to)?;
        Ok(Self::Native { to, value })
    }

    /// Validate a token transfer of `amount` whole tokens to `to`.
    pub fn token(to: &str, amount: &str, token: &TokenConfig) -> WalletResult<Self> {
        let amount = parse_amount(amount, token.decimals)?;
        let to = parse_recipient(to)?;
        Ok(Self::Token {
            contract: token.contract_address,
            to,
            amount,
        })
    }

    pub fn kind(&self) -> TransferKind {
        match self {
            Self::Native { .. } => TransferKind::Native,
            Self::Token { .. } => TransferKind::Token,
        }
    }

    /// The account receiving the funds (not the token contract).
    pub fn recipient(&self) -> Address {
        match self {
            Self::Native { to, .. } | Self::Token { to, .. } => *to,
        }
    }

    /// The `eth_estimateGas` request for this transfer sent from `from`.
    pub fn call_request(&self, from: Address) -> CallRequest {
        match self {
            Self::Native { to, value } => CallRequest {
                from: Some(from),
                to: *to,
                value: *value,
                data: Bytes::new(),
            },
            Self::Token {
                contract,
                to,
                amount,
            } => CallRequest {
                from: Some(from),
                to: *contract,
                value: U256::ZERO,
                data: encode_transfer(*to, *amount),
            },
        }
    }
}

/// A fully specified, unsigned legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub nonce: u64,
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub data: Bytes,
    pub chain_id: u64,
}

impl UnsignedTransaction {
    /// The EIP-155 legacy transaction (chain id included in the signing hash).
    pub fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value,
            input: self.data.clone(),
        }
    }
}

/// Assembles unsigned transactions from intents and gas quotes.
pub struct TransactionBuilder;

impl TransactionBuilder {
    pub fn build(intent: &TransferIntent, quote: &GasQuote, gas_limit: u64) -> UnsignedTransaction {
        match intent {
            TransferIntent::Native { to, value } => {
                Self::native_transfer(*to, *value, quote, gas_limit)
            }
            TransferIntent::Token {
                contract,
                to,
                amount,
            } => Self::token_transfer(*contract, *to, *amount, quote, gas_limit),
        }
    }

    /// Plain value transfer with empty data.
    pub fn native_transfer(
        to: Address,
        value_wei: U256,
        quote: &GasQuote,
        gas_limit: u64,
    ) -> UnsignedTransaction {
        UnsignedTransaction {
            nonce: quote.nonce,
            to,
            value: value_wei,
            gas_limit,
            gas_price: quote.gas_price,
            data: Bytes::new(),
            chain_id: quote.chain_id,
        }
    }

    /// ERC-20 `transfer(to, amount)` call addressed to `contract`, with zero value.
    pub fn token_transfer(
        contract: Address,
        to: Address,
        amount: U256,
        quote: &GasQuote,
        gas_limit: u64,
    ) -> UnsignedTransaction {
        UnsignedTransaction {
            nonce: quote.nonce,
            to: contract,
            value: U256::ZERO,
            gas_limit,
            gas_price: quote.gas_price,
            data: encode_transfer(to, amount),
            chain_id: quote.chain_id,
        }
    }
}

/// Parse a human-readable amount to wei (or token units).
///
/// Accepts `digits` or `digits.digits` only. Fractional digits beyond
/// `decimals` are truncated.
///
/// # Errors
/// [`WalletError::InvalidAmount`] for anything else, including overflow.
pub fn parse_amount(amount: &str, decimals: u8) -> WalletResult<U256> {
    if decimals > MAX_DECIMALS {
        return Err(WalletError::InvalidAmount(format!(
            "Unsupported decimal count {decimals}"
        )));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (amount, None),
    };

    if !is_digits(whole) {
        return Err(WalletError::InvalidAmount(format!(
            "`{amount}` is not a decimal number"
        )));
    }
    if let Some(fraction) = fraction {
        if !is_digits(fraction) {
            return Err(WalletError::InvalidAmount(format!(
                "`{amount}` is not a decimal number"
            )));
        }
    }

    let overflow = || WalletError::InvalidAmount(format!("`{amount}` is too large"));

    let whole_units = U256::from_str_radix(whole, 10).map_err(|_| overflow())?;

    let width = decimals as usize;
    let fraction_units = match fraction {
        Some(fraction) if width > 0 => {
            let kept = &fraction[..fraction.len().min(width)];
            let padded = format!("{kept:0<width$}");
            U256::from_str_radix(&padded, 10).map_err(|_| overflow())?
        }
        _ => U256::ZERO,
    };

    let scale = U256::from(10u64).pow(U256::from(decimals));
    whole_units
        .checked_mul(scale)
        .and_then(|w| w.checked_add(fraction_units))
        .ok_or_else(overflow)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Format wei (or token units) to human-readable amount.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        return whole.to_string();
    }

    let decimal_str = format!(
        "{:0>width$}",
        remainder.to_string(),
        width = decimals as usize
    );
    format!("{}.{}", whole, decimal_str.trim_end_matches('0'))
}
