// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use super::transactions::format_amount;
use crate::error::{WalletError, WalletResult};

/// Decimals of the native currency (ETH, wei).
pub const NATIVE_DECIMALS: u8 = 18;

/// Display symbol of the native currency.
pub const NATIVE_SYMBOL: &str = "ETH";

/// Decimals assumed for the token when none are configured (USDC).
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

/// Largest decimal count whose scale factor fits in a U256.
pub const MAX_DECIMALS: u8 = 77;

/// Parse a `0x`-prefixed 20-byte hex address.
///
/// All-lowercase and all-uppercase hex are accepted as is. Mixed case must
/// carry a valid EIP-55 checksum.
pub fn parse_address(address: &str) -> WalletResult<Address> {
    if !address.starts_with("0x") {
        return Err(WalletError::InvalidAddress(
            "Address must start with 0x".to_string(),
        ));
    }
    if address.len() != 42 {
        return Err(WalletError::InvalidAddress(
            "Address must be 42 characters (0x + 40 hex)".to_string(),
        ));
    }

    let hex = &address[2..];
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidAddress(
            "Address must contain only hex characters".to_string(),
        ));
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(address, None)
            .map_err(|_| WalletError::InvalidAddress("Address checksum mismatch".to_string()));
    }

    Address::from_str(address).map_err(|e| WalletError::InvalidAddress(e.to_string()))
}

/// Parse a transfer recipient. The zero address is refused.
pub fn parse_recipient(address: &str) -> WalletResult<Address> {
    let parsed = parse_address(address)?;
    if parsed.is_zero() {
        return Err(WalletError::InvalidAddress(
            "Refusing to send to the zero address".to_string(),
        ));
    }
    Ok(parsed)
}

/// Balance of one asset held by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Asset symbol (e.g., "ETH", "USDC")
    pub symbol: String,
    /// Balance in smallest unit (wei for native, token units for ERC-20)
    pub balance_raw: String,
    /// Balance formatted with decimals
    pub balance_formatted: String,
    /// Number of decimals
    pub decimals: u8,
    /// Contract address (None for native currency)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
}

impl Balance {
    /// Native currency balance in wei.
    pub fn native(wei: U256) -> Self {
        Self {
            symbol: NATIVE_SYMBOL.to_string(),
            balance_raw: wei.to_string(),
            balance_formatted: format_amount(wei, NATIVE_DECIMALS),
            decimals: NATIVE_DECIMALS,
            contract_address: None,
        }
    }

    /// Token balance in the token's smallest unit.
    pub fn token(symbol: &str, contract: Address, decimals: u8, units: U256) -> Self {
        Self {
            symbol: symbol.to_string(),
            balance_raw: units.to_string(),
            balance_formatted: format_amount(units, decimals),
            decimals,
            contract_address: Some(contract.to_checksum(None)),
        }
    }
}
