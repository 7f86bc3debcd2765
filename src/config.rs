// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! The wallet core takes an explicit [`WalletConfig`] at construction time.
//! Nothing is read from process-wide state after that. [`WalletConfig::from_env`]
//! is a convenience for binaries that configure themselves from the
//! environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RPC_URL` | JSON-RPC endpoint of the Ethereum node gateway | Required |
//! | `TOKEN_CONTRACT_ADDRESS` | ERC-20 contract used for token transfers | Required |
//! | `TOKEN_DECIMALS` | Decimal places of the token | `6` |
//! | `TOKEN_SYMBOL` | Display symbol of the token | `USDC` |
//! | `RPC_TIMEOUT_SECS` | Default per-request deadline for RPC calls | `30` |
//! | `GAS_LIMIT_MODE` | `fixed` (21000 / 100000) or `estimate` | `fixed` |
//! | `DERIVATION_PATH` | Account derivation path | `m/44'/60'/0'/0/0` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,relational_pin_wallet=debug` |

use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use url::Url;

use crate::blockchain::hd::DerivationPath;
use crate::blockchain::types::{parse_address, DEFAULT_TOKEN_DECIMALS, MAX_DECIMALS};
use crate::error::{WalletError, WalletResult};

/// Environment variable name for the node RPC endpoint.
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Environment variable name for the ERC-20 contract address.
///
/// Token contracts differ per network, so there is no built-in default.
pub const TOKEN_CONTRACT_ADDRESS_ENV: &str = "TOKEN_CONTRACT_ADDRESS";

/// Environment variable name for the token's decimal count.
pub const TOKEN_DECIMALS_ENV: &str = "TOKEN_DECIMALS";

/// Environment variable name for the token's display symbol.
pub const TOKEN_SYMBOL_ENV: &str = "TOKEN_SYMBOL";

/// Environment variable name for the default RPC deadline in seconds.
pub const RPC_TIMEOUT_SECS_ENV: &str = "RPC_TIMEOUT_SECS";

/// Environment variable name for the gas limit strategy.
pub const GAS_LIMIT_MODE_ENV: &str = "GAS_LIMIT_MODE";

/// Environment variable name for the account derivation path.
pub const DERIVATION_PATH_ENV: &str = "DERIVATION_PATH";

/// Default RPC deadline.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Default token display symbol.
pub const DEFAULT_TOKEN_SYMBOL: &str = "USDC";

/// How the gas limit of a transfer is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GasLimitMode {
    /// Fixed limits: 21000 for native transfers, 100000 for token transfers.
    #[default]
    Fixed,
    /// Ask the node to estimate the limit for the exact call.
    Estimate,
}

impl FromStr for GasLimitMode {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "estimate" => Ok(Self::Estimate),
            other => Err(WalletError::Config(format!(
                "{GAS_LIMIT_MODE_ENV} must be `fixed` or `estimate`, got `{other}`"
            ))),
        }
    }
}

/// ERC-20 token used for token transfers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenConfig {
    /// Display symbol (e.g. "USDC")
    pub symbol: String,
    /// Contract address
    pub contract_address: Address,
    /// Number of decimals
    pub decimals: u8,
}

impl TokenConfig {
    /// Create a token configuration, rejecting decimal counts that overflow U256.
    pub fn new(
        symbol: impl Into<String>,
        contract_address: Address,
        decimals: u8,
    ) -> WalletResult<Self> {
        if decimals > MAX_DECIMALS {
            return Err(WalletError::Config(format!(
                "token decimals must be at most {MAX_DECIMALS}, got {decimals}"
            )));
        }
        Ok(Self {
            symbol: symbol.into(),
            contract_address,
            decimals,
        })
    }
}

/// Configuration for [`crate::WalletService`].
#[derive(Debug, Clone)]
pub struct WalletConfig {
    /// Node JSON-RPC endpoint
    pub rpc_url: Url,
    /// Token used by token transfers
    pub token: TokenConfig,
    /// Default deadline handed out by `WalletService::request_context`
    pub rpc_timeout: Duration,
    /// Gas limit strategy
    pub gas_limit_mode: GasLimitMode,
    /// Path used for provisioning and sending
    pub derivation_path: DerivationPath,
}

impl WalletConfig {
    /// Create a configuration with default timeout, gas mode and path.
    pub fn new(rpc_url: Url, token: TokenConfig) -> Self {
        Self {
            rpc_url,
            token,
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            gas_limit_mode: GasLimitMode::default(),
            derivation_path: DerivationPath::ethereum_default(),
        }
    }

    /// Load the configuration from the process environment.
    pub fn from_env() -> WalletResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the configuration from an arbitrary key lookup.
    ///
    /// Malformed values are errors, never silently replaced by defaults.
    pub fn from_lookup<F>(lookup: F) -> WalletResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = required(&lookup, RPC_URL_ENV)?;
        let rpc_url = Url::parse(rpc_url.trim()).map_err(|e| {
            WalletError::Config(format!("{RPC_URL_ENV} is not a valid URL: {e}"))
        })?;

        let contract = required(&lookup, TOKEN_CONTRACT_ADDRESS_ENV)?;
        let contract_address = parse_address(contract.trim()).map_err(|e| {
            WalletError::Config(format!("{TOKEN_CONTRACT_ADDRESS_ENV}: {e}"))
        })?;

        let decimals = match lookup(TOKEN_DECIMALS_ENV) {
            Some(raw) => raw.trim().parse::<u8>().map_err(|_| {
                WalletError::Config(format!("{TOKEN_DECIMALS_ENV} must be an integer, got `{raw}`"))
            })?,
            None => DEFAULT_TOKEN_DECIMALS,
        };

        let symbol = lookup(TOKEN_SYMBOL_ENV).unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string());
        let token = TokenConfig::new(symbol, contract_address, decimals)?;

        let rpc_timeout = match lookup(RPC_TIMEOUT_SECS_ENV) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    WalletError::Config(format!(
                        "{RPC_TIMEOUT_SECS_ENV} must be a whole number of seconds, got `{raw}`"
                    ))
                })?;
                if secs == 0 {
                    return Err(WalletError::Config(format!(
                        "{RPC_TIMEOUT_SECS_ENV} must be greater than zero"
                    )));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_RPC_TIMEOUT,
        };

        let gas_limit_mode = match lookup(GAS_LIMIT_MODE_ENV) {
            Some(raw) => raw.parse()?,
            None => GasLimitMode::default(),
        };

        let derivation_path = match lookup(DERIVATION_PATH_ENV) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| WalletError::Config(format!("{DERIVATION_PATH_ENV}: {e}")))?,
            None => DerivationPath::ethereum_default(),
        };

        Ok(Self {
            rpc_url,
            token,
            rpc_timeout,
            gas_limit_mode,
            derivation_path,
        })
    }
}

fn required<F>(lookup: &F, name: &str) -> WalletResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| WalletError::Config(format!("{name} must be set")))
}
