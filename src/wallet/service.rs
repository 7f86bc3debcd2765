// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet operations: provisioning, recovery, balances and the send pipeline.
//!
//! A send moves through `Decrypted -> Derived -> Quoted -> Built -> Signed
//! -> Submitted`. Input is validated before the first stage, so a malformed
//! amount or address never reaches the PIN check or the network. From
//! `Quoted` to `Submitted` the account's lease is held, which keeps two
//! sends from the same account from reading the same nonce.

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::Instrument;
use zeroize::Zeroizing;

use super::locks::AccountLocks;
use crate::blockchain::client::{CallRequest, ChainProvider, RpcChainProvider};
use crate::blockchain::erc20::{decode_balance, encode_balance_of};
use crate::blockchain::gas::GasPolicy;
use crate::blockchain::hd::{derive_keypair, DerivationPath, Keypair, Mnemonic};
use crate::blockchain::signing::TransactionSigner;
use crate::blockchain::submit::TransactionSubmitter;
use crate::blockchain::transactions::{TransactionBuilder, TransferIntent, TransferKind};
use crate::blockchain::types::{parse_address, Balance};
use crate::config::WalletConfig;
use crate::context::RequestContext;
use crate::crypto::{generate_account_salt, PinVault};
use crate::error::{WalletError, WalletResult};

// =============================================================================
// Request / response types
// =============================================================================

/// Inputs of a send. The PIN and sealed mnemonic come from the caller's
/// session and storage.
#[derive(Clone, Copy)]
pub struct SendRequest<'a> {
    pub pin: &'a str,
    pub salt: &'a str,
    pub encrypted_mnemonic: &'a str,
    /// Recipient address
    pub to: &'a str,
    /// Decimal amount in whole units (ETH or tokens)
    pub amount: &'a str,
}

impl fmt::Debug for SendRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendRequest")
            .field("pin", &"[REDACTED]")
            .field("salt", &self.salt)
            .field("encrypted_mnemonic", &"[REDACTED]")
            .field("to", &self.to)
            .field("amount", &self.amount)
            .finish()
    }
}

/// Outcome of a submitted send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// `0x`-prefixed transaction hash
    pub tx_hash: String,
    pub kind: TransferKind,
    pub from: Address,
    /// Recipient of the funds (not the token contract)
    pub to: Address,
    /// Amount in smallest units
    pub amount: U256,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub chain_id: u64,
}

/// Stored fields of a newly provisioned wallet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionedWallet {
    /// Checksummed account address
    pub address: String,
    /// Base64 account salt
    pub salt: String,
    /// Base64 `nonce || ciphertext || tag`
    pub encrypted_mnemonic: String,
}

/// A freshly generated mnemonic and its default account.
#[derive(Debug)]
pub struct CreatedWallet {
    pub mnemonic: Mnemonic,
    pub address: String,
}

/// Account recovered from a mnemonic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveredWallet {
    pub address: String,
    pub derivation_path: String,
}

/// Mnemonic re-sealed under a new PIN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResealedWallet {
    pub salt: String,
    pub encrypted_mnemonic: String,
}

/// Pipeline states, logged as a send advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStage {
    Decrypted,
    Derived,
    Quoted,
    Built,
    Signed,
    Submitted,
}

// =============================================================================
// Service
// =============================================================================

/// The wallet core.
///
/// Holds no user secrets between calls. Cloning shares the provider and the
/// per-account locks.
#[derive(Clone)]
pub struct WalletService {
    config: WalletConfig,
    provider: Arc<dyn ChainProvider>,
    vault: PinVault,
    locks: AccountLocks,
}

impl WalletService {
    /// Create a service with production scrypt parameters.
    pub fn new(config: WalletConfig, provider: Arc<dyn ChainProvider>) -> WalletResult<Self> {
        Ok(Self::with_vault(config, provider, PinVault::production()?))
    }

    /// Create a service with a specific vault.
    pub fn with_vault(
        config: WalletConfig,
        provider: Arc<dyn ChainProvider>,
        vault: PinVault,
    ) -> Self {
        Self {
            config,
            provider,
            vault,
            locks: AccountLocks::new(),
        }
    }

    /// Create a service talking to `config.rpc_url` over HTTP.
    pub fn connect(config: WalletConfig) -> WalletResult<Self> {
        let provider = Arc::new(RpcChainProvider::new(config.rpc_url.clone()));
        Self::new(config, provider)
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// A context using the configured RPC timeout.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.config.rpc_timeout)
    }

    // -------------------------------------------------------------------------
    // Provisioning and recovery
    // -------------------------------------------------------------------------

    /// Generate a new mnemonic and return it with its default address.
    pub fn create_wallet(&self) -> WalletResult<CreatedWallet> {
        let mnemonic = Mnemonic::generate()?;
        let keypair = derive_keypair(&mnemonic, &self.config.derivation_path)?;
        Ok(CreatedWallet {
            address: keypair.address_checksummed(),
            mnemonic,
        })
    }

    /// Create a wallet sealed under `pin` with a fresh account salt.
    ///
    /// The mnemonic never leaves this call.
    pub async fn provision_wallet(&self, pin: &str) -> WalletResult<ProvisionedWallet> {
        if pin.is_empty() {
            return Err(WalletError::InvalidPin("PIN must not be empty".to_string()));
        }

        let vault = self.vault;
        let path = self.config.derivation_path.clone();
        let pin = Zeroizing::new(pin.to_string());

        let provisioned = run_blocking(move || {
            let salt = generate_account_salt()?;
            let mnemonic = Mnemonic::generate()?;
            let keypair = derive_keypair(&mnemonic, &path)?;
            let encrypted_mnemonic = vault.seal(&pin, &salt, &mnemonic)?;
            Ok(ProvisionedWallet {
                address: keypair.address_checksummed(),
                salt,
                encrypted_mnemonic,
            })
        })
        .await?;

        tracing::info!(address = %provisioned.address, "Wallet provisioned");
        Ok(provisioned)
    }

    /// Derive the account for `mnemonic` at `path` (configured path when `None`).
    pub fn recover_wallet(&self, mnemonic: &str, path: Option<&str>) -> WalletResult<RecoveredWallet> {
        let path = match path {
            Some(raw) => raw.parse::<DerivationPath>()?,
            None => self.config.derivation_path.clone(),
        };
        let mnemonic = Mnemonic::parse(mnemonic)?;
        let keypair = derive_keypair(&mnemonic, &path)?;

        Ok(RecoveredWallet {
            address: keypair.address_checksummed(),
            derivation_path: path.to_string(),
        })
    }

    /// Re-seal a mnemonic under `new_pin` with a fresh salt and nonce.
    pub async fn reseal(
        &self,
        old_pin: &str,
        salt: &str,
        encrypted_mnemonic: &str,
        new_pin: &str,
    ) -> WalletResult<ResealedWallet> {
        if new_pin.is_empty() {
            return Err(WalletError::InvalidPin("PIN must not be empty".to_string()));
        }

        let vault = self.vault;
        let old_pin = Zeroizing::new(old_pin.to_string());
        let new_pin = Zeroizing::new(new_pin.to_string());
        let salt = salt.to_string();
        let sealed = encrypted_mnemonic.to_string();

        run_blocking(move || {
            let new_salt = generate_account_salt()?;
            let encrypted_mnemonic = vault.reseal(&old_pin, &salt, &sealed, &new_pin, &new_salt)?;
            Ok(ResealedWallet {
                salt: new_salt,
                encrypted_mnemonic,
            })
        })
        .await
    }

    // -------------------------------------------------------------------------
    // Balances
    // -------------------------------------------------------------------------

    /// Native balance of `address`.
    pub async fn native_balance(&self, address: &str, ctx: &RequestContext) -> WalletResult<Balance> {
        let address = parse_address(address)?;
        let wei = ctx
            .guard("fetching balance", self.provider.get_balance(address))
            .await?
            .map_err(|e| WalletError::Network(format!("failed to get balance: {e}")))?;

        Ok(Balance::native(wei))
    }

    /// Balance of the configured token held by `address`.
    pub async fn token_balance(&self, address: &str, ctx: &RequestContext) -> WalletResult<Balance> {
        let address = parse_address(address)?;
        let token = &self.config.token;
        let request = CallRequest {
            from: None,
            to: token.contract_address,
            value: U256::ZERO,
            data: encode_balance_of(address),
        };

        let data = ctx
            .guard("fetching token balance", self.provider.call(&request))
            .await?
            .map_err(|e| WalletError::Network(format!("failed to get token balance: {e}")))?;
        let units = decode_balance(&data)?;

        Ok(Balance::token(
            &token.symbol,
            token.contract_address,
            token.decimals,
            units,
        ))
    }

    // -------------------------------------------------------------------------
    // Sends
    // -------------------------------------------------------------------------

    /// Send `request.amount` ETH to `request.to`.
    pub async fn send_native(
        &self,
        request: &SendRequest<'_>,
        ctx: &RequestContext,
    ) -> WalletResult<SendReceipt> {
        let intent = TransferIntent::native(request.to, request.amount)?;
        self.send(intent, request, ctx).await
    }

    /// Send `request.amount` of the configured token to `request.to`.
    pub async fn send_token(
        &self,
        request: &SendRequest<'_>,
        ctx: &RequestContext,
    ) -> WalletResult<SendReceipt> {
        let intent = TransferIntent::token(request.to, request.amount, &self.config.token)?;
        self.send(intent, request, ctx).await
    }

    async fn send(
        &self,
        intent: TransferIntent,
        request: &SendRequest<'_>,
        ctx: &RequestContext,
    ) -> WalletResult<SendReceipt> {
        let span = tracing::info_span!(
            "send",
            kind = ?intent.kind(),
            from = tracing::field::Empty,
        );

        async {
            let result = self.run_pipeline(&intent, request, ctx).await;
            match &result {
                Ok(receipt) => tracing::info!(
                    tx_hash = %receipt.tx_hash,
                    nonce = receipt.nonce,
                    "Transaction submitted"
                ),
                Err(e) => tracing::warn!(error = %e, "Send failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run_pipeline(
        &self,
        intent: &TransferIntent,
        request: &SendRequest<'_>,
        ctx: &RequestContext,
    ) -> WalletResult<SendReceipt> {
        let keypair = self.unlock(request).await?;
        let from = keypair.address();
        tracing::Span::current().record("from", tracing::field::display(from));

        let _lease = ctx
            .guard("waiting for account lease", self.locks.acquire(from))
            .await?;

        let policy = GasPolicy::new(self.provider.as_ref());
        let quote = policy.quote(from, ctx).await?;
        tracing::debug!(stage = ?SendStage::Quoted, nonce = quote.nonce, gas_price = %quote.gas_price);

        let gas_limit = policy
            .gas_limit(
                intent.kind(),
                &intent.call_request(from),
                self.config.gas_limit_mode,
                ctx,
            )
            .await?;
        let unsigned = TransactionBuilder::build(intent, &quote, gas_limit);
        tracing::debug!(stage = ?SendStage::Built, gas_limit);

        let signed = TransactionSigner::sign(&unsigned, &keypair, quote.chain_id)?;
        drop(keypair);
        tracing::debug!(stage = ?SendStage::Signed, tx_hash = %signed.tx_hash_hex());

        let tx_hash = TransactionSubmitter::new(self.provider.as_ref())
            .submit(&signed, ctx)
            .await?;
        tracing::debug!(stage = ?SendStage::Submitted);

        let amount = match intent {
            TransferIntent::Native { value, .. } => *value,
            TransferIntent::Token { amount, .. } => *amount,
        };

        Ok(SendReceipt {
            tx_hash,
            kind: intent.kind(),
            from,
            to: intent.recipient(),
            amount,
            nonce: unsigned.nonce,
            gas_price: unsigned.gas_price,
            gas_limit: unsigned.gas_limit,
            chain_id: unsigned.chain_id,
        })
    }

    /// Open the sealed mnemonic and derive the sending key.
    async fn unlock(&self, request: &SendRequest<'_>) -> WalletResult<Keypair> {
        let vault = self.vault;
        let path = self.config.derivation_path.clone();
        let pin = Zeroizing::new(request.pin.to_string());
        let salt = request.salt.to_string();
        let sealed = request.encrypted_mnemonic.to_string();

        run_blocking(move || {
            let mnemonic = vault.open(&pin, &salt, &sealed)?;
            tracing::debug!(stage = ?SendStage::Decrypted);
            let keypair = derive_keypair(&mnemonic, &path)?;
            tracing::debug!(stage = ?SendStage::Derived);
            Ok(keypair)
        })
        .await
    }
}

impl fmt::Debug for WalletService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletService")
            .field("config", &self.config)
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

/// Run CPU-heavy key work (scrypt, BIP-32) off the async workers.
///
/// The task runs under the caller's subscriber and inside the caller's span.
async fn run_blocking<T, F>(task: F) -> WalletResult<T>
where
    F: FnOnce() -> WalletResult<T> + Send + 'static,
    T: Send + 'static,
{
    let dispatch = tracing::dispatcher::get_default(Clone::clone);
    let span = tracing::Span::current();

    tokio::task::spawn_blocking(move || {
        tracing::dispatcher::with_default(&dispatch, || span.in_scope(task))
    })
    .await
        .map_err(|e| WalletError::CryptoFailure(format!("key task failed: {e}")))?
}
