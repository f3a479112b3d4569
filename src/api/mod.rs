//! Wallet capability and its backends.
//!
//! The sync layer never talks to a chain directly. It goes through the
//! [`Wallet`] trait, which covers the four things a browser wallet or node
//! connector provides: account access, a signing capability, read calls
//! against the ledger, and transaction submission with confirmation.
//!
//! ## Backends
//!
//! - [`local::LocalWallet`]: in-process, executes against a
//!   [`LocalChain`](crate::libs::chain::LocalChain)
//! - [`rpc::RpcWallet`]: Ethereum JSON-RPC over HTTP, calldata encoded by
//!   [`abi`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use todoledger::api::{local::LocalWallet, Wallet};
//! use todoledger::libs::chain::LocalChain;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let chain = Arc::new(LocalChain::in_memory(31337)?);
//! let wallet = LocalWallet::with_dev_accounts(chain);
//! let accounts = wallet.request_accounts().await?;
//! let todos = wallet.get_todos(&accounts[0]).await?;
//! # Ok(())
//! # }
//! ```

use crate::libs::ledger::LedgerCall;
use crate::libs::todo::Todo;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod abi;
pub mod local;
pub mod rpc;

pub use local::LocalWallet;
pub use rpc::RpcWallet;

/// Failures reported by a wallet backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Wallet unavailable: {0}")]
    Unavailable(String),

    #[error("Account access denied: {0}")]
    AccessDenied(String),

    #[error("Wallet returned no accounts")]
    NoAccounts,

    #[error("Wrong chain: expected {expected}, connected to {actual}")]
    WrongChain { expected: u64, actual: u64 },

    #[error("Rejected by signer: {0}")]
    Rejected(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<abi::AbiError> for WalletError {
    fn from(err: abi::AbiError) -> Self {
        WalletError::Decode(err.to_string())
    }
}

/// A 20-byte account or contract address, kept as lowercase `0x` hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn parse(value: &str) -> Result<Self, WalletError> {
        let hex = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or_else(|| WalletError::Decode(format!("address '{}' lacks 0x prefix", value)))?;
        if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WalletError::Decode(format!("invalid address '{}'", value)));
        }
        Ok(Address(format!("0x{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw 20 bytes of the address.
    pub fn to_bytes(&self) -> Vec<u8> {
        // Validated in `parse`, so every pair is a hex byte.
        abi::decode_hex(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Address {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// Transaction reference returned on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        TxHash(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signing capability bound to one account.
///
/// Private keys never leave the wallet; the signer only names the account
/// the wallet will sign for and the chain it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signer {
    pub account: Address,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Success,
    Reverted(Option<String>),
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub status: TxStatus,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }
}

/// Capability a wallet or node connector provides to the sync layer.
///
/// Every method suspends until the underlying round-trip, or the user's
/// approval prompt, resolves.
#[allow(async_fn_in_trait)]
pub trait Wallet {
    /// Asks for account access. The first account is the active one.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Resolves the signing capability for `account`.
    async fn signer(&self, account: &Address) -> Result<Signer, WalletError>;

    /// `getTodos()` read call, issued from `from`.
    async fn get_todos(&self, from: &Address) -> Result<Vec<Todo>, WalletError>;

    /// Sends `call` as a transaction signed by `signer`.
    async fn send_transaction(&self, signer: &Signer, call: &LedgerCall) -> Result<TxHash, WalletError>;

    /// Waits until `tx_hash` is mined and returns its receipt.
    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> Result<Receipt, WalletError>;
}
