//! Core library modules.
//!
//! - **Ledger**: the task list and its three mutations ([`ledger`], [`todo`])
//! - **Local chain**: in-process, persistent execution of ledger calls ([`chain`])
//! - **Client sync**: wallet connection and transaction lifecycle ([`sync`])
//! - **Infrastructure**: configuration, data storage, messages, logging
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use todoledger::api::LocalWallet;
//! use todoledger::libs::chain::{LocalChain, LOCAL_CHAIN_ID};
//! use todoledger::libs::sync::SyncClient;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let chain = Arc::new(LocalChain::open(LOCAL_CHAIN_ID)?);
//! let client = SyncClient::new(LocalWallet::with_dev_accounts(chain));
//! client.connect().await?;
//! client.add("buy milk").await?;
//! assert_eq!(client.view().tasks.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod config;
pub mod data_storage;
pub mod ledger;
pub mod logging;
pub mod messages;
pub mod sync;
pub mod todo;
