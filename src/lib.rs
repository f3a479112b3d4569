//! # Todoledger - a task list kept on a ledger
//!
//! A decentralized todo list: the list lives in a ledger contract whose state
//! only changes through signed transactions, and clients keep a read-only
//! cached copy that they refresh after every write.
//!
//! ## Features
//!
//! - **Task Ledger**: `getTodos`, `addTodo`, `markAsCompleted`, `deleteTodo`
//! - **Contract ABI**: calldata and return-value encoding for the four methods
//! - **Wallets**: a JSON-RPC backend for real nodes and an in-process one backed by a persistent local chain
//! - **Client Sync**: connection state machine with a single in-flight transaction and mandatory refresh
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoledger::libs::config::Config;
//! use todoledger::libs::sync::SyncClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     todoledger::libs::logging::init();
//!     let config = Config::load()?;
//!     let client = SyncClient::with_options(config.rpc_wallet()?, config.sync_options());
//!     client.connect().await?;
//!     client.add("write the report").await?;
//!     for (index, todo) in client.view().tasks.iter().enumerate() {
//!         println!("{index}: {} {}", if todo.completed { "[x]" } else { "[ ]" }, todo.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod db;
pub mod libs;
