//! SQLite storage behind the local chain.
//!
//! The local chain keeps its ledger state and its mined receipts here so a
//! development ledger survives restarts. Nothing outside the ledger is
//! persisted: the sync layer's task cache stays in memory.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todoledger::db::{db::Db, todos::Todos};
//!
//! let db = Db::in_memory()?;
//! let todos = Todos::new(&db.conn);
//! todos.insert("buy milk")?;
//! todos.complete(0)?;
//! assert_eq!(todos.fetch()?.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection management; applies migrations on open.
pub mod db;

/// Versioned schema changes.
pub mod migrations;

/// Mined transaction receipts.
pub mod receipts;

/// The ordered task sequence.
pub mod todos;
