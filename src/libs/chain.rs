//! Local execution environment for the task ledger.
//!
//! `LocalChain` stands in for a development node: it owns the ledger state,
//! runs every mutation as one indivisible transition and mines each
//! transaction into its own block immediately (automine).
//!
//! ## Ordering
//!
//! Mutations are serialized by a single mutex, so the global order is the
//! order in which `execute` acquires it, regardless of caller wall-clock.
//! Reads take the same lock only long enough to clone the list.
//!
//! ## Reverts
//!
//! A mutation the ledger rejects (blank content, index out of range) is still
//! mined: it gets a block and a receipt with `TxStatus::Reverted` carrying the
//! ledger error as reason, and the task list is left unchanged.
//!
//! ## Persistence
//!
//! The task list and the receipts live in SQLite. Ledger writes and the
//! receipt insert share one SQLite transaction, so a crash never leaves a
//! state change without its receipt or the reverse.

use crate::api::abi;
use crate::api::{Address, Receipt, TxHash, TxStatus};
use crate::db::db::Db;
use crate::db::receipts::{ReceiptRecord, Receipts};
use crate::db::todos::Todos;
use crate::libs::ledger::{LedgerCall, TodoList};
use crate::libs::messages::Message;
use crate::libs::todo::Todo;
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use chrono::Utc;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Chain id used by local development nodes.
pub const LOCAL_CHAIN_ID: u64 = 31337;

struct ChainState {
    db: Db,
    ledger: TodoList,
    block_number: u64,
}

pub struct LocalChain {
    chain_id: u64,
    state: Mutex<ChainState>,
}

impl LocalChain {
    /// Opens the chain stored in the platform data directory.
    pub fn open(chain_id: u64) -> Result<Self> {
        Self::from_db(Db::new()?, chain_id)
    }

    pub fn open_at(path: impl AsRef<Path>, chain_id: u64) -> Result<Self> {
        Self::from_db(Db::open(path)?, chain_id)
    }

    pub fn in_memory(chain_id: u64) -> Result<Self> {
        Self::from_db(Db::in_memory()?, chain_id)
    }

    /// Restores ledger state and block height from `db`.
    pub fn from_db(db: Db, chain_id: u64) -> Result<Self> {
        let ledger = TodoList::from_todos(Todos::new(&db.conn).fetch()?);
        let block_number = Receipts::new(&db.conn).latest_block()?;

        msg_debug!(Message::ChainOpened {
            chain_id,
            block_number,
            todos: ledger.len(),
        });

        Ok(LocalChain {
            chain_id,
            state: Mutex::new(ChainState { db, ledger, block_number }),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn block_number(&self) -> u64 {
        self.state.lock().block_number
    }

    /// `getTodos()`: the full list in index order.
    pub fn get_todos(&self) -> Vec<Todo> {
        self.state.lock().ledger.get_todos()
    }

    /// Mines `call` sent by `from` into the next block.
    ///
    /// Errors only on storage failure; ledger rejections come back as a
    /// reverted receipt.
    pub fn execute(&self, from: &Address, call: &LedgerCall) -> Result<Receipt> {
        let mut state = self.state.lock();
        let block_number = state.block_number + 1;
        let calldata = abi::encode_call(call);
        let tx_hash = transaction_hash(self.chain_id, block_number, from, &calldata);

        let mut next = state.ledger.clone();
        let outcome = next.apply(call);

        let tx = state.db.conn.transaction()?;
        if outcome.is_ok() {
            let todos = Todos::new(&tx);
            match call {
                LedgerCall::AddTodo(content) => todos.insert(content)?,
                LedgerCall::MarkAsCompleted(index) => {
                    todos.complete(*index)?;
                }
                LedgerCall::DeleteTodo(index) => {
                    todos.delete(*index)?;
                }
            }
        }
        let revert_reason = outcome.as_ref().err().map(|e| e.to_string());
        Receipts::new(&tx).insert(&ReceiptRecord {
            tx_hash: tx_hash.clone(),
            block_number,
            sender: from.to_string(),
            method: call.method().to_string(),
            calldata: abi::encode_hex(&calldata),
            success: outcome.is_ok(),
            revert_reason: revert_reason.clone(),
            mined_at: Utc::now(),
        })?;
        tx.commit()?;

        state.block_number = block_number;
        let status = match revert_reason {
            None => {
                state.ledger = next;
                msg_debug!(Message::ChainExecuted {
                    block_number,
                    call: call.to_string(),
                });
                TxStatus::Success
            }
            Some(reason) => {
                msg_warning!(Message::ChainExecutionReverted {
                    block_number,
                    reason: reason.clone(),
                });
                TxStatus::Reverted(Some(reason))
            }
        };

        Ok(Receipt {
            tx_hash: TxHash::new(tx_hash),
            block_number,
            status,
        })
    }

    /// Receipt of a previously mined transaction.
    pub fn receipt(&self, tx_hash: &TxHash) -> Result<Option<Receipt>> {
        let state = self.state.lock();
        let record = Receipts::new(&state.db.conn).get(tx_hash.as_str())?;
        Ok(record.map(|record| Receipt {
            tx_hash: TxHash::new(record.tx_hash),
            block_number: record.block_number,
            status: if record.success {
                TxStatus::Success
            } else {
                TxStatus::Reverted(record.revert_reason)
            },
        }))
    }

    /// Decoded call of a mined transaction, read back from its stored calldata.
    pub fn transaction_call(&self, tx_hash: &TxHash) -> Result<Option<LedgerCall>> {
        let state = self.state.lock();
        match Receipts::new(&state.db.conn).get(tx_hash.as_str())? {
            Some(record) => Ok(Some(abi::decode_call(&abi::decode_hex(&record.calldata)?)?)),
            None => Ok(None),
        }
    }
}

fn transaction_hash(chain_id: u64, nonce: u64, from: &Address, calldata: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(chain_id.to_be_bytes());
    hasher.update(nonce.to_be_bytes());
    hasher.update(from.to_bytes());
    hasher.update(calldata);
    abi::encode_hex(&hasher.finalize())
}
