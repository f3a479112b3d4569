use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_RECEIPT: &str = "INSERT INTO receipts (tx_hash, block_number, sender, method, calldata, success, revert_reason, mined_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_RECEIPT: &str = "SELECT tx_hash, block_number, sender, method, calldata, success, revert_reason, mined_at
    FROM receipts WHERE tx_hash = ?";
const SELECT_LATEST_BLOCK: &str = "SELECT MAX(block_number) FROM receipts";

/// A mined transaction as recorded by the local chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptRecord {
    pub tx_hash: String,
    pub block_number: u64,
    pub sender: String,
    pub method: String,
    pub calldata: String,
    pub success: bool,
    pub revert_reason: Option<String>,
    pub mined_at: DateTime<Utc>,
}

pub struct Receipts<'c> {
    conn: &'c Connection,
}

impl<'c> Receipts<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Receipts { conn }
    }

    pub fn insert(&self, receipt: &ReceiptRecord) -> Result<()> {
        self.conn.execute(
            INSERT_RECEIPT,
            params![
                receipt.tx_hash,
                i64::try_from(receipt.block_number)?,
                receipt.sender,
                receipt.method,
                receipt.calldata,
                receipt.success,
                receipt.revert_reason,
                receipt.mined_at,
            ],
        )?;
        Ok(())
    }

    pub fn get(&self, tx_hash: &str) -> Result<Option<ReceiptRecord>> {
        let record = self.conn.query_row(SELECT_RECEIPT, params![tx_hash], Self::from_row).optional()?;
        Ok(record)
    }

    /// Height of the last mined block, `0` before the first transaction.
    pub fn latest_block(&self) -> Result<u64> {
        let block: Option<i64> = self.conn.query_row(SELECT_LATEST_BLOCK, [], |row| row.get(0))?;
        Ok(block.unwrap_or(0) as u64)
    }

    fn from_row(row: &Row) -> rusqlite::Result<ReceiptRecord> {
        let block_number: i64 = row.get(1)?;
        Ok(ReceiptRecord {
            tx_hash: row.get(0)?,
            block_number: block_number as u64,
            sender: row.get(2)?,
            method: row.get(3)?,
            calldata: row.get(4)?,
            success: row.get(5)?,
            revert_reason: row.get(6)?,
            mined_at: row.get(7)?,
        })
    }
}
