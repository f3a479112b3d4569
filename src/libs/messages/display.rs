//! Display implementation for todoledger messages.
//!
//! All user-facing text lives here, in one match over [`Message`], so the
//! wording of wallet, transaction and storage notices stays consistent no
//! matter which layer emits them.
//!
//! ```rust
//! use todoledger::libs::messages::Message;
//!
//! let message = Message::TodosRefreshed(3);
//! assert_eq!(message.to_string(), "Task list refreshed: 3 task(s)");
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === WALLET MESSAGES ===
            Message::WalletConnecting => "Requesting account access from the wallet...".to_string(),
            Message::WalletConnected(account) => format!("Connected as {}", account),
            Message::WalletConnectFailed(error) => format!("Failed to connect to the wallet: {}", error),
            Message::WalletDisconnected => "Wallet disconnected".to_string(),
            Message::WalletNotConnected => "No wallet connected. Connect first.".to_string(),
            Message::WalletAlreadyConnected => "A wallet is already connected".to_string(),
            Message::WalletBusy => "Another operation is still in progress".to_string(),
            Message::WalletAccessDenied => "The wallet denied account access".to_string(),

            // === TASK MESSAGES ===
            Message::TodoContentEmpty => "Task content must not be empty".to_string(),
            Message::TodoIndexOutOfRange(index, len) => {
                format!("Task index {} is out of range for a list of {} task(s)", index, len)
            }
            Message::TodosRefreshed(count) => format!("Task list refreshed: {} task(s)", count),
            Message::TodosRefreshFailed(error) => format!("Failed to refresh the task list: {}", error),
            Message::TodosRefreshDiscarded => "Discarded a task list read from a closed session".to_string(),

            // === TRANSACTION MESSAGES ===
            Message::TransactionSubmitting(call) => format!("Submitting {}", call),
            Message::TransactionSent(tx_hash) => format!("Transaction sent: {}", tx_hash),
            Message::TransactionConfirmed { tx_hash, block_number } => {
                format!("Transaction {} confirmed in block {}", tx_hash, block_number)
            }
            Message::TransactionReverted(tx_hash, reason) => format!("Transaction {} reverted: {}", tx_hash, reason),
            Message::TransactionRejected(reason) => format!("Transaction rejected by the signer: {}", reason),
            Message::TransactionTimedOut(secs) => format!("Transaction was not confirmed within {} seconds", secs),
            Message::TransactionFailed(error) => format!("Transaction failed: {}", error),
            Message::TransactionCancelled => "Transaction submission was cancelled".to_string(),
            Message::ReceiptNotFound(tx_hash) => format!("No receipt found for transaction {}", tx_hash),

            // === LOCAL CHAIN MESSAGES ===
            Message::ChainOpened {
                chain_id,
                block_number,
                todos,
            } => format!("Local chain {} opened at block {} with {} task(s)", chain_id, block_number, todos),
            Message::ChainExecuted { block_number, call } => format!("Block {}: {}", block_number, call),
            Message::ChainExecutionReverted { block_number, reason } => {
                format!("Block {}: execution reverted: {}", block_number, reason)
            }

            // === RPC MESSAGES ===
            Message::RpcRequest(method) => format!("JSON-RPC request {}", method),
            Message::RpcError { code, message } => format!("Node returned error {}: {}", code, message),
            Message::RpcTransportFailed(error) => format!("Failed to reach the node: {}", error),
            Message::RpcDecodeFailed(error) => format!("Failed to decode the node response: {}", error),
            Message::ContractAddressNotSet => "Contract address is not configured".to_string(),
            Message::NetworkNotSet => "Network is not configured".to_string(),
            Message::UnknownNetwork(name) => format!("Unknown network '{}'", name),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigLoaded => "Configuration loaded".to_string(),
            Message::ConfigFileNotFound => "Configuration file not found, using defaults".to_string(),
            Message::ConfigParseError => "Failed to parse configuration".to_string(),
            Message::ConfigInvalidValue(key, value) => format!("Invalid value '{}' for {}", value, key),

            // === FILE SYSTEM MESSAGES ===
            Message::DataStoragePathError => "Failed to resolve the data storage path".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
        };

        write!(f, "{}", text)
    }
}
