#[derive(Debug, Clone)]
pub enum Message {
    // === WALLET MESSAGES ===
    WalletConnecting,
    WalletConnected(String),     // account
    WalletConnectFailed(String), // error
    WalletDisconnected,
    WalletNotConnected,
    WalletAlreadyConnected,
    WalletBusy,
    WalletAccessDenied,

    // === TASK MESSAGES ===
    TodoContentEmpty,
    TodoIndexOutOfRange(u64, usize), // index, len
    TodosRefreshed(usize),           // count
    TodosRefreshFailed(String),      // error
    TodosRefreshDiscarded,

    // === TRANSACTION MESSAGES ===
    TransactionSubmitting(String), // call
    TransactionSent(String),       // tx hash
    TransactionConfirmed { tx_hash: String, block_number: u64 },
    TransactionReverted(String, String), // tx hash, reason
    TransactionRejected(String),         // reason
    TransactionTimedOut(u64),            // seconds
    TransactionFailed(String),           // error
    TransactionCancelled,
    ReceiptNotFound(String), // tx hash

    // === LOCAL CHAIN MESSAGES ===
    ChainOpened { chain_id: u64, block_number: u64, todos: usize },
    ChainExecuted { block_number: u64, call: String },
    ChainExecutionReverted { block_number: u64, reason: String },

    // === RPC MESSAGES ===
    RpcRequest(String),                      // method
    RpcError { code: i64, message: String }, // node error
    RpcTransportFailed(String),              // error
    RpcDecodeFailed(String),                 // error
    ContractAddressNotSet,
    NetworkNotSet,
    UnknownNetwork(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigLoaded,
    ConfigFileNotFound,
    ConfigParseError,
    ConfigInvalidValue(String, String), // key, value

    // === FILE SYSTEM MESSAGES ===
    DataStoragePathError,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
    DatabaseUpToDate,
}
