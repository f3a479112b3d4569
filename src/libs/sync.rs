//! Client sync layer: wallet connection and transaction lifecycle.
//!
//! [`SyncClient`] owns the connection to a [`Wallet`] and a read-only cached
//! copy of the ledger's task list. The UI calls its intents (`connect`,
//! `disconnect`, `add`, `complete`, `delete`) and renders [`SyncView`].
//!
//! ## States
//!
//! ```text
//!                connect                 success(account)
//! Disconnected ─────────▶ Connecting ──────────────────────▶ Connected ◀──┐
//!      ▲                      │                               │   │        │
//!      │        failure       │              disconnect       │   │ submit │ confirmed / rejected /
//!      ├──────────────────────┘◀──────────────────────────────┘   ▼        │ reverted / timed out
//!      │                                                      Submitting ──┘
//! ```
//!
//! ## Guarantees
//!
//! - `Submitting` is the gate over mutations: a second submission while one
//!   is in flight fails with [`SyncError::Busy`] and is never dispatched.
//! - After every submission, confirmed or failed, the cached list is
//!   replaced wholesale by exactly one `getTodos` read. Nothing is patched
//!   locally; the in-flight call is only exposed as `SyncView::pending`.
//!   The machine leaves `Submitting` only once that read has completed, so
//!   no intent is validated against the pre-transaction snapshot.
//! - A submission that is not confirmed within
//!   [`SyncOptions::confirmation_timeout`] fails with
//!   [`TxFailure::TimedOut`]. Dropping the submitting future also returns the
//!   machine to `Connected`.
//! - Reads are not serialized against writes. The cache is a snapshot.
//!
//! ## Stale indices
//!
//! Tasks are addressed by index. If another account changes the ledger's
//! length between this client's last refresh and its submission, the index
//! may target a different task. Indices outside the cached snapshot are
//! rejected locally; indices that are in range but stale are not detected.

use crate::api::{Address, Receipt, Signer, TxHash, TxStatus, Wallet, WalletError};
use crate::libs::ledger::{LedgerCall, LedgerError, TodoList};
use crate::libs::messages::Message;
use crate::libs::todo::Todo;
use crate::{msg_debug, msg_error, msg_info, msg_success, msg_warning};
use parking_lot::Mutex;
use std::mem;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Upper bound on send + confirmation of one transaction.
    pub confirmation_timeout: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }
}

/// Why a submitted transaction did not take effect.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxFailure {
    #[error("rejected by signer: {0}")]
    Rejected(String),

    #[error("transaction {tx_hash} reverted: {}", reason.as_deref().unwrap_or("no reason given"))]
    Reverted { tx_hash: TxHash, reason: Option<String> },

    #[error("not confirmed within {} seconds", after.as_secs())]
    TimedOut { after: Duration },

    #[error(transparent)]
    Wallet(WalletError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Connection failed: {0}")]
    Connection(WalletError),

    #[error("Task content must not be empty")]
    InvalidInput,

    #[error("Index {index} is out of range for a list of {len} tasks")]
    IndexOutOfRange { index: u64, len: usize },

    #[error("Transaction failed: {0}")]
    TransactionFailure(TxFailure),

    #[error("No wallet connected")]
    NotConnected,

    #[error("Another operation is in progress")]
    Busy,

    #[error("A wallet is already connected")]
    AlreadyConnected,

    #[error("Refresh failed: {0}")]
    Refresh(WalletError),
}

/// Connection state as exposed to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected { account: Address },
    Submitting { account: Address, pending: LedgerCall },
}

/// Everything the UI renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncView {
    pub tasks: Vec<Todo>,
    pub connection_state: ConnectionState,
    /// `true` while a transaction is in flight.
    pub busy: bool,
    /// The in-flight call, for an optimistic placeholder.
    pub pending: Option<LedgerCall>,
    /// Transient error indicator, cleared by the next intent.
    pub last_error: Option<String>,
}

/// Per-connection state; lives exactly as long as the connection.
struct Session {
    account: Address,
    signer: Signer,
    tasks: TodoList,
}

enum Phase {
    Disconnected,
    Connecting,
    Connected(Session),
    Submitting(Session, LedgerCall),
}

struct Inner {
    phase: Phase,
    /// Bumped on every connect and disconnect; work started under an older
    /// epoch must not touch the current session.
    epoch: u64,
    /// Sequence number of the last `getTodos` read started.
    reads_started: u64,
    /// Sequence number of the read the cache currently holds.
    read_applied: u64,
    last_error: Option<String>,
}

impl Inner {
    fn session(&self) -> Option<&Session> {
        match &self.phase {
            Phase::Connected(session) | Phase::Submitting(session, _) => Some(session),
            Phase::Disconnected | Phase::Connecting => None,
        }
    }

    fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.phase {
            Phase::Connected(session) | Phase::Submitting(session, _) => Some(session),
            Phase::Disconnected | Phase::Connecting => None,
        }
    }

    /// Leaves the transient phase the machine is in, if any.
    fn settle(&mut self) {
        self.phase = match mem::replace(&mut self.phase, Phase::Disconnected) {
            Phase::Connecting => Phase::Disconnected,
            Phase::Submitting(session, _) => Phase::Connected(session),
            other => other,
        };
    }
}

/// Returns the machine to a resting state if the future that owns it is
/// dropped mid-flight.
struct Rollback<'a> {
    inner: &'a Mutex<Inner>,
    epoch: u64,
    armed: bool,
}

impl<'a> Rollback<'a> {
    fn new(inner: &'a Mutex<Inner>, epoch: u64) -> Self {
        Rollback { inner, epoch, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for Rollback<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock();
        if inner.epoch != self.epoch {
            return;
        }
        let message = match inner.phase {
            Phase::Connecting => Message::WalletConnectFailed("cancelled".to_string()),
            _ => Message::TransactionCancelled,
        };
        inner.settle();
        inner.last_error = Some(message.to_string());
        msg_warning!(message);
    }
}

pub struct SyncClient<W: Wallet> {
    wallet: W,
    options: SyncOptions,
    inner: Mutex<Inner>,
}

impl<W: Wallet> SyncClient<W> {
    pub fn new(wallet: W) -> Self {
        Self::with_options(wallet, SyncOptions::default())
    }

    pub fn with_options(wallet: W, options: SyncOptions) -> Self {
        SyncClient {
            wallet,
            options,
            inner: Mutex::new(Inner {
                phase: Phase::Disconnected,
                epoch: 0,
                reads_started: 0,
                read_applied: 0,
                last_error: None,
            }),
        }
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn view(&self) -> SyncView {
        let inner = self.inner.lock();
        let (connection_state, pending) = match &inner.phase {
            Phase::Disconnected => (ConnectionState::Disconnected, None),
            Phase::Connecting => (ConnectionState::Connecting, None),
            Phase::Connected(session) => (
                ConnectionState::Connected {
                    account: session.account.clone(),
                },
                None,
            ),
            Phase::Submitting(session, call) => (
                ConnectionState::Submitting {
                    account: session.account.clone(),
                    pending: call.clone(),
                },
                Some(call.clone()),
            ),
        };

        SyncView {
            tasks: inner.session().map(|s| s.tasks.get_todos()).unwrap_or_default(),
            busy: pending.is_some(),
            connection_state,
            pending,
            last_error: inner.last_error.clone(),
        }
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.view().connection_state
    }

    pub fn tasks(&self) -> Vec<Todo> {
        self.inner.lock().session().map(|s| s.tasks.get_todos()).unwrap_or_default()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.inner.lock().phase, Phase::Submitting(..))
    }

    pub fn account(&self) -> Option<Address> {
        self.inner.lock().session().map(|s| s.account.clone())
    }

    /// `Disconnected → Connecting → Connected | Disconnected`.
    ///
    /// On success the task list is read immediately. A failing initial read
    /// leaves the client connected with the error in `last_error`.
    pub async fn connect(&self) -> Result<Address, SyncError> {
        let epoch = {
            let mut inner = self.inner.lock();
            match inner.phase {
                Phase::Disconnected => {}
                Phase::Connecting => return Err(SyncError::Busy),
                Phase::Connected(_) | Phase::Submitting(..) => {
                    msg_warning!(Message::WalletAlreadyConnected);
                    return Err(SyncError::AlreadyConnected);
                }
            }
            inner.phase = Phase::Connecting;
            inner.epoch += 1;
            inner.last_error = None;
            inner.epoch
        };
        msg_info!(Message::WalletConnecting);

        let rollback = Rollback::new(&self.inner, epoch);
        let opened = self.open_session().await;
        rollback.disarm();

        match opened {
            Ok((account, signer)) => {
                self.inner.lock().phase = Phase::Connected(Session {
                    account: account.clone(),
                    signer,
                    tasks: TodoList::default(),
                });
                msg_success!(Message::WalletConnected(account.to_string()));

                // Failure is already recorded in `last_error`.
                let _ = self.refresh().await;
                Ok(account)
            }
            Err(error) => {
                let mut inner = self.inner.lock();
                inner.phase = Phase::Disconnected;
                inner.last_error = Some(Message::WalletConnectFailed(error.to_string()).to_string());
                msg_error!(Message::WalletConnectFailed(error.to_string()));
                Err(SyncError::Connection(error))
            }
        }
    }

    /// `Connected → Disconnected`. Drops the session and its cached list.
    pub fn disconnect(&self) -> Result<(), SyncError> {
        let mut inner = self.inner.lock();
        match inner.phase {
            Phase::Connected(_) => {}
            Phase::Disconnected => return Err(SyncError::NotConnected),
            Phase::Connecting | Phase::Submitting(..) => return Err(SyncError::Busy),
        }
        inner.phase = Phase::Disconnected;
        inner.epoch += 1;
        inner.last_error = None;
        msg_info!(Message::WalletDisconnected);
        Ok(())
    }

    /// Submits `addTodo(content)`. Blank content is rejected before any
    /// transaction is sent.
    pub async fn add(&self, content: &str) -> Result<(), SyncError> {
        self.submit(LedgerCall::AddTodo(content.to_string())).await
    }

    pub async fn complete(&self, index: u64) -> Result<(), SyncError> {
        self.submit(LedgerCall::MarkAsCompleted(index)).await
    }

    pub async fn delete(&self, index: u64) -> Result<(), SyncError> {
        self.submit(LedgerCall::DeleteTodo(index)).await
    }

    /// Replaces the cached list with the ledger's current one.
    ///
    /// Allowed while `Submitting`: the result may reflect the ledger before
    /// or after the pending transaction. A read that completes after a later
    /// one has been applied is discarded.
    pub async fn refresh(&self) -> Result<usize, SyncError> {
        let (epoch, read, account) = {
            let mut inner = self.inner.lock();
            let account = inner.session().map(|s| s.account.clone()).ok_or(SyncError::NotConnected)?;
            inner.reads_started += 1;
            (inner.epoch, inner.reads_started, account)
        };

        let fetched = self.wallet.get_todos(&account).await;

        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            msg_debug!(Message::TodosRefreshDiscarded);
            return Err(SyncError::NotConnected);
        }
        if read < inner.read_applied {
            // A read started later has already replaced the cache.
            msg_debug!(Message::TodosRefreshDiscarded);
            return Ok(inner.session().map(|s| s.tasks.len()).unwrap_or_default());
        }
        match fetched {
            Ok(tasks) => {
                let count = tasks.len();
                inner.read_applied = read;
                if let Some(session) = inner.session_mut() {
                    session.tasks = TodoList::from_todos(tasks);
                }
                msg_debug!(Message::TodosRefreshed(count));
                Ok(count)
            }
            Err(error) => {
                inner.last_error = Some(Message::TodosRefreshFailed(error.to_string()).to_string());
                msg_error!(Message::TodosRefreshFailed(error.to_string()));
                Err(SyncError::Refresh(error))
            }
        }
    }

    async fn open_session(&self) -> Result<(Address, Signer), WalletError> {
        let accounts = self.wallet.request_accounts().await?;
        let account = accounts.into_iter().next().ok_or(WalletError::NoAccounts)?;
        let signer = self.wallet.signer(&account).await?;
        Ok((account, signer))
    }

    async fn submit(&self, call: LedgerCall) -> Result<(), SyncError> {
        let (epoch, signer) = match self.begin_submission(&call) {
            Ok(started) => started,
            Err(error @ SyncError::IndexOutOfRange { .. }) => {
                // The snapshot was stale or the UI is off; resynchronize.
                let _ = self.refresh().await;
                return Err(error);
            }
            Err(error) => return Err(error),
        };
        msg_info!(Message::TransactionSubmitting(call.to_string()));

        let rollback = Rollback::new(&self.inner, epoch);
        let timeout = self.options.confirmation_timeout;
        let outcome = match tokio::time::timeout(timeout, self.send_and_confirm(&signer, &call)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(TxFailure::TimedOut { after: timeout }),
        };

        let result = match outcome {
            Ok(receipt) => {
                msg_success!(Message::TransactionConfirmed {
                    tx_hash: receipt.tx_hash.to_string(),
                    block_number: receipt.block_number,
                });
                Ok(())
            }
            Err(failure) => {
                self.report_failure(&failure);
                Err(SyncError::TransactionFailure(failure))
            }
        };

        // Mandatory on both paths: the ledger may have moved even when the
        // transaction did not confirm. The machine stays `Submitting` until
        // the new snapshot is in place.
        let refreshed = self.refresh().await;
        rollback.disarm();

        let mut inner = self.inner.lock();
        if inner.epoch == epoch {
            inner.settle();
        }
        match result {
            Ok(()) => refreshed.map(|_| ()),
            Err(error) => {
                // Keep the transaction failure visible over any refresh error.
                inner.last_error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// Validates `call` against the cached snapshot and enters `Submitting`.
    fn begin_submission(&self, call: &LedgerCall) -> Result<(u64, Signer), SyncError> {
        let mut inner = self.inner.lock();
        match inner.phase {
            Phase::Connected(_) => {}
            Phase::Disconnected => {
                msg_warning!(Message::WalletNotConnected);
                return Err(SyncError::NotConnected);
            }
            Phase::Connecting | Phase::Submitting(..) => {
                msg_warning!(Message::WalletBusy);
                return Err(SyncError::Busy);
            }
        }
        inner.last_error = None;

        let checked = inner.session().map(|s| s.tasks.check(call)).unwrap_or(Ok(()));
        if let Err(error) = checked {
            let (error, message) = match error {
                LedgerError::InvalidInput => (SyncError::InvalidInput, Message::TodoContentEmpty),
                LedgerError::IndexOutOfRange { index, len } => (
                    SyncError::IndexOutOfRange { index, len },
                    Message::TodoIndexOutOfRange(index, len),
                ),
            };
            inner.last_error = Some(message.to_string());
            msg_error!(message);
            return Err(error);
        }

        inner.phase = match mem::replace(&mut inner.phase, Phase::Disconnected) {
            Phase::Connected(session) => Phase::Submitting(session, call.clone()),
            other => other,
        };
        let signer = inner.session().map(|s| s.signer.clone()).ok_or(SyncError::NotConnected)?;
        Ok((inner.epoch, signer))
    }

    async fn send_and_confirm(&self, signer: &Signer, call: &LedgerCall) -> Result<Receipt, TxFailure> {
        let tx_hash = self.wallet.send_transaction(signer, call).await.map_err(|error| match error {
            WalletError::Rejected(reason) => TxFailure::Rejected(reason),
            other => TxFailure::Wallet(other),
        })?;
        msg_debug!(Message::TransactionSent(tx_hash.to_string()));

        let receipt = self.wallet.wait_for_receipt(&tx_hash).await.map_err(TxFailure::Wallet)?;
        match receipt.status {
            TxStatus::Success => Ok(receipt),
            TxStatus::Reverted(reason) => Err(TxFailure::Reverted {
                tx_hash: receipt.tx_hash,
                reason,
            }),
        }
    }

    fn report_failure(&self, failure: &TxFailure) {
        let message = match failure {
            TxFailure::Rejected(reason) => Message::TransactionRejected(reason.clone()),
            TxFailure::Reverted { tx_hash, reason } => Message::TransactionReverted(
                tx_hash.to_string(),
                reason.clone().unwrap_or_else(|| "no reason given".to_string()),
            ),
            TxFailure::TimedOut { after } => Message::TransactionTimedOut(after.as_secs()),
            TxFailure::Wallet(error) => Message::TransactionFailed(error.to_string()),
        };
        msg_error!(message);
    }
}
