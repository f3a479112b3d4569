use super::{Address, Receipt, Signer, TxHash, Wallet, WalletError};
use crate::libs::chain::LocalChain;
use crate::libs::ledger::LedgerCall;
use crate::libs::messages::Message;
use crate::libs::todo::Todo;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Well-known development accounts, as unlocked on local nodes.
pub const DEV_ACCOUNTS: [&str; 2] = [
    "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
    "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
];

/// In-process wallet that signs for a fixed set of accounts and submits
/// straight to a [`LocalChain`].
///
/// The access and signing switches emulate the user declining the wallet's
/// prompts.
pub struct LocalWallet {
    chain: Arc<LocalChain>,
    accounts: Vec<Address>,
    deny_access: AtomicBool,
    reject_signing: AtomicBool,
    confirmation_delay: Option<Duration>,
}

impl LocalWallet {
    pub fn new(chain: Arc<LocalChain>, accounts: Vec<Address>) -> Self {
        LocalWallet {
            chain,
            accounts,
            deny_access: AtomicBool::new(false),
            reject_signing: AtomicBool::new(false),
            confirmation_delay: None,
        }
    }

    pub fn with_dev_accounts(chain: Arc<LocalChain>) -> Self {
        let accounts = DEV_ACCOUNTS.iter().filter_map(|a| Address::parse(a).ok()).collect();
        Self::new(chain, accounts)
    }

    /// Delays every confirmation, as a real network would.
    pub fn with_confirmation_delay(mut self, delay: Duration) -> Self {
        self.confirmation_delay = Some(delay);
        self
    }

    pub fn set_deny_access(&self, deny: bool) {
        self.deny_access.store(deny, Ordering::SeqCst);
    }

    pub fn set_reject_signing(&self, reject: bool) {
        self.reject_signing.store(reject, Ordering::SeqCst);
    }

    pub fn chain(&self) -> &Arc<LocalChain> {
        &self.chain
    }
}

impl Wallet for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        if self.deny_access.load(Ordering::SeqCst) {
            return Err(WalletError::AccessDenied(Message::WalletAccessDenied.to_string()));
        }
        if self.accounts.is_empty() {
            return Err(WalletError::NoAccounts);
        }
        Ok(self.accounts.clone())
    }

    async fn signer(&self, account: &Address) -> Result<Signer, WalletError> {
        if !self.accounts.contains(account) {
            return Err(WalletError::AccessDenied(format!("no key for {}", account)));
        }
        Ok(Signer {
            account: account.clone(),
            chain_id: self.chain.chain_id(),
        })
    }

    async fn get_todos(&self, _from: &Address) -> Result<Vec<Todo>, WalletError> {
        Ok(self.chain.get_todos())
    }

    async fn send_transaction(&self, signer: &Signer, call: &LedgerCall) -> Result<TxHash, WalletError> {
        if self.reject_signing.load(Ordering::SeqCst) {
            return Err(WalletError::Rejected("user denied transaction signature".to_string()));
        }
        if signer.chain_id != self.chain.chain_id() {
            return Err(WalletError::WrongChain {
                expected: self.chain.chain_id(),
                actual: signer.chain_id,
            });
        }
        let receipt = self
            .chain
            .execute(&signer.account, call)
            .map_err(|e| WalletError::Unavailable(e.to_string()))?;
        Ok(receipt.tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> Result<Receipt, WalletError> {
        if let Some(delay) = self.confirmation_delay {
            tokio::time::sleep(delay).await;
        }
        self.chain
            .receipt(tx_hash)
            .map_err(|e| WalletError::Unavailable(e.to_string()))?
            .ok_or_else(|| WalletError::Unavailable(Message::ReceiptNotFound(tx_hash.to_string()).to_string()))
    }
}
