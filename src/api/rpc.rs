//! Wallet backend speaking Ethereum JSON-RPC over HTTP.
//!
//! Works against any node or wallet bridge that exposes the standard
//! `eth_*` methods and holds the signing keys itself (a local development
//! node, or a signer proxy in front of a public network). Transactions are
//! never signed locally.
//!
//! | Capability | Method |
//! |---|---|
//! | account access | `eth_requestAccounts` |
//! | chain check | `eth_chainId` |
//! | `getTodos()` | `eth_call` |
//! | mutations | `eth_sendTransaction` |
//! | confirmation | `eth_getTransactionReceipt`, polled |

use super::abi;
use super::{Address, Receipt, Signer, TxHash, TxStatus, Wallet, WalletError};
use crate::libs::ledger::LedgerCall;
use crate::libs::messages::Message;
use crate::libs::todo::Todo;
use crate::msg_debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const DEFAULT_GAS_LIMIT: u64 = 300_000;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// EIP-1193: the user rejected the request.
const USER_REJECTED: i64 = 4001;
/// EIP-1193: the requested account or method is not authorized.
const UNAUTHORIZED: i64 = 4100;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    transaction_hash: String,
    block_number: Option<String>,
    status: Option<String>,
}

pub struct RpcWallet {
    client: Client,
    url: String,
    contract: Address,
    gas_limit: u64,
    poll_interval: Duration,
    expected_chain_id: Option<u64>,
    next_id: AtomicU64,
}

impl RpcWallet {
    pub fn new(url: &str, contract: Address) -> Self {
        RpcWallet {
            client: Client::new(),
            url: url.to_string(),
            contract,
            gas_limit: DEFAULT_GAS_LIMIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            expected_chain_id: None,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Refuse to hand out a signer unless the node reports `chain_id`.
    pub fn with_expected_chain_id(mut self, chain_id: u64) -> Self {
        self.expected_chain_id = Some(chain_id);
        self
    }

    pub fn contract(&self) -> &Address {
        &self.contract
    }

    pub async fn chain_id(&self) -> Result<u64, WalletError> {
        let chain_id: String = self.request("eth_chainId", json!([])).await?;
        Ok(abi::parse_quantity(&chain_id)?)
    }

    async fn request<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, WalletError> {
        msg_debug!(Message::RpcRequest(method.to_string()));

        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        let res = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                msg_debug!(Message::RpcTransportFailed(e.to_string()));
                WalletError::Transport(e.to_string())
            })?;

        if !res.status().is_success() {
            msg_debug!(Message::RpcTransportFailed(res.status().to_string()));
            return Err(WalletError::Transport(format!("HTTP {}", res.status())));
        }

        let body: RpcResponse = res.json().await.map_err(|e| {
            msg_debug!(Message::RpcDecodeFailed(e.to_string()));
            WalletError::Decode(e.to_string())
        })?;
        if let Some(error) = body.error {
            msg_debug!(Message::RpcError {
                code: error.code,
                message: error.message.clone(),
            });
            return Err(match error.code {
                USER_REJECTED => WalletError::Rejected(error.message),
                UNAUTHORIZED => WalletError::AccessDenied(error.message),
                code => WalletError::Rpc {
                    code,
                    message: error.message,
                },
            });
        }

        serde_json::from_value(body.result.unwrap_or(Value::Null)).map_err(|e| WalletError::Decode(e.to_string()))
    }
}

impl Wallet for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        let accounts: Vec<String> = self.request("eth_requestAccounts", json!([])).await?;
        if accounts.is_empty() {
            return Err(WalletError::NoAccounts);
        }
        accounts.iter().map(|a| Address::parse(a)).collect()
    }

    async fn signer(&self, account: &Address) -> Result<Signer, WalletError> {
        let chain_id = self.chain_id().await?;
        if let Some(expected) = self.expected_chain_id {
            if expected != chain_id {
                return Err(WalletError::WrongChain {
                    expected,
                    actual: chain_id,
                });
            }
        }
        Ok(Signer {
            account: account.clone(),
            chain_id,
        })
    }

    async fn get_todos(&self, from: &Address) -> Result<Vec<Todo>, WalletError> {
        let call = json!({
            "from": from.as_str(),
            "to": self.contract.as_str(),
            "gas": abi::format_quantity(self.gas_limit),
            "data": abi::encode_hex(&abi::encode_get_todos()),
        });
        let result: String = self.request("eth_call", json!([call, "latest"])).await?;
        Ok(abi::decode_todos(&abi::decode_hex(&result)?)?)
    }

    async fn send_transaction(&self, signer: &Signer, call: &LedgerCall) -> Result<TxHash, WalletError> {
        let tx = json!({
            "from": signer.account.as_str(),
            "to": self.contract.as_str(),
            "gas": abi::format_quantity(self.gas_limit),
            "data": abi::encode_hex(&abi::encode_call(call)),
        });
        let tx_hash: String = self.request("eth_sendTransaction", json!([tx])).await?;
        Ok(TxHash::new(tx_hash))
    }

    async fn wait_for_receipt(&self, tx_hash: &TxHash) -> Result<Receipt, WalletError> {
        loop {
            let receipt: Option<RpcReceipt> = self.request("eth_getTransactionReceipt", json!([tx_hash.as_str()])).await?;

            // Some nodes return a receipt without a block number while the
            // transaction is still pending. A missing status predates
            // Byzantium and means the transaction was mined.
            if let Some(RpcReceipt {
                transaction_hash,
                block_number: Some(block_number),
                status,
            }) = receipt
            {
                let status = match status.as_deref().map(abi::parse_quantity).transpose()? {
                    Some(0) => TxStatus::Reverted(None),
                    _ => TxStatus::Success,
                };
                return Ok(Receipt {
                    tx_hash: TxHash::new(transaction_hash),
                    block_number: abi::parse_quantity(&block_number)?,
                    status,
                });
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
