//! Simulated wallet: connection state machine and transaction log.
//!
//! States move Disconnected -> Connecting -> Connected -> Disconnected.
//! Every contract interaction lands in the transaction log as pending and
//! is resolved to confirmed or failed. When a real chain call fails, the
//! configured `FallbackPolicy` decides between falling back to the
//! simulated path (the demo behavior) and surfacing the error. In-flight
//! calls have no cancellation support; a caller that goes away does not
//! abort the state mutation.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::persist::{Documents, WEB3_STORAGE};
use super::StoreError;
use crate::chain::{ChainClient, ContractCall, SimulatedChain, TxReceipt};
use crate::config::{ChainConfig, FallbackPolicy};

#[derive(Debug, Clone, PartialEq)]
pub enum WalletState {
    Disconnected,
    Connecting,
    Connected {
        address: String,
        chain_id: u64,
        native_balance: f64,
    },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TxRecord {
    pub id: String,
    pub description: String,
    pub hash: Option<String>,
    pub status: TxStatus,
    /// True when the hash was fabricated rather than returned by a provider
    pub simulated: bool,
    pub created_at: String,
}

/// Read model of the wallet for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSnapshot {
    pub connected: bool,
    pub connecting: bool,
    pub address: Option<String>,
    pub chain_id: Option<u64>,
    pub native_balance: Option<f64>,
}

/// Shape of the persisted `web3-storage` document: the auto-reconnect flag
/// and the last selected network.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Web3Document {
    connected: bool,
    chain_id: Option<u64>,
}

pub struct WalletSimulator {
    docs: Documents,
    chain: Arc<ChainClient>,
    /// Simulated path used when a real call fails under the Simulate policy
    fallback: SimulatedChain,
    policy: FallbackPolicy,
    state: RwLock<WalletState>,
    transactions: RwLock<Vec<TxRecord>>,
}

impl WalletSimulator {
    pub fn new(docs: Documents, chain: Arc<ChainClient>, config: &ChainConfig) -> Self {
        Self {
            docs,
            chain,
            fallback: ChainClient::simulated_fallback(config),
            policy: config.on_error,
            state: RwLock::new(WalletState::Disconnected),
            transactions: RwLock::new(Vec::new()),
        }
    }

    /// Whether the last run left the wallet connected (drives auto-reconnect
    /// at startup).
    pub fn was_connected(&self) -> bool {
        let doc: Web3Document = self.docs.load(WEB3_STORAGE);
        doc.connected
    }

    pub fn state(&self) -> WalletState {
        self.state.read().clone()
    }

    pub fn snapshot(&self) -> WalletSnapshot {
        match self.state() {
            WalletState::Disconnected => WalletSnapshot {
                connected: false,
                connecting: false,
                address: None,
                chain_id: None,
                native_balance: None,
            },
            WalletState::Connecting => WalletSnapshot {
                connected: false,
                connecting: true,
                address: None,
                chain_id: None,
                native_balance: None,
            },
            WalletState::Connected {
                address,
                chain_id,
                native_balance,
            } => WalletSnapshot {
                connected: true,
                connecting: false,
                address: Some(address),
                chain_id: Some(chain_id),
                native_balance: Some(native_balance),
            },
        }
    }

    fn persist_flag(&self, connected: bool, chain_id: Option<u64>) -> Result<(), StoreError> {
        self.docs.save(
            WEB3_STORAGE,
            &Web3Document {
                connected,
                chain_id,
            },
        )?;
        Ok(())
    }

    /// Connect the wallet. With a real provider this requests accounts over
    /// JSON-RPC; otherwise the simulated path produces the demo account
    /// after its fixed delay.
    pub async fn connect(&self) -> Result<WalletSnapshot, StoreError> {
        *self.state.write() = WalletState::Connecting;

        let connected = match self.connect_real_or_simulated().await {
            Ok(connected) => connected,
            Err(e) => {
                *self.state.write() = WalletState::Disconnected;
                return Err(e);
            }
        };

        *self.state.write() = connected;
        let snapshot = self.snapshot();
        self.persist_flag(true, snapshot.chain_id)?;
        Ok(snapshot)
    }

    async fn connect_real_or_simulated(&self) -> Result<WalletState, StoreError> {
        match self.connect_via(&self.chain).await {
            Ok(state) => Ok(state),
            Err(e) if self.chain.is_real() && self.policy == FallbackPolicy::Simulate => {
                warn!(error = %e, "Provider connect failed, falling back to simulation");
                let address = self.fallback.connect().await;
                Ok(WalletState::Connected {
                    address,
                    chain_id: self.fallback.chain_id(),
                    native_balance: self.fallback.native_balance(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn connect_via(&self, chain: &ChainClient) -> Result<WalletState, StoreError> {
        let accounts = chain.request_accounts().await?;
        let address = accounts
            .into_iter()
            .next()
            .ok_or(crate::chain::ChainError::NoAccounts)?;
        let chain_id = chain.chain_id().await?;
        let native_balance = chain.native_balance(&address).await?;
        Ok(WalletState::Connected {
            address,
            chain_id,
            native_balance,
        })
    }

    /// Disconnect and clear the auto-reconnect flag. The transaction log is
    /// kept for the life of the process.
    pub fn disconnect(&self) -> Result<WalletSnapshot, StoreError> {
        *self.state.write() = WalletState::Disconnected;
        self.persist_flag(false, None)?;
        Ok(self.snapshot())
    }

    /// Switch networks. A real provider is asked; on the simulated path (or
    /// under the Simulate policy after a real failure) the chain id is set
    /// optimistically.
    pub async fn switch_network(&self, chain_id: u64) -> Result<WalletSnapshot, StoreError> {
        {
            let state = self.state.read();
            if !matches!(*state, WalletState::Connected { .. }) {
                return Err(StoreError::WalletNotConnected);
            }
        }

        match self.chain.switch_chain(chain_id).await {
            Ok(()) => {}
            Err(e) if self.policy == FallbackPolicy::Simulate => {
                warn!(error = %e, chain_id, "Network switch failed, setting optimistically");
            }
            Err(e) => return Err(e.into()),
        }

        {
            let mut state = self.state.write();
            if let WalletState::Connected {
                chain_id: current, ..
            } = &mut *state
            {
                *current = chain_id;
            }
        }
        self.persist_flag(true, Some(chain_id))?;
        Ok(self.snapshot())
    }

    fn connected_address(&self) -> Result<String, StoreError> {
        match &*self.state.read() {
            WalletState::Connected { address, .. } => Ok(address.clone()),
            _ => Err(StoreError::WalletNotConnected),
        }
    }

    /// Submit a contract interaction and wait for its receipt. The call is
    /// logged pending first, then resolved to confirmed or failed.
    pub async fn submit(&self, call: ContractCall) -> Result<TxRecord, StoreError> {
        let from = self.connected_address()?;

        let record = TxRecord {
            id: uuid::Uuid::new_v4().to_string(),
            description: call.description(),
            hash: None,
            status: TxStatus::Pending,
            simulated: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.transactions.write().push(record.clone());

        let outcome = match self.chain.submit(&from, &call).await {
            Ok(receipt) => Ok(receipt),
            Err(e) if self.chain.is_real() && self.policy == FallbackPolicy::Simulate => {
                warn!(error = %e, "Contract call failed, falling back to simulation");
                Ok(self.fallback.submit(&call).await)
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(receipt) => Ok(self.resolve(&record.id, Some(receipt))),
            Err(e) => {
                self.resolve(&record.id, None);
                Err(e.into())
            }
        }
    }

    fn resolve(&self, id: &str, receipt: Option<TxReceipt>) -> TxRecord {
        let mut transactions = self.transactions.write();
        let record = transactions
            .iter_mut()
            .find(|t| t.id == id)
            .expect("transaction record vanished from the log");
        match receipt {
            Some(receipt) => {
                record.status = TxStatus::Confirmed;
                record.hash = Some(receipt.hash);
                record.simulated = receipt.simulated;
            }
            None => record.status = TxStatus::Failed,
        }
        record.clone()
    }

    /// Transaction history, newest first.
    pub fn transactions(&self) -> Vec<TxRecord> {
        let mut list = self.transactions.read().clone();
        list.reverse();
        list
    }
}
