//! Simulated chain: fabricated accounts, balances, and confirmations.
//!
//! Delays come from configuration so tests can run with zero latency while
//! the default profile keeps the demo feel of a slow network.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::{ContractCall, TxReceipt};
use crate::config::ChainConfig;

/// The fixed account the simulator reports after a connect.
pub const DEMO_ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

/// Native balance reported for the demo account, in ETH.
const DEMO_NATIVE_BALANCE: f64 = 2.5;

pub struct SimulatedChain {
    chain_id: AtomicU64,
    connect_delay: Duration,
    call_delay: Duration,
}

impl SimulatedChain {
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            chain_id: AtomicU64::new(config.chain_id),
            connect_delay: Duration::from_millis(config.connect_delay_ms),
            call_delay: Duration::from_millis(config.call_delay_ms),
        }
    }

    /// Pretend to negotiate a wallet connection, then hand back the demo
    /// account.
    pub async fn connect(&self) -> String {
        tokio::time::sleep(self.connect_delay).await;
        DEMO_ADDRESS.to_string()
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id.load(Ordering::Relaxed)
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.chain_id.store(chain_id, Ordering::Relaxed);
    }

    pub fn native_balance(&self) -> f64 {
        DEMO_NATIVE_BALANCE
    }

    /// Wait out the fake confirmation delay and fabricate a receipt. The
    /// call itself has no effect anywhere.
    pub async fn submit(&self, _call: &ContractCall) -> TxReceipt {
        tokio::time::sleep(self.call_delay).await;
        TxReceipt {
            hash: fabricate_tx_hash(),
            simulated: true,
        }
    }
}

/// Random 32-byte hash in 0x-prefixed hex, shaped like a real tx hash.
pub fn fabricate_tx_hash() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> ChainConfig {
        ChainConfig {
            connect_delay_ms: 0,
            call_delay_ms: 0,
            ..ChainConfig::default()
        }
    }

    #[tokio::test]
    async fn test_connect_returns_demo_address() {
        let sim = SimulatedChain::new(&fast_config());
        assert_eq!(sim.connect().await, DEMO_ADDRESS);
    }

    #[tokio::test]
    async fn test_connect_resolves_within_a_second() {
        let config = ChainConfig {
            connect_delay_ms: 800,
            ..fast_config()
        };
        let sim = SimulatedChain::new(&config);
        let start = std::time::Instant::now();
        let address = sim.connect().await;
        assert_eq!(address, DEMO_ADDRESS);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_submit_fabricates_unique_hashes() {
        let sim = SimulatedChain::new(&fast_config());
        let call = ContractCall::GenerateYield {
            pool_id: "p1".to_string(),
        };
        let a = sim.submit(&call).await;
        let b = sim.submit(&call).await;
        assert!(a.simulated && b.simulated);
        assert_ne!(a.hash, b.hash);
        assert!(a.hash.starts_with("0x"));
        assert_eq!(a.hash.len(), 66);
    }
}
