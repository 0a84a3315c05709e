//! Chain client used by the wallet layer.
//!
//! The client is a tagged variant: `Real` talks JSON-RPC to a configured
//! provider, `Simulated` fabricates results after a fixed delay. Callers see
//! which path produced a result; the fallback from real to simulated is an
//! explicit policy decision, not a silent catch.

mod rpc;
mod sim;

pub use rpc::RpcClient;
pub use sim::{SimulatedChain, DEMO_ADDRESS};

use crate::config::ChainConfig;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("provider rejected request: {0}")]
    Rpc(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned no accounts")]
    NoAccounts,
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// A contract interaction submitted through the wallet.
#[derive(Debug, Clone)]
pub enum ContractCall {
    Invest { pool_id: String, amount_eth: f64 },
    GenerateYield { pool_id: String },
    SubmitQuiz { course_id: String, score: u32 },
    ClaimReward { course_id: String },
    MintCertificate { course_id: String, recipient: String },
}

impl ContractCall {
    /// Human-readable description used in the transaction log.
    pub fn description(&self) -> String {
        match self {
            Self::Invest { pool_id, amount_eth } => {
                format!("Invest {} ETH in pool {}", amount_eth, pool_id)
            }
            Self::GenerateYield { pool_id } => format!("Generate yield for pool {}", pool_id),
            Self::SubmitQuiz { course_id, score } => {
                format!("Submit quiz for course {} (score {})", course_id, score)
            }
            Self::ClaimReward { course_id } => format!("Claim reward for course {}", course_id),
            Self::MintCertificate { course_id, .. } => {
                format!("Mint certificate for course {}", course_id)
            }
        }
    }
}

/// Receipt for a submitted transaction.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub hash: String,
    /// True when the receipt was fabricated by the simulated path
    pub simulated: bool,
}

/// Tagged chain client (see module docs).
pub enum ChainClient {
    Real(RpcClient),
    Simulated(SimulatedChain),
}

impl ChainClient {
    /// Build the client the configuration asks for. A provider URL selects
    /// the real path; otherwise everything is simulated.
    pub fn from_config(config: &ChainConfig) -> Self {
        match &config.provider_url {
            Some(url) => Self::Real(RpcClient::new(url.clone())),
            None => Self::Simulated(SimulatedChain::new(config)),
        }
    }

    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real(_))
    }

    /// Simulated client used when the real path is abandoned mid-call.
    pub fn simulated_fallback(config: &ChainConfig) -> SimulatedChain {
        SimulatedChain::new(config)
    }

    /// Request the provider's accounts, or fabricate the demo account.
    pub async fn request_accounts(&self) -> Result<Vec<String>, ChainError> {
        match self {
            Self::Real(rpc) => rpc.request_accounts().await,
            Self::Simulated(sim) => Ok(vec![sim.connect().await]),
        }
    }

    /// Current chain id as reported by the provider.
    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        match self {
            Self::Real(rpc) => rpc.chain_id().await,
            Self::Simulated(sim) => Ok(sim.chain_id()),
        }
    }

    /// Ask the provider to switch networks. The simulated path sets the
    /// requested id optimistically.
    pub async fn switch_chain(&self, chain_id: u64) -> Result<(), ChainError> {
        match self {
            Self::Real(rpc) => rpc.switch_chain(chain_id).await,
            Self::Simulated(sim) => {
                sim.set_chain_id(chain_id);
                Ok(())
            }
        }
    }

    /// Native balance of an address in ETH.
    pub async fn native_balance(&self, address: &str) -> Result<f64, ChainError> {
        match self {
            Self::Real(rpc) => rpc.native_balance(address).await,
            Self::Simulated(sim) => Ok(sim.native_balance()),
        }
    }

    /// Submit a contract call and wait for a receipt.
    pub async fn submit(&self, from: &str, call: &ContractCall) -> Result<TxReceipt, ChainError> {
        match self {
            Self::Real(rpc) => rpc.submit(from, call).await,
            Self::Simulated(sim) => Ok(sim.submit(call).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;

    fn sim_config() -> ChainConfig {
        ChainConfig {
            connect_delay_ms: 0,
            call_delay_ms: 0,
            ..ChainConfig::default()
        }
    }

    #[tokio::test]
    async fn test_simulated_client_selected_without_provider() {
        let client = ChainClient::from_config(&sim_config());
        assert!(!client.is_real());
        let accounts = client.request_accounts().await.unwrap();
        assert_eq!(accounts, vec![DEMO_ADDRESS.to_string()]);
    }

    #[tokio::test]
    async fn test_real_client_selected_with_provider() {
        let config = ChainConfig {
            provider_url: Some("http://localhost:8545".to_string()),
            ..sim_config()
        };
        let client = ChainClient::from_config(&config);
        assert!(client.is_real());
    }

    #[tokio::test]
    async fn test_simulated_switch_is_optimistic() {
        let client = ChainClient::from_config(&sim_config());
        client.switch_chain(137).await.unwrap();
        assert_eq!(client.chain_id().await.unwrap(), 137);
    }

    #[test]
    fn test_call_descriptions() {
        let call = ContractCall::Invest {
            pool_id: "stable-eth".to_string(),
            amount_eth: 0.5,
        };
        assert_eq!(call.description(), "Invest 0.5 ETH in pool stable-eth");
    }
}
