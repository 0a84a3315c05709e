//! JSON-RPC bridge to a real Ethereum-compatible provider.
//!
//! Only the handful of methods the wallet layer needs: account listing,
//! chain id, network switch, balance lookup, and transaction submission.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{ChainError, ContractCall, TxReceipt};

const WEI_PER_ETH: f64 = 1e18;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

pub struct RpcClient {
    url: String,
    client: reqwest::Client,
}

impl RpcClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }

    /// Issue a single JSON-RPC call and unwrap the result value.
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response: RpcResponse = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(ChainError::Rpc(format!("{} ({})", err.message, err.code)));
        }

        response
            .result
            .ok_or_else(|| ChainError::Malformed("response carries neither result nor error".into()))
    }

    pub async fn request_accounts(&self) -> Result<Vec<String>, ChainError> {
        let result = self.call("eth_accounts", json!([])).await?;
        let accounts: Vec<String> = serde_json::from_value(result)
            .map_err(|e| ChainError::Malformed(e.to_string()))?;
        if accounts.is_empty() {
            return Err(ChainError::NoAccounts);
        }
        Ok(accounts)
    }

    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        let result = self.call("eth_chainId", json!([])).await?;
        parse_quantity(&result)
    }

    pub async fn switch_chain(&self, chain_id: u64) -> Result<(), ChainError> {
        self.call(
            "wallet_switchEthereumChain",
            json!([{ "chainId": format!("{:#x}", chain_id) }]),
        )
        .await?;
        Ok(())
    }

    pub async fn native_balance(&self, address: &str) -> Result<f64, ChainError> {
        let result = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        let wei = parse_wide_quantity(&result)?;
        Ok(wei / WEI_PER_ETH)
    }

    pub async fn submit(&self, from: &str, call: &ContractCall) -> Result<TxReceipt, ChainError> {
        // The platform contracts are addressed by call kind; data is the
        // call description, which is enough for a provider-side dev node.
        let tx = json!([{
            "from": from,
            "data": format!("0x{}", hex::encode(call.description().as_bytes())),
        }]);
        let result = self.call("eth_sendTransaction", tx).await?;
        let hash: String = serde_json::from_value(result)
            .map_err(|e| ChainError::Malformed(e.to_string()))?;
        Ok(TxReceipt {
            hash,
            simulated: false,
        })
    }
}

/// Parse a 0x-prefixed hex quantity into a u64.
fn parse_quantity(value: &Value) -> Result<u64, ChainError> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::Malformed(format!("expected hex string, got {}", value)))?;
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::Malformed(format!("bad hex quantity {}: {}", s, e)))
}

/// Parse a 0x-prefixed hex quantity that may exceed u64 (wei balances).
fn parse_wide_quantity(value: &Value) -> Result<f64, ChainError> {
    let s = value
        .as_str()
        .ok_or_else(|| ChainError::Malformed(format!("expected hex string, got {}", value)))?;
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u128::from_str_radix(digits, 16)
        .map(|wei| wei as f64)
        .map_err(|e| ChainError::Malformed(format!("bad hex quantity {}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(&json!("0x1")).unwrap(), 1);
        assert_eq!(parse_quantity(&json!("0xaa36a7")).unwrap(), 11155111);
        assert!(parse_quantity(&json!("nope")).is_err());
        assert!(parse_quantity(&json!(42)).is_err());
    }

    #[test]
    fn test_parse_wide_quantity_handles_wei() {
        // 2.5 ETH in wei overflows nothing but exercises the wide path
        let wei = json!("0x22b1c8c1227a0000");
        let parsed = parse_wide_quantity(&wei).unwrap();
        assert!((parsed / WEI_PER_ETH - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_rpc_error_deserializes() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected"}}"#;
        let response: RpcResponse = serde_json::from_str(body).unwrap();
        let err = response.error.unwrap();
        assert_eq!(err.code, 4001);
        assert_eq!(err.message, "User rejected");
        assert!(response.result.is_none());
    }
}
