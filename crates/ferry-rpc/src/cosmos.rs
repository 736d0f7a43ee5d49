//! Tendermint RPC broadcast and Cosmos REST account queries.
//!
//! Endpoints:
//! - GET {rest}/cosmos/auth/v1beta1/accounts/{address}
//! - POST {rpc} broadcast_tx_sync

use std::time::Duration;

use base64::Engine;
use serde_json::{json, Value};

use ferry_types::Hex;

use crate::{RpcError, RpcResult};

/// Account state needed to sequence consecutive executes.
#[derive(Debug, Clone)]
pub struct CosmosAccountInfo {
    pub account_number: String,
    pub sequence: u64,
    pub pub_key: Option<String>,
}

/// Cosmos chain client.
pub struct CosmosClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl CosmosClient {
    pub fn new(timeout_ms: Option<u64>) -> Self {
        let timeout_ms = timeout_ms.unwrap_or(15_000);
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    /// Derive the REST endpoint from a Tendermint RPC endpoint.
    pub fn rest_url(rpc_url: &str) -> String {
        rpc_url.replace("rpc", "api").replace(":26657", ":1317")
    }

    /// Fetch the account number, sequence, and public key for an address.
    pub async fn query_account(
        &self,
        rpc_url: &str,
        address: &str,
    ) -> RpcResult<CosmosAccountInfo> {
        let url = format!(
            "{}/cosmos/auth/v1beta1/accounts/{}",
            Self::rest_url(rpc_url),
            address
        );

        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(RpcError::from_reqwest)?;

        if !resp.status().is_success() {
            return Err(RpcError::Transport(format!(
                "account query returned status {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        let account = body
            .get("account")
            .ok_or_else(|| RpcError::InvalidResponse("missing account".into()))?;

        let account_number = account["account_number"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        let sequence = account["sequence"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        let pub_key = account["pub_key"]["key"].as_str().map(|k| k.to_string());

        Ok(CosmosAccountInfo {
            account_number,
            sequence,
            pub_key,
        })
    }

    /// Broadcast a raw transaction document via `broadcast_tx_sync` and
    /// return the transaction hash.
    pub async fn broadcast_tx(&self, rpc_url: &str, id: &str, tx: &Value) -> RpcResult<Hex> {
        let raw = serde_json::to_vec(tx)
            .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw);

        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "broadcast_tx_sync",
            "params": { "tx": encoded },
        });

        let resp = self
            .client
            .post(rpc_url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(RpcError::from_reqwest)?;

        if !resp.status().is_success() {
            return Err(RpcError::Transport(format!(
                "broadcast returned status {}",
                resp.status()
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        match body["result"]["hash"].as_str() {
            Some(hash) if !hash.is_empty() => Ok(hash.to_uppercase()),
            _ => Err(RpcError::Node(format!(
                "broadcast rejected: {}",
                body["error"]["message"].as_str().unwrap_or("no hash in response")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_url_derivation() {
        assert_eq!(
            CosmosClient::rest_url("https://babylon-testnet-rpc.polkachu.com"),
            "https://babylon-testnet-api.polkachu.com"
        );
        assert_eq!(
            CosmosClient::rest_url("https://node.example:26657"),
            "https://node.example:1317"
        );
    }
}
