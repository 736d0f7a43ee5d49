//! EVM JSON-RPC client over HTTP.
//!
//! Methods used:
//! - eth_getTransactionReceipt
//! - eth_getBalance
//! - eth_call (ERC-20 balanceOf / allowance)
//! - eth_sendTransaction (node-side signing)

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use ferry_config::{GasSettings, WalletCredential};
use ferry_types::{bytes_to_hex, hex_to_bytes, parse_quantity, to_quantity, Hex};

use crate::{erc20, ChainClient, Receipt, RpcError, RpcResult, TxRequest};

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC chain client.
pub struct HttpChainClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpChainClient {
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

    async fn rpc(&self, endpoint: &str, method: &str, params: Value) -> RpcResult<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let resp = self
            .client
            .post(endpoint)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(RpcError::from_reqwest)?;

        if !resp.status().is_success() {
            return Err(RpcError::Transport(format!(
                "{} returned status {}",
                endpoint,
                resp.status()
            )));
        }

        let body: JsonRpcResponse = resp
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(RpcError::Node(format!("{} (code {})", err.message, err.code)));
        }

        body.result
            .ok_or_else(|| RpcError::InvalidResponse("missing result".into()))
    }

    async fn quantity(&self, endpoint: &str, method: &str, params: Value) -> RpcResult<u128> {
        let result = self.rpc(endpoint, method, params).await?;
        let quantity = result
            .as_str()
            .ok_or_else(|| RpcError::InvalidResponse("expected hex quantity".into()))?;
        parse_quantity(quantity).map_err(|e| RpcError::InvalidResponse(e.to_string()))
    }

    async fn eth_call(&self, endpoint: &str, to: &str, data: Vec<u8>) -> RpcResult<Vec<u8>> {
        let result = self
            .rpc(
                endpoint,
                "eth_call",
                json!([{ "to": to, "data": bytes_to_hex(&data) }, "latest"]),
            )
            .await?;
        let hex_str = result
            .as_str()
            .ok_or_else(|| RpcError::InvalidResponse("expected hex data".into()))?;
        hex_to_bytes(hex_str).map_err(|e| RpcError::InvalidResponse(e.to_string()))
    }
}

fn gas_fields(tx_obj: &mut serde_json::Map<String, Value>, gas: &GasSettings) {
    match *gas {
        GasSettings::Legacy {
            gas_limit,
            gas_price_wei,
        } => {
            tx_obj.insert("gas".into(), json!(to_quantity(gas_limit as u128)));
            tx_obj.insert("gasPrice".into(), json!(to_quantity(gas_price_wei)));
        }
        GasSettings::Eip1559 {
            gas_limit,
            max_fee_wei,
            max_priority_wei,
        } => {
            tx_obj.insert("gas".into(), json!(to_quantity(gas_limit as u128)));
            tx_obj.insert("maxFeePerGas".into(), json!(to_quantity(max_fee_wei)));
            tx_obj.insert(
                "maxPriorityFeePerGas".into(),
                json!(to_quantity(max_priority_wei)),
            );
        }
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn get_transaction_receipt(
        &self,
        endpoint: &str,
        tx_hash: &str,
    ) -> RpcResult<Option<Receipt>> {
        let result = self
            .rpc(endpoint, "eth_getTransactionReceipt", json!([tx_hash]))
            .await?;

        if result.is_null() {
            return Ok(None);
        }

        let status = result["status"].as_str().unwrap_or("0x0");
        let gas_used = result["gasUsed"]
            .as_str()
            .and_then(|q| parse_quantity(q).ok())
            .unwrap_or(0);

        Ok(Some(Receipt {
            tx_hash: tx_hash.to_string(),
            success: status == "0x1",
            gas_used,
        }))
    }

    async fn get_balance(&self, endpoint: &str, address: &str) -> RpcResult<u128> {
        self.quantity(endpoint, "eth_getBalance", json!([address, "latest"]))
            .await
    }

    async fn get_token_balance(
        &self,
        endpoint: &str,
        token: &str,
        address: &str,
    ) -> RpcResult<u128> {
        let data = erc20::encode_balance_of(address)?;
        let returned = self.eth_call(endpoint, token, data).await?;
        erc20::decode_uint(&returned)
    }

    async fn get_allowance(
        &self,
        endpoint: &str,
        token: &str,
        owner: &str,
        spender: &str,
    ) -> RpcResult<u128> {
        let data = erc20::encode_allowance(owner, spender)?;
        let returned = self.eth_call(endpoint, token, data).await?;
        erc20::decode_uint(&returned)
    }

    async fn send_transaction(
        &self,
        endpoint: &str,
        wallet: &WalletCredential,
        tx: &TxRequest,
    ) -> RpcResult<Hex> {
        let mut tx_obj = serde_json::Map::new();
        tx_obj.insert("from".into(), json!(wallet.address));
        tx_obj.insert("to".into(), json!(tx.to));
        tx_obj.insert("value".into(), json!(to_quantity(tx.value_wei)));
        tx_obj.insert("data".into(), json!(tx.data));
        gas_fields(&mut tx_obj, &tx.gas);

        let result = self
            .rpc(endpoint, "eth_sendTransaction", json!([Value::Object(tx_obj)]))
            .await?;

        result
            .as_str()
            .map(|h| h.to_string())
            .ok_or_else(|| RpcError::InvalidResponse("expected transaction hash".into()))
    }
}
