//! Scriptable chain client for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use ferry_config::WalletCredential;
use ferry_types::Hex;

use crate::{ChainClient, Receipt, RpcError, RpcResult, TxRequest};

/// In-memory chain client. Receipt and submission responses are scripted
/// queues; balances and allowances are plain maps. Every call is counted
/// per method so tests can assert which network calls happened.
#[derive(Default)]
pub struct MockChainClient {
    receipts: Mutex<VecDeque<RpcResult<Option<Receipt>>>>,
    balances: Mutex<HashMap<String, u128>>,
    token_balances: Mutex<HashMap<(String, String), u128>>,
    allowances: Mutex<HashMap<(String, String), u128>>,
    submissions: Mutex<VecDeque<RpcResult<Hex>>>,
    submitted: Mutex<Vec<TxRequest>>,
    calls: Mutex<HashMap<&'static str, u32>>,
    endpoints_seen: Mutex<Vec<String>>,
}

impl MockChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, method: &'static str, endpoint: &str) {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
        self.endpoints_seen.lock().unwrap().push(endpoint.to_string());
    }

    /// Queue the next receipt-poll response. When the queue is empty,
    /// polls return `Ok(None)` (not yet mined).
    pub fn script_receipt(&self, result: RpcResult<Option<Receipt>>) {
        self.receipts.lock().unwrap().push_back(result);
    }

    pub fn script_receipts(&self, results: impl IntoIterator<Item = RpcResult<Option<Receipt>>>) {
        self.receipts.lock().unwrap().extend(results);
    }

    /// Queue the next submission response. When the queue is empty,
    /// submissions fail.
    pub fn script_submission(&self, result: RpcResult<Hex>) {
        self.submissions.lock().unwrap().push_back(result);
    }

    pub fn set_balance(&self, address: &str, value: u128) {
        self.balances.lock().unwrap().insert(address.to_string(), value);
    }

    pub fn set_token_balance(&self, token: &str, address: &str, value: u128) {
        self.token_balances
            .lock()
            .unwrap()
            .insert((token.to_string(), address.to_string()), value);
    }

    pub fn set_allowance(&self, owner: &str, spender: &str, value: u128) {
        self.allowances
            .lock()
            .unwrap()
            .insert((owner.to_string(), spender.to_string()), value);
    }

    /// Number of calls made to one trait method.
    pub fn calls(&self, method: &str) -> u32 {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    /// Total network calls across all methods.
    pub fn total_calls(&self) -> u32 {
        self.calls.lock().unwrap().values().sum()
    }

    /// Every endpoint handed to the client, in call order.
    pub fn endpoints_seen(&self) -> Vec<String> {
        self.endpoints_seen.lock().unwrap().clone()
    }

    /// Every transaction submitted, in order.
    pub fn submitted(&self) -> Vec<TxRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn get_transaction_receipt(
        &self,
        endpoint: &str,
        _tx_hash: &str,
    ) -> RpcResult<Option<Receipt>> {
        self.record("get_transaction_receipt", endpoint);
        self.receipts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }

    async fn get_balance(&self, endpoint: &str, address: &str) -> RpcResult<u128> {
        self.record("get_balance", endpoint);
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(0))
    }

    async fn get_token_balance(
        &self,
        endpoint: &str,
        token: &str,
        address: &str,
    ) -> RpcResult<u128> {
        self.record("get_token_balance", endpoint);
        Ok(self
            .token_balances
            .lock()
            .unwrap()
            .get(&(token.to_string(), address.to_string()))
            .copied()
            .unwrap_or(0))
    }

    async fn get_allowance(
        &self,
        endpoint: &str,
        _token: &str,
        owner: &str,
        spender: &str,
    ) -> RpcResult<u128> {
        self.record("get_allowance", endpoint);
        Ok(self
            .allowances
            .lock()
            .unwrap()
            .get(&(owner.to_string(), spender.to_string()))
            .copied()
            .unwrap_or(0))
    }

    async fn send_transaction(
        &self,
        endpoint: &str,
        _wallet: &WalletCredential,
        tx: &TxRequest,
    ) -> RpcResult<Hex> {
        self.record("send_transaction", endpoint);
        self.submitted.lock().unwrap().push(tx.clone());
        self.submissions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::Node("no scripted submission".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_receipts_drain_in_order() {
        let mock = MockChainClient::new();
        mock.script_receipt(Ok(None));
        mock.script_receipt(Ok(Some(Receipt {
            tx_hash: "0xabc".into(),
            success: true,
            gas_used: 21_000,
        })));

        assert!(mock
            .get_transaction_receipt("https://rpc0", "0xabc")
            .await
            .unwrap()
            .is_none());
        let receipt = mock
            .get_transaction_receipt("https://rpc0", "0xabc")
            .await
            .unwrap()
            .unwrap();
        assert!(receipt.success);
        // queue drained: back to not-yet-mined
        assert!(mock
            .get_transaction_receipt("https://rpc0", "0xabc")
            .await
            .unwrap()
            .is_none());
        assert_eq!(mock.calls("get_transaction_receipt"), 3);
    }
}
