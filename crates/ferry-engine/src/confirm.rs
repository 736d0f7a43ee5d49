//! Receipt confirmation: poll the source chain until the transaction is
//! mined or attempts run out.

use std::time::Duration;

use ferry_rpc::{ChainClient, EndpointPool, Receipt};
use ferry_types::{FerryError, Result};

use crate::events::{EngineEvent, EventHandler};

/// Polls for a transaction receipt.
///
/// Unlike the indexing wait, this one hard-fails: without a receipt the
/// caller cannot know whether the transaction went through, so exhausting
/// attempts is an error.
pub struct ConfirmationWaiter {
    max_attempts: u32,
    interval: Duration,
    on_event: Option<EventHandler>,
}

impl ConfirmationWaiter {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            on_event: None,
        }
    }

    pub fn with_event_handler(mut self, handler: EventHandler) -> Self {
        self.on_event = Some(handler);
        self
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(ref handler) = self.on_event {
            handler(event);
        }
    }

    /// Poll until a receipt appears.
    ///
    /// A not-yet-mined gap retries without touching the pool. A
    /// timeout-classified RPC error rotates the endpoint before the next
    /// attempt; other errors retry on the same endpoint. A receipt with
    /// failed status is `TransactionReverted`, distinct from the
    /// `ReceiptTimeout` raised after the last attempt.
    pub async fn await_receipt(
        &self,
        client: &dyn ChainClient,
        pool: &EndpointPool,
        tx_hash: &str,
    ) -> Result<Receipt> {
        for attempt in 1..=self.max_attempts {
            let endpoint = pool.current();
            match client.get_transaction_receipt(&endpoint, tx_hash).await {
                Ok(Some(receipt)) => {
                    if receipt.success {
                        return Ok(receipt);
                    }
                    return Err(FerryError::TransactionReverted {
                        tx_hash: receipt.tx_hash,
                    });
                }
                Ok(None) => {}
                Err(e) if e.is_timeout() => {
                    pool.rotate();
                    self.emit(EngineEvent::EndpointRotated {
                        network: pool.network(),
                        position: pool.position(),
                        pool_size: pool.len(),
                    });
                }
                Err(_) => {}
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        Err(FerryError::ReceiptTimeout {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_rpc::{MockChainClient, RpcError};
    use ferry_types::NetworkId;

    fn pool() -> EndpointPool {
        EndpointPool::new(
            NetworkId::Sepolia,
            vec![
                "https://rpc0.example".into(),
                "https://rpc1.example".into(),
            ],
        )
        .unwrap()
    }

    fn receipt(success: bool) -> Receipt {
        Receipt {
            tx_hash: "0xabc".into(),
            success,
            gas_used: 21_000,
        }
    }

    #[tokio::test]
    async fn test_receipt_found_on_nth_poll_without_rotation() {
        let mock = MockChainClient::new();
        // two not-yet-mined gaps, then the receipt
        mock.script_receipts([Ok(None), Ok(None), Ok(Some(receipt(true)))]);
        let pool = pool();
        let waiter = ConfirmationWaiter::new(5, Duration::from_millis(1));

        let found = waiter.await_receipt(&mock, &pool, "0xabc").await.unwrap();
        assert!(found.success);
        assert_eq!(mock.calls("get_transaction_receipt"), 3);
        assert_eq!(pool.position(), 0, "gaps must not rotate the endpoint");
    }

    #[tokio::test]
    async fn test_persistent_timeout_fails_after_exact_attempts() {
        let mock = MockChainClient::new();
        mock.script_receipts((0..4).map(|_| Err(RpcError::Timeout("deadline".into()))));
        let pool = pool();
        let waiter = ConfirmationWaiter::new(4, Duration::from_millis(1));

        let err = waiter.await_receipt(&mock, &pool, "0xabc").await.unwrap_err();
        assert!(matches!(err, FerryError::ReceiptTimeout { attempts: 4 }));
        assert_eq!(mock.calls("get_transaction_receipt"), 4);
        // 4 rotations over a pool of 2 ends back at 0, but the endpoints
        // seen prove rotation happened
        let seen = mock.endpoints_seen();
        assert!(seen.contains(&"https://rpc1.example".to_string()));
    }

    #[tokio::test]
    async fn test_non_timeout_errors_do_not_rotate() {
        let mock = MockChainClient::new();
        mock.script_receipts([
            Err(RpcError::Node("boom".into())),
            Ok(Some(receipt(true))),
        ]);
        let pool = pool();
        let waiter = ConfirmationWaiter::new(3, Duration::from_millis(1));

        waiter.await_receipt(&mock, &pool, "0xabc").await.unwrap();
        assert_eq!(pool.position(), 0);
    }

    #[tokio::test]
    async fn test_failed_receipt_reports_revert() {
        let mock = MockChainClient::new();
        mock.script_receipt(Ok(Some(receipt(false))));
        let pool = pool();
        let waiter = ConfirmationWaiter::new(3, Duration::from_millis(1));

        let err = waiter.await_receipt(&mock, &pool, "0xabc").await.unwrap_err();
        assert!(matches!(err, FerryError::TransactionReverted { .. }));
        assert_eq!(mock.calls("get_transaction_receipt"), 1);
    }
}
