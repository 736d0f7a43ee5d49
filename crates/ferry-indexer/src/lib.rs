//! Transfer indexer client and the indexing wait protocol.
//!
//! The indexer reports cross-chain completion asynchronously, so the wait
//! here is advisory: exhausting attempts is a soft success, not a failure.
//! This is deliberately asymmetric with receipt confirmation, which does
//! hard-fail — a missing receipt means the source transaction may not
//! exist, while a missing index entry usually just means lag.

pub mod client;
pub mod mock;

pub use client::HttpIndexer;
pub use mock::MockIndexer;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ferry_types::Hex;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;
pub const DEFAULT_INTERVAL_MS: u64 = 7_500;

/// One transfer record returned by the indexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub packet_hash: Option<Hex>,
    pub status: Option<String>,
    pub source_chain_id: Option<String>,
    pub destination_chain_id: Option<String>,
}

impl TransferRecord {
    /// Whether the indexer considers the transfer settled.
    pub fn is_complete(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| {
                let s = s.to_lowercase();
                s.contains("success") || s.contains("completed")
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Error)]
#[error("indexer query failed: {0}")]
pub struct IndexerError(pub String);

/// The indexing-service seam: one query keyed by the submission
/// transaction hash.
#[async_trait]
pub trait IndexerApi: Send + Sync {
    async fn transfer_by_tx(
        &self,
        tx_hash: &str,
    ) -> std::result::Result<Option<TransferRecord>, IndexerError>;
}

/// Progress events emitted while waiting for indexing.
#[derive(Debug, Clone)]
pub enum IndexingEvent {
    Attempt {
        attempt: u32,
        max_attempts: u32,
        status: Option<String>,
    },
    PacketSeen {
        packet_hash: Hex,
    },
    Completed {
        status: String,
        packet_hash: Option<Hex>,
    },
    Countdown {
        seconds_left: u64,
    },
    QueryFailed {
        attempt: u32,
        message: String,
    },
    TimedOut {
        attempts: u32,
    },
}

pub type IndexingEventHandler = Box<dyn Fn(IndexingEvent) + Send + Sync>;

/// Polls the indexer for bridge completion.
pub struct IndexingWaiter {
    indexer: Arc<dyn IndexerApi>,
    max_attempts: u32,
    interval: Duration,
    on_event: Option<IndexingEventHandler>,
}

impl IndexingWaiter {
    pub fn new(indexer: Arc<dyn IndexerApi>, max_attempts: u32, interval: Duration) -> Self {
        Self {
            indexer,
            max_attempts,
            interval,
            on_event: None,
        }
    }

    pub fn with_event_handler(mut self, handler: IndexingEventHandler) -> Self {
        self.on_event = Some(handler);
        self
    }

    fn emit(&self, event: IndexingEvent) {
        if let Some(ref handler) = self.on_event {
            handler(event);
        }
    }

    /// Wait until the indexer reports the transfer complete, or attempts
    /// run out.
    ///
    /// Returns true on completion AND on exhaustion: indexing lag must not
    /// block forward progress, so the transfer is presumed to settle in
    /// the background. Query errors are reported and the wait continues.
    pub async fn await_indexed(&self, tx_hash: &str) -> bool {
        for attempt in 1..=self.max_attempts {
            match self.indexer.transfer_by_tx(tx_hash).await {
                Ok(Some(record)) => {
                    if record.is_complete() {
                        self.emit(IndexingEvent::Completed {
                            status: record.status.clone().unwrap_or_default(),
                            packet_hash: record.packet_hash.clone(),
                        });
                        return true;
                    }
                    self.emit(IndexingEvent::Attempt {
                        attempt,
                        max_attempts: self.max_attempts,
                        status: record.status.clone(),
                    });
                    if let Some(packet_hash) = record.packet_hash {
                        self.emit(IndexingEvent::PacketSeen { packet_hash });
                    }
                }
                Ok(None) => {
                    self.emit(IndexingEvent::Attempt {
                        attempt,
                        max_attempts: self.max_attempts,
                        status: None,
                    });
                }
                Err(e) => {
                    self.emit(IndexingEvent::QueryFailed {
                        attempt,
                        message: e.to_string(),
                    });
                }
            }

            if attempt < self.max_attempts {
                self.countdown().await;
            }
        }

        self.emit(IndexingEvent::TimedOut {
            attempts: self.max_attempts,
        });
        true
    }

    /// Sleep out the poll interval, ticking a visible countdown when the
    /// interval is long enough to be worth showing.
    async fn countdown(&self) {
        let whole_seconds = self.interval.as_secs();
        if whole_seconds == 0 {
            tokio::time::sleep(self.interval).await;
            return;
        }
        for seconds_left in (1..=whole_seconds).rev() {
            self.emit(IndexingEvent::Countdown { seconds_left });
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }

    /// One opportunistic query: the packet hash if the transfer is already
    /// indexed, None otherwise (including on errors).
    pub async fn quick_packet_check(&self, tx_hash: &str) -> Option<Hex> {
        match self.indexer.transfer_by_tx(tx_hash).await {
            Ok(Some(record)) => record.packet_hash,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: Option<&str>, packet: Option<&str>) -> TransferRecord {
        TransferRecord {
            packet_hash: packet.map(|p| p.to_string()),
            status: status.map(|s| s.to_string()),
            source_chain_id: None,
            destination_chain_id: None,
        }
    }

    #[tokio::test]
    async fn test_soft_success_when_never_indexed() {
        let mock = Arc::new(MockIndexer::new());
        let waiter = IndexingWaiter::new(mock.clone(), 3, Duration::from_millis(1));
        assert!(waiter.await_indexed("0xabc").await);
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_completed_status_short_circuits() {
        let mock = Arc::new(MockIndexer::new());
        mock.script(Ok(Some(record(Some("PACKET_RECV"), Some("0xp1")))));
        mock.script(Ok(Some(record(Some("PACKET_ACK_SUCCESS"), Some("0xp1")))));
        let waiter = IndexingWaiter::new(mock.clone(), 8, Duration::from_millis(1));
        assert!(waiter.await_indexed("0xabc").await);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_query_errors_never_abort() {
        let mock = Arc::new(MockIndexer::new());
        mock.script(Err(IndexerError("503".into())));
        mock.script(Err(IndexerError("timeout".into())));
        mock.script(Ok(Some(record(Some("completed"), None))));
        let waiter = IndexingWaiter::new(mock.clone(), 8, Duration::from_millis(1));
        assert!(waiter.await_indexed("0xabc").await);
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_quick_packet_check() {
        let mock = Arc::new(MockIndexer::new());
        mock.script(Ok(Some(record(None, Some("0xdeadbeef")))));
        let waiter = IndexingWaiter::new(mock.clone(), 1, Duration::from_millis(1));
        assert_eq!(
            waiter.quick_packet_check("0xabc").await.as_deref(),
            Some("0xdeadbeef")
        );
        assert!(waiter.quick_packet_check("0xabc").await.is_none());
    }

    #[test]
    fn test_status_classification() {
        assert!(record(Some("PACKET_ACK_SUCCESS"), None).is_complete());
        assert!(record(Some("Completed"), None).is_complete());
        assert!(!record(Some("PACKET_SEND"), None).is_complete());
        assert!(!record(None, None).is_complete());
    }
}
