//! Scriptable indexer for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{IndexerApi, IndexerError, TransferRecord};

/// In-memory indexer. Responses are a scripted queue; when it drains,
/// queries report the transfer as not indexed yet.
#[derive(Default)]
pub struct MockIndexer {
    responses: Mutex<VecDeque<std::result::Result<Option<TransferRecord>, IndexerError>>>,
    calls: Mutex<u32>,
}

impl MockIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, response: std::result::Result<Option<TransferRecord>, IndexerError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl IndexerApi for MockIndexer {
    async fn transfer_by_tx(
        &self,
        _tx_hash: &str,
    ) -> std::result::Result<Option<TransferRecord>, IndexerError> {
        *self.calls.lock().unwrap() += 1;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }
}
