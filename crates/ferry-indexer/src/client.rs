//! GraphQL client for the transfer indexer.
//!
//! One query, keyed by the submission transaction hash.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::{IndexerApi, IndexerError, TransferRecord};

const TRANSFER_QUERY: &str = "\
query ($submission_tx_hash: String!) {
  v2_transfers(args: {p_transaction_hash: $submission_tx_hash}) {
    packet_hash
    status
    source_chain_id
    destination_chain_id
  }
}";

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<TransfersData>,
}

#[derive(Debug, Deserialize)]
struct TransfersData {
    v2_transfers: Vec<TransferRecord>,
}

/// HTTP indexer client.
pub struct HttpIndexer {
    graphql_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpIndexer {
    pub fn new(graphql_url: &str, timeout_ms: Option<u64>) -> Self {
        let timeout_ms = timeout_ms.unwrap_or(10_000);
        Self {
            graphql_url: graphql_url.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(timeout_ms))
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

#[async_trait]
impl IndexerApi for HttpIndexer {
    async fn transfer_by_tx(
        &self,
        tx_hash: &str,
    ) -> std::result::Result<Option<TransferRecord>, IndexerError> {
        let tx_hash = if tx_hash.starts_with("0x") {
            tx_hash.to_string()
        } else {
            format!("0x{}", tx_hash)
        };

        let body = json!({
            "query": TRANSFER_QUERY,
            "variables": { "submission_tx_hash": tx_hash },
        });

        let resp = self
            .client
            .post(&self.graphql_url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| IndexerError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(IndexerError(format!(
                "indexer returned status {}",
                resp.status()
            )));
        }

        let body: GraphqlResponse = resp
            .json()
            .await
            .map_err(|e| IndexerError(e.to_string()))?;

        Ok(body
            .data
            .and_then(|d| d.v2_transfers.into_iter().next()))
    }
}
