//! Chain access: endpoint pools, the chain-client seam, and its HTTP and
//! mock implementations.
//!
//! Every client method takes the endpoint URL explicitly. The caller owns
//! the [`EndpointPool`] and decides when to rotate; the client is pure
//! transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ferry_config::{GasSettings, WalletCredential};
use ferry_types::Hex;

pub mod cosmos;
pub mod erc20;
pub mod http;
pub mod mock;
pub mod pool;

pub use cosmos::{CosmosAccountInfo, CosmosClient};
pub use http::HttpChainClient;
pub use mock::MockChainClient;
pub use pool::EndpointPool;

/// RPC-layer error, classified so callers can tell transient timeouts
/// (which trigger endpoint rotation) from everything else.
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("node rejected request: {0}")]
    Node(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl RpcError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RpcError::Timeout(_))
    }

    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RpcError::Timeout(e.to_string())
        } else {
            RpcError::Transport(e.to_string())
        }
    }
}

pub type RpcResult<T> = std::result::Result<T, RpcError>;

/// A mined transaction receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: Hex,
    /// False when the chain executed and reverted the transaction.
    pub success: bool,
    pub gas_used: u128,
}

/// A transaction ready for submission. The sender is the wallet passed to
/// [`ChainClient::send_transaction`].
#[derive(Debug, Clone)]
pub struct TxRequest {
    pub to: Hex,
    pub value_wei: u128,
    pub data: Hex,
    pub gas: GasSettings,
}

/// The chain RPC seam.
///
/// Signing is the node's concern: `send_transaction` hands the unsigned
/// shape to the endpoint and the wallet's key never leaves configuration.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_transaction_receipt(
        &self,
        endpoint: &str,
        tx_hash: &str,
    ) -> RpcResult<Option<Receipt>>;

    async fn get_balance(&self, endpoint: &str, address: &str) -> RpcResult<u128>;

    async fn get_token_balance(
        &self,
        endpoint: &str,
        token: &str,
        address: &str,
    ) -> RpcResult<u128>;

    async fn get_allowance(
        &self,
        endpoint: &str,
        token: &str,
        owner: &str,
        spender: &str,
    ) -> RpcResult<u128>;

    async fn send_transaction(
        &self,
        endpoint: &str,
        wallet: &WalletCredential,
        tx: &TxRequest,
    ) -> RpcResult<Hex>;
}
