//! The Babylon → Osmosis special route: two CosmWasm executes broadcast
//! through Tendermint RPC, no receipt wait.

use ferry_config::{network, RouteDefinition, WalletCredential, INDEXER_UI_BASE};
use ferry_payload::cosmos::{
    allowance_msg, execute_tx_doc, send_msg, ALLOWANCE_FEE, BRIDGE_CONTRACT, SEND_FEE,
    SEND_FUNDS_UBBN, TOKEN_CONTRACT,
};
use ferry_payload::AttemptParams;
use ferry_rpc::{CosmosAccountInfo, EndpointPool, RpcError, RpcResult};
use ferry_types::{FerryError, Hex};

use crate::events::EngineEvent;
use crate::{Engine, IndexCheck, UnitOutcome};

/// Account defaults when every endpoint refuses the account query; the
/// broadcast then proceeds on stale sequence data and the node reports the
/// mismatch.
const FALLBACK_ACCOUNT_NUMBER: &str = "300249";
const FALLBACK_SEQUENCE: u64 = 276;

impl Engine {
    pub(crate) async fn drive_cosmos_unit(
        &self,
        wallet: &WalletCredential,
        route: &RouteDefinition,
        recipient: &str,
        verify_indexing: bool,
    ) -> (Option<Hex>, UnitOutcome) {
        let source_address = match wallet.destination_address(route.source) {
            Some(address) => address,
            None => {
                let error = FerryError::MissingDestination {
                    wallet: wallet.name.clone(),
                    network: route.source,
                };
                self.emit(EngineEvent::UnitSkipped {
                    wallet: wallet.name.clone(),
                    reason: error.to_string(),
                });
                return (
                    None,
                    UnitOutcome::Skipped {
                        reason: error.to_string(),
                    },
                );
            }
        };

        let pool = match self.pool(route.source) {
            Ok(pool) => pool,
            Err(e) => {
                return (
                    None,
                    UnitOutcome::Failed {
                        reason: e.to_string(),
                    },
                )
            }
        };

        let account = self.query_account_with_failover(&pool, &source_address).await;
        let allowance_sequence = account.sequence;
        let send_sequence = allowance_sequence + 1;

        // Step 1: allowance on the token contract.
        let allowance_doc = execute_tx_doc(
            &source_address,
            TOKEN_CONTRACT,
            &allowance_msg(),
            vec![],
            account.pub_key.as_deref(),
            allowance_sequence,
            ALLOWANCE_FEE,
        );
        let allowance_hash = match self
            .broadcast_with_failover(&pool, "allowance-tx", &allowance_doc)
            .await
        {
            Ok(hash) => hash,
            Err(e) => {
                let error = FerryError::Submission(e.to_string());
                return (
                    None,
                    UnitOutcome::Failed {
                        reason: error.to_string(),
                    },
                );
            }
        };
        self.emit(EngineEvent::ApprovalSubmitted {
            wallet: wallet.name.clone(),
            tx_hash: allowance_hash.clone(),
        });
        self.pause(
            self.options.cosmos_confirm_delay,
            "waiting for allowance confirmation",
        )
        .await;
        self.emit(EngineEvent::ApprovalConfirmed {
            wallet: wallet.name.clone(),
            tx_hash: allowance_hash,
        });

        // Step 2: the bridge send.
        let params = AttemptParams::generate();
        let channel_id = route.channel_id.unwrap_or(5);
        let message = send_msg(&source_address, recipient, channel_id, &params);
        let send_doc = execute_tx_doc(
            &source_address,
            BRIDGE_CONTRACT,
            &message,
            vec![("ubbn", SEND_FUNDS_UBBN)],
            account.pub_key.as_deref(),
            send_sequence,
            SEND_FEE,
        );

        match self.broadcast_with_failover(&pool, "send-tx", &send_doc).await {
            Ok(tx_hash) => {
                self.emit(EngineEvent::Submitted {
                    wallet: wallet.name.clone(),
                    network: route.source,
                    tx_hash: tx_hash.clone(),
                });
                let config = network(route.source);
                self.emit(EngineEvent::Confirmed {
                    wallet: wallet.name.clone(),
                    tx_hash: tx_hash.clone(),
                    gas_used: 0,
                    explorer_url: format!("{}{}", config.explorer_base, tx_hash),
                    indexer_url: format!("{}{}", INDEXER_UI_BASE, tx_hash),
                });

                let indexing = if verify_indexing {
                    self.await_indexing(wallet, &tx_hash).await;
                    IndexCheck::Acknowledged
                } else {
                    IndexCheck::Skipped
                };
                (
                    Some(tx_hash.clone()),
                    UnitOutcome::Confirmed { tx_hash, indexing },
                )
            }
            Err(e) => {
                let error = FerryError::Submission(e.to_string());
                (
                    None,
                    UnitOutcome::Failed {
                        reason: error.to_string(),
                    },
                )
            }
        }
    }

    /// One account query per endpoint, rotating on failure; falls back to
    /// stale defaults when the whole pool refuses.
    async fn query_account_with_failover(
        &self,
        pool: &EndpointPool,
        address: &str,
    ) -> CosmosAccountInfo {
        for _ in 0..pool.len() {
            let endpoint = pool.current();
            match self.cosmos.query_account(&endpoint, address).await {
                Ok(account) => return account,
                Err(_) => {
                    pool.rotate();
                }
            }
        }
        CosmosAccountInfo {
            account_number: FALLBACK_ACCOUNT_NUMBER.to_string(),
            sequence: FALLBACK_SEQUENCE,
            pub_key: None,
        }
    }

    async fn broadcast_with_failover(
        &self,
        pool: &EndpointPool,
        id: &str,
        doc: &serde_json::Value,
    ) -> RpcResult<Hex> {
        let mut last_error = RpcError::Node("no endpoints available".into());
        for _ in 0..pool.len() {
            let endpoint = pool.current();
            match self.cosmos.broadcast_tx(&endpoint, id, doc).await {
                Ok(hash) => return Ok(hash),
                Err(e) => {
                    last_error = e;
                    pool.rotate();
                    self.emit(EngineEvent::EndpointRotated {
                        network: pool.network(),
                        position: pool.position(),
                        pool_size: pool.len(),
                    });
                }
            }
        }
        Err(last_error)
    }
}
