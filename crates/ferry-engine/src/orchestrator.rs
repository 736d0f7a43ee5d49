//! Run sequencing: wallets × transfers × routes, strictly in order.

use rand::Rng;

use ferry_config::{
    network, random_pool, route, RouteDefinition, RouteKind, WalletCredential, INDEXER_UI_BASE,
};
use ferry_indexer::IndexingWaiter;
use ferry_payload::{build_calldata, AttemptParams};
use ferry_types::{FerryError, Hex, Result, RouteId};

use crate::events::EngineEvent;
use crate::policy::{disposition, ErrorDisposition};
use crate::{Engine, IndexCheck, TransferAttempt, UnitOutcome};

/// How the orchestrator chooses a route for each unit of work.
#[derive(Debug, Clone)]
pub enum RoutePlan {
    /// Every unit runs the same route.
    Fixed(RouteId),
    /// Each unit independently picks uniformly from this subset; repeats
    /// are allowed.
    RandomFrom(Vec<RouteId>),
    /// Each unit picks uniformly from the whole random pool; a fixed
    /// global transfer total is spread round-robin across wallets.
    AnyToAny { total_transfers: u32 },
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub transfers_per_wallet: u32,
    /// Opt-in: block on the indexer after each confirmation.
    pub verify_indexing: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            transfers_per_wallet: 1,
            verify_indexing: false,
        }
    }
}

/// What a run did, for the closing report. Discarded afterwards; nothing
/// persists between runs.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub completed: u32,
    pub total: u32,
    pub attempts: Vec<TransferAttempt>,
}

impl Engine {
    /// Execute a whole run. Unit-local failures never abort the run; the
    /// only process-level error here is an empty wallet set.
    pub async fn run(
        &self,
        wallets: &[WalletCredential],
        plan: &RoutePlan,
        options: &RunOptions,
    ) -> Result<RunSummary> {
        if wallets.is_empty() {
            return Err(FerryError::Config("no wallets configured".into()));
        }

        let total = match plan {
            RoutePlan::AnyToAny { total_transfers } => *total_transfers,
            _ => wallets.len() as u32 * options.transfers_per_wallet,
        };
        self.emit(EngineEvent::RunStarted {
            wallets: wallets.len(),
            total_units: total,
        });

        let mut summary = RunSummary {
            completed: 0,
            total,
            attempts: Vec::new(),
        };

        match plan {
            RoutePlan::AnyToAny { total_transfers } => {
                for unit_index in 0..*total_transfers {
                    let wallet = &wallets[unit_index as usize % wallets.len()];
                    let route = self.pick_route(plan)?;
                    self.emit(EngineEvent::RouteChosen {
                        wallet: wallet.name.clone(),
                        route_id: route.id,
                        route_label: route.label.to_string(),
                    });
                    self.run_unit(
                        wallet,
                        &route,
                        unit_index + 1,
                        *total_transfers,
                        options.verify_indexing,
                        &mut summary,
                    )
                    .await;
                    if unit_index + 1 < *total_transfers {
                        self.pause(self.options.inter_op_delay, "pacing before next transfer")
                            .await;
                    }
                }
            }
            _ => {
                for (wallet_index, wallet) in wallets.iter().enumerate() {
                    for transfer_index in 0..options.transfers_per_wallet {
                        let route = self.pick_route(plan)?;
                        if matches!(plan, RoutePlan::RandomFrom(_)) {
                            self.emit(EngineEvent::RouteChosen {
                                wallet: wallet.name.clone(),
                                route_id: route.id,
                                route_label: route.label.to_string(),
                            });
                        }
                        self.run_unit(
                            wallet,
                            &route,
                            transfer_index + 1,
                            options.transfers_per_wallet,
                            options.verify_indexing,
                            &mut summary,
                        )
                        .await;
                        if transfer_index + 1 < options.transfers_per_wallet {
                            self.pause(self.options.inter_op_delay, "pacing before next transfer")
                                .await;
                        }
                    }
                    if wallet_index + 1 < wallets.len() {
                        self.pause(self.options.inter_op_delay, "pacing before next wallet")
                            .await;
                    }
                }
            }
        }

        self.emit(EngineEvent::RunCompleted {
            completed: summary.completed,
            total,
        });
        Ok(summary)
    }

    async fn run_unit(
        &self,
        wallet: &WalletCredential,
        route: &RouteDefinition,
        attempt_index: u32,
        total_per_wallet: u32,
        verify_indexing: bool,
        summary: &mut RunSummary,
    ) {
        let attempt = self
            .execute_unit(wallet, route, attempt_index, total_per_wallet, verify_indexing)
            .await;
        if attempt.outcome.is_confirmed() {
            summary.completed += 1;
        }
        self.emit(EngineEvent::UnitCompleted {
            attempt: attempt.clone(),
            completed: summary.completed,
            total: summary.total,
        });
        summary.attempts.push(attempt);
    }

    fn pick_route(&self, plan: &RoutePlan) -> Result<RouteDefinition> {
        let id = match plan {
            RoutePlan::Fixed(id) => *id,
            RoutePlan::RandomFrom(pool) => {
                if pool.is_empty() {
                    return Err(FerryError::Config("empty random route pool".into()));
                }
                pool[rand::thread_rng().gen_range(0..pool.len())]
            }
            RoutePlan::AnyToAny { .. } => {
                let pool = random_pool();
                pool[rand::thread_rng().gen_range(0..pool.len())]
            }
        };
        route(id).ok_or_else(|| FerryError::Config(format!("unknown route id {}", id)))
    }

    /// Drive one unit of work to a terminal outcome:
    /// Pending → Gated → Submitted → (Confirmed | Reverted | Failed), with
    /// the optional indexing check folded into Confirmed.
    pub async fn execute_unit(
        &self,
        wallet: &WalletCredential,
        route: &RouteDefinition,
        attempt_index: u32,
        total_per_wallet: u32,
        verify_indexing: bool,
    ) -> TransferAttempt {
        self.emit(EngineEvent::UnitStarted {
            wallet: wallet.name.clone(),
            route_id: route.id,
            route_label: route.label.to_string(),
            attempt_index,
            total_per_wallet,
        });

        let (tx_hash, outcome) = self.drive_unit(wallet, route, verify_indexing).await;

        TransferAttempt {
            wallet: wallet.name.clone(),
            route_id: route.id,
            route_label: route.label.to_string(),
            attempt_index,
            tx_hash,
            outcome,
        }
    }

    async fn drive_unit(
        &self,
        wallet: &WalletCredential,
        route: &RouteDefinition,
        verify_indexing: bool,
    ) -> (Option<Hex>, UnitOutcome) {
        // Destination resolution comes before any network call.
        let recipient = match wallet.destination_address(route.destination) {
            Some(recipient) => recipient,
            None => {
                let error = FerryError::MissingDestination {
                    wallet: wallet.name.clone(),
                    network: route.destination,
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

        if matches!(route.kind, RouteKind::CosmosExecute) {
            return self
                .drive_cosmos_unit(wallet, route, &recipient, verify_indexing)
                .await;
        }

        match self.ensure_funded(wallet, route).await {
            Ok(true) => {}
            Ok(false) => {
                let reason = "funding gate not passed".to_string();
                self.emit(EngineEvent::UnitSkipped {
                    wallet: wallet.name.clone(),
                    reason: reason.clone(),
                });
                return (None, UnitOutcome::Skipped { reason });
            }
            Err(e) => {
                return (
                    None,
                    UnitOutcome::Failed {
                        reason: e.to_string(),
                    },
                )
            }
        }

        let ceiling = self.options.unit_retry_ceiling;
        for attempt_number in 1..=ceiling {
            // Fresh salt and timeout every attempt; reuse would collide
            // with the destination's deduplication.
            let params = AttemptParams::generate();
            let calldata = match build_calldata(route, &wallet.address, &recipient, &params) {
                Ok(calldata) => calldata,
                Err(e) => {
                    return (
                        None,
                        UnitOutcome::Failed {
                            reason: e.to_string(),
                        },
                    )
                }
            };

            match self
                .submit_and_confirm(wallet, route, calldata, verify_indexing)
                .await
            {
                Ok((tx_hash, indexing)) => {
                    return (
                        Some(tx_hash.clone()),
                        UnitOutcome::Confirmed { tx_hash, indexing },
                    )
                }
                Err((tx_hash, error)) => match disposition(&error) {
                    ErrorDisposition::RetryWithRotation => {
                        self.emit(EngineEvent::AttemptFailed {
                            wallet: wallet.name.clone(),
                            attempt: attempt_number,
                            ceiling,
                            reason: error.to_string(),
                        });
                        if attempt_number < ceiling {
                            if let Ok(pool) = self.pool(route.source) {
                                pool.rotate();
                                self.emit(EngineEvent::EndpointRotated {
                                    network: pool.network(),
                                    position: pool.position(),
                                    pool_size: pool.len(),
                                });
                            }
                            self.pause(self.options.retry_delay, "retrying submission").await;
                            continue;
                        }
                        return (
                            tx_hash,
                            UnitOutcome::Failed {
                                reason: error.to_string(),
                            },
                        );
                    }
                    ErrorDisposition::FailUnit => {
                        if let FerryError::TransactionReverted { tx_hash } = error {
                            let config = network(route.source);
                            self.emit(EngineEvent::Reverted {
                                wallet: wallet.name.clone(),
                                tx_hash: tx_hash.clone(),
                                explorer_url: format!("{}{}", config.explorer_base, tx_hash),
                            });
                            return (Some(tx_hash.clone()), UnitOutcome::Reverted { tx_hash });
                        }
                        return (
                            tx_hash,
                            UnitOutcome::Failed {
                                reason: error.to_string(),
                            },
                        );
                    }
                    ErrorDisposition::SkipUnit => {
                        let reason = error.to_string();
                        self.emit(EngineEvent::UnitSkipped {
                            wallet: wallet.name.clone(),
                            reason: reason.clone(),
                        });
                        return (tx_hash, UnitOutcome::Skipped { reason });
                    }
                },
            }
        }

        (
            None,
            UnitOutcome::Failed {
                reason: format!("retry ceiling of {} reached", ceiling),
            },
        )
    }

    async fn submit_and_confirm(
        &self,
        wallet: &WalletCredential,
        route: &RouteDefinition,
        calldata: Hex,
        verify_indexing: bool,
    ) -> std::result::Result<(Hex, IndexCheck), (Option<Hex>, FerryError)> {
        let tx_hash = self
            .submit_transfer(wallet, route, calldata)
            .await
            .map_err(|e| (None, e))?;

        let pool = self
            .pool(route.source)
            .map_err(|e| (Some(tx_hash.clone()), e))?;
        let waiter = self.receipt_waiter();
        let receipt = waiter
            .await_receipt(self.chain.as_ref(), &pool, &tx_hash)
            .await
            .map_err(|e| (Some(tx_hash.clone()), e))?;

        let config = network(route.source);
        self.emit(EngineEvent::Confirmed {
            wallet: wallet.name.clone(),
            tx_hash: tx_hash.clone(),
            gas_used: receipt.gas_used,
            explorer_url: format!("{}{}", config.explorer_base, tx_hash),
            indexer_url: format!("{}{}", INDEXER_UI_BASE, tx_hash),
        });

        let indexing = if verify_indexing {
            self.await_indexing(wallet, &tx_hash).await;
            IndexCheck::Acknowledged
        } else {
            IndexCheck::Skipped
        };

        Ok((tx_hash, indexing))
    }

    pub(crate) async fn await_indexing(&self, wallet: &WalletCredential, tx_hash: &str) {
        let mut waiter = IndexingWaiter::new(
            self.indexer.clone(),
            self.options.indexing_max_attempts,
            self.options.indexing_interval,
        );
        if let Some(handler) = self.on_event.clone() {
            let wallet_name = wallet.name.clone();
            waiter = waiter.with_event_handler(Box::new(move |event| {
                handler(EngineEvent::Indexing {
                    wallet: wallet_name.clone(),
                    event,
                })
            }));
        }
        // Soft success by design: indexing lag never blocks the run.
        waiter.await_indexed(tx_hash).await;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    use ferry_indexer::{MockIndexer, TransferRecord};
    use ferry_rpc::{MockChainClient, Receipt};
    use ferry_types::NetworkId;

    use super::*;
    use crate::{Engine, EngineOptions};

    const SEPOLIA_USDC: &str = "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238";
    const SEPOLIA_BRIDGE: &str = "0x5fbe74a283f7954f10aa04c2edf55578811aeb03";
    const WALLET_ADDRESS: &str = "0x1111111111111111111111111111111111111111";

    fn test_options() -> EngineOptions {
        EngineOptions {
            receipt_max_attempts: 3,
            receipt_interval: Duration::from_millis(1),
            indexing_max_attempts: 2,
            indexing_interval: Duration::from_millis(1),
            unit_retry_ceiling: 3,
            retry_delay: Duration::ZERO,
            gate_retry_ceiling: 1,
            gate_retry_delay: Duration::ZERO,
            post_approve_delay: Duration::ZERO,
            inter_op_delay: Duration::ZERO,
            cosmos_confirm_delay: Duration::ZERO,
        }
    }

    fn engine(
        chain: Arc<MockChainClient>,
        indexer: Arc<MockIndexer>,
    ) -> Engine {
        Engine::new(chain, indexer, test_options()).unwrap()
    }

    fn wallet() -> WalletCredential {
        WalletCredential::new("Wallet1", "0xsecret", WALLET_ADDRESS, HashMap::new())
    }

    fn good_receipt(tx_hash: &str) -> Receipt {
        Receipt {
            tx_hash: tx_hash.into(),
            success: true,
            gas_used: 180_000,
        }
    }

    fn completed_transfer() -> TransferRecord {
        TransferRecord {
            packet_hash: Some("0xpacket".into()),
            status: Some("completed".into()),
            source_chain_id: None,
            destination_chain_id: None,
        }
    }

    #[tokio::test]
    async fn test_missing_destination_makes_no_network_call() {
        let chain = Arc::new(MockChainClient::new());
        let indexer = Arc::new(MockIndexer::new());
        let engine = engine(chain.clone(), indexer.clone());
        // route 2 needs a Babylon address; this wallet has none
        let attempt = engine
            .execute_unit(&wallet(), &route(2).unwrap(), 1, 1, false)
            .await;

        assert!(matches!(attempt.outcome, UnitOutcome::Skipped { .. }));
        assert_eq!(chain.total_calls(), 0);
        assert_eq!(indexer.calls(), 0);
    }

    #[tokio::test]
    async fn test_unit_confirmed_with_indexing_acknowledged() {
        let chain = Arc::new(MockChainClient::new());
        let indexer = Arc::new(MockIndexer::new());
        // 0.02 USDC against a 0.01 requirement, allowance already granted
        chain.set_token_balance(SEPOLIA_USDC, WALLET_ADDRESS, 20_000);
        chain.set_allowance(WALLET_ADDRESS, SEPOLIA_BRIDGE, u128::MAX);
        chain.script_submission(Ok("0xabc123".into()));
        chain.script_receipt(Ok(Some(good_receipt("0xabc123"))));
        indexer.script(Ok(Some(completed_transfer())));
        let engine = engine(chain.clone(), indexer.clone());

        let attempt = engine
            .execute_unit(&wallet(), &route(1).unwrap(), 1, 1, true)
            .await;

        assert_eq!(attempt.tx_hash.as_deref(), Some("0xabc123"));
        match attempt.outcome {
            UnitOutcome::Confirmed { indexing, .. } => {
                assert_eq!(indexing, IndexCheck::Acknowledged)
            }
            other => panic!("expected Confirmed, got {:?}", other),
        }
        assert_eq!(chain.calls("send_transaction"), 1);
        assert_eq!(indexer.calls(), 1);
    }

    #[tokio::test]
    async fn test_insufficient_funds_skips_without_submission() {
        let chain = Arc::new(MockChainClient::new());
        let indexer = Arc::new(MockIndexer::new());
        // 0.001 USDC against a 0.01 requirement
        chain.set_token_balance(SEPOLIA_USDC, WALLET_ADDRESS, 1_000);
        let engine = engine(chain.clone(), indexer.clone());

        let summary = engine
            .run(
                &[wallet()],
                &RoutePlan::Fixed(1),
                &RunOptions {
                    transfers_per_wallet: 2,
                    verify_indexing: false,
                },
            )
            .await
            .unwrap();

        // both units skip, and the run still walks every unit
        assert_eq!(summary.attempts.len(), 2);
        assert_eq!(summary.completed, 0);
        assert!(summary
            .attempts
            .iter()
            .all(|a| matches!(a.outcome, UnitOutcome::Skipped { .. })));
        assert_eq!(chain.calls("send_transaction"), 0);
    }

    #[tokio::test]
    async fn test_submission_failures_rotate_and_exhaust_ceiling() {
        let chain = Arc::new(MockChainClient::new());
        let indexer = Arc::new(MockIndexer::new());
        chain.set_token_balance(SEPOLIA_USDC, WALLET_ADDRESS, 20_000);
        chain.set_allowance(WALLET_ADDRESS, SEPOLIA_BRIDGE, u128::MAX);
        // no scripted submissions: every send fails
        let engine = engine(chain.clone(), indexer.clone());

        let attempt = engine
            .execute_unit(&wallet(), &route(1).unwrap(), 1, 1, false)
            .await;

        assert!(matches!(attempt.outcome, UnitOutcome::Failed { .. }));
        assert_eq!(chain.calls("send_transaction"), 3);
        // two rotations (between attempts, not after the last)
        assert_eq!(engine.pool(NetworkId::Sepolia).unwrap().position(), 2);
    }

    #[tokio::test]
    async fn test_reverted_transaction_is_terminal() {
        let chain = Arc::new(MockChainClient::new());
        let indexer = Arc::new(MockIndexer::new());
        chain.set_token_balance(SEPOLIA_USDC, WALLET_ADDRESS, 20_000);
        chain.set_allowance(WALLET_ADDRESS, SEPOLIA_BRIDGE, u128::MAX);
        chain.script_submission(Ok("0xdead".into()));
        chain.script_receipt(Ok(Some(Receipt {
            tx_hash: "0xdead".into(),
            success: false,
            gas_used: 50_000,
        })));
        let engine = engine(chain.clone(), indexer.clone());

        let attempt = engine
            .execute_unit(&wallet(), &route(1).unwrap(), 1, 1, false)
            .await;

        assert!(matches!(attempt.outcome, UnitOutcome::Reverted { .. }));
        // no retry after a revert
        assert_eq!(chain.calls("send_transaction"), 1);
    }

    #[tokio::test]
    async fn test_empty_wallet_set_is_a_process_error() {
        let chain = Arc::new(MockChainClient::new());
        let indexer = Arc::new(MockIndexer::new());
        let engine = engine(chain, indexer);

        assert!(engine
            .run(&[], &RoutePlan::Fixed(1), &RunOptions::default())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_random_plan_only_picks_from_subset() {
        let chain = Arc::new(MockChainClient::new());
        let indexer = Arc::new(MockIndexer::new());
        let engine = engine(chain.clone(), indexer);

        let plan = RoutePlan::RandomFrom(vec![1, 2]);
        for _ in 0..20 {
            let picked = engine.pick_route(&plan).unwrap();
            assert!(picked.id == 1 || picked.id == 2);
        }
    }
}
