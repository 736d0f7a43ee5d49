//! The transfer orchestrator: gate, submit, confirm, index, repeat.
//!
//! One engine instance drives a whole run. Units of work (wallet × route ×
//! attempt index) execute strictly in order; no two submissions are ever in
//! flight for the same wallet or network. Progress is reported through an
//! event callback so nothing here prints.

pub mod confirm;
mod cosmos_route;
pub mod events;
mod gate;
pub mod orchestrator;
pub mod policy;
mod submit;

pub use confirm::ConfirmationWaiter;
pub use events::{EngineEvent, EventHandler};
pub use orchestrator::{RoutePlan, RunOptions, RunSummary};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ferry_config::network;
use ferry_indexer::IndexerApi;
use ferry_rpc::{ChainClient, CosmosClient, EndpointPool};
use ferry_types::{FerryError, Hex, NetworkId, Result, RouteId};

/// Tunable pacing and retry knobs. Defaults match production pacing; tests
/// shrink the intervals.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Receipt polls per confirmation wait.
    pub receipt_max_attempts: u32,
    pub receipt_interval: Duration,
    /// Indexer polls per indexing wait.
    pub indexing_max_attempts: u32,
    pub indexing_interval: Duration,
    /// Total submission attempts per unit of work.
    pub unit_retry_ceiling: u32,
    /// Pause between failed submission attempts.
    pub retry_delay: Duration,
    /// Funding-gate attempts before the unit is skipped.
    pub gate_retry_ceiling: u32,
    pub gate_retry_delay: Duration,
    /// Pause after a confirmed ERC-20 approval.
    pub post_approve_delay: Duration,
    /// Pause between successive units and between wallets.
    pub inter_op_delay: Duration,
    /// Pause between the Cosmos allowance and send executes.
    pub cosmos_confirm_delay: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            receipt_max_attempts: 30,
            receipt_interval: Duration::from_millis(3_000),
            indexing_max_attempts: ferry_indexer::DEFAULT_MAX_ATTEMPTS,
            indexing_interval: Duration::from_millis(ferry_indexer::DEFAULT_INTERVAL_MS),
            unit_retry_ceiling: 3,
            retry_delay: Duration::from_millis(3_000),
            gate_retry_ceiling: 3,
            gate_retry_delay: Duration::from_millis(2_000),
            post_approve_delay: Duration::from_millis(2_000),
            inter_op_delay: Duration::from_secs(30),
            cosmos_confirm_delay: Duration::from_secs(15),
        }
    }
}

/// Terminal indexing state of a confirmed unit. `Acknowledged` covers both
/// an indexer-reported completion and the presumed completion after the
/// soft-success timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexCheck {
    Skipped,
    Acknowledged,
}

/// Terminal outcome of one unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UnitOutcome {
    Confirmed { tx_hash: Hex, indexing: IndexCheck },
    Reverted { tx_hash: Hex },
    Skipped { reason: String },
    Failed { reason: String },
}

impl UnitOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, UnitOutcome::Confirmed { .. })
    }
}

/// One unit of work, reported after it reaches a terminal state. Ephemeral:
/// nothing is persisted beyond the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferAttempt {
    pub wallet: String,
    pub route_id: RouteId,
    pub route_label: String,
    /// Per-wallet transfer ordinal within the run.
    pub attempt_index: u32,
    pub tx_hash: Option<Hex>,
    pub outcome: UnitOutcome,
}

/// The orchestrator.
pub struct Engine {
    chain: Arc<dyn ChainClient>,
    cosmos: CosmosClient,
    indexer: Arc<dyn IndexerApi>,
    pools: HashMap<NetworkId, Arc<EndpointPool>>,
    options: EngineOptions,
    on_event: Option<EventHandler>,
}

impl Engine {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        indexer: Arc<dyn IndexerApi>,
        options: EngineOptions,
    ) -> Result<Self> {
        let mut pools = HashMap::new();
        for id in NetworkId::ALL {
            pools.insert(id, Arc::new(EndpointPool::from_config(&network(id))?));
        }
        Ok(Self {
            chain,
            cosmos: CosmosClient::new(None),
            indexer,
            pools,
            options,
            on_event: None,
        })
    }

    pub fn with_event_handler(mut self, handler: EventHandler) -> Self {
        self.on_event = Some(handler);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// The endpoint pool for a network. Pools exist for every registered
    /// network for the engine's lifetime.
    pub fn pool(&self, network: NetworkId) -> Result<Arc<EndpointPool>> {
        self.pools
            .get(&network)
            .cloned()
            .ok_or_else(|| FerryError::Config(format!("no endpoint pool for {}", network)))
    }

    pub(crate) fn emit(&self, event: EngineEvent) {
        if let Some(ref handler) = self.on_event {
            handler(event);
        }
    }

    pub(crate) fn receipt_waiter(&self) -> ConfirmationWaiter {
        let mut waiter = ConfirmationWaiter::new(
            self.options.receipt_max_attempts,
            self.options.receipt_interval,
        );
        if let Some(ref handler) = self.on_event {
            waiter = waiter.with_event_handler(handler.clone());
        }
        waiter
    }

    pub(crate) async fn pause(&self, duration: Duration, reason: &'static str) {
        if duration.is_zero() {
            return;
        }
        self.emit(EngineEvent::Waiting {
            seconds: duration.as_secs(),
            reason,
        });
        tokio::time::sleep(duration).await;
    }
}
