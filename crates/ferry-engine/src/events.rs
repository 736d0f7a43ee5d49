//! Engine progress events.
//!
//! The engine never prints; every user-visible moment is an event handed to
//! the run's handler. The binary turns them into console output.

use std::sync::Arc;

use ferry_indexer::IndexingEvent;
use ferry_types::{Hex, NetworkId, RouteId};

use crate::TransferAttempt;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    RunStarted {
        wallets: usize,
        total_units: u32,
    },
    UnitStarted {
        wallet: String,
        route_id: RouteId,
        route_label: String,
        attempt_index: u32,
        total_per_wallet: u32,
    },
    /// A random selection mode picked this unit's route.
    RouteChosen {
        wallet: String,
        route_id: RouteId,
        route_label: String,
    },
    BalanceChecked {
        wallet: String,
        asset: String,
        balance: String,
    },
    GateInsufficient {
        wallet: String,
        asset: String,
        required: String,
        available: String,
    },
    GateError {
        wallet: String,
        attempt: u32,
        ceiling: u32,
        reason: String,
    },
    ApprovalSubmitted {
        wallet: String,
        tx_hash: Hex,
    },
    ApprovalConfirmed {
        wallet: String,
        tx_hash: Hex,
    },
    Submitted {
        wallet: String,
        network: NetworkId,
        tx_hash: Hex,
    },
    Confirmed {
        wallet: String,
        tx_hash: Hex,
        gas_used: u128,
        explorer_url: String,
        indexer_url: String,
    },
    Reverted {
        wallet: String,
        tx_hash: Hex,
        explorer_url: String,
    },
    EndpointRotated {
        network: NetworkId,
        position: usize,
        pool_size: usize,
    },
    AttemptFailed {
        wallet: String,
        attempt: u32,
        ceiling: u32,
        reason: String,
    },
    UnitSkipped {
        wallet: String,
        reason: String,
    },
    UnitCompleted {
        attempt: TransferAttempt,
        completed: u32,
        total: u32,
    },
    Waiting {
        seconds: u64,
        reason: &'static str,
    },
    Indexing {
        wallet: String,
        event: IndexingEvent,
    },
    RunCompleted {
        completed: u32,
        total: u32,
    },
}

pub type EventHandler = Arc<dyn Fn(EngineEvent) + Send + Sync>;
