//! Turns engine events into console output.

use std::io::{self, Write};
use std::sync::Arc;

use ferry_engine::{EngineEvent, EventHandler, UnitOutcome};
use ferry_indexer::IndexingEvent;
use tracing::{error, info, warn};

pub fn event_handler() -> EventHandler {
    Arc::new(render)
}

fn render(event: EngineEvent) {
    match event {
        EngineEvent::RunStarted {
            wallets,
            total_units,
        } => info!(wallets, total_units, "starting run"),
        EngineEvent::UnitStarted {
            wallet,
            route_label,
            attempt_index,
            total_per_wallet,
            ..
        } => info!(
            "{} | {} | transfer {}/{}",
            wallet, route_label, attempt_index, total_per_wallet
        ),
        EngineEvent::RouteChosen {
            wallet,
            route_id,
            route_label,
        } => info!("{} | picked route {} ({})", wallet, route_id, route_label),
        EngineEvent::BalanceChecked {
            wallet,
            asset,
            balance,
        } => info!("{} | {} balance: {}", wallet, asset, balance),
        EngineEvent::GateInsufficient {
            wallet,
            asset,
            required,
            available,
        } => warn!(
            "{} | insufficient {}: required {}, available {}",
            wallet, asset, required, available
        ),
        EngineEvent::GateError {
            wallet,
            attempt,
            ceiling,
            reason,
        } => warn!(
            "{} | funding check {}/{} failed: {}",
            wallet, attempt, ceiling, reason
        ),
        EngineEvent::ApprovalSubmitted { wallet, tx_hash } => {
            info!("{} | approval submitted: {}", wallet, tx_hash)
        }
        EngineEvent::ApprovalConfirmed { wallet, tx_hash } => {
            info!("{} | approval confirmed: {}", wallet, tx_hash)
        }
        EngineEvent::Submitted {
            wallet,
            network,
            tx_hash,
        } => info!("{} | {} transaction sent: {}", wallet, network, tx_hash),
        EngineEvent::Confirmed {
            wallet,
            tx_hash,
            gas_used,
            explorer_url,
            indexer_url,
        } => {
            info!("{} | confirmed {} (gas {})", wallet, tx_hash, gas_used);
            info!("{} | explorer: {}", wallet, explorer_url);
            info!("{} | indexer: {}", wallet, indexer_url);
        }
        EngineEvent::Reverted {
            wallet,
            tx_hash,
            explorer_url,
        } => {
            error!("{} | transaction reverted: {}", wallet, tx_hash);
            error!("{} | explorer: {}", wallet, explorer_url);
        }
        EngineEvent::EndpointRotated {
            network,
            position,
            pool_size,
        } => info!(
            "switching to endpoint {}/{} for {}",
            position + 1,
            pool_size,
            network
        ),
        EngineEvent::AttemptFailed {
            wallet,
            attempt,
            ceiling,
            reason,
        } => error!("{} | attempt {}/{} failed: {}", wallet, attempt, ceiling, reason),
        EngineEvent::UnitSkipped { wallet, reason } => warn!("{} | skipped: {}", wallet, reason),
        EngineEvent::UnitCompleted {
            attempt,
            completed,
            total,
        } => {
            let verdict = match &attempt.outcome {
                UnitOutcome::Confirmed { .. } => "done",
                UnitOutcome::Reverted { .. } => "reverted",
                UnitOutcome::Skipped { .. } => "skipped",
                UnitOutcome::Failed { .. } => "failed",
            };
            info!(
                "{} | transfer {} {} | progress {}/{}",
                attempt.wallet, attempt.attempt_index, verdict, completed, total
            );
        }
        EngineEvent::Waiting { seconds, reason } => {
            if seconds > 0 {
                info!("waiting {}s: {}", seconds, reason);
            }
        }
        EngineEvent::Indexing { wallet, event } => render_indexing(&wallet, event),
        EngineEvent::RunCompleted { completed, total } => {
            info!("run completed: {}/{} transfers confirmed", completed, total)
        }
    }
}

fn render_indexing(wallet: &str, event: IndexingEvent) {
    match event {
        IndexingEvent::Attempt {
            attempt,
            max_attempts,
            status,
        } => info!(
            "{} | indexing check {}/{}: {}",
            wallet,
            attempt,
            max_attempts,
            status.as_deref().unwrap_or("not indexed yet")
        ),
        IndexingEvent::PacketSeen { packet_hash } => {
            info!("{} | packet found: {} (still processing)", wallet, packet_hash)
        }
        IndexingEvent::Completed {
            status,
            packet_hash,
        } => info!(
            "{} | bridge indexed, status {} (packet {})",
            wallet,
            status,
            packet_hash.as_deref().unwrap_or("unknown")
        ),
        IndexingEvent::Countdown { seconds_left } => {
            print!("\r{} | next indexing check in {}s   ", wallet, seconds_left);
            let _ = io::stdout().flush();
            if seconds_left == 1 {
                print!("\r{}\r", " ".repeat(60));
                let _ = io::stdout().flush();
            }
        }
        IndexingEvent::QueryFailed { attempt, message } => {
            warn!("{} | indexer query {} failed: {}", wallet, attempt, message)
        }
        IndexingEvent::TimedOut { attempts } => warn!(
            "{} | indexer silent after {} checks; transfer presumed to settle in background",
            wallet, attempts
        ),
    }
}
