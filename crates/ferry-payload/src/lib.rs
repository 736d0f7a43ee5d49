//! Per-route payload construction.
//!
//! The byte layouts are opaque operator-supplied templates; this crate only
//! splices the sender/recipient addresses and the per-attempt salt and
//! timeout into them. Builders are pure: identical inputs produce identical
//! payloads.

pub mod cosmos;
pub mod operands;
pub mod ucs03;

use std::time::{SystemTime, UNIX_EPOCH};

use rand::RngCore;

use ferry_config::{RouteDefinition, RouteKind};
use ferry_types::{bytes_to_hex, FerryError, Hex, Result};

/// How far in the future a transfer may settle before the destination
/// rejects it: 48 hours.
pub const TIMEOUT_HORIZON_SECS: u64 = 172_800;

/// Per-attempt values. The salt keeps repeat transfers from colliding with
/// the destination's deduplication; the timeout bounds how long the packet
/// stays claimable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptParams {
    pub salt: [u8; 32],
    /// Expiry in nanoseconds since the epoch.
    pub timeout_ns: u64,
}

impl AttemptParams {
    /// Fresh random salt and a timeout 48 hours out. Call once per
    /// submission attempt; reusing params across attempts risks
    /// deduplication collisions.
    pub fn generate() -> Self {
        let mut salt = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut salt);
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::at(now_secs, salt)
    }

    /// Deterministic constructor with the timeout anchored at `now_secs`.
    pub fn at(now_secs: u64, salt: [u8; 32]) -> Self {
        Self {
            salt,
            timeout_ns: (now_secs + TIMEOUT_HORIZON_SECS).saturating_mul(1_000_000_000),
        }
    }

    pub fn salt_hex(&self) -> Hex {
        bytes_to_hex(&self.salt)
    }
}

/// Build the complete source-chain calldata for an EVM route.
pub fn build_calldata(
    route: &RouteDefinition,
    sender: &str,
    recipient: &str,
    params: &AttemptParams,
) -> Result<Hex> {
    match route.kind {
        RouteKind::Instruction(template) => {
            let operand = operands::instruction_operand(template, sender, recipient);
            let channel_id = route.channel_id.ok_or_else(|| {
                FerryError::Config(format!("route {} has no channel id", route.id))
            })?;
            ucs03::encode_send(channel_id, 0, params.timeout_ns, params.salt, &operand)
        }
        RouteKind::RawCalldata(template) => {
            Ok(operands::raw_calldata(template, sender, recipient, params))
        }
        RouteKind::CosmosExecute => Err(FerryError::Config(
            "cosmos routes build execute messages, not calldata".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_config::route;

    const SENDER: &str = "0xAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAa";
    const RECIPIENT_EVM: &str = "0xBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBb";
    const RECIPIENT_BBN: &str = "bbn1zsrv23akkgxdnwul72sftgv2xjt5khsnt3wwjhp0ffh683hzp5aq5a0h6n";

    #[test]
    fn test_attempt_params_horizon() {
        let params = AttemptParams::at(1_700_000_000, [7u8; 32]);
        assert_eq!(params.timeout_ns, (1_700_000_000 + TIMEOUT_HORIZON_SECS) * 1_000_000_000);
        assert_eq!(params.salt_hex().len(), 2 + 64);
    }

    #[test]
    fn test_generated_params_differ() {
        let a = AttemptParams::generate();
        let b = AttemptParams::generate();
        assert_ne!(a.salt, b.salt);
    }

    #[test]
    fn test_calldata_deterministic_for_identical_inputs() {
        let route = route(1).unwrap();
        let params = AttemptParams::at(1_700_000_000, [1u8; 32]);
        let a = build_calldata(&route, SENDER, SENDER, &params).unwrap();
        let b = build_calldata(&route, SENDER, SENDER, &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_calldata_differs_across_salts() {
        for id in [1, 2, 6, 7, 9] {
            let route = route(id).unwrap();
            let recipient = if route.destination.is_cosmos() {
                RECIPIENT_BBN
            } else {
                RECIPIENT_EVM
            };
            let a = build_calldata(
                &route,
                SENDER,
                recipient,
                &AttemptParams::at(1_700_000_000, [1u8; 32]),
            )
            .unwrap();
            let b = build_calldata(
                &route,
                SENDER,
                recipient,
                &AttemptParams::at(1_700_000_000, [2u8; 32]),
            )
            .unwrap();
            assert_ne!(a, b, "route {} payload must vary with the salt", id);
        }
    }

    #[test]
    fn test_cosmos_route_rejects_calldata_path() {
        let route = route(8).unwrap();
        let params = AttemptParams::at(1_700_000_000, [1u8; 32]);
        assert!(build_calldata(&route, RECIPIENT_BBN, "osmo1x", &params).is_err());
    }
}
