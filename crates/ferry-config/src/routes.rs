//! The route table: which transfers the runner knows how to perform.
//!
//! Routes carry a tagged `RouteKind` so the engine dispatches explicitly
//! instead of branching on route ids.

use ferry_types::{NetworkId, RouteId};

/// Gas parameters attached to a submission, fixed per route.
#[derive(Debug, Clone, Copy)]
pub enum GasSettings {
    Legacy {
        gas_limit: u64,
        gas_price_wei: u128,
    },
    Eip1559 {
        gas_limit: u64,
        max_fee_wei: u128,
        max_priority_wei: u128,
    },
}

/// Pre-flight funding requirement for a route.
#[derive(Debug, Clone, Copy)]
pub enum FundingSpec {
    /// Transfer of the network's gas asset; the gate checks the native
    /// balance against `amount_wei` plus the network gas reserve.
    Native { amount_wei: u128 },
    /// Token transfer; the gate checks token balance and bridge allowance
    /// against `amount` in the token's base units.
    Token { amount: u128 },
    /// No gate (the route funds itself on a non-EVM chain).
    None,
}

/// Which operand template an instruction route splices addresses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionTemplate {
    SepoliaToHolesky,
    SepoliaToBabylon,
    HoleskyToXion,
    SeiToBnb,
}

/// Which calldata template a raw-calldata route uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalldataTemplate {
    CornToSei,
    BnbToBabylon,
}

/// How a route's transaction payload is produced.
#[derive(Debug, Clone, Copy)]
pub enum RouteKind {
    /// UCS03 `send` call carrying an ABI-encoded instruction operand.
    Instruction(InstructionTemplate),
    /// Fully pre-encoded calldata with salt and timeout spliced in.
    RawCalldata(CalldataTemplate),
    /// Two-step CosmWasm execute (allowance, then send) broadcast through
    /// Tendermint RPC on the source chain.
    CosmosExecute,
}

/// A configured source → destination transfer path.
#[derive(Debug, Clone)]
pub struct RouteDefinition {
    pub id: RouteId,
    pub source: NetworkId,
    pub destination: NetworkId,
    /// None for routes whose channel is baked into the payload template.
    pub channel_id: Option<u32>,
    pub label: &'static str,
    pub kind: RouteKind,
    pub funding: FundingSpec,
    pub gas: GasSettings,
    /// Native value attached to the submission, in wei.
    pub value_wei: u128,
}

impl RouteDefinition {
    /// Whether the wallet must have a configured address on the
    /// destination network (EVM destinations fall back to the wallet's
    /// primary address).
    pub fn needs_destination_override(&self) -> bool {
        self.destination.is_cosmos()
    }
}

const EVM_SEND_GAS: GasSettings = GasSettings::Eip1559 {
    gas_limit: 200_000,
    max_fee_wei: 2_000_000_000,
    max_priority_wei: 1_000_000_000,
};

/// Gas shape for ERC-20 approval transactions.
pub const APPROVE_GAS: GasSettings = GasSettings::Eip1559 {
    gas_limit: 100_000,
    max_fee_wei: 2_000_000_000,
    max_priority_wei: 1_000_000_000,
};

/// All executable routes, keyed by their stable menu id.
pub fn route_table() -> Vec<RouteDefinition> {
    vec![
        RouteDefinition {
            id: 1,
            source: NetworkId::Sepolia,
            destination: NetworkId::Holesky,
            channel_id: Some(8),
            label: "Sepolia → Holesky",
            kind: RouteKind::Instruction(InstructionTemplate::SepoliaToHolesky),
            funding: FundingSpec::Token { amount: 10_000 }, // 0.01 USDC
            gas: EVM_SEND_GAS,
            value_wei: 0,
        },
        RouteDefinition {
            id: 2,
            source: NetworkId::Sepolia,
            destination: NetworkId::Babylon,
            channel_id: Some(7),
            label: "Sepolia → Babylon",
            kind: RouteKind::Instruction(InstructionTemplate::SepoliaToBabylon),
            funding: FundingSpec::Token { amount: 10_000 },
            gas: EVM_SEND_GAS,
            value_wei: 0,
        },
        RouteDefinition {
            id: 3,
            source: NetworkId::Holesky,
            destination: NetworkId::Xion,
            channel_id: Some(4),
            label: "Holesky → Xion",
            kind: RouteKind::Instruction(InstructionTemplate::HoleskyToXion),
            funding: FundingSpec::Token { amount: 10_000 },
            gas: EVM_SEND_GAS,
            value_wei: 0,
        },
        RouteDefinition {
            id: 6,
            source: NetworkId::Corn,
            destination: NetworkId::Sei,
            channel_id: Some(3),
            label: "Corn → Sei (Bitcorn swap)",
            kind: RouteKind::RawCalldata(CalldataTemplate::CornToSei),
            funding: FundingSpec::Native {
                amount_wei: 1_000_000_000_000, // 0.000001 BTCN
            },
            gas: GasSettings::Legacy {
                gas_limit: 300_000,
                gas_price_wei: 50_000_000, // 0.05 gwei
            },
            value_wei: 1_000_000_000_000,
        },
        RouteDefinition {
            id: 7,
            source: NetworkId::Bnb,
            destination: NetworkId::Babylon,
            channel_id: Some(1),
            label: "BNB → Babylon",
            kind: RouteKind::RawCalldata(CalldataTemplate::BnbToBabylon),
            funding: FundingSpec::Native {
                amount_wei: 200_000_000_000_000, // 0.0002 BNB
            },
            gas: GasSettings::Legacy {
                gas_limit: 245_214,
                gas_price_wei: 120_000_000, // 0.12 gwei
            },
            value_wei: 200_000_000_000_000,
        },
        RouteDefinition {
            id: 8,
            source: NetworkId::Babylon,
            destination: NetworkId::Osmosis,
            channel_id: Some(5),
            label: "Babylon → Osmosis (USDC swap)",
            kind: RouteKind::CosmosExecute,
            funding: FundingSpec::None,
            gas: EVM_SEND_GAS, // unused on the Cosmos path
            value_wei: 0,
        },
        RouteDefinition {
            id: 9,
            source: NetworkId::Sei,
            destination: NetworkId::Bnb,
            channel_id: Some(5),
            label: "Sei → BNB (native SEI swap)",
            kind: RouteKind::Instruction(InstructionTemplate::SeiToBnb),
            funding: FundingSpec::Native {
                amount_wei: 320_000_000_000_000_000, // 0.32 SEI
            },
            gas: GasSettings::Legacy {
                gas_limit: 238_163,
                gas_price_wei: 1_320_087_517, // 1.320087517 gwei
            },
            value_wei: 326_665_068_193_583_920, // 0.32666506819358392 SEI
        },
    ]
}

/// Look up a route by menu id.
pub fn route(id: RouteId) -> Option<RouteDefinition> {
    route_table().into_iter().find(|r| r.id == id)
}

/// Route ids eligible for the all-chains random mode.
pub fn random_pool() -> Vec<RouteId> {
    vec![1, 2, 3, 6, 7, 8, 9]
}

/// Route ids eligible for the Sepolia random mode.
pub fn sepolia_random_pool() -> Vec<RouteId> {
    vec![1, 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network;

    #[test]
    fn test_route_ids_unique_and_resolvable() {
        let table = route_table();
        let mut ids: Vec<_> = table.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), table.len());
        for id in random_pool() {
            assert!(route(id).is_some(), "random pool id {} not in table", id);
        }
    }

    #[test]
    fn test_route_sources_registered() {
        for r in route_table() {
            assert!(
                !network(r.source).endpoints.is_empty(),
                "route {} source {} has no endpoints",
                r.id,
                r.source
            );
        }
    }

    #[test]
    fn test_token_routes_have_token_config() {
        for r in route_table() {
            if let FundingSpec::Token { .. } = r.funding {
                assert!(
                    network(r.source).token.is_some(),
                    "route {} transfers a token but {} has none configured",
                    r.id,
                    r.source
                );
            }
        }
    }

    #[test]
    fn test_cosmos_destinations_need_override() {
        assert!(route(2).unwrap().needs_destination_override());
        assert!(route(3).unwrap().needs_destination_override());
        assert!(!route(1).unwrap().needs_destination_override());
        assert!(!route(9).unwrap().needs_destination_override());
    }
}
