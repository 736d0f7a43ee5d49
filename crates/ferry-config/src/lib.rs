//! Static network registry, route table, and wallet credentials.
//!
//! Everything here is configuration data: endpoint lists, contract
//! addresses, per-route amounts and gas shapes. The tables mirror what the
//! operator runs against; the code that acts on them lives in the engine.

pub mod routes;
pub mod wallet;

pub use routes::{
    random_pool, route, route_table, sepolia_random_pool, CalldataTemplate, FundingSpec,
    GasSettings, InstructionTemplate, RouteDefinition, RouteKind, APPROVE_GAS,
};
pub use wallet::{wallets_from_env, WalletCredential};

use ferry_types::{FerryError, Hex, NetworkId, Result};

/// Transferable-token metadata for a network.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub address: Hex,
    pub symbol: &'static str,
    pub decimals: u32,
}

/// Per-network configuration: ordered RPC endpoints, bridge contract,
/// explorer, and optional token metadata.
///
/// Invariant: `endpoints` is non-empty for every registered network.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub id: NetworkId,
    pub name: &'static str,
    pub endpoints: Vec<String>,
    pub bridge_contract: Hex,
    pub explorer_base: &'static str,
    pub token: Option<TokenInfo>,
    /// Symbol of the network's gas asset, for balance reporting.
    pub native_symbol: &'static str,
    /// Reserve kept back for gas when the transferred asset is also the
    /// gas asset, in wei.
    pub gas_reserve: u128,
}

fn endpoints(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}

/// Look up the static configuration for a network.
pub fn network(id: NetworkId) -> NetworkConfig {
    match id {
        NetworkId::Sepolia => NetworkConfig {
            id,
            name: "Sepolia",
            endpoints: endpoints(&[
                "https://eth-sepolia.public.blastapi.io",
                "https://sepolia.infura.io/v3/9aa3d95b3bc440fa88ea12eaa4456161",
                "https://rpc.sepolia.org",
            ]),
            bridge_contract: "0x5fbe74a283f7954f10aa04c2edf55578811aeb03".into(),
            explorer_base: "https://sepolia.etherscan.io/tx/",
            token: Some(TokenInfo {
                address: "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238".into(),
                symbol: "USDC",
                decimals: 6,
            }),
            native_symbol: "ETH",
            gas_reserve: 0,
        },
        NetworkId::Holesky => NetworkConfig {
            id,
            name: "Holesky",
            endpoints: endpoints(&[
                "https://ethereum-holesky-rpc.publicnode.com",
                "https://holesky.drpc.org",
                "https://1rpc.io/holesky",
                "https://endpoints.omniatech.io/v1/eth/holesky/public",
            ]),
            bridge_contract: "0x5fbe74a283f7954f10aa04c2edf55578811aeb03".into(),
            explorer_base: "https://holesky.etherscan.io/tx/",
            token: Some(TokenInfo {
                address: "0x57978bfe465ad9b1c0bf80f6c1539d300705ea50".into(),
                symbol: "USDC",
                decimals: 6,
            }),
            native_symbol: "ETH",
            gas_reserve: 0,
        },
        NetworkId::Babylon => NetworkConfig {
            id,
            name: "Babylon",
            endpoints: endpoints(&[
                "https://babylon-testnet-rpc.polkachu.com",
                "https://rpc-babylon.synergynodes.com",
                "https://babylon-testnet.rpc.kjnodes.com",
                "https://rpc.babylon-testnet.forbole.com",
            ]),
            bridge_contract: "bbn1336jj8ertl8h7rdvnz4dh5rqahd09cy0x43guhsxx6xyrztx292q77945h"
                .into(),
            explorer_base: "https://testnet.babylon.explorers.guru/transaction/",
            token: None,
            native_symbol: "BBN",
            gas_reserve: 0,
        },
        NetworkId::Xion => NetworkConfig {
            id,
            name: "Xion",
            endpoints: endpoints(&[
                "https://rpc.xion-testnet.burnt.com",
                "https://xion-testnet-rpc.polkachu.com",
            ]),
            bridge_contract: "0x16045bbe3c677814d0d9a25b39a78c63a9fb305d".into(),
            explorer_base: "https://explorer.burnt.com/xion-testnet-1/tx/",
            token: None,
            native_symbol: "XION",
            gas_reserve: 0,
        },
        NetworkId::Corn => NetworkConfig {
            id,
            name: "Corn Testnet",
            endpoints: endpoints(&["https://testnet.corn-rpc.com"]),
            bridge_contract: "0x5fbe74a283f7954f10aa04c2edf55578811aeb03".into(),
            explorer_base: "https://testnet.cornscan.io/tx/",
            token: None,
            native_symbol: "BTCN",
            gas_reserve: 0,
        },
        NetworkId::Bnb => NetworkConfig {
            id,
            name: "BNB Testnet",
            endpoints: endpoints(&[
                "https://bsc-testnet-rpc.publicnode.com",
                "https://endpoints.omniatech.io/v1/bsc/testnet/public",
                "https://bsc-testnet.bnbchain.org",
                "https://data-seed-prebsc-1-s1.bnbchain.org:8545",
                "https://data-seed-prebsc-2-s1.bnbchain.org:8545",
            ]),
            bridge_contract: "0x5fbe74a283f7954f10aa04c2edf55578811aeb03".into(),
            explorer_base: "https://testnet.bscscan.com/tx/",
            token: None,
            native_symbol: "BNB",
            // 0.005 BNB held back for gas
            gas_reserve: 5_000_000_000_000_000,
        },
        NetworkId::Osmosis => NetworkConfig {
            id,
            name: "Osmosis Testnet",
            endpoints: endpoints(&[
                "https://rpc.testnet.osmosis.zone",
                "https://osmosis-testnet-rpc.polkachu.com",
            ]),
            bridge_contract: "0x16045bbe3c677814d0d9a25b39a78c63a9fb305d".into(),
            explorer_base: "https://testnet.mintscan.io/osmosis-testnet/txs/",
            token: None,
            native_symbol: "OSMO",
            gas_reserve: 0,
        },
        NetworkId::Sei => NetworkConfig {
            id,
            name: "Sei Testnet",
            endpoints: endpoints(&[
                "https://evm-rpc.atlantic-2.seinetwork.io",
                "https://sei-testnet-rpc.polkachu.com",
                "https://rpc-testnet.sei-apis.com",
            ]),
            bridge_contract: "0x5fbe74a283f7954f10aa04c2edf55578811aeb03".into(),
            explorer_base: "https://seitrace.com/tx/",
            token: None,
            native_symbol: "SEI",
            // 0.01 SEI held back for gas
            gas_reserve: 10_000_000_000_000_000,
        },
    }
}

/// Base URL of the transfer indexer's GraphQL API.
pub const INDEXER_GRAPHQL_URL: &str = "https://graphql.union.build/v1/graphql";

/// Base URL of the transfer indexer's web UI, for user-facing links.
pub const INDEXER_UI_BASE: &str = "https://app.union.build/transaction/";

/// Resolve the token metadata a route transfers, if it is a token route.
pub fn transfer_token(network_id: NetworkId) -> Result<TokenInfo> {
    network(network_id).token.ok_or_else(|| {
        FerryError::Config(format!("{} has no transfer token configured", network_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_network_has_endpoints() {
        for id in NetworkId::ALL {
            assert!(
                !network(id).endpoints.is_empty(),
                "{} must have at least one endpoint",
                id
            );
        }
    }

    #[test]
    fn test_token_networks() {
        assert!(transfer_token(NetworkId::Sepolia).is_ok());
        assert!(transfer_token(NetworkId::Holesky).is_ok());
        assert!(transfer_token(NetworkId::Corn).is_err());
    }
}
