//! Wallet credentials, loaded once at startup and immutable thereafter.

use std::collections::HashMap;
use std::env;
use std::fmt;

use ferry_types::{FerryError, Hex, NetworkId, Result};

/// One configured wallet: signing key, primary EVM address, and
/// per-destination-network address overrides.
///
/// The signing key is never exposed through `Debug` or logging.
#[derive(Clone)]
pub struct WalletCredential {
    pub name: String,
    signing_key: Hex,
    pub address: Hex,
    overrides: HashMap<NetworkId, String>,
}

impl WalletCredential {
    pub fn new(
        name: impl Into<String>,
        signing_key: impl Into<Hex>,
        address: impl Into<Hex>,
        overrides: HashMap<NetworkId, String>,
    ) -> Self {
        Self {
            name: name.into(),
            signing_key: signing_key.into(),
            address: address.into(),
            overrides,
        }
    }

    pub fn signing_key(&self) -> &str {
        &self.signing_key
    }

    /// Resolve the wallet's address on `network`.
    ///
    /// An explicit override always wins. EVM networks fall back to the
    /// wallet's primary address; Cosmos networks have no fallback.
    pub fn destination_address(&self, network: NetworkId) -> Option<String> {
        if let Some(addr) = self.overrides.get(&network) {
            if !addr.is_empty() {
                return Some(addr.clone());
            }
        }
        if network.is_cosmos() {
            None
        } else {
            Some(self.address.clone())
        }
    }
}

impl fmt::Debug for WalletCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletCredential")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("signing_key", &"<redacted>")
            .field("overrides", &self.overrides)
            .finish()
    }
}

const OVERRIDE_VARS: [(&str, NetworkId); 5] = [
    ("FERRY_BABYLON_ADDRESS", NetworkId::Babylon),
    ("FERRY_XION_ADDRESS", NetworkId::Xion),
    ("FERRY_SEI_ADDRESS", NetworkId::Sei),
    ("FERRY_OSMO_ADDRESS", NetworkId::Osmosis),
    ("FERRY_BNB_ADDRESS", NetworkId::Bnb),
];

/// Load wallets from `FERRY_KEY_1`, `FERRY_ADDRESS_1`, ... stopping at the
/// first missing key index.
pub fn wallets_from_env() -> Result<Vec<WalletCredential>> {
    let mut wallets = Vec::new();
    let mut index = 1u32;

    loop {
        let key = match env::var(format!("FERRY_KEY_{}", index)) {
            Ok(k) if !k.is_empty() => k,
            _ => break,
        };
        let address = env::var(format!("FERRY_ADDRESS_{}", index)).map_err(|_| {
            FerryError::Config(format!(
                "FERRY_KEY_{} is set but FERRY_ADDRESS_{} is missing",
                index, index
            ))
        })?;

        let mut overrides = HashMap::new();
        for (var, network) in OVERRIDE_VARS {
            if let Ok(addr) = env::var(format!("{}_{}", var, index)) {
                if !addr.is_empty() {
                    overrides.insert(network, addr);
                }
            }
        }

        wallets.push(WalletCredential::new(
            format!("Wallet{}", index),
            key,
            address,
            overrides,
        ));
        index += 1;
    }

    Ok(wallets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet_with(overrides: HashMap<NetworkId, String>) -> WalletCredential {
        WalletCredential::new(
            "Wallet1",
            "0xsecret",
            "0x1111111111111111111111111111111111111111",
            overrides,
        )
    }

    #[test]
    fn test_evm_destination_defaults_to_primary() {
        let wallet = wallet_with(HashMap::new());
        assert_eq!(
            wallet.destination_address(NetworkId::Bnb).as_deref(),
            Some("0x1111111111111111111111111111111111111111")
        );
        assert_eq!(
            wallet.destination_address(NetworkId::Sei).as_deref(),
            Some("0x1111111111111111111111111111111111111111")
        );
    }

    #[test]
    fn test_cosmos_destination_requires_override() {
        let wallet = wallet_with(HashMap::new());
        assert!(wallet.destination_address(NetworkId::Babylon).is_none());
        assert!(wallet.destination_address(NetworkId::Xion).is_none());

        let mut overrides = HashMap::new();
        overrides.insert(NetworkId::Babylon, "bbn1qqqq".to_string());
        let wallet = wallet_with(overrides);
        assert_eq!(
            wallet.destination_address(NetworkId::Babylon).as_deref(),
            Some("bbn1qqqq")
        );
    }

    #[test]
    fn test_debug_redacts_signing_key() {
        let wallet = wallet_with(HashMap::new());
        let rendered = format!("{:?}", wallet);
        assert!(!rendered.contains("0xsecret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_wallets_from_env() {
        env::set_var("FERRY_KEY_91", "0xaaa");
        env::set_var("FERRY_ADDRESS_91", "0x2222222222222222222222222222222222222222");
        // Index 91 is not index 1, so the loop never reaches it; exercise
        // the error path for a key without an address instead.
        env::set_var("FERRY_KEY_1", "0xbbb");
        env::remove_var("FERRY_ADDRESS_1");
        assert!(wallets_from_env().is_err());

        env::set_var("FERRY_ADDRESS_1", "0x3333333333333333333333333333333333333333");
        env::set_var("FERRY_BABYLON_ADDRESS_1", "bbn1test");
        let wallets = wallets_from_env().unwrap();
        assert_eq!(wallets.len(), 1);
        assert_eq!(
            wallets[0].destination_address(NetworkId::Babylon).as_deref(),
            Some("bbn1test")
        );
        env::remove_var("FERRY_KEY_1");
        env::remove_var("FERRY_ADDRESS_1");
        env::remove_var("FERRY_BABYLON_ADDRESS_1");
        env::remove_var("FERRY_KEY_91");
        env::remove_var("FERRY_ADDRESS_91");
    }
}
