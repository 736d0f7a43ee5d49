use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 0x-prefixed hex string (e.g. "0x1234...").
pub type Hex = String;

/// Stable route identifier as shown in the console menu.
pub type RouteId = u8;

/// Ferry error types.
#[derive(Debug, Error)]
pub enum FerryError {
    #[error("{wallet}: no {network} address configured")]
    MissingDestination { wallet: String, network: NetworkId },

    #[error("insufficient {asset} balance: required {required}, available {available}")]
    InsufficientFunds {
        asset: String,
        required: String,
        available: String,
    },

    #[error("submission failed: {0}")]
    Submission(String),

    #[error("transaction receipt not found after {attempts} attempts")]
    ReceiptTimeout { attempts: u32 },

    #[error("transaction reverted: {tx_hash}")]
    TransactionReverted { tx_hash: Hex },

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FerryError>;

/// The fixed set of networks the runner can source from or bridge to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    Sepolia,
    Holesky,
    Babylon,
    Xion,
    Corn,
    Bnb,
    Osmosis,
    Sei,
}

impl NetworkId {
    pub const ALL: [NetworkId; 8] = [
        NetworkId::Sepolia,
        NetworkId::Holesky,
        NetworkId::Babylon,
        NetworkId::Xion,
        NetworkId::Corn,
        NetworkId::Bnb,
        NetworkId::Osmosis,
        NetworkId::Sei,
    ];

    pub fn chain_id(&self) -> u64 {
        match self {
            NetworkId::Sepolia => 11155111,
            NetworkId::Holesky => 17000,
            NetworkId::Babylon => 888888,
            NetworkId::Xion => 37001,
            NetworkId::Corn => 21000001,
            NetworkId::Bnb => 97,
            NetworkId::Osmosis => 5432,
            NetworkId::Sei => 1328,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Sepolia => "sepolia",
            NetworkId::Holesky => "holesky",
            NetworkId::Babylon => "babylon",
            NetworkId::Xion => "xion",
            NetworkId::Corn => "corn",
            NetworkId::Bnb => "bnb",
            NetworkId::Osmosis => "osmosis",
            NetworkId::Sei => "sei",
        }
    }

    /// Cosmos-SDK chains take bech32 addresses and broadcast through
    /// Tendermint RPC rather than EVM JSON-RPC.
    pub fn is_cosmos(&self) -> bool {
        matches!(self, NetworkId::Babylon | NetworkId::Osmosis | NetworkId::Xion)
    }
}

impl std::fmt::Display for NetworkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a hex string to a big-endian byte array.
pub fn hex_to_bytes(hex_str: &str) -> Result<Vec<u8>> {
    let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    hex::decode(hex_str).map_err(|e| FerryError::InvalidHex(e.to_string()))
}

/// Convert bytes to a 0x-prefixed hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> Hex {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a JSON-RPC hex quantity ("0x2710") into a u128.
pub fn parse_quantity(quantity: &str) -> Result<u128> {
    let digits = quantity.strip_prefix("0x").unwrap_or(quantity);
    u128::from_str_radix(digits, 16).map_err(|e| FerryError::InvalidHex(e.to_string()))
}

/// Format a u128 as a JSON-RPC hex quantity.
pub fn to_quantity(value: u128) -> Hex {
    format!("0x{:x}", value)
}

/// Parse a decimal amount string ("0.01") into base units.
pub fn parse_units(amount: &str, decimals: u32) -> Result<u128> {
    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };
    if frac_part.len() as u32 > decimals {
        return Err(FerryError::InvalidAmount(format!(
            "{} has more than {} fractional digits",
            amount, decimals
        )));
    }
    let scale = 10u128
        .checked_pow(decimals)
        .ok_or_else(|| FerryError::InvalidAmount(format!("decimals {} too large", decimals)))?;
    let int_val: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| FerryError::InvalidAmount(amount.to_string()))?
    };
    let frac_val: u128 = if frac_part.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac_part, width = decimals as usize);
        padded
            .parse()
            .map_err(|_| FerryError::InvalidAmount(amount.to_string()))?
    };
    int_val
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(|| FerryError::InvalidAmount(format!("{} overflows u128", amount)))
}

/// Format base units as a decimal amount string, trimming trailing zeros.
pub fn format_units(value: u128, decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let int_part = value / scale;
    let frac_part = value % scale;
    if frac_part == 0 {
        return int_part.to_string();
    }
    let frac_str = format!("{:0>width$}", frac_part, width = decimals as usize);
    format!("{}.{}", int_part, frac_str.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_roundtrip() {
        assert_eq!(parse_quantity("0x2710").unwrap(), 10_000);
        assert_eq!(parse_quantity("0").unwrap(), 0);
        assert_eq!(to_quantity(10_000), "0x2710");
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_units("0.01", 6).unwrap(), 10_000);
        assert_eq!(parse_units("1", 18).unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(parse_units("0.0002", 18).unwrap(), 200_000_000_000_000);
        assert_eq!(parse_units(".5", 2).unwrap(), 50);
        assert!(parse_units("0.0000001", 6).is_err());
        assert!(parse_units("abc", 6).is_err());
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(10_000, 6), "0.01");
        assert_eq!(format_units(1_000_000_000_000_000_000, 18), "1");
        assert_eq!(format_units(0, 6), "0");
        assert_eq!(format_units(1_230_000, 6), "1.23");
    }

    #[test]
    fn test_hex_helpers() {
        let bytes = hex_to_bytes("0xdeadbeef").unwrap();
        assert_eq!(bytes, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(bytes_to_hex(&bytes), "0xdeadbeef");
        assert!(hex_to_bytes("0xg").is_err());
    }

    #[test]
    fn test_network_ids_unique() {
        let mut chain_ids: Vec<u64> = NetworkId::ALL.iter().map(|n| n.chain_id()).collect();
        chain_ids.sort_unstable();
        chain_ids.dedup();
        assert_eq!(chain_ids.len(), NetworkId::ALL.len());
    }
}
