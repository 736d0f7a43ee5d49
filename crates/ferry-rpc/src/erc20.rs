//! ERC-20 call encoding for the balance, allowance, and approval paths.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolCall};

use crate::{RpcError, RpcResult};

sol! {
    function balanceOf(address account) external view returns (uint256);
    function allowance(address owner, address spender) external view returns (uint256);
    function approve(address spender, uint256 amount) external returns (bool);
}

pub fn parse_address(addr: &str) -> RpcResult<Address> {
    addr.parse()
        .map_err(|_| RpcError::InvalidRequest(format!("invalid address: {}", addr)))
}

pub fn encode_balance_of(account: &str) -> RpcResult<Vec<u8>> {
    Ok(balanceOfCall {
        account: parse_address(account)?,
    }
    .abi_encode())
}

pub fn encode_allowance(owner: &str, spender: &str) -> RpcResult<Vec<u8>> {
    Ok(allowanceCall {
        owner: parse_address(owner)?,
        spender: parse_address(spender)?,
    }
    .abi_encode())
}

/// Approval calldata for the maximum amount, so one approval covers the
/// whole run.
pub fn encode_approve_max(spender: &str) -> RpcResult<Vec<u8>> {
    Ok(approveCall {
        spender: parse_address(spender)?,
        amount: U256::MAX,
    }
    .abi_encode())
}

/// Decode a single uint256 return value into a u128.
pub fn decode_uint(data: &[u8]) -> RpcResult<u128> {
    let value = U256::try_from_be_slice(data)
        .ok_or_else(|| RpcError::InvalidResponse("uint256 return too long".into()))?;
    u128::try_from(value)
        .map_err(|_| RpcError::InvalidResponse("uint256 return exceeds u128".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x1c7d4b196cb0c7b01d743fbc6116a902379c7238";

    #[test]
    fn test_balance_of_selector() {
        let data = encode_balance_of(ADDR).unwrap();
        assert_eq!(&data[..4], &[0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(data.len(), 4 + 32);
    }

    #[test]
    fn test_approve_selector_and_amount() {
        let data = encode_approve_max(ADDR).unwrap();
        assert_eq!(&data[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        // amount word is all-ones for U256::MAX
        assert!(data[4 + 32..].iter().all(|b| *b == 0xff));
    }

    #[test]
    fn test_decode_uint() {
        let mut word = [0u8; 32];
        word[31] = 0x10;
        assert_eq!(decode_uint(&word).unwrap(), 16);
        assert_eq!(decode_uint(&[]).unwrap(), 0);
    }

    #[test]
    fn test_bad_address_rejected() {
        assert!(encode_balance_of("not-an-address").is_err());
    }
}
