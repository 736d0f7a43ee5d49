//! UCS03 `send` calldata encoding.

use alloy_primitives::FixedBytes;
use alloy_sol_types::{sol, SolCall};

use ferry_types::{bytes_to_hex, hex_to_bytes, Hex, Result};

sol! {
    struct Instruction {
        uint8 version;
        uint8 opcode;
        bytes operand;
    }

    function send(
        uint32 channelId,
        uint64 timeoutHeight,
        uint64 timeoutTimestamp,
        bytes32 salt,
        Instruction instruction
    );
}

/// Instruction version carried by every operand template.
pub const INSTRUCTION_VERSION: u8 = 0;

/// Opcode for a batched fungible-asset transfer instruction.
pub const INSTRUCTION_OPCODE: u8 = 2;

/// ABI-encode a `send` call around an operand blob.
pub fn encode_send(
    channel_id: u32,
    timeout_height: u64,
    timeout_ns: u64,
    salt: [u8; 32],
    operand_hex: &str,
) -> Result<Hex> {
    let operand = hex_to_bytes(operand_hex)?;
    let call = sendCall {
        channelId: channel_id,
        timeoutHeight: timeout_height,
        timeoutTimestamp: timeout_ns,
        salt: FixedBytes(salt),
        instruction: Instruction {
            version: INSTRUCTION_VERSION,
            opcode: INSTRUCTION_OPCODE,
            operand: operand.into(),
        },
    };
    Ok(bytes_to_hex(&call.abi_encode()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_send_embeds_salt_and_channel() {
        let salt = [0xabu8; 32];
        let calldata = encode_send(8, 0, 1_700_172_800_000_000_000, salt, "0x1234").unwrap();
        let salt_hex = hex::encode(salt);
        assert!(calldata.contains(&salt_hex));
        // channelId word
        assert!(calldata.contains("0000000000000000000000000000000000000000000000000000000000000008"));
        // operand bytes appear padded at the tail
        assert!(calldata.contains("1234"));
    }

    #[test]
    fn test_encode_send_rejects_bad_operand() {
        assert!(encode_send(1, 0, 0, [0u8; 32], "0xzz").is_err());
    }
}
