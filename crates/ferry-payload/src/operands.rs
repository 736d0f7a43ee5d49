//! Operand and calldata templates, one per route.
//!
//! Each template is an operator-supplied byte layout with `{sender}`,
//! `{recipient}`, and (for raw-calldata routes) `{salt}`/`{timeout}` splice
//! points. Nothing here derives the layouts; they are data.

use ferry_config::{CalldataTemplate, InstructionTemplate};
use ferry_types::Hex;

use crate::AttemptParams;

/// EVM address as bare lowercase hex digits.
fn evm_hex(address: &str) -> String {
    address
        .strip_prefix("0x")
        .unwrap_or(address)
        .to_lowercase()
}

/// Bech32 (or any text) address as UTF-8 hex digits.
fn utf8_hex(address: &str) -> String {
    hex::encode(address.as_bytes())
}

/// Right-pad hex digits with zeros to a fixed width.
fn pad_hex(digits: &str, width: usize) -> String {
    format!("{:0<width$}", digits, width = width)
}

const SEPOLIA_HOLESKY_OPERAND: &str = "0x00000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000001000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000002c00000000000000000000000000000000000000000000000000000000000000140000000000000000000000000000000000000000000000000000000000000018000000000000000000000000000000000000000000000000000000000000001c000000000000000000000000000000000000000000000000000000000000027100000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000024000000000000000000000000000000000000000000000000000000000000000060000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000028000000000000000000000000000000000000000000000000000000000000027100000000000000000000000000000000000000000000000000000000000000014{sender}0000000000000000000000000000000000000000000000000000000000000000000000000000000000000014{sender}00000000000000000000000000000000000000000000000000000000000000000000000000000000000000141c7d4b196cb0c7b01d743fbc6116a902379c72380000000000000000000000000000000000000000000000000000000000000000000000000000000000000004555344430000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000045553444300000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001457978bfe465ad9b1c0bf80f6c1539d300705ea50000000000000000000000000";

const SEPOLIA_BABYLON_OPERAND: &str = "0x00000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000001000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000000140000000000000000000000000000000000000000000000000000000000000018000000000000000000000000000000000000000000000000000000000000001e00000000000000000000000000000000000000000000000000000000000002710000000000000000000000000000000000000000000000000000000000000022000000000000000000000000000000000000000000000000000000000000002600000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002a000000000000000000000000000000000000000000000000000000000000027100000000000000000000000000000000000000000000000000000000000000014{sender}000000000000000000000000000000000000000000000000000000000000000000000000000000000000002a{recipient}0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000141c7d4b196cb0c7b01d743fbc6116a902379c72380000000000000000000000000000000000000000000000000000000000000000000000000000000000000004555344430000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000045553444300000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000003e62626e317a7372763233616b6b6778646e77756c3732736674677632786a74356b68736e743377776a687030666668363833687a7035617135613068366e0000";

const HOLESKY_XION_OPERAND: &str = "0x00000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000001000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000000140000000000000000000000000000000000000000000000000000000000000018000000000000000000000000000000000000000000000000000000000000001e00000000000000000000000000000000000000000000000000000000000002710000000000000000000000000000000000000000000000000000000000000022000000000000000000000000000000000000000000000000000000000000002600000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002a000000000000000000000000000000000000000000000000000000000000027100000000000000000000000000000000000000000000000000000000000000014{sender}000000000000000000000000000000000000000000000000000000000000000000000000000000000000002b{recipient}000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001457978bfe465ad9b1c0bf80f6c1539d300705ea500000000000000000000000000000000000000000000000000000000000000000000000000000000000000004555344430000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000045553444300000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000003f78696f6e316b76377a7278686364723537363261727732327734716b6871726c307164783574746d6673687978746739346e356b6b6d37677336333276326600";

const SEI_BNB_OPERAND: &str = "0x000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000040000000000000000000000000000000000000000000000000000000000000038000000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000002c00000000000000000000000000000000000000000000000000000000000000140000000000000000000000000000000000000000000000000000000000000018000000000000000000000000000000000000000000000000000000000000001c0000000000000000000000000000000000000000000000000002386f26fc1000000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000240000000000000000000000000000000000000000000000000000000000000001200000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000280000000000000000000000000000000000000000000000000002386f26fc100000000000000000000000000000000000000000000000000000000000000000014{sender}0000000000000000000000000000000000000000000000000000000000000000000000000000000000000014{recipient}0000000000000000000000000000000000000000000000000000000000000000000000000000000000000014eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee00000000000000000000000000000000000000000000000000000000000000000000000000000000000000035345490000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000353656900000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000014e86bed5b0813430df660d17363b89fe9bd8232d800000000000000000000000000000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000002c00000000000000000000000000000000000000000000000000000000000000140000000000000000000000000000000000000000000000000000000000000018000000000000000000000000000000000000000000000000000000000000001c00000000000000000000000000000000000000000000000000220bf209b5989980000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000024000000000000000000000000000000000000000000000000000000000000000120000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000028000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000014{sender}0000000000000000000000000000000000000000000000000000000000000000000000000000000000000014{recipient}0000000000000000000000000000000000000000000000000000000000000000000000000000000000000014eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee00000000000000000000000000000000000000000000000000000000000000000000000000000000000000035345490000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000353656900000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000014e86bed5b0813430df660d17363b89fe9bd8232d8000000000000000000000000";

const CORN_SEI_CALLDATA: &str = "0xff0d7c2f00000000000000000000000000000000000000000000000000000000000000030000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000{timeout}{salt}00000000000000000000000000000000000000000000000000000000000000a000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000003a000000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000001000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000002c00000000000000000000000000000000000000000000000000000000000000140000000000000000000000000000000000000000000000000000000000000018000000000000000000000000000000000000000000000000000000000000001c0000000000000000000000000000000000000000000000000000000e8d4a5100000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000000240000000000000000000000000000000000000000000000000000000000000001200000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000280000000000000000000000000000000000000000000000000000000e8d4a510000000000000000000000000000000000000000000000000000000000000000014{sender}0000000000000000000000000000000000000000000000000000000000000000000000000000000000000014{recipient}0000000000000000000000000000000000000000000000000000000000000000000000000000000000000014eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee00000000000000000000000000000000000000000000000000000000000000000000000000000000000000044254434e000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000007426974636f726e00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000001492b3bc0bc3ac0ee60b04a0bbc4a09deb3914c886000000000000000000000000";

const BNB_BABYLON_CALLDATA: &str = "0xff0d7c2f00000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000{timeout}{salt}00000000000000000000000000000000000000000000000000000000000000a0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000060000000000000000000000000000000000000000000000000000000000000078000000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000004000000000000000000000000000000000000000000000000000000000000003c000000000000000000000000000000000000000000000000000000000000000010000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000003000000000000000000000000000000000000000000000000000000000000000140000000000000000000000000000000000000000000000000000000000000018000000000000000000000000000000000000000000000000000000000000001e0000000000000000000000000000000000000000000000000005af3107a40000000000000000000000000000000000000000000000000000000000000000220000000000000000000000000000000000000000000000000000000000000026000000000000000000000000000000000000000000000000000000000000000120000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002a000000000000000000000000000000000000000000000000005af3107a40000000000000000000000000000000000000000000000000000000000000000014{sender}000000000000000000000000000000000000000000000000000000000000000000000000000000000000002a{recipient}000000000000000000000000000000000000000000000000000000000000000000000000000000000000000014eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee0000000000000000000000000000000000000000000000000000000000000000000000000000000000000003424e4200000000000000000000000000000000000000000000000000000000000000000000000000000000000000000003424e420000000000000000000000000000000000000000000000000000000000000000000000000000000000000000003e62626e31633568666e6b766a64767439376670733835396b72686538617772777a33666d736a343436633465337a78713530773666756773326b6d6334790000";

/// Produce the instruction operand for a generic route.
///
/// The recipient splice differs per destination: EVM destinations embed the
/// bare address digits, Cosmos destinations embed the UTF-8 hex of the
/// bech32 string.
pub fn instruction_operand(
    template: InstructionTemplate,
    sender: &str,
    recipient: &str,
) -> Hex {
    match template {
        InstructionTemplate::SepoliaToHolesky => {
            SEPOLIA_HOLESKY_OPERAND.replace("{sender}", &evm_hex(sender))
        }
        InstructionTemplate::SepoliaToBabylon => SEPOLIA_BABYLON_OPERAND
            .replace("{sender}", &evm_hex(sender))
            .replace("{recipient}", &utf8_hex(recipient)),
        InstructionTemplate::HoleskyToXion => HOLESKY_XION_OPERAND
            .replace("{sender}", &evm_hex(sender))
            .replace("{recipient}", &utf8_hex(recipient)),
        InstructionTemplate::SeiToBnb => SEI_BNB_OPERAND
            .replace("{sender}", &evm_hex(sender))
            .replace("{recipient}", &evm_hex(recipient)),
    }
}

/// Produce the full calldata for a raw-calldata route, salt and timeout
/// included.
pub fn raw_calldata(
    template: CalldataTemplate,
    sender: &str,
    recipient: &str,
    params: &AttemptParams,
) -> Hex {
    let salt_digits = hex::encode(params.salt);
    let timeout_digits = format!("{:016x}", params.timeout_ns);
    match template {
        CalldataTemplate::CornToSei => CORN_SEI_CALLDATA
            .replace("{timeout}", &timeout_digits)
            .replace("{salt}", &salt_digits)
            .replace("{sender}", &evm_hex(sender))
            .replace("{recipient}", &evm_hex(recipient)),
        CalldataTemplate::BnbToBabylon => BNB_BABYLON_CALLDATA
            .replace("{timeout}", &timeout_digits)
            .replace("{salt}", &salt_digits)
            .replace("{sender}", &evm_hex(sender))
            .replace("{recipient}", &pad_hex(&utf8_hex(recipient), 84)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENDER: &str = "0xAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAa";
    const BBN: &str = "bbn1zsrv23akkgxdnwul72sftgv2xjt5khsnt3wwjhp0ffh683hzp5aq5a0h6n";

    #[test]
    fn test_operands_are_fully_spliced() {
        for template in [
            InstructionTemplate::SepoliaToHolesky,
            InstructionTemplate::SepoliaToBabylon,
            InstructionTemplate::HoleskyToXion,
            InstructionTemplate::SeiToBnb,
        ] {
            let operand = instruction_operand(template, SENDER, BBN);
            assert!(operand.starts_with("0x"));
            assert!(!operand.contains('{'), "{:?} left a splice point", template);
            assert!(operand.contains("aaaaaaaa"), "{:?} missing sender", template);
        }
    }

    #[test]
    fn test_raw_calldata_embeds_salt_and_timeout() {
        let params = AttemptParams::at(1_700_000_000, [0x5au8; 32]);
        for template in [CalldataTemplate::CornToSei, CalldataTemplate::BnbToBabylon] {
            let data = raw_calldata(template, SENDER, BBN, &params);
            assert!(data.starts_with("0xff0d7c2f"), "{:?} missing selector", template);
            assert!(data.contains(&hex::encode(params.salt)), "{:?} missing salt", template);
            assert!(
                data.contains(&format!("{:016x}", params.timeout_ns)),
                "{:?} missing timeout",
                template
            );
            assert!(!data.contains('{'), "{:?} left a splice point", template);
        }
    }

    #[test]
    fn test_corn_calldata_word_aligned() {
        let params = AttemptParams::at(1_700_000_000, [1u8; 32]);
        let data = raw_calldata(
            CalldataTemplate::CornToSei,
            SENDER,
            "0xBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBbBb",
            &params,
        );
        let byte_len = (data.len() - 2) / 2;
        assert_eq!((byte_len - 4) % 32, 0, "calldata body must be word aligned");
    }

    #[test]
    fn test_operands_match_vectors() {
        let data = include_str!("../../../tests/vectors/operands.json");
        let vectors: serde_json::Value = serde_json::from_str(data).unwrap();
        let sender = vectors["sender"].as_str().unwrap();

        assert_eq!(
            instruction_operand(InstructionTemplate::SepoliaToHolesky, sender, sender),
            vectors["sepolia_to_holesky"].as_str().unwrap()
        );
        assert_eq!(
            instruction_operand(
                InstructionTemplate::SepoliaToBabylon,
                sender,
                vectors["babylon_address"].as_str().unwrap()
            ),
            vectors["sepolia_to_babylon"].as_str().unwrap()
        );
        assert_eq!(
            instruction_operand(
                InstructionTemplate::HoleskyToXion,
                sender,
                vectors["xion_address"].as_str().unwrap()
            ),
            vectors["holesky_to_xion"].as_str().unwrap()
        );
    }

    #[test]
    fn test_bech32_recipient_padded() {
        let params = AttemptParams::at(1_700_000_000, [1u8; 32]);
        // 38-char account address: 76 hex digits, padded to 84
        let short = "bbn1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq";
        let data = raw_calldata(CalldataTemplate::BnbToBabylon, SENDER, short, &params);
        let padded = pad_hex(&utf8_hex(short), 84);
        assert_eq!(padded.len(), 84);
        assert!(padded.ends_with("00000000"));
        assert!(data.contains(&padded));
    }
}
