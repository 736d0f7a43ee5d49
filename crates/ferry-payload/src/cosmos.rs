//! CosmWasm execute messages for the Babylon → Osmosis route.
//!
//! Two messages per transfer: an `increase_allowance` on the token
//! contract, then a `send` on the bridge contract carrying the instruction
//! blob. Both are wrapped in raw Tendermint transaction documents for
//! `broadcast_tx_sync`.

use serde_json::{json, Value};

use ferry_types::Hex;

use crate::AttemptParams;

/// Bridge contract executing `send` on Babylon.
pub const BRIDGE_CONTRACT: &str =
    "bbn1336jj8ertl8h7rdvnz4dh5rqahd09cy0x43guhsxx6xyrztx292q77945h";

/// Token contract granted the allowance.
pub const TOKEN_CONTRACT: &str =
    "bbn1zsrv23akkgxdnwul72sftgv2xjt5khsnt3wwjhp0ffh683hzp5aq5a0h6n";

/// Spender named in the allowance message.
pub const ALLOWANCE_SPENDER: &str =
    "bbn1sakazthycqgzer50nqgr5ta4vy3gwz8wxla3s8rd8pql4ctmz5qssg39sf";

pub const ALLOWANCE_AMOUNT: &str = "100000";

/// Funds attached to the `send` execute, in ubbn.
pub const SEND_FUNDS_UBBN: &str = "177459";

/// Fallback signer key when the account query returns none.
const FALLBACK_PUBKEY: &str = "CiEDeHjRrzYswRJineAgp9l1TvjwEvuWuBYbU7HP/CGnVwo=";

/// Fee for the allowance execute.
pub const ALLOWANCE_FEE: CosmosFee = CosmosFee {
    amount_ubbn: "1167",
    gas_limit: "166603",
};

/// Fee for the send execute.
pub const SEND_FEE: CosmosFee = CosmosFee {
    amount_ubbn: "5261",
    gas_limit: "751544",
};

#[derive(Debug, Clone, Copy)]
pub struct CosmosFee {
    pub amount_ubbn: &'static str,
    pub gas_limit: &'static str,
}

const SEND_INSTRUCTION: &str = "0x000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000020000000000000000000000000000000000000000000000000000000000000060000000000000000000000000000000000000000000000000000000000000086000000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000004000000000000000000000000000000000000000000000000000000000000004400000000000000000000000000000000000000000000000000000000000000001000000000000000000000000000000000000000000000000000000000000000300000000000000000000000000000000000000000000000000000000000000600000000000000000000000000000000000000000000000000000000000000380000000000000000000000000000000000000000000000000000000000000014000000000000000000000000000000000000000000000000000000000000001a000000000000000000000000000000000000000000000000000000000000002000000000000000000000000000000000000000000000000000000000000186a0000000000000000000000000000000000000000000000000000000000000026000000000000000000000000000000000000000000000000000000000000002a00000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002e000000000000000000000000000000000000000000000000000000000000186a0000000000000000000000000000000000000000000000000000000000000002a{sender}000000000000000000000000000000000000000000000000000000000000002b{recipient}000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000003e62626e317a7372763233616b6b6778646e77756c3732736674677632786a74356b68736e743377776a687030666668363833687a7035617135613068366e000000000000000000000000000000000000000000000000000000000000000000045553444300000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000455534443000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000074666163746f72792f6f736d6f3133756c63367071686d3630716e78353873733773336366743863716679636578713375793364643276306c3871736e6b766b34736a3232736e362f347762757a6661464c394a66444a68574553735a56326843707357476361676b65704b4c7a35505a42346b610000000000000000000000000000000000000000000000000000000000000000000000000000000000000001000000000000000000000000000000000000000000000000000000000000000300000000000000000000000000000000000000000000000000000000000000600000000000000000000000000000000000000000000000000000000000000360000000000000000000000000000000000000000000000000000000000000014000000000000000000000000000000000000000000000000000000000000001a00000000000000000000000000000000000000000000000000000000000000200000000000000000000000000000000000000000000000000000000000002ae70000000000000000000000000000000000000000000000000000000000000024000000000000000000000000000000000000000000000000000000000000002800000000000000000000000000000000000000000000000000000000000000006000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002c00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000002a{sender}000000000000000000000000000000000000000000000000000000000000002b{recipient}00000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000047562626e0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000047562626e0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000047562626e000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000073666163746f72792f6f736d6f3133756c63367071686d3630716e78353873733773336366743863716679636578713375793364643276306c3871736e6b766b34736a3232736e362f46374266536e58746d6652613343475541473841507055576b42794476686445706e464874694b5939454200000000000000000000000000";

fn utf8_hex_padded(address: &str, width: usize) -> String {
    format!("{:0<width$}", hex::encode(address.as_bytes()), width = width)
}

/// The allowance execute message.
pub fn allowance_msg() -> Value {
    json!({
        "increase_allowance": {
            "spender": ALLOWANCE_SPENDER,
            "amount": ALLOWANCE_AMOUNT,
        }
    })
}

/// The bridge `send` execute message with addresses, salt, and timeout
/// spliced in.
pub fn send_msg(
    babylon_address: &str,
    osmosis_address: &str,
    channel_id: u32,
    params: &AttemptParams,
) -> Value {
    let instruction = SEND_INSTRUCTION
        .replace("{sender}", &utf8_hex_padded(babylon_address, 128))
        .replace("{recipient}", &utf8_hex_padded(osmosis_address, 128));

    json!({
        "send": {
            "channel_id": channel_id,
            "timeout_height": "0",
            "timeout_timestamp": params.timeout_ns.to_string(),
            "salt": params.salt_hex(),
            "instruction": instruction,
        }
    })
}

/// Wrap an execute message in a raw transaction document for
/// `broadcast_tx_sync`. Signing is left to the broadcasting node; the
/// document carries an empty signature slot.
#[allow(clippy::too_many_arguments)]
pub fn execute_tx_doc(
    sender: &str,
    contract: &str,
    msg: &Value,
    funds: Vec<(&str, &str)>,
    pub_key: Option<&str>,
    sequence: u64,
    fee: CosmosFee,
) -> Value {
    let funds: Vec<Value> = funds
        .into_iter()
        .map(|(denom, amount)| json!({ "denom": denom, "amount": amount }))
        .collect();

    json!({
        "body": {
            "messages": [{
                "@type": "/cosmwasm.wasm.v1.MsgExecuteContract",
                "sender": sender,
                "contract": contract,
                "msg": msg,
                "funds": funds,
            }],
            "memo": "",
            "timeout_height": "0",
            "extension_options": [],
            "non_critical_extension_options": [],
        },
        "auth_info": {
            "signer_infos": [{
                "public_key": {
                    "@type": "/cosmos.crypto.secp256k1.PubKey",
                    "key": pub_key.unwrap_or(FALLBACK_PUBKEY),
                },
                "mode_info": { "single": { "mode": "SIGN_MODE_DIRECT" } },
                "sequence": sequence.to_string(),
            }],
            "fee": {
                "amount": [{ "denom": "ubbn", "amount": fee.amount_ubbn }],
                "gas_limit": fee.gas_limit,
                "payer": "",
                "granter": "",
            },
        },
        "signatures": [""],
    })
}

/// Hex for a transfer with salt, used by tests and progress reporting.
pub fn instruction_preview(msg: &Value) -> Option<Hex> {
    msg["send"]["instruction"].as_str().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBN: &str = "bbn1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq";
    const OSMO: &str = "osmo1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq";

    #[test]
    fn test_send_msg_embeds_salt_and_addresses() {
        let params = AttemptParams::at(1_700_000_000, [0x11u8; 32]);
        let msg = send_msg(BBN, OSMO, 5, &params);
        assert_eq!(msg["send"]["channel_id"], 5);
        assert_eq!(msg["send"]["salt"], params.salt_hex());
        assert_eq!(
            msg["send"]["timeout_timestamp"],
            params.timeout_ns.to_string()
        );
        let instruction = instruction_preview(&msg).unwrap();
        assert!(instruction.contains(&hex::encode(BBN.as_bytes())));
        assert!(instruction.contains(&hex::encode(OSMO.as_bytes())));
        assert!(!instruction.contains('{'));
    }

    #[test]
    fn test_send_msgs_differ_across_salts() {
        let a = send_msg(BBN, OSMO, 5, &AttemptParams::at(1_700_000_000, [1u8; 32]));
        let b = send_msg(BBN, OSMO, 5, &AttemptParams::at(1_700_000_000, [2u8; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_tx_doc_shape() {
        let doc = execute_tx_doc(
            BBN,
            BRIDGE_CONTRACT,
            &allowance_msg(),
            vec![("ubbn", SEND_FUNDS_UBBN)],
            None,
            276,
            ALLOWANCE_FEE,
        );
        assert_eq!(
            doc["body"]["messages"][0]["@type"],
            "/cosmwasm.wasm.v1.MsgExecuteContract"
        );
        assert_eq!(doc["auth_info"]["signer_infos"][0]["sequence"], "276");
        assert_eq!(doc["auth_info"]["fee"]["gas_limit"], ALLOWANCE_FEE.gas_limit);
        assert_eq!(doc["signatures"][0], "");
    }
}
