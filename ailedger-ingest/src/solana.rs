//! Solana `getTransaction` decoder (jsonParsed encoding)
//!
//! Input is either the bare transaction object or the full JSON-RPC envelope
//! (`{"jsonrpc": "2.0", "result": {...}}`). Only the fields the ledger needs
//! are read:
//!
//!   slot, blockTime
//!   transaction.signatures[0]
//!   transaction.message.accountKeys[]      (objects with `pubkey`, or strings)
//!   transaction.message.instructions[]     (programId, parsed)
//!   meta.fee / meta.preBalances / meta.postBalances

use ailedger_core::{ChainInstruction, RawChainTransaction};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const MEMO_PROGRAM: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";
pub const MEMO_V1_PROGRAM: &str = "Memo1UhkJRfHyvLMcVucJwxXeuD728EqVDDwQDxFMNo";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodedTransaction {
    slot: u64,
    #[serde(default)]
    block_time: Option<i64>,
    transaction: TransactionBody,
    meta: Option<StatusMeta>,
}

#[derive(Debug, Deserialize)]
struct TransactionBody {
    signatures: Vec<String>,
    message: Message,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Message {
    account_keys: Vec<AccountKey>,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AccountKey {
    Parsed { pubkey: String },
    Plain(String),
}

impl AccountKey {
    fn pubkey(&self) -> &str {
        match self {
            AccountKey::Parsed { pubkey } => pubkey,
            AccountKey::Plain(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Instruction {
    #[serde(default)]
    program_id: Option<String>,
    /// Set when the RPC returned a compiled (non-parsed) instruction
    #[serde(default)]
    program_id_index: Option<usize>,
    #[serde(default)]
    parsed: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusMeta {
    #[serde(default)]
    fee: u64,
    pre_balances: Vec<u64>,
    post_balances: Vec<u64>,
}

impl Instruction {
    fn resolve_program(&self, keys: &[AccountKey]) -> Option<String> {
        self.program_id
            .clone()
            .or_else(|| {
                self.program_id_index
                    .and_then(|i| keys.get(i))
                    .map(|k| k.pubkey().to_string())
            })
    }

    /// `parsed.type` for parsed instructions ("transfer", "createAccount", ...)
    fn kind(&self) -> Option<String> {
        self.parsed
            .as_ref()
            .and_then(|p| p.get("type"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

fn is_memo_program(id: &str) -> bool {
    id == MEMO_PROGRAM || id == MEMO_V1_PROGRAM
}

/// Decode one transaction as seen from `wallet`.
pub fn decode_transaction(json: &Value, wallet: &str) -> Result<RawChainTransaction> {
    let body = json.get("result").unwrap_or(json);
    if body.is_null() {
        bail!("transaction not found");
    }
    let tx: EncodedTransaction =
        serde_json::from_value(body.clone()).context("decode getTransaction response")?;

    let signature = tx
        .transaction
        .signatures
        .first()
        .cloned()
        .context("transaction has no signatures")?;
    let meta = tx
        .meta
        .with_context(|| format!("transaction {signature} has no status meta"))?;

    let keys = &tx.transaction.message.account_keys;
    let wallet_index = keys
        .iter()
        .position(|k| k.pubkey() == wallet)
        .with_context(|| format!("wallet {wallet} is not an account of {signature}"))?;

    let balance_at = |balances: &[u64], i: usize| balances.get(i).copied().unwrap_or(0);
    let delta_at = |i: usize| {
        i128::from(balance_at(&meta.post_balances, i))
            - i128::from(balance_at(&meta.pre_balances, i))
    };

    let wallet_delta = delta_at(wallet_index);
    // First other account that moved the opposite way
    let counterparty = (wallet_delta != 0)
        .then(|| {
            (0..keys.len())
                .filter(|&i| i != wallet_index)
                .find(|&i| {
                    let d = delta_at(i);
                    d != 0 && (d > 0) != (wallet_delta > 0)
                })
                .map(|i| keys[i].pubkey().to_string())
        })
        .flatten();

    let mut instructions = Vec::new();
    let mut memo = None;
    for ix in &tx.transaction.message.instructions {
        let Some(program_id) = ix.resolve_program(keys) else {
            continue;
        };
        if is_memo_program(&program_id) && memo.is_none() {
            memo = ix.parsed.as_ref().and_then(Value::as_str).map(str::to_string);
        }
        instructions.push(ChainInstruction {
            kind: ix.kind(),
            program_id,
        });
    }

    debug!(
        %signature,
        slot = tx.slot,
        wallet_delta = %wallet_delta,
        instructions = instructions.len(),
        "decoded solana transaction"
    );

    Ok(RawChainTransaction {
        signature,
        slot: tx.slot,
        block_time: tx.block_time,
        wallet_address: wallet.to_string(),
        counterparty,
        pre_balance: balance_at(&meta.pre_balances, wallet_index),
        post_balance: balance_at(&meta.post_balances, wallet_index),
        fee: meta.fee,
        instructions,
        memo,
    })
}

pub fn decode_transaction_str(json: &str, wallet: &str) -> Result<RawChainTransaction> {
    let value: Value = serde_json::from_str(json).context("transaction file is not JSON")?;
    decode_transaction(&value, wallet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailedger_core::Direction;
    use serde_json::json;

    const WALLET: &str = "WalletAddress111111111111111111111111111111";
    const RECEIVER: &str = "Receiver11111111111111111111111111111111";

    fn native_transfer() -> Value {
        json!({
            "slot": 123456,
            "blockTime": 1672531200,
            "transaction": {
                "signatures": ["sig123"],
                "message": {
                    "accountKeys": [
                        { "pubkey": WALLET, "signer": true, "writable": true },
                        { "pubkey": RECEIVER, "signer": false, "writable": true },
                        { "pubkey": "11111111111111111111111111111111", "signer": false, "writable": false }
                    ],
                    "instructions": [
                        {
                            "program": "system",
                            "programId": "11111111111111111111111111111111",
                            "parsed": { "type": "transfer", "info": { "lamports": 500000000 } }
                        },
                        {
                            "program": "spl-memo",
                            "programId": MEMO_PROGRAM,
                            "parsed": "rent for march"
                        }
                    ]
                }
            },
            "meta": {
                "err": null,
                "fee": 5000,
                "preBalances": [10_000_000_000u64, 0, 1],
                "postBalances": [9_499_995_000u64, 500_000_000, 1]
            }
        })
    }

    #[test]
    fn test_decode_native_transfer() {
        let tx = decode_transaction(&native_transfer(), WALLET).unwrap();
        assert_eq!(tx.signature, "sig123");
        assert_eq!(tx.slot, 123456);
        assert_eq!(tx.block_time, Some(1672531200));
        assert_eq!(tx.fee, 5000);
        assert_eq!(tx.direction(), Direction::Sent);
        assert_eq!(tx.counterparty.as_deref(), Some(RECEIVER));
        assert_eq!(tx.memo_text(), Some("rent for march"));
        assert_eq!(tx.instructions[0].kind.as_deref(), Some("transfer"));
        assert_eq!(tx.instructions.len(), 2);
    }

    #[test]
    fn test_decode_from_receiver_side() {
        let tx = decode_transaction(&native_transfer(), RECEIVER).unwrap();
        assert_eq!(tx.direction(), Direction::Received);
        assert_eq!(tx.amount_sol(), 0.5);
        assert_eq!(tx.counterparty.as_deref(), Some(WALLET));
    }

    #[test]
    fn test_rpc_envelope_and_plain_keys() {
        let json = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "slot": 9,
                "transaction": {
                    "signatures": ["sigA"],
                    "message": {
                        "accountKeys": [WALLET, "Stake11111111111111111111111111111111111111"],
                        "instructions": [{ "programIdIndex": 1, "accounts": [0], "data": "3Bxs" }]
                    }
                },
                "meta": { "fee": 5000, "preBalances": [100, 1], "postBalances": [95, 1] }
            }
        });
        let tx = decode_transaction(&json, WALLET).unwrap();
        assert_eq!(tx.block_time, None);
        assert_eq!(tx.program_ids(), vec!["Stake11111111111111111111111111111111111111"]);
        assert_eq!(tx.instructions[0].kind, None);
        // only the fee moved and nobody received it
        assert_eq!(tx.counterparty, None);
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode_transaction(&native_transfer(), "SomeoneElse").is_err());
        assert!(decode_transaction(&json!({ "jsonrpc": "2.0", "result": null }), WALLET).is_err());

        let mut no_meta = native_transfer();
        no_meta["meta"] = Value::Null;
        let err = decode_transaction(&no_meta, WALLET).unwrap_err();
        assert!(err.to_string().contains("no status meta"));

        assert!(decode_transaction_str("not json", WALLET).is_err());
    }
}
