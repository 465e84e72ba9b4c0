//! On-chain transaction -> parse result.
//!
//! 1) Synthesize a sentence ("12.5 SOL received from Ab12…9xYz via swap")
//! 2) Run it through the configured backend with the on-chain taxonomy
//! 3) On error / no answer / OTHER, fall back to the program-id table
//!
//! The chain's own amount, direction and block date always win over anything
//! the backend inferred.

use ailedger_core::time::date_from_unix;
use ailedger_core::{
    Category, Direction, OnChainCategory, ParseContext, ParseResult, RawChainTransaction,
    TransactionType,
};
use tracing::{debug, warn};

use crate::assembler::AssemblyOptions;
use crate::backend::ParseBackend;

/// Confidence attached to every fallback-table result
pub const FALLBACK_CONFIDENCE: f64 = 0.7;

pub const SYSTEM_PROGRAM: &str = "11111111111111111111111111111111";
pub const SPL_TOKEN_PROGRAM: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const TOKEN_2022_PROGRAM: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";
pub const JUPITER_V6_PROGRAM: &str = "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4";
pub const JUPITER_V4_PROGRAM: &str = "JUP4Fb2cqiRUcaTHdrPC8h2gNsA2ETXiPDD33WcGuJB";
pub const RAYDIUM_AMM_PROGRAM: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";
pub const ORCA_WHIRLPOOL_PROGRAM: &str = "whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc";
pub const STAKE_PROGRAM: &str = "Stake11111111111111111111111111111111111111";
pub const MARINADE_PROGRAM: &str = "MarBmsSgKXdrN1egZf5sqe1TMai9K1rChYNDJgjq7aD";

const SWAP_PROGRAMS: &[&str] = &[
    JUPITER_V6_PROGRAM,
    JUPITER_V4_PROGRAM,
    RAYDIUM_AMM_PROGRAM,
    ORCA_WHIRLPOOL_PROGRAM,
];

const STAKE_PROGRAMS: &[&str] = &[STAKE_PROGRAM, MARINADE_PROGRAM];

const TRANSFER_PROGRAMS: &[&str] = &[SYSTEM_PROGRAM, SPL_TOKEN_PROGRAM, TOKEN_2022_PROGRAM];

/// Metaplex token metadata ("metaq…"), candy machine ("Cndy…", "CMZY…")
/// and Bubblegum compressed NFTs ("BGUM…")
const NFT_PROGRAM_PREFIXES: &[&str] = &["metaq", "Cndy", "CMZY", "BGUM"];

/// Deterministic category for one program id
pub fn category_for_program(program_id: &str) -> OnChainCategory {
    if SWAP_PROGRAMS.contains(&program_id) {
        OnChainCategory::DefiSwap
    } else if STAKE_PROGRAMS.contains(&program_id) {
        OnChainCategory::DefiStaking
    } else if NFT_PROGRAM_PREFIXES.iter().any(|p| program_id.starts_with(p)) {
        OnChainCategory::Minting
    } else if TRANSFER_PROGRAMS.contains(&program_id) {
        OnChainCategory::TokenTransfer
    } else {
        OnChainCategory::Other
    }
}

/// Most specific category over all programs a transaction invoked.
///
/// Swaps and stakes also touch the system/token programs, so specific
/// programs outrank the plain transfer ones.
pub fn program_category(tx: &RawChainTransaction) -> OnChainCategory {
    const RANK: [OnChainCategory; 4] = [
        OnChainCategory::DefiSwap,
        OnChainCategory::DefiStaking,
        OnChainCategory::Minting,
        OnChainCategory::TokenTransfer,
    ];
    let found: Vec<OnChainCategory> = tx
        .program_ids()
        .into_iter()
        .map(category_for_program)
        .collect();
    RANK.into_iter()
        .find(|c| found.contains(c))
        .unwrap_or(OnChainCategory::Other)
}

/// Phrase naming the program family, used in the synthesized sentence
fn program_phrase(category: OnChainCategory) -> &'static str {
    match category {
        OnChainCategory::DefiSwap => "swap",
        OnChainCategory::DefiStaking => "stake",
        OnChainCategory::Minting => "nft mint",
        OnChainCategory::TokenTransfer => "transfer",
        _ => "unknown program",
    }
}

/// "Ab12…9xYz" for long addresses
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

/// SOL amount without trailing zeros ("12.5", "0.000005")
pub fn format_sol(amount: f64) -> String {
    let s = format!("{amount:.9}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Natural-language sentence fed to the backend
pub fn describe_transaction(tx: &RawChainTransaction, amount: f64) -> String {
    let direction = tx.direction();
    let mut out = format!(
        "{} SOL {}",
        format_sol(amount),
        match direction {
            Direction::Received => "received",
            Direction::Sent => "sent",
        }
    );
    if let Some(cp) = tx.counterparty.as_deref() {
        let prep = match direction {
            Direction::Received => "from",
            Direction::Sent => "to",
        };
        out.push_str(&format!(" {prep} {}", short_address(cp)));
    }
    out.push_str(" via ");
    out.push_str(program_phrase(program_category(tx)));
    if let Some(memo) = tx.memo_text() {
        out.push_str(&format!(" memo: {memo}"));
    }
    out
}

fn transaction_type(direction: Direction) -> TransactionType {
    match direction {
        Direction::Received => TransactionType::Income,
        Direction::Sent => TransactionType::Expense,
    }
}

/// Result built purely from chain data and the program-id table
pub fn fallback_result(
    tx: &RawChainTransaction,
    amount: f64,
    opts: &AssemblyOptions,
) -> ParseResult {
    let category = program_category(tx);
    let direction = tx.direction();
    ParseResult {
        transaction_type: transaction_type(direction),
        amount,
        category: Category::OnChain(category),
        description: format!("{} - {}", direction.label(), category.action_label()),
        date: tx.block_time.and_then(date_from_unix).unwrap_or(opts.today),
        confidence: FALLBACK_CONFIDENCE,
    }
}

/// Map a chain transaction to a parse result.
///
/// `authoritative_amount`, when present and positive, replaces the balance
/// delta as the transaction amount.
pub fn map_transaction(
    tx: &RawChainTransaction,
    authoritative_amount: Option<f64>,
    backend: Option<&dyn ParseBackend>,
    opts: &AssemblyOptions,
) -> ParseResult {
    let amount = authoritative_amount
        .filter(|a| *a > 0.0)
        .unwrap_or_else(|| tx.amount_sol());

    let Some(backend) = backend else {
        debug!(signature = %tx.signature, "no parse backend configured, using program table");
        return fallback_result(tx, amount, opts);
    };

    let text = describe_transaction(tx, amount);
    let primary = match backend.parse(&text, ParseContext::OnChain, opts) {
        Ok(Some(r)) => r,
        Ok(None) => {
            debug!(signature = %tx.signature, backend = backend.name(), "backend returned nothing");
            return fallback_result(tx, amount, opts);
        }
        Err(e) => {
            warn!(
                signature = %tx.signature,
                backend = backend.name(),
                error = %e,
                "backend failed, using program table"
            );
            return fallback_result(tx, amount, opts);
        }
    };

    reconcile(primary, tx, amount, opts)
}

/// Apply chain-authoritative fields to a backend result.
fn reconcile(
    mut result: ParseResult,
    tx: &RawChainTransaction,
    amount: f64,
    opts: &AssemblyOptions,
) -> ParseResult {
    // A backend answering in the wrong family is treated as no answer
    if result.category.context() != ParseContext::OnChain {
        warn!(
            signature = %tx.signature,
            category = %result.category,
            "backend returned an off-chain category"
        );
        return fallback_result(tx, amount, opts);
    }

    if result.category.is_other() {
        let table = program_category(tx);
        if table != OnChainCategory::Other {
            debug!(
                signature = %tx.signature,
                category = %table.code(),
                "program table refined OTHER"
            );
            result.category = Category::OnChain(table);
            result.confidence = FALLBACK_CONFIDENCE;
        }
    }

    // Zero included: a placeholder from the backend never stands in for chain data
    result.amount = amount;
    result.transaction_type = transaction_type(tx.direction());
    if let Some(date) = tx.block_time.and_then(date_from_unix) {
        result.date = date;
    }
    result
}
