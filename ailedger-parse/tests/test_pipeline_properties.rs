use std::sync::Arc;

use ailedger_core::{
    AccountMode, Category, ChainInstruction, InMemoryLedger, LedgerEntry, LedgerQuery, LedgerStore,
    OffChainCategory, OnChainCategory, ParseContext, RawChainTransaction, TransactionType,
};
use ailedger_parse::chain_mapper::JUPITER_V6_PROGRAM;
use ailedger_parse::{LedgerParser, ParserConfig, UnavailableBackend, FALLBACK_CONFIDENCE};
use chrono::NaiveDate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn parser() -> LedgerParser {
    LedgerParser::new(ParserConfig::new(today()))
}

const SAMPLES: &[&str] = &[
    "",
    " ",
    "I bought lunch for $12.50",
    "Received salary deposit of $3000",
    "uber home 18.20",
    "netflix",
    "$$$",
    "1,2,3,4",
    "03/05/2024",
    "Paid rent payment 2024-03-01 $1,400.00 for the apartment",
    "gift for the wedding 150 usd",
    "🙂 random emoji text",
    "swap 2 SOL on jupiter",
];

/// Confidence stays in [0, 1] and the description is never empty.
#[test]
fn test_results_are_always_well_formed() {
    let p = parser();
    for ctx in [ParseContext::OffChain, ParseContext::OnChain] {
        for text in SAMPLES {
            let r = p.parse_free_text(text, ctx);
            assert!((0.0..=1.0).contains(&r.confidence), "{text:?} -> {}", r.confidence);
            assert!(!r.description.is_empty(), "{text:?} produced empty description");
            assert!(r.amount >= 0.0);
            assert_eq!(r.category.context(), ctx, "{text:?} left its category family");
        }
    }
}

#[test]
fn test_income_keywords_force_income() {
    let p = parser();
    for text in [
        "salary",
        "salary spent on groceries and a restaurant dinner",
        "bonus for the hotel trip",
        "refund: movie tickets",
    ] {
        let r = p.parse_free_text(text, ParseContext::OffChain);
        assert_eq!(r.transaction_type, TransactionType::Income, "{text:?}");
    }
}

#[test]
fn test_unrecognized_text_is_other_with_fixed_confidence() {
    let p = parser();
    for text in ["", "zzz", "paid Sam back $40", "asdf qwer 12"] {
        let r = p.parse_free_text(text, ParseContext::OffChain);
        assert_eq!(r.category, Category::OffChain(OffChainCategory::Other), "{text:?}");
        assert_eq!(r.confidence, 0.3, "{text:?}");
    }
}

#[test]
fn test_parsing_is_repeatable() {
    let p = parser();
    for text in SAMPLES {
        assert_eq!(
            p.parse_free_text(text, ParseContext::OffChain),
            p.parse_free_text(text, ParseContext::OffChain)
        );
    }
}

#[test]
fn test_lunch_scenario_end_to_end() {
    let r = parser().parse_free_text("I bought lunch for $12.50", ParseContext::OffChain);
    assert_eq!(r.transaction_type, TransactionType::Expense);
    assert_eq!(r.category, Category::OffChain(OffChainCategory::FoodDining));
    assert_eq!(r.amount, 12.50);
    assert_eq!(r.description, "I bought lunch for");
    assert_eq!(r.date, today());
    assert_eq!(r.confidence, 0.9);
}

#[test]
fn test_empty_input_scenario() {
    let r = parser().parse_free_text("", ParseContext::OffChain);
    assert_eq!(r.category, Category::OffChain(OffChainCategory::Other));
    assert_eq!(r.confidence, 0.3);
    assert!(!r.description.is_empty());
}

fn jupiter_swap() -> RawChainTransaction {
    RawChainTransaction {
        signature: "3xJupiterSig".to_string(),
        slot: 281_000_000,
        block_time: Some(1_710_000_000),
        wallet_address: "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU".to_string(),
        counterparty: None,
        pre_balance: 5_000_000_000,
        post_balance: 3_000_000_000,
        fee: 5000,
        instructions: vec![ChainInstruction {
            program_id: JUPITER_V6_PROGRAM.to_string(),
            kind: None,
        }],
        memo: None,
    }
}

#[test]
fn test_jupiter_swap_without_backend() {
    let r = parser().parse_on_chain_transaction(&jupiter_swap(), Some(2.0));
    assert_eq!(r.category, Category::OnChain(OnChainCategory::DefiSwap));
    assert_eq!(r.amount, 2.0);
    assert_eq!(r.confidence, FALLBACK_CONFIDENCE);
}

#[test]
fn test_jupiter_swap_with_unavailable_model() {
    let p = LedgerParser::new(
        ParserConfig::new(today()).with_backend(Arc::new(UnavailableBackend {
            reason: "weights not downloaded".to_string(),
        })),
    );
    let r = p.parse_on_chain_transaction(&jupiter_swap(), None);
    assert_eq!(r.category, Category::OnChain(OnChainCategory::DefiSwap));
    assert_eq!(r.amount, 2.0);
    assert_eq!(r.confidence, 0.7);
    assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
}

/// Parse -> ledger entry -> store -> query
#[test]
fn test_parse_into_ledger() {
    let p = parser();
    let mut ledger = InMemoryLedger::new();

    for text in [
        "lunch $12.50 on 2026-10-01",
        "groceries $64.10 on 2026-10-03",
        "salary deposit $3000 on 2026-10-05",
    ] {
        let r = p.parse_free_text(text, ParseContext::OffChain);
        let entry = LedgerEntry::from_parse(r, AccountMode::OffChain).unwrap();
        ledger.insert(entry).unwrap();
    }

    let swap = p.parse_on_chain_transaction(&jupiter_swap(), None);
    let swap_entry = LedgerEntry::from_parse(swap, AccountMode::OnChain)
        .unwrap()
        .with_chain_link("3xJupiterSig", 281_000_000, jupiter_swap().wallet_address);
    let swap_id = ledger.insert(swap_entry).unwrap();
    assert_eq!(ledger.get(&swap_id).unwrap().confidence, FALLBACK_CONFIDENCE);

    let food = LedgerQuery::new().with_category(Category::OffChain(OffChainCategory::FoodDining));
    assert_eq!(ledger.query(&food).len(), 2);

    let october = LedgerQuery::new()
        .between(
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
        )
        .with_mode(AccountMode::OffChain);
    let total = ledger.net_total(&october);
    assert!((total - (3000.0 - 12.5 - 64.1)).abs() < 1e-9);

    // an on-chain result cannot be filed under an off-chain account
    let r = p.parse_on_chain_transaction(&jupiter_swap(), None);
    assert!(LedgerEntry::from_parse(r, AccountMode::OffChain).is_err());
}
