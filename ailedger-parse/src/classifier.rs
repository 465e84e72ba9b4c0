//! Keyword classifier: free text -> (transaction type, category).
//!
//! Total over all input strings. Income signals are checked before any
//! expense category, then categories are walked in their declared order and
//! the first one with at least one hit is returned, even if a later category
//! would match more keywords.

use ailedger_core::{Category, ParseContext, TransactionType};
use tracing::debug;

use crate::taxonomy::{
    any_match, count_matches, KeywordTable, OFFCHAIN_EXPENSE, OFFCHAIN_INCOME, ONCHAIN,
    ONCHAIN_INCOME_SIGNALS,
};

/// Keyword-ratio ceiling
pub const MAX_KEYWORD_CONFIDENCE: f64 = 0.9;

/// Fixed score when no category matched
pub const UNMATCHED_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub transaction_type: TransactionType,
    pub category: Category,
    /// matched / total keywords of the winning category, capped at 0.9.
    /// Only used to pick a category; the parse result scores completeness instead.
    pub keyword_confidence: f64,
}

impl Classification {
    fn unmatched(context: ParseContext, transaction_type: TransactionType) -> Self {
        Self {
            transaction_type,
            category: context.other(),
            keyword_confidence: UNMATCHED_CONFIDENCE,
        }
    }
}

fn keyword_ratio(matches: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (matches as f64 / total as f64).min(MAX_KEYWORD_CONFIDENCE)
}

/// First category in `table` with a hit, and its keyword ratio
fn first_match<C: Copy>(text: &str, table: KeywordTable<C>) -> Option<(C, f64)> {
    table.iter().find_map(|(category, keywords)| {
        let hits = count_matches(text, keywords);
        (hits > 0).then(|| (*category, keyword_ratio(hits, keywords.len())))
    })
}

pub fn classify(text: &str, context: ParseContext) -> Classification {
    let normalized = text.trim().to_lowercase();
    let out = match context {
        ParseContext::OffChain => classify_offchain(&normalized),
        ParseContext::OnChain => classify_onchain(&normalized),
    };
    debug!(
        context = %context,
        category = %out.category,
        transaction_type = %out.transaction_type,
        keyword_confidence = out.keyword_confidence,
        "classified text"
    );
    out
}

fn classify_offchain(text: &str) -> Classification {
    if let Some((category, ratio)) = first_match(text, OFFCHAIN_INCOME) {
        return Classification {
            transaction_type: TransactionType::Income,
            category: Category::OffChain(category),
            keyword_confidence: ratio,
        };
    }

    match first_match(text, OFFCHAIN_EXPENSE) {
        Some((category, ratio)) => Classification {
            transaction_type: TransactionType::Expense,
            category: Category::OffChain(category),
            keyword_confidence: ratio,
        },
        None => Classification::unmatched(ParseContext::OffChain, TransactionType::Expense),
    }
}

fn classify_onchain(text: &str) -> Classification {
    let transaction_type = if any_match(text, ONCHAIN_INCOME_SIGNALS) {
        TransactionType::Income
    } else {
        TransactionType::Expense
    };

    match first_match(text, ONCHAIN) {
        Some((category, ratio)) => Classification {
            transaction_type,
            category: Category::OnChain(category),
            keyword_confidence: ratio,
        },
        None => Classification::unmatched(ParseContext::OnChain, transaction_type),
    }
}
