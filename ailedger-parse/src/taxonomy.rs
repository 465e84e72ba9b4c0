//! Keyword taxonomy: category -> lowercase trigger substrings.
//!
//! Matching is plain substring containment on lowercased text, so
//! "restaurant" also fires inside "newrestaurants". Tables are checked in the
//! order they are declared here and the first category with any hit wins.

use ailedger_core::{OffChainCategory, OnChainCategory};

pub type KeywordTable<C> = &'static [(C, &'static [&'static str])];

/// Income signals, checked before any expense category.
/// Freelance and business are more specific than the salary bucket.
pub const OFFCHAIN_INCOME: KeywordTable<OffChainCategory> = &[
    (
        OffChainCategory::Freelance,
        &[
            "freelance",
            "invoice",
            "client payment",
            "commission",
            "contract work",
            "gig work",
            "gig payment",
            "consulting fee",
        ],
    ),
    (
        OffChainCategory::Business,
        &[
            "business income",
            "revenue",
            "sales income",
            "customer payment",
            "profit from",
            "shop sales",
        ],
    ),
    (
        OffChainCategory::Salary,
        &[
            "salary",
            "payroll",
            "paycheck",
            "payday",
            "deposit",
            "bonus",
            "refund",
            "wage",
            "income",
            "stipend",
            "reimbursement",
        ],
    ),
];

/// Expense categories in fixed check order.
pub const OFFCHAIN_EXPENSE: KeywordTable<OffChainCategory> = &[
    (
        OffChainCategory::FoodDining,
        &[
            "food",
            "lunch",
            "dinner",
            "breakfast",
            "brunch",
            "restaurant",
            "cafe",
            "coffee",
            "starbucks",
            "mcdonald",
            "pizza",
            "burger",
            "sushi",
            "grocery",
            "groceries",
            "snack",
            "meal",
            "takeout",
            "bakery",
            "doordash",
            "uber eats",
            "grubhub",
            "dining",
        ],
    ),
    (
        OffChainCategory::Transportation,
        &[
            "uber",
            "lyft",
            "taxi",
            "bus fare",
            "bus ticket",
            "metro",
            "subway",
            "train ticket",
            "train fare",
            "gas station",
            "gasoline",
            "fuel",
            "parking",
            "toll",
            "transit",
            "car wash",
            "commute",
        ],
    ),
    (
        OffChainCategory::Shopping,
        &[
            "shopping",
            "shop",
            "amazon",
            "walmart",
            "target",
            "mall",
            "clothes",
            "clothing",
            "shoes",
            "electronics",
            "store",
            "ebay",
            "furniture",
        ],
    ),
    (
        OffChainCategory::Entertainment,
        &[
            "movie",
            "cinema",
            "netflix",
            "spotify",
            "hulu",
            "concert",
            "game",
            "theater",
            "theatre",
            "music",
            "streaming",
            "karaoke",
            "tickets",
        ],
    ),
    (
        OffChainCategory::Utilities,
        &[
            "electric",
            "water bill",
            "utility",
            "utilities",
            "internet",
            "wifi",
            "phone bill",
            "gas bill",
            "monthly rent",
            "rent payment",
            "paid rent",
            "cable",
            "mobile plan",
        ],
    ),
    (
        OffChainCategory::Healthcare,
        &[
            "doctor",
            "hospital",
            "pharmacy",
            "medicine",
            "medical",
            "dentist",
            "clinic",
            "health",
            "prescription",
            "insurance",
            "therapy",
            "vitamins",
        ],
    ),
    (
        OffChainCategory::Education,
        &[
            "tuition",
            "school",
            "course",
            "textbook",
            "books",
            "class",
            "university",
            "college",
            "udemy",
            "coursera",
            "education",
            "seminar",
        ],
    ),
    (
        OffChainCategory::Travel,
        &[
            "flight",
            "airline",
            "hotel",
            "airbnb",
            "booking",
            "vacation",
            "trip",
            "travel",
            "luggage",
            "passport",
            "resort",
            "hostel",
        ],
    ),
    (
        OffChainCategory::Investment,
        &[
            "invest",
            "stock",
            "shares",
            "crypto",
            "bitcoin",
            "etf",
            "mutual fund",
            "brokerage",
            "401k",
        ],
    ),
    (
        OffChainCategory::Gifts,
        &[
            "gift",
            "donation",
            "donate",
            "charity",
            "birthday",
            "wedding",
        ],
    ),
];

/// Words that mark an on-chain movement as incoming. They decide the
/// transaction type only; the category still comes from `ONCHAIN`.
pub const ONCHAIN_INCOME_SIGNALS: &[&str] = &[
    "received",
    "receive",
    "incoming",
    "airdrop",
    "reward",
    "sold",
    "claim",
    "unstake",
    "income",
];

/// On-chain categories in fixed check order.
pub const ONCHAIN: KeywordTable<OnChainCategory> = &[
    (
        OnChainCategory::DefiSwap,
        &["swap", "jupiter", "raydium", "orca", "dex", "exchange"],
    ),
    (
        OnChainCategory::DefiLending,
        &[
            "lend",
            "borrow",
            "loan",
            "repay",
            "collateral",
            "solend",
            "marginfi",
            "kamino",
        ],
    ),
    (
        OnChainCategory::DefiStaking,
        &[
            "stake",
            "staking",
            "validator",
            "delegat",
            "marinade",
            "jito",
            "msol",
        ],
    ),
    (
        OnChainCategory::NftPurchase,
        &["nft purchase", "bought nft", "buy nft", "purchased nft"],
    ),
    (
        OnChainCategory::NftSale,
        &["nft sale", "sold nft", "sell nft", "listing sold"],
    ),
    (
        OnChainCategory::TokenTransfer,
        &[
            "transfer",
            "send sol",
            "sent sol",
            "payment to",
            "wallet to wallet",
        ],
    ),
    (
        OnChainCategory::Bridge,
        &["bridge", "wormhole", "cross-chain", "allbridge", "debridge"],
    ),
    (
        OnChainCategory::Gaming,
        &["game", "gaming", "play-to-earn", "p2e", "star atlas", "aurory", "genopets"],
    ),
    (
        OnChainCategory::Minting,
        &["mint", "candy machine", "metaplex"],
    ),
    (
        OnChainCategory::Trading,
        &["trade", "trading", "perp", "futures", "limit order", "drift", "openbook"],
    ),
    (
        OnChainCategory::Investment,
        &["invest", "dca", "hodl", "portfolio", "accumulate"],
    ),
];

/// Number of keywords in `keywords` contained in `text` (already lowercased)
pub fn count_matches(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(**kw)).count()
}

pub fn any_match(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(*kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_keywords<C>(table: KeywordTable<C>) -> impl Iterator<Item = &'static str> {
        table.iter().flat_map(|(_, kws)| kws.iter().copied())
    }

    #[test]
    fn test_keywords_are_lowercase_and_non_empty() {
        let kws = all_keywords(OFFCHAIN_INCOME)
            .chain(all_keywords(OFFCHAIN_EXPENSE))
            .chain(all_keywords(ONCHAIN))
            .chain(ONCHAIN_INCOME_SIGNALS.iter().copied());
        for kw in kws {
            assert!(!kw.is_empty());
            assert_eq!(kw, kw.to_lowercase(), "keyword {kw:?} must be lowercase");
        }
    }

    #[test]
    fn test_tables_exclude_other() {
        assert!(OFFCHAIN_EXPENSE.iter().all(|(c, _)| *c != OffChainCategory::Other));
        assert!(ONCHAIN.iter().all(|(c, _)| *c != OnChainCategory::Other));
    }

    #[test]
    fn test_substring_containment_is_not_tokenized() {
        assert_eq!(count_matches("newrestaurants downtown", &["restaurant"]), 1);
        assert!(any_match("bought a gift", &["gift", "wedding"]));
        assert!(!any_match("", &["gift"]));
    }
}
