//! Category taxonomy types: the two disjoint category families, the parse
//! context that selects between them, and total label mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LedgerError;

/// Income vs expense
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    #[serde(rename = "INCOME")]
    Income,
    #[serde(rename = "EXPENSE")]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(LedgerError::UnknownTransactionType(s.to_string())),
        }
    }
}

/// Everyday finance categories (manual / local entries)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OffChainCategory {
    FoodDining,
    Transportation,
    Shopping,
    Entertainment,
    Utilities,
    Healthcare,
    Education,
    Travel,
    Investment,
    Salary,
    Freelance,
    Business,
    Gifts,
    Other,
}

impl OffChainCategory {
    pub const ALL: [OffChainCategory; 14] = [
        OffChainCategory::FoodDining,
        OffChainCategory::Transportation,
        OffChainCategory::Shopping,
        OffChainCategory::Entertainment,
        OffChainCategory::Utilities,
        OffChainCategory::Healthcare,
        OffChainCategory::Education,
        OffChainCategory::Travel,
        OffChainCategory::Investment,
        OffChainCategory::Salary,
        OffChainCategory::Freelance,
        OffChainCategory::Business,
        OffChainCategory::Gifts,
        OffChainCategory::Other,
    ];

    /// Stable identifier, e.g. `FOOD_DINING`
    pub fn code(&self) -> &'static str {
        match self {
            OffChainCategory::FoodDining => "FOOD_DINING",
            OffChainCategory::Transportation => "TRANSPORTATION",
            OffChainCategory::Shopping => "SHOPPING",
            OffChainCategory::Entertainment => "ENTERTAINMENT",
            OffChainCategory::Utilities => "UTILITIES",
            OffChainCategory::Healthcare => "HEALTHCARE",
            OffChainCategory::Education => "EDUCATION",
            OffChainCategory::Travel => "TRAVEL",
            OffChainCategory::Investment => "INVESTMENT",
            OffChainCategory::Salary => "SALARY",
            OffChainCategory::Freelance => "FREELANCE",
            OffChainCategory::Business => "BUSINESS",
            OffChainCategory::Gifts => "GIFTS",
            OffChainCategory::Other => "OTHER",
        }
    }

    /// Human-facing name; also the description used when none could be extracted
    pub fn display_name(&self) -> &'static str {
        match self {
            OffChainCategory::FoodDining => "Food & dining",
            OffChainCategory::Transportation => "Transportation",
            OffChainCategory::Shopping => "Shopping",
            OffChainCategory::Entertainment => "Entertainment",
            OffChainCategory::Utilities => "Utilities & bills",
            OffChainCategory::Healthcare => "Healthcare",
            OffChainCategory::Education => "Education",
            OffChainCategory::Travel => "Travel",
            OffChainCategory::Investment => "Investment",
            OffChainCategory::Salary => "Salary income",
            OffChainCategory::Freelance => "Freelance income",
            OffChainCategory::Business => "Business income",
            OffChainCategory::Gifts => "Gifts",
            OffChainCategory::Other => "Other transaction",
        }
    }

    /// Placeholder amount used when neither the caller nor the text supplies one
    pub fn placeholder_amount(&self) -> f64 {
        match self {
            OffChainCategory::FoodDining => 25.0,
            OffChainCategory::Transportation => 15.0,
            OffChainCategory::Shopping => 50.0,
            OffChainCategory::Entertainment => 30.0,
            OffChainCategory::Utilities => 100.0,
            OffChainCategory::Healthcare => 80.0,
            OffChainCategory::Education => 200.0,
            OffChainCategory::Travel => 300.0,
            OffChainCategory::Investment => 500.0,
            OffChainCategory::Salary => 3000.0,
            OffChainCategory::Freelance => 500.0,
            OffChainCategory::Business => 1000.0,
            OffChainCategory::Gifts => 50.0,
            OffChainCategory::Other => 0.0,
        }
    }

    pub fn is_income_class(&self) -> bool {
        matches!(
            self,
            OffChainCategory::Salary | OffChainCategory::Freelance | OffChainCategory::Business
        )
    }

    /// Total mapping from a free-form label. Never fails.
    pub fn match_label(label: &str) -> LabelMatch<Self> {
        let key = normalize_label(label);
        Self::ALL
            .iter()
            .copied()
            .find(|c| normalize_label(c.code()) == key || normalize_label(c.display_name()) == key)
            .map(LabelMatch::Known)
            .unwrap_or_else(|| LabelMatch::Unrecognized(label.to_string()))
    }
}

/// Blockchain-transaction categories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnChainCategory {
    DefiSwap,
    DefiLending,
    DefiStaking,
    NftPurchase,
    NftSale,
    TokenTransfer,
    Bridge,
    Gaming,
    Minting,
    Trading,
    Investment,
    Other,
}

impl OnChainCategory {
    pub const ALL: [OnChainCategory; 12] = [
        OnChainCategory::DefiSwap,
        OnChainCategory::DefiLending,
        OnChainCategory::DefiStaking,
        OnChainCategory::NftPurchase,
        OnChainCategory::NftSale,
        OnChainCategory::TokenTransfer,
        OnChainCategory::Bridge,
        OnChainCategory::Gaming,
        OnChainCategory::Minting,
        OnChainCategory::Trading,
        OnChainCategory::Investment,
        OnChainCategory::Other,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            OnChainCategory::DefiSwap => "DEFI_SWAP",
            OnChainCategory::DefiLending => "DEFI_LENDING",
            OnChainCategory::DefiStaking => "DEFI_STAKING",
            OnChainCategory::NftPurchase => "NFT_PURCHASE",
            OnChainCategory::NftSale => "NFT_SALE",
            OnChainCategory::TokenTransfer => "TOKEN_TRANSFER",
            OnChainCategory::Bridge => "BRIDGE",
            OnChainCategory::Gaming => "GAMING",
            OnChainCategory::Minting => "MINTING",
            OnChainCategory::Trading => "TRADING",
            OnChainCategory::Investment => "INVESTMENT",
            OnChainCategory::Other => "OTHER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OnChainCategory::DefiSwap => "DeFi swap",
            OnChainCategory::DefiLending => "DeFi lending",
            OnChainCategory::DefiStaking => "Staking",
            OnChainCategory::NftPurchase => "NFT purchase",
            OnChainCategory::NftSale => "NFT sale",
            OnChainCategory::TokenTransfer => "Token transfer",
            OnChainCategory::Bridge => "Bridge transfer",
            OnChainCategory::Gaming => "Gaming",
            OnChainCategory::Minting => "NFT minting",
            OnChainCategory::Trading => "Trading",
            OnChainCategory::Investment => "Crypto investment",
            OnChainCategory::Other => "On-chain transaction",
        }
    }

    /// Short action label used by direction-based descriptions ("Received - Transfer")
    pub fn action_label(&self) -> &'static str {
        match self {
            OnChainCategory::DefiSwap => "Swap",
            OnChainCategory::DefiLending => "Lending",
            OnChainCategory::DefiStaking => "Stake",
            OnChainCategory::NftPurchase => "NFT Purchase",
            OnChainCategory::NftSale => "NFT Sale",
            OnChainCategory::TokenTransfer => "Transfer",
            OnChainCategory::Bridge => "Bridge",
            OnChainCategory::Gaming => "Gaming",
            OnChainCategory::Minting => "Mint",
            OnChainCategory::Trading => "Trade",
            OnChainCategory::Investment => "Investment",
            OnChainCategory::Other => "Transaction",
        }
    }

    /// Placeholder amount (in SOL) used when neither the caller nor the text supplies one
    pub fn placeholder_amount(&self) -> f64 {
        match self {
            OnChainCategory::DefiSwap => 1.0,
            OnChainCategory::DefiLending => 5.0,
            OnChainCategory::DefiStaking => 10.0,
            OnChainCategory::NftPurchase => 2.0,
            OnChainCategory::NftSale => 2.0,
            OnChainCategory::TokenTransfer => 0.5,
            OnChainCategory::Bridge => 5.0,
            OnChainCategory::Gaming => 0.1,
            OnChainCategory::Minting => 0.5,
            OnChainCategory::Trading => 1.0,
            OnChainCategory::Investment => 10.0,
            OnChainCategory::Other => 0.0,
        }
    }

    pub fn match_label(label: &str) -> LabelMatch<Self> {
        let key = normalize_label(label);
        Self::ALL
            .iter()
            .copied()
            .find(|c| normalize_label(c.code()) == key || normalize_label(c.display_name()) == key)
            .map(LabelMatch::Known)
            .unwrap_or_else(|| LabelMatch::Unrecognized(label.to_string()))
    }
}

/// Result of mapping an arbitrary label onto a category family
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelMatch<C> {
    Known(C),
    Unrecognized(String),
}

impl<C: Copy> LabelMatch<C> {
    pub fn or(self, other: C) -> C {
        match self {
            LabelMatch::Known(c) => c,
            LabelMatch::Unrecognized(_) => other,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, LabelMatch::Known(_))
    }
}

/// Which category family a parse call draws from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ParseContext {
    #[serde(rename = "offchain")]
    OffChain,
    #[serde(rename = "onchain")]
    OnChain,
}

impl ParseContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseContext::OffChain => "offchain",
            ParseContext::OnChain => "onchain",
        }
    }

    /// The OTHER category of this family
    pub fn other(&self) -> Category {
        match self {
            ParseContext::OffChain => Category::OffChain(OffChainCategory::Other),
            ParseContext::OnChain => Category::OnChain(OnChainCategory::Other),
        }
    }
}

impl fmt::Display for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown names are rejected rather than defaulted.
impl FromStr for ParseContext {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "offchain" | "off_chain" => Ok(ParseContext::OffChain),
            "onchain" | "on_chain" => Ok(ParseContext::OnChain),
            _ => Err(LedgerError::UnknownContext(s.to_string())),
        }
    }
}

/// A category tagged with the family it belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    OffChain(OffChainCategory),
    OnChain(OnChainCategory),
}

impl Category {
    pub fn context(&self) -> ParseContext {
        match self {
            Category::OffChain(_) => ParseContext::OffChain,
            Category::OnChain(_) => ParseContext::OnChain,
        }
    }

    pub fn is_other(&self) -> bool {
        matches!(
            self,
            Category::OffChain(OffChainCategory::Other) | Category::OnChain(OnChainCategory::Other)
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            Category::OffChain(c) => c.code(),
            Category::OnChain(c) => c.code(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::OffChain(c) => c.display_name(),
            Category::OnChain(c) => c.display_name(),
        }
    }

    pub fn placeholder_amount(&self) -> f64 {
        match self {
            Category::OffChain(c) => c.placeholder_amount(),
            Category::OnChain(c) => c.placeholder_amount(),
        }
    }

    /// Total mapping: unrecognized labels resolve to the context's OTHER.
    pub fn from_label(label: &str, context: ParseContext) -> Category {
        match context {
            ParseContext::OffChain => {
                Category::OffChain(OffChainCategory::match_label(label).or(OffChainCategory::Other))
            }
            ParseContext::OnChain => {
                Category::OnChain(OnChainCategory::match_label(label).or(OnChainCategory::Other))
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Lowercase, with spaces/dashes folded to underscores and `&` dropped
fn normalize_label(s: &str) -> String {
    let folded: String = s
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != '&')
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect();
    folded
        .split('_')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping_accepts_common_spellings() {
        assert_eq!(
            OffChainCategory::match_label("FOOD_DINING"),
            LabelMatch::Known(OffChainCategory::FoodDining)
        );
        assert_eq!(
            OffChainCategory::match_label("food-dining"),
            LabelMatch::Known(OffChainCategory::FoodDining)
        );
        assert_eq!(
            OffChainCategory::match_label("Food & dining"),
            LabelMatch::Known(OffChainCategory::FoodDining)
        );
        assert_eq!(
            OnChainCategory::match_label("defi swap"),
            LabelMatch::Known(OnChainCategory::DefiSwap)
        );
    }

    #[test]
    fn test_unrecognized_label_maps_to_other() {
        let m = OnChainCategory::match_label("YIELD_FARMING");
        assert!(!m.is_known());
        assert_eq!(m.or(OnChainCategory::Other), OnChainCategory::Other);
        assert_eq!(
            Category::from_label("", ParseContext::OffChain),
            Category::OffChain(OffChainCategory::Other)
        );
    }

    #[test]
    fn test_label_mapping_respects_family() {
        // SALARY exists only off-chain
        assert_eq!(
            Category::from_label("SALARY", ParseContext::OnChain),
            Category::OnChain(OnChainCategory::Other)
        );
        assert_eq!(
            Category::from_label("INVESTMENT", ParseContext::OnChain),
            Category::OnChain(OnChainCategory::Investment)
        );
    }

    #[test]
    fn test_context_from_str_rejects_unknown() {
        assert_eq!("onchain".parse::<ParseContext>().unwrap(), ParseContext::OnChain);
        assert_eq!("Off-Chain".parse::<ParseContext>().unwrap(), ParseContext::OffChain);
        assert!("sidechain".parse::<ParseContext>().is_err());
    }

    #[test]
    fn test_category_serde_shape() {
        let c = Category::OnChain(OnChainCategory::DefiSwap);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"on_chain":"DEFI_SWAP"}"#);
        let back: Category = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
