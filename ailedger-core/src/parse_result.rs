//! Structured output of a single parse call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::{Category, TransactionType};

/// A parsed ledger candidate. Created per call, folded into a
/// [`crate::LedgerEntry`] by the caller and then discarded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseResult {
    pub transaction_type: TransactionType,
    /// Non-negative; 0.0 means nothing was extracted and no placeholder applied
    pub amount: f64,
    pub category: Category,
    /// Never empty
    pub description: String,
    /// Serialized as YYYY-MM-DD
    pub date: NaiveDate,
    /// Extraction-completeness score in [0, 1], not a probability
    pub confidence: f64,
}

impl ParseResult {
    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Amount with sign: income positive, expense negative
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::OffChainCategory;

    #[test]
    fn test_date_serializes_as_iso() {
        let r = ParseResult {
            transaction_type: TransactionType::Expense,
            amount: 12.5,
            category: Category::OffChain(OffChainCategory::FoodDining),
            description: "lunch".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            confidence: 0.9,
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["date"], "2024-03-05");
        assert_eq!(v["transaction_type"], "EXPENSE");
        assert_eq!(r.signed_amount(), -12.5);
    }
}
