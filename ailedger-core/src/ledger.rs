//! Ledger entry types: what a caller persists after a parse.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::category::{Category, ParseContext, TransactionType};
use crate::error::LedgerError;
use crate::parse_result::ParseResult;

/// Whether an entry tracks on-chain wallet activity or manual/local spending
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AccountMode {
    #[serde(rename = "offchain")]
    OffChain,
    #[serde(rename = "onchain")]
    OnChain,
}

impl AccountMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountMode::OffChain => "offchain",
            AccountMode::OnChain => "onchain",
        }
    }

    /// Category family an entry of this mode may carry
    pub fn context(&self) -> ParseContext {
        match self {
            AccountMode::OffChain => ParseContext::OffChain,
            AccountMode::OnChain => ParseContext::OnChain,
        }
    }
}

impl fmt::Display for AccountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountMode {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "offchain" => Ok(AccountMode::OffChain),
            "onchain" => Ok(AccountMode::OnChain),
            _ => Err(LedgerError::UnknownAccountMode(s.to_string())),
        }
    }
}

/// Blockchain linkage of an on-chain entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainLink {
    pub signature: String,
    pub slot: u64,
    pub wallet_address: String,
}

/// A recorded income/expense
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerEntry {
    /// Assigned by the store on insert; empty until then
    #[serde(default)]
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    /// Always non-negative; direction lives in `transaction_type`
    pub amount: f64,
    pub category: Category,
    pub transaction_type: TransactionType,
    pub account_mode: AccountMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain: Option<ChainLink>,
    pub is_auto_detected: bool,
    /// Carried through unchanged from the parse result
    pub confidence: f64,
}

impl LedgerEntry {
    /// Fold a parse result into an auto-detected entry.
    ///
    /// The account mode must agree with the result's category family.
    pub fn from_parse(result: ParseResult, mode: AccountMode) -> Result<Self, LedgerError> {
        let context = result.category.context();
        if context != mode.context() {
            return Err(LedgerError::ModeMismatch { mode, context });
        }
        Ok(Self {
            id: String::new(),
            date: result.date,
            description: result.description,
            amount: result.amount,
            category: result.category,
            transaction_type: result.transaction_type,
            account_mode: mode,
            chain: None,
            is_auto_detected: true,
            confidence: result.confidence,
        })
    }

    pub fn with_chain_link(
        mut self,
        signature: impl Into<String>,
        slot: u64,
        wallet_address: impl Into<String>,
    ) -> Self {
        self.chain = Some(ChainLink {
            signature: signature.into(),
            slot,
            wallet_address: wallet_address.into(),
        });
        self
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }

    /// Income positive, expense negative
    pub fn signed_amount(&self) -> f64 {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}
