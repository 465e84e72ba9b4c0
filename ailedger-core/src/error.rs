//! Precondition errors surfaced to callers.

use thiserror::Error;

use crate::category::ParseContext;
use crate::ledger::AccountMode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("unknown parse context: {0:?} (expected \"offchain\" or \"onchain\")")]
    UnknownContext(String),

    #[error("unknown account mode: {0:?} (expected \"offchain\" or \"onchain\")")]
    UnknownAccountMode(String),

    #[error("unknown transaction type: {0:?} (expected \"income\" or \"expense\")")]
    UnknownTransactionType(String),

    #[error("account mode {mode} cannot hold a {context} category")]
    ModeMismatch {
        mode: AccountMode,
        context: ParseContext,
    },

    #[error("ledger entry not found: {0}")]
    EntryNotFound(String),

    #[error("ledger entry already exists: {0}")]
    DuplicateEntry(String),
}
