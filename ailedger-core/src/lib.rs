//! ailedger-core: data model shared by the parser, the ingest adapters and the CLI

pub mod category;
pub mod chain;
pub mod error;
pub mod ledger;
pub mod parse_result;
pub mod store;
pub mod time;

pub use category::{
    Category, LabelMatch, OffChainCategory, OnChainCategory, ParseContext, TransactionType,
};
pub use chain::{ChainInstruction, Direction, RawChainTransaction, LAMPORTS_PER_SOL};
pub use error::LedgerError;
pub use ledger::{AccountMode, ChainLink, LedgerEntry};
pub use parse_result::ParseResult;
pub use store::{InMemoryLedger, LedgerQuery, LedgerStore};
