//! ailedger-parse: keyword taxonomy, field extractors, classifier, result
//! assembly and the on-chain transaction mapper

pub mod assembler;
pub mod backend;
pub mod chain_mapper;
pub mod classifier;
pub mod extract;
pub mod parser;
pub mod taxonomy;

pub use assembler::{AmountSource, AssemblyOptions};
pub use backend::{KeywordBackend, LocalModelBackend, ModelReply, ParseBackend, UnavailableBackend};
pub use chain_mapper::{map_transaction, FALLBACK_CONFIDENCE};
pub use classifier::{classify, Classification};
pub use extract::{extract_amount, extract_date, extract_description, normalize_date};
pub use parser::{parse_free_text, LedgerParser, ParserConfig};
