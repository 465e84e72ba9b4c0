//! LedgerParser: the two entry points callers use.
//!
//! All state lives in an explicit `ParserConfig`; there is no global model
//! selection. Parsing is synchronous and the parser is `Send + Sync`, so one
//! instance can be shared across worker threads.

use std::fmt;
use std::sync::Arc;

use ailedger_core::{ParseContext, ParseResult, RawChainTransaction};
use chrono::NaiveDate;

use crate::assembler::{assemble, AssemblyOptions};
use crate::backend::ParseBackend;
use crate::chain_mapper::map_transaction;
use crate::classifier::classify;

#[derive(Clone)]
pub struct ParserConfig {
    /// Date used when the text carries none
    pub today: NaiveDate,
    pub placeholder_amounts: bool,
    /// Primary path for on-chain parses; `None` always uses the program table
    pub backend: Option<Arc<dyn ParseBackend>>,
}

impl ParserConfig {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            placeholder_amounts: true,
            backend: None,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn ParseBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_placeholder_amounts(mut self, enabled: bool) -> Self {
        self.placeholder_amounts = enabled;
        self
    }

    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions {
            today: self.today,
            placeholder_amounts: self.placeholder_amounts,
        }
    }
}

impl fmt::Debug for ParserConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserConfig")
            .field("today", &self.today)
            .field("placeholder_amounts", &self.placeholder_amounts)
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LedgerParser {
    config: ParserConfig,
}

impl LedgerParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse user chat input or OCR text. Never fails.
    pub fn parse_free_text(&self, text: &str, context: ParseContext) -> ParseResult {
        parse_free_text(text, context, &self.config.assembly_options())
    }

    /// Parse a decoded chain transaction. Never fails; backend problems fall
    /// back to the program-id table.
    pub fn parse_on_chain_transaction(
        &self,
        tx: &RawChainTransaction,
        authoritative_amount: Option<f64>,
    ) -> ParseResult {
        map_transaction(
            tx,
            authoritative_amount,
            self.config.backend.as_deref(),
            &self.config.assembly_options(),
        )
    }
}

/// Free-function form of [`LedgerParser::parse_free_text`]
pub fn parse_free_text(text: &str, context: ParseContext, opts: &AssemblyOptions) -> ParseResult {
    assemble(text, &classify(text, context), None, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::KeywordBackend;
    use ailedger_core::{Category, OffChainCategory, TransactionType};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_parser_is_shareable() {
        assert_send_sync::<LedgerParser>();
    }

    #[test]
    fn test_salary_scenario() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let parser = LedgerParser::new(ParserConfig::new(today));
        let r = parser.parse_free_text("Received salary deposit of $3000", ParseContext::OffChain);
        assert_eq!(r.transaction_type, TransactionType::Income);
        assert_eq!(r.category, Category::OffChain(OffChainCategory::Salary));
        assert_eq!(r.amount, 3000.0);
        assert_eq!(r.description, "Received salary deposit of");
        assert_eq!(r.confidence, 0.9);
    }

    #[test]
    fn test_debug_names_backend() {
        let cfg = ParserConfig::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .with_backend(Arc::new(KeywordBackend));
        assert!(format!("{cfg:?}").contains("keyword"));
    }
}
