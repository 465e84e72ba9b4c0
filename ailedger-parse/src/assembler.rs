//! Parse-result assembly: classifier output + extracted fields + default
//! policies -> one [`ParseResult`].
//!
//! Amount priority: caller-supplied > extracted > category placeholder > 0.0.
//! Date: extracted, else the configured "today".
//! Description: extracted, else the category's display name.
//!
//! Confidence here is NOT the classifier's keyword ratio. It scores how much
//! of the record was actually recovered from the input.

use ailedger_core::{Category, ParseResult};
use chrono::NaiveDate;
use tracing::debug;

use crate::classifier::{Classification, UNMATCHED_CONFIDENCE};
use crate::extract::{extract_amount, extract_date, extract_description};

/// Inputs to the default-value policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    pub today: NaiveDate,
    /// Use the category placeholder amount when nothing else supplied one
    pub placeholder_amounts: bool,
}

impl AssemblyOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            placeholder_amounts: true,
        }
    }
}

/// Where the final amount came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    Caller,
    Extracted,
    Placeholder,
    Missing,
}

impl AmountSource {
    /// True when the amount is real data rather than a default
    pub fn is_recovered(&self) -> bool {
        matches!(self, AmountSource::Caller | AmountSource::Extracted)
    }
}

pub fn resolve_amount(
    caller_amount: Option<f64>,
    extracted: Option<f64>,
    category: Category,
    opts: &AssemblyOptions,
) -> (f64, AmountSource) {
    if let Some(a) = caller_amount.filter(|a| *a > 0.0) {
        return (a, AmountSource::Caller);
    }
    if let Some(a) = extracted.filter(|a| *a > 0.0) {
        return (a, AmountSource::Extracted);
    }
    if opts.placeholder_amounts {
        let p = category.placeholder_amount();
        if p > 0.0 {
            return (p, AmountSource::Placeholder);
        }
    }
    (0.0, AmountSource::Missing)
}

/// Completeness score.
///
/// OTHER always scores 0.3. Otherwise each recovered signal (known category,
/// real amount, extracted description) adds 0.3.
pub fn completeness_confidence(
    category: Category,
    amount_found: bool,
    description_found: bool,
) -> f64 {
    if category.is_other() {
        return UNMATCHED_CONFIDENCE;
    }
    let signals = 1 + usize::from(amount_found) + usize::from(description_found);
    match signals {
        1 => 0.3,
        2 => 0.6,
        _ => 0.9,
    }
}

/// Build a result from a classification and the raw text it came from.
pub fn assemble(
    text: &str,
    classification: &Classification,
    caller_amount: Option<f64>,
    opts: &AssemblyOptions,
) -> ParseResult {
    let category = classification.category;

    let (amount, source) = resolve_amount(caller_amount, extract_amount(text), category, opts);

    let extracted_description = extract_description(text);
    let description_found = extracted_description.is_some();
    let description =
        extracted_description.unwrap_or_else(|| category.display_name().to_string());

    let date = extract_date(text).unwrap_or(opts.today);

    let confidence = completeness_confidence(category, source.is_recovered(), description_found);

    debug!(
        category = %category,
        amount,
        amount_source = ?source,
        description_found,
        confidence,
        "assembled parse result"
    );

    ParseResult {
        transaction_type: classification.transaction_type,
        amount,
        category,
        description,
        date,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use ailedger_core::{OffChainCategory, OnChainCategory, ParseContext, TransactionType};

    fn opts() -> AssemblyOptions {
        AssemblyOptions::new(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap())
    }

    fn run(text: &str, ctx: ParseContext) -> ParseResult {
        assemble(text, &classify(text, ctx), None, &opts())
    }

    #[test]
    fn test_lunch_scenario() {
        let r = run("I bought lunch for $12.50", ParseContext::OffChain);
        assert_eq!(r.transaction_type, TransactionType::Expense);
        assert_eq!(r.category, Category::OffChain(OffChainCategory::FoodDining));
        assert_eq!(r.amount, 12.5);
        assert_eq!(r.description, "I bought lunch for");
        assert_eq!(r.date, opts().today);
        assert_eq!(r.confidence, 0.9);
    }

    #[test]
    fn test_placeholder_amount_is_not_recovered() {
        let r = run("coffee with Sam", ParseContext::OffChain);
        assert_eq!(r.amount, OffChainCategory::FoodDining.placeholder_amount());
        // category + description, no real amount
        assert_eq!(r.confidence, 0.6);
    }

    #[test]
    fn test_placeholders_disabled() {
        let o = AssemblyOptions {
            placeholder_amounts: false,
            ..opts()
        };
        let text = "coffee with Sam";
        let r = assemble(text, &classify(text, ParseContext::OffChain), None, &o);
        assert_eq!(r.amount, 0.0);
    }

    #[test]
    fn test_caller_amount_wins() {
        let text = "swap 3 SOL";
        let c = classify(text, ParseContext::OnChain);
        let r = assemble(text, &c, Some(2.75), &opts());
        assert_eq!(r.amount, 2.75);
        assert_eq!(r.category, Category::OnChain(OnChainCategory::DefiSwap));

        // non-positive caller amounts are ignored
        let r = assemble(text, &c, Some(0.0), &opts());
        assert_eq!(r.amount, 3.0);
    }

    #[test]
    fn test_short_description_defaults_to_category_phrase() {
        let r = run("etf $500", ParseContext::OffChain);
        assert_eq!(r.category, Category::OffChain(OffChainCategory::Investment));
        assert_eq!(r.description, "Investment");
        // category + amount
        assert_eq!(r.confidence, 0.6);
    }

    #[test]
    fn test_other_is_fixed_confidence() {
        let r = run("paid Sam back $40 for the thing", ParseContext::OffChain);
        assert_eq!(r.category, Category::OffChain(OffChainCategory::Other));
        assert_eq!(r.amount, 40.0);
        assert_eq!(r.confidence, 0.3);
    }

    #[test]
    fn test_empty_input() {
        let r = run("", ParseContext::OffChain);
        assert_eq!(r.category, Category::OffChain(OffChainCategory::Other));
        assert_eq!(r.confidence, 0.3);
        assert_eq!(r.amount, 0.0);
        assert_eq!(r.description, OffChainCategory::Other.display_name());
        assert!(!r.description.is_empty());
    }

    #[test]
    fn test_extracted_date_used() {
        let r = run("dinner 03/05/2024 $40", ParseContext::OffChain);
        assert_eq!(r.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(r.amount, 40.0);
    }
}
