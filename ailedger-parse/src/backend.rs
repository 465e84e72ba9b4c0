//! Parse backends for the on-chain primary path.
//!
//! A backend turns synthesized transaction text into a result, or reports
//! that it cannot. Errors and `None` both send the mapper to its
//! deterministic program-id table.

use ailedger_core::{
    Category, OffChainCategory, OnChainCategory, ParseContext, ParseResult, TransactionType,
};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::assembler::{assemble, completeness_confidence, resolve_amount, AssemblyOptions};
use crate::classifier::{classify, Classification};
use crate::extract::{extract_amount, extract_date, extract_description, MIN_DESCRIPTION_CHARS};

pub trait ParseBackend: Send + Sync {
    fn name(&self) -> &str;

    fn parse(
        &self,
        text: &str,
        context: ParseContext,
        opts: &AssemblyOptions,
    ) -> Result<Option<ParseResult>>;
}

/// The on-device keyword heuristic
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordBackend;

impl ParseBackend for KeywordBackend {
    fn name(&self) -> &str {
        "keyword"
    }

    fn parse(
        &self,
        text: &str,
        context: ParseContext,
        opts: &AssemblyOptions,
    ) -> Result<Option<ParseResult>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(assemble(text, &classify(text, context), None, opts)))
    }
}

/// Stands in for a local model whose weights are not present
#[derive(Debug, Clone, Default)]
pub struct UnavailableBackend {
    pub reason: String,
}

impl ParseBackend for UnavailableBackend {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn parse(&self, _: &str, _: ParseContext, _: &AssemblyOptions) -> Result<Option<ParseResult>> {
        if self.reason.is_empty() {
            bail!("local model not loaded");
        }
        bail!("local model not loaded: {}", self.reason);
    }
}

/// JSON shape a local model is prompted to answer with
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelReply {
    #[serde(rename = "type", default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Wraps a text-generation function (prompt in, completion out).
pub struct LocalModelBackend<F> {
    name: String,
    generate: F,
}

impl<F> LocalModelBackend<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, generate: F) -> Self {
        Self {
            name: name.into(),
            generate,
        }
    }
}

impl<F> ParseBackend for LocalModelBackend<F>
where
    F: Fn(&str) -> Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(
        &self,
        text: &str,
        context: ParseContext,
        opts: &AssemblyOptions,
    ) -> Result<Option<ParseResult>> {
        let prompt = build_prompt(text, context);
        let completion = (self.generate)(&prompt)
            .with_context(|| format!("{} generation failed", self.name))?;
        if completion.trim().is_empty() {
            return Ok(None);
        }
        reply_to_result(&completion, text, context, opts).map(Some)
    }
}

pub fn build_prompt(text: &str, context: ParseContext) -> String {
    let codes: Vec<&str> = match context {
        ParseContext::OffChain => OffChainCategory::ALL.iter().map(|c| c.code()).collect(),
        ParseContext::OnChain => OnChainCategory::ALL.iter().map(|c| c.code()).collect(),
    };
    format!(
        "Extract a ledger entry from the transaction text below.\n\
         Answer with one JSON object: {{\"type\": \"INCOME\"|\"EXPENSE\", \"category\": one of [{}], \
         \"amount\": number, \"description\": string, \"date\": \"YYYY-MM-DD\"}}.\n\n\
         Text: {}",
        codes.join(", "),
        text.trim()
    )
}

/// Slice out the outermost `{ ... }` of a completion that may carry prose
fn json_object(completion: &str) -> Option<&str> {
    let start = completion.find('{')?;
    let end = completion.rfind('}')?;
    (end > start).then(|| &completion[start..=end])
}

/// Convert a model completion into a result.
///
/// Labels go through the total category mapping, so an unknown category
/// becomes OTHER. Missing fields fall back to what the heuristic extractors
/// find in `source_text`.
pub fn reply_to_result(
    completion: &str,
    source_text: &str,
    context: ParseContext,
    opts: &AssemblyOptions,
) -> Result<ParseResult> {
    let raw = json_object(completion).context("model reply has no JSON object")?;
    let reply: ModelReply = serde_json::from_str(raw).context("parse model reply")?;

    let heuristic: Classification = classify(source_text, context);

    let category = match reply.category.as_deref() {
        Some(label) => Category::from_label(label, context),
        None => heuristic.category,
    };

    let transaction_type = match reply.transaction_type.as_deref() {
        Some(t) => t
            .parse::<TransactionType>()
            .with_context(|| format!("model reply type {t:?}"))?,
        None => heuristic.transaction_type,
    };

    let (amount, source) = resolve_amount(
        reply.amount,
        extract_amount(source_text),
        category,
        opts,
    );

    let model_description = reply
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| d.chars().count() > MIN_DESCRIPTION_CHARS);
    let description = model_description.or_else(|| extract_description(source_text));
    let description_found = description.is_some();
    let description = description.unwrap_or_else(|| category.display_name().to_string());

    let date = reply
        .date
        .as_deref()
        .and_then(extract_date)
        .or_else(|| extract_date(source_text))
        .unwrap_or(opts.today);

    Ok(ParseResult {
        transaction_type,
        amount,
        category,
        description,
        date,
        confidence: completeness_confidence(category, source.is_recovered(), description_found),
    })
}
