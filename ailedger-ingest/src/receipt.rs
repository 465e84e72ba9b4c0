//! OCR receipt condensation
//!
//! OCR output is many short lines: store header, address, item rows,
//! subtotal/tax/total, card slip. The parser wants one line, so this keeps
//! the merchant, the labelled total and the purchase date:
//!
//!   BLUE BOTTLE COFFEE            ->
//!   123 Main St                     "BLUE BOTTLE COFFEE $12.50 03/05/2024"
//!   03/05/2024 10:31
//!   Latte           5.50
//!   Subtotal       11.50
//!   Tax             1.00
//!   TOTAL         $12.50

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Total labels, most specific first. `\b` keeps "subtotal" out.
const TOTAL_LABELS: &[&str] = &[
    "grand total",
    "total due",
    "amount due",
    "balance due",
    "amount paid",
    "total",
];

static TOTAL_LINE: Lazy<Regex> = Lazy::new(|| {
    let labels = TOTAL_LABELS.join("|");
    Regex::new(&format!(
        r"(?i)\b(?P<label>{labels})\b[^\d$€£¥]*(?P<amount>[$€£¥]?\s*\d[\d,]*(?:\.\d{{1,2}})?)"
    ))
    .expect("valid total line regex")
});

static RECEIPT_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4}|\d{1,2}-\d{1,2}-\d{4})\b")
        .expect("valid receipt date regex")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub merchant: Option<String>,
    /// Amount token as printed, currency symbol kept ("$12.50")
    pub total: Option<String>,
    pub date: Option<String>,
}

fn is_merchant_candidate(line: &str) -> bool {
    let letters = line.chars().filter(|c| c.is_alphabetic()).count();
    let digits = line.chars().filter(|c| c.is_ascii_digit()).count();
    letters >= 3 && letters > digits && !TOTAL_LINE.is_match(line)
}

pub fn summarize_receipt(ocr_text: &str) -> ReceiptSummary {
    let lines: Vec<&str> = ocr_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let merchant = lines
        .iter()
        .find(|l| is_merchant_candidate(l))
        .map(|l| WHITESPACE.replace_all(l, " ").into_owned());

    // Lowest label rank wins; among equals the last line (the slip repeats
    // the total below the item list)
    let total = lines
        .iter()
        .filter_map(|l| TOTAL_LINE.captures(l))
        .filter_map(|caps| {
            let label = caps["label"].to_lowercase();
            let rank = TOTAL_LABELS.iter().position(|t| *t == label)?;
            Some((rank, WHITESPACE.replace_all(&caps["amount"], "").into_owned()))
        })
        .fold(None::<(usize, String)>, |best, cur| match best {
            Some(b) if b.0 < cur.0 => Some(b),
            _ => Some(cur),
        })
        .map(|(_, amount)| amount);

    let date = RECEIPT_DATE.find(ocr_text).map(|m| m.as_str().to_string());

    debug!(
        merchant = merchant.as_deref().unwrap_or(""),
        total = total.as_deref().unwrap_or(""),
        date = date.as_deref().unwrap_or(""),
        "summarized receipt"
    );

    ReceiptSummary {
        merchant,
        total,
        date,
    }
}

/// One parseable line for a receipt. Falls back to the whole text on one line
/// when neither a merchant nor a total is found.
pub fn condense_receipt(ocr_text: &str) -> String {
    let summary = summarize_receipt(ocr_text);
    if summary.merchant.is_none() && summary.total.is_none() {
        return WHITESPACE.replace_all(ocr_text.trim(), " ").into_owned();
    }
    [summary.merchant, summary.total, summary.date]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}
