//! Batch parsing: one input line per transaction, results as CSV.

use ailedger_core::{ParseContext, ParseResult};
use ailedger_parse::LedgerParser;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    input: &'a str,
    #[serde(rename = "type")]
    transaction_type: &'a str,
    amount: f64,
    category: &'a str,
    description: &'a str,
    date: String,
    confidence: f64,
}

/// Parse every non-blank line on the blocking pool. Output order matches
/// input order.
pub async fn parse_lines(
    parser: Arc<LedgerParser>,
    lines: Vec<String>,
    context: ParseContext,
) -> Result<Vec<(String, ParseResult)>> {
    let handles: Vec<_> = lines
        .into_iter()
        .filter(|l| !l.trim().is_empty())
        .map(|line| {
            let parser = Arc::clone(&parser);
            tokio::task::spawn_blocking(move || {
                let result = parser.parse_free_text(&line, context);
                (line, result)
            })
        })
        .collect();

    let mut out = Vec::with_capacity(handles.len());
    for h in handles {
        out.push(h.await.context("parse worker panicked")?);
    }
    Ok(out)
}

pub fn write_csv<W: Write>(w: W, rows: &[(String, ParseResult)]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    for (input, r) in rows {
        wtr.serialize(BatchRow {
            input,
            transaction_type: r.transaction_type.as_str(),
            amount: r.amount,
            category: r.category.code(),
            description: &r.description,
            date: r.date.format("%Y-%m-%d").to_string(),
            confidence: r.confidence,
        })?;
    }
    wtr.flush()?;
    Ok(())
}
