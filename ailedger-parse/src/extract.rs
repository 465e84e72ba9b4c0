//! Field extractors: amount, date and description from unstructured text.
//!
//! Each extractor is independent and total. A miss is `None`, never an error;
//! the assembler decides what to fall back to.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

// Number with optional thousands separators and decimals
const NUM: &str = r"(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)";

static PREFIXED_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"[$€£¥]\s?{NUM}")).expect("valid prefixed amount regex"));

static SUFFIXED_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b{NUM}\s*(?:(?:usdc|usdt|usd|sol|dollars?|bucks|euros?|eur|gbp|yuan|rmb)\b|[$€£¥元])"
    ))
    .expect("valid suffixed amount regex")
});

static BARE_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b{NUM}\b")).expect("valid bare amount regex"));

static CURRENCY_SYMBOLS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[$€£¥元]").expect("valid currency symbol regex"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("valid iso date regex"));

static US_SLASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("valid slash date regex"));

static US_DASH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})-(\d{1,2})-(\d{4})\b").expect("valid dash date regex"));

/// Descriptions at or below this many characters are replaced by a default
pub const MIN_DESCRIPTION_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateOrder {
    YearMonthDay,
    MonthDayYear,
}

/// Date patterns in priority order
fn date_patterns() -> [(&'static Regex, DateOrder); 3] {
    [
        (&*ISO_DATE, DateOrder::YearMonthDay),
        (&*US_SLASH_DATE, DateOrder::MonthDayYear),
        (&*US_DASH_DATE, DateOrder::MonthDayYear),
    ]
}

/// Blank out every date-shaped substring so its digits are not read as amounts
fn without_dates(text: &str) -> String {
    let mut out = text.to_string();
    for (re, _) in date_patterns() {
        out = re.replace_all(&out, " ").into_owned();
    }
    out
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse::<f64>().ok()
}

/// Extract the first amount.
///
/// Order: currency-prefixed (`$12.50`), currency-suffixed (`12.5 SOL`),
/// then any bare number. An earlier pattern wins even if a later one occurs
/// first in the text.
pub fn extract_amount(text: &str) -> Option<f64> {
    let text = without_dates(text);
    [&*PREFIXED_AMOUNT, &*SUFFIXED_AMOUNT, &*BARE_AMOUNT]
        .into_iter()
        .find_map(|re| re.captures(&text).and_then(|caps| parse_number(&caps[1])))
}

fn normalize_caps(a: &str, b: &str, c: &str, order: DateOrder) -> Option<NaiveDate> {
    let (y, m, d) = match order {
        DateOrder::YearMonthDay => (a, b, c),
        DateOrder::MonthDayYear => (c, a, b),
    };
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

/// Extract the first valid date, trying ISO, `MM/DD/YYYY`, then `MM-DD-YYYY`.
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    for (re, order) in date_patterns() {
        for caps in re.captures_iter(text) {
            if let Some(date) = normalize_caps(&caps[1], &caps[2], &caps[3], order) {
                return Some(date);
            }
        }
    }
    None
}

/// Normalize a single date string to `YYYY-MM-DD`.
pub fn normalize_date(text: &str) -> Option<String> {
    extract_date(text).map(|d| d.format("%Y-%m-%d").to_string())
}

/// Text left after removing dates, amounts and currency symbols, with
/// whitespace collapsed. `None` when that leaves at most three characters.
pub fn extract_description(text: &str) -> Option<String> {
    let mut rest = without_dates(text);
    for re in [&*PREFIXED_AMOUNT, &*SUFFIXED_AMOUNT, &*BARE_AMOUNT] {
        rest = re.replace_all(&rest, " ").into_owned();
    }
    let rest = CURRENCY_SYMBOLS.replace_all(&rest, " ");
    let collapsed = WHITESPACE.replace_all(&rest, " ");
    let cleaned = collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-' | '.'))
        .to_string();

    if cleaned.chars().count() <= MIN_DESCRIPTION_CHARS {
        None
    } else {
        Some(cleaned)
    }
}
