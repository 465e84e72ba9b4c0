use ailedger_core::{
    AccountMode, Category, InMemoryLedger, LabelMatch, LedgerEntry, LedgerQuery, LedgerStore,
    OffChainCategory, OnChainCategory, ParseContext, ParseResult, TransactionType,
};
use ailedger_ingest::{condense_receipt, decode_transaction_str};
use ailedger_parse::LedgerParser;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod batch;
mod config;
mod state;

use config::{Config, OutputFormat};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("AILEDGER_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "ailedger",
    version,
    long_version = LONG_VERSION,
    about = "Turn transaction text and Solana transactions into ledger entries"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one free-text transaction ("I bought lunch for $12.50")
    Parse {
        /// Transaction text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// offchain | onchain (default: from config)
        #[arg(long)]
        context: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Parse OCR text of a receipt
    Receipt {
        /// File holding the recognized text
        file: PathBuf,

        #[arg(long)]
        json: bool,

        /// Also record the result in the ledger
        #[arg(long)]
        save: bool,
    },

    /// Parse a Solana getTransaction response (jsonParsed encoding)
    Chain {
        #[arg(long)]
        file: PathBuf,

        /// Wallet the transaction is viewed from
        #[arg(long)]
        wallet: String,

        /// Authoritative SOL amount, overrides the balance delta
        #[arg(long)]
        amount: Option<f64>,

        #[arg(long)]
        json: bool,

        /// Also record the result in the ledger
        #[arg(long)]
        save: bool,
    },

    /// Parse every line of a text file and write CSV
    Batch {
        #[arg(long)]
        input: PathBuf,

        /// CSV destination (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long)]
        context: Option<String>,
    },

    /// Parse text and record it in the ledger
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        #[arg(long)]
        context: Option<String>,

        /// Account mode (default: matches the context)
        #[arg(long)]
        mode: Option<String>,
    },

    /// List ledger entries
    List {
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Category code or name ("FOOD_DINING", "defi swap")
        #[arg(long)]
        category: Option<String>,

        /// income | expense
        #[arg(long = "type")]
        transaction_type: Option<String>,

        #[arg(long)]
        mode: Option<String>,
    },

    /// Manage ~/.ailedger/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ailedger=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Parse {
            text,
            context,
            json,
        } => {
            let cfg = config::load_config()?;
            let ctx = resolve_context(&cfg, context.as_deref())?;
            let parser = LedgerParser::new(cfg.parser_config()?);
            let result = parser.parse_free_text(&text.join(" "), ctx);
            print_result(&result, output_format(&cfg, json)?)?;
        }

        Command::Receipt { file, json, save } => {
            let cfg = config::load_config()?;
            let ocr = std::fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            let line = condense_receipt(&ocr);
            if line.is_empty() {
                bail!("no text in {}", file.display());
            }
            info!(%line, "condensed receipt");

            let parser = LedgerParser::new(cfg.parser_config()?);
            let result = parser.parse_free_text(&line, ParseContext::OffChain);
            print_result(&result, output_format(&cfg, json)?)?;
            if save {
                record(LedgerEntry::from_parse(result, AccountMode::OffChain)?)?;
            }
        }

        Command::Chain {
            file,
            wallet,
            amount,
            json,
            save,
        } => {
            let cfg = config::load_config()?;
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("read {}", file.display()))?;
            let tx = decode_transaction_str(&raw, &wallet)
                .with_context(|| format!("decode {}", file.display()))?;

            let parser = LedgerParser::new(cfg.parser_config()?);
            let result = parser.parse_on_chain_transaction(&tx, amount);
            print_result(&result, output_format(&cfg, json)?)?;
            if save {
                let entry = LedgerEntry::from_parse(result, AccountMode::OnChain)?
                    .with_chain_link(tx.signature.clone(), tx.slot, tx.wallet_address.clone());
                record(entry)?;
            }
        }

        Command::Batch {
            input,
            output,
            context,
        } => {
            let cfg = config::load_config()?;
            let ctx = resolve_context(&cfg, context.as_deref())?;
            let text = std::fs::read_to_string(&input)
                .with_context(|| format!("read {}", input.display()))?;
            let lines: Vec<String> = text.lines().map(str::to_string).collect();

            let parser = Arc::new(LedgerParser::new(cfg.parser_config()?));
            let rows = batch::parse_lines(parser, lines, ctx).await?;
            info!(count = rows.len(), input = %input.display(), "parsed batch");

            match output {
                Some(path) => {
                    let f = std::fs::File::create(&path)
                        .with_context(|| format!("create {}", path.display()))?;
                    batch::write_csv(f, &rows)?;
                    println!("Wrote {} rows to {}", rows.len(), path.display());
                }
                None => batch::write_csv(std::io::stdout().lock(), &rows)?,
            }
        }

        Command::Add {
            text,
            context,
            mode,
        } => {
            let cfg = config::load_config()?;
            let ctx = resolve_context(&cfg, context.as_deref())?;
            let mode = match mode {
                Some(m) => m.parse::<AccountMode>()?,
                None => match ctx {
                    ParseContext::OffChain => AccountMode::OffChain,
                    ParseContext::OnChain => AccountMode::OnChain,
                },
            };

            let parser = LedgerParser::new(cfg.parser_config()?);
            let result = parser.parse_free_text(&text.join(" "), ctx);
            print_result(&result, OutputFormat::Text)?;
            record(LedgerEntry::from_parse(result, mode)?)?;
        }

        Command::List {
            from,
            to,
            category,
            transaction_type,
            mode,
        } => {
            let account_mode = mode.as_deref().map(str::parse::<AccountMode>).transpose()?;
            let categories = match category.as_deref() {
                Some(label) => category_candidates(label, account_mode)?,
                None => Vec::new(),
            };
            let query = LedgerQuery {
                from,
                to,
                category: None,
                transaction_type: transaction_type
                    .as_deref()
                    .map(str::parse::<TransactionType>)
                    .transpose()?,
                account_mode,
            };
            list_entries(&query, &categories)?;
        }
    }

    Ok(())
}

fn resolve_context(cfg: &Config, flag: Option<&str>) -> Result<ParseContext> {
    match flag {
        Some(s) => Ok(s.parse()?),
        None => cfg.context(),
    }
}

fn output_format(cfg: &Config, json_flag: bool) -> Result<OutputFormat> {
    if json_flag {
        return Ok(OutputFormat::Json);
    }
    cfg.output_format()
}

/// Categories a filter label can name. INVESTMENT and OTHER exist in both
/// families, so without a mode a label may resolve to two. Unlike model
/// replies an unknown label is an error, not OTHER.
fn category_candidates(label: &str, mode: Option<AccountMode>) -> Result<Vec<Category>> {
    let mut out = Vec::new();
    if mode.is_none_or(|m| m == AccountMode::OffChain) {
        if let LabelMatch::Known(c) = OffChainCategory::match_label(label) {
            out.push(Category::OffChain(c));
        }
    }
    if mode.is_none_or(|m| m == AccountMode::OnChain) {
        if let LabelMatch::Known(c) = OnChainCategory::match_label(label) {
            out.push(Category::OnChain(c));
        }
    }
    if out.is_empty() {
        match mode {
            Some(m) => bail!("unknown {m} category {label:?}"),
            None => bail!("unknown category {label:?}"),
        }
    }
    Ok(out)
}

/// Query results narrowed to `categories` (empty means any)
fn select_entries<'a>(
    ledger: &'a InMemoryLedger,
    query: &LedgerQuery,
    categories: &[Category],
) -> Vec<&'a LedgerEntry> {
    ledger
        .query(query)
        .into_iter()
        .filter(|e| categories.is_empty() || categories.contains(&e.category))
        .collect()
}

fn print_result(r: &ParseResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(r)?),
        OutputFormat::Text => {
            println!("type:        {}", r.transaction_type);
            println!("amount:      {:.2}", r.amount);
            println!("category:    {} ({})", r.category.code(), r.category.display_name());
            println!("description: {}", r.description);
            println!("date:        {}", r.date);
            println!("confidence:  {:.2}", r.confidence);
        }
    }
    Ok(())
}

fn record(entry: LedgerEntry) -> Result<()> {
    let path = state::ledger_path()?;
    let mut ledger = state::read_ledger(&path)?;
    let id = ledger.insert(entry)?;
    state::write_ledger(&path, &ledger)?;
    println!("Recorded {} in {}", id, path.display());
    Ok(())
}

fn list_entries(query: &LedgerQuery, categories: &[Category]) -> Result<()> {
    let path = state::ledger_path()?;
    let ledger = state::read_ledger(&path)?;
    let entries = select_entries(&ledger, query, categories);
    if entries.is_empty() {
        println!("No entries.");
        return Ok(());
    }

    for e in &entries {
        println!(
            "{} | {} | {:<8} | {:>10.2} | {:<16} | {}",
            e.id,
            e.date,
            e.account_mode.as_str(),
            e.signed_amount(),
            e.category.code(),
            e.description
        );
    }
    println!(
        "\n{} entries, net {:.2}",
        entries.len(),
        entries.iter().map(|e| e.signed_amount()).sum::<f64>()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: Category, mode: AccountMode) -> LedgerEntry {
        let result = ParseResult {
            transaction_type: TransactionType::Expense,
            amount: 100.0,
            category,
            description: category.display_name().to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            confidence: 0.6,
        };
        LedgerEntry::from_parse(result, mode).unwrap()
    }

    fn ledger() -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new();
        for (category, mode) in [
            (Category::OffChain(OffChainCategory::Investment), AccountMode::OffChain),
            (Category::OnChain(OnChainCategory::Investment), AccountMode::OnChain),
            (Category::OnChain(OnChainCategory::Other), AccountMode::OnChain),
            (Category::OffChain(OffChainCategory::Shopping), AccountMode::OffChain),
        ] {
            ledger.insert(entry(category, mode)).unwrap();
        }
        ledger
    }

    #[test]
    fn test_shared_category_name_with_onchain_mode() {
        let ledger = ledger();
        let cats = category_candidates("INVESTMENT", Some(AccountMode::OnChain)).unwrap();
        assert_eq!(cats, vec![Category::OnChain(OnChainCategory::Investment)]);

        let query = LedgerQuery::new().with_mode(AccountMode::OnChain);
        let found = select_entries(&ledger, &query, &cats);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, Category::OnChain(OnChainCategory::Investment));

        let cats = category_candidates("other", Some(AccountMode::OnChain)).unwrap();
        assert_eq!(select_entries(&ledger, &query, &cats).len(), 1);
    }

    #[test]
    fn test_shared_category_name_without_mode_matches_both_families() {
        let ledger = ledger();
        let cats = category_candidates("investment", None).unwrap();
        assert_eq!(cats.len(), 2);
        assert_eq!(select_entries(&ledger, &LedgerQuery::new(), &cats).len(), 2);
        assert_eq!(select_entries(&ledger, &LedgerQuery::new(), &[]).len(), 4);
    }

    #[test]
    fn test_category_filter_must_exist_in_family() {
        assert!(category_candidates("lottery", None).is_err());
        // shopping has no on-chain counterpart
        assert!(category_candidates("SHOPPING", Some(AccountMode::OnChain)).is_err());
        assert_eq!(
            category_candidates("defi swap", None).unwrap(),
            vec![Category::OnChain(OnChainCategory::DefiSwap)]
        );
    }
}
