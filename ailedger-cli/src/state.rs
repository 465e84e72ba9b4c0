use ailedger_core::InMemoryLedger;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn ailedger_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ailedger"))
}

pub fn ensure_ailedger_home() -> Result<PathBuf> {
    let dir = ailedger_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn ledger_path() -> Result<PathBuf> {
    Ok(ensure_ailedger_home()?.join("ledger.json"))
}

/// Missing file means an empty ledger
pub fn read_ledger(path: &Path) -> Result<InMemoryLedger> {
    if !path.exists() {
        return Ok(InMemoryLedger::new());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_ledger(path: &Path, ledger: &InMemoryLedger) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailedger_core::{
        AccountMode, Category, LedgerEntry, LedgerStore, OffChainCategory, ParseResult,
        TransactionType,
    };
    use chrono::NaiveDate;

    #[test]
    fn test_ledger_file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("ailedger-state-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ledger.json");
        let _ = fs::remove_file(&path);

        assert!(read_ledger(&path).unwrap().is_empty());

        let mut ledger = InMemoryLedger::new();
        let result = ParseResult {
            transaction_type: TransactionType::Expense,
            amount: 12.5,
            category: Category::OffChain(OffChainCategory::FoodDining),
            description: "lunch".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            confidence: 0.9,
        };
        let id = ledger
            .insert(LedgerEntry::from_parse(result, AccountMode::OffChain).unwrap())
            .unwrap();
        write_ledger(&path, &ledger).unwrap();

        let mut reloaded = read_ledger(&path).unwrap();
        assert_eq!(reloaded.get(&id).unwrap().description, "lunch");
        // id sequence survives the roundtrip
        let mut copy = reloaded.get(&id).unwrap().clone();
        copy.id.clear();
        let next = reloaded.insert(copy).unwrap();
        assert_ne!(next, id);

        fs::remove_dir_all(&dir).unwrap();
    }
}
