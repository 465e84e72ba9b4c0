//! LedgerStore: the persistence seam for finished ledger entries.
//!
//! The parser never touches storage; callers hand entries to a store.
//! `InMemoryLedger` keeps canonical copies in a map (id -> entry) and is what
//! the CLI serializes to disk.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::{Category, TransactionType};
use crate::error::LedgerError;
use crate::ledger::{AccountMode, LedgerEntry};

/// Filter for [`LedgerStore::query`]. `None` fields match everything; date
/// bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<Category>,
    pub transaction_type: Option<TransactionType>,
    pub account_mode: Option<AccountMode>,
}

impl LedgerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn with_mode(mut self, mode: AccountMode) -> Self {
        self.account_mode = Some(mode);
        self
    }

    pub fn matches(&self, e: &LedgerEntry) -> bool {
        self.from.is_none_or(|d| e.date >= d)
            && self.to.is_none_or(|d| e.date <= d)
            && self.category.is_none_or(|c| e.category == c)
            && self.transaction_type.is_none_or(|t| e.transaction_type == t)
            && self.account_mode.is_none_or(|m| e.account_mode == m)
    }
}

pub trait LedgerStore {
    /// Store a new entry, returning its assigned id.
    fn insert(&mut self, entry: LedgerEntry) -> Result<String, LedgerError>;
    /// Replace the entry with the same id.
    fn update(&mut self, entry: LedgerEntry) -> Result<(), LedgerError>;
    fn delete(&mut self, id: &str) -> Result<LedgerEntry, LedgerError>;
    fn get(&self, id: &str) -> Option<&LedgerEntry>;
    /// Matching entries ordered by date, then id.
    fn query(&self, q: &LedgerQuery) -> Vec<&LedgerEntry>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    entries: BTreeMap<String, LedgerEntry>,
    next_seq: u64,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of signed amounts over matching entries
    pub fn net_total(&self, q: &LedgerQuery) -> f64 {
        self.query(q).iter().map(|e| e.signed_amount()).sum()
    }

    fn next_id(&mut self) -> String {
        loop {
            self.next_seq += 1;
            let id = format!("entry-{:05}", self.next_seq);
            if !self.entries.contains_key(&id) {
                return id;
            }
        }
    }
}

impl LedgerStore for InMemoryLedger {
    fn insert(&mut self, mut entry: LedgerEntry) -> Result<String, LedgerError> {
        if entry.id.is_empty() {
            entry.id = self.next_id();
        } else if self.entries.contains_key(&entry.id) {
            return Err(LedgerError::DuplicateEntry(entry.id));
        }
        let id = entry.id.clone();
        self.entries.insert(id.clone(), entry);
        Ok(id)
    }

    fn update(&mut self, entry: LedgerEntry) -> Result<(), LedgerError> {
        match self.entries.get_mut(&entry.id) {
            Some(slot) => {
                *slot = entry;
                Ok(())
            }
            None => Err(LedgerError::EntryNotFound(entry.id)),
        }
    }

    fn delete(&mut self, id: &str) -> Result<LedgerEntry, LedgerError> {
        self.entries
            .remove(id)
            .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))
    }

    fn get(&self, id: &str) -> Option<&LedgerEntry> {
        self.entries.get(id)
    }

    fn query(&self, q: &LedgerQuery) -> Vec<&LedgerEntry> {
        let mut out: Vec<&LedgerEntry> = self.entries.values().filter(|e| q.matches(e)).collect();
        out.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        out
    }
}
