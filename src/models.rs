use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub const DATE: &str = "Date";
pub const DESCRIPTION: &str = "Description";
pub const AMOUNT: &str = "Amount";
pub const SOURCE_FILE: &str = "Source_File";
pub const CATEGORY: &str = "Category";

pub const CANONICAL_COLUMNS: [&str; 3] = [DATE, DESCRIPTION, AMOUNT];

pub const UNCATEGORIZED: &str = "Uncategorized";

/// A CSV file as read from disk: header names plus one cell per header per row.
/// Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub source_file: String,
    pub category: String,
    /// Non-canonical source columns, passed through untouched.
    pub fields: HashMap<String, String>,
}

impl Transaction {
    pub fn new(source_file: &str) -> Self {
        Self {
            date: None,
            description: None,
            amount: None,
            source_file: source_file.to_string(),
            category: UNCATEGORIZED.to_string(),
            fields: HashMap::new(),
        }
    }

    /// Amount with null counted as zero.
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }
}

/// The unified, date-sorted transaction set for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    /// Union of normalized column names in first-seen order.
    pub columns: Vec<String>,
    pub transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Column order for exported logs: ledger columns, then provenance and category.
    pub fn export_headers(&self) -> Vec<&str> {
        let mut headers: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        headers.push(SOURCE_FILE);
        headers.push(CATEGORY);
        headers
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.transactions.iter().filter_map(|t| t.date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }
}
