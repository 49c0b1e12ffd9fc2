use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::categorizer::{categorize_transactions, CategorizeResult, RuleSet};
use crate::error::{Result, TaxprepError};
use crate::models::{
    Ledger, RawTable, Transaction, AMOUNT, CANONICAL_COLUMNS, CATEGORY, DATE, DESCRIPTION,
    SOURCE_FILE,
};
use crate::normalizer::normalize_columns;

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d %b %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a statement date. Unrecognized or impossible dates give `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // %Y happily reads "24" as year 24; two-digit years go through %y.
    let plausible = |fmt: &str, d: &NaiveDate| !fmt.contains("%Y") || d.year() >= 1000;

    for &fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            if plausible(fmt, &d) {
                return Some(d);
            }
        }
    }
    for &fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            let d = dt.date();
            if plausible(fmt, &d) {
                return Some(d);
            }
        }
    }
    None
}

/// Parse a signed amount, keeping the file's sign convention.
/// `$`, thousands separators and quotes are stripped; `(x)` means `-x`.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let s = raw.replace([',', '"', '$'], "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return Decimal::from_str(inner.trim()).ok().map(|d| -d);
    }
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s).ok()
}

// ---------------------------------------------------------------------------
// File reading
// ---------------------------------------------------------------------------

/// Blank header cells become `Unnamed: <index>`; repeated names get `.1`,
/// `.2`, ... so every column keeps its own values.
fn label_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for (idx, header) in raw.enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            header.to_string()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while headers.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        headers.push(name);
    }
    headers
}

/// Read a headed CSV file. Short rows are padded with nulls; a row with more
/// fields than the header makes the whole file malformed.
pub fn read_table(file_path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));

    let raw_headers = rdr.headers()?;
    if raw_headers.iter().all(|h| h.trim().is_empty()) {
        return Err(TaxprepError::EmptyFile);
    }
    let headers = label_headers(raw_headers.iter());

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(TaxprepError::MalformedRow {
                row: i + 1,
                found: record.len(),
                expected: headers.len(),
            });
        }
        let row = (0..headers.len())
            .map(|idx| record.get(idx).filter(|v| !v.is_empty()).map(str::to_string))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn source_name(file_path: &Path) -> String {
    file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file_path.display().to_string())
}

fn is_reserved(column: &str) -> bool {
    column == SOURCE_FILE || column == CATEGORY
}

/// Turn a normalized table into transactions stamped with `source_file`.
pub fn to_transactions(table: &RawTable, source_file: &str) -> Vec<Transaction> {
    let date_idx = table.column_index(DATE);
    let desc_idx = table.column_index(DESCRIPTION);
    let amount_idx = table.column_index(AMOUNT);
    let cell = |row: &[Option<String>], idx: Option<usize>| {
        idx.and_then(|i| row.get(i)).and_then(|v| v.clone())
    };

    table
        .rows
        .iter()
        .map(|row| {
            let mut txn = Transaction::new(source_file);
            txn.date = cell(row.as_slice(), date_idx).as_deref().and_then(parse_date);
            txn.description = cell(row.as_slice(), desc_idx);
            txn.amount = cell(row.as_slice(), amount_idx).as_deref().and_then(parse_amount);
            for (header, value) in table.headers.iter().zip(row) {
                if CANONICAL_COLUMNS.contains(&header.as_str()) || is_reserved(header) {
                    continue;
                }
                if let Some(value) = value {
                    txn.fields.insert(header.clone(), value.clone());
                }
            }
            txn
        })
        .collect()
}

/// Read, normalize and convert one file.
pub fn load_file(file_path: &Path) -> Result<(Vec<String>, Vec<Transaction>)> {
    let table = normalize_columns(read_table(file_path)?);
    let txns = to_transactions(&table, &source_name(file_path));
    Ok((table.headers, txns))
}

// ---------------------------------------------------------------------------
// load_files
// ---------------------------------------------------------------------------

pub struct LoadResult {
    pub ledger: Ledger,
    /// Files read successfully, with their row counts.
    pub loaded: Vec<(PathBuf, usize)>,
    /// Files skipped because they could not be read.
    pub failed: Vec<(PathBuf, TaxprepError)>,
    pub categorize: CategorizeResult,
}

/// Null dates sort after every real date.
fn by_date_nulls_last(a: &Transaction, b: &Transaction) -> Ordering {
    match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Load every file into one date-sorted, categorized ledger. Unreadable files
/// are skipped and reported in [`LoadResult::failed`]; they never abort the load.
pub fn load_files(paths: &[PathBuf], rules: &RuleSet) -> LoadResult {
    let mut ledger = Ledger::default();
    let mut loaded = Vec::new();
    let mut failed = Vec::new();

    for path in paths {
        match load_file(path) {
            Ok((headers, txns)) => {
                for header in headers {
                    if !is_reserved(&header) && !ledger.columns.contains(&header) {
                        ledger.columns.push(header);
                    }
                }
                tracing::debug!(file = %path.display(), rows = txns.len(), "loaded statement");
                loaded.push((path.clone(), txns.len()));
                ledger.transactions.extend(txns);
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "skipping unreadable statement");
                failed.push((path.clone(), e));
            }
        }
    }

    // Empty ledgers still expose the canonical columns.
    for canonical in CANONICAL_COLUMNS {
        if !ledger.columns.iter().any(|c| c == canonical) {
            ledger.columns.push(canonical.to_string());
        }
    }

    ledger.transactions.sort_by(by_date_nulls_last);
    let categorize = categorize_transactions(&mut ledger.transactions, rules);
    tracing::debug!(
        categorized = categorize.categorized,
        uncategorized = categorize.uncategorized,
        "categorized ledger"
    );

    LoadResult {
        ledger,
        loaded,
        failed,
        categorize,
    }
}
