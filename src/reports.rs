use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use rust_decimal::Decimal;

use crate::categorizer::BUSINESS;
use crate::error::{Result, TaxprepError};
use crate::fmt::{amount_cell, date_cell, money, source_amount_cell};
use crate::models::{Ledger, Transaction, AMOUNT, DATE, DESCRIPTION};

pub const DETAILED_LOG: &str = "detailed_transaction_log.csv";
pub const CATEGORY_SUMMARY: &str = "category_summary.csv";
pub const MONTHLY_BREAKDOWN: &str = "monthly_breakdown.csv";
pub const BUSINESS_EXPENSES: &str = "business_expenses.csv";
pub const TAX_SUMMARY: &str = "tax_summary.txt";

pub const ARTIFACTS: [&str; 5] = [
    DETAILED_LOG,
    CATEGORY_SUMMARY,
    MONTHLY_BREAKDOWN,
    BUSINESS_EXPENSES,
    TAX_SUMMARY,
];

// ---------------------------------------------------------------------------
// Category summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub count: usize,
    pub total: Decimal,
}

/// One row per category present, ordered by category name. Null amounts
/// count as transactions and add zero to the total.
pub fn category_summary(ledger: &Ledger) -> Result<Vec<CategoryTotal>> {
    let mut groups: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();
    for txn in &ledger.transactions {
        let entry = groups.entry(txn.category.as_str()).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = entry
            .1
            .checked_add(txn.amount_or_zero())
            .ok_or_else(|| TaxprepError::AmountOverflow(txn.category.clone()))?;
    }
    Ok(groups
        .into_iter()
        .map(|(category, (count, total))| CategoryTotal {
            category: category.to_string(),
            count,
            total,
        })
        .collect())
}

/// Sum of every category total.
pub fn grand_total(summary: &[CategoryTotal]) -> Result<Decimal> {
    summary.iter().try_fold(Decimal::ZERO, |acc, item| {
        acc.checked_add(item.total)
            .ok_or_else(|| TaxprepError::AmountOverflow("all categories".to_string()))
    })
}

// ---------------------------------------------------------------------------
// Monthly breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

/// One row per (month, category) pair present. Undated transactions have no
/// month and are left out.
pub fn monthly_breakdown(ledger: &Ledger) -> Result<Vec<MonthlyTotal>> {
    let mut groups: BTreeMap<(String, &str), (usize, Decimal)> = BTreeMap::new();
    for txn in &ledger.transactions {
        let Some(date) = txn.date else { continue };
        let month = date.format("%Y-%m").to_string();
        let entry = groups
            .entry((month.clone(), txn.category.as_str()))
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = entry.1.checked_add(txn.amount_or_zero()).ok_or_else(|| {
            TaxprepError::AmountOverflow(format!("{} in {month}", txn.category))
        })?;
    }
    Ok(groups
        .into_iter()
        .map(|((month, category), (count, total))| MonthlyTotal {
            month,
            category: category.to_string(),
            total,
            count,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Business expenses
// ---------------------------------------------------------------------------

pub fn business_expenses(ledger: &Ledger) -> impl Iterator<Item = &Transaction> {
    ledger.transactions.iter().filter(|t| t.category == BUSINESS)
}

// ---------------------------------------------------------------------------
// Tax summary
// ---------------------------------------------------------------------------

pub fn render_tax_summary(ledger: &Ledger, summary: &[CategoryTotal]) -> String {
    let mut out = String::new();
    out.push_str("TAX PREPARATION SUMMARY\n");
    out.push_str("=======================\n\n");

    match ledger.date_range() {
        Some((first, last)) => {
            out.push_str(&format!("Date Range: {} to {}\n", date_cell(first), date_cell(last)));
        }
        None => out.push_str("Date Range: n/a\n"),
    }
    out.push_str(&format!("Total Transactions: {}\n\n", ledger.len()));

    out.push_str("CATEGORY BREAKDOWN\n");
    out.push_str("------------------\n");
    if summary.is_empty() {
        out.push_str("No transactions.\n");
    }
    for item in summary {
        out.push_str(&format!(
            "{}: {} transactions, {}\n",
            item.category,
            item.count,
            money(item.total)
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn column_value(txn: &Transaction, column: &str) -> String {
    match column {
        DATE => txn.date.map(date_cell).unwrap_or_default(),
        DESCRIPTION => txn.description.clone().unwrap_or_default(),
        AMOUNT => txn.amount.map(source_amount_cell).unwrap_or_default(),
        other => txn.fields.get(other).cloned().unwrap_or_default(),
    }
}

/// Write transactions with the ledger's export columns.
pub fn write_transactions<'a, W: Write>(
    wtr: W,
    ledger: &Ledger,
    txns: impl IntoIterator<Item = &'a Transaction>,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(wtr);
    wtr.write_record(ledger.export_headers())?;
    for txn in txns {
        let mut record: Vec<String> = ledger
            .columns
            .iter()
            .map(|c| column_value(txn, c))
            .collect();
        record.push(txn.source_file.clone());
        record.push(txn.category.clone());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_category_summary<W: Write>(wtr: W, summary: &[CategoryTotal]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(wtr);
    wtr.write_record(["Category", "Transaction_Count", "Total_Amount"])?;
    for item in summary {
        wtr.write_record([
            item.category.clone(),
            item.count.to_string(),
            amount_cell(item.total),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_monthly_breakdown<W: Write>(wtr: W, rows: &[MonthlyTotal]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(wtr);
    wtr.write_record(["Month", "Category", "Total_Amount", "Transaction_Count"])?;
    for row in rows {
        wtr.write_record([
            row.month.clone(),
            row.category.clone(),
            amount_cell(row.total),
            row.count.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_error(path: &Path, source: std::io::Error) -> TaxprepError {
    TaxprepError::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn create(path: &Path) -> Result<std::io::BufWriter<std::fs::File>> {
    let file = std::fs::File::create(path).map_err(|e| write_error(path, e))?;
    Ok(std::io::BufWriter::new(file))
}

/// Write all five artifacts into `dir`, creating it if needed. Each artifact
/// is attempted even if an earlier one failed; any failure fails the call.
/// Totals that overflow fail before anything is written.
pub fn write_reports(ledger: &Ledger, dir: &Path) -> Result<Vec<CategoryTotal>> {
    let summary = category_summary(ledger)?;
    grand_total(&summary)?;
    let monthly = monthly_breakdown(ledger)?;
    std::fs::create_dir_all(dir).map_err(|e| write_error(dir, e))?;

    let results: [(&str, Result<()>); 5] = [
        (
            DETAILED_LOG,
            create(&dir.join(DETAILED_LOG))
                .and_then(|f| write_transactions(f, ledger, &ledger.transactions)),
        ),
        (
            CATEGORY_SUMMARY,
            create(&dir.join(CATEGORY_SUMMARY)).and_then(|f| write_category_summary(f, &summary)),
        ),
        (
            MONTHLY_BREAKDOWN,
            create(&dir.join(MONTHLY_BREAKDOWN))
                .and_then(|f| write_monthly_breakdown(f, &monthly)),
        ),
        (
            BUSINESS_EXPENSES,
            create(&dir.join(BUSINESS_EXPENSES))
                .and_then(|f| write_transactions(f, ledger, business_expenses(ledger))),
        ),
        (
            TAX_SUMMARY,
            std::fs::write(dir.join(TAX_SUMMARY), render_tax_summary(ledger, &summary))
                .map_err(|e| write_error(&dir.join(TAX_SUMMARY), e)),
        ),
    ];

    let mut failed = 0usize;
    for (name, result) in &results {
        if let Err(e) = result {
            tracing::error!(report = *name, error = %e, "failed to write report");
            failed += 1;
        }
    }
    if failed > 0 {
        return Err(TaxprepError::ReportsFailed {
            failed,
            total: ARTIFACTS.len(),
        });
    }
    Ok(summary)
}
