use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use crate::categorizer::RuleSet;
use crate::error::Result;
use crate::importer::{load_files, LoadResult};
use crate::reports::{grand_total, write_reports, CategoryTotal};

/// `tax_reports_YYYYMMDD_HHMMSS`, relative to the working directory.
pub fn default_output_dir() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("tax_reports_{stamp}"))
}

pub struct RunReport {
    pub output_dir: PathBuf,
    pub load: LoadResult,
    pub summary: Vec<CategoryTotal>,
    pub total: Decimal,
}

/// Load bank then card statements into one categorized ledger.
pub fn load(bank_files: &[PathBuf], card_files: &[PathBuf], rules: &RuleSet) -> LoadResult {
    let all_files: Vec<PathBuf> = bank_files.iter().chain(card_files).cloned().collect();
    let load = load_files(&all_files, rules);
    tracing::info!(
        loaded = load.loaded.len(),
        failed = load.failed.len(),
        transactions = load.ledger.len(),
        "statements loaded"
    );
    load
}

/// Write the report set for an already loaded ledger.
pub fn write(load: LoadResult, output_dir: &Path) -> Result<RunReport> {
    let summary = write_reports(&load.ledger, output_dir)?;
    let total = grand_total(&summary)?;
    tracing::info!(dir = %output_dir.display(), "reports written");

    Ok(RunReport {
        output_dir: output_dir.to_path_buf(),
        load,
        summary,
        total,
    })
}

/// Load bank then card statements, categorize, and write the report set.
pub fn run(
    bank_files: &[PathBuf],
    card_files: &[PathBuf],
    output_dir: &Path,
    rules: &RuleSet,
) -> Result<RunReport> {
    write(load(bank_files, card_files, rules), output_dir)
}

/// Run with the built-in rules and return the directory the reports went to.
/// Without `output_dir`, a timestamped folder in the working directory is used.
pub fn generate_financial_reports(
    bank_files: &[PathBuf],
    card_files: &[PathBuf],
    output_dir: Option<&Path>,
) -> Result<PathBuf> {
    let dir = output_dir.map(Path::to_path_buf).unwrap_or_else(default_output_dir);
    run(bank_files, card_files, &dir, &RuleSet::builtin()).map(|r| r.output_dir)
}
