use std::path::{Path, PathBuf};

use taxprep::categorizer::RuleSet;
use taxprep::error::TaxprepError;
use taxprep::pipeline::{generate_financial_reports, run};
use taxprep::reports::{
    ARTIFACTS, BUSINESS_EXPENSES, CATEGORY_SUMMARY, DETAILED_LOG, MONTHLY_BREAKDOWN, TAX_SUMMARY,
};

fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn test_lumis_and_nh_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let bank = write_csv(
        dir.path(),
        "bank.csv",
        "Date,Description,Amount\n2024-01-10,LUMIS INC payment,100.00\n",
    );
    let card = write_csv(
        dir.path(),
        "activity.csv",
        "Transaction Date,Original Description,Transaction Amount\n01/12/2024,Coffee shop NH,5.00\n",
    );
    let out = dir.path().join("out");
    generate_financial_reports(&[bank], &[card], Some(&out)).unwrap();

    assert_eq!(
        read(&out, CATEGORY_SUMMARY),
        "Category,Transaction_Count,Total_Amount\nBusiness,1,100.00\nLaw School,1,5.00\n"
    );
    let summary = read(&out, TAX_SUMMARY);
    assert!(summary.contains("Date Range: 2024-01-10 to 2024-01-12"));
    assert!(summary.contains("Business: 1 transactions, $100.00"));
    assert!(summary.contains("Law School: 1 transactions, $5.00"));

    let business = read(&out, BUSINESS_EXPENSES);
    assert_eq!(business.lines().count(), 2);
    assert!(business.contains("LUMIS INC payment"));
}

#[test]
fn test_missing_amount_column_counts_rows_and_sums_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "no_amount.csv",
        "Date,Description\n2024-02-01,ADOBE\n2024-02-03,SPOTIFY\n",
    );
    let out = dir.path().join("out");
    generate_financial_reports(&[path], &[], Some(&out)).unwrap();

    assert_eq!(
        read(&out, CATEGORY_SUMMARY),
        "Category,Transaction_Count,Total_Amount\nSubscription,2,0.00\n"
    );
    let log = read(&out, DETAILED_LOG);
    assert_eq!(
        log,
        "Date,Description,Amount,Source_File,Category\n\
         2024-02-01,ADOBE,,no_amount.csv,Subscription\n\
         2024-02-03,SPOTIFY,,no_amount.csv,Subscription\n"
    );
}

#[test]
fn test_zero_valid_files_produces_empty_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let garbage = write_csv(dir.path(), "empty.csv", "");
    let missing = dir.path().join("nope.csv");
    let out = dir.path().join("out");
    let report = run(&[garbage], &[missing], &out, &RuleSet::builtin()).unwrap();

    assert!(report.load.ledger.is_empty());
    assert_eq!(report.load.failed.len(), 2);
    for name in ARTIFACTS {
        assert!(out.join(name).exists(), "missing {name}");
    }
    assert_eq!(read(&out, CATEGORY_SUMMARY), "Category,Transaction_Count,Total_Amount\n");
    assert_eq!(
        read(&out, MONTHLY_BREAKDOWN),
        "Month,Category,Total_Amount,Transaction_Count\n"
    );
    assert!(read(&out, TAX_SUMMARY).contains("No transactions."));
}

#[test]
fn test_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let bank = write_csv(
        dir.path(),
        "bank.csv",
        "Posted Date,Description,Amount,Balance\n\
         03/02/2024,PAYCHECK ACME,2500.00,3000.00\n\
         03/01/2024,NETFLIX,-15.49,500.00\n\
         bad date,TRANSFER TO SAVINGS,-100,400\n",
    );
    let card = write_csv(
        dir.path(),
        "card.csv",
        "Date,Description,Amount,Card No.\n2024-03-05,BARBRI BAR REVIEW,\"1,200.00\",4321\n",
    );
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    generate_financial_reports(&[bank.clone()], &[card.clone()], Some(&first)).unwrap();
    generate_financial_reports(&[bank], &[card], Some(&second)).unwrap();

    assert_eq!(read(&first, DETAILED_LOG), read(&second, DETAILED_LOG));
    assert_eq!(read(&first, CATEGORY_SUMMARY), read(&second, CATEGORY_SUMMARY));

    let log = read(&first, DETAILED_LOG);
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(lines[0], "Date,Description,Amount,Balance,Card No.,Source_File,Category");
    assert_eq!(lines[1], "2024-03-01,NETFLIX,-15.49,500.00,,bank.csv,Subscription");
    assert_eq!(lines[4], ",TRANSFER TO SAVINGS,-100,400,,bank.csv,Financial");
}

#[test]
fn test_huge_amounts_fail_instead_of_panicking() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "huge.csv",
        "Date,Description,Amount\n\
         2024-01-01,LUMIS INC,50000000000000000000000000000\n\
         2024-01-02,LUMIS INC,50000000000000000000000000000\n",
    );
    let out = dir.path().join("out");
    let err = run(&[path], &[], &out, &RuleSet::builtin()).err().unwrap();
    assert!(matches!(err, TaxprepError::AmountOverflow(_)));
}

#[test]
fn test_summary_totals_match_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(
        dir.path(),
        "mixed.csv",
        "Date,Description,Amount\n\
         2024-01-01,HULU,-7.99\n\
         2024-01-15,GROCERIES MARKET,-82.10\n\
         2024-02-01,INTEREST INCOME,0.42\n\
         2024-02-02,UNKNOWN SHOP,not-a-number\n\
         2024-02-03,,-3.00\n",
    );
    let out = dir.path().join("out");
    let report = run(&[path], &[], &out, &RuleSet::builtin()).unwrap();

    let count: usize = report.summary.iter().map(|s| s.count).sum();
    let total: rust_decimal::Decimal = report.summary.iter().map(|s| s.total).sum();
    let ledger_total: rust_decimal::Decimal = report
        .load
        .ledger
        .transactions
        .iter()
        .map(|t| t.amount_or_zero())
        .sum();
    assert_eq!(count, report.load.ledger.len());
    assert_eq!(total, ledger_total);
    assert_eq!(report.total, ledger_total);
    assert!(report.load.ledger.transactions.iter().all(|t| !t.category.is_empty()));
}
