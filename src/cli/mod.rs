pub mod report;
pub mod rules;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "taxprep",
    version,
    about = "Categorize bank and credit-card CSV exports into tax-prep reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load statements, categorize every transaction, and write the report set.
    Report {
        /// Bank statement CSV (repeatable)
        #[arg(long, value_name = "FILE")]
        bank: Vec<String>,
        /// Credit-card statement CSV (repeatable)
        #[arg(long, value_name = "FILE")]
        card: Vec<String>,
        /// Output directory (default: ./tax_reports_YYYYMMDD_HHMMSS)
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
        /// JSON rules file replacing the built-in keyword table
        #[arg(long)]
        rules: Option<String>,
    },
    /// Show categorization rules in the order they are applied.
    Rules {
        /// JSON rules file to show instead of the built-in table
        #[arg(long)]
        rules: Option<String>,
    },
}
