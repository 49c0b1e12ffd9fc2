use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use taxprep::error::Result;
use taxprep::fmt::money;
use taxprep::pipeline;
use taxprep::settings::{load_settings, shellexpand_path};

pub fn run(
    bank: &[String],
    card: &[String],
    output_dir: Option<&str>,
    rules: Option<&str>,
) -> Result<()> {
    let settings = load_settings()?;
    let rule_set = settings.resolve_rules(rules)?;
    let dir = settings.resolve_output_dir(output_dir);

    let bank: Vec<PathBuf> = bank.iter().map(|p| shellexpand_path(p)).collect();
    let card: Vec<PathBuf> = card.iter().map(|p| shellexpand_path(p)).collect();

    let load = pipeline::load(&bank, &card, &rule_set);
    for (path, count) in &load.loaded {
        println!("Loaded {} with {count} transactions", path.display());
    }
    for (path, err) in &load.failed {
        eprintln!("{} {}: {err}", "Error loading".red(), path.display());
    }

    let report = pipeline::write(load, &dir)?;
    let load = &report.load;

    if load.ledger.is_empty() {
        println!("{}", "No data was loaded.".yellow());
    } else {
        println!("Total transactions loaded: {}", load.ledger.len());
        println!(
            "{} categorized, {} uncategorized",
            load.categorize.categorized, load.categorize.uncategorized
        );

        let mut table = Table::new();
        table.set_header(vec!["Category", "Count", "Amount"]);
        for item in &report.summary {
            table.add_row(vec![
                Cell::new(&item.category),
                Cell::new(item.count),
                Cell::new(money(item.total)),
            ]);
        }
        table.add_row(vec![
            Cell::new("Total".bold()),
            Cell::new(load.ledger.len()),
            Cell::new(money(report.total)),
        ]);
        println!("Category Summary\n{table}");
    }

    println!(
        "Tax reports generated in {}",
        report.output_dir.display().to_string().green()
    );
    Ok(())
}
