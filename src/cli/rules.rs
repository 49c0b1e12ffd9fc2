use comfy_table::{Cell, Table};

use taxprep::categorizer::{override_keywords, LAW_SCHOOL};
use taxprep::error::Result;
use taxprep::settings::load_settings;

pub fn list(rules: Option<&str>) -> Result<()> {
    let settings = load_settings()?;
    let rule_set = settings.resolve_rules(rules)?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Keyword", "Type", "Category"]);
    for (i, rule) in rule_set.rules().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&rule.keyword),
            Cell::new(rule.match_type.as_str()),
            Cell::new(&rule.category),
        ]);
    }
    println!("Rules ({} total, later rules win)\n{table}", rule_set.rule_count());
    println!(
        "Override: descriptions containing {} \u{2192} {LAW_SCHOOL}",
        override_keywords().join(" or ")
    );
    Ok(())
}
