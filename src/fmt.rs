use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// Half-cent totals round away from zero, the way a ledger prints them.
fn cents(val: Decimal) -> Decimal {
    val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a decimal as a dollar amount with thousands separators: $1,234.56
pub fn money(val: Decimal) -> String {
    let val = cents(val);
    let negative = val.is_sign_negative() && !val.is_zero();
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

/// Plain two-decimal total for summary CSV cells: -1234.50
pub fn amount_cell(val: Decimal) -> String {
    format!("{:.2}", cents(val))
}

/// A transaction amount exactly as parsed from its statement.
pub fn source_amount_cell(val: Decimal) -> String {
    val.to_string()
}

pub fn date_cell(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
