use crate::models::{RawTable, AMOUNT, DATE, DESCRIPTION};

/// Accepted source column names for each canonical column, in lookup order.
/// The canonical name leads each list.
pub const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    (DATE, &["Date", "Transaction Date", "Posted Date"]),
    (DESCRIPTION, &["Description", "Original Description"]),
    (AMOUNT, &["Amount", "Transaction Amount"]),
];

/// Rename the first alias found for each canonical column and null-fill any
/// canonical column that has no alias at all. Other columns are untouched.
pub fn normalize_columns(mut table: RawTable) -> RawTable {
    for (canonical, aliases) in COLUMN_ALIASES {
        if let Some(idx) = aliases.iter().find_map(|alias| table.column_index(alias)) {
            table.headers[idx] = canonical.to_string();
        }
    }

    for (canonical, _) in COLUMN_ALIASES {
        if table.column_index(canonical).is_none() {
            table.headers.push(canonical.to_string());
            for row in &mut table.rows {
                row.push(None);
            }
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| Some(c.to_string())).collect())
                .collect(),
        }
    }

    #[test]
    fn test_canonical_names_pass_through() {
        let t = normalize_columns(table(&["Date", "Description", "Amount"], &[&["2024-01-02", "X", "1"]]));
        assert_eq!(t.headers, vec!["Date", "Description", "Amount"]);
        assert_eq!(t.rows[0].len(), 3);
    }

    #[test]
    fn test_aliases_renamed_in_place() {
        let t = normalize_columns(table(
            &["Posted Date", "Original Description", "Card", "Transaction Amount"],
            &[&["01/02/2024", "ADOBE", "1234", "-9.99"]],
        ));
        assert_eq!(t.headers, vec!["Date", "Description", "Card", "Amount"]);
        assert_eq!(t.rows[0][2].as_deref(), Some("1234"));
    }

    #[test]
    fn test_first_alias_in_declared_order_wins() {
        // "Transaction Date" precedes "Posted Date" in the alias list even
        // though it comes later in the file.
        let t = normalize_columns(table(
            &["Posted Date", "Transaction Date", "Description", "Amount"],
            &[&["01/03/2024", "01/02/2024", "X", "1"]],
        ));
        assert_eq!(t.headers, vec!["Posted Date", "Date", "Description", "Amount"]);
    }

    #[test]
    fn test_canonical_name_beats_alias() {
        let t = normalize_columns(table(
            &["Transaction Amount", "Amount", "Date", "Description"],
            &[&["5", "6", "2024-01-01", "X"]],
        ));
        assert_eq!(t.headers, vec!["Transaction Amount", "Amount", "Date", "Description"]);
    }

    #[test]
    fn test_missing_columns_are_null_filled() {
        let t = normalize_columns(table(&["Date", "Memo"], &[&["2024-01-01", "hi"], &["2024-01-02", "yo"]]));
        assert_eq!(t.headers, vec!["Date", "Memo", "Description", "Amount"]);
        for row in &t.rows {
            assert_eq!(row.len(), 4);
            assert_eq!(row[2], None);
            assert_eq!(row[3], None);
        }
    }

    #[test]
    fn test_no_rows_still_gets_canonical_headers() {
        let t = normalize_columns(table(&["Foo"], &[]));
        assert_eq!(t.headers, vec!["Foo", "Date", "Description", "Amount"]);
        assert!(t.rows.is_empty());
    }
}
