//! CSV loading for the demo food-item dataset: `name,protein,calories,cost`.
//!
//! This module is a thin, non-core consumer of [`crate::Db`] — it only
//! ever calls `put` through the public API, the way the reference
//! loader only ever calls `tree.insert`.

use crate::{Db, Record};
use std::fs;
use std::path::Path;

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

/// A parsed, not-yet-normalized CSV row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    pub name: String,
    pub protein: i32,
    pub calories: i32,
    pub cost: f64,
}

/// Parse one CSV data line into a [`CsvRow`], normalizing the name.
///
/// Comment lines (starting with `#`) and blank lines are rejected, as
/// are lines with fewer than four comma-separated columns or columns
/// that don't parse as numbers. A quoted field (`"a, b"`) is kept
/// intact — commas inside quotes don't split the row.
pub fn parse_csv_line(raw_line: &str) -> Option<CsvRow> {
    if raw_line.is_empty() || raw_line.starts_with('#') {
        return None;
    }

    let mut cols = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in raw_line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cols.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    cols.push(current);

    if cols.len() < 4 {
        return None;
    }

    let name = normalize_name(&cols[0]);
    let protein: i32 = cols[1].trim().parse().ok()?;
    let calories: i32 = cols[2].trim().parse().ok()?;
    let cost: f64 = cols[3].trim().parse().ok()?;

    Some(CsvRow {
        name,
        protein,
        calories,
        cost,
    })
}

/// Load a CSV file's data rows (skipping the header line) into `db`,
/// returning the number of rows inserted. Malformed rows are skipped,
/// not treated as fatal.
pub fn load_csv_into_db(path: &Path, db: &mut Db) -> crate::Result<usize> {
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines();
    if lines.next().is_none() {
        return Ok(0);
    }

    let mut inserted = 0;
    for line in lines {
        let Some(row) = parse_csv_line(line) else {
            continue;
        };
        let record = Record::new(&row.name, row.protein, row.calories, row.cost);
        db.put(&row.name, record)?;
        inserted += 1;
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_internal_whitespace() {
        assert_eq!(normalize_name("  Greek   Yogurt \t"), "Greek Yogurt");
    }

    #[test]
    fn test_parse_simple_row() {
        let row = parse_csv_line("Banana,1,105,0.30").unwrap();
        assert_eq!(row.name, "Banana");
        assert_eq!(row.protein, 1);
        assert_eq!(row.calories, 105);
        assert!((row.cost - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rejects_comment_and_short_rows() {
        assert!(parse_csv_line("# a comment").is_none());
        assert!(parse_csv_line("Banana,1,105").is_none());
        assert!(parse_csv_line("").is_none());
    }

    #[test]
    fn test_parse_rejects_non_numeric_columns() {
        assert!(parse_csv_line("Banana,one,105,0.30").is_none());
    }

    #[test]
    fn test_quoted_field_keeps_internal_comma() {
        let row = parse_csv_line("\"Rice, Brown\",4,216,0.20").unwrap();
        assert_eq!(row.name, "Rice, Brown");
    }

    #[test]
    fn test_load_csv_into_db_skips_header_and_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("foods.csv");
        fs::write(
            &csv_path,
            "name,protein,calories,cost\nApple,0,52,0.50\nbad,row\nBanana,1,105,0.30\n",
        )
        .unwrap();

        let db_path = dir.path().join("test.db");
        let mut db = Db::open(crate::Config::new(&db_path)).unwrap();
        let inserted = load_csv_into_db(&csv_path, &mut db).unwrap();

        assert_eq!(inserted, 2);
        assert!(db.get("Apple").unwrap().is_some());
        assert!(db.get("Banana").unwrap().is_some());
    }
}
