//! Plain-text table for SQL query results.

use crate::notes::SqlRow;
use serde_json::Value;
use std::collections::BTreeSet;

/// Renders rows as an aligned table with a `N row(s)` footer.
///
/// Columns are the sorted union of every row's keys; absent and null cells
/// render empty.
pub fn render_sql_table(rows: &[SqlRow]) -> String {
    if rows.is_empty() {
        return "No results".to_string();
    }

    let columns = rows
        .iter()
        .flat_map(|row| row.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();

    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.get(column).map(cell_text).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let mut lines = Vec::with_capacity(rows.len() + 4);
    lines.push(join_padded(columns.iter().map(String::as_str), &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &cells {
        lines.push(join_padded(row.iter().map(String::as_str), &widths));
    }

    let suffix = if rows.len() == 1 { "" } else { "s" };
    lines.push(String::new());
    lines.push(format!("{} row{suffix}", rows.len()));
    lines.join("\n")
}

fn join_padded<'a>(values: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(value, width)| format!("{value:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::render_sql_table;
    use crate::notes::SqlRow;
    use serde_json::json;

    fn row(pairs: &[(&str, serde_json::Value)]) -> SqlRow {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn empty_results() {
        assert_eq!(render_sql_table(&[]), "No results");
    }

    #[test]
    fn aligns_sorted_columns_and_counts_rows() {
        let rows = vec![
            row(&[("relative", json!("a.md")), ("count", json!(12))]),
            row(&[("relative", json!("longer/name.md")), ("count", json!(null))]),
        ];
        let rendered = render_sql_table(&rows);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "count  relative");
        assert_eq!(lines[1], "-----  --------------");
        assert_eq!(lines[2], "12     a.md");
        assert_eq!(lines[3], "       longer/name.md");
        assert_eq!(lines.last().copied(), Some("2 rows"));
    }

    #[test]
    fn single_row_footer() {
        let rendered = render_sql_table(&[row(&[("n", json!(1))])]);
        assert!(rendered.ends_with("\n1 row"));
    }
}
