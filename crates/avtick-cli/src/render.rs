//! Terminal table rendering.

use avtick_core::DataTable;
use serde_json::{Map, Value};

/// Prints a data series with its title banner.
pub fn print_series(table: &DataTable) {
    println!("===== {} =====", table.title);
    print!("{}", format_table(&table.columns, &table.rows));
}

/// Prints a flat key/value payload as a single-row table, headers in
/// payload order.
pub fn print_fields(fields: &Map<String, Value>) {
    let columns: Vec<String> = fields.keys().cloned().collect();
    let row: Vec<String> = fields.values().map(value_text).collect();
    print!("{}", format_table(&columns, &[row]));
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Lays a table out in psql style: bordered, left-aligned, one space of
/// padding, column width taken from the widest header or cell.
pub fn format_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            if idx < widths.len() {
                widths[idx] = widths[idx].max(width);
            } else {
                widths.push(width);
            }
        }
    }

    let mut out = String::new();
    out.push_str(&rule(&widths, '+'));
    out.push_str(&line(columns, &widths));
    out.push_str(&rule(&widths, '|'));
    for row in rows {
        out.push_str(&line(row, &widths));
    }
    out.push_str(&rule(&widths, '+'));
    out
}

fn rule(widths: &[usize], edge: char) -> String {
    let mut out = String::new();
    out.push(edge);
    for (idx, width) in widths.iter().enumerate() {
        if idx > 0 {
            out.push('+');
        }
        out.push_str(&"-".repeat(width + 2));
    }
    out.push(edge);
    out.push('\n');
    out
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let mut out = String::new();
    out.push('|');
    for (idx, width) in widths.iter().enumerate() {
        let cell = cells.get(idx).map(String::as_str).unwrap_or("");
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width - cell.chars().count()));
        out.push_str(" |");
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| String::from(*v)).collect()
    }

    #[test]
    fn formats_psql_style_table() {
        let columns = cells(&["datetime", "open"]);
        let rows = vec![
            cells(&["2024-05-03", "166.0"]),
            cells(&["2024-04-26", "181.1"]),
        ];

        let expected = "\
+------------+-------+
| datetime   | open  |
|------------+-------|
| 2024-05-03 | 166.0 |
| 2024-04-26 | 181.1 |
+------------+-------+
";
        assert_eq!(format_table(&columns, &rows), expected);
    }

    #[test]
    fn short_rows_are_padded_with_empty_cells() {
        let columns = cells(&["symbol", "name"]);
        let rows = vec![cells(&["IBM"])];

        let expected = "\
+--------+------+
| symbol | name |
|--------+------|
| IBM    |      |
+--------+------+
";
        assert_eq!(format_table(&columns, &rows), expected);
    }

    #[test]
    fn non_string_values_render_as_json_text() {
        let fields = json!({"price": 167.2, "open": "166.0"});
        let row: Vec<String> = fields
            .as_object()
            .expect("fixture is an object")
            .values()
            .map(value_text)
            .collect();
        assert_eq!(row, ["167.2", "166.0"]);
    }
}
