// Describes a source table, to find which columns hold the departments and the cities.

use crate::geo::*;

pub fn describe_table(table: &Table, num_rows: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("Columns found ({}):", table.header.len()));
    for (idx, name) in table.header.iter().enumerate() {
        lines.push(format!("{}: ${} {:?}", idx + 1, column_letters(idx), name));
    }
    lines.push(String::new());
    lines.push(format!(
        "First rows ({} of {}):",
        num_rows.min(table.rows.len()),
        table.rows.len()
    ));
    for row in table.rows.iter().take(num_rows) {
        lines.push(row.join(" | "));
    }
    lines.join("\n")
}
