//! Rendering of records and limits for the terminal.

use comfy_table::{Attribute, Cell, Table};
use serde_json::Value;

/// Printed instead of an empty table.
pub const NO_RESULTS: &str = "No results found";

/// Column name used for records that are not JSON objects.
const VALUE_COLUMN: &str = "value";

/// Render records as a table whose columns are the union of all record keys,
/// in order of first appearance.
pub fn render_records(records: &[Value]) -> String {
    if records.is_empty() {
        return NO_RESULTS.to_string();
    }

    let columns = columns(records);
    let mut table = Table::new();
    table.set_header(
        columns
            .iter()
            .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );

    for record in records {
        let row: Vec<Cell> = columns
            .iter()
            .map(|column| {
                let value = match record {
                    Value::Object(map) => map.get(column),
                    other if column == VALUE_COLUMN => Some(other),
                    _ => None,
                };
                Cell::new(value.map(cell_text).unwrap_or_default())
            })
            .collect();
        table.add_row(row);
    }

    table.to_string()
}

/// Render the limits object as a two-column table.
pub fn render_limits(limits: &Value) -> String {
    let Value::Object(map) = limits else {
        return cell_text(limits);
    };

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Field").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    for (field, value) in map {
        table.add_row(vec![Cell::new(field), Cell::new(cell_text(value))]);
    }
    table.to_string()
}

/// Pretty-printed JSON.
pub fn render_json(value: &Value) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn columns(records: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        match record {
            Value::Object(map) => {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
            _ => {
                if !columns.iter().any(|c| c == VALUE_COLUMN) {
                    columns.push(VALUE_COLUMN.to_string());
                }
            }
        }
    }
    columns
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}
