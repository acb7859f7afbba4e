pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Column order for schedule rows and chart points; unknown keys follow.
const PREFERRED_COLUMNS: [&str; 6] = ["date", "kind", "installment", "interest", "principal", "balance"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The row array of a schedule envelope, if `value` is one.
fn schedule_rows(value: &Value) -> Option<&Vec<Value>> {
    value.get("result")?.get("periods")?.as_array()
}

/// Headers for an array of row objects, in display order.
fn columns(first: &Map<String, Value>) -> Vec<String> {
    let mut headers: Vec<String> = PREFERRED_COLUMNS
        .iter()
        .filter(|c| first.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    headers.extend(
        first
            .keys()
            .filter(|k| !PREFERRED_COLUMNS.contains(&k.as_str()))
            .cloned(),
    );
    headers
}
