use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{scalar_text, Grid};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                match Grid::from_result(result) {
                    Some(grid) => print_grid(result, &grid),
                    None => print_fields(result),
                }
                print_envelope_notes(map);
            }
            _ => print_fields(map),
        },
        _ => println!("{}", value),
    }
}

fn print_fields(map: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_grid(result: &serde_json::Map<String, Value>, grid: &Grid<'_>) {
    if let Some(installment) = result.get("max_monthly_installment") {
        println!("Max monthly installment: {}\n", scalar_text(installment));
    }
    let mut builder = Builder::default();
    builder.push_record(grid.header());
    for row in grid.body() {
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        _ => scalar_text(value),
    }
}
