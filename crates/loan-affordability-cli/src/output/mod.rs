pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Sensitivity grid carried in a result object: row labels, column labels
/// and the cell matrix.
pub(crate) struct Grid<'a> {
    pub rows: &'a [Value],
    pub cols: &'a [Value],
    pub cells: &'a [Value],
}

impl<'a> Grid<'a> {
    pub fn from_result(result: &'a serde_json::Map<String, Value>) -> Option<Self> {
        Some(Grid {
            rows: result.get("rate_values")?.as_array()?,
            cols: result.get("tenure_values")?.as_array()?,
            cells: result.get("matrix")?.as_array()?,
        })
    }

    pub fn header(&self) -> Vec<String> {
        std::iter::once("rate % \\ tenure yrs".to_string())
            .chain(self.cols.iter().map(scalar_text))
            .collect()
    }

    pub fn body(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .zip(self.cells)
            .map(|(label, row)| {
                let cells = row.as_array().map(Vec::as_slice).unwrap_or_default();
                std::iter::once(scalar_text(label))
                    .chain(cells.iter().map(scalar_text))
                    .collect()
            })
            .collect()
    }
}

/// Render a scalar JSON value without quotes.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
