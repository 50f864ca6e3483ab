use serde_json::Value;
use std::io;

use super::{scalar_text, Grid};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let fields = match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => result,
            _ => map,
        },
        _ => {
            let _ = wtr.write_record([scalar_text(value)]);
            let _ = wtr.flush();
            return;
        }
    };

    if let Some(grid) = Grid::from_result(fields) {
        // Sensitivity rows share the header width, so a rectangular CSV works.
        let _ = wtr.write_record(grid.header());
        for row in grid.body() {
            let _ = wtr.write_record(&row);
        }
    } else {
        // Two-column CSV: field, value
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in fields {
            let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
        }
    }

    let _ = wtr.flush();
}
