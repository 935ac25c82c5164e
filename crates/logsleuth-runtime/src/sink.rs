//! Output encoding: JSON-lines rows and the single-shot stats snapshot.

use std::io::Write;

use serde_json::{Map, Value};

use crate::error::Result;
use logsleuth_types::{QueryStats, ResultRow};

/// Encode one result row as a single JSON object line. Rows are written the
/// moment they are received; nothing is buffered beyond the line itself.
pub fn write_row(out: &mut dyn Write, row: &ResultRow) -> Result<()> {
    let mut object = Map::with_capacity(row.len());
    for field in row {
        object.insert(field.field.clone(), Value::String(field.value.clone()));
    }
    serde_json::to_writer(&mut *out, &Value::Object(object))?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Write the final statistics snapshot as one JSON object line.
pub fn write_stats(out: &mut dyn Write, stats: &QueryStats) -> Result<()> {
    serde_json::to_writer(&mut *out, stats)?;
    out.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsleuth_types::ResultField;

    #[test]
    fn test_row_encodes_as_one_json_line() {
        let row = vec![
            ResultField::new("@timestamp", "2024-01-01 00:00:00.000"),
            ResultField::new("@message", "hello"),
        ];
        let mut buf = Vec::new();
        write_row(&mut buf, &row).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with('\n'));
        let value: Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["@message"], "hello");
        assert_eq!(value["@timestamp"], "2024-01-01 00:00:00.000");
    }

    #[test]
    fn test_stats_snapshot_shape() {
        let stats = QueryStats {
            records_matched: 2.0,
            records_scanned: 100.0,
            bytes_scanned: 4096.0,
        };
        let mut buf = Vec::new();
        write_stats(&mut buf, &stats).unwrap();

        let value: Value = serde_json::from_str(String::from_utf8(buf).unwrap().trim_end()).unwrap();
        assert_eq!(value["records_scanned"], 100.0);
    }
}
