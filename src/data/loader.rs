use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::DataLoadError;

use super::columns;
use super::model::{CellValue, Record, Table};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the corporate stress dataset from a CSV file on disk.
pub fn load_path(path: &Path) -> Result<Table, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(file)
}

/// Load the dataset from any byte stream (file-picker uploads, tests).
///
/// CSV layout: header row naming at least the [`columns::REQUIRED`] columns
/// (case-sensitive), one record per data row. Extra columns are kept as-is.
/// The whole stream is read eagerly.
pub fn load_reader<R: io::Read>(reader: R) -> Result<Table, DataLoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    for &required in columns::REQUIRED {
        if !headers.iter().any(|h| h == required) {
            return Err(DataLoadError::MissingColumn(required));
        }
    }

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        let mut fields = BTreeMap::new();
        for (idx, value) in row.iter().enumerate() {
            let Some(name) = headers.get(idx) else {
                continue;
            };
            fields.insert(name.clone(), guess_cell_type(value));
        }
        records.push(Record { fields });
    }

    if records.is_empty() {
        return Err(DataLoadError::Empty);
    }

    coerce_numeric(&mut records, columns::NUMERIC);
    Ok(Table::from_records(records))
}

// ---------------------------------------------------------------------------
// Cell typing
// ---------------------------------------------------------------------------

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

/// Demote anything non-numeric in the registered numeric columns to `Null`.
/// Unparseable tokens become missing values, never load failures, so that
/// downstream aggregations can skip them.
fn coerce_numeric(records: &mut [Record], numeric_columns: &[&str]) {
    for rec in records {
        for &col in numeric_columns {
            if let Some(cell) = rec.fields.get_mut(col) {
                if cell.as_f64().is_none() {
                    *cell = CellValue::Null;
                }
            }
        }
    }
}
