use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value covering the dtypes found in the input CSV.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
/// `Null` is the explicit missing marker: numeric coercion maps unparseable
/// tokens here, and every aggregation skips it.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for numeric aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Record – one employee observation (one row of the source CSV)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Record {
    /// Dynamic columns: column_name → value.
    pub fields: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    /// Numeric cell value; `None` for missing, non-numeric, or non-finite cells.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        self.fields
            .get(column)
            .and_then(CellValue::as_f64)
            .filter(|v| v.is_finite())
    }

    /// Categorical key for grouping: the display form of a non-null cell.
    pub fn category(&self, column: &str) -> Option<String> {
        match self.fields.get(column) {
            Some(cell) if !cell.is_null() => Some(cell.to_string()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices. Treated as
/// immutable after load; filtering builds a new `Table` rather than mutating
/// this one.
#[derive(Debug, Clone)]
pub struct Table {
    /// All records (rows), in file order.
    pub records: Vec<Record>,
    /// Ordered list of column names.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Table {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut column_names_set: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for rec in &records {
            for (col, val) in &rec.fields {
                column_names_set.insert(col.clone());
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        let column_names: Vec<String> = column_names_set.into_iter().collect();
        Table {
            records,
            column_names,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One entry per row: the numeric value of `column`, `None` where missing.
    pub fn numeric_column(&self, column: &str) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.numeric(column)).collect()
    }

    /// Sorted distinct display values of a categorical column (nulls skipped).
    pub fn unique_categories(&self, column: &str) -> BTreeSet<String> {
        self.unique_values
            .get(column)
            .map(|vals| {
                vals.iter()
                    .filter(|v| !v.is_null())
                    .map(|v| v.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Observed integer bounds of a numeric column, for range controls.
    pub fn integer_bounds(&self, column: &str) -> Option<(i64, i64)> {
        let mut bounds: Option<(i64, i64)> = None;
        for rec in &self.records {
            if let Some(v) = rec.numeric(column) {
                let v = v.round() as i64;
                bounds = Some(match bounds {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
            }
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, CellValue)]) -> Record {
        Record {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn numeric_skips_non_numeric_cells() {
        let rec = record(&[
            ("a", CellValue::Float(1.5)),
            ("b", CellValue::String("x".into())),
            ("c", CellValue::Null),
        ]);
        assert_eq!(rec.numeric("a"), Some(1.5));
        assert_eq!(rec.numeric("b"), None);
        assert_eq!(rec.numeric("c"), None);
        assert_eq!(rec.numeric("missing"), None);
    }

    #[test]
    fn unique_categories_skip_nulls() {
        let table = Table::from_records(vec![
            record(&[("dept", CellValue::String("Sales".into()))]),
            record(&[("dept", CellValue::Null)]),
            record(&[("dept", CellValue::String("Eng".into()))]),
            record(&[("dept", CellValue::String("Sales".into()))]),
        ]);
        let cats: Vec<String> = table.unique_categories("dept").into_iter().collect();
        assert_eq!(cats, vec!["Eng".to_string(), "Sales".to_string()]);
    }

    #[test]
    fn integer_bounds_cover_observed_range() {
        let table = Table::from_records(vec![
            record(&[("exp", CellValue::Integer(3))]),
            record(&[("exp", CellValue::Integer(17))]),
            record(&[("exp", CellValue::Null)]),
        ]);
        assert_eq!(table.integer_bounds("exp"), Some((3, 17)));
        assert_eq!(table.integer_bounds("other"), None);
    }
}
