use std::collections::BTreeSet;

use super::columns;
use super::model::{Record, Table};

// ---------------------------------------------------------------------------
// Filter selection: the three dashboard controls
// ---------------------------------------------------------------------------

/// The user-facing filter controls: which departments and genders are
/// selected, plus the inclusive experience-years range.
///
/// An empty department or gender set means "no restriction": an empty
/// multi-select in the dashboard reads as "select all", never as
/// "select none".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    pub departments: BTreeSet<String>,
    pub genders: BTreeSet<String>,
    /// Inclusive lower/upper bound on `Experience_Years`.
    pub experience: (i64, i64),
}

impl FilterSelection {
    /// No category restriction, with the given experience range.
    pub fn unrestricted(experience: (i64, i64)) -> Self {
        FilterSelection {
            departments: BTreeSet::new(),
            genders: BTreeSet::new(),
            experience,
        }
    }
}

/// Apply the conjunction of all active predicates, producing a new table
/// with exactly the matching records in their original order. The input
/// table is never mutated.
pub fn apply(table: &Table, selection: &FilterSelection) -> Table {
    let records: Vec<Record> = table
        .records
        .iter()
        .filter(|rec| matches(rec, selection))
        .cloned()
        .collect();
    Table::from_records(records)
}

fn matches(record: &Record, selection: &FilterSelection) -> bool {
    member_of(record, columns::DEPARTMENT, &selection.departments)
        && member_of(record, columns::GENDER, &selection.genders)
        && in_experience_range(record, selection.experience)
}

fn member_of(record: &Record, column: &str, selected: &BTreeSet<String>) -> bool {
    if selected.is_empty() {
        return true;
    }
    match record.category(column) {
        Some(value) => selected.contains(&value),
        None => false,
    }
}

fn in_experience_range(record: &Record, (lo, hi): (i64, i64)) -> bool {
    match record.numeric(columns::EXPERIENCE_YEARS) {
        Some(v) => v >= lo as f64 && v <= hi as f64,
        None => false,
    }
}
