use std::collections::BTreeMap;

use crate::data::model::Table;
use crate::error::EmptyDatasetError;

// ---------------------------------------------------------------------------
// Scalar metrics
// ---------------------------------------------------------------------------

/// Arithmetic mean of a numeric column, skipping missing values.
///
/// The only hard failure is a table with zero records: the mean of an empty
/// set is undefined. A non-empty table whose column holds no usable values
/// yields `NaN` instead.
pub fn overall_mean(table: &Table, column: &str) -> Result<f64, EmptyDatasetError> {
    if table.is_empty() {
        return Err(EmptyDatasetError);
    }
    Ok(mean(&present_values(table, column)))
}

/// Median of a numeric column; `NaN` when the column holds no usable values.
pub fn median(table: &Table, column: &str) -> f64 {
    let mut values = present_values(table, column);
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    quantile_sorted(&values, 0.5)
}

/// Number of records whose value in `column` is strictly above `threshold`.
pub fn count_above(table: &Table, column: &str, threshold: f64) -> usize {
    table
        .records
        .iter()
        .filter_map(|r| r.numeric(column))
        .filter(|&v| v > threshold)
        .count()
}

// ---------------------------------------------------------------------------
// Grouped aggregation
// ---------------------------------------------------------------------------

/// Mean of `value_column` partitioned by the distinct values of
/// `group_column`, in sorted key order. Records with a missing group key are
/// dropped; a group with zero usable values maps to `NaN` rather than
/// failing.
pub fn grouped_mean(
    table: &Table,
    group_column: &str,
    value_column: &str,
) -> BTreeMap<String, f64> {
    let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for rec in &table.records {
        let Some(key) = rec.category(group_column) else {
            continue;
        };
        let entry = acc.entry(key).or_insert((0.0, 0));
        if let Some(v) = rec.numeric(value_column) {
            entry.0 += v;
            entry.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(key, (sum, n))| (key, finish_mean(sum, n)))
        .collect()
}

/// Two-key variant for the grouped-bar charts (e.g. remote work within each
/// department).
pub fn grouped_mean2(
    table: &Table,
    group_columns: (&str, &str),
    value_column: &str,
) -> BTreeMap<(String, String), f64> {
    let mut acc: BTreeMap<(String, String), (f64, usize)> = BTreeMap::new();
    for rec in &table.records {
        let (Some(a), Some(b)) = (
            rec.category(group_columns.0),
            rec.category(group_columns.1),
        ) else {
            continue;
        };
        let entry = acc.entry((a, b)).or_insert((0.0, 0));
        if let Some(v) = rec.numeric(value_column) {
            entry.0 += v;
            entry.1 += 1;
        }
    }
    acc.into_iter()
        .map(|(key, (sum, n))| (key, finish_mean(sum, n)))
        .collect()
}

/// Count, mean, and sample standard deviation of one group's values.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n−1); `NaN` for fewer than two values.
    pub std: f64,
}

/// Per-group count/mean/std of `value_column`, keyed and ordered like
/// [`grouped_mean`].
pub fn grouped_summary(
    table: &Table,
    group_column: &str,
    value_column: &str,
) -> BTreeMap<String, GroupSummary> {
    let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for rec in &table.records {
        let Some(key) = rec.category(group_column) else {
            continue;
        };
        let values = buckets.entry(key).or_default();
        if let Some(v) = rec.numeric(value_column) {
            values.push(v);
        }
    }
    buckets
        .into_iter()
        .map(|(key, values)| (key, summarize(&values)))
        .collect()
}

pub(crate) fn summarize(values: &[f64]) -> GroupSummary {
    let count = values.len();
    let mean = mean(values);
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };
    GroupSummary { count, mean, std }
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pearson correlation over pairwise-complete observations. `NaN` when
/// either side has zero variance or fewer than two pairs survive.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| match (x, y) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0)
}

/// Pearson correlation of each listed column against `target_column`, in
/// the caller's column order.
pub fn correlation_vector(
    table: &Table,
    target_column: &str,
    other_columns: &[&str],
) -> Vec<(String, f64)> {
    let target = table.numeric_column(target_column);
    other_columns
        .iter()
        .map(|&col| (col.to_string(), pearson(&target, &table.numeric_column(col))))
        .collect()
}

/// Pairwise Pearson correlation matrix over `columns`, symmetric with a
/// diagonal of exactly 1.0. Values are stored at full precision; rounding
/// happens only at the presentation boundary via [`round_matrix`].
pub fn correlation_matrix(table: &Table, columns: &[&str]) -> Vec<Vec<f64>> {
    let series: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|&col| table.numeric_column(col))
        .collect();

    let n = columns.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&series[i], &series[j]);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

/// Presentation-boundary rounding of a correlation matrix.
pub fn round_matrix(matrix: &[Vec<f64>], decimals: u32) -> Vec<Vec<f64>> {
    let factor = 10f64.powi(decimals as i32);
    matrix
        .iter()
        .map(|row| row.iter().map(|v| (v * factor).round() / factor).collect())
        .collect()
}

// ---------------------------------------------------------------------------
// Distribution helpers (histograms, box charts)
// ---------------------------------------------------------------------------

/// Equal-width bin counts of `values` over `range`, as (bin center, count).
/// Values outside the range are dropped; the upper edge lands in the last bin.
pub fn histogram_counts(values: &[f64], bins: usize, range: (f64, f64)) -> Vec<(f64, usize)> {
    let (lo, hi) = range;
    if bins == 0 || !(hi > lo) {
        return Vec::new();
    }
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        if !v.is_finite() || v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| (lo + (i as f64 + 0.5) * width, count))
        .collect()
}

/// Five-number summary for box charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Five-number summary of the usable values; `None` when there are none.
pub fn quartiles(values: &[f64]) -> Option<Quartiles> {
    let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if vals.is_empty() {
        return None;
    }
    vals.sort_by(|a, b| a.total_cmp(b));
    Some(Quartiles {
        min: vals[0],
        q1: quantile_sorted(&vals, 0.25),
        median: quantile_sorted(&vals, 0.5),
        q3: quantile_sorted(&vals, 0.75),
        max: vals[vals.len() - 1],
    })
}

/// Linear-interpolation quantile of an already sorted, non-empty slice.
pub(crate) fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// -- shared internals --

fn present_values(table: &Table, column: &str) -> Vec<f64> {
    table
        .records
        .iter()
        .filter_map(|r| r.numeric(column))
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn finish_mean(sum: f64, n: usize) -> f64 {
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns;
    use crate::data::filter::{self, FilterSelection};
    use crate::data::model::{CellValue, Record, Table};
    use std::collections::{BTreeMap, BTreeSet};

    fn stress_record(dept: &str, stress: Option<f64>, experience: i64) -> Record {
        let mut fields = BTreeMap::new();
        fields.insert(
            columns::DEPARTMENT.to_string(),
            CellValue::String(dept.to_string()),
        );
        fields.insert(
            columns::STRESS_LEVEL.to_string(),
            match stress {
                Some(v) => CellValue::Float(v),
                None => CellValue::Null,
            },
        );
        fields.insert(
            columns::EXPERIENCE_YEARS.to_string(),
            CellValue::Integer(experience),
        );
        Record { fields }
    }

    /// 5 Sales records with stress [2,4,6,8,10] and 5 Eng records with all 1s.
    fn two_department_table() -> Table {
        let mut records = Vec::new();
        for v in [2.0, 4.0, 6.0, 8.0, 10.0] {
            records.push(stress_record("Sales", Some(v), 5));
        }
        for _ in 0..5 {
            records.push(stress_record("Eng", Some(1.0), 5));
        }
        Table::from_records(records)
    }

    #[test]
    fn overall_and_grouped_means_match_reference_scenario() {
        let table = two_department_table();
        let overall = overall_mean(&table, columns::STRESS_LEVEL).unwrap();
        assert!((overall - 3.5).abs() < 1e-12);

        let by_dept = grouped_mean(&table, columns::DEPARTMENT, columns::STRESS_LEVEL);
        assert_eq!(by_dept.len(), 2);
        assert!((by_dept["Sales"] - 6.0).abs() < 1e-12);
        assert!((by_dept["Eng"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn grouped_mean_agrees_with_filtered_overall_mean() {
        let table = two_department_table();
        let by_dept = grouped_mean(&table, columns::DEPARTMENT, columns::STRESS_LEVEL);

        let mut departments = BTreeSet::new();
        departments.insert("Sales".to_string());
        let sales_only = filter::apply(
            &table,
            &FilterSelection {
                departments,
                genders: BTreeSet::new(),
                experience: (0, 40),
            },
        );
        let sales_mean = overall_mean(&sales_only, columns::STRESS_LEVEL).unwrap();
        assert!((by_dept["Sales"] - sales_mean).abs() < 1e-12);
    }

    #[test]
    fn overall_mean_of_zero_records_is_an_error() {
        let table = Table::from_records(Vec::new());
        assert_eq!(
            overall_mean(&table, columns::STRESS_LEVEL),
            Err(EmptyDatasetError)
        );
    }

    #[test]
    fn all_missing_column_yields_nan_not_error() {
        let table = Table::from_records(vec![
            stress_record("Sales", None, 5),
            stress_record("Sales", None, 5),
        ]);
        let overall = overall_mean(&table, columns::STRESS_LEVEL).unwrap();
        assert!(overall.is_nan());

        let by_dept = grouped_mean(&table, columns::DEPARTMENT, columns::STRESS_LEVEL);
        assert!(by_dept["Sales"].is_nan());
    }

    #[test]
    fn grouped_mean_skips_missing_values_within_a_group() {
        let table = Table::from_records(vec![
            stress_record("Sales", Some(4.0), 5),
            stress_record("Sales", None, 5),
            stress_record("Sales", Some(8.0), 5),
        ]);
        let by_dept = grouped_mean(&table, columns::DEPARTMENT, columns::STRESS_LEVEL);
        assert!((by_dept["Sales"] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn grouped_summary_uses_sample_std() {
        let summary = summarize(&[2.0, 4.0, 6.0]);
        assert_eq!(summary.count, 3);
        assert!((summary.mean - 4.0).abs() < 1e-12);
        assert!((summary.std - 2.0).abs() < 1e-12);
        assert!(summarize(&[5.0]).std.is_nan());
    }

    #[test]
    fn pearson_detects_exact_linear_relationships() {
        let xs: Vec<Option<f64>> = (0..10).map(|i| Some(i as f64)).collect();
        let up: Vec<Option<f64>> = (0..10).map(|i| Some(2.0 * i as f64 + 1.0)).collect();
        let down: Vec<Option<f64>> = (0..10).map(|i| Some(-(i as f64))).collect();
        assert!((pearson(&xs, &up) - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &down) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_is_nan_on_zero_variance_or_short_input() {
        let xs: Vec<Option<f64>> = vec![Some(1.0), Some(2.0), Some(3.0)];
        let flat: Vec<Option<f64>> = vec![Some(7.0), Some(7.0), Some(7.0)];
        assert!(pearson(&xs, &flat).is_nan());
        assert!(pearson(&xs[..1], &flat[..1]).is_nan());
    }

    #[test]
    fn pearson_uses_pairwise_complete_observations() {
        let xs = vec![Some(1.0), None, Some(3.0), Some(4.0)];
        let ys = vec![Some(2.0), Some(9.0), None, Some(8.0)];
        // Only rows 0 and 3 are complete: (1,2) and (4,8), perfectly linear.
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let mut records = Vec::new();
        for i in 0..20 {
            let mut fields = BTreeMap::new();
            fields.insert(
                columns::STRESS_LEVEL.to_string(),
                CellValue::Float((i % 7) as f64),
            );
            fields.insert(columns::AGE.to_string(), CellValue::Integer(25 + i));
            fields.insert(
                columns::SLEEP_HOURS.to_string(),
                CellValue::Float(8.0 - 0.1 * i as f64),
            );
            records.push(Record { fields });
        }
        let table = Table::from_records(records);
        let cols = [columns::STRESS_LEVEL, columns::AGE, columns::SLEEP_HOURS];
        let matrix = correlation_matrix(&table, &cols);

        for i in 0..cols.len() {
            assert_eq!(matrix[i][i], 1.0);
            for j in 0..cols.len() {
                let a = matrix[i][j];
                let b = matrix[j][i];
                assert!(a == b || (a.is_nan() && b.is_nan()));
                assert!(a.is_nan() || (-1.0..=1.0).contains(&a));
            }
        }
        // Age and sleep are exactly linear (negatively).
        assert!((matrix[1][2] + 1.0).abs() < 1e-9);
    }

    #[test]
    fn rounding_is_presentation_only() {
        let matrix = vec![vec![1.0, 0.123_456], vec![0.123_456, 1.0]];
        let rounded = round_matrix(&matrix, 2);
        assert_eq!(rounded[0][1], 0.12);
        // The source matrix keeps its precision.
        assert_eq!(matrix[0][1], 0.123_456);
    }

    #[test]
    fn histogram_counts_cover_the_full_range() {
        let values = [0.0, 0.4, 5.0, 9.9, 10.0, 11.0, -1.0];
        let bins = histogram_counts(&values, 11, (-0.5, 10.5));
        assert_eq!(bins.len(), 11);
        let total: usize = bins.iter().map(|(_, c)| c).sum();
        // -1.0 and 11.0 fall outside the range.
        assert_eq!(total, 5);
        assert!((bins[0].0 - 0.0).abs() < 1e-12);
        assert_eq!(bins[10].1, 1);
    }

    #[test]
    fn quartiles_match_linear_interpolation() {
        let q = quartiles(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(q.min, 1.0);
        assert!((q.q1 - 1.75).abs() < 1e-12);
        assert!((q.median - 2.5).abs() < 1e-12);
        assert!((q.q3 - 3.25).abs() < 1e-12);
        assert_eq!(q.max, 4.0);
        assert!(quartiles(&[]).is_none());
    }

    #[test]
    fn median_ignores_missing_values() {
        let table = Table::from_records(vec![
            stress_record("Sales", Some(2.0), 1),
            stress_record("Sales", None, 1),
            stress_record("Sales", Some(4.0), 1),
        ]);
        assert!((median(&table, columns::STRESS_LEVEL) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn count_above_is_strict() {
        let table = two_department_table();
        // Sales values above 7: 8 and 10.
        assert_eq!(count_above(&table, columns::STRESS_LEVEL, 7.0), 2);
        assert_eq!(count_above(&table, columns::STRESS_LEVEL, 10.0), 0);
    }
}
