use std::collections::BTreeMap;

use crate::data::columns;
use crate::data::model::Table;

use super::metrics::{quantile_sorted, summarize, GroupSummary};

// ---------------------------------------------------------------------------
// Fixed-edge bucketization
// ---------------------------------------------------------------------------

/// A named set of fixed bin edges with one label per interval.
#[derive(Debug, Clone)]
pub struct Bands {
    pub column: &'static str,
    pub edges: Vec<f64>,
    pub labels: Vec<&'static str>,
}

impl Bands {
    /// Row-indexed labels for the band's column over `table`.
    pub fn apply(&self, table: &Table) -> Vec<Option<String>> {
        bucketize(table, self.column, &self.edges, &self.labels)
    }
}

/// Sleep duration bands used by the sleep-pattern charts.
pub fn sleep_category() -> Bands {
    Bands {
        column: columns::SLEEP_HOURS,
        edges: vec![0.0, 6.0, 7.0, 8.0, 12.0],
        labels: vec!["< 6 hours", "6-7 hours", "7-8 hours", "> 8 hours"],
    }
}

/// Finer sleep bands used by the health charts.
pub fn sleep_quality() -> Bands {
    Bands {
        column: columns::SLEEP_HOURS,
        edges: vec![0.0, 5.0, 6.0, 7.0, 8.0, 12.0],
        labels: vec!["Very Poor", "Poor", "Fair", "Good", "Excellent"],
    }
}

/// Stress-level bands for the burnout charts.
pub fn burnout_risk() -> Bands {
    Bands {
        column: columns::STRESS_LEVEL,
        edges: vec![0.0, 3.0, 6.0, 8.0, 10.0],
        labels: vec!["Low", "Moderate", "High", "Severe"],
    }
}

/// Age decade bands for the demographics charts.
pub fn age_group() -> Bands {
    Bands {
        column: columns::AGE,
        edges: vec![20.0, 30.0, 40.0, 50.0, 60.0],
        labels: vec!["20-30", "31-40", "41-50", "51-60"],
    }
}

/// Labels for the working-hours quartile buckets.
pub const ACTIVITY_LABELS: [&str; 4] = ["Low", "Moderate", "High", "Very High"];

/// Assign each record the label of the interval its value falls into.
///
/// `edges` must be strictly increasing with `labels.len() + 1` entries.
/// Intervals are `[edges[i], edges[i+1])` with the final interval closed on
/// both ends, so the edge range is partitioned with no gaps: a value equal
/// to an interior edge belongs to the higher bucket (6.0 with edges
/// `[0, 6, 7, 8, 12]` reads as "6-7", not "< 6"). Values outside the edge
/// range map to missing, not to the nearest bucket.
pub fn bucketize(
    table: &Table,
    column: &str,
    edges: &[f64],
    labels: &[&str],
) -> Vec<Option<String>> {
    assert_eq!(
        labels.len() + 1,
        edges.len(),
        "need exactly one label per interval"
    );
    assert!(
        edges.windows(2).all(|w| w[0] < w[1]),
        "bin edges must be strictly increasing"
    );

    table
        .numeric_column(column)
        .into_iter()
        .map(|value| {
            let v = value?;
            fixed_bucket(v, edges).map(|i| labels[i].to_string())
        })
        .collect()
}

fn fixed_bucket(v: f64, edges: &[f64]) -> Option<usize> {
    let last = edges.len() - 1;
    if v < edges[0] || v > edges[last] {
        return None;
    }
    if v == edges[last] {
        return Some(last - 1);
    }
    edges.windows(2).position(|w| v >= w[0] && v < w[1])
}

// ---------------------------------------------------------------------------
// Quantile bucketization
// ---------------------------------------------------------------------------

/// `q`-quantile boundaries of the usable values, by linear interpolation.
/// `None` when there are fewer than two values or the edges collapse
/// (a column without enough spread cannot be split into quantile buckets).
pub fn quantile_edges(values: &[Option<f64>], q: usize) -> Option<Vec<f64>> {
    if q == 0 {
        return None;
    }
    let mut sorted: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .collect();
    if sorted.len() < 2 {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let edges: Vec<f64> = (0..=q)
        .map(|i| quantile_sorted(&sorted, i as f64 / q as f64))
        .collect();
    if edges.windows(2).all(|w| w[0] < w[1]) {
        Some(edges)
    } else {
        None
    }
}

/// Bucketize by the column's own quantile boundaries, recomputed from the
/// CURRENT table on every call. Filtering first therefore shifts the
/// boundaries; that view-dependence is the intended contract. Ties at a
/// boundary fall into the lower-indexed bucket.
pub fn quantile_bucketize(
    table: &Table,
    column: &str,
    q: usize,
    labels: &[&str],
) -> Vec<Option<String>> {
    assert_eq!(labels.len(), q, "need exactly one label per quantile bucket");

    let values = table.numeric_column(column);
    let Some(edges) = quantile_edges(&values, q) else {
        return vec![None; values.len()];
    };

    values
        .into_iter()
        .map(|value| {
            let v = value?;
            quantile_bucket(v, &edges).map(|i| labels[i].to_string())
        })
        .collect()
}

fn quantile_bucket(v: f64, edges: &[f64]) -> Option<usize> {
    let last = edges.len() - 1;
    if v < edges[0] || v > edges[last] {
        return None;
    }
    if v == edges[0] {
        return Some(0);
    }
    edges.windows(2).position(|w| v > w[0] && v <= w[1])
}

/// Working-hours quartile labels over the current view.
pub fn activity_level(table: &Table) -> Vec<Option<String>> {
    quantile_bucketize(table, columns::WORKING_HOURS, 4, &ACTIVITY_LABELS)
}

// ---------------------------------------------------------------------------
// Derived boolean split: overtime
// ---------------------------------------------------------------------------

/// Whether each record works more than the view's median weekly hours.
/// The threshold is a function of the current (possibly filtered) table.
pub fn overtime_flags(table: &Table) -> Vec<Option<bool>> {
    let threshold = super::metrics::median(table, columns::WORKING_HOURS);
    table
        .numeric_column(columns::WORKING_HOURS)
        .into_iter()
        .map(|value| {
            if threshold.is_nan() {
                return None;
            }
            value.map(|v| v > threshold)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregation over derived labels
// ---------------------------------------------------------------------------

/// Occurrences of each label, reported in the band's own label order.
pub fn label_counts(row_labels: &[Option<String>], ordered: &[&str]) -> Vec<(String, usize)> {
    ordered
        .iter()
        .map(|&label| {
            let count = row_labels
                .iter()
                .filter(|l| l.as_deref() == Some(label))
                .count();
            (label.to_string(), count)
        })
        .collect()
}

/// Mean of `value_column` within each label bucket, in band label order.
/// Empty buckets yield `NaN`.
pub fn mean_by_label(
    table: &Table,
    row_labels: &[Option<String>],
    value_column: &str,
    ordered: &[&str],
) -> Vec<(String, f64)> {
    summary_by_label(table, row_labels, value_column, ordered)
        .into_iter()
        .map(|(label, summary)| (label, summary.mean))
        .collect()
}

/// Count/mean/std of `value_column` within each label bucket, in band label
/// order.
pub fn summary_by_label(
    table: &Table,
    row_labels: &[Option<String>],
    value_column: &str,
    ordered: &[&str],
) -> Vec<(String, GroupSummary)> {
    let values = table.numeric_column(value_column);
    ordered
        .iter()
        .map(|&label| {
            let bucket: Vec<f64> = row_labels
                .iter()
                .zip(&values)
                .filter(|(l, _)| l.as_deref() == Some(label))
                .filter_map(|(_, v)| *v)
                .collect();
            (label.to_string(), summarize(&bucket))
        })
        .collect()
}

/// Mean of `value_column` for each (category, flag) pair, for the grouped
/// overtime charts. Rows with a missing category or flag are dropped.
pub fn mean_by_category_and_flag(
    table: &Table,
    category_column: &str,
    flags: &[Option<bool>],
    value_column: &str,
) -> BTreeMap<(String, bool), f64> {
    let mut acc: BTreeMap<(String, bool), (f64, usize)> = BTreeMap::new();
    for (rec, flag) in table.records.iter().zip(flags) {
        let (Some(category), Some(flag)) = (rec.category(category_column), *flag) else {
            continue;
        };
        let entry = acc.entry((category, flag)).or_insert((0.0, 0));
        if let Some(v) = rec.numeric(value_column) {
            entry.0 += v;
            entry.1 += 1;
        }
    }
    acc.into_iter()
        .map(|((category, flag), (sum, n))| {
            let mean = if n == 0 { f64::NAN } else { sum / n as f64 };
            ((category, flag), mean)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{self, FilterSelection};
    use crate::data::model::{CellValue, Record};
    use std::collections::BTreeMap;

    fn table_with(column: &str, values: &[Option<f64>]) -> Table {
        let records = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut fields = BTreeMap::new();
                fields.insert(
                    column.to_string(),
                    match v {
                        Some(v) => CellValue::Float(*v),
                        None => CellValue::Null,
                    },
                );
                fields.insert(
                    columns::EXPERIENCE_YEARS.to_string(),
                    CellValue::Integer(i as i64),
                );
                Record { fields }
            })
            .collect();
        Table::from_records(records)
    }

    #[test]
    fn interior_edge_values_fall_into_the_higher_bucket() {
        let table = table_with(columns::SLEEP_HOURS, &[Some(6.0)]);
        let labels = sleep_category().apply(&table);
        assert_eq!(labels[0].as_deref(), Some("6-7 hours"));
    }

    #[test]
    fn bucketize_partitions_the_edge_range() {
        let table = table_with(
            columns::SLEEP_HOURS,
            &[
                Some(0.0),
                Some(3.0),
                Some(6.5),
                Some(7.0),
                Some(8.0),
                Some(11.9),
                Some(12.0),
            ],
        );
        let labels = sleep_category().apply(&table);
        let got: Vec<&str> = labels.iter().map(|l| l.as_deref().unwrap()).collect();
        assert_eq!(
            got,
            vec![
                "< 6 hours",
                "< 6 hours",
                "6-7 hours",
                "7-8 hours",
                "> 8 hours",
                "> 8 hours",
                "> 8 hours",
            ]
        );
    }

    #[test]
    fn out_of_range_and_missing_values_map_to_missing() {
        let table = table_with(
            columns::SLEEP_HOURS,
            &[Some(-1.0), Some(12.5), None],
        );
        let labels = sleep_category().apply(&table);
        assert!(labels.iter().all(|l| l.is_none()));
    }

    #[test]
    fn burnout_bands_cover_the_stress_scale() {
        let table = table_with(
            columns::STRESS_LEVEL,
            &[Some(1.0), Some(3.0), Some(5.0), Some(7.5), Some(10.0)],
        );
        let labels = burnout_risk().apply(&table);
        let got: Vec<&str> = labels.iter().map(|l| l.as_deref().unwrap()).collect();
        assert_eq!(got, vec!["Low", "Moderate", "Moderate", "High", "Severe"]);
    }

    #[test]
    fn quantile_edges_split_evenly_spaced_data() {
        let values: Vec<Option<f64>> = (0..=8).map(|i| Some(i as f64)).collect();
        let edges = quantile_edges(&values, 4).unwrap();
        assert_eq!(edges, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn quantile_ties_fall_into_the_lower_bucket() {
        let values: Vec<Option<f64>> = (0..=8).map(|i| Some(i as f64)).collect();
        let table = table_with(columns::WORKING_HOURS, &values);
        let labels = activity_level(&table);
        // 2.0 sits exactly on the first boundary → "Low", not "Moderate".
        assert_eq!(labels[2].as_deref(), Some("Low"));
        assert_eq!(labels[0].as_deref(), Some("Low"));
        assert_eq!(labels[8].as_deref(), Some("Very High"));
    }

    #[test]
    fn quantile_edges_follow_the_filtered_view() {
        let values: Vec<Option<f64>> = (0..20).map(|i| Some(i as f64)).collect();
        let table = table_with(columns::WORKING_HOURS, &values);

        let full_edges =
            quantile_edges(&table.numeric_column(columns::WORKING_HOURS), 4).unwrap();

        // Keep only the upper half of the data; boundaries must move with it.
        let filtered = filter::apply(&table, &FilterSelection::unrestricted((10, 19)));
        let filtered_edges =
            quantile_edges(&filtered.numeric_column(columns::WORKING_HOURS), 4).unwrap();

        assert_ne!(full_edges, filtered_edges);
        assert_eq!(filtered_edges[0], 10.0);
        assert_eq!(filtered_edges[4], 19.0);
    }

    #[test]
    fn degenerate_columns_produce_no_quantile_buckets() {
        let table = table_with(
            columns::WORKING_HOURS,
            &[Some(40.0), Some(40.0), Some(40.0)],
        );
        let labels = activity_level(&table);
        assert!(labels.iter().all(|l| l.is_none()));
    }

    #[test]
    fn overtime_splits_at_the_view_median() {
        let table = table_with(
            columns::WORKING_HOURS,
            &[Some(30.0), Some(40.0), Some(50.0), None],
        );
        let flags = overtime_flags(&table);
        assert_eq!(flags, vec![Some(false), Some(false), Some(true), None]);
    }

    #[test]
    fn label_aggregation_keeps_band_order() {
        let table = table_with(
            columns::SLEEP_HOURS,
            &[Some(5.0), Some(6.5), Some(6.7), Some(9.0)],
        );
        let bands = sleep_category();
        let labels = bands.apply(&table);

        let counts = label_counts(&labels, &bands.labels);
        let names: Vec<&str> = counts.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(names, bands.labels);
        assert_eq!(counts[1].1, 2);
        assert_eq!(counts[2].1, 0);

        let means = mean_by_label(&table, &labels, columns::SLEEP_HOURS, &bands.labels);
        assert!((means[1].1 - 6.6).abs() < 1e-12);
        assert!(means[2].1.is_nan());
    }

    #[test]
    fn category_flag_means_group_both_keys() {
        let mut records = Vec::new();
        for (dept, hours, stress) in [
            ("Sales", 30.0, 2.0),
            ("Sales", 50.0, 8.0),
            ("Eng", 30.0, 4.0),
            ("Eng", 50.0, 6.0),
        ] {
            let mut fields = BTreeMap::new();
            fields.insert(
                columns::DEPARTMENT.to_string(),
                CellValue::String(dept.to_string()),
            );
            fields.insert(columns::WORKING_HOURS.to_string(), CellValue::Float(hours));
            fields.insert(columns::STRESS_LEVEL.to_string(), CellValue::Float(stress));
            records.push(Record { fields });
        }
        let table = Table::from_records(records);
        let flags = overtime_flags(&table);
        let means =
            mean_by_category_and_flag(&table, columns::DEPARTMENT, &flags, columns::STRESS_LEVEL);
        assert_eq!(means.len(), 4);
        assert!((means[&("Sales".to_string(), true)] - 8.0).abs() < 1e-12);
        assert!((means[&("Eng".to_string(), false)] - 4.0).abs() < 1e-12);
    }
}
