use std::fmt::Write;

use crate::data::columns;
use crate::data::model::Table;
use crate::error::EmptyDatasetError;
use crate::stats::metrics;

/// Build the batch-mode "Key Findings" console summary: overall mean stress,
/// grouped means by gender / department / remote work, and the correlation
/// of each numeric factor with stress.
pub fn key_findings(table: &Table) -> Result<String, EmptyDatasetError> {
    let overall = metrics::overall_mean(table, columns::STRESS_LEVEL)?;

    let mut output = String::new();
    let _ = writeln!(output, "Key Findings:");
    let _ = writeln!(output);
    let _ = writeln!(output, "Overall Average Stress Level: {overall:.2}");

    for (title, group_column) in [
        ("Gender", columns::GENDER),
        ("Department", columns::DEPARTMENT),
        ("Remote Work", columns::REMOTE_WORK),
    ] {
        let _ = writeln!(output);
        let _ = writeln!(output, "Average Stress Level by {title}:");
        let means = metrics::grouped_mean(table, group_column, columns::STRESS_LEVEL);
        if means.is_empty() {
            let _ = writeln!(output, "  (no groups)");
        }
        for (key, mean) in means {
            let _ = writeln!(output, "  {key:<24} {mean:>6.2}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Correlations with Stress Level:");
    let correlations = metrics::correlation_vector(
        table,
        columns::STRESS_LEVEL,
        &columns::CORRELATION[1..],
    );
    for (column, r) in correlations {
        let _ = writeln!(output, "  {column:<24} {r:>6.2}");
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader;

    const CSV: &str = "\
Stress_Level,Department,Gender,Age,Experience_Years,Working_Hours_per_Week,\
Monthly_Salary_INR,Sleep_Hours,Work_Life_Balance,Remote_Work,Job_Role
2,Sales,Female,30,5,40,50000,7,3,Yes,Analyst
4,Sales,Male,31,6,45,51000,6.5,2,No,Analyst
6,Eng,Female,32,7,50,72000,6,2,Yes,Engineer
8,Eng,Male,33,8,55,70000,5.5,1,No,Engineer
";

    #[test]
    fn summary_names_every_section() {
        let table = loader::load_reader(CSV.as_bytes()).unwrap();
        let summary = key_findings(&table).unwrap();
        assert!(summary.contains("Overall Average Stress Level: 5.00"));
        assert!(summary.contains("Average Stress Level by Gender:"));
        assert!(summary.contains("Average Stress Level by Department:"));
        assert!(summary.contains("Average Stress Level by Remote Work:"));
        assert!(summary.contains("Correlations with Stress Level:"));
        assert!(summary.contains("Sleep_Hours"));
    }

    #[test]
    fn grouped_sections_hold_the_expected_means() {
        let table = loader::load_reader(CSV.as_bytes()).unwrap();
        let summary = key_findings(&table).unwrap();
        // Sales mean 3.0, Eng mean 7.0.
        assert!(summary.contains("Sales"));
        assert!(summary.contains("3.00"));
        assert!(summary.contains("7.00"));
    }

    #[test]
    fn empty_table_is_a_hard_failure() {
        let table = crate::data::model::Table::from_records(Vec::new());
        assert!(key_findings(&table).is_err());
    }
}
