//! Canonical column names of the corporate stress dataset (case-sensitive).

pub const STRESS_LEVEL: &str = "Stress_Level";
pub const DEPARTMENT: &str = "Department";
pub const GENDER: &str = "Gender";
pub const AGE: &str = "Age";
pub const EXPERIENCE_YEARS: &str = "Experience_Years";
pub const WORKING_HOURS: &str = "Working_Hours_per_Week";
pub const MONTHLY_SALARY: &str = "Monthly_Salary_INR";
pub const SLEEP_HOURS: &str = "Sleep_Hours";
pub const WORK_LIFE_BALANCE: &str = "Work_Life_Balance";
pub const REMOTE_WORK: &str = "Remote_Work";
pub const JOB_ROLE: &str = "Job_Role";

/// Columns every input file must carry. Extra columns are kept but ignored.
pub const REQUIRED: &[&str] = &[
    STRESS_LEVEL,
    DEPARTMENT,
    GENDER,
    AGE,
    EXPERIENCE_YEARS,
    WORKING_HOURS,
    MONTHLY_SALARY,
    SLEEP_HOURS,
    WORK_LIFE_BALANCE,
    REMOTE_WORK,
    JOB_ROLE,
];

/// Columns coerced to numeric after load; unparseable cells become `Null`.
pub const NUMERIC: &[&str] = &[
    STRESS_LEVEL,
    AGE,
    EXPERIENCE_YEARS,
    WORKING_HOURS,
    MONTHLY_SALARY,
    SLEEP_HOURS,
    WORK_LIFE_BALANCE,
];

/// Column order used by the correlation analyses.
pub const CORRELATION: &[&str] = &[
    STRESS_LEVEL,
    AGE,
    WORKING_HOURS,
    MONTHLY_SALARY,
    SLEEP_HOURS,
    WORK_LIFE_BALANCE,
];
