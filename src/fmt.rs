use chrono::NaiveDate;

/// Format a date the way it appears in task names and documents: 01 March 2024
pub fn long_date(date: NaiveDate) -> String {
    date.format("%d %B %Y").to_string()
}

/// Format an optional date for tables, blank when absent.
pub fn opt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

pub fn percent(done: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.0}%", done as f64 * 100.0 / total as f64)
}
