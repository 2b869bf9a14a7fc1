use chrono::{Datelike, Days, Months, NaiveDate};

use crate::fmt::long_date;

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june", "july", "august", "september",
    "october", "november", "december",
];

/// Year-end month assumed when the label names no month.
pub const DEFAULT_YEAR_END_MONTH: u32 = 2;

/// Task descriptions for the financial records requested from the previous agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancialPeriodSet {
    pub current_period: String,
    pub historic_period: String,
    pub bank_statements: String,
    pub owner_balances: String,
    pub closing_balances: String,
}

impl FinancialPeriodSet {
    /// Generic wording used when the take-on date cannot be worked with.
    pub fn fallback() -> Self {
        Self {
            current_period: "Current financial year records up to the month before take-on".to_string(),
            historic_period: "Historic financial records for the previous 5 financial years".to_string(),
            bank_statements: "Bank statements for the month before take-on to date, plus proof of transfer of funds".to_string(),
            owner_balances: "Owner balances (age analysis) as at the month end before take-on".to_string(),
            closing_balances: "Closing balances and transfer of funds within 10 days of take-on".to_string(),
        }
    }
}

/// The dates behind a complex's financial requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinancialPeriods {
    pub take_on: NaiveDate,
    pub request_end: NaiveDate,
    pub current_start: NaiveDate,
    pub historic_start: NaiveDate,
    pub historic_end: NaiveDate,
    pub bank_from: NaiveDate,
    pub closing_by: NaiveDate,
}

impl FinancialPeriods {
    /// Derive the periods for a take-on date and a year-end month (1-12).
    /// Returns `None` if any of the date arithmetic leaves chrono's range.
    pub fn compute(take_on: NaiveDate, year_end_month: u32) -> Option<Self> {
        let request_end = take_on.with_day(1)?.pred_opt()?;
        let start_month = year_end_month % 12 + 1;

        let mut year = request_end.year();
        if start_month > request_end.month() {
            year -= 1;
        }
        let mut current_start = NaiveDate::from_ymd_opt(year, start_month, 1)?;
        if current_start > request_end {
            current_start = current_start.checked_sub_months(Months::new(12))?;
        }

        Some(Self {
            take_on,
            request_end,
            current_start,
            historic_start: current_start.checked_sub_months(Months::new(60))?,
            historic_end: current_start.pred_opt()?,
            bank_from: take_on.checked_sub_months(Months::new(1))?,
            closing_by: take_on.checked_add_days(Days::new(10))?,
        })
    }

    /// The day before take-on, used for final reconciliation style requests.
    pub fn day_before_take_on(&self) -> Option<NaiveDate> {
        self.take_on.pred_opt()
    }

    pub fn current_span(&self) -> String {
        format!("{} to {}", long_date(self.current_start), long_date(self.request_end))
    }

    pub fn historic_span(&self) -> String {
        format!("{} to {}", long_date(self.historic_start), long_date(self.historic_end))
    }

    pub fn describe(&self) -> FinancialPeriodSet {
        FinancialPeriodSet {
            current_period: format!("Current financial year records: {}", self.current_span()),
            historic_period: format!("Historic financial records (5 years): {}", self.historic_span()),
            bank_statements: format!(
                "Bank statements from {} to date of take-on, plus proof of transfer of funds",
                long_date(self.bank_from)
            ),
            owner_balances: format!(
                "Owner balances (age analysis) as at {}",
                long_date(self.request_end)
            ),
            closing_balances: format!(
                "Closing balances and transfer of all funds by {}",
                long_date(self.closing_by)
            ),
        }
    }
}

/// Find the year-end month named in a free-text label such as "February",
/// "Feb" or "Year end: end of June". Only whole words count; a full month
/// name anywhere in the label wins over an abbreviation, and otherwise the
/// first abbreviated word decides.
pub fn year_end_month(label: &str) -> u32 {
    let lower = label.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .collect();
    let full = words.iter().find_map(|w| MONTHS.iter().position(|m| m == w));
    let abbreviated = || {
        words
            .iter()
            .filter(|w| w.len() >= 3)
            .find_map(|w| MONTHS.iter().position(|m| m.starts_with(*w)))
    };
    match full.or_else(abbreviated) {
        Some(i) => i as u32 + 1,
        None => DEFAULT_YEAR_END_MONTH,
    }
}

pub fn parse_take_on(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Resolve the typed periods for a take-on date string and year-end label.
pub fn resolve(take_on_date: &str, year_end_label: &str) -> Option<FinancialPeriods> {
    let take_on = parse_take_on(take_on_date)?;
    FinancialPeriods::compute(take_on, year_end_month(year_end_label))
}

/// Build the five financial task descriptions for a complex. Bad input never
/// fails: it degrades to `FinancialPeriodSet::fallback()`.
pub fn calculate_financial_periods(take_on_date: &str, year_end_label: &str) -> FinancialPeriodSet {
    match resolve(take_on_date, year_end_label) {
        Some(periods) => periods.describe(),
        None => {
            tracing::warn!(take_on_date, year_end_label, "unusable take-on date, using generic period text");
            FinancialPeriodSet::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_leap_year_february_year_end() {
        let p = resolve("2024-03-15", "February Year End").unwrap();
        assert_eq!(p.request_end, day(2024, 2, 29));
        assert_eq!(p.current_start, day(2023, 3, 1));
        let set = calculate_financial_periods("2024-03-15", "February Year End");
        assert_eq!(set.current_period, "Current financial year records: 01 March 2023 to 29 February 2024");
    }

    #[test]
    fn test_historic_window_is_five_years() {
        let p = resolve("2024-03-15", "February").unwrap();
        assert_eq!(p.historic_start, day(2018, 3, 1));
        assert_eq!(p.historic_end, day(2023, 2, 28));
        let set = p.describe();
        assert_eq!(
            set.historic_period,
            "Historic financial records (5 years): 01 March 2018 to 28 February 2023"
        );
    }

    #[test]
    fn test_other_descriptions() {
        let set = calculate_financial_periods("2024-03-15", "Feb");
        assert_eq!(
            set.bank_statements,
            "Bank statements from 15 February 2024 to date of take-on, plus proof of transfer of funds"
        );
        assert_eq!(set.owner_balances, "Owner balances (age analysis) as at 29 February 2024");
        assert_eq!(set.closing_balances, "Closing balances and transfer of all funds by 25 March 2024");
    }

    #[test]
    fn test_take_on_in_first_month_of_financial_year() {
        // Take-on in March with a February year-end: the whole previous year is current.
        let p = resolve("2023-03-01", "February").unwrap();
        assert_eq!(p.request_end, day(2023, 2, 28));
        assert_eq!(p.current_start, day(2022, 3, 1));
    }

    #[test]
    fn test_take_on_mid_financial_year() {
        let p = resolve("2024-07-10", "February").unwrap();
        assert_eq!(p.request_end, day(2024, 6, 30));
        assert_eq!(p.current_start, day(2024, 3, 1));
    }

    #[test]
    fn test_december_year_end_wraps_to_january() {
        let p = resolve("2024-05-20", "December").unwrap();
        assert_eq!(p.current_start, day(2024, 1, 1));
        assert_eq!(p.request_end, day(2024, 4, 30));

        // January take-on: request end is 31 December, a full calendar year.
        let p = resolve("2024-01-05", "Dec").unwrap();
        assert_eq!(p.request_end, day(2023, 12, 31));
        assert_eq!(p.current_start, day(2023, 1, 1));
    }

    #[test]
    fn test_year_end_label_matching() {
        assert_eq!(year_end_month("February"), 2);
        assert_eq!(year_end_month("feb"), 2);
        assert_eq!(year_end_month("JUNE year end"), 6);
        assert_eq!(year_end_month("Year end: Aug"), 8);
        assert_eq!(year_end_month("end of december"), 12);
        assert_eq!(year_end_month(""), DEFAULT_YEAR_END_MONTH);
        assert_eq!(year_end_month("unknown"), DEFAULT_YEAR_END_MONTH);
    }

    #[test]
    fn test_year_end_abbreviation_needs_whole_word() {
        assert_eq!(year_end_month("Summary - Aug"), 8);
        assert_eq!(year_end_month("Sept year end"), 9);
        assert_eq!(year_end_month("Marketing fund, Nov"), 11);
        assert_eq!(year_end_month("Feb (see June minutes)"), 6);
        assert_eq!(year_end_month("Summary"), DEFAULT_YEAR_END_MONTH);
    }

    #[test]
    fn test_unparseable_date_falls_back() {
        assert_eq!(calculate_financial_periods("", "February"), FinancialPeriodSet::fallback());
        assert_eq!(calculate_financial_periods("15/03/2024", "February"), FinancialPeriodSet::fallback());
        assert_eq!(calculate_financial_periods("2024-02-30", "February"), FinancialPeriodSet::fallback());
    }

    #[test]
    fn test_fallback_has_no_dates() {
        let set = FinancialPeriodSet::fallback();
        for text in [
            &set.current_period,
            &set.historic_period,
            &set.bank_statements,
            &set.owner_balances,
            &set.closing_balances,
        ] {
            let lower = text.to_lowercase();
            assert!(!MONTHS.iter().any(|m| lower.contains(m)), "{text}");
            assert!(!text.contains("20"), "{text}");
        }
    }

    #[test]
    fn test_current_start_never_after_request_end() {
        let mut d = day(2019, 1, 1);
        while d < day(2026, 1, 1) {
            let p = FinancialPeriods::compute(d, 2).unwrap();
            assert!(p.current_start <= p.request_end, "take-on {d}");
            assert_eq!(p.current_start.month(), 3);
            assert_eq!(p.current_start.day(), 1);
            assert!(p.request_end.checked_sub_months(Months::new(12)).unwrap() < p.current_start, "take-on {d}");
            assert_eq!(p.historic_start.checked_add_months(Months::new(60)).unwrap(), p.current_start);
            assert_eq!(p.historic_end.succ_opt().unwrap(), p.current_start);
            d = d.checked_add_days(Days::new(9)).unwrap();
        }
    }

    #[test]
    fn test_day_of_month_does_not_move_request_end() {
        let first = FinancialPeriods::compute(day(2024, 3, 1), 2).unwrap();
        for dom in 2..=31 {
            let p = FinancialPeriods::compute(day(2024, 3, dom), 2).unwrap();
            assert_eq!(p.request_end, first.request_end);
            assert_eq!(p.current_start, first.current_start);
        }
    }
}
