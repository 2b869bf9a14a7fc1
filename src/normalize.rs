//! Conversions from loosely typed row text (CSV imports, legacy exports) into
//! real values. Nothing past the store boundary deals with sentinel strings.

use chrono::NaiveDate;

const EMPTY_SENTINELS: &[&str] = &["", "nan", "nat", "none", "null"];

fn is_empty_sentinel(raw: &str) -> bool {
    let lower = raw.trim().to_lowercase();
    EMPTY_SENTINELS.contains(&lower.as_str())
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "x"
    )
}

pub fn parse_optional_date(raw: &str) -> Option<NaiveDate> {
    if is_empty_sentinel(raw) {
        return None;
    }
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .ok()
}

pub fn optional_text(raw: &str) -> Option<String> {
    if is_empty_sentinel(raw) {
        None
    } else {
        Some(raw.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" true "));
        assert!(parse_flag("1"));
        assert!(parse_flag("Yes"));
        assert!(!parse_flag("FALSE"));
        assert!(!parse_flag("nan"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("0"));
    }

    #[test]
    fn test_parse_optional_date() {
        assert_eq!(parse_optional_date("nan"), None);
        assert_eq!(parse_optional_date("NaT"), None);
        assert_eq!(parse_optional_date(""), None);
        assert_eq!(parse_optional_date("None"), None);
        assert_eq!(parse_optional_date("2024-03-01"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(
            parse_optional_date("2024-03-01 00:00:00"),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_optional_date("01/03/2024"), None);
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text("nan"), None);
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" Legal "), Some("Legal".to_string()));
    }
}
