use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::TakeonError;

pub const DEFAULT_HEADING: &str = "Take-On";
pub const DEFAULT_RESPONSIBILITY: &str = "Previous Agent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexType {
    BodyCorporate,
    Hoa,
}

impl ComplexType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BodyCorporate => "Body Corporate",
            Self::Hoa => "HOA",
        }
    }
}

impl fmt::Display for ComplexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComplexType {
    type Err = TakeonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match key.as_str() {
            "bodycorporate" | "bc" => Ok(Self::BodyCorporate),
            "hoa" | "homeownersassociation" | "homeownerassociation" => Ok(Self::Hoa),
            _ => Err(TakeonError::UnknownComplexType(s.to_string())),
        }
    }
}

/// Which kind of complex a master task applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCategory {
    Bc,
    Hoa,
    Both,
}

impl TaskCategory {
    /// Lenient parse: anything that is not clearly BC or HOA applies to both.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "BC" => Self::Bc,
            "HOA" => Self::Hoa,
            _ => Self::Both,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bc => "BC",
            Self::Hoa => "HOA",
            Self::Both => "BOTH",
        }
    }

    pub fn applies_to(&self, complex_type: ComplexType) -> bool {
        match self {
            Self::Both => true,
            Self::Bc => complex_type == ComplexType::BodyCorporate,
            Self::Hoa => complex_type == ComplexType::Hoa,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct MasterTask {
    pub id: Option<i64>,
    pub task_name: String,
    pub category: TaskCategory,
    pub responsibility: Option<String>,
    pub task_heading: Option<String>,
}

impl MasterTask {
    pub fn new(task_name: &str, category: TaskCategory) -> Self {
        Self {
            id: None,
            task_name: task_name.to_string(),
            category,
            responsibility: None,
            task_heading: None,
        }
    }

    pub fn heading_or_default(&self) -> &str {
        non_blank(self.task_heading.as_deref()).unwrap_or(DEFAULT_HEADING)
    }

    pub fn responsibility_or_default(&self) -> &str {
        non_blank(self.responsibility.as_deref()).unwrap_or(DEFAULT_RESPONSIBILITY)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    pub name: String,
    pub complex_type: ComplexType,
    pub take_on_date: NaiveDate,
    pub year_end: String,
    pub building_code: Option<String>,
    pub address: Option<String>,
    pub previous_agent: Option<String>,
    pub previous_agent_email: Option<String>,
    pub portfolio_manager: Option<String>,
    pub handover_sent: Option<NaiveDate>,
    pub status_sent: Option<NaiveDate>,
    pub finalized: bool,
}

impl Complex {
    pub fn new(name: &str, complex_type: ComplexType, take_on_date: NaiveDate, year_end: &str) -> Self {
        Self {
            name: name.to_string(),
            complex_type,
            take_on_date,
            year_end: year_end.to_string(),
            building_code: None,
            address: None,
            previous_agent: None,
            previous_agent_email: None,
            portfolio_manager: None,
            handover_sent: None,
            status_sent: None,
            finalized: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistItem {
    pub complex_name: String,
    pub task_name: String,
    pub received: bool,
    pub date_received: Option<NaiveDate>,
    pub notes: String,
    pub responsibility: String,
    pub task_heading: String,
    pub completed_by: String,
}

impl ChecklistItem {
    pub fn new(complex_name: &str, task_name: &str, task_heading: &str, responsibility: &str) -> Self {
        Self {
            complex_name: complex_name.to_string(),
            task_name: task_name.to_string(),
            received: false,
            date_received: None,
            notes: String::new(),
            responsibility: responsibility.to_string(),
            task_heading: task_heading.to_string(),
            completed_by: String::new(),
        }
    }

    /// Apply a received/outstanding transition. A newly received item is
    /// stamped with `on`; re-saving an already received item keeps its
    /// recorded date; going back to outstanding clears it.
    pub fn set_received(&mut self, received: bool, on: NaiveDate) {
        match (self.received, received) {
            (false, true) => self.date_received = Some(on),
            (true, true) => {
                if self.date_received.is_none() {
                    self.date_received = Some(on);
                }
            }
            (_, false) => self.date_received = None,
        }
        self.received = received;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_category_parse_is_lenient() {
        assert_eq!(TaskCategory::parse(" bc "), TaskCategory::Bc);
        assert_eq!(TaskCategory::parse("BC"), TaskCategory::Bc);
        assert_eq!(TaskCategory::parse("Bc"), TaskCategory::Bc);
        assert_eq!(TaskCategory::parse("hoa"), TaskCategory::Hoa);
        assert_eq!(TaskCategory::parse(""), TaskCategory::Both);
        assert_eq!(TaskCategory::parse("both"), TaskCategory::Both);
        assert_eq!(TaskCategory::parse("sectional title?"), TaskCategory::Both);
    }

    #[test]
    fn test_category_applies_to() {
        assert!(TaskCategory::Bc.applies_to(ComplexType::BodyCorporate));
        assert!(!TaskCategory::Bc.applies_to(ComplexType::Hoa));
        assert!(TaskCategory::Hoa.applies_to(ComplexType::Hoa));
        assert!(!TaskCategory::Hoa.applies_to(ComplexType::BodyCorporate));
        assert!(TaskCategory::Both.applies_to(ComplexType::Hoa));
    }

    #[test]
    fn test_complex_type_from_str() {
        assert_eq!("Body Corporate".parse::<ComplexType>().unwrap(), ComplexType::BodyCorporate);
        assert_eq!("bc".parse::<ComplexType>().unwrap(), ComplexType::BodyCorporate);
        assert_eq!("HOA".parse::<ComplexType>().unwrap(), ComplexType::Hoa);
        assert_eq!("Homeowners Association".parse::<ComplexType>().unwrap(), ComplexType::Hoa);
        assert!("townhouse".parse::<ComplexType>().is_err());
    }

    #[test]
    fn test_master_defaults() {
        let mut task = MasterTask::new("Insurance schedule", TaskCategory::Both);
        assert_eq!(task.heading_or_default(), "Take-On");
        assert_eq!(task.responsibility_or_default(), "Previous Agent");
        task.task_heading = Some("  ".to_string());
        assert_eq!(task.heading_or_default(), "Take-On");
        task.task_heading = Some("Insurance".to_string());
        assert_eq!(task.heading_or_default(), "Insurance");
    }

    #[test]
    fn test_received_round_trip_restamps_date() {
        let mut item = ChecklistItem::new("Sunset Villas", "Title deeds", "Legal", "Previous Agent");
        item.notes = "Courier on Monday".to_string();

        item.set_received(true, day(2024, 3, 1));
        assert_eq!(item.date_received, Some(day(2024, 3, 1)));

        item.set_received(false, day(2024, 3, 2));
        assert!(!item.received);
        assert_eq!(item.date_received, None);

        item.set_received(true, day(2024, 3, 5));
        assert!(item.received);
        assert_eq!(item.date_received, Some(day(2024, 3, 5)));
        assert_eq!(item.notes, "Courier on Monday");
    }

    #[test]
    fn test_resave_keeps_recorded_date() {
        let mut item = ChecklistItem::new("Sunset Villas", "Title deeds", "Legal", "Previous Agent");
        item.set_received(true, day(2024, 3, 1));
        item.set_received(true, day(2024, 4, 1));
        assert_eq!(item.date_received, Some(day(2024, 3, 1)));
    }
}
