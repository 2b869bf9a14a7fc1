use crate::fmt::{long_date, percent};
use crate::models::{ChecklistItem, Complex};
use crate::report::{group_by_heading, Progress};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// Render as a plain-text message with headers, ready to paste or pipe.
    pub fn to_text(&self) -> String {
        format!("To: {}\nSubject: {}\n\n{}", self.to, self.subject, self.body)
    }
}

fn greeting(complex: &Complex) -> String {
    match complex.previous_agent.as_deref() {
        Some(name) if !name.trim().is_empty() => format!("Dear {}", name.trim()),
        _ => "Dear Sir/Madam".to_string(),
    }
}

fn item_list(items: &[ChecklistItem]) -> String {
    let mut out = String::new();
    for group in group_by_heading(items) {
        out.push_str(&format!("\n{}\n", group.heading));
        for item in group.items {
            out.push_str(&format!("  - {}\n", item.task_name));
        }
    }
    out
}

fn signature(agent: &str) -> String {
    if agent.is_empty() {
        "Kind regards".to_string()
    } else {
        format!("Kind regards\n{agent}")
    }
}

/// First request to the previous agent for everything on the checklist.
pub fn handover_request(complex: &Complex, outstanding: &[ChecklistItem], agent: &str) -> EmailDraft {
    let appointed = if agent.is_empty() {
        "We have been appointed".to_string()
    } else {
        format!("{agent} has been appointed")
    };
    let body = format!(
        "{},\n\n{} as managing agent of {} with effect from {}. \
         Please arrange for the following records and documents to be handed over:\n{}\n\
         A full handover request is attached.\n\n{}\n",
        greeting(complex),
        appointed,
        complex.name,
        long_date(complex.take_on_date),
        item_list(outstanding),
        signature(agent),
    );
    EmailDraft {
        to: complex.previous_agent_email.clone().unwrap_or_default(),
        subject: format!("Take-on of {}: handover request", complex.name),
        body,
    }
}

/// Follow-up listing what is still outstanding.
pub fn status_update(
    complex: &Complex,
    progress: &Progress,
    outstanding: &[ChecklistItem],
    agent: &str,
) -> EmailDraft {
    let summary = format!(
        "{} of {} items have been received ({}).",
        progress.received,
        progress.total,
        percent(progress.received, progress.total)
    );
    let remainder = if outstanding.is_empty() {
        "All requested items have now been received. Thank you for your assistance.\n".to_string()
    } else {
        format!(
            "The following items are still outstanding:\n{}\nPlease let us know when we can expect them.\n",
            item_list(outstanding)
        )
    };
    EmailDraft {
        to: complex.previous_agent_email.clone().unwrap_or_default(),
        subject: format!("Take-on of {}: status update", complex.name),
        body: format!(
            "{},\n\nThank you for the records received so far for {}. {}\n\n{}\n{}\n",
            greeting(complex),
            complex.name,
            summary,
            remainder,
            signature(agent)
        ),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::ComplexType;

    fn complex() -> Complex {
        let mut c = Complex::new(
            "Sunset Villas",
            ComplexType::BodyCorporate,
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "February",
        );
        c.previous_agent = Some("Oldtown Properties".to_string());
        c.previous_agent_email = Some("records@oldtown.example".to_string());
        c
    }

    fn items() -> Vec<ChecklistItem> {
        vec![
            ChecklistItem::new("Sunset Villas", "Conduct rules", "Legal", "Previous Agent"),
            ChecklistItem::new("Sunset Villas", "Keys", "Take-On", "Previous Agent"),
        ]
    }

    #[test]
    fn test_handover_request() {
        let draft = handover_request(&complex(), &items(), "Acme Managing Agents");
        assert_eq!(draft.to, "records@oldtown.example");
        assert_eq!(draft.subject, "Take-on of Sunset Villas: handover request");
        assert!(draft.body.starts_with("Dear Oldtown Properties,"));
        assert!(draft.body.contains("with effect from 15 March 2024"));
        let take_on = draft.body.find("Take-On\n  - Keys").unwrap();
        let legal = draft.body.find("Legal\n  - Conduct rules").unwrap();
        assert!(take_on < legal);
        assert!(draft.to_text().starts_with("To: records@oldtown.example\nSubject: "));
    }

    #[test]
    fn test_status_update_lists_outstanding() {
        let all = items();
        let progress = Progress { total: 10, received: 8, outstanding: 2 };
        let draft = status_update(&complex(), &progress, &all, "");
        assert!(draft.body.contains("8 of 10 items have been received (80%)."));
        assert!(draft.body.contains("still outstanding"));
        assert!(draft.body.trim_end().ends_with("Kind regards"));
    }

    #[test]
    fn test_status_update_when_complete() {
        let progress = Progress { total: 2, received: 2, outstanding: 0 };
        let mut c = complex();
        c.previous_agent = None;
        let draft = status_update(&c, &progress, &[], "Acme");
        assert!(draft.body.starts_with("Dear Sir/Madam,"));
        assert!(draft.body.contains("All requested items have now been received."));
    }
}
