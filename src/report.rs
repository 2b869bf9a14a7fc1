use crate::models::ChecklistItem;

/// Section order for checklist documents. Headings not listed here follow,
/// sorted alphabetically.
pub const HEADING_ORDER: &[&str] = &[
    "Take-On",
    "Financial",
    "Legal",
    "Statutory Compliance",
    "Building Compliance",
    "Insurance",
    "City Council",
    "Employee",
    "General",
];

const BLANK_HEADING: &str = "General";

pub struct HeadingGroup<'a> {
    pub heading: String,
    pub items: Vec<&'a ChecklistItem>,
}

fn heading_rank(heading: &str) -> usize {
    HEADING_ORDER
        .iter()
        .position(|h| h.eq_ignore_ascii_case(heading))
        .unwrap_or(HEADING_ORDER.len())
}

/// Group checklist rows by heading in document order, keeping the checklist
/// order within each group.
pub fn group_by_heading<'a, I>(items: I) -> Vec<HeadingGroup<'a>>
where
    I: IntoIterator<Item = &'a ChecklistItem>,
{
    let mut groups: Vec<HeadingGroup<'a>> = Vec::new();
    for item in items {
        let heading = match item.task_heading.trim() {
            "" => BLANK_HEADING,
            h => h,
        };
        match groups.iter_mut().find(|g| g.heading.eq_ignore_ascii_case(heading)) {
            Some(group) => group.items.push(item),
            None => {
                let canonical = HEADING_ORDER
                    .iter()
                    .find(|h| h.eq_ignore_ascii_case(heading))
                    .copied()
                    .unwrap_or(heading);
                groups.push(HeadingGroup {
                    heading: canonical.to_string(),
                    items: vec![item],
                });
            }
        }
    }
    groups.sort_by(|a, b| {
        heading_rank(&a.heading)
            .cmp(&heading_rank(&b.heading))
            .then_with(|| a.heading.cmp(&b.heading))
    });
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub received: usize,
    pub outstanding: usize,
}

impl Progress {
    pub fn of(items: &[ChecklistItem]) -> Self {
        let received = items.iter().filter(|i| i.received).count();
        Self {
            total: items.len(),
            received,
            outstanding: items.len() - received,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.outstanding == 0
    }
}

pub fn outstanding(items: &[ChecklistItem]) -> Vec<ChecklistItem> {
    items.iter().filter(|i| !i.received).cloned().collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn item(task: &str, heading: &str) -> ChecklistItem {
        ChecklistItem::new("Sunset Villas", task, heading, "Previous Agent")
    }

    #[test]
    fn test_groups_follow_preferred_order() {
        let items = vec![
            item("Staff contracts", "Employee"),
            item("Zoning certificate", "Town Planning"),
            item("Current year records", "Financial"),
            item("Keys", "Take-On"),
            item("Archive boxes", "Archive"),
            item("Rules", "legal"),
            item("Untitled", ""),
            item("Bank statements", "Financial"),
        ];
        let groups = group_by_heading(&items);
        let headings: Vec<&str> = groups.iter().map(|g| g.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec!["Take-On", "Financial", "Legal", "Employee", "General", "Archive", "Town Planning"]
        );
        let financial: Vec<&str> = groups[1].items.iter().map(|i| i.task_name.as_str()).collect();
        assert_eq!(financial, vec!["Current year records", "Bank statements"]);
    }

    #[test]
    fn test_progress_counts() {
        let mut items = vec![item("A", "Legal"), item("B", "Legal"), item("C", "Legal")];
        items[0].set_received(true, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let progress = Progress::of(&items);
        assert_eq!(progress, Progress { total: 3, received: 1, outstanding: 2 });
        assert!(!progress.is_complete());
        assert_eq!(outstanding(&items).len(), 2);
        assert!(!Progress::of(&[]).is_complete());
    }
}
