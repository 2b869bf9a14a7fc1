use crate::fmt::long_date;
use crate::models::{ChecklistItem, Complex, MasterTask, TaskCategory, DEFAULT_RESPONSIBILITY};
use crate::periods::{self, FinancialPeriodSet, FinancialPeriods};

pub const FINANCIAL_HEADING: &str = "Financial";

/// Number of financial rows that open every seeded checklist.
pub const FINANCIAL_ROW_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStatus {
    Seeded,
    /// The master template was empty; only the financial rows were produced.
    NoMasterTemplate,
}

/// A master task that was left off the checklist, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedTask {
    pub task_name: String,
    pub category: TaskCategory,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct SeedOutcome {
    pub status: SeedStatus,
    pub items: Vec<ChecklistItem>,
    pub excluded: Vec<ExcludedTask>,
}

/// Task names for the nine financial requests, in checklist order.
fn financial_tasks(complex: &Complex) -> Vec<String> {
    let resolved = FinancialPeriods::compute(
        complex.take_on_date,
        periods::year_end_month(&complex.year_end),
    );
    let set = match &resolved {
        Some(p) => p.describe(),
        None => {
            tracing::warn!(complex = %complex.name, "take-on date out of range, using generic period text");
            FinancialPeriodSet::fallback()
        }
    };

    let correspondence = match &resolved {
        Some(p) => format!("Historic general correspondence: {}", p.historic_span()),
        None => "Historic general correspondence for the previous 5 financial years".to_string(),
    };
    let as_at = resolved
        .and_then(|p| p.day_before_take_on())
        .map(|d| format!("as at {}", long_date(d)))
        .unwrap_or_else(|| "as at the day before take-on".to_string());

    let FinancialPeriodSet {
        current_period,
        historic_period,
        bank_statements,
        owner_balances,
        closing_balances,
    } = set;

    vec![
        current_period,
        historic_period,
        correspondence,
        bank_statements,
        owner_balances,
        closing_balances,
        format!("Final reconciliation {as_at}"),
        format!("Final trial balance {as_at}"),
        format!("Latest cash flow statement {as_at}"),
    ]
}

/// Expand the master template into the checklist for a new complex.
///
/// The financial rows always come first in a fixed order, followed by the
/// master tasks that apply to the complex type, in template order. The result
/// depends only on the inputs; persisting it is up to the caller.
pub fn seed_checklist(complex: &Complex, master: &[MasterTask]) -> SeedOutcome {
    let mut items = Vec::with_capacity(FINANCIAL_ROW_COUNT + master.len());
    items.extend(
        financial_tasks(complex)
            .iter()
            .map(|task| ChecklistItem::new(&complex.name, task, FINANCIAL_HEADING, DEFAULT_RESPONSIBILITY)),
    );

    let mut excluded = Vec::new();
    for task in master {
        if task.category.applies_to(complex.complex_type) {
            items.push(ChecklistItem::new(
                &complex.name,
                &task.task_name,
                task.heading_or_default(),
                task.responsibility_or_default(),
            ));
        } else {
            tracing::debug!(
                complex = %complex.name,
                task = %task.task_name,
                category = task.category.label(),
                "master task excluded"
            );
            excluded.push(ExcludedTask {
                task_name: task.task_name.clone(),
                category: task.category,
                reason: format!(
                    "{} task does not apply to a {} complex",
                    task.category.label(),
                    complex.complex_type
                ),
            });
        }
    }

    let status = if master.is_empty() {
        SeedStatus::NoMasterTemplate
    } else {
        SeedStatus::Seeded
    };

    SeedOutcome {
        status,
        items,
        excluded,
    }
}
