pub mod checklist;
pub mod complex;
pub mod draft;
#[cfg(feature = "pdf")]
pub mod export;
pub mod init;
pub mod master;
pub mod periods;
pub mod status;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::error::{Result, TakeonError};
use crate::settings::db_path;
use crate::store::Store;

pub(crate) fn open_store() -> Result<Store> {
    Store::open(&db_path())
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| TakeonError::InvalidDate(raw.to_string()))
}

/// Accept either an exact task name or the row number shown by `checklist show`.
pub(crate) fn resolve_task(store: &Store, complex: &str, task: &str) -> Result<String> {
    let items = store.checklist_for(complex)?;
    if items.iter().any(|i| i.task_name == task) {
        return Ok(task.to_string());
    }
    if let Ok(n) = task.trim().parse::<usize>() {
        if let Some(item) = n.checked_sub(1).and_then(|i| items.get(i)) {
            return Ok(item.task_name.clone());
        }
    }
    Err(TakeonError::UnknownTask {
        complex: complex.to_string(),
        task: task.to_string(),
    })
}

#[derive(Parser)]
#[command(name = "takeon", about = "Take-on checklists for managed property complexes.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for take-on data (default: ~/Documents/takeon)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Managing agent name printed on documents
        #[arg(long)]
        agent: Option<String>,
        /// Do not load the standard master template
        #[arg(long = "no-template")]
        no_template: bool,
    },
    /// Manage complexes being taken on.
    Complex {
        #[command(subcommand)]
        command: ComplexCommands,
    },
    /// Manage the master checklist template.
    Master {
        #[command(subcommand)]
        command: MasterCommands,
    },
    /// View and update a complex's checklist.
    Checklist {
        #[command(subcommand)]
        command: ChecklistCommands,
    },
    /// Preview the financial periods for a take-on date.
    Periods {
        /// Take-on date: YYYY-MM-DD
        take_on: String,
        /// Financial year-end month, e.g. 'February' or 'Feb'
        #[arg(long = "year-end", default_value = "February")]
        year_end: String,
    },
    /// Export handover and status documents to PDF.
    #[cfg(feature = "pdf")]
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Draft emails to the previous managing agent.
    Draft {
        #[command(subcommand)]
        command: DraftCommands,
    },
    /// Show the database location and take-on progress per complex.
    Status,
}

#[derive(Subcommand)]
pub enum ComplexCommands {
    /// Add a complex and seed its checklist from the master template.
    Add {
        /// Complex name (must be unique)
        name: String,
        /// Complex type: 'Body Corporate' or 'HOA'
        #[arg(long = "type")]
        complex_type: String,
        /// Take-on date: YYYY-MM-DD
        #[arg(long = "take-on")]
        take_on: String,
        /// Financial year-end month, e.g. 'February'
        #[arg(long = "year-end", default_value = "February")]
        year_end: String,
        #[arg(long = "building-code")]
        building_code: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Previous managing agent
        #[arg(long = "previous-agent")]
        previous_agent: Option<String>,
        /// Previous managing agent's email address
        #[arg(long = "previous-agent-email")]
        previous_agent_email: Option<String>,
        #[arg(long = "portfolio-manager")]
        portfolio_manager: Option<String>,
    },
    /// List complexes with their progress.
    List,
    /// Show a complex's details.
    Show { name: String },
    /// Mark a take-on as finalized.
    Finalize { name: String },
}

#[derive(Subcommand)]
pub enum MasterCommands {
    /// Add a task to the master template.
    Add {
        task: String,
        /// BC, HOA or BOTH
        #[arg(long, default_value = "BOTH")]
        category: String,
        /// Default responsibility (default: Previous Agent)
        #[arg(long)]
        responsibility: Option<String>,
        /// Report heading (default: Take-On)
        #[arg(long)]
        heading: Option<String>,
    },
    /// List the master template.
    List,
    /// Update a master task.
    Update {
        task: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        responsibility: Option<String>,
        #[arg(long)]
        heading: Option<String>,
    },
    /// Remove a master task. Existing checklists are not affected.
    Delete { task: String },
    /// Import master tasks from CSV (Task Name, Category, Responsibility, Task Heading).
    Import { file: String },
}

#[derive(Subcommand)]
pub enum ChecklistCommands {
    /// Show a complex's checklist grouped by heading.
    Show {
        complex: String,
        /// Only show items not yet received
        #[arg(long)]
        outstanding: bool,
    },
    /// Mark an item received. TASK is the task name or its row number.
    Receive {
        complex: String,
        task: String,
        /// Date received: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Mark an item as outstanding again.
    Unreceive { complex: String, task: String },
    /// Set the notes on an item.
    Note {
        complex: String,
        task: String,
        notes: String,
    },
    /// Record who completed an item.
    Assign {
        complex: String,
        task: String,
        #[arg(long)]
        by: String,
    },
    /// Add a one-off item to a complex's checklist.
    Add {
        complex: String,
        task: String,
        #[arg(long, default_value = "General")]
        heading: String,
        #[arg(long, default_value = "Previous Agent")]
        responsibility: String,
    },
    /// Delete an item from a complex's checklist.
    Delete { complex: String, task: String },
    /// Merge a checklist exported from a spreadsheet into a complex.
    Import { complex: String, file: String },
}

#[cfg(feature = "pdf")]
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Handover request listing outstanding items.
    Handover {
        complex: String,
        /// Output file path
        #[arg(long)]
        output: Option<String>,
    },
    /// Status report of every item.
    Status {
        complex: String,
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum DraftCommands {
    /// Handover request email.
    Handover {
        complex: String,
        /// Record today as the date the handover request was sent
        #[arg(long = "mark-sent")]
        mark_sent: bool,
    },
    /// Status update email listing outstanding items.
    Status {
        complex: String,
        #[arg(long = "mark-sent")]
        mark_sent: bool,
    },
}

/// Agent name for documents: the database value wins over local settings.
pub(crate) fn agent_name(store: &Store) -> Result<String> {
    let stored = crate::db::get_metadata(store.conn(), "agent_name")?;
    Ok(stored.unwrap_or_else(|| crate::settings::load_settings().agent_name))
}
