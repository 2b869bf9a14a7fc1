use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use serde::Deserialize;

use crate::db::{get_connection, init_db};
use crate::error::{Result, TakeonError};
use crate::models::{
    ChecklistItem, Complex, MasterTask, TaskCategory, DEFAULT_HEADING, DEFAULT_RESPONSIBILITY,
};
use crate::normalize::{optional_text, parse_flag, parse_optional_date};
use crate::seeder::{seed_checklist, ExcludedTask, SeedStatus};

/// Result of creating a complex.
#[derive(Debug)]
pub enum CreateOutcome {
    AlreadyExists,
    Created {
        status: SeedStatus,
        rows: usize,
        excluded: Vec<ExcludedTask>,
    },
}

/// Handle to the take-on database. Opened by the caller and passed to every
/// operation; dropping it closes the connection.
pub struct Store {
    conn: Connection,
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

const COMPLEX_COLUMNS: &str = "name, complex_type, take_on_date, year_end, building_code, address, \
     previous_agent, previous_agent_email, portfolio_manager, handover_sent, status_sent, finalized";

const CHECKLIST_COLUMNS: &str =
    "complex_name, task_name, received, date_received, notes, responsibility, task_heading, completed_by";

/// A `projects` row as stored, before validation.
struct ComplexRow {
    name: String,
    complex_type: String,
    take_on_date: String,
    year_end: String,
    building_code: Option<String>,
    address: Option<String>,
    previous_agent: Option<String>,
    previous_agent_email: Option<String>,
    portfolio_manager: Option<String>,
    handover_sent: Option<String>,
    status_sent: Option<String>,
    finalized: bool,
}

impl ComplexRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            complex_type: row.get(1)?,
            take_on_date: row.get(2)?,
            year_end: row.get(3)?,
            building_code: row.get(4)?,
            address: row.get(5)?,
            previous_agent: row.get(6)?,
            previous_agent_email: row.get(7)?,
            portfolio_manager: row.get(8)?,
            handover_sent: row.get(9)?,
            status_sent: row.get(10)?,
            finalized: row.get(11)?,
        })
    }
}

impl TryFrom<ComplexRow> for Complex {
    type Error = TakeonError;

    fn try_from(row: ComplexRow) -> Result<Self> {
        let take_on_date = parse_optional_date(&row.take_on_date)
            .ok_or_else(|| TakeonError::InvalidDate(row.take_on_date.clone()))?;
        Ok(Complex {
            complex_type: row.complex_type.parse()?,
            take_on_date,
            handover_sent: row.handover_sent.as_deref().and_then(parse_optional_date),
            status_sent: row.status_sent.as_deref().and_then(parse_optional_date),
            name: row.name,
            year_end: row.year_end,
            building_code: row.building_code,
            address: row.address,
            previous_agent: row.previous_agent,
            previous_agent_email: row.previous_agent_email,
            portfolio_manager: row.portfolio_manager,
            finalized: row.finalized,
        })
    }
}

/// Map a checklist row. A received row without a readable date is loaded as
/// outstanding so every received item carries its date.
fn checklist_from_row(row: &rusqlite::Row) -> rusqlite::Result<ChecklistItem> {
    let complex_name: String = row.get(0)?;
    let task_name: String = row.get(1)?;
    let stored_received: bool = row.get(2)?;
    let raw_date: Option<String> = row.get(3)?;
    let date_received = raw_date.as_deref().and_then(parse_optional_date);
    let received = stored_received && date_received.is_some();
    if stored_received && !received {
        tracing::warn!(
            complex = %complex_name,
            task = %task_name,
            date = raw_date.as_deref().unwrap_or(""),
            "received item has no usable date, loading as outstanding"
        );
    }
    Ok(ChecklistItem {
        complex_name,
        task_name,
        received,
        date_received: if received { date_received } else { None },
        notes: row.get(4)?,
        responsibility: row.get(5)?,
        task_heading: row.get(6)?,
        completed_by: row.get(7)?,
    })
}

fn date_text(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn insert_item(conn: &Connection, item: &ChecklistItem) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO checklist ({CHECKLIST_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
        rusqlite::params![
            item.complex_name,
            item.task_name,
            item.received,
            date_text(item.date_received),
            item.notes,
            item.responsibility,
            item.task_heading,
            item.completed_by,
        ],
    )?;
    Ok(())
}

/// A master template row from a CSV export. Header names follow the
/// spreadsheet the template is usually maintained in.
#[derive(Debug, Deserialize)]
struct MasterCsvRow {
    #[serde(alias = "Task Name", alias = "task")]
    task_name: String,
    #[serde(default, alias = "Category")]
    category: String,
    #[serde(default, alias = "Responsibility")]
    responsibility: String,
    #[serde(default, alias = "Task Heading", alias = "Heading")]
    task_heading: String,
}

#[derive(Debug, Deserialize)]
struct ChecklistCsvRow {
    #[serde(alias = "Task Name", alias = "task")]
    task_name: String,
    #[serde(default, alias = "Received")]
    received: String,
    #[serde(default, alias = "Date Received")]
    date_received: String,
    #[serde(default, alias = "Notes")]
    notes: String,
    #[serde(default, alias = "Responsibility")]
    responsibility: String,
    #[serde(default, alias = "Task Heading", alias = "Heading")]
    task_heading: String,
    #[serde(default, alias = "Completed By")]
    completed_by: String,
}

impl Store {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = get_connection(path)?;
        init_db(&conn, false)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // -----------------------------------------------------------------------
    // Complexes
    // -----------------------------------------------------------------------

    pub fn complex_exists(&self, name: &str) -> Result<bool> {
        let exists = self
            .conn
            .prepare_cached("SELECT 1 FROM projects WHERE name = ?1")?
            .exists([name])?;
        Ok(exists)
    }

    /// Create a complex and seed its checklist from the master template.
    /// An existing name short-circuits without touching anything.
    pub fn create_complex(&mut self, complex: &Complex) -> Result<CreateOutcome> {
        if self.complex_exists(&complex.name)? {
            tracing::info!(complex = %complex.name, "complex already exists, not seeding");
            return Ok(CreateOutcome::AlreadyExists);
        }

        let master = self.list_master()?;
        let outcome = seed_checklist(complex, &master);
        if outcome.status == SeedStatus::NoMasterTemplate {
            tracing::warn!(complex = %complex.name, "no master template defined, seeding financial rows only");
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            &format!("INSERT INTO projects ({COMPLEX_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"),
            rusqlite::params![
                complex.name,
                complex.complex_type.label(),
                complex.take_on_date.format("%Y-%m-%d").to_string(),
                complex.year_end,
                complex.building_code,
                complex.address,
                complex.previous_agent,
                complex.previous_agent_email,
                complex.portfolio_manager,
                date_text(complex.handover_sent),
                date_text(complex.status_sent),
                complex.finalized,
            ],
        )?;
        for item in &outcome.items {
            insert_item(&tx, item)?;
        }
        tx.commit()?;

        tracing::info!(
            complex = %complex.name,
            rows = outcome.items.len(),
            excluded = outcome.excluded.len(),
            "complex created"
        );
        Ok(CreateOutcome::Created {
            status: outcome.status,
            rows: outcome.items.len(),
            excluded: outcome.excluded,
        })
    }

    pub fn get_complex(&self, name: &str) -> Result<Complex> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {COMPLEX_COLUMNS} FROM projects WHERE name = ?1"),
                [name],
                ComplexRow::from_row,
            )
            .optional()?
            .ok_or_else(|| TakeonError::UnknownComplex(name.to_string()))?;
        Complex::try_from(row)
    }

    pub fn list_complexes(&self) -> Result<Vec<Complex>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COMPLEX_COLUMNS} FROM projects ORDER BY take_on_date, name"))?;
        let rows = stmt
            .query_map([], ComplexRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(Complex::try_from).collect()
    }

    /// Write back the mutable fields of a complex.
    pub fn update_complex(&self, complex: &Complex) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE projects SET building_code = ?2, address = ?3, previous_agent = ?4, \
             previous_agent_email = ?5, portfolio_manager = ?6, handover_sent = ?7, \
             status_sent = ?8, finalized = ?9 WHERE name = ?1",
            rusqlite::params![
                complex.name,
                complex.building_code,
                complex.address,
                complex.previous_agent,
                complex.previous_agent_email,
                complex.portfolio_manager,
                date_text(complex.handover_sent),
                date_text(complex.status_sent),
                complex.finalized,
            ],
        )?;
        if changed == 0 {
            return Err(TakeonError::UnknownComplex(complex.name.clone()));
        }
        Ok(())
    }

    pub fn mark_handover_sent(&self, name: &str, on: NaiveDate) -> Result<()> {
        let mut complex = self.get_complex(name)?;
        complex.handover_sent = Some(on);
        self.update_complex(&complex)
    }

    pub fn mark_status_sent(&self, name: &str, on: NaiveDate) -> Result<()> {
        let mut complex = self.get_complex(name)?;
        complex.status_sent = Some(on);
        self.update_complex(&complex)
    }

    pub fn finalize(&self, name: &str) -> Result<()> {
        let mut complex = self.get_complex(name)?;
        complex.finalized = true;
        self.update_complex(&complex)
    }

    // -----------------------------------------------------------------------
    // Master template
    // -----------------------------------------------------------------------

    /// The master template in display order. An empty template is `Ok(vec![])`;
    /// a failing read is an error, never an empty list.
    pub fn list_master(&self) -> Result<Vec<MasterTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_name, category, responsibility, task_heading FROM master \
             ORDER BY sort_order, id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                let category: String = row.get(2)?;
                Ok(MasterTask {
                    id: row.get(0)?,
                    task_name: row.get(1)?,
                    category: TaskCategory::parse(&category),
                    responsibility: row.get(3)?,
                    task_heading: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Add a task at the end of the template, or refresh it if the name exists.
    pub fn add_master(&self, task: &MasterTask) -> Result<()> {
        let next: i64 = self
            .conn
            .query_row("SELECT COALESCE(MAX(sort_order), -1) + 1 FROM master", [], |r| r.get(0))?;
        self.conn.execute(
            "INSERT INTO master (task_name, category, responsibility, task_heading, sort_order) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(task_name) DO UPDATE SET category = excluded.category, \
             responsibility = excluded.responsibility, task_heading = excluded.task_heading",
            rusqlite::params![
                task.task_name,
                task.category.label(),
                task.responsibility,
                task.task_heading,
                next,
            ],
        )?;
        Ok(())
    }

    pub fn update_master(
        &self,
        task_name: &str,
        category: Option<TaskCategory>,
        responsibility: Option<&str>,
        task_heading: Option<&str>,
    ) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE master SET category = COALESCE(?2, category), \
             responsibility = COALESCE(?3, responsibility), \
             task_heading = COALESCE(?4, task_heading) WHERE task_name = ?1",
            rusqlite::params![task_name, category.map(|c| c.label()), responsibility, task_heading],
        )?;
        if changed == 0 {
            return Err(TakeonError::UnknownMasterTask(task_name.to_string()));
        }
        Ok(())
    }

    pub fn delete_master(&self, task_name: &str) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM master WHERE task_name = ?1", [task_name])?;
        if changed == 0 {
            return Err(TakeonError::UnknownMasterTask(task_name.to_string()));
        }
        Ok(())
    }

    /// Load master tasks from a CSV file. Returns the number of tasks read.
    pub fn import_master_csv(&self, path: &Path) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        let mut count = 0;
        for record in reader.deserialize() {
            let row: MasterCsvRow = record?;
            let Some(task_name) = optional_text(&row.task_name) else {
                continue;
            };
            let task = MasterTask {
                id: None,
                task_name,
                category: TaskCategory::parse(optional_text(&row.category).as_deref().unwrap_or("")),
                responsibility: optional_text(&row.responsibility),
                task_heading: optional_text(&row.task_heading),
            };
            self.add_master(&task)?;
            count += 1;
        }
        tracing::info!(path = %path.display(), tasks = count, "imported master template");
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Checklist
    // -----------------------------------------------------------------------

    pub fn checklist_for(&self, complex_name: &str) -> Result<Vec<ChecklistItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CHECKLIST_COLUMNS} FROM checklist WHERE complex_name = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map([complex_name], checklist_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_item(&self, complex_name: &str, task_name: &str) -> Result<ChecklistItem> {
        self.conn
            .query_row(
                &format!("SELECT {CHECKLIST_COLUMNS} FROM checklist WHERE complex_name = ?1 AND task_name = ?2"),
                [complex_name, task_name],
                checklist_from_row,
            )
            .optional()?
            .ok_or_else(|| TakeonError::UnknownTask {
                complex: complex_name.to_string(),
                task: task_name.to_string(),
            })
    }

    /// Persist every editable field of an existing item.
    pub fn save_item(&self, item: &ChecklistItem) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE checklist SET received = ?3, date_received = ?4, notes = ?5, \
             responsibility = ?6, task_heading = ?7, completed_by = ?8 \
             WHERE complex_name = ?1 AND task_name = ?2",
            rusqlite::params![
                item.complex_name,
                item.task_name,
                item.received,
                date_text(item.date_received),
                item.notes,
                item.responsibility,
                item.task_heading,
                item.completed_by,
            ],
        )?;
        if changed == 0 {
            return Err(TakeonError::UnknownTask {
                complex: item.complex_name.clone(),
                task: item.task_name.clone(),
            });
        }
        Ok(())
    }

    pub fn set_received(
        &self,
        complex_name: &str,
        task_name: &str,
        received: bool,
        on: NaiveDate,
    ) -> Result<ChecklistItem> {
        let mut item = self.get_item(complex_name, task_name)?;
        item.set_received(received, on);
        self.save_item(&item)?;
        Ok(item)
    }

    pub fn set_notes(&self, complex_name: &str, task_name: &str, notes: &str) -> Result<()> {
        let mut item = self.get_item(complex_name, task_name)?;
        item.notes = notes.to_string();
        self.save_item(&item)
    }

    pub fn set_completed_by(&self, complex_name: &str, task_name: &str, who: &str) -> Result<()> {
        let mut item = self.get_item(complex_name, task_name)?;
        item.completed_by = who.to_string();
        self.save_item(&item)
    }

    /// Add a one-off task to an existing complex's checklist.
    pub fn add_item(&self, item: &ChecklistItem) -> Result<()> {
        if !self.complex_exists(&item.complex_name)? {
            return Err(TakeonError::UnknownComplex(item.complex_name.clone()));
        }
        insert_item(&self.conn, item)
    }

    pub fn delete_item(&self, complex_name: &str, task_name: &str) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM checklist WHERE complex_name = ?1 AND task_name = ?2",
            [complex_name, task_name],
        )?;
        if changed == 0 {
            return Err(TakeonError::UnknownTask {
                complex: complex_name.to_string(),
                task: task_name.to_string(),
            });
        }
        Ok(())
    }

    /// Merge a legacy checklist export into a complex's checklist. Rows match
    /// on task name; unknown tasks are added. Received rows without a usable
    /// date are stamped with `today`. Returns (updated, added).
    pub fn import_checklist_csv(
        &self,
        complex_name: &str,
        path: &Path,
        today: NaiveDate,
    ) -> Result<(usize, usize)> {
        if !self.complex_exists(complex_name)? {
            return Err(TakeonError::UnknownComplex(complex_name.to_string()));
        }
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        let (mut updated, mut added) = (0, 0);
        for record in reader.deserialize() {
            let row: ChecklistCsvRow = record?;
            let Some(task_name) = optional_text(&row.task_name) else {
                continue;
            };
            let received = parse_flag(&row.received);
            let date = parse_optional_date(&row.date_received);

            let existing = match self.get_item(complex_name, &task_name) {
                Ok(item) => Some(item),
                Err(TakeonError::UnknownTask { .. }) => None,
                Err(e) => return Err(e),
            };
            let is_new = existing.is_none();
            let mut item = existing.unwrap_or_else(|| {
                ChecklistItem::new(
                    complex_name,
                    &task_name,
                    optional_text(&row.task_heading).as_deref().unwrap_or(DEFAULT_HEADING),
                    optional_text(&row.responsibility).as_deref().unwrap_or(DEFAULT_RESPONSIBILITY),
                )
            });
            item.set_received(received, date.unwrap_or(today));
            if received && date.is_some() {
                item.date_received = date;
            }
            if let Some(notes) = optional_text(&row.notes) {
                item.notes = notes;
            }
            if let Some(who) = optional_text(&row.completed_by) {
                item.completed_by = who;
            }

            if is_new {
                insert_item(&self.conn, &item)?;
                added += 1;
            } else {
                self.save_item(&item)?;
                updated += 1;
            }
        }
        tracing::info!(complex = complex_name, updated, added, "imported checklist");
        Ok((updated, added))
    }
}
