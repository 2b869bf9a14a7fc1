use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS projects (
    name TEXT PRIMARY KEY,
    complex_type TEXT NOT NULL,
    take_on_date TEXT NOT NULL,
    year_end TEXT NOT NULL,
    building_code TEXT,
    address TEXT,
    previous_agent TEXT,
    previous_agent_email TEXT,
    portfolio_manager TEXT,
    handover_sent TEXT,
    status_sent TEXT,
    finalized INTEGER DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS master (
    id INTEGER PRIMARY KEY,
    task_name TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL DEFAULT 'BOTH',
    responsibility TEXT,
    task_heading TEXT,
    sort_order INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS checklist (
    id INTEGER PRIMARY KEY,
    complex_name TEXT NOT NULL,
    task_name TEXT NOT NULL,
    received INTEGER NOT NULL DEFAULT 0,
    date_received TEXT,
    notes TEXT NOT NULL DEFAULT '',
    responsibility TEXT NOT NULL DEFAULT '',
    task_heading TEXT NOT NULL DEFAULT '',
    completed_by TEXT NOT NULL DEFAULT '',
    UNIQUE (complex_name, task_name),
    FOREIGN KEY (complex_name) REFERENCES projects(name)
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
";

// (task_name, category, responsibility, task_heading)
const DEFAULT_MASTER: &[(&str, &str, Option<&str>, &str)] = &[
    ("Signed management agreement", "BOTH", Some("Portfolio Manager"), "Take-On"),
    ("Owner and tenant contact list", "BOTH", None, "Take-On"),
    ("Keys, remotes and access cards", "BOTH", None, "Take-On"),
    ("Owner levy and contribution schedule", "BOTH", None, "Financial"),
    ("Approved budget for the current year", "BOTH", None, "Financial"),
    ("Audited annual financial statements", "BOTH", None, "Financial"),
    ("Sectional title plans and participation quotas", "BC", None, "Legal"),
    ("Management and conduct rules", "BC", None, "Legal"),
    ("Memorandum of incorporation and HOA rules", "HOA", None, "Legal"),
    ("Architectural and design guidelines", "HOA", None, "Legal"),
    ("Trustee or director minutes for the last 3 years", "BOTH", None, "Legal"),
    ("CSOS registration and annual returns", "BC", None, "Statutory Compliance"),
    ("SARS tax number and latest returns", "BOTH", None, "Statutory Compliance"),
    ("Maintenance, repair and replacement plan", "BC", None, "Building Compliance"),
    ("Lift and fire equipment service certificates", "BOTH", None, "Building Compliance"),
    ("Current insurance schedule and claims history", "BOTH", None, "Insurance"),
    ("Municipal account numbers and latest statements", "BOTH", None, "City Council"),
    ("Employee contracts, payroll and UIF records", "BOTH", None, "Employee"),
    ("Service provider contracts", "BOTH", None, "General"),
];

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

/// Create the schema. With `seed_master`, an empty master template is filled
/// with the standard take-on list.
pub fn init_db(conn: &Connection, seed_master: bool) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM master", [], |row| row.get(0))?;
    if count == 0 && seed_master {
        for (order, task) in DEFAULT_MASTER.iter().enumerate() {
            conn.execute(
                "INSERT INTO master (task_name, category, responsibility, task_heading, sort_order) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![task.0, task.1, task.2, task.3, order as i64],
            )?;
        }
        tracing::info!(tasks = DEFAULT_MASTER.len(), "seeded default master template");
    }
    Ok(())
}

pub fn get_metadata(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM settings WHERE key = ?1", [key], |r| r.get(0))
        .optional()?;
    Ok(value)
}

pub fn set_metadata(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn, true).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["projects", "master", "checklist", "settings"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn, true).unwrap();
        let count: i64 = conn.query_row("SELECT count(*) FROM master", [], |r| r.get(0)).unwrap();
        assert_eq!(count, DEFAULT_MASTER.len() as i64);
    }

    #[test]
    fn test_init_db_without_seed_leaves_master_empty() {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn, false).unwrap();
        let count: i64 = conn.query_row("SELECT count(*) FROM master", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_metadata_roundtrip() {
        let (_dir, conn) = test_db();
        assert_eq!(get_metadata(&conn, "agent_name").unwrap(), None);
        set_metadata(&conn, "agent_name", "Acme Managing Agents").unwrap();
        set_metadata(&conn, "agent_name", "Acme Property").unwrap();
        assert_eq!(get_metadata(&conn, "agent_name").unwrap().as_deref(), Some("Acme Property"));
    }
}
