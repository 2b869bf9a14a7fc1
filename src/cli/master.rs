use std::path::Path;

use comfy_table::{Cell, Table};

use crate::cli::open_store;
use crate::error::Result;
use crate::models::{MasterTask, TaskCategory};

pub fn add(task: &str, category: &str, responsibility: Option<String>, heading: Option<String>) -> Result<()> {
    let store = open_store()?;
    let mut master = MasterTask::new(task.trim(), TaskCategory::parse(category));
    master.responsibility = responsibility;
    master.task_heading = heading;
    store.add_master(&master)?;
    println!("Added master task: {} [{}]", master.task_name, master.category.label());
    Ok(())
}

pub fn list() -> Result<()> {
    let store = open_store()?;
    let tasks = store.list_master()?;
    if tasks.is_empty() {
        println!("No master template defined. Add tasks with `takeon master add` or `takeon master import`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Task", "Category", "Heading", "Responsibility"]);
    for t in &tasks {
        table.add_row(vec![
            Cell::new(&t.task_name),
            Cell::new(t.category.label()),
            Cell::new(t.heading_or_default()),
            Cell::new(t.responsibility_or_default()),
        ]);
    }
    println!("Master template ({} tasks)\n{table}", tasks.len());
    Ok(())
}

pub fn update(
    task: &str,
    category: Option<String>,
    responsibility: Option<String>,
    heading: Option<String>,
) -> Result<()> {
    let store = open_store()?;
    store.update_master(
        task,
        category.as_deref().map(TaskCategory::parse),
        responsibility.as_deref(),
        heading.as_deref(),
    )?;
    println!("Updated master task: {task}");
    Ok(())
}

pub fn delete(task: &str) -> Result<()> {
    let store = open_store()?;
    store.delete_master(task)?;
    println!("Deleted master task: {task}");
    Ok(())
}

pub fn import(file: &str) -> Result<()> {
    let store = open_store()?;
    let count = store.import_master_csv(Path::new(file))?;
    println!("Imported {count} master tasks from {file}");
    Ok(())
}
