use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{open_store, parse_date_arg, resolve_task, today};
use crate::error::Result;
use crate::fmt::{opt_date, percent};
use crate::models::ChecklistItem;
use crate::report::{group_by_heading, Progress};

pub fn show(complex: &str, outstanding_only: bool) -> Result<()> {
    let store = open_store()?;
    store.get_complex(complex)?;
    let items = store.checklist_for(complex)?;
    let progress = Progress::of(&items);

    let mut table = Table::new();
    table.set_header(vec!["#", "Item", "Received", "Responsibility", "Completed By", "Notes"]);
    let shown = items.iter().filter(|i| !outstanding_only || !i.received);
    for group in group_by_heading(shown) {
        table.add_row(vec![
            Cell::new(""),
            Cell::new(group.heading.bold()),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
        ]);
        for item in group.items {
            let row = items
                .iter()
                .position(|i| std::ptr::eq(i, item))
                .map(|p| p + 1)
                .unwrap_or_default();
            let received = if item.received {
                opt_date(item.date_received).green()
            } else {
                "outstanding".yellow()
            };
            table.add_row(vec![
                Cell::new(row),
                Cell::new(format!("  {}", item.task_name)),
                Cell::new(received),
                Cell::new(&item.responsibility),
                Cell::new(&item.completed_by),
                Cell::new(&item.notes),
            ]);
        }
    }
    println!(
        "{complex}: {} of {} received ({})\n{table}",
        progress.received,
        progress.total,
        percent(progress.received, progress.total)
    );
    Ok(())
}

pub fn receive(complex: &str, task: &str, date: Option<String>) -> Result<()> {
    let store = open_store()?;
    let task = resolve_task(&store, complex, task)?;
    let on = match date {
        Some(d) => parse_date_arg(&d)?,
        None => today(),
    };
    let item = store.set_received(complex, &task, true, on)?;
    println!("Received: {} ({})", item.task_name, opt_date(item.date_received));
    Ok(())
}

pub fn unreceive(complex: &str, task: &str) -> Result<()> {
    let store = open_store()?;
    let task = resolve_task(&store, complex, task)?;
    store.set_received(complex, &task, false, today())?;
    println!("Outstanding: {task}");
    Ok(())
}

pub fn note(complex: &str, task: &str, notes: &str) -> Result<()> {
    let store = open_store()?;
    let task = resolve_task(&store, complex, task)?;
    store.set_notes(complex, &task, notes)?;
    println!("Updated notes: {task}");
    Ok(())
}

pub fn assign(complex: &str, task: &str, by: &str) -> Result<()> {
    let store = open_store()?;
    let task = resolve_task(&store, complex, task)?;
    store.set_completed_by(complex, &task, by)?;
    println!("{task} completed by {by}");
    Ok(())
}

pub fn add(complex: &str, task: &str, heading: &str, responsibility: &str) -> Result<()> {
    let store = open_store()?;
    store.add_item(&ChecklistItem::new(complex, task.trim(), heading, responsibility))?;
    println!("Added to {complex}: {task}");
    Ok(())
}

pub fn delete(complex: &str, task: &str) -> Result<()> {
    let store = open_store()?;
    let task = resolve_task(&store, complex, task)?;
    store.delete_item(complex, &task)?;
    println!("Deleted from {complex}: {task}");
    Ok(())
}

pub fn import(complex: &str, file: &str) -> Result<()> {
    let store = open_store()?;
    let (updated, added) = store.import_checklist_csv(complex, Path::new(file), today())?;
    println!("Imported {file}: {updated} updated, {added} added");
    Ok(())
}
