use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{open_store, parse_date_arg};
use crate::error::Result;
use crate::fmt::{long_date, opt_date, percent};
use crate::models::{Complex, ComplexType};
use crate::report::Progress;
use crate::seeder::SeedStatus;
use crate::store::CreateOutcome;

pub struct NewComplex {
    pub name: String,
    pub complex_type: String,
    pub take_on: String,
    pub year_end: String,
    pub building_code: Option<String>,
    pub address: Option<String>,
    pub previous_agent: Option<String>,
    pub previous_agent_email: Option<String>,
    pub portfolio_manager: Option<String>,
}

pub fn add(args: NewComplex) -> Result<()> {
    let complex_type: ComplexType = args.complex_type.parse()?;
    let take_on = parse_date_arg(&args.take_on)?;
    let mut complex = Complex::new(args.name.trim(), complex_type, take_on, &args.year_end);
    complex.building_code = args.building_code;
    complex.address = args.address;
    complex.previous_agent = args.previous_agent;
    complex.previous_agent_email = args.previous_agent_email;
    complex.portfolio_manager = args.portfolio_manager;

    let mut store = open_store()?;
    match store.create_complex(&complex)? {
        CreateOutcome::AlreadyExists => {
            println!("{}", format!("Complex '{}' already exists; nothing changed.", complex.name).yellow());
        }
        CreateOutcome::Created { status, rows, excluded } => {
            println!("Added {} ({}) with {rows} checklist items", complex.name, complex.complex_type);
            if status == SeedStatus::NoMasterTemplate {
                println!(
                    "{}",
                    "No master template defined: only the financial items were added.".yellow()
                );
            }
            if !excluded.is_empty() {
                println!("Skipped {} master tasks that do not apply:", excluded.len());
                for task in excluded {
                    println!("  {} [{}]: {}", task.task_name, task.category.label(), task.reason);
                }
            }
        }
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let store = open_store()?;
    let complexes = store.list_complexes()?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Type", "Take-On", "Year-End", "Received", "Progress", "Finalized"]);
    for c in complexes {
        let items = store.checklist_for(&c.name)?;
        let progress = Progress::of(&items);
        table.add_row(vec![
            Cell::new(&c.name),
            Cell::new(c.complex_type),
            Cell::new(c.take_on_date.format("%Y-%m-%d")),
            Cell::new(&c.year_end),
            Cell::new(format!("{}/{}", progress.received, progress.total)),
            Cell::new(percent(progress.received, progress.total)),
            Cell::new(if c.finalized { "yes" } else { "" }),
        ]);
    }
    println!("Complexes\n{table}");
    Ok(())
}

pub fn show(name: &str) -> Result<()> {
    let store = open_store()?;
    let c = store.get_complex(name)?;
    let progress = Progress::of(&store.checklist_for(name)?);

    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "(not set)".to_string());
    println!("{}", c.name.bold());
    println!("Type:              {}", c.complex_type);
    println!("Take-on date:      {}", long_date(c.take_on_date));
    println!("Year-end:          {}", c.year_end);
    println!("Building code:     {}", field(&c.building_code));
    println!("Address:           {}", field(&c.address));
    println!("Previous agent:    {}", field(&c.previous_agent));
    println!("Agent email:       {}", field(&c.previous_agent_email));
    println!("Portfolio manager: {}", field(&c.portfolio_manager));
    println!("Handover sent:     {}", opt_date(c.handover_sent));
    println!("Status sent:       {}", opt_date(c.status_sent));
    println!("Finalized:         {}", if c.finalized { "yes" } else { "no" });
    println!();
    println!(
        "Received {} of {} ({}), {} outstanding",
        progress.received,
        progress.total,
        percent(progress.received, progress.total),
        progress.outstanding
    );
    Ok(())
}

pub fn finalize(name: &str) -> Result<()> {
    let store = open_store()?;
    let progress = Progress::of(&store.checklist_for(name)?);
    store.finalize(name)?;
    if progress.is_complete() {
        println!("Finalized {name}");
    } else {
        println!(
            "Finalized {name} {}",
            format!("with {} items still outstanding", progress.outstanding).yellow()
        );
    }
    Ok(())
}
