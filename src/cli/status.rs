use crate::cli::open_store;
use crate::error::Result;
use crate::fmt::percent;
use crate::report::Progress;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("takeon.db");

    println!("User:       {}", if settings.user_name.is_empty() { "(not set)" } else { &settings.user_name });
    println!("Agent:      {}", if settings.agent_name.is_empty() { "(not set)" } else { &settings.agent_name });
    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if !db_path.exists() {
        println!();
        println!("Database not found. Run `takeon init` to set up.");
        return Ok(());
    }

    let store = open_store()?;
    let complexes = store.list_complexes()?;
    let master = store.list_master()?;
    let open: Vec<_> = complexes.iter().filter(|c| !c.finalized).collect();

    println!();
    println!("Master tasks:  {}", master.len());
    println!("Complexes:     {} ({} in progress)", complexes.len(), open.len());
    for c in open {
        let progress = Progress::of(&store.checklist_for(&c.name)?);
        println!(
            "  {:<30} {:>4} outstanding  {}",
            c.name,
            progress.outstanding,
            percent(progress.received, progress.total)
        );
    }
    Ok(())
}
