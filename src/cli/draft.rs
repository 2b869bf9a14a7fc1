use colored::Colorize;

use crate::cli::{agent_name, open_store, today};
use crate::email;
use crate::error::Result;
use crate::report::{outstanding, Progress};

pub fn handover(complex: &str, mark_sent: bool) -> Result<()> {
    let store = open_store()?;
    let c = store.get_complex(complex)?;
    let items = outstanding(&store.checklist_for(complex)?);
    let draft = email::handover_request(&c, &items, &agent_name(&store)?);
    if draft.to.is_empty() {
        eprintln!("{}", "No previous agent email on file for this complex.".yellow());
    }
    println!("{}", draft.to_text());
    if mark_sent {
        store.mark_handover_sent(complex, today())?;
    }
    Ok(())
}

pub fn status(complex: &str, mark_sent: bool) -> Result<()> {
    let store = open_store()?;
    let c = store.get_complex(complex)?;
    let items = store.checklist_for(complex)?;
    let progress = Progress::of(&items);
    let draft = email::status_update(&c, &progress, &outstanding(&items), &agent_name(&store)?);
    if draft.to.is_empty() {
        eprintln!("{}", "No previous agent email on file for this complex.".yellow());
    }
    println!("{}", draft.to_text());
    if mark_sent {
        store.mark_status_sent(complex, today())?;
    }
    Ok(())
}
