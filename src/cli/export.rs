use std::path::PathBuf;

use crate::cli::{agent_name, open_store};
use crate::error::Result;
use crate::report::{group_by_heading, outstanding, Progress};
use crate::settings::get_data_dir;

fn slug(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

fn default_path(kind: &str, complex: &str) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    get_data_dir()
        .join("exports")
        .join(format!("{}-{kind}-{date}.pdf", slug(complex)))
}

fn write_pdf(bytes: &[u8], path: &PathBuf) -> Result<String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    let shown = path.display().to_string();
    tracing::info!(path = %shown, bytes = bytes.len(), "wrote pdf");
    println!("Wrote {shown}");
    Ok(shown)
}

pub fn handover(complex: &str, output: Option<String>) -> Result<String> {
    let store = open_store()?;
    let c = store.get_complex(complex)?;
    let items = outstanding(&store.checklist_for(complex)?);
    let groups = group_by_heading(&items);
    let bytes = crate::pdf::render_handover_request(&c, &groups, &agent_name(&store)?)?;
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_path("handover", complex));
    write_pdf(&bytes, &path)
}

pub fn status(complex: &str, output: Option<String>) -> Result<String> {
    let store = open_store()?;
    let c = store.get_complex(complex)?;
    let items = store.checklist_for(complex)?;
    let groups = group_by_heading(&items);
    let progress = Progress::of(&items);
    let bytes = crate::pdf::render_status_report(&c, &groups, &progress, &agent_name(&store)?)?;
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| default_path("status", complex));
    write_pdf(&bytes, &path)
}
