use std::path::PathBuf;

use crate::db::{get_connection, init_db, set_metadata};
use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(data_dir: Option<String>, agent: Option<String>, no_template: bool) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(name) = agent {
        settings.agent_name = name;
    }

    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    std::fs::create_dir_all(resolved.join("exports"))?;

    let conn = get_connection(&resolved.join("takeon.db"))?;
    init_db(&conn, !no_template)?;
    if !settings.agent_name.is_empty() {
        set_metadata(&conn, "agent_name", &settings.agent_name)?;
    }

    println!("Initialized takeon at {}", resolved.display());
    Ok(())
}
