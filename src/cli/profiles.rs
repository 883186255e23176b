//! `--list-profiles` — profile discovery.

use anyhow::Result;
use std::path::Path;

use crate::profiles::ProfileStore;

pub fn list(data_dir: &Path) -> Result<()> {
    let store = ProfileStore::new(data_dir);
    store.ensure_default();
    let names = store.list();
    if names.is_empty() {
        println!("No profiles found in {}", data_dir.join("profiles").display());
        return Ok(());
    }
    println!("Profiles:");
    for name in names {
        println!("  • {name}");
    }
    Ok(())
}
