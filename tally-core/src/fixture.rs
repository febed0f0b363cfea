use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::Catalog;
use crate::memory::MemoryLibrary;
use crate::models::{Client, TimeEntry, Workspace};

/// A user's data as exported by the library: the shape of a `me.json` dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    pub workspaces: Vec<Workspace>,
    pub clients: Vec<Client>,
    pub time_entries: Vec<TimeEntry>,
}

pub fn parse(json: &str) -> Result<UserData, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid user data: {}", e))
}

pub fn load(path: &Path) -> Result<UserData, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse(&contents)
}

/// Seed the catalog and the in-memory library with `data`.
pub fn install(data: &UserData, catalog: &Catalog, library: &MemoryLibrary) {
    log::info!(
        "Installing user data: {} workspaces, {} clients, {} time entries",
        data.workspaces.len(),
        data.clients.len(),
        data.time_entries.len()
    );
    catalog.replace_workspaces(data.workspaces.clone());
    catalog.replace_clients(data.clients.clone());
    library.add_time_entries(data.time_entries.clone());
}
