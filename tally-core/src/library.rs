//! Interface to the native time-tracking library.
//!
//! The library owns time-entry storage, persistence and sync. Frontends only
//! reach it through [`DesktopLibrary`]; implementations must serialize their
//! own access since calls may arrive from whichever thread owns the form.

use serde::{Deserialize, Serialize};

use crate::models::{ClientId, ProjectId, WorkspaceId};

/// Arguments of a project-creation call. The client GUID is passed alongside
/// the client id because the library links projects to clients that may not
/// have been synced (and so have no server id) yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub time_entry_guid: String,
    pub workspace_id: WorkspaceId,
    pub client_id: ClientId,
    pub client_guid: String,
    pub name: String,
    pub color_hex: String,
    pub is_public: bool,
}

pub trait DesktopLibrary: Send + Sync {
    /// Create a project and assign it to the given time entry.
    fn create_project(&self, project: &NewProject) -> Result<ProjectId, String>;

    /// Set the billable flag of a time entry.
    fn set_billable(&self, time_entry_guid: &str, billable: bool) -> Result<(), String>;

    /// Create a client in `workspace_id`, returning the new client's GUID.
    fn create_client(&self, workspace_id: WorkspaceId, name: &str) -> Result<String, String>;
}
