use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level organizational container for clients, projects and time entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
}

/// A named entity within a workspace that projects can be billed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub guid: String,
    pub name: String,
    pub workspace_id: WorkspaceId,
}

/// A recorded interval of tracked time. `start`/`stop` are unix seconds;
/// `stop` is `None` while the timer is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub guid: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub billable: bool,
    pub start: u64,
    #[serde(default)]
    pub stop: Option<u64>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
}

impl TimeEntry {
    pub fn is_running(&self) -> bool {
        self.stop.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_numbers() {
        let client = Client {
            id: ClientId(2),
            guid: "C2".to_string(),
            name: "Acme".to_string(),
            workspace_id: WorkspaceId(1),
        };
        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["workspace_id"], 1);
    }

    #[test]
    fn time_entry_optional_fields_default() {
        let entry: TimeEntry = serde_json::from_str(r#"{"guid":"TE1","start":100}"#).unwrap();
        assert_eq!(entry.description, "");
        assert!(!entry.billable);
        assert!(entry.is_running());
        assert_eq!(entry.project_id, None);
    }
}
