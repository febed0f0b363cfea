use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::events::Broadcaster;
use crate::models::{Client, Workspace, WorkspaceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogChange {
    WorkspacesChanged,
    ClientsChanged,
}

/// Workspace and client lists backing the form's selection widgets.
///
/// The external library owns the data; the catalog mirrors it and notifies
/// subscribers whenever either list changes.
#[derive(Default)]
pub struct Catalog {
    workspaces: RwLock<Vec<Workspace>>,
    clients: RwLock<Vec<Client>>,
    changes: Broadcaster<CatalogChange>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<CatalogChange> {
        self.changes.subscribe()
    }

    pub fn replace_workspaces(&self, workspaces: Vec<Workspace>) {
        log::debug!("Catalog: {} workspaces", workspaces.len());
        *self.workspaces.write() = workspaces;
        self.changes.publish(CatalogChange::WorkspacesChanged);
    }

    pub fn replace_clients(&self, clients: Vec<Client>) {
        log::debug!("Catalog: {} clients", clients.len());
        *self.clients.write() = clients;
        self.changes.publish(CatalogChange::ClientsChanged);
    }

    /// Insert a client, replacing any existing one with the same GUID.
    pub fn upsert_client(&self, client: Client) {
        {
            let mut clients = self.clients.write();
            match clients.iter_mut().find(|c| c.guid == client.guid) {
                Some(existing) => *existing = client,
                None => clients.push(client),
            }
        }
        self.changes.publish(CatalogChange::ClientsChanged);
    }

    pub fn workspaces(&self) -> Vec<Workspace> {
        self.workspaces.read().clone()
    }

    pub fn clients(&self) -> Vec<Client> {
        self.clients.read().clone()
    }

    pub fn clients_in(&self, workspace_id: WorkspaceId) -> Vec<Client> {
        self.clients
            .read()
            .iter()
            .filter(|c| c.workspace_id == workspace_id)
            .cloned()
            .collect()
    }

    pub fn first_workspace(&self) -> Option<Workspace> {
        self.workspaces.read().first().cloned()
    }

    pub fn workspace_by_id(&self, id: WorkspaceId) -> Option<Workspace> {
        self.workspaces.read().iter().find(|w| w.id == id).cloned()
    }

    pub fn client_by_guid(&self, guid: &str) -> Option<Client> {
        self.clients.read().iter().find(|c| c.guid == guid).cloned()
    }
}
