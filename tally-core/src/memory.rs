//! In-process [`DesktopLibrary`] used by the demo binary and the test suites.
//!
//! Keeps time entries and projects in memory, mirrors created clients into
//! the shared [`Catalog`], and records every call it receives in order.

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::events::Broadcaster;
use crate::library::{DesktopLibrary, NewProject};
use crate::models::{Client, ClientId, ProjectId, TimeEntry, WorkspaceId};
use crate::timer::LibraryEvent;

/// A call received by [`MemoryLibrary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call")]
pub enum LibraryCall {
    CreateProject(NewProject),
    SetBillable {
        time_entry_guid: String,
        billable: bool,
    },
    CreateClient {
        workspace_id: WorkspaceId,
        name: String,
    },
}

#[derive(Default)]
struct MemoryState {
    calls: Vec<LibraryCall>,
    projects: Vec<(ProjectId, NewProject)>,
    time_entries: Vec<TimeEntry>,
    next_project_id: u64,
    next_client_id: u64,
    fail_next: Option<String>,
}

pub struct MemoryLibrary {
    catalog: Arc<Catalog>,
    state: Mutex<MemoryState>,
    events: Broadcaster<LibraryEvent>,
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl MemoryLibrary {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        MemoryLibrary {
            catalog,
            state: Mutex::new(MemoryState {
                next_project_id: 1,
                next_client_id: 1,
                ..MemoryState::default()
            }),
            events: Broadcaster::new(),
        }
    }

    pub fn subscribe(&self) -> Receiver<LibraryEvent> {
        self.events.subscribe()
    }

    pub fn calls(&self) -> Vec<LibraryCall> {
        self.state.lock().calls.clone()
    }

    pub fn projects(&self) -> Vec<(ProjectId, NewProject)> {
        self.state.lock().projects.clone()
    }

    pub fn time_entries(&self) -> Vec<TimeEntry> {
        self.state.lock().time_entries.clone()
    }

    pub fn time_entry(&self, guid: &str) -> Option<TimeEntry> {
        self.state
            .lock()
            .time_entries
            .iter()
            .find(|te| te.guid == guid)
            .cloned()
    }

    /// Make the next create call fail with `message`.
    pub fn fail_next(&self, message: &str) {
        self.state.lock().fail_next = Some(message.to_string());
    }

    pub fn add_time_entries(&self, entries: Vec<TimeEntry>) {
        self.state.lock().time_entries.extend(entries);
        self.publish_entry_list();
    }

    /// Start a new running entry, stopping the current one first.
    pub fn start_timer(&self, description: &str) -> TimeEntry {
        self.stop_timer();
        let entry = TimeEntry {
            guid: uuid::Uuid::new_v4().to_string(),
            description: description.to_string(),
            billable: false,
            start: now_secs(),
            stop: None,
            project_id: None,
        };
        self.state.lock().time_entries.push(entry.clone());
        log::debug!("Timer started: {}", entry.guid);
        self.events.publish(LibraryEvent::RunningTimerState {
            entry: entry.clone(),
        });
        self.publish_entry_list();
        entry
    }

    /// Stop the running entry, if any.
    pub fn stop_timer(&self) -> Option<TimeEntry> {
        let stopped = {
            let mut state = self.state.lock();
            state
                .time_entries
                .iter_mut()
                .find(|te| te.is_running())
                .map(|te| {
                    te.stop = Some(now_secs().max(te.start));
                    te.clone()
                })
        };
        if let Some(entry) = &stopped {
            log::debug!("Timer stopped: {}", entry.guid);
            self.events.publish(LibraryEvent::StoppedTimerState);
            self.publish_entry_list();
        }
        stopped
    }

    /// Drop all stored time entries.
    pub fn clear_cache(&self) {
        let had_running = {
            let mut state = self.state.lock();
            let had_running = state.time_entries.iter().any(|te| te.is_running());
            state.time_entries.clear();
            had_running
        };
        if had_running {
            self.events.publish(LibraryEvent::StoppedTimerState);
        }
        self.publish_entry_list();
    }

    fn publish_entry_list(&self) {
        let entries = self.time_entries();
        self.events.publish(LibraryEvent::TimeEntryList { entries });
    }

    fn check_create(
        state: &mut MemoryState,
        catalog: &Catalog,
        workspace_id: WorkspaceId,
        name: &str,
    ) -> Result<(), String> {
        if let Some(message) = state.fail_next.take() {
            return Err(message);
        }
        if name.trim().is_empty() {
            return Err("Name must not be empty".to_string());
        }
        if catalog.workspace_by_id(workspace_id).is_none() {
            return Err(format!("Unknown workspace {}", workspace_id));
        }
        Ok(())
    }
}

impl DesktopLibrary for MemoryLibrary {
    fn create_project(&self, project: &NewProject) -> Result<ProjectId, String> {
        let mut state = self.state.lock();
        state.calls.push(LibraryCall::CreateProject(project.clone()));
        Self::check_create(&mut state, &self.catalog, project.workspace_id, &project.name)?;

        let id = ProjectId(state.next_project_id);
        state.next_project_id += 1;
        state.projects.push((id, project.clone()));
        if let Some(entry) = state
            .time_entries
            .iter_mut()
            .find(|te| te.guid == project.time_entry_guid)
        {
            entry.project_id = Some(id);
        }
        Ok(id)
    }

    fn set_billable(&self, time_entry_guid: &str, billable: bool) -> Result<(), String> {
        let mut state = self.state.lock();
        state.calls.push(LibraryCall::SetBillable {
            time_entry_guid: time_entry_guid.to_string(),
            billable,
        });
        if let Some(entry) = state
            .time_entries
            .iter_mut()
            .find(|te| te.guid == time_entry_guid)
        {
            entry.billable = billable;
        }
        Ok(())
    }

    fn create_client(&self, workspace_id: WorkspaceId, name: &str) -> Result<String, String> {
        let client = {
            let mut state = self.state.lock();
            state.calls.push(LibraryCall::CreateClient {
                workspace_id,
                name: name.to_string(),
            });
            Self::check_create(&mut state, &self.catalog, workspace_id, name)?;

            // Clients installed from elsewhere may already use low ids.
            let taken = self
                .catalog
                .clients()
                .iter()
                .map(|c| c.id.0 + 1)
                .max()
                .unwrap_or(1);
            let id = ClientId(state.next_client_id.max(taken));
            state.next_client_id = id.0 + 1;
            Client {
                id,
                guid: uuid::Uuid::new_v4().to_string(),
                name: name.to_string(),
                workspace_id,
            }
        };
        let guid = client.guid.clone();
        self.catalog.upsert_client(client);
        Ok(guid)
    }
}
