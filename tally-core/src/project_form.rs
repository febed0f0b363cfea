//! Inline project creation for the time-entry editor.
//!
//! A [`ProjectCreationForm`] holds the pending project for a single time
//! entry: workspace, client, name, color and visibility. Submission hands
//! everything to the [`DesktopLibrary`], which creates the project and
//! assigns it to the entry. The form never persists anything itself and is
//! discarded after one submission or a cancel.

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::color::ProjectColor;
use crate::events::Broadcaster;
use crate::library::{DesktopLibrary, NewProject};
use crate::models::{Client, ProjectId, TimeEntry, Workspace, WorkspaceId};
use crate::settings::Settings;

/// Whether the color picker is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    Compact,
    Full,
}

/// Heights the host view should give the form in each display mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormLayout {
    pub compact_height: f64,
    pub full_height: f64,
}

impl Default for FormLayout {
    fn default() -> Self {
        FormLayout {
            compact_height: 200.0,
            full_height: 400.0,
        }
    }
}

impl FormLayout {
    pub fn height(&self, mode: DisplayMode) -> f64 {
        match mode {
            DisplayMode::Compact => self.compact_height,
            DisplayMode::Full => self.full_height,
        }
    }
}

/// Notifications for the view hosting the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FormEvent {
    Cancelled,
    Added { project_id: ProjectId },
    SizeChanged { height: f64 },
    /// A client was requested before any workspace was chosen.
    FocusWorkspace,
    SubmitEnabled { enabled: bool },
}

/// Why [`ProjectCreationForm::submit`] did not create a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    /// Workspace, client or name is missing. Nothing was sent to the library.
    Incomplete,
    /// The form already created its project.
    AlreadySubmitted,
    /// The library refused the project.
    Library(String),
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::Incomplete => write!(f, "project form is incomplete"),
            Rejected::AlreadySubmitted => write!(f, "project was already created"),
            Rejected::Library(e) => write!(f, "library rejected project: {}", e),
        }
    }
}

impl std::error::Error for Rejected {}

/// Outcome of [`ProjectCreationForm::create_client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCreation {
    /// Nothing was sent to the library (empty name or no workspace).
    Skipped,
    /// The client was created and is now selected.
    Selected(Client),
    /// The library created the client but the catalog does not list it yet,
    /// so the selection is unchanged.
    NotInCatalog { guid: String },
}

/// Serializable view of the form state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub time_entry_guid: String,
    pub name: String,
    pub workspace: Option<Workspace>,
    pub client: Option<Client>,
    pub color: ProjectColor,
    pub is_public: bool,
    pub display_mode: DisplayMode,
    pub suitable_height: f64,
    pub is_valid: bool,
}

pub struct ProjectCreationForm {
    time_entry: TimeEntry,
    catalog: Arc<Catalog>,
    library: Arc<dyn DesktopLibrary>,
    name: String,
    workspace: Option<Workspace>,
    client: Option<Client>,
    original_color: ProjectColor,
    color: ProjectColor,
    is_public: bool,
    display_mode: DisplayMode,
    layout: FormLayout,
    submit_enabled: bool,
    submitted: bool,
    events: Broadcaster<FormEvent>,
}

impl ProjectCreationForm {
    /// Open a form bound to `time_entry`.
    ///
    /// `original_color` is what [`reset_color`](Self::reset_color) restores;
    /// pass [`ProjectColor::default`] when creating from scratch. The first
    /// workspace in the catalog, if any, is preselected.
    pub fn open(
        time_entry: TimeEntry,
        catalog: Arc<Catalog>,
        library: Arc<dyn DesktopLibrary>,
        original_color: ProjectColor,
    ) -> Result<Self, String> {
        if time_entry.guid.is_empty() {
            return Err("Cannot create a project for a time entry without a GUID".to_string());
        }

        let workspace = catalog.first_workspace();
        let mut form = ProjectCreationForm {
            time_entry,
            catalog,
            library,
            name: String::new(),
            workspace,
            client: None,
            color: original_color.clone(),
            original_color,
            is_public: false,
            display_mode: DisplayMode::Compact,
            layout: FormLayout::default(),
            submit_enabled: false,
            submitted: false,
            events: Broadcaster::new(),
        };
        form.submit_enabled = form.is_valid();
        log::debug!(
            "Project form opened for time entry {} (workspace: {:?})",
            form.time_entry.guid,
            form.workspace.as_ref().map(|w| w.id)
        );
        Ok(form)
    }

    /// Apply layout heights and the default visibility from settings.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.layout = FormLayout {
            compact_height: settings.compact_form_height,
            full_height: settings.expanded_form_height,
        };
        self.is_public = settings.public_by_default;
        self
    }

    pub fn subscribe(&self) -> Receiver<FormEvent> {
        self.events.subscribe()
    }

    // ── State ────────────────────────────────────────────────────────────

    pub fn time_entry(&self) -> &TimeEntry {
        &self.time_entry
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selected_workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn selected_client(&self) -> Option<&Client> {
        self.client.as_ref()
    }

    pub fn color(&self) -> &ProjectColor {
        &self.color
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn suitable_height(&self) -> f64 {
        self.layout.height(self.display_mode)
    }

    /// Workspace, client and a non-empty name are all set.
    pub fn is_valid(&self) -> bool {
        self.workspace.is_some() && self.client.is_some() && !self.name.is_empty()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            time_entry_guid: self.time_entry.guid.clone(),
            name: self.name.clone(),
            workspace: self.workspace.clone(),
            client: self.client.clone(),
            color: self.color.clone(),
            is_public: self.is_public,
            display_mode: self.display_mode,
            suitable_height: self.suitable_height(),
            is_valid: self.is_valid(),
        }
    }

    // ── Edits ────────────────────────────────────────────────────────────

    pub fn set_name(&mut self, name: &str) {
        log::debug!("Project form: name set ({} chars)", name.chars().count());
        self.name = name.to_string();
        self.refresh_submit_state();
    }

    /// Prefill the name, e.g. with what the user typed in the project field.
    pub fn set_title_and_focus(&mut self, title: &str) {
        self.set_name(title);
    }

    pub fn select_workspace(&mut self, workspace: Workspace) {
        log::debug!("Project form: workspace {} selected", workspace.id);
        self.workspace = Some(workspace);
        self.refresh_submit_state();
    }

    /// Select a workspace from the catalog. Returns `false` if it is unknown.
    pub fn select_workspace_by_id(&mut self, id: WorkspaceId) -> bool {
        match self.catalog.workspace_by_id(id) {
            Some(workspace) => {
                self.select_workspace(workspace);
                true
            }
            None => {
                log::warn!("Project form: unknown workspace {}", id);
                false
            }
        }
    }

    pub fn select_client(&mut self, client: Client) {
        log::debug!("Project form: client {} selected", client.guid);
        self.client = Some(client);
        self.refresh_submit_state();
    }

    /// Select a client from the catalog. Returns `false` if it is unknown.
    pub fn select_client_by_guid(&mut self, guid: &str) -> bool {
        match self.catalog.client_by_guid(guid) {
            Some(client) => {
                self.select_client(client);
                true
            }
            None => {
                log::warn!("Project form: unknown client {}", guid);
                false
            }
        }
    }

    /// Ask the library for a new client in the selected workspace and select it.
    ///
    /// An empty name is ignored. Without a selected workspace nothing is
    /// created and `FocusWorkspace` is emitted instead.
    pub fn create_client(&mut self, name: &str) -> Result<ClientCreation, String> {
        if name.is_empty() {
            log::debug!("Project form: empty client name ignored");
            return Ok(ClientCreation::Skipped);
        }
        let workspace_id = match &self.workspace {
            Some(workspace) => workspace.id,
            None => {
                log::info!("Project form: pick a workspace before creating client '{}'", name);
                self.events.publish(FormEvent::FocusWorkspace);
                return Ok(ClientCreation::Skipped);
            }
        };

        let guid = self.library.create_client(workspace_id, name).map_err(|e| {
            log::warn!("Failed to create client '{}': {}", name, e);
            e
        })?;

        match self.catalog.client_by_guid(&guid) {
            Some(client) => {
                self.select_client(client.clone());
                Ok(ClientCreation::Selected(client))
            }
            None => {
                log::warn!("Created client {} is not in the catalog yet", guid);
                Ok(ClientCreation::NotInCatalog { guid })
            }
        }
    }

    pub fn select_color(&mut self, color: ProjectColor) {
        log::debug!("Project form: color {} selected", color.hex());
        self.color = color;
    }

    /// Go back to the color the form was opened with.
    pub fn reset_color(&mut self) {
        log::debug!("Project form: color reset to {}", self.original_color.hex());
        self.color = self.original_color.clone();
    }

    pub fn set_public(&mut self, is_public: bool) {
        log::debug!("Project form: public = {}", is_public);
        self.is_public = is_public;
    }

    pub fn toggle_color_picker(&mut self, on: bool) {
        self.display_mode = if on {
            DisplayMode::Full
        } else {
            DisplayMode::Compact
        };
        log::debug!("Project form: display mode {:?}", self.display_mode);
        self.events.publish(FormEvent::SizeChanged {
            height: self.suitable_height(),
        });
    }

    // ── Completion ───────────────────────────────────────────────────────

    /// Create the project and assign it to the bound time entry.
    ///
    /// An incomplete form sends nothing to the library. When the entry is
    /// billable the flag is re-applied after creation; the outcome of that
    /// call is only logged.
    pub fn submit(&mut self) -> Result<ProjectId, Rejected> {
        if self.submitted {
            return Err(Rejected::AlreadySubmitted);
        }
        let (workspace, client) = match (&self.workspace, &self.client) {
            (Some(workspace), Some(client)) if !self.name.is_empty() => (workspace, client),
            _ => {
                log::debug!("Project form: submit ignored, form incomplete");
                return Err(Rejected::Incomplete);
            }
        };

        let project = NewProject {
            time_entry_guid: self.time_entry.guid.clone(),
            workspace_id: workspace.id,
            client_id: client.id,
            client_guid: client.guid.clone(),
            name: self.name.clone(),
            color_hex: self.color.hex().to_string(),
            is_public: self.is_public,
        };

        let project_id = self.library.create_project(&project).map_err(|e| {
            log::warn!("Failed to create project '{}': {}", project.name, e);
            Rejected::Library(e)
        })?;
        log::info!(
            "Created project {} '{}' for time entry {}",
            project_id,
            project.name,
            project.time_entry_guid
        );

        if self.time_entry.billable {
            if let Err(e) = self
                .library
                .set_billable(&self.time_entry.guid, self.time_entry.billable)
            {
                log::warn!(
                    "Failed to re-apply billable flag on {}: {}",
                    self.time_entry.guid,
                    e
                );
            }
        }

        self.submitted = true;
        self.events.publish(FormEvent::Added { project_id });
        Ok(project_id)
    }

    pub fn cancel(self) {
        log::debug!("Project form cancelled for {}", self.time_entry.guid);
        self.events.publish(FormEvent::Cancelled);
    }

    fn refresh_submit_state(&mut self) {
        let enabled = self.is_valid();
        if enabled != self.submit_enabled {
            self.submit_enabled = enabled;
            self.events.publish(FormEvent::SubmitEnabled { enabled });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{LibraryCall, MemoryLibrary};
    use crate::models::ClientId;

    fn workspace(id: u64) -> Workspace {
        Workspace {
            id: WorkspaceId(id),
            name: format!("Workspace {}", id),
        }
    }

    fn client(id: u64, guid: &str, ws: u64) -> Client {
        Client {
            id: ClientId(id),
            guid: guid.to_string(),
            name: format!("Client {}", id),
            workspace_id: WorkspaceId(ws),
        }
    }

    fn entry(guid: &str, billable: bool) -> TimeEntry {
        TimeEntry {
            guid: guid.to_string(),
            description: "Writing docs".to_string(),
            billable,
            start: 1_000,
            stop: Some(2_000),
            project_id: None,
        }
    }

    fn setup(workspaces: Vec<Workspace>) -> (Arc<Catalog>, Arc<MemoryLibrary>) {
        let catalog = Arc::new(Catalog::new());
        catalog.replace_workspaces(workspaces);
        let library = Arc::new(MemoryLibrary::new(Arc::clone(&catalog)));
        (catalog, library)
    }

    fn open(
        te: TimeEntry,
        catalog: &Arc<Catalog>,
        library: &Arc<MemoryLibrary>,
    ) -> ProjectCreationForm {
        ProjectCreationForm::open(
            te,
            Arc::clone(catalog),
            Arc::clone(library) as Arc<dyn DesktopLibrary>,
            ProjectColor::default(),
        )
        .unwrap()
    }

    #[test]
    fn open_selects_first_workspace() {
        let (catalog, library) = setup(vec![workspace(1), workspace(2)]);
        let form = open(entry("TE1", false), &catalog, &library);
        assert_eq!(form.selected_workspace().unwrap().id, WorkspaceId(1));
        assert!(form.selected_client().is_none());
        assert!(!form.is_public());
        assert_eq!(form.display_mode(), DisplayMode::Compact);
        assert_eq!(form.color(), &ProjectColor::default());
    }

    #[test]
    fn open_without_workspaces_leaves_selection_empty() {
        let (catalog, library) = setup(vec![]);
        let form = open(entry("TE1", false), &catalog, &library);
        assert!(form.selected_workspace().is_none());
    }

    #[test]
    fn open_rejects_entry_without_guid() {
        let (catalog, library) = setup(vec![]);
        let result = ProjectCreationForm::open(
            entry("", false),
            catalog,
            library as Arc<dyn DesktopLibrary>,
            ProjectColor::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn validity_requires_workspace_client_and_name() {
        let (catalog, library) = setup(vec![]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        assert!(!form.is_valid());

        form.set_name("Project X");
        assert!(!form.is_valid());
        form.select_client(client(2, "C2", 1));
        assert!(!form.is_valid());
        form.select_workspace(workspace(1));
        assert!(form.is_valid());

        form.set_name("");
        assert!(!form.is_valid());
    }

    #[test]
    fn validity_ignores_color_and_visibility() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        form.select_client(client(2, "C2", 1));
        form.set_name("Project X");
        for public in [false, true] {
            form.set_public(public);
            form.select_color(ProjectColor::parse("#d92b2b").unwrap());
            assert!(form.is_valid());
            form.reset_color();
            assert!(form.is_valid());
        }
    }

    #[test]
    fn reset_restores_original_not_default() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let original = ProjectColor::parse("#2da608").unwrap();
        let mut form = ProjectCreationForm::open(
            entry("TE1", false),
            Arc::clone(&catalog),
            Arc::clone(&library) as Arc<dyn DesktopLibrary>,
            original.clone(),
        )
        .unwrap();
        form.select_color(ProjectColor::parse("#990099").unwrap());
        form.reset_color();
        assert_eq!(form.color(), &original);
        assert_ne!(form.color(), &ProjectColor::default());
    }

    #[test]
    fn submit_billable_entry_creates_project_then_sets_billable() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", true), &catalog, &library);
        form.select_workspace(workspace(1));
        form.select_client(client(2, "C2", 1));
        form.set_name("Project X");

        let project_id = form.submit().unwrap();

        assert_eq!(
            library.calls(),
            vec![
                LibraryCall::CreateProject(NewProject {
                    time_entry_guid: "TE1".to_string(),
                    workspace_id: WorkspaceId(1),
                    client_id: ClientId(2),
                    client_guid: "C2".to_string(),
                    name: "Project X".to_string(),
                    color_hex: ProjectColor::default().hex().to_string(),
                    is_public: false,
                }),
                LibraryCall::SetBillable {
                    time_entry_guid: "TE1".to_string(),
                    billable: true,
                },
            ]
        );
        assert_eq!(project_id, ProjectId(1));
    }

    #[test]
    fn submit_non_billable_entry_skips_billable_call() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        form.select_client(client(2, "C2", 1));
        form.set_name("Project X");
        form.set_public(true);
        form.submit().unwrap();

        let calls = library.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            LibraryCall::CreateProject(project) => assert!(project.is_public),
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[test]
    fn submit_with_empty_name_makes_no_calls() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", true), &catalog, &library);
        form.select_client(client(2, "C2", 1));
        assert_eq!(form.submit(), Err(Rejected::Incomplete));
        assert!(library.calls().is_empty());
    }

    #[test]
    fn second_submit_is_refused() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        form.select_client(client(2, "C2", 1));
        form.set_name("Project X");
        form.submit().unwrap();
        assert_eq!(form.submit(), Err(Rejected::AlreadySubmitted));
        assert_eq!(library.calls().len(), 1);
    }

    #[test]
    fn library_failure_is_passed_through() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        form.select_client(client(2, "C2", 1));
        form.set_name("Project X");
        library.fail_next("duplicate project name");
        assert_eq!(
            form.submit(),
            Err(Rejected::Library("duplicate project name".to_string()))
        );
        // Still allowed to retry.
        assert!(form.submit().is_ok());
    }

    #[test]
    fn create_client_with_empty_name_does_nothing() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        assert_eq!(form.create_client(""), Ok(ClientCreation::Skipped));
        assert!(library.calls().is_empty());
    }

    #[test]
    fn create_client_without_workspace_requests_focus() {
        let (catalog, library) = setup(vec![]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        let selected = client(5, "C5", 1);
        form.select_client(selected.clone());
        let events = form.subscribe();

        assert_eq!(form.create_client("Acme"), Ok(ClientCreation::Skipped));

        assert!(library.calls().is_empty());
        assert_eq!(form.selected_client(), Some(&selected));
        assert_eq!(events.try_recv().unwrap(), FormEvent::FocusWorkspace);
    }

    #[test]
    fn create_client_selects_new_client() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        let created = match form.create_client("Acme").unwrap() {
            ClientCreation::Selected(client) => client,
            other => panic!("unexpected outcome {:?}", other),
        };
        assert_eq!(created.name, "Acme");
        assert_eq!(created.workspace_id, WorkspaceId(1));
        assert_eq!(form.selected_client(), Some(&created));
        assert_eq!(
            library.calls(),
            vec![LibraryCall::CreateClient {
                workspace_id: WorkspaceId(1),
                name: "Acme".to_string(),
            }]
        );
    }

    struct DetachedLibrary;

    impl DesktopLibrary for DetachedLibrary {
        fn create_project(&self, _project: &NewProject) -> Result<ProjectId, String> {
            Ok(ProjectId(1))
        }

        fn set_billable(&self, _time_entry_guid: &str, _billable: bool) -> Result<(), String> {
            Ok(())
        }

        fn create_client(&self, _workspace_id: WorkspaceId, _name: &str) -> Result<String, String> {
            Ok("G-unsynced".to_string())
        }
    }

    #[test]
    fn created_client_missing_from_catalog_keeps_selection() {
        let (catalog, _) = setup(vec![workspace(1)]);
        let mut form = ProjectCreationForm::open(
            entry("TE1", false),
            Arc::clone(&catalog),
            Arc::new(DetachedLibrary),
            ProjectColor::default(),
        )
        .unwrap();
        let selected = client(2, "C2", 1);
        form.select_client(selected.clone());

        assert_eq!(
            form.create_client("Acme"),
            Ok(ClientCreation::NotInCatalog {
                guid: "G-unsynced".to_string()
            })
        );
        assert_eq!(form.selected_client(), Some(&selected));
    }

    #[test]
    fn submit_enabled_emitted_on_validity_change() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        let events = form.subscribe();
        form.select_client(client(2, "C2", 1));
        form.set_name("P");
        form.set_name("Pr");
        form.set_name("");
        let received: Vec<FormEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                FormEvent::SubmitEnabled { enabled: true },
                FormEvent::SubmitEnabled { enabled: false },
            ]
        );
    }

    #[test]
    fn color_picker_toggles_height() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        let events = form.subscribe();
        form.toggle_color_picker(true);
        assert_eq!(form.display_mode(), DisplayMode::Full);
        assert_eq!(form.suitable_height(), 400.0);
        form.toggle_color_picker(false);
        assert_eq!(form.suitable_height(), 200.0);
        assert_eq!(
            events.try_iter().collect::<Vec<_>>(),
            vec![
                FormEvent::SizeChanged { height: 400.0 },
                FormEvent::SizeChanged { height: 200.0 },
            ]
        );
    }

    #[test]
    fn settings_apply_layout_and_visibility() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let settings = Settings {
            public_by_default: true,
            expanded_form_height: 480.0,
            ..Settings::default()
        };
        let mut form = open(entry("TE1", false), &catalog, &library).with_settings(&settings);
        assert!(form.is_public());
        form.toggle_color_picker(true);
        assert_eq!(form.suitable_height(), 480.0);
    }

    #[test]
    fn added_and_cancelled_events() {
        let (catalog, library) = setup(vec![workspace(1)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        form.select_client(client(2, "C2", 1));
        form.set_name("Project X");
        let events = form.subscribe();
        let project_id = form.submit().unwrap();
        assert_eq!(events.try_recv().unwrap(), FormEvent::Added { project_id });

        let form = open(entry("TE2", false), &catalog, &library);
        let events = form.subscribe();
        form.cancel();
        assert_eq!(events.try_recv().unwrap(), FormEvent::Cancelled);
    }

    #[test]
    fn selection_by_catalog_lookup() {
        let (catalog, library) = setup(vec![workspace(1), workspace(2)]);
        catalog.replace_clients(vec![client(2, "C2", 2)]);
        let mut form = open(entry("TE1", false), &catalog, &library);
        assert!(form.select_workspace_by_id(WorkspaceId(2)));
        assert!(!form.select_workspace_by_id(WorkspaceId(9)));
        assert!(form.select_client_by_guid("C2"));
        assert!(!form.select_client_by_guid("missing"));
        let snapshot = form.snapshot();
        assert_eq!(snapshot.workspace.unwrap().id, WorkspaceId(2));
        assert_eq!(snapshot.client.unwrap().guid, "C2");
        assert!(!snapshot.is_valid);
    }
}
