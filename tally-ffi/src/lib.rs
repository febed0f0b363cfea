//! C-compatible FFI wrappers around tally-core for the native frontends.
//!
//! Complex values cross the boundary as JSON strings. Callers must free
//! returned strings with `tally_free_string`.
//!
//! The time-tracking library itself lives on the frontend side of the
//! boundary: it is handed to `tally_form_open` as a table of C callbacks.
//!
//! All extern "C" functions are wrapped in `ffi_catch` so Rust panics never
//! cross the FFI boundary. Panic payloads are logged before returning the
//! fallback value.
#![allow(clippy::not_unsafe_ptr_arg_deref)]

use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use tally_core::catalog::Catalog;
use tally_core::color::ProjectColor;
use tally_core::library::{DesktopLibrary, NewProject};
use tally_core::models::{Client, ProjectId, TimeEntry, Workspace, WorkspaceId};
use tally_core::project_form::{ClientCreation, FormEvent, ProjectCreationForm, Rejected};
use tally_core::settings::{self, Settings};

/// Run `f` inside `catch_unwind`, logging the panic payload before returning the
/// fallback value.
fn ffi_catch<T>(fallback: T, f: impl FnOnce() -> T + std::panic::UnwindSafe) -> T {
    match catch_unwind(f) {
        Ok(v) => v,
        Err(payload) => {
            let msg = if let Some(s) = payload.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = payload.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            log::error!("FFI panic caught: {}", msg);
            fallback
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_rust_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: Caller guarantees `ptr` is a valid, null-terminated C string
    // whose memory remains valid for the duration of this call.
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .ok()
        .map(String::from)
}

fn to_c_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => {
            log::warn!(
                "String contains interior NUL bytes, sanitizing ({} chars)",
                s.len()
            );
            let sanitized: String = s.chars().filter(|&c| c != '\0').collect();
            CString::new(sanitized).unwrap_or_default().into_raw()
        }
    }
}

fn to_json_c_string<T: serde::Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => to_c_string(&json),
        Err(e) => {
            log::error!("JSON serialization failed: {}", e);
            to_c_string(&serde_json::json!({ "error": e.to_string() }).to_string())
        }
    }
}

fn from_json_arg<T: serde::de::DeserializeOwned>(ptr: *const c_char, what: &str) -> Option<T> {
    let json = to_rust_str(ptr)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Invalid {} JSON: {}", what, e);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Memory management
// ---------------------------------------------------------------------------

/// Free a string previously returned by a `tally_*` function.
#[no_mangle]
pub extern "C" fn tally_free_string(s: *mut c_char) {
    ffi_catch(
        (),
        AssertUnwindSafe(|| {
            if !s.is_null() {
                // SAFETY: `s` was previously returned by `CString::into_raw` from
                // one of the `tally_*` functions, so it is valid to reclaim it.
                unsafe {
                    drop(CString::from_raw(s));
                }
            }
        }),
    );
}

// ---------------------------------------------------------------------------
// Handle registries
// ---------------------------------------------------------------------------

/// Maps handle addresses to their inner data. Handles are only ever used as
/// opaque keys, never dereferenced.
struct Registry<T> {
    entries: Mutex<HashMap<usize, Arc<T>>>,
}

impl<T> Registry<T> {
    fn new() -> Self {
        Registry {
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn insert(&self, key: usize, value: T) {
        self.entries.lock().insert(key, Arc::new(value));
    }

    fn get(&self, key: usize) -> Option<Arc<T>> {
        self.entries.lock().get(&key).cloned()
    }

    fn remove(&self, key: usize) -> Option<Arc<T>> {
        self.entries.lock().remove(&key)
    }
}

/// Opaque handle token for a catalog.
pub struct TallyCatalogHandle {
    _private: (),
}

/// Opaque handle token for a project creation form.
pub struct TallyFormHandle {
    _private: (),
}

struct FormInner {
    form: Mutex<Option<ProjectCreationForm>>,
    events: Receiver<FormEvent>,
}

fn catalogs() -> &'static Registry<Catalog> {
    static REGISTRY: OnceLock<Registry<Catalog>> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

fn forms() -> &'static Registry<FormInner> {
    static REGISTRY: OnceLock<Registry<FormInner>> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

fn with_catalog<T>(
    handle: *mut TallyCatalogHandle,
    default: T,
    f: impl FnOnce(&Arc<Catalog>) -> T,
) -> T {
    if handle.is_null() {
        return default;
    }
    match catalogs().get(handle as usize) {
        Some(catalog) => f(&catalog),
        None => {
            log::warn!("Attempted to use invalid or freed catalog handle");
            default
        }
    }
}

/// Run `f` with the form behind `handle`. Returns `default` if the handle is
/// null, freed, or the form was already cancelled.
fn with_form<T>(
    handle: *mut TallyFormHandle,
    default: T,
    f: impl FnOnce(&mut ProjectCreationForm) -> T,
) -> T {
    if handle.is_null() {
        return default;
    }
    let inner = match forms().get(handle as usize) {
        Some(inner) => inner,
        None => {
            log::warn!("Attempted to use invalid or freed form handle");
            return default;
        }
    };
    let mut guard = inner.form.lock();
    let result = match guard.as_mut() {
        Some(form) => f(form),
        None => {
            log::debug!("Form handle used after cancel");
            default
        }
    };
    result
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Create an empty catalog of workspaces and clients.
///
/// The caller must free it with `tally_catalog_free`.
#[no_mangle]
pub extern "C" fn tally_catalog_new() -> *mut TallyCatalogHandle {
    ffi_catch(
        std::ptr::null_mut(),
        AssertUnwindSafe(|| {
            let handle = Box::into_raw(Box::new(TallyCatalogHandle { _private: () }));
            catalogs().insert(handle as usize, Catalog::new());
            handle
        }),
    )
}

/// Replace the catalog's workspaces with a JSON array of `Workspace` objects.
///
/// Returns 0 on success, -1 on error.
#[no_mangle]
pub extern "C" fn tally_catalog_set_workspaces(
    handle: *mut TallyCatalogHandle,
    workspaces_json: *const c_char,
) -> i32 {
    ffi_catch(
        -1,
        AssertUnwindSafe(|| {
            let workspaces: Vec<Workspace> = match from_json_arg(workspaces_json, "workspaces") {
                Some(w) => w,
                None => return -1,
            };
            with_catalog(handle, -1, |catalog| {
                catalog.replace_workspaces(workspaces);
                0
            })
        }),
    )
}

/// Replace the catalog's clients with a JSON array of `Client` objects.
///
/// Returns 0 on success, -1 on error.
#[no_mangle]
pub extern "C" fn tally_catalog_set_clients(
    handle: *mut TallyCatalogHandle,
    clients_json: *const c_char,
) -> i32 {
    ffi_catch(
        -1,
        AssertUnwindSafe(|| {
            let clients: Vec<Client> = match from_json_arg(clients_json, "clients") {
                Some(c) => c,
                None => return -1,
            };
            with_catalog(handle, -1, |catalog| {
                catalog.replace_clients(clients);
                0
            })
        }),
    )
}

/// Free a catalog handle. Forms opened on it keep their own reference.
#[no_mangle]
pub extern "C" fn tally_catalog_free(handle: *mut TallyCatalogHandle) {
    ffi_catch(
        (),
        AssertUnwindSafe(|| {
            if handle.is_null() {
                return;
            }
            if catalogs().remove(handle as usize).is_none() {
                log::warn!("tally_catalog_free called on already-freed handle");
                return;
            }
            // SAFETY: `handle` was allocated by `Box::into_raw` in `tally_catalog_new`.
            // The registry removal above ensures this only happens once per handle.
            unsafe {
                drop(Box::from_raw(handle));
            }
        }),
    );
}

// ---------------------------------------------------------------------------
// Library callbacks
// ---------------------------------------------------------------------------

/// Returns the new project id, or 0 on failure.
pub type TallyCreateProjectFn = extern "C" fn(
    context: *mut c_void,
    time_entry_guid: *const c_char,
    workspace_id: u64,
    client_id: u64,
    client_guid: *const c_char,
    project_name: *const c_char,
    color_hex: *const c_char,
    is_public: bool,
) -> u64;

pub type TallySetBillableFn =
    extern "C" fn(context: *mut c_void, time_entry_guid: *const c_char, billable: bool);

/// Returns the new client's GUID, or null on failure. The string is borrowed:
/// it only has to stay valid until the callback returns.
pub type TallyCreateClientFn = extern "C" fn(
    context: *mut c_void,
    workspace_id: u64,
    client_name: *const c_char,
) -> *const c_char;

/// The frontend's time-tracking library, as a table of callbacks.
///
/// Callbacks run while the form is locked and must not call back into the
/// same form handle.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct TallyLibraryCallbacks {
    pub context: *mut c_void,
    pub create_project: Option<TallyCreateProjectFn>,
    pub set_billable: Option<TallySetBillableFn>,
    pub create_client: Option<TallyCreateClientFn>,
}

struct CallbackLibrary {
    callbacks: TallyLibraryCallbacks,
}

// SAFETY: The frontend guarantees `context` may be used from whichever thread
// drives the form, and that the callbacks stay valid until the form is freed.
unsafe impl Send for CallbackLibrary {}
// SAFETY: See above; the frontend serializes calls into its own library.
unsafe impl Sync for CallbackLibrary {}

fn c_arg(s: &str, what: &str) -> Result<CString, String> {
    CString::new(s).map_err(|_| format!("{} contains a NUL byte", what))
}

impl DesktopLibrary for CallbackLibrary {
    fn create_project(&self, project: &NewProject) -> Result<ProjectId, String> {
        let create = self
            .callbacks
            .create_project
            .ok_or_else(|| "create_project callback not set".to_string())?;
        let time_entry_guid = c_arg(&project.time_entry_guid, "time entry GUID")?;
        let client_guid = c_arg(&project.client_guid, "client GUID")?;
        let name = c_arg(&project.name, "project name")?;
        let color_hex = c_arg(&project.color_hex, "color")?;

        let id = create(
            self.callbacks.context,
            time_entry_guid.as_ptr(),
            project.workspace_id.0,
            project.client_id.0,
            client_guid.as_ptr(),
            name.as_ptr(),
            color_hex.as_ptr(),
            project.is_public,
        );
        if id == 0 {
            return Err("library did not create the project".to_string());
        }
        Ok(ProjectId(id))
    }

    fn set_billable(&self, time_entry_guid: &str, billable: bool) -> Result<(), String> {
        let set = self
            .callbacks
            .set_billable
            .ok_or_else(|| "set_billable callback not set".to_string())?;
        let guid = c_arg(time_entry_guid, "time entry GUID")?;
        set(self.callbacks.context, guid.as_ptr(), billable);
        Ok(())
    }

    fn create_client(&self, workspace_id: WorkspaceId, name: &str) -> Result<String, String> {
        let create = self
            .callbacks
            .create_client
            .ok_or_else(|| "create_client callback not set".to_string())?;
        let client_name = c_arg(name, "client name")?;
        let guid = create(self.callbacks.context, workspace_id.0, client_name.as_ptr());
        to_rust_str(guid)
            .filter(|g| !g.is_empty())
            .ok_or_else(|| "library did not create the client".to_string())
    }
}

// ---------------------------------------------------------------------------
// Project creation form
// ---------------------------------------------------------------------------

/// Open a project creation form for the time entry in `time_entry_json`.
///
/// `original_color_hex` may be null to start from the configured default
/// color. Returns null if the catalog handle or time entry is invalid. The
/// caller must free the form with `tally_form_free`.
#[no_mangle]
pub extern "C" fn tally_form_open(
    catalog: *mut TallyCatalogHandle,
    callbacks: TallyLibraryCallbacks,
    time_entry_json: *const c_char,
    original_color_hex: *const c_char,
) -> *mut TallyFormHandle {
    ffi_catch(
        std::ptr::null_mut(),
        AssertUnwindSafe(|| {
            open_form_with_settings(
                catalog,
                callbacks,
                time_entry_json,
                original_color_hex,
                &settings::load(),
            )
        }),
    )
}

fn open_form_with_settings(
    catalog: *mut TallyCatalogHandle,
    callbacks: TallyLibraryCallbacks,
    time_entry_json: *const c_char,
    original_color_hex: *const c_char,
    settings: &Settings,
) -> *mut TallyFormHandle {
    let time_entry: TimeEntry = match from_json_arg(time_entry_json, "time entry") {
        Some(te) => te,
        None => return std::ptr::null_mut(),
    };
    let original_color = match to_rust_str(original_color_hex) {
        Some(hex) => ProjectColor::parse(&hex).unwrap_or_else(|e| {
            log::warn!("{}; using default color", e);
            settings.default_color()
        }),
        None => settings.default_color(),
    };
    let catalog = match with_catalog(catalog, None, |c| Some(Arc::clone(c))) {
        Some(c) => c,
        None => return std::ptr::null_mut(),
    };
    let library: Arc<dyn DesktopLibrary> = Arc::new(CallbackLibrary { callbacks });

    let form = match ProjectCreationForm::open(time_entry, catalog, library, original_color) {
        Ok(form) => form.with_settings(settings),
        Err(e) => {
            log::warn!("tally_form_open: {}", e);
            return std::ptr::null_mut();
        }
    };
    let inner = FormInner {
        events: form.subscribe(),
        form: Mutex::new(Some(form)),
    };

    let handle = Box::into_raw(Box::new(TallyFormHandle { _private: () }));
    forms().insert(handle as usize, inner);
    handle
}

// ---------------------------------------------------------------------------
// Color palette
// ---------------------------------------------------------------------------

fn palette_json(settings: &Settings) -> serde_json::Value {
    let colors: Vec<serde_json::Value> = settings
        .palette()
        .iter()
        .map(|color| {
            let (r, g, b) = color.rgb();
            serde_json::json!({ "hex": color.hex(), "rgb": [r, g, b] })
        })
        .collect();
    serde_json::json!({
        "default": settings.default_color().hex(),
        "colors": colors,
    })
}

/// Return the project color palette for the color picker.
///
/// Returns a JSON object `{"default": "#rrggbb", "colors": [{"hex", "rgb"}]}`.
/// The caller must free the returned string with `tally_free_string`.
#[no_mangle]
pub extern "C" fn tally_project_palette() -> *mut c_char {
    ffi_catch(
        std::ptr::null_mut(),
        AssertUnwindSafe(|| to_c_string(&palette_json(&settings::load()).to_string())),
    )
}

/// Select a workspace by id. Returns false if the catalog does not know it.
#[no_mangle]
pub extern "C" fn tally_form_select_workspace(
    handle: *mut TallyFormHandle,
    workspace_id: u64,
) -> bool {
    ffi_catch(
        false,
        AssertUnwindSafe(|| {
            with_form(handle, false, |form| {
                form.select_workspace_by_id(WorkspaceId(workspace_id))
            })
        }),
    )
}

/// Select a client by GUID. Returns false if the catalog does not know it.
#[no_mangle]
pub extern "C" fn tally_form_select_client(
    handle: *mut TallyFormHandle,
    client_guid: *const c_char,
) -> bool {
    ffi_catch(
        false,
        AssertUnwindSafe(|| {
            let guid = match to_rust_str(client_guid) {
                Some(g) => g,
                None => return false,
            };
            with_form(handle, false, |form| form.select_client_by_guid(&guid))
        }),
    )
}

/// Create a client in the selected workspace and select it.
///
/// Returns 1 if a client was created and selected, 2 if it was created but
/// the catalog does not list it yet (selection unchanged), 0 if nothing was
/// sent to the library (empty name or no workspace; see `FocusWorkspace`
/// events), -1 on error.
#[no_mangle]
pub extern "C" fn tally_form_create_client(
    handle: *mut TallyFormHandle,
    client_name: *const c_char,
) -> i32 {
    ffi_catch(
        -1,
        AssertUnwindSafe(|| {
            let name = match to_rust_str(client_name) {
                Some(n) => n,
                None => return -1,
            };
            with_form(handle, -1, |form| match form.create_client(&name) {
                Ok(ClientCreation::Selected(_)) => 1,
                Ok(ClientCreation::NotInCatalog { .. }) => 2,
                Ok(ClientCreation::Skipped) => 0,
                Err(_) => -1,
            })
        }),
    )
}

/// Set the project name. A null `name` clears it.
#[no_mangle]
pub extern "C" fn tally_form_set_name(handle: *mut TallyFormHandle, name: *const c_char) {
    ffi_catch(
        (),
        AssertUnwindSafe(|| {
            let name = to_rust_str(name).unwrap_or_default();
            with_form(handle, (), |form| form.set_name(&name));
        }),
    );
}

/// Select a `#rrggbb` color. Returns false if the color is malformed.
#[no_mangle]
pub extern "C" fn tally_form_select_color(
    handle: *mut TallyFormHandle,
    color_hex: *const c_char,
) -> bool {
    ffi_catch(
        false,
        AssertUnwindSafe(|| {
            let color = match to_rust_str(color_hex).map(|hex| ProjectColor::parse(&hex)) {
                Some(Ok(color)) => color,
                Some(Err(e)) => {
                    log::warn!("tally_form_select_color: {}", e);
                    return false;
                }
                None => return false,
            };
            with_form(handle, false, |form| {
                form.select_color(color);
                true
            })
        }),
    )
}

/// Restore the color the form was opened with.
#[no_mangle]
pub extern "C" fn tally_form_reset_color(handle: *mut TallyFormHandle) {
    ffi_catch(
        (),
        AssertUnwindSafe(|| with_form(handle, (), |form| form.reset_color())),
    );
}

/// Mark the pending project public (`true`) or private (`false`).
#[no_mangle]
pub extern "C" fn tally_form_set_public(handle: *mut TallyFormHandle, is_public: bool) {
    ffi_catch(
        (),
        AssertUnwindSafe(|| with_form(handle, (), |form| form.set_public(is_public))),
    );
}

/// Show or hide the color picker. Returns the height the form now wants.
#[no_mangle]
pub extern "C" fn tally_form_toggle_color_picker(handle: *mut TallyFormHandle, on: bool) -> f64 {
    ffi_catch(
        0.0,
        AssertUnwindSafe(|| {
            with_form(handle, 0.0, |form| {
                form.toggle_color_picker(on);
                form.suitable_height()
            })
        }),
    )
}

/// Whether workspace, client and a non-empty name are all set, i.e. whether
/// the add button should be enabled.
#[no_mangle]
pub extern "C" fn tally_form_is_valid(handle: *mut TallyFormHandle) -> bool {
    ffi_catch(
        false,
        AssertUnwindSafe(|| with_form(handle, false, |form| form.is_valid())),
    )
}

/// Create the project. Returns the new project id, or 0 if nothing was
/// created (incomplete form, already submitted, or library failure).
#[no_mangle]
pub extern "C" fn tally_form_submit(handle: *mut TallyFormHandle) -> u64 {
    ffi_catch(
        0,
        AssertUnwindSafe(|| {
            with_form(handle, 0, |form| match form.submit() {
                Ok(id) => id.0,
                Err(Rejected::Incomplete) => 0,
                Err(e) => {
                    log::warn!("tally_form_submit: {}", e);
                    0
                }
            })
        }),
    )
}

/// Cancel the form. It emits `Cancelled` and ignores every later call
/// except `tally_form_poll_event` and `tally_form_free`.
#[no_mangle]
pub extern "C" fn tally_form_cancel(handle: *mut TallyFormHandle) {
    ffi_catch(
        (),
        AssertUnwindSafe(|| {
            if handle.is_null() {
                return;
            }
            if let Some(inner) = forms().get(handle as usize) {
                if let Some(form) = inner.form.lock().take() {
                    form.cancel();
                }
            }
        }),
    );
}

/// Return the form state as a JSON `FormSnapshot`, or null for a bad handle.
/// The caller must free the returned string with `tally_free_string`.
#[no_mangle]
pub extern "C" fn tally_form_snapshot(handle: *mut TallyFormHandle) -> *mut c_char {
    ffi_catch(
        std::ptr::null_mut(),
        AssertUnwindSafe(|| {
            with_form(handle, std::ptr::null_mut(), |form| {
                to_json_c_string(&form.snapshot())
            })
        }),
    )
}

/// Poll for form events (size changes, submit state, added, cancelled).
///
/// Returns a JSON string describing the event, or null if no events are pending.
/// The caller must free the returned string with `tally_free_string`.
#[no_mangle]
pub extern "C" fn tally_form_poll_event(handle: *mut TallyFormHandle) -> *mut c_char {
    ffi_catch(
        std::ptr::null_mut(),
        AssertUnwindSafe(|| {
            if handle.is_null() {
                return std::ptr::null_mut();
            }
            let inner = match forms().get(handle as usize) {
                Some(inner) => inner,
                None => return std::ptr::null_mut(),
            };
            match inner.events.try_recv() {
                Ok(event) => to_json_c_string(&event),
                Err(_) => std::ptr::null_mut(),
            }
        }),
    )
}

/// Free a form handle.
#[no_mangle]
pub extern "C" fn tally_form_free(handle: *mut TallyFormHandle) {
    ffi_catch(
        (),
        AssertUnwindSafe(|| {
            if handle.is_null() {
                return;
            }
            if forms().remove(handle as usize).is_none() {
                log::warn!("tally_form_free called on already-freed handle");
                return; // Don't double-free
            }
            // SAFETY: `handle` was allocated by `Box::into_raw` in `tally_form_open`.
            // The registry removal above ensures this only happens once per handle.
            unsafe {
                drop(Box::from_raw(handle));
            }
        }),
    );
}
