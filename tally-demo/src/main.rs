use std::path::PathBuf;
use std::sync::Arc;

use tally_core::catalog::Catalog;
use tally_core::fixture;
use tally_core::library::DesktopLibrary;
use tally_core::memory::MemoryLibrary;
use tally_core::project_form::{ClientCreation, ProjectCreationForm, Rejected};
use tally_core::settings;
use tally_core::timer::TimerState;

const USAGE: &str = "usage: tally-demo <me.json> <project name> [new client name]";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }

    if let Err(e) = run(PathBuf::from(&args[0]), &args[1], args.get(2).map(String::as_str)) {
        eprintln!("tally-demo: {}", e);
        std::process::exit(1);
    }
}

fn run(fixture_path: PathBuf, project_name: &str, new_client: Option<&str>) -> Result<(), String> {
    let settings = settings::load();
    let data = fixture::load(&fixture_path)?;

    let catalog = Arc::new(Catalog::new());
    let library = Arc::new(MemoryLibrary::new(Arc::clone(&catalog)));
    let library_events = library.subscribe();
    fixture::install(&data, &catalog, &library);

    let mut timer = TimerState::new();
    timer.drain(&library_events);
    let time_entry = timer
        .time_entries
        .first()
        .cloned()
        .ok_or_else(|| format!("{} has no time entries", fixture_path.display()))?;
    log::info!("Creating project for time entry {}", time_entry.guid);

    let mut form = ProjectCreationForm::open(
        time_entry,
        Arc::clone(&catalog),
        Arc::clone(&library) as Arc<dyn DesktopLibrary>,
        settings.default_color(),
    )?
    .with_settings(&settings);
    let form_events = form.subscribe();

    match new_client {
        Some(name) => {
            if let ClientCreation::NotInCatalog { guid } = form.create_client(name)? {
                log::warn!("Client {} not in catalog yet; no client selected", guid);
            }
        }
        None => {
            let first_client = form
                .selected_workspace()
                .and_then(|w| catalog.clients_in(w.id).into_iter().next());
            if let Some(client) = first_client {
                form.select_client(client);
            }
        }
    }
    form.set_name(project_name);

    match form.submit() {
        Ok(project_id) => println!("created project {}", project_id),
        Err(Rejected::Incomplete) => {
            println!("form incomplete: {}", describe(&form));
        }
        Err(e) => return Err(e.to_string()),
    }

    for event in form_events.try_iter() {
        log::debug!("form event: {:?}", event);
    }
    let calls = serde_json::to_string_pretty(&library.calls())
        .map_err(|e| format!("Failed to serialize calls: {}", e))?;
    println!("{}", calls);
    Ok(())
}

fn describe(form: &ProjectCreationForm) -> String {
    let mut missing = Vec::new();
    if form.selected_workspace().is_none() {
        missing.push("workspace");
    }
    if form.selected_client().is_none() {
        missing.push("client");
    }
    if form.name().is_empty() {
        missing.push("name");
    }
    format!("missing {}", missing.join(", "))
}
