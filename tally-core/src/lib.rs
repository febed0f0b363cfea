pub mod catalog;
pub mod color;
pub mod events;
pub mod fixture;
pub mod library;
pub mod memory;
pub mod models;
pub mod project_form;
pub mod settings;
pub mod timeline_menu;
pub mod timer;
