//! Settings persistence for Promptforge
//!
//! Loads settings from `<settings dir>/settings.dat` and reconciles them
//! against the built-in default schema on every load: legacy flat keys are
//! migrated into their sub-object groups, missing keys are filled with
//! defaults, keys the schema no longer knows are pruned, and schema-owned
//! lists are refreshed. Presets live under `<settings dir>/presets/`.
//!
//! # Example
//!
//! ```no_run
//! use promptforge::settings::SettingsStore;
//!
//! let store = SettingsStore::open_default().expect("Failed to open settings");
//! let settings = store.load().expect("Failed to load settings");
//! println!("Selected model: {}", settings["selected_model"]);
//! ```

pub mod defaults;
pub mod reconcile;
pub mod store;
pub mod validate;

pub use store::{PresetSaveOutcome, SettingsStore};
pub use validate::{PathValidator, PortablePathValidator};
