pub mod error;
pub mod settings;

pub use error::{PromptforgeError, Result};
pub use settings::{PresetSaveOutcome, SettingsStore};
