use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Promptforge
#[derive(Error, Debug)]
pub enum PromptforgeError {
    #[error("Failed to parse {}: {source}\n\nTroubleshooting:\n- The file is not valid JSON\n- Check for trailing commas or truncated content\n- Delete the file to regenerate it from defaults on next load", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Settings migration failed: group '{group}' is new but legacy flat key '{key}' is missing\n\nTroubleshooting:\n- The settings file predates the '{group}' group but lost one of its flat keys\n- Restore the key, or delete the settings file to regenerate defaults")]
    Migration { group: String, key: String },

    #[error("Settings error: {0}\n\nTroubleshooting:\n- Check that the settings directory exists and is writable\n- Run with RUST_LOG=debug for more details")]
    Settings(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PromptforgeError>;
