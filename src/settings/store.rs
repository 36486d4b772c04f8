use crate::error::{PromptforgeError, Result};
use crate::settings::defaults::default_schema;
use crate::settings::reconcile;
use crate::settings::validate::{PathValidator, PortablePathValidator};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Primary settings document inside the settings directory.
const SETTINGS_FILE: &str = "settings.dat";

/// Sub-directory holding named preset snapshots.
const PRESETS_DIR: &str = "presets";

/// Suffix appended to a preset name to form its file name.
const PRESET_SUFFIX: &str = "_preset.dat";

/// Placeholder shipped in the presets directory; never a real preset.
const PRESET_SENTINEL: &str = "presets_go_here.txt";

/// Ancillary prompt-iteration data, loaded read-only.
const PROMPT_DATA_FILE: &str = "data.json";

/// Outcome of a preset save attempt.
///
/// A bad preset path is an expected condition, not an error: callers get
/// `PathRejected` back instead of a raised failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetSaveOutcome {
    Saved,
    PathRejected,
}

/// Store for the settings document, its presets, and prompt data.
///
/// The store owns the default schema and the settings directory; the
/// settings document itself is always passed in or returned, never held
/// as shared mutable state, so two stores can never alias one document.
pub struct SettingsStore {
    settings_dir: PathBuf,
    defaults: Map<String, Value>,
    validator: Box<dyn PathValidator>,
}

impl SettingsStore {
    /// Create a store over the given settings directory
    pub fn new(settings_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings_dir: settings_dir.into(),
            defaults: default_schema(),
            validator: Box::new(PortablePathValidator),
        }
    }

    /// Create a store over the platform config directory
    /// (`$XDG_CONFIG_HOME/promptforge` or equivalent)
    pub fn open_default() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            PromptforgeError::Settings("Could not resolve a config directory".to_string())
        })?;
        Ok(Self::new(base.join("promptforge")))
    }

    /// Replace the path validator used for preset saves
    #[must_use]
    pub fn with_validator(mut self, validator: Box<dyn PathValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Get the default schema
    #[must_use]
    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    /// Load the settings document and reconcile it against the schema.
    ///
    /// When no settings file exists, returns a copy of the default schema
    /// and writes nothing. Otherwise the loaded document is migrated,
    /// filled, pruned, refreshed, and persisted back as those steps
    /// require, then returned.
    pub fn load(&self) -> Result<Map<String, Value>> {
        let path = self.settings_path();
        if !path.is_file() {
            tracing::info!("No settings file at {}, using defaults", path.display());
            return Ok(self.defaults.clone());
        }

        let mut doc = read_json_map(&path)?;
        self.reconcile(&mut doc)?;
        Ok(doc)
    }

    /// Serialize the given document verbatim to the primary settings file.
    ///
    /// Pretty-printed with 4-space indentation. No validation and no
    /// reconciliation; the document is written as-is.
    pub fn save(&self, doc: &Map<String, Value>) -> Result<()> {
        fs::create_dir_all(&self.settings_dir)?;

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        doc.serialize(&mut serializer).map_err(|e| {
            PromptforgeError::Settings(format!("Failed to serialize settings: {e}"))
        })?;

        fs::write(self.settings_path(), buf)?;
        Ok(())
    }

    /// List the names of saved presets, sorted.
    ///
    /// Returns an empty list when the presets directory is missing or
    /// holds nothing but the placeholder file.
    pub fn list_presets(&self) -> Result<Vec<String>> {
        let dir = self.presets_dir();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name == PRESET_SENTINEL {
                continue;
            }
            if let Some(stem) = name.strip_suffix(PRESET_SUFFIX) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Load a named preset and reconcile it against the schema.
    ///
    /// Returns `Ok(None)` when the preset does not exist. Reconciliation
    /// persists the primary settings file as a side effect, exactly as
    /// [`load`](Self::load) does.
    pub fn load_preset(&self, name: &str) -> Result<Option<Map<String, Value>>> {
        let path = self.preset_path(name);
        if !path.is_file() {
            tracing::debug!("No preset '{name}' at {}", path.display());
            return Ok(None);
        }

        let mut doc = read_json_map(&path)?;
        self.reconcile(&mut doc)?;
        Ok(Some(doc))
    }

    /// Save the given document as a named preset, compact-serialized.
    ///
    /// The target path is checked first; an invalid path is reported as
    /// [`PresetSaveOutcome::PathRejected`] without writing anything. The
    /// document is saved as-is, without reconciliation.
    pub fn save_preset(&self, name: &str, doc: &Map<String, Value>) -> Result<PresetSaveOutcome> {
        let path = self.preset_path(name);
        if !self.validator.is_valid_target(&path) {
            tracing::warn!("Rejected preset path {}", path.display());
            return Ok(PresetSaveOutcome::PathRejected);
        }

        let content = serde_json::to_string(doc).map_err(|e| {
            PromptforgeError::Settings(format!("Failed to serialize preset '{name}': {e}"))
        })?;
        fs::write(&path, content)?;

        tracing::info!("Saved preset '{name}'");
        Ok(PresetSaveOutcome::Saved)
    }

    /// Load the prompt-iteration data file, or an empty object if absent
    pub fn load_prompt_data(&self) -> Result<Value> {
        let path = self.settings_dir.join(PROMPT_DATA_FILE);
        if !path.is_file() {
            return Ok(Value::Object(Map::new()));
        }

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|source| PromptforgeError::Parse { path, source })
    }

    /// Run the full reconciliation pipeline over `doc`, persisting as the
    /// pipeline requires: once if default-fill inserted anything, and
    /// once more, unconditionally, after the schema-owned refresh.
    fn reconcile(&self, doc: &mut Map<String, Value>) -> Result<()> {
        let migrated = reconcile::migrate_groups(&self.defaults, doc)?;
        let missing = reconcile::fill_missing(&self.defaults, doc);
        let removed = reconcile::prune_unknown(&self.defaults, doc);

        if migrated > 0 || missing > 0 || removed > 0 {
            tracing::info!(
                "Reconciled settings: {migrated} groups migrated, {missing} keys filled, {removed} keys pruned"
            );
        }

        if missing > 0 {
            self.save(doc)?;
        }

        reconcile::overwrite_schema_owned(&self.defaults, doc);
        self.save(doc)
    }

    fn settings_path(&self) -> PathBuf {
        self.settings_dir.join(SETTINGS_FILE)
    }

    fn presets_dir(&self) -> PathBuf {
        self.settings_dir.join(PRESETS_DIR)
    }

    fn preset_path(&self, name: &str) -> PathBuf {
        self.presets_dir().join(format!("{name}{PRESET_SUFFIX}"))
    }
}

/// Read a JSON file that must hold an object at the top level
fn read_json_map(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| PromptforgeError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
