//! Schema reconciliation over plain JSON maps.
//!
//! All functions here are pure with respect to the filesystem: they take
//! the default schema and a settings document and mutate the document in
//! place. The [`store`](super::store) module decides when to persist.

use crate::error::{PromptforgeError, Result};
use crate::settings::defaults::{
    MODEL_LIST_KEY, MODEL_TEST_DIMENSIONS_KEY, MODEL_TEST_GROUP, SUB_OBJECT_GROUPS,
};
use serde_json::{Map, Value};

/// Move legacy flat keys into their nested sub-object groups.
///
/// For each group name absent from the document, creates the group and
/// moves every member key (as named by the schema's version of the group)
/// from the top level into it. Once a group key exists at the top level
/// the group is skipped, so the migration is idempotent.
///
/// A document that lacks a group must still carry all of that group's
/// members flat at the top level; a missing member is a corrupt document
/// and surfaces as [`PromptforgeError::Migration`].
pub fn migrate_groups(defaults: &Map<String, Value>, doc: &mut Map<String, Value>) -> Result<usize> {
    let mut migrated = 0;

    for &group in SUB_OBJECT_GROUPS {
        if doc.contains_key(group) {
            continue;
        }

        let Some(Value::Object(group_defaults)) = defaults.get(group) else {
            continue;
        };

        let mut members = Map::new();
        for key in group_defaults.keys() {
            let value = doc.remove(key).ok_or_else(|| PromptforgeError::Migration {
                group: group.to_string(),
                key: key.clone(),
            })?;
            members.insert(key.clone(), value);
        }

        tracing::debug!("Migrated {} flat keys into group '{group}'", members.len());
        doc.insert(group.to_string(), Value::Object(members));
        migrated += 1;
    }

    Ok(migrated)
}

/// Walk the schema and the document in lockstep, inserting every schema
/// key missing from the document with its default value. Recurses where
/// both sides hold mappings; a schema mapping facing a non-mapping value
/// is left mismatched rather than coerced.
///
/// Returns the total number of keys inserted, at any depth.
pub fn fill_missing(defaults: &Map<String, Value>, doc: &mut Map<String, Value>) -> usize {
    let mut missing = 0;

    for (key, default_value) in defaults {
        match doc.get_mut(key) {
            None => {
                doc.insert(key.clone(), default_value.clone());
                missing += 1;
            }
            Some(Value::Object(sub_doc)) => {
                if let Value::Object(sub_defaults) = default_value {
                    missing += fill_missing(sub_defaults, sub_doc);
                }
            }
            Some(_) => {}
        }
    }

    missing
}

/// Delete document keys the schema no longer knows.
///
/// Prunes the top level and one level of nesting only: a top-level key
/// absent from the schema is removed, and within each remaining key where
/// both sides hold mappings, sub-keys absent from the schema's mapping are
/// removed. Key sets are snapshotted before deletion since this mutates
/// the maps being walked.
///
/// Returns the total number of keys deleted.
pub fn prune_unknown(defaults: &Map<String, Value>, doc: &mut Map<String, Value>) -> usize {
    let mut removed = 0;

    let top_keys: Vec<String> = doc.keys().cloned().collect();
    for key in top_keys {
        match defaults.get(&key) {
            None => {
                doc.remove(&key);
                removed += 1;
            }
            Some(Value::Object(sub_defaults)) => {
                if let Some(Value::Object(sub_doc)) = doc.get_mut(&key) {
                    let sub_keys: Vec<String> = sub_doc.keys().cloned().collect();
                    for sub_key in sub_keys {
                        if !sub_defaults.contains_key(&sub_key) {
                            sub_doc.remove(&sub_key);
                            removed += 1;
                        }
                    }
                }
            }
            Some(_) => {}
        }
    }

    removed
}

/// Force the schema-owned list fields back to their default values.
///
/// `model_list` and `model_test.model_test_dimensions_list` are not
/// user-editable; whatever a loaded document carries for them is replaced
/// wholesale by the schema's current values.
pub fn overwrite_schema_owned(defaults: &Map<String, Value>, doc: &mut Map<String, Value>) {
    if let Some(model_list) = defaults.get(MODEL_LIST_KEY) {
        doc.insert(MODEL_LIST_KEY.to_string(), model_list.clone());
    }

    let dimensions = defaults
        .get(MODEL_TEST_GROUP)
        .and_then(|group| group.get(MODEL_TEST_DIMENSIONS_KEY))
        .cloned();

    if let (Some(dimensions), Some(Value::Object(group))) =
        (dimensions, doc.get_mut(MODEL_TEST_GROUP))
    {
        group.insert(MODEL_TEST_DIMENSIONS_KEY.to_string(), dimensions);
    }
}
