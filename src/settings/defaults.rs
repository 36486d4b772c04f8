use serde_json::{json, Map, Value};

/// Top-level keys whose values are nested option groups.
///
/// Historically the members of these groups lived flat at the top level
/// (prefixed `horde_*`, `automa_*`, ...); reconciliation moves them into
/// the nested group the first time it sees a document without the group.
pub const SUB_OBJECT_GROUPS: &[&str] = &["horde", "automa", "sailing", "model_test", "interrogate"];

/// Schema-owned top-level key, force-refreshed from defaults on every load.
pub const MODEL_LIST_KEY: &str = "model_list";

/// Group holding the schema-owned dimensions list.
pub const MODEL_TEST_GROUP: &str = "model_test";

/// Schema-owned key inside [`MODEL_TEST_GROUP`], force-refreshed on every load.
pub const MODEL_TEST_DIMENSIONS_KEY: &str = "model_test_dimensions_list";

/// Build the default schema: the authoritative template of legal keys
/// and their default values. Keys absent here are pruned from loaded
/// documents; keys present here are filled in when missing.
#[must_use]
pub fn default_schema() -> Map<String, Value> {
    let schema = json!({
        "selected_template": "prompt_quill_style",
        "selected_model": "TheBloke/Panda-7B-v0.1-GGUF",
        "model_list": [
            "TheBloke/Panda-7B-v0.1-GGUF",
            "TheBloke/Mistral-7B-Instruct-v0.2-GGUF",
            "TheBloke/zephyr-7B-beta-GGUF",
            "TheBloke/openchat_3.5-GGUF"
        ],
        "embedding_model": "sentence-transformers/all-MiniLM-L12-v2",
        "collection": "prompts_large_meta",
        "temperature": 0.0,
        "top_k": 5,
        "max_top_k": 50,
        "repeat_penalty": 1.2,
        "context_length": 3900,
        "gpu_layers": 50,
        "max_output_tokens": 200,
        "translate": false,
        "batch": false,
        "summary": false,
        "horde": {
            "horde_api_key": "0000000000",
            "horde_model": "Deliberate 3.0",
            "horde_sampler": "k_dpmpp_2s_a",
            "horde_steps": 20,
            "horde_cfg_scale": 7.5,
            "horde_width": 768,
            "horde_height": 512,
            "horde_clipskip": 2
        },
        "automa": {
            "automa_url": "http://localhost:7860",
            "automa_sampler": "DPM++ 2M Karras",
            "automa_checkpoint": "",
            "automa_steps": 20,
            "automa_cfg_scale": 7.0,
            "automa_width": 1024,
            "automa_height": 1024,
            "automa_n_iter": 1,
            "automa_save": true,
            "automa_save_on_api_host": false
        },
        "sailing": {
            "sail_text": "",
            "sail_width": 10,
            "sail_depth": 10,
            "sail_generate": false,
            "sail_summary": false,
            "sail_rephrase": false,
            "sail_rephrase_prompt": "",
            "sail_sinus": false,
            "sail_sinus_freq": 0.1,
            "sail_sinus_range": 10
        },
        "model_test": {
            "model_test_setup": "Largest List",
            "model_test_type": "Largest List",
            "model_test_steps_list": [10, 20, 30],
            "model_test_cfg_list": [3.5, 7.0],
            "model_test_dimensions_list": [
                [1024, 1024],
                [896, 1152],
                [1152, 896]
            ]
        },
        "interrogate": {
            "iti_model": "blip",
            "iti_mode": "description",
            "iti_temperature": 0.7,
            "iti_max_tokens": 75
        }
    });

    match schema {
        Value::Object(map) => map,
        _ => unreachable!("default schema literal is a JSON object"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_are_objects() {
        let schema = default_schema();
        for group in SUB_OBJECT_GROUPS {
            let value = schema
                .get(*group)
                .unwrap_or_else(|| panic!("schema missing group '{group}'"));
            assert!(value.is_object(), "group '{group}' is not an object");
        }
    }

    #[test]
    fn test_schema_owned_fields_present() {
        let schema = default_schema();
        assert!(schema[MODEL_LIST_KEY].is_array());
        assert!(schema[MODEL_TEST_GROUP][MODEL_TEST_DIMENSIONS_KEY].is_array());
    }

    #[test]
    fn test_group_members_carry_prefix() {
        // Migration relies on group member names never colliding across
        // groups when they lived flat at the top level.
        let schema = default_schema();
        let mut seen = std::collections::HashSet::new();
        for group in SUB_OBJECT_GROUPS {
            for key in schema[*group].as_object().unwrap().keys() {
                assert!(seen.insert(key.clone()), "duplicate member key '{key}'");
            }
        }
    }
}
