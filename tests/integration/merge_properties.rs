//! Property-based tests for the cube config merge

use crate::integration::test_utils::cube;
use memcube::cube::{GraphDbConfig, MemCubeConfig};
use memcube::merge::{ConfigMerger, MergeEvent, MergeReport};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Graph config inputs: (use_multi_db, db_name, user_name, auto_create, uri host, dimension)
type GraphInputs = (bool, String, Option<String>, bool, String, u32);

fn graph_inputs() -> impl Strategy<Value = GraphInputs> {
    (
        any::<bool>(),
        "[a-z][a-z0-9-]{0,15}",
        proptest::option::of("[a-z][a-z0-9_]{0,11}"),
        any::<bool>(),
        "[a-z]{1,10}",
        1u32..4096,
    )
}

fn identity() -> impl Strategy<Value = (String, String)> {
    ("[a-z][a-z0-9_]{0,11}", "[a-z][a-z0-9_]{0,15}")
}

/// Build a valid graph config; shared-database mode always gets a user name.
fn graph_value(inputs: &GraphInputs) -> Value {
    let (use_multi_db, db_name, user_name, auto_create, host, dimension) = inputs;
    let user_name = match (use_multi_db, user_name) {
        (false, None) => Some(format!("memcube{}", db_name.replace('-', ""))),
        (_, name) => name.clone(),
    };
    let mut config = json!({
        "uri": format!("bolt://{}:7687", host),
        "user": "neo4j",
        "password": format!("pw-{}", host),
        "db_name": db_name,
        "auto_create": auto_create,
        "use_multi_db": use_multi_db,
        "embedding_dimension": dimension,
    });
    if let Some(name) = user_name {
        config["user_name"] = json!(name);
    }
    config
}

fn record(ident: &(String, String), graph: &GraphInputs, llm_model: &str) -> MemCubeConfig {
    let mut config = cube(&ident.0, &ident.1, Some(graph_value(graph)));
    if let Some(text) = config.text_mem.as_mut() {
        if let Some(llm) = text.config.extractor_llm.as_mut() {
            llm.config
                .insert("model_name_or_path".to_string(), json!(llm_model));
        }
    }
    config
}

fn graph(config: &MemCubeConfig) -> &GraphDbConfig {
    &config.graph_db().unwrap().config
}

#[test]
fn test_merge_properties_hold_for_valid_inputs() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(identity(), graph_inputs(), identity(), graph_inputs()),
            |(existing_id, existing_graph, default_id, default_graph)| {
                let existing = record(&existing_id, &existing_graph, "gpt-4o-mini");
                let default = record(&default_id, &default_graph, "gpt-4.1");
                let (existing_before, default_before) = (existing.clone(), default.clone());

                let mut merger = ConfigMerger::with_observer(MergeReport::new());
                let merged = merger.merge(&existing, &default).unwrap();

                // Identity comes from the existing record.
                prop_assert_eq!(&merged.user_id, &existing.user_id);
                prop_assert_eq!(&merged.cube_id, &existing.cube_id);
                prop_assert_eq!(&merged.config_filename, &existing.config_filename);
                prop_assert_eq!(&merged.model_schema, &existing.model_schema);

                // Everything else follows the default.
                let merged_text = merged.text_mem.as_ref().unwrap();
                let default_text = default.text_mem.as_ref().unwrap();
                prop_assert_eq!(
                    &merged_text.config.extractor_llm,
                    &default_text.config.extractor_llm
                );
                let (m, e, d) = (graph(&merged), graph(&existing), graph(&default));
                prop_assert_eq!(&m.uri, &d.uri);
                prop_assert_eq!(&m.password, &d.password);
                prop_assert_eq!(m.embedding_dimension, d.embedding_dimension);
                prop_assert_eq!(&m.db_name, &d.db_name);

                // Protected graph fields.
                prop_assert_eq!(m.auto_create, e.auto_create);
                let downgrade = e.use_multi_db && !d.use_multi_db;
                if downgrade {
                    prop_assert!(!m.use_multi_db);
                    prop_assert_eq!(m.user_name.as_deref(), Some(e.db_name.as_str()));
                } else {
                    prop_assert_eq!(m.use_multi_db, e.use_multi_db);
                    prop_assert_eq!(&m.user_name, &e.user_name);
                }
                prop_assert_eq!(merger.observer().downgraded_multi_db(), downgrade);

                // Inputs are untouched.
                prop_assert_eq!(&existing, &existing_before);
                prop_assert_eq!(&default, &default_before);

                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_merge_is_idempotent() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(identity(), graph_inputs(), identity(), graph_inputs()),
            |(existing_id, existing_graph, default_id, default_graph)| {
                let existing = record(&existing_id, &existing_graph, "gpt-4o-mini");
                let default = record(&default_id, &default_graph, "gpt-4.1");

                let once = ConfigMerger::new().merge(&existing, &default).unwrap();
                let twice = ConfigMerger::new().merge(&once, &default).unwrap();
                prop_assert_eq!(once, twice);

                Ok(())
            },
        )
        .unwrap();
}

#[test]
fn test_single_to_multi_db_template_keeps_shared_mode() {
    let existing = record(
        &("alice".to_string(), "alice_cube".to_string()),
        &(false, "shared".to_string(), Some("memcubealice".to_string()), true, "old".to_string(), 768),
        "gpt-4o-mini",
    );
    let default = record(
        &("default".to_string(), "default_cube".to_string()),
        &(true, "memcubedefault".to_string(), None, false, "new".to_string(), 3072),
        "gpt-4.1",
    );

    let mut merger = ConfigMerger::with_observer(MergeReport::new());
    let merged = merger.merge(&existing, &default).unwrap();

    let m = graph(&merged);
    assert!(!m.use_multi_db);
    assert_eq!(m.user_name.as_deref(), Some("memcubealice"));
    assert_eq!(m.db_name, "memcubedefault");
    assert!(m.auto_create);
    assert!(!merger.observer().downgraded_multi_db());
    assert!(!merger
        .observer()
        .events()
        .iter()
        .any(|e| matches!(e, MergeEvent::MultiDbAlreadyDisabled)));
}

#[test]
fn test_already_disabled_multi_db_is_reported() {
    let existing = record(
        &("bob".to_string(), "bob_cube".to_string()),
        &(false, "shared".to_string(), Some("memcubebob".to_string()), true, "old".to_string(), 768),
        "gpt-4o-mini",
    );
    let default = record(
        &("default".to_string(), "default_cube".to_string()),
        &(false, "shared-v2".to_string(), Some("memcubedefault".to_string()), true, "new".to_string(), 3072),
        "gpt-4.1",
    );

    let mut merger = ConfigMerger::with_observer(MergeReport::new());
    let merged = merger.merge(&existing, &default).unwrap();

    assert_eq!(graph(&merged).user_name.as_deref(), Some("memcubebob"));
    assert_eq!(graph(&merged).db_name, "shared-v2");
    assert!(merger
        .observer()
        .events()
        .iter()
        .any(|e| matches!(e, MergeEvent::MultiDbAlreadyDisabled)));
}

#[test]
fn test_unknown_graph_keys_merge_per_key() {
    let mut existing_graph = graph_value(&(true, "alicedb".to_string(), None, true, "old".to_string(), 768));
    existing_graph["pool_size"] = json!(4);
    existing_graph["legacy_flag"] = json!(true);
    let mut default_graph =
        graph_value(&(true, "defaultdb".to_string(), None, true, "new".to_string(), 3072));
    default_graph["pool_size"] = json!(16);

    let existing = cube("alice", "alice_cube", Some(existing_graph));
    let default = cube("default", "default_cube", Some(default_graph));
    let merged = ConfigMerger::new().merge(&existing, &default).unwrap();

    let extra = &graph(&merged).extra;
    assert_eq!(extra["pool_size"], json!(16));
    assert_eq!(extra["legacy_flag"], json!(true));
}
