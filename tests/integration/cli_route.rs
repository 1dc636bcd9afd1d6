//! Integration tests for the CLI route table

use crate::integration::test_utils::{cube_json, graph_config, read_json, with_xdg_env, write_json};
use clap::Parser;
use memcube::cli::{Cli, RunContext};
use memcube::config::MemcubeConfig;
use memcube::CubeError;
use serde_json::Value;
use tempfile::TempDir;

fn run(workspace: &TempDir, args: &[&str]) -> Result<String, CubeError> {
    let mut argv = vec!["memcube"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    RunContext::with_config(workspace.path().to_path_buf(), MemcubeConfig::default())
        .execute(&cli.command)
}

fn seed(workspace: &TempDir) {
    write_json(
        &workspace.path().join("old.json"),
        &cube_json("alice", "alice_cube", Some(graph_config(true, "memcubealice", None))),
    );
    write_json(
        &workspace.path().join("new.json"),
        &cube_json(
            "default",
            "default_cube",
            Some(graph_config(false, "shared-tree-textual-memory", Some("memcubedefault"))),
        ),
    );
}

#[test]
fn test_merge_command_json_output() {
    let workspace = TempDir::new().unwrap();
    seed(&workspace);

    let out = run(
        &workspace,
        &["merge", "--existing", "old.json", "--default", "new.json", "--format", "json"],
    )
    .unwrap();
    let report: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(report["cube_id"], "alice_cube");
    assert_eq!(report["multi_db_downgraded"], true);
    assert_eq!(
        report["config"]["text_mem"]["config"]["graph_db"]["config"]["user_name"],
        "memcubealice"
    );
}

#[test]
fn test_merge_command_writes_output_file() {
    let workspace = TempDir::new().unwrap();
    seed(&workspace);

    let out = run(
        &workspace,
        &["merge", "--existing", "old.json", "--default", "new.json", "--output", "out/merged.json"],
    )
    .unwrap();

    assert!(out.contains("merged.json"));
    let merged = read_json(&workspace.path().join("out/merged.json"));
    assert_eq!(merged["user_id"], "alice");
}

#[test]
fn test_upgrade_dry_run_then_apply() {
    let workspace = TempDir::new().unwrap();
    seed(&workspace);
    std::fs::create_dir_all(workspace.path().join("cubes/alice")).unwrap();
    std::fs::copy(
        workspace.path().join("old.json"),
        workspace.path().join("cubes/alice/config.json"),
    )
    .unwrap();
    let before = std::fs::read_to_string(workspace.path().join("cubes/alice/config.json")).unwrap();

    run(&workspace, &["upgrade", "cubes/alice", "--default", "new.json", "--dry-run"]).unwrap();
    assert_eq!(
        std::fs::read_to_string(workspace.path().join("cubes/alice/config.json")).unwrap(),
        before
    );

    run(&workspace, &["upgrade", "cubes/alice", "--default", "new.json"]).unwrap();
    let upgraded = read_json(&workspace.path().join("cubes/alice/config.json"));
    assert_eq!(
        upgraded["text_mem"]["config"]["graph_db"]["config"]["use_multi_db"],
        false
    );
}

#[test]
fn test_upgrade_uses_configured_template_by_default() {
    let workspace = TempDir::new().unwrap();
    seed(&workspace);
    std::fs::create_dir_all(workspace.path().join("cube")).unwrap();
    std::fs::copy(workspace.path().join("old.json"), workspace.path().join("cube/config.json"))
        .unwrap();

    let out = run(&workspace, &["upgrade", "cube", "--format", "json"]).unwrap();
    let report: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["multi_db_downgraded"], true);
    assert!(report["written_to"].as_str().unwrap().ends_with("config.json"));
}

#[test]
fn test_template_and_validate_commands() {
    let workspace = TempDir::new().unwrap();

    let out = run(
        &workspace,
        &["template", "--user-id", "a-1", "--user-name", "ann", "--output", "ann.json"],
    )
    .unwrap();
    assert!(out.starts_with("Wrote template"));

    let out = run(&workspace, &["validate", "ann.json"]).unwrap();
    assert!(out.contains("ann_default_cube"));
    assert!(out.contains("memcubea1"));
}

#[test]
fn test_validate_reports_schema_errors() {
    let workspace = TempDir::new().unwrap();
    write_json(
        &workspace.path().join("bad.json"),
        &cube_json("bob", "bob_cube", Some(graph_config(false, "shared", None))),
    );

    let err = run(&workspace, &["validate", "bad.json"]).unwrap_err();
    assert!(err.to_string().contains("user_name"));
}

#[test]
fn test_invalid_format_is_rejected() {
    let workspace = TempDir::new().unwrap();
    seed(&workspace);
    let err = run(
        &workspace,
        &["merge", "--existing", "old.json", "--default", "new.json", "--format", "yaml"],
    )
    .unwrap_err();
    assert!(matches!(err, CubeError::ConfigError(_)));
}

#[test]
fn test_init_writes_loadable_config_once() {
    let workspace = TempDir::new().unwrap();
    let test_dir = TempDir::new().unwrap();

    run(&workspace, &["init"]).unwrap();
    assert!(run(&workspace, &["init"]).is_err());
    run(&workspace, &["init", "--force"]).unwrap();

    let context = with_xdg_env(&test_dir, || {
        RunContext::new(workspace.path().to_path_buf(), None).unwrap()
    });
    assert!(context.config().validate().is_ok());
}
