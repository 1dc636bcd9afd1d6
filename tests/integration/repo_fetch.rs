//! Integration tests for fetching published cubes with a stand-in git client

use crate::integration::test_utils::{cube_json, graph_config, write_json};
use memcube::cube::{init_from_remote_repo, TemplateSettings};
use memcube::merge::{ConfigMerger, MergeReport};
use memcube::repo::RepoFetcher;
use memcube::CubeError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Script standing in for `git clone URL DIR`: copies a prepared config into DIR and records URL.
#[cfg(unix)]
fn fake_git(temp_dir: &Path, source_config: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = temp_dir.join("fake-git");
    let log = temp_dir.join("clone.log");
    std::fs::write(
        &script,
        format!(
            "#!/bin/sh\n[ \"$1\" = clone ] || exit 2\necho \"$2\" > '{}'\nmkdir -p \"$3\" && cp '{}' \"$3/config.json\"\n",
            log.display(),
            source_config.display()
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_fetch_and_upgrade_published_cube() {
    let temp_dir = TempDir::new().unwrap();
    let published = temp_dir.path().join("published.json");
    write_json(
        &published,
        &cube_json("erin", "erin_cube", Some(graph_config(true, "memcubeerin", None))),
    );
    let fetcher = RepoFetcher::with_program(fake_git(temp_dir.path(), &published).to_string_lossy());
    let target = temp_dir.path().join("checkout");
    let default = TemplateSettings::default().build_default().unwrap();

    let mut merger = ConfigMerger::with_observer(MergeReport::new());
    let (dir, config) = init_from_remote_repo(
        "org/erin_cube",
        "https://cubes.example.com/",
        Some(target.as_path()),
        &fetcher,
        Some(&default),
        &mut merger,
    )
    .unwrap();

    assert_eq!(dir.root(), target.as_path());
    assert_eq!(
        std::fs::read_to_string(temp_dir.path().join("clone.log"))
            .unwrap()
            .trim(),
        "https://cubes.example.com/org/erin_cube"
    );
    assert_eq!(config.user_id.as_deref(), Some("erin"));
    assert_eq!(
        config.graph_db().unwrap().config.user_name.as_deref(),
        Some("memcubeerin")
    );
    assert!(merger.observer().completed());
}

#[cfg(unix)]
#[test]
fn test_fetch_without_default_returns_record_as_published() {
    let temp_dir = TempDir::new().unwrap();
    let published = temp_dir.path().join("published.json");
    write_json(&published, &cube_json("frank", "frank_cube", None));
    let fetcher = RepoFetcher::with_program(fake_git(temp_dir.path(), &published).to_string_lossy());

    let (dir, config) = init_from_remote_repo(
        "frank_cube",
        memcube::repo::DEFAULT_BASE_URL,
        Some(temp_dir.path().join("frank").as_path()),
        &fetcher,
        None,
        &mut ConfigMerger::new(),
    )
    .unwrap();

    assert!(dir.exists());
    assert_eq!(config.cube_id.as_deref(), Some("frank_cube"));
}

#[cfg(unix)]
#[test]
fn test_failed_clone_surfaces_stderr() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let script = temp_dir.path().join("failing-git");
    std::fs::write(
        &script,
        "#!/bin/sh\necho \"fatal: repository not found\" >&2\nexit 128\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let err = RepoFetcher::with_program(script.to_string_lossy())
        .fetch("missing", "https://cubes.example.com", Some(temp_dir.path().join("x").as_path()))
        .unwrap_err();
    match err {
        CubeError::ExternalTool(tool) => {
            assert_eq!(tool.status, Some(128));
            assert_eq!(tool.stderr, "fatal: repository not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}
