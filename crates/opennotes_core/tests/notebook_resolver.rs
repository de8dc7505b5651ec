use opennotes_core::notebook::{self, AppContext, ContextMatch};
use opennotes_core::paths::path_to_string;
use opennotes_core::{ConfigService, GlobalConfig, Notices, RecordedNotices, MARKER_FILE_NAME};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn setup(store: GlobalConfig) -> (TempDir, AppContext) {
    let home = TempDir::new().unwrap();
    let config = ConfigService::new(home.path().join("config.json"), store);
    let notices: Arc<dyn Notices> = Arc::new(RecordedNotices::new());
    (home, AppContext::new(config, notices))
}

fn write_notebook(dir: &Path, name: &str, contexts: &[String]) {
    std::fs::create_dir_all(dir.join("notes")).unwrap();
    let marker = json!({"name": name, "root": "notes", "contexts": contexts});
    std::fs::write(
        dir.join(MARKER_FILE_NAME),
        serde_json::to_string_pretty(&marker).unwrap(),
    )
    .unwrap();
}

fn text(path: &Path) -> String {
    path_to_string(path)
}

#[test]
fn valid_marker_loads_with_absolute_existing_root() {
    let workspace = TempDir::new().unwrap();
    let nb = workspace.path().join("nb");
    write_notebook(&nb, "Work", &[]);

    assert!(notebook::has_notebook(&nb));
    let config = notebook::load_config(&nb).expect("valid notebook should load");
    assert!(config.notes_root.is_absolute());
    assert!(config.notes_root.is_dir());
    assert_eq!(config.notes_root, nb.join("notes"));
    assert_eq!(config.config_path, nb.join(MARKER_FILE_NAME));
    assert_eq!(config.name, "Work");
}

#[test]
fn has_notebook_only_checks_the_directory_itself() {
    let workspace = TempDir::new().unwrap();
    assert!(!notebook::has_notebook(Path::new("")));
    assert!(!notebook::has_notebook(workspace.path()));

    let nested = workspace.path().join("a").join("b");
    write_notebook(&nested, "Nested", &[]);
    assert!(!notebook::has_notebook(&workspace.path().join("a")));
    assert!(notebook::has_notebook(&nested));
}

#[test]
fn invalid_configs_fail_closed() {
    let workspace = TempDir::new().unwrap();

    let malformed = workspace.path().join("malformed");
    std::fs::create_dir_all(&malformed).unwrap();
    std::fs::write(malformed.join(MARKER_FILE_NAME), "{ not json").unwrap();
    assert!(notebook::has_notebook(&malformed));
    assert!(notebook::load_config(&malformed).is_none());

    let nameless = workspace.path().join("nameless");
    std::fs::create_dir_all(&nameless).unwrap();
    std::fs::write(nameless.join(MARKER_FILE_NAME), r#"{"root": "."}"#).unwrap();
    assert!(notebook::load_config(&nameless).is_none());

    let missing_root = workspace.path().join("missing-root");
    std::fs::create_dir_all(&missing_root).unwrap();
    std::fs::write(
        missing_root.join(MARKER_FILE_NAME),
        r#"{"name": "Gone", "root": "does-not-exist"}"#,
    )
    .unwrap();
    assert!(notebook::load_config(&missing_root).is_none());
    assert!(notebook::load_config(&workspace.path().join("absent")).is_none());
}

#[test]
fn override_path_wins_regardless_of_contexts() {
    let workspace = TempDir::new().unwrap();
    let pinned = workspace.path().join("pinned");
    let local = workspace.path().join("local");
    write_notebook(&pinned, "Pinned", &["/nowhere/at/all".to_string()]);
    write_notebook(&local, "Local", &[text(&local)]);
    std::fs::create_dir_all(local.join("sub")).unwrap();

    let (_home, ctx) = setup(GlobalConfig {
        notebooks: vec![text(&local)],
        notebook_path: Some(text(&pinned)),
    });

    let inferred = notebook::infer(&ctx, &local.join("sub")).expect("override should resolve");
    assert_eq!(inferred.name(), "Pinned");
}

#[test]
fn invalid_override_falls_back_to_context_match() {
    let workspace = TempDir::new().unwrap();
    let local = workspace.path().join("local");
    write_notebook(&local, "Local", &[text(&local)]);

    let (_home, ctx) = setup(GlobalConfig {
        notebooks: vec![],
        notebook_path: Some(text(&workspace.path().join("not-a-notebook"))),
    });

    let inferred = notebook::infer(&ctx, &local).expect("context match should resolve");
    assert_eq!(inferred.name(), "Local");
}

#[test]
fn runtime_override_replaces_stored_override() {
    let workspace = TempDir::new().unwrap();
    let stored = workspace.path().join("stored");
    let flagged = workspace.path().join("flagged");
    write_notebook(&stored, "Stored", &[]);
    write_notebook(&flagged, "Flagged", &[]);

    let home = TempDir::new().unwrap();
    let config = ConfigService::new(
        home.path().join("config.json"),
        GlobalConfig {
            notebooks: vec![],
            notebook_path: Some(text(&stored)),
        },
    )
    .with_notebook_path_override(Some(text(&flagged)));
    let ctx = AppContext::new(config, Arc::new(RecordedNotices::new()));

    let inferred = notebook::infer(&ctx, workspace.path()).unwrap();
    assert_eq!(inferred.name(), "Flagged");
}

#[test]
fn prefix_context_scenario() {
    let workspace = TempDir::new().unwrap();
    let nb = workspace.path().join("nb");
    write_notebook(&nb, "Scenario", &[text(&nb)]);

    let (_home, ctx) = setup(GlobalConfig {
        notebooks: vec![text(&nb)],
        notebook_path: None,
    });

    let inferred = notebook::infer(&ctx, &nb.join("sub").join("dir"));
    assert_eq!(inferred.map(|nb| nb.name().to_string()), Some("Scenario".to_string()));
    assert!(notebook::infer(&ctx, &workspace.path().join("other")).is_none());
}

#[test]
fn prefix_mode_matches_partial_segment_and_segment_mode_does_not() {
    let workspace = TempDir::new().unwrap();
    let nb = workspace.path().join("notebook");
    let context = workspace.path().join("foo").join("ba");
    write_notebook(&nb, "Partial", &[text(&context)]);

    let (_home, ctx) = setup(GlobalConfig {
        notebooks: vec![text(&nb)],
        notebook_path: None,
    });
    let cwd = workspace.path().join("foo").join("bar");

    assert_eq!(ctx.context_match, ContextMatch::Prefix);
    assert!(notebook::infer(&ctx, &cwd).is_some());

    let ctx = ctx.with_context_match(ContextMatch::Segment);
    assert!(notebook::infer(&ctx, &cwd).is_none());
    assert!(notebook::infer(&ctx, &context.join("deeper")).is_some());
}

#[test]
fn list_emits_registered_then_ancestors_without_dedupe() {
    let workspace = TempDir::new().unwrap();
    let outer = workspace.path().join("outer");
    let inner = outer.join("inner");
    write_notebook(&outer, "Outer", &[]);
    write_notebook(&inner, "Inner", &[]);

    let (_home, ctx) = setup(GlobalConfig {
        notebooks: vec![text(&outer)],
        notebook_path: None,
    });

    let names = notebook::list(&ctx, &inner.join("x"))
        .into_iter()
        .map(|nb| nb.name().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Outer", "Inner", "Outer"]);
}

#[test]
fn deleted_registered_notebook_is_omitted() {
    let workspace = TempDir::new().unwrap();
    let kept = workspace.path().join("kept");
    write_notebook(&kept, "Kept", &[]);

    let (_home, ctx) = setup(GlobalConfig {
        notebooks: vec![text(&workspace.path().join("deleted")), text(&kept)],
        notebook_path: None,
    });

    let listed = notebook::list(&ctx, &workspace.path().join("elsewhere"));
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name(), "Kept");
}

#[test]
fn list_terminates_from_root_and_relative_paths() {
    let (_home, ctx) = setup(GlobalConfig::default());
    assert!(notebook::list(&ctx, Path::new("/")).is_empty());

    let workspace = TempDir::new().unwrap();
    let registered = workspace.path().join("registered");
    write_notebook(&registered, "Registered", &[]);
    let (_home, ctx) = setup(GlobalConfig {
        notebooks: vec![text(&registered)],
        notebook_path: None,
    });

    let cwd = std::env::current_dir().unwrap();
    let dirs = |path: &Path| {
        notebook::list(&ctx, path)
            .iter()
            .map(|nb| nb.dir().to_path_buf())
            .collect::<Vec<_>>()
    };

    let from_dot = dirs(Path::new("."));
    assert_eq!(from_dot, dirs(&cwd));
    assert_eq!(from_dot.first(), Some(&registered));
    assert!(from_dot.iter().all(|dir| dir.is_absolute()));

    let from_relative = dirs(Path::new("some/relative/../path"));
    assert_eq!(from_relative, dirs(&cwd.join("some").join("path")));
    assert_eq!(from_relative.first(), Some(&registered));
}

#[test]
fn first_context_match_in_list_order_wins() {
    let workspace = TempDir::new().unwrap();
    let first = workspace.path().join("first");
    let second = workspace.path().join("second");
    let shared = workspace.path().join("project");
    write_notebook(&first, "First", &[text(&shared)]);
    write_notebook(&second, "Second", &[text(&shared)]);

    let (_home, ctx) = setup(GlobalConfig {
        notebooks: vec![text(&second), text(&first)],
        notebook_path: None,
    });

    let inferred = notebook::infer(&ctx, &shared).unwrap();
    assert_eq!(inferred.name(), "Second");
}
