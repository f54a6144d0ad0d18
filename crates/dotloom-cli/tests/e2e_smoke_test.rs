use std::{fs, path::Path};

use tempfile::tempdir;

use dotloom::{DotloomError, export::RenderError};
use dotloom_cli::{Args, CliError, Command, RenderArgs, catalog, run};

fn render_args(names: &[&str], output_dir: &Path, source_only: bool) -> Args {
    Args {
        command: Command::Render(RenderArgs {
            names: names.iter().map(|name| name.to_string()).collect(),
            output_dir: Some(output_dir.to_path_buf()),
            source_only,
            ..RenderArgs::default()
        }),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_source_only_writes_every_diagram() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    run(&render_args(&[], temp_dir.path(), true)).expect("source-only render failed");

    for diagram in catalog::all() {
        let path = temp_dir.path().join(format!("{}.gv", diagram.name()));
        let source = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("missing {}: {err}", path.display()));
        assert!(source.contains("digraph"), "{} is not a digraph", diagram.name());
        assert!(source.trim_end().ends_with('}'));
    }
}

#[test]
fn e2e_selected_names_only() {
    let temp_dir = tempdir().unwrap();

    run(&render_args(&["data_flow"], temp_dir.path(), true)).unwrap();

    let written: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(written, vec!["data_flow.gv".to_string()]);
}

#[test]
fn e2e_missing_engine_reports_each_diagram() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let output_dir = temp_dir.path().join("out");
    fs::write(
        &config_path,
        "[render]\nexecutable = \"/nonexistent/dotloom-engine\"\n",
    )
    .unwrap();

    let mut args = render_args(&["architecture_overview", "data_flow"], &output_dir, false);
    args.config = Some(config_path);

    match run(&args) {
        Err(CliError::Diagrams { failures, total }) => {
            assert_eq!(total, 2);
            let names: Vec<_> = failures.iter().map(|(name, _)| name.as_str()).collect();
            assert_eq!(names, vec!["architecture_overview", "data_flow"]);
            for (_, err) in &failures {
                assert!(matches!(
                    err,
                    DotloomError::Render(RenderError::EngineNotFound { .. })
                ));
            }
        }
        other => panic!("expected per-diagram failures, got {other:?}"),
    }

    // No partial outputs and no leftover intermediate sources.
    let leftovers: Vec<_> = fs::read_dir(&output_dir)
        .map(|entries| entries.flatten().collect())
        .unwrap_or_default();
    assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
}

#[test]
fn e2e_unknown_diagram_is_rejected() {
    let temp_dir = tempdir().unwrap();

    let err = run(&render_args(&["no_such_diagram"], temp_dir.path(), true)).unwrap_err();

    assert!(matches!(err, CliError::Dotloom(DotloomError::Config(_))));
    assert!(err.to_string().contains("no_such_diagram"));
}

#[test]
fn e2e_list_succeeds() {
    let args = Args {
        command: Command::List,
        config: None,
        log_level: "off".to_string(),
    };

    run(&args).unwrap();
}
