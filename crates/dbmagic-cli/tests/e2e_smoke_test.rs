use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use dbmagic_cli::{Args, run};

/// Demo documents live at the workspace root.
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all diagram documents from a directory
fn collect_documents(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<_> = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && matches!(
                        path.extension().and_then(|s| s.to_str()),
                        Some("json" | "toml")
                    )
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn args_for(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        log_level: "off".to_string(),
        ..Args::default()
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_documents(demos_dir());

    assert!(!demos.is_empty(), "No demo documents found in demos/");

    let mut failed = Vec::new();

    for demo_path in &demos {
        let output_path = temp_dir.path().join(format!(
            "{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args_for(demo_path, &output_path)) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).expect("Output should exist");
                assert!(svg.starts_with("<svg"), "{} is not SVG", output_path.display());
            }
            Err(err) => failed.push((demo_path.clone(), err)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_documents(demos_dir().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args_for(demo_path, &output_path)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(!output_path.exists(), "No output should be written on error");
    }

    assert!(
        unexpectedly_succeeded.is_empty(),
        "Error demos rendered without error: {unexpectedly_succeeded:?}"
    );
}

#[test]
fn e2e_view_flags_set_svg_size() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("tienda.svg");

    let args = Args {
        width: Some(1200.0),
        height: Some(900.0),
        device_pixel_ratio: Some(2.0),
        ..args_for(&demos_dir().join("tienda.json"), &output_path)
    };
    run(&args).expect("Render should succeed");

    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(svg.contains(r#"width="2400""#));
    assert!(svg.contains(r#"height="1800""#));
}

#[test]
fn e2e_unsupported_output_extension() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("tienda.pdf");

    let result = run(&args_for(&demos_dir().join("tienda.json"), &output_path));
    assert!(result.is_err());
    assert!(!output_path.exists());
}

#[test]
fn e2e_missing_icon_reports_unavailable() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[icons]\nnullableIcon = \"does/not/exist.svg\"\n").unwrap();
    let output_path = temp_dir.path().join("tienda.svg");

    let args = Args {
        config: Some(config_path.to_string_lossy().to_string()),
        ..args_for(&demos_dir().join("tienda.json"), &output_path)
    };

    let err = run(&args).unwrap_err();
    assert!(err.to_string().starts_with("diagram unavailable"));
    assert!(!output_path.exists());
}

#[cfg(feature = "raster")]
#[test]
fn e2e_png_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("blog.png");

    run(&args_for(&demos_dir().join("blog.toml"), &output_path)).expect("Render should succeed");

    let png = fs::read(&output_path).unwrap();
    assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
}
