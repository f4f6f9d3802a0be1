use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;

use chrono::{TimeZone, Utc};
use repropack_server::models::{DependencySpec, MetadataDocument, PackageRequest};
use repropack_server::packaging::archive::*;

fn sample_request() -> PackageRequest {
    PackageRequest {
        project_name: "Data Science Starter Kit".to_string(),
        author: "ReproPack Demo".to_string(),
        description: Some("Essential libraries for machine learning".to_string()),
        dependencies: vec![
            DependencySpec::new("numpy", "1.21.0"),
            DependencySpec::new("pandas", ">=1.3.0"),
        ],
        environment_variables: BTreeMap::from([
            ("MODEL_PATH".to_string(), "/models".to_string()),
            ("DATA_PATH".to_string(), "/data".to_string()),
        ]),
        setup_scripts: vec![
            "mkdir -p data models notebooks".to_string(),
            "echo 'Environment setup complete!'".to_string(),
        ],
        dataset_links: vec!["https://archive.ics.uci.edu/ml/datasets/iris".to_string()],
        instructions: Some("Start Jupyter with 'jupyter notebook'.".to_string()),
    }
}

fn read_entry(path: &std::path::Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut out = String::new();
    entry.read_to_string(&mut out).unwrap();
    out
}

#[test]
fn test_requirements_follow_input_order() {
    let out = render_requirements(&sample_request());
    assert_eq!(out, "numpy==1.21.0\npandas>=1.3.0\n");
}

#[test]
fn test_requirements_empty_without_dependencies() {
    let mut request = sample_request();
    request.dependencies.clear();
    assert_eq!(render_requirements(&request), "");
}

#[test]
fn test_env_template_sorted_by_key() {
    let out = render_env_template(&sample_request());
    assert_eq!(out, "DATA_PATH=/data\nMODEL_PATH=/models\n");
}

#[test]
fn test_setup_script_keeps_lines_verbatim() {
    let script = render_setup_script(&sample_request());
    assert!(script.starts_with("#!/bin/bash\n"));
    let mkdir = script.find("mkdir -p data models notebooks\n").unwrap();
    let echo = script.find("echo 'Environment setup complete!'\n").unwrap();
    assert!(mkdir < echo);
    assert!(script.contains("pip install -r requirements.txt"));
}

#[test]
fn test_setup_banner_is_not_expanded_by_the_shell() {
    let mut request = sample_request();
    request.project_name = "Cost $(echo INJECTED) `echo TICK` it's".to_string();
    let script = render_setup_script(&request);
    assert!(script.contains(
        "echo 'Setting up Cost $(echo INJECTED) `echo TICK` it'\\''s...'\n"
    ));
    assert!(!script.contains("\"Setting up"));
}

#[test]
fn test_long_project_name_is_truncated_in_file_name() {
    let name = archive_file_name(&"x".repeat(300), "abc");
    assert_eq!(name, format!("{}_abc.zip", "x".repeat(MAX_FILE_STEM_LEN)));
}

#[test]
fn test_readme_sections() {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let readme = render_readme(&sample_request(), "pkg-1", created_at);
    assert!(readme.starts_with("# Data Science Starter Kit\n"));
    assert!(readme.contains("**Author:** ReproPack Demo"));
    assert!(readme.contains("- `pandas>=1.3.0`"));
    assert!(readme.contains("## Instructions"));
    assert!(readme.contains("- https://archive.ics.uci.edu/ml/datasets/iris"));
    assert!(readme.contains("2024-05-01 12:00:00 UTC"));
}

#[test]
fn test_metadata_round_trips_through_document() {
    let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let json = render_metadata(&sample_request(), "pkg-1", created_at).unwrap();
    let doc: MetadataDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(doc.package_id, "pkg-1");
    assert_eq!(doc.dependencies.len(), 2);
    assert_eq!(doc.created_at(), Some(created_at));
}

#[test]
fn test_metadata_accepts_naive_timestamps() {
    let json = r#"{
        "package_id": "legacy",
        "project_name": "Old",
        "author": "someone",
        "created_at": "2024-01-02T03:04:05.123456"
    }"#;
    let doc: MetadataDocument = serde_json::from_str(json).unwrap();
    let ts = doc.created_at().unwrap();
    assert_eq!(ts.timestamp(), Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap().timestamp());
}

#[test]
fn test_build_archive_writes_five_entries() {
    let dir = tempfile::tempdir().unwrap();
    let packages_dir = dir.path().join("packages");
    let built = build_archive(&sample_request(), "abc-123", Utc::now(), &packages_dir).unwrap();

    assert_eq!(built.file_name, "Data_Science_Starter_Kit_abc-123.zip");
    assert!(built.path.exists());
    assert_eq!(built.file_size, std::fs::metadata(&built.path).unwrap().len());

    let archive = zip::ZipArchive::new(File::open(&built.path).unwrap()).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(
        names,
        vec![".env.example", "README.md", "metadata.json", "requirements.txt", "setup.sh"]
    );

    assert_eq!(read_entry(&built.path, REQUIREMENTS_FILE), "numpy==1.21.0\npandas>=1.3.0\n");
}

#[cfg(unix)]
#[test]
fn test_setup_script_is_executable() {
    let dir = tempfile::tempdir().unwrap();
    let built = build_archive(&sample_request(), "exec-1", Utc::now(), dir.path()).unwrap();
    let mut archive = zip::ZipArchive::new(File::open(&built.path).unwrap()).unwrap();
    let entry = archive.by_name(SETUP_SCRIPT_FILE).unwrap();
    assert_eq!(entry.unix_mode().unwrap() & 0o777, 0o755);
}

#[test]
fn test_build_leaves_no_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    build_archive(&sample_request(), "tmp-1", Utc::now(), dir.path()).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Data_Science_Starter_Kit_tmp-1.zip".to_string()]);
}

#[cfg(unix)]
#[test]
fn test_build_failure_surfaces_error() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let locked = dir.path().join("locked");
    std::fs::create_dir(&locked).unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores directory permissions
    if std::fs::write(locked.join("probe"), b"x").is_ok() {
        return;
    }

    let result = build_archive(&sample_request(), "fail-1", Utc::now(), &locked);
    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(&locked).unwrap().count(), 0);
}
