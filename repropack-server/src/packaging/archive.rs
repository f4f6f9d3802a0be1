use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ArchiveError;
use crate::models::{MetadataDocument, PackageRequest};

pub const README_FILE: &str = "README.md";
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
pub const ENV_TEMPLATE_FILE: &str = ".env.example";
pub const SETUP_SCRIPT_FILE: &str = "setup.sh";
pub const METADATA_FILE: &str = "metadata.json";

/// Longest sanitized project name kept in an archive file name
pub const MAX_FILE_STEM_LEN: usize = 100;

/// A rendered archive entry
pub struct ArchiveEntry {
    pub name: &'static str,
    pub contents: String,
    pub executable: bool,
}

/// Location and size of a finished archive
#[derive(Debug, Clone)]
pub struct BuiltArchive {
    pub path: PathBuf,
    pub file_name: String,
    pub file_size: u64,
}

/// Archive file name for a project and package id
pub fn archive_file_name(project_name: &str, package_id: &str) -> String {
    format!("{}_{}.zip", sanitize_project_name(project_name), package_id)
}

/// Keep ASCII alphanumerics, `-` and `.`; everything else becomes `_`.
/// The result is at most `MAX_FILE_STEM_LEN` bytes.
pub fn sanitize_project_name(project_name: &str) -> String {
    let sanitized: String = project_name
        .trim()
        .chars()
        .take(MAX_FILE_STEM_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Leading dots would hide the file from the listing scan
    let sanitized = sanitized.trim_start_matches('.');
    if sanitized.is_empty() {
        "package".to_string()
    } else {
        sanitized.to_string()
    }
}

pub fn render_requirements(request: &PackageRequest) -> String {
    let mut out = request
        .dependencies
        .iter()
        .map(|dep| dep.to_requirement_line())
        .collect::<Vec<_>>()
        .join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

pub fn render_env_template(request: &PackageRequest) -> String {
    request
        .environment_variables
        .iter()
        .map(|(key, value)| format!("{}={}\n", key, value))
        .collect()
}

/// Single-quote `value` for POSIX shells
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

pub fn render_setup_script(request: &PackageRequest) -> String {
    let mut script = String::from("#!/bin/bash\n");
    script.push_str("set -e\n\n");
    let banner = format!("Setting up {}...", request.project_name.replace(['\n', '\r'], " "));
    script.push_str(&format!("echo {}\n\n", shell_quote(&banner)));

    if !request.dependencies.is_empty() {
        script.push_str("# Install Python dependencies\n");
        script.push_str(&format!("pip install -r {}\n\n", REQUIREMENTS_FILE));
    }

    if !request.setup_scripts.is_empty() {
        script.push_str("# Project setup steps\n");
        for line in &request.setup_scripts {
            script.push_str(line);
            script.push('\n');
        }
        script.push('\n');
    }

    script.push_str("echo \"Setup complete!\"\n");
    script
}

pub fn render_readme(request: &PackageRequest, package_id: &str, created_at: DateTime<Utc>) -> String {
    let mut md = format!("# {}\n\n", request.project_name);
    md.push_str(&format!("**Author:** {}\n\n", request.author));
    if let Some(description) = request.description.as_deref().filter(|d| !d.trim().is_empty()) {
        md.push_str(description);
        md.push_str("\n\n");
    }
    md.push_str(&format!(
        "_Package `{}` generated by ReproPack on {}._\n\n",
        package_id,
        created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    md.push_str("## Dependencies\n\n");
    if request.dependencies.is_empty() {
        md.push_str("This project declares no Python dependencies.\n\n");
    } else {
        for dep in &request.dependencies {
            md.push_str(&format!("- `{}`\n", dep.to_requirement_line()));
        }
        md.push('\n');
    }

    if !request.environment_variables.is_empty() {
        md.push_str("## Environment Variables\n\n");
        md.push_str(&format!(
            "Copy `{}` to `.env` and adjust the values:\n\n",
            ENV_TEMPLATE_FILE
        ));
        for key in request.environment_variables.keys() {
            md.push_str(&format!("- `{}`\n", key));
        }
        md.push('\n');
    }

    md.push_str("## Setup\n\n");
    md.push_str(&format!("1. Run the setup script: `bash {}`\n", SETUP_SCRIPT_FILE));
    if !request.dependencies.is_empty() {
        md.push_str(&format!(
            "2. Or install dependencies manually: `pip install -r {}`\n",
            REQUIREMENTS_FILE
        ));
    }
    md.push('\n');

    if let Some(instructions) = request.instructions.as_deref().filter(|i| !i.trim().is_empty()) {
        md.push_str("## Instructions\n\n");
        md.push_str(instructions);
        md.push_str("\n\n");
    }

    if !request.dataset_links.is_empty() {
        md.push_str("## Datasets\n\n");
        for link in &request.dataset_links {
            md.push_str(&format!("- {}\n", link));
        }
        md.push('\n');
    }

    md
}

pub fn render_metadata(
    request: &PackageRequest,
    package_id: &str,
    created_at: DateTime<Utc>,
) -> Result<String, ArchiveError> {
    let document = MetadataDocument::from_request(request, package_id, created_at);
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Render all five archive entries in their archive order
pub fn render_entries(
    request: &PackageRequest,
    package_id: &str,
    created_at: DateTime<Utc>,
) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    Ok(vec![
        ArchiveEntry {
            name: README_FILE,
            contents: render_readme(request, package_id, created_at),
            executable: false,
        },
        ArchiveEntry {
            name: REQUIREMENTS_FILE,
            contents: render_requirements(request),
            executable: false,
        },
        ArchiveEntry {
            name: ENV_TEMPLATE_FILE,
            contents: render_env_template(request),
            executable: false,
        },
        ArchiveEntry {
            name: SETUP_SCRIPT_FILE,
            contents: render_setup_script(request),
            executable: true,
        },
        ArchiveEntry {
            name: METADATA_FILE,
            contents: render_metadata(request, package_id, created_at)?,
            executable: false,
        },
    ])
}

/// Render the package and write it as `{project}_{id}.zip` inside `packages_dir`.
///
/// The archive is assembled in a hidden temporary file next to its final
/// location and renamed into place once complete; a failed build leaves
/// nothing behind.
pub fn build_archive(
    request: &PackageRequest,
    package_id: &str,
    created_at: DateTime<Utc>,
    packages_dir: &Path,
) -> Result<BuiltArchive, ArchiveError> {
    std::fs::create_dir_all(packages_dir)?;

    let entries = render_entries(request, package_id, created_at)?;
    let file_name = archive_file_name(&request.project_name, package_id);
    let final_path = packages_dir.join(&file_name);

    let temp = tempfile::Builder::new()
        .prefix(".building-")
        .suffix(".part")
        .tempfile_in(packages_dir)?;

    let mut zip = ZipWriter::new(temp);
    for entry in &entries {
        let mode = if entry.executable { 0o755 } else { 0o644 };
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(mode);
        zip.start_file(entry.name, options)?;
        zip.write_all(entry.contents.as_bytes())?;
    }
    let temp = zip.finish()?;
    temp.as_file().sync_all()?;

    // Dropping the NamedTempFile on any error above removes it
    temp.persist(&final_path).map_err(|e| ArchiveError::Io(e.error))?;

    let file_size = std::fs::metadata(&final_path)?.len();
    tracing::debug!("Wrote {} ({} bytes)", final_path.display(), file_size);

    Ok(BuiltArchive {
        path: final_path,
        file_name,
        file_size,
    })
}
