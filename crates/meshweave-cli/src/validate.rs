//! `meshweave validate`

use crate::app::{self, App};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use meshweave_probe::xml::parse_mesh_object_set;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn run(paths: &[PathBuf]) -> Result<()> {
    if paths.is_empty() {
        bail!("nothing to validate; pass files or directories");
    }
    let app = App::bootstrap()?;

    let mut failures = 0usize;
    for path in collect_documents(paths)? {
        match validate_one(&app, &path) {
            Ok(objects) => {
                println!("{} {} ({objects} objects)", "ok".green().bold(), path.display());
            }
            Err(error) => {
                failures += 1;
                println!("{} {}: {error:#}", "error".red().bold(), path.display());
            }
        }
    }
    if failures > 0 {
        bail!("{failures} document(s) failed validation");
    }
    Ok(())
}

fn validate_one(app: &App, path: &Path) -> Result<usize> {
    let document =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let data_source = app::data_source_for(path, None)?;
    let (objects, _) = parse_mesh_object_set(&data_source, &document, &app.model)?;
    Ok(objects.len())
}

fn collect_documents(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path) {
                let entry = entry.with_context(|| format!("scanning {}", path.display()))?;
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "xml")
                {
                    out.push(entry.path().to_path_buf());
                }
            }
        } else {
            out.push(path.clone());
        }
    }
    out.sort();
    Ok(out)
}
