//! `meshweave export`

use crate::app::App;
use anyhow::{Context, Result};
use colored::Colorize;
use meshweave_mesh::load_snapshot;
use meshweave_probe::write_mesh_object_set;
use std::fs;
use std::path::Path;

pub fn run(snapshot: &Path, out: Option<&Path>) -> Result<()> {
    let app = App::bootstrap()?;
    let base = load_snapshot(snapshot, app.model.clone())
        .with_context(|| format!("loading {}", snapshot.display()))?;
    let document = write_mesh_object_set(&base)?;

    match out {
        Some(path) => {
            fs::write(path, document).with_context(|| format!("writing {}", path.display()))?;
            eprintln!(
                "{} {} mesh objects to {}",
                "exported".green().bold(),
                base.len(),
                path.display()
            );
        }
        None => println!("{document}"),
    }
    Ok(())
}
