//! `meshweave import`

use crate::app::{self, App};
use anyhow::{Context, Result};
use colored::Colorize;
use meshweave_mesh::{save_snapshot, MeshBase};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub fn run(
    input: &Path,
    data_source: Option<&str>,
    snapshot: Option<&Path>,
    json: bool,
) -> Result<()> {
    let app = App::bootstrap()?;
    let document = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let identifier = app::data_source_for(input, data_source)?;
    let base = app.import_document(&identifier, &document)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&base.externalize())?);
    } else {
        print_summary(&base);
    }

    if let Some(path) = snapshot {
        save_snapshot(&base, path).with_context(|| format!("writing {}", path.display()))?;
        println!("{} snapshot {}", "wrote".green().bold(), path.display());
    }
    Ok(())
}

fn print_summary(base: &MeshBase) {
    println!(
        "{} {} mesh objects from {}",
        "imported".green().bold(),
        base.len(),
        base.identifier()
    );

    let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut edges = 0usize;
    for object in base.iter() {
        for entity_type in object.types() {
            *type_counts.entry(entity_type.to_string()).or_default() += 1;
        }
        edges += object.neighbors().count();
    }
    for (entity_type, count) in &type_counts {
        println!("  {:>5}  {}", count, entity_type.cyan());
    }
    // Every edge shows up once per side.
    println!("  {:>5}  relationships", edges / 2);
}
