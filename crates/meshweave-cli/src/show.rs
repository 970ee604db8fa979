//! `meshweave show`

use crate::app::App;
use anyhow::{Context, Result};
use colored::Colorize;
use meshweave_mesh::{load_snapshot, MeshObject};
use meshweave_model::{BlobPayload, MeshTypeIdentifier, PropertyValue};
use std::path::Path;

pub fn run(snapshot: &Path, entity_type: Option<&str>) -> Result<()> {
    let app = App::bootstrap()?;
    let base = load_snapshot(snapshot, app.model.clone())
        .with_context(|| format!("loading {}", snapshot.display()))?;

    let selected: Vec<&MeshObject> = match entity_type {
        Some(name) => {
            let identifier = MeshTypeIdentifier::new(name);
            base.objects_with_type(&identifier)
                .into_iter()
                .filter_map(|id| base.object(id))
                .collect()
        }
        None => base.iter().collect(),
    };

    for object in selected {
        let label = if object.is_home() {
            format!("{} (home)", object.identifier())
        } else {
            object.identifier().to_string()
        };
        println!("{}", label.bold());
        for blessed in object.types() {
            println!("  {} {}", "type".cyan(), blessed);
        }
        for (property, value) in object.properties() {
            println!("  {} {} = {}", "prop".cyan(), property, value_display(value));
        }
        for (neighbor, roles) in object.neighbors() {
            let other = base
                .object(neighbor)
                .map(|o| o.identifier().to_string())
                .unwrap_or_else(|| neighbor.to_string());
            if roles.is_empty() {
                println!("  {} {}", "rel ".cyan(), other);
            } else {
                let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
                println!("  {} {} [{}]", "rel ".cyan(), other, roles.join(", "));
            }
        }
    }
    Ok(())
}

fn value_display(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Blob(blob) => match &blob.payload {
            BlobPayload::Text { text } => format!("{} ({} chars)", blob.mime, text.len()),
            BlobPayload::Bytes { bytes } => format!("{} ({} bytes)", blob.mime, bytes.len()),
            BlobPayload::Deferred { load_from } => format!("{} <- {}", blob.mime, load_from),
        },
        PropertyValue::Boolean(flag) => flag.to_string(),
        PropertyValue::Color(c) => format!("rgba({}, {}, {}, {})", c.red, c.green, c.blue, c.alpha),
        PropertyValue::Currency(c) => c.to_string(),
        PropertyValue::Enumerated(e) => e.to_string(),
        PropertyValue::Extent(e) => format!("{}x{}", e.width, e.height),
        PropertyValue::Float(f) => f.to_string(),
        PropertyValue::Integer(i) => i.to_string(),
        PropertyValue::Multiplicity(m) => m.to_string(),
        PropertyValue::Point(p) => format!("({}, {})", p.x, p.y),
        PropertyValue::String(s) => format!("{s:?}"),
        PropertyValue::TimePeriod(p) => p.to_string(),
        PropertyValue::TimeStamp(t) => t.to_string(),
    }
}
