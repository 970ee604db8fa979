//! `meshweave model`

use crate::app::App;
use anyhow::{bail, Result};
use colored::Colorize;
use meshweave_model::{MeshTypeIdentifier, ModelRegistry, SubjectArea};

pub fn run(subject_area: Option<&str>) -> Result<()> {
    let app = App::bootstrap()?;

    match subject_area {
        Some(name) => {
            let identifier = MeshTypeIdentifier::new(name);
            let Ok(area) = app.model.find_subject_area(&identifier) else {
                bail!("no subject area `{name}` is registered");
            };
            print_subject_area(&app.model, area);
        }
        None => {
            for area in app.model.subject_areas() {
                let entities = app.model.entity_types_in(&area.identifier).len();
                let relationships = app.model.relationship_types_in(&area.identifier).len();
                println!(
                    "{}  {} entity types, {} relationship types",
                    area.identifier.to_string().bold(),
                    entities,
                    relationships
                );
            }
        }
    }
    Ok(())
}

fn print_subject_area(model: &ModelRegistry, area: &SubjectArea) {
    println!("{}", area.identifier.to_string().bold());
    if let Some(user_name) = &area.user_name {
        println!("  {user_name}");
    }
    for dependency in &area.dependencies {
        println!("  {} {}", "depends on".yellow(), dependency);
    }
    for entity in model.entity_types_in(&area.identifier) {
        let marker = if entity.is_abstract { " (abstract)" } else { "" };
        println!("  {} {}{}", "entity".cyan(), entity.identifier, marker);
        if let Ok(properties) = model.property_types_of(&entity.identifier) {
            for property in properties {
                println!(
                    "      {} : {}",
                    property.identifier.local_name(),
                    property.data_type.kind()
                );
            }
        }
    }
    for relationship in model.relationship_types_in(&area.identifier) {
        println!(
            "  {} {} ({} -> {})",
            "relationship".cyan(),
            relationship.identifier,
            relationship.source.multiplicity,
            relationship.destination.multiplicity
        );
    }
}
