//! Built-in subject areas and typed facades.
//!
//! Each module declares one subject area through the model builder and pairs
//! every non-abstract entity type with a facade struct: a thin typed view
//! over a generic mesh object, one getter/setter per declared property,
//! delegating to the mesh base's property bag. Facades never hold copies of
//! property state; they resolve against the base on every call.

pub mod bookmark;
pub mod facade;
pub mod feeds;
pub mod web;

pub use facade::FacadeError;

use meshweave_model::{ModelError, ModelRegistry};

/// Register every built-in subject area, in dependency order.
pub fn register_builtin_model(registry: &mut ModelRegistry) -> Result<(), ModelError> {
    web::register(registry)?;
    bookmark::register(registry)?;
    feeds::register(registry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_model_registers_and_resolves() {
        let mut registry = ModelRegistry::new();
        register_builtin_model(&mut registry).expect("register");

        assert!(registry.find_subject_area(&web::subject_area()).is_ok());
        assert!(registry.find_entity_type(&bookmark::bookmark()).is_ok());
        assert!(registry.find_property_type(&feeds::feed_title()).is_ok());
        assert!(registry
            .find_role_type(&bookmark::bookmarks_resource_source_role())
            .is_ok());
    }
}
