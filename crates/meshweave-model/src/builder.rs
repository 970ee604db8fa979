//! Declaring subject areas in code.
//!
//! The builder derives identifiers from the subject-area identifier and the
//! element names (`<area>/<Entity>`, `<area>/<Entity>_<Property>`,
//! `<area>/<Relationship>-S`/`-D`), so declaration sites only spell names.

use crate::datatype::DataType;
use crate::identifier::MeshTypeIdentifier;
use crate::registry::{ModelError, ModelRegistry};
use crate::schema::{
    EntityType, PropertyType, RelationshipType, RoleDirection, RoleType, SubjectArea,
};
use crate::value::{MultiplicityValue, PropertyValue};

/// A complete subject area ready for registration.
#[derive(Debug, Clone)]
pub struct SubjectAreaDefinition {
    pub area: SubjectArea,
    pub entity_types: Vec<EntityType>,
    pub property_types: Vec<PropertyType>,
    pub relationship_types: Vec<RelationshipType>,
}

/// Handle to a declared (or externally registered) entity type.
#[derive(Debug, Clone)]
pub struct EntityTypeRef {
    identifier: MeshTypeIdentifier,
}

impl EntityTypeRef {
    /// Reference an entity type of an already-registered subject area.
    pub fn external(identifier: MeshTypeIdentifier) -> Self {
        Self { identifier }
    }

    pub fn identifier(&self) -> &MeshTypeIdentifier {
        &self.identifier
    }
}

/// Handle to a declared property type.
#[derive(Debug, Clone)]
pub struct PropertyTypeRef {
    identifier: MeshTypeIdentifier,
}

impl PropertyTypeRef {
    pub fn identifier(&self) -> &MeshTypeIdentifier {
        &self.identifier
    }
}

/// Handle to a declared relationship type.
#[derive(Debug, Clone)]
pub struct RelationshipTypeRef {
    identifier: MeshTypeIdentifier,
}

impl RelationshipTypeRef {
    pub fn identifier(&self) -> &MeshTypeIdentifier {
        &self.identifier
    }

    pub fn source_role(&self) -> MeshTypeIdentifier {
        RoleType::derive_identifier(&self.identifier, RoleDirection::Source)
    }

    pub fn destination_role(&self) -> MeshTypeIdentifier {
        RoleType::derive_identifier(&self.identifier, RoleDirection::Destination)
    }
}

#[derive(Debug, Default)]
pub struct EntitySpec<'a> {
    pub user_name: Option<&'a str>,
    pub user_description: Option<&'a str>,
    pub is_abstract: bool,
    pub supertypes: &'a [EntityTypeRef],
}

#[derive(Debug, Default)]
pub struct PropertySpec<'a> {
    pub user_name: Option<&'a str>,
    pub default_value: Option<PropertyValue>,
    pub is_optional: bool,
    pub is_read_only: bool,
}

#[derive(Debug)]
pub struct RoleSpec<'a> {
    pub multiplicity: MultiplicityValue,
    pub entity_type: Option<&'a EntityTypeRef>,
}

#[derive(Debug, Default)]
pub struct RelationshipSpec<'a> {
    pub user_name: Option<&'a str>,
    pub is_abstract: bool,
}

/// Builder for one subject area.
pub struct SubjectAreaBuilder {
    area: SubjectArea,
    entity_types: Vec<EntityType>,
    property_types: Vec<PropertyType>,
    relationship_types: Vec<RelationshipType>,
}

impl SubjectAreaBuilder {
    pub fn new(identifier: &str, name: &str) -> Result<Self, ModelError> {
        validate_name(name)?;
        if identifier.is_empty() {
            return Err(ModelError::InvalidName {
                name: identifier.to_string(),
                reason: "subject area identifier must not be empty",
            });
        }
        Ok(Self {
            area: SubjectArea {
                identifier: MeshTypeIdentifier::new(identifier),
                name: name.to_string(),
                version: None,
                user_name: None,
                user_description: None,
                dependencies: Vec::new(),
            },
            entity_types: Vec::new(),
            property_types: Vec::new(),
            relationship_types: Vec::new(),
        })
    }

    pub fn version(&mut self, version: &str) -> &mut Self {
        self.area.version = Some(version.to_string());
        self
    }

    pub fn user_name(&mut self, user_name: &str) -> &mut Self {
        self.area.user_name = Some(user_name.to_string());
        self
    }

    pub fn user_description(&mut self, description: &str) -> &mut Self {
        self.area.user_description = Some(description.to_string());
        self
    }

    pub fn depends_on(&mut self, subject_area: &MeshTypeIdentifier) -> &mut Self {
        self.area.dependencies.push(subject_area.clone());
        self
    }

    pub fn entity_type(
        &mut self,
        name: &str,
        spec: EntitySpec<'_>,
    ) -> Result<EntityTypeRef, ModelError> {
        validate_name(name)?;
        let identifier = MeshTypeIdentifier::new(format!("{}/{name}", self.area.identifier));
        self.entity_types.push(EntityType {
            identifier: identifier.clone(),
            name: name.to_string(),
            subject_area: self.area.identifier.clone(),
            user_name: spec.user_name.map(str::to_string),
            user_description: spec.user_description.map(str::to_string),
            is_abstract: spec.is_abstract,
            supertypes: spec
                .supertypes
                .iter()
                .map(|s| s.identifier().clone())
                .collect(),
            property_types: Vec::new(),
        });
        Ok(EntityTypeRef { identifier })
    }

    pub fn property_type(
        &mut self,
        owner: &EntityTypeRef,
        name: &str,
        data_type: DataType,
        spec: PropertySpec<'_>,
    ) -> Result<PropertyTypeRef, ModelError> {
        validate_name(name)?;
        let owner_entity = self
            .entity_types
            .iter_mut()
            .find(|e| &e.identifier == owner.identifier())
            .ok_or_else(|| ModelError::DanglingReference {
                referrer: self.area.identifier.clone(),
                missing: owner.identifier().clone(),
            })?;
        let identifier = MeshTypeIdentifier::new(format!(
            "{}/{}_{name}",
            self.area.identifier, owner_entity.name
        ));
        owner_entity.property_types.push(identifier.clone());
        self.property_types.push(PropertyType {
            identifier: identifier.clone(),
            name: name.to_string(),
            subject_area: self.area.identifier.clone(),
            owner: owner.identifier().clone(),
            user_name: spec.user_name.map(str::to_string),
            data_type,
            default_value: spec.default_value,
            is_optional: spec.is_optional,
            is_read_only: spec.is_read_only,
        });
        Ok(PropertyTypeRef { identifier })
    }

    pub fn relationship_type(
        &mut self,
        name: &str,
        source: RoleSpec<'_>,
        destination: RoleSpec<'_>,
        spec: RelationshipSpec<'_>,
    ) -> Result<RelationshipTypeRef, ModelError> {
        validate_name(name)?;
        let identifier = MeshTypeIdentifier::new(format!("{}/{name}", self.area.identifier));
        let make_role = |role: RoleSpec<'_>, direction: RoleDirection| RoleType {
            identifier: RoleType::derive_identifier(&identifier, direction),
            relationship: identifier.clone(),
            direction,
            multiplicity: role.multiplicity,
            entity_type: role.entity_type.map(|e| e.identifier().clone()),
        };
        self.relationship_types.push(RelationshipType {
            identifier: identifier.clone(),
            name: name.to_string(),
            subject_area: self.area.identifier.clone(),
            user_name: spec.user_name.map(str::to_string),
            is_abstract: spec.is_abstract,
            source: make_role(source, RoleDirection::Source),
            destination: make_role(destination, RoleDirection::Destination),
        });
        Ok(RelationshipTypeRef { identifier })
    }

    pub fn build(self) -> SubjectAreaDefinition {
        SubjectAreaDefinition {
            area: self.area,
            entity_types: self.entity_types,
            property_types: self.property_types,
            relationship_types: self.relationship_types,
        }
    }

    pub fn register(self, registry: &mut ModelRegistry) -> Result<(), ModelError> {
        registry.register(self.build())
    }
}

fn validate_name(name: &str) -> Result<(), ModelError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ModelError::InvalidName {
            name: name.to_string(),
            reason: "names start with a letter or underscore and contain only letters, digits and underscores",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn toy_area() -> SubjectAreaBuilder {
        SubjectAreaBuilder::new("toy.meshweave.example", "Toy").expect("builder")
    }

    #[test]
    fn derives_identifiers_from_names() {
        let mut b = toy_area();
        let widget = b
            .entity_type("Widget", EntitySpec::default())
            .expect("entity");
        let name = b
            .property_type(&widget, "Name", DataType::String, PropertySpec::default())
            .expect("property");
        assert_eq!(widget.identifier().as_str(), "toy.meshweave.example/Widget");
        assert_eq!(
            name.identifier().as_str(),
            "toy.meshweave.example/Widget_Name"
        );
    }

    #[test]
    fn register_resolves_the_declared_model() {
        let mut registry = ModelRegistry::new();
        let mut b = toy_area();
        b.user_name("Toy Subject Area");
        let widget = b
            .entity_type("Widget", EntitySpec::default())
            .expect("entity");
        let gadget = b
            .entity_type(
                "Gadget",
                EntitySpec {
                    supertypes: std::slice::from_ref(&widget),
                    ..Default::default()
                },
            )
            .expect("entity");
        b.property_type(&widget, "Name", DataType::String, PropertySpec::default())
            .expect("property");
        let uses = b
            .relationship_type(
                "Widget_Uses_Gadget",
                RoleSpec {
                    multiplicity: MultiplicityValue::ZERO_TO_N,
                    entity_type: Some(&widget),
                },
                RoleSpec {
                    multiplicity: MultiplicityValue::ZERO_TO_N,
                    entity_type: Some(&gadget),
                },
                RelationshipSpec::default(),
            )
            .expect("relationship");
        b.register(&mut registry).expect("register");

        assert!(registry.find_entity_type(widget.identifier()).is_ok());
        assert!(registry.is_subtype_of(gadget.identifier(), widget.identifier()));
        assert!(!registry.is_subtype_of(widget.identifier(), gadget.identifier()));

        // Gadget inherits Widget_Name.
        let properties = registry
            .property_types_of(gadget.identifier())
            .expect("properties");
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].data_type.kind(), ValueKind::String);

        let (relationship, direction) = registry
            .find_role_type(&uses.source_role())
            .expect("role lookup");
        assert_eq!(&relationship.identifier, uses.identifier());
        assert_eq!(direction, RoleDirection::Source);

        // Gadget satisfies the Widget-constrained source role by subtyping.
        let playable: Vec<_> = registry
            .role_types_requiring(gadget.identifier())
            .into_iter()
            .map(|role| role.identifier.clone())
            .collect();
        assert!(playable.contains(&uses.source_role()));
        assert!(playable.contains(&uses.destination_role()));
        let widget_roles = registry.role_types_requiring(widget.identifier());
        assert!(!widget_roles
            .iter()
            .any(|role| role.identifier == uses.destination_role()));
    }

    #[test]
    fn register_rejects_duplicates_and_dangling_references() {
        let mut registry = ModelRegistry::new();
        toy_area().register(&mut registry).expect("first");
        assert!(matches!(
            toy_area().register(&mut registry),
            Err(ModelError::DuplicateIdentifier(_))
        ));

        let mut b = SubjectAreaBuilder::new("other.meshweave.example", "Other").expect("builder");
        let ghost = EntityTypeRef::external(MeshTypeIdentifier::new("nowhere/Ghost"));
        b.entity_type(
            "Haunted",
            EntitySpec {
                supertypes: std::slice::from_ref(&ghost),
                ..Default::default()
            },
        )
        .expect("entity");
        assert!(matches!(
            b.register(&mut registry),
            Err(ModelError::DanglingReference { .. })
        ));
    }

    #[test]
    fn find_reports_wrong_kind() {
        let mut registry = ModelRegistry::new();
        let mut b = toy_area();
        let widget = b
            .entity_type("Widget", EntitySpec::default())
            .expect("entity");
        b.register(&mut registry).expect("register");

        assert!(matches!(
            registry.find_property_type(widget.identifier()),
            Err(ModelError::WrongKind {
                expected: "property type",
                actual: "entity type",
                ..
            })
        ));
        assert!(matches!(
            registry.find_entity_type(&MeshTypeIdentifier::new("missing/Type")),
            Err(ModelError::TypeNotFound(_))
        ));
    }
}
