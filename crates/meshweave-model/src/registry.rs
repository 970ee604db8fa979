//! The model registry: runtime lookup of registered mesh types.

use crate::builder::SubjectAreaDefinition;
use crate::datatype::ValueError;
use crate::identifier::MeshTypeIdentifier;
use crate::schema::{EntityType, PropertyType, RelationshipType, RoleDirection, RoleType, SubjectArea};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no mesh type with identifier `{0}`")]
    TypeNotFound(MeshTypeIdentifier),
    #[error("mesh type `{identifier}` is a {actual}, not a {expected}")]
    WrongKind {
        identifier: MeshTypeIdentifier,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("mesh type identifier `{0}` is already registered")]
    DuplicateIdentifier(MeshTypeIdentifier),
    #[error("`{referrer}` references undeclared mesh type `{missing}`")]
    DanglingReference {
        referrer: MeshTypeIdentifier,
        missing: MeshTypeIdentifier,
    },
    #[error("invalid name `{name}`: {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("invalid default value: {0}")]
    InvalidDefault(#[from] ValueError),
}

/// Lookup service over all registered subject areas.
///
/// Registration is all-or-nothing per subject area; every cross-reference of
/// an accepted area resolves, so the `find_*` methods only fail for
/// identifiers the model genuinely does not know.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    subject_areas: BTreeMap<MeshTypeIdentifier, Arc<SubjectArea>>,
    entity_types: HashMap<MeshTypeIdentifier, Arc<EntityType>>,
    relationship_types: HashMap<MeshTypeIdentifier, Arc<RelationshipType>>,
    property_types: HashMap<MeshTypeIdentifier, Arc<PropertyType>>,
    /// Role identifier -> owning relationship + side.
    roles: HashMap<MeshTypeIdentifier, (MeshTypeIdentifier, RoleDirection)>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a complete subject area.
    ///
    /// Checks duplicate identifiers, declared dependencies, supertype and
    /// role-participant references (against the registry plus the incoming
    /// area), and default values against their data types.
    pub fn register(&mut self, definition: SubjectAreaDefinition) -> Result<(), ModelError> {
        let SubjectAreaDefinition {
            area,
            entity_types,
            property_types,
            relationship_types,
        } = definition;

        if self.kind_of(&area.identifier).is_some() {
            return Err(ModelError::DuplicateIdentifier(area.identifier));
        }
        for dependency in &area.dependencies {
            if !self.subject_areas.contains_key(dependency) {
                return Err(ModelError::DanglingReference {
                    referrer: area.identifier.clone(),
                    missing: dependency.clone(),
                });
            }
        }

        let mut incoming: HashSet<&MeshTypeIdentifier> = HashSet::new();
        let incoming_entities: HashSet<&MeshTypeIdentifier> =
            entity_types.iter().map(|e| &e.identifier).collect();
        for identifier in entity_types
            .iter()
            .map(|e| &e.identifier)
            .chain(property_types.iter().map(|p| &p.identifier))
            .chain(relationship_types.iter().map(|r| &r.identifier))
        {
            if self.kind_of(identifier).is_some() || !incoming.insert(identifier) {
                return Err(ModelError::DuplicateIdentifier(identifier.clone()));
            }
        }

        let knows_entity =
            |id: &MeshTypeIdentifier| self.entity_types.contains_key(id) || incoming_entities.contains(id);

        for entity in &entity_types {
            for supertype in &entity.supertypes {
                if !knows_entity(supertype) {
                    return Err(ModelError::DanglingReference {
                        referrer: entity.identifier.clone(),
                        missing: supertype.clone(),
                    });
                }
            }
        }
        for relationship in &relationship_types {
            for role in [&relationship.source, &relationship.destination] {
                if let Some(required) = &role.entity_type {
                    if !knows_entity(required) {
                        return Err(ModelError::DanglingReference {
                            referrer: relationship.identifier.clone(),
                            missing: required.clone(),
                        });
                    }
                }
            }
        }
        for property in &property_types {
            if let Some(default) = &property.default_value {
                property.data_type.accepts(default)?;
            }
        }

        self.subject_areas
            .insert(area.identifier.clone(), Arc::new(area));
        for entity in entity_types {
            self.entity_types
                .insert(entity.identifier.clone(), Arc::new(entity));
        }
        for property in property_types {
            self.property_types
                .insert(property.identifier.clone(), Arc::new(property));
        }
        for relationship in relationship_types {
            for role in [&relationship.source, &relationship.destination] {
                self.roles.insert(
                    role.identifier.clone(),
                    (relationship.identifier.clone(), role.direction),
                );
            }
            self.relationship_types
                .insert(relationship.identifier.clone(), Arc::new(relationship));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    pub fn find_subject_area(
        &self,
        identifier: &MeshTypeIdentifier,
    ) -> Result<&Arc<SubjectArea>, ModelError> {
        self.subject_areas
            .get(identifier)
            .ok_or_else(|| self.not_found(identifier, "subject area"))
    }

    pub fn find_entity_type(
        &self,
        identifier: &MeshTypeIdentifier,
    ) -> Result<&Arc<EntityType>, ModelError> {
        self.entity_types
            .get(identifier)
            .ok_or_else(|| self.not_found(identifier, "entity type"))
    }

    pub fn find_relationship_type(
        &self,
        identifier: &MeshTypeIdentifier,
    ) -> Result<&Arc<RelationshipType>, ModelError> {
        self.relationship_types
            .get(identifier)
            .ok_or_else(|| self.not_found(identifier, "relationship type"))
    }

    pub fn find_property_type(
        &self,
        identifier: &MeshTypeIdentifier,
    ) -> Result<&Arc<PropertyType>, ModelError> {
        self.property_types
            .get(identifier)
            .ok_or_else(|| self.not_found(identifier, "property type"))
    }

    /// Resolve a role identifier to its relationship type and side.
    pub fn find_role_type(
        &self,
        identifier: &MeshTypeIdentifier,
    ) -> Result<(&Arc<RelationshipType>, RoleDirection), ModelError> {
        let (relationship, direction) = self
            .roles
            .get(identifier)
            .ok_or_else(|| self.not_found(identifier, "role type"))?;
        Ok((self.find_relationship_type(relationship)?, *direction))
    }

    pub fn role_of(
        &self,
        identifier: &MeshTypeIdentifier,
    ) -> Result<&RoleType, ModelError> {
        let (relationship, direction) = self.find_role_type(identifier)?;
        Ok(relationship.role(direction))
    }

    /// Registered subject areas in identifier order.
    pub fn subject_areas(&self) -> impl Iterator<Item = &Arc<SubjectArea>> {
        self.subject_areas.values()
    }

    /// Entity types of one subject area, in identifier order.
    pub fn entity_types_in(&self, subject_area: &MeshTypeIdentifier) -> Vec<&Arc<EntityType>> {
        let mut out: Vec<_> = self
            .entity_types
            .values()
            .filter(|e| &e.subject_area == subject_area)
            .collect();
        out.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        out
    }

    /// Relationship types of one subject area, in identifier order.
    pub fn relationship_types_in(
        &self,
        subject_area: &MeshTypeIdentifier,
    ) -> Vec<&Arc<RelationshipType>> {
        let mut out: Vec<_> = self
            .relationship_types
            .values()
            .filter(|r| &r.subject_area == subject_area)
            .collect();
        out.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        out
    }

    // ------------------------------------------------------------------
    // Inheritance
    // ------------------------------------------------------------------

    /// Reflexive, transitive subtype check.
    pub fn is_subtype_of(&self, sub: &MeshTypeIdentifier, sup: &MeshTypeIdentifier) -> bool {
        if sub == sup {
            return true;
        }
        let mut seen = HashSet::new();
        let mut stack = vec![sub.clone()];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Ok(entity) = self.find_entity_type(&current) else {
                continue;
            };
            for supertype in &entity.supertypes {
                if supertype == sup {
                    return true;
                }
                stack.push(supertype.clone());
            }
        }
        false
    }

    /// All property types an entity type carries: its own plus inherited,
    /// deduplicated, in breadth-first declaration order.
    pub fn property_types_of(
        &self,
        entity: &MeshTypeIdentifier,
    ) -> Result<Vec<Arc<PropertyType>>, ModelError> {
        let mut out = Vec::new();
        let mut seen_types = HashSet::new();
        let mut seen_properties = HashSet::new();
        let mut queue = vec![entity.clone()];
        let mut index = 0;
        while index < queue.len() {
            let current = queue[index].clone();
            index += 1;
            if !seen_types.insert(current.clone()) {
                continue;
            }
            let entity_type = self.find_entity_type(&current)?;
            for property in &entity_type.property_types {
                if seen_properties.insert(property.clone()) {
                    out.push(self.find_property_type(property)?.clone());
                }
            }
            queue.extend(entity_type.supertypes.iter().cloned());
        }
        Ok(out)
    }

    /// Role types an entity type may play: those whose participant
    /// requirement it satisfies (directly or via a supertype), plus
    /// unconstrained roles. In identifier order.
    pub fn role_types_requiring(&self, entity: &MeshTypeIdentifier) -> Vec<&RoleType> {
        let mut out: Vec<&RoleType> = self
            .relationship_types
            .values()
            .flat_map(|relationship| [&relationship.source, &relationship.destination])
            .filter(|role| match &role.entity_type {
                Some(required) => self.is_subtype_of(entity, required),
                None => true,
            })
            .collect();
        out.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        out
    }

    /// Whether any of `blessed` (or their supertypes) declares `property`.
    pub fn property_declared_for<'a>(
        &self,
        blessed: impl Iterator<Item = &'a MeshTypeIdentifier>,
        property: &PropertyType,
    ) -> bool {
        blessed.into_iter().any(|t| self.is_subtype_of(t, &property.owner))
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn kind_of(&self, identifier: &MeshTypeIdentifier) -> Option<&'static str> {
        if self.subject_areas.contains_key(identifier) {
            Some("subject area")
        } else if self.entity_types.contains_key(identifier) {
            Some("entity type")
        } else if self.relationship_types.contains_key(identifier) {
            Some("relationship type")
        } else if self.property_types.contains_key(identifier) {
            Some("property type")
        } else if self.roles.contains_key(identifier) {
            Some("role type")
        } else {
            None
        }
    }

    fn not_found(&self, identifier: &MeshTypeIdentifier, expected: &'static str) -> ModelError {
        match self.kind_of(identifier) {
            Some(actual) if actual != expected => ModelError::WrongKind {
                identifier: identifier.clone(),
                expected,
                actual,
            },
            _ => ModelError::TypeNotFound(identifier.clone()),
        }
    }
}
