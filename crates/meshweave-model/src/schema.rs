//! Schema element declarations.
//!
//! These are plain data carriers; construction goes through
//! [`crate::SubjectAreaBuilder`], which derives identifiers and enforces the
//! naming conventions, and [`crate::ModelRegistry::register`], which checks
//! cross-references.

use crate::datatype::DataType;
use crate::identifier::MeshTypeIdentifier;
use crate::value::{MultiplicityValue, PropertyValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, versioned bundle of mesh-type declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectArea {
    pub identifier: MeshTypeIdentifier,
    pub name: String,
    pub version: Option<String>,
    pub user_name: Option<String>,
    pub user_description: Option<String>,
    /// Other subject areas whose types this one references.
    pub dependencies: Vec<MeshTypeIdentifier>,
}

/// The type of a mesh object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityType {
    pub identifier: MeshTypeIdentifier,
    pub name: String,
    pub subject_area: MeshTypeIdentifier,
    pub user_name: Option<String>,
    pub user_description: Option<String>,
    pub is_abstract: bool,
    pub supertypes: Vec<MeshTypeIdentifier>,
    /// Property types declared directly on this entity type (inherited ones
    /// are resolved through the registry).
    pub property_types: Vec<MeshTypeIdentifier>,
}

/// A typed attribute of an entity type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyType {
    pub identifier: MeshTypeIdentifier,
    pub name: String,
    pub subject_area: MeshTypeIdentifier,
    /// The entity type this property is declared on.
    pub owner: MeshTypeIdentifier,
    pub user_name: Option<String>,
    pub data_type: DataType,
    pub default_value: Option<PropertyValue>,
    pub is_optional: bool,
    pub is_read_only: bool,
}

/// Which end of a relationship type a role belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleDirection {
    Source,
    Destination,
}

impl RoleDirection {
    pub fn opposite(self) -> Self {
        match self {
            RoleDirection::Source => RoleDirection::Destination,
            RoleDirection::Destination => RoleDirection::Source,
        }
    }

    /// Identifier suffix for the role on this side.
    pub fn suffix(self) -> &'static str {
        match self {
            RoleDirection::Source => "-S",
            RoleDirection::Destination => "-D",
        }
    }
}

impl fmt::Display for RoleDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleDirection::Source => f.write_str("source"),
            RoleDirection::Destination => f.write_str("destination"),
        }
    }
}

/// One end of a relationship type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleType {
    /// Derived: `<relationship identifier><direction suffix>`.
    pub identifier: MeshTypeIdentifier,
    pub relationship: MeshTypeIdentifier,
    pub direction: RoleDirection,
    pub multiplicity: MultiplicityValue,
    /// Entity type a participant on this side must be blessed with, if any.
    pub entity_type: Option<MeshTypeIdentifier>,
}

impl RoleType {
    pub fn derive_identifier(
        relationship: &MeshTypeIdentifier,
        direction: RoleDirection,
    ) -> MeshTypeIdentifier {
        MeshTypeIdentifier::new(format!("{relationship}{}", direction.suffix()))
    }
}

/// A binary, role-typed association between entity types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipType {
    pub identifier: MeshTypeIdentifier,
    pub name: String,
    pub subject_area: MeshTypeIdentifier,
    pub user_name: Option<String>,
    pub is_abstract: bool,
    pub source: RoleType,
    pub destination: RoleType,
}

impl RelationshipType {
    pub fn role(&self, direction: RoleDirection) -> &RoleType {
        match direction {
            RoleDirection::Source => &self.source,
            RoleDirection::Destination => &self.destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_identifiers_derive_from_the_relationship() {
        let rel = MeshTypeIdentifier::new("feeds.meshweave.example/Feed_Contains_FeedItem");
        assert_eq!(
            RoleType::derive_identifier(&rel, RoleDirection::Source).as_str(),
            "feeds.meshweave.example/Feed_Contains_FeedItem-S"
        );
        assert_eq!(
            RoleType::derive_identifier(&rel, RoleDirection::Destination).as_str(),
            "feeds.meshweave.example/Feed_Contains_FeedItem-D"
        );
    }
}
