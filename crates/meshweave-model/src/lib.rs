//! Meshweave schema primitives.
//!
//! A *subject area* is the unit of schema: a named, versioned bundle of
//! entity types, relationship types and property types. This crate defines
//! those declarations, the thirteen property-value kinds they range over,
//! and the [`ModelRegistry`] that resolves mesh-type identifiers at runtime.
//!
//! Subject areas are declared in code through [`SubjectAreaBuilder`] and
//! registered as a whole; cross-references (supertypes, role participants,
//! area dependencies) are validated at registration time, so a registered
//! model is closed under lookup.

pub mod builder;
pub mod datatype;
pub mod identifier;
pub mod registry;
pub mod schema;
pub mod value;

pub use builder::{
    EntitySpec, EntityTypeRef, PropertySpec, PropertyTypeRef, RelationshipSpec,
    RelationshipTypeRef, RoleSpec, SubjectAreaBuilder, SubjectAreaDefinition,
};
pub use datatype::{DataType, EnumValue, EnumeratedDomain, ValueError};
pub use identifier::MeshTypeIdentifier;
pub use registry::{ModelError, ModelRegistry};
pub use schema::{
    EntityType, PropertyType, RelationshipType, RoleDirection, RoleType, SubjectArea,
};
pub use value::{
    BlobPayload, BlobValue, ColorValue, CurrencyValue, EnumeratedValue, ExtentValue,
    MultiplicityValue, PointValue, PropertyValue, TimePeriodValue, TimeStampValue, ValueKind,
    ValueTextError,
};
