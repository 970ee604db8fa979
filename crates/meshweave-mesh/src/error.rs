//! Lifecycle errors.

use crate::object::ObjId;
use meshweave_model::{MeshTypeIdentifier, ModelError, ValueError};
use thiserror::Error;

/// One variant per lifecycle condition, so callers can tell idempotent
/// repetitions (`RelatedAlready`, `RoleBlessedAlready`,
/// `EntityBlessedAlready`) apart from genuine schema violations.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("mesh object identifier `{0}` is already taken")]
    IdentifierNotUnique(String),
    #[error("mesh object {0} does not exist in this mesh base")]
    ObjectNotFound(ObjId),
    #[error("`{type_identifier}` is abstract and cannot be instantiated")]
    IsAbstract { type_identifier: MeshTypeIdentifier },
    #[error("mesh object `{object}` is already blessed with `{type_identifier}`")]
    EntityBlessedAlready {
        object: String,
        type_identifier: MeshTypeIdentifier,
    },
    #[error("mesh object `{object}` does not carry property `{property}`")]
    IllegalPropertyType {
        object: String,
        property: MeshTypeIdentifier,
    },
    #[error("illegal value for property `{property}`: {source}")]
    IllegalPropertyValue {
        property: MeshTypeIdentifier,
        #[source]
        source: ValueError,
    },
    #[error("property `{property}` is read-only")]
    ReadOnlyProperty { property: MeshTypeIdentifier },
    #[error("mesh objects `{a}` and `{b}` are already related")]
    RelatedAlready { a: String, b: String },
    #[error("mesh objects `{a}` and `{b}` are not related")]
    NotRelated { a: String, b: String },
    #[error("relationship between `{a}` and `{b}` already carries role `{role}`")]
    RoleBlessedAlready {
        a: String,
        b: String,
        role: MeshTypeIdentifier,
    },
    #[error("mesh object `{object}` is not blessed with required type `{required}`")]
    EntityNotBlessed {
        object: String,
        required: MeshTypeIdentifier,
    },
    #[error("a mesh object cannot be related to itself")]
    CannotRelateToSelf,
    #[error(transparent)]
    Model(#[from] ModelError),
}
