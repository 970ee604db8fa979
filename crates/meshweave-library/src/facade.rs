//! Shared facade plumbing.

use meshweave_mesh::{MeshBase, MeshError, ObjId};
use meshweave_model::{
    BlobValue, MeshTypeIdentifier, PropertyValue, TimeStampValue, ValueKind,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("mesh object `{object}` is not blessed with `{expected}`")]
    NotBlessedBy {
        object: String,
        expected: MeshTypeIdentifier,
    },
    #[error("property `{property}` holds a {actual} value where a {expected} value was expected")]
    UnexpectedValueKind {
        property: MeshTypeIdentifier,
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Checked facade construction: the object must satisfy the facade's entity
/// type (directly or via a subtype).
pub(crate) fn require_blessed(
    base: &MeshBase,
    id: ObjId,
    expected: &MeshTypeIdentifier,
) -> Result<(), FacadeError> {
    let object = base.object(id).ok_or(MeshError::ObjectNotFound(id))?;
    if base.satisfies_entity_type(id, expected) {
        Ok(())
    } else {
        Err(FacadeError::NotBlessedBy {
            object: object.identifier().external_form(),
            expected: expected.clone(),
        })
    }
}

pub(crate) fn expect_string(
    property: &MeshTypeIdentifier,
    value: Option<PropertyValue>,
) -> Result<Option<String>, FacadeError> {
    match value {
        None => Ok(None),
        Some(PropertyValue::String(s)) => Ok(Some(s)),
        Some(other) => Err(unexpected(property, ValueKind::String, &other)),
    }
}

pub(crate) fn expect_timestamp(
    property: &MeshTypeIdentifier,
    value: Option<PropertyValue>,
) -> Result<Option<TimeStampValue>, FacadeError> {
    match value {
        None => Ok(None),
        Some(PropertyValue::TimeStamp(t)) => Ok(Some(t)),
        Some(other) => Err(unexpected(property, ValueKind::TimeStamp, &other)),
    }
}

pub(crate) fn expect_blob(
    property: &MeshTypeIdentifier,
    value: Option<PropertyValue>,
) -> Result<Option<BlobValue>, FacadeError> {
    match value {
        None => Ok(None),
        Some(PropertyValue::Blob(b)) => Ok(Some(b)),
        Some(other) => Err(unexpected(property, ValueKind::Blob, &other)),
    }
}

fn unexpected(
    property: &MeshTypeIdentifier,
    expected: ValueKind,
    actual: &PropertyValue,
) -> FacadeError {
    FacadeError::UnexpectedValueKind {
        property: property.clone(),
        expected,
        actual: actual.kind(),
    }
}
