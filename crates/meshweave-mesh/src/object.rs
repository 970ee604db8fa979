//! Mesh objects.

use crate::identifier::{MeshBaseIdentifier, MeshObjectIdentifier};
use chrono::Utc;
use meshweave_model::{MeshTypeIdentifier, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Dense per-base object id (4 bytes; index into the base's object table).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct ObjId(u32);

impl ObjId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ObjId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Audit times of a mesh object, milliseconds since the Unix epoch (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTimes {
    pub created: i64,
    pub updated: i64,
    pub read: i64,
    pub expires: Option<i64>,
}

impl AuditTimes {
    pub fn now() -> Self {
        let now = now_millis();
        Self {
            created: now,
            updated: now,
            read: now,
            expires: None,
        }
    }
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A generic graph node: entity types, a typed property bag and role-typed
/// edges to neighbors.
///
/// Mutation goes through [`crate::MeshBase`], which owns schema validation;
/// a `MeshObject` on its own is just state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshObject {
    pub(crate) id: ObjId,
    pub(crate) identifier: MeshObjectIdentifier,
    pub(crate) types: BTreeSet<MeshTypeIdentifier>,
    pub(crate) properties: BTreeMap<MeshTypeIdentifier, PropertyValue>,
    /// Neighbor -> role types this object plays on that edge.
    pub(crate) neighbors: BTreeMap<ObjId, BTreeSet<MeshTypeIdentifier>>,
    pub(crate) time_created: i64,
    pub(crate) time_updated: i64,
    pub(crate) time_read: i64,
    pub(crate) time_expires: Option<i64>,
    pub(crate) give_up_lock: bool,
    pub(crate) give_up_home: bool,
    pub(crate) proxy_towards_home: Option<MeshBaseIdentifier>,
}

impl MeshObject {
    pub(crate) fn new(id: ObjId, identifier: MeshObjectIdentifier, times: AuditTimes) -> Self {
        Self {
            id,
            identifier,
            types: BTreeSet::new(),
            properties: BTreeMap::new(),
            neighbors: BTreeMap::new(),
            time_created: times.created,
            time_updated: times.updated,
            time_read: times.read,
            time_expires: times.expires,
            give_up_lock: false,
            give_up_home: false,
            proxy_towards_home: None,
        }
    }

    pub fn id(&self) -> ObjId {
        self.id
    }

    pub fn identifier(&self) -> &MeshObjectIdentifier {
        &self.identifier
    }

    pub fn is_home(&self) -> bool {
        self.identifier.is_home()
    }

    pub fn is_blessed_with(&self, entity_type: &MeshTypeIdentifier) -> bool {
        self.types.contains(entity_type)
    }

    /// Blessed entity types, in identifier order.
    pub fn types(&self) -> impl Iterator<Item = &MeshTypeIdentifier> {
        self.types.iter()
    }

    /// Stored (explicitly set) property value, without default resolution.
    pub fn stored_property(&self, property: &MeshTypeIdentifier) -> Option<&PropertyValue> {
        self.properties.get(property)
    }

    /// Stored property pairs, in identifier order.
    pub fn properties(&self) -> impl Iterator<Item = (&MeshTypeIdentifier, &PropertyValue)> {
        self.properties.iter()
    }

    /// Neighbors with the role types this object plays toward each.
    pub fn neighbors(&self) -> impl Iterator<Item = (ObjId, &BTreeSet<MeshTypeIdentifier>)> {
        self.neighbors.iter().map(|(id, roles)| (*id, roles))
    }

    pub fn is_related_to(&self, other: ObjId) -> bool {
        self.neighbors.contains_key(&other)
    }

    pub fn time_created(&self) -> i64 {
        self.time_created
    }

    pub fn time_updated(&self) -> i64 {
        self.time_updated
    }

    pub fn time_read(&self) -> i64 {
        self.time_read
    }

    pub fn time_expires(&self) -> Option<i64> {
        self.time_expires
    }

    pub fn give_up_lock(&self) -> bool {
        self.give_up_lock
    }

    pub fn give_up_home(&self) -> bool {
        self.give_up_home
    }

    /// Set for forward references: the base this replica's home is found at.
    pub fn proxy_towards_home(&self) -> Option<&MeshBaseIdentifier> {
        self.proxy_towards_home.as_ref()
    }
}
