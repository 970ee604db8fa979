//! Flat, serde-friendly form of a mesh object.
//!
//! This is the shape external documents state and the shape the XML probe
//! buffers during its first pass: identifiers are still text, nothing has
//! been resolved against a model or a base.

use crate::object::{now_millis, AuditTimes};
use meshweave_model::{MeshTypeIdentifier, PropertyValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalizedMeshObject {
    /// External identifier text: `""` (home), `#local`, or a full form.
    pub identifier: String,
    pub time_created: Option<i64>,
    pub time_updated: Option<i64>,
    pub time_read: Option<i64>,
    pub time_expires: Option<i64>,
    pub give_up_lock: bool,
    pub give_up_home: bool,
    /// External form of the base this object's home replica lives at.
    pub proxy_towards_home: Option<String>,
    pub mesh_types: Vec<MeshTypeIdentifier>,
    pub properties: Vec<(MeshTypeIdentifier, PropertyValue)>,
    pub relationships: Vec<ExternalizedRelationship>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalizedRelationship {
    /// External identifier text of the other side.
    pub identifier: String,
    pub role_types: Vec<MeshTypeIdentifier>,
}

impl ExternalizedMeshObject {
    /// Audit times with "now" filling any the document did not state.
    pub fn audit_times(&self) -> AuditTimes {
        let now = now_millis();
        AuditTimes {
            created: self.time_created.unwrap_or(now),
            updated: self.time_updated.unwrap_or(now),
            read: self.time_read.unwrap_or(now),
            expires: self.time_expires,
        }
    }

    /// Whether the document stated any audit time explicitly.
    pub fn states_times(&self) -> bool {
        self.time_created.is_some()
            || self.time_updated.is_some()
            || self.time_read.is_some()
            || self.time_expires.is_some()
    }

    /// The relationship most recently begun, while a parser is filling it.
    pub fn current_relationship_mut(&mut self) -> Option<&mut ExternalizedRelationship> {
        self.relationships.last_mut()
    }
}
