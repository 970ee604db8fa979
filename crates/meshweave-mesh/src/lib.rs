//! Meshweave graph store.
//!
//! A [`MeshBase`] owns the mesh objects of one data source: generic graph
//! nodes carrying entity types, a typed property bag and role-typed edges.
//! All schema decisions are delegated to a [`meshweave_model::ModelRegistry`];
//! the base enforces them at mutation time (blessing, property assignment,
//! relationship blessing) and answers lookups by identifier, entity type and
//! role traversal.
//!
//! The lifecycle surface deliberately reports one error variant per
//! condition ([`MeshError`]) so importers can distinguish "the document
//! states this twice" (idempotent, ignorable) from genuine schema
//! violations.

pub mod base;
pub mod error;
pub mod externalized;
pub mod identifier;
pub mod object;
pub mod snapshot;

pub use base::{MeshBase, SharedMeshBase};
pub use error::MeshError;
pub use externalized::{ExternalizedMeshObject, ExternalizedRelationship};
pub use identifier::{IdentifierError, MeshBaseIdentifier, MeshObjectIdentifier};
pub use object::{AuditTimes, MeshObject, ObjId};
pub use snapshot::{load_snapshot, save_snapshot, SnapshotError};
