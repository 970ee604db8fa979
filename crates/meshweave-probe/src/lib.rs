//! The probe boundary.
//!
//! Probes materialize mesh objects from external documents (untrusted) into
//! a freshly created staging [`MeshBase`]. This crate defines the [`Probe`]
//! trait, the [`ProbeDirectory`] that routes documents to probes, and the
//! XML mesh-object-set probe together with its inverse, the XML exporter.
//!
//! The error policy at this boundary is deliberate: conditions a document
//! can legitimately state twice (both directions of an edge, a repeated
//! blessing) are swallowed; schema-violating statements are logged at error
//! level and skipped so one bad object does not abort an import; and
//! structural problems (duplicate identifiers, unknown mesh types,
//! malformed values) fail the whole run as [`ProbeError::Syntax`].

pub mod error;
pub mod time;
pub mod xml;

pub use error::ProbeError;
pub use xml::{document_root_tag, write_mesh_object_set, MeshObjectSetProbe};

use meshweave_mesh::{MeshBase, MeshBaseIdentifier};
use std::collections::HashMap;

/// Content type the mesh-object-set probe is registered under.
pub const MESH_OBJECT_SET_CONTENT_TYPE: &str = "text/mesh-object-set+xml";

/// An importer for one external document format.
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;

    /// Parse `document` and instantiate the corresponding mesh objects in
    /// `staging`, which is empty except for its home object.
    fn parse_document(
        &self,
        data_source: &MeshBaseIdentifier,
        document: &str,
        staging: &mut MeshBase,
    ) -> Result<(), ProbeError>;
}

type ProbeFactory = Box<dyn Fn() -> Box<dyn Probe> + Send + Sync>;

struct ProbeDescriptor {
    name: String,
    factory: ProbeFactory,
}

/// Routes documents to probes by XML root element or stream content type.
#[derive(Default)]
pub struct ProbeDirectory {
    descriptors: Vec<ProbeDescriptor>,
    by_root_tag: HashMap<String, usize>,
    by_content_type: HashMap<String, usize>,
}

impl ProbeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A directory with the built-in XML probe registered.
    pub fn with_defaults() -> Self {
        let mut directory = Self::new();
        directory.register(
            "mesh-object-set",
            Box::new(|| Box::new(MeshObjectSetProbe::new())),
            &[xml::tags::MESH_OBJECT_SET_TAG],
            &[MESH_OBJECT_SET_CONTENT_TYPE],
        );
        directory
    }

    pub fn register(
        &mut self,
        name: &str,
        factory: ProbeFactory,
        root_tags: &[&str],
        content_types: &[&str],
    ) {
        let index = self.descriptors.len();
        self.descriptors.push(ProbeDescriptor {
            name: name.to_string(),
            factory,
        });
        for tag in root_tags {
            self.by_root_tag.insert((*tag).to_string(), index);
        }
        for content_type in content_types {
            self.by_content_type.insert((*content_type).to_string(), index);
        }
    }

    pub fn probe_for_root_tag(&self, tag: &str) -> Option<Box<dyn Probe>> {
        self.by_root_tag
            .get(tag)
            .map(|&index| (self.descriptors[index].factory)())
    }

    pub fn probe_for_content_type(&self, content_type: &str) -> Option<Box<dyn Probe>> {
        self.by_content_type
            .get(content_type)
            .map(|&index| (self.descriptors[index].factory)())
    }

    pub fn probe_names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }
}
