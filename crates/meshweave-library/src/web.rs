//! The Web subject area: resources addressable by URL.

use crate::facade::{expect_string, require_blessed, FacadeError};
use meshweave_mesh::{MeshBase, ObjId};
use meshweave_model::{
    DataType, EntitySpec, MeshTypeIdentifier, ModelError, ModelRegistry, PropertySpec,
    PropertyValue, SubjectAreaBuilder,
};

pub const SUBJECT_AREA: &str = "web.meshweave.example";

pub fn subject_area() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(SUBJECT_AREA)
}

pub fn web_resource() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/WebResource"))
}

pub fn web_resource_url() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/WebResource_Url"))
}

pub fn register(registry: &mut ModelRegistry) -> Result<(), ModelError> {
    let mut b = SubjectAreaBuilder::new(SUBJECT_AREA, "Web")?;
    b.version("1")
        .user_name("Web Subject Area")
        .user_description("Resources addressable on the web.");
    let resource = b.entity_type(
        "WebResource",
        EntitySpec {
            user_name: Some("Web Resource"),
            user_description: Some("A resource addressable by URL."),
            ..Default::default()
        },
    )?;
    b.property_type(
        &resource,
        "Url",
        DataType::String,
        PropertySpec {
            user_name: Some("URL"),
            is_optional: true,
            ..Default::default()
        },
    )?;
    b.register(registry)
}

/// Typed view over a mesh object blessed as `WebResource`.
pub struct WebResource<'a> {
    base: &'a mut MeshBase,
    id: ObjId,
}

impl<'a> WebResource<'a> {
    pub fn wrap(base: &'a mut MeshBase, id: ObjId) -> Result<Self, FacadeError> {
        require_blessed(base, id, &web_resource())?;
        Ok(Self { base, id })
    }

    pub fn id(&self) -> ObjId {
        self.id
    }

    pub fn url(&self) -> Result<Option<String>, FacadeError> {
        let property = web_resource_url();
        expect_string(&property, self.base.get_property(self.id, &property)?)
    }

    pub fn set_url(&mut self, url: &str) -> Result<(), FacadeError> {
        tracing::trace!(object = %self.id, url, "WebResource::set_url");
        self.base
            .set_property(self.id, &web_resource_url(), PropertyValue::String(url.into()))?;
        Ok(())
    }
}
