//! The Bookmark subject area: collections of bookmarks pointing at web
//! resources.

use crate::facade::{expect_string, expect_timestamp, require_blessed, FacadeError};
use crate::web;
use meshweave_mesh::{MeshBase, ObjId};
use meshweave_model::{
    DataType, EntitySpec, EntityTypeRef, MeshTypeIdentifier, ModelError, ModelRegistry,
    MultiplicityValue, PropertySpec, PropertyValue, RelationshipSpec, RoleSpec,
    SubjectAreaBuilder, TimeStampValue,
};

pub const SUBJECT_AREA: &str = "bookmark.meshweave.example";

pub fn subject_area() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(SUBJECT_AREA)
}

pub fn bookmark_collection() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/BookmarkCollection"))
}

pub fn bookmark() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/Bookmark"))
}

pub fn bookmark_collection_name() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/BookmarkCollection_Name"))
}

pub fn bookmark_name() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/Bookmark_Name"))
}

pub fn bookmark_time_last_visited() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/Bookmark_TimeLastVisited"))
}

/// Role the collection plays in `BookmarkCollection_Collects_Bookmark`.
pub fn collects_source_role() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/BookmarkCollection_Collects_Bookmark-S"))
}

pub fn collects_destination_role() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/BookmarkCollection_Collects_Bookmark-D"))
}

/// Role the bookmark plays in `Bookmark_Bookmarks_WebResource`.
pub fn bookmarks_resource_source_role() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/Bookmark_Bookmarks_WebResource-S"))
}

pub fn register(registry: &mut ModelRegistry) -> Result<(), ModelError> {
    let mut b = SubjectAreaBuilder::new(SUBJECT_AREA, "Bookmark")?;
    b.version("1")
        .user_name("Bookmarking Subject Area")
        .user_description("Collections of bookmarks onto web resources.")
        .depends_on(&web::subject_area());

    let collection = b.entity_type(
        "BookmarkCollection",
        EntitySpec {
            user_name: Some("Bookmark Library"),
            user_description: Some("A collection of bookmarks."),
            ..Default::default()
        },
    )?;
    b.property_type(
        &collection,
        "Name",
        DataType::String,
        PropertySpec {
            user_name: Some("Name"),
            is_optional: true,
            ..Default::default()
        },
    )?;

    let bookmark = b.entity_type(
        "Bookmark",
        EntitySpec {
            user_name: Some("Bookmark"),
            user_description: Some("A named pointer to a web resource."),
            ..Default::default()
        },
    )?;
    b.property_type(
        &bookmark,
        "Name",
        DataType::String,
        PropertySpec {
            user_name: Some("Name"),
            is_optional: true,
            ..Default::default()
        },
    )?;
    b.property_type(
        &bookmark,
        "TimeLastVisited",
        DataType::TimeStamp,
        PropertySpec {
            user_name: Some("last visited"),
            is_optional: true,
            ..Default::default()
        },
    )?;

    b.relationship_type(
        "BookmarkCollection_Collects_Bookmark",
        RoleSpec {
            multiplicity: MultiplicityValue::ZERO_TO_N,
            entity_type: Some(&collection),
        },
        RoleSpec {
            multiplicity: MultiplicityValue::ZERO_TO_N,
            entity_type: Some(&bookmark),
        },
        RelationshipSpec {
            user_name: Some("collects"),
            ..Default::default()
        },
    )?;

    let resource = EntityTypeRef::external(web::web_resource());
    b.relationship_type(
        "Bookmark_Bookmarks_WebResource",
        RoleSpec {
            multiplicity: MultiplicityValue::ZERO_TO_N,
            entity_type: Some(&bookmark),
        },
        RoleSpec {
            multiplicity: MultiplicityValue::ONE_TO_ONE,
            entity_type: Some(&resource),
        },
        RelationshipSpec {
            user_name: Some("bookmarks"),
            ..Default::default()
        },
    )?;

    b.register(registry)
}

/// Typed view over a mesh object blessed as `BookmarkCollection`.
pub struct BookmarkCollection<'a> {
    base: &'a mut MeshBase,
    id: ObjId,
}

impl<'a> BookmarkCollection<'a> {
    pub fn wrap(base: &'a mut MeshBase, id: ObjId) -> Result<Self, FacadeError> {
        require_blessed(base, id, &bookmark_collection())?;
        Ok(Self { base, id })
    }

    pub fn id(&self) -> ObjId {
        self.id
    }

    pub fn name(&self) -> Result<Option<String>, FacadeError> {
        let property = bookmark_collection_name();
        expect_string(&property, self.base.get_property(self.id, &property)?)
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), FacadeError> {
        self.base.set_property(
            self.id,
            &bookmark_collection_name(),
            PropertyValue::String(name.into()),
        )?;
        Ok(())
    }

    /// Bookmarks this collection collects.
    pub fn bookmarks(&self) -> Result<Vec<ObjId>, FacadeError> {
        Ok(self.base.traverse(self.id, &collects_source_role())?)
    }

    /// Relate and role-bless a bookmark into this collection.
    pub fn collect(&mut self, bookmark: ObjId) -> Result<(), FacadeError> {
        self.base.relate(self.id, bookmark)?;
        self.base
            .bless_relationship(self.id, &[collects_source_role()], bookmark)?;
        Ok(())
    }
}

/// Typed view over a mesh object blessed as `Bookmark`.
pub struct Bookmark<'a> {
    base: &'a mut MeshBase,
    id: ObjId,
}

impl<'a> Bookmark<'a> {
    pub fn wrap(base: &'a mut MeshBase, id: ObjId) -> Result<Self, FacadeError> {
        require_blessed(base, id, &bookmark())?;
        Ok(Self { base, id })
    }

    pub fn id(&self) -> ObjId {
        self.id
    }

    pub fn name(&self) -> Result<Option<String>, FacadeError> {
        let property = bookmark_name();
        expect_string(&property, self.base.get_property(self.id, &property)?)
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), FacadeError> {
        tracing::trace!(object = %self.id, name, "Bookmark::set_name");
        self.base
            .set_property(self.id, &bookmark_name(), PropertyValue::String(name.into()))?;
        Ok(())
    }

    pub fn time_last_visited(&self) -> Result<Option<TimeStampValue>, FacadeError> {
        let property = bookmark_time_last_visited();
        expect_timestamp(&property, self.base.get_property(self.id, &property)?)
    }

    pub fn set_time_last_visited(&mut self, time: TimeStampValue) -> Result<(), FacadeError> {
        self.base.set_property(
            self.id,
            &bookmark_time_last_visited(),
            PropertyValue::TimeStamp(time),
        )?;
        Ok(())
    }

    /// The web resource this bookmark points at, if wired up.
    pub fn resource(&self) -> Result<Option<ObjId>, FacadeError> {
        Ok(self
            .base
            .traverse(self.id, &bookmarks_resource_source_role())?
            .into_iter()
            .next())
    }

    /// Relate and role-bless this bookmark onto a web resource.
    pub fn set_resource(&mut self, resource: ObjId) -> Result<(), FacadeError> {
        self.base.relate(self.id, resource)?;
        self.base
            .bless_relationship(self.id, &[bookmarks_resource_source_role()], resource)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::{self, WebResource};
    use meshweave_mesh::{MeshBase, MeshBaseIdentifier, MeshObjectIdentifier};
    use meshweave_model::ModelRegistry;
    use std::sync::Arc;

    fn test_base() -> MeshBase {
        let mut registry = ModelRegistry::new();
        crate::register_builtin_model(&mut registry).expect("model");
        let identifier =
            MeshBaseIdentifier::parse("https://bookmarks.example.org/").expect("url");
        MeshBase::new(identifier, Arc::new(registry))
    }

    #[test]
    fn facade_accessors_delegate_to_the_property_bag() {
        let mut base = test_base();
        let base_id = base.identifier().clone();
        let collection_id = base
            .create_object(
                MeshObjectIdentifier::new(base_id.clone(), "mine"),
                &[bookmark_collection()],
            )
            .expect("collection");
        let bookmark_id = base
            .create_object(
                MeshObjectIdentifier::new(base_id.clone(), "bm-1"),
                &[bookmark()],
            )
            .expect("bookmark");
        let resource_id = base
            .create_object(
                MeshObjectIdentifier::new(base_id, "res-1"),
                &[web::web_resource()],
            )
            .expect("resource");

        {
            let mut resource = WebResource::wrap(&mut base, resource_id).expect("wrap");
            resource.set_url("https://example.org/").expect("set url");
        }
        {
            let mut facade = Bookmark::wrap(&mut base, bookmark_id).expect("wrap");
            facade.set_name("Example").expect("set name");
            facade.set_resource(resource_id).expect("set resource");
            assert_eq!(facade.name().expect("name").as_deref(), Some("Example"));
            assert_eq!(facade.resource().expect("resource"), Some(resource_id));
            assert_eq!(facade.time_last_visited().expect("time"), None);
        }
        {
            let mut facade = BookmarkCollection::wrap(&mut base, collection_id).expect("wrap");
            facade.set_name("My Bookmarks").expect("set name");
            facade.collect(bookmark_id).expect("collect");
            assert_eq!(facade.bookmarks().expect("bookmarks"), vec![bookmark_id]);
        }

        // Raw property-bag view agrees with the facade.
        assert_eq!(
            base.get_property(bookmark_id, &bookmark_name()).expect("get"),
            Some(PropertyValue::String("Example".into()))
        );
    }

    #[test]
    fn wrap_rejects_unblessed_objects() {
        let mut base = test_base();
        let base_id = base.identifier().clone();
        let plain = base
            .create_object(MeshObjectIdentifier::new(base_id, "plain"), &[])
            .expect("object");
        assert!(matches!(
            Bookmark::wrap(&mut base, plain),
            Err(FacadeError::NotBlessedBy { .. })
        ));
    }
}
