//! The Feeds subject area: syndication feeds and their items.

use crate::facade::{expect_blob, expect_string, require_blessed, FacadeError};
use meshweave_mesh::{MeshBase, ObjId};
use meshweave_model::{
    BlobValue, DataType, EntitySpec, MeshTypeIdentifier, ModelError, ModelRegistry,
    MultiplicityValue, PropertySpec, PropertyValue, RelationshipSpec, RoleSpec,
    SubjectAreaBuilder,
};

pub const SUBJECT_AREA: &str = "feeds.meshweave.example";

pub fn subject_area() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(SUBJECT_AREA)
}

pub fn feed() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/Feed"))
}

pub fn feed_item() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/FeedItem"))
}

pub fn feed_title() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/Feed_Title"))
}

pub fn feed_description() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/Feed_Description"))
}

pub fn feed_item_title() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/FeedItem_Title"))
}

pub fn feed_item_content() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/FeedItem_Content"))
}

/// Role the feed plays in `Feed_Contains_FeedItem`.
pub fn contains_source_role() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/Feed_Contains_FeedItem-S"))
}

pub fn contains_destination_role() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{SUBJECT_AREA}/Feed_Contains_FeedItem-D"))
}

pub fn register(registry: &mut ModelRegistry) -> Result<(), ModelError> {
    let mut b = SubjectAreaBuilder::new(SUBJECT_AREA, "Feeds")?;
    b.version("1")
        .user_name("Feeds Subject Area")
        .user_description("Syndication feeds and their items.");

    let feed = b.entity_type(
        "Feed",
        EntitySpec {
            user_name: Some("Feed"),
            ..Default::default()
        },
    )?;
    b.property_type(
        &feed,
        "Title",
        DataType::String,
        PropertySpec {
            user_name: Some("Title"),
            is_optional: true,
            ..Default::default()
        },
    )?;
    b.property_type(
        &feed,
        "Description",
        DataType::ANY_BLOB,
        PropertySpec {
            user_name: Some("Description"),
            is_optional: true,
            ..Default::default()
        },
    )?;

    let item = b.entity_type(
        "FeedItem",
        EntitySpec {
            user_name: Some("Feed Item"),
            ..Default::default()
        },
    )?;
    b.property_type(
        &item,
        "Title",
        DataType::String,
        PropertySpec {
            user_name: Some("Title"),
            is_optional: true,
            ..Default::default()
        },
    )?;
    b.property_type(
        &item,
        "Content",
        DataType::ANY_BLOB,
        PropertySpec {
            user_name: Some("Content"),
            is_optional: true,
            ..Default::default()
        },
    )?;

    b.relationship_type(
        "Feed_Contains_FeedItem",
        RoleSpec {
            multiplicity: MultiplicityValue::ONE_TO_ONE,
            entity_type: Some(&feed),
        },
        RoleSpec {
            multiplicity: MultiplicityValue::ZERO_TO_N,
            entity_type: Some(&item),
        },
        RelationshipSpec {
            user_name: Some("contains"),
            ..Default::default()
        },
    )?;

    b.register(registry)
}

/// Typed view over a mesh object blessed as `Feed`.
pub struct Feed<'a> {
    base: &'a mut MeshBase,
    id: ObjId,
}

impl<'a> Feed<'a> {
    pub fn wrap(base: &'a mut MeshBase, id: ObjId) -> Result<Self, FacadeError> {
        require_blessed(base, id, &feed())?;
        Ok(Self { base, id })
    }

    pub fn id(&self) -> ObjId {
        self.id
    }

    pub fn title(&self) -> Result<Option<String>, FacadeError> {
        let property = feed_title();
        expect_string(&property, self.base.get_property(self.id, &property)?)
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), FacadeError> {
        tracing::trace!(object = %self.id, title, "Feed::set_title");
        self.base
            .set_property(self.id, &feed_title(), PropertyValue::String(title.into()))?;
        Ok(())
    }

    pub fn description(&self) -> Result<Option<BlobValue>, FacadeError> {
        let property = feed_description();
        expect_blob(&property, self.base.get_property(self.id, &property)?)
    }

    pub fn set_description(&mut self, description: BlobValue) -> Result<(), FacadeError> {
        self.base
            .set_property(self.id, &feed_description(), PropertyValue::Blob(description))?;
        Ok(())
    }

    pub fn items(&self) -> Result<Vec<ObjId>, FacadeError> {
        Ok(self.base.traverse(self.id, &contains_source_role())?)
    }

    /// Relate and role-bless an item into this feed.
    pub fn add_item(&mut self, item: ObjId) -> Result<(), FacadeError> {
        self.base.relate(self.id, item)?;
        self.base
            .bless_relationship(self.id, &[contains_source_role()], item)?;
        Ok(())
    }
}

/// Typed view over a mesh object blessed as `FeedItem`.
pub struct FeedItem<'a> {
    base: &'a mut MeshBase,
    id: ObjId,
}

impl<'a> FeedItem<'a> {
    pub fn wrap(base: &'a mut MeshBase, id: ObjId) -> Result<Self, FacadeError> {
        require_blessed(base, id, &feed_item())?;
        Ok(Self { base, id })
    }

    pub fn id(&self) -> ObjId {
        self.id
    }

    pub fn title(&self) -> Result<Option<String>, FacadeError> {
        let property = feed_item_title();
        expect_string(&property, self.base.get_property(self.id, &property)?)
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), FacadeError> {
        self.base
            .set_property(self.id, &feed_item_title(), PropertyValue::String(title.into()))?;
        Ok(())
    }

    pub fn content(&self) -> Result<Option<BlobValue>, FacadeError> {
        let property = feed_item_content();
        expect_blob(&property, self.base.get_property(self.id, &property)?)
    }

    pub fn set_content(&mut self, content: BlobValue) -> Result<(), FacadeError> {
        self.base
            .set_property(self.id, &feed_item_content(), PropertyValue::Blob(content))?;
        Ok(())
    }

    /// The feed containing this item, if wired up.
    pub fn feed(&self) -> Result<Option<ObjId>, FacadeError> {
        Ok(self
            .base
            .traverse(self.id, &contains_destination_role())?
            .into_iter()
            .next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshweave_mesh::{MeshBase, MeshBaseIdentifier, MeshObjectIdentifier};
    use meshweave_model::ModelRegistry;
    use std::sync::Arc;

    #[test]
    fn feed_items_traverse_both_directions() {
        let mut registry = ModelRegistry::new();
        crate::register_builtin_model(&mut registry).expect("model");
        let identifier = MeshBaseIdentifier::parse("https://feeds.example.org/").expect("url");
        let mut base = MeshBase::new(identifier.clone(), Arc::new(registry));

        let feed_id = base
            .create_object(MeshObjectIdentifier::new(identifier.clone(), "feed"), &[feed()])
            .expect("feed");
        let item_id = base
            .create_object(
                MeshObjectIdentifier::new(identifier, "item-1"),
                &[feed_item()],
            )
            .expect("item");

        {
            let mut facade = Feed::wrap(&mut base, feed_id).expect("wrap");
            facade.set_title("News").expect("title");
            facade
                .set_description(BlobValue::text("text/plain", "All the news."))
                .expect("description");
            facade.add_item(item_id).expect("add item");
            assert_eq!(facade.items().expect("items"), vec![item_id]);
        }
        {
            let facade = FeedItem::wrap(&mut base, item_id).expect("wrap");
            assert_eq!(facade.feed().expect("feed"), Some(feed_id));
        }
    }
}
