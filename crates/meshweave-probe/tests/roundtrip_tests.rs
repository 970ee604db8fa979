//! Export → import round trip over the built-in library model.

use meshweave_library::{bookmark, feeds, register_builtin_model, web};
use meshweave_mesh::{MeshBase, MeshBaseIdentifier, MeshObjectIdentifier};
use meshweave_model::{BlobValue, ModelRegistry, PropertyValue, TimeStampValue};
use meshweave_probe::{write_mesh_object_set, MeshObjectSetProbe, Probe};
use std::sync::Arc;

fn library_model() -> Arc<ModelRegistry> {
    let mut registry = ModelRegistry::new();
    register_builtin_model(&mut registry).expect("model");
    Arc::new(registry)
}

#[test]
fn exported_base_reimports_isomorphically() {
    let model = library_model();
    let source = MeshBaseIdentifier::parse("https://bookmarks.example.org/all").expect("url");
    let mut base = MeshBase::new(source.clone(), model.clone());

    let collection = base
        .create_object(
            MeshObjectIdentifier::new(source.clone(), "mine"),
            &[bookmark::bookmark_collection()],
        )
        .expect("collection");
    let bm = base
        .create_object(
            MeshObjectIdentifier::new(source.clone(), "bm-1"),
            &[bookmark::bookmark()],
        )
        .expect("bookmark");
    let resource = base
        .create_object(
            MeshObjectIdentifier::new(source.clone(), "res-1"),
            &[web::web_resource()],
        )
        .expect("resource");
    let feed = base
        .create_object(
            MeshObjectIdentifier::new(source.clone(), "feed"),
            &[feeds::feed()],
        )
        .expect("feed");

    base.set_property(
        collection,
        &bookmark::bookmark_collection_name(),
        PropertyValue::String("My Bookmarks".into()),
    )
    .expect("name");
    base.set_property(
        bm,
        &bookmark::bookmark_time_last_visited(),
        PropertyValue::TimeStamp(
            TimeStampValue::from_rfc3339("2024-05-05T08:15:00Z").expect("timestamp"),
        ),
    )
    .expect("visited");
    base.set_property(
        resource,
        &web::web_resource_url(),
        PropertyValue::String("https://example.org/".into()),
    )
    .expect("url");
    base.set_property(
        feed,
        &feeds::feed_description(),
        PropertyValue::Blob(BlobValue::text("text/html", "<p>Hello &amp; welcome</p>")),
    )
    .expect("description");

    base.relate(collection, bm).expect("relate");
    base.bless_relationship(collection, &[bookmark::collects_source_role()], bm)
        .expect("bless");
    base.relate(bm, resource).expect("relate");
    base.bless_relationship(bm, &[bookmark::bookmarks_resource_source_role()], resource)
        .expect("bless");

    let document = write_mesh_object_set(&base).expect("export");

    let mut reimported = MeshBase::staging(&source, model);
    MeshObjectSetProbe::new()
        .parse_document(&source, &document, &mut reimported)
        .expect("reimport");

    // The externalized views must agree exactly: identifiers, types,
    // properties, role-blessed relationships and audit times.
    let before = serde_json::to_value(base.externalize()).expect("json");
    let after = serde_json::to_value(reimported.externalize()).expect("json");
    assert_eq!(before, after);
}
