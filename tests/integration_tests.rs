//! Integration tests for the complete Meshweave pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - model registration → XML probe → mesh base
//! - typed facades over probed objects
//! - snapshot persistence of probed bases
//!
//! Run with: cargo test --test integration_tests

use meshweave_library::bookmark::{Bookmark, BookmarkCollection};
use meshweave_library::{bookmark, register_builtin_model, web};
use meshweave_mesh::{load_snapshot, save_snapshot, MeshBase, MeshBaseIdentifier};
use meshweave_model::ModelRegistry;
use meshweave_probe::{document_root_tag, Probe, ProbeDirectory};
use std::sync::Arc;
use tempfile::tempdir;

const DOCUMENT: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<MeshObjectSet>
  <MeshObject ID="#mine" timeCreated="2024-05-01 09:00:00.000">
    <type>bookmark.meshweave.example/BookmarkCollection</type>
    <property type="bookmark.meshweave.example/BookmarkCollection_Name">
      <string>My Bookmarks</string>
    </property>
    <relationship ID="#bm-1">
      <role type="bookmark.meshweave.example/BookmarkCollection_Collects_Bookmark-S"/>
    </relationship>
  </MeshObject>
  <MeshObject ID="#bm-1">
    <type>bookmark.meshweave.example/Bookmark</type>
    <property type="bookmark.meshweave.example/Bookmark_Name">
      <string>Example</string>
    </property>
    <relationship ID="#mine">
      <role type="bookmark.meshweave.example/BookmarkCollection_Collects_Bookmark-D"/>
    </relationship>
    <relationship ID="#res-1">
      <role type="bookmark.meshweave.example/Bookmark_Bookmarks_WebResource-S"/>
    </relationship>
  </MeshObject>
  <MeshObject ID="#res-1">
    <type>web.meshweave.example/WebResource</type>
    <property type="web.meshweave.example/WebResource_Url">
      <string>https://example.org/</string>
    </property>
    <relationship ID="#bm-1">
      <role type="bookmark.meshweave.example/Bookmark_Bookmarks_WebResource-D"/>
    </relationship>
  </MeshObject>
</MeshObjectSet>"##;

fn import_document(document: &str) -> (MeshBase, Arc<ModelRegistry>) {
    let mut registry = ModelRegistry::new();
    register_builtin_model(&mut registry).expect("register built-in model");
    let model = Arc::new(registry);

    let directory = ProbeDirectory::with_defaults();
    let root = document_root_tag(document).expect("root tag");
    let probe = directory.probe_for_root_tag(&root).expect("probe");

    let source = MeshBaseIdentifier::parse("https://bookmarks.example.org/all").expect("url");
    let mut staging = MeshBase::staging(&source, model.clone());
    probe
        .parse_document(&source, document, &mut staging)
        .expect("probe run");
    (staging, model)
}

#[test]
fn probe_builds_a_typed_graph_the_facades_can_read() {
    let (mut base, _model) = import_document(DOCUMENT);

    // Home object plus three imported objects.
    assert_eq!(base.len(), 4);
    assert_eq!(
        base.objects_with_type(&bookmark::bookmark_collection()).len(),
        1
    );

    let collection_id = base.objects_with_type(&bookmark::bookmark_collection())[0];
    let bookmark_ids = {
        let collection = BookmarkCollection::wrap(&mut base, collection_id).expect("facade");
        assert_eq!(collection.name().expect("name").as_deref(), Some("My Bookmarks"));
        collection.bookmarks().expect("bookmarks")
    };
    assert_eq!(bookmark_ids.len(), 1);

    let resource_id = {
        let facade = Bookmark::wrap(&mut base, bookmark_ids[0]).expect("facade");
        assert_eq!(facade.name().expect("name").as_deref(), Some("Example"));
        facade.resource().expect("resource").expect("resource wired")
    };
    let resource = base.object(resource_id).expect("resource object");
    assert!(resource.is_blessed_with(&web::web_resource()));
}

#[test]
fn probed_bases_survive_snapshots() {
    let (base, model) = import_document(DOCUMENT);

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("bookmarks.mwsnap");
    save_snapshot(&base, &path).expect("save");

    let mut restored = load_snapshot(&path, model).expect("load");
    assert_eq!(restored.len(), base.len());

    let collection_id = restored.objects_with_type(&bookmark::bookmark_collection())[0];
    let collection = BookmarkCollection::wrap(&mut restored, collection_id).expect("facade");
    assert_eq!(collection.name().expect("name").as_deref(), Some("My Bookmarks"));
    assert_eq!(collection.bookmarks().expect("bookmarks").len(), 1);
}
