//! Snapshot round-trip tests.

use meshweave_mesh::{
    load_snapshot, save_snapshot, MeshBase, MeshBaseIdentifier, MeshObjectIdentifier,
    SnapshotError,
};
use meshweave_model::{
    DataType, EntitySpec, MeshTypeIdentifier, ModelRegistry, PropertySpec, PropertyValue,
    SubjectAreaBuilder,
};
use std::sync::Arc;
use tempfile::tempdir;

fn test_model() -> Arc<ModelRegistry> {
    let mut registry = ModelRegistry::new();
    let mut b = SubjectAreaBuilder::new("notes.test.example", "Notes").expect("builder");
    let note = b.entity_type("Note", EntitySpec::default()).expect("Note");
    b.property_type(&note, "Text", DataType::String, PropertySpec::default())
        .expect("Text");
    b.register(&mut registry).expect("register");
    Arc::new(registry)
}

fn note_type() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new("notes.test.example/Note")
}

fn text_property() -> MeshTypeIdentifier {
    MeshTypeIdentifier::new("notes.test.example/Note_Text")
}

#[test]
fn snapshot_round_trips_objects_and_relationships() {
    let model = test_model();
    let identifier = MeshBaseIdentifier::parse("https://notes.example.org/").expect("url");
    let mut base = MeshBase::new(identifier.clone(), model.clone());

    let a = base
        .create_object(
            MeshObjectIdentifier::new(identifier.clone(), "a"),
            &[note_type()],
        )
        .expect("a");
    let b = base
        .create_object(
            MeshObjectIdentifier::new(identifier.clone(), "b"),
            &[note_type()],
        )
        .expect("b");
    base.set_property(a, &text_property(), PropertyValue::String("first".into()))
        .expect("set");
    base.relate(a, b).expect("relate");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("notes.mwsnap");
    save_snapshot(&base, &path).expect("save");

    let restored = load_snapshot(&path, model).expect("load");
    assert_eq!(restored.identifier(), &identifier);
    assert_eq!(restored.len(), base.len());

    let restored_a = restored
        .find_by_identifier(&MeshObjectIdentifier::new(identifier.clone(), "a"))
        .expect("a restored");
    assert_eq!(
        restored_a.stored_property(&text_property()),
        Some(&PropertyValue::String("first".into()))
    );
    assert!(restored_a.is_related_to(b));
    assert_eq!(restored.objects_with_type(&note_type()).len(), 2);
}

#[test]
fn snapshot_rejects_foreign_and_corrupted_files() {
    let model = test_model();
    let dir = tempdir().expect("tempdir");

    let foreign = dir.path().join("foreign.bin");
    std::fs::write(&foreign, b"definitely not a snapshot").expect("write");
    assert!(matches!(
        load_snapshot(&foreign, model.clone()),
        Err(SnapshotError::BadMagic)
    ));

    let identifier = MeshBaseIdentifier::parse("https://notes.example.org/").expect("url");
    let base = MeshBase::new(identifier, model.clone());
    let path = dir.path().join("notes.mwsnap");
    save_snapshot(&base, &path).expect("save");

    // Flip one payload byte.
    let mut bytes = std::fs::read(&path).expect("read");
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    std::fs::write(&path, &bytes).expect("rewrite");
    assert!(matches!(
        load_snapshot(&path, model),
        Err(SnapshotError::ChecksumMismatch)
    ));
}
