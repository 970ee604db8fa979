//! XML mesh-object-set probe tests: two-pass ingestion semantics.

use meshweave_mesh::{MeshBase, MeshBaseIdentifier, MeshObjectIdentifier};
use meshweave_model::{
    BlobValue, ColorValue, CurrencyValue, DataType, EntitySpec, EnumValue, EnumeratedDomain,
    EnumeratedValue, ExtentValue, MeshTypeIdentifier, ModelRegistry, MultiplicityValue,
    PointValue, PropertySpec, PropertyValue, RelationshipSpec, RoleSpec, SubjectAreaBuilder,
    TimePeriodValue, TimeStampValue,
};
use meshweave_probe::time::parse_audit_time;
use meshweave_probe::{MeshObjectSetProbe, Probe, ProbeError};
use std::sync::Arc;

const AREA: &str = "catalog.test.example";

fn t(name: &str) -> MeshTypeIdentifier {
    MeshTypeIdentifier::new(format!("{AREA}/{name}"))
}

fn catalog_model() -> Arc<ModelRegistry> {
    let mut registry = ModelRegistry::new();
    let mut b = SubjectAreaBuilder::new(AREA, "Catalog").expect("builder");

    let item = b.entity_type("Item", EntitySpec::default()).expect("Item");
    let string_property = |b: &mut SubjectAreaBuilder, owner, name| {
        b.property_type(owner, name, DataType::String, PropertySpec::default())
            .expect("property");
    };
    string_property(&mut b, &item, "Name");
    b.property_type(&item, "InStock", DataType::Boolean, PropertySpec::default())
        .expect("InStock");
    b.property_type(&item, "Tint", DataType::Color, PropertySpec::default())
        .expect("Tint");
    b.property_type(&item, "Price", DataType::Currency, PropertySpec::default())
        .expect("Price");
    b.property_type(
        &item,
        "Grade",
        DataType::Enumerated(
            EnumeratedDomain::new(vec![
                EnumValue::new("a"),
                EnumValue::new("b"),
                EnumValue::new("c"),
            ])
            .expect("domain"),
        ),
        PropertySpec::default(),
    )
    .expect("Grade");
    b.property_type(&item, "Footprint", DataType::Extent, PropertySpec::default())
        .expect("Footprint");
    b.property_type(&item, "Weight", DataType::ANY_FLOAT, PropertySpec::default())
        .expect("Weight");
    b.property_type(
        &item,
        "Count",
        DataType::Integer {
            min: Some(0),
            max: Some(1000),
        },
        PropertySpec::default(),
    )
    .expect("Count");
    b.property_type(&item, "Slots", DataType::Multiplicity, PropertySpec::default())
        .expect("Slots");
    b.property_type(&item, "Origin", DataType::Point, PropertySpec::default())
        .expect("Origin");
    b.property_type(&item, "Notes", DataType::ANY_BLOB, PropertySpec::default())
        .expect("Notes");
    b.property_type(&item, "Warranty", DataType::TimePeriod, PropertySpec::default())
        .expect("Warranty");
    b.property_type(&item, "FirstSeen", DataType::TimeStamp, PropertySpec::default())
        .expect("FirstSeen");

    let shelf = b.entity_type("Shelf", EntitySpec::default()).expect("Shelf");
    b.entity_type(
        "Phantom",
        EntitySpec {
            is_abstract: true,
            ..Default::default()
        },
    )
    .expect("Phantom");
    let tag = b.entity_type("Tag", EntitySpec::default()).expect("Tag");
    string_property(&mut b, &tag, "Label");

    b.relationship_type(
        "Shelf_Holds_Item",
        RoleSpec {
            multiplicity: MultiplicityValue::ZERO_TO_N,
            entity_type: Some(&shelf),
        },
        RoleSpec {
            multiplicity: MultiplicityValue::ZERO_TO_N,
            entity_type: Some(&item),
        },
        RelationshipSpec::default(),
    )
    .expect("relationship");

    b.register(&mut registry).expect("register");
    Arc::new(registry)
}

fn data_source() -> MeshBaseIdentifier {
    MeshBaseIdentifier::parse("https://catalog.example.org/data").expect("url")
}

fn import(document: &str) -> Result<MeshBase, ProbeError> {
    let source = data_source();
    let mut staging = MeshBase::staging(&source, catalog_model());
    MeshObjectSetProbe::new().parse_document(&source, document, &mut staging)?;
    Ok(staging)
}

fn local(name: &str) -> MeshObjectIdentifier {
    MeshObjectIdentifier::new(data_source(), name)
}

#[test]
fn parses_every_property_value_kind() {
    let base = import(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<MeshObjectSet>
  <MeshObject ID="#item-1" timeCreated="2024-03-01 12:00:00.000">
    <type>catalog.test.example/Item</type>
    <property type="catalog.test.example/Item_Name"><string>Widget</string></property>
    <property type="catalog.test.example/Item_InStock"><boolean>true</boolean></property>
    <property type="catalog.test.example/Item_Tint"><color red="0.5" green="0.25" blue="1" alpha="1"/></property>
    <property type="catalog.test.example/Item_Price"><currency>USD 19.99</currency></property>
    <property type="catalog.test.example/Item_Grade"><enum>b</enum></property>
    <property type="catalog.test.example/Item_Footprint"><extent width="2.5" height="4"/></property>
    <property type="catalog.test.example/Item_Weight"><float>1.25</float></property>
    <property type="catalog.test.example/Item_Count"><integer>42</integer></property>
    <property type="catalog.test.example/Item_Slots"><multiplicity min="1" max="4"/></property>
    <property type="catalog.test.example/Item_Origin"><point x="1" y="-2"/></property>
    <property type="catalog.test.example/Item_Notes"><blob mime="text/plain">aGVsbG8gd29ybGQ=</blob></property>
    <property type="catalog.test.example/Item_Warranty"><timePeriod year="1" month="0" day="0" hour="0" minute="0" second="0"/></property>
    <property type="catalog.test.example/Item_FirstSeen"><timeStamp>2024-02-29T23:59:30.250Z</timeStamp></property>
  </MeshObject>
</MeshObjectSet>"##,
    )
    .expect("import");

    let item = base.find_by_identifier(&local("item-1")).expect("item");
    let get = |name: &str| item.stored_property(&t(name)).cloned().expect(name);

    assert_eq!(get("Item_Name"), PropertyValue::String("Widget".into()));
    assert_eq!(get("Item_InStock"), PropertyValue::Boolean(true));
    assert_eq!(
        get("Item_Tint"),
        PropertyValue::Color(ColorValue {
            red: 0.5,
            green: 0.25,
            blue: 1.0,
            alpha: 1.0
        })
    );
    assert_eq!(
        get("Item_Price"),
        PropertyValue::Currency(CurrencyValue::new("USD", 1999))
    );
    assert_eq!(
        get("Item_Grade"),
        PropertyValue::Enumerated(EnumeratedValue::new("b"))
    );
    assert_eq!(
        get("Item_Footprint"),
        PropertyValue::Extent(ExtentValue {
            width: 2.5,
            height: 4.0
        })
    );
    assert_eq!(get("Item_Weight"), PropertyValue::Float(1.25));
    assert_eq!(get("Item_Count"), PropertyValue::Integer(42));
    assert_eq!(
        get("Item_Slots"),
        PropertyValue::Multiplicity(MultiplicityValue::new(1, Some(4)).expect("multiplicity"))
    );
    assert_eq!(
        get("Item_Origin"),
        PropertyValue::Point(PointValue { x: 1.0, y: -2.0 })
    );
    assert_eq!(
        get("Item_Notes"),
        PropertyValue::Blob(BlobValue::text("text/plain", "hello world"))
    );
    assert_eq!(
        get("Item_Warranty"),
        PropertyValue::TimePeriod(TimePeriodValue {
            years: 1,
            months: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0.0
        })
    );
    assert_eq!(
        get("Item_FirstSeen"),
        PropertyValue::TimeStamp(
            TimeStampValue::from_rfc3339("2024-02-29T23:59:30.250Z").expect("timestamp")
        )
    );

    // Stated audit times survive the import.
    assert_eq!(
        item.time_created(),
        parse_audit_time("2024-03-01 12:00:00.000").expect("audit time")
    );
}

#[test]
fn forward_references_resolve_and_double_stated_edges_are_idempotent() {
    // shelf-1 references item-1 before it is declared; both sides state the
    // edge with their own role.
    let base = import(
        r##"<MeshObjectSet>
  <MeshObject ID="#shelf-1">
    <type>catalog.test.example/Shelf</type>
    <relationship ID="#item-1"><role type="catalog.test.example/Shelf_Holds_Item-S"/></relationship>
  </MeshObject>
  <MeshObject ID="#item-1">
    <type>catalog.test.example/Item</type>
    <relationship ID="#shelf-1"><role type="catalog.test.example/Shelf_Holds_Item-D"/></relationship>
  </MeshObject>
</MeshObjectSet>"##,
    )
    .expect("import");

    let shelf = base.find_by_identifier(&local("shelf-1")).expect("shelf");
    let item = base.find_by_identifier(&local("item-1")).expect("item");

    assert!(shelf.is_related_to(item.id()));
    assert_eq!(shelf.neighbors().count(), 1);
    assert_eq!(
        base.traverse(shelf.id(), &t("Shelf_Holds_Item-S")).expect("traverse"),
        vec![item.id()]
    );
    assert_eq!(
        base.traverse(item.id(), &t("Shelf_Holds_Item-D")).expect("traverse"),
        vec![shelf.id()]
    );
}

#[test]
fn empty_identifier_denotes_the_home_object() {
    let base = import(
        r##"<MeshObjectSet>
  <MeshObject ID="">
    <type>catalog.test.example/Item</type>
    <property type="catalog.test.example/Item_Name"><string>home</string></property>
  </MeshObject>
</MeshObjectSet>"##,
    )
    .expect("import");

    assert_eq!(base.len(), 1);
    let home = base.home_object();
    assert!(home.is_blessed_with(&t("Item")));
    assert_eq!(
        home.stored_property(&t("Item_Name")),
        Some(&PropertyValue::String("home".into()))
    );
}

#[test]
fn proxy_towards_home_creates_a_forward_reference_and_defines_a_variable() {
    let base = import(
        r##"<MeshObjectSet>
  <MeshObject ID="https://other.example.org/data#x" proxyTowardsHome="https://other.example.org/data">
    <type>catalog.test.example/Item</type>
  </MeshObject>
  <MeshObject ID="#shelf-1">
    <type>catalog.test.example/Shelf</type>
    <relationship ID="${https://other.example.org/data}#x"/>
  </MeshObject>
</MeshObjectSet>"##,
    )
    .expect("import");

    let remote = MeshObjectIdentifier::from_external_form(
        &data_source(),
        "https://other.example.org/data#x",
    )
    .expect("identifier");
    let forward = base.find_by_identifier(&remote).expect("forward reference");
    assert_eq!(
        forward.proxy_towards_home().map(|p| p.external_form()),
        Some("https://other.example.org/data")
    );

    let shelf = base.find_by_identifier(&local("shelf-1")).expect("shelf");
    assert!(shelf.is_related_to(forward.id()));
}

#[test]
fn unresolvable_variables_fail_the_import() {
    let err = import(
        r##"<MeshObjectSet>
  <MeshObject ID="#a">
    <type>catalog.test.example/Item</type>
    <relationship ID="${NOWHERE}#x"/>
  </MeshObject>
</MeshObjectSet>"##,
    )
    .expect_err("unresolved variable");
    assert!(matches!(err, ProbeError::UnresolvedVariable { .. }));
}

#[test]
fn abstract_objects_are_skipped_but_the_import_continues() {
    let base = import(
        r##"<MeshObjectSet>
  <MeshObject ID="#ghost"><type>catalog.test.example/Phantom</type></MeshObject>
  <MeshObject ID="#item-1"><type>catalog.test.example/Item</type></MeshObject>
</MeshObjectSet>"##,
    )
    .expect("import");

    assert!(base.find_by_identifier(&local("ghost")).is_none());
    assert!(base.find_by_identifier(&local("item-1")).is_some());
}

#[test]
fn undeclared_properties_are_logged_and_skipped() {
    // Tag_Label exists in the model but Item does not carry it.
    let base = import(
        r##"<MeshObjectSet>
  <MeshObject ID="#item-1">
    <type>catalog.test.example/Item</type>
    <property type="catalog.test.example/Tag_Label"><string>misplaced</string></property>
    <property type="catalog.test.example/Item_Name"><string>kept</string></property>
  </MeshObject>
</MeshObjectSet>"##,
    )
    .expect("import");

    let item = base.find_by_identifier(&local("item-1")).expect("item");
    assert_eq!(item.stored_property(&t("Tag_Label")), None);
    assert_eq!(
        item.stored_property(&t("Item_Name")),
        Some(&PropertyValue::String("kept".into()))
    );
}

#[test]
fn structural_problems_are_fatal() {
    // Not a mesh-object-set document at all.
    assert!(matches!(
        import("<SomethingElse/>"),
        Err(ProbeError::EmptyDataSource { .. })
    ));

    // Unknown element inside a mesh object.
    assert!(matches!(
        import(
            r##"<MeshObjectSet><MeshObject ID="#a"><surprise/></MeshObject></MeshObjectSet>"##
        ),
        Err(ProbeError::Syntax { .. })
    ));

    // Duplicate identifiers.
    assert!(matches!(
        import(
            r##"<MeshObjectSet>
  <MeshObject ID="#a"><type>catalog.test.example/Item</type></MeshObject>
  <MeshObject ID="#a"><type>catalog.test.example/Item</type></MeshObject>
</MeshObjectSet>"##
        ),
        Err(ProbeError::Syntax { .. })
    ));

    // Unknown entity type.
    assert!(matches!(
        import(
            r##"<MeshObjectSet><MeshObject ID="#a"><type>nowhere/Nothing</type></MeshObject></MeshObjectSet>"##
        ),
        Err(ProbeError::Syntax { .. })
    ));

    // Unknown enumerated key.
    assert!(matches!(
        import(
            r##"<MeshObjectSet>
  <MeshObject ID="#a">
    <type>catalog.test.example/Item</type>
    <property type="catalog.test.example/Item_Grade"><enum>z</enum></property>
  </MeshObject>
</MeshObjectSet>"##
        ),
        Err(ProbeError::Syntax { .. })
    ));

    // Blob without a mime type.
    assert!(matches!(
        import(
            r##"<MeshObjectSet>
  <MeshObject ID="#a">
    <type>catalog.test.example/Item</type>
    <property type="catalog.test.example/Item_Notes"><blob>aGk=</blob></property>
  </MeshObject>
</MeshObjectSet>"##
        ),
        Err(ProbeError::Syntax { .. })
    ));

    // Relationship to an object that never materializes.
    assert!(matches!(
        import(
            r##"<MeshObjectSet>
  <MeshObject ID="#a">
    <type>catalog.test.example/Item</type>
    <relationship ID="#missing"/>
  </MeshObject>
</MeshObjectSet>"##
        ),
        Err(ProbeError::Syntax { .. })
    ));
}

#[test]
fn role_requirements_are_logged_not_fatal() {
    // Both sides are Items; the source role requires a Shelf. The edge
    // itself survives, the blessing is skipped.
    let base = import(
        r##"<MeshObjectSet>
  <MeshObject ID="#a">
    <type>catalog.test.example/Item</type>
    <relationship ID="#b"><role type="catalog.test.example/Shelf_Holds_Item-S"/></relationship>
  </MeshObject>
  <MeshObject ID="#b"><type>catalog.test.example/Item</type></MeshObject>
</MeshObjectSet>"##,
    )
    .expect("import");

    let a = base.find_by_identifier(&local("a")).expect("a");
    let b = base.find_by_identifier(&local("b")).expect("b");
    assert!(a.is_related_to(b.id()));
    assert!(base
        .traverse(a.id(), &t("Shelf_Holds_Item-S"))
        .expect("traverse")
        .is_empty());
}
