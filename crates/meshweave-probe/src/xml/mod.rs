//! The XML mesh-object-set probe.
//!
//! Ingestion runs in three phases:
//!
//! 1. **Buffer**: stream the document once and build one
//!    [`ExternalizedMeshObject`] per `<MeshObject>` element. Nothing touches
//!    the graph yet, so objects may reference each other in any order.
//! 2. **Instantiate**: create (or, for the home object, bless) every
//!    buffered object and assign its properties.
//! 3. **Relate**: wire up and role-bless the buffered relationships.
//!    Documents state both directions of every edge, so "already related" /
//!    "role already present" are expected on the second side and ignored.

pub mod values;
pub mod writer;

pub use writer::write_mesh_object_set;

use crate::error::ProbeError;
use crate::time::parse_audit_time;
use crate::Probe;
use meshweave_mesh::{
    AuditTimes, ExternalizedMeshObject, ExternalizedRelationship, MeshBase, MeshBaseIdentifier,
    MeshError, MeshObjectIdentifier,
};
use meshweave_model::{MeshTypeIdentifier, ModelRegistry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::error;

/// XML vocabulary of the mesh-object-set format.
pub mod tags {
    pub const MESH_OBJECT_SET_TAG: &str = "MeshObjectSet";
    pub const MESH_OBJECT_TAG: &str = "MeshObject";

    pub const IDENTIFIER_ATTR: &str = "ID";
    pub const TIME_CREATED_ATTR: &str = "timeCreated";
    pub const TIME_UPDATED_ATTR: &str = "timeUpdated";
    pub const TIME_READ_ATTR: &str = "timeRead";
    pub const TIME_EXPIRES_ATTR: &str = "timeExpires";
    pub const GIVE_UP_LOCK_ATTR: &str = "giveUpLock";
    pub const GIVE_UP_HOME_ATTR: &str = "giveUpHome";
    pub const PROXY_TOWARDS_HOME_ATTR: &str = "proxyTowardsHome";
    pub const YES_VALUE: &str = "yes";

    pub const TYPE_TAG: &str = "type";
    pub const PROPERTY_TAG: &str = "property";
    pub const PROPERTY_TYPE_ATTR: &str = "type";
    pub const RELATIONSHIP_TAG: &str = "relationship";
    pub const ROLE_TAG: &str = "role";
    pub const ROLE_TYPE_ATTR: &str = "type";

    pub const BLOB_TAG: &str = "blob";
    pub const BLOB_MIME_ATTR: &str = "mime";
    pub const BLOB_LOAD_FROM_ATTR: &str = "loadFrom";
    pub const BOOLEAN_TAG: &str = "boolean";
    pub const BOOLEAN_TRUE: &str = "true";
    pub const BOOLEAN_FALSE: &str = "false";
    pub const COLOR_TAG: &str = "color";
    pub const COLOR_RED_ATTR: &str = "red";
    pub const COLOR_GREEN_ATTR: &str = "green";
    pub const COLOR_BLUE_ATTR: &str = "blue";
    pub const COLOR_ALPHA_ATTR: &str = "alpha";
    pub const CURRENCY_TAG: &str = "currency";
    pub const ENUM_TAG: &str = "enum";
    pub const EXTENT_TAG: &str = "extent";
    pub const EXTENT_WIDTH_ATTR: &str = "width";
    pub const EXTENT_HEIGHT_ATTR: &str = "height";
    pub const FLOAT_TAG: &str = "float";
    pub const INTEGER_TAG: &str = "integer";
    pub const MULTIPLICITY_TAG: &str = "multiplicity";
    pub const MULTIPLICITY_MIN_ATTR: &str = "min";
    pub const MULTIPLICITY_MAX_ATTR: &str = "max";
    pub const POINT_TAG: &str = "point";
    pub const POINT_X_ATTR: &str = "x";
    pub const POINT_Y_ATTR: &str = "y";
    pub const STRING_TAG: &str = "string";
    pub const TIME_PERIOD_TAG: &str = "timePeriod";
    pub const TIME_PERIOD_YEAR_ATTR: &str = "year";
    pub const TIME_PERIOD_MONTH_ATTR: &str = "month";
    pub const TIME_PERIOD_DAY_ATTR: &str = "day";
    pub const TIME_PERIOD_HOUR_ATTR: &str = "hour";
    pub const TIME_PERIOD_MINUTE_ATTR: &str = "minute";
    pub const TIME_PERIOD_SECOND_ATTR: &str = "second";
    pub const TIME_STAMP_TAG: &str = "timeStamp";
    pub const TIME_STAMP_YEAR_ATTR: &str = "year";
    pub const TIME_STAMP_MONTH_ATTR: &str = "month";
    pub const TIME_STAMP_DAY_ATTR: &str = "day";
    pub const TIME_STAMP_HOUR_ATTR: &str = "hour";
    pub const TIME_STAMP_MINUTE_ATTR: &str = "minute";
    pub const TIME_STAMP_SECOND_ATTR: &str = "second";
}

use tags::*;

/// The XML probe. Stateless; one instance parses any number of documents.
#[derive(Debug, Default)]
pub struct MeshObjectSetProbe;

impl MeshObjectSetProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Probe for MeshObjectSetProbe {
    fn name(&self) -> &str {
        "mesh-object-set"
    }

    fn parse_document(
        &self,
        data_source: &MeshBaseIdentifier,
        document: &str,
        staging: &mut MeshBase,
    ) -> Result<(), ProbeError> {
        let model = staging.model().clone();
        let (buffered, variables) = parse_mesh_object_set(data_source, document, &model)?;
        instantiate_objects(data_source, &buffered, &variables, staging)?;
        relate_objects(data_source, &buffered, &variables, staging)?;
        restore_audit_times(data_source, &buffered, &variables, staging)?;
        Ok(())
    }
}

/// The root element name of an XML document, if it has one.
pub fn document_root_tag(document: &str) -> Option<String> {
    let mut reader = Reader::from_str(document);
    reader.trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return String::from_utf8(e.name().as_ref().to_vec()).ok();
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => continue,
        }
    }
}

// ============================================================================
// Phase 1: buffer
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Document,
    Set,
    Object,
    TypeText,
    Property,
    ValueText,
    Relationship,
    Done,
}

struct PendingValue {
    tag: String,
    attrs: HashMap<String, String>,
}

/// Parse a document into externalized buffers plus the variable table built
/// from `proxyTowardsHome` attributes (raw text -> resolved external form).
#[allow(clippy::type_complexity)]
pub fn parse_mesh_object_set(
    data_source: &MeshBaseIdentifier,
    document: &str,
    model: &ModelRegistry,
) -> Result<(Vec<ExternalizedMeshObject>, HashMap<String, String>), ProbeError> {
    let mut reader = Reader::from_str(document);
    reader.trim_text(true);

    let mut objects: Vec<ExternalizedMeshObject> = Vec::new();
    let mut variables: HashMap<String, String> = HashMap::new();
    let mut current: Option<ExternalizedMeshObject> = None;
    let mut current_property: Option<MeshTypeIdentifier> = None;
    let mut decoded_value = None;
    let mut pending_value: Option<PendingValue> = None;
    let mut text = String::new();
    let mut state = State::Document;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ProbeError::syntax_with(data_source, "malformed XML", e))?;
        match event {
            Event::Start(ref element) | Event::Empty(ref element) => {
                let is_empty = matches!(&event, Event::Empty(_));
                let name = element_name(data_source, element)?;
                match state {
                    State::Document => {
                        if name == MESH_OBJECT_SET_TAG {
                            state = if is_empty { State::Done } else { State::Set };
                        }
                        // Anything else before the recognized root is not
                        // ours; keep scanning.
                    }
                    State::Set => {
                        if name != MESH_OBJECT_TAG {
                            return Err(unknown_tag(data_source, &name));
                        }
                        let object = begin_object(data_source, element, &mut variables)?;
                        if is_empty {
                            objects.push(object);
                        } else {
                            current = Some(object);
                            state = State::Object;
                        }
                    }
                    State::Object => match name.as_str() {
                        TYPE_TAG => {
                            if is_empty {
                                return Err(ProbeError::syntax(
                                    data_source,
                                    "empty <type> element",
                                ));
                            }
                            text.clear();
                            state = State::TypeText;
                        }
                        PROPERTY_TAG => {
                            let property = require_attr(
                                data_source,
                                element,
                                PROPERTY_TYPE_ATTR,
                                PROPERTY_TAG,
                            )?;
                            if is_empty {
                                return Err(ProbeError::syntax(
                                    data_source,
                                    format!("property `{property}` has no value"),
                                ));
                            }
                            current_property = Some(MeshTypeIdentifier::new(property));
                            decoded_value = None;
                            state = State::Property;
                        }
                        RELATIONSHIP_TAG => {
                            let other = require_attr(
                                data_source,
                                element,
                                IDENTIFIER_ATTR,
                                RELATIONSHIP_TAG,
                            )?;
                            if other.is_empty() {
                                return Err(ProbeError::syntax(
                                    data_source,
                                    "empty `ID` on <relationship>",
                                ));
                            }
                            let object = in_flight(data_source, current.as_mut())?;
                            object.relationships.push(ExternalizedRelationship {
                                identifier: other,
                                role_types: Vec::new(),
                            });
                            if !is_empty {
                                state = State::Relationship;
                            }
                        }
                        other => return Err(unknown_tag(data_source, other)),
                    },
                    State::Property => {
                        if decoded_value.is_some() {
                            return Err(ProbeError::syntax(
                                data_source,
                                "more than one value inside <property>",
                            ));
                        }
                        let pending = PendingValue {
                            tag: name.clone(),
                            attrs: collect_attrs(data_source, element)?,
                        };
                        if is_empty {
                            let property = in_flight(data_source, current_property.as_ref())?;
                            decoded_value =
                                Some(decode_pending(data_source, model, property, &pending, "")?);
                        } else {
                            pending_value = Some(pending);
                            text.clear();
                            state = State::ValueText;
                        }
                    }
                    State::Relationship => {
                        if name != ROLE_TAG {
                            return Err(unknown_tag(data_source, &name));
                        }
                        let role =
                            require_attr(data_source, element, ROLE_TYPE_ATTR, ROLE_TAG)?;
                        in_flight(
                            data_source,
                            current.as_mut().and_then(|o| o.current_relationship_mut()),
                        )?
                        .role_types
                        .push(MeshTypeIdentifier::new(role));
                    }
                    State::TypeText | State::ValueText => {
                        return Err(unknown_tag(data_source, &name));
                    }
                    State::Done => {
                        return Err(unknown_tag(data_source, &name));
                    }
                }
            }
            Event::Text(t) => {
                if matches!(state, State::TypeText | State::ValueText) {
                    let unescaped = t.unescape().map_err(|e| {
                        ProbeError::syntax_with(data_source, "malformed text content", e)
                    })?;
                    text.push_str(&unescaped);
                }
            }
            Event::End(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
                match state {
                    State::TypeText if name == TYPE_TAG => {
                        let type_name = text.trim();
                        if type_name.is_empty() {
                            return Err(ProbeError::syntax(data_source, "empty <type> element"));
                        }
                        in_flight(data_source, current.as_mut())?
                            .mesh_types
                            .push(MeshTypeIdentifier::new(type_name));
                        state = State::Object;
                    }
                    State::ValueText => {
                        let pending = in_flight(data_source, pending_value.take())?;
                        if name != pending.tag {
                            return Err(ProbeError::syntax(
                                data_source,
                                format!("mismatched value element `{name}`"),
                            ));
                        }
                        let property = in_flight(data_source, current_property.as_ref())?;
                        decoded_value =
                            Some(decode_pending(data_source, model, property, &pending, &text)?);
                        state = State::Property;
                    }
                    State::Property if name == PROPERTY_TAG => {
                        let property = in_flight(data_source, current_property.take())?;
                        let value = decoded_value.take().ok_or_else(|| {
                            ProbeError::syntax(
                                data_source,
                                format!("property `{property}` has no value"),
                            )
                        })?;
                        in_flight(data_source, current.as_mut())?
                            .properties
                            .push((property, value));
                        state = State::Object;
                    }
                    State::Relationship if name == RELATIONSHIP_TAG => {
                        state = State::Object;
                    }
                    State::Relationship if name == ROLE_TAG => {}
                    State::Object if name == MESH_OBJECT_TAG => {
                        objects.push(in_flight(data_source, current.take())?);
                        state = State::Set;
                    }
                    State::Set if name == MESH_OBJECT_SET_TAG => {
                        state = State::Done;
                    }
                    _ => {
                        return Err(ProbeError::syntax(
                            data_source,
                            format!("unexpected closing tag `{name}`"),
                        ));
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions are noise.
            _ => {}
        }
    }

    match state {
        State::Done => Ok((objects, variables)),
        State::Document => Err(ProbeError::empty_data_source(data_source)),
        _ => Err(ProbeError::syntax(data_source, "unexpected end of document")),
    }
}

fn begin_object(
    data_source: &MeshBaseIdentifier,
    element: &BytesStart<'_>,
    variables: &mut HashMap<String, String>,
) -> Result<ExternalizedMeshObject, ProbeError> {
    let attrs = collect_attrs(data_source, element)?;
    let mut object = ExternalizedMeshObject::default();

    if let Some(identifier) = attrs.get(IDENTIFIER_ATTR) {
        object.identifier = identifier.clone();
    }
    for (attr, slot) in [
        (TIME_CREATED_ATTR, &mut object.time_created),
        (TIME_UPDATED_ATTR, &mut object.time_updated),
        (TIME_READ_ATTR, &mut object.time_read),
        (TIME_EXPIRES_ATTR, &mut object.time_expires),
    ] {
        if let Some(value) = attrs.get(attr).filter(|v| !v.is_empty()) {
            *slot = Some(parse_audit_time(value).map_err(|e| {
                ProbeError::syntax_with(data_source, format!("bad `{attr}` attribute"), e)
            })?);
        }
    }
    object.give_up_lock = attrs.get(GIVE_UP_LOCK_ATTR).map(String::as_str) == Some(YES_VALUE);
    object.give_up_home = attrs.get(GIVE_UP_HOME_ATTR).map(String::as_str) == Some(YES_VALUE);
    if let Some(proxy) = attrs.get(PROXY_TOWARDS_HOME_ATTR).filter(|v| !v.is_empty()) {
        let resolved = MeshBaseIdentifier::parse(proxy).map_err(|e| {
            ProbeError::syntax_with(data_source, "bad `proxyTowardsHome` attribute", e)
        })?;
        // Later identifiers may refer back to this base through `${...}`.
        variables.insert(proxy.clone(), resolved.external_form().to_string());
        object.proxy_towards_home = Some(resolved.external_form().to_string());
    }
    Ok(object)
}

fn decode_pending(
    data_source: &MeshBaseIdentifier,
    model: &ModelRegistry,
    property: &MeshTypeIdentifier,
    pending: &PendingValue,
    text: &str,
) -> Result<meshweave_model::PropertyValue, ProbeError> {
    let property_type = model
        .find_property_type(property)
        .map_err(|e| ProbeError::syntax_with(data_source, "unknown property type", e))?;
    values::decode_value(data_source, property_type, &pending.tag, &pending.attrs, text)
}

fn element_name(
    data_source: &MeshBaseIdentifier,
    element: &BytesStart<'_>,
) -> Result<String, ProbeError> {
    String::from_utf8(element.name().as_ref().to_vec())
        .map_err(|e| ProbeError::syntax_with(data_source, "non-UTF-8 element name", e))
}

fn collect_attrs(
    data_source: &MeshBaseIdentifier,
    element: &BytesStart<'_>,
) -> Result<HashMap<String, String>, ProbeError> {
    let mut out = HashMap::new();
    for attr in element.attributes() {
        let attr =
            attr.map_err(|e| ProbeError::syntax_with(data_source, "malformed attribute", e))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| ProbeError::syntax_with(data_source, "malformed attribute value", e))?
            .into_owned();
        out.insert(key, value);
    }
    Ok(out)
}

fn unknown_tag(data_source: &MeshBaseIdentifier, tag: &str) -> ProbeError {
    ProbeError::syntax(data_source, format!("unknown XML tag: {tag}"))
}

/// Required element attribute, unescaped.
fn require_attr(
    data_source: &MeshBaseIdentifier,
    element: &BytesStart<'_>,
    attr: &str,
    tag: &str,
) -> Result<String, ProbeError> {
    collect_attrs(data_source, element)?
        .remove(attr)
        .ok_or_else(|| ProbeError::syntax(data_source, format!("missing `{attr}` on <{tag}>")))
}

/// Parser-state accessor; `None` means the document nested elements in a
/// way the state machine rejects.
fn in_flight<T>(data_source: &MeshBaseIdentifier, value: Option<T>) -> Result<T, ProbeError> {
    value.ok_or_else(|| ProbeError::syntax(data_source, "element out of place"))
}

// ============================================================================
// Phase 2: instantiate
// ============================================================================

fn instantiate_objects(
    data_source: &MeshBaseIdentifier,
    buffered: &[ExternalizedMeshObject],
    variables: &HashMap<String, String>,
    staging: &mut MeshBase,
) -> Result<(), ProbeError> {
    for external in buffered {
        let object = if is_home_statement(external) {
            let home = staging.home_id();
            if !external.mesh_types.is_empty() {
                match staging.bless(home, &external.mesh_types) {
                    Ok(()) => {}
                    Err(
                        e @ (MeshError::IsAbstract { .. } | MeshError::EntityBlessedAlready { .. }),
                    ) => {
                        error!(error = %e, "skipping home-object blessing");
                    }
                    Err(MeshError::Model(e)) => {
                        return Err(ProbeError::syntax_with(data_source, "unknown mesh type", e))
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            home
        } else {
            let identifier =
                resolve_object_identifier(data_source, &external.identifier, variables)?;
            let created = match &external.proxy_towards_home {
                Some(proxy) => {
                    let proxy = MeshBaseIdentifier::parse(proxy).map_err(|e| {
                        ProbeError::syntax_with(data_source, "bad forward-reference base", e)
                    })?;
                    staging.create_forward_reference(proxy, identifier, &external.mesh_types)
                }
                None => staging.create_object_timed(
                    identifier,
                    &external.mesh_types,
                    external.audit_times(),
                ),
            };
            match created {
                Ok(id) => id,
                Err(e @ MeshError::IsAbstract { .. }) => {
                    error!(error = %e, identifier = %external.identifier, "skipping mesh object");
                    continue;
                }
                Err(e @ MeshError::IdentifierNotUnique(_)) => {
                    return Err(ProbeError::syntax_with(
                        data_source,
                        "duplicate mesh object identifier",
                        e,
                    ));
                }
                Err(MeshError::Model(e)) => {
                    return Err(ProbeError::syntax_with(data_source, "unknown mesh type", e));
                }
                Err(e) => return Err(e.into()),
            }
        };

        staging.set_replica_hints(object, external.give_up_lock, external.give_up_home);

        for (property, value) in &external.properties {
            match staging.set_property(object, property, value.clone()) {
                Ok(()) => {}
                Err(
                    e @ (MeshError::IllegalPropertyType { .. }
                    | MeshError::IllegalPropertyValue { .. }
                    | MeshError::ReadOnlyProperty { .. }),
                ) => {
                    error!(error = %e, "skipping property assignment");
                }
                Err(MeshError::Model(e)) => {
                    return Err(ProbeError::syntax_with(
                        data_source,
                        "unknown property type",
                        e,
                    ));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

// ============================================================================
// Phase 3: relate
// ============================================================================

fn relate_objects(
    data_source: &MeshBaseIdentifier,
    buffered: &[ExternalizedMeshObject],
    variables: &HashMap<String, String>,
    staging: &mut MeshBase,
) -> Result<(), ProbeError> {
    for external in buffered {
        let current = if is_home_statement(external) {
            Some(staging.home_id())
        } else {
            let identifier =
                resolve_object_identifier(data_source, &external.identifier, variables)?;
            staging.find_by_identifier(&identifier).map(|o| o.id())
        };
        // Instantiation may have skipped this object (abstract type); its
        // relationships go with it.
        let Some(current) = current else { continue };

        for relationship in &external.relationships {
            let other_identifier =
                resolve_object_identifier(data_source, &relationship.identifier, variables)?;
            let Some(other) = staging.find_by_identifier(&other_identifier).map(|o| o.id())
            else {
                return Err(ProbeError::syntax(
                    data_source,
                    format!("referenced mesh object could not be found: {other_identifier}"),
                ));
            };

            match staging.relate(current, other) {
                // RelatedAlready is the other side of an edge we created.
                Ok(()) | Err(MeshError::RelatedAlready { .. }) => {}
                Err(e @ MeshError::CannotRelateToSelf) => {
                    error!(error = %e, identifier = %other_identifier, "skipping self-relationship");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            if relationship.role_types.is_empty() {
                continue;
            }
            match staging.bless_relationship(current, &relationship.role_types, other) {
                // RoleBlessedAlready is the other side of a blessing.
                Ok(()) | Err(MeshError::RoleBlessedAlready { .. }) => {}
                Err(
                    e @ (MeshError::EntityNotBlessed { .. }
                    | MeshError::NotRelated { .. }
                    | MeshError::IsAbstract { .. }),
                ) => {
                    error!(error = %e, "skipping relationship blessing");
                }
                Err(MeshError::Model(e)) => {
                    return Err(ProbeError::syntax_with(data_source, "unknown role type", e));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}

// ============================================================================
// Phase 4: restore stated audit times
// ============================================================================

/// Property assignment and relating touch `timeUpdated`; times the document
/// stated explicitly win over those touch timestamps.
fn restore_audit_times(
    data_source: &MeshBaseIdentifier,
    buffered: &[ExternalizedMeshObject],
    variables: &HashMap<String, String>,
    staging: &mut MeshBase,
) -> Result<(), ProbeError> {
    for external in buffered {
        if !external.states_times() {
            continue;
        }
        let id = if is_home_statement(external) {
            Some(staging.home_id())
        } else {
            let identifier =
                resolve_object_identifier(data_source, &external.identifier, variables)?;
            staging.find_by_identifier(&identifier).map(|o| o.id())
        };
        let Some(id) = id else { continue };
        let Some(object) = staging.object(id) else { continue };
        let times = AuditTimes {
            created: external.time_created.unwrap_or(object.time_created()),
            updated: external.time_updated.unwrap_or(object.time_updated()),
            read: external.time_read.unwrap_or(object.time_read()),
            expires: external.time_expires.or(object.time_expires()),
        };
        staging.set_audit_times(id, times)?;
    }
    Ok(())
}

// ============================================================================
// Identifier resolution
// ============================================================================

/// An identifier without a fragment, on an object with no forward-reference
/// base, denotes the staging base's home object.
fn is_home_statement(external: &ExternalizedMeshObject) -> bool {
    !external.identifier.contains('#') && external.proxy_towards_home.is_none()
}

fn variable_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").unwrap())
}

/// Substitute `${...}` references from the variable table.
fn substitute_variables(
    data_source: &MeshBaseIdentifier,
    text: &str,
    variables: &HashMap<String, String>,
) -> Result<String, ProbeError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for capture in variable_pattern().captures_iter(text) {
        let Some(whole) = capture.get(0) else { continue };
        let variable = &capture[1];
        let Some(replacement) = variables.get(variable) else {
            return Err(ProbeError::unresolved_variable(data_source, variable));
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(replacement);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

fn resolve_object_identifier(
    data_source: &MeshBaseIdentifier,
    text: &str,
    variables: &HashMap<String, String>,
) -> Result<MeshObjectIdentifier, ProbeError> {
    let substituted = substitute_variables(data_source, text, variables)?;
    MeshObjectIdentifier::from_external_form(data_source, &substituted)
        .map_err(|e| ProbeError::syntax_with(data_source, "bad mesh object identifier", e))
}

