//! Emitting a mesh base back into the mesh-object-set XML format.
//!
//! Inverse of the probe's first pass: exporting a freshly imported base
//! yields a document that re-imports to an isomorphic graph.

use super::tags::*;
use crate::error::ProbeError;
use crate::time::format_audit_time;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use meshweave_mesh::{ExternalizedMeshObject, MeshBase};
use meshweave_model::{BlobPayload, BlobValue, PropertyValue};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Serialize every object of `base` (home object first) as one
/// `<MeshObjectSet>` document.
pub fn write_mesh_object_set(base: &MeshBase) -> Result<String, ProbeError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None))))?;
    emit(writer.write_event(Event::Start(BytesStart::new(MESH_OBJECT_SET_TAG))))?;

    for external in base.externalize() {
        write_object(&mut writer, &external)?;
    }

    emit(writer.write_event(Event::End(BytesEnd::new(MESH_OBJECT_SET_TAG))))?;
    let bytes = writer.into_inner();
    String::from_utf8(bytes).map_err(|e| {
        ProbeError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

fn write_object(
    writer: &mut Writer<Vec<u8>>,
    external: &ExternalizedMeshObject,
) -> Result<(), ProbeError> {
    let mut element = BytesStart::new(MESH_OBJECT_TAG);
    element.push_attribute((IDENTIFIER_ATTR, external.identifier.as_str()));
    for (attr, value) in [
        (TIME_CREATED_ATTR, external.time_created),
        (TIME_UPDATED_ATTR, external.time_updated),
        (TIME_READ_ATTR, external.time_read),
        (TIME_EXPIRES_ATTR, external.time_expires),
    ] {
        if let Some(millis) = value {
            element.push_attribute((attr, format_audit_time(millis).as_str()));
        }
    }
    if external.give_up_lock {
        element.push_attribute((GIVE_UP_LOCK_ATTR, YES_VALUE));
    }
    if external.give_up_home {
        element.push_attribute((GIVE_UP_HOME_ATTR, YES_VALUE));
    }
    if let Some(proxy) = &external.proxy_towards_home {
        element.push_attribute((PROXY_TOWARDS_HOME_ATTR, proxy.as_str()));
    }

    let has_children = !external.mesh_types.is_empty()
        || !external.properties.is_empty()
        || !external.relationships.is_empty();
    if !has_children {
        return emit(writer.write_event(Event::Empty(element)));
    }
    emit(writer.write_event(Event::Start(element)))?;

    for mesh_type in &external.mesh_types {
        text_element(writer, TYPE_TAG, mesh_type.as_str(), &[])?;
    }

    for (property, value) in &external.properties {
        let mut property_element = BytesStart::new(PROPERTY_TAG);
        property_element.push_attribute((PROPERTY_TYPE_ATTR, property.as_str()));
        emit(writer.write_event(Event::Start(property_element)))?;
        write_value(writer, value)?;
        emit(writer.write_event(Event::End(BytesEnd::new(PROPERTY_TAG))))?;
    }

    for relationship in &external.relationships {
        let mut relationship_element = BytesStart::new(RELATIONSHIP_TAG);
        relationship_element.push_attribute((IDENTIFIER_ATTR, relationship.identifier.as_str()));
        if relationship.role_types.is_empty() {
            emit(writer.write_event(Event::Empty(relationship_element)))?;
            continue;
        }
        emit(writer.write_event(Event::Start(relationship_element)))?;
        for role in &relationship.role_types {
            let mut role_element = BytesStart::new(ROLE_TAG);
            role_element.push_attribute((ROLE_TYPE_ATTR, role.as_str()));
            emit(writer.write_event(Event::Empty(role_element)))?;
        }
        emit(writer.write_event(Event::End(BytesEnd::new(RELATIONSHIP_TAG))))?;
    }

    emit(writer.write_event(Event::End(BytesEnd::new(MESH_OBJECT_TAG))))
}

fn write_value(writer: &mut Writer<Vec<u8>>, value: &PropertyValue) -> Result<(), ProbeError> {
    match value {
        PropertyValue::Blob(blob) => write_blob(writer, blob),
        PropertyValue::Boolean(flag) => text_element(
            writer,
            BOOLEAN_TAG,
            if *flag { BOOLEAN_TRUE } else { BOOLEAN_FALSE },
            &[],
        ),
        PropertyValue::Color(color) => empty_element(
            writer,
            COLOR_TAG,
            &[
                (COLOR_RED_ATTR, color.red.to_string()),
                (COLOR_GREEN_ATTR, color.green.to_string()),
                (COLOR_BLUE_ATTR, color.blue.to_string()),
                (COLOR_ALPHA_ATTR, color.alpha.to_string()),
            ],
        ),
        PropertyValue::Currency(currency) => {
            text_element(writer, CURRENCY_TAG, &currency.to_string(), &[])
        }
        PropertyValue::Enumerated(selected) => text_element(writer, ENUM_TAG, &selected.key, &[]),
        PropertyValue::Extent(extent) => empty_element(
            writer,
            EXTENT_TAG,
            &[
                (EXTENT_WIDTH_ATTR, extent.width.to_string()),
                (EXTENT_HEIGHT_ATTR, extent.height.to_string()),
            ],
        ),
        PropertyValue::Float(number) => text_element(writer, FLOAT_TAG, &number.to_string(), &[]),
        PropertyValue::Integer(number) => {
            text_element(writer, INTEGER_TAG, &number.to_string(), &[])
        }
        PropertyValue::Multiplicity(multiplicity) => {
            let mut attrs = vec![(MULTIPLICITY_MIN_ATTR, multiplicity.min().to_string())];
            if let Some(max) = multiplicity.max() {
                attrs.push((MULTIPLICITY_MAX_ATTR, max.to_string()));
            }
            empty_element(writer, MULTIPLICITY_TAG, &attrs)
        }
        PropertyValue::Point(point) => empty_element(
            writer,
            POINT_TAG,
            &[
                (POINT_X_ATTR, point.x.to_string()),
                (POINT_Y_ATTR, point.y.to_string()),
            ],
        ),
        PropertyValue::String(text) => text_element(writer, STRING_TAG, text, &[]),
        PropertyValue::TimePeriod(period) => empty_element(
            writer,
            TIME_PERIOD_TAG,
            &[
                (TIME_PERIOD_YEAR_ATTR, period.years.to_string()),
                (TIME_PERIOD_MONTH_ATTR, period.months.to_string()),
                (TIME_PERIOD_DAY_ATTR, period.days.to_string()),
                (TIME_PERIOD_HOUR_ATTR, period.hours.to_string()),
                (TIME_PERIOD_MINUTE_ATTR, period.minutes.to_string()),
                (TIME_PERIOD_SECOND_ATTR, period.seconds.to_string()),
            ],
        ),
        PropertyValue::TimeStamp(stamp) => {
            text_element(writer, TIME_STAMP_TAG, &stamp.to_rfc3339(), &[])
        }
    }
}

fn write_blob(writer: &mut Writer<Vec<u8>>, blob: &BlobValue) -> Result<(), ProbeError> {
    let mime_attr = (BLOB_MIME_ATTR, blob.mime.clone());
    match &blob.payload {
        BlobPayload::Deferred { load_from } => empty_element(
            writer,
            BLOB_TAG,
            &[mime_attr, (BLOB_LOAD_FROM_ATTR, load_from.clone())],
        ),
        BlobPayload::Text { text } => {
            let content = if blob.mime.starts_with("text/") {
                BASE64.encode(text.as_bytes())
            } else {
                text.clone()
            };
            text_element(writer, BLOB_TAG, &content, &[mime_attr])
        }
        BlobPayload::Bytes { bytes } => {
            let content = if blob.mime.starts_with("text/") {
                BASE64.encode(bytes)
            } else {
                String::from_utf8_lossy(bytes).into_owned()
            };
            text_element(writer, BLOB_TAG, &content, &[mime_attr])
        }
    }
}

fn text_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    content: &str,
    attrs: &[(&str, String)],
) -> Result<(), ProbeError> {
    let mut element = BytesStart::new(tag);
    for (attr, value) in attrs {
        element.push_attribute((*attr, value.as_str()));
    }
    emit(writer.write_event(Event::Start(element)))?;
    emit(writer.write_event(Event::Text(BytesText::new(content))))?;
    emit(writer.write_event(Event::End(BytesEnd::new(tag))))
}

fn empty_element(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    attrs: &[(&str, String)],
) -> Result<(), ProbeError> {
    let mut element = BytesStart::new(tag);
    for (attr, value) in attrs {
        element.push_attribute((*attr, value.as_str()));
    }
    emit(writer.write_event(Event::Empty(element)))
}

fn emit<E>(result: Result<(), E>) -> Result<(), ProbeError>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.map_err(|e| ProbeError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
}
