//! Decoding property values from their XML form.

use super::tags::*;
use crate::error::ProbeError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use meshweave_mesh::MeshBaseIdentifier;
use meshweave_model::{
    BlobValue, ColorValue, CurrencyValue, DataType, ExtentValue, MultiplicityValue, PointValue,
    PropertyType, PropertyValue, TimePeriodValue, TimeStampValue,
};
use std::collections::HashMap;
use std::str::FromStr;

/// Decode one value element (`tag` + `attrs` + trimmed text content) against
/// the declared property type.
pub(crate) fn decode_value(
    data_source: &MeshBaseIdentifier,
    property: &PropertyType,
    tag: &str,
    attrs: &HashMap<String, String>,
    text: &str,
) -> Result<PropertyValue, ProbeError> {
    let content = text.trim();
    match tag {
        BLOB_TAG => decode_blob(data_source, property, attrs, content),
        BOOLEAN_TAG => match content {
            BOOLEAN_TRUE => Ok(PropertyValue::Boolean(true)),
            BOOLEAN_FALSE => Ok(PropertyValue::Boolean(false)),
            other => Err(ProbeError::syntax(
                data_source,
                format!("bad <{BOOLEAN_TAG}> content `{other}`"),
            )),
        },
        COLOR_TAG => Ok(PropertyValue::Color(ColorValue {
            red: attr_number(data_source, attrs, COLOR_RED_ATTR, COLOR_TAG)?,
            green: attr_number(data_source, attrs, COLOR_GREEN_ATTR, COLOR_TAG)?,
            blue: attr_number(data_source, attrs, COLOR_BLUE_ATTR, COLOR_TAG)?,
            alpha: attr_number(data_source, attrs, COLOR_ALPHA_ATTR, COLOR_TAG)?,
        })),
        CURRENCY_TAG => CurrencyValue::from_str(content)
            .map(PropertyValue::Currency)
            .map_err(|e| ProbeError::syntax_with(data_source, "bad currency value", e)),
        ENUM_TAG => {
            let domain = property.data_type.enumerated_domain().ok_or_else(|| {
                ProbeError::syntax(
                    data_source,
                    format!("property `{}` is not enumerated", property.identifier),
                )
            })?;
            domain
                .select(content)
                .map(PropertyValue::Enumerated)
                .map_err(|e| {
                    ProbeError::syntax_with(
                        data_source,
                        format!("bad key for property `{}`", property.identifier),
                        e,
                    )
                })
        }
        EXTENT_TAG => Ok(PropertyValue::Extent(ExtentValue {
            width: attr_number(data_source, attrs, EXTENT_WIDTH_ATTR, EXTENT_TAG)?,
            height: attr_number(data_source, attrs, EXTENT_HEIGHT_ATTR, EXTENT_TAG)?,
        })),
        FLOAT_TAG => content
            .parse()
            .map(PropertyValue::Float)
            .map_err(|_| bad_content(data_source, FLOAT_TAG, content)),
        INTEGER_TAG => content
            .parse()
            .map(PropertyValue::Integer)
            .map_err(|_| bad_content(data_source, INTEGER_TAG, content)),
        MULTIPLICITY_TAG => {
            let min = match attrs.get(MULTIPLICITY_MIN_ATTR).filter(|v| !v.is_empty()) {
                Some(value) => value
                    .parse()
                    .map_err(|_| bad_content(data_source, MULTIPLICITY_TAG, value))?,
                None => 0,
            };
            let max = match attrs.get(MULTIPLICITY_MAX_ATTR).filter(|v| !v.is_empty()) {
                Some(value) => Some(
                    value
                        .parse()
                        .map_err(|_| bad_content(data_source, MULTIPLICITY_TAG, value))?,
                ),
                None => None,
            };
            MultiplicityValue::new(min, max)
                .map(PropertyValue::Multiplicity)
                .map_err(|e| ProbeError::syntax_with(data_source, "bad multiplicity value", e))
        }
        POINT_TAG => Ok(PropertyValue::Point(PointValue {
            x: attr_number(data_source, attrs, POINT_X_ATTR, POINT_TAG)?,
            y: attr_number(data_source, attrs, POINT_Y_ATTR, POINT_TAG)?,
        })),
        STRING_TAG => Ok(PropertyValue::String(text.to_string())),
        TIME_PERIOD_TAG => Ok(PropertyValue::TimePeriod(TimePeriodValue {
            years: attr_number(data_source, attrs, TIME_PERIOD_YEAR_ATTR, TIME_PERIOD_TAG)?,
            months: attr_number(data_source, attrs, TIME_PERIOD_MONTH_ATTR, TIME_PERIOD_TAG)?,
            days: attr_number(data_source, attrs, TIME_PERIOD_DAY_ATTR, TIME_PERIOD_TAG)?,
            hours: attr_number(data_source, attrs, TIME_PERIOD_HOUR_ATTR, TIME_PERIOD_TAG)?,
            minutes: attr_number(data_source, attrs, TIME_PERIOD_MINUTE_ATTR, TIME_PERIOD_TAG)?,
            seconds: attr_number(data_source, attrs, TIME_PERIOD_SECOND_ATTR, TIME_PERIOD_TAG)?,
        })),
        TIME_STAMP_TAG => decode_time_stamp(data_source, attrs, content),
        other => Err(ProbeError::syntax(
            data_source,
            format!("unknown value tag: {other}"),
        )),
    }
}

fn decode_blob(
    data_source: &MeshBaseIdentifier,
    property: &PropertyType,
    attrs: &HashMap<String, String>,
    content: &str,
) -> Result<PropertyValue, ProbeError> {
    let default_mime = match &property.data_type {
        DataType::Blob { default_mime } => default_mime.as_deref(),
        _ => None,
    };
    let mime = attrs
        .get(BLOB_MIME_ATTR)
        .map(String::as_str)
        .filter(|m| !m.is_empty())
        .or(default_mime)
        .ok_or_else(|| {
            ProbeError::syntax(
                data_source,
                format!("empty `{BLOB_MIME_ATTR}` on <{BLOB_TAG}>"),
            )
        })?;

    if let Some(load_from) = attrs.get(BLOB_LOAD_FROM_ATTR).filter(|v| !v.is_empty()) {
        return Ok(PropertyValue::Blob(BlobValue::deferred(mime, load_from)));
    }
    if mime.starts_with("text/") {
        // Text payloads travel base64-encoded so markup survives embedding.
        let bytes = BASE64
            .decode(content)
            .map_err(|e| ProbeError::syntax_with(data_source, "bad base64 blob payload", e))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| ProbeError::syntax_with(data_source, "blob payload is not UTF-8", e))?;
        return Ok(PropertyValue::Blob(BlobValue::text(mime, text)));
    }
    Ok(PropertyValue::Blob(BlobValue::bytes(
        mime,
        content.as_bytes().to_vec(),
    )))
}

fn decode_time_stamp(
    data_source: &MeshBaseIdentifier,
    attrs: &HashMap<String, String>,
    content: &str,
) -> Result<PropertyValue, ProbeError> {
    let has_all_fields = [
        TIME_STAMP_YEAR_ATTR,
        TIME_STAMP_MONTH_ATTR,
        TIME_STAMP_DAY_ATTR,
        TIME_STAMP_HOUR_ATTR,
        TIME_STAMP_MINUTE_ATTR,
        TIME_STAMP_SECOND_ATTR,
    ]
    .iter()
    .all(|attr| attrs.get(*attr).is_some_and(|v| !v.is_empty()));

    let value = if has_all_fields {
        TimeStampValue::from_fields(
            attr_number(data_source, attrs, TIME_STAMP_YEAR_ATTR, TIME_STAMP_TAG)?,
            attr_number(data_source, attrs, TIME_STAMP_MONTH_ATTR, TIME_STAMP_TAG)?,
            attr_number(data_source, attrs, TIME_STAMP_DAY_ATTR, TIME_STAMP_TAG)?,
            attr_number(data_source, attrs, TIME_STAMP_HOUR_ATTR, TIME_STAMP_TAG)?,
            attr_number(data_source, attrs, TIME_STAMP_MINUTE_ATTR, TIME_STAMP_TAG)?,
            attr_number(data_source, attrs, TIME_STAMP_SECOND_ATTR, TIME_STAMP_TAG)?,
        )
    } else {
        TimeStampValue::from_rfc3339(content)
    }
    .map_err(|e| ProbeError::syntax_with(data_source, "bad timestamp value", e))?;
    Ok(PropertyValue::TimeStamp(value))
}

/// Required numeric attribute.
fn attr_number<T: FromStr>(
    data_source: &MeshBaseIdentifier,
    attrs: &HashMap<String, String>,
    attr: &str,
    tag: &str,
) -> Result<T, ProbeError> {
    let value = attrs.get(attr).filter(|v| !v.is_empty()).ok_or_else(|| {
        ProbeError::syntax(data_source, format!("empty `{attr}` on <{tag}>"))
    })?;
    value
        .parse()
        .map_err(|_| ProbeError::syntax(data_source, format!("bad `{attr}` on <{tag}>: `{value}`")))
}

fn bad_content(data_source: &MeshBaseIdentifier, tag: &str, content: &str) -> ProbeError {
    ProbeError::syntax(data_source, format!("bad <{tag}> content `{content}`"))
}
