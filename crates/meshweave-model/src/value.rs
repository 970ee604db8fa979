//! Property values.
//!
//! A mesh object's property bag holds [`PropertyValue`]s. There are thirteen
//! kinds, one per [`crate::DataType`] kind. Values that have a canonical
//! text form (currency, multiplicity, timestamp) implement `Display` and
//! `FromStr` so the XML boundary and the registries stay aligned on a single
//! syntax.

use chrono::{DateTime, Duration, TimeZone, Utc};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1, take_while_m_n},
    character::complete::char as pchar,
    combinator::{all_consuming, map, map_res, opt},
    sequence::preceded,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error for a malformed canonical text form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind} literal `{text}`")]
pub struct ValueTextError {
    pub kind: &'static str,
    pub text: String,
}

impl ValueTextError {
    fn new(kind: &'static str, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

// ============================================================================
// Value kinds
// ============================================================================

/// The discriminant of a [`PropertyValue`] / [`crate::DataType`] pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Blob,
    Boolean,
    Color,
    Currency,
    Enumerated,
    Extent,
    Float,
    Integer,
    Multiplicity,
    Point,
    String,
    TimePeriod,
    TimeStamp,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Blob => "blob",
            ValueKind::Boolean => "boolean",
            ValueKind::Color => "color",
            ValueKind::Currency => "currency",
            ValueKind::Enumerated => "enumerated",
            ValueKind::Extent => "extent",
            ValueKind::Float => "float",
            ValueKind::Integer => "integer",
            ValueKind::Multiplicity => "multiplicity",
            ValueKind::Point => "point",
            ValueKind::String => "string",
            ValueKind::TimePeriod => "time period",
            ValueKind::TimeStamp => "timestamp",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Component value types
// ============================================================================

/// Payload of a blob value.
///
/// `Deferred` records a locator instead of bytes; resolving it is the
/// caller's concern (the probe never fetches).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum BlobPayload {
    Text { text: String },
    Bytes { bytes: Vec<u8> },
    Deferred { load_from: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobValue {
    pub mime: String,
    pub payload: BlobPayload,
}

impl BlobValue {
    pub fn text(mime: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            payload: BlobPayload::Text { text: text.into() },
        }
    }

    pub fn bytes(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            payload: BlobPayload::Bytes { bytes },
        }
    }

    pub fn deferred(mime: impl Into<String>, load_from: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            payload: BlobPayload::Deferred {
                load_from: load_from.into(),
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            BlobPayload::Text { text } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

/// A monetary amount: ISO 4217 code plus minor units (two decimal places).
///
/// Canonical text form: `USD 12.34` (negative amounts as `USD -12.34`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyValue {
    pub code: String,
    pub minor_units: i64,
}

impl CurrencyValue {
    pub fn new(code: impl Into<String>, minor_units: i64) -> Self {
        Self {
            code: code.into(),
            minor_units,
        }
    }
}

impl fmt::Display for CurrencyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let abs = self.minor_units.unsigned_abs();
        write!(f, "{} {}{}.{:02}", self.code, sign, abs / 100, abs % 100)
    }
}

impl FromStr for CurrencyValue {
    type Err = ValueTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn decimal(input: &str) -> IResult<&str, i64> {
            let (input, neg) = opt(pchar('-'))(input)?;
            let (input, whole) = take_while1(|c: char| c.is_ascii_digit())(input)?;
            let (input, frac) = opt(preceded(
                pchar('.'),
                take_while_m_n(2, 2, |c: char| c.is_ascii_digit()),
            ))(input)?;
            let whole: i64 = whole.parse().unwrap_or(i64::MAX);
            let frac: i64 = frac.map(|f| f.parse().unwrap_or(0)).unwrap_or(0);
            let minor = whole.saturating_mul(100).saturating_add(frac);
            Ok((input, if neg.is_some() { -minor } else { minor }))
        }

        fn parser(input: &str) -> IResult<&str, CurrencyValue> {
            let (input, code) =
                take_while_m_n(3, 3, |c: char| c.is_ascii_uppercase())(input)?;
            let (input, _) = pchar(' ')(input)?;
            let (input, minor_units) = decimal(input)?;
            Ok((
                input,
                CurrencyValue {
                    code: code.to_string(),
                    minor_units,
                },
            ))
        }

        all_consuming(parser)(s.trim())
            .map(|(_, v)| v)
            .map_err(|_| ValueTextError::new("currency", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentValue {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointValue {
    pub x: f64,
    pub y: f64,
}

/// A key selected from an enumerated domain.
///
/// Construction goes through [`crate::EnumeratedDomain::select`]; the bare
/// constructor exists for deserialization paths that re-validate against the
/// data type later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumeratedValue {
    pub key: String,
}

impl EnumeratedValue {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl fmt::Display for EnumeratedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// How many participants a role admits.
///
/// `max == None` is unbounded; canonical text form `0..N`, `1..1`, `0..5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultiplicityValue {
    min: u32,
    max: Option<u32>,
}

impl MultiplicityValue {
    pub const ZERO_TO_N: Self = Self { min: 0, max: None };
    pub const ONE_TO_N: Self = Self { min: 1, max: None };
    pub const ZERO_TO_ONE: Self = Self {
        min: 0,
        max: Some(1),
    };
    pub const ONE_TO_ONE: Self = Self {
        min: 1,
        max: Some(1),
    };

    pub fn new(min: u32, max: Option<u32>) -> Result<Self, ValueTextError> {
        if let Some(max) = max {
            if max < min {
                return Err(ValueTextError::new("multiplicity", format!("{min}..{max}")));
            }
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    /// `None` means unbounded.
    pub fn max(&self) -> Option<u32> {
        self.max
    }
}

impl fmt::Display for MultiplicityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..N", self.min),
        }
    }
}

impl FromStr for MultiplicityValue {
    type Err = ValueTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        fn bound(input: &str) -> IResult<&str, Option<u32>> {
            alt((
                map(tag("N"), |_| None),
                map_res(take_while1(|c: char| c.is_ascii_digit()), |d: &str| {
                    d.parse::<u32>().map(Some)
                }),
            ))(input)
        }

        fn parser(input: &str) -> IResult<&str, (Option<u32>, Option<u32>)> {
            let (input, min) = bound(input)?;
            let (input, _) = tag("..")(input)?;
            let (input, max) = bound(input)?;
            Ok((input, (min, max)))
        }

        let (min, max) = all_consuming(parser)(s.trim())
            .map(|(_, v)| v)
            .map_err(|_| ValueTextError::new("multiplicity", s))?;
        // `N` is only meaningful as an upper bound.
        let min = min.ok_or_else(|| ValueTextError::new("multiplicity", s))?;
        Self::new(min, max).map_err(|_| ValueTextError::new("multiplicity", s))
    }
}

/// A duration broken into calendar fields, as external documents state it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePeriodValue {
    pub years: u16,
    pub months: u8,
    pub days: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: f32,
}

impl fmt::Display for TimePeriodValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P{}Y{}M{}DT{}H{}M{}S",
            self.years, self.months, self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// A UTC instant. Canonical text form is RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeStampValue(DateTime<Utc>);

impl TimeStampValue {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Build from broken-out fields. Seconds may carry a fraction and may
    /// reach into the leap-second range (up to but excluding 63).
    pub fn from_fields(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f32,
    ) -> Result<Self, ValueTextError> {
        let err = || {
            ValueTextError::new(
                "timestamp",
                format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second}"),
            )
        };
        if !(0.0..63.0).contains(&second) {
            return Err(err());
        }
        let whole = second as u32;
        let millis = ((second - whole as f32) * 1000.0).round() as i64;
        // chrono rejects leap seconds in `with_ymd_and_hms`; fold the
        // overflow into an explicit offset instead.
        let (clamped, carry) = if whole > 59 { (59, whole - 59) } else { (whole, 0) };
        let base = Utc
            .with_ymd_and_hms(year, month, day, hour, minute, clamped)
            .single()
            .ok_or_else(err)?;
        Ok(Self(
            base + Duration::seconds(i64::from(carry)) + Duration::milliseconds(millis),
        ))
    }

    pub fn from_rfc3339(text: &str) -> Result<Self, ValueTextError> {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|t| Self(t.with_timezone(&Utc)))
            .map_err(|_| ValueTextError::new("timestamp", text))
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

impl fmt::Display for TimeStampValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

// ============================================================================
// PropertyValue
// ============================================================================

/// A value held in a mesh object's property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PropertyValue {
    Blob(BlobValue),
    Boolean(bool),
    Color(ColorValue),
    Currency(CurrencyValue),
    Enumerated(EnumeratedValue),
    Extent(ExtentValue),
    Float(f64),
    Integer(i64),
    Multiplicity(MultiplicityValue),
    Point(PointValue),
    String(String),
    TimePeriod(TimePeriodValue),
    TimeStamp(TimeStampValue),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Blob(_) => ValueKind::Blob,
            PropertyValue::Boolean(_) => ValueKind::Boolean,
            PropertyValue::Color(_) => ValueKind::Color,
            PropertyValue::Currency(_) => ValueKind::Currency,
            PropertyValue::Enumerated(_) => ValueKind::Enumerated,
            PropertyValue::Extent(_) => ValueKind::Extent,
            PropertyValue::Float(_) => ValueKind::Float,
            PropertyValue::Integer(_) => ValueKind::Integer,
            PropertyValue::Multiplicity(_) => ValueKind::Multiplicity,
            PropertyValue::Point(_) => ValueKind::Point,
            PropertyValue::String(_) => ValueKind::String,
            PropertyValue::TimePeriod(_) => ValueKind::TimePeriod,
            PropertyValue::TimeStamp(_) => ValueKind::TimeStamp,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_text_form_round_trips() {
        let v = CurrencyValue::new("USD", 1234);
        assert_eq!(v.to_string(), "USD 12.34");
        assert_eq!("USD 12.34".parse::<CurrencyValue>().unwrap(), v);

        let neg = CurrencyValue::new("EUR", -507);
        assert_eq!(neg.to_string(), "EUR -5.07");
        assert_eq!("EUR -5.07".parse::<CurrencyValue>().unwrap(), neg);
    }

    #[test]
    fn currency_rejects_malformed_literals() {
        assert!("usd 1.00".parse::<CurrencyValue>().is_err());
        assert!("USD".parse::<CurrencyValue>().is_err());
        assert!("USD 1.2".parse::<CurrencyValue>().is_err());
        assert!("USD 1.234".parse::<CurrencyValue>().is_err());
    }

    #[test]
    fn multiplicity_text_form_round_trips() {
        assert_eq!(
            "0..N".parse::<MultiplicityValue>().unwrap(),
            MultiplicityValue::ZERO_TO_N
        );
        assert_eq!(
            "1..1".parse::<MultiplicityValue>().unwrap(),
            MultiplicityValue::ONE_TO_ONE
        );
        let bounded = MultiplicityValue::new(2, Some(7)).unwrap();
        assert_eq!(bounded.to_string(), "2..7");
        assert_eq!("2..7".parse::<MultiplicityValue>().unwrap(), bounded);
    }

    #[test]
    fn multiplicity_rejects_inverted_bounds_and_unbounded_min() {
        assert!(MultiplicityValue::new(3, Some(1)).is_err());
        assert!("N..1".parse::<MultiplicityValue>().is_err());
        assert!("1..".parse::<MultiplicityValue>().is_err());
    }

    #[test]
    fn timestamp_handles_fraction_and_leap_second() {
        let t = TimeStampValue::from_fields(2024, 2, 29, 23, 59, 30.25).unwrap();
        assert_eq!(t.to_rfc3339(), "2024-02-29T23:59:30.250Z");

        // Leap-second range folds over into the next minute.
        let leap = TimeStampValue::from_fields(2016, 12, 31, 23, 59, 60.0).unwrap();
        assert_eq!(leap.to_rfc3339(), "2017-01-01T00:00:00.000Z");

        assert!(TimeStampValue::from_fields(2016, 12, 31, 23, 59, 63.0).is_err());
        assert!(TimeStampValue::from_fields(2016, 13, 1, 0, 0, 0.0).is_err());
    }
}
