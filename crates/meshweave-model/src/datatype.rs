//! Data types and value validation.

use crate::value::{PropertyValue, ValueKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A value that failed validation against a [`DataType`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValueError {
    #[error("expected a {expected} value, got a {actual} value")]
    KindMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("integer {value} outside the declared range")]
    IntegerOutOfRange { value: i64 },
    #[error("float {value} outside the declared range")]
    FloatOutOfRange { value: f64 },
    #[error("unknown key `{key}` for enumerated domain")]
    UnknownEnumeratedValue { key: String },
    #[error("an enumerated domain must declare at least one value")]
    EmptyEnumeratedDomain,
}

/// One admissible key of an enumerated domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub key: String,
    pub user_name: Option<String>,
}

impl EnumValue {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            user_name: None,
        }
    }

    pub fn with_user_name(key: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            user_name: Some(user_name.into()),
        }
    }
}

/// The closed, ordered key set of an enumerated data type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumeratedDomain {
    values: Vec<EnumValue>,
}

impl EnumeratedDomain {
    pub fn new(values: Vec<EnumValue>) -> Result<Self, ValueError> {
        if values.is_empty() {
            return Err(ValueError::EmptyEnumeratedDomain);
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.iter().any(|v| v.key == key)
    }

    /// Resolve a key to a value of this domain.
    pub fn select(&self, key: &str) -> Result<crate::value::EnumeratedValue, ValueError> {
        if self.contains(key) {
            Ok(crate::value::EnumeratedValue::new(key))
        } else {
            Err(ValueError::UnknownEnumeratedValue {
                key: key.to_string(),
            })
        }
    }
}

/// The declared type of a property.
///
/// Each variant admits exactly one [`ValueKind`]; some carry extra
/// constraints checked by [`DataType::accepts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataType {
    Blob {
        /// Mime type assumed when a document does not state one.
        default_mime: Option<String>,
    },
    Boolean,
    Color,
    Currency,
    Enumerated(EnumeratedDomain),
    Extent,
    Float {
        min: Option<f64>,
        max: Option<f64>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Multiplicity,
    Point,
    String,
    TimePeriod,
    TimeStamp,
}

impl DataType {
    /// Unconstrained variants, spelled as constants for declaration sites.
    pub const ANY_BLOB: DataType = DataType::Blob { default_mime: None };
    pub const ANY_FLOAT: DataType = DataType::Float {
        min: None,
        max: None,
    };
    pub const ANY_INTEGER: DataType = DataType::Integer {
        min: None,
        max: None,
    };

    pub fn kind(&self) -> ValueKind {
        match self {
            DataType::Blob { .. } => ValueKind::Blob,
            DataType::Boolean => ValueKind::Boolean,
            DataType::Color => ValueKind::Color,
            DataType::Currency => ValueKind::Currency,
            DataType::Enumerated(_) => ValueKind::Enumerated,
            DataType::Extent => ValueKind::Extent,
            DataType::Float { .. } => ValueKind::Float,
            DataType::Integer { .. } => ValueKind::Integer,
            DataType::Multiplicity => ValueKind::Multiplicity,
            DataType::Point => ValueKind::Point,
            DataType::String => ValueKind::String,
            DataType::TimePeriod => ValueKind::TimePeriod,
            DataType::TimeStamp => ValueKind::TimeStamp,
        }
    }

    pub fn enumerated_domain(&self) -> Option<&EnumeratedDomain> {
        match self {
            DataType::Enumerated(domain) => Some(domain),
            _ => None,
        }
    }

    /// Validate a value against this data type.
    pub fn accepts(&self, value: &PropertyValue) -> Result<(), ValueError> {
        if self.kind() != value.kind() {
            return Err(ValueError::KindMismatch {
                expected: self.kind(),
                actual: value.kind(),
            });
        }
        match (self, value) {
            (DataType::Integer { min, max }, PropertyValue::Integer(v)) => {
                if min.map_or(false, |m| *v < m) || max.map_or(false, |m| *v > m) {
                    return Err(ValueError::IntegerOutOfRange { value: *v });
                }
            }
            (DataType::Float { min, max }, PropertyValue::Float(v)) => {
                if min.map_or(false, |m| *v < m) || max.map_or(false, |m| *v > m) {
                    return Err(ValueError::FloatOutOfRange { value: *v });
                }
            }
            (DataType::Enumerated(domain), PropertyValue::Enumerated(v)) => {
                if !domain.contains(&v.key) {
                    return Err(ValueError::UnknownEnumeratedValue { key: v.key.clone() });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::EnumeratedValue;

    #[test]
    fn accepts_checks_kind() {
        assert!(DataType::String
            .accepts(&PropertyValue::String("ok".into()))
            .is_ok());
        let err = DataType::String
            .accepts(&PropertyValue::Integer(1))
            .unwrap_err();
        assert!(matches!(err, ValueError::KindMismatch { .. }));
    }

    #[test]
    fn integer_bounds_are_enforced() {
        let dt = DataType::Integer {
            min: Some(0),
            max: Some(10),
        };
        assert!(dt.accepts(&PropertyValue::Integer(5)).is_ok());
        assert!(dt.accepts(&PropertyValue::Integer(-1)).is_err());
        assert!(dt.accepts(&PropertyValue::Integer(11)).is_err());
    }

    #[test]
    fn enumerated_domain_selects_and_rejects_keys() {
        let domain = EnumeratedDomain::new(vec![
            EnumValue::with_user_name("red", "Red"),
            EnumValue::new("green"),
        ])
        .unwrap();
        assert_eq!(domain.select("red").unwrap(), EnumeratedValue::new("red"));
        assert!(matches!(
            domain.select("blue"),
            Err(ValueError::UnknownEnumeratedValue { .. })
        ));

        let dt = DataType::Enumerated(domain);
        assert!(dt
            .accepts(&PropertyValue::Enumerated(EnumeratedValue::new("green")))
            .is_ok());
        assert!(dt
            .accepts(&PropertyValue::Enumerated(EnumeratedValue::new("blue")))
            .is_err());
        assert!(EnumeratedDomain::new(vec![]).is_err());
    }
}
