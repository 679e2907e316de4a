//! Field value types for mapped instances

use super::instance::InstanceId;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Native scalar held by a literal-backed field
///
/// Supports:
/// - String (optionally language tagged)
/// - Integer (i64, every xsd integer type)
/// - Decimal / Double (f64)
/// - Boolean
/// - Date and DateTime (chrono)
/// - Iri (resource-valued fields)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    String(String),
    LangString { value: String, language: String },
    Integer(i64),
    Decimal(f64),
    Double(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Iri(String),
}

impl ScalarValue {
    /// Get string value (plain, language tagged or IRI)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) | ScalarValue::Iri(s) => Some(s),
            ScalarValue::LangString { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ScalarValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get a float for any numeric value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ScalarValue::Decimal(f) | ScalarValue::Double(f) => Some(*f),
            ScalarValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ScalarValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get date value if this is a date
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            ScalarValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Get datetime value if this is a datetime
    pub fn as_datetime(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            ScalarValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarValue::String(_) => "String",
            ScalarValue::LangString { .. } => "LangString",
            ScalarValue::Integer(_) => "Integer",
            ScalarValue::Decimal(_) => "Decimal",
            ScalarValue::Double(_) => "Double",
            ScalarValue::Boolean(_) => "Boolean",
            ScalarValue::Date(_) => "Date",
            ScalarValue::DateTime(_) => "DateTime",
            ScalarValue::Iri(_) => "Iri",
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => write!(f, "\"{}\"", s),
            ScalarValue::LangString { value, language } => write!(f, "\"{}\"@{}", value, language),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Decimal(d) | ScalarValue::Double(d) => write!(f, "{}", d),
            ScalarValue::Boolean(b) => write!(f, "{}", b),
            ScalarValue::Date(d) => write!(f, "{}", d),
            ScalarValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            ScalarValue::Iri(iri) => write!(f, "<{}>", iri),
        }
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::String(s)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_string())
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        ScalarValue::Integer(i)
    }
}

impl From<i32> for ScalarValue {
    fn from(i: i32) -> Self {
        ScalarValue::Integer(i as i64)
    }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self {
        ScalarValue::Double(f)
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Boolean(b)
    }
}

impl From<NaiveDate> for ScalarValue {
    fn from(d: NaiveDate) -> Self {
        ScalarValue::Date(d)
    }
}

impl From<DateTime<FixedOffset>> for ScalarValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        ScalarValue::DateTime(dt)
    }
}

/// Value of one instance field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Literal-backed value
    Scalar(ScalarValue),
    /// Reference to another instance in the same graph
    Object(InstanceId),
    /// Repeated field
    List(Vec<FieldValue>),
    /// Opaque value handed to a custom field serializer
    Raw(serde_json::Value),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<InstanceId> {
        match self {
            FieldValue::Object(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&serde_json::Value> {
        match self {
            FieldValue::Raw(v) => Some(v),
            _ => None,
        }
    }

    /// The value viewed as a sequence: lists yield their items, anything
    /// else yields itself once
    pub fn items(&self) -> &[FieldValue] {
        match self {
            FieldValue::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }
}

impl From<ScalarValue> for FieldValue {
    fn from(value: ScalarValue) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Scalar(s.into())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Scalar(s.into())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Scalar(i.into())
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Scalar(f.into())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Scalar(b.into())
    }
}

impl From<InstanceId> for FieldValue {
    fn from(id: InstanceId) -> Self {
        FieldValue::Object(id)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::List(items)
    }
}
