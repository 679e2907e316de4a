//! Literal codec
//!
//! Converts between RDF literals (lexical form + datatype IRI + optional
//! language tag) and [`ScalarValue`]s, in both directions.
//!
//! # Datatype compatibility
//!
//! When decoding, a literal is accepted for a declared datatype if:
//! - the datatypes are identical,
//! - both are integer types (`xsd:int` into `xsd:integer` and back),
//! - the declared type is decimal/double/float and the literal is numeric,
//! - both are textual (`xsd:string`, `rdf:langString`, `xsd:anyURI`).
//!
//! A strict codec only accepts identical datatypes.

use super::value::ScalarValue;
use crate::rdf::vocab::{rdf, xsd};
use crate::rdf::{Literal, NamedNode};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone};
use thiserror::Error;

/// Codec errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Literal datatype not acceptable for the declared datatype
    #[error("expected {expected}, found literal of type {found}")]
    DatatypeMismatch { expected: String, found: String },

    /// Lexical form does not parse as the declared datatype
    #[error("invalid lexical form {lexical:?} for {datatype}")]
    InvalidLexical { lexical: String, datatype: String },

    /// Native value cannot be written with the declared datatype
    #[error("cannot encode {value_type} value as {datatype}")]
    Unencodable {
        value_type: &'static str,
        datatype: String,
    },

    /// Language tag rejected
    #[error("invalid language tag: {0}")]
    InvalidLanguage(String),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Literal datatypes understood by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XsdType {
    String,
    LangString,
    AnyUri,
    Boolean,
    Integer,
    Int,
    Long,
    Short,
    Byte,
    NonNegativeInteger,
    PositiveInteger,
    Decimal,
    Double,
    Float,
    Date,
    DateTime,
}

impl XsdType {
    /// Datatype IRI
    pub fn iri(self) -> &'static str {
        match self {
            XsdType::String => xsd::STRING,
            XsdType::LangString => rdf::LANG_STRING,
            XsdType::AnyUri => xsd::ANY_URI,
            XsdType::Boolean => xsd::BOOLEAN,
            XsdType::Integer => xsd::INTEGER,
            XsdType::Int => xsd::INT,
            XsdType::Long => xsd::LONG,
            XsdType::Short => xsd::SHORT,
            XsdType::Byte => xsd::BYTE,
            XsdType::NonNegativeInteger => xsd::NON_NEGATIVE_INTEGER,
            XsdType::PositiveInteger => xsd::POSITIVE_INTEGER,
            XsdType::Decimal => xsd::DECIMAL,
            XsdType::Double => xsd::DOUBLE,
            XsdType::Float => xsd::FLOAT,
            XsdType::Date => xsd::DATE,
            XsdType::DateTime => xsd::DATE_TIME,
        }
    }

    /// Look up a datatype by IRI
    pub fn from_iri(iri: &str) -> Option<Self> {
        const ALL: [XsdType; 16] = [
            XsdType::String,
            XsdType::LangString,
            XsdType::AnyUri,
            XsdType::Boolean,
            XsdType::Integer,
            XsdType::Int,
            XsdType::Long,
            XsdType::Short,
            XsdType::Byte,
            XsdType::NonNegativeInteger,
            XsdType::PositiveInteger,
            XsdType::Decimal,
            XsdType::Double,
            XsdType::Float,
            XsdType::Date,
            XsdType::DateTime,
        ];
        ALL.into_iter().find(|t| t.iri() == iri)
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            XsdType::Integer
                | XsdType::Int
                | XsdType::Long
                | XsdType::Short
                | XsdType::Byte
                | XsdType::NonNegativeInteger
                | XsdType::PositiveInteger
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || matches!(self, XsdType::Decimal | XsdType::Double | XsdType::Float)
    }

    pub fn is_textual(self) -> bool {
        matches!(self, XsdType::String | XsdType::LangString | XsdType::AnyUri)
    }
}

/// Bidirectional literal ↔ scalar conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralCodec {
    strict: bool,
}

impl LiteralCodec {
    /// Create a codec; `strict` disables datatype widening
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Check whether a literal typed `found` may populate a `declared` field
    pub fn is_compatible(&self, declared: XsdType, found: &str) -> bool {
        if declared.iri() == found {
            return true;
        }
        if self.strict {
            return false;
        }
        match XsdType::from_iri(found) {
            Some(found) if declared.is_integer() => found.is_integer(),
            Some(found) if declared.is_numeric() => found.is_numeric(),
            Some(found) if declared.is_textual() => found.is_textual(),
            _ => false,
        }
    }

    /// Decode a literal as the declared datatype
    pub fn decode(&self, literal: &Literal, declared: XsdType) -> CodecResult<ScalarValue> {
        let found = literal.datatype_iri();
        if !self.is_compatible(declared, found) {
            return Err(CodecError::DatatypeMismatch {
                expected: declared.iri().to_string(),
                found: found.to_string(),
            });
        }

        let lexical = literal.value();
        let invalid = || CodecError::InvalidLexical {
            lexical: lexical.to_string(),
            datatype: declared.iri().to_string(),
        };

        let value = match declared {
            XsdType::String | XsdType::LangString | XsdType::AnyUri => match literal.language() {
                Some(language) => ScalarValue::LangString {
                    value: lexical.to_string(),
                    language: language.to_string(),
                },
                None => ScalarValue::String(lexical.to_string()),
            },
            XsdType::Boolean => match lexical.trim() {
                "true" | "1" => ScalarValue::Boolean(true),
                "false" | "0" => ScalarValue::Boolean(false),
                _ => return Err(invalid()),
            },
            t if t.is_integer() => {
                let value = parse_integer(lexical).ok_or_else(invalid)?;
                if !integer_in_range(t, value) {
                    return Err(invalid());
                }
                ScalarValue::Integer(value)
            }
            XsdType::Decimal => ScalarValue::Decimal(parse_float(lexical).ok_or_else(invalid)?),
            XsdType::Double | XsdType::Float => {
                ScalarValue::Double(parse_float(lexical).ok_or_else(invalid)?)
            }
            XsdType::Date => ScalarValue::Date(parse_date(lexical).ok_or_else(invalid)?),
            XsdType::DateTime => {
                ScalarValue::DateTime(parse_datetime(lexical).ok_or_else(invalid)?)
            }
            _ => return Err(invalid()),
        };
        Ok(value)
    }

    /// Encode a value as a literal of the declared datatype
    ///
    /// `language` applies to string values only.
    pub fn encode(
        &self,
        value: &ScalarValue,
        declared: XsdType,
        language: Option<&str>,
    ) -> CodecResult<Literal> {
        let unencodable = || CodecError::Unencodable {
            value_type: value.type_name(),
            datatype: declared.iri().to_string(),
        };

        match (declared, value) {
            (_, ScalarValue::LangString { value, language }) if declared.is_textual() => {
                tagged(value, language)
            }
            (XsdType::String, ScalarValue::String(s) | ScalarValue::Iri(s)) => match language {
                Some(language) => tagged(s, language),
                None => Ok(Literal::new_simple_literal(s.as_str())),
            },
            (XsdType::LangString, ScalarValue::String(s)) => match language {
                Some(language) => tagged(s, language),
                None => Err(unencodable()),
            },
            (XsdType::AnyUri, ScalarValue::String(s) | ScalarValue::Iri(s)) => {
                typed(s.clone(), declared)
            }
            (XsdType::Boolean, ScalarValue::Boolean(b)) => typed(b.to_string(), declared),
            (t, ScalarValue::Integer(i)) if t.is_integer() => {
                if !integer_in_range(t, *i) {
                    return Err(unencodable());
                }
                typed(i.to_string(), declared)
            }
            (XsdType::Decimal, ScalarValue::Integer(i)) => typed(i.to_string(), declared),
            (XsdType::Decimal, ScalarValue::Decimal(f) | ScalarValue::Double(f)) => {
                if !f.is_finite() {
                    return Err(unencodable());
                }
                typed(f.to_string(), declared)
            }
            (XsdType::Double | XsdType::Float, ScalarValue::Integer(i)) => {
                typed(i.to_string(), declared)
            }
            (XsdType::Double | XsdType::Float, ScalarValue::Decimal(f) | ScalarValue::Double(f)) => {
                typed(format_double(*f), declared)
            }
            (XsdType::Date, ScalarValue::Date(d)) => {
                typed(d.format("%Y-%m-%d").to_string(), declared)
            }
            (XsdType::DateTime, ScalarValue::DateTime(dt)) => {
                typed(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true), declared)
            }
            _ => Err(unencodable()),
        }
    }
}

fn tagged(value: &str, language: &str) -> CodecResult<Literal> {
    Literal::new_language_tagged_literal(value, language)
        .map_err(|_| CodecError::InvalidLanguage(language.to_string()))
}

fn typed(lexical: String, datatype: XsdType) -> CodecResult<Literal> {
    let iri = NamedNode::new(datatype.iri()).map_err(|e| CodecError::Unencodable {
        value_type: "datatype",
        datatype: e.to_string(),
    })?;
    Ok(Literal::new_typed_literal(lexical, iri))
}

fn parse_integer(lexical: &str) -> Option<i64> {
    let trimmed = lexical.trim();
    trimmed.strip_prefix('+').unwrap_or(trimmed).parse().ok()
}

fn integer_in_range(datatype: XsdType, value: i64) -> bool {
    match datatype {
        XsdType::Int => i32::try_from(value).is_ok(),
        XsdType::Short => i16::try_from(value).is_ok(),
        XsdType::Byte => i8::try_from(value).is_ok(),
        XsdType::NonNegativeInteger => value >= 0,
        XsdType::PositiveInteger => value > 0,
        _ => true,
    }
}

fn parse_float(lexical: &str) -> Option<f64> {
    match lexical.trim() {
        "INF" | "+INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}

fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "INF" } else { "-INF" }.to_string()
    } else {
        value.to_string()
    }
}

fn parse_date(lexical: &str) -> Option<NaiveDate> {
    let trimmed = lexical.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        // timezone suffixes ("Z", "+02:00") carry no date information
        .or_else(|| trimmed.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

fn parse_datetime(lexical: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = lexical.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt);
    }
    // no timezone: read as UTC
    let naive = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    FixedOffset::east_opt(0).map(|utc| utc.from_utc_datetime(&naive))
}
