//! Typed cell values and the string → value converters used during import.
//!
//! Uploaded cells arrive as trimmed strings. [`parse_typed_value()`] turns one
//! into a [`Value`] according to the declared [`FieldType`] of the target
//! attribute. Tokens from the empty-value vocabulary ([`is_empty_value()`])
//! never reach the converters; callers treat them as "not provided".

use std::{fmt, str::FromStr, sync::OnceLock};

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ConversionError, schema::FieldType};

pub const EMPTY_TOKENS: &[&str] = &["", "na", "n/a", "null", "none", "nil", "nan"];
pub const BOOLEAN_TRUE: &[&str] = &["true", "1", "yes", "y", "t"];
pub const BOOLEAN_FALSE: &[&str] = &["false", "0", "no", "n", "f"];

/// Accepted layouts with the cell shape each one requires; years are always
/// four digits.
const DATE_FORMATS: &[(&str, &str)] = &[
    ("%Y-%m-%d", r"^\d{4}-\d{1,2}-\d{1,2}$"),
    ("%d-%m-%Y", r"^\d{1,2}-\d{1,2}-\d{4}$"),
    ("%d/%m/%Y", r"^\d{1,2}/\d{1,2}/\d{4}$"),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Decimal(Decimal),
    Boolean(bool),
    Date(NaiveDate),
    Guid(Uuid),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Value::Decimal(d) => d.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Guid(g) => g.to_string(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Returns true when a cell counts as "not provided".
pub fn is_empty_value(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(raw) => {
            let lowered = raw.trim().to_lowercase();
            EMPTY_TOKENS.contains(&lowered.as_str())
        }
    }
}

pub fn parse_boolean(value: &str) -> Result<bool, ConversionError> {
    let lowered = value.trim().to_lowercase();
    if BOOLEAN_TRUE.contains(&lowered.as_str()) {
        Ok(true)
    } else if BOOLEAN_FALSE.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(ConversionError::Boolean(value.to_string()))
    }
}

/// Parses a decimal, ignoring thousands separators.
pub fn parse_decimal(value: &str) -> Result<Decimal, ConversionError> {
    let cleaned = value.trim().replace(',', "");
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| ConversionError::Decimal(value.to_string()))
}

pub fn parse_integer(value: &str) -> Result<i64, ConversionError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConversionError::Integer(value.to_string()))
}

pub fn parse_float(value: &str) -> Result<f64, ConversionError> {
    let cleaned = value.trim().replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(ConversionError::Float(value.to_string())),
    }
}

fn date_shapes() -> &'static [Regex] {
    static SHAPES: OnceLock<Vec<Regex>> = OnceLock::new();
    SHAPES.get_or_init(|| {
        DATE_FORMATS
            .iter()
            .map(|(_, shape)| Regex::new(shape).expect("valid date pattern"))
            .collect()
    })
}

/// Tries each accepted date layout in order; the first match wins.
///
/// A layout only applies when the cell has its shape, so two-digit years
/// such as `15/11/23` are rejected instead of landing in year 23.
pub fn parse_date(value: &str) -> Result<NaiveDate, ConversionError> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .zip(date_shapes())
        .filter(|(_, shape)| shape.is_match(trimmed))
        .find_map(|((format, _), _)| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ConversionError::Date(value.to_string()))
}

pub fn parse_guid(value: &str) -> Result<Uuid, ConversionError> {
    let trimmed = value.trim().trim_matches(|c| matches!(c, '{' | '}'));
    Uuid::parse_str(trimmed).map_err(|_| ConversionError::Guid(value.to_string()))
}

/// Converts a raw cell into the value shape of `ty`.
///
/// For a foreign key this yields the referenced record's key, converted with
/// the key's own type; resolving it against the store is the caller's job.
pub fn parse_typed_value(value: &str, ty: &FieldType) -> Result<Value, ConversionError> {
    let parsed = match ty {
        FieldType::Text => Value::String(value.trim().to_string()),
        FieldType::Boolean => Value::Boolean(parse_boolean(value)?),
        FieldType::Integer => Value::Integer(parse_integer(value)?),
        FieldType::Float => Value::Float(parse_float(value)?),
        FieldType::Decimal { .. } => Value::Decimal(parse_decimal(value)?),
        FieldType::Date => Value::Date(parse_date(value)?),
        FieldType::Guid => Value::Guid(parse_guid(value)?),
        FieldType::ForeignKey(relation) => parse_typed_value(value, &relation.key_type)?,
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_vocabulary_is_case_and_whitespace_insensitive() {
        for token in ["", "  ", "NA", " n/a ", "Null", "NONE", "nil", "NaN"] {
            assert!(is_empty_value(Some(token)), "{token:?} should be empty");
        }
        assert!(is_empty_value(None));
        assert!(!is_empty_value(Some("0")));
        assert!(!is_empty_value(Some("nah")));
    }

    #[test]
    fn boolean_tokens_follow_declared_sets() {
        assert!(parse_boolean("Y").unwrap());
        assert!(parse_boolean("TRUE").unwrap());
        assert!(parse_boolean("t").unwrap());
        assert!(!parse_boolean("0").unwrap());
        assert!(!parse_boolean("No").unwrap());
        assert_eq!(
            parse_boolean("maybe"),
            Err(ConversionError::Boolean("maybe".to_string()))
        );
    }

    #[test]
    fn decimals_strip_thousands_separators() {
        assert_eq!(parse_decimal("1,234.50").unwrap(), Decimal::new(123450, 2));
        assert_eq!(parse_decimal("2.5").unwrap(), Decimal::new(25, 1));
        assert_eq!(parse_decimal("1e3").unwrap(), Decimal::new(1000, 0));
        assert!(parse_decimal("two").is_err());
    }

    #[test]
    fn integers_and_floats_reject_garbage() {
        assert_eq!(parse_integer("42").unwrap(), 42);
        assert_eq!(parse_integer("-3").unwrap(), -3);
        assert!(parse_integer("4.5").is_err());
        assert_eq!(parse_float("18.52").unwrap(), 18.52);
        assert_eq!(parse_float("1,000.5").unwrap(), 1000.5);
        assert!(parse_float("north").is_err());
        assert!(parse_float("inf").is_err());
    }

    #[test]
    fn dates_accept_three_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(parse_date("2024-01-31").unwrap(), expected);
        assert_eq!(parse_date("31-01-2024").unwrap(), expected);
        assert_eq!(parse_date("31/01/2024").unwrap(), expected);
        assert_eq!(
            parse_date("5/1/2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
        );
        assert!(parse_date("2024/13/40").is_err());
        assert!(parse_date("01/31/2024").is_err());
    }

    #[test]
    fn dates_with_short_years_are_rejected() {
        assert_eq!(
            parse_date("15/11/23"),
            Err(ConversionError::Date("15/11/23".to_string()))
        );
        assert!(parse_date("31-01-24").is_err());
        assert!(parse_date("15-11-23").is_err());
        assert!(parse_date("24-01-31").is_err());
        assert!(parse_date("124-01-31").is_err());
    }

    #[test]
    fn guids_tolerate_braces() {
        let raw = "550e8400-e29b-41d4-a716-446655440000";
        let expected = Uuid::parse_str(raw).unwrap();
        assert_eq!(parse_guid(raw).unwrap(), expected);
        assert_eq!(parse_guid(&format!("{{{raw}}}")).unwrap(), expected);
        assert!(parse_guid("not-a-guid").is_err());
    }

    #[test]
    fn whole_floats_display_without_fraction_inside_i64_range() {
        assert_eq!(Value::Float(42.0).as_display(), "42");
        assert_eq!(Value::Float(18.5).as_display(), "18.5");
        assert_eq!(Value::Float(1e20).as_display(), "100000000000000000000");
        assert_eq!(Value::Float(-1e20).as_display(), "-100000000000000000000");
    }

    #[test]
    fn text_passes_through_trimmed() {
        let parsed = parse_typed_value("  Solapur ", &FieldType::Text).unwrap();
        assert_eq!(parsed, Value::String("Solapur".to_string()));
    }
}
