//! Record schema descriptors and save-time validation.
//!
//! Each survey record type is described by an explicit [`RecordSchema`]: an
//! ordered list of [`FieldSpec`]s carrying a tagged [`FieldType`] plus the
//! constraints checked before a record is stored (blankness, maximum length,
//! non-negative counters, decimal precision). Descriptors are built once at
//! start-up and never derived reflectively at call time.
//!
//! [`RecordSchema::clean`] is the validation pass the store runs before an
//! insert: it fills defaults, checks every field, and reports all problems
//! at once as [`ValidationErrors`].

use std::{collections::BTreeMap, fmt};

use heck::ToTitleCase;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{data::Value, error::ValidationErrors};

/// Converted cell values keyed by attribute name.
pub type Payload = BTreeMap<String, Value>;

/// Attribute values of a stored record; `None` is a null column.
pub type FieldValues = BTreeMap<String, Option<Value>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub model: String,
    pub key_field: String,
    pub key_type: Box<FieldType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Boolean,
    Integer,
    Float,
    Decimal { max_digits: u32, decimal_places: u32 },
    Date,
    Guid,
    ForeignKey(Relation),
}

impl FieldType {
    pub fn describe(&self) -> String {
        match self {
            FieldType::Text => "text".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Integer => "integer".to_string(),
            FieldType::Float => "float".to_string(),
            FieldType::Decimal {
                max_digits,
                decimal_places,
            } => format!("decimal({max_digits},{decimal_places})"),
            FieldType::Date => "date".to_string(),
            FieldType::Guid => "uuid".to_string(),
            FieldType::ForeignKey(relation) => {
                format!("{} -> {}.{}", relation.key_type.describe(), relation.model, relation.key_field)
            }
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldType,
    /// Empty text is accepted.
    pub blank: bool,
    /// A missing value is stored as null instead of failing validation.
    pub null: bool,
    pub primary_key: bool,
    pub max_length: Option<usize>,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    pub default: Option<Value>,
}

impl FieldSpec {
    fn new(name: &str, kind: FieldType) -> Self {
        Self {
            name: name.to_string(),
            kind,
            blank: false,
            null: false,
            primary_key: false,
            max_length: None,
            min_value: None,
            max_value: None,
            default: None,
        }
    }

    /// UUID primary key, generated when the upload does not provide one.
    pub fn uuid_key(name: &str) -> Self {
        let mut spec = Self::new(name, FieldType::Guid);
        spec.primary_key = true;
        spec
    }

    pub fn char(name: &str, max_length: usize) -> Self {
        let mut spec = Self::new(name, FieldType::Text);
        spec.max_length = Some(max_length);
        spec.default = Some(Value::String(String::new()));
        spec
    }

    pub fn text(name: &str) -> Self {
        let mut spec = Self::new(name, FieldType::Text);
        spec.default = Some(Value::String(String::new()));
        spec
    }

    /// Non-negative 32-bit counter defaulting to zero.
    pub fn positive_integer(name: &str) -> Self {
        let mut spec = Self::new(name, FieldType::Integer);
        spec.min_value = Some(0);
        spec.max_value = Some(i64::from(i32::MAX));
        spec.default = Some(Value::Integer(0));
        spec
    }

    pub fn decimal(name: &str, max_digits: u32, decimal_places: u32) -> Self {
        Self::new(
            name,
            FieldType::Decimal {
                max_digits,
                decimal_places,
            },
        )
        .nullable()
    }

    pub fn float(name: &str) -> Self {
        Self::new(name, FieldType::Float).nullable()
    }

    pub fn date(name: &str) -> Self {
        Self::new(name, FieldType::Date).nullable()
    }

    pub fn boolean(name: &str) -> Self {
        let mut spec = Self::new(name, FieldType::Boolean);
        spec.default = Some(Value::Boolean(false));
        spec
    }

    /// Reference to the primary key of `target`.
    pub fn foreign_key(name: &str, target: &RecordSchema) -> Self {
        let key = target.primary_key();
        Self::new(
            name,
            FieldType::ForeignKey(Relation {
                model: target.name.clone(),
                key_field: key.name.clone(),
                key_type: Box::new(key.kind.clone()),
            }),
        )
    }

    pub fn optional(mut self) -> Self {
        self.blank = true;
        self
    }

    fn nullable(mut self) -> Self {
        self.blank = true;
        self.null = true;
        self
    }

    pub fn is_foreign_key(&self) -> bool {
        matches!(self.kind, FieldType::ForeignKey(_))
    }

    pub fn relation(&self) -> Option<&Relation> {
        match &self.kind {
            FieldType::ForeignKey(relation) => Some(relation),
            _ => None,
        }
    }

    /// Human label, e.g. `total_area_ha` → `Total Area Ha`.
    pub fn label(&self) -> String {
        self.name.replace('_', " ").to_title_case()
    }

    /// Default value for a field the payload does not mention.
    fn initial_value(&self) -> Option<Value> {
        if self.primary_key && matches!(self.kind, FieldType::Guid) {
            return Some(Value::Guid(Uuid::new_v4()));
        }
        self.default.clone()
    }

    fn validate(&self, value: Option<&Value>, errors: &mut ValidationErrors) {
        let Some(value) = value else {
            if !self.null {
                errors.add(&self.name, "This field cannot be null.");
            }
            return;
        };
        match value {
            Value::String(text) => {
                if text.is_empty() && !self.blank {
                    errors.add(&self.name, "This field cannot be blank.");
                }
                if let Some(limit) = self.max_length {
                    let length = text.chars().count();
                    if length > limit {
                        errors.add(
                            &self.name,
                            format!(
                                "Ensure this value has at most {limit} characters (it has {length})."
                            ),
                        );
                    }
                }
            }
            Value::Integer(number) => {
                if let Some(min) = self.min_value.filter(|min| number < min) {
                    errors.add(
                        &self.name,
                        format!("Ensure this value is greater than or equal to {min}."),
                    );
                }
                if let Some(max) = self.max_value.filter(|max| number > max) {
                    errors.add(
                        &self.name,
                        format!("Ensure this value is less than or equal to {max}."),
                    );
                }
            }
            Value::Decimal(decimal) => {
                if let FieldType::Decimal {
                    max_digits,
                    decimal_places,
                } = self.kind
                {
                    validate_decimal(&self.name, decimal, max_digits, decimal_places, errors);
                }
            }
            _ => {}
        }
    }
}

/// Checks total digits, fractional digits, and whole digits of `value`.
fn validate_decimal(
    field: &str,
    value: &Decimal,
    max_digits: u32,
    decimal_places: u32,
    errors: &mut ValidationErrors,
) {
    let mantissa = value.mantissa().unsigned_abs().to_string();
    let digit_count = mantissa.len() as u32;
    let scale = value.scale();
    let (digits, decimals) = if scale > digit_count {
        (scale, scale)
    } else {
        (digit_count, scale)
    };
    let whole_digits = digits - decimals;

    if digits > max_digits {
        errors.add(
            field,
            format!("Ensure that there are no more than {max_digits} digits in total."),
        );
    }
    if decimals > decimal_places {
        errors.add(
            field,
            format!("Ensure that there are no more than {decimal_places} decimal places."),
        );
    }
    if whole_digits > max_digits.saturating_sub(decimal_places) {
        errors.add(
            field,
            format!(
                "Ensure that there are no more than {} digits before the decimal point.",
                max_digits.saturating_sub(decimal_places)
            ),
        );
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    /// Type name used in relation messages, e.g. `Farmer`.
    pub name: String,
    /// Lowercase human name, e.g. `crop history`.
    pub verbose_name: String,
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// Panics when `fields` lacks exactly one primary key; schemas are static.
    pub fn new(name: &str, verbose_name: &str, fields: Vec<FieldSpec>) -> Self {
        assert_eq!(
            fields.iter().filter(|field| field.primary_key).count(),
            1,
            "record schema {name} must declare exactly one primary key"
        );
        Self {
            name: name.to_string(),
            verbose_name: verbose_name.to_string(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn primary_key(&self) -> &FieldSpec {
        self.fields
            .iter()
            .find(|field| field.primary_key)
            .unwrap_or(&self.fields[0])
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.is_foreign_key())
    }

    /// Message raised when a primary key is already taken.
    pub fn duplicate_key_message(&self) -> String {
        let key = self.primary_key();
        format!(
            "{} with this {} already exists.",
            capitalize_first(&self.verbose_name),
            capitalize_first(&key.name.replace('_', " "))
        )
    }

    /// Fills defaults and validates every declared field of `payload`.
    ///
    /// Attributes the schema does not declare are ignored.
    pub fn clean(&self, mut payload: Payload) -> Result<FieldValues, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut values = FieldValues::new();
        for field in &self.fields {
            let value = payload
                .remove(&field.name)
                .or_else(|| field.initial_value());
            field.validate(value.as_ref(), &mut errors);
            values.insert(field.name.clone(), value);
        }
        errors.into_result().map(|()| values)
    }
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
