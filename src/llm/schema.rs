//! Declarative response schemas and the generic validator that checks them.
//!
//! Each call kind owns one descriptor. The same descriptor is rendered into
//! the backend's `responseSchema` and used to validate what comes back, so
//! the two cannot drift apart.

use serde_json::{Value, json};

use super::CallKind;
use crate::error::SchemaViolation;
use crate::profile::model::{COORDINATE_MAX, COORDINATE_MIN, TRAJECTORY_LEN};
use crate::quiz::model::OPTION_COUNT;
use crate::roadmap::model::ROADMAP_LEN;

/// Allowed item count for an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    NonEmpty,
    Exactly(usize),
}

impl Length {
    fn admits(&self, n: usize) -> bool {
        match self {
            Self::NonEmpty => n > 0,
            Self::Exactly(expected) => n == *expected,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::NonEmpty => "at least 1".to_string(),
            Self::Exactly(n) => format!("exactly {n}"),
        }
    }
}

/// A field of an object schema. Every field is required; null counts as
/// missing.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
}

impl Field {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self { name, schema }
    }
}

/// Shape descriptor for a JSON value.
#[derive(Debug, Clone)]
pub enum Schema {
    String,
    Number { min: Option<f64>, max: Option<f64> },
    Integer { min: Option<i64>, max: Option<i64> },
    Enum(&'static [&'static str]),
    Array { items: Box<Schema>, len: Length },
    Object(Vec<Field>),
}

impl Schema {
    pub fn array(items: Schema, len: Length) -> Self {
        Self::Array {
            items: Box::new(items),
            len,
        }
    }

    /// Validate `value` against this schema. Reports the first violation.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.check(value, "$")
    }

    fn check(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        match self {
            Self::String => {
                value.as_str().ok_or_else(|| wrong_type(path, "string", value))?;
            }
            Self::Number { min, max } => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| wrong_type(path, "number", value))?;
                check_range(path, n, min.unwrap_or(f64::MIN), max.unwrap_or(f64::MAX))?;
            }
            Self::Integer { min, max } => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| wrong_type(path, "integer", value))?;
                let (lo, hi) = (min.unwrap_or(i64::MIN), max.unwrap_or(i64::MAX));
                if n < lo || n > hi {
                    return Err(SchemaViolation::OutOfRange {
                        path: path.to_string(),
                        value: n as f64,
                        min: lo as f64,
                        max: hi as f64,
                    });
                }
            }
            Self::Enum(allowed) => {
                let s = value
                    .as_str()
                    .ok_or_else(|| wrong_type(path, "string", value))?;
                if !allowed.contains(&s) {
                    return Err(SchemaViolation::NotAllowed {
                        path: path.to_string(),
                        value: s.to_string(),
                        allowed: allowed.iter().map(|a| a.to_string()).collect(),
                    });
                }
            }
            Self::Array { items, len } => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| wrong_type(path, "array", value))?;
                if !len.admits(arr.len()) {
                    return Err(SchemaViolation::WrongLength {
                        path: path.to_string(),
                        expected: len.describe(),
                        found: arr.len(),
                    });
                }
                for (i, item) in arr.iter().enumerate() {
                    items.check(item, &format!("{path}[{i}]"))?;
                }
            }
            Self::Object(fields) => {
                let obj = value
                    .as_object()
                    .ok_or_else(|| wrong_type(path, "object", value))?;
                for field in fields {
                    let field_path = format!("{path}.{}", field.name);
                    match obj.get(field.name) {
                        Some(Value::Null) | None => {
                            return Err(SchemaViolation::MissingField { path: field_path });
                        }
                        Some(v) => field.schema.check(v, &field_path)?,
                    }
                }
            }
        }
        Ok(())
    }

    /// Render as a Gemini `responseSchema` (OpenAPI subset).
    pub fn to_response_schema(&self) -> Value {
        match self {
            Self::String => json!({ "type": "STRING" }),
            Self::Number { min, max } => {
                let mut schema = json!({ "type": "NUMBER" });
                if let Some(min) = min {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    schema["maximum"] = json!(max);
                }
                schema
            }
            Self::Integer { min, max } => {
                let mut schema = json!({ "type": "INTEGER" });
                if let Some(min) = min {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    schema["maximum"] = json!(max);
                }
                schema
            }
            Self::Enum(allowed) => json!({ "type": "STRING", "enum": allowed }),
            Self::Array { items, len } => {
                let mut schema = json!({ "type": "ARRAY", "items": items.to_response_schema() });
                match len {
                    Length::NonEmpty => schema["minItems"] = json!(1),
                    Length::Exactly(n) => {
                        schema["minItems"] = json!(n);
                        schema["maxItems"] = json!(n);
                    }
                }
                schema
            }
            Self::Object(fields) => {
                let properties: serde_json::Map<String, Value> = fields
                    .iter()
                    .map(|f| (f.name.to_string(), f.schema.to_response_schema()))
                    .collect();
                let names: Vec<&str> = fields.iter().map(|f| f.name).collect();
                json!({
                    "type": "OBJECT",
                    "properties": properties,
                    "required": names,
                    "propertyOrdering": names,
                })
            }
        }
    }
}

fn check_range(path: &str, value: f64, min: f64, max: f64) -> Result<(), SchemaViolation> {
    if value < min || value > max {
        return Err(SchemaViolation::OutOfRange {
            path: path.to_string(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn wrong_type(path: &str, expected: &'static str, found: &Value) -> SchemaViolation {
    SchemaViolation::WrongType {
        path: path.to_string(),
        expected,
        found: json_type_name(found),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Risk classifications accepted from ANALYZE_PROFILE.
pub const THREAT_LEVELS: &[&str] = &["LOW", "MEDIUM", "HIGH"];

/// The response descriptor for a call kind.
pub fn descriptor(kind: CallKind) -> Schema {
    match kind {
        CallKind::AnalyzeProfile => {
            let coordinate = || Schema::Number {
                min: Some(COORDINATE_MIN),
                max: Some(COORDINATE_MAX),
            };
            Schema::Object(vec![
                Field::required("summary", Schema::String),
                Field::required("constellationName", Schema::String),
                Field::required("threatLevel", Schema::Enum(THREAT_LEVELS)),
                Field::required(
                    "coordinates",
                    Schema::array(
                        Schema::Object(vec![
                            Field::required("x", coordinate()),
                            Field::required("y", coordinate()),
                        ]),
                        Length::Exactly(TRAJECTORY_LEN),
                    ),
                ),
            ])
        }
        CallKind::GenerateQuiz => Schema::array(
            Schema::Object(vec![
                Field::required("question", Schema::String),
                Field::required(
                    "options",
                    Schema::array(Schema::String, Length::Exactly(OPTION_COUNT)),
                ),
                Field::required(
                    "correctIndex",
                    Schema::Integer {
                        min: Some(0),
                        max: Some(OPTION_COUNT as i64 - 1),
                    },
                ),
            ]),
            Length::NonEmpty,
        ),
        CallKind::GenerateRoadmap => Schema::array(
            Schema::Object(vec![
                Field::required("phase", Schema::String),
                Field::required("instruction", Schema::String),
                Field::required("objective", Schema::String),
            ]),
            Length::Exactly(ROADMAP_LEN),
        ),
    }
}
