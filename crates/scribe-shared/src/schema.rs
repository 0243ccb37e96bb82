//! Declarative JSON shapes.
//!
//! A [`Shape`] describes one JSON object: its fields, the rule each field must
//! satisfy and whether it may be omitted. The same declaration drives runtime
//! validation ([`Shape::validate`], [`Validated::from_json`]) and the OpenAPI
//! document emitted by the API server, so the two never drift apart.

use std::fmt;

use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::ValidateEmail;

/// Constraint applied to a single field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// A string whose character count lies in `min..=max`.
    Text { min: usize, max: Option<usize> },
    /// A syntactically valid email address.
    Email,
    /// A hyphenated UUID string.
    Uuid,
    /// An RFC 3339 timestamp.
    DateTime,
    /// A nested object.
    Object(&'static Shape),
    /// An array of objects.
    List(&'static Shape),
}

/// One named property of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub rule: Rule,
    pub required: bool,
    pub nullable: bool,
    pub description: Option<&'static str>,
}

impl Field {
    pub const fn required(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            required: true,
            nullable: false,
            description: None,
        }
    }

    pub const fn optional(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            required: false,
            nullable: false,
            description: None,
        }
    }

    /// Accept an explicit `null` in place of a value.
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }
}

/// A named JSON object description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub name: &'static str,
    pub fields: &'static [Field],
    /// Reject objects in which none of the declared fields is present.
    pub require_any: bool,
}

impl Shape {
    pub const fn object(name: &'static str, fields: &'static [Field]) -> Self {
        Self {
            name,
            fields,
            require_any: false,
        }
    }

    pub const fn require_any(mut self) -> Self {
        self.require_any = true;
        self
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check `value` against this shape, collecting every violation.
    ///
    /// Undeclared keys are ignored, and do not count towards `require_any`.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let violations = self.violations("", value);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    fn violations(&self, prefix: &str, value: &Value) -> Vec<Violation> {
        let Some(object) = value.as_object() else {
            return vec![Violation::new(prefix, "invalid_type", "Expected object")];
        };

        let mut violations = Vec::new();
        let mut present = 0usize;

        for field in self.fields {
            let path = join_path(prefix, field.name);
            match object.get(field.name) {
                None if field.required => {
                    violations.push(Violation::new(&path, "invalid_type", "Required"));
                }
                None => {}
                Some(Value::Null) if field.nullable => present += 1,
                Some(value) => {
                    present += 1;
                    violations.extend(field.rule.violations(&path, value));
                }
            }
        }

        if self.require_any && present == 0 {
            violations.push(Violation::new(
                prefix,
                "custom",
                "At least one field is required",
            ));
        }

        violations
    }
}

impl Rule {
    fn violations(&self, path: &str, value: &Value) -> Vec<Violation> {
        match self {
            Rule::Object(shape) => shape.violations(path, value),
            Rule::List(shape) => match value.as_array() {
                Some(items) => items
                    .iter()
                    .enumerate()
                    .flat_map(|(i, item)| shape.violations(&join_path(path, &i.to_string()), item))
                    .collect(),
                None => vec![Violation::new(path, "invalid_type", "Expected array")],
            },
            _ => {
                let Some(text) = value.as_str() else {
                    return vec![Violation::new(path, "invalid_type", "Expected string")];
                };
                self.check_text(path, text).into_iter().collect()
            }
        }
    }

    fn check_text(&self, path: &str, text: &str) -> Option<Violation> {
        match *self {
            Rule::Text { min, max } => {
                let len = text.chars().count();
                if len < min {
                    Some(Violation::new(
                        path,
                        "too_small",
                        format!("String must contain at least {min} character(s)"),
                    ))
                } else if max.is_some_and(|max| len > max) {
                    Some(Violation::new(
                        path,
                        "too_big",
                        format!(
                            "String must contain at most {} character(s)",
                            max.unwrap_or_default()
                        ),
                    ))
                } else {
                    None
                }
            }
            Rule::Email => {
                (!text.validate_email()).then(|| Violation::new(path, "invalid_string", "Invalid email"))
            }
            Rule::Uuid => {
                let valid = text.len() == 36 && Uuid::try_parse(text).is_ok();
                (!valid).then(|| Violation::new(path, "invalid_string", "Invalid uuid"))
            }
            Rule::DateTime => DateTime::parse_from_rfc3339(text)
                .is_err()
                .then(|| Violation::new(path, "invalid_string", "Invalid datetime")),
            Rule::Object(_) | Rule::List(_) => None,
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path of the offending field, empty for the object itself.
    pub path: String,
    pub code: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: &str, code: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Input rejected by a [`Shape`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn single(path: &str, code: &str, message: impl Into<String>) -> Self {
        Self::new(vec![Violation::new(path, code, message)])
    }

    /// True if some violation points at `path`.
    pub fn touches(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .violations
            .iter()
            .map(|v| {
                if v.path.is_empty() {
                    v.message.clone()
                } else {
                    format!("{}: {}", v.path, v.message)
                }
            })
            .collect();
        write!(f, "Validation error: {}", parts.join(", "))
    }
}

impl std::error::Error for ValidationError {}

/// A request type parsed through its [`Shape`].
pub trait Validated: DeserializeOwned {
    const SHAPE: &'static Shape;

    /// Validate `value` against [`Self::SHAPE`] and deserialize it.
    fn from_json(value: Value) -> Result<Self, ValidationError> {
        Self::SHAPE.validate(&value)?;
        serde_json::from_value(value)
            .map_err(|e| ValidationError::single("", "invalid_type", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const INNER: Shape = Shape::object("Inner", &[Field::required("id", Rule::Uuid)]);
    const OUTER: Shape = Shape::object(
        "Outer",
        &[
            Field::required("name", Rule::Text { min: 1, max: Some(5) }),
            Field::optional("inner", Rule::Object(&INNER)).nullable(),
            Field::optional("items", Rule::List(&INNER)),
        ],
    );

    #[test]
    fn test_collects_every_violation() {
        let err = OUTER
            .validate(&json!({ "name": "", "inner": { "id": "nope" } }))
            .unwrap_err();

        assert_eq!(err.violations.len(), 2);
        assert!(err.touches("name"));
        assert!(err.touches("inner.id"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(OUTER.validate(&json!({ "name": "ééééé" })).is_ok());
        assert!(OUTER.validate(&json!({ "name": "éééééé" })).is_err());
    }

    #[test]
    fn test_nullable_field_accepts_null() {
        assert!(OUTER.validate(&json!({ "name": "a", "inner": null })).is_ok());
    }

    #[test]
    fn test_list_paths_are_indexed() {
        let id = Uuid::new_v4().to_string();
        let err = OUTER
            .validate(&json!({ "name": "a", "items": [{ "id": id }, { "id": 3 }] }))
            .unwrap_err();

        assert_eq!(err.violations[0].path, "items.1.id");
        assert_eq!(err.violations[0].code, "invalid_type");
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = OUTER.validate(&json!(["name"])).unwrap_err();
        assert_eq!(err.violations[0].message, "Expected object");
    }

    #[test]
    fn test_uuid_must_be_hyphenated() {
        let simple = Uuid::new_v4().simple().to_string();
        assert!(INNER.validate(&json!({ "id": simple })).is_err());
    }

    #[test]
    fn test_display_lists_paths() {
        let err = ValidationError::single("title", "too_small", "too short");
        assert_eq!(err.to_string(), "Validation error: title: too short");
    }
}
