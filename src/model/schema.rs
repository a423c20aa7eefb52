use serde::Serialize;
use serde_json::Value;

/// Cleaned set of fields that survived schema validation.
pub type FieldMap = serde_json::Map<String, Value>;

/// Primitive type accepted for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Text,
    Boolean,
    Number,
    /// Non-negative decimal, stored at a two-decimal column scale.
    Money,
}

/// Largest value the NUMERIC(8,2) amount columns can hold. Values past this
/// can also overflow the decimal payload types, so they are rejected up front
/// as a field violation rather than surfacing as a storage fault.
const AMOUNT_LIMIT: f64 = 999_999.99;

impl FieldType {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::Integer => value.as_i64().is_some(),
            FieldType::Text => value.is_string(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Number => value
                .as_f64()
                .map_or(false, |n| n.abs() <= AMOUNT_LIMIT),
            FieldType::Money => value
                .as_f64()
                .map_or(false, |n| (0.0..=AMOUNT_LIMIT).contains(&n)),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            FieldType::Integer => "an integer",
            FieldType::Text => "a string",
            FieldType::Boolean => "a boolean",
            FieldType::Number => "a number no larger than 999999.99",
            FieldType::Money => "a non-negative number no larger than 999999.99",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
}

/// One field-level schema violation, reported back to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Declarative per-operation schema for one entity.
///
/// Schemas are `static` and shared read-only across requests; there is no
/// per-call validator construction.
#[derive(Debug)]
pub struct ObjectSchema {
    pub fields: &'static [FieldDef],
    pub required: &'static [&'static str],
}

impl ObjectSchema {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|def| def.name == name)
    }

    /// Validate a candidate object: strip unknown fields and nulls, check
    /// primitive types and required-field presence. Returns the cleaned field
    /// map or the full list of violations.
    pub fn validate(&self, body: &Value) -> Result<FieldMap, Vec<Violation>> {
        let Some(object) = body.as_object() else {
            return Err(vec![Violation::new("$", "expected a JSON object")]);
        };

        let mut cleaned = FieldMap::new();
        let mut violations = Vec::new();

        for def in self.fields {
            match object.get(def.name) {
                None | Some(Value::Null) => {}
                Some(value) if def.ty.matches(value) => {
                    cleaned.insert(def.name.to_owned(), value.clone());
                }
                Some(_) => {
                    violations.push(Violation::new(
                        def.name,
                        format!("must be {}", def.ty.describe()),
                    ));
                }
            }
        }

        for required in self.required {
            let present = object
                .get(*required)
                .map_or(false, |value| !value.is_null());
            if !present {
                violations.push(Violation::new(*required, "is required"));
            }
        }

        if violations.is_empty() {
            Ok(cleaned)
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static SCHEMA: ObjectSchema = ObjectSchema {
        fields: &[
            FieldDef {
                name: "name",
                ty: FieldType::Text,
            },
            FieldDef {
                name: "taxable",
                ty: FieldType::Boolean,
            },
            FieldDef {
                name: "tax",
                ty: FieldType::Money,
            },
        ],
        required: &["name"],
    };

    #[test]
    fn accepts_valid_object_and_strips_unknown_fields() {
        let cleaned = SCHEMA
            .validate(&json!({"name": "Starters", "tax": 2.5, "color": "red"}))
            .unwrap();
        assert_eq!(cleaned.get("name"), Some(&json!("Starters")));
        assert_eq!(cleaned.get("tax"), Some(&json!(2.5)));
        assert!(!cleaned.contains_key("color"));
    }

    #[test]
    fn missing_required_field_is_a_violation() {
        let violations = SCHEMA.validate(&json!({"tax": 1.0})).unwrap_err();
        assert_eq!(violations, vec![Violation::new("name", "is required")]);
    }

    #[test]
    fn null_counts_as_absent() {
        let violations = SCHEMA
            .validate(&json!({"name": null, "taxable": null}))
            .unwrap_err();
        assert_eq!(violations, vec![Violation::new("name", "is required")]);
    }

    #[test]
    fn type_mismatches_are_reported_per_field() {
        let violations = SCHEMA
            .validate(&json!({"name": 7, "taxable": "yes"}))
            .unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().any(|v| v.field == "name"));
        assert!(violations.iter().any(|v| v.field == "taxable"));
    }

    #[test]
    fn money_rejects_negative_values() {
        let violations = SCHEMA
            .validate(&json!({"name": "Starters", "tax": -0.5}))
            .unwrap_err();
        assert_eq!(
            violations,
            vec![Violation::new(
                "tax",
                "must be a non-negative number no larger than 999999.99"
            )]
        );
    }

    #[test]
    fn money_rejects_values_beyond_column_range() {
        let violations = SCHEMA
            .validate(&json!({"name": "Starters", "tax": 1e30}))
            .unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "tax");

        let at_limit = SCHEMA
            .validate(&json!({"name": "Starters", "tax": 999999.99}))
            .unwrap();
        assert_eq!(at_limit.get("tax"), Some(&json!(999999.99)));
    }

    #[test]
    fn non_object_body_is_rejected() {
        let violations = SCHEMA.validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(violations[0].field, "$");
    }
}
