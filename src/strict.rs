//! Applies the `strict` option to a schema document before compilation.
//!
//! The walk follows schema keywords only. Values under `enum`, `const`,
//! `default` and `examples` are instance data and are never rewritten.

use serde_json::{Map, Value};

/// Keywords whose value is an object mapping names to subschemas.
const SCHEMA_MAP_KEYWORDS: &[&str] = &[
    "properties",
    "patternProperties",
    "definitions",
    "$defs",
    "dependentSchemas",
    "dependencies",
];

/// Keywords whose value is an array of subschemas.
const SCHEMA_ARRAY_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf", "prefixItems"];

/// Keywords whose value is a single subschema (or, for `items`, possibly an array).
const SCHEMA_KEYWORDS: &[&str] = &[
    "items",
    "additionalItems",
    "additionalProperties",
    "unevaluatedProperties",
    "unevaluatedItems",
    "contains",
    "propertyNames",
    "not",
    "if",
    "then",
    "else",
];

/// How undeclared object properties are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Leave the schema untouched.
    #[default]
    AsWritten,
    /// Object schemas with `properties` and no `additionalProperties`
    /// reject undeclared properties.
    Strict,
    /// `additionalProperties: false` and `unevaluatedProperties: false`
    /// are lifted everywhere.
    Lenient,
}

impl Strictness {
    pub fn from_option(strict: Option<bool>) -> Self {
        match strict {
            None => Self::AsWritten,
            Some(true) => Self::Strict,
            Some(false) => Self::Lenient,
        }
    }

    /// Rewrite `schema` in place.
    pub fn apply(self, schema: &mut Value) {
        if self != Self::AsWritten {
            rewrite_schema(schema, self);
        }
    }
}

fn rewrite_schema(schema: &mut Value, strictness: Strictness) {
    let Value::Object(map) = schema else {
        return;
    };

    match strictness {
        Strictness::Strict => {
            if map.get("properties").is_some_and(Value::is_object)
                && !map.contains_key("additionalProperties")
            {
                map.insert("additionalProperties".into(), Value::Bool(false));
            }
        }
        Strictness::Lenient => {
            for keyword in ["additionalProperties", "unevaluatedProperties"] {
                if map.get(keyword) == Some(&Value::Bool(false)) {
                    map.shift_remove(keyword);
                }
            }
        }
        Strictness::AsWritten => return,
    }

    rewrite_children(map, strictness);
}

fn rewrite_children(map: &mut Map<String, Value>, strictness: Strictness) {
    for (keyword, value) in map.iter_mut() {
        let keyword = keyword.as_str();
        if SCHEMA_MAP_KEYWORDS.contains(&keyword) {
            if let Value::Object(subschemas) = value {
                // `dependencies` may also hold arrays of property names; those
                // are skipped by `rewrite_schema`.
                for subschema in subschemas.values_mut() {
                    rewrite_schema(subschema, strictness);
                }
            }
        } else if SCHEMA_ARRAY_KEYWORDS.contains(&keyword) {
            if let Value::Array(subschemas) = value {
                for subschema in subschemas {
                    rewrite_schema(subschema, strictness);
                }
            }
        } else if SCHEMA_KEYWORDS.contains(&keyword) {
            match value {
                Value::Array(subschemas) => {
                    for subschema in subschemas {
                        rewrite_schema(subschema, strictness);
                    }
                }
                other => rewrite_schema(other, strictness),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn as_written_is_a_no_op() {
        let mut schema = json!({"type": "object", "properties": {"id": {"type": "integer"}}});
        let before = schema.clone();
        Strictness::AsWritten.apply(&mut schema);
        assert_eq!(schema, before);
    }

    #[test]
    fn strict_closes_nested_object_schemas() {
        let mut schema = json!({
            "type": "object",
            "properties": {
                "user": {"type": "object", "properties": {"id": {"type": "integer"}}}
            },
            "definitions": {
                "tag": {"properties": {"name": {"type": "string"}}}
            }
        });
        Strictness::Strict.apply(&mut schema);

        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["user"]["additionalProperties"], json!(false));
        assert_eq!(schema["definitions"]["tag"]["additionalProperties"], json!(false));
    }

    #[test]
    fn strict_keeps_explicit_additional_properties() {
        let mut schema = json!({
            "properties": {"id": {"type": "integer"}},
            "additionalProperties": {"type": "string"}
        });
        Strictness::Strict.apply(&mut schema);
        assert_eq!(schema["additionalProperties"], json!({"type": "string"}));
    }

    #[test]
    fn lenient_lifts_closed_objects_at_every_level() {
        let mut schema = json!({
            "type": "array",
            "items": {
                "properties": {"id": {"type": "integer"}},
                "additionalProperties": false
            },
            "anyOf": [{"additionalProperties": false}]
        });
        Strictness::Lenient.apply(&mut schema);

        assert!(schema["items"].get("additionalProperties").is_none());
        assert!(schema["anyOf"][0].get("additionalProperties").is_none());
    }

    #[test]
    fn lenient_lifts_unevaluated_properties_and_keeps_key_order() {
        let mut schema = json!({
            "type": "object",
            "unevaluatedProperties": false,
            "properties": {"id": {"type": "integer"}},
            "required": ["id"]
        });
        Strictness::Lenient.apply(&mut schema);

        assert_eq!(
            schema.to_string(),
            r#"{"type":"object","properties":{"id":{"type":"integer"}},"required":["id"]}"#
        );
    }

    #[test]
    fn instance_data_is_not_rewritten() {
        let mut schema = json!({
            "enum": [{"properties": {}, "additionalProperties": false}],
            "default": {"additionalProperties": false}
        });
        let before = schema.clone();
        Strictness::Lenient.apply(&mut schema);
        assert_eq!(schema, before);
    }

    #[test]
    fn property_named_like_a_keyword_is_treated_as_a_property() {
        let mut schema = json!({
            "properties": {"additionalProperties": false},
            "additionalProperties": false
        });
        Strictness::Lenient.apply(&mut schema);

        assert_eq!(schema["properties"]["additionalProperties"], json!(false));
        assert!(schema.get("additionalProperties").is_none());
    }
}
